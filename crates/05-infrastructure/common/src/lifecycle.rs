//! 服务生命周期管理

/// 可释放 trait
///
/// 需要在容器释放时执行清理的服务实现此 trait。
/// 容器只会对自己创建的服务调用 [`Disposable::dispose`]，外部服务不会被释放。
pub trait Disposable: Send + Sync {
    /// 释放资源
    fn dispose(&self);
}

/// 容器生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// 运行中，可以解析服务
    #[default]
    Running,
    /// 已释放，之后的任何访问都会失败
    Disposed,
}

impl LifecycleState {
    /// 是否已释放
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed)
    }
}
