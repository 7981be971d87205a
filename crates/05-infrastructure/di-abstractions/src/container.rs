//! 依赖注入容器抽象接口
//!
//! 提供已构建容器的只读访问接口

use infrastructure_common::{ContainerError, TypeKey};
use std::sync::Arc;

/// 服务提供者 trait
///
/// 容器构建完成后的访问接口。所有方法都是只读的，可以被多个读者并发调用。
pub trait ServiceProvider: Send + Sync {
    /// 按具体类型获取服务
    fn get<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: Send + Sync + 'static;

    /// 获取声明实现了抽象类型 `I` 的所有服务
    fn get_all<I>(&self) -> Result<Vec<Arc<I>>, ContainerError>
    where
        I: ?Sized + 'static;

    /// 检查是否包含指定类型的服务
    fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.contains_key(&TypeKey::of::<T>())
    }

    /// 检查是否包含指定类型标识的服务
    fn contains_key(&self, key: &TypeKey) -> bool;

    /// 服务初始化顺序（只包含容器创建的服务）
    fn init_order(&self) -> &[TypeKey];
}
