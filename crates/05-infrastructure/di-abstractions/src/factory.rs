//! 服务工厂与类型擦除
//!
//! 容器内部以类型擦除的形式保存服务实例，并通过转换函数把它们还原为
//! 具体类型或声明实现的抽象类型。

use crate::registry::Service;
use crate::resolver::Arguments;
use infrastructure_common::{ContainerError, Disposable};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的服务实例
///
/// 内部保存的是具体服务类型 `T` 的 `Arc<T>`。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 实例转换函数
///
/// 把类型擦除的实例转换为 `Box<Arc<I>>`，其中 `I` 是具体类型本身或其实现的抽象类型。
/// 实例类型不匹配时返回 `None`。
pub type Caster = Arc<dyn Fn(&Instance) -> Option<Box<dyn Any>> + Send + Sync>;

/// 服务工厂函数类型
pub type ServiceFactory =
    Arc<dyn Fn(&mut Arguments) -> Result<Instance, ContainerError> + Send + Sync>;

/// 释放能力查询函数类型
pub type Teardown = Arc<dyn Fn(&Instance) + Send + Sync>;

/// 实现声明 trait
///
/// `T: Implements<I>` 表示 `T` 可以作为抽象类型 `I`（通常是 `dyn Trait`）注入。
/// 这是编译期的父类型检查：没有实现此 trait 的类型无法声明 `is::<I>()`。
pub trait Implements<I: ?Sized + 'static>: Send + Sync + 'static {
    /// 转换为抽象类型
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

/// 为类型批量生成 [`Implements`] 实现
///
/// ```ignore
/// implements!(EnglishChild => dyn Person, dyn Child);
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty => $($iface:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$iface> for $ty {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$iface> {
                    self
                }
            }
        )+
    };
}

/// 把具体类型 `T` 的实例还原为 `Arc<T>` 的转换函数
pub fn self_caster<T>() -> Caster
where
    T: Send + Sync + 'static,
{
    Arc::new(|instance: &Instance| {
        let typed = instance.clone().downcast::<T>().ok()?;
        Some(Box::new(typed) as Box<dyn Any>)
    })
}

/// 把具体类型 `T` 的实例转换为 `Arc<I>` 的转换函数
pub fn upcaster<T, I>() -> Caster
where
    T: Implements<I>,
    I: ?Sized + 'static,
{
    Arc::new(|instance: &Instance| {
        let typed = instance.clone().downcast::<T>().ok()?;
        Some(Box::new(T::upcast(typed)) as Box<dyn Any>)
    })
}

/// 通过 [`Service::as_disposable`] 查询并调用释放能力的函数
pub fn teardown_of<T: Service>() -> Teardown {
    Arc::new(|instance: &Instance| {
        if let Some(disposable) = instance
            .downcast_ref::<T>()
            .and_then(|service| service.as_disposable())
        {
            Disposable::dispose(disposable);
        }
    })
}

/// 把类型化的工厂闭包包装为类型擦除的 [`ServiceFactory`]
pub fn erase_factory<T, F>(factory: F) -> ServiceFactory
where
    T: Send + Sync + 'static,
    F: Fn(&mut Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
{
    Arc::new(move |args: &mut Arguments| -> Result<Instance, ContainerError> {
        let service = factory(args)?;
        Ok(Arc::new(service) as Instance)
    })
}

/// 转换实例并还原为 `Arc<I>`
pub fn cast_instance<I: ?Sized + 'static>(caster: &Caster, instance: &Instance) -> Option<Arc<I>> {
    caster(instance)?.downcast::<Arc<I>>().ok().map(|boxed| *boxed)
}

/// 比较两个实例是否为同一对象
pub fn same_instance(a: &Instance, b: &Instance) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}
