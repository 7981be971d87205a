//! 服务注册契约
//!
//! 每个由容器创建的服务通过显式的注册契约声明自己唯一的构造函数：
//! 有序的依赖列表，以及根据已解析依赖创建实例的工厂。

use crate::factory::{erase_factory, teardown_of, ServiceFactory, Teardown};
use crate::resolver::Arguments;
use infrastructure_common::{ContainerError, Disposable, TypeKey};
use std::fmt;
use std::sync::Arc;

/// 服务基础 trait
///
/// 所有由容器创建的服务都必须实现此 trait
pub trait Service: Send + Sync + 'static {
    /// 查询释放能力
    ///
    /// 需要在容器释放时清理资源的服务返回 `Some(self)`。
    fn as_disposable(&self) -> Option<&dyn Disposable> {
        None
    }
}

/// 可注入服务 trait
///
/// 描述服务的指定构造函数
pub trait Injectable: Service + Sized {
    /// 获取依赖列表，顺序与 [`Injectable::create`] 读取参数的顺序一致
    fn dependencies() -> Vec<Dependency> {
        Vec::new()
    }

    /// 使用已解析的依赖创建服务实例
    fn create(args: &mut Arguments) -> Result<Self, ContainerError>;
}

/// 构造函数参数声明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// 单个服务：具体类型，或只有一个实现的抽象类型
    Single(TypeKey),
    /// 作用域内实现了该抽象类型的所有服务
    All(TypeKey),
}

impl Dependency {
    /// 依赖单个服务
    pub fn single<T: ?Sized + 'static>() -> Self {
        Self::Single(TypeKey::of::<T>())
    }

    /// 依赖所有实现
    pub fn all<T: ?Sized + 'static>() -> Self {
        Self::All(TypeKey::of::<T>())
    }

    /// 参数的类型
    pub fn type_key(&self) -> TypeKey {
        match self {
            Self::Single(key) | Self::All(key) => *key,
        }
    }

    /// 是否为数组参数
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All(_))
    }
}

/// 构造函数来源
#[derive(Clone)]
enum ConstructorOrigin {
    /// 来自 [`Injectable`] 的指定构造函数
    Designated,
    /// 注册时显式提供的工厂
    Custom,
}

/// 构造函数描述
///
/// 服务的唯一构造函数：依赖列表、工厂和释放能力查询
#[derive(Clone)]
pub struct ConstructorSpec {
    dependencies: Vec<Dependency>,
    factory: ServiceFactory,
    teardown: Teardown,
    origin: ConstructorOrigin,
}

impl ConstructorSpec {
    /// 使用 [`Injectable`] 的指定构造函数
    pub fn designated<T: Injectable>() -> Self {
        Self {
            dependencies: T::dependencies(),
            factory: erase_factory(T::create),
            teardown: teardown_of::<T>(),
            origin: ConstructorOrigin::Designated,
        }
    }

    /// 使用显式的依赖列表和工厂
    pub fn custom<T, F>(dependencies: Vec<Dependency>, factory: F) -> Self
    where
        T: Service,
        F: Fn(&mut Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        Self {
            dependencies,
            factory: erase_factory(factory),
            teardown: teardown_of::<T>(),
            origin: ConstructorOrigin::Custom,
        }
    }

    /// 依赖列表
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// 工厂
    pub fn factory(&self) -> &ServiceFactory {
        &self.factory
    }

    /// 释放能力查询
    pub fn teardown(&self) -> &Teardown {
        &self.teardown
    }

    /// 是否为同一个构造函数
    ///
    /// 指定构造函数总是相同的；显式工厂只有在来自同一次注册时才相同。
    pub fn is_same(&self, other: &Self) -> bool {
        match (&self.origin, &other.origin) {
            (ConstructorOrigin::Designated, ConstructorOrigin::Designated) => true,
            (ConstructorOrigin::Custom, ConstructorOrigin::Custom) => {
                Arc::ptr_eq(&self.factory, &other.factory)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ConstructorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match self.origin {
            ConstructorOrigin::Designated => "designated",
            ConstructorOrigin::Custom => "custom",
        };
        f.debug_struct("ConstructorSpec")
            .field("dependencies", &self.dependencies)
            .field("origin", &origin)
            .field("factory", &"<function>")
            .finish()
    }
}
