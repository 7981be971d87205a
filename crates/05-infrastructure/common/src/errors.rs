//! 错误类型定义

use crate::metadata::{join_type_names, TypeKey};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入容器错误类型
///
/// 注册、构建和访问阶段的所有失败都使用这一个错误类型。
/// 错误是同步抛出的，不会重试。
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("同一类型 <{service}> 注册了两个不同的外部服务实例")]
    ConflictingExternal { service: TypeKey },

    #[error("类型 <{service}> 不能声明实现自身")]
    SelfImplementation { service: TypeKey },

    #[error("类型 <{service}> 必须只指定一个构造函数")]
    MultipleConstructors { service: TypeKey },

    #[error("子列表不包含根服务 <{root}>")]
    MissingSublistRoot { root: TypeKey },

    #[error("服务 <{service}> 所需的参数 <{dependency}> 无法解析")]
    UnresolvedDependency {
        service: TypeKey,
        dependency: TypeKey,
    },

    #[error("服务 <{service}> 所需的类型 <{dependency}> 存在多个有歧义的实现: {}", join_type_names(.candidates))]
    AmbiguousImplementation {
        service: TypeKey,
        dependency: TypeKey,
        candidates: Vec<TypeKey>,
    },

    #[error("服务 <{service}> 不能依赖自身")]
    SelfDependency { service: TypeKey },

    #[error("检测到循环依赖: <{service}> 与 <{dependency}>")]
    CircularDependency {
        service: TypeKey,
        dependency: TypeKey,
    },

    #[error("以下服务存在循环依赖或无法从任何根服务到达: {}", join_type_names(.services))]
    UnreachableDependencies { services: Vec<TypeKey> },

    #[error("服务 <{service}> 的解析深度超过上限 {max_depth}")]
    ResolutionDepthExceeded { service: TypeKey, max_depth: usize },

    #[error("服务 <{service}> 创建失败, 原因: {source}")]
    ConstructionFailed {
        service: TypeKey,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("构造参数不匹配: 期望 <{expected}>, {message}")]
    ArgumentMismatch { expected: TypeKey, message: String },

    #[error("服务 <{service}> 未找到")]
    ServiceNotFound { service: TypeKey },

    #[error("没有服务实现类型 <{service}>")]
    NoImplementations { service: TypeKey },

    #[error("容器已被释放")]
    Disposed,
}

impl ContainerError {
    /// 创建构造失败错误
    pub fn construction_failed(
        service: TypeKey,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConstructionFailed {
            service,
            source: source.into(),
        }
    }

    /// 是否为注册阶段的错误
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::ConflictingExternal { .. }
                | Self::SelfImplementation { .. }
                | Self::MultipleConstructors { .. }
                | Self::MissingSublistRoot { .. }
        )
    }

    /// 是否为循环依赖相关的错误
    pub fn is_circular(&self) -> bool {
        matches!(
            self,
            Self::SelfDependency { .. }
                | Self::CircularDependency { .. }
                | Self::UnreachableDependencies { .. }
        )
    }
}

/// 配置结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 容器结果类型别名
pub type ContainerResult<T> = Result<T, ContainerError>;
