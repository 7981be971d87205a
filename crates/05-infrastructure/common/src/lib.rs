//! # Infrastructure Common
//!
//! 依赖注入容器的公共基础类型。
//!
//! ## 核心组件
//!
//! - [`TypeKey`] - 稳定、可比较的类型标识
//! - [`ContainerError`] - 注册、构建和访问阶段的统一错误类型
//! - [`Disposable`] - 服务释放能力
//! - [`ContainerConfig`] - 容器配置

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
