//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务注册契约和容器访问接口。
//!
//! ## 核心接口
//!
//! - [`Service`] / [`Injectable`] - 服务及其指定构造函数
//! - [`Dependency`] - 构造参数声明
//! - [`Implements`] - 抽象类型实现声明
//! - [`Arguments`] - 工厂读取已解析依赖的参数列表
//! - [`ServiceProvider`] - 容器访问接口

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
