//! 集成测试共用工具

#![allow(dead_code, unused_macros)]

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 声明一个只读取依赖、不保存依赖的测试服务
///
/// ```ignore
/// service!(C0(A0, B0));
/// service!(B0(dyn I0));
/// ```
macro_rules! service {
    ($name:ident) => {
        struct $name;

        impl ::di_abstractions::Service for $name {}

        impl ::di_abstractions::Injectable for $name {
            fn create(
                _args: &mut ::di_abstractions::Arguments,
            ) -> ::infrastructure_common::ContainerResult<Self> {
                Ok($name)
            }
        }
    };
    ($name:ident($($dep:ty),+ $(,)?)) => {
        struct $name;

        impl ::di_abstractions::Service for $name {}

        impl ::di_abstractions::Injectable for $name {
            fn dependencies() -> Vec<::di_abstractions::Dependency> {
                vec![$(::di_abstractions::Dependency::single::<$dep>()),+]
            }

            fn create(
                args: &mut ::di_abstractions::Arguments,
            ) -> ::infrastructure_common::ContainerResult<Self> {
                $(args.single::<$dep>()?;)+
                Ok($name)
            }
        }
    };
}
