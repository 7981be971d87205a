//! 构造参数
//!
//! 工厂通过 [`Arguments`] 按声明顺序读取已解析的依赖

use crate::factory::{cast_instance, Caster, Instance};
use infrastructure_common::{ContainerError, TypeKey};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// 已解析的单个依赖
#[derive(Clone)]
pub struct ResolvedService {
    /// 实际提供实例的具体类型
    pub provider: TypeKey,
    /// 实例
    pub instance: Instance,
    /// 转换为请求类型的函数
    pub caster: Caster,
}

impl ResolvedService {
    /// 创建已解析的依赖
    pub fn new(provider: TypeKey, instance: Instance, caster: Caster) -> Self {
        Self {
            provider,
            instance,
            caster,
        }
    }
}

/// 单个构造参数
#[derive(Clone)]
pub enum Argument {
    /// 单个服务
    Single {
        /// 声明的参数类型
        requested: TypeKey,
        /// 提供参数的服务
        service: ResolvedService,
    },
    /// 所有实现，按解析顺序排列
    All {
        /// 元素类型
        element: TypeKey,
        /// 作用域内的所有实现
        services: Vec<ResolvedService>,
    },
}

impl Argument {
    fn type_key(&self) -> TypeKey {
        match self {
            Self::Single { requested, .. } => *requested,
            Self::All { element, .. } => *element,
        }
    }
}

/// 构造参数列表
pub struct Arguments {
    target: TypeKey,
    values: VecDeque<Argument>,
}

impl Arguments {
    /// 为目标服务创建参数列表
    pub fn new(target: TypeKey, values: impl IntoIterator<Item = Argument>) -> Self {
        Self {
            target,
            values: values.into_iter().collect(),
        }
    }

    /// 正在构造的服务
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// 读取下一个单服务参数
    pub fn single<T: ?Sized + 'static>(&mut self) -> Result<Arc<T>, ContainerError> {
        let expected = TypeKey::of::<T>();
        match self.next(expected)? {
            Argument::Single { requested, service } if requested == expected => {
                cast_instance::<T>(&service.caster, &service.instance).ok_or_else(|| {
                    ContainerError::ArgumentMismatch {
                        expected,
                        message: format!("服务 <{}> 无法转换为该类型", service.provider),
                    }
                })
            }
            other => Err(self.mismatch(expected, &other)),
        }
    }

    /// 读取下一个数组参数
    pub fn all<T: ?Sized + 'static>(&mut self) -> Result<Vec<Arc<T>>, ContainerError> {
        let expected = TypeKey::of::<T>();
        match self.next(expected)? {
            Argument::All { element, services } if element == expected => services
                .iter()
                .map(|service| {
                    cast_instance::<T>(&service.caster, &service.instance).ok_or_else(|| {
                        ContainerError::ArgumentMismatch {
                            expected,
                            message: format!("服务 <{}> 无法转换为该类型", service.provider),
                        }
                    })
                })
                .collect(),
            other => Err(self.mismatch(expected, &other)),
        }
    }

    fn next(&mut self, expected: TypeKey) -> Result<Argument, ContainerError> {
        self.values
            .pop_front()
            .ok_or_else(|| ContainerError::ArgumentMismatch {
                expected,
                message: format!("服务 <{}> 的参数已经读取完毕", self.target),
            })
    }

    fn mismatch(&self, expected: TypeKey, actual: &Argument) -> ContainerError {
        let kind = match actual {
            Argument::Single { .. } => "单个",
            Argument::All { .. } => "数组",
        };
        ContainerError::ArgumentMismatch {
            expected,
            message: format!(
                "服务 <{}> 的下一个参数是{}参数 <{}>",
                self.target,
                kind,
                actual.type_key()
            ),
        }
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("target", &self.target)
            .field(
                "values",
                &self.values.iter().map(Argument::type_key).collect::<Vec<_>>(),
            )
            .finish()
    }
}
