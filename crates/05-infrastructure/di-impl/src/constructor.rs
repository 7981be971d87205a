//! 构造函数与参数解析
//!
//! 为每个内部服务把声明的依赖解析为具体类型，并校验作用域

use crate::implement_index::ImplementIndex;
use crate::service_list::{Registry, ServiceDesc};
use di_abstractions::{
    Argument, Arguments, Caster, ConstructorSpec, Dependency, Instance, ResolvedService,
    ServiceFactory, Teardown,
};
use infrastructure_common::{ContainerError, ContainerResult, TypeKey};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 已解析的参数
#[derive(Clone)]
pub enum ParamDesc {
    /// 单个服务参数
    Single {
        /// 声明的参数类型
        requested: TypeKey,
        /// 提供实例的具体类型
        resolved: TypeKey,
        /// 转换为声明类型的函数
        caster: Caster,
    },
    /// 数组参数
    All {
        /// 元素类型
        element: TypeKey,
        /// 作用域内的所有实现，按索引顺序排列
        resolved: Vec<(TypeKey, Caster)>,
    },
}

impl ParamDesc {
    /// 参数解析到的具体类型
    pub fn resolved_types(&self) -> Vec<TypeKey> {
        match self {
            Self::Single { resolved, .. } => vec![*resolved],
            Self::All { resolved, .. } => resolved.iter().map(|(key, _)| *key).collect(),
        }
    }

    fn to_argument(&self, services: &HashMap<TypeKey, Instance>) -> ContainerResult<Argument> {
        match self {
            Self::Single {
                requested,
                resolved,
                caster,
            } => Ok(Argument::Single {
                requested: *requested,
                service: ResolvedService::new(
                    *resolved,
                    lookup(services, resolved)?,
                    caster.clone(),
                ),
            }),
            Self::All { element, resolved } => {
                let services = resolved
                    .iter()
                    .map(|(key, caster)| {
                        Ok(ResolvedService::new(
                            *key,
                            lookup(services, key)?,
                            caster.clone(),
                        ))
                    })
                    .collect::<ContainerResult<Vec<_>>>()?;
                Ok(Argument::All {
                    element: *element,
                    services,
                })
            }
        }
    }
}

impl fmt::Debug for ParamDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single {
                requested,
                resolved,
                ..
            } => f
                .debug_struct("Single")
                .field("requested", requested)
                .field("resolved", resolved)
                .finish(),
            Self::All { element, .. } => f
                .debug_struct("All")
                .field("element", element)
                .field("resolved", &self.resolved_types())
                .finish(),
        }
    }
}

/// 已解析的构造函数
pub struct Constructor {
    target: TypeKey,
    params: Vec<ParamDesc>,
    factory: ServiceFactory,
    teardown: Teardown,
}

impl Constructor {
    /// 解析服务的所有参数
    pub fn resolve(
        target: TypeKey,
        spec: &ConstructorSpec,
        registry: &Registry,
        index: &ImplementIndex,
    ) -> ContainerResult<Self> {
        let owner = registry
            .descriptor(&target)
            .ok_or(ContainerError::ServiceNotFound { service: target })?;

        let params = spec
            .dependencies()
            .iter()
            .map(|dependency| match *dependency {
                Dependency::Single(requested) => {
                    resolve_single(owner, requested, registry, index).map(|(resolved, caster)| {
                        ParamDesc::Single {
                            requested,
                            resolved,
                            caster,
                        }
                    })
                }
                Dependency::All(element) => resolve_all(owner, element, registry, index)
                    .map(|resolved| ParamDesc::All { element, resolved }),
            })
            .collect::<ContainerResult<Vec<_>>>()?;

        Ok(Self {
            target,
            params,
            factory: spec.factory().clone(),
            teardown: spec.teardown().clone(),
        })
    }

    /// 目标服务类型
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// 已解析的参数
    pub fn params(&self) -> &[ParamDesc] {
        &self.params
    }

    /// 所有依赖的具体类型，按参数顺序去重
    pub fn dependencies(&self) -> Vec<TypeKey> {
        let mut seen = HashSet::new();
        self.params
            .iter()
            .flat_map(ParamDesc::resolved_types)
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// 使用已创建的服务调用工厂
    pub fn construct(&self, services: &HashMap<TypeKey, Instance>) -> ContainerResult<Instance> {
        let values = self
            .params
            .iter()
            .map(|param| param.to_argument(services))
            .collect::<ContainerResult<Vec<_>>>()?;

        let mut args = Arguments::new(self.target, values);
        (self.factory)(&mut args)
    }

    /// 释放能力查询
    pub fn teardown(&self) -> &Teardown {
        &self.teardown
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("target", &self.target)
            .field("params", &self.params)
            .finish()
    }
}

fn lookup(services: &HashMap<TypeKey, Instance>, key: &TypeKey) -> ContainerResult<Instance> {
    services
        .get(key)
        .cloned()
        .ok_or(ContainerError::ServiceNotFound { service: *key })
}

/// 过滤出与 `owner` 共享作用域的实现
fn filter_by_root<'a>(
    owner: &ServiceDesc,
    implementors: &'a [TypeKey],
    registry: &'a Registry,
) -> Vec<&'a ServiceDesc> {
    implementors
        .iter()
        .filter_map(|key| registry.descriptor(key))
        .filter(|desc| desc.shares_root(owner))
        .collect()
}

fn implement_caster(
    owner: &ServiceDesc,
    desc: &ServiceDesc,
    requested: TypeKey,
) -> ContainerResult<(TypeKey, Caster)> {
    if desc.key() == owner.key() {
        return Err(ContainerError::SelfDependency {
            service: owner.key(),
        });
    }

    desc.caster_for(&requested)
        .map(|caster| (desc.key(), caster.clone()))
        .ok_or(ContainerError::UnresolvedDependency {
            service: owner.key(),
            dependency: requested,
        })
}

fn resolve_single(
    owner: &ServiceDesc,
    requested: TypeKey,
    registry: &Registry,
    index: &ImplementIndex,
) -> ContainerResult<(TypeKey, Caster)> {
    if requested == owner.key() {
        return Err(ContainerError::SelfDependency {
            service: owner.key(),
        });
    }

    if let Some(desc) = registry.descriptor(&requested) {
        if desc.shares_root(owner) {
            return Ok((requested, desc.self_caster().clone()));
        }
    }

    let unresolved = || ContainerError::UnresolvedDependency {
        service: owner.key(),
        dependency: requested,
    };

    let implementors = index.implementors(&requested).ok_or_else(unresolved)?;
    match filter_by_root(owner, implementors, registry).as_slice() {
        [] => Err(unresolved()),
        [desc] => implement_caster(owner, desc, requested),
        candidates => Err(ContainerError::AmbiguousImplementation {
            service: owner.key(),
            dependency: requested,
            candidates: candidates.iter().map(|desc| desc.key()).collect(),
        }),
    }
}

fn resolve_all(
    owner: &ServiceDesc,
    element: TypeKey,
    registry: &Registry,
    index: &ImplementIndex,
) -> ContainerResult<Vec<(TypeKey, Caster)>> {
    let Some(implementors) = index.implementors(&element) else {
        return Ok(Vec::new());
    };

    filter_by_root(owner, implementors, registry)
        .into_iter()
        .map(|desc| implement_caster(owner, desc, element))
        .collect()
}
