//! 依赖注入容器
//!
//! 容器在创建时一次性完成所有内部服务的构造：
//! 从根服务出发，按依赖顺序深度优先地创建实例，并记录初始化顺序。
//! 释放时按初始化顺序的逆序调用服务的释放能力。

use crate::constructor::Constructor;
use crate::implement_index::ImplementIndex;
use crate::service_list::{Registry, ServiceList};
use di_abstractions::{cast_instance, Instance, ServiceProvider, Teardown};
use infrastructure_common::{
    ContainerConfig, ContainerError, ContainerResult, LifecycleState, TypeKey,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 依赖注入容器
pub struct Container {
    registry: Registry,
    index: ImplementIndex,
    services: HashMap<TypeKey, Instance>,
    init_order: Vec<TypeKey>,
    teardowns: HashMap<TypeKey, Teardown>,
    config: ContainerConfig,
    state: LifecycleState,
}

impl Container {
    /// 使用默认配置构建容器
    pub fn new(list: ServiceList) -> ContainerResult<Self> {
        Self::with_config(list, ContainerConfig::default())
    }

    /// 使用指定配置构建容器
    ///
    /// 构建是全有或全无的：任何失败都会释放已经创建的服务并返回错误。
    pub fn with_config(list: ServiceList, config: ContainerConfig) -> ContainerResult<Self> {
        let registry = list.finalize();
        if registry.is_empty() {
            debug!("服务列表为空");
        } else {
            debug!(
                "注册表: 共 {} 个服务, 其中 {} 个由容器创建",
                registry.len(),
                registry.internal_count()
            );
        }

        let index = ImplementIndex::build(&registry);
        if !index.is_empty() {
            debug!("实现索引: {} 个抽象类型", index.len());
        }
        let constructors = Self::generate_constructors(&registry, &index)?;

        let mut run = ConstructionRun::new(&constructors, &config);
        for (key, instance) in registry.external() {
            run.services.insert(key, instance.clone());
        }

        if let Err(err) = run.execute() {
            warn!("容器构建失败: {}", err);
            run.rollback();
            return Err(err);
        }

        let ConstructionRun {
            services,
            init_order,
            ..
        } = run;

        let teardowns = constructors
            .by_key
            .into_iter()
            .map(|(key, constructor)| (key, constructor.teardown().clone()))
            .collect();

        info!(
            "容器构建完成: 创建了 {} 个服务, 共 {} 个服务",
            init_order.len(),
            services.len()
        );

        Ok(Self {
            registry,
            index,
            services,
            init_order,
            teardowns,
            config,
            state: LifecycleState::Running,
        })
    }

    /// 按具体类型获取服务
    pub fn get<T>(&self) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.ensure_running()?;

        let key = TypeKey::of::<T>();
        self.services
            .get(&key)
            .and_then(|instance| instance.clone().downcast::<T>().ok())
            .ok_or(ContainerError::ServiceNotFound { service: key })
    }

    /// 获取声明实现了抽象类型 `I` 的所有服务（包括外部服务），按注册顺序排列
    pub fn get_all<I>(&self) -> ContainerResult<Vec<Arc<I>>>
    where
        I: ?Sized + 'static,
    {
        self.ensure_running()?;

        let key = TypeKey::of::<I>();
        let implementors = self
            .index
            .implementors(&key)
            .ok_or(ContainerError::NoImplementations { service: key })?;

        implementors
            .iter()
            .map(|implementor| {
                let instance = self
                    .services
                    .get(implementor)
                    .ok_or(ContainerError::ServiceNotFound {
                        service: *implementor,
                    })?;
                self.registry
                    .descriptor(implementor)
                    .and_then(|desc| desc.caster_for(&key))
                    .and_then(|caster| cast_instance::<I>(caster, instance))
                    .ok_or(ContainerError::ServiceNotFound {
                        service: *implementor,
                    })
            })
            .collect()
    }

    /// 检查是否包含指定类型标识的服务
    pub fn contains_key(&self, key: &TypeKey) -> bool {
        !self.state.is_disposed() && self.services.contains_key(key)
    }

    /// 服务初始化顺序
    pub fn init_order(&self) -> &[TypeKey] {
        &self.init_order
    }

    /// 服务总数（包括外部服务）
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// 是否已释放
    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 释放容器创建的服务
    ///
    /// 按初始化顺序的逆序调用释放能力，外部服务不会被释放。重复调用没有任何效果。
    pub fn dispose(&mut self) {
        if self.state.is_disposed() {
            return;
        }

        for key in self.init_order.iter().rev() {
            if let (Some(instance), Some(teardown)) =
                (self.services.get(key), self.teardowns.get(key))
            {
                debug!("释放服务: {}", key);
                teardown(instance);
            }
        }

        self.services.clear();
        self.state = LifecycleState::Disposed;
        info!("容器已释放: {} 个服务", self.init_order.len());
    }

    fn ensure_running(&self) -> ContainerResult<()> {
        if self.state.is_disposed() {
            return Err(ContainerError::Disposed);
        }
        Ok(())
    }

    fn generate_constructors(
        registry: &Registry,
        index: &ImplementIndex,
    ) -> ContainerResult<Constructors> {
        let mut constructors = Constructors::default();
        for (key, spec) in registry.internal() {
            let constructor = Constructor::resolve(key, spec, registry, index)?;
            debug!("解析构造函数: {:?}", constructor);
            constructors.order.push(key);
            constructors.by_key.insert(key, constructor);
        }
        Ok(constructors)
    }
}

impl ServiceProvider for Container {
    fn get<T>(&self) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        Container::get(self)
    }

    fn get_all<I>(&self) -> ContainerResult<Vec<Arc<I>>>
    where
        I: ?Sized + 'static,
    {
        Container::get_all(self)
    }

    fn contains_key(&self, key: &TypeKey) -> bool {
        Container::contains_key(self, key)
    }

    fn init_order(&self) -> &[TypeKey] {
        Container::init_order(self)
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if self.config.dispose_on_drop {
            self.dispose();
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("init_order", &self.init_order)
            .field("services", &self.services.len())
            .field("state", &self.state)
            .finish()
    }
}

/// 按注册顺序排列的构造函数
#[derive(Default)]
struct Constructors {
    order: Vec<TypeKey>,
    by_key: HashMap<TypeKey, Constructor>,
}

/// 一次构造过程的状态
struct ConstructionRun<'a> {
    constructors: &'a Constructors,
    config: &'a ContainerConfig,
    services: HashMap<TypeKey, Instance>,
    init_order: Vec<TypeKey>,
    in_progress: HashSet<TypeKey>,
}

impl<'a> ConstructionRun<'a> {
    fn new(constructors: &'a Constructors, config: &'a ContainerConfig) -> Self {
        Self {
            constructors,
            config,
            services: HashMap::new(),
            init_order: Vec::with_capacity(constructors.order.len()),
            in_progress: HashSet::new(),
        }
    }

    /// 不被任何内部服务依赖的内部服务
    fn find_root_types(&self) -> Vec<TypeKey> {
        let dependencies: HashSet<TypeKey> = self
            .constructors
            .by_key
            .values()
            .flat_map(Constructor::dependencies)
            .collect();

        self.constructors
            .order
            .iter()
            .filter(|key| !dependencies.contains(key))
            .copied()
            .collect()
    }

    fn execute(&mut self) -> ContainerResult<()> {
        let constructors = self.constructors;
        let mut stack: Vec<TypeKey> = self.find_root_types();
        stack.reverse();
        debug!("根服务: {:?}", stack);

        while let Some(&key) = stack.last() {
            if self.services.contains_key(&key) {
                stack.pop();
                continue;
            }

            let constructor = constructors
                .by_key
                .get(&key)
                .ok_or(ContainerError::ServiceNotFound { service: key })?;

            let pending: Vec<TypeKey> = constructor
                .dependencies()
                .into_iter()
                .filter(|dependency| !self.services.contains_key(dependency))
                .collect();

            if !pending.is_empty() {
                self.expand(key, pending, &mut stack)?;
                continue;
            }

            stack.pop();
            self.construct(constructor)?;
        }

        self.check_all_constructed()
    }

    /// 把未创建的依赖压栈，并把 `key` 标记为正在展开
    fn expand(
        &mut self,
        key: TypeKey,
        pending: Vec<TypeKey>,
        stack: &mut Vec<TypeKey>,
    ) -> ContainerResult<()> {
        if let Some(max_depth) = self.config.max_resolution_depth {
            if self.in_progress.len() >= max_depth {
                return Err(ContainerError::ResolutionDepthExceeded {
                    service: key,
                    max_depth,
                });
            }
        }
        self.in_progress.insert(key);

        for dependency in pending.into_iter().rev() {
            if self.in_progress.contains(&dependency) {
                return Err(ContainerError::CircularDependency {
                    service: key,
                    dependency,
                });
            }
            stack.push(dependency);
        }
        Ok(())
    }

    fn construct(&mut self, constructor: &Constructor) -> ContainerResult<()> {
        let key = constructor.target();
        if self.config.trace_construction {
            info!("创建服务: {} <- {:?}", key, constructor.dependencies());
        } else {
            debug!("创建服务: {}", key);
        }

        let instance = constructor.construct(&self.services)?;
        self.services.insert(key, instance);
        self.init_order.push(key);
        self.in_progress.remove(&key);
        Ok(())
    }

    /// 未被创建的内部服务只可能处于与所有根服务都不相连的循环中
    fn check_all_constructed(&self) -> ContainerResult<()> {
        if self.init_order.len() == self.constructors.order.len() {
            return Ok(());
        }

        let services: Vec<TypeKey> = self
            .constructors
            .order
            .iter()
            .filter(|key| !self.services.contains_key(key))
            .copied()
            .collect();
        Err(ContainerError::UnreachableDependencies { services })
    }

    /// 构建失败时按逆序释放已经创建的服务
    fn rollback(&self) {
        for key in self.init_order.iter().rev() {
            if let (Some(instance), Some(constructor)) =
                (self.services.get(key), self.constructors.by_key.get(key))
            {
                debug!("回滚服务: {}", key);
                (constructor.teardown())(instance);
            }
        }
    }
}
