//! 服务列表
//!
//! [`ServiceList`] 是注册阶段使用的构建器：收集外部服务、内部服务和服务描述符，
//! 并支持把子列表作为以根服务命名的作用域合并进来。
//! 容器通过 [`ServiceList::finalize`] 得到不可变的 [`Registry`] 快照。

use di_abstractions::{
    same_instance, self_caster, upcaster, Arguments, Caster, ConstructorSpec, Dependency,
    Implements, Injectable, Instance, Service,
};
use infrastructure_common::{ContainerError, ContainerResult, TypeKey};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 作用域标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootId {
    /// 列表本身的顶层作用域
    Top,
    /// 通过子列表合并引入的、以根服务命名的作用域
    Service(TypeKey),
}

/// 服务描述符
#[derive(Clone)]
pub struct ServiceDesc {
    key: TypeKey,
    self_caster: Caster,
    implements: Vec<(TypeKey, Caster)>,
    roots: BTreeSet<RootId>,
}

impl ServiceDesc {
    fn new<T: Send + Sync + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            self_caster: self_caster::<T>(),
            implements: Vec::new(),
            roots: BTreeSet::new(),
        }
    }

    /// 服务类型
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// 声明实现的抽象类型，按声明顺序排列
    pub fn implements(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.implements.iter().map(|(key, _)| *key)
    }

    /// 是否声明实现了抽象类型
    pub fn does_implement(&self, key: &TypeKey) -> bool {
        self.implements.iter().any(|(implemented, _)| implemented == key)
    }

    /// 服务所属的作用域
    pub fn roots(&self) -> &BTreeSet<RootId> {
        &self.roots
    }

    /// 是否与另一个服务共享至少一个作用域
    pub fn shares_root(&self, other: &ServiceDesc) -> bool {
        !self.roots.is_disjoint(&other.roots)
    }

    /// 把实例转换为服务类型本身的函数
    pub fn self_caster(&self) -> &Caster {
        &self.self_caster
    }

    /// 把实例转换为 `key` 的函数：服务类型本身或声明实现的抽象类型
    pub fn caster_for(&self, key: &TypeKey) -> Option<&Caster> {
        if *key == self.key {
            return Some(&self.self_caster);
        }
        self.implements
            .iter()
            .find(|(implemented, _)| implemented == key)
            .map(|(_, caster)| caster)
    }

    fn add_implement(&mut self, key: TypeKey, caster: Caster) {
        if !self.does_implement(&key) {
            self.implements.push((key, caster));
        }
    }

    fn merge_implements(&mut self, other: &ServiceDesc) {
        for (key, caster) in &other.implements {
            self.add_implement(*key, caster.clone());
        }
    }
}

impl fmt::Debug for ServiceDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDesc")
            .field("key", &self.key)
            .field("implements", &self.implements().collect::<Vec<_>>())
            .field("roots", &self.roots)
            .finish()
    }
}

/// 服务描述符句柄
///
/// 注册服务后返回，用于声明服务实现的抽象类型
pub struct ServiceHandle<'a, T> {
    desc: &'a mut ServiceDesc,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> ServiceHandle<'a, T>
where
    T: Send + Sync + 'static,
{
    /// 声明服务实现了抽象类型 `I`
    pub fn is<I>(self) -> ContainerResult<Self>
    where
        I: ?Sized + 'static,
        T: Implements<I>,
    {
        let key = TypeKey::of::<I>();
        if key == self.desc.key {
            return Err(ContainerError::SelfImplementation {
                service: self.desc.key,
            });
        }

        debug!("声明实现: {} -> {}", self.desc.key, key);
        self.desc.add_implement(key, upcaster::<T, I>());
        Ok(self)
    }

    /// 服务描述符
    pub fn descriptor(&self) -> &ServiceDesc {
        self.desc
    }
}

/// 服务列表
#[derive(Clone, Default)]
pub struct ServiceList {
    external: HashMap<TypeKey, Instance>,
    internal: HashMap<TypeKey, ConstructorSpec>,
    descriptors: HashMap<TypeKey, ServiceDesc>,
    order: Vec<TypeKey>,
}

impl ServiceList {
    /// 创建空的服务列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册外部服务
    ///
    /// 容器只借用外部服务，不会释放它们。同一个实例可以重复注册。
    pub fn add_instance<T>(&mut self, instance: Arc<T>) -> ContainerResult<ServiceHandle<'_, T>>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        self.insert_external(key, instance)?;
        Ok(self.top_level_descriptor::<T>())
    }

    /// 注册由容器创建的服务，使用其指定构造函数
    pub fn add<T: Injectable>(&mut self) -> ContainerResult<ServiceHandle<'_, T>> {
        let key = TypeKey::of::<T>();
        self.insert_internal(key, ConstructorSpec::designated::<T>())?;
        Ok(self.top_level_descriptor::<T>())
    }

    /// 注册由容器创建的服务，使用显式的依赖列表和工厂
    pub fn add_with<T, F>(
        &mut self,
        dependencies: Vec<Dependency>,
        factory: F,
    ) -> ContainerResult<ServiceHandle<'_, T>>
    where
        T: Service,
        F: Fn(&mut Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        self.insert_internal(key, ConstructorSpec::custom(dependencies, factory))?;
        Ok(self.top_level_descriptor::<T>())
    }

    /// 合并子列表，`R` 是子列表中唯一对外可见的根服务
    ///
    /// 子列表中除根服务以外的成员只在以 `R` 命名的作用域内可见。
    /// 合并是原子的：失败时当前列表保持不变。
    pub fn add_list<R>(&mut self, sublist: &ServiceList) -> ContainerResult<()>
    where
        R: ?Sized + 'static,
    {
        let root = TypeKey::of::<R>();
        if !sublist.descriptors.contains_key(&root) {
            return Err(ContainerError::MissingSublistRoot { root });
        }
        self.check_merge(sublist)?;

        debug!("合并子列表: 根服务 {}, {} 个服务", root, sublist.order.len());

        for key in &sublist.order {
            if let Some(instance) = sublist.external.get(key) {
                self.insert_external(*key, instance.clone())?;
            }
        }

        for key in &sublist.order {
            if let Some(spec) = sublist.internal.get(key) {
                self.insert_internal(*key, spec.clone())?;
            }
        }

        for key in &sublist.order {
            if let Some(desc) = sublist.descriptors.get(key) {
                self.merge_descriptor(root, desc);
            }
        }

        Ok(())
    }

    /// 已注册的服务数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 获取服务描述符
    pub fn descriptor(&self, key: &TypeKey) -> Option<&ServiceDesc> {
        self.descriptors.get(key)
    }

    /// 是否为外部服务
    pub fn is_external(&self, key: &TypeKey) -> bool {
        self.external.contains_key(key)
    }

    /// 是否为容器创建的服务
    pub fn is_internal(&self, key: &TypeKey) -> bool {
        self.internal.contains_key(key)
    }

    /// 生成不可变的注册表快照
    pub fn finalize(self) -> Registry {
        debug!(
            "服务列表定稿: {} 个外部服务, {} 个内部服务",
            self.external.len(),
            self.internal.len()
        );
        Registry {
            external: self.external,
            internal: self.internal,
            descriptors: self.descriptors,
            order: self.order,
        }
    }

    fn insert_external(&mut self, key: TypeKey, instance: Instance) -> ContainerResult<()> {
        if let Some(existing) = self.external.get(&key) {
            if same_instance(existing, &instance) {
                return Ok(());
            }
            return Err(ContainerError::ConflictingExternal { service: key });
        }

        debug!("注册外部服务: {}", key);
        self.external.insert(key, instance);
        self.internal.remove(&key);
        Ok(())
    }

    fn insert_internal(&mut self, key: TypeKey, spec: ConstructorSpec) -> ContainerResult<()> {
        if self.external.contains_key(&key) {
            debug!("服务 {} 已作为外部服务注册, 忽略内部注册", key);
            return Ok(());
        }

        match self.internal.get(&key) {
            Some(existing) if existing.is_same(&spec) => Ok(()),
            Some(_) => Err(ContainerError::MultipleConstructors { service: key }),
            None => {
                debug!("注册内部服务: {}", key);
                self.internal.insert(key, spec);
                Ok(())
            }
        }
    }

    fn check_merge(&self, sublist: &ServiceList) -> ContainerResult<()> {
        for (key, instance) in &sublist.external {
            if let Some(existing) = self.external.get(key) {
                if !same_instance(existing, instance) {
                    return Err(ContainerError::ConflictingExternal { service: *key });
                }
            }
        }

        for (key, spec) in &sublist.internal {
            if self.external.contains_key(key) {
                continue;
            }
            if let Some(existing) = self.internal.get(key) {
                if !existing.is_same(spec) {
                    return Err(ContainerError::MultipleConstructors { service: *key });
                }
            }
        }

        Ok(())
    }

    fn top_level_descriptor<T>(&mut self) -> ServiceHandle<'_, T>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        if !self.descriptors.contains_key(&key) {
            self.order.push(key);
        }

        let desc = self
            .descriptors
            .entry(key)
            .or_insert_with(ServiceDesc::new::<T>);
        desc.roots.insert(RootId::Top);

        ServiceHandle {
            desc,
            _marker: PhantomData,
        }
    }

    fn merge_descriptor(&mut self, root: TypeKey, sub_desc: &ServiceDesc) {
        let key = sub_desc.key;
        match self.descriptors.get_mut(&key) {
            Some(desc) => {
                desc.merge_implements(sub_desc);
                desc.roots.insert(RootId::Service(root));
            }
            None => {
                let mut desc = sub_desc.clone();
                desc.roots.insert(RootId::Service(root));
                if key != root {
                    desc.roots.remove(&RootId::Top);
                }
                self.descriptors.insert(key, desc);
                self.order.push(key);
            }
        }
    }
}

impl fmt::Debug for ServiceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceList")
            .field("external", &self.external.keys().collect::<Vec<_>>())
            .field("internal", &self.internal.keys().collect::<Vec<_>>())
            .field("descriptors", &self.order)
            .finish()
    }
}

/// 不可变的注册表快照
pub struct Registry {
    external: HashMap<TypeKey, Instance>,
    internal: HashMap<TypeKey, ConstructorSpec>,
    descriptors: HashMap<TypeKey, ServiceDesc>,
    order: Vec<TypeKey>,
}

impl Registry {
    /// 获取服务描述符
    pub fn descriptor(&self, key: &TypeKey) -> Option<&ServiceDesc> {
        self.descriptors.get(key)
    }

    /// 按注册顺序遍历服务描述符
    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDesc> + '_ {
        self.order.iter().filter_map(|key| self.descriptors.get(key))
    }

    /// 按注册顺序遍历外部服务
    pub fn external(&self) -> impl Iterator<Item = (TypeKey, &Instance)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.external.get(key).map(|instance| (*key, instance)))
    }

    /// 按注册顺序遍历内部服务及其构造函数
    pub fn internal(&self) -> impl Iterator<Item = (TypeKey, &ConstructorSpec)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.internal.get(key).map(|spec| (*key, spec)))
    }

    /// 内部服务数量
    pub fn internal_count(&self) -> usize {
        self.internal.len()
    }

    /// 服务总数
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("descriptors", &self.descriptors().collect::<Vec<_>>())
            .finish()
    }
}
