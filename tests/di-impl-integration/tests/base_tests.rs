//! 容器构建的基础场景

#[macro_use]
mod common;

use common::init_test_logger;
use di_abstractions::{Arguments, Dependency, Injectable, Service};
use di_impl::{Container, ServiceList};
use infrastructure_common::{ContainerError, ContainerResult, TypeKey};
use std::sync::Arc;

service!(A0);
service!(A1);
service!(B0(A0));
service!(C0(A0, B0));

/// 保存依赖实例的服务
struct Holder {
    a0: Arc<A0>,
}

impl Service for Holder {}

impl Injectable for Holder {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::single::<A0>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            a0: args.single::<A0>()?,
        })
    }
}

#[test]
fn test_empty_list() {
    init_test_logger();
    let container = Container::new(ServiceList::new()).unwrap();
    assert!(container.is_empty());
    assert!(container.init_order().is_empty());
}

#[test]
fn test_multiple_roots() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<A0>().unwrap();
    list.add::<A1>().unwrap();

    let container = Container::new(list).unwrap();
    assert_eq!(
        container.init_order(),
        &[TypeKey::of::<A0>(), TypeKey::of::<A1>()]
    );
}

#[test]
fn test_dependency_is_the_registered_instance() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<Holder>().unwrap();
    list.add::<A0>().unwrap();

    let container = Container::new(list).unwrap();
    let holder = container.get::<Holder>().unwrap();
    assert!(Arc::ptr_eq(&holder.a0, &container.get::<A0>().unwrap()));
}

#[test]
fn test_diamond_inclusion_builds_dependencies_first() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<C0>().unwrap();
    list.add::<B0>().unwrap();
    list.add::<A0>().unwrap();

    let container = Container::new(list).unwrap();
    assert_eq!(
        container.init_order(),
        &[
            TypeKey::of::<A0>(),
            TypeKey::of::<B0>(),
            TypeKey::of::<C0>()
        ]
    );
    assert_eq!(container.len(), 3);
}

#[test]
fn test_external_dependency() {
    init_test_logger();
    let external = Arc::new(A0);
    let mut list = ServiceList::new();
    list.add_instance(external.clone()).unwrap();
    list.add::<Holder>().unwrap();

    let container = Container::new(list).unwrap();
    assert_eq!(container.init_order(), &[TypeKey::of::<Holder>()]);
    assert!(Arc::ptr_eq(&container.get::<Holder>().unwrap().a0, &external));
    assert!(Arc::ptr_eq(&container.get::<A0>().unwrap(), &external));
}

#[test]
fn test_missing_dependency() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<C0>().unwrap();
    list.add::<B0>().unwrap();

    let err = Container::new(list).unwrap_err();
    match err {
        ContainerError::UnresolvedDependency {
            service,
            dependency,
        } => {
            assert!(service.is::<C0>());
            assert!(dependency.is::<A0>());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_double_internal_registration() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<A0>().unwrap();
    list.add::<A0>().unwrap();
    assert_eq!(list.len(), 1);

    let container = Container::new(list).unwrap();
    assert_eq!(container.init_order(), &[TypeKey::of::<A0>()]);
}

#[test]
fn test_external_supersedes_internal() {
    init_test_logger();
    let external = Arc::new(A0);
    let mut list = ServiceList::new();
    list.add::<A0>().unwrap();
    list.add_instance(external.clone()).unwrap();
    list.add::<A0>().unwrap();

    assert!(list.is_external(&TypeKey::of::<A0>()));
    assert!(!list.is_internal(&TypeKey::of::<A0>()));

    let container = Container::new(list).unwrap();
    assert!(container.init_order().is_empty());
    assert!(Arc::ptr_eq(&container.get::<A0>().unwrap(), &external));
}

#[test]
fn test_same_external_registered_twice() {
    init_test_logger();
    let external = Arc::new(A0);
    let mut list = ServiceList::new();
    list.add_instance(external.clone()).unwrap();
    list.add_instance(external).unwrap();
    assert!(Container::new(list).is_ok());
}

#[test]
fn test_conflicting_externals() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add_instance(Arc::new(A0)).unwrap();

    let err = list.add_instance(Arc::new(A0)).err().unwrap();
    assert!(matches!(err, ContainerError::ConflictingExternal { .. }));
    assert!(err.is_registration_error());
}

#[test]
fn test_conflicting_constructors() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<A0>().unwrap();

    let err = list.add_with(Vec::new(), |_| Ok(A0)).err().unwrap();
    assert!(matches!(err, ContainerError::MultipleConstructors { .. }));
}
