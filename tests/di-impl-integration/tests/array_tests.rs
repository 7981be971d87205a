//! 数组参数与 get_all

#[macro_use]
mod common;

use common::init_test_logger;
use di_abstractions::{implements, Arguments, Dependency, Injectable, Service};
use di_impl::{Container, ServiceList};
use infrastructure_common::{ContainerError, ContainerResult, TypeKey};
use std::sync::Arc;

trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;
}

service!(Alpha);
service!(Beta);
service!(Gamma(Beta));

impl Plugin for Alpha {
    fn name(&self) -> &'static str {
        "alpha"
    }
}
impl Plugin for Beta {
    fn name(&self) -> &'static str {
        "beta"
    }
}
impl Plugin for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }
}
implements!(Alpha => dyn Plugin);
implements!(Beta => dyn Plugin);
implements!(Gamma => dyn Plugin);

/// 收集所有插件的服务
struct Host {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl Service for Host {}

impl Injectable for Host {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::all::<dyn Plugin>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            plugins: args.all::<dyn Plugin>()?,
        })
    }
}

impl Host {
    fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }
}

fn names(plugins: &[Arc<dyn Plugin>]) -> Vec<&'static str> {
    plugins.iter().map(|plugin| plugin.name()).collect()
}

#[test]
fn test_array_parameter_collects_implementations() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<Host>().unwrap();
    list.add::<Alpha>().unwrap().is::<dyn Plugin>().unwrap();
    list.add::<Beta>().unwrap().is::<dyn Plugin>().unwrap();

    let container = Container::new(list).unwrap();
    let host = container.get::<Host>().unwrap();
    assert_eq!(host.names(), vec!["alpha", "beta"]);
    assert_eq!(container.init_order().last(), Some(&TypeKey::of::<Host>()));
}

#[test]
fn test_empty_array_parameter() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<Host>().unwrap();

    let container = Container::new(list).unwrap();
    assert!(container.get::<Host>().unwrap().plugins.is_empty());
}

#[test]
fn test_array_parameter_includes_externals() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add_instance(Arc::new(Alpha))
        .unwrap()
        .is::<dyn Plugin>()
        .unwrap();
    list.add::<Beta>().unwrap().is::<dyn Plugin>().unwrap();
    list.add::<Host>().unwrap();

    let container = Container::new(list).unwrap();
    assert_eq!(container.get::<Host>().unwrap().names(), vec!["alpha", "beta"]);
    assert_eq!(
        container.init_order(),
        &[TypeKey::of::<Beta>(), TypeKey::of::<Host>()]
    );
}

#[test]
fn test_get_all_follows_registration_order() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<Gamma>().unwrap().is::<dyn Plugin>().unwrap();
    list.add::<Beta>().unwrap().is::<dyn Plugin>().unwrap();
    list.add_instance(Arc::new(Alpha))
        .unwrap()
        .is::<dyn Plugin>()
        .unwrap();

    let container = Container::new(list).unwrap();
    assert_eq!(
        container.init_order(),
        &[TypeKey::of::<Beta>(), TypeKey::of::<Gamma>()]
    );
    let plugins = container.get_all::<dyn Plugin>().unwrap();
    assert_eq!(names(&plugins), vec!["gamma", "beta", "alpha"]);
}

#[test]
fn test_get_all_excludes_undeclared_services() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<Alpha>().unwrap().is::<dyn Plugin>().unwrap();
    list.add::<Beta>().unwrap();

    let container = Container::new(list).unwrap();
    assert_eq!(names(&container.get_all::<dyn Plugin>().unwrap()), vec!["alpha"]);
}

#[test]
fn test_get_all_without_implementations() {
    init_test_logger();
    let mut list = ServiceList::new();
    list.add::<Alpha>().unwrap();

    let container = Container::new(list).unwrap();
    let err = container.get_all::<dyn Plugin>().err().unwrap();
    assert!(matches!(err, ContainerError::NoImplementations { .. }));
}
