//! 服务获取与释放

#[macro_use]
mod common;

use common::init_test_logger;
use di_abstractions::{Arguments, Dependency, Injectable, Service, ServiceProvider};
use di_impl::{Container, ServiceList};
use infrastructure_common::{
    ContainerConfig, ContainerError, ContainerResult, Disposable, TypeKey,
};
use std::sync::{Arc, Mutex};

service!(Untouched);

/// 记录释放顺序的外部服务
#[derive(Default)]
struct Journal {
    entries: Mutex<Vec<&'static str>>,
    disposed: Mutex<bool>,
}

impl Journal {
    fn record(&self, entry: &'static str) {
        self.entries.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().unwrap().clone()
    }
}

impl Service for Journal {
    fn as_disposable(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl Disposable for Journal {
    fn dispose(&self) {
        *self.disposed.lock().unwrap() = true;
    }
}

macro_rules! journaled {
    ($name:ident($($dep:ty),*)) => {
        struct $name {
            journal: Arc<Journal>,
        }

        impl Service for $name {
            fn as_disposable(&self) -> Option<&dyn Disposable> {
                Some(self)
            }
        }

        impl Disposable for $name {
            fn dispose(&self) {
                self.journal.record(stringify!($name));
            }
        }

        impl Injectable for $name {
            fn dependencies() -> Vec<Dependency> {
                vec![Dependency::single::<Journal>() $(, Dependency::single::<$dep>())*]
            }

            fn create(args: &mut Arguments) -> ContainerResult<Self> {
                let journal = args.single::<Journal>()?;
                $(args.single::<$dep>()?;)*
                Ok(Self { journal })
            }
        }
    };
}

journaled!(First());
journaled!(Second(First));
journaled!(Third(Second));

fn journaled_list(journal: &Arc<Journal>) -> ServiceList {
    let mut list = ServiceList::new();
    list.add_instance(journal.clone()).unwrap();
    list.add::<Third>().unwrap();
    list.add::<First>().unwrap();
    list.add::<Second>().unwrap();
    list
}

#[test]
fn test_get_internal_and_external() {
    init_test_logger();
    let journal = Arc::new(Journal::default());
    let container = Container::new(journaled_list(&journal)).unwrap();

    assert!(Arc::ptr_eq(&container.get::<Journal>().unwrap(), &journal));
    assert!(Arc::ptr_eq(
        &container.get::<Second>().unwrap().journal,
        &journal
    ));
    assert!(container.get::<Third>().is_ok());
}

#[test]
fn test_get_unknown_service() {
    init_test_logger();
    let container = Container::new(ServiceList::new()).unwrap();
    match container.get::<Untouched>() {
        Err(ContainerError::ServiceNotFound { service }) => assert!(service.is::<Untouched>()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unregistered service resolved"),
    }
}

#[test]
fn test_provider_trait() {
    init_test_logger();

    fn count_first<P: ServiceProvider>(provider: &P) -> usize {
        provider.get::<First>().map(|_| 1).unwrap_or_default()
    }

    let journal = Arc::new(Journal::default());
    let container = Container::new(journaled_list(&journal)).unwrap();
    assert_eq!(count_first(&container), 1);
    assert!(container.contains::<Third>());
    assert!(!container.contains::<Untouched>());
    assert_eq!(ServiceProvider::init_order(&container).len(), 3);
}

#[test]
fn test_dispose_in_reverse_order() {
    init_test_logger();
    let journal = Arc::new(Journal::default());
    let mut container = Container::new(journaled_list(&journal)).unwrap();
    assert_eq!(
        container.init_order(),
        &[
            TypeKey::of::<First>(),
            TypeKey::of::<Second>(),
            TypeKey::of::<Third>()
        ]
    );

    container.dispose();
    assert_eq!(journal.entries(), vec!["Third", "Second", "First"]);
    assert!(!*journal.disposed.lock().unwrap());

    container.dispose();
    assert_eq!(journal.entries().len(), 3);
    assert!(matches!(
        container.get::<First>(),
        Err(ContainerError::Disposed)
    ));
}

#[test]
fn test_drop_disposes() {
    init_test_logger();
    let journal = Arc::new(Journal::default());
    drop(Container::new(journaled_list(&journal)).unwrap());
    assert_eq!(journal.entries(), vec!["Third", "Second", "First"]);
}

#[test]
fn test_drop_without_dispose() {
    init_test_logger();
    let journal = Arc::new(Journal::default());
    let config = ContainerConfig::default().with_dispose_on_drop(false);
    drop(Container::with_config(journaled_list(&journal), config).unwrap());
    assert!(journal.entries().is_empty());
}

#[test]
fn test_failed_build_disposes_constructed_services() {
    init_test_logger();
    let journal = Arc::new(Journal::default());
    let mut list = journaled_list(&journal);
    list.add::<Untouched>().unwrap();
    list.add_with(vec![Dependency::single::<Third>()], |_| {
        Err::<Failing, _>(ContainerError::construction_failed(
            TypeKey::of::<Failing>(),
            "boom",
        ))
    })
    .unwrap();

    let err = Container::new(list).unwrap_err();
    assert!(matches!(err, ContainerError::ConstructionFailed { .. }));
    assert_eq!(journal.entries(), vec!["Third", "Second", "First"]);
    assert!(!*journal.disposed.lock().unwrap());
}

struct Failing;
impl Service for Failing {}

#[test]
fn test_container_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Container>();
}
