//! 长依赖链的构建

#![recursion_limit = "512"]

mod common;

use common::init_test_logger;
use di_abstractions::{Dependency, Service};
use di_impl::{Container, ServiceList};
use infrastructure_common::{ContainerConfig, ContainerError, ContainerResult, TypeKey};
use std::marker::PhantomData;

/// 链的末端
struct End;

impl Service for End {}

/// 链中的一环，依赖下一环 `T`
struct Link<T>(PhantomData<fn() -> T>);

impl<T: Chain> Service for Link<T> {}

/// 可以逐环注册的依赖链
trait Chain: Service + Sized {
    /// 链上的服务数量
    const LEN: usize;

    fn register(list: &mut ServiceList) -> ContainerResult<()>;
}

impl Chain for End {
    const LEN: usize = 1;

    fn register(list: &mut ServiceList) -> ContainerResult<()> {
        list.add_with(Vec::new(), |_| Ok(End))?;
        Ok(())
    }
}

impl<T: Chain> Chain for Link<T> {
    const LEN: usize = T::LEN + 1;

    fn register(list: &mut ServiceList) -> ContainerResult<()> {
        T::register(list)?;
        list.add_with(vec![Dependency::single::<T>()], |args| {
            args.single::<T>()?;
            Ok(Link::<T>(PhantomData))
        })?;
        Ok(())
    }
}

type L2<T> = Link<Link<T>>;
type L4<T> = L2<L2<T>>;
type L8<T> = L4<L4<T>>;
type L16<T> = L8<L8<T>>;
type L32<T> = L16<L16<T>>;
type L64<T> = L32<L32<T>>;
type L128<T> = L64<L64<T>>;

/// 129 个服务组成的单链
type LongChain = L128<End>;

fn long_chain_list() -> ServiceList {
    let mut list = ServiceList::new();
    LongChain::register(&mut list).unwrap();
    list
}

#[test]
fn test_long_chain_builds_with_default_config() {
    init_test_logger();
    assert!(LongChain::LEN > 100);
    assert_eq!(ContainerConfig::default().max_resolution_depth, None);

    let container = Container::new(long_chain_list()).unwrap();
    assert_eq!(container.len(), LongChain::LEN);
    assert_eq!(container.init_order().len(), LongChain::LEN);
    assert_eq!(container.init_order()[0], TypeKey::of::<End>());
    assert_eq!(
        container.init_order()[LongChain::LEN - 1],
        TypeKey::of::<LongChain>()
    );
    assert!(container.get::<LongChain>().is_ok());
}

#[test]
fn test_explicit_depth_limit_rejects_long_chain() {
    init_test_logger();
    let config = ContainerConfig::default().with_max_resolution_depth(100);

    let err = Container::with_config(long_chain_list(), config).err().unwrap();
    assert!(matches!(
        err,
        ContainerError::ResolutionDepthExceeded { max_depth: 100, .. }
    ));
}

#[test]
fn test_explicit_depth_limit_admits_shorter_chain() {
    init_test_logger();
    let mut list = ServiceList::new();
    L64::<End>::register(&mut list).unwrap();
    let config = ContainerConfig::default().with_max_resolution_depth(100);

    let container = Container::with_config(list, config).unwrap();
    assert_eq!(container.len(), 65);
}
