//! # 依赖注入具体实现
//!
//! 提供服务列表、实现索引、参数解析和依赖注入容器的具体实现。
//!
//! ```ignore
//! let mut list = ServiceList::new();
//! list.add::<Pizza>()?;
//! list.add::<ItalianChild>()?.is::<dyn Person>()?;
//! list.add::<Family>()?;
//!
//! let container = Container::new(list)?;
//! let family = container.get::<Family>()?;
//! ```

pub mod constructor;
pub mod container;
pub mod implement_index;
pub mod service_list;

pub use constructor::{Constructor, ParamDesc};
pub use container::Container;
pub use implement_index::ImplementIndex;
pub use service_list::{Registry, RootId, ServiceDesc, ServiceHandle, ServiceList};
