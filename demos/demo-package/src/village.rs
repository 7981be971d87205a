//! 村庄示例中的服务
//!
//! 两户人家各自住在自己的子列表里，人口普查跨越两户统计所有居民。

use di_abstractions::{implements, Arguments, Dependency, Injectable, Service};
use infrastructure_common::ContainerResult;
use std::sync::Arc;

/// 居民
pub trait Person: Send + Sync {
    /// 居民称呼
    fn name(&self) -> &'static str;
}

/// 孩子
pub trait Child: Person {}

/// 房屋
pub trait House: Send + Sync {
    /// 住户数量
    fn residents(&self) -> usize;
}

/// 季节
pub trait Season: Send + Sync {
    /// 季节名称
    fn name(&self) -> &'static str;
}

/// 披萨
pub struct Pizza;

impl Service for Pizza {}

impl Injectable for Pizza {
    fn create(_args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self)
    }
}

/// 意大利孩子，需要披萨
pub struct ItalianChild {
    _pizza: Arc<Pizza>,
}

impl Person for ItalianChild {
    fn name(&self) -> &'static str {
        "italian child"
    }
}
impl Child for ItalianChild {}
implements!(ItalianChild => dyn Person, dyn Child);

impl Service for ItalianChild {}

impl Injectable for ItalianChild {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::single::<Pizza>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            _pizza: args.single::<Pizza>()?,
        })
    }
}

/// 意大利家长
pub struct ItalianParent;

impl Person for ItalianParent {
    fn name(&self) -> &'static str {
        "italian parent"
    }
}
implements!(ItalianParent => dyn Person);

impl Service for ItalianParent {}

impl Injectable for ItalianParent {
    fn create(_args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self)
    }
}

/// 英国孩子
pub struct EnglishChild;

impl Person for EnglishChild {
    fn name(&self) -> &'static str {
        "english child"
    }
}
impl Child for EnglishChild {}
implements!(EnglishChild => dyn Person, dyn Child);

impl Service for EnglishChild {}

impl Injectable for EnglishChild {
    fn create(_args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self)
    }
}

/// 外国留学生，由外部创建
pub struct ForeignStudent;

impl Person for ForeignStudent {
    fn name(&self) -> &'static str {
        "foreign student"
    }
}
implements!(ForeignStudent => dyn Person);

/// 意大利家庭
pub struct ItalianFamily {
    _pizza: Arc<Pizza>,
    members: Vec<Arc<dyn Person>>,
}

impl ItalianFamily {
    /// 家庭成员数量
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl Service for ItalianFamily {}

impl Injectable for ItalianFamily {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::single::<Pizza>(), Dependency::all::<dyn Person>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            _pizza: args.single::<Pizza>()?,
            members: args.all::<dyn Person>()?,
        })
    }
}

/// 英国家庭
pub struct EnglishFamily {
    members: Vec<Arc<dyn Person>>,
}

impl EnglishFamily {
    /// 家庭成员数量
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl Service for EnglishFamily {}

impl Injectable for EnglishFamily {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::all::<dyn Person>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            members: args.all::<dyn Person>()?,
        })
    }
}

/// 意大利房屋
pub struct ItalianHouse {
    family: Arc<ItalianFamily>,
}

impl House for ItalianHouse {
    fn residents(&self) -> usize {
        self.family.size()
    }
}
implements!(ItalianHouse => dyn House);

impl Service for ItalianHouse {}

impl Injectable for ItalianHouse {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::single::<ItalianFamily>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            family: args.single::<ItalianFamily>()?,
        })
    }
}

/// 英国房屋
pub struct EnglishHouse {
    family: Arc<EnglishFamily>,
}

impl House for EnglishHouse {
    fn residents(&self) -> usize {
        self.family.size()
    }
}
implements!(EnglishHouse => dyn House);

impl Service for EnglishHouse {}

impl Injectable for EnglishHouse {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::single::<EnglishFamily>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            family: args.single::<EnglishFamily>()?,
        })
    }
}

/// 所有居民
pub struct People {
    people: Vec<Arc<dyn Person>>,
}

impl People {
    /// 居民数量
    pub fn count(&self) -> usize {
        self.people.len()
    }

    /// 居民称呼
    pub fn names(&self) -> Vec<&'static str> {
        self.people.iter().map(|person| person.name()).collect()
    }
}

impl Service for People {}

impl Injectable for People {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::all::<dyn Person>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            people: args.all::<dyn Person>()?,
        })
    }
}

/// 人口普查
pub struct Census {
    people: Arc<People>,
}

impl Census {
    /// 统计到的居民数量
    pub fn population(&self) -> usize {
        self.people.count()
    }
}

impl Service for Census {}

impl Injectable for Census {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::single::<People>()]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            people: args.single::<People>()?,
        })
    }
}

/// 冬季
pub struct Winter;

impl Season for Winter {
    fn name(&self) -> &'static str {
        "Winter"
    }
}
implements!(Winter => dyn Season);

impl Service for Winter {}

impl Injectable for Winter {
    fn create(_args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self)
    }
}

/// 村庄
pub struct Village {
    census: Arc<Census>,
    houses: Vec<Arc<dyn House>>,
    season: Arc<dyn Season>,
}

impl Village {
    /// 房屋数量
    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    /// 所有房屋的住户总数
    pub fn residents(&self) -> usize {
        self.houses.iter().map(|house| house.residents()).sum()
    }

    /// 当前季节
    pub fn season(&self) -> &'static str {
        self.season.name()
    }

    /// 人口普查结果
    pub fn population(&self) -> usize {
        self.census.population()
    }
}

impl Service for Village {}

impl Injectable for Village {
    fn dependencies() -> Vec<Dependency> {
        vec![
            Dependency::single::<Census>(),
            Dependency::all::<dyn House>(),
            Dependency::single::<dyn Season>(),
        ]
    }

    fn create(args: &mut Arguments) -> ContainerResult<Self> {
        Ok(Self {
            census: args.single::<Census>()?,
            houses: args.all::<dyn House>()?,
            season: args.single::<dyn Season>()?,
        })
    }
}
