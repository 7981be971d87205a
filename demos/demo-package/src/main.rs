//! # 村庄示例
//!
//! 演示作用域依赖注入容器的用法：
//! - 服务声明实现的抽象类型
//! - 数组参数收集作用域内的所有实现
//! - 外部服务与嵌套子列表
//! - 按抽象类型获取所有服务

mod village;

use anyhow::{ensure, Context};
use clap::Parser;
use di_impl::{Container, ServiceList};
use infrastructure_common::ContainerConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use village::{
    Child, Census, EnglishChild, EnglishFamily, EnglishHouse, ForeignStudent, House,
    ItalianChild, ItalianFamily, ItalianHouse, ItalianParent, People, Person, Pizza, Season,
    Village, Winter,
};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "di-demo")]
#[command(about = "作用域依赖注入容器示例")]
struct Args {
    /// 容器配置文件路径，未指定时读取 config/container 和 DI_* 环境变量
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&args.log_level)
        }))
        .init();

    info!("🚀 村庄示例启动");

    let config = match &args.config {
        Some(path) => ContainerConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => ContainerConfig::load().context("无法加载容器配置")?,
    };

    let mut container = Container::with_config(build_village()?, config)?;
    info!(
        "初始化顺序: {}",
        infrastructure_common::join_type_names(container.init_order())
    );

    report(&container)?;

    container.dispose();
    info!("✓ 容器已释放");
    Ok(())
}

/// 组装服务列表
fn build_village() -> anyhow::Result<ServiceList> {
    let mut italian = ServiceList::new();
    italian.add::<Pizza>()?;
    italian.add::<ItalianParent>()?.is::<dyn Person>()?;
    italian.add::<ItalianHouse>()?.is::<dyn House>()?;
    italian
        .add::<ItalianChild>()?
        .is::<dyn Child>()?
        .is::<dyn Person>()?;
    italian.add::<ItalianFamily>()?;

    // 外部创建的服务
    let foreign_student = Arc::new(ForeignStudent);

    let mut english = ServiceList::new();
    english.add::<EnglishHouse>()?.is::<dyn House>()?;
    english.add::<EnglishFamily>()?;
    english.add::<EnglishChild>()?.is::<dyn Person>()?;
    english
        .add_instance(foreign_student.clone())?
        .is::<dyn Person>()?;

    // 同一个服务可以出现在多个子列表中
    let mut people = ServiceList::new();
    people.add::<ItalianChild>()?.is::<dyn Person>()?;
    people.add::<ItalianParent>()?.is::<dyn Person>()?;
    people.add::<EnglishChild>()?.is::<dyn Person>()?;
    people.add::<Census>()?;
    people.add::<People>()?;
    people.add_instance(foreign_student)?;

    // 每个子列表只有根服务对外可见
    let mut village = ServiceList::new();
    village.add_list::<ItalianHouse>(&italian)?;
    village.add_list::<EnglishHouse>(&english)?;
    village.add_list::<Census>(&people)?;
    village.add::<Village>()?;
    village.add::<Winter>()?.is::<dyn Season>()?;

    Ok(village)
}

/// 输出并检查村庄的统计结果
fn report(container: &Container) -> anyhow::Result<()> {
    let village = container.get::<Village>()?;
    let italian_family = container.get::<ItalianFamily>()?;
    let english_family = container.get::<EnglishFamily>()?;
    let people = container.get::<People>()?;
    let houses = container.get_all::<dyn House>()?;
    let seasons = container.get_all::<dyn Season>()?;

    info!("🏠 房屋: {}", village.house_count());
    info!("❄️ 季节: {}", village.season());
    info!("👪 意大利家庭成员: {}", italian_family.size());
    info!("👪 英国家庭成员: {}", english_family.size());
    info!("📋 人口普查: {} ({})", village.population(), people.names().join(", "));
    info!("🛏️ 房屋住户: {}", village.residents());

    ensure!(houses.len() == 2, "房屋数量应为 2, 实际为 {}", houses.len());
    ensure!(seasons.len() == 1, "季节数量应为 1, 实际为 {}", seasons.len());
    ensure!(village.house_count() == 2, "村庄应有 2 座房屋");
    ensure!(village.season() == "Winter", "当前季节应为冬季");
    ensure!(italian_family.size() == 2, "意大利家庭应有 2 名成员");
    ensure!(english_family.size() == 2, "英国家庭应有 2 名成员");
    ensure!(people.count() == 4, "人口普查应统计到 4 名居民");
    Ok(())
}
