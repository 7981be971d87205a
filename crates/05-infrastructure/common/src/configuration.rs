//! 容器配置
//!
//! 使用 `config` crate 从配置文件和环境变量加载容器选项

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "config/container";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DI";

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度，`None` 表示不限制
    pub max_resolution_depth: Option<usize>,
    /// 容器被丢弃时是否自动释放服务
    pub dispose_on_drop: bool,
    /// 是否逐个记录服务的构造过程
    pub trace_construction: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: None,
            dispose_on_drop: true,
            trace_construction: false,
        }
    }
}

impl ContainerConfig {
    /// 从默认配置文件和 `DI_*` 环境变量加载配置
    pub fn load() -> ConfigResult<Self> {
        Self::from_sources(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// 从指定文件加载配置，环境变量仍然优先
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileReadError {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("配置文件不存在: {}", path.display()),
                ),
            });
        }
        Self::from_sources(config::File::from(path))
    }

    /// 从 TOML 文本加载配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;
        Self::bind(settings)
    }

    fn from_sources<S>(file: S) -> ConfigResult<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::from(e)
            })?;
        Self::bind(settings)
    }

    fn bind(settings: config::Config) -> ConfigResult<Self> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        debug!("容器配置加载完成: {:?}", config);
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 设置最大解析深度
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = Some(depth);
        self
    }

    /// 设置丢弃时是否自动释放
    pub fn with_dispose_on_drop(mut self, enabled: bool) -> Self {
        self.dispose_on_drop = enabled;
        self
    }

    /// 设置是否记录构造过程
    pub fn with_trace_construction(mut self, enabled: bool) -> Self {
        self.trace_construction = enabled;
        self
    }
}
