use std::path::Path;

use config::{Config, Environment, File, FileFormat};

use super::AppConfig;
use crate::errors::{GeoLocateError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`，例如 `GEO__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "GEO";

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    ///
    /// 未指定 `path` 时读取 `config.toml`（不存在则忽略）；
    /// 显式指定的文件必须存在。
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        if required && !Path::new(path).exists() {
            return Err(GeoLocateError::config(format!(
                "config file not found: {}",
                path
            )));
        }

        let settings = Config::builder()
            .add_source(
                File::new(path, FileFormat::Toml).required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<AppConfig>()?;
        Ok(config)
    }

    /// 从 TOML 字符串解析（不读取环境变量）
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize::<AppConfig>()?)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}
