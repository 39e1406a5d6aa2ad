use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 应用配置（从 TOML + 环境变量加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量
/// - geoip: 数据库下载地址、本地目录、语言
/// - cors: 跨域设置
/// - proxy: 可信代理
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// GeoIP 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// gzip 压缩的 mmdb 下载地址，留空则不下载，直接使用本地文件
    #[serde(default = "default_download_url")]
    pub download_url: Option<String>,
    /// 压缩包与解压后数据库的存放目录
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// 数据库文件名（不含扩展名）
    #[serde(default = "default_database_name")]
    pub database_name: String,
    /// 国家/城市名称使用的语言
    #[serde(default = "default_locale")]
    pub locale: String,
    /// 启动时即使本地已有数据库也重新下载
    #[serde(default = "default_refresh_on_startup")]
    pub refresh_on_startup: bool,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl GeoIpConfig {
    /// 下载的压缩包路径：`<data_dir>/<database_name>.mmdb.gz`
    pub fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(format!("{}.mmdb.gz", self.database_name))
    }

    /// 解压后的数据库路径：`<data_dir>/<database_name>.mmdb`
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(format!("{}.mmdb", self.database_name))
    }

    /// 是否配置了下载地址（空字符串视为未配置）
    pub fn download_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

impl CorsConfig {
    pub fn is_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// 代理配置
///
/// `trusted_proxies` 为空时自动检测：来自私有地址的连接视为反向代理
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProxyConfig {
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    31001
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_download_url() -> Option<String> {
    Some(
        "http://geolite.maxmind.com/download/geoip/database/GeoLite2-City.mmdb.gz".to_string(),
    )
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_database_name() -> String {
    "GeoLite2-City".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_refresh_on_startup() -> bool {
    true
}

fn default_download_timeout_secs() -> u64 {
    300
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> usize {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            download_url: default_download_url(),
            data_dir: default_data_dir(),
            database_name: default_database_name(),
            locale: default_locale(),
            refresh_on_startup: default_refresh_on_startup(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
