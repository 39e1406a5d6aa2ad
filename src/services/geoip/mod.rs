//! GeoIP 服务模块
//!
//! 启动时依次执行：
//! - 下载压缩的 mmdb 数据库（fetcher）
//! - 解压（extractor）
//! - 打开数据库并注册为请求处理依赖（maxmind + resolver）

mod extractor;
mod fetcher;
mod maxmind;
mod provider;
mod record;
mod resolver;

pub use extractor::extract_gzip;
pub use fetcher::fetch_database;
pub use maxmind::MaxMindDatabase;
pub use provider::{DatabaseInfo, GeoIpLookup};
pub use record::{FALLBACK_LOCALE, LocationRecord, Resolution};
pub use resolver::{Resolver, parse_address};
