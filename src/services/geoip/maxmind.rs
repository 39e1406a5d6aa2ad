//! MaxMind 数据库实现
//!
//! 使用本地 GeoLite2-City.mmdb 文件进行 IP 地理位置查询

use std::net::IpAddr;
use std::path::Path;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::{info, trace};

use super::provider::{DatabaseInfo, GeoIpLookup};
use super::record::{CityRecord, LocationRecord};
use crate::errors::{GeoLocateError, Result};

/// 已打开的 mmdb 数据库句柄
///
/// 打开后只读，`Reader` 是 `Send + Sync`，由 `Arc` 在 worker 间共享
#[derive(Debug)]
pub struct MaxMindDatabase {
    reader: Reader<Vec<u8>>,
    locale: String,
}

impl MaxMindDatabase {
    /// 打开数据库文件
    ///
    /// 文件不存在或格式不正确时返回 `GeoLocateError::Open`
    pub fn open<P: AsRef<Path>>(path: P, locale: &str) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|e| {
            GeoLocateError::open(format!(
                "failed to open database {}: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            "Opened {} database at {} (build {}, {} nodes)",
            reader.metadata.database_type,
            path.display(),
            reader.metadata.build_epoch,
            reader.metadata.node_count
        );

        Ok(Self {
            reader,
            locale: locale.to_string(),
        })
    }

    fn lookup_sync(&self, ip: IpAddr) -> Result<LocationRecord> {
        // IPv4-only 库中不存在任何 IPv6 地址
        if ip.is_ipv6() && self.reader.metadata.ip_version == 4 {
            return Err(GeoLocateError::not_found(format!(
                "address {} not found in IPv4-only database",
                ip
            )));
        }

        let result = self.reader.lookup(ip)?;
        let record: Option<CityRecord> = result.decode()?;
        let Some(record) = record else {
            return Err(GeoLocateError::not_found(format!(
                "address {} not found in database",
                ip
            )));
        };

        let location = LocationRecord::from_city_record(record, &self.locale);
        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip, location.country, location.city
        );
        Ok(location)
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindDatabase {
    async fn lookup(&self, ip: IpAddr) -> Result<LocationRecord> {
        self.lookup_sync(ip)
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }

    fn info(&self) -> Option<DatabaseInfo> {
        let metadata = &self.reader.metadata;
        Some(DatabaseInfo {
            database_type: metadata.database_type.clone(),
            build_epoch: metadata.build_epoch,
            node_count: metadata.node_count,
            ip_version: metadata.ip_version,
        })
    }
}

impl Drop for MaxMindDatabase {
    fn drop(&mut self) {
        info!("Closed {} database", self.reader.metadata.database_type);
    }
}
