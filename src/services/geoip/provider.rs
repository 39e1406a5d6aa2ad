//! GeoIP 查询抽象层
//!
//! `Resolver` 只依赖 `GeoIpLookup`，具体实现为本地 MaxMind 数据库。

use std::net::IpAddr;

use async_trait::async_trait;

use super::record::LocationRecord;
use crate::errors::Result;

/// 数据库元信息（用于日志和就绪检查）
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DatabaseInfo {
    pub database_type: String,
    pub build_epoch: u64,
    pub node_count: u32,
    pub ip_version: u16,
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 查询 IP 地址的地理位置
    ///
    /// 地址不在数据库中时返回 `GeoLocateError::NotFound`
    async fn lookup(&self, ip: IpAddr) -> Result<LocationRecord>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;

    fn info(&self) -> Option<DatabaseInfo> {
        None
    }
}
