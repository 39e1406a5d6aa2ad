//! IP → 地理位置解析
//!
//! 持有启动时打开的数据库句柄（只读共享），每个请求独立解析。
//! 句柄可能在启动时打开失败，此时所有查询返回 `DatabaseUnavailable`。

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::provider::{DatabaseInfo, GeoIpLookup};
use super::record::Resolution;
use crate::errors::{GeoLocateError, Result};

#[derive(Clone)]
pub struct Resolver {
    inner: Option<Arc<dyn GeoIpLookup>>,
}

impl Resolver {
    pub fn new(provider: Arc<dyn GeoIpLookup>) -> Self {
        info!("GeoIP: Initialized with {} provider", provider.name());
        Self {
            inner: Some(provider),
        }
    }

    /// 没有可用数据库的 resolver
    pub fn unavailable() -> Self {
        warn!("GeoIP: No database loaded, lookups will fail until restart");
        Self { inner: None }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.inner.as_ref().map(|p| p.name())
    }

    pub fn database_info(&self) -> Option<DatabaseInfo> {
        self.inner.as_ref().and_then(|p| p.info())
    }

    /// 解析客户端地址字符串
    ///
    /// 耗时只统计数据库查询部分，不含地址解析
    pub async fn resolve(&self, address: &str) -> Result<Resolution> {
        let ip = match parse_address(address) {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Error while parsing client address: {}", e);
                return Err(e);
            }
        };
        self.resolve_ip(ip).await
    }

    pub async fn resolve_ip(&self, ip: IpAddr) -> Result<Resolution> {
        let Some(provider) = self.inner.as_ref() else {
            let err = GeoLocateError::database_unavailable("geolocation database is not loaded");
            warn!("Error while getting location info for {}: {}", ip, err);
            return Err(err);
        };

        let ip = ip.to_canonical();
        let start = Instant::now();
        let result = provider.lookup(ip).await;
        let latency = start.elapsed();

        match result {
            Ok(location) => {
                info!(
                    country = location.country.as_deref().unwrap_or(""),
                    latency_us = latency.as_micros() as u64,
                    "Resolved {} in {:?}",
                    ip,
                    latency
                );
                Ok(Resolution {
                    ip,
                    location,
                    latency,
                })
            }
            Err(e) => {
                warn!(
                    latency_us = latency.as_micros() as u64,
                    "Error while getting location info for {}: {}", ip, e
                );
                Err(e)
            }
        }
    }
}

/// 解析地址字符串，支持 `ip`、`ip:port`、`[v6]:port`
pub fn parse_address(address: &str) -> Result<IpAddr> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(GeoLocateError::invalid_address("empty client address"));
    }
    if let Ok(ip) = trimmed.parse::<IpAddr>() {
        return Ok(ip);
    }
    if let Ok(socket) = trimmed.parse::<std::net::SocketAddr>() {
        return Ok(socket.ip());
    }
    Err(GeoLocateError::invalid_address(format!(
        "'{}' is not a valid IP address",
        trimmed
    )))
}
