//! 地理位置记录
//!
//! `CityRecord` 是 mmdb 数据段的解码结构（GeoLite2-City 布局的子集），
//! `LocationRecord` 是对外返回的结果。

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 回退语言
pub const FALLBACK_LOCALE: &str = "en";

/// 带多语言名称的实体（国家、城市）
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NamedEntity {
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

impl NamedEntity {
    /// 按语言取名称，缺失时回退到英文
    pub(crate) fn name(&self, locale: &str) -> Option<String> {
        self.names
            .get(locale)
            .or_else(|| self.names.get(FALLBACK_LOCALE))
            .cloned()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LocationFields {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub accuracy_radius: Option<u16>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// mmdb 中单条 City 记录
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CityRecord {
    #[serde(default)]
    pub country: Option<NamedEntity>,
    #[serde(default)]
    pub city: Option<NamedEntity>,
    #[serde(default)]
    pub location: Option<LocationFields>,
}

/// 一次查询的地理位置结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// 国家名称（按配置语言）
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "CN", "US")
    pub country_iso_code: Option<String>,
    /// 城市名称
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_radius: Option<u16>,
    pub time_zone: Option<String>,
}

impl LocationRecord {
    pub(crate) fn from_city_record(record: CityRecord, locale: &str) -> Self {
        let (country, country_iso_code) = match record.country {
            Some(ref c) => (c.name(locale), c.iso_code.clone()),
            None => (None, None),
        };
        let city = record.city.as_ref().and_then(|c| c.name(locale));
        let location = record.location.unwrap_or_default();

        Self {
            country,
            country_iso_code,
            city,
            latitude: location.latitude,
            longitude: location.longitude,
            accuracy_radius: location.accuracy_radius,
            time_zone: location.time_zone,
        }
    }
}

/// 带客户端地址和查询耗时的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub ip: IpAddr,
    #[serde(flatten)]
    pub location: LocationRecord,
    /// 查询耗时（微秒），不含地址解析
    #[serde(rename = "latency_us", serialize_with = "serialize_micros")]
    pub latency: Duration,
}

fn serialize_micros<S>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(latency.as_micros() as u64)
}
