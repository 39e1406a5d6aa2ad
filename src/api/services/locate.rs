use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use tracing::trace;

use super::types::ApiResponse;
use crate::api::middleware::RequestId;
use crate::config::ProxyConfig;
use crate::errors::GeoLocateError;
use crate::services::Resolver;
use crate::utils::extract_client_ip;

/// 定位接口路径
pub const LOCATE_PATH: &str = "/test";

pub struct LocateService;

impl LocateService {
    /// 解析请求方 IP 的地理位置
    ///
    /// 成功返回 200 + 结果；地址非法 400，库中无记录 404，数据库未加载 503
    pub async fn locate(
        req: HttpRequest,
        resolver: web::Data<Resolver>,
        proxy: web::Data<ProxyConfig>,
    ) -> Result<HttpResponse, GeoLocateError> {
        let client_ip = extract_client_ip(&req, &proxy.trusted_proxies).ok_or_else(|| {
            GeoLocateError::invalid_address("unable to determine client address")
        })?;
        if let Some(id) = req.extensions().get::<RequestId>() {
            trace!("Locate request {} from {}", id.as_str(), client_ip);
        }

        let resolution = resolver.resolve(&client_ip).await?;

        Ok(HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse::ok(resolution)))
    }
}

/// 定位路由配置
pub fn locate_routes() -> actix_web::Scope {
    web::scope("")
        .route(LOCATE_PATH, web::get().to(LocateService::locate))
        .route(LOCATE_PATH, web::head().to(LocateService::locate))
}
