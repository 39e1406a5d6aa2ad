use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::trace;

use super::types::{ApiResponse, ErrorCode};
use crate::services::Resolver;
use crate::services::geoip::DatabaseInfo;

/// 健康检查前缀
pub const HEALTH_PREFIX: &str = "/health";

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Debug)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub uptime: u64,
    pub provider: Option<&'static str>,
    pub database: Option<DatabaseInfo>,
}

pub struct HealthService;

impl HealthService {
    /// 就绪检查：数据库已加载返回 200，否则 503
    pub async fn readiness_check(
        resolver: web::Data<Resolver>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received readiness check request");

        let uptime = (chrono::Utc::now() - app_start_time.start_datetime)
            .num_seconds()
            .max(0) as u64;
        let ready = resolver.is_available();

        let body = ApiResponse {
            code: if ready {
                ErrorCode::Success as i32
            } else {
                ErrorCode::ServiceUnavailable as i32
            },
            message: if ready {
                "OK".to_string()
            } else {
                "Service Unavailable".to_string()
            },
            data: Some(ReadinessResponse {
                status: if ready { "ready" } else { "unavailable" },
                uptime,
                provider: resolver.provider_name(),
                database: resolver.database_info(),
            }),
        };

        if ready {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }

    // 活跃性检查，进程在运行即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope(HEALTH_PREFIX)
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
