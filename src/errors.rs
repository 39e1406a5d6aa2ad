use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::api::services::{ApiResponse, ErrorCode};

#[derive(Debug, Clone)]
pub enum GeoLocateError {
    Fetch(String),
    Extract(String),
    Open(String),
    InvalidAddress(String),
    NotFound(String),
    Lookup(String),
    DatabaseUnavailable(String),
    FileOperation(String),
    Config(String),
}

impl GeoLocateError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoLocateError::Fetch(_) => "E001",
            GeoLocateError::Extract(_) => "E002",
            GeoLocateError::Open(_) => "E003",
            GeoLocateError::InvalidAddress(_) => "E004",
            GeoLocateError::NotFound(_) => "E005",
            GeoLocateError::Lookup(_) => "E006",
            GeoLocateError::DatabaseUnavailable(_) => "E007",
            GeoLocateError::FileOperation(_) => "E008",
            GeoLocateError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoLocateError::Fetch(_) => "Database Download Error",
            GeoLocateError::Extract(_) => "Database Extraction Error",
            GeoLocateError::Open(_) => "Database Open Error",
            GeoLocateError::InvalidAddress(_) => "Invalid Address",
            GeoLocateError::NotFound(_) => "Address Not Found",
            GeoLocateError::Lookup(_) => "Lookup Error",
            GeoLocateError::DatabaseUnavailable(_) => "Database Unavailable",
            GeoLocateError::FileOperation(_) => "File Operation Error",
            GeoLocateError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoLocateError::Fetch(msg) => msg,
            GeoLocateError::Extract(msg) => msg,
            GeoLocateError::Open(msg) => msg,
            GeoLocateError::InvalidAddress(msg) => msg,
            GeoLocateError::NotFound(msg) => msg,
            GeoLocateError::Lookup(msg) => msg,
            GeoLocateError::DatabaseUnavailable(msg) => msg,
            GeoLocateError::FileOperation(msg) => msg,
            GeoLocateError::Config(msg) => msg,
        }
    }

    /// 对应的 API 错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            GeoLocateError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            GeoLocateError::NotFound(_) => ErrorCode::AddressNotFound,
            GeoLocateError::DatabaseUnavailable(_) => ErrorCode::DatabaseUnavailable,
            GeoLocateError::Lookup(_) => ErrorCode::LookupFailed,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoLocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoLocateError {}

// 便捷的构造函数
impl GeoLocateError {
    pub fn fetch<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::Fetch(msg.into())
    }

    pub fn extract<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::Extract(msg.into())
    }

    pub fn open<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::Open(msg.into())
    }

    pub fn invalid_address<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::InvalidAddress(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::NotFound(msg.into())
    }

    pub fn lookup<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::Lookup(msg.into())
    }

    pub fn database_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::DatabaseUnavailable(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoLocateError::Config(msg.into())
    }
}

impl ResponseError for GeoLocateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GeoLocateError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            GeoLocateError::NotFound(_) => StatusCode::NOT_FOUND,
            GeoLocateError::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()> {
            code: self.api_code() as i32,
            message: self.message().to_string(),
            data: None,
        })
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for GeoLocateError {
    fn from(err: std::io::Error) -> Self {
        GeoLocateError::FileOperation(err.to_string())
    }
}

impl From<maxminddb::MaxMindDbError> for GeoLocateError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        GeoLocateError::Lookup(err.to_string())
    }
}

impl From<ureq::Error> for GeoLocateError {
    fn from(err: ureq::Error) -> Self {
        GeoLocateError::Fetch(err.to_string())
    }
}

impl From<config::ConfigError> for GeoLocateError {
    fn from(err: config::ConfigError) -> Self {
        GeoLocateError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoLocateError>;
