pub mod health;
pub mod locate;
pub mod types;

pub use health::{AppStartTime, HealthService, health_routes};
pub use locate::{LOCATE_PATH, LocateService, locate_routes};
pub use types::{ApiResponse, ErrorCode};
