use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::GeoIpConfig;
use crate::services::geoip::{MaxMindDatabase, Resolver, extract_gzip, fetch_database};

pub struct StartupContext {
    pub resolver: Resolver,
}

/// 各阶段的执行结果（用于日志和测试）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub downloaded: Option<u64>,
    pub extracted: Option<u64>,
    pub opened: bool,
}

/// 在阻塞线程池中执行同步任务
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .context("blocking startup task panicked")
}

/// 下载阶段：配置了下载地址，且需要刷新或本地没有数据库时执行
///
/// 失败只记录日志，不中断启动
pub async fn fetch_stage(config: &GeoIpConfig) -> Result<Option<u64>> {
    let Some(url) = config.download_url() else {
        debug!("No download URL configured, skipping database download");
        return Ok(None);
    };

    let database_path = config.database_path();
    if !config.refresh_on_startup && database_path.exists() {
        info!(
            "Database already present at {}, skipping download",
            database_path.display()
        );
        return Ok(None);
    }

    let url = url.to_string();
    let archive_path = config.archive_path();
    let timeout = Duration::from_secs(config.download_timeout_secs);

    info!("Download started for database file");
    match run_blocking(move || fetch_database(&url, &archive_path, timeout)).await? {
        Ok(bytes) => {
            info!("Download completed for database file ({} bytes)", bytes);
            Ok(Some(bytes))
        }
        Err(e) => {
            warn!("Error while downloading database file: {}", e);
            Ok(None)
        }
    }
}

/// 解压阶段：刚下载成功，或本地还没有解压后的数据库时执行
pub async fn extract_stage(config: &GeoIpConfig, downloaded: bool) -> Result<Option<u64>> {
    let archive_path = config.archive_path();
    let database_path = config.database_path();

    if !archive_path.exists() {
        debug!("No archive at {}, skipping extraction", archive_path.display());
        return Ok(None);
    }
    if !downloaded && database_path.exists() {
        debug!("Archive unchanged and database present, skipping extraction");
        return Ok(None);
    }

    match run_blocking(move || extract_gzip(&archive_path, &database_path)).await? {
        Ok(bytes) => {
            info!("Extracted database file ({} bytes)", bytes);
            Ok(Some(bytes))
        }
        Err(e) => {
            warn!("Error while extracting database file: {}", e);
            Ok(None)
        }
    }
}

/// 打开阶段：失败时返回不可用的 resolver，服务仍然启动
pub async fn open_stage(database_path: &Path, locale: &str) -> Result<Resolver> {
    let path = database_path.to_path_buf();
    let locale = locale.to_string();

    match run_blocking(move || MaxMindDatabase::open(&path, &locale)).await? {
        Ok(db) => Ok(Resolver::new(Arc::new(db))),
        Err(e) => {
            error!("Unable to create database instance: {}", e);
            Ok(Resolver::unavailable())
        }
    }
}

/// 准备服务启动所需的上下文：下载 → 解压 → 打开
///
/// 三个阶段严格顺序执行，任一阶段失败都不会中断启动
pub async fn prepare_database(config: &GeoIpConfig) -> Result<(StartupContext, PipelineReport)> {
    let start_time = Instant::now();
    debug!("Starting pre-startup processing...");

    let downloaded = fetch_stage(config).await?;
    let extracted = extract_stage(config, downloaded.is_some()).await?;
    let resolver = open_stage(&config.database_path(), &config.locale).await?;

    let report = PipelineReport {
        downloaded,
        extracted,
        opened: resolver.is_available(),
    };

    info!(
        "Pre-startup processing completed in {}ms (downloaded: {}, extracted: {}, database: {})",
        start_time.elapsed().as_millis(),
        report.downloaded.is_some(),
        report.extracted.is_some(),
        if report.opened { "ready" } else { "unavailable" }
    );

    Ok((StartupContext { resolver }, report))
}
