//! One-shot command modes: fetch, lookup, config generation

use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::AppConfig;
use crate::services::geoip::{MaxMindDatabase, Resolver, extract_gzip, fetch_database};

/// 下载并解压数据库，任一步失败即返回错误
pub async fn run_fetch(config: &AppConfig) -> Result<()> {
    let geoip = config.geoip.clone();
    let url = geoip
        .download_url()
        .map(String::from)
        .context("no download_url configured")?;

    let archive_path = geoip.archive_path();
    let database_path = geoip.database_path();
    let timeout = Duration::from_secs(geoip.download_timeout_secs);

    let (downloaded, extracted) = tokio::task::spawn_blocking(move || {
        let downloaded = fetch_database(&url, &archive_path, timeout)?;
        let extracted = extract_gzip(&archive_path, &database_path)?;
        Ok::<_, crate::errors::GeoLocateError>((downloaded, extracted))
    })
    .await
    .context("fetch task panicked")?
    .map_err(|e| {
        eprintln!("{}", e.format_colored());
        anyhow::anyhow!("{}", e)
    })?;

    println!(
        "{} downloaded {} bytes, extracted {} bytes to {}",
        "✓".green().bold(),
        downloaded,
        extracted,
        geoip.database_path().display()
    );
    Ok(())
}

/// 打开本地数据库并查询单个地址，以 JSON 输出结果
pub async fn run_lookup(config: &AppConfig, ip: &str) -> Result<()> {
    let path = config.geoip.database_path();
    let locale = config.geoip.locale.clone();

    let db = tokio::task::spawn_blocking(move || MaxMindDatabase::open(&path, &locale))
        .await
        .context("open task panicked")?;
    let db = db.map_err(|e| {
        eprintln!("{}", e.format_colored());
        anyhow::anyhow!("{}", e)
    })?;

    let resolver = Resolver::new(std::sync::Arc::new(db));
    let resolution = resolver.resolve(ip).await.map_err(|e| {
        eprintln!("{}", e.format_colored());
        anyhow::anyhow!("{}", e)
    })?;

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}

/// 输出示例配置
pub fn run_config_generate(output_path: Option<&str>) -> Result<()> {
    let sample = AppConfig::generate_sample_config();
    match output_path {
        Some(path) => {
            std::fs::write(path, &sample)
                .with_context(|| format!("failed to write sample config to {}", path))?;
            println!("{} sample configuration written to {}", "✓".green().bold(), path);
        }
        None => print!("{}", sample),
    }
    Ok(())
}
