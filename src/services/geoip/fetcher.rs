//! 数据库下载
//!
//! 使用 ureq 将远程文件原样写入本地路径。先写入 `.partial` 临时文件，
//! 完成后再重命名，失败时不会破坏已有文件。

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};
use ureq::Agent;

use crate::errors::{GeoLocateError, Result};

/// 临时文件后缀
pub(crate) const PARTIAL_SUFFIX: &str = "partial";

pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// 下载 `url` 到 `destination`，返回写入的字节数
///
/// 同步执行，调用方应在 `spawn_blocking` 中使用
pub fn fetch_database(url: &str, destination: &Path, timeout: Duration) -> Result<u64> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            warn!("Error while creating directory {}: {}", parent.display(), e);
            GeoLocateError::file_operation(format!(
                "failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    info!("Downloading database from {}", url);
    let agent = build_agent(timeout);
    let resp = agent.get(url).call().map_err(|e| {
        warn!("Error while downloading file from url {}: {}", url, e);
        GeoLocateError::fetch(format!("request to {} failed: {}", url, e))
    })?;

    let tmp_path = partial_path(destination);
    let written = match write_body(resp.into_body().into_reader(), &tmp_path) {
        Ok(n) => n,
        Err(e) => {
            warn!(
                "Error while copying response to {}: {}",
                tmp_path.display(),
                e
            );
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    fs::rename(&tmp_path, destination).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        GeoLocateError::file_operation(format!(
            "failed to move {} to {}: {}",
            tmp_path.display(),
            destination.display(),
            e
        ))
    })?;

    debug!("Wrote {} bytes to {}", written, destination.display());
    Ok(written)
}

fn write_body<R: io::Read>(mut body: R, path: &Path) -> Result<u64> {
    let file = File::create(path).map_err(|e| {
        GeoLocateError::file_operation(format!("failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    let written = io::copy(&mut body, &mut writer)
        .map_err(|e| GeoLocateError::fetch(format!("failed to read response body: {}", e)))?;
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    /// 本地单次 HTTP 服务：读完请求头后返回固定响应
    fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!(
            "http://{}/GeoLite2-City.mmdb.gz",
            listener.local_addr().unwrap()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            // 客户端可能在读完响应头后就断开
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
        });

        (url, handle)
    }

    #[test]
    fn test_successful_download_replaces_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("GeoLite2-City.mmdb.gz");
        fs::write(&dest, b"previous archive").unwrap();

        let (url, server) = serve_once("200 OK", b"fresh archive bytes");
        let written = fetch_database(&url, &dest, Duration::from_secs(5)).unwrap();
        server.join().unwrap();

        assert_eq!(written, 19);
        assert_eq!(fs::read(&dest).unwrap(), b"fresh archive bytes");
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn test_error_status_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("GeoLite2-City.mmdb.gz");
        fs::write(&dest, b"previous archive").unwrap();

        let (url, server) = serve_once("404 Not Found", b"no such file");
        let result = fetch_database(&url, &dest, Duration::from_secs(5));
        server.join().unwrap();

        assert!(matches!(result, Err(GeoLocateError::Fetch(_))), "got {:?}", result);
        assert_eq!(fs::read(&dest).unwrap(), b"previous archive");
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("data/GeoLite2-City.mmdb.gz")),
            PathBuf::from("data/GeoLite2-City.mmdb.gz.partial")
        );
    }

    #[test]
    fn test_write_body_copies_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        let written = write_body(&b"hello mmdb"[..], &path).unwrap();
        assert_eq!(written, 10);
        assert_eq!(fs::read(&path).unwrap(), b"hello mmdb");
    }

    #[test]
    fn test_unreachable_host_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("GeoLite2-City.mmdb.gz");
        fs::write(&dest, b"previous archive").unwrap();

        // 端口 1 上没有服务，连接会被立即拒绝
        let result = fetch_database(
            "http://127.0.0.1:1/GeoLite2-City.mmdb.gz",
            &dest,
            Duration::from_secs(2),
        );

        assert!(matches!(result, Err(GeoLocateError::Fetch(_))));
        assert_eq!(fs::read(&dest).unwrap(), b"previous archive");
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nested").join("db.mmdb.gz");

        let _ = fetch_database("http://127.0.0.1:1/db.mmdb.gz", &dest, Duration::from_secs(2));

        assert!(dir.path().join("nested").is_dir());
        assert!(!dest.exists());
    }

    #[test]
    fn test_invalid_url() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("db.mmdb.gz");
        let result = fetch_database("not a url", &dest, Duration::from_secs(1));
        assert!(matches!(result, Err(GeoLocateError::Fetch(_))));
    }
}
