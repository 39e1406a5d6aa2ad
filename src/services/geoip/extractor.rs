//! gzip 解压
//!
//! 将下载的 `.mmdb.gz` 解压为可用的 `.mmdb` 文件

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use tracing::{debug, warn};

use super::fetcher::partial_path;
use crate::errors::{GeoLocateError, Result};

/// 解压 `source` 到 `output`，返回解压后的字节数
///
/// 解压失败时删除临时文件，已有的 `output` 保持不变
pub fn extract_gzip(source: &Path, output: &Path) -> Result<u64> {
    let f = File::open(source).map_err(|e| {
        warn!("Error while opening gzip file {}: {}", source.display(), e);
        GeoLocateError::extract(format!(
            "failed to open gzip file {}: {}",
            source.display(),
            e
        ))
    })?;

    let tmp_path = partial_path(output);
    let out = File::create(&tmp_path).map_err(|e| {
        warn!(
            "Error while creating output file {}: {}",
            tmp_path.display(),
            e
        );
        GeoLocateError::extract(format!(
            "failed to create output file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    // 读取全部 gzip member，不只第一个
    let mut decoder = MultiGzDecoder::new(BufReader::new(f));
    let mut writer = BufWriter::new(out);
    let copied = io::copy(&mut decoder, &mut writer).and_then(|n| writer.flush().map(|_| n));
    let written = match copied {
        Ok(n) => n,
        Err(e) => {
            warn!("Error while reading gzip file {}: {}", source.display(), e);
            drop(writer);
            let _ = fs::remove_file(&tmp_path);
            return Err(GeoLocateError::extract(format!(
                "failed to decompress {}: {}",
                source.display(),
                e
            )));
        }
    };

    fs::rename(&tmp_path, output).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        GeoLocateError::extract(format!(
            "failed to move {} to {}: {}",
            tmp_path.display(),
            output.display(),
            e
        ))
    })?;

    debug!(
        "Extracted {} ({} bytes) to {}",
        source.display(),
        written,
        output.display()
    );
    Ok(written)
}
