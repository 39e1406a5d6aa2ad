use anyhow::Result;
use clap::Parser;

use geolocator::cli::Cli;
use geolocator::config::AppConfig;
use geolocator::runtime::modes::{self, Mode};
use geolocator::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let mode = modes::detect_mode(cli.command);

    // 必须持有到进程结束，保证日志刷新
    let _guard = if mode.needs_logging() {
        Some(init_logging(&config.logging)?)
    } else {
        None
    };

    match mode {
        Mode::Server => modes::run_server(config).await,
        Mode::Fetch => modes::run_fetch(&config).await,
        Mode::Lookup(ip) => modes::run_lookup(&config, &ip).await,
        Mode::ConfigGenerate(output_path) => modes::run_config_generate(output_path.as_deref()),
    }
}
