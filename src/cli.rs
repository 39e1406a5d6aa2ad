//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Geolocator - resolve client IP addresses to a country and city
#[derive(Parser, Debug)]
#[command(name = "geolocator")]
#[command(version)]
#[command(about = "Resolve client IP addresses using a local MaxMind database", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml, optional)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Download, extract and open the database, then serve HTTP (default)
    Serve,

    /// Download and extract the database without starting the server
    Fetch,

    /// Look up a single address against the local database
    Lookup {
        /// IPv4 or IPv6 address
        ip: String,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Print a sample configuration file
    Generate {
        /// Write to this path instead of stdout
        output_path: Option<String>,
    },
}
