//! Geolocator - resolve client IP addresses to an approximate location
//!
//! At startup the service downloads a gzip-compressed MaxMind database,
//! extracts it, opens it once, and then answers `GET /test` with the country
//! and city of the requesting client.
//!
//! # Architecture
//! - `services::geoip`: fetch, extract, open and resolve
//! - `api`: HTTP handlers and middleware
//! - `config`: configuration loading (TOML + environment)
//! - `runtime`: startup pipeline, shutdown and execution modes
//! - `system`: logging initialization
//! - `utils`: client IP extraction

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
