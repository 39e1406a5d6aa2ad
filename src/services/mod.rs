//! Service layer
//!
//! Business logic shared between the HTTP API and the command-line modes.

pub mod geoip;

pub use geoip::{GeoIpLookup, LocationRecord, MaxMindDatabase, Resolution, Resolver};
