//! Test fixtures: a tiny MaxMind DB (mmdb) built in-process.
//!
//! The database is IPv4-only with a two-node search tree:
//! - `0.0.0.0/2`   (e.g. 8.8.8.8)      → United States / Mountain View
//! - `64.0.0.0/2`  (e.g. 81.2.69.142)  → United Kingdom, no city
//! - `128.0.0.0/1` (e.g. 203.0.113.7)  → no record

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::GzEncoder;

pub const US_IP: &str = "8.8.8.8";
pub const GB_IP: &str = "81.2.69.142";
pub const MISSING_IP: &str = "203.0.113.7";

const METADATA_MARKER: &[u8] = b"\xAB\xCD\xEFMaxMind.com";
const NODE_COUNT: u32 = 2;

enum Value {
    Str(&'static str),
    Double(f64),
    U16(u16),
    U32(u32),
    U64(u64),
    Map(Vec<(&'static str, Value)>),
    Array(Vec<Value>),
}

fn write_control(buf: &mut Vec<u8>, type_num: u8, size: usize) {
    let (first, extended) = if type_num <= 7 {
        (type_num << 5, None)
    } else {
        (0, Some(type_num - 7))
    };

    let (size_bits, size_bytes): (u8, Vec<u8>) = if size < 29 {
        (size as u8, vec![])
    } else if size < 29 + 256 {
        (29, vec![(size - 29) as u8])
    } else {
        let rest = size - 285;
        (30, vec![(rest >> 8) as u8, rest as u8])
    };

    buf.push(first | size_bits);
    if let Some(ext) = extended {
        buf.push(ext);
    }
    buf.extend_from_slice(&size_bytes);
}

fn minimal_be(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn encode(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Str(s) => {
            write_control(buf, 2, s.len());
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Double(d) => {
            write_control(buf, 3, 8);
            buf.extend_from_slice(&d.to_be_bytes());
        }
        Value::U16(v) => {
            let bytes = v.to_be_bytes();
            let b = minimal_be(&bytes);
            write_control(buf, 5, b.len());
            buf.extend_from_slice(b);
        }
        Value::U32(v) => {
            let bytes = v.to_be_bytes();
            let b = minimal_be(&bytes);
            write_control(buf, 6, b.len());
            buf.extend_from_slice(b);
        }
        Value::U64(v) => {
            let bytes = v.to_be_bytes();
            let b = minimal_be(&bytes);
            write_control(buf, 9, b.len());
            buf.extend_from_slice(b);
        }
        Value::Map(entries) => {
            write_control(buf, 7, entries.len());
            for (key, value) in entries {
                encode(buf, &Value::Str(key));
                encode(buf, value);
            }
        }
        Value::Array(items) => {
            write_control(buf, 11, items.len());
            for item in items {
                encode(buf, item);
            }
        }
    }
}

fn us_record() -> Value {
    Value::Map(vec![
        (
            "city",
            Value::Map(vec![(
                "names",
                Value::Map(vec![
                    ("de", Value::Str("Mountain View")),
                    ("en", Value::Str("Mountain View")),
                ]),
            )]),
        ),
        (
            "country",
            Value::Map(vec![
                ("iso_code", Value::Str("US")),
                (
                    "names",
                    Value::Map(vec![
                        ("de", Value::Str("Vereinigte Staaten")),
                        ("en", Value::Str("United States")),
                    ]),
                ),
            ]),
        ),
        (
            "location",
            Value::Map(vec![
                ("accuracy_radius", Value::U16(1000)),
                ("latitude", Value::Double(37.386)),
                ("longitude", Value::Double(-122.0838)),
                ("time_zone", Value::Str("America/Los_Angeles")),
            ]),
        ),
    ])
}

fn gb_record() -> Value {
    Value::Map(vec![(
        "country",
        Value::Map(vec![
            ("iso_code", Value::Str("GB")),
            (
                "names",
                Value::Map(vec![("en", Value::Str("United Kingdom"))]),
            ),
        ]),
    )])
}

fn metadata() -> Value {
    Value::Map(vec![
        ("binary_format_major_version", Value::U16(2)),
        ("binary_format_minor_version", Value::U16(0)),
        ("build_epoch", Value::U64(1_700_000_000)),
        ("database_type", Value::Str("GeoLite2-City")),
        (
            "description",
            Value::Map(vec![("en", Value::Str("geolocator test database"))]),
        ),
        ("ip_version", Value::U16(4)),
        (
            "languages",
            Value::Array(vec![Value::Str("de"), Value::Str("en")]),
        ),
        ("node_count", Value::U32(NODE_COUNT)),
        ("record_size", Value::U16(24)),
    ])
}

fn push_record24(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes()[1..]);
}

/// Build the fixture database bytes
pub fn build_mmdb() -> Vec<u8> {
    let mut data = Vec::new();
    let us_offset = data.len() as u32;
    encode(&mut data, &us_record());
    let gb_offset = data.len() as u32;
    encode(&mut data, &gb_record());

    // 指向数据段的记录值 = node_count + 16 + 数据段偏移
    let data_pointer = |offset: u32| NODE_COUNT + 16 + offset;

    let mut buf = Vec::new();
    // node 0: 首位 0 → node 1，首位 1 → 无记录
    push_record24(&mut buf, 1);
    push_record24(&mut buf, NODE_COUNT);
    // node 1: 次位 0 → US，次位 1 → GB
    push_record24(&mut buf, data_pointer(us_offset));
    push_record24(&mut buf, data_pointer(gb_offset));

    buf.extend_from_slice(&[0u8; 16]);
    buf.extend_from_slice(&data);
    buf.extend_from_slice(METADATA_MARKER);
    encode(&mut buf, &metadata());
    buf
}

/// Write the fixture database to `dir/<name>`
pub fn write_mmdb(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_mmdb()).expect("failed to write fixture mmdb");
    path
}

/// Write the gzip-compressed fixture database to `path`
pub fn write_mmdb_gz(path: &Path) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&build_mmdb()).unwrap();
    std::fs::write(path, encoder.finish().unwrap()).expect("failed to write fixture archive");
}

/// Write the fixture database as a gzip archive of two concatenated members
pub fn write_mmdb_gz_two_members(path: &Path) {
    let bytes = build_mmdb();
    let (head, tail) = bytes.split_at(bytes.len() / 2);

    let mut archive = Vec::new();
    for part in [head, tail] {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(part).unwrap();
        archive.extend_from_slice(&encoder.finish().unwrap());
    }
    std::fs::write(path, archive).expect("failed to write fixture archive");
}

/// In-memory log sink shared with a thread-local tracing subscriber
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture log output on the current thread until the guard is dropped
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
