//! pbf-bench
//!
//! Benchmark harness for `pbf-writer`: builds a fixed nested message
//! shape many times and copies the encoded bytes into a caller-supplied
//! output buffer.

pub mod config;
pub mod fixture;
pub mod runner;

pub use config::{BenchConfig, ConfigError};
pub use fixture::{write_proto, FixtureEncoder};
pub use runner::{run, BenchReport};
