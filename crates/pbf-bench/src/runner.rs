//! Timed benchmark loop.
//!
//! Owns one preallocated output buffer and one [`FixtureEncoder`], then
//! encodes the fixture `iterations` times into that buffer.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::fixture::FixtureEncoder;

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub messages: usize,
    pub iterations: usize,
    pub length_mode: &'static str,
    pub bytes_per_iteration: usize,
    pub total_nanos: u64,
    pub mean_nanos: u64,
    pub fastest_nanos: u64,
    pub throughput_mib_s: f64,
}

impl BenchReport {
    fn from_samples(config: &BenchConfig, bytes: usize, samples: &[Duration]) -> Self {
        let total: Duration = samples.iter().sum();
        let fastest = samples.iter().min().copied().unwrap_or_default();
        let mean = total / samples.len().max(1) as u32;
        let secs = total.as_secs_f64();
        let throughput = if secs > 0.0 {
            (bytes * samples.len()) as f64 / secs / (1024.0 * 1024.0)
        } else {
            0.0
        };

        BenchReport {
            messages: config.messages,
            iterations: samples.len(),
            length_mode: config.length_mode().as_str(),
            bytes_per_iteration: bytes,
            total_nanos: total.as_nanos() as u64,
            mean_nanos: mean.as_nanos() as u64,
            fastest_nanos: fastest.as_nanos() as u64,
            throughput_mib_s: throughput,
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "messages/iteration : {}", self.messages)?;
        writeln!(f, "iterations         : {}", self.iterations)?;
        writeln!(f, "length mode        : {}", self.length_mode)?;
        writeln!(f, "bytes/iteration    : {}", self.bytes_per_iteration)?;
        writeln!(f, "mean               : {:.3} ms", self.mean_nanos as f64 / 1e6)?;
        writeln!(f, "fastest            : {:.3} ms", self.fastest_nanos as f64 / 1e6)?;
        write!(f, "throughput         : {:.1} MiB/s", self.throughput_mib_s)
    }
}

/// Run the benchmark described by `config`.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    config.validate().context("refusing to run benchmark")?;

    let mut output = vec![0u8; config.output_capacity];
    let mut encoder = FixtureEncoder::new(config.length_mode());
    let mut samples = Vec::with_capacity(config.iterations);
    let mut bytes = None;

    info!(
        messages = config.messages,
        iterations = config.iterations,
        mode = config.length_mode().as_str(),
        "starting benchmark"
    );

    for iteration in 0..config.iterations {
        let started = Instant::now();
        let written = encoder
            .encode_into(config.messages, &mut output)
            .with_context(|| format!("iteration {} failed", iteration))?;
        let elapsed = started.elapsed();

        match bytes {
            None => bytes = Some(written),
            Some(expected) if expected != written => {
                bail!(
                    "iteration {} wrote {} bytes, earlier iterations wrote {}",
                    iteration,
                    written,
                    expected
                );
            }
            Some(_) => {}
        }

        debug!(iteration, written, elapsed_us = elapsed.as_micros() as u64, "iteration done");
        samples.push(elapsed);
    }

    let report = BenchReport::from_samples(config, bytes.unwrap_or(0), &samples);
    info!(
        bytes = report.bytes_per_iteration,
        mean_ms = report.mean_nanos as f64 / 1e6,
        throughput_mib_s = report.throughput_mib_s,
        "benchmark finished"
    );
    Ok(report)
}
