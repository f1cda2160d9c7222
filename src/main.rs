//! Grayscale a binary PPM (P6) image using a bounded pool of workers.
//!
//! Reads the input through a zero-copy memory map, converts every pixel to
//! its channel mean in parallel, and writes the result atomically.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use graymill::codecs::ppm;
use graymill::engine::{EngineConfig, GrayscaleEngine, SchedulingHint};
use graymill::io::{self, Source};
use graymill::{EngineReport, Result, RunMetrics};

/// Worker count override via environment (same meaning as --workers)
const WORKERS_ENV: &str = "GRAYMILL_WORKERS";

/// Grayscale a binary PPM (P6) image using a bounded pool of workers.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input PPM (P6) path.
    input: PathBuf,

    /// Output path. The file appears atomically: either the old content or
    /// the complete new image, never a partial write.
    #[arg(short, long)]
    output: PathBuf,

    /// Worker count for the parallel transform.
    ///
    /// Defaults to GRAYMILL_WORKERS if set, otherwise the number of
    /// available CPU cores.
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Upper bound on concurrently active workers.
    ///
    /// Must be between 1 and the worker count; defaults to the worker count
    /// (no extra throttling).
    #[arg(long, value_name = "N")]
    max_active: Option<usize>,

    /// Run worker threads at lowered scheduling priority.
    #[arg(long)]
    background: bool,

    /// Print stage timings and resource usage after the run.
    #[arg(long)]
    stats: bool,
}

// ---------------------------------------------------------------------------
// Resource usage sampling
// ---------------------------------------------------------------------------

/// Process resource usage sampled before and after the run
#[derive(Clone, Copy)]
struct ResourceUsage {
    cpu_time: f64,   // User + system CPU time in seconds
    memory_rss: u64, // Resident set size in bytes
}

/// Get current process resource usage (CPU time and RSS memory)
/// Returns None on unsupported platforms or if getrusage fails
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "freebsd"))]
fn get_resource_usage() -> Option<ResourceUsage> {
    use libc::{getrusage, rusage, RUSAGE_SELF};
    use std::mem;

    unsafe {
        let mut usage: rusage = mem::zeroed();
        if getrusage(RUSAGE_SELF, &mut usage) == 0 {
            // CPU time = user time + system time
            let cpu_time = usage.ru_utime.tv_sec as f64
                + usage.ru_utime.tv_usec as f64 / 1_000_000.0
                + usage.ru_stime.tv_sec as f64
                + usage.ru_stime.tv_usec as f64 / 1_000_000.0;

            // On Linux, ru_maxrss is in KB; on macOS/FreeBSD, it's in bytes
            #[cfg(target_os = "linux")]
            let memory_rss = usage.ru_maxrss as u64 * 1024;
            #[cfg(any(target_os = "macos", target_os = "freebsd"))]
            let memory_rss = usage.ru_maxrss as u64;

            Some(ResourceUsage {
                cpu_time,
                memory_rss,
            })
        } else {
            None
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "freebsd")))]
fn get_resource_usage() -> Option<ResourceUsage> {
    None
}

// ---------------------------------------------------------------------------
// Worker-count defaults
// ---------------------------------------------------------------------------

fn default_workers() -> usize {
    std::env::var(WORKERS_ENV)
        .ok()
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("graymill: [{}] {}", err.category().code(), err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let workers = args.workers.unwrap_or_else(default_workers);
    let max_active = args.max_active.unwrap_or(workers);
    let hint = if args.background {
        SchedulingHint::Background
    } else {
        SchedulingHint::Inherit
    };

    let mut metrics = RunMetrics::default();
    let usage_start = get_resource_usage();
    let start_total = Instant::now();

    eprintln!("Reading {}", args.input.display());
    let source = Source::open(&args.input)?;
    metrics.bytes_in = source.len() as u64;

    let decode_start = Instant::now();
    let (header, mut pixels) = ppm::decode(source.as_bytes())?;
    metrics.decode_ms = decode_start.elapsed().as_secs_f64() * 1000.0;

    eprintln!(
        "{}x{} pixels, {} workers, {} active at once",
        header.width, header.height, workers, max_active
    );

    let engine = GrayscaleEngine::new(EngineConfig {
        workers,
        max_active,
        hint,
    })?;
    let report = engine.process(&mut pixels)?;
    metrics.transform_ms = report.elapsed.as_secs_f64() * 1000.0;

    let encode_start = Instant::now();
    let encoded = ppm::encode(&header, &pixels);
    metrics.encode_ms = encode_start.elapsed().as_secs_f64() * 1000.0;

    eprintln!("Writing {}", args.output.display());
    metrics.bytes_out = io::write_atomic(&args.output, &encoded)?;

    metrics.total_ms = start_total.elapsed().as_secs_f64() * 1000.0;
    if let (Some(start), Some(end)) = (usage_start, get_resource_usage()) {
        metrics.cpu_time = (end.cpu_time - start.cpu_time).max(0.0);
        metrics.peak_rss = end.memory_rss;
    }

    if args.stats {
        print_stats(&metrics, &report);
    }

    eprintln!("Done.");
    Ok(())
}

fn print_stats(metrics: &RunMetrics, report: &EngineReport) {
    println!("decode:    {:8.2} ms", metrics.decode_ms);
    println!(
        "transform: {:8.2} ms  ({} segments, {} workers, {} active)",
        metrics.transform_ms, report.segments, report.workers, report.max_active
    );
    println!("encode:    {:8.2} ms", metrics.encode_ms);
    println!("total:     {:8.2} ms", metrics.total_ms);
    println!("cpu time:  {:8.3} s", metrics.cpu_time);
    if metrics.peak_rss > 0 {
        println!(
            "peak rss:  {:8.1} MiB",
            metrics.peak_rss as f64 / (1024.0 * 1024.0)
        );
    }
    println!(
        "bytes:     {} in / {} out",
        metrics.bytes_in, metrics.bytes_out
    );
}
