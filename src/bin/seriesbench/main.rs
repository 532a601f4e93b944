#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::Parser;
use host_process_charts::reader::read_bytes;
use host_process_charts::series::transform_slice;
use host_process_charts::{errors, logger};
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[clap()]
struct AppArgs {
    /// Input path to JSON with host metrics (`.gz` is decompressed)
    #[clap(long)]
    input_json_file_path: String,
    /// Number of parse-and-transform rounds
    #[clap(long, default_value_t = 100)]
    iterations: usize,
}

fn main() -> errors::Result<()> {
    logger::setup("seriesbench", "INFO");

    let args = AppArgs::parse();
    info!("Received args: {:?}", args);
    let iters = args.iterations.max(1);

    let bytes = read_bytes(Path::new(&args.input_json_file_path))?;
    let t: Instant = Instant::now();
    let mut total: usize = 0;
    for _i in 0..iters {
        let series = transform_slice(&bytes)?;
        total += series.iter().map(|s| s.data.len()).sum::<usize>();
    }
    let total_elapsed_ms = t.elapsed().as_micros() as f64 / 1000.0;
    let avg = total_elapsed_ms / iters as f64;
    info!(
        "Total time is {total_elapsed_ms:.3} ms, average transform time is {avg:.3} ms, points per document: {}",
        total / iters
    );

    Ok(())
}
