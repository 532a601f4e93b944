use clap::Parser;
use host_process_charts::chart::{ChartView, HostProcessesChart};
use host_process_charts::errors;
use host_process_charts::logger;
use host_process_charts::query::{DataSource, QueryContext, SourceMode, TimeWindow};
use host_process_charts::reader::read_document;
use std::io::Write;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[clap()]
struct AppArgs {
    /// Input path to JSON with host metrics (`.gz` is decompressed)
    #[clap(long)]
    input_json_file_path: String,
    /// Output path for the chart series JSON, stdout when omitted
    #[clap(long)]
    output_json_file_path: Option<String>,
    /// Pretty-print the output
    #[clap(long)]
    pretty: bool,
    /// Cluster the host belongs to
    #[clap(long, requires = "host_name")]
    cluster_name: Option<String>,
    /// Host the metrics were collected on
    #[clap(long, requires = "cluster_name")]
    host_name: Option<String>,
    /// Use the bundled fixture instead of the metrics API
    #[clap(long)]
    offline: bool,
}

fn main() -> errors::Result<()> {
    let t: Instant = Instant::now();
    logger::setup("hostprocs", "INFO");

    let args = AppArgs::parse();
    info!("Received args: {:?}", args);

    let chart = HostProcessesChart;
    if let (Some(cluster_name), Some(host_name)) = (&args.cluster_name, &args.host_name) {
        let ctx = QueryContext {
            cluster_name: cluster_name.clone(),
            host_name: host_name.clone(),
            window: TimeWindow::last_hour(),
            mode: SourceMode::from_offline_flag(args.offline),
        };
        match chart.source(&ctx)? {
            DataSource::Live(url) => info!("`{}` would query {}", chart.id(), url),
            DataSource::Fixture(path) => {
                info!("`{}` would read fixture {}", chart.id(), path.display())
            }
        }
    }

    let doc = read_document(&args.input_json_file_path)?;
    let series = chart.transform_to_series(doc.as_ref())?;
    let points: usize = series.iter().map(|s| s.data.len()).sum();

    let json = if args.pretty {
        serde_json::to_vec_pretty(&series)?
    } else {
        serde_json::to_vec(&series)?
    };
    match &args.output_json_file_path {
        Some(path) => std::fs::write(path, &json)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json)?;
            stdout.write_all(b"\n")?;
        }
    }

    let total_elapsed_secs = (t.elapsed().as_millis() as f64) / 1000.0;
    info!(
        "`{}` ({}): {} series, {points} points in {total_elapsed_secs:.3} seconds",
        chart.id(),
        chart.title(),
        series.len()
    );
    Ok(())
}
