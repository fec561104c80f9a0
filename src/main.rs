//! Command-line entry point: collect the request, run the batch, print the report.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use catfetch::config::DEFAULT_SEARCH_URL;
use catfetch::prompt::{prompt_path, prompt_positive};
use catfetch::{Config, PhotoDownloader, RequestConfig};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Default logging level when `RUST_LOG` is not provided
const DEFAULT_LOG_LEVEL: &str = "warn";
/// Exit status for bad arguments, input or configuration
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "catfetch",
    version,
    about = "Download photos, crop them around the center and save them as JPEG"
)]
struct Cli {
    /// Crop width in pixels (prompted if omitted)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Crop height in pixels (prompted if omitted)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Number of photos to fetch (prompted if omitted)
    #[arg(long = "count")]
    photo_count: Option<usize>,

    /// Directory to save photos into (prompted if omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Photo search endpoint
    #[arg(long, env = "CATFETCH_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    search_url: String,

    /// API key for the search endpoint
    #[arg(long, env = "CAT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Run at most this many photo tasks at once (default: all at once)
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_format) {
        eprintln!("error: {e}");
        return ExitCode::from(EXIT_USAGE);
    }

    let request = match collect_request(&cli) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let config = Config {
        search_url: cli.search_url,
        api_key: cli.api_key,
        max_concurrent_tasks: cli.max_concurrent,
        ..Config::default()
    };
    let downloader = match PhotoDownloader::new(config) {
        Ok(downloader) => downloader,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let report = downloader.run_batch(request).await;

    if let Err(e) = report.write_to(&mut io::stdout().lock()) {
        eprintln!("error: failed to print report: {e}");
        return ExitCode::FAILURE;
    }

    report.exit_code()
}

fn init_logging(format: LogFormat) -> Result<(), String> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|err| format!("failed to install tracing subscriber: {err}"))
}

/// Fill in whatever the command line left out by prompting on stdin
fn collect_request(cli: &Cli) -> catfetch::Result<RequestConfig> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let width = match cli.width {
        Some(width) => width,
        None => prompt_positive(&mut input, &mut output, "Width")?,
    };
    let height = match cli.height {
        Some(height) => height,
        None => prompt_positive(&mut input, &mut output, "Height")?,
    };
    let photo_count = match cli.photo_count {
        Some(count) => count,
        None => prompt_positive(&mut input, &mut output, "Photos count")?,
    };
    let destination = match &cli.output {
        Some(path) => path.clone(),
        None => prompt_path(&mut input, &mut output, "Path")?,
    };

    RequestConfig::new(width, height, photo_count, destination)
}
