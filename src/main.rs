use clap::Parser;
use oaza_congestion::config::{LoggingSettings, RowPolicy, Settings};
use oaza_congestion::{run, AppError, CongestionReport};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Find the point surrounded by the most oaza in a CSV file")]
struct Args {
    /// Oaza CSV file
    input: PathBuf,

    /// Extra configuration file, applied after config/default and config/local
    #[arg(long)]
    config: Option<PathBuf>,

    /// Latitude half-extent of the window, in degrees
    #[arg(long)]
    width: Option<f64>,

    /// Longitude half-extent of the window, in degrees
    #[arg(long)]
    height: Option<f64>,

    /// Ignore rows at or beyond this index
    #[arg(long)]
    max_rows: Option<usize>,

    /// Input text encoding label
    #[arg(long)]
    encoding: Option<String>,

    /// Skip rows with unreadable coordinates instead of aborting
    #[arg(long)]
    skip_invalid_rows: bool,

    /// Score candidates on all cores
    #[arg(long)]
    parallel: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.search.width = width;
        }
        if let Some(height) = self.height {
            settings.search.height = height;
        }
        if let Some(max_rows) = self.max_rows {
            settings.loader.max_rows = Some(max_rows);
        }
        if let Some(encoding) = &self.encoding {
            settings.loader.encoding = encoding.clone();
        }
        if self.skip_invalid_rows {
            settings.loader.row_policy = RowPolicy::Skip;
        }
        if self.parallel {
            settings.search.parallel = true;
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "full" => subscriber.init(),
        _ => subscriber.compact().init(),
    }
}

fn execute(args: &Args, settings: &Settings) -> Result<CongestionReport, AppError> {
    let file = File::open(&args.input).map_err(|e| AppError::Loader(e.into()))?;
    info!("Reading {}", args.input.display());
    run(settings, file)
}

fn main() -> ExitCode {
    // Missing input path prints usage to stderr and exits non-zero
    let args = Args::parse();

    // Load .env file if present
    dotenv::dotenv().ok();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut settings);

    init_logging(&settings.logging);

    let report = match execute(&args, &settings) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report);
    }

    ExitCode::SUCCESS
}
