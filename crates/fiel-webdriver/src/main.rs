use clap::Parser as ClapParser;
use fiel_engine::config::{ConfigLoader, FielConfig};
use fiel_engine::error::FielError;
use fiel_engine::report::RunReport;
use fiel_engine::{Credentials, prepare_input, run_workflow};
use fiel_webdriver::{WebDriverSession, chrome_capabilities};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Download the SAT constancia de situación fiscal using e.firma", long_about = None)]
struct Args {
    /// Certificate file (.cer)
    #[arg(long)]
    cer: PathBuf,

    /// Private key file (.key)
    #[arg(long)]
    key: PathBuf,

    /// Private key passphrase
    #[arg(long, env = "FIEL_PASSPHRASE", hide_env_values = true)]
    passphrase: String,

    /// Where the constancia is saved
    #[arg(long, default_value = "./constancias")]
    download_dir: PathBuf,

    /// URL of a running ChromeDriver
    #[arg(short, long, default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Config file (defaults to $FIEL_CONFIG, ./fiel.yaml, then ~/.fiel/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    visible: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

async fn load_config(path: Option<&PathBuf>) -> Result<FielConfig, FielError> {
    let config = match path {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };
    Ok(config)
}

async fn run(args: &Args) -> RunReport {
    let config = match load_config(args.config.as_ref()).await {
        Ok(config) => config,
        Err(e) => return RunReport::failure(&e),
    };

    let credentials = Credentials::new(&args.cer, &args.key, args.passphrase.clone());
    let input = match prepare_input(&credentials, &args.download_dir) {
        Ok(input) => input,
        Err(e) => return RunReport::failure(&e),
    };

    let caps = chrome_capabilities(&input.download_dir, !args.visible);
    let session = match WebDriverSession::connect(&args.webdriver_url, caps).await {
        Ok(session) => session,
        Err(e) => return RunReport::failure(&e),
    };

    let result = run_workflow(&session, &config, &input).await;
    RunReport::from_result(&result)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting fiel...");
    let report = run(&args).await;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize report: {}", e),
        }
    } else {
        println!("{}", report);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
}
