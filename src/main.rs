use std::io::{stderr, stdout, BufWriter};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use fraud_sentinel::detection::{DisabledRiskModel, FraudDetector, HttpRiskModel, LogAlertSink, RiskModel};
use fraud_sentinel::engine::AsyncEngine;
use fraud_sentinel::settings::Settings;
use fraud_sentinel::storage::{MemoryStore, TransactionStore};
use fraud_sentinel::types::SystemClock;

const OUTPUT_HEADER: [&str; 8] = [
    "transaction_id",
    "amount",
    "account_id",
    "location",
    "transaction_time",
    "elapsed_time",
    "frequency",
    "fraud_label"
];

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: fraud-sentinel [input].csv [log_level:optional] > [output].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    let settings = Settings::load()?;
    let store = Arc::new(MemoryStore::new());
    let detector = build_detector(&settings, store.clone())?;
    let engine = AsyncEngine::new(Arc::new(detector)).with_settings(&settings.engine);

    let timer = Instant::now();
    let report = engine.run(path).await?;
    let duration = timer.elapsed();

    info!("Screened [{}] transactions in: {duration:?}", report.screened);

    write_results_to_stdout(store).await?;

    if report.rejected > 0 {
        warn!("Rejected [{}] malformed transaction requests", report.rejected);
    }

    //NOTE: Malformed input is the caller's problem and still exits cleanly; lost transactions do not
    if report.failed > 0 {
        anyhow::bail!("[{}] transactions could not be screened or saved", report.failed);
    }

    Ok(())
}

fn build_detector(settings: &Settings, store: Arc<MemoryStore>) -> Result<FraudDetector> {
    let risk_model: Arc<dyn RiskModel> = match &settings.risk_model.url {
        Some(url) => {
            info!("Consulting risk model at {url}");
            Arc::new(HttpRiskModel::new(url, settings.risk_model.timeout())?)
        }
        None => Arc::new(DisabledRiskModel)
    };

    let detector = FraudDetector::new(store, risk_model, Arc::new(LogAlertSink), Arc::new(SystemClock::new()))
        .with_alert_timeout(settings.alerts.timeout())
        .with_rules(settings.rules.rule_engine())
        .with_feature_extractor(settings.rules.feature_extractor());

    Ok(detector)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Because we are doing stdout redirection, we will need to utilize stderr to display logging
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

async fn write_results_to_stdout(store: Arc<MemoryStore>) -> Result<()> {
    let transactions = store.list_all().await?;
    let mut output = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(stdout().lock()));

    output.write_record(OUTPUT_HEADER)?;

    for transaction in transactions.chronological() {
        output.serialize(transaction)?;
    }

    output.flush()?;

    Ok(())
}
