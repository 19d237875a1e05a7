use crate::actors::{AccountActor, ScreeningReport, ScreeningStats};
use crate::detection::FraudDetector;
use crate::models::{InputError, TransactionRequest};
use crate::settings::EngineSettings;
use crate::types::{AccountId, ErrorClass};
use csv::{ReaderBuilder, Trim};
use moka::future::Cache;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{error, info};

/// Streams transaction requests from a CSV (or JSON lines) file through per-account actors.
pub struct AsyncEngine {
    detector: Arc<FraudDetector>,
    backpressure: usize,
    cache_capacity: u64,
    cache_timeout: Duration
}

impl AsyncEngine {
    /// Creates a new engine instance around the provided detector.
    pub fn new(detector: Arc<FraudDetector>) -> Self {
        let defaults = EngineSettings::default();

        Self {
            detector,
            backpressure: defaults.backpressure,
            cache_capacity: defaults.actor_capacity,
            cache_timeout: defaults.actor_idle_timeout()
        }
    }

    pub fn with_settings(self, settings: &EngineSettings) -> Self {
        self.with_backpressure(settings.backpressure)
            .with_cache_capacity(settings.actor_capacity)
            .with_cache_timeout(settings.actor_idle_timeout())
    }

    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    /// Orchestrates the end-to-end screening pipeline for an input file.
    ///
    /// Files ending in `.jsonl` carry one wire body per line; anything else is read as CSV with
    /// an `account_id,amount,location` header.
    pub async fn run(&self, path: &str) -> anyhow::Result<ScreeningReport> {
        let stats = Arc::new(ScreeningStats::default());
        let (sender, receiver) = mpsc::channel::<TransactionRequest>(self.backpressure);
        let reader_handle = self.spawn_reader(path.to_string(), sender, stats.clone());
        let dispatch_result = self.dispatch_requests(receiver, stats).await;

        if let Err(error) = reader_handle.await {
            error!("Input ingestion failed: {error}");
        }

        dispatch_result
    }

    fn spawn_reader(&self, path: String, sender: mpsc::Sender<TransactionRequest>, stats: Arc<ScreeningStats>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening input at path: {path} | {error}");
                    return;
                }
            };

            if path.ends_with(".jsonl") {
                read_json_lines(BufReader::new(file), &sender, &stats);
            } else {
                read_csv(BufReader::new(file), &sender, &stats);
            }
        })
    }

    async fn dispatch_requests(&self, mut receiver: mpsc::Receiver<TransactionRequest>, stats: Arc<ScreeningStats>) -> anyhow::Result<ScreeningReport> {
        let (guard_sender, mut guard_receiver) = mpsc::channel::<()>(1);

        //NOTE: Idle or least recently used actors are retired by the cache; a later request for the same
        //      account spawns a fresh actor which reads its history back from the store.
        let actors: Cache<AccountId, AccountActor> = Cache::builder()
            .max_capacity(self.cache_capacity)
            .time_to_idle(self.cache_timeout)
            .build();

        while let Some(request) = receiver.recv().await {
            let account_id = request.account_id.clone();
            let actor = actors.get_with(account_id.clone(), async {
                AccountActor::spawn(account_id.clone(), self.detector.clone(), stats.clone(), guard_sender.clone())
            }).await;

            if !actor.accept(request) {
                error!("Account actor for account [{account_id}] could not accept transaction request");
                stats.record_error(ErrorClass::Server);
            }
        }

        //NOTE: Graceful shutdown, every actor drains its queue and drops its guard before this resolves
        drop(actors);
        drop(guard_sender);
        let _ = guard_receiver.recv().await;

        let report = stats.report();
        info!(
            "Screened [{}] transactions, flagged [{}], rejected [{}], failed [{}]",
            report.screened, report.flagged, report.rejected, report.failed
        );

        Ok(report)
    }
}

fn read_csv(input: BufReader<File>, sender: &mpsc::Sender<TransactionRequest>, stats: &ScreeningStats) {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    for result in reader.deserialize::<TransactionRequest>() {
        let request = result
            .map_err(InputError::from)
            .and_then(TransactionRequest::validated);

        match request {
            Ok(request) => {
                if sender.blocking_send(request).is_err() {
                    break;
                }
            }
            Err(input_error) => {
                error!("{input_error}");
                stats.record_error(input_error.class());
            }
        }
    }
}

fn read_json_lines(input: BufReader<File>, sender: &mpsc::Sender<TransactionRequest>, stats: &ScreeningStats) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                error!("Error reading JSON lines input: {error}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match TransactionRequest::from_json(line.as_bytes()) {
            Ok(request) => {
                if sender.blocking_send(request).is_err() {
                    break;
                }
            }
            Err(input_error) => {
                error!("{input_error}");
                stats.record_error(input_error.class());
            }
        }
    }
}
