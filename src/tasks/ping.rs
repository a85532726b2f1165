//! Keep-Alive Ping Task
//!
//! Periodically requests a configured URL, which keeps free-tier hosts from
//! idling the service, and records the outcome for the health endpoints.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::CacheStore;
use crate::config::Config;

/// Cache key under which the latest successful response preview is kept.
pub const LAST_RESPONSE_KEY: &str = "ping:last_response";

const PREVIEW_CHARS: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// == Settings ==
#[derive(Debug, Clone)]
pub struct PingSettings {
    pub enabled: bool,
    pub url: String,
    pub interval: Duration,
    pub initial_delay: Duration,
}

impl PingSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.ping_enabled,
            url: config.ping_url.clone(),
            interval: config.ping_interval(),
            initial_delay: config.ping_initial_delay(),
        }
    }
}

// == Status ==
/// Snapshot of the ping job, as served by `/ping-status` and `/health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingStatus {
    pub enabled: bool,
    pub url: String,
    pub interval_minutes: u64,
    pub total_pings: u64,
    pub last_result: String,
    pub last_ping_time: String,
}

#[derive(Debug)]
struct PingState {
    total_pings: u64,
    last_result: String,
    last_ping_time: Option<String>,
}

impl Default for PingState {
    fn default() -> Self {
        Self {
            total_pings: 0,
            last_result: "Not started".to_string(),
            last_ping_time: None,
        }
    }
}

/// Falls back to a client without the request timeout if the configured one
/// cannot be built.
fn client_or_default(built: reqwest::Result<reqwest::Client>) -> reqwest::Client {
    built.unwrap_or_else(|e| {
        warn!(
            error = %e,
            "Failed to build ping client, continuing without a {}s request timeout",
            REQUEST_TIMEOUT.as_secs()
        );
        reqwest::Client::default()
    })
}

// == Ping Service ==
/// Issues keep-alive requests and tracks their results.
///
/// Clones share the same counters, so the handle given to the background
/// task and the one held by the HTTP layer report the same status.
#[derive(Debug, Clone)]
pub struct PingService {
    settings: PingSettings,
    client: reqwest::Client,
    state: Arc<Mutex<PingState>>,
    cache: Option<CacheStore<Value>>,
}

impl PingService {
    pub fn new(settings: PingSettings) -> Self {
        Self {
            settings,
            client: client_or_default(
                reqwest::Client::builder()
                    .timeout(REQUEST_TIMEOUT)
                    .build(),
            ),
            state: Arc::new(Mutex::new(PingState::default())),
            cache: None,
        }
    }

    /// Replaces the HTTP client used for pings.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Memoises the preview of each successful response in `cache`.
    pub fn with_cache(mut self, cache: CacheStore<Value>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &PingSettings {
        &self.settings
    }

    /// True when pinging is enabled and a URL is configured.
    pub fn is_active(&self) -> bool {
        self.settings.enabled && !self.settings.url.trim().is_empty()
    }

    // == Ping Once ==
    /// Performs a single ping attempt, or nothing when inactive.
    pub async fn ping_once(&self) {
        if !self.is_active() {
            debug!("Ping service is disabled or URL not configured");
            return;
        }

        let url = self.settings.url.as_str();
        let attempt = {
            let mut state = self.state.lock();
            state.total_pings += 1;
            state.total_pings
        };
        info!(
            "Pinging URL: {} (Attempt #{}) at {}",
            url,
            attempt,
            Local::now().format(TIME_FORMAT)
        );

        let started = Instant::now();
        let outcome = self.fetch(url).await;
        let elapsed_ms = started.elapsed().as_millis();

        let last_result = match outcome {
            Ok(body) => {
                info!("Ping successful! Response time: {}ms", elapsed_ms);
                self.record_preview(&body);
                format!("SUCCESS - Response time: {}ms", elapsed_ms)
            }
            Err(err) => {
                error!("Failed to ping URL: {} - Error: {}", url, err);
                format!("FAILED - {}", err)
            }
        };

        let mut state = self.state.lock();
        state.last_result = last_result;
        state.last_ping_time = Some(Local::now().format(TIME_FORMAT).to_string());
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    fn record_preview(&self, body: &str) {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return;
        }

        let mut preview: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        if trimmed.chars().nth(PREVIEW_CHARS).is_some() {
            preview.push_str("...");
        }
        debug!("Response preview: {}", preview);

        if let Some(cache) = &self.cache {
            cache.insert(LAST_RESPONSE_KEY, Value::String(preview));
        }
    }

    // == Status ==
    pub fn status(&self) -> PingStatus {
        let state = self.state.lock();
        PingStatus {
            enabled: self.settings.enabled,
            url: self.settings.url.clone(),
            interval_minutes: self.settings.interval.as_secs() / 60,
            total_pings: state.total_pings,
            last_result: state.last_result.clone(),
            last_ping_time: state
                .last_ping_time
                .clone()
                .unwrap_or_else(|| "Never".to_string()),
        }
    }
}

/// Spawns the fixed-rate ping loop.
///
/// The first attempt happens after the configured initial delay, then one
/// every interval. Attempts are no-ops while the service is inactive.
pub fn spawn_ping_task(service: PingService) -> JoinHandle<()> {
    tokio::spawn(async move {
        let settings = service.settings().clone();
        info!(
            enabled = service.is_active(),
            "Starting ping task with interval of {} minutes",
            settings.interval.as_secs() / 60
        );

        let start = tokio::time::Instant::now() + settings.initial_delay;
        let mut ticker = tokio::time::interval_at(start, settings.interval);
        loop {
            ticker.tick().await;
            service.ping_once().await;
        }
    })
}
