//! Counters for the tick and receive paths, plus logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Shared between the tick loop and the receive task.
#[derive(Debug)]
pub struct Metrics {
    generations: AtomicU64,
    live_cells: AtomicU64,
    last_generation_us: AtomicU64,
    packets_accepted: AtomicU64,
    packets_malformed: AtomicU64,
    packets_unknown_peer: AtomicU64,
    datagrams_sent: AtomicU64,
    send_failures: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub generations: u64,
    pub live_cells: u64,
    pub last_generation_us: u64,
    pub packets_accepted: u64,
    pub packets_malformed: u64,
    pub packets_unknown_peer: u64,
    pub datagrams_sent: u64,
    pub send_failures: u64,
    pub uptime_ms: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::with_log_interval(100)
    }

    /// Logs a summary every `log_interval` generations; zero disables it.
    #[must_use]
    pub fn with_log_interval(log_interval: u64) -> Self {
        Self {
            generations: AtomicU64::new(0),
            live_cells: AtomicU64::new(0),
            last_generation_us: AtomicU64::new(0),
            packets_accepted: AtomicU64::new(0),
            packets_malformed: AtomicU64::new(0),
            packets_unknown_peer: AtomicU64::new(0),
            datagrams_sent: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            log_interval,
            start_time: Instant::now(),
        }
    }

    pub fn record_generation(&self, duration: Duration, live_cells: usize) {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        self.live_cells.store(live_cells as u64, Ordering::Relaxed);
        self.last_generation_us
            .store(duration.as_micros() as u64, Ordering::Relaxed);

        if self.log_interval > 0 && generation.is_multiple_of(self.log_interval) {
            tracing::info!(
                generation,
                live_cells,
                duration_us = duration.as_micros() as u64,
                accepted = self.packets_accepted.load(Ordering::Relaxed),
                malformed = self.packets_malformed.load(Ordering::Relaxed),
                unknown = self.packets_unknown_peer.load(Ordering::Relaxed),
                sent = self.datagrams_sent.load(Ordering::Relaxed),
                send_failures = self.send_failures.load(Ordering::Relaxed),
                "Generation"
            );
        }
    }

    pub fn record_accepted(&self) {
        self.packets_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.packets_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unknown_peer(&self) {
        self.packets_unknown_peer.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.datagrams_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            generations: self.generations.load(Ordering::Relaxed),
            live_cells: self.live_cells.load(Ordering::Relaxed),
            last_generation_us: self.last_generation_us.load(Ordering::Relaxed),
            packets_accepted: self.packets_accepted.load(Ordering::Relaxed),
            packets_malformed: self.packets_malformed.load(Ordering::Relaxed),
            packets_unknown_peer: self.packets_unknown_peer.load(Ordering::Relaxed),
            datagrams_sent: self.datagrams_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            uptime_ms: self.elapsed().as_millis() as u64,
        }
    }
}

/// Installs a stderr fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) {
    init_logging_with_writer(default_filter, std::io::stderr);
}

/// Same as [`init_logging`] with a custom destination.
pub fn init_logging_with_writer<W>(default_filter: &str, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok();
}
