use crate::sender::MetricSender;
use guardian_collector::Collector;
use guardian_common::types::{MetricSet, POLL_COUNT, RANDOM_VALUE};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Accumulation buffer owned by one [`Agent`].
///
/// Holds the latest value of every collected measurement plus the two
/// agent-generated entries, `PollCount` and `RandomValue`. Nothing is removed
/// after a report: gauges are re-sent unchanged and `PollCount` keeps growing.
#[derive(Debug, Default)]
pub struct AgentState {
    metrics: MetricSet,
    poll_count: i64,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one poll's sample by overwrite and advances the poll counter.
    ///
    /// Non-finite readings count as unavailable: they are skipped and the
    /// previous value for that name, if any, is kept.
    pub fn record_poll(&mut self, sample: MetricSet, random: f64) {
        self.metrics
            .extend(sample.into_iter().filter(|(_, v)| v.is_finite()));
        self.poll_count = self.poll_count.saturating_add(1);
        self.metrics
            .insert(POLL_COUNT.to_string(), self.poll_count as f64);
        self.metrics.insert(RANDOM_VALUE.to_string(), random);
    }

    /// Independent copy of the buffer for a report.
    pub fn snapshot(&self) -> MetricSet {
        self.metrics.clone()
    }

    pub fn poll_count(&self) -> i64 {
        self.poll_count
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Dual-interval scheduler: polls the collector every `poll_interval` and
/// hands the whole buffer to the sender every `report_interval`.
pub struct Agent {
    collector: Box<dyn Collector>,
    sender: Arc<dyn MetricSender>,
    poll_interval: Duration,
    report_interval: Duration,
    state: Arc<Mutex<AgentState>>,
}

impl Agent {
    pub fn new(
        collector: Box<dyn Collector>,
        sender: Arc<dyn MetricSender>,
        poll_interval: Duration,
        report_interval: Duration,
    ) -> Self {
        Self {
            collector,
            sender,
            poll_interval,
            report_interval,
            state: Arc::new(Mutex::new(AgentState::new())),
        }
    }

    /// Shared handle to the buffer, for inspection while the agent runs.
    pub fn state(&self) -> Arc<Mutex<AgentState>> {
        Arc::clone(&self.state)
    }

    /// Runs both loops until the future is dropped.
    ///
    /// The two loops share one task. Reports clone the buffer under the lock
    /// and send after releasing it, so a slow server never holds up polling.
    pub async fn run(self) {
        let Agent {
            mut collector,
            sender,
            poll_interval,
            report_interval,
            state,
        } = self;

        tracing::info!(
            collector = collector.name(),
            poll_ms = poll_interval.as_millis() as u64,
            report_ms = report_interval.as_millis() as u64,
            "Starting agent loops"
        );

        tokio::join!(
            poll_loop(collector.as_mut(), &state, poll_interval),
            report_loop(sender.as_ref(), &state, report_interval),
        );
    }
}

async fn poll_loop(collector: &mut dyn Collector, state: &Mutex<AgentState>, period: Duration) {
    let mut tick = ticker(period);
    loop {
        tick.tick().await;
        let sample = collector.collect();

        let mut state = state.lock().await;
        state.record_poll(sample, random_sample());
        tracing::debug!(poll_count = state.poll_count(), size = state.len(), "Polled metrics");
    }
}

async fn report_loop(sender: &dyn MetricSender, state: &Mutex<AgentState>, period: Duration) {
    let mut tick = ticker(period);
    loop {
        tick.tick().await;
        let snapshot = state.lock().await.snapshot();
        if snapshot.is_empty() {
            tracing::debug!("Nothing polled yet, skipping report");
            continue;
        }

        match sender.send_metrics(&snapshot).await {
            Ok(()) => tracing::debug!(count = snapshot.len(), "Metrics reported"),
            Err(e) => tracing::warn!(error = %e, "Failed to send metrics, retrying next report"),
        }
    }
}

/// First tick fires one full period after start.
fn ticker(period: Duration) -> Interval {
    let mut tick = interval_at(Instant::now() + period, period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tick
}

/// Always strictly positive.
fn random_sample() -> f64 {
    rand::thread_rng().gen_range(1.0..1_000_000.0)
}
