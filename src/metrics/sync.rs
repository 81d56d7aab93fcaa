//! Background reconciliation of the snapshot store with the metrics source.
//!
//! The scheduler thread only fetches; the resulting [`SyncOutcome`] is sent to
//! the UI thread, which applies it with [`super::MetricsSnapshotStore::merge`].
//! Ticks never overlap: a slot that arrives while a tick is still running is
//! skipped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::api::{MetricsSource, SyncError};
use super::store::SyncOutcome;

/// How often a sleeping scheduler checks for cancellation.
const CANCEL_POLL: Duration = Duration::from_millis(100);
const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Handle to the running sync thread. Dropping it stops the thread.
pub struct MetricsSyncScheduler {
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MetricsSyncScheduler {
    /// Spawn the sync thread. The first tick runs immediately.
    pub fn start(
        source: Arc<dyn MetricsSource>,
        period: Duration,
        outcomes: Sender<SyncOutcome>,
    ) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let period = period.max(MIN_PERIOD);
        let handle = thread::Builder::new()
            .name("metrics-sync".into())
            .spawn(move || run_loop(source.as_ref(), period, &outcomes, &flag));
        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!("Metrics sync disabled; failed to spawn thread: {err}");
                None
            }
        };
        Self { cancel, handle }
    }

    /// Ask the thread to stop. It never starts another tick, and a tick that is
    /// still fetching drops its outcome instead of sending it.
    ///
    /// The thread is not joined: an in-flight request may take up to the HTTP
    /// timeout to give up.
    pub fn stop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.handle.take();
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for MetricsSyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    source: &dyn MetricsSource,
    period: Duration,
    outcomes: &Sender<SyncOutcome>,
    cancel: &AtomicBool,
) {
    let mut slot = Instant::now();
    while sleep_until(slot, cancel) {
        let outcome = run_tick(source);
        // Checked after the fetch so a stop issued mid-tick suppresses the send.
        if cancel.load(Ordering::SeqCst) || outcomes.send(outcome).is_err() {
            break;
        }
        slot = next_slot(slot, period, Instant::now());
    }
    tracing::debug!("Metrics sync thread exiting");
}

/// Fetch both artifacts concurrently, logging and discarding failures.
pub fn run_tick(source: &dyn MetricsSource) -> SyncOutcome {
    let (evaluation, history) = thread::scope(|scope| {
        let evaluation = scope.spawn(|| source.evaluation());
        let history = source.training_history();
        let evaluation = evaluation.join().unwrap_or_else(|_| {
            Err(SyncError::Transport(
                "evaluation fetch panicked".to_string(),
            ))
        });
        (evaluation, history)
    });
    SyncOutcome {
        evaluation: keep_success("evaluation", evaluation),
        history: keep_success("training history", history),
    }
}

fn keep_success<T>(what: &str, result: Result<T, SyncError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Metrics sync: {what} unavailable, keeping previous values: {err}");
            None
        }
    }
}

/// Sleep until `deadline`, returning `false` early if cancelled.
fn sleep_until(deadline: Instant, cancel: &AtomicBool) -> bool {
    loop {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(CANCEL_POLL));
    }
}

/// First period boundary after `now`, skipping any slots a slow tick overran.
fn next_slot(previous: Instant, period: Duration, now: Instant) -> Instant {
    let mut next = previous + period;
    while next <= now {
        next += period;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::api::{EvaluationArtifact, HistoryArtifact};
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    #[derive(Default)]
    struct FakeSource {
        delay: Duration,
        fail_history: bool,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MetricsSource for FakeSource {
        fn evaluation(&self) -> Result<EvaluationArtifact, SyncError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(serde_json::from_str(
                r#"{"metrics":{"accuracy":0.5,"f1_weighted":0.5,"f1_macro":0.5,"mcc":0.0}}"#,
            )?)
        }

        fn training_history(&self) -> Result<HistoryArtifact, SyncError> {
            if self.fail_history {
                return Err(SyncError::Status(503));
            }
            Ok(HistoryArtifact::default())
        }
    }

    #[test]
    fn tick_keeps_successful_artifacts_only() {
        let source = FakeSource {
            fail_history: true,
            ..FakeSource::default()
        };
        let outcome = run_tick(&source);
        assert!(outcome.evaluation.is_some());
        assert!(outcome.history.is_none());
    }

    #[test]
    fn next_slot_skips_overrun_periods() {
        let start = Instant::now();
        let period = Duration::from_secs(60);
        assert_eq!(
            next_slot(start, period, start + Duration::from_secs(1)),
            start + period
        );
        assert_eq!(
            next_slot(start, period, start + Duration::from_secs(130)),
            start + Duration::from_secs(180)
        );
    }

    #[test]
    fn first_tick_runs_immediately() {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(FakeSource::default());
        let _scheduler = MetricsSyncScheduler::start(source, Duration::from_secs(3600), tx);
        let outcome = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(outcome.evaluation.is_some());
    }

    #[test]
    fn slow_ticks_never_overlap() {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(FakeSource {
            delay: Duration::from_millis(60),
            ..FakeSource::default()
        });
        let mut scheduler =
            MetricsSyncScheduler::start(source.clone(), Duration::from_millis(20), tx);
        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(2)).unwrap();
        }
        scheduler.stop();
        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_prevents_further_outcomes() {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(FakeSource {
            delay: Duration::from_millis(50),
            ..FakeSource::default()
        });
        let mut scheduler =
            MetricsSyncScheduler::start(source.clone(), Duration::from_millis(10), tx);
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        scheduler.stop();
        assert!(!scheduler.is_running());

        thread::sleep(Duration::from_millis(120));
        while rx.try_recv().is_ok() {}
        let calls_after_stop = source.calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(250));
        assert!(rx.try_recv().is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), calls_after_stop);
    }
}
