//! State machine behind the "Test model" console.
//!
//! Requests run on worker threads and report back over a channel that the UI
//! drains once per frame with [`ClassificationRequestController::poll`]. Only
//! the completion matching the most recently issued request id is applied;
//! anything older is dropped on arrival.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;
use std::time::{Duration, Instant};

use super::api::{Classifier, PredictResponse, PredictionResult, ServingMode};
use super::errors::{ClassifyError, remediation_message};
use super::history::PredictionHistoryLog;
use crate::settings::{AUTO_CLASSIFY_DEBOUNCE, AUTO_CLASSIFY_MIN_CHARS};
use crate::timefmt;

/// Auto-classify tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoClassify {
    pub debounce: Duration,
    pub min_chars: usize,
}

impl Default for AutoClassify {
    fn default() -> Self {
        Self {
            debounce: AUTO_CLASSIFY_DEBOUNCE,
            min_chars: AUTO_CLASSIFY_MIN_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Explicit,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRequest {
    request_id: u64,
    text: String,
}

struct Completion {
    request_id: u64,
    result: Result<PredictResponse, ClassifyError>,
}

pub struct ClassificationRequestController {
    classifier: Arc<dyn Classifier>,
    tuning: AutoClassify,
    input: String,
    result: Option<PredictionResult>,
    error: Option<String>,
    history: PredictionHistoryLog,
    last_submitted: Option<String>,
    debounce_deadline: Option<Instant>,
    pending: Option<PendingRequest>,
    next_request_id: u64,
    server_mode: Option<ServingMode>,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
    shut_down: bool,
}

impl ClassificationRequestController {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self::with_tuning(classifier, AutoClassify::default())
    }

    pub fn with_tuning(classifier: Arc<dyn Classifier>, tuning: AutoClassify) -> Self {
        let (completion_tx, completion_rx) = channel();
        Self {
            classifier,
            tuning,
            input: String::new(),
            result: None,
            error: None,
            history: PredictionHistoryLog::default(),
            last_submitted: None,
            debounce_deadline: None,
            pending: None,
            next_request_id: 1,
            server_mode: None,
            completion_tx,
            completion_rx,
            shut_down: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &PredictionHistoryLog {
        &self.history
    }

    pub fn last_submitted(&self) -> Option<&str> {
        self.last_submitted.as_deref()
    }

    /// Mode reported by the most recent successful prediction.
    pub fn server_mode(&self) -> Option<ServingMode> {
        self.server_mode
    }

    pub fn endpoint(&self) -> &str {
        self.classifier.endpoint()
    }

    /// Whether the classify button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.shut_down && !self.is_loading() && !self.input.trim().is_empty()
    }

    /// When the UI should next call [`Self::poll`] without user input.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce_deadline
    }

    /// Record an edit to the input box and restart the debounce timer.
    pub fn set_input(&mut self, text: impl Into<String>, now: Instant) {
        if self.shut_down {
            return;
        }
        let text = text.into();
        if text == self.input {
            return;
        }
        self.input = text;
        self.debounce_deadline = Some(now + self.tuning.debounce);
    }

    /// Submit the current input immediately. Blank input is ignored.
    ///
    /// Returns the id of the dispatched request.
    pub fn classify_now(&mut self) -> Option<u64> {
        if self.shut_down {
            return None;
        }
        self.debounce_deadline = None;
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.dispatch(text, Trigger::Explicit)
    }

    /// Load a sample prompt and classify it right away.
    pub fn use_sample(&mut self, text: &str) -> Option<u64> {
        if self.shut_down {
            return None;
        }
        self.input = text.to_string();
        self.classify_now()
    }

    /// Reset the console. History is kept; any in-flight response is ignored
    /// and its text no longer counts as already submitted.
    pub fn clear(&mut self) {
        self.input.clear();
        self.result = None;
        self.error = None;
        self.debounce_deadline = None;
        self.last_submitted = None;
        if let Some(pending) = self.pending.take() {
            tracing::debug!("Abandoning classification request #{}", pending.request_id);
        }
    }

    /// Fire an expired debounce timer, then apply finished requests.
    ///
    /// Returns `true` when visible state changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.shut_down {
            return false;
        }
        let mut changed = false;
        if self.debounce_deadline.is_some_and(|deadline| deadline <= now) {
            self.debounce_deadline = None;
            changed |= self.auto_submit();
        }
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => changed |= self.apply_completion(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Stop reacting: no further requests are issued and late completions are
    /// discarded.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        self.debounce_deadline = None;
        self.pending = None;
    }

    fn auto_submit(&mut self) -> bool {
        let text = self.input.trim();
        if text.chars().count() < self.tuning.min_chars {
            return false;
        }
        if self.last_submitted.as_deref() == Some(text) {
            tracing::debug!("Skipping auto-classify; input unchanged since last submit");
            return false;
        }
        let text = text.to_string();
        self.dispatch(text, Trigger::Auto).is_some()
    }

    fn next_request_id(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        request_id
    }

    fn dispatch(&mut self, text: String, trigger: Trigger) -> Option<u64> {
        let request_id = self.next_request_id();
        let classifier = Arc::clone(&self.classifier);
        let tx = self.completion_tx.clone();
        let job_text = text.clone();
        let spawned = thread::Builder::new()
            .name(format!("classify-{request_id}"))
            .spawn(move || {
                let result = classifier.classify(&job_text);
                let _ = tx.send(Completion { request_id, result });
            });
        self.result = None;
        if let Err(err) = spawned {
            tracing::warn!("Failed to start classification request: {err}");
            self.pending = None;
            self.error = Some(remediation_message(
                &ClassifyError::Transport(err.to_string()),
                self.classifier.endpoint(),
            ));
            return None;
        }
        tracing::debug!("Classification request #{request_id} dispatched ({trigger:?})");
        self.error = None;
        self.last_submitted = Some(text.clone());
        self.pending = Some(PendingRequest { request_id, text });
        Some(request_id)
    }

    fn apply_completion(&mut self, completion: Completion) -> bool {
        let Some(pending) = self.pending.as_ref() else {
            return false;
        };
        if completion.request_id != pending.request_id {
            tracing::debug!(
                "Discarding stale classification response #{}",
                completion.request_id
            );
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match completion
            .result
            .and_then(|response| response.into_result(&pending.text, timefmt::now_local()))
        {
            Ok(result) => {
                self.server_mode = Some(result.mode);
                self.history.append(result.clone());
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!("Classification request #{} failed: {err}", pending.request_id);
                self.result = None;
                self.error = Some(remediation_message(&err, self.classifier.endpoint()));
            }
        }
        true
    }
}

impl Drop for ClassificationRequestController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
