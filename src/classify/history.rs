use std::collections::VecDeque;

use super::api::PredictionResult;
use crate::settings::PREDICTION_HISTORY_CAPACITY;

/// Most recent successful classifications, newest first.
#[derive(Debug, Clone)]
pub struct PredictionHistoryLog {
    entries: VecDeque<PredictionResult>,
    capacity: usize,
}

impl Default for PredictionHistoryLog {
    fn default() -> Self {
        Self::with_capacity(PREDICTION_HISTORY_CAPACITY)
    }
}

impl PredictionHistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, dropping the oldest entries beyond capacity.
    pub fn append(&mut self, result: PredictionResult) {
        self.entries.push_front(result);
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionResult> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&PredictionResult> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
