//! Per-experiment mutual exclusion for prediction round-trips

use std::sync::Arc;

use dashmap::DashSet;
use tracing::debug;

use crate::experiment::ExperimentId;

/// Set of experiments with a prediction currently running.
///
/// Cloning shares the underlying set, so guards acquired from any clone
/// exclude each other. Thread-safe: guards may be moved into spawned tasks.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<DashSet<ExperimentId>>,
}

impl InFlightRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for one prediction. Returns `None` if it is already claimed.
    #[must_use]
    pub fn try_acquire(&self, id: ExperimentId) -> Option<InFlightGuard> {
        if self.active.insert(id) {
            debug!(experiment = %id, "prediction slot acquired");
            Some(InFlightGuard {
                id,
                active: Arc::clone(&self.active),
            })
        } else {
            None
        }
    }

    /// Whether a prediction is running for `id`.
    #[must_use]
    pub fn is_in_flight(&self, id: ExperimentId) -> bool {
        self.active.contains(&id)
    }

    /// Number of experiments with a running prediction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no prediction is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Claim on an experiment's prediction slot, released on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    id: ExperimentId,
    active: Arc<DashSet<ExperimentId>>,
}

impl InFlightGuard {
    /// The claimed experiment.
    #[must_use]
    pub const fn experiment_id(&self) -> ExperimentId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.id);
        debug!(experiment = %self.id, "prediction slot released");
    }
}
