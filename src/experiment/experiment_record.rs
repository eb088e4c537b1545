//! Experiment - root entity of a dashboard session

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Strongly typed experiment identifier.
///
/// Ids are assigned by the [`ExperimentStore`](super::ExperimentStore) starting
/// at 1 and are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentId(u32);

impl ExperimentId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw numeric id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ExperimentId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Experiment represents one user-created experiment tab.
///
/// Experiments are immutable once created. All mutable per-experiment state
/// lives in the matching [`ExperimentContext`](super::ExperimentContext).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Experiment {
    id: ExperimentId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Experiment {
    /// Create a new experiment stamped with the current time.
    ///
    /// The store validates the name; this constructor does not.
    #[must_use]
    pub fn new(id: ExperimentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub const fn id(&self) -> ExperimentId {
        self.id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
