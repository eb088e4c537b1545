//! Remote prediction: wire types, HTTP client and in-flight tracking
//!
//! ## Request cycle
//!
//! ```text
//! SessionState::begin_prediction ──► PredictionTicket (artifact + guard)
//!          │                                  │
//!          │                 PredictionClient::submit(artifact).await
//!          ▼                                  ▼
//! context: Pending     SessionState::finish_prediction(ticket, outcome)
//!                                              │
//!                         context: Succeeded / Failed, guard released
//! ```

mod client;
mod in_flight;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

pub use client::PredictionClient;
pub use in_flight::{InFlightGuard, InFlightRegistry};

/// A predicted class and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    /// Class label, e.g. "LT-HSC" or "Myeloid"
    #[serde(rename = "class")]
    pub class_name: String,
    /// Probability in [0, 1]; numeric strings are accepted on input
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub probability: f64,
}

impl ClassProbability {
    /// Create a class/probability pair.
    #[must_use]
    pub fn new(class_name: impl Into<String>, probability: f64) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// Parsed 200 response of the prediction backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Human-readable status line from the backend
    pub message: String,
    /// HSC fate predictions, in backend order
    pub hsc_predictions: Vec<ClassProbability>,
    /// Lineage bias predictions, in backend order
    pub lineage_predictions: Vec<ClassProbability>,
}

impl PredictionResult {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the body is not JSON or a
    /// required key is missing.
    ///
    /// ```rust
    /// use osiris_core::predict::PredictionResult;
    ///
    /// let body = r#"{"message": "ok", "lineage_predictions": []}"#;
    /// assert!(PredictionResult::from_json(body).is_err());
    /// ```
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|err| Error::MalformedResponse(err.to_string()))
    }
}

/// Progress of an experiment's latest prediction request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PredictionStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Request sent, waiting for the backend
    Pending,
    /// Last request succeeded
    Succeeded {
        /// Backend message
        message: String,
    },
    /// Last request failed; earlier results are kept
    Failed {
        /// Readable error
        message: String,
    },
}

impl PredictionStatus {
    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid probability '{text}'"))),
    }
}
