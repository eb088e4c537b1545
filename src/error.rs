//! Error types for osiris-core
//!
//! Every failure is scoped to the action that triggered it: the session keeps
//! its prior state and the message is meant to be shown to the user as-is.

use thiserror::Error;

use crate::experiment::ExperimentId;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// osiris-core error types
#[derive(Error, Debug)]
pub enum Error {
    /// Bad user input (empty experiment name, unsupported file type, ...)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unknown experiment id (navigation should never produce one)
    #[error("Experiment {0} not found")]
    NotFound(ExperimentId),

    /// An action needed an active experiment but none is selected
    #[error("No experiment selected\nCreate a new experiment or select one from the sidebar.")]
    NoActiveExperiment,

    /// A prediction for this experiment is still running
    #[error("A prediction is already running for experiment {0}\nWait for it to finish before submitting again.")]
    PredictionInFlight(ExperimentId),

    /// Could not reach the prediction backend (connection failure or timeout)
    #[error("Could not connect to backend: {0}")]
    Network(String),

    /// The prediction backend answered with a non-200 status
    #[error("Server returned an error: {status}\n{body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The prediction backend answered 200 with an unexpected body
    #[error("Malformed prediction response: {0}")]
    MalformedResponse(String),

    /// Configuration value could not be parsed or is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error originated from the remote prediction backend.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Server { .. } | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}
