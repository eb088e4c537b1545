//! Experiment Context - mutable per-experiment state

use crate::metrics::DailyRecord;
use crate::predict::{ClassProbability, PredictionResult, PredictionStatus};
use crate::recommend::ASSISTANT_GREETING;

use super::{ChatMessage, ExperimentId, UploadedArtifact};

/// Everything the dashboard tracks for a single experiment.
///
/// A context is created lazily by the store the first time an experiment's
/// state is touched, and lives as long as the session. It is never shared
/// between experiments.
#[derive(Debug, Clone)]
pub struct ExperimentContext {
    experiment_id: ExperimentId,
    dataset: Option<Vec<DailyRecord>>,
    uploaded_artifact: Option<UploadedArtifact>,
    hsc_predictions: Vec<ClassProbability>,
    lineage_predictions: Vec<ClassProbability>,
    chat_history: Vec<ChatMessage>,
    prediction_status: PredictionStatus,
}

impl ExperimentContext {
    /// Create an empty context. The chat transcript starts with the
    /// assistant's greeting.
    #[must_use]
    pub fn new(experiment_id: ExperimentId) -> Self {
        Self {
            experiment_id,
            dataset: None,
            uploaded_artifact: None,
            hsc_predictions: Vec::new(),
            lineage_predictions: Vec::new(),
            chat_history: vec![ChatMessage::assistant(ASSISTANT_GREETING)],
            prediction_status: PredictionStatus::Idle,
        }
    }

    /// Get the owning experiment's ID.
    #[must_use]
    pub const fn experiment_id(&self) -> ExperimentId {
        self.experiment_id
    }

    /// Get the current dataset, if one has been generated.
    #[must_use]
    pub fn dataset(&self) -> Option<&[DailyRecord]> {
        self.dataset.as_deref()
    }

    /// Get the most recent daily record.
    #[must_use]
    pub fn latest_record(&self) -> Option<&DailyRecord> {
        self.dataset.as_ref().and_then(|records| records.last())
    }

    /// Replace the dataset wholesale. Records are never edited in place.
    pub fn replace_dataset(&mut self, records: Vec<DailyRecord>) {
        self.dataset = Some(records);
    }

    /// Get the uploaded artifact, if any.
    #[must_use]
    pub const fn uploaded_artifact(&self) -> Option<&UploadedArtifact> {
        self.uploaded_artifact.as_ref()
    }

    /// Attach an artifact, replacing any previous upload.
    pub fn set_artifact(&mut self, artifact: UploadedArtifact) {
        self.uploaded_artifact = Some(artifact);
    }

    /// Detach the artifact and return it.
    pub fn clear_artifact(&mut self) -> Option<UploadedArtifact> {
        self.uploaded_artifact.take()
    }

    /// HSC fate predictions from the last successful round-trip.
    #[must_use]
    pub fn hsc_predictions(&self) -> &[ClassProbability] {
        &self.hsc_predictions
    }

    /// Lineage bias predictions from the last successful round-trip.
    #[must_use]
    pub fn lineage_predictions(&self) -> &[ClassProbability] {
        &self.lineage_predictions
    }

    /// Get the chat transcript in order.
    #[must_use]
    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    /// Append a chat message.
    pub fn push_chat(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
    }

    /// Get the prediction status.
    #[must_use]
    pub const fn prediction_status(&self) -> &PredictionStatus {
        &self.prediction_status
    }

    pub(crate) fn mark_pending(&mut self) {
        self.prediction_status = PredictionStatus::Pending;
    }

    /// Store a successful prediction, replacing earlier results.
    pub fn apply_prediction(&mut self, result: PredictionResult) {
        let PredictionResult {
            message,
            hsc_predictions,
            lineage_predictions,
        } = result;
        self.hsc_predictions = hsc_predictions;
        self.lineage_predictions = lineage_predictions;
        self.prediction_status = PredictionStatus::Succeeded { message };
    }

    /// Record a failed prediction. Earlier results stay untouched.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.prediction_status = PredictionStatus::Failed {
            message: message.into(),
        };
    }
}
