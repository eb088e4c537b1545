//! Session state: the object the presentation layer drives
//!
//! A `SessionState` is created when a user session starts and dropped when
//! it ends. UI events map one-to-one onto its methods; rendering reads
//! [`SessionState::view`].
//!
//! ```rust
//! use osiris_core::{DashboardConfig, Page, SessionState};
//!
//! let config = DashboardConfig::builder().sample_seed(1).build()?;
//! let mut session = SessionState::new(config);
//! assert_eq!(session.selection().current_page, Page::Welcome);
//!
//! session.create_experiment("Cord blood expansion")?;
//! let reply = session.submit_chat_message("Hello")?;
//! assert!(reply.starts_with("Hello!"));
//!
//! let view = session.view();
//! assert_eq!(view.page, Page::Dashboard);
//! assert_eq!(view.active.map(|a| a.chat_history.len()), Some(3));
//! # Ok::<(), osiris_core::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::experiment::{
    ArtifactSummary, ChatMessage, Experiment, ExperimentContext, ExperimentId, ExperimentStore,
    UploadedArtifact,
};
use crate::metrics::{
    generate_sample_dataset, key_metrics, top_expressed_genes, DailyRecord, KeyMetrics,
    GeneExpressionEntry, LineageAssessment,
};
use crate::predict::{
    ClassProbability, InFlightGuard, InFlightRegistry, PredictionClient, PredictionResult,
    PredictionStatus,
};
use crate::recommend::respond;
use crate::{Error, Result};

/// Number of genes shown in the expression chart.
pub const TOP_GENE_COUNT: usize = 10;

/// Top-level pages of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    /// Landing page
    #[default]
    Welcome,
    /// Experiment dashboard
    Dashboard,
    /// Account settings
    Account,
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSelection {
    /// Selected experiment, if any
    pub current_experiment_id: Option<ExperimentId>,
    /// Visible page
    pub current_page: Page,
}

/// Status message shown when a ticket was dropped without being finished.
pub const ABANDONED_PREDICTION: &str =
    "Prediction was cancelled before it finished. Run it again to get results.";

/// A claimed prediction slot plus the artifact to submit.
///
/// Obtained from [`SessionState::begin_prediction`]; hand it back to
/// [`SessionState::finish_prediction`] once the request resolves. Dropping
/// it without finishing (a cancelled task) releases the slot; the view then
/// reports the prediction as failed with [`ABANDONED_PREDICTION`] and a new
/// prediction can be started right away.
#[derive(Debug)]
pub struct PredictionTicket {
    artifact: UploadedArtifact,
    guard: InFlightGuard,
}

impl PredictionTicket {
    /// Experiment the prediction belongs to.
    #[must_use]
    pub const fn experiment_id(&self) -> ExperimentId {
        self.guard.experiment_id()
    }

    /// Artifact to submit.
    #[must_use]
    pub const fn artifact(&self) -> &UploadedArtifact {
        &self.artifact
    }
}

/// Everything the dashboard renders for the active experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentView {
    /// The experiment itself
    pub experiment: Experiment,
    /// Dataset snapshot
    pub dataset: Vec<DailyRecord>,
    /// Latest scores with day-over-day deltas
    pub key_metrics: Option<KeyMetrics>,
    /// Most expressed genes of the latest day
    pub top_genes: Vec<GeneExpressionEntry>,
    /// Lineage bias read-out of the latest day
    pub lineage_assessment: Option<LineageAssessment>,
    /// Chat transcript
    pub chat_history: Vec<ChatMessage>,
    /// Uploaded file details
    pub artifact: Option<ArtifactSummary>,
    /// HSC fate predictions
    pub hsc_predictions: Vec<ClassProbability>,
    /// Lineage bias predictions
    pub lineage_predictions: Vec<ClassProbability>,
    /// Prediction progress
    pub prediction_status: PredictionStatus,
}

/// Full view model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Visible page
    pub page: Page,
    /// Sidebar entries in creation order
    pub experiments: Vec<Experiment>,
    /// Active experiment, if one is selected
    pub active: Option<ExperimentView>,
}

/// Per-user session: experiments, their contexts and the active selection.
#[derive(Debug)]
pub struct SessionState {
    config: DashboardConfig,
    store: ExperimentStore,
    page: Page,
    in_flight: InFlightRegistry,
}

impl SessionState {
    /// Start a session on the Welcome page with no experiments.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            store: ExperimentStore::new(),
            page: Page::Welcome,
            in_flight: InFlightRegistry::new(),
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Read access to the experiment store.
    #[must_use]
    pub const fn store(&self) -> &ExperimentStore {
        &self.store
    }

    /// Registry of running predictions.
    #[must_use]
    pub const fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> ActiveSelection {
        ActiveSelection {
            current_experiment_id: self.store.active_id(),
            current_page: self.page,
        }
    }

    /// Switch pages. The selected experiment is kept.
    pub fn navigate(&mut self, page: Page) {
        debug!(?page, "navigate");
        self.page = page;
    }

    /// Create an experiment, select it, seed its dataset and open the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name or when the dataset
    /// cannot be generated; nothing changes then.
    pub fn create_experiment(&mut self, name: &str) -> Result<Experiment> {
        let records =
            generate_sample_dataset(self.config.sample_days(), self.config.sample_seed())?;
        let experiment = self.store.create(name)?;
        self.store.get_context(experiment.id())?.replace_dataset(records);
        self.page = Page::Dashboard;
        Ok(experiment)
    }

    /// Select an experiment and open its dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id; the selection is kept.
    pub fn select_experiment(&mut self, id: ExperimentId) -> Result<Experiment> {
        self.ensure_dataset(id)?;
        let experiment = self.store.select(id)?;
        self.page = Page::Dashboard;
        Ok(experiment)
    }

    /// Replace the active experiment's dataset with a fresh sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveExperiment`] when nothing is selected.
    pub fn regenerate_dataset(&mut self, seed: Option<u64>) -> Result<()> {
        let id = self.active_id()?;
        let records = generate_sample_dataset(self.config.sample_days(), seed)?;
        self.store.get_context(id)?.replace_dataset(records);
        info!(experiment = %id, "regenerated dataset");
        Ok(())
    }

    /// Append a user message and the assistant's reply to the active chat.
    /// Returns the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank text and
    /// [`Error::NoActiveExperiment`] when nothing is selected.
    pub fn submit_chat_message(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()));
        }
        let id = self.active_id()?;
        self.ensure_dataset(id)?;

        let ctx = self.store.get_context(id)?;
        let reply = match ctx.latest_record() {
            Some(record) => respond(text, record),
            None => return Err(Error::Other("dataset is empty".to_string())),
        };
        ctx.push_chat(ChatMessage::user(text));
        ctx.push_chat(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Attach an artifact to the active experiment, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveExperiment`] when nothing is selected.
    pub fn upload_artifact(&mut self, artifact: UploadedArtifact) -> Result<()> {
        let id = self.active_id()?;
        info!(
            experiment = %id,
            file = artifact.file_name(),
            size = %artifact.size_label(),
            "artifact uploaded"
        );
        self.store.get_context(id)?.set_artifact(artifact);
        Ok(())
    }

    /// Remove the active experiment's artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveExperiment`] when nothing is selected.
    pub fn clear_artifact(&mut self) -> Result<Option<UploadedArtifact>> {
        let id = self.active_id()?;
        Ok(self.store.get_context(id)?.clear_artifact())
    }

    /// Claim the active experiment's prediction slot and mark it `Pending`.
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveExperiment`] when nothing is selected
    /// - [`Error::Validation`] when no artifact is uploaded
    /// - [`Error::PredictionInFlight`] when a prediction is already running
    pub fn begin_prediction(&mut self) -> Result<PredictionTicket> {
        let id = self.active_id()?;
        let ctx = self.store.get_context(id)?;
        let artifact = ctx
            .uploaded_artifact()
            .cloned()
            .ok_or_else(|| Error::Validation("upload a file before running a prediction".to_string()))?;

        let guard = claim_slot(&self.in_flight, id)?;
        ctx.mark_pending();
        Ok(PredictionTicket { artifact, guard })
    }

    /// Write a prediction outcome to the ticket's experiment and release
    /// its slot. The experiment does not need to be active any more.
    ///
    /// On failure the earlier predictions are kept and the status becomes
    /// `Failed`; the error is handed back so callers can surface it.
    ///
    /// # Errors
    ///
    /// Returns the prediction error unchanged, or [`Error::NotFound`] if the
    /// ticket does not belong to this session.
    pub fn finish_prediction(
        &mut self,
        ticket: PredictionTicket,
        outcome: Result<PredictionResult>,
    ) -> Result<()> {
        let id = ticket.experiment_id();
        let ctx = self.store.get_context(id)?;
        let result = match outcome {
            Ok(result) => {
                info!(experiment = %id, message = %result.message, "prediction stored");
                ctx.apply_prediction(result);
                Ok(())
            }
            Err(err) => {
                warn!(experiment = %id, error = %err, "prediction failed");
                ctx.record_failure(err.to_string());
                Err(err)
            }
        };
        drop(ticket);
        result
    }

    /// Upload `artifact` to the active experiment and run a prediction.
    ///
    /// Convenience for callers that do not interleave other events; use
    /// [`begin_prediction`](Self::begin_prediction) /
    /// [`finish_prediction`](Self::finish_prediction) to keep the session
    /// usable while the request runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PredictionInFlight`] without touching the current
    /// artifact when a prediction is already running, otherwise any error
    /// of the individual steps.
    pub async fn upload_and_predict(
        &mut self,
        client: &PredictionClient,
        artifact: UploadedArtifact,
    ) -> Result<()> {
        let id = self.active_id()?;
        let guard = claim_slot(&self.in_flight, id)?;
        let ticket = PredictionTicket {
            artifact: artifact.clone(),
            guard,
        };
        self.upload_artifact(artifact)?;
        self.store.get_context(id)?.mark_pending();

        let outcome = client.submit(ticket.artifact()).await;
        self.finish_prediction(ticket, outcome)
    }

    /// Build the view model for the current state.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        let active = self
            .store
            .active()
            .zip(self.store.active_id().and_then(|id| self.store.context(id)))
            .map(|(experiment, ctx)| {
                let abandoned = ctx.prediction_status().is_pending()
                    && !self.in_flight.is_in_flight(experiment.id());
                experiment_view(experiment, ctx, abandoned)
            });

        DashboardView {
            page: self.page,
            experiments: self.store.list().to_vec(),
            active,
        }
    }

    fn active_id(&self) -> Result<ExperimentId> {
        self.store.active_id().ok_or(Error::NoActiveExperiment)
    }

    fn ensure_dataset(&mut self, id: ExperimentId) -> Result<()> {
        let days = self.config.sample_days();
        let seed = self.config.sample_seed();
        let ctx = self.store.get_context(id)?;
        if ctx.dataset().is_none() {
            ctx.replace_dataset(generate_sample_dataset(days, seed)?);
            debug!(experiment = %id, days, "generated dataset");
        }
        Ok(())
    }
}

fn claim_slot(in_flight: &InFlightRegistry, id: ExperimentId) -> Result<InFlightGuard> {
    in_flight.try_acquire(id).ok_or_else(|| {
        warn!(experiment = %id, "prediction already running");
        Error::PredictionInFlight(id)
    })
}

fn experiment_view(
    experiment: &Experiment,
    ctx: &ExperimentContext,
    abandoned: bool,
) -> ExperimentView {
    let dataset = ctx.dataset().unwrap_or_default();
    let latest = ctx.latest_record();

    ExperimentView {
        experiment: experiment.clone(),
        dataset: dataset.to_vec(),
        key_metrics: key_metrics(dataset),
        top_genes: latest
            .map(|record| top_expressed_genes(record, TOP_GENE_COUNT))
            .unwrap_or_default(),
        lineage_assessment: latest.map(LineageAssessment::of),
        chat_history: ctx.chat_history().to_vec(),
        artifact: ctx.uploaded_artifact().map(UploadedArtifact::summary),
        hsc_predictions: ctx.hsc_predictions().to_vec(),
        lineage_predictions: ctx.lineage_predictions().to_vec(),
        prediction_status: if abandoned {
            PredictionStatus::Failed {
                message: ABANDONED_PREDICTION.to_string(),
            }
        } else {
            ctx.prediction_status().clone()
        },
    }
}
