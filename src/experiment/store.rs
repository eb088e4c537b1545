//! Experiment Store - in-memory registry of a session's experiments
//!
//! Experiments are kept in insertion order; their contexts live in a
//! separate id-keyed map and are materialized on first access.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::{Experiment, ExperimentContext, ExperimentId};
use crate::{Error, Result};

/// In-memory store for a session's experiments.
///
/// ## Design
///
/// - `experiments` preserves creation order, which is also the sidebar order.
/// - `contexts` maps each id to its mutable state. A context is only ever
///   created for an id present in `experiments`, so there are no orphans.
/// - `active` is the currently selected experiment.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    experiments: Vec<Experiment>,
    contexts: FxHashMap<ExperimentId, ExperimentContext>,
    active: Option<ExperimentId>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store has no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Get the number of experiments in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Create an experiment and make it the active one.
    ///
    /// The id is `count + 1`; experiments are never deleted, so ids are
    /// unique and monotonic. An empty context is materialized for the new id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `name` is empty or whitespace.
    ///
    /// # Example
    ///
    /// ```rust
    /// use osiris_core::experiment::ExperimentStore;
    ///
    /// let mut store = ExperimentStore::new();
    /// let first = store.create("Cord blood expansion")?;
    /// let second = store.create("Mobilized PB")?;
    ///
    /// assert_eq!(first.id().get(), 1);
    /// assert_eq!(second.id().get(), 2);
    /// assert_eq!(store.active_id(), Some(second.id()));
    /// # Ok::<(), osiris_core::Error>(())
    /// ```
    pub fn create(&mut self, name: &str) -> Result<Experiment> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(
                "experiment name must not be empty".to_string(),
            ));
        }

        let next = u32::try_from(self.experiments.len() + 1)
            .map_err(|_| Error::Other("experiment id space exhausted".to_string()))?;
        let experiment = Experiment::new(ExperimentId::new(next), name);
        let id = experiment.id();

        self.experiments.push(experiment.clone());
        self.active = Some(id);
        self.materialize(id);

        info!(experiment = %id, name, "created experiment");
        Ok(experiment)
    }

    /// List experiments in creation order.
    #[must_use]
    pub fn list(&self) -> &[Experiment] {
        &self.experiments
    }

    /// Get an experiment by ID.
    #[must_use]
    pub fn get(&self, id: ExperimentId) -> Option<&Experiment> {
        self.experiments.iter().find(|experiment| experiment.id() == id)
    }

    /// Make `id` the active experiment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no experiment has that id. The active
    /// selection is left unchanged in that case.
    pub fn select(&mut self, id: ExperimentId) -> Result<Experiment> {
        let experiment = self.get(id).cloned().ok_or(Error::NotFound(id))?;
        self.active = Some(id);
        info!(experiment = %id, "selected experiment");
        Ok(experiment)
    }

    /// Get the active experiment's ID.
    #[must_use]
    pub const fn active_id(&self) -> Option<ExperimentId> {
        self.active
    }

    /// Get the active experiment.
    #[must_use]
    pub fn active(&self) -> Option<&Experiment> {
        self.active.and_then(|id| self.get(id))
    }

    /// Get the context for `id`, creating it on first access.
    ///
    /// Repeated calls return the same context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no experiment has that id.
    pub fn get_context(&mut self, id: ExperimentId) -> Result<&mut ExperimentContext> {
        if self.get(id).is_none() {
            return Err(Error::NotFound(id));
        }
        Ok(self.materialize(id))
    }

    /// Get an existing context without creating one.
    #[must_use]
    pub fn context(&self, id: ExperimentId) -> Option<&ExperimentContext> {
        self.contexts.get(&id)
    }

    fn materialize(&mut self, id: ExperimentId) -> &mut ExperimentContext {
        self.contexts.entry(id).or_insert_with(|| {
            debug!(experiment = %id, "materialized experiment context");
            ExperimentContext::new(id)
        })
    }
}
