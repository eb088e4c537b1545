//! Experiment lifecycle: records, per-experiment contexts and the store
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentStore ──< Experiment (N, insertion ordered)
//!        │                 │ 1:1, same id
//!        └──< ExperimentContext (lazy)
//!                  ├── dataset: [DailyRecord]
//!                  ├── uploaded_artifact: UploadedArtifact
//!                  ├── hsc / lineage predictions
//!                  └──< ChatMessage (N)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use osiris_core::experiment::{ChatMessage, ExperimentStore};
//!
//! let mut store = ExperimentStore::new();
//! let experiment = store.create("Cord blood expansion")?;
//!
//! let ctx = store.get_context(experiment.id())?;
//! ctx.push_chat(ChatMessage::user("How is self-renewal trending?"));
//! assert_eq!(ctx.chat_history().len(), 2);
//! # Ok::<(), osiris_core::Error>(())
//! ```

mod artifact_record;
mod chat;
mod context;
mod experiment_record;
mod store;

pub use artifact_record::{ArtifactKind, ArtifactSummary, UploadedArtifact};
pub use chat::{ChatMessage, ChatRole};
pub use context::ExperimentContext;
pub use experiment_record::{Experiment, ExperimentId};
pub use store::ExperimentStore;
