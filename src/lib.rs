//! # Osiris Core: HSC Expansion Dashboard Session Engine
//!
//! **Version**: 0.1.0
//!
//! Osiris Core holds everything behind the hematopoietic stem cell (HSC)
//! expansion dashboard except the widgets: experiments and their per-user
//! contexts, the toy metric engine that fills charts, the rule-based protocol
//! assistant, and the client for the remote fate/lineage prediction backend.
//!
//! ## Layers
//!
//! - [`experiment`]: experiment records, contexts and the store
//! - [`metrics`]: scoring heuristics, synthetic datasets, dashboard read-outs
//! - [`recommend`]: keyword chat replies and protocol suggestions
//! - [`predict`]: wire types, HTTP client and in-flight tracking
//! - [`session`]: the state object the presentation layer drives
//!
//! ## Example Usage
//!
//! ```rust
//! use osiris_core::{DashboardConfig, SessionState, UploadedArtifact};
//!
//! let config = DashboardConfig::builder().sample_seed(7).build()?;
//! let mut session = SessionState::new(config);
//!
//! let experiment = session.create_experiment("Cord blood expansion")?;
//! session.submit_chat_message("What about myeloid output?")?;
//!
//! let artifact = UploadedArtifact::new("day14.csv", b"gene,count\nGATA2,12\n".to_vec())?;
//! session.upload_artifact(artifact)?;
//!
//! let view = session.view();
//! let active = view.active.expect("experiment is selected");
//! assert_eq!(active.experiment.id(), experiment.id());
//! assert_eq!(active.artifact.map(|a| a.file_name), Some("day14.csv".to_string()));
//! # Ok::<(), osiris_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod predict;
pub mod recommend;
pub mod session;

pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use experiment::{Experiment, ExperimentId, UploadedArtifact};
pub use predict::{PredictionClient, PredictionResult, PredictionStatus};
pub use session::{ActiveSelection, DashboardView, Page, SessionState};
