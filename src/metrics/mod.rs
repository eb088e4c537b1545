//! Metric engine: toy scores, synthetic datasets and dashboard read-outs
//!
//! Everything here is pure. Randomness only enters through
//! [`generate_sample_dataset`], and a fixed seed makes it reproducible.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use osiris_core::metrics::{generate_sample_dataset_ending, key_metrics, LineageAssessment};
//!
//! let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let dataset = generate_sample_dataset_ending(30, Some(42), end)?;
//!
//! let metrics = key_metrics(&dataset).unwrap();
//! assert!((0.0..=100.0).contains(&metrics.self_renewal.current));
//!
//! let latest = dataset.last().unwrap();
//! let total = latest.myeloid_pct() + latest.lymphoid_pct() + latest.erythroid_pct();
//! assert!((total - 100.0).abs() < 1e-6);
//! let _ = LineageAssessment::of(latest).suggestion();
//! # Ok::<(), osiris_core::Error>(())
//! ```

mod daily_record;
mod insights;
mod sample;
mod scores;

pub use daily_record::{DailyRecord, DailyRecordBuilder, ProtocolChange};
pub use insights::{
    gene_function, key_metrics, top_expressed_genes, GeneCategory, GeneExpressionEntry, KeyMetric,
    KeyMetrics, LineageAssessment,
};
pub use sample::{
    generate_sample_dataset, generate_sample_dataset_ending, protocol_changes, GeneChannel,
    TrendSource, DEFAULT_SAMPLE_DAYS, GENE_CHANNELS, PROTOCOL_CHANGES,
};
pub use scores::{multipotency_score, self_renewal_score};
