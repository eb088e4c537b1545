//! Daily Record - one simulated culture day

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A protocol alteration logged on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolChange {
    /// What was changed, e.g. "Added 10 ng/mL FLT3L"
    pub description: String,
    /// What the change aims for, e.g. "Increase lymphoid potential"
    pub target: String,
}

/// Daily Record represents the measurements of one culture day.
///
/// Records are immutable; a dataset is replaced wholesale when regenerated.
/// Lineage percentages of a generated record sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    date: NaiveDate,
    self_renewal_score: f64,
    multipotency_score: f64,
    myeloid_pct: f64,
    lymphoid_pct: f64,
    erythroid_pct: f64,
    cd34_expression: f64,
    proliferation_rate: f64,
    gene_expression: BTreeMap<String, u32>,
    protocol_change: Option<ProtocolChange>,
}

impl DailyRecord {
    /// Create a builder for a record on `date`. Unset fields default to zero.
    #[must_use]
    pub fn builder(date: NaiveDate) -> DailyRecordBuilder {
        DailyRecordBuilder::new(date)
    }

    /// Get the culture day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Get the self-renewal score (0-100).
    #[must_use]
    pub const fn self_renewal_score(&self) -> f64 {
        self.self_renewal_score
    }

    /// Get the multipotency score (0-100).
    #[must_use]
    pub const fn multipotency_score(&self) -> f64 {
        self.multipotency_score
    }

    /// Get the myeloid share of lineage output (percent).
    #[must_use]
    pub const fn myeloid_pct(&self) -> f64 {
        self.myeloid_pct
    }

    /// Get the lymphoid share of lineage output (percent).
    #[must_use]
    pub const fn lymphoid_pct(&self) -> f64 {
        self.lymphoid_pct
    }

    /// Get the erythroid share of lineage output (percent).
    #[must_use]
    pub const fn erythroid_pct(&self) -> f64 {
        self.erythroid_pct
    }

    /// Get the CD34 surface expression reading.
    #[must_use]
    pub const fn cd34_expression(&self) -> f64 {
        self.cd34_expression
    }

    /// Get the proliferation rate reading.
    #[must_use]
    pub const fn proliferation_rate(&self) -> f64 {
        self.proliferation_rate
    }

    /// Get per-gene expression levels.
    #[must_use]
    pub const fn gene_expression(&self) -> &BTreeMap<String, u32> {
        &self.gene_expression
    }

    /// Get the protocol change logged on this day, if any.
    #[must_use]
    pub const fn protocol_change(&self) -> Option<&ProtocolChange> {
        self.protocol_change.as_ref()
    }
}

/// Builder for `DailyRecord`.
#[derive(Debug)]
pub struct DailyRecordBuilder {
    record: DailyRecord,
}

impl DailyRecordBuilder {
    /// Create a new builder for `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            record: DailyRecord {
                date,
                self_renewal_score: 0.0,
                multipotency_score: 0.0,
                myeloid_pct: 0.0,
                lymphoid_pct: 0.0,
                erythroid_pct: 0.0,
                cd34_expression: 0.0,
                proliferation_rate: 0.0,
                gene_expression: BTreeMap::new(),
                protocol_change: None,
            },
        }
    }

    /// Set the self-renewal and multipotency scores.
    #[must_use]
    pub const fn scores(mut self, self_renewal: f64, multipotency: f64) -> Self {
        self.record.self_renewal_score = self_renewal;
        self.record.multipotency_score = multipotency;
        self
    }

    /// Set the myeloid / lymphoid / erythroid percentages.
    #[must_use]
    pub const fn lineages(mut self, myeloid: f64, lymphoid: f64, erythroid: f64) -> Self {
        self.record.myeloid_pct = myeloid;
        self.record.lymphoid_pct = lymphoid;
        self.record.erythroid_pct = erythroid;
        self
    }

    /// Set the CD34 expression and proliferation readings.
    #[must_use]
    pub const fn readings(mut self, cd34_expression: f64, proliferation_rate: f64) -> Self {
        self.record.cd34_expression = cd34_expression;
        self.record.proliferation_rate = proliferation_rate;
        self
    }

    /// Set one gene's expression level.
    #[must_use]
    pub fn gene(mut self, name: impl Into<String>, level: u32) -> Self {
        self.record.gene_expression.insert(name.into(), level);
        self
    }

    /// Mark the day as a protocol change.
    #[must_use]
    pub fn protocol_change(
        mut self,
        description: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.record.protocol_change = Some(ProtocolChange {
            description: description.into(),
            target: target.into(),
        });
        self
    }

    /// Build the `DailyRecord`.
    #[must_use]
    pub fn build(self) -> DailyRecord {
        self.record
    }
}
