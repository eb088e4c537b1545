//! Dashboard read-outs derived from a dataset

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DailyRecord;

/// Latest value of a score and its change since the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    /// Value on the latest day
    pub current: f64,
    /// Change against the previous day; `None` for single-day datasets
    pub delta: Option<f64>,
}

/// The two headline metrics of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    /// Self-renewal score
    pub self_renewal: KeyMetric,
    /// Multipotency score
    pub multipotency: KeyMetric,
}

/// Headline metrics for a dataset, or `None` if it is empty.
#[must_use]
pub fn key_metrics(records: &[DailyRecord]) -> Option<KeyMetrics> {
    let (latest, rest) = records.split_last()?;
    let previous = rest.last();
    let metric = |get: fn(&DailyRecord) -> f64| KeyMetric {
        current: get(latest),
        delta: previous.map(|prev| get(latest) - get(prev)),
    };

    Some(KeyMetrics {
        self_renewal: metric(DailyRecord::self_renewal_score),
        multipotency: metric(DailyRecord::multipotency_score),
    })
}

/// Functional grouping of the tracked genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneCategory {
    /// Stem cell maintenance
    StemCell,
    /// Myeloid lineage
    Myeloid,
    /// Lymphoid lineage
    Lymphoid,
    /// Erythroid lineage
    Erythroid,
    /// Multipotency regulators
    Multipotency,
    /// Anything else
    Other,
}

impl GeneCategory {
    /// Category of a gene symbol.
    #[must_use]
    pub fn of(gene: &str) -> Self {
        match gene {
            "CD34" | "KIT" | "BMI1" | "HOXA9" => Self::StemCell,
            "PU.1" | "CEBPA" => Self::Myeloid,
            "FLT3" | "IL7R" => Self::Lymphoid,
            "GATA1" | "KLF1" => Self::Erythroid,
            "GATA2" | "RUNX1" | "TAL1" | "MYB" | "MECOM" | "MPL" | "MEIS1" => Self::Multipotency,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for GeneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StemCell => "Stem Cell",
            Self::Myeloid => "Myeloid",
            Self::Lymphoid => "Lymphoid",
            Self::Erythroid => "Erythroid",
            Self::Multipotency => "Multipotency",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Short description of a gene's role, shown on hover; "Unknown" for
/// untracked symbols.
#[must_use]
pub fn gene_function(gene: &str) -> &'static str {
    match gene {
        "CD34" => "Cell surface glycoprotein and stem cell marker",
        "KIT" => "Receptor tyrosine kinase essential for HSC maintenance",
        "BMI1" => "Polycomb complex protein involved in self-renewal",
        "HOXA9" => "Homeobox protein crucial for HSC expansion",
        "PU.1" => "Transcription factor essential for myeloid development",
        "CEBPA" => "Transcription factor involved in myeloid differentiation",
        "FLT3" => "Receptor tyrosine kinase important for lymphoid development",
        "IL7R" => "Interleukin-7 receptor involved in lymphoid commitment",
        "GATA1" => "Transcription factor essential for erythroid development",
        "KLF1" => "Krüppel-like factor 1, regulates erythroid maturation",
        "GATA2" => "Transcription factor required for HSC maintenance and multipotency",
        "RUNX1" => "Transcription factor essential for definitive hematopoiesis",
        "TAL1" => "Basic helix-loop-helix transcription factor for blood development",
        "MYB" => "Transcription factor involved in progenitor proliferation",
        "MECOM" => "Transcription regulator of HSC quiescence and self-renewal",
        "MPL" => "Thrombopoietin receptor important for HSC maintenance",
        "MEIS1" => "Homeobox protein that regulates HSC self-renewal",
        _ => "Unknown",
    }
}

/// One bar of the "highest expressed genes" chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneExpressionEntry {
    /// Gene symbol
    pub gene: String,
    /// Expression level
    pub expression: u32,
    /// Functional category
    pub category: GeneCategory,
    /// Role of the gene
    pub function: &'static str,
}

/// The `limit` most expressed genes of a record, highest first.
/// Ties keep alphabetical order.
#[must_use]
pub fn top_expressed_genes(record: &DailyRecord, limit: usize) -> Vec<GeneExpressionEntry> {
    let mut entries: Vec<GeneExpressionEntry> = record
        .gene_expression()
        .iter()
        .map(|(gene, &expression)| GeneExpressionEntry {
            gene: gene.clone(),
            expression,
            category: GeneCategory::of(gene),
            function: gene_function(gene),
        })
        .collect();
    // stable sort over BTreeMap order keeps ties alphabetical
    entries.sort_by(|a, b| b.expression.cmp(&a.expression));
    entries.truncate(limit);
    entries
}

/// Lineage bias read-out of the latest day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bias", content = "percent", rename_all = "snake_case")]
pub enum LineageAssessment {
    /// Myeloid above 70%
    MyeloidHigh(f64),
    /// Lymphoid above 70%
    LymphoidHigh(f64),
    /// Erythroid above 50%
    ErythroidHigh(f64),
    /// No dominant lineage
    Balanced,
}

impl LineageAssessment {
    /// Assess a record. Myeloid is checked first, then lymphoid, then erythroid.
    #[must_use]
    pub fn of(record: &DailyRecord) -> Self {
        if record.myeloid_pct() > 70.0 {
            Self::MyeloidHigh(record.myeloid_pct())
        } else if record.lymphoid_pct() > 70.0 {
            Self::LymphoidHigh(record.lymphoid_pct())
        } else if record.erythroid_pct() > 50.0 {
            Self::ErythroidHigh(record.erythroid_pct())
        } else {
            Self::Balanced
        }
    }

    /// Short description of the current bias.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::MyeloidHigh(pct) => format!("{pct:.1}% myeloid (high)"),
            Self::LymphoidHigh(pct) => format!("{pct:.1}% lymphoid (high)"),
            Self::ErythroidHigh(pct) => format!("{pct:.1}% erythroid (high)"),
            Self::Balanced => "Relatively balanced lineage output".to_string(),
        }
    }

    /// Suggested protocol adjustment.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::MyeloidHigh(_) => "Reduce SCF by 20% to balance lymphoid potential",
            Self::LymphoidHigh(_) => "Add IL-3 to enhance myeloid differentiation",
            Self::ErythroidHigh(_) => "Reduce EPO to balance lineage output",
            Self::Balanced => "Maintain current cytokine ratios",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, n).unwrap()
    }

    #[test]
    fn test_key_metrics_delta() {
        let records = vec![
            DailyRecord::builder(day(1)).scores(50.0, 40.0).build(),
            DailyRecord::builder(day(2)).scores(55.5, 38.0).build(),
        ];
        let metrics = key_metrics(&records).unwrap();
        assert!((metrics.self_renewal.current - 55.5).abs() < 1e-9);
        assert!((metrics.self_renewal.delta.unwrap() - 5.5).abs() < 1e-9);
        assert!((metrics.multipotency.delta.unwrap() + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_key_metrics_single_day_and_empty() {
        let records = vec![DailyRecord::builder(day(1)).scores(50.0, 40.0).build()];
        assert!(key_metrics(&records).unwrap().self_renewal.delta.is_none());
        assert!(key_metrics(&[]).is_none());
    }

    #[test]
    fn test_top_expressed_genes_order_and_limit() {
        let record = DailyRecord::builder(day(1))
            .gene("KIT", 90)
            .gene("CD34", 90)
            .gene("GATA1", 20)
            .gene("FLT3", 60)
            .build();
        let top = top_expressed_genes(&record, 3);
        let genes: Vec<&str> = top.iter().map(|e| e.gene.as_str()).collect();
        assert_eq!(genes, vec!["CD34", "KIT", "FLT3"]);
        assert_eq!(top[2].category, GeneCategory::Lymphoid);
        assert_eq!(
            top[2].function,
            "Receptor tyrosine kinase important for lymphoid development"
        );
    }

    #[test]
    fn test_gene_function_unknown_symbol() {
        assert_eq!(gene_function("XYZ1"), "Unknown");
        assert_eq!(
            gene_function("MPL"),
            "Thrombopoietin receptor important for HSC maintenance"
        );
    }

    #[test]
    fn test_lineage_assessment_priority() {
        let myeloid = DailyRecord::builder(day(1)).lineages(75.0, 10.0, 15.0).build();
        assert!(matches!(LineageAssessment::of(&myeloid), LineageAssessment::MyeloidHigh(_)));

        let erythroid = DailyRecord::builder(day(1)).lineages(20.0, 25.0, 55.0).build();
        assert!(matches!(
            LineageAssessment::of(&erythroid),
            LineageAssessment::ErythroidHigh(_)
        ));

        let balanced = DailyRecord::builder(day(1)).lineages(45.0, 40.0, 15.0).build();
        assert_eq!(LineageAssessment::of(&balanced), LineageAssessment::Balanced);
        assert_eq!(
            LineageAssessment::Balanced.suggestion(),
            "Maintain current cytokine ratios"
        );
    }
}
