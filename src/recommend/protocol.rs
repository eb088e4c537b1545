//! Threshold-gated protocol recommendations

use serde::{Deserialize, Serialize};

use crate::metrics::DailyRecord;

/// Which score a recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    /// Self-renewal below 40
    SelfRenewal,
    /// Multipotency below 50
    Multipotency,
    /// A dominant lineage above 70%
    Lineage,
}

/// One suggested protocol adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolRecommendation {
    /// Addressed score
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// What to change
    pub action: String,
    /// Why it helps
    pub rationale: String,
    /// Supporting literature
    pub evidence: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl ProtocolRecommendation {
    fn new(
        kind: RecommendationKind,
        action: &str,
        rationale: &str,
        evidence: &str,
        confidence: f64,
    ) -> Self {
        Self {
            kind,
            action: action.to_string(),
            rationale: rationale.to_string(),
            evidence: evidence.to_string(),
            confidence,
        }
    }
}

/// Lineage shares in percent. Missing lineages are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageBias {
    /// Myeloid share
    #[serde(default)]
    pub myeloid: f64,
    /// Lymphoid share
    #[serde(default)]
    pub lymphoid: f64,
    /// Erythroid share
    #[serde(default)]
    pub erythroid: f64,
}

impl From<&DailyRecord> for LineageBias {
    fn from(record: &DailyRecord) -> Self {
        Self {
            myeloid: record.myeloid_pct(),
            lymphoid: record.lymphoid_pct(),
            erythroid: record.erythroid_pct(),
        }
    }
}

/// Optional post-filters applied after candidate generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolConstraints {
    /// Drop recommendations involving small molecules
    #[serde(default)]
    pub no_small_molecules: bool,
    /// Budget; below 200 only the first two recommendations are kept
    #[serde(default)]
    pub budget: Option<f64>,
}

const LOW_BUDGET: f64 = 200.0;
const LOW_BUDGET_LIMIT: usize = 2;

/// Recommend protocol adjustments.
///
/// Candidates are generated in a fixed order (self-renewal, multipotency,
/// lineage) and then filtered by `constraints`. For lineage bias only the
/// first of myeloid or lymphoid above 70% yields a candidate.
///
/// ```rust
/// use osiris_core::recommend::{recommend_protocol, LineageBias, ProtocolConstraints};
///
/// let constraints = ProtocolConstraints { budget: Some(100.0), ..Default::default() };
/// let recs = recommend_protocol(30.0, 80.0, LineageBias::default(), Some(&constraints));
/// assert_eq!(recs.len(), 2);
/// ```
#[must_use]
pub fn recommend_protocol(
    self_renewal: f64,
    multipotency: f64,
    lineage_bias: LineageBias,
    constraints: Option<&ProtocolConstraints>,
) -> Vec<ProtocolRecommendation> {
    use RecommendationKind::{Lineage, Multipotency, SelfRenewal};

    let mut recommendations = Vec::new();

    if self_renewal < 40.0 {
        recommendations.push(ProtocolRecommendation::new(
            SelfRenewal,
            "Add 20 ng/mL SCF",
            "Boosts self-renewal capacity",
            "Based on 12 studies",
            0.85,
        ));
        recommendations.push(ProtocolRecommendation::new(
            SelfRenewal,
            "Increase TPO to 50 ng/mL",
            "Enhances HSC maintenance",
            "Based on 8 studies",
            0.78,
        ));
    }

    if multipotency < 50.0 {
        recommendations.push(ProtocolRecommendation::new(
            Multipotency,
            "Add 10 ng/mL FLT3L",
            "Promotes lymphoid differentiation potential",
            "Based on 15 studies",
            0.82,
        ));
    }

    if lineage_bias.myeloid > 70.0 {
        recommendations.push(ProtocolRecommendation::new(
            Lineage,
            "Reduce SCF by 20%",
            "Balances lymphoid potential",
            "Based on 7 studies",
            0.75,
        ));
    } else if lineage_bias.lymphoid > 70.0 {
        recommendations.push(ProtocolRecommendation::new(
            Lineage,
            "Add 5 ng/mL IL-3",
            "Enhances myeloid differentiation",
            "Based on 10 studies",
            0.8,
        ));
    }

    if let Some(constraints) = constraints {
        if constraints.no_small_molecules {
            recommendations.retain(|rec| !rec.action.to_lowercase().contains("small molecule"));
        }
        if constraints.budget.is_some_and(|budget| budget < LOW_BUDGET) {
            recommendations.truncate(LOW_BUDGET_LIMIT);
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_thresholds_tripped() {
        let recs = recommend_protocol(60.0, 70.0, LineageBias::default(), None);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_generation_order() {
        let bias = LineageBias {
            myeloid: 80.0,
            lymphoid: 10.0,
            erythroid: 10.0,
        };
        let recs = recommend_protocol(20.0, 20.0, bias, None);
        let kinds: Vec<RecommendationKind> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::SelfRenewal,
                RecommendationKind::SelfRenewal,
                RecommendationKind::Multipotency,
                RecommendationKind::Lineage,
            ]
        );
        assert_eq!(recs[3].action, "Reduce SCF by 20%");
    }

    #[test]
    fn test_myeloid_checked_before_lymphoid() {
        let bias = LineageBias {
            myeloid: 71.0,
            lymphoid: 71.0,
            erythroid: 0.0,
        };
        let recs = recommend_protocol(90.0, 90.0, bias, None);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].action, "Reduce SCF by 20%");
    }

    #[test]
    fn test_budget_at_threshold_keeps_all() {
        let constraints = ProtocolConstraints {
            budget: Some(200.0),
            ..ProtocolConstraints::default()
        };
        let recs = recommend_protocol(20.0, 20.0, LineageBias::default(), Some(&constraints));
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let recs = recommend_protocol(20.0, 90.0, LineageBias::default(), None);
        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["type"], "self-renewal");
    }
}
