//! Toy composite scores
//!
//! Both scores are pure functions on the 0-100 scale. Degenerate inputs
//! (no markers, all-zero markers, NaN) resolve to 0 instead of failing.

use std::collections::BTreeMap;

const PROLIFERATION_WEIGHT: f64 = 0.6;
const CD34_WEIGHT: f64 = 0.4;
const SIGNIFICANT_MARKER_LEVEL: f64 = 20.0;

/// Self-renewal score from proliferation rate and CD34 expression.
///
/// Each input is clamped to [0, 100] and normalized before the weighted
/// sum `0.6 * proliferation + 0.4 * cd34`.
///
/// ```rust
/// use osiris_core::metrics::self_renewal_score;
///
/// assert!((self_renewal_score(50.0, 50.0) - 50.0).abs() < 1e-9);
/// assert!((self_renewal_score(150.0, -3.0) - 60.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn self_renewal_score(proliferation_rate: f64, cd34_expression: f64) -> f64 {
    let proliferation = unit(proliferation_rate);
    let cd34 = unit(cd34_expression);
    let score = proliferation.mul_add(PROLIFERATION_WEIGHT, cd34 * CD34_WEIGHT);
    (score * 100.0).clamp(0.0, 100.0)
}

/// Multipotency score from lineage marker levels.
///
/// Half of the score is the fraction of markers above 20, half is the
/// evenness (normalized Shannon entropy) of the nonzero marker proportions.
/// Evenness is 0 with fewer than two nonzero markers. Negative, NaN and
/// infinite levels count as 0.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use osiris_core::metrics::multipotency_score;
///
/// assert_eq!(multipotency_score(&BTreeMap::new()), 0.0);
///
/// let even = BTreeMap::from([
///     ("myeloid".to_string(), 30.0),
///     ("lymphoid".to_string(), 30.0),
///     ("erythroid".to_string(), 30.0),
/// ]);
/// assert!((multipotency_score(&even) - 100.0).abs() < 1e-9);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn multipotency_score(lineage_markers: &BTreeMap<String, f64>) -> f64 {
    let levels: Vec<f64> = lineage_markers.values().map(|&v| marker_level(v)).collect();
    let total: f64 = levels.iter().sum();
    if levels.is_empty() || total <= 0.0 {
        return 0.0;
    }

    let significant = levels
        .iter()
        .filter(|&&level| level > SIGNIFICANT_MARKER_LEVEL)
        .count();
    let significant_fraction = significant as f64 / levels.len() as f64;

    let proportions: Vec<f64> = levels
        .iter()
        .filter(|&&level| level > 0.0)
        .map(|level| level / total)
        .collect();
    let evenness = if proportions.len() < 2 {
        0.0
    } else {
        let entropy: f64 = -proportions.iter().map(|p| p * p.ln()).sum::<f64>();
        entropy / (proportions.len() as f64).ln()
    };

    let score = 0.5f64.mul_add(significant_fraction, 0.5 * evenness);
    (score * 100.0).clamp(0.0, 100.0)
}

fn unit(value: f64) -> f64 {
    non_negative(value).min(100.0) / 100.0
}

fn marker_level(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}
