//! Synthetic experiment data
//!
//! Generates a culture time series: linear score trends with Gaussian noise,
//! lineage shares derived from the multipotency trend, fifteen gene channels
//! driven by fixed coefficients, and three protocol-change days.
//!
//! Output is bit-reproducible for a fixed seed and end date.

use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use super::{DailyRecord, ProtocolChange};
use crate::{Error, Result};

/// Number of days the dashboard generates by default.
pub const DEFAULT_SAMPLE_DAYS: usize = 30;

/// Which simulated series drives a gene channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSource {
    /// Self-renewal score trend
    SelfRenewal,
    /// Multipotency score trend
    Multipotency,
    /// Myeloid percentage
    Myeloid,
    /// Lymphoid percentage
    Lymphoid,
    /// Erythroid percentage
    Erythroid,
}

/// Generating constants of one gene channel:
/// `intercept + coefficient * source + N(0, noise_sd)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneChannel {
    /// Gene symbol
    pub gene: &'static str,
    /// Driving series
    pub source: TrendSource,
    /// Constant offset
    pub intercept: f64,
    /// Slope against the driving series
    pub coefficient: f64,
    /// Standard deviation of the additive noise
    pub noise_sd: f64,
}

const fn channel(
    gene: &'static str,
    source: TrendSource,
    intercept: f64,
    coefficient: f64,
    noise_sd: f64,
) -> GeneChannel {
    GeneChannel {
        gene,
        source,
        intercept,
        coefficient,
        noise_sd,
    }
}

/// Gene channels in generation order.
pub const GENE_CHANNELS: [GeneChannel; 15] = [
    // stem cell maintenance
    channel("CD34", TrendSource::SelfRenewal, 60.0, 0.3, 15.0),
    channel("KIT", TrendSource::SelfRenewal, 70.0, 0.25, 12.0),
    channel("BMI1", TrendSource::SelfRenewal, 50.0, 0.35, 10.0),
    channel("HOXA9", TrendSource::SelfRenewal, 45.0, 0.4, 8.0),
    // myeloid
    channel("PU.1", TrendSource::Myeloid, 30.0, 0.7, 15.0),
    channel("CEBPA", TrendSource::Myeloid, 25.0, 0.8, 10.0),
    // lymphoid
    channel("FLT3", TrendSource::Lymphoid, 20.0, 0.9, 12.0),
    channel("IL7R", TrendSource::Lymphoid, 15.0, 0.8, 10.0),
    // erythroid
    channel("GATA1", TrendSource::Erythroid, 25.0, 1.2, 15.0),
    channel("KLF1", TrendSource::Erythroid, 20.0, 1.0, 12.0),
    // multipotency
    channel("GATA2", TrendSource::Multipotency, 40.0, 0.5, 10.0),
    channel("RUNX1", TrendSource::Multipotency, 35.0, 0.45, 8.0),
    channel("TAL1", TrendSource::Multipotency, 30.0, 0.4, 12.0),
    channel("MYB", TrendSource::Multipotency, 45.0, 0.3, 15.0),
    channel("MECOM", TrendSource::Multipotency, 25.0, 0.35, 10.0),
];

/// Protocol changes as `(day offset, description, target)`.
pub const PROTOCOL_CHANGES: [(usize, &str, &str); 3] = [
    (7, "Added 10 ng/mL FLT3L", "Increase lymphoid potential"),
    (15, "Reduced SCF by 15%", "Balance lineage output"),
    (22, "Added 5 ng/mL IL-6", "Boost proliferation"),
];

/// Generate `days` records ending today (UTC).
///
/// Without a seed the output differs between calls.
///
/// # Errors
///
/// Returns [`Error::Validation`] if `days` is zero.
pub fn generate_sample_dataset(days: usize, seed: Option<u64>) -> Result<Vec<DailyRecord>> {
    generate_sample_dataset_ending(days, seed, Utc::now().date_naive())
}

/// Generate `days` consecutive records whose last date is `end`.
///
/// # Errors
///
/// Returns [`Error::Validation`] if `days` is zero or the date range falls
/// outside the calendar.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use osiris_core::metrics::generate_sample_dataset_ending;
///
/// let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
/// let a = generate_sample_dataset_ending(30, Some(7), end)?;
/// let b = generate_sample_dataset_ending(30, Some(7), end)?;
///
/// assert_eq!(a, b);
/// assert_eq!(a.last().map(|r| r.date()), Some(end));
/// # Ok::<(), osiris_core::Error>(())
/// ```
pub fn generate_sample_dataset_ending(
    days: usize,
    seed: Option<u64>,
    end: NaiveDate,
) -> Result<Vec<DailyRecord>> {
    if days == 0 {
        return Err(Error::Validation("days must be positive".to_string()));
    }
    let span = u64::try_from(days - 1)
        .map_err(|_| Error::Validation(format!("{days} days is out of range")))?;
    let start = end
        .checked_sub_days(Days::new(span))
        .ok_or_else(|| Error::Validation(format!("{days} days before {end} is out of range")))?;

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    debug!(days, seed, %end, "generating sample dataset");

    let self_renewal: Vec<f64> = linspace(40.0, 75.0, days)
        .into_iter()
        .map(|base| (base + normal(&mut rng, 0.0, 5.0)).clamp(0.0, 100.0))
        .collect();
    let multipotency: Vec<f64> = linspace(30.0, 65.0, days)
        .into_iter()
        .map(|base| (base + normal(&mut rng, 0.0, 7.0)).clamp(0.0, 100.0))
        .collect();

    let lineages: Vec<[f64; 3]> = multipotency
        .iter()
        .map(|&mp| {
            let shift = (mp - 30.0) * 0.5;
            let myeloid = 70.0 - shift + normal(&mut rng, 0.0, 5.0);
            let lymphoid = 30.0 + shift + normal(&mut rng, 0.0, 5.0);
            let erythroid = normal(&mut rng, 15.0, 3.0);
            renormalize([myeloid, lymphoid, erythroid])
        })
        .collect();

    let mut records = Vec::with_capacity(days);
    for (day, date) in start.iter_days().take(days).enumerate() {
        let [myeloid, lymphoid, erythroid] = lineages[day];
        let source_value = |source: TrendSource| match source {
            TrendSource::SelfRenewal => self_renewal[day],
            TrendSource::Multipotency => multipotency[day],
            TrendSource::Myeloid => myeloid,
            TrendSource::Lymphoid => lymphoid,
            TrendSource::Erythroid => erythroid,
        };

        let mut builder = DailyRecord::builder(date)
            .scores(self_renewal[day], multipotency[day])
            .lineages(myeloid, lymphoid, erythroid);

        for channel in &GENE_CHANNELS {
            let raw = channel.coefficient.mul_add(
                source_value(channel.source),
                channel.intercept + normal(&mut rng, 0.0, channel.noise_sd),
            );
            builder = builder.gene(channel.gene, expression_level(raw));
        }

        let cd34 = (60.0 + normal(&mut rng, 0.0, 10.0)).clamp(0.0, 100.0);
        let proliferation = (50.0 + normal(&mut rng, 0.0, 15.0)).clamp(0.0, 100.0);
        builder = builder.readings(cd34, proliferation);

        if let Some(&(_, description, target)) =
            PROTOCOL_CHANGES.iter().find(|(offset, _, _)| *offset == day)
        {
            builder = builder.protocol_change(description, target);
        }

        records.push(builder.build());
    }

    Ok(records)
}

/// Protocol changes of a dataset in day order.
#[must_use]
pub fn protocol_changes(records: &[DailyRecord]) -> Vec<(NaiveDate, &ProtocolChange)> {
    records
        .iter()
        .filter_map(|record| record.protocol_change().map(|change| (record.date(), change)))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| step.mul_add(i as f64, start)).collect()
}

fn normal<R: Rng>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    sd.mul_add(z, mean)
}

/// Clip each share at 0 and scale so the three sum to 100.
fn renormalize(shares: [f64; 3]) -> [f64; 3] {
    let clipped = shares.map(|share| share.max(0.0));
    let total: f64 = clipped.iter().sum();
    if total <= 0.0 {
        return [100.0 / 3.0; 3];
    }
    clipped.map(|share| share / total * 100.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn expression_level(raw: f64) -> u32 {
    let truncated = raw.trunc();
    if truncated.is_nan() || truncated <= 0.0 {
        0
    } else {
        truncated.min(f64::from(u32::MAX)) as u32
    }
}
