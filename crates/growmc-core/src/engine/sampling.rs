use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::f64::consts::{PI, TAU};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("Input energies list is empty, cannot perform sampling")]
    EmptyEnergies,
    #[error("All {0} torsion energies are non-finite")]
    AllEnergiesNonFinite(usize),
    #[error("Failed to create weighted distribution: {source}")]
    Distribution {
        #[from]
        source: rand::distributions::WeightedError,
    },
}

/// Torsion bin centers: n equal divisions of [-pi, pi), center of bin i at
/// -pi + i * (2*pi/n).
pub fn bin_centers(n_divisions: usize) -> Vec<f64> {
    let width = TAU / n_divisions as f64;
    (0..n_divisions).map(|i| -PI + i as f64 * width).collect()
}

/// Normalized log probability mass function over discretized torsion bins,
/// from per-bin potential energies at inverse temperature `beta`.
///
/// Non-finite energies contribute -inf log-weight. Normalization shifts by
/// the maximum log-weight before exponentiating so that a single deep
/// minimum cannot underflow the partition sum.
#[instrument(level = "trace", skip_all, fields(beta))]
pub fn log_pmf_from_energies(energies: &[f64], beta: f64) -> Result<Vec<f64>, SamplingError> {
    if energies.is_empty() {
        return Err(SamplingError::EmptyEnergies);
    }

    let logq: Vec<f64> = energies
        .iter()
        .map(|&e| {
            let lq = -beta * e;
            if lq.is_nan() { f64::NEG_INFINITY } else { lq }
        })
        .collect();

    let max_logq = logq.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max_logq.is_finite() {
        return Err(SamplingError::AllEnergiesNonFinite(energies.len()));
    }

    let log_z: f64 = logq
        .iter()
        .map(|&lq| (lq - max_logq).exp())
        .sum::<f64>()
        .ln();
    Ok(logq.iter().map(|&lq| lq - max_logq - log_z).collect())
}

/// Draws one bin index from a normalized log-PMF.
pub fn sample_bin(log_pmf: &[f64], rng: &mut impl Rng) -> Result<usize, SamplingError> {
    let weights: Vec<f64> = log_pmf.iter().map(|&lp| lp.exp()).collect();
    let dist = WeightedIndex::new(&weights)?;
    Ok(dist.sample(rng))
}

/// Index of the bin center nearest to the observed angle. Assumes the angle
/// and the centers share the [-pi, pi) domain.
pub fn nearest_bin(phi: f64, centers: &[f64]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &center) in centers.iter().enumerate() {
        let distance = (phi - center).abs();
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}
