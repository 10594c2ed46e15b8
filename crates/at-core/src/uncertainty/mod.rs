//! Monte Carlo uncertainty intervals for the risk score.
//!
//! A point ORS hides how much of it rests on a thin credibility
//! posterior or a noisy frequency estimate. This engine re-samples the
//! stochastic inputs and recomputes the score per draw:
//! - source credibility drawn from the full Beta posterior
//! - keyword weight perturbed with Gaussian noise, re-clamped to its
//!   valid range
//! - frequency factor jittered uniformly within a relative band,
//!   floored at 1.0
//!
//! Recency and the additive contextual bonus are deterministic inputs
//! and pass through unchanged. Each draw is clamped to 0-100 exactly
//! like the point score, so the interval can be read on the same scale.

use at_common::{Error, Result, UncertaintyInterval};
use at_config::{ScoringConfig, UncertaintyConfig, KEYWORD_WEIGHT_MAX, KEYWORD_WEIGHT_MIN};
use at_math::{beta_sample_from_uniform, mean, percentile_sorted, population_std};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Method tag recorded on every interval produced by this engine.
pub const METHOD: &str = "monte_carlo_beta_normal_v1";

/// Deterministic and stochastic inputs for one interval run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalInputs {
    pub keyword_weight: f64,
    pub frequency_factor: f64,
    /// Source credibility posterior, sampled per draw.
    pub credibility_alpha: f64,
    pub credibility_beta: f64,
    /// Deterministic recency factor for the alert being scored.
    pub recency_factor: f64,
    /// Sum of the additive contextual factors (category, proximity,
    /// event, POI), passed through unsampled.
    pub context_bonus: f64,
}

fn normal_draw(rng: &mut StdRng, mean: f64, sigma: f64) -> f64 {
    // Box-Muller; the first uniform is kept away from zero so ln() is
    // finite.
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    mean + sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Run `n` score draws and summarize them into an empirical interval.
///
/// A `seed` makes the run reproducible; `None` seeds from the OS.
pub fn score_interval(
    inputs: &IntervalInputs,
    n: usize,
    seed: Option<u64>,
    scoring: &ScoringConfig,
    config: &UncertaintyConfig,
) -> Result<UncertaintyInterval> {
    if n == 0 || n > config.max_samples {
        return Err(Error::InvalidSampleCount {
            n,
            max: config.max_samples,
        });
    }
    if inputs.credibility_alpha <= 0.0 || inputs.credibility_beta <= 0.0 {
        return Err(Error::InvalidPosterior {
            alpha: inputs.credibility_alpha,
            beta: inputs.credibility_beta,
        });
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut scores = Vec::with_capacity(n);
    for _ in 0..n {
        let credibility = beta_sample_from_uniform(
            rng.random(),
            inputs.credibility_alpha,
            inputs.credibility_beta,
        );
        let weight = normal_draw(&mut rng, inputs.keyword_weight, config.keyword_sigma)
            .clamp(KEYWORD_WEIGHT_MIN, KEYWORD_WEIGHT_MAX);
        let jitter = 1.0 + config.frequency_jitter * (rng.random::<f64>() * 2.0 - 1.0);
        let frequency = (inputs.frequency_factor * jitter).max(1.0);

        let score = weight * frequency * credibility * scoring.base_multiplier
            + inputs.recency_factor * scoring.recency_weight
            + inputs.context_bonus;
        scores.push(score.clamp(0.0, 100.0));
    }
    scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let interval = UncertaintyInterval {
        n,
        mean: mean(&scores),
        std: population_std(&scores),
        p05: percentile_sorted(&scores, 0.05),
        p50: percentile_sorted(&scores, 0.50),
        p95: percentile_sorted(&scores, 0.95),
        method: METHOD.to_string(),
    };
    debug!(
        n,
        mean = interval.mean,
        p05 = interval.p05,
        p95 = interval.p95,
        "uncertainty interval computed"
    );
    Ok(interval)
}
