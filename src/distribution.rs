//! Seeded distribution sampling.
//!
//! Every stochastic quantity upstream of the scheduler (worker caps,
//! recommended crew sizes, pool size) is drawn from one of three two-parameter
//! distributions by inverse-CDF sampling: exactly one uniform draw per sample,
//! so a fixed seed and burn-in reproduce a run bit for bit.
//!
//! | Variant | Parameters | Notes |
//! |---------|------------|-------|
//! | `Lognormal` | median `theta`, dispersion `beta` | `theta <= 0` samples as 0 |
//! | `Normal` | `mean`, `sigma` | truncated at zero |
//! | `Uniform` | `lo`, `hi` | |

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::{
    ContinuousCDF, LogNormal, Normal as StatsNormal, Uniform as StatsUniform,
};

use crate::error::{Result, ScheduleError};

/// A closed set of sampling distributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    Lognormal { theta: f64, beta: f64 },
    Normal { mean: f64, sigma: f64 },
    Uniform { lo: f64, hi: f64 },
}

impl Distribution {
    /// Resolves a distribution by name.
    ///
    /// Accepts `"lognormal"`, `"log normal"`, `"normal"` and `"uniform"`,
    /// case-insensitively. `var1`/`var2` are the two shape parameters in the
    /// order listed in the variant.
    pub fn from_name(name: &str, var1: f64, var2: f64) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "lognormal" | "log normal" => Ok(Self::Lognormal {
                theta: var1,
                beta: var2,
            }),
            "normal" => Ok(Self::Normal {
                mean: var1,
                sigma: var2,
            }),
            "uniform" => Ok(Self::Uniform { lo: var1, hi: var2 }),
            _ => Err(ScheduleError::InvalidDistribution {
                name: name.to_string(),
            }),
        }
    }

    /// Value at cumulative probability `p` (the quantile function).
    pub fn quantile(&self, p: f64) -> f64 {
        let p = p.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
        match *self {
            Self::Lognormal { theta, beta } => {
                if theta <= 0.0 {
                    return 0.0;
                }
                match LogNormal::new(theta.ln(), beta) {
                    Ok(d) => d.inverse_cdf(p),
                    // Zero dispersion collapses onto the median.
                    Err(_) => theta,
                }
            }
            Self::Normal { mean, sigma } => match StatsNormal::new(mean, sigma) {
                Ok(d) => {
                    let below_zero = d.cdf(0.0);
                    let q = (below_zero + p * (1.0 - below_zero)).min(1.0 - f64::EPSILON);
                    d.inverse_cdf(q).max(0.0)
                }
                Err(_) => mean.max(0.0),
            },
            Self::Uniform { lo, hi } => match StatsUniform::new(lo, hi) {
                Ok(d) => d.inverse_cdf(p),
                Err(_) => lo,
            },
        }
    }

    /// Cumulative probability at `x` (the percentile of `x`).
    pub fn cdf(&self, x: f64) -> f64 {
        let step = |at: f64| if x >= at { 1.0 } else { 0.0 };
        match *self {
            Self::Lognormal { theta, beta } => {
                if x <= 0.0 {
                    0.0
                } else if theta <= 0.0 {
                    1.0
                } else {
                    match LogNormal::new(theta.ln(), beta) {
                        Ok(d) => d.cdf(x),
                        Err(_) => step(theta),
                    }
                }
            }
            Self::Normal { mean, sigma } => {
                if x < 0.0 {
                    return 0.0;
                }
                match StatsNormal::new(mean, sigma) {
                    Ok(d) => {
                        let below_zero = d.cdf(0.0);
                        let mass = 1.0 - below_zero;
                        if mass <= 0.0 {
                            return 1.0;
                        }
                        ((d.cdf(x) - below_zero) / mass).clamp(0.0, 1.0)
                    }
                    Err(_) => step(mean.max(0.0)),
                }
            }
            Self::Uniform { lo, hi } => match StatsUniform::new(lo, hi) {
                Ok(d) => d.cdf(x),
                Err(_) => step(lo),
            },
        }
    }
}

/// Deterministic source of uniform draws for all sampling.
///
/// Created once per process (or per simulation realization) and passed
/// explicitly to whatever samples; there is no global generator.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    draws: u64,
}

impl RandomSource {
    /// Seeds the generator and discards `burn_in` uniforms.
    pub fn new(seed: u64, burn_in: usize) -> Self {
        let mut source = Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        };
        for _ in 0..burn_in {
            source.uniform();
        }
        source
    }

    /// Seeds from operating-system entropy (non-reproducible runs).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            draws: 0,
        }
    }

    /// One uniform draw on `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.draws += 1;
        self.rng.random::<f64>()
    }

    /// One sample from `distribution`, consuming exactly one uniform.
    pub fn sample(&mut self, distribution: &Distribution) -> f64 {
        let u = self.uniform();
        distribution.quantile(u)
    }

    /// Resolves `name` and samples it.
    pub fn sample_named(&mut self, name: &str, var1: f64, var2: f64) -> Result<f64> {
        let distribution = Distribution::from_name(name, var1, var2)?;
        Ok(self.sample(&distribution))
    }

    /// Uniforms consumed so far, burn-in included.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
