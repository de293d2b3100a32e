//! Stochastic workforce inputs.
//!
//! Samples the three worker quantities the schedule builder needs for one
//! realization: the building-wide cap per sequence, the recommended crew
//! per floor × sequence, and the total pool. Parameters are loaded from
//! JSON with serde.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distribution::{Distribution, RandomSource};
use crate::error::{Result, ScheduleError};
use crate::models::FloorSequenceGrid;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Distribution used for crew-size sampling, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkersCapacity {
    /// `"lognormal"`, `"normal"` or `"uniform"`.
    pub distribution: String,
    /// Second distribution parameter; the first is the computed mean.
    pub beta: f64,
}

/// Workforce risk parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceParams {
    /// Pool size mean for buildings at or below the area cutoff.
    pub max_workers_minimum: f64,
    /// Extra workers per unit of area above the cutoff.
    pub max_workers_slope: f64,
    /// Area above which the pool grows.
    pub max_workers_x_cutoff: f64,
    /// Pool size standard deviation.
    pub max_workers_sigma: f64,
    /// Crew-size distribution for caps and recommended workers.
    pub workers_capacity: WorkersCapacity,
    /// Workers per damaged component, per sequence.
    pub nworkers_recommended_mean: Vec<f64>,
    /// Floor area per worker, per sequence.
    pub nwork_perfloor_divider: Vec<f64>,
    /// Mean building-wide cap per sequence, one row per height class.
    pub max_workers_by_sequence: Vec<Vec<f64>>,
}

/// Height class of a building: 0 up to 5 floors, 1 up to 20, 2 above.
pub fn height_index(total_floors: usize) -> usize {
    if total_floors <= 5 {
        0
    } else if total_floors <= 20 {
        1
    } else {
        2
    }
}

impl WorkforceParams {
    fn crew_distribution(&self, mean: f64) -> Result<Distribution> {
        Distribution::from_name(
            &self.workers_capacity.distribution,
            mean,
            self.workers_capacity.beta,
        )
    }

    /// Samples the total worker pool for a building of `total_area`.
    ///
    /// Normal, truncated at zero, with mean
    /// `minimum + max(0, area - cutoff) * slope`.
    pub fn sample_pool_size(&self, total_area: f64, rng: &mut RandomSource) -> f64 {
        let mean = self.max_workers_minimum
            + (total_area - self.max_workers_x_cutoff).max(0.0) * self.max_workers_slope;
        let pool = rng.sample(&Distribution::Normal {
            mean,
            sigma: self.max_workers_sigma,
        });
        debug!(total_area, mean, pool, "pool size sampled");
        pool
    }

    /// Samples the building-wide worker cap for each sequence.
    pub fn sample_sequence_constraints(
        &self,
        total_floors: usize,
        rng: &mut RandomSource,
    ) -> Result<Vec<f64>> {
        let height = height_index(total_floors);
        let means = self.max_workers_by_sequence.get(height).ok_or_else(|| {
            ScheduleError::MalformedInput(vec![ValidationError::new(
                ValidationErrorKind::LengthMismatch,
                format!(
                    "max_workers_by_sequence has {} height classes, need index {height}",
                    self.max_workers_by_sequence.len()
                ),
            )])
        })?;

        means
            .iter()
            .map(|&mean| -> Result<f64> { Ok(rng.sample(&self.crew_distribution(mean)?)) })
            .collect()
    }

    /// Samples the recommended crew for every floor × sequence.
    ///
    /// The mean is the smaller of the area-based estimate
    /// `floor_area / divider[seq]` and the damage-based estimate
    /// `mean[seq] * damaged_qty`. Cells are sampled floor by floor.
    pub fn sample_recommended_workers(
        &self,
        floor_areas: &[f64],
        damaged_qty: &FloorSequenceGrid<f64>,
        rng: &mut RandomSource,
    ) -> Result<FloorSequenceGrid<f64>> {
        let (floors, sequences) = damaged_qty.shape();
        let mut errors = Vec::new();
        if floor_areas.len() != floors {
            errors.push(ValidationError::new(
                ValidationErrorKind::LengthMismatch,
                format!("{} floor areas for {floors} floors", floor_areas.len()),
            ));
        }
        for (name, len) in [
            ("nwork_perfloor_divider", self.nwork_perfloor_divider.len()),
            ("nworkers_recommended_mean", self.nworkers_recommended_mean.len()),
        ] {
            if len != sequences {
                errors.push(ValidationError::new(
                    ValidationErrorKind::LengthMismatch,
                    format!("{name} has {len} entries for {sequences} sequences"),
                ));
            }
        }
        if !errors.is_empty() {
            return Err(ScheduleError::MalformedInput(errors));
        }

        let mut recommended = FloorSequenceGrid::filled(floors, sequences, 0.0);
        for (floor, &area) in floor_areas.iter().enumerate() {
            for sequence in 0..sequences {
                let by_area = area / self.nwork_perfloor_divider[sequence];
                let by_damage = self.nworkers_recommended_mean[sequence]
                    * damaged_qty.get(floor, sequence).copied().unwrap_or(0.0);
                let sample = rng.sample(&self.crew_distribution(by_area.min(by_damage))?);
                recommended.set(floor, sequence, sample);
            }
        }
        Ok(recommended)
    }
}
