//! Parameter search around the matching engine.
//!
//! Both searches rebuild student and unit state from the input records for every
//! trial and keep the configuration with the fewest unmatched students:
//!
//! - [`GammaSweep`](gamma::GammaSweep): tries each gamma of a [`GammaGrid`] with the
//!   current unit powers
//! - [`PowerSearch`](power::PowerSearch): draws random powers for every non-sticky
//!   unit, sweeps gamma per draw, and stops as soon as nobody is left unmatched
//!
//! Ties never replace an earlier result, so the first configuration to reach the
//! best count wins.

use thiserror::Error;

use crate::matching::scoring::count_to_f64;

pub mod gamma;
pub mod power;

/// Maximum number of gamma values a single grid may hold
pub const MAX_GAMMA_VALUES: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Gamma grid is empty: start {start}, stop {stop}, step {step}")]
    EmptyGammaGrid { start: f64, stop: f64, step: f64 },

    #[error("Gamma grid has {count} values, more than the maximum of {MAX_GAMMA_VALUES}")]
    GammaGridTooLarge { count: f64 },

    #[error("Invalid power range: [{min}, {max}]")]
    InvalidPowerRange { min: f64, max: f64 },

    #[error("Power search needs at least one iteration")]
    ZeroIterations,
}

/// Half-open range of gamma values, `start, start + step, ...` below `stop`
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GammaGrid {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl GammaGrid {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Grid used by a plain gamma sweep: 0.5, 1.0, ..., 2.5
    #[must_use]
    pub fn sweep_default() -> Self {
        Self::new(0.5, 3.0, 0.5)
    }

    /// Grid used inside each power-search trial: 0.5, 1.0, ..., 4.5
    #[must_use]
    pub fn optimize_default() -> Self {
        Self::new(0.5, 5.0, 0.5)
    }

    /// Single gamma value
    #[must_use]
    pub fn single(gamma: f64) -> Self {
        Self::new(gamma, gamma + 1.0, 1.0)
    }

    /// All gamma values, computed from the index to avoid accumulated drift
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyGammaGrid` if the step is not positive or the
    /// grid holds no values, and `SearchError::GammaGridTooLarge` if it holds more
    /// than [`MAX_GAMMA_VALUES`].
    pub fn values(&self) -> Result<impl Iterator<Item = f64>, SearchError> {
        let span = (self.stop - self.start) / self.step;
        if self.step <= 0.0 || !span.is_finite() || span <= 0.0 {
            return Err(SearchError::EmptyGammaGrid {
                start: self.start,
                stop: self.stop,
                step: self.step,
            });
        }
        let count = span.ceil();
        if count > count_to_f64(MAX_GAMMA_VALUES) {
            return Err(SearchError::GammaGridTooLarge { count });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count as usize;
        let (start, step) = (self.start, self.step);
        Ok((0..count).map(move |i| start + step * count_to_f64(i)))
    }
}

/// Bounds for random power draws
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PowerRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PowerRange {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 50.0,
        }
    }
}

impl PowerRange {
    /// # Errors
    ///
    /// Returns `SearchError::InvalidPowerRange` unless `0 < min <= max` and both are finite.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
        {
            Ok(())
        } else {
            Err(SearchError::InvalidPowerRange {
                min: self.min,
                max: self.max,
            })
        }
    }
}
