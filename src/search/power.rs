use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::{PlacementInput, ProposalOrder};
use crate::matching::demand::DEFAULT_ALPHA;
use crate::matching::engine::MatchOutcome;
use crate::search::gamma::GammaSweep;
use crate::search::{GammaGrid, PowerRange, SearchError};

/// Default number of random power draws
pub const DEFAULT_ITERATIONS: usize = 200;

/// Best configuration found by a power search
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub outcome: MatchOutcome,
    pub gamma: f64,

    /// Power every unit had in the winning trial; sticky units keep their input power
    pub powers: BTreeMap<String, f64>,

    pub unmatched: usize,

    /// Trials run before the search stopped
    pub trials_run: usize,
}

/// Randomized search over per-unit power, with a gamma sweep inside every trial
#[derive(Debug, Clone)]
pub struct PowerSearch {
    pub iterations: usize,
    pub power_range: PowerRange,
    pub gamma_grid: GammaGrid,
    /// Demand boost per listing unit; `None` runs without boosting
    pub alpha: Option<f64>,
    pub proposal_order: ProposalOrder,
    /// Fixed seed for reproducible draws; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for PowerSearch {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            power_range: PowerRange::default(),
            gamma_grid: GammaGrid::optimize_default(),
            alpha: Some(DEFAULT_ALPHA),
            proposal_order: ProposalOrder::default(),
            seed: None,
        }
    }
}

impl PowerSearch {
    /// Run the search with an RNG built from `seed`.
    ///
    /// # Errors
    ///
    /// Returns a `SearchError` if the configuration is invalid.
    pub fn run(&self, input: &PlacementInput) -> Result<OptimizationResult, SearchError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with_rng(input, &mut rng)
    }

    /// Run the search drawing powers from `rng`.
    ///
    /// Each trial copies the input, redraws the power of every non-sticky unit and
    /// sweeps gamma. A trial only replaces the best result when it leaves strictly
    /// fewer students unmatched. The search returns as soon as a trial places
    /// everyone.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::ZeroIterations`, `SearchError::InvalidPowerRange`,
    /// `SearchError::EmptyGammaGrid` or `SearchError::GammaGridTooLarge` if the
    /// configuration is invalid.
    pub fn run_with_rng<R: Rng>(
        &self,
        input: &PlacementInput,
        rng: &mut R,
    ) -> Result<OptimizationResult, SearchError> {
        if self.iterations == 0 {
            return Err(SearchError::ZeroIterations);
        }
        self.power_range.validate()?;
        let _ = self.gamma_grid.values()?;

        let sweep = GammaSweep {
            grid: self.gamma_grid,
            alpha: self.alpha,
            proposal_order: self.proposal_order,
        };

        let mut best: Option<OptimizationResult> = None;

        for trial in 1..=self.iterations {
            let candidate = self.draw_powers(input, rng);
            let result = sweep.run(&candidate)?;

            if best
                .as_ref()
                .map_or(true, |b| result.unmatched < b.unmatched)
            {
                tracing::info!(
                    trial,
                    gamma = result.gamma,
                    unmatched = result.unmatched,
                    "found better configuration"
                );
                best = Some(OptimizationResult {
                    powers: result
                        .outcome
                        .units
                        .iter()
                        .map(|u| (u.name.clone(), u.power))
                        .collect(),
                    outcome: result.outcome,
                    gamma: result.gamma,
                    unmatched: result.unmatched,
                    trials_run: trial,
                });
            }

            if let Some(b) = best.as_mut() {
                b.trials_run = trial;
                if b.unmatched == 0 {
                    tracing::info!(trial, "every student placed, stopping early");
                    break;
                }
            }
        }

        best.ok_or(SearchError::ZeroIterations)
    }

    /// Copy of `input` with fresh powers for every non-sticky unit
    fn draw_powers<R: Rng>(&self, input: &PlacementInput, rng: &mut R) -> PlacementInput {
        let mut candidate = input.clone();
        for unit in candidate.units.iter_mut().filter(|u| !u.sticky_power) {
            let raw = rng.gen_range(self.power_range.min..=self.power_range.max);
            unit.power = round_to_tenth(raw).clamp(self.power_range.min, self.power_range.max);
        }
        candidate
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
