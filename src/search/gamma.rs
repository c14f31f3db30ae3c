use crate::core::types::{PlacementInput, ProposalOrder};
use crate::matching::demand::DEFAULT_ALPHA;
use crate::matching::engine::{MatchOutcome, MatchingConfig, MatchingEngine};
use crate::search::{GammaGrid, SearchError};

/// Best run found by a gamma sweep
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub outcome: MatchOutcome,
    pub gamma: f64,
    pub unmatched: usize,
}

/// Deterministic sweep over gamma with the units' current powers
#[derive(Debug, Clone)]
pub struct GammaSweep {
    pub grid: GammaGrid,
    /// Demand boost per listing unit; `None` runs without boosting
    pub alpha: Option<f64>,
    pub proposal_order: ProposalOrder,
}

impl Default for GammaSweep {
    fn default() -> Self {
        Self {
            grid: GammaGrid::sweep_default(),
            alpha: Some(DEFAULT_ALPHA),
            proposal_order: ProposalOrder::default(),
        }
    }
}

impl GammaSweep {
    pub fn new(grid: GammaGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Run one boosted matching per gamma and keep the fewest unmatched.
    ///
    /// The first gamma to reach the best count wins; a sweep that reaches zero
    /// stops there since nothing later could replace it.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyGammaGrid` if the grid holds no values, or
    /// `SearchError::GammaGridTooLarge` if it holds too many.
    pub fn run(&self, input: &PlacementInput) -> Result<SweepResult, SearchError> {
        let mut best: Option<SweepResult> = None;

        for gamma in self.grid.values()? {
            let engine = MatchingEngine::with_config(MatchingConfig {
                gamma,
                proposal_order: self.proposal_order,
            });
            let outcome = match self.alpha {
                Some(alpha) => engine.run_boosted(input, alpha),
                None => engine.run_records(input),
            };
            let unmatched = outcome.unmatched_count();
            tracing::debug!(gamma, unmatched, "gamma trial");

            if best.as_ref().map_or(true, |b| unmatched < b.unmatched) {
                best = Some(SweepResult {
                    outcome,
                    gamma,
                    unmatched,
                });
            }
            if unmatched == 0 {
                break;
            }
        }

        best.ok_or(SearchError::EmptyGammaGrid {
            start: self.grid.start,
            stop: self.grid.stop,
            step: self.grid.step,
        })
    }
}
