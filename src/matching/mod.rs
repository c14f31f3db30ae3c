//! Placement engine, scoring and explanations.
//!
//! This module provides the core matching functionality:
//!
//! - [`MatchingEngine`](engine::MatchingEngine): weighted unit-proposing deferred acceptance
//! - [`ScoreComponents`](scoring::ScoreComponents): the per-pairing score triple
//! - [`Reason`]: a qualitative explanation for every decision
//! - [`boost_voice_by_demand`](demand::boost_voice_by_demand): demand-based voice boost
//!
//! ## Scoring
//!
//! For a student `s` and a unit `u` in a run with `n` units:
//!
//! - **Student component**: `s.voice * (n - rank(s, u))`
//! - **Unit component**: `gamma * u.power`
//! - **Total**: the sum of both
//!
//! A placed student moves to a proposing unit only when the proposer's total is
//! strictly higher than the current unit's total.
//!
//! ## Example
//!
//! ```rust
//! use place_solver::{MatchingEngine, PlacementInput, StudentRecord, UnitRecord};
//! use place_solver::core::preference::Tier;
//!
//! let input = PlacementInput::new(
//!     vec![
//!         StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")]),
//!         StudentRecord::new("B", vec![Tier::from("Y"), Tier::from("X")]),
//!     ],
//!     vec![
//!         UnitRecord::new("X", 1, vec![Tier::from(vec!["A", "B"])]),
//!         UnitRecord::new("Y", 1, vec![Tier::from(vec!["B", "A"])]),
//!     ],
//! );
//!
//! let outcome = MatchingEngine::with_gamma(1.0).run_records(&input);
//! assert_eq!(outcome.unit_of("A"), Some("X"));
//! assert_eq!(outcome.unit_of("B"), Some("Y"));
//!
//! for (student, reason) in outcome.reasons() {
//!     println!("{student}: {reason}");
//! }
//! ```

pub mod assignment;
pub mod demand;
pub mod diagnosis;
pub mod engine;
pub mod scoring;

pub use diagnosis::Reason;
