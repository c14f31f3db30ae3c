//! # place-solver
//!
//! A library for placing students into capacity-limited units with a weighted
//! variant of deferred acceptance.
//!
//! Units propose down their ranked lists of students. A student holds one offer at a
//! time and moves only when a new offer scores strictly higher, where the score
//! combines the student's own ranking (scaled by their voice) with the unit's
//! institutional power (scaled by a global gamma). Strong units can therefore win
//! students who ranked them low, and every outcome comes with a reason saying so.
//!
//! ## Features
//!
//! - **Tiered preferences**: equally ranked names share a tier on both sides
//! - **Weighted scoring**: per-student voice, per-unit power, global gamma
//! - **Explanations**: a typed reason for every placement, stay and switch
//! - **Demand booster**: students listed by many units get extra voice
//! - **Parameter search**: gamma sweep and randomized power search with sticky units
//!
//! ## Example
//!
//! ```rust
//! use place_solver::{GammaSweep, PlacementInput, StudentRecord, Tier, UnitRecord};
//!
//! let input = PlacementInput::new(
//!     vec![
//!         StudentRecord::new("A", vec![Tier::from("X"), Tier::from("Y")]),
//!         StudentRecord::new("B", vec![Tier::from("X")]),
//!     ],
//!     vec![
//!         UnitRecord::new("X", 1, vec![Tier::from(vec!["A", "B"])]),
//!         UnitRecord::new("Y", 1, vec![Tier::from("A")]),
//!     ],
//! );
//!
//! let best = GammaSweep::default().run(&input).unwrap();
//! for placement in &best.outcome.placements {
//!     println!("{}: {}", placement.student, placement.reason);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Preferences, student and unit records, per-run state
//! - [`matching`]: Matching engine, scoring, reasons and demand booster
//! - [`search`]: Gamma sweep and randomized power search
//! - [`parsing`]: JSON input documents and TSV/CSV ranking sheets
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod search;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::preference::{Preferences, Tier};
pub use core::student::StudentRecord;
pub use core::types::*;
pub use core::unit::UnitRecord;
pub use matching::engine::{MatchOutcome, MatchingConfig, MatchingEngine, Placement};
pub use matching::Reason;
pub use search::gamma::{GammaSweep, SweepResult};
pub use search::power::{OptimizationResult, PowerSearch};
pub use search::{GammaGrid, PowerRange, SearchError};
