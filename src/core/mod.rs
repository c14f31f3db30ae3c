//! Core data types for placement.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Tier`](preference::Tier), [`Preferences`](preference::Preferences): ranked
//!   preference lists where a tier may hold several equally ranked names
//! - [`StudentRecord`](student::StudentRecord), [`UnitRecord`](unit::UnitRecord):
//!   caller-supplied input
//! - [`Student`](student::Student), [`Unit`](unit::Unit): per-run state built fresh
//!   from the records for every run
//! - [`PlacementInput`](types::PlacementInput), [`ProposalOrder`](types::ProposalOrder),
//!   [`Factor`](types::Factor)
//!
//! ## Ranks
//!
//! A rank is the zero-based tier index. A name that does not appear in a list gets
//! the tier count as its rank, which is worse than every named tier:
//!
//! | Preferences        | rank("X") | rank("Y") | rank("Q") |
//! |--------------------|-----------|-----------|-----------|
//! | `["X", "Y"]`       | 0         | 1         | 2         |
//! | `[["X", "Y"]]`     | 0         | 0         | 1         |

pub mod preference;
pub mod student;
pub mod types;
pub mod unit;
