//! Parsers for placement input.
//!
//! This module provides parsers for:
//!
//! - **JSON documents**: students and units in one file (see [`json`])
//! - **Ranking sheets**: TSV/CSV rows of `unit, student, rank` that replace a
//!   unit's preferences (see [`tsv`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use place_solver::parsing::json::parse_json_file;
//! use place_solver::parsing::tsv::parse_rank_file;
//! use std::path::Path;
//!
//! let mut input = parse_json_file(Path::new("placement.json")).unwrap();
//! let sheet = parse_rank_file(Path::new("rankings.tsv"), '\t').unwrap();
//! sheet.apply(&mut input).unwrap();
//! ```

use thiserror::Error;

pub mod json;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Ranking sheet names unknown unit '{0}'")]
    UnknownUnit(String),
}
