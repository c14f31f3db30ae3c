//! Command-line interface for place-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **solve**: Run the matching once with a fixed gamma
//! - **sweep**: Try every gamma on a grid with the units' current powers
//! - **optimize**: Randomized power search with a gamma sweep per trial
//!
//! ## Usage
//!
//! ```text
//! # One run at gamma 1.5 without the demand booster
//! place-solver solve placement.json --gamma 1.5 --no-boost
//!
//! # Unit rankings kept in a spreadsheet export
//! place-solver sweep placement.json --ranks rankings.csv
//!
//! # Reproducible optimization, JSON output for scripting
//! place-solver optimize placement.json --seed 42 --iterations 500 --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::core::types::{PlacementInput, ProposalOrder};
use crate::matching::demand::DEFAULT_ALPHA;
use crate::matching::engine::MatchOutcome;
use crate::parsing::json::parse_json_file;
use crate::parsing::tsv::parse_rank_file;
use crate::utils::validation::{check_record_limit, validate};

pub mod optimize;
pub mod solve;
pub mod sweep;

#[derive(Parser)]
#[command(name = "place-solver")]
#[command(version)]
#[command(about = "Place students into capacity-limited units with weighted deferred acceptance")]
#[command(
    long_about = "place-solver assigns students to units that propose down their ranked lists.\n\nA student moves to a new offer only when it scores strictly higher, where the score adds the student's own ranking (scaled by voice) to the unit's power (scaled by gamma). Every placement comes with a plain-language reason, and the sweep and optimize commands search gamma and unit powers for the fewest unmatched students."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the matching once
    Solve(solve::SolveArgs),

    /// Sweep gamma with the current unit powers
    Sweep(sweep::SweepArgs),

    /// Search unit powers and gamma for the fewest unmatched students
    Optimize(optimize::OptimizeArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Input options shared by every command
#[derive(Args)]
pub struct InputArgs {
    /// Input document (JSON) with students and units
    #[arg(required = true)]
    pub input: PathBuf,

    /// Ranking sheet with columns unit, student, rank (TSV, or CSV by extension).
    /// Replaces the preferences of every unit it names.
    #[arg(long)]
    pub ranks: Option<PathBuf>,

    /// Queue units in input order instead of by descending power
    #[arg(long)]
    pub input_order: bool,
}

impl InputArgs {
    #[must_use]
    pub fn proposal_order(&self) -> ProposalOrder {
        if self.input_order {
            ProposalOrder::Input
        } else {
            ProposalOrder::PowerDescending
        }
    }
}

/// Demand booster options
#[derive(Args)]
pub struct BoostArgs {
    /// Voice added to a student for every unit that lists them
    #[arg(long, default_value_t = DEFAULT_ALPHA, conflicts_with = "no_boost")]
    pub alpha: f64,

    /// Run without the demand booster
    #[arg(long)]
    pub no_boost: bool,
}

impl BoostArgs {
    #[must_use]
    pub fn alpha(&self) -> Option<f64> {
        (!self.no_boost).then_some(self.alpha)
    }
}

/// Load the input document, merge any ranking sheet, and log validation warnings.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, the ranking sheet names an
/// unknown unit, or the input holds too many records.
pub fn load_input(args: &InputArgs) -> anyhow::Result<PlacementInput> {
    let mut input = parse_json_file(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if let Some(ranks) = &args.ranks {
        let sheet = parse_rank_file(ranks, delimiter_for(ranks))
            .with_context(|| format!("Failed to load {}", ranks.display()))?;
        sheet.apply(&mut input)?;
        tracing::debug!(units = sheet.units.len(), "applied ranking sheet");
    }

    for (kind, count) in [("students", input.students.len()), ("units", input.units.len())] {
        if let Some(message) = check_record_limit(kind, count) {
            anyhow::bail!(message);
        }
    }

    for warning in validate(&input) {
        tracing::warn!("{warning}");
    }

    Ok(input)
}

fn delimiter_for(path: &Path) -> char {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => ',',
        _ => '\t',
    }
}

/// Per-student placements and per-unit fill
pub(crate) fn print_outcome_text(outcome: &MatchOutcome) {
    println!("Placements (gamma {:.2}):", outcome.gamma);
    println!("{}", "─".repeat(60));
    for placement in &outcome.placements {
        match &placement.unit {
            Some(unit) => println!("  {} → {}", placement.student, unit),
            None => println!("  {} → (unmatched)", placement.student),
        }
        println!("      {}", placement.reason);
    }

    println!();
    println!("Units:");
    println!("{}", "─".repeat(60));
    for unit in &outcome.units {
        println!(
            "  {:<20} {}/{} ({} free)  power {:.1}  {}",
            unit.name,
            unit.members.len(),
            unit.capacity,
            unit.free_slots(),
            unit.power,
            unit.members.join(", ")
        );
    }

    println!();
    let unmatched = outcome.unmatched_count();
    if unmatched == 0 {
        println!("All {} students placed.", outcome.placements.len());
    } else {
        println!(
            "{unmatched} of {} students unmatched: {}",
            outcome.placements.len(),
            outcome.unmatched().collect::<Vec<_>>().join(", ")
        );
    }
}

/// JSON view of an outcome; reasons carry both text and structure
pub(crate) fn outcome_json(outcome: &MatchOutcome) -> serde_json::Value {
    serde_json::json!({
        "gamma": outcome.gamma,
        "proposals": outcome.proposals,
        "unmatched": outcome.unmatched().collect::<Vec<_>>(),
        "placements": outcome.placements.iter().map(|p| {
            serde_json::json!({
                "student": p.student,
                "unit": p.unit,
                "reason": p.reason.to_string(),
                "detail": p.reason,
            })
        }).collect::<Vec<_>>(),
        "units": outcome.units.iter().map(|u| {
            serde_json::json!({
                "name": u.name,
                "capacity": u.capacity,
                "filled": u.members.len(),
                "free": u.free_slots(),
                "power": u.power,
                "members": u.members,
            })
        }).collect::<Vec<_>>(),
    })
}

pub(crate) fn print_outcome_tsv(outcome: &MatchOutcome) {
    println!("student\tunit\treason");
    for placement in &outcome.placements {
        println!(
            "{}\t{}\t{}",
            placement.student,
            placement.unit.as_deref().unwrap_or(""),
            placement.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for(Path::new("ranks.csv")), ',');
        assert_eq!(delimiter_for(Path::new("ranks.CSV")), ',');
        assert_eq!(delimiter_for(Path::new("ranks.tsv")), '\t');
        assert_eq!(delimiter_for(Path::new("ranks")), '\t');
    }

    #[test]
    fn test_boost_args() {
        let boost = BoostArgs {
            alpha: 2.0,
            no_boost: false,
        };
        assert_eq!(boost.alpha(), Some(2.0));
        let off = BoostArgs {
            alpha: 2.0,
            no_boost: true,
        };
        assert_eq!(off.alpha(), None);
    }
}
