//! Solve command - one matching run with a fixed gamma.

use clap::Args;

use crate::cli::{
    load_input, outcome_json, print_outcome_text, print_outcome_tsv, BoostArgs, InputArgs,
    OutputFormat,
};
use crate::matching::engine::{MatchingConfig, MatchingEngine, DEFAULT_GAMMA};

/// Arguments for the solve command
#[derive(Args)]
pub struct SolveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Global multiplier on unit power
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    pub gamma: f64,

    #[command(flatten)]
    pub boost: BoostArgs,
}

/// Execute the solve command
///
/// # Errors
///
/// Returns an error if the input cannot be loaded or output cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: SolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = load_input(&args.input)?;
    if verbose {
        eprintln!(
            "Loaded {} students and {} units ({} places)",
            input.students.len(),
            input.units.len(),
            input.total_capacity()
        );
    }

    let engine = MatchingEngine::with_config(MatchingConfig {
        gamma: args.gamma,
        proposal_order: args.input.proposal_order(),
    });
    let outcome = match args.boost.alpha() {
        Some(alpha) => engine.run_boosted(&input, alpha),
        None => engine.run_records(&input),
    };

    match format {
        OutputFormat::Text => print_outcome_text(&outcome),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        }
        OutputFormat::Tsv => print_outcome_tsv(&outcome),
    }

    Ok(())
}
