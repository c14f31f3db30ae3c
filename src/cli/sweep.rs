//! Sweep command - deterministic search over gamma with the input powers.

use clap::Args;

use crate::cli::{
    load_input, outcome_json, print_outcome_text, print_outcome_tsv, BoostArgs, InputArgs,
    OutputFormat,
};
use crate::search::gamma::GammaSweep;
use crate::search::GammaGrid;

/// Arguments for the sweep command
#[derive(Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub boost: BoostArgs,

    /// First gamma to try
    #[arg(long, default_value_t = 0.5)]
    pub gamma_start: f64,

    /// Gamma values stop below this bound
    #[arg(long, default_value_t = 3.0)]
    pub gamma_stop: f64,

    /// Distance between gamma values
    #[arg(long, default_value_t = 0.5)]
    pub gamma_step: f64,
}

/// Execute the sweep command
///
/// # Errors
///
/// Returns an error if the input cannot be loaded or the gamma grid is empty or too large.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: SweepArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = load_input(&args.input)?;
    let grid = GammaGrid::new(args.gamma_start, args.gamma_stop, args.gamma_step);
    if verbose {
        eprintln!("Sweeping gamma over {:?}", grid.values()?.collect::<Vec<_>>());
    }

    let sweep = GammaSweep {
        grid,
        alpha: args.boost.alpha(),
        proposal_order: args.input.proposal_order(),
    };
    let result = sweep.run(&input)?;

    match format {
        OutputFormat::Text => {
            println!(
                "Best gamma: {:.2} ({} unmatched)",
                result.gamma, result.unmatched
            );
            println!();
            print_outcome_text(&result.outcome);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "gamma": result.gamma,
                "unmatched_count": result.unmatched,
                "outcome": outcome_json(&result.outcome),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_outcome_tsv(&result.outcome),
    }

    Ok(())
}
