//! Optimize command - randomized power search with a gamma sweep per trial.
//!
//! Units marked `sticky_power` keep their input power; every other unit draws a
//! new power each trial. The search stops early once every student is placed.

use clap::Args;

use crate::cli::{
    load_input, outcome_json, print_outcome_text, print_outcome_tsv, BoostArgs, InputArgs,
    OutputFormat,
};
use crate::search::power::{OptimizationResult, PowerSearch, DEFAULT_ITERATIONS};
use crate::search::{GammaGrid, PowerRange};

/// Arguments for the optimize command
#[derive(Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub boost: BoostArgs,

    /// Number of random power draws
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Seed for reproducible draws (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Lowest power a unit may draw
    #[arg(long, default_value_t = 0.5)]
    pub power_min: f64,

    /// Highest power a unit may draw
    #[arg(long, default_value_t = 50.0)]
    pub power_max: f64,

    /// First gamma to try in each trial
    #[arg(long, default_value_t = 0.5)]
    pub gamma_start: f64,

    /// Gamma values stop below this bound
    #[arg(long, default_value_t = 5.0)]
    pub gamma_stop: f64,

    /// Distance between gamma values
    #[arg(long, default_value_t = 0.5)]
    pub gamma_step: f64,
}

/// Execute the optimize command
///
/// # Errors
///
/// Returns an error if the input cannot be loaded or the search is misconfigured.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: OptimizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = load_input(&args.input)?;

    let search = PowerSearch {
        iterations: args.iterations,
        power_range: PowerRange {
            min: args.power_min,
            max: args.power_max,
        },
        gamma_grid: GammaGrid::new(args.gamma_start, args.gamma_stop, args.gamma_step),
        alpha: args.boost.alpha(),
        proposal_order: args.input.proposal_order(),
        seed: args.seed,
    };

    if verbose {
        let sticky = input.units.iter().filter(|u| u.sticky_power).count();
        eprintln!(
            "Searching {} iterations over power [{:.1}, {:.1}]; {sticky} of {} units keep their power",
            search.iterations,
            search.power_range.min,
            search.power_range.max,
            input.units.len(),
        );
    }

    let result = search.run(&input)?;

    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Tsv => print_tsv(&result),
    }

    Ok(())
}

fn print_text(result: &OptimizationResult) {
    println!(
        "Best configuration after {} trials: gamma {:.2}, {} unmatched",
        result.trials_run, result.gamma, result.unmatched
    );
    println!();
    println!("Powers:");
    for (unit, power) in &result.powers {
        println!("  {unit:<20} {power:.1}");
    }
    println!();
    print_outcome_text(&result.outcome);
}

fn print_json(result: &OptimizationResult) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "gamma": result.gamma,
        "powers": result.powers,
        "unmatched_count": result.unmatched,
        "trials_run": result.trials_run,
        "outcome": outcome_json(&result.outcome),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(result: &OptimizationResult) {
    println!("unit\tpower");
    for (unit, power) in &result.powers {
        println!("{unit}\t{power:.1}");
    }
    println!();
    print_outcome_tsv(&result.outcome);
}
