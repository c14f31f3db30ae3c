use serde::Serialize;

use crate::core::preference::ordinal;
use crate::core::types::Factor;
use crate::matching::scoring::{count_to_f64, dominant_factor, ScoreComponents};

/// Why a student ended up where they are.
///
/// One reason is kept per student; later decisions overwrite earlier ones.
/// Reasons are descriptive only and never feed back into the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reason {
    /// First offer to a student without a placement
    Accepted { unit: String, rank: usize, fit: Fit },

    /// Moved to a proposer with a strictly higher total
    Switched {
        from: String,
        to: String,
        old_rank: usize,
        new_rank: usize,
        cause: SwitchCause,
        factor: Factor,
    },

    /// A proposer did not beat the current placement
    Stayed {
        current: String,
        proposer: String,
        cause: StayCause,
    },

    /// No proposer ever reached this student with enough advantage
    Unmatched,
}

/// How the first accepted unit relates to the student's own ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fit", rename_all = "snake_case")]
pub enum Fit {
    /// The unit sits in the student's first tier
    TopChoice,

    /// Ranked, but below the first tier.
    ///
    /// `threshold` is the power at which the unit outbids the student's first
    /// choice (assuming the first choice has unit power); absent when gamma is not
    /// positive.
    Ranked { power: f64, threshold: Option<f64> },

    /// The student did not rank the unit at all
    Unranked { power: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchCause {
    /// Higher on the student's list, no power gain
    Preference,
    /// Stronger unit, no preference gain
    Power,
    /// Both improved
    Both,
    /// Neither improved on its own, the total still did
    Combined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StayCause {
    PreferenceInsufficient,
    PowerInsufficient,
    CombinedInsufficient,
    IncumbentStronger,
}

impl Reason {
    /// First offer to a free student. `tier_count` is the length of the student's
    /// own list, used to tell an unranked unit from a ranked one.
    pub fn accepted(
        unit: &str,
        score: &ScoreComponents,
        voice: f64,
        power: f64,
        gamma: f64,
        tier_count: usize,
    ) -> Self {
        let fit = if score.rank >= tier_count {
            Fit::Unranked { power }
        } else if score.rank == 0 {
            Fit::TopChoice
        } else {
            let threshold = (gamma > 0.0).then(|| voice * count_to_f64(score.rank) / gamma + 1.0);
            Fit::Ranked { power, threshold }
        };

        Self::Accepted {
            unit: unit.to_string(),
            rank: score.rank,
            fit,
        }
    }

    pub fn switched(from: &str, to: &str, old: &ScoreComponents, new: &ScoreComponents) -> Self {
        let preference_improved = new.rank < old.rank;
        let power_improved = new.unit > old.unit;

        let cause = match (preference_improved, power_improved) {
            (true, false) => SwitchCause::Preference,
            (false, true) => SwitchCause::Power,
            (true, true) => SwitchCause::Both,
            (false, false) => SwitchCause::Combined,
        };

        Self::Switched {
            from: from.to_string(),
            to: to.to_string(),
            old_rank: old.rank,
            new_rank: new.rank,
            cause,
            factor: dominant_factor(old, new),
        }
    }

    pub fn stayed(
        current: &str,
        proposer: &str,
        old: &ScoreComponents,
        new: &ScoreComponents,
    ) -> Self {
        let preference_better = new.rank < old.rank;
        let power_better = new.unit > old.unit;

        let cause = match (preference_better, power_better) {
            (true, false) => StayCause::PreferenceInsufficient,
            (false, true) => StayCause::PowerInsufficient,
            (true, true) => StayCause::CombinedInsufficient,
            (false, false) => StayCause::IncumbentStronger,
        };

        Self::Stayed {
            current: current.to_string(),
            proposer: proposer.to_string(),
            cause,
        }
    }

    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted { unit, rank, fit } => {
                write!(
                    f,
                    "Matched with {unit}, the first offer received; the student had no prior commitment."
                )?;
                match fit {
                    Fit::TopChoice => write!(f, " {unit} is the student's top choice."),
                    Fit::Ranked { power, threshold } => {
                        write!(
                            f,
                            " {unit} is the student's {} choice; its power ({power:.1}) outweighed the higher-ranked options.",
                            ordinal(*rank)
                        )?;
                        if let Some(threshold) = threshold {
                            write!(f, " Power threshold for this student: {threshold:.1}.")?;
                        }
                        Ok(())
                    }
                    Fit::Unranked { power } => write!(
                        f,
                        " The student did not rank {unit}; its institutional power ({power:.1}) overrode the stated preferences."
                    ),
                }
            }
            Self::Switched {
                from,
                to,
                old_rank,
                new_rank,
                cause,
                factor,
            } => {
                let change = format!("{} → {}", ordinal(*old_rank), ordinal(*new_rank));
                match cause {
                    SwitchCause::Preference => write!(
                        f,
                        "Switched from {from} to {to} because {to} is higher on the student's preference list ({change})."
                    )?,
                    SwitchCause::Power => write!(
                        f,
                        "Switched from {from} to {to} even though the preference rank did not improve ({change}), because {to} carries stronger institutional weight."
                    )?,
                    SwitchCause::Both => match factor {
                        Factor::Preference => write!(
                            f,
                            "Switched from {from} to {to}; main reason: higher preference ({change}) plus stronger unit weight."
                        )?,
                        Factor::Power => write!(
                            f,
                            "Switched from {from} to {to}; main reason: notably stronger unit weight alongside a modest preference improvement ({change})."
                        )?,
                        Factor::Mixed => write!(
                            f,
                            "Switched from {from} to {to} due to a balance of higher preference ({change}) and greater unit weight."
                        )?,
                    },
                    SwitchCause::Combined => write!(
                        f,
                        "Switched from {from} to {to} ({change}) due to a small combined advantage."
                    )?,
                }
                write!(f, " Dominant factor: {factor}.")
            }
            Self::Stayed {
                current,
                proposer,
                cause,
            } => match cause {
                StayCause::PreferenceInsufficient => write!(
                    f,
                    "Stayed with {current}; although {proposer} proposed and is higher preference, its overall influence was not enough to justify a switch."
                ),
                StayCause::PowerInsufficient => write!(
                    f,
                    "Stayed with {current}; {proposer}'s greater weight did not compensate for its lower or equal preference rank."
                ),
                StayCause::CombinedInsufficient => write!(
                    f,
                    "Stayed with {current}; the combined improvement from {proposer} was too small to warrant a change."
                ),
                StayCause::IncumbentStronger => write!(
                    f,
                    "Stayed with {current} because {current} is at least as preferred and at least as strong as {proposer}."
                ),
            },
            Self::Unmatched => write!(
                f,
                "Unmatched; no proposing unit achieved a sufficient combined advantage in preference and institutional weight."
            ),
        }
    }
}
