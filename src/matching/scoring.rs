use crate::core::student::Student;
use crate::core::types::Factor;
use crate::core::unit::Unit;

/// How much larger one delta must be than the other to count as dominant
pub const DOMINANCE_RATIO: f64 = 1.2;

/// Safely convert usize to f64 for score calculations
///
/// Ranks and unit counts are small, far inside the exact range of an f64 mantissa.
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Score of one (student, unit) pairing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    /// Tier index of the unit in the student's list (tier count if unranked)
    pub rank: usize,

    /// `voice * (n - rank)` where `n` is the number of units in the run
    pub student: f64,

    /// `gamma * power`
    pub unit: f64,

    /// `student + unit`
    pub total: f64,
}

impl ScoreComponents {
    /// Score `student` against `unit` in a run with `unit_count` units.
    ///
    /// The `n - rank` transform is applied as is: an unranked unit gets
    /// `n - tier_count`, which can beat a ranked-but-late unit when the student
    /// lists fewer than `n - 1` tiers.
    #[must_use]
    pub fn calculate(student: &Student, unit: &Unit, unit_count: usize, gamma: f64) -> Self {
        let rank = student.rank(&unit.name);
        let student_component = student.voice * (count_to_f64(unit_count) - count_to_f64(rank));
        let unit_component = gamma * unit.power;

        Self {
            rank,
            student: student_component,
            unit: unit_component,
            total: student_component + unit_component,
        }
    }

    /// Strict improvement; exact ties favour the incumbent
    #[must_use]
    pub fn beats(&self, incumbent: &Self) -> bool {
        self.total > incumbent.total
    }
}

/// Which axis mainly explains the change from `old` to `new`
#[must_use]
pub fn dominant_factor(old: &ScoreComponents, new: &ScoreComponents) -> Factor {
    let delta_preference = (new.student - old.student).abs();
    let delta_power = (new.unit - old.unit).abs();

    if delta_preference > delta_power * DOMINANCE_RATIO {
        Factor::Preference
    } else if delta_power > delta_preference * DOMINANCE_RATIO {
        Factor::Power
    } else {
        Factor::Mixed
    }
}
