use std::collections::{HashMap, HashSet};

use crate::core::student::Student;
use crate::core::unit::Unit;
use crate::matching::scoring::count_to_f64;

/// Default voice added per unit that lists a student
pub const DEFAULT_ALPHA: f64 = 1.0;

/// For each student, how many distinct units list them anywhere in their preferences
#[must_use]
pub fn demand_counts(students: &[Student], units: &[Unit]) -> Vec<usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for unit in units {
        let listed: HashSet<&str> = unit.preferences_flat().iter().map(String::as_str).collect();
        for name in listed {
            *counts.entry(name).or_default() += 1;
        }
    }

    students
        .iter()
        .map(|s| counts.get(s.name.as_str()).copied().unwrap_or(0))
        .collect()
}

/// Add `alpha * demand` to every student's voice.
///
/// Call once on fresh per-run state; boosting the same students twice compounds.
pub fn boost_voice_by_demand(students: &mut [Student], units: &[Unit], alpha: f64) {
    let counts = demand_counts(students, units);
    for (student, count) in students.iter_mut().zip(counts) {
        student.voice += alpha * count_to_f64(count);
    }
}
