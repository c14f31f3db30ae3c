//! Consistency checks on placement input.
//!
//! None of these conditions stop a run. Dangling names are skipped by the engine
//! and duplicate names resolve to the first record, so the checks only report
//! what the caller probably did not intend.

use std::collections::HashSet;

use crate::core::types::PlacementInput;

/// Maximum number of students or units accepted from a single input
pub const MAX_RECORDS: usize = 100_000;

/// Something suspicious in an input document
#[derive(Debug, Clone, PartialEq)]
pub enum InputWarning {
    DuplicateStudent(String),
    DuplicateUnit(String),
    ZeroCapacity(String),
    UnknownStudentInUnit { unit: String, student: String },
    UnknownUnitInStudent { student: String, unit: String },
    NonPositiveVoice { student: String, voice: f64 },
    NonPositivePower { unit: String, power: f64 },
    CapacityShortfall { students: usize, capacity: usize },
}

impl std::fmt::Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateStudent(name) => {
                write!(f, "Student '{name}' appears more than once; the first record is used")
            }
            Self::DuplicateUnit(name) => {
                write!(f, "Unit '{name}' appears more than once; the first record is used")
            }
            Self::ZeroCapacity(name) => write!(f, "Unit '{name}' has no capacity"),
            Self::UnknownStudentInUnit { unit, student } => {
                write!(f, "Unit '{unit}' ranks unknown student '{student}'")
            }
            Self::UnknownUnitInStudent { student, unit } => {
                write!(f, "Student '{student}' ranks unknown unit '{unit}'")
            }
            Self::NonPositiveVoice { student, voice } => {
                write!(f, "Student '{student}' has non-positive voice {voice}")
            }
            Self::NonPositivePower { unit, power } => {
                write!(f, "Unit '{unit}' has non-positive power {power}")
            }
            Self::CapacityShortfall { students, capacity } => write!(
                f,
                "{students} students but only {capacity} places; some will be unmatched"
            ),
        }
    }
}

/// Check whether a record count exceeds [`MAX_RECORDS`].
///
/// Returns an error message if it does, None if the count is acceptable.
#[must_use]
pub fn check_record_limit(kind: &str, count: usize) -> Option<String> {
    if count > MAX_RECORDS {
        Some(format!(
            "Too many {kind}: {count} exceeds maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Collect every warning for `input`, students first, then units.
#[must_use]
pub fn validate(input: &PlacementInput) -> Vec<InputWarning> {
    let mut warnings = Vec::new();

    let mut student_names = HashSet::new();
    for student in &input.students {
        if !student_names.insert(student.name.as_str()) {
            warnings.push(InputWarning::DuplicateStudent(student.name.clone()));
        }
    }
    let mut unit_names = HashSet::new();
    for unit in &input.units {
        if !unit_names.insert(unit.name.as_str()) {
            warnings.push(InputWarning::DuplicateUnit(unit.name.clone()));
        }
    }

    for student in &input.students {
        if student.voice <= 0.0 {
            warnings.push(InputWarning::NonPositiveVoice {
                student: student.name.clone(),
                voice: student.voice,
            });
        }
        for unit in student.preferences.tiers().iter().flat_map(|t| t.entries()) {
            if !unit_names.contains(unit) {
                warnings.push(InputWarning::UnknownUnitInStudent {
                    student: student.name.clone(),
                    unit: unit.to_string(),
                });
            }
        }
    }

    for unit in &input.units {
        if unit.capacity == 0 {
            warnings.push(InputWarning::ZeroCapacity(unit.name.clone()));
        }
        if unit.power <= 0.0 {
            warnings.push(InputWarning::NonPositivePower {
                unit: unit.name.clone(),
                power: unit.power,
            });
        }
        for student in unit.preferences.tiers().iter().flat_map(|t| t.entries()) {
            if !student_names.contains(student) {
                warnings.push(InputWarning::UnknownStudentInUnit {
                    unit: unit.name.clone(),
                    student: student.to_string(),
                });
            }
        }
    }

    let capacity = input.total_capacity();
    if student_names.len() > capacity {
        warnings.push(InputWarning::CapacityShortfall {
            students: student_names.len(),
            capacity,
        });
    }

    warnings
}
