use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::student::{Student, StudentRecord};
use crate::core::unit::{Unit, UnitRecord};

/// Order in which units enter the initial proposal queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalOrder {
    /// Input order
    Input,
    /// Highest power first; equal powers keep input order
    #[default]
    PowerDescending,
}

/// Which axis mainly drove a change in total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Preference,
    Power,
    Mixed,
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preference => write!(f, "preference"),
            Self::Power => write!(f, "power"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// Everything a matching run consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementInput {
    pub students: Vec<StudentRecord>,
    pub units: Vec<UnitRecord>,
}

impl PlacementInput {
    pub fn new(students: Vec<StudentRecord>, units: Vec<UnitRecord>) -> Self {
        Self { students, units }
    }

    /// Fresh per-run state; nothing is shared with earlier runs.
    ///
    /// Only the first record of each student or unit name takes part.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<Student>, Vec<Unit>) {
        (
            self.distinct_students().map(Student::from).collect(),
            self.distinct_units().map(Unit::from).collect(),
        )
    }

    /// Students in input order, skipping later records that reuse a name
    pub fn distinct_students(&self) -> impl Iterator<Item = &StudentRecord> {
        let mut seen = HashSet::new();
        self.students
            .iter()
            .filter(move |s| seen.insert(s.name.as_str()))
    }

    /// Units in input order, skipping later records that reuse a name
    pub fn distinct_units(&self) -> impl Iterator<Item = &UnitRecord> {
        let mut seen = HashSet::new();
        self.units
            .iter()
            .filter(move |u| seen.insert(u.name.as_str()))
    }

    #[must_use]
    pub fn total_capacity(&self) -> usize {
        self.distinct_units().map(|u| u.capacity).sum()
    }

    pub fn unit(&self, name: &str) -> Option<&UnitRecord> {
        self.units.iter().find(|u| u.name == name)
    }

    pub fn unit_mut(&mut self, name: &str) -> Option<&mut UnitRecord> {
        self.units.iter_mut().find(|u| u.name == name)
    }
}
