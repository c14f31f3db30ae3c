use serde::{Deserialize, Serialize};

use crate::core::preference::Preferences;
use crate::core::student::default_weight;

/// A unit as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unique name within a run
    pub name: String,

    /// Maximum number of students the unit accepts at once
    pub capacity: usize,

    /// Tiered preferences over student names; decides proposal order
    #[serde(alias = "prefs", default)]
    pub preferences: Preferences,

    /// Institutional strength
    #[serde(default = "default_weight")]
    pub power: f64,

    /// When set, parameter search leaves `power` untouched
    #[serde(default)]
    pub sticky_power: bool,
}

impl UnitRecord {
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        preferences: impl Into<Preferences>,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            preferences: preferences.into(),
            power: default_weight(),
            sticky_power: false,
        }
    }

    #[must_use]
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    #[must_use]
    pub fn sticky(mut self) -> Self {
        self.sticky_power = true;
        self
    }
}

/// Per-run unit state
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub capacity: usize,
    pub power: f64,
    pub sticky_power: bool,

    /// Proposal order; derived once from the tiers and never recomputed
    preferences_flat: Vec<String>,

    /// Next unexamined position in `preferences_flat`
    preference_pointer: usize,
}

impl Unit {
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        preferences: &Preferences,
        power: f64,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            power,
            sticky_power: false,
            preferences_flat: preferences.flatten(),
            preference_pointer: 0,
        }
    }

    pub fn preferences_flat(&self) -> &[String] {
        &self.preferences_flat
    }

    #[must_use]
    pub fn preference_pointer(&self) -> usize {
        self.preference_pointer
    }

    /// Whether some candidates have not been proposed to yet
    #[must_use]
    pub fn has_unexamined(&self) -> bool {
        self.preference_pointer < self.preferences_flat.len()
    }

    /// Take the next unexamined candidate, advancing the pointer.
    pub fn next_candidate(&mut self) -> Option<&str> {
        let candidate = self.preferences_flat.get(self.preference_pointer)?;
        self.preference_pointer += 1;
        Some(candidate.as_str())
    }
}

impl From<&UnitRecord> for Unit {
    fn from(record: &UnitRecord) -> Self {
        let mut unit = Self::new(
            record.name.clone(),
            record.capacity,
            &record.preferences,
            record.power,
        );
        unit.sticky_power = record.sticky_power;
        unit
    }
}
