use serde::{Deserialize, Serialize};

use crate::core::preference::Preferences;

pub(crate) fn default_weight() -> f64 {
    1.0
}

/// A student as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique name within a run
    pub name: String,

    /// Tiered preferences over unit names
    #[serde(alias = "prefs", default)]
    pub preferences: Preferences,

    /// How strongly the student's own ranking counts
    #[serde(default = "default_weight")]
    pub voice: f64,
}

impl StudentRecord {
    pub fn new(name: impl Into<String>, preferences: impl Into<Preferences>) -> Self {
        Self {
            name: name.into(),
            preferences: preferences.into(),
            voice: default_weight(),
        }
    }

    #[must_use]
    pub fn with_voice(mut self, voice: f64) -> Self {
        self.voice = voice;
        self
    }
}

/// Per-run student state.
///
/// Built fresh from a [`StudentRecord`] at the start of every run. The current
/// placement is tracked by the engine's assignment, not here.
#[derive(Debug, Clone)]
pub struct Student {
    pub name: String,
    pub preferences: Preferences,
    pub voice: f64,
}

impl Student {
    /// Tier index of `unit` in this student's list, or the tier count if unranked
    #[must_use]
    pub fn rank(&self, unit: &str) -> usize {
        self.preferences.rank(unit)
    }
}

impl From<&StudentRecord> for Student {
    fn from(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            preferences: record.preferences.clone(),
            voice: record.voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preference::Tier;

    #[test]
    fn test_record_defaults_from_json() {
        let record: StudentRecord =
            serde_json::from_str(r#"{"name": "dan", "prefs": ["X", ["Y", "Z"]]}"#).unwrap();
        assert_eq!(record.name, "dan");
        assert!((record.voice - 1.0).abs() < f64::EPSILON);
        assert_eq!(record.preferences.tier_count(), 2);
    }

    #[test]
    fn test_student_rank() {
        let record = StudentRecord::new("dan", vec![Tier::from("X"), Tier::from("Y")]);
        let student = Student::from(&record);
        assert_eq!(student.rank("Y"), 1);
        assert_eq!(student.rank("Q"), 2);
    }
}
