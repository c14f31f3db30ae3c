use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::core::student::StudentRecord;
use crate::core::types::PlacementInput;
use crate::core::unit::UnitRecord;
use crate::parsing::ParseError;

/// Units may be given as a list of records or as an object keyed by unit name
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUnits {
    List(Vec<UnitRecord>),
    Map(serde_json::Map<String, Value>),
}

impl Default for RawUnits {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    students: Vec<StudentRecord>,
    #[serde(default)]
    units: RawUnits,
}

/// Parse an input document from a JSON file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or a parse error if the
/// content is not a valid input document.
pub fn parse_json_file(path: &Path) -> Result<PlacementInput, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_json_text(&content)
}

/// Parse an input document.
///
/// ```json
/// {
///   "students": [{"name": "A", "prefs": ["X", ["Y", "Z"]], "voice": 1.0}],
///   "units": {"X": {"capacity": 2, "prefs": [["A", "B"]], "power": 3.0, "sticky_power": true}}
/// }
/// ```
///
/// `units` may also be a list of objects carrying their own `name`.
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON or records, and
/// `ParseError::InvalidFormat` if a keyed unit is not an object.
pub fn parse_json_text(text: &str) -> Result<PlacementInput, ParseError> {
    let raw: RawDocument = serde_json::from_str(text)?;

    let units = match raw.units {
        RawUnits::List(units) => units,
        RawUnits::Map(map) => map
            .into_iter()
            .map(|(name, value)| {
                let Value::Object(mut fields) = value else {
                    return Err(ParseError::InvalidFormat(format!(
                        "Unit '{name}' must be an object"
                    )));
                };
                fields
                    .entry("name")
                    .or_insert_with(|| Value::String(name.clone()));
                Ok(serde_json::from_value(Value::Object(fields))?)
            })
            .collect::<Result<Vec<_>, ParseError>>()?,
    };

    Ok(PlacementInput::new(raw.students, units))
}
