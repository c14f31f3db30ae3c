use std::path::Path;

use crate::core::preference::Preferences;
use crate::core::types::PlacementInput;
use crate::parsing::ParseError;

/// Rankings entered per unit: `unit -> [(student, rank)]`, units in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankSheet {
    pub units: Vec<(String, Vec<(String, u32)>)>,
}

impl RankSheet {
    /// Tiered preferences for every unit in the sheet
    pub fn preferences(&self) -> impl Iterator<Item = (&str, Preferences)> {
        self.units.iter().map(|(unit, ranks)| {
            (
                unit.as_str(),
                Preferences::from_ranks(ranks.iter().map(|(s, r)| (s.as_str(), *r))),
            )
        })
    }

    /// Replace the preferences of every unit named in the sheet.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnknownUnit` if the sheet names a unit missing from `input`;
    /// `input` is left untouched in that case.
    pub fn apply(&self, input: &mut PlacementInput) -> Result<(), ParseError> {
        if let Some((unit, _)) = self.units.iter().find(|(u, _)| input.unit(u).is_none()) {
            return Err(ParseError::UnknownUnit(unit.clone()));
        }
        for (unit, preferences) in self.preferences() {
            if let Some(record) = input.unit_mut(unit) {
                record.preferences = preferences;
            }
        }
        Ok(())
    }
}

/// Parse a TSV/CSV ranking sheet file with columns: unit, student, rank
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_rank_file(path: &Path, delimiter: char) -> Result<RankSheet, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_rank_text(&content, delimiter)
}

/// Parse ranking sheet text with columns: unit, student, rank
///
/// Rows with an empty rank are skipped, as are blank lines and `#` comments.
/// Equal ranks within a unit form a tie group.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 2 fields, a rank
/// is not a non-negative integer, or no rankings are found.
pub fn parse_rank_text(text: &str, delimiter: char) -> Result<RankSheet, ParseError> {
    let mut sheet = RankSheet::default();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "unit" || first == "unitname" || first == "unit_name" {
                continue;
            }
        }

        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let rank_field = fields.get(2).copied().unwrap_or_default();
        if rank_field.is_empty() {
            continue;
        }
        let rank: u32 = rank_field.parse().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid rank on line {line_num}: '{rank_field}'"))
        })?;

        let (unit, student) = (fields[0].to_string(), fields[1].to_string());
        match sheet.units.iter_mut().find(|(u, _)| *u == unit) {
            Some((_, ranks)) => ranks.push((student, rank)),
            None => sheet.units.push((unit, vec![(student, rank)])),
        }
    }

    if sheet.units.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No rankings found in file".to_string(),
        ));
    }

    Ok(sheet)
}
