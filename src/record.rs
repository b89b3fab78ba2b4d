//! Normalized fragrance data and the defaulting rules applied to loose rows.
//!
//! Defaults live here and nowhere else; both the CSV path and the lookup
//! path produce records through this module.

use serde::Deserialize;

use crate::error::CardError;

pub const DEFAULT_LONGEVITY: &str = "6–8 HRS";
pub const DEFAULT_PROJECTION: &str = "1–2 FEET";
pub const DEFAULT_WHEN: &str = "Fall";
pub const DEFAULT_WHERE: &str = "Casual";
pub const DEFAULT_PROFILE: &str = "Woody";
pub const DEFAULT_NOTES: &str = "Cedar";

/// Intra-cell separator for list-valued CSV columns.
pub const LIST_SEPARATOR: char = ';';

/// A complete record, every field present. Built once per input row,
/// consumed read-only by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragranceRecord {
    pub name: String,
    pub longevity: String,
    pub projection: String,
    pub when: Vec<String>,
    pub where_: Vec<String>,
    pub profile: Vec<String>,
    pub notes: Vec<String>,
    pub year: String,
    pub rating: String,
    pub description: String,
}

/// A loose pre-normalization row, e.g. one CSV line. Absent columns
/// deserialize as empty strings; list fields are `;`-delimited cells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub longevity: String,
    #[serde(default)]
    pub projection: String,
    #[serde(default)]
    pub when: String,
    #[serde(default, rename = "where")]
    pub where_: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub description: String,
}

impl RawRecord {
    pub fn normalize(self) -> Result<FragranceRecord, CardError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CardError::Input("record has no name".into()));
        }
        Ok(FragranceRecord {
            name,
            longevity: trim_or(&self.longevity, DEFAULT_LONGEVITY),
            projection: trim_or(&self.projection, DEFAULT_PROJECTION),
            when: split_list_or(&self.when, DEFAULT_WHEN),
            where_: split_list_or(&self.where_, DEFAULT_WHERE),
            profile: split_list_or(&self.profile, DEFAULT_PROFILE),
            notes: split_list_or(&self.notes, DEFAULT_NOTES),
            year: self.year.trim().to_string(),
            rating: self.rating.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

fn trim_or(value: &str, fallback: &str) -> String {
    let v = value.trim();
    if v.is_empty() { fallback.to_string() } else { v.to_string() }
}

/// Split a `;`-delimited cell, trim entries, drop empties.
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_list_or(cell: &str, fallback: &str) -> Vec<String> {
    let items = split_list(cell);
    if items.is_empty() { vec![fallback.to_string()] } else { items }
}

/// Filesystem-safe name: keep alphanumerics, spaces, hyphens and
/// underscores, trim, then spaces become underscores.
pub fn slug(name: &str) -> String {
    name.chars()
        .filter(|&c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}
