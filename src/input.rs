//! CSV batch input. Headers: name, longevity, projection, when, where,
//! profile, notes, year, rating, description. List columns use `;` inside
//! a cell.

use std::path::Path;

use crate::error::CardError;
use crate::record::RawRecord;

pub fn read_csv(path: &Path) -> Result<Vec<RawRecord>, CardError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| CardError::Input(format!("failed to read csv {}: {e}", path.display())))?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let raw: RawRecord =
            row.map_err(|e| CardError::Input(format!("bad csv row in {}: {e}", path.display())))?;
        rows.push(raw);
    }
    Ok(rows)
}
