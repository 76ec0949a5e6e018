//! Labels encoded in sheet names.
//!
//! Sheets are conventionally named like `0526_RH` or `0528_line2_LH`: a
//! leading 4-character date and a trailing sensor type after the last
//! underscore. Both are labels only and never affect alignment.

use serde::{Deserialize, Serialize};

const DATE_LABEL_CHARS: usize = 4;
const SENSOR_SEPARATOR: char = '_';

/// Metadata parsed from a sheet name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMeta {
    /// First four characters of the name (the whole name if shorter).
    pub date_label: String,
    /// Text after the last `_` (the whole name if there is none).
    pub sensor_type: String,
}

impl SheetMeta {
    /// Date label from the leading characters, sensor type from the text
    /// after the last underscore.
    ///
    /// Never fails: a name without an underscore uses the whole name as its
    /// sensor type.
    pub fn parse(sheet_name: &str) -> Self {
        let date_label = sheet_name.chars().take(DATE_LABEL_CHARS).collect();
        let sensor_type = sheet_name
            .rsplit(SENSOR_SEPARATOR)
            .next()
            .unwrap_or(sheet_name)
            .to_string();
        Self {
            date_label,
            sensor_type,
        }
    }
}
