//! Timestamp normalization.
//!
//! Every raw timestamp cell is classified into one [`RawTimestamp`]
//! variant, and each variant has exactly one conversion rule to a
//! canonical `HH:MM` label:
//!
//! | Variant       | Source                         | Rule                               |
//! |---------------|--------------------------------|------------------------------------|
//! | `DateTime`    | date-time cell or text         | `%H:%M` of the time, keeps instant |
//! | `TimeOfDay`   | time cell or text              | `%H:%M`                            |
//! | `DayFraction` | serial number (fraction of day)| `round(v × 1440)` minutes, wrapped |
//! | `ClockNumber` | `HHMM` number                  | `HH:MM`, invalid → literal         |
//! | `Text`        | anything else                  | literal string                     |
//!
//! Numeric cells are never classified per cell: the whole sheet shares one
//! [`NumericEncoding`] so serial fractions and `HHMM` numbers cannot be
//! mixed in one column.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{NumericEncoding, TimeLabel};

use super::types::{format_number, CellValue};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// A raw timestamp classified into one input kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    DateTime(NaiveDateTime),
    TimeOfDay(NaiveTime),
    DayFraction(f64),
    ClockNumber(f64),
    Text(String),
}

/// Canonical form of a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTimestamp {
    pub label: TimeLabel,
    pub instant: Option<NaiveDateTime>,
}

impl RawTimestamp {
    /// Classify a cell.
    ///
    /// `encoding` must already be resolved (see [`resolve_encoding`]); `Auto`
    /// is treated as `DayFraction`. Returns `None` for a missing timestamp.
    pub fn classify(cell: &CellValue, encoding: NumericEncoding) -> Option<Self> {
        if cell.is_missing() {
            return None;
        }
        let raw = match cell {
            CellValue::DateTime(dt) => Self::DateTime(*dt),
            CellValue::Time(t) => Self::TimeOfDay(*t),
            CellValue::Number(v) => match encoding {
                NumericEncoding::ClockNumber => Self::ClockNumber(*v),
                NumericEncoding::DayFraction | NumericEncoding::Auto => Self::DayFraction(*v),
            },
            CellValue::Text(s) => parse_text(s.trim()),
            CellValue::Bool(_) => Self::Text(cell.display_text()),
            CellValue::Empty | CellValue::Error(_) => return None,
        };
        Some(raw)
    }

    /// Apply this variant's conversion rule.
    pub fn normalize(&self) -> NormalizedTimestamp {
        match self {
            Self::DateTime(dt) => NormalizedTimestamp {
                label: label_from_time(dt.time()),
                instant: Some(*dt),
            },
            Self::TimeOfDay(t) => NormalizedTimestamp {
                label: label_from_time(*t),
                instant: None,
            },
            Self::DayFraction(v) => NormalizedTimestamp {
                label: TimeLabel::from_minutes((v * MINUTES_PER_DAY).round() as i64),
                instant: serial_to_datetime(*v),
            },
            Self::ClockNumber(v) => NormalizedTimestamp {
                label: clock_label(*v).unwrap_or_else(|| TimeLabel::literal(format_number(*v))),
                instant: None,
            },
            Self::Text(s) => NormalizedTimestamp {
                label: TimeLabel::literal(s.clone()),
                instant: None,
            },
        }
    }
}

/// Normalize one cell; `None` means the row has no timestamp.
pub fn normalize_cell(cell: &CellValue, encoding: NumericEncoding) -> Option<NormalizedTimestamp> {
    RawTimestamp::classify(cell, encoding).map(|raw| raw.normalize())
}

/// Guess how numeric timestamps of one sheet are encoded.
///
/// Any fractional value means spreadsheet serial time. A sheet made only of
/// integers below 2400 with valid minute digits reads as `HHMM` clock
/// numbers. Everything else (including sheets without numeric timestamps)
/// defaults to serial time.
pub fn detect_encoding<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> NumericEncoding {
    let mut saw_number = false;
    for cell in cells {
        if let CellValue::Number(v) = cell {
            if !v.is_finite() {
                continue;
            }
            saw_number = true;
            if v.fract() != 0.0 || *v < 0.0 || *v >= 2400.0 || (*v as i64) % 100 >= 60 {
                return NumericEncoding::DayFraction;
            }
        }
    }
    if saw_number {
        NumericEncoding::ClockNumber
    } else {
        NumericEncoding::DayFraction
    }
}

/// Resolve the configured encoding for one sheet.
pub fn resolve_encoding<'a>(
    configured: NumericEncoding,
    cells: impl IntoIterator<Item = &'a CellValue>,
) -> NumericEncoding {
    match configured {
        NumericEncoding::Auto => detect_encoding(cells),
        fixed => fixed,
    }
}

/// Convert a serial date-time (1900 date system) to an instant.
///
/// Values below 1.0 carry no date and yield `None`.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a serial time-of-day fraction to a time.
pub fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() {
        return None;
    }
    let secs = (serial.rem_euclid(1.0) * 86_400.0).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

fn label_from_time(t: NaiveTime) -> TimeLabel {
    TimeLabel::from_minutes(i64::from(t.hour() * 60 + t.minute()))
}

fn clock_label(v: f64) -> Option<TimeLabel> {
    if !v.is_finite() || v.fract() != 0.0 || v < 0.0 {
        return None;
    }
    let n = v as i64;
    let (hours, minutes) = (n / 100, n % 100);
    (hours < 24 && minutes < 60).then(|| TimeLabel::from_minutes(hours * 60 + minutes))
}

fn parse_text(s: &str) -> RawTimestamp {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return RawTimestamp::DateTime(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Some(dt) = NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return RawTimestamp::DateTime(dt);
        }
    }
    for fmt in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return RawTimestamp::TimeOfDay(t);
        }
    }
    RawTimestamp::Text(s.to_string())
}
