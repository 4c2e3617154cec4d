//! Pin instance model and typed value parsing.
//!
//! # Responsibility
//! - Define the read shapes returned for placed pins.
//! - Validate raw text values against the owning field's declared kind
//!   before anything is written.
//!
//! # Invariants
//! - The storage encoding of an accepted value is the accepted text itself;
//!   parsing never rewrites what gets persisted.
//! - Dates are exchanged as `YYYY-MM-DD` and must denote a real
//!   month/day combination.

use crate::model::pin_type::FieldKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a pin row.
pub type PinId = i64;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("date pattern is valid"));

/// Raw text that failed validation against a field kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    NotAnInteger { raw: String },
    NotADate { raw: String },
}

impl Display for ValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnInteger { raw } => {
                write!(f, "`{raw}` is not an integer")
            }
            Self::NotADate { raw } => {
                write!(f, "`{raw}` is not a YYYY-MM-DD date")
            }
        }
    }
}

impl Error for ValueError {}

/// One field value tagged with its logical type.
///
/// This is the write-time checked form of the plain text exchanged at the
/// boundary; `Date` keeps the validated text since no richer date type is
/// needed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Date(String),
}

impl TypedValue {
    /// Validates raw boundary text against a field kind.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, ValueError> {
        match kind {
            FieldKind::String => Ok(Self::String(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| ValueError::NotAnInteger {
                    raw: raw.to_string(),
                }),
            FieldKind::Date => {
                if is_calendar_date(raw) {
                    Ok(Self::Date(raw.to_string()))
                } else {
                    Err(ValueError::NotADate {
                        raw: raw.to_string(),
                    })
                }
            }
        }
    }

    /// Returns the kind tag of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Integer(_) => FieldKind::Integer,
            Self::Date(_) => FieldKind::Date,
        }
    }

    /// Returns the storage encoding (plain text) of this value.
    pub fn into_text(self) -> String {
        match self {
            Self::String(text) | Self::Date(text) => text,
            Self::Integer(number) => number.to_string(),
        }
    }
}

fn is_calendar_date(raw: &str) -> bool {
    let Some(captures) = DATE_RE.captures(raw) else {
        return false;
    };
    let month: u32 = captures[2].parse().unwrap_or(0);
    let day: u32 = captures[3].parse().unwrap_or(0);
    if !(1..=12).contains(&month) {
        return false;
    }
    // Day bound per month; leap years accepted for February 29.
    let year: i32 = captures[1].parse().unwrap_or(0);
    let max_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
    };
    (1..=max_day).contains(&day)
}

/// One returned field value with its declared type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValueEntry {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// Full read model for one pin, including its pin type presentation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDetail {
    pub id: PinId,
    pub latitude: f64,
    pub longitude: f64,
    pub pin_type: String,
    pub color: String,
    pub style: String,
    pub fields: BTreeMap<String, FieldValueEntry>,
}

/// Listing shape for pins of one known pin type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinListItem {
    pub id: PinId,
    pub latitude: f64,
    pub longitude: f64,
    pub fields: BTreeMap<String, String>,
}

/// Listing shape for pins across all pin types, annotated for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinOverview {
    pub id: PinId,
    pub pin_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: String,
    pub style: String,
    pub fields: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::{TypedValue, ValueError};
    use crate::model::pin_type::FieldKind;

    #[test]
    fn string_values_pass_through_unchanged() {
        let value = TypedValue::parse(FieldKind::String, "Oak").unwrap();
        assert_eq!(value, TypedValue::String("Oak".to_string()));
        assert_eq!(value.into_text(), "Oak");
    }

    #[test]
    fn integer_values_must_parse() {
        assert_eq!(
            TypedValue::parse(FieldKind::Integer, "42").unwrap(),
            TypedValue::Integer(42)
        );
        assert_eq!(
            TypedValue::parse(FieldKind::Integer, " -7 ").unwrap(),
            TypedValue::Integer(-7)
        );
        let err = TypedValue::parse(FieldKind::Integer, "4.2").unwrap_err();
        assert!(matches!(err, ValueError::NotAnInteger { .. }));
    }

    #[test]
    fn dates_require_valid_calendar_components() {
        assert!(TypedValue::parse(FieldKind::Date, "2024-02-29").is_ok());
        assert!(TypedValue::parse(FieldKind::Date, "2023-02-29").is_err());
        assert!(TypedValue::parse(FieldKind::Date, "2024-13-01").is_err());
        assert!(TypedValue::parse(FieldKind::Date, "2024-00-10").is_err());
        assert!(TypedValue::parse(FieldKind::Date, "2024-1-01").is_err());
        assert!(TypedValue::parse(FieldKind::Date, "24-01-01").is_err());
    }

    #[test]
    fn date_storage_encoding_is_the_accepted_text() {
        let value = TypedValue::parse(FieldKind::Date, "2025-08-29").unwrap();
        assert_eq!(value.kind(), FieldKind::Date);
        assert_eq!(value.into_text(), "2025-08-29");
    }
}
