//! The `Variant` value type and its coercion rules.
//!
//! A [`Variant`] carries any value the framework moves around without static
//! typing: argument bindings parsed from a URI, record values handed over by
//! a domain object, filter values, and entity properties. It is an explicit
//! sum type; every consumer matches exhaustively instead of probing.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::property::PropertyCollection;

/// The declared kind of a typed slot: a filter field, an input field, or a
/// path-bound argument.
///
/// Coercion between a raw [`Variant`] (usually text parsed from a URI) and a
/// target kind goes through [`Variant::coerce`]; the rules are
/// culture-invariant and listed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Boolean flag.
    Bit,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Decimal,
    /// Plain text.
    Text,
    /// Calendar date (no time of day).
    Date,
    /// Time of day (no date).
    Time,
    /// Full date and time with offset.
    Datetime,
}

impl DataKind {
    /// The wire name of this kind, used in field metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Bit => "bit",
            DataKind::Int => "int",
            DataKind::Decimal => "decimal",
            DataKind::Text => "text",
            DataKind::Date => "date",
            DataKind::Time => "time",
            DataKind::Datetime => "datetime",
        }
    }

    /// Parses a wire name back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bit" | "bool" | "boolean" => Some(DataKind::Bit),
            "int" | "integer" | "number" => Some(DataKind::Int),
            "decimal" | "float" | "double" => Some(DataKind::Decimal),
            "text" | "string" => Some(DataKind::Text),
            "date" => Some(DataKind::Date),
            "time" => Some(DataKind::Time),
            "datetime" => Some(DataKind::Datetime),
            _ => None,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically-shaped value.
///
/// Scalars, lists, inclusive ranges, and nested maps share this one type so
/// an argument map entry, a record value, and a filter value all have the
/// same shape vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Date/time with explicit offset.
    DateTime(DateTime<FixedOffset>),
    /// Ordered list of values.
    List(Vec<Variant>),
    /// Inclusive range; either bound may be absent.
    Range {
        /// Lower bound, inclusive.
        min: Option<Box<Variant>>,
        /// Upper bound, inclusive.
        max: Option<Box<Variant>>,
    },
    /// Nested named values.
    Map(PropertyCollection),
}

impl Variant {
    /// Returns true for [`Variant::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// Returns true for lists and maps with no entries.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Variant::List(items) => items.is_empty(),
            Variant::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// The kind a scalar value naturally carries, or `None` for lists,
    /// ranges, and maps.
    pub fn kind(&self) -> Option<DataKind> {
        match self {
            Variant::Bool(_) => Some(DataKind::Bit),
            Variant::Int(_) => Some(DataKind::Int),
            Variant::Float(_) => Some(DataKind::Decimal),
            Variant::Text(_) => Some(DataKind::Text),
            Variant::DateTime(_) => Some(DataKind::Datetime),
            Variant::Null | Variant::List(_) | Variant::Range { .. } | Variant::Map(_) => None,
        }
    }

    /// Returns the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Variant::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, widening from `Bool` where sensible.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Variant::Int(i) => Some(*i),
            Variant::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Returns the numeric content as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Variant::Float(f) => Some(*f),
            Variant::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean content.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Coerces this value to the target kind.
    ///
    /// Rules (culture-invariant, no locale input):
    ///
    /// | target | accepted sources |
    /// |--------|------------------|
    /// | `Bit` | `Bool`; `Int` 0/1; text `true/false/1/0` (case-insensitive) |
    /// | `Int` | `Int`; `Float` with no fraction; `Bool`; decimal text |
    /// | `Decimal` | `Float`; `Int`; decimal text (`.` separator only) |
    /// | `Text` | any scalar, via its canonical string form |
    /// | `Date` | `DateTime`; `YYYY-MM-DD` text (midnight UTC) |
    /// | `Time` | `DateTime`; `HH:MM[:SS]` text (epoch date, UTC) |
    /// | `Datetime` | `DateTime`; RFC 3339 text |
    ///
    /// Returns `None` when the source cannot represent the target. `Null`
    /// coerces to `Null` for every target.
    pub fn coerce(&self, target: DataKind) -> Option<Variant> {
        if self.is_null() {
            return Some(Variant::Null);
        }
        match target {
            DataKind::Bit => match self {
                Variant::Bool(b) => Some(Variant::Bool(*b)),
                Variant::Int(0) => Some(Variant::Bool(false)),
                Variant::Int(1) => Some(Variant::Bool(true)),
                Variant::Text(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(Variant::Bool(true)),
                    "false" | "0" => Some(Variant::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
            DataKind::Int => match self {
                Variant::Int(i) => Some(Variant::Int(*i)),
                Variant::Bool(b) => Some(Variant::Int(i64::from(*b))),
                Variant::Float(f) if f.fract() == 0.0 => Some(Variant::Int(*f as i64)),
                Variant::Text(s) => s.trim().parse::<i64>().ok().map(Variant::Int),
                _ => None,
            },
            DataKind::Decimal => match self {
                Variant::Float(f) => Some(Variant::Float(*f)),
                Variant::Int(i) => Some(Variant::Float(*i as f64)),
                Variant::Text(s) => s.trim().parse::<f64>().ok().map(Variant::Float),
                _ => None,
            },
            DataKind::Text => match self {
                Variant::List(_) | Variant::Range { .. } | Variant::Map(_) => None,
                scalar => Some(Variant::Text(scalar.to_string())),
            },
            DataKind::Date => match self {
                Variant::DateTime(dt) => Some(Variant::DateTime(*dt)),
                Variant::Text(s) => {
                    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
                    let dt = Utc
                        .from_utc_datetime(&date.and_hms_opt(0, 0, 0)?)
                        .fixed_offset();
                    Some(Variant::DateTime(dt))
                }
                _ => None,
            },
            DataKind::Time => match self {
                Variant::DateTime(dt) => Some(Variant::DateTime(*dt)),
                Variant::Text(s) => {
                    let s = s.trim();
                    let time = NaiveTime::parse_from_str(s, "%H:%M:%S")
                        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                        .ok()?;
                    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
                    let dt = Utc.from_utc_datetime(&epoch.and_time(time)).fixed_offset();
                    Some(Variant::DateTime(dt))
                }
                _ => None,
            },
            DataKind::Datetime => match self {
                Variant::DateTime(dt) => Some(Variant::DateTime(*dt)),
                Variant::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                    .ok()
                    .map(Variant::DateTime),
                _ => None,
            },
        }
    }

    /// Orders two scalar values of compatible kinds.
    ///
    /// Integers and floats compare numerically across each other; text
    /// compares lexicographically; date/times chronologically. Incompatible
    /// or non-scalar operands return `None`.
    pub fn compare(&self, other: &Variant) -> Option<Ordering> {
        match (self, other) {
            (Variant::Int(a), Variant::Int(b)) => Some(a.cmp(b)),
            (Variant::Float(a), Variant::Float(b)) => a.partial_cmp(b),
            (Variant::Int(a), Variant::Float(b)) => (*a as f64).partial_cmp(b),
            (Variant::Float(a), Variant::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Variant::Text(a), Variant::Text(b)) => Some(a.cmp(b)),
            (Variant::Bool(a), Variant::Bool(b)) => Some(a.cmp(b)),
            (Variant::DateTime(a), Variant::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    /// Canonical string form, used for URI substitution and `Text` coercion.
    ///
    /// Booleans render as `1`/`0` to match the wire dialect; date/times as
    /// RFC 3339 with explicit offset; lists as comma-joined elements.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => Ok(()),
            Variant::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Variant::Int(i) => write!(f, "{i}"),
            Variant::Float(v) => write!(f, "{v}"),
            Variant::Text(s) => f.write_str(s),
            Variant::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Variant::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Variant::Range { min, max } => {
                if let Some(min) = min {
                    write!(f, "{min}")?;
                }
                f.write_str("..")?;
                if let Some(max) = max {
                    write!(f, "{max}")?;
                }
                Ok(())
            }
            Variant::Map(_) => f.write_str("{..}"),
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int(i64::from(v))
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Variant::Int(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Float(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::Text(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::Text(v)
    }
}

impl From<DateTime<FixedOffset>> for Variant {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Variant::DateTime(v)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(v: Vec<Variant>) -> Self {
        Variant::List(v)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Variant::Null,
        }
    }
}
