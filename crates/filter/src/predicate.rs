//! The tagged predicate model and the classification table.

use folio_model::{DataKind, Variant};

use crate::error::FilterError;
use crate::like::{LikePattern, has_wildcard};

/// A field-scoped boolean predicate.
///
/// Every filter value classifies into exactly one of these shapes; the same
/// shape drives both the in-memory evaluator and the SQL adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Accepts everything (a null filter value).
    Always,
    /// Field value equals the coerced filter value.
    Equals(Variant),
    /// Field value is a member of the coerced list.
    InList(Vec<Variant>),
    /// Field value lies in an inclusive range; one bound may be absent.
    Range {
        /// Inclusive lower bound.
        min: Option<Variant>,
        /// Inclusive upper bound.
        max: Option<Variant>,
    },
    /// Field value matches a wildcard pattern.
    Like(LikePattern),
}

impl Predicate {
    /// Classifies a filter value against the target field kind.
    ///
    /// The sum-type value model makes wrapper unwrapping structural: a value
    /// is its shape, so classification is a single exhaustive match with no
    /// recursive unwrap step.
    pub fn classify(value: &Variant, kind: DataKind) -> Result<Self, FilterError> {
        match value {
            Variant::Null => Ok(Predicate::Always),
            Variant::List(items) => Ok(Predicate::InList(
                items.iter().map(|item| coerce_or_keep(item, kind)).collect(),
            )),
            Variant::Range { min, max } => Ok(Predicate::Range {
                min: min.as_deref().map(|v| coerce_or_keep(v, kind)),
                max: max.as_deref().map(|v| coerce_or_keep(v, kind)),
            }),
            Variant::Text(s) if has_wildcard(s) => Ok(Predicate::Like(LikePattern::new(s.clone())?)),
            other => Ok(Predicate::Equals(coerce_or_keep(other, kind))),
        }
    }

    /// Evaluates the predicate against one field value.
    ///
    /// A missing field evaluates as [`Variant::Null`]: only [`Predicate::Always`]
    /// accepts it.
    pub fn accepts(&self, field_value: &Variant, kind: DataKind) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Equals(expected) => match coerce_or_keep(field_value, kind) {
                Variant::Null => false,
                actual => &actual == expected,
            },
            Predicate::InList(members) => match coerce_or_keep(field_value, kind) {
                Variant::Null => false,
                actual => members.contains(&actual),
            },
            Predicate::Range { min, max } => {
                let actual = coerce_or_keep(field_value, kind);
                if actual.is_null() {
                    return false;
                }
                let above_min = match min {
                    Some(bound) => matches!(
                        actual.compare(bound),
                        Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
                    ),
                    None => true,
                };
                let below_max = match max {
                    Some(bound) => matches!(
                        actual.compare(bound),
                        Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
                    ),
                    None => true,
                };
                above_min && below_max
            }
            Predicate::Like(pattern) => match field_value {
                Variant::Text(s) => pattern.matches(s),
                Variant::Null => false,
                other => pattern.matches(&other.to_string()),
            },
        }
    }
}

/// Coerces to the target kind, falling back to the original value when the
/// source cannot represent it (an impossible comparison then simply rejects).
fn coerce_or_keep(value: &Variant, kind: DataKind) -> Variant {
    value.coerce(kind).unwrap_or_else(|| value.clone())
}
