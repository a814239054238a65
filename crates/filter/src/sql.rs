//! SQL translation of composed filters.
//!
//! The adapter stays provider-agnostic: it emits `?` placeholders and a
//! parallel list of bound [`SqlParam`] values, leaving placeholder numbering
//! and identifier quoting to the provider that executes the fragment.

use folio_model::Variant;

use crate::error::FilterError;
use crate::eval::FilterSet;
use crate::like::SQL_ESCAPE;
use crate::predicate::Predicate;

/// A bound SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Null parameter.
    Null,
}

/// A fragment of SQL with its bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause, with one `?` per bound parameter.
    pub sql: String,
    /// Bound parameter values, in placeholder order.
    pub params: Vec<SqlParam>,
}

impl SqlFragment {
    /// Creates a fragment without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Combines with another fragment using AND.
    pub fn and(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) AND ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// True when the fragment holds no SQL.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl FilterSet {
    /// Renders the set as a `WHERE`-clause fragment, fields AND-combined.
    ///
    /// An empty set (or a set of no-op predicates) yields an empty fragment.
    pub fn to_sql(&self) -> Result<SqlFragment, FilterError> {
        let mut combined = SqlFragment::default();
        for filter in self.iter() {
            if let Some(fragment) = predicate_to_sql(&filter.field, &filter.predicate)? {
                combined = combined.and(fragment);
            }
        }
        Ok(combined)
    }
}

fn predicate_to_sql(field: &str, predicate: &Predicate) -> Result<Option<SqlFragment>, FilterError> {
    match predicate {
        Predicate::Always => Ok(None),
        Predicate::Equals(value) => Ok(Some(SqlFragment::with_params(
            format!("{field} = ?"),
            vec![param(field, value)?],
        ))),
        Predicate::InList(members) => {
            if members.is_empty() {
                // Membership in an empty list rejects every row.
                return Ok(Some(SqlFragment::new("1 = 0")));
            }
            let placeholders = vec!["?"; members.len()].join(", ");
            let params = members
                .iter()
                .map(|m| param(field, m))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(SqlFragment::with_params(
                format!("{field} IN ({placeholders})"),
                params,
            )))
        }
        Predicate::Range { min, max } => {
            let mut fragment = SqlFragment::default();
            if let Some(min) = min {
                fragment = fragment.and(SqlFragment::with_params(
                    format!("{field} >= ?"),
                    vec![param(field, min)?],
                ));
            }
            if let Some(max) = max {
                fragment = fragment.and(SqlFragment::with_params(
                    format!("{field} <= ?"),
                    vec![param(field, max)?],
                ));
            }
            Ok((!fragment.is_empty()).then_some(fragment))
        }
        Predicate::Like(pattern) => Ok(Some(SqlFragment::with_params(
            format!("{field} LIKE ? ESCAPE '{SQL_ESCAPE}'"),
            vec![SqlParam::Text(pattern.to_sql_like())],
        ))),
    }
}

fn param(field: &str, value: &Variant) -> Result<SqlParam, FilterError> {
    match value {
        Variant::Null => Ok(SqlParam::Null),
        Variant::Bool(b) => Ok(SqlParam::Integer(i64::from(*b))),
        Variant::Int(i) => Ok(SqlParam::Integer(*i)),
        Variant::Float(f) => Ok(SqlParam::Float(*f)),
        Variant::Text(s) => Ok(SqlParam::Text(s.clone())),
        Variant::DateTime(dt) => Ok(SqlParam::Text(dt.to_rfc3339())),
        Variant::List(_) | Variant::Range { .. } | Variant::Map(_) => {
            Err(FilterError::Untranslatable {
                field: field.to_string(),
                reason: "nested collection values have no scalar SQL form".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::FieldFilter;
    use folio_model::DataKind;

    fn set_of(filters: Vec<FieldFilter>) -> FilterSet {
        let mut set = FilterSet::new();
        for f in filters {
            set.push(f);
        }
        set
    }

    #[test]
    fn test_equality_fragment() {
        let set = set_of(vec![
            FieldFilter::classify("id", DataKind::Int, &Variant::Text("7".into())).unwrap(),
        ]);
        let fragment = set.to_sql().unwrap();
        assert_eq!(fragment.sql, "id = ?");
        assert_eq!(fragment.params, vec![SqlParam::Integer(7)]);
    }

    #[test]
    fn test_membership_fragment() {
        let set = set_of(vec![
            FieldFilter::classify(
                "id",
                DataKind::Int,
                &Variant::List(vec![Variant::Int(1), Variant::Int(2)]),
            )
            .unwrap(),
        ]);
        let fragment = set.to_sql().unwrap();
        assert_eq!(fragment.sql, "id IN (?, ?)");
        assert_eq!(fragment.params.len(), 2);
    }

    #[test]
    fn test_range_fragment_two_sided() {
        let set = set_of(vec![
            FieldFilter::classify(
                "price",
                DataKind::Int,
                &Variant::Range {
                    min: Some(Box::new(Variant::Int(5))),
                    max: Some(Box::new(Variant::Int(10))),
                },
            )
            .unwrap(),
        ]);
        let fragment = set.to_sql().unwrap();
        assert_eq!(fragment.sql, "(price >= ?) AND (price <= ?)");
    }

    #[test]
    fn test_like_fragment() {
        let set = set_of(vec![
            FieldFilter::classify("name", DataKind::Text, &Variant::Text("Ada%".into())).unwrap(),
        ]);
        let fragment = set.to_sql().unwrap();
        assert_eq!(fragment.sql, "name LIKE ? ESCAPE '\\'");
        assert_eq!(fragment.params, vec![SqlParam::Text("Ada%".into())]);
    }

    #[test]
    fn test_noop_filters_yield_empty_fragment() {
        let set = set_of(vec![
            FieldFilter::classify("id", DataKind::Int, &Variant::Null).unwrap(),
        ]);
        assert!(set.to_sql().unwrap().is_empty());
    }

    #[test]
    fn test_fields_and_combined() {
        let set = set_of(vec![
            FieldFilter::classify("id", DataKind::Int, &Variant::Int(1)).unwrap(),
            FieldFilter::classify("name", DataKind::Text, &Variant::Text("a".into())).unwrap(),
        ]);
        let fragment = set.to_sql().unwrap();
        assert_eq!(fragment.sql, "(id = ?) AND (name = ?)");
    }
}
