//! In-memory evaluation of composed filters.

use folio_model::{DataKind, Record, Variant};

use crate::error::FilterError;
use crate::predicate::Predicate;

/// One named filter: a field, its declared kind, and the predicate compiled
/// from the filter value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// The filtered field name.
    pub field: String,
    /// The field's declared kind, used for coercion on both paths.
    pub kind: DataKind,
    /// The compiled predicate.
    pub predicate: Predicate,
}

impl FieldFilter {
    /// Classifies a raw filter value into a field filter.
    pub fn classify(
        field: impl Into<String>,
        kind: DataKind,
        value: &Variant,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            field: field.into(),
            kind,
            predicate: Predicate::classify(value, kind)?,
        })
    }

    /// Evaluates this filter against one record; a missing field reads as
    /// null.
    pub fn matches(&self, record: &Record) -> bool {
        let value = record.get(&self.field).unwrap_or(&Variant::Null);
        self.predicate.accepts(value, self.kind)
    }
}

/// A set of field filters composed by logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<FieldFilter>,
}

impl FilterSet {
    /// Creates an empty set, which accepts every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field filter.
    pub fn push(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    /// True when no filters are held.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of filters held.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Iterates the field filters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldFilter> {
        self.filters.iter()
    }

    /// Looks up the filter on a field, case-insensitively.
    pub fn get(&self, field: &str) -> Option<&FieldFilter> {
        self.filters
            .iter()
            .find(|f| f.field.eq_ignore_ascii_case(field))
    }

    /// Evaluates the whole set against one record (logical AND).
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Retains only the records accepted by the set.
    pub fn apply(&self, records: &mut Vec<Record>) {
        if !self.is_empty() {
            records.retain(|r| self.matches(r));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, price: f64) -> Record {
        let mut r = Record::new();
        r.set("Id", id);
        r.set("Name", name);
        r.set("Price", price);
        r
    }

    #[test]
    fn test_fields_compose_by_and() {
        let mut set = FilterSet::new();
        set.push(FieldFilter::classify("name", DataKind::Text, &Variant::Text("A%".into())).unwrap());
        set.push(
            FieldFilter::classify(
                "price",
                DataKind::Decimal,
                &Variant::Range {
                    min: Some(Box::new(Variant::Int(10))),
                    max: None,
                },
            )
            .unwrap(),
        );

        assert!(set.matches(&record(1, "Alpha", 12.0)));
        assert!(!set.matches(&record(2, "Alpha", 8.0)));
        assert!(!set.matches(&record(3, "Beta", 12.0)));
    }

    #[test]
    fn test_empty_set_accepts_everything() {
        let set = FilterSet::new();
        assert!(set.matches(&record(1, "anything", 0.0)));
    }

    #[test]
    fn test_apply_retains_matches() {
        let mut set = FilterSet::new();
        set.push(
            FieldFilter::classify(
                "id",
                DataKind::Int,
                &Variant::List(vec![Variant::Int(1), Variant::Int(3)]),
            )
            .unwrap(),
        );

        let mut records = vec![record(1, "a", 1.0), record(2, "b", 2.0), record(3, "c", 3.0)];
        set.apply(&mut records);
        let ids: Vec<_> = records.iter().filter_map(|r| r.get("Id")?.as_int()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let mut set = FilterSet::new();
        set.push(FieldFilter::classify("absent", DataKind::Int, &Variant::Int(1)).unwrap());
        assert!(!set.matches(&record(1, "a", 1.0)));
    }
}
