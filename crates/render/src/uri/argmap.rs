//! The argument map: every value extracted from a request URI.
//!
//! Path captures and query parameters merge into one ordered,
//! case-insensitive map. Key suffixes classify the value shape:
//!
//! | key form | merged as |
//! |----------|-----------|
//! | `tags[]` | element appended to a [`Variant::List`] under `tags` |
//! | `price.min` / `price.max` | bound of a [`Variant::Range`] under `price` |
//! | `customer.name` | entry of a nested [`Variant::Map`] under `customer` |
//! | anything else | scalar set under the key itself |
//!
//! Query parameters with an empty value are ignored entirely, so `?name=`
//! never produces a filter on `name`.

use folio_model::{PropertyCollection, Variant};
use url::form_urlencoded;

/// Ordered, case-insensitive map of request arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgMap {
    entries: PropertyCollection,
}

impl ArgMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks a top-level value up by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.entries.get(name)
    }

    /// Looks a value up by dotted path, walking nested maps and range bounds
    /// (`price.min`, `customer.address.city`).
    pub fn get_path(&self, path: &str) -> Option<&Variant> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Variant::Map(inner) => inner.get(segment)?,
                Variant::Range { min, .. } if segment.eq_ignore_ascii_case("min") => {
                    min.as_deref()?
                }
                Variant::Range { max, .. } if segment.eq_ignore_ascii_case("max") => {
                    max.as_deref()?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Sets a top-level value directly, without suffix classification.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Variant>) {
        self.entries.set(name, value);
    }

    /// Merges a raw key/value pair, classifying the key's suffixes.
    pub fn merge(&mut self, key: &str, value: Variant) {
        merge_into(&mut self.entries, key, value);
    }

    /// Merges every non-empty parameter of a query string.
    pub fn parse_query(&mut self, query: &str) {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            self.merge(&key, Variant::Text(value.into_owned()));
        }
    }

    /// Iterates top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries.iter().map(|p| (p.name(), p.value()))
    }
}

fn merge_into(map: &mut PropertyCollection, key: &str, value: Variant) {
    if let Some((head, rest)) = key.split_once('.') {
        if rest.eq_ignore_ascii_case("min") || rest.eq_ignore_ascii_case("max") {
            let (mut min, mut max) = match map.get(head) {
                Some(Variant::Range { min, max }) => (min.clone(), max.clone()),
                _ => (None, None),
            };
            if rest.eq_ignore_ascii_case("min") {
                min = Some(Box::new(value));
            } else {
                max = Some(Box::new(value));
            }
            map.set(head, Variant::Range { min, max });
            return;
        }
        if !matches!(map.get(head), Some(Variant::Map(_))) {
            map.set(head, Variant::Map(PropertyCollection::new()));
        }
        if let Some(Variant::Map(inner)) = map.get_mut(head) {
            merge_into(inner, rest, value);
        }
        return;
    }
    if let Some(base) = key.strip_suffix("[]") {
        match map.get_mut(base) {
            Some(Variant::List(items)) => items.push(value),
            _ => map.set(base, Variant::List(vec![value])),
        }
        return;
    }
    map.set(key, value);
}
