//! Sort directives parsed from the request.

use std::cmp::Ordering;

use folio_model::{Record, Variant};

use crate::uri::ArgMap;

/// One ordering instruction: a field name plus direction.
///
/// Wire form is `field` (ascending) or `field:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    /// The field to order by.
    pub field: String,
    /// Descending when true.
    pub descending: bool,
}

impl SortDirective {
    /// Parses a wire directive. Blank input parses to `None`; an
    /// unrecognized direction suffix is treated as part of the field name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some((field, direction)) = raw.rsplit_once(':') {
            let descending = match direction.to_ascii_lowercase().as_str() {
                "desc" => true,
                "asc" => false,
                _ => {
                    return Some(Self {
                        field: raw.to_string(),
                        descending: false,
                    });
                }
            };
            if !field.is_empty() {
                return Some(Self {
                    field: field.to_string(),
                    descending,
                });
            }
        }
        Some(Self {
            field: raw.to_string(),
            descending: false,
        })
    }

    /// The wire form of this directive.
    pub fn state(&self) -> String {
        if self.descending {
            format!("{}:desc", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// The full requested ordering, first directive most significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    directives: Vec<SortDirective>,
}

impl SortSpec {
    /// Creates an empty spec (original order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the `sort` argument: either a list (`sort[]=a&sort[]=b:desc`)
    /// or one comma-separated scalar (`sort=a,b:desc`).
    pub fn from_args(args: &ArgMap) -> Self {
        let mut directives = Vec::new();
        match args.get("sort") {
            Some(Variant::List(items)) => {
                for item in items {
                    if let Variant::Text(raw) = item {
                        directives.extend(SortDirective::parse(raw));
                    }
                }
            }
            Some(Variant::Text(raw)) => {
                for part in raw.split(',') {
                    directives.extend(SortDirective::parse(part));
                }
            }
            _ => {}
        }
        Self { directives }
    }

    /// Appends a directive.
    pub fn push(&mut self, directive: SortDirective) {
        self.directives.push(directive);
    }

    /// True when no ordering was requested.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// The directives, most significant first.
    pub fn iter(&self) -> impl Iterator<Item = &SortDirective> {
        self.directives.iter()
    }

    /// Wire forms of all directives, for echoing the applied sort back.
    pub fn state(&self) -> Vec<String> {
        self.directives.iter().map(SortDirective::state).collect()
    }

    /// Stable in-memory sort. Missing fields and nulls order before
    /// everything; incomparable value pairs keep their relative order.
    pub fn apply(&self, rows: &mut [Record]) {
        if self.directives.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for directive in &self.directives {
                let left = a.get(&directive.field).unwrap_or(&Variant::Null);
                let right = b.get(&directive.field).unwrap_or(&Variant::Null);
                let mut ordering = compare_for_sort(left, right);
                if directive.descending {
                    ordering = ordering.reverse();
                }
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

fn compare_for_sort(a: &Variant, b: &Variant) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}
