//! The capability surface domain objects implement to become renderable.
//!
//! A routed type implements [`Paper`] plus whichever capability traits apply
//! to it, and overrides the matching `as_*` accessor to return `Some(self)`.
//! The pipeline only ever talks to these traits; there is no reflection and
//! no name-based method lookup.

use folio_model::{DataKind, EntityAction, Field, Link, Record, Variant};

use folio_filter::FilterSet;

use crate::context::CancelToken;
use crate::error::PaperError;
use crate::page::{PageSpec, PageWindow};
use crate::sort::SortSpec;

/// Result type for capability methods. Domain errors stay opaque; the
/// pipeline wraps them with the capability and type that failed.
pub type PaperResult<T> = Result<T, PaperError>;

/// Everything a data-producing capability gets handed when fetching.
pub struct FetchContext<'a> {
    /// The window to fetch: offset plus lookahead fetch size.
    pub window: PageWindow,
    /// The requested ordering.
    pub sort: &'a SortSpec,
    /// The compiled filter (also available as SQL via
    /// [`FilterSet::to_sql`]).
    pub filter: &'a FilterSet,
    /// Cooperative cancellation; long fetches should check it.
    pub cancel: &'a CancelToken,
}

/// A renderable domain object.
///
/// Every accessor defaults to `None`; a type opts into a capability by
/// overriding the accessor.
pub trait Paper: Send {
    /// The type's name, used as an entity class tag and in route derivation.
    fn type_name(&self) -> &str;

    /// Human-readable title; defaults to the type name at render time.
    fn title(&self) -> Option<String> {
        None
    }

    /// Readable/writable named fields, used for route-placeholder binding.
    fn as_fields(&self) -> Option<&dyn FieldAccess> {
        None
    }

    /// Mutable access to the same fields.
    fn as_fields_mut(&mut self) -> Option<&mut dyn FieldAccess> {
        None
    }

    /// Receives the resolved paging state before fetching.
    fn as_page_mut(&mut self) -> Option<&mut dyn HasPage> {
        None
    }

    /// Receives the resolved sort order before fetching.
    fn as_sort_mut(&mut self) -> Option<&mut dyn HasSort> {
        None
    }

    /// Declares filterable fields.
    fn as_filter(&self) -> Option<&dyn HasFilter> {
        None
    }

    /// Receives the compiled filter before fetching.
    fn as_filter_mut(&mut self) -> Option<&mut dyn HasFilter> {
        None
    }

    /// Produces a single data record.
    fn as_data(&self) -> Option<&dyn HasData> {
        None
    }

    /// Produces tabular rows.
    fn as_rows(&self) -> Option<&dyn HasRows> {
        None
    }

    /// Produces card records.
    fn as_cards(&self) -> Option<&dyn HasCards> {
        None
    }

    /// Produces index (menu) links.
    fn as_index(&self) -> Option<&dyn HasIndex> {
        None
    }

    /// Produces creation blueprints.
    fn as_blueprint(&self) -> Option<&dyn HasBlueprint> {
        None
    }
}

/// Named-field access for route-placeholder binding and link expansion.
pub trait FieldAccess {
    /// The names this type exposes.
    fn field_names(&self) -> Vec<String>;

    /// Reads a field; `None` when the name is unknown.
    fn get_field(&self, name: &str) -> Option<Variant>;

    /// Writes a field, returning `false` when the name is unknown or the
    /// value was not accepted.
    fn set_field(&mut self, name: &str, value: Variant) -> bool;

    /// True when a field with this name exists, in any casing.
    fn has_field(&self, name: &str) -> bool {
        self.field_names()
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Receives the paging state resolved from the request.
pub trait HasPage {
    /// Called once, before any fetch.
    fn set_page(&mut self, page: PageSpec);
}

/// Receives the sort order resolved from the request.
pub trait HasSort {
    /// Called once, before any fetch.
    fn set_sort(&mut self, sort: SortSpec);
}

/// Declares which fields a list resource can be filtered on.
pub trait HasFilter {
    /// The filterable fields, in the order the filter action lists them.
    fn filter_fields(&self) -> Vec<FilterField>;

    /// Receives the compiled filter before any fetch. Sources that translate
    /// the filter themselves keep it here; the default discards it because
    /// the fetch context carries it too.
    fn set_filter(&mut self, _filter: FilterSet) {}
}

/// Produces the single record of a data resource.
pub trait HasData {
    /// Fetches the record; `Ok(None)` renders an empty data fragment.
    fn data(&self, ctx: &FetchContext<'_>) -> PaperResult<Option<Record>>;

    /// The property names to render, in order; defaults to every key of the
    /// record.
    fn data_headers(&self, _data: &Record) -> Option<Vec<String>> {
        None
    }

    /// Links attached to the data fragment.
    fn data_links(&self, _data: &Record) -> Vec<Link> {
        Vec::new()
    }
}

/// Produces the rows of a tabular resource.
pub trait HasRows {
    /// Fetches rows. A source may either return its full unfiltered sequence
    /// (the engine then filters, sorts, and windows in memory) or handle
    /// paging itself, in which case it must override
    /// [`HasRows::delegates_paging`] and return at most
    /// [`PageWindow::fetch_size`] rows.
    fn rows(&self, ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>>;

    /// True when the source applies filter, sort, and window itself.
    fn delegates_paging(&self) -> bool {
        false
    }

    /// The columns to render, in order; defaults to the keys of the first
    /// row.
    fn row_headers(&self, _rows: &[Record]) -> Option<Vec<String>> {
        None
    }

    /// Links attached to one row child-entity.
    fn row_links(&self, _row: &Record) -> Vec<Link> {
        Vec::new()
    }
}

/// Produces the cards of a card-list resource. Paging works as for
/// [`HasRows`].
pub trait HasCards {
    /// Fetches cards.
    fn cards(&self, ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>>;

    /// True when the source applies filter, sort, and window itself.
    fn delegates_paging(&self) -> bool {
        false
    }

    /// Links attached to one card child-entity.
    fn card_links(&self, _card: &Record) -> Vec<Link> {
        Vec::new()
    }
}

/// Produces the links of an index (menu) resource.
pub trait HasIndex {
    /// The index entries, in render order.
    fn index(&self) -> PaperResult<Vec<Link>>;
}

/// Produces creation blueprints: actions describing how to create related
/// resources.
pub trait HasBlueprint {
    /// The blueprint actions, in render order.
    fn blueprint(&self) -> PaperResult<Vec<EntityAction>>;
}

/// One filterable field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
    /// The field name, matched case-insensitively against request arguments.
    pub name: String,
    /// The field's value kind; filter values coerce to it on both paths.
    pub kind: DataKind,
    /// Label on the rendered filter action.
    pub title: Option<String>,
    /// Accepts a list of values (`name[]=a&name[]=b`).
    pub allow_many: bool,
    /// Accepts a range (`name.min=`/`name.max=`).
    pub allow_range: bool,
    /// Accepts `%`/`?` wildcards.
    pub allow_wildcards: bool,
}

impl FilterField {
    /// Declares a filterable field with kind-derived capabilities: every
    /// field accepts lists, ordered kinds accept ranges, text accepts
    /// wildcards.
    pub fn new(name: impl Into<String>, kind: DataKind) -> Self {
        Self {
            name: name.into(),
            kind,
            title: None,
            allow_many: true,
            allow_range: matches!(
                kind,
                DataKind::Int
                    | DataKind::Decimal
                    | DataKind::Date
                    | DataKind::Time
                    | DataKind::Datetime
            ),
            allow_wildcards: kind == DataKind::Text,
        }
    }

    /// Sets the label.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Renders this declaration as a filter-action input, carrying the
    /// currently applied value.
    pub fn to_field(&self, current: Option<&Variant>) -> Field {
        let mut field = Field::new(&self.name).with_data_type(self.kind);
        if let Some(title) = &self.title {
            field = field.with_title(title.clone());
        }
        if let Some(value) = current {
            field = field.with_value(value.clone());
        }
        field.allow_many = self.allow_many.then_some(true);
        field.allow_range = self.allow_range.then_some(true);
        field.allow_wildcards = self.allow_wildcards.then_some(true);
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_field_kind_defaults() {
        let text = FilterField::new("name", DataKind::Text);
        assert!(text.allow_wildcards);
        assert!(!text.allow_range);

        let number = FilterField::new("price", DataKind::Decimal);
        assert!(number.allow_range);
        assert!(!number.allow_wildcards);
    }

    #[test]
    fn test_to_field_carries_current_value() {
        let declaration = FilterField::new("name", DataKind::Text).with_title("Name");
        let field = declaration.to_field(Some(&Variant::Text("Ada%".into())));
        assert_eq!(field.value, Variant::Text("Ada%".into()));
        assert_eq!(field.effective_title(), "Name");
        assert_eq!(field.allow_wildcards, Some(true));
        assert_eq!(field.allow_range, None);
    }

    #[test]
    fn test_field_access_has_field_default() {
        struct Two;
        impl FieldAccess for Two {
            fn field_names(&self) -> Vec<String> {
                vec!["Id".into(), "Name".into()]
            }
            fn get_field(&self, _name: &str) -> Option<Variant> {
                None
            }
            fn set_field(&mut self, _name: &str, _value: Variant) -> bool {
                false
            }
        }
        assert!(Two.has_field("id"));
        assert!(!Two.has_field("missing"));
    }
}
