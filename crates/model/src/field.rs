//! Input field descriptors for entity actions.

use crate::variant::{DataKind, Variant};

/// The input-widget kind of a [`Field`].
///
/// When unset, the widget is derived from the field's [`DataKind`] via
/// [`FieldType::for_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Invisible carrier of a fixed value.
    Hidden,
    /// Single-line text input.
    Text,
    /// Numeric input.
    Number,
    /// Boolean checkbox.
    Checkbox,
    /// Calendar date input.
    Date,
    /// Time-of-day input.
    Time,
    /// Combined date and time input.
    Datetime,
}

impl FieldType {
    /// The widget conventionally used for a data kind.
    pub fn for_kind(kind: DataKind) -> Self {
        match kind {
            DataKind::Bit => FieldType::Checkbox,
            DataKind::Int | DataKind::Decimal => FieldType::Number,
            DataKind::Text => FieldType::Text,
            DataKind::Date => FieldType::Date,
            DataKind::Time => FieldType::Time,
            DataKind::Datetime => FieldType::Datetime,
        }
    }

    /// The wire name of this widget kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Hidden => "hidden",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
        }
    }

    /// Parses a wire name back into a widget kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hidden" => Some(FieldType::Hidden),
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "checkbox" => Some(FieldType::Checkbox),
            "date" => Some(FieldType::Date),
            "time" => Some(FieldType::Time),
            "datetime" => Some(FieldType::Datetime),
            _ => None,
        }
    }
}

/// A remote provider of candidate values for a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldProvider {
    /// Address of the provider resource.
    pub href: String,
    /// The record keys to read candidate values from.
    pub keys: Vec<String>,
}

/// One input of one [`crate::EntityAction`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    /// The input name.
    pub name: String,
    /// Widget kind; derived from `data_type` when unset.
    pub field_type: Option<FieldType>,
    /// Human-readable label; defaults from the name.
    pub title: Option<String>,
    /// Current or default value.
    pub value: Variant,
    /// Declared value kind.
    pub data_type: Option<DataKind>,
    /// Class tags.
    pub classes: Vec<String>,
    /// Roles.
    pub rels: Vec<String>,
    /// Grouping category.
    pub category: Option<String>,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Candidate-value provider.
    pub provider: Option<FieldProvider>,
    /// The input must be filled in.
    pub required: Option<bool>,
    /// The input is shown but not editable.
    pub read_only: Option<bool>,
    /// Minimum text length.
    pub min_length: Option<u32>,
    /// Maximum text length.
    pub max_length: Option<u32>,
    /// Validation pattern.
    pub pattern: Option<String>,
    /// Render as a multi-line widget.
    pub multiline: Option<bool>,
    /// Accepts a list of values.
    pub allow_many: Option<bool>,
    /// Accepts a min/max range.
    pub allow_range: Option<bool>,
    /// Accepts `%`/`?` wildcards.
    pub allow_wildcards: Option<bool>,
}

impl Field {
    /// Creates a field with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the declared value kind.
    pub fn with_data_type(mut self, kind: DataKind) -> Self {
        self.data_type = Some(kind);
        self
    }

    /// Sets the widget kind explicitly.
    pub fn with_field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the current value.
    pub fn with_value(mut self, value: impl Into<Variant>) -> Self {
        self.value = value.into();
        self
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// The effective widget kind: the explicit one, or the one derived from
    /// the data kind, falling back to a text input.
    pub fn effective_type(&self) -> FieldType {
        self.field_type
            .or(self.data_type.map(FieldType::for_kind))
            .unwrap_or(FieldType::Text)
    }

    /// The effective title: the explicit one, or the field name.
    pub fn effective_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}
