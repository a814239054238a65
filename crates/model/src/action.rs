//! State-changing operations described on an entity.

use std::fmt;

use crate::field::Field;

/// The HTTP method an action is submitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Retrieve (used by filter/search actions).
    Get,
    /// Create or submit.
    #[default]
    Post,
    /// Replace.
    Put,
    /// Partially update.
    Patch,
    /// Remove.
    Delete,
}

impl Method {
    /// The wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Parses a wire name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A described mutating operation: where to send it, how, and which inputs
/// it needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityAction {
    /// Class tags.
    pub classes: Vec<String>,
    /// The action name, unique within its entity.
    pub name: String,
    /// Human-readable label; defaults from the name.
    pub title: Option<String>,
    /// Roles.
    pub rels: Vec<String>,
    /// Submission method.
    pub method: Method,
    /// Target address.
    pub href: String,
    /// Content type of the submitted body.
    pub media_type: Option<String>,
    /// The inputs this action needs, in declaration order.
    pub fields: Vec<Field>,
}

impl EntityAction {
    /// Creates an action with a name and target.
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            ..Default::default()
        }
    }

    /// Sets the method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a class tag.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Appends an input field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks an input up by name, case-insensitively.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// The effective title: the explicit one, or the action name.
    pub fn effective_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}
