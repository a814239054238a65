//! The render error taxonomy and its fault-entity rendering.

use folio_model::{Entity, Variant, class};
use thiserror::Error;

/// An opaque error surfaced by a domain object's capability method.
pub type PaperError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong between receiving a URI and emitting an
/// entity.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A route template failed validation at registration time.
    #[error("route template {template:?} is invalid: {reason}")]
    InvalidTemplate {
        /// The offending template text.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A route placeholder has no same-named writable field on the routed
    /// type. Detected at registration; the route is excluded.
    #[error("type {type_name:?} has no field for route placeholder {placeholder:?}")]
    Binding {
        /// The routed type.
        type_name: String,
        /// The placeholder with no home.
        placeholder: String,
    },

    /// An outbound link template references a placeholder with no bound
    /// value.
    #[error("placeholder {placeholder:?} in template {template:?} has no bound value")]
    UnresolvedPlaceholder {
        /// The template being expanded.
        template: String,
        /// The placeholder that could not be resolved.
        placeholder: String,
    },

    /// No registered route matches the request path.
    #[error("no route matches {path:?}")]
    RouteNotFound {
        /// The unmatched request path.
        path: String,
    },

    /// A capability method on the domain object returned an error.
    #[error("{capability} failed on {type_name}")]
    Convention {
        /// The capability that failed (`data`, `rows`, `index`, ...).
        capability: &'static str,
        /// The routed type.
        type_name: String,
        /// The domain object's own error.
        #[source]
        source: PaperError,
    },

    /// Wire encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] folio_codec::CodecError),

    /// A filter value could not be compiled or translated.
    #[error(transparent)]
    Filter(#[from] folio_filter::FilterError),

    /// The request asks for a capability the routed type does not carry.
    #[error("unsupported: {feature}")]
    Unsupported {
        /// The missing capability.
        feature: String,
    },

    /// The request's cancel token fired.
    #[error("request cancelled")]
    Cancelled,
}

impl RenderError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            RenderError::InvalidTemplate { .. }
            | RenderError::Binding { .. }
            | RenderError::UnresolvedPlaceholder { .. }
            | RenderError::Convention { .. } => 500,
            RenderError::RouteNotFound { .. } => 404,
            RenderError::Codec(_) | RenderError::Filter(_) => 400,
            RenderError::Unsupported { .. } => 501,
            RenderError::Cancelled => 499,
        }
    }

    /// Renders the error as a fault entity, so failures travel the same wire
    /// format as successes.
    ///
    /// The `Message` property joins the deduplicated source chain; the
    /// individual chain entries ride along as `__trace` metadata.
    pub fn to_entity(&self) -> Entity {
        let chain = message_chain(self);
        let mut entity = Entity::new();
        entity.add_class(class::FAULT);
        entity.set_title("Request failed");
        entity.set_property("Status", Variant::Int(i64::from(self.status())));
        entity.set_property("Message", Variant::Text(chain.join("; ")));
        entity.set_property(
            "__trace",
            Variant::List(chain.into_iter().map(Variant::Text).collect()),
        );
        entity
    }
}

/// Walks the source chain, keeping the first occurrence of each distinct
/// message. Wrappers that restate their cause verbatim collapse to one entry.
fn message_chain(error: &dyn std::error::Error) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current: Option<&dyn std::error::Error> = Some(error);
    while let Some(err) = current {
        let message = err.to_string();
        if !chain.contains(&message) {
            chain.push(message);
        }
        current = err.source();
    }
    chain
}
