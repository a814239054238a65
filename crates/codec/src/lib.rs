//! # folio-codec - Hypermedia Wire Codec
//!
//! Serializes [`folio_model::Entity`] graphs to the Folio wire dialect (a
//! SIREN-like JSON document) and parses such documents back onto the typed
//! model.
//!
//! ## Dialect rules
//!
//! - Member names are camelCase on the wire; each dot-separated segment of a
//!   property name converts independently and the segments are rejoined with
//!   dots. Parsing converts them back to PascalCase.
//! - Metadata members (`__` name prefix) are emitted after all plain members
//!   of the same object.
//! - Booleans are emitted as `1`/`0`.
//! - Date/time values are emitted as ISO-8601 text with an explicit offset.
//! - Members whose value is null or an empty collection are omitted, never
//!   emitted as `null` or `[]`.
//!
//! ## Example
//!
//! ```rust
//! use folio_model::{Entity, Variant};
//! use folio_codec::{to_json_string, from_json_str};
//!
//! let mut order = Entity::new();
//! order.add_class("order");
//! order.set_title("Order 1");
//! order.set_property("Id", Variant::Int(7));
//!
//! let json = to_json_string(&order).unwrap();
//! assert!(json.contains(r#""id":7"#));
//!
//! let parsed = from_json_str(&json).unwrap();
//! assert_eq!(parsed.property("Id"), Some(&Variant::Int(7)));
//! ```

#![warn(missing_docs)]

pub mod case;
pub mod de;
pub mod error;
pub mod ser;

pub use error::{CodecError, Result};

use folio_model::Entity;

/// Serializes an entity to a compact JSON string.
pub fn to_json_string(entity: &Entity) -> Result<String> {
    Ok(serde_json::to_string(&ser::entity_to_value(entity))?)
}

/// Serializes an entity to a pretty-printed JSON string.
pub fn to_json_string_pretty(entity: &Entity) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ser::entity_to_value(entity))?)
}

/// Serializes an entity to a `serde_json::Value`.
pub fn to_json_value(entity: &Entity) -> serde_json::Value {
    ser::entity_to_value(entity)
}

/// Parses a hypermedia document from a JSON string.
pub fn from_json_str(s: &str) -> Result<Entity> {
    let value: serde_json::Value = serde_json::from_str(s)?;
    de::entity_from_value(&value)
}

/// Maps an already-parsed `serde_json::Value` onto the typed model.
pub fn from_json_value(value: &serde_json::Value) -> Result<Entity> {
    de::entity_from_value(value)
}
