//! # folio-model - Hypermedia Entity Model
//!
//! This crate defines the data structures that make up a Folio hypermedia
//! resource: the [`Entity`] graph with its ordered [`PropertyCollection`],
//! navigation [`Link`]s, mutating [`EntityAction`]s and their input
//! [`Field`]s, together with the [`Variant`] sum type used everywhere a
//! loosely-typed value travels through the framework.
//!
//! ## Design
//!
//! - Entities are built fresh for every request, mutated only while the
//!   render pipeline runs, and dropped after serialization. Nothing in this
//!   crate is shared across requests.
//! - [`Variant`] is an explicit sum type (`Null | Bool | Int | Float | Text |
//!   DateTime | List | Range | Map`) with exhaustive matching at every
//!   consumption site; there is no dynamic wrapper to unwrap.
//! - [`PropertyCollection`] keeps insertion order, treats names
//!   case-insensitively, and always yields metadata properties (names with
//!   the `__` prefix) after plain ones.
//!
//! ## Example
//!
//! ```rust
//! use folio_model::{Entity, Link, Variant, rel};
//!
//! let mut order = Entity::new();
//! order.add_class("order");
//! order.set_title("Order 1");
//! order.set_property("Id", Variant::Int(7));
//! order.add_link(Link::new(rel::SELF, "/orders/7"));
//!
//! assert_eq!(order.property("id"), Some(&Variant::Int(7)));
//! assert!(order.link(rel::SELF).is_some());
//! ```

#![warn(missing_docs)]

pub mod action;
pub mod entity;
pub mod field;
pub mod link;
pub mod names;
pub mod property;
pub mod variant;

pub use action::{EntityAction, Method};
pub use entity::Entity;
pub use field::{Field, FieldProvider, FieldType};
pub use link::Link;
pub use names::{class, rel};
pub use property::{Property, PropertyCollection};
pub use variant::{DataKind, Variant};

/// A single row or data record: one ordered bag of named values.
///
/// Domain objects hand records to the render pipeline; the pipeline flattens
/// them into entity properties or row child-entities.
pub type Record = PropertyCollection;
