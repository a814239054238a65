//! # folio-filter - Filter-Predicate Compiler
//!
//! Turns named filter values into composable predicates over records, for
//! both in-memory sequences and query-translatable sources.
//!
//! ## Classification
//!
//! A filter value classifies into exactly one predicate shape:
//!
//! | value shape | predicate |
//! |-------------|-----------|
//! | null | [`Predicate::Always`] (no-op) |
//! | list | [`Predicate::InList`] membership, elements coerced |
//! | range (`min`/`max`) | [`Predicate::Range`], inclusive, one- or two-sided |
//! | text with `%` or `?` | [`Predicate::Like`] wildcard match |
//! | anything else | [`Predicate::Equals`], coerced to the target kind |
//!
//! ## Two evaluation paths, one behavior
//!
//! [`FilterSet::matches`] evaluates directly against a [`folio_model::Record`];
//! [`FilterSet::to_sql`] renders the same predicates as a parameterized
//! [`SqlFragment`] for a query-translatable source. Both paths accept and
//! reject exactly the same values; the test suites hold them to the same
//! corpus. Multiple fields compose by logical AND.
//!
//! ## Example
//!
//! ```rust
//! use folio_model::{DataKind, Record, Variant};
//! use folio_filter::{FieldFilter, FilterSet};
//!
//! let mut set = FilterSet::new();
//! set.push(FieldFilter::classify(
//!     "name",
//!     DataKind::Text,
//!     &Variant::Text("Ada%".into()),
//! ).unwrap());
//!
//! let mut record = Record::new();
//! record.set("Name", "Ada Lovelace");
//! assert!(set.matches(&record));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod eval;
pub mod like;
pub mod predicate;
pub mod sql;

pub use error::FilterError;
pub use eval::{FieldFilter, FilterSet};
pub use like::LikePattern;
pub use predicate::Predicate;
pub use sql::{SqlFragment, SqlParam};
