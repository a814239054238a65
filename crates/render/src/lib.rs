//! # folio-render - Route Registry and Render Pipeline
//!
//! Turns request URIs into [`folio_model::Entity`] graphs. A host registers
//! domain-object factories against route templates, then hands every request
//! URI to a [`RenderPipeline`]; the pipeline resolves the route, extracts
//! arguments, fetches the object's data fragments, and flattens them into
//! one entity ready for [`folio_codec`] serialization.
//!
//! ## Capabilities instead of conventions
//!
//! Domain objects implement [`Paper`] plus explicit capability traits
//! ([`HasRows`], [`HasData`], [`HasFilter`], ...). The pipeline discovers
//! what an object can do through the trait accessors, never by name lookup.
//!
//! ## Example
//!
//! ```rust
//! use folio_model::{Record, rel};
//! use folio_render::{
//!     FetchContext, HasRows, Paper, PaperResult, RenderConfig, RenderPipeline, RouteRegistry,
//! };
//!
//! #[derive(Default)]
//! struct Orders;
//!
//! impl Paper for Orders {
//!     fn type_name(&self) -> &str {
//!         "orders"
//!     }
//!     fn as_rows(&self) -> Option<&dyn HasRows> {
//!         Some(self)
//!     }
//! }
//!
//! impl HasRows for Orders {
//!     fn rows(&self, _ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>> {
//!         let rows = (1..=3)
//!             .map(|id| {
//!                 let mut row = Record::new();
//!                 row.set("Id", id as i64);
//!                 row
//!             })
//!             .collect();
//!         Ok(Some(rows))
//!     }
//! }
//!
//! let registry = RouteRegistry::new();
//! registry.register("/orders", || Box::new(Orders)).unwrap();
//!
//! let pipeline = RenderPipeline::new(RenderConfig::default());
//! let entity = pipeline.render(&registry, "/orders?limit=2");
//!
//! assert_eq!(entity.entities_with_rel(rel::ROW).count(), 2);
//! assert!(entity.link(rel::NEXT).is_some());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod page;
pub mod paper;
pub mod pipeline;
pub mod registry;
pub mod sort;
pub mod uri;

pub use config::RenderConfig;
pub use context::{CancelToken, DataCache, RenderContext, Slot};
pub use error::{PaperError, RenderError};
pub use page::{PageSpec, PageWindow, page_links};
pub use paper::{
    FetchContext, FieldAccess, FilterField, HasBlueprint, HasCards, HasData, HasFilter, HasIndex,
    HasPage, HasRows, HasSort, Paper, PaperResult,
};
pub use pipeline::RenderPipeline;
pub use registry::{PaperFactory, RouteRegistry, derive_template};
pub use sort::{SortDirective, SortSpec};
pub use uri::{ArgMap, RequestUri, UriTemplate};

/// Initializes tracing with an env-filter (`RUST_LOG`), defaulting to `info`.
///
/// Hosts embedding the pipeline into a larger application should configure
/// their own subscriber instead.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
