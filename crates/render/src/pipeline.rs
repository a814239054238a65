//! The three-phase render pipeline.
//!
//! Every request runs the same phases in order:
//!
//! 1. **arguments** - resolve paging, sorting, and filtering from the URI and
//!    push them into the domain object;
//! 2. **cache** - fetch each fragment the object's capabilities produce,
//!    windowed with one lookahead row;
//! 3. **render** - flatten the cached fragments into one entity, attach
//!    actions and links, and resolve relative hrefs.
//!
//! Failures at any phase become fault entities, so callers always get a
//! renderable result.

use folio_model::{Entity, EntityAction, Link, Method, Record, Variant, class, rel};
use tracing::{debug, warn};

use folio_filter::{FieldFilter, FilterSet};

use crate::config::RenderConfig;
use crate::context::{CancelToken, RenderContext, Slot};
use crate::error::RenderError;
use crate::page::{PageSpec, PageWindow, page_links};
use crate::paper::FetchContext;
use crate::registry::RouteRegistry;
use crate::sort::SortSpec;
use crate::uri::RequestUri;
use crate::uri::template::base_name;

/// Turns request URIs into hypermedia entities.
pub struct RenderPipeline {
    config: RenderConfig,
}

impl RenderPipeline {
    /// Creates a pipeline with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders a request, mapping any failure to a fault entity.
    pub fn render(&self, registry: &RouteRegistry, uri: &str) -> Entity {
        self.render_cancellable(registry, uri, CancelToken::new())
    }

    /// Renders a request under a cancel token, mapping any failure to a
    /// fault entity.
    pub fn render_cancellable(
        &self,
        registry: &RouteRegistry,
        uri: &str,
        cancel: CancelToken,
    ) -> Entity {
        match self.try_render(registry, uri, cancel) {
            Ok(entity) => entity,
            Err(error) => {
                warn!(uri, %error, "render failed");
                error.to_entity()
            }
        }
    }

    /// Renders a request to the wire format, faults included.
    pub fn render_json(&self, registry: &RouteRegistry, uri: &str) -> Result<String, RenderError> {
        let entity = self.render(registry, uri);
        Ok(folio_codec::to_json_string(&entity)?)
    }

    /// Renders a request, surfacing failures as errors.
    pub fn try_render(
        &self,
        registry: &RouteRegistry,
        uri: &str,
        cancel: CancelToken,
    ) -> Result<Entity, RenderError> {
        let request = RequestUri::parse(uri);
        let (paper, template) =
            registry
                .resolve(request.path())
                .ok_or_else(|| RenderError::RouteNotFound {
                    path: request.path().to_string(),
                })?;
        let args = template.bind_uri(uri).unwrap_or_default();

        let mut ctx = RenderContext::new(paper, template, request, args, cancel);
        self.set_args(&mut ctx)?;
        self.cache_data(&mut ctx)?;
        self.render_entity(&mut ctx)
    }

    /// Phase one: resolve paging, sorting, and filtering, then push the
    /// results and any path-bound values into the domain object.
    fn set_args(&self, ctx: &mut RenderContext) -> Result<(), RenderError> {
        ctx.cancel.ensure_live()?;
        ctx.page = PageSpec::from_args(&ctx.args, &self.config);
        ctx.sort = SortSpec::from_args(&ctx.args);

        let mut filter = FilterSet::new();
        let declared = ctx
            .paper
            .as_filter()
            .map(|f| f.filter_fields())
            .unwrap_or_default();
        for field in &declared {
            if let Some(value) = ctx.args.get(&field.name) {
                filter.push(FieldFilter::classify(&field.name, field.kind, value)?);
            }
        }
        if let Some(receiver) = ctx.paper.as_filter_mut() {
            receiver.set_filter(filter.clone());
        }
        ctx.filter = filter;

        if let Some(receiver) = ctx.paper.as_page_mut() {
            receiver.set_page(ctx.page.clone());
        }
        if let Some(receiver) = ctx.paper.as_sort_mut() {
            receiver.set_sort(ctx.sort.clone());
        }

        // path captures land on same-named writable fields
        let placeholders: Vec<String> = ctx.template.names().to_vec();
        for name in placeholders {
            let base = base_name(&name).to_string();
            let value = match ctx.args.get(&base) {
                Some(value) if !value.is_null() => value.clone(),
                _ => continue,
            };
            if let Some(fields) = ctx.paper.as_fields_mut() {
                if !fields.set_field(&base, value) {
                    debug!(field = %base, "path value not accepted");
                }
            }
        }
        Ok(())
    }

    /// Phase two: fetch every fragment the object produces into the cache.
    fn cache_data(&self, ctx: &mut RenderContext) -> Result<(), RenderError> {
        ctx.cancel.ensure_live()?;
        let type_name = ctx.paper.type_name().to_string();
        let window = ctx.page.window();

        if let Some(source) = ctx.paper.as_data() {
            let fetch = FetchContext {
                window,
                sort: &ctx.sort,
                filter: &ctx.filter,
                cancel: &ctx.cancel,
            };
            let data = source
                .data(&fetch)
                .map_err(|source| RenderError::Convention {
                    capability: "data",
                    type_name: type_name.clone(),
                    source,
                })?;
            ctx.cache.data = match data {
                Some(record) => Slot::Present(record),
                None => Slot::Empty,
            };
        }

        if let Some(source) = ctx.paper.as_rows() {
            let fetch = FetchContext {
                window,
                sort: &ctx.sort,
                filter: &ctx.filter,
                cancel: &ctx.cancel,
            };
            let rows = source
                .rows(&fetch)
                .map_err(|source| RenderError::Convention {
                    capability: "rows",
                    type_name: type_name.clone(),
                    source,
                })?;
            let delegated = source.delegates_paging();
            ctx.cache.rows = match rows {
                None => Slot::Empty,
                Some(rows) => {
                    let (rows, has_more) =
                        window_records(rows, &ctx.filter, &ctx.sort, window, delegated);
                    ctx.has_more = ctx.has_more || has_more;
                    Slot::Present(rows)
                }
            };
        }

        if let Some(source) = ctx.paper.as_cards() {
            let fetch = FetchContext {
                window,
                sort: &ctx.sort,
                filter: &ctx.filter,
                cancel: &ctx.cancel,
            };
            let cards = source
                .cards(&fetch)
                .map_err(|source| RenderError::Convention {
                    capability: "cards",
                    type_name: type_name.clone(),
                    source,
                })?;
            let delegated = source.delegates_paging();
            ctx.cache.cards = match cards {
                None => Slot::Empty,
                Some(cards) => {
                    // a lookahead hit on either windowed fragment keeps paging
                    let (cards, has_more) =
                        window_records(cards, &ctx.filter, &ctx.sort, window, delegated);
                    ctx.has_more = ctx.has_more || has_more;
                    Slot::Present(cards)
                }
            };
        }

        Ok(())
    }

    /// Phase three: flatten the cache into one entity.
    fn render_entity(&self, ctx: &mut RenderContext) -> Result<Entity, RenderError> {
        ctx.cancel.ensure_live()?;
        let type_name = ctx.paper.type_name().to_string();

        let mut entity = Entity::new();
        entity.add_class(class::HYPER);
        entity.add_class(type_name.clone());
        match ctx.paper.title() {
            Some(title) => entity.set_title(title),
            None => entity.set_title(type_name.clone()),
        }

        if let Slot::Present(data) = &ctx.cache.data {
            entity.add_class(class::DATA);
            let source = ctx.paper.as_data();
            let headers = source
                .and_then(|s| s.data_headers(data))
                .unwrap_or_else(|| data.iter().map(|p| p.name().to_string()).collect());
            for name in &headers {
                if let Some(value) = data.get(name) {
                    entity.set_property(name.clone(), value.clone());
                }
            }
            if let Some(source) = source {
                for link in source.data_links(data) {
                    entity.add_link(link);
                }
            }
        }

        let mut paged = false;

        if let Slot::Present(rows) = &ctx.cache.rows {
            entity.add_class(class::ROWS);
            let source = ctx.paper.as_rows();
            let headers = source
                .and_then(|s| s.row_headers(rows))
                .or_else(|| {
                    rows.first()
                        .map(|r| r.iter().map(|p| p.name().to_string()).collect())
                })
                .unwrap_or_default();
            for row in rows {
                let mut child = Entity::new();
                child.add_class(class::ROW);
                child.add_rel(rel::ROW);
                for name in &headers {
                    if let Some(value) = row.get(name) {
                        child.set_property(name.clone(), value.clone());
                    }
                }
                if let Some(source) = source {
                    for link in source.row_links(row) {
                        child.add_link(link);
                    }
                }
                entity.add_entity(child);
            }
            paged = true;
        }

        if let Slot::Present(cards) = &ctx.cache.cards {
            entity.add_class(class::CARDS);
            let source = ctx.paper.as_cards();
            for card in cards {
                let mut child = Entity::new();
                child.add_class(class::CARD);
                child.add_rel(rel::CARD);
                for prop in card.iter() {
                    child.set_property(prop.name().to_string(), prop.value().clone());
                }
                if let Some(source) = source {
                    for link in source.card_links(card) {
                        child.add_link(link);
                    }
                }
                entity.add_entity(child);
            }
            paged = true;
        }

        if !ctx.sort.is_empty() {
            entity.set_property(
                "__sort",
                Variant::List(ctx.sort.state().into_iter().map(Variant::Text).collect()),
            );
        }

        let filter_fields = ctx
            .paper
            .as_filter()
            .map(|f| f.filter_fields())
            .unwrap_or_default();
        if paged && !filter_fields.is_empty() {
            let mut action = EntityAction::new("filter", ".")
                .with_method(Method::Get)
                .with_class(class::FILTER)
                .with_title("Filter");
            for field in &filter_fields {
                action = action.with_field(field.to_field(ctx.args.get(&field.name)));
            }
            entity.add_action(action);
        }

        if let Some(source) = ctx.paper.as_index() {
            entity.add_class(class::INDEX);
            let links = source.index().map_err(|source| RenderError::Convention {
                capability: "index",
                type_name: type_name.clone(),
                source,
            })?;
            for link in links {
                let link = if link.has_rel(rel::INDEX) {
                    link
                } else {
                    link.with_rel(rel::INDEX)
                };
                entity.add_link(link);
            }
        }

        if let Some(source) = ctx.paper.as_blueprint() {
            entity.add_class(class::BLUEPRINT);
            let actions = source
                .blueprint()
                .map_err(|source| RenderError::Convention {
                    capability: "blueprint",
                    type_name: type_name.clone(),
                    source,
                })?;
            for action in actions {
                entity.add_action(action);
            }
        }

        // domain-supplied hrefs may be relative; request-derived links below
        // are already final
        ctx.request.resolve_entity(&mut entity, &self.config);

        if paged {
            for link in page_links(&ctx.page, ctx.has_more, &ctx.request) {
                entity.add_link(link);
            }
        }
        entity.add_link(Link::new(rel::SELF, ctx.request.full()));

        Ok(entity)
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Applies filter, sort, and window to a fetched sequence (or, for
/// delegating sources, only trims the lookahead row) and reports whether a
/// following page exists.
fn window_records(
    mut records: Vec<Record>,
    filter: &FilterSet,
    sort: &SortSpec,
    window: PageWindow,
    delegated: bool,
) -> (Vec<Record>, bool) {
    if delegated {
        let has_more = records.len() >= window.fetch_size;
        records.truncate(window.limit());
        (records, has_more)
    } else {
        filter.apply(&mut records);
        sort.apply(&mut records);
        let start = window.offset.min(records.len());
        records.drain(..start);
        let has_more = records.len() > window.limit();
        records.truncate(window.limit());
        (records, has_more)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> Record {
        let mut r = Record::new();
        r.set("Id", id);
        r
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records
            .iter()
            .filter_map(|r| r.get("Id")?.as_int())
            .collect()
    }

    #[test]
    fn test_window_records_in_memory() {
        let all: Vec<Record> = (1..=5).map(record).collect();
        let window = PageWindow {
            offset: 2,
            fetch_size: 3,
        };
        let (page, has_more) = window_records(
            all,
            &FilterSet::new(),
            &SortSpec::new(),
            window,
            false,
        );
        assert_eq!(ids(&page), vec![3, 4]);
        assert!(has_more);
    }

    #[test]
    fn test_window_records_last_page() {
        let all: Vec<Record> = (1..=5).map(record).collect();
        let window = PageWindow {
            offset: 4,
            fetch_size: 3,
        };
        let (page, has_more) = window_records(
            all,
            &FilterSet::new(),
            &SortSpec::new(),
            window,
            false,
        );
        assert_eq!(ids(&page), vec![5]);
        assert!(!has_more);
    }

    #[test]
    fn test_window_records_delegated_lookahead() {
        // a delegating source returned fetch_size rows: one more page exists
        let fetched: Vec<Record> = (1..=3).map(record).collect();
        let window = PageWindow {
            offset: 0,
            fetch_size: 3,
        };
        let (page, has_more) =
            window_records(fetched, &FilterSet::new(), &SortSpec::new(), window, true);
        assert_eq!(ids(&page), vec![1, 2]);
        assert!(has_more);

        let fetched: Vec<Record> = (1..=2).map(record).collect();
        let (page, has_more) =
            window_records(fetched, &FilterSet::new(), &SortSpec::new(), window, true);
        assert_eq!(ids(&page), vec![1, 2]);
        assert!(!has_more);
    }
}
