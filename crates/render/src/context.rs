//! Per-request render state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use folio_model::Record;

use folio_filter::FilterSet;

use crate::error::RenderError;
use crate::page::PageSpec;
use crate::paper::Paper;
use crate::sort::SortSpec;
use crate::uri::{ArgMap, RequestUri, UriTemplate};

/// Cooperative cancellation flag, cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an un-fired token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the token; every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once fired.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Errors with [`RenderError::Cancelled`] once fired.
    pub fn ensure_live(&self) -> Result<(), RenderError> {
        if self.is_cancelled() {
            Err(RenderError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// State of one fetchable fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Slot<T> {
    /// Nothing has been fetched (capability absent or phase not yet run).
    #[default]
    NotFetched,
    /// The source was asked and had nothing.
    Empty,
    /// Fetched content.
    Present(T),
}

impl<T> Slot<T> {
    /// The content, when present.
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// Everything fetched during the cache phase, kept apart from the domain
/// object so rendering never re-queries.
#[derive(Debug, Default)]
pub struct DataCache {
    /// The single record of a data resource.
    pub data: Slot<Record>,
    /// The windowed rows of a tabular resource.
    pub rows: Slot<Vec<Record>>,
    /// The windowed cards of a card-list resource.
    pub cards: Slot<Vec<Record>>,
}

/// The full per-request state threaded through the pipeline phases.
pub struct RenderContext {
    /// The routed domain object.
    pub paper: Box<dyn Paper>,
    /// The template that matched the request path.
    pub template: UriTemplate,
    /// The request URI, split for link rewriting.
    pub request: RequestUri,
    /// Path captures and query parameters, merged and classified.
    pub args: ArgMap,
    /// Paging resolved from the arguments.
    pub page: PageSpec,
    /// Ordering resolved from the arguments.
    pub sort: SortSpec,
    /// Filter compiled from the arguments.
    pub filter: FilterSet,
    /// Fetched fragments.
    pub cache: DataCache,
    /// Whether the lookahead saw a following page.
    pub has_more: bool,
    /// Cooperative cancellation for this request.
    pub cancel: CancelToken,
}

impl RenderContext {
    /// Builds the context for one request; paging, sorting, and filtering
    /// start at their defaults until the argument phase resolves them.
    pub fn new(
        paper: Box<dyn Paper>,
        template: UriTemplate,
        request: RequestUri,
        args: ArgMap,
        cancel: CancelToken,
    ) -> Self {
        Self {
            paper,
            template,
            request,
            args,
            page: PageSpec::default(),
            sort: SortSpec::default(),
            filter: FilterSet::default(),
            cache: DataCache::default(),
            has_more: false,
            cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(observer.ensure_live().is_ok());
        token.cancel();
        assert!(observer.is_cancelled());
        assert!(matches!(
            observer.ensure_live(),
            Err(RenderError::Cancelled)
        ));
    }

    #[test]
    fn test_slot_default_is_not_fetched() {
        let slot: Slot<Vec<Record>> = Slot::default();
        assert_eq!(slot, Slot::NotFetched);
        assert!(slot.as_present().is_none());
    }
}
