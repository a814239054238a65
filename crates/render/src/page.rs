//! Paging: the requested page versus the window actually fetched.

use folio_model::{DataKind, Link, rel};

use crate::config::RenderConfig;
use crate::uri::{ArgMap, RequestUri};

/// What the request asked for: `page` (1-based) takes precedence over
/// `offset` (0-based); `limit` is the page size the client sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    /// 1-based page number, when the request paged by number.
    pub page: Option<u64>,
    /// 0-based row offset, when the request paged by offset.
    pub offset: Option<u64>,
    /// Requested page size, already clamped to the configured maximum.
    pub limit: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: None,
            offset: None,
            limit: RenderConfig::default().default_limit,
        }
    }
}

impl PageSpec {
    /// Reads `page`, `offset`, and `limit` from the request arguments.
    /// Non-numeric or non-positive values fall back to defaults.
    pub fn from_args(args: &ArgMap, config: &RenderConfig) -> Self {
        let read = |name: &str| {
            args.get(name)
                .and_then(|v| v.coerce(DataKind::Int))
                .and_then(|v| v.as_int())
        };
        Self {
            page: read("page").filter(|p| *p >= 1).map(|p| p as u64),
            offset: read("offset").filter(|o| *o >= 0).map(|o| o as u64),
            limit: read("limit")
                .filter(|l| *l >= 1)
                .map(|l| (l as usize).min(config.max_limit))
                .unwrap_or(config.default_limit),
        }
    }

    /// The first row index of the requested page.
    pub fn start(&self) -> u64 {
        match self.page {
            Some(page) => (page - 1) * self.limit as u64,
            None => self.offset.unwrap_or(0),
        }
    }

    /// The 1-based page number, whichever way the request paged.
    pub fn page_number(&self) -> u64 {
        match self.page {
            Some(page) => page,
            None => self.start() / self.limit.max(1) as u64 + 1,
        }
    }

    /// The window to actually fetch: one row more than the page, so the
    /// presence of a following page is known without a count query.
    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: self.start() as usize,
            fetch_size: self.limit + 1,
        }
    }
}

/// The fetch window handed to data sources. Distinct from [`PageSpec`]: the
/// fetch size includes the lookahead row and is never what the client sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// First row index to fetch.
    pub offset: usize,
    /// Rows to fetch, lookahead included.
    pub fetch_size: usize,
}

impl PageWindow {
    /// The page size without the lookahead row.
    pub fn limit(&self) -> usize {
        self.fetch_size.saturating_sub(1)
    }
}

/// Builds the pagination links for a list fragment: `first` and `previous`
/// only past page one, `next` only when the lookahead saw more.
///
/// Links rewrite the request's query string in place: `page`/`offset` are
/// replaced, every other parameter (including reserved ones like `f`) rides
/// along verbatim.
pub fn page_links(spec: &PageSpec, has_more: bool, request: &RequestUri) -> Vec<Link> {
    let number = spec.page_number();
    let by_page = spec.page.is_some();
    let rewrite = |page: u64| {
        let mut pairs: Vec<(String, String)> = request
            .query_pairs()
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("page") && !k.eq_ignore_ascii_case("offset"))
            .cloned()
            .collect();
        if by_page {
            pairs.push(("page".into(), page.to_string()));
        } else {
            let offset = (page - 1) * spec.limit as u64;
            pairs.push(("offset".into(), offset.to_string()));
        }
        request.href_with_query(&pairs)
    };

    let mut links = Vec::new();
    if number > 1 {
        links.push(Link::new(rel::FIRST, rewrite(1)));
        links.push(Link::new(rel::PREVIOUS, rewrite(number - 1)));
    }
    if has_more {
        links.push(Link::new(rel::NEXT, rewrite(number + 1)));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::Variant;

    fn args(pairs: &[(&str, &str)]) -> ArgMap {
        let mut args = ArgMap::new();
        for (k, v) in pairs {
            args.merge(k, Variant::Text((*v).into()));
        }
        args
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let spec = PageSpec::from_args(
            &args(&[("page", "3"), ("offset", "99"), ("limit", "10")]),
            &RenderConfig::default(),
        );
        assert_eq!(spec.start(), 20);
        assert_eq!(spec.page_number(), 3);
    }

    #[test]
    fn test_limit_clamped_and_defaulted() {
        let config = RenderConfig::default();
        assert_eq!(PageSpec::from_args(&args(&[]), &config).limit, 20);
        assert_eq!(
            PageSpec::from_args(&args(&[("limit", "5000")]), &config).limit,
            1000
        );
        assert_eq!(
            PageSpec::from_args(&args(&[("limit", "bogus")]), &config).limit,
            20
        );
        assert_eq!(
            PageSpec::from_args(&args(&[("limit", "0")]), &config).limit,
            20
        );
    }

    #[test]
    fn test_window_fetches_one_extra_row() {
        let spec = PageSpec::from_args(
            &args(&[("offset", "10"), ("limit", "5")]),
            &RenderConfig::default(),
        );
        let window = spec.window();
        assert_eq!(window.offset, 10);
        assert_eq!(window.fetch_size, 6);
        assert_eq!(window.limit(), 5);
    }

    #[test]
    fn test_first_page_has_no_backward_links() {
        let spec = PageSpec::from_args(&args(&[("limit", "2")]), &RenderConfig::default());
        let request = RequestUri::parse("/orders?limit=2");
        let links = page_links(&spec, true, &request);
        assert_eq!(links.len(), 1);
        assert!(links[0].has_rel(rel::NEXT));
        assert_eq!(links[0].href, "/orders?limit=2&offset=2");
    }

    #[test]
    fn test_middle_page_links_by_page_number() {
        let spec = PageSpec::from_args(
            &args(&[("page", "2"), ("limit", "2")]),
            &RenderConfig::default(),
        );
        let request = RequestUri::parse("/orders?page=2&limit=2&f=json");
        let links = page_links(&spec, true, &request);
        let href = |r: &str| {
            links
                .iter()
                .find(|l| l.has_rel(r))
                .map(|l| l.href.clone())
                .unwrap()
        };
        // reserved parameters ride along; page is replaced
        assert_eq!(href(rel::FIRST), "/orders?limit=2&f=json&page=1");
        assert_eq!(href(rel::PREVIOUS), "/orders?limit=2&f=json&page=1");
        assert_eq!(href(rel::NEXT), "/orders?limit=2&f=json&page=3");
    }

    #[test]
    fn test_last_page_has_no_next() {
        let spec = PageSpec::from_args(
            &args(&[("page", "3"), ("limit", "2")]),
            &RenderConfig::default(),
        );
        let request = RequestUri::parse("/orders?page=3&limit=2");
        let links = page_links(&spec, false, &request);
        assert!(links.iter().all(|l| !l.has_rel(rel::NEXT)));
        assert!(links.iter().any(|l| l.has_rel(rel::FIRST)));
        assert!(links.iter().any(|l| l.has_rel(rel::PREVIOUS)));
    }
}
