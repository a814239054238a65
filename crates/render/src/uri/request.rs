//! The inbound request URI and relative-href resolution.

use folio_model::Entity;
use url::{Url, form_urlencoded};

use crate::config::RenderConfig;

/// The URI a render request arrived on, split for link rewriting.
///
/// Query parameters are kept as an ordered pair list so pagination links can
/// replace `page`/`offset` while preserving everything else, including
/// reserved parameters like `f`, `in`, and `out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri {
    origin: Option<String>,
    path: String,
    query: Vec<(String, String)>,
}

impl RequestUri {
    /// Parses an absolute (`https://host/path?q`) or server-relative
    /// (`/path?q`) request URI.
    pub fn parse(uri: &str) -> Self {
        if let Ok(url) = Url::parse(uri) {
            if url.has_host() {
                return Self {
                    origin: Some(url.origin().ascii_serialization()),
                    path: url.path().to_string(),
                    query: url
                        .query_pairs()
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect(),
                };
            }
        }
        let (path, query) = match uri.split_once('?') {
            Some((p, q)) => (p, q),
            None => (uri, ""),
        };
        Self {
            origin: None,
            path: path.to_string(),
            query: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query parameters, decoded, in arrival order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// The full request URI, re-serialized.
    pub fn full(&self) -> String {
        self.href_with_query(&self.query)
    }

    /// The request address with a replacement query string.
    pub fn href_with_query(&self, pairs: &[(String, String)]) -> String {
        let mut href = format!("{}{}", self.origin.as_deref().unwrap_or(""), self.path);
        if !pairs.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            href.push('?');
            href.push_str(&query);
        }
        href
    }

    /// Resolves a possibly-relative href against this request.
    ///
    /// | href form | resolves to |
    /// |-----------|-------------|
    /// | absolute  | unchanged |
    /// | `^/x` | origin + server root + `/x` |
    /// | `./x` | origin + current path + `/x` |
    /// | `/x` | origin + API root + `/x` |
    pub fn resolve(&self, href: &str, config: &RenderConfig) -> String {
        if href.contains("://") {
            return href.to_string();
        }
        let origin = self.origin.as_deref().unwrap_or("");
        if let Some(rest) = href.strip_prefix('^') {
            return format!("{origin}{}{rest}", config.server_root);
        }
        if let Some(rest) = href.strip_prefix('.') {
            let rest = if rest == "/" { "" } else { rest };
            let base = self.path.trim_end_matches('/');
            return format!("{origin}{base}{rest}");
        }
        if href.starts_with('/') {
            return format!("{origin}{}{href}", config.api_root);
        }
        href.to_string()
    }

    /// Resolves every href reachable from an entity: its links, its actions
    /// (and their field providers), and those of all nested entities.
    pub fn resolve_entity(&self, entity: &mut Entity, config: &RenderConfig) {
        for link in &mut entity.links {
            link.href = self.resolve(&link.href, config);
        }
        for action in &mut entity.actions {
            action.href = self.resolve(&action.href, config);
            for field in &mut action.fields {
                if let Some(provider) = &mut field.provider {
                    provider.href = self.resolve(&provider.href, config);
                }
            }
        }
        for child in &mut entity.entities {
            self.resolve_entity(child, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative() {
        let request = RequestUri::parse("/orders?limit=2&f=json");
        assert_eq!(request.path(), "/orders");
        assert_eq!(
            request.query_pairs(),
            &[
                ("limit".to_string(), "2".to_string()),
                ("f".to_string(), "json".to_string())
            ]
        );
        assert_eq!(request.full(), "/orders?limit=2&f=json");
    }

    #[test]
    fn test_parse_absolute_keeps_origin() {
        let request = RequestUri::parse("https://shop.example:8443/orders/7");
        assert_eq!(request.path(), "/orders/7");
        assert_eq!(request.full(), "https://shop.example:8443/orders/7");
    }

    #[test]
    fn test_resolution_conventions() {
        let request = RequestUri::parse("/app/orders");
        let config = RenderConfig {
            api_root: "/api".into(),
            server_root: "/srv".into(),
            ..RenderConfig::default()
        };
        assert_eq!(request.resolve("/customers", &config), "/api/customers");
        assert_eq!(request.resolve("^/login", &config), "/srv/login");
        assert_eq!(request.resolve("./7", &config), "/app/orders/7");
        assert_eq!(request.resolve(".", &config), "/app/orders");
        assert_eq!(
            request.resolve("https://other.example/x", &config),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_href_with_query_reencodes() {
        let request = RequestUri::parse("/orders");
        let href = request.href_with_query(&[("name".into(), "Ada%".into())]);
        assert_eq!(href, "/orders?name=Ada%25");
    }
}
