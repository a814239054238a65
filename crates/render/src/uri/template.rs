//! Route templates: matching inbound paths and expanding outbound hrefs.

use folio_model::Variant;
use regex::Regex;

use crate::error::RenderError;
use crate::paper::FieldAccess;
use crate::uri::argmap::ArgMap;

/// A compiled route template such as `/orders/{id}` or
/// `/customers/{customer.id}/orders`.
///
/// Placeholders match one path segment each. A placeholder name may carry the
/// same suffixes an [`ArgMap`] key does (`tags[]`, `price.min`, dotted
/// paths), so captured values classify like query parameters.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    names: Vec<String>,
    regex: Regex,
}

impl UriTemplate {
    /// Compiles a template. Templates must start with `/`, must not end with
    /// `/` (the root template `/` excepted), and must balance their braces.
    pub fn compile(template: &str) -> Result<Self, RenderError> {
        let invalid = |reason: &str| RenderError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };
        if !template.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if template.len() > 1 && template.ends_with('/') {
            return Err(invalid("must not end with '/'"));
        }

        let mut pattern = String::from("^");
        let mut names = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            pattern.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unbalanced '{'"))?;
            let name = &after[..close];
            if name.is_empty() {
                return Err(invalid("empty placeholder"));
            }
            names.push(name.to_string());
            pattern.push_str("([^/]+)");
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid("unbalanced '}'"));
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push_str("/?$");

        let regex = Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            template: template.to_string(),
            names,
            regex,
        })
    }

    /// The template text as compiled.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in appearance order, suffixes included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Matches a request path, returning the captured raw values per
    /// placeholder. A single trailing slash on the path is tolerated.
    pub fn matches(&self, path: &str) -> Option<Vec<(&str, String)>> {
        let captures = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), captures[i + 1].to_string()))
                .collect(),
        )
    }

    /// Extracts every argument a full request URI carries: path captures
    /// first, then non-empty query parameters. Returns `None` when the path
    /// does not match.
    pub fn bind_uri(&self, uri: &str) -> Option<ArgMap> {
        let (path, query) = match uri.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (uri, None),
        };
        let captures = self.matches(path)?;
        let mut args = ArgMap::new();
        for (name, raw) in captures {
            args.merge(name, Variant::Text(raw));
        }
        if let Some(query) = query {
            args.parse_query(query);
        }
        Some(args)
    }

    /// Expands the template into a concrete URI by substituting every
    /// placeholder from the argument map.
    pub fn create_uri(&self, args: &ArgMap) -> Result<String, RenderError> {
        let mut uri = String::new();
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            uri.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            // compile() verified brace balance
            let close = after.find('}').unwrap_or(after.len());
            let name = &after[..close];
            let value = placeholder_value(args, name).ok_or_else(|| {
                RenderError::UnresolvedPlaceholder {
                    template: self.template.clone(),
                    placeholder: name.to_string(),
                }
            })?;
            uri.push_str(&value);
            rest = &after[close + 1..];
        }
        uri.push_str(rest);
        Ok(uri)
    }

    /// Fills unbound placeholders from same-named readable fields of a
    /// domain object. Already-bound placeholders keep their values.
    pub fn set_args_from_graph(&self, fields: &dyn FieldAccess, args: &mut ArgMap) {
        for name in &self.names {
            if placeholder_value(args, name).is_some() {
                continue;
            }
            let base = base_name(name);
            if let Some(value) = fields.get_field(base) {
                if !value.is_null() {
                    args.set(base, value);
                }
            }
        }
    }
}

/// Resolves a placeholder name against the argument map, rendering the value
/// as URI text. List placeholders join their elements with commas.
fn placeholder_value(args: &ArgMap, name: &str) -> Option<String> {
    let path = name.strip_suffix("[]").unwrap_or(name);
    let value = args.get_path(path)?;
    if value.is_null() {
        return None;
    }
    match value {
        Variant::List(items) => Some(
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// The top-level field a placeholder binds to: `tags[]` binds `tags`,
/// `customer.id` binds `customer`.
pub(crate) fn base_name(name: &str) -> &str {
    let head = name.split('.').next().unwrap_or(name);
    head.strip_suffix("[]").unwrap_or(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template_matches_exactly() {
        let t = UriTemplate::compile("/orders").unwrap();
        assert!(t.matches("/orders").is_some());
        assert!(t.matches("/orders/").is_some());
        assert!(t.matches("/orders/7").is_none());
        assert!(t.matches("/customers").is_none());
    }

    #[test]
    fn test_placeholder_captures_one_segment() {
        let t = UriTemplate::compile("/orders/{id}").unwrap();
        let caps = t.matches("/orders/7").unwrap();
        assert_eq!(caps, vec![("id", "7".to_string())]);
        assert!(t.matches("/orders/7/lines").is_none());
    }

    #[test]
    fn test_invalid_templates_rejected() {
        assert!(UriTemplate::compile("orders").is_err());
        assert!(UriTemplate::compile("/orders/").is_err());
        assert!(UriTemplate::compile("/orders/{id").is_err());
        assert!(UriTemplate::compile("/orders/{}").is_err());
    }

    #[test]
    fn test_bind_uri_merges_path_and_query() {
        let t = UriTemplate::compile("/orders/{id}").unwrap();
        let args = t.bind_uri("/orders/7?limit=2&name=").unwrap();
        assert_eq!(args.get("id"), Some(&Variant::Text("7".into())));
        assert_eq!(args.get("limit"), Some(&Variant::Text("2".into())));
        assert!(args.get("name").is_none());
    }

    #[test]
    fn test_suffixed_placeholder_classifies() {
        let t = UriTemplate::compile("/report/{range.min}/{range.max}").unwrap();
        let args = t.bind_uri("/report/5/10").unwrap();
        assert_eq!(args.get_path("range.min"), Some(&Variant::Text("5".into())));
        assert_eq!(args.get_path("range.max"), Some(&Variant::Text("10".into())));
    }

    #[test]
    fn test_create_uri_substitutes_bound_values() {
        let t = UriTemplate::compile("/orders/{id}").unwrap();
        let mut args = ArgMap::new();
        args.set("id", Variant::Int(7));
        assert_eq!(t.create_uri(&args).unwrap(), "/orders/7");
    }

    #[test]
    fn test_bind_then_create_reproduces_path() {
        for (template, path) in [
            ("/orders/{id}", "/orders/7"),
            ("/report/{range.min}/{range.max}", "/report/5/10"),
            ("/customers/{customer.id}/orders/{id}", "/customers/42/orders/7"),
        ] {
            let t = UriTemplate::compile(template).unwrap();
            let args = t.bind_uri(path).unwrap();
            assert_eq!(t.create_uri(&args).unwrap(), path);
        }

        // a trailing slash on the input normalizes away
        let t = UriTemplate::compile("/orders/{id}").unwrap();
        let args = t.bind_uri("/orders/7/").unwrap();
        assert_eq!(t.create_uri(&args).unwrap(), "/orders/7");
    }

    #[test]
    fn test_create_uri_errors_on_unbound_placeholder() {
        let t = UriTemplate::compile("/orders/{id}").unwrap();
        let err = t.create_uri(&ArgMap::new()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "id"
        ));
    }

    #[test]
    fn test_set_args_from_graph_fills_unbound_placeholders() {
        use crate::paper::FieldAccess;

        struct Order;
        impl FieldAccess for Order {
            fn field_names(&self) -> Vec<String> {
                vec!["id".into()]
            }
            fn get_field(&self, name: &str) -> Option<Variant> {
                name.eq_ignore_ascii_case("id").then(|| Variant::Int(7))
            }
            fn set_field(&mut self, _name: &str, _value: Variant) -> bool {
                false
            }
        }

        let t = UriTemplate::compile("/orders/{id}").unwrap();
        let mut args = ArgMap::new();
        t.set_args_from_graph(&Order, &mut args);
        assert_eq!(t.create_uri(&args).unwrap(), "/orders/7");

        // an already-bound placeholder keeps its value
        let mut args = ArgMap::new();
        args.set("id", Variant::Int(9));
        t.set_args_from_graph(&Order, &mut args);
        assert_eq!(t.create_uri(&args).unwrap(), "/orders/9");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("id"), "id");
        assert_eq!(base_name("tags[]"), "tags");
        assert_eq!(base_name("price.min"), "price");
        assert_eq!(base_name("customer.id"), "customer");
    }
}
