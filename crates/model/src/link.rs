//! Navigation links.

/// A navigation link from one resource to another.
///
/// Hrefs may be absolute, or relative in one of three conventions resolved
/// against the current request at render time:
///
/// | form | resolved against |
/// |------|------------------|
/// | `/x` | the API root |
/// | `^/x` | the server root |
/// | `./x` | the current resource |
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    /// Class tags.
    pub classes: Vec<String>,
    /// The roles this link plays (at least one).
    pub rels: Vec<String>,
    /// Human-readable label.
    pub title: Option<String>,
    /// Target address.
    pub href: String,
    /// Target media type.
    pub media_type: Option<String>,
}

impl Link {
    /// Creates a link with one rel and an href.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rels: vec![rel.into()],
            href: href.into(),
            ..Default::default()
        }
    }

    /// Adds a class tag.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Adds a rel.
    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rels.push(rel.into());
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// True when this link plays the given role.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let link = Link::new("self", "/orders/1")
            .with_class("order")
            .with_title("Order 1");
        assert!(link.has_rel("SELF"));
        assert_eq!(link.href, "/orders/1");
        assert_eq!(link.classes, vec!["order"]);
    }
}
