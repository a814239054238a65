//! Pipeline configuration.

use tracing::warn;

/// Tunables for the render pipeline.
///
/// Hosts usually build one [`RenderConfig`] at startup, either programmatically
/// or from the `FOLIO_*` environment variables, and share it with every
/// pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Page size applied when the request names none.
    pub default_limit: usize,
    /// Hard ceiling on the requested page size.
    pub max_limit: usize,
    /// Prefix for `/x` hrefs (the API mount point), no trailing slash.
    pub api_root: String,
    /// Prefix for `^/x` hrefs (the server mount point), no trailing slash.
    pub server_root: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 1000,
            api_root: String::new(),
            server_root: String::new(),
        }
    }
}

impl RenderConfig {
    /// Builds a configuration from the environment, falling back to defaults
    /// member by member.
    ///
    /// Recognized variables: `FOLIO_DEFAULT_LIMIT`, `FOLIO_MAX_LIMIT`,
    /// `FOLIO_API_ROOT`, `FOLIO_SERVER_ROOT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = read_usize("FOLIO_DEFAULT_LIMIT") {
            config.default_limit = value;
        }
        if let Some(value) = read_usize("FOLIO_MAX_LIMIT") {
            config.max_limit = value;
        }
        if let Ok(value) = std::env::var("FOLIO_API_ROOT") {
            config.api_root = normalize_root(&value);
        }
        if let Ok(value) = std::env::var("FOLIO_SERVER_ROOT") {
            config.server_root = normalize_root(&value);
        }
        config
    }
}

fn read_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(variable = name, value = %raw, "ignoring non-positive or unparsable limit");
            None
        }
    }
}

/// Roots are stored without a trailing slash so href resolution can always
/// concatenate `root + "/rest"`.
fn normalize_root(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.max_limit, 1000);
        assert!(config.api_root.is_empty());
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("/api/"), "/api");
        assert_eq!(normalize_root("api"), "/api");
        assert_eq!(normalize_root(""), "");
        assert_eq!(normalize_root("/"), "");
    }
}
