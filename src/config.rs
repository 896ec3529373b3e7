use crate::feeds::gate::FeedScope;
use crate::feeds::FeedRequest;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub messages: Messages,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the status API, without a trailing slash.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    /// Resource path of the status list endpoint, relative to the base URL.
    pub resource_path: String,
    /// Opaque filter expression forwarded to the server unmodified,
    /// e.g. `feed__persona__object_id=878`.
    pub filter: Option<String>,
    /// Statuses per page.
    pub limit: u64,
    pub order_by: String,
    /// Member scoping: when both are set, the feed is only shown after the
    /// member's profile confirms a configured feed under this id and name.
    pub member_id: Option<u64>,
    pub member_name: Option<String>,
}

/// User-facing notice texts, overridable for localization.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub no_results: String,
    pub load_failed: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.kikar.org".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Status Updates".to_string(),
            resource_path: "/api/v1/facebook_status/".to_string(),
            filter: None,
            limit: 5,
            order_by: "-published".to_string(),
            member_id: None,
            member_name: None,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_results: "No statuses found.".to_string(),
            load_failed: "Our sincere apologies, something went wrong loading statuses.".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default config location, or fall back
    /// to built-in defaults when no config file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("statusfeed").join("config.toml"))
    }

    pub fn request(&self) -> FeedRequest {
        FeedRequest {
            resource_path: self.feed.resource_path.clone(),
            filter: self.feed.filter.clone(),
            limit: self.feed.limit,
            order_by: self.feed.order_by.clone(),
        }
    }

    pub fn scope(&self) -> FeedScope {
        match (self.feed.member_id, self.feed.member_name.as_ref()) {
            (Some(id), Some(name)) => FeedScope::Member {
                id,
                expected_name: name.clone(),
            },
            _ => FeedScope::General,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.feed.limit, 5);
        assert_eq!(config.feed.order_by, "-published");
        assert!(config.feed.filter.is_none());
        assert!(matches!(config.scope(), FeedScope::General));
        assert_eq!(config.messages.no_results, "No statuses found.");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[api]
base_url = "http://localhost:8000"

[feed]
filter = "feed__persona__object_id=878"
limit = 14
member_id = 878
member_name = "Some Member"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.feed.limit, 14);
        assert_eq!(
            config.feed.filter.as_deref(),
            Some("feed__persona__object_id=878")
        );
        // Unset sections keep their defaults.
        assert_eq!(config.feed.order_by, "-published");
        assert!(config.messages.load_failed.contains("apologies"));
    }

    #[test]
    fn test_member_scope_requires_both_fields() {
        let mut config = Config::default();
        config.feed.member_id = Some(878);
        assert!(matches!(config.scope(), FeedScope::General));

        config.feed.member_name = Some("Some Member".to_string());
        assert!(matches!(config.scope(), FeedScope::Member { id: 878, .. }));
    }

    #[test]
    fn test_load_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_request_mirrors_feed_config() {
        let mut config = Config::default();
        config.feed.filter = Some("party:X".to_string());
        let request = config.request();
        assert_eq!(request.resource_path, "/api/v1/facebook_status/");
        assert_eq!(request.filter.as_deref(), Some("party:X"));
        assert_eq!(request.limit, 5);
    }
}
