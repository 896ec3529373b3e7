pub mod gate;
pub mod loader;
pub mod statuses;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use loader::{FeedLoader, FeedRequest, PageCursor};

#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub widget_id: String,
    pub data: FeedData,
}

#[derive(Debug, Clone)]
pub enum FeedData {
    Statuses(StatusPage),
    Loading,
    Error(String),
}

/// One fetched page, already rendered, plus the cursor for the page after it.
#[derive(Debug, Clone)]
pub struct StatusPage {
    pub items: Vec<RenderedStatus>,
    pub cursor: PageCursor,
}

/// A status record after template rendering, ready for display.
#[derive(Debug, Clone)]
pub struct RenderedStatus {
    pub markup: String,
    pub link: Option<String>,
}

/// One status record as returned by the feed API.
///
/// Only `content` is interpreted here; everything else (member, party,
/// publish timestamp, permalink) rides along opaquely and is consumed by the
/// display template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StatusRecord {
    /// Permalink to the original status, if the provider supplied one.
    pub fn link(&self) -> Option<&str> {
        self.extra.get("link").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub next: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    pub objects: Vec<StatusRecord>,
    pub meta: PageMeta,
}

/// Member profile from the auxiliary lookup, used only by the visibility gate.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberProfile {
    #[serde(default)]
    pub main_feed: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Seam between the pagination logic and the HTTP transport.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Fetch one page of statuses. `url` is a path plus query string relative
    /// to the API base.
    async fn fetch_page(&self, url: &str) -> Result<PageResponse>;

    /// Auxiliary member-profile lookup for member-scoped feeds.
    async fn fetch_member(&self, id: u64) -> Result<MemberProfile>;
}
