use super::{FeedData, RenderedStatus, StatusApi, StatusPage};
use crate::query::update_query_string;
use crate::render::StatusRenderer;
use tracing::{debug, warn};

/// Position of the next page to fetch.
///
/// The cursor is an explicit value handed to `load_next_page` and reassigned
/// by the caller from the returned page, so it always reflects the last page
/// that was actually fetched. A failed fetch returns no new cursor and the
/// caller keeps the old one, which makes a repeated trigger retry the same
/// page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    Offset(u64),
    /// The server reported no further page (`meta.next` absent).
    Exhausted,
}

impl PageCursor {
    pub fn start() -> Self {
        PageCursor::Offset(0)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, PageCursor::Exhausted)
    }
}

/// Fixed request parameters for one feed.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    /// Resource path relative to the API base, e.g. `/kikar/get-statuses/`.
    pub resource_path: String,
    /// Opaque filter expression, passed through to the server unmodified.
    pub filter: Option<String>,
    /// Page size.
    pub limit: u64,
    /// Sort key, e.g. `-published` for newest first.
    pub order_by: String,
}

impl FeedRequest {
    /// Build the page URL for `offset`. Parameter order is fixed so that the
    /// same request always yields the same URL.
    pub fn page_url(&self, offset: u64) -> String {
        let mut url = format!("{}/", self.resource_path.trim_end_matches('/'));
        url = update_query_string(&url, "filter", self.filter.as_deref());
        url = update_query_string(&url, "limit", Some(&self.limit.to_string()));
        url = update_query_string(&url, "offset", Some(&offset.to_string()));
        url = update_query_string(&url, "order_by", Some(&self.order_by));
        url
    }
}

/// Fetches pages of statuses and renders them for display.
pub struct FeedLoader<A> {
    api: A,
    renderer: StatusRenderer,
    request: FeedRequest,
}

impl<A: StatusApi> FeedLoader<A> {
    pub fn new(api: A, renderer: StatusRenderer, request: FeedRequest) -> Self {
        Self {
            api,
            renderer,
            request,
        }
    }

    /// Fetch the page at `cursor` and render its records in server order.
    ///
    /// On success the returned page carries the cursor for the page after it:
    /// `meta.offset + meta.limit` from the response, or `Exhausted` when the
    /// response reports no next page. On failure the error is folded into
    /// `FeedData::Error` and the caller's cursor stays valid for a retry.
    pub async fn load_next_page(&self, cursor: PageCursor) -> FeedData {
        let offset = match cursor {
            PageCursor::Offset(offset) => offset,
            PageCursor::Exhausted => {
                return FeedData::Statuses(StatusPage {
                    items: Vec::new(),
                    cursor,
                })
            }
        };

        let url = self.request.page_url(offset);
        debug!(%url, "loading status page");

        let page = match self.api.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%url, error = %e, "status page fetch failed");
                return FeedData::Error(e.to_string());
            }
        };

        let cursor = if page.meta.next.is_some() {
            PageCursor::Offset(page.meta.offset + page.meta.limit)
        } else {
            PageCursor::Exhausted
        };

        let mut items = Vec::with_capacity(page.objects.len());
        for record in &page.objects {
            match self.renderer.render_status(record) {
                Ok(markup) => items.push(RenderedStatus {
                    markup,
                    link: record.link().map(str::to_string),
                }),
                Err(e) => {
                    warn!(error = %e, "status rendering failed");
                    return FeedData::Error(e.to_string());
                }
            }
        }

        FeedData::Statuses(StatusPage { items, cursor })
    }
}
