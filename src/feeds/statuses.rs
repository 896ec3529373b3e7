use super::{MemberProfile, PageResponse, StatusApi};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the status REST API.
pub struct StatusClient {
    base_url: String,
    client: reqwest::Client,
}

impl StatusClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("statusfeed/0.1 (+https://github.com/muk2/statusfeed)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("feed API error: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl StatusApi for StatusClient {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse> {
        let url = format!("{}{}", self.base_url, url);
        self.get_json(&url).await
    }

    async fn fetch_member(&self, id: u64) -> Result<MemberProfile> {
        let url = format!("{}/member/{}/", self.base_url, id);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = StatusClient::new("https://example.org/api/v1/");
        assert_eq!(client.base_url, "https://example.org/api/v1");
    }

    #[test]
    fn test_page_response_parses_tastypie_shape() {
        let body = r#"{
            "objects": [
                {"content": "first status", "member_name": "A", "link": "https://fb.example/1"},
                {"content": "second status"}
            ],
            "meta": {"limit": 5, "offset": 0, "next": "/api/v1/status/?limit=5&offset=5"}
        }"#;
        let page: PageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.objects.len(), 2);
        assert_eq!(page.objects[0].content, "first status");
        assert_eq!(page.objects[0].link(), Some("https://fb.example/1"));
        assert!(page.objects[1].link().is_none());
        assert_eq!(page.meta.offset, 0);
        assert!(page.meta.next.is_some());
    }

    #[test]
    fn test_page_response_missing_next_is_none() {
        let body = r#"{"objects": [], "meta": {"limit": 5, "offset": 10}}"#;
        let page: PageResponse = serde_json::from_str(body).unwrap();
        assert!(page.meta.next.is_none());
    }

    #[test]
    fn test_member_profile_optional_fields() {
        let profile: MemberProfile = serde_json::from_str(r#"{"id": 878}"#).unwrap();
        assert!(profile.main_feed.is_none());
        assert!(profile.name.is_none());

        let profile: MemberProfile =
            serde_json::from_str(r#"{"main_feed": 12, "name": "Some Member"}"#).unwrap();
        assert!(profile.main_feed.is_some());
        assert_eq!(profile.name.as_deref(), Some("Some Member"));
    }
}
