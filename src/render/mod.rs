//! Status rendering.
//!
//! Each fetched record is passed through a named tera template embedded in
//! the binary with `include_str!`, compiled once when the renderer is built.
//! The template sees the whole record, so provider-specific fields (member,
//! party, publish timestamp) are a template concern, not a loader concern.

use crate::feeds::StatusRecord;
use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Identifier the status template is registered under.
pub const STATUS_TEMPLATE: &str = "status.txt";

pub struct StatusRenderer {
    engine: Tera,
}

impl StatusRenderer {
    pub fn new() -> Result<Self> {
        let mut engine = Tera::default();
        engine.register_filter("pubdate", pubdate);
        engine.add_raw_template(STATUS_TEMPLATE, include_str!("templates/status.txt"))?;
        Ok(Self { engine })
    }

    /// Render one record to display markup.
    pub fn render_status(&self, record: &StatusRecord) -> Result<String> {
        let context = Context::from_serialize(record)?;
        Ok(self.engine.render(STATUS_TEMPLATE, &context)?)
    }
}

/// Prettify a publish timestamp. Falls back to the raw value when it is not
/// a timestamp we recognize.
fn pubdate(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let Some(raw) = value.as_str() else {
        return Ok(value.clone());
    };

    let formatted = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        })
        .unwrap_or_else(|_| raw.to_string());

    Ok(Value::String(formatted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> StatusRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_render_content_only() {
        let renderer = StatusRenderer::new().unwrap();
        let markup = renderer
            .render_status(&record(r#"{"content": "hello from the plenum"}"#))
            .unwrap();
        assert!(markup.contains("hello from the plenum"));
        assert!(!markup.contains("|"));
    }

    #[test]
    fn test_render_full_record() {
        let renderer = StatusRenderer::new().unwrap();
        let markup = renderer
            .render_status(&record(
                r#"{
                    "content": "budget vote today",
                    "member_name": "Some Member",
                    "party_name": "Party X",
                    "published": "2014-03-02T09:15:00+02:00"
                }"#,
            ))
            .unwrap();
        assert!(markup.contains("budget vote today"));
        assert!(markup.contains("Some Member (Party X)"));
        assert!(markup.contains("2014-03-02 09:15"));
    }

    #[test]
    fn test_render_published_without_member() {
        let renderer = StatusRenderer::new().unwrap();
        let markup = renderer
            .render_status(&record(
                r#"{"content": "c", "published": "2014-03-02T09:15:00"}"#,
            ))
            .unwrap();
        assert!(markup.contains("2014-03-02 09:15"));
    }

    #[test]
    fn test_pubdate_falls_back_to_raw_value() {
        let renderer = StatusRenderer::new().unwrap();
        let markup = renderer
            .render_status(&record(
                r#"{"content": "c", "member_name": "M", "published": "yesterday"}"#,
            ))
            .unwrap();
        assert!(markup.contains("yesterday"));
    }
}
