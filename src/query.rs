//! Query-string editing for request URLs.
//!
//! The feed API is driven entirely by query parameters (`filter`, `limit`,
//! `offset`, `order_by`), so page URLs are built by repeatedly updating one
//! parameter at a time on top of the previous request URL.

/// Set, replace or remove a single query parameter on `url`.
///
/// `Some(value)` sets the parameter, replacing it in place if it already
/// exists (never duplicating the key). `None` removes the parameter entirely.
/// A `#fragment` is preserved unchanged in both cases. Values are passed
/// through unmodified; callers own any encoding. The operation is idempotent.
///
/// Works on relative URLs such as `/api/v1/facebook_status/`.
pub fn update_query_string(url: &str, key: &str, value: Option<&str>) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, frag)) => (base, Some(frag)),
        None => (url, None),
    };

    let (path, query) = match base.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (base, None),
    };

    // Raw pairs, in order. A bare `flag` entry has no value at all, which is
    // distinct from `flag=`.
    let mut pairs: Vec<(String, Option<String>)> = query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (k.to_string(), Some(v.to_string())),
            None => (part.to_string(), None),
        })
        .collect();

    match value {
        Some(value) => {
            let mut seen = false;
            pairs.retain_mut(|(k, v)| {
                if k != key {
                    return true;
                }
                if seen {
                    // Collapse pre-existing duplicates into the first slot.
                    return false;
                }
                seen = true;
                *v = Some(value.to_string());
                true
            });
            if !seen {
                pairs.push((key.to_string(), Some(value.to_string())));
            }
        }
        None => pairs.retain(|(k, _)| k != key),
    }

    let mut out = path.to_string();
    if !pairs.is_empty() {
        out.push('?');
        let encoded: Vec<String> = pairs
            .into_iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{}={}", k, v),
                None => k,
            })
            .collect();
        out.push_str(&encoded.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_to_bare_url() {
        assert_eq!(
            update_query_string("/api/v1/status/", "limit", Some("5")),
            "/api/v1/status/?limit=5"
        );
    }

    #[test]
    fn test_append_to_existing_query() {
        assert_eq!(
            update_query_string("/api/v1/status/?limit=5", "offset", Some("10")),
            "/api/v1/status/?limit=5&offset=10"
        );
    }

    #[test]
    fn test_replace_in_place() {
        assert_eq!(
            update_query_string("/s/?limit=5&offset=0&order_by=-published", "offset", Some("5")),
            "/s/?limit=5&offset=5&order_by=-published"
        );
    }

    #[test]
    fn test_no_duplicate_key() {
        let url = update_query_string("/s/?offset=0", "offset", Some("5"));
        assert_eq!(url.matches("offset").count(), 1);
        assert_eq!(url, "/s/?offset=5");
    }

    #[test]
    fn test_collapses_preexisting_duplicates() {
        assert_eq!(
            update_query_string("/s/?a=1&offset=0&offset=2&b=3", "offset", Some("9")),
            "/s/?a=1&offset=9&b=3"
        );
    }

    #[test]
    fn test_remove_key() {
        assert_eq!(
            update_query_string("/s/?limit=5&offset=0", "offset", None),
            "/s/?limit=5"
        );
    }

    #[test]
    fn test_remove_last_key_drops_question_mark() {
        assert_eq!(update_query_string("/s/?offset=0", "offset", None), "/s/");
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        assert_eq!(
            update_query_string("/s/?limit=5", "offset", None),
            "/s/?limit=5"
        );
    }

    #[test]
    fn test_fragment_preserved_on_set() {
        assert_eq!(
            update_query_string("/s/?limit=5#latest", "offset", Some("10")),
            "/s/?limit=5&offset=10#latest"
        );
    }

    #[test]
    fn test_fragment_preserved_on_remove() {
        assert_eq!(
            update_query_string("/s/?limit=5&offset=0#latest", "offset", None),
            "/s/?limit=5#latest"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = update_query_string("/s/?a=1#top", "offset", Some("10"));
        let twice = update_query_string(&once, "offset", Some("10"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_value_passed_through_unmodified() {
        assert_eq!(
            update_query_string("/s/", "filter", Some("party:X")),
            "/s/?filter=party:X"
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            update_query_string("https://example.org/feed?limit=5", "offset", Some("15")),
            "https://example.org/feed?limit=5&offset=15"
        );
    }
}
