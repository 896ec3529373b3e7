use super::StatusApi;
use tracing::{info, warn};

/// What entity the feed is scoped to.
#[derive(Debug, Clone)]
pub enum FeedScope {
    /// Unscoped feed (a party, a tag, the whole site). Always shown.
    General,
    /// Feed of one member. Shown only after the member's profile confirms a
    /// configured feed and a matching identity.
    Member { id: u64, expected_name: String },
}

/// Decide whether the feed section should be shown at all.
///
/// A member-scoped feed performs one profile lookup: the section stays
/// hidden when the profile has no `main_feed`, when its name does not match
/// the name we expect for that id, or when the lookup itself fails. Any other
/// scope is visible without a lookup.
pub async fn resolve_visibility<A: StatusApi>(api: &A, scope: &FeedScope) -> bool {
    let (id, expected_name) = match scope {
        FeedScope::General => return true,
        FeedScope::Member { id, expected_name } => (*id, expected_name),
    };

    let profile = match api.fetch_member(id).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(id, error = %e, "member lookup failed, hiding feed");
            return false;
        }
    };

    if profile.main_feed.is_none() {
        info!(id, "member has no configured feed");
        return false;
    }

    if profile.name.as_deref() != Some(expected_name.as_str()) {
        warn!(id, "member identity mismatch, hiding feed");
        return false;
    }

    true
}
