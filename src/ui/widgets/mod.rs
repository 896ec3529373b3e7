pub mod statuses;

pub use statuses::StatusFeedWidget;

/// The item currently under the cursor, for actions outside the widget
/// (opening the permalink in a browser).
#[derive(Debug, Clone)]
pub struct SelectedItem {
    pub text: String,
    pub url: Option<String>,
}
