use crate::config::Messages;
use crate::feeds::{FeedData, PageCursor, RenderedStatus};
use crate::ui::widgets::SelectedItem;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Scrollable list of fetched statuses with a load-more footer.
///
/// The widget owns the pagination cursor and the in-flight guard: the event
/// loop asks it for the next cursor via [`begin_load`](Self::begin_load) and
/// feeds the result back through [`update_data`](Self::update_data). Rows are
/// only ever appended; a failed page leaves the cursor where it was so the
/// next trigger retries the same page.
pub struct StatusFeedWidget {
    title: String,
    messages: Messages,
    rows: Vec<Row>,
    cursor: PageCursor,
    loading: bool,
    visible: bool,
    scroll_state: ListState,
    selected: bool,
}

#[derive(Debug, Clone)]
enum Row {
    Status(RenderedStatus),
    Notice(String),
}

impl StatusFeedWidget {
    pub fn new(title: String, messages: Messages) -> Self {
        let mut scroll_state = ListState::default();
        scroll_state.select(Some(0));

        Self {
            title,
            messages,
            rows: Vec::new(),
            cursor: PageCursor::start(),
            loading: false,
            visible: false,
            scroll_state,
            selected: false,
        }
    }

    pub fn id(&self) -> String {
        format!("statuses-{}", self.title)
    }

    /// Applied from the visibility gate before the first load.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the load-more trigger should still be offered.
    pub fn can_load_more(&self) -> bool {
        self.visible && !self.cursor.is_exhausted()
    }

    /// Arm a fetch: returns the cursor to load and raises the loading flag.
    ///
    /// Returns `None` while a fetch is already in flight, when the feed is
    /// hidden, or when the server reported no further page, so repeated
    /// triggers can never issue overlapping requests.
    pub fn begin_load(&mut self) -> Option<PageCursor> {
        if !self.visible || self.loading || self.cursor.is_exhausted() {
            return None;
        }
        self.loading = true;
        Some(self.cursor)
    }

    pub fn update_data(&mut self, data: FeedData) {
        match data {
            FeedData::Statuses(page) => {
                self.loading = false;
                if page.items.is_empty() {
                    self.rows.push(Row::Notice(self.messages.no_results.clone()));
                } else {
                    self.rows.extend(page.items.into_iter().map(Row::Status));
                }
                self.cursor = page.cursor;
            }
            FeedData::Error(_) => {
                self.loading = false;
                self.rows.push(Row::Notice(self.messages.load_failed.clone()));
            }
            FeedData::Loading => {
                self.loading = true;
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let border_style = if self.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        let footer = if self.loading {
            " loading... "
        } else if self.can_load_more() {
            " n: load more "
        } else {
            " end of feed "
        };

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_bottom(Line::from(footer).right_aligned())
            .borders(Borders::ALL)
            .border_style(border_style);

        if self.loading && self.rows.is_empty() {
            let loading_text = List::new(vec![ListItem::new("Loading statuses...")]).block(block);
            frame.render_widget(loading_text, area);
            return;
        }

        let width = area.width.saturating_sub(4).max(16) as usize;
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row {
                Row::Status(status) => status_item(i, status, width),
                Row::Notice(text) => {
                    ListItem::new(Line::from(Span::styled(
                        text.as_str(),
                        Style::default().fg(Color::Yellow),
                    )))
                }
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = self.scroll_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }

    pub fn scroll_up(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected > 0 {
                self.scroll_state.select(Some(selected - 1));
            }
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected < self.rows.len().saturating_sub(1) {
                self.scroll_state.select(Some(selected + 1));
            }
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn get_selected_item(&self) -> Option<SelectedItem> {
        let idx = self.scroll_state.selected()?;
        match self.rows.get(idx)? {
            Row::Status(status) => Some(SelectedItem {
                text: status.markup.clone(),
                url: status.link.clone(),
            }),
            Row::Notice(_) => None,
        }
    }
}

fn status_item(index: usize, status: &RenderedStatus, width: usize) -> ListItem<'static> {
    let mut lines: Vec<Line> = Vec::new();

    for (line_no, raw) in status.markup.lines().enumerate() {
        // First line is content, anything after it is metadata.
        let style = if line_no == 0 {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        for (wrap_no, wrapped) in textwrap::wrap(raw, width).into_iter().enumerate() {
            let prefix = if line_no == 0 && wrap_no == 0 {
                Span::styled(
                    format!("{}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::raw("   ")
            };
            lines.push(Line::from(vec![
                prefix,
                Span::styled(wrapped.into_owned(), style),
            ]));
        }
    }

    ListItem::new(lines)
}
