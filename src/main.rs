use anyhow::Result;
use clap::Parser;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use statusfeed::config::Config;
use statusfeed::feeds::gate::resolve_visibility;
use statusfeed::feeds::statuses::StatusClient;
use statusfeed::feeds::{FeedLoader, FeedMessage, PageCursor};
use statusfeed::render::StatusRenderer;
use statusfeed::ui::widgets::StatusFeedWidget;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "statusfeed", about = "Terminal viewer for paginated status feeds")]
struct Args {
    /// Path to a config file (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured filter expression, passed to the server as-is.
    #[arg(short, long)]
    filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(filter) = args.filter {
        config.feed.filter = Some(filter);
    }

    let client = StatusClient::new(&config.api.base_url);
    let visible = resolve_visibility(&client, &config.scope()).await;

    let mut widget = StatusFeedWidget::new(config.feed.title.clone(), config.messages.clone());
    widget.set_visible(visible);
    widget.set_selected(true);

    let loader = Arc::new(FeedLoader::new(
        client,
        StatusRenderer::new()?,
        config.request(),
    ));

    let (tx, mut rx) = mpsc::unbounded_channel();

    // First page loads automatically when the feed is visible; later pages
    // only on the load-more trigger.
    if let Some(cursor) = widget.begin_load() {
        spawn_load(loader.clone(), widget.id(), cursor, tx.clone());
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut widget, loader, tx, &mut rx).await;
    ratatui::restore();
    result
}

async fn run(
    terminal: &mut DefaultTerminal,
    widget: &mut StatusFeedWidget,
    loader: Arc<FeedLoader<StatusClient>>,
    tx: mpsc::UnboundedSender<FeedMessage>,
    rx: &mut mpsc::UnboundedReceiver<FeedMessage>,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| draw(frame, widget))?;

        tokio::select! {
            Some(message) = rx.recv() => {
                if message.widget_id == widget.id() {
                    widget.update_data(message.data);
                }
            }
            maybe_event = events.next() => {
                let Some(event) = maybe_event else { break };
                if let Event::Key(key) = event? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('j') | KeyCode::Down => widget.scroll_down(),
                        KeyCode::Char('k') | KeyCode::Up => widget.scroll_up(),
                        KeyCode::Char('n') | KeyCode::Enter => {
                            if let Some(cursor) = widget.begin_load() {
                                spawn_load(loader.clone(), widget.id(), cursor, tx.clone());
                            }
                        }
                        KeyCode::Char('o') => open_selected(widget),
                        _ => {}
                    }
                }
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, widget: &StatusFeedWidget) {
    if widget.is_visible() {
        widget.render(frame, frame.area());
    } else {
        let notice = Paragraph::new("No feed available.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(notice, frame.area());
    }
}

fn spawn_load(
    loader: Arc<FeedLoader<StatusClient>>,
    widget_id: String,
    cursor: PageCursor,
    tx: mpsc::UnboundedSender<FeedMessage>,
) {
    tokio::spawn(async move {
        let data = loader.load_next_page(cursor).await;
        let _ = tx.send(FeedMessage { widget_id, data });
    });
}

fn open_selected(widget: &StatusFeedWidget) {
    let Some(item) = widget.get_selected_item() else {
        return;
    };
    let Some(url) = item.url else {
        return;
    };
    if let Err(e) = open::that(&url) {
        warn!(%url, error = %e, "failed to open permalink");
    }
}
