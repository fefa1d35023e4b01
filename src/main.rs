mod action;
mod api;
mod app;
mod catalog;
mod config;
mod error;
mod event;
mod format;
mod location;
mod pagination;
mod reporter;
mod sync;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::api::ApiClient;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::event::Event;
use crate::location::Location;
use crate::reporter::TracingReporter;
use crate::tui::EventHandler;

/// Browse a movie catalog from the terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Location to open, e.g. "/movies?page=3" or "/movies/318"
    location: Option<String>,

    /// Base URL of the movie API (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut config = Config::load(cli.config.as_deref());
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout.max(1);
    }

    let start = cli
        .location
        .as_deref()
        .map(Location::parse)
        .unwrap_or_else(|| config.start_location());

    tracing::info!(base_url = %config.api.base_url, %start, "starting");
    let client = ApiClient::new(&config.api)?;

    let result = run(Arc::new(client), start).await;

    tui::restore()?;

    result
}

/// Log to a file in the cache dir; stdout and stderr belong to the TUI.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_file = dirs::cache_dir()
        .map(|dir| dir.join("reel"))
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir.join("reel.log")))
        .and_then(|path| std::fs::File::create(path).ok());

    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(catalog: Arc<dyn Catalog>, start: Location) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(catalog, Arc::new(TracingReporter), start, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render | Event::Resize => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
