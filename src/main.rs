mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use moodwheel::app::App;
use moodwheel::bridge::{self, ChannelHost, REQUEST_CAPACITY};
use moodwheel::config::AppConfig;
use moodwheel::controller::MoodController;
use moodwheel::events::AppEvent;
use moodwheel::{player, ui, MoodSet};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Log to a daily file; the terminal belongs to the UI.
fn init_logging(level: tracing::Level) -> Result<WorkerGuard> {
    let log_dir = AppConfig::get_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "moodwheel.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .with_ansi(false)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    if args.generate_config {
        println!("{}", AppConfig::default().to_toml()?);
        return Ok(());
    }

    let _log_guard = init_logging(args.log_level)?;

    let mut config = match args.config {
        Some(ref path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if args.compact {
        config.mood_set = MoodSet::Compact;
        config.moods.clear();
    }

    // Player bridge 🎛️
    let backend: Arc<dyn player::PlayerBackend> = Arc::from(player::get_backend());
    info!(backend = backend.name(), "starting moodwheel");

    let (req_tx, req_rx) = mpsc::channel(REQUEST_CAPACITY);
    let (inbound_tx, mut inbound_rx) = mpsc::channel(REQUEST_CAPACITY);
    tokio::spawn(bridge::run_bridge(
        backend,
        config.trusted_origin.clone(),
        req_rx,
        inbound_tx,
    ));

    let controller = MoodController::new(config.catalog(), ChannelHost::new(req_tx))
        .with_embed_size(config.embed.clone())
        .with_trusted_origin(config.trusted_origin.clone());
    let mut app = App::new(controller);

    if let Some(id) = args.mood.as_deref().or(config.initial_mood()) {
        if let Err(e) = app.controller.select_mood(id.into()) {
            warn!(error = %e, "initial mood rejected");
            app.show_toast(&format!("Error: {}", e));
        }
    }

    let (tx, mut rx) = mpsc::channel(100);

    // 1. Input Event Task
    let tx_input = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx_input.send(AppEvent::Input(event)).await.is_err() {
                break;
            }
        }
    });

    // 2. Embed Message Task
    let tx_embed = tx.clone();
    tokio::spawn(async move {
        while let Some(message) = inbound_rx.recv().await {
            if tx_embed.send(AppEvent::Embed(message)).await.is_err() {
                break;
            }
        }
    });

    // 3. Tick Task
    let tx_tick = tx;
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(250)).await;
            if tx_tick.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    while app.is_running {
        terminal.draw(|f| ui::ui(f, app))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        match event {
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                app.handle_key(key)
            }
            AppEvent::Input(_) => {}
            AppEvent::Embed(message) => app.on_embed_message(&message),
            AppEvent::Tick => app.on_tick(),
        }
    }
    info!("exiting");
    Ok(())
}
