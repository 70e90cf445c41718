mod api;
mod app;
mod async_loader;
mod config;
mod event;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io;

use app::App;
use event::{AppEvent, EventHandler};

/// Userpick - incrementally-loading user picker TUI
#[derive(Parser, Debug)]
#[command(name = "userpick")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Paginated users endpoint
    #[arg(default_value = api::DEFAULT_ENDPOINT)]
    endpoint: String,
}

fn main() -> Result<()> {
    // Initialize logging to file (avoids corrupting TUI output on stderr)
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/userpick.log")
        .expect("Failed to open log file");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let args = Args::parse();

    let mut app = App::new(&args.endpoint)?;

    // Initialize terminal. Mouse capture stays on for the whole run: the
    // global pointer stream is what outside-dismissal listens to.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(app.config.timing.tick_rate);

    // Main loop
    let result = run_app(&mut terminal, &mut app, &events);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    while app.running {
        // Draw
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Handle events
        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
            AppEvent::Tick => app.handle_tick(),
        }
    }

    Ok(())
}
