use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod config;
mod handler;
mod history;
mod tui;
mod ui;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

/// Diagnostics go to a file under the config directory; the terminal itself
/// belongs to the TUI. Logging is best-effort: if the file cannot be created
/// the app runs without it.
fn init_logging() {
    let Some(dir) = dirs::config_dir().map(|d| d.join("campus-chat")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("campus-chat.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
