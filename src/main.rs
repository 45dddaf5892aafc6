use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use smolchat::api::OllamaClient;
use smolchat::app::App;
use smolchat::chat_view;
use smolchat::config;
use smolchat::controller::ChatController;
use smolchat::conversation::ConversationStore;
use smolchat::key_handlers;
use smolchat::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = config::load()?;
    let _logger = logging::init(&config.log_level)?;
    info!("starting against {} with model {}", config.base_url, config.model);

    let client = Arc::new(OllamaClient::new(&config.base_url, &config.model));
    let store = Arc::new(ConversationStore::new());
    let controller = Arc::new(ChatController::new(
        client,
        store,
        chat_view::terminal_layout(config.wrap_cols),
    ));
    let mut app = App::new(controller);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

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

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<CEvent>(100);

    // Crossterm polling blocks, so input reading lives on its own task.
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    if tx.send(ev).await.is_err() {
                        return;
                    }
                }
            } else if tx.is_closed() {
                return;
            }
        }
    });

    let mut tick = tokio::time::interval(Duration::from_millis(100));

    loop {
        if app.controller.is_waiting() {
            app.status_indicator.set_thinking(true);
            app.status_indicator
                .set_status(format!("Waiting for {}...", app.controller.model()));
        } else {
            app.status_indicator.set_thinking(false);
            app.status_indicator.clear_status();
        }

        terminal.draw(|f| chat_view::draw(f, app))?;

        tokio::select! {
            Some(ev) = rx.recv() => match ev {
                CEvent::Key(key) => key_handlers::handle_key(key, app),
                CEvent::Mouse(mouse) => key_handlers::handle_mouse(mouse, app),
                _ => {}
            },
            _ = tick.tick() => {
                app.status_indicator.update_spinner();
            }
        }

        if app.should_quit {
            info!("exiting");
            break;
        }
    }

    Ok(())
}
