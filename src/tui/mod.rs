// Reader TUI - Main Module
// Page text, extracted text and chat in one terminal screen

pub mod events;
pub mod layout;
pub mod render;
pub mod text_selection;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::actions::Action;
use crate::app::ReaderApp;
use crate::error::ReaderError;
use events::EventHandler;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Entry point for the interactive viewer
pub async fn run_viewer(mut app: ReaderApp, document: Option<PathBuf>) -> Result<()> {
    info!("Starting CHONKER Reader");

    // Setup terminal
    enable_raw_mode().map_err(ReaderError::terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(ReaderError::terminal)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(ReaderError::terminal)?;

    if let Some(path) = document {
        app.dispatch(Action::OpenDocument(path));
    }

    let mut event_handler = EventHandler::new();
    let result = run_viewer_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Cleanup
    disable_raw_mode().map_err(ReaderError::terminal)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(ReaderError::terminal)?;
    terminal.show_cursor().map_err(ReaderError::terminal)?;

    if let Err(err) = result {
        error!("Viewer error: {:?}", err);
        return Err(err);
    }

    info!("Viewer shut down successfully");
    Ok(())
}

async fn run_viewer_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut ReaderApp,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        let mut drawn = None;
        terminal.draw(|frame| {
            drawn = Some(render::draw(
                frame,
                app.state(),
                &app.config().viewer,
                event_handler.drag_range(),
            ));
        })?;

        if let (Some(layout), Some(event)) = (drawn, event_handler.poll(POLL_INTERVAL)?) {
            for action in event_handler.handle_event(event, app.state(), &layout) {
                app.dispatch(action);
            }
        }

        // Completions from background loads, extractions and chat replies
        app.drain_pending();

        if app.should_quit() {
            break;
        }
        tokio::task::yield_now().await;
    }

    Ok(())
}
