//! Terminal kiosk
//!
//! Raw-mode, alternate-screen front end for the capture wizard.

pub mod app;
pub mod events;
pub mod render;
pub mod theme;

pub use app::App;
pub use events::{EventHandler, TuiEvent};
pub use render::render;
pub use theme::Theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};

use crate::config::Config;

type KioskTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Run the kiosk until the user quits
pub async fn run(config: &Config) -> Result<()> {
    let mut events = EventHandler::new();
    let app = App::from_config(config, events.sender());

    let mut terminal = setup_terminal()?;
    EventHandler::start_terminal_listener(events.sender());

    let result = run_loop(&mut terminal, app, &mut events).await;

    // Restore the terminal even when the loop failed
    restore_terminal(&mut terminal)?;
    result
}

async fn run_loop(
    terminal: &mut KioskTerminal,
    mut app: App,
    events: &mut EventHandler,
) -> Result<()> {
    terminal
        .draw(|f| render(f, &app))
        .context("Failed to draw frame")?;

    while let Some(event) = events.next().await {
        app.handle_event(event).await?;

        // Drain whatever queued up while handling, then draw once
        while let Some(event) = events.try_next() {
            app.handle_event(event).await?;
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            tracing::info!("Kiosk quit requested");
            break;
        }

        terminal
            .draw(|f| render(f, &app))
            .context("Failed to draw frame")?;
    }

    // Dropping the app releases any open camera
    drop(app);
    Ok(())
}

fn setup_terminal() -> Result<KioskTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(out)).context("Failed to create terminal")?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut KioskTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}
