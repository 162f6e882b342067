pub mod app;
pub mod event;
pub mod ui;
pub mod views;

use std::io;
use std::time::Instant;

use crossterm::{
    event::{Event, poll, read},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use app::{App, Message, RunningState};

/// Main entry point for TUI mode
pub fn run_tui(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("Terminal UI started");

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal; every step runs even if an earlier one failed
    let restored = first_error([
        disable_raw_mode(),
        execute!(terminal.backend_mut(), LeaveAlternateScreen),
        execute!(terminal.backend_mut(), SetTitle(&app.original_title)),
        terminal.show_cursor(),
    ]);
    info!("Terminal UI stopped");

    result.and(restored)
}

fn first_error<const N: usize>(steps: [io::Result<()>; N]) -> io::Result<()> {
    steps.into_iter().collect()
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        if let Some(title) = app.take_title() {
            debug!(title = %title, "Updating terminal title");
            execute!(terminal.backend_mut(), SetTitle(&title))?;
        }

        // Render
        terminal.draw(|f| ui::draw(f, app))?;

        // Wait for input, but never past the next tick
        if poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = read()? {
                if let Some(msg) = event::handle_key(key, app) {
                    app.update(msg, Instant::now());
                }
            }
        }

        // Deliver ticks and cue events that came due
        app.update(Message::Tick, Instant::now());

        // Check if we should quit
        if app.running_state == RunningState::Done {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teardown_reports_first_failure() {
        let steps = [
            Ok(()),
            Err(io::Error::other("raw mode")),
            Err(io::Error::other("alternate screen")),
        ];
        let err = first_error(steps).unwrap_err();
        assert_eq!(err.to_string(), "raw mode");
        assert!(first_error([Ok(()), Ok(())]).is_ok());
    }
}
