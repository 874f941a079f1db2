use std::io::{Stdout, stdout};

use crossterm::{
    cursor,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::{AppError, Result};

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

fn terminal_err(err: std::io::Error) -> AppError {
    AppError::Terminal(err.to_string())
}

/// Raw mode + alternate screen; [`leave`] must run before process exit.
pub fn enter() -> Result<AppTerminal> {
    enable_raw_mode().map_err(terminal_err)?;
    let mut out = stdout();
    crossterm::execute!(out, EnterAlternateScreen, cursor::Hide).map_err(terminal_err)?;
    Terminal::new(CrosstermBackend::new(out)).map_err(terminal_err)
}

pub fn leave(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().map_err(terminal_err)?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .map_err(terminal_err)?;
    terminal.show_cursor().map_err(terminal_err)?;
    Ok(())
}
