use std::io::{self, Stdout, Write};

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;
use tracing::{debug, warn};

use crate::error::AppResult;

/// What the event loop needs from a terminal; tests draw into a
/// `TestBackend` through the same seam.
pub(crate) trait TerminalSurface {
    fn size(&self) -> io::Result<Size>;

    fn clear(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

/// Full screen, mouse drags for the carousels, and focus reports so a drag
/// can be dropped when the window loses focus.
pub(crate) fn enter_viewer_modes<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)
}

/// Undoes [`enter_viewer_modes`] in reverse order. Safe to repeat.
pub(crate) fn leave_viewer_modes<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, DisableFocusChange, DisableMouseCapture, LeaveAlternateScreen)
}

/// The real terminal for the lifetime of the viewer. Dropping it restores
/// the shell's terminal even when the loop unwinds.
pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalSession {
    pub(crate) fn enter() -> AppResult<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = enter_viewer_modes(&mut stdout) {
            abandon(&mut stdout);
            return Err(err.into());
        }

        let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                abandon(&mut io::stdout());
                return Err(err.into());
            }
        };
        if let Err(err) = terminal.clear() {
            abandon(terminal.backend_mut());
            return Err(err.into());
        }
        debug!("terminal entered viewer modes");

        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub(crate) fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        disable_raw_mode()?;
        leave_viewer_modes(self.terminal.backend_mut())?;
        self.terminal.show_cursor()?;
        debug!("terminal restored");
        Ok(())
    }
}

impl TerminalSurface for TerminalSession {
    fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear()
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render).map(|_| ())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(%err, "terminal restore failed");
        }
    }
}

/// Best-effort undo after a failed enter.
fn abandon<W: Write>(out: &mut W) {
    let _ = leave_viewer_modes(out);
    let _ = disable_raw_mode();
}

#[cfg(all(test, unix))]
mod tests {
    use super::{enter_viewer_modes, leave_viewer_modes};

    fn written(apply: fn(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        apply(&mut out).expect("writing to memory should succeed");
        String::from_utf8(out).expect("escape sequences are ascii")
    }

    #[test]
    fn entering_enables_alternate_screen_mouse_and_focus() {
        let out = written(enter_viewer_modes);
        assert!(out.contains("\x1b[?1049h"), "{out:?}");
        assert!(out.contains("\x1b[?1000h"), "{out:?}");
        assert!(out.contains("\x1b[?1004h"), "{out:?}");
    }

    #[test]
    fn leaving_releases_mouse_and_focus_before_the_screen() {
        let out = written(leave_viewer_modes);
        let focus = out.find("\x1b[?1004l").expect("focus reporting disabled");
        let mouse = out.find("\x1b[?1000l").expect("mouse capture disabled");
        let screen = out.find("\x1b[?1049l").expect("alternate screen left");
        assert!(focus < mouse && mouse < screen, "{out:?}");
    }
}
