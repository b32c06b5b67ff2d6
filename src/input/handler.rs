use std::time::Instant;

use crossterm::event::{Event, KeyEventKind};
use ratatui::layout::Rect;

use crate::command::Command;
use crate::error::AppResult;

use crate::app::App;
use crate::app::terminal_session::TerminalSurface;

use super::keymap::{KeymapPreset, map_key_to_command_with_preset};

#[derive(Debug, Default)]
pub(crate) struct InputEventOutcome {
    pub(crate) quit_requested: bool,
    pub(crate) command: Option<Command>,
}

impl App {
    pub(crate) fn handle_input_event(
        &mut self,
        event: Event,
        session: &mut impl TerminalSurface,
        needs_redraw: &mut bool,
        last_input_at: &mut Instant,
    ) -> AppResult<InputEventOutcome> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                *last_input_at = Instant::now();
                let preset = KeymapPreset::parse(&self.config.keymap.preset);
                let command = map_key_to_command_with_preset(key, self.state.mode, preset);
                Ok(InputEventOutcome {
                    quit_requested: matches!(command, Some(Command::Quit)),
                    command,
                })
            }
            Event::Mouse(mouse) => {
                *last_input_at = Instant::now();
                let size = session.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                let command = self.handle_mouse_event(mouse, area, *last_input_at);
                // Drags move the slide under the pointer.
                *needs_redraw = true;
                Ok(InputEventOutcome {
                    quit_requested: false,
                    command,
                })
            }
            Event::FocusLost => {
                self.cancel_pointer();
                *needs_redraw = true;
                Ok(InputEventOutcome::default())
            }
            Event::Resize(_, _) => {
                *last_input_at = Instant::now();
                self.cancel_pointer();
                session.clear()?;
                *needs_redraw = true;
                Ok(InputEventOutcome::default())
            }
            _ => Ok(InputEventOutcome::default()),
        }
    }
}
