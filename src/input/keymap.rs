use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Mode;
use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Vim,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "vim" => Self::Vim,
            _ => Self::Default,
        }
    }
}

pub fn map_key_to_command(key: KeyEvent, mode: Mode) -> Option<Command> {
    map_key_to_command_with_preset(key, mode, KeymapPreset::Default)
}

/// Only Escape (and Ctrl-C) get through while an overlay covers the viewer.
pub fn map_key_to_command_with_preset(
    key: KeyEvent,
    mode: Mode,
    preset: KeymapPreset,
) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match mode {
        Mode::Onboarding => match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(Command::DismissOnboarding),
            _ => None,
        },
        Mode::Content => match key.code {
            KeyCode::Esc => Some(Command::CloseContent),
            _ => None,
        },
        Mode::Viewer => match preset {
            KeymapPreset::Default => map_viewer_key_default(key),
            KeymapPreset::Vim => map_viewer_key_vim(key),
        },
    }
}

fn map_viewer_key_default(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Up | KeyCode::PageUp => Some(Command::PrevStory),
        KeyCode::Down | KeyCode::PageDown => Some(Command::NextStory),
        KeyCode::Left => Some(Command::PrevSegment),
        KeyCode::Right => Some(Command::NextSegment),
        KeyCode::Char(' ') => Some(Command::TogglePlay),
        KeyCode::Char('m') => Some(Command::ToggleMute),
        KeyCode::Char('r') | KeyCode::Enter => Some(Command::OpenContent),
        KeyCode::Char('c') => Some(Command::CycleCategory),
        KeyCode::Char('R') => Some(Command::Refresh),
        KeyCode::Char(digit @ '1'..='9') => digit.to_digit(10).map(|value| Command::JumpSegment {
            segment: value as usize - 1,
        }),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Back),
        _ => None,
    }
}

fn map_viewer_key_vim(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('k') => Some(Command::PrevStory),
        KeyCode::Char('j') => Some(Command::NextStory),
        KeyCode::Char('h') => Some(Command::PrevSegment),
        KeyCode::Char('l') => Some(Command::NextSegment),
        _ => map_viewer_key_default(key),
    }
}
