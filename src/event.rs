use crossterm::event::Event;

use crate::app::Mode;
use crate::catalog::FetchedCatalog;
use crate::command::{ActionId, Command, CommandOutcome};
use crate::error::AppResult;
use crate::nav::{Slot, Ticket};
use crate::playback::MediaSignal;

/// Describes *why* the active slot changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavReason {
    /// Incremental movement (arrow keys, wheel).
    Step,
    /// Direct jump (pagination dot or digit key).
    Jump,
    /// Committed drag on one of the carousels.
    Gesture,
    /// Horizontal swipe past a story's edge, forwarded to the story axis.
    EdgeForward,
    /// The active video finished.
    MediaEnded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CommandExecuted {
        id: ActionId,
        outcome: CommandOutcome,
    },
    NavigationCommitted {
        from: Slot,
        to: Slot,
        reason: NavReason,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    CatalogChanged {
        stories: usize,
        category: String,
    },
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Command(Command),
    App(AppEvent),
    CatalogLoaded {
        ticket: Ticket<()>,
        fetched: FetchedCatalog,
    },
    PlaySettled {
        ticket: Ticket<Slot>,
        result: AppResult<()>,
    },
    Media(MediaSignal),
    RedrawTick,
    Wake,
}
