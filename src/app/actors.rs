use std::time::{Duration, Instant};

use crate::carousel::{Axis, PointerTracker};

pub(crate) struct InputActor {
    last_input_at: Instant,
}

impl InputActor {
    pub(crate) fn new(now: Instant) -> Self {
        Self { last_input_at: now }
    }

    pub(crate) fn last_input_at_mut(&mut self) -> &mut Instant {
        &mut self.last_input_at
    }
}

pub(crate) struct UiActor {
    needs_redraw: bool,
    last_animated_redraw: Instant,
    animation_interval: Duration,
}

impl UiActor {
    pub(crate) fn new(now: Instant, animation_interval: Duration) -> Self {
        Self {
            needs_redraw: true,
            last_animated_redraw: now,
            animation_interval,
        }
    }

    pub(crate) fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub(crate) fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub(crate) fn needs_redraw_mut(&mut self) -> &mut bool {
        &mut self.needs_redraw
    }

    /// Spinners and settling carousels repaint on a fixed cadence while busy.
    pub(crate) fn should_request_animated_redraw(&self, busy: bool, now: Instant) -> bool {
        busy && now.saturating_duration_since(self.last_animated_redraw) >= self.animation_interval
    }

    pub(crate) fn on_drawn(&mut self, now: Instant) {
        self.last_animated_redraw = now;
    }
}

/// Pointer state between press and release: which carousel the drag was
/// handed to, if any.
#[derive(Debug, Default)]
pub(crate) struct PointerActor {
    tracker: PointerTracker,
    pressed_at: Option<Instant>,
    engaged: Option<Axis>,
}

impl PointerActor {
    pub(crate) fn press(&mut self, column: u16, row: u16, now: Instant) {
        self.tracker.press(column, row);
        self.pressed_at = Some(now);
        self.engaged = None;
    }

    /// Returns the locked axis, plus the press origin and instant the first
    /// time the axis locks so the carousel can start its drag.
    pub(crate) fn drag(&mut self, column: u16, row: u16) -> Option<(Axis, Option<(i32, Instant)>)> {
        let (axis, origin) = self.tracker.drag(column, row)?;
        if self.engaged.is_some() {
            return Some((axis, None));
        }
        self.engaged = Some(axis);
        let started = self.pressed_at.unwrap_or_else(Instant::now);
        Some((axis, Some((origin, started))))
    }

    /// A release without a press (e.g. the press landed on another window)
    /// is neither a drag nor a click.
    pub(crate) fn release(&mut self) -> PointerRelease {
        let was_pressed = self.pressed_at.take().is_some();
        self.tracker.release();
        match self.engaged.take() {
            Some(axis) => PointerRelease::Drag(axis),
            None if was_pressed => PointerRelease::Click,
            None => PointerRelease::Stray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerRelease {
    Drag(Axis),
    Click,
    Stray,
}
