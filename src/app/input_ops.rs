use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

use crate::carousel::{Axis, CarouselController, position_on};
use crate::command::{ActionId, Command, CommandContext, CommandDispatchResult, dispatch};
use crate::event::AppEvent;
use crate::playback::{Indicator, MediaSignal};
use crate::ui;

use super::actors::PointerRelease;
use super::core::{App, EngineSubsystem};
use super::state::Mode;

impl App {
    pub(crate) fn command_context(&mut self) -> CommandContext<'_> {
        CommandContext {
            state: &mut self.state,
            engine: &mut self.engine,
            session: &mut self.session,
            pending: &mut self.pending,
        }
    }

    pub fn dispatch_command(&mut self, command: Command) -> CommandDispatchResult {
        dispatch(self.command_context(), command)
    }

    pub(crate) fn handle_app_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::NavigationCommitted { from, to, reason } => {
                debug!(?from, ?to, ?reason, "navigation event");
            }
            AppEvent::ModeChanged { from, to } => {
                debug!(from = from.label(), to = to.label(), "mode changed");
            }
            AppEvent::CatalogChanged { stories, category } => {
                debug!(stories, %category, "catalog changed");
            }
            AppEvent::CommandExecuted { id, outcome } => {
                debug!(id = id.as_str(), ?outcome, "command executed");
            }
        }
    }

    /// Applies a media host report. A finished active video moves the viewer
    /// on; the resulting events are queued for the loop. Returns whether
    /// anything visible changed.
    pub(crate) fn handle_media_signal(&mut self, signal: MediaSignal) -> bool {
        let changed = self.engine.playback.on_signal(signal);
        if changed {
            self.state.status.last_action_id = Some(ActionId::Media);
        }
        if let Some(slot) = self.engine.playback.take_finished() {
            let result = self.dispatch_command(Command::MediaEnded { slot });
            self.pending.events.extend(result.emitted_events);
        }
        changed
    }

    /// Drags feed the carousel of the locked axis; a click without movement
    /// hits a pagination dot or the tap-to-play affordance.
    pub(crate) fn handle_mouse_event(
        &mut self,
        mouse: MouseEvent,
        area: Rect,
        now: Instant,
    ) -> Option<Command> {
        if self.state.mode != Mode::Viewer {
            self.cancel_pointer();
            return None;
        }
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Command::NextStory),
            MouseEventKind::ScrollUp => Some(Command::PrevStory),
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer.press(column, row, now);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (axis, start) = self.pointer.drag(column, row)?;
                let carousel = carousel_for(&mut self.engine, axis)?;
                if let Some((origin, started_at)) = start {
                    carousel.press(origin, started_at);
                }
                carousel.drag(position_on(axis, column, row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => match self.pointer.release() {
                PointerRelease::Drag(axis) => carousel_for(&mut self.engine, axis)?
                    .release(position_on(axis, column, row), now)
                    .map(|request| Command::Gesture { request }),
                PointerRelease::Click => self.click(area, column, row),
                PointerRelease::Stray => None,
            },
            _ => None,
        }
    }

    /// Abandons an in-flight drag without committing it.
    pub(crate) fn cancel_pointer(&mut self) {
        if let PointerRelease::Drag(axis) = self.pointer.release()
            && let Some(carousel) = carousel_for(&mut self.engine, axis)
        {
            carousel.cancel();
        }
    }

    fn click(&self, area: Rect, column: u16, row: u16) -> Option<Command> {
        let slot = self.engine.nav.active()?;
        let layout = ui::split_layout(area);
        let count = self.engine.nav.segment_count(slot.story);
        if let Some(segment) = ui::pagination_dot_at(layout.footer, count, column, row) {
            return Some(Command::JumpSegment { segment });
        }
        match self.engine.playback.indicator() {
            Indicator::TapToPlay => Some(Command::TogglePlay),
            _ => None,
        }
    }
}

fn carousel_for(engine: &mut EngineSubsystem, axis: Axis) -> Option<&mut CarouselController> {
    match axis {
        Axis::Vertical => Some(engine.carousels.vertical_mut()),
        Axis::Horizontal => {
            let story = engine.nav.active_story();
            engine.carousels.horizontal_mut(story)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::layout::Rect;

    use crate::carousel::IndexRequest;
    use crate::catalog::fixtures::catalog;
    use crate::command::Command;
    use crate::nav::NavDirection;
    use crate::ui;

    use super::super::testing::Harness;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn horizontal_drag_commits_segment_gesture() {
        let mut harness = Harness::with_catalog(catalog(&[3, 2]));
        let app = &mut harness.app;
        let t0 = Instant::now();

        let left = MouseEventKind::Down(MouseButton::Left);
        let drag = MouseEventKind::Drag(MouseButton::Left);
        let up = MouseEventKind::Up(MouseButton::Left);
        assert_eq!(app.handle_mouse_event(mouse(left, 40, 10), AREA, t0), None);
        assert_eq!(app.handle_mouse_event(mouse(drag, 36, 10), AREA, t0), None);
        assert_eq!(app.handle_mouse_event(mouse(drag, 30, 10), AREA, t0), None);
        let released = app.handle_mouse_event(mouse(up, 30, 10), AREA, t0 + Duration::from_secs(1));

        assert_eq!(
            released,
            Some(Command::Gesture {
                request: IndexRequest::Segment {
                    story: 0,
                    direction: NavDirection::Forward
                }
            })
        );
    }

    #[test]
    fn vertical_drag_commits_story_gesture() {
        let mut harness = Harness::with_catalog(catalog(&[1, 1, 1]));
        let app = &mut harness.app;
        let t0 = Instant::now();

        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 15), AREA, t0);
        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 12), AREA, t0);
        let released = app.handle_mouse_event(
            mouse(MouseEventKind::Up(MouseButton::Left), 40, 10),
            AREA,
            t0 + Duration::from_secs(1),
        );
        assert_eq!(
            released,
            Some(Command::Gesture {
                request: IndexRequest::Story(NavDirection::Forward)
            })
        );
    }

    #[test]
    fn click_on_pagination_dot_jumps() {
        let mut harness = Harness::with_catalog(catalog(&[4]));
        let app = &mut harness.app;
        let footer = ui::split_layout(AREA).footer;
        let (column, row) = ui::pagination_dot_position(footer, 2);

        let t0 = Instant::now();
        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), column, row), AREA, t0);
        let clicked =
            app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), column, row), AREA, t0);
        assert_eq!(clicked, Some(Command::JumpSegment { segment: 2 }));
    }

    #[test]
    fn cancelled_drag_commits_nothing() {
        let mut harness = Harness::with_catalog(catalog(&[3]));
        let app = &mut harness.app;
        let t0 = Instant::now();

        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 10), AREA, t0);
        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10), AREA, t0);
        let story = app.engine.nav.active_story();
        let offset = |app: &crate::app::App| {
            app.engine
                .carousels
                .horizontal(story)
                .map(|carousel| carousel.drag_offset())
        };
        assert_eq!(offset(app), Some(-10));

        app.cancel_pointer();
        assert_eq!(offset(app), Some(0));
        let released = app.handle_mouse_event(
            mouse(MouseEventKind::Up(MouseButton::Left), 30, 10),
            AREA,
            t0 + Duration::from_secs(1),
        );
        assert_eq!(released, None);
        assert_eq!(app.engine.nav.active(), Some(crate::nav::Slot::new(0, 0)));
    }

    #[test]
    fn opening_an_overlay_mid_drag_releases_the_carousel() {
        let mut harness = Harness::with_catalog(catalog(&[3]));
        let t0 = Instant::now();
        let app = &mut harness.app;
        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 10), AREA, t0);
        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10), AREA, t0);
        assert!(!app.engine.carousels.is_settled());

        app.dispatch_command(Command::OpenContent);
        let released = app.handle_mouse_event(
            mouse(MouseEventKind::Up(MouseButton::Left), 30, 10),
            AREA,
            t0 + Duration::from_secs(1),
        );
        assert_eq!(released, None);
        assert!(app.engine.carousels.is_settled());
        assert_eq!(app.engine.nav.active(), Some(crate::nav::Slot::new(0, 0)));
    }

    #[test]
    fn wheel_steps_stories_and_overlays_swallow_pointer() {
        let mut harness = Harness::with_catalog(catalog(&[1, 1]));
        let now = Instant::now();
        assert_eq!(
            harness
                .app
                .handle_mouse_event(mouse(MouseEventKind::ScrollDown, 1, 1), AREA, now),
            Some(Command::NextStory)
        );

        harness.app.dispatch_command(Command::OpenContent);
        assert_eq!(
            harness
                .app
                .handle_mouse_event(mouse(MouseEventKind::ScrollDown, 1, 1), AREA, now),
            None
        );
    }
}
