use crate::error::AppResult;
use crate::ui::{self, ChromeView, SlideView};

use super::core::App;
use super::state::Mode;
use super::terminal_session::TerminalSurface;

impl App {
    pub(super) fn render_frame(&mut self, session: &mut impl TerminalSurface) -> AppResult<()> {
        let state = &self.state;
        let engine = &self.engine;
        let wrap_cache = &mut self.wrap_cache;

        let active = engine.nav.active();
        let status = active
            .and_then(|slot| engine.playback.status(slot))
            .filter(|status| status.kind.is_playable());
        let chrome = ChromeView {
            mode: state.mode,
            categories: state.catalog.filter.categories(),
            selected_category: state.catalog.filter.selected(),
            story: active.map(|slot| (slot.story, engine.nav.story_count())),
            segment: active.map(|slot| (slot.segment, engine.nav.segment_count(slot.story))),
            location: engine.deeplink.location(),
            playback: status.map(|status| status.phase.label()),
            message: &state.status.message,
        };
        let slide = active.and_then(|slot| {
            let story = state.catalog.visible.get(slot.story)?;
            let segment = story.segments.get(slot.segment)?;
            let horizontal = engine
                .carousels
                .horizontal(slot.story)
                .map_or(0, |carousel| carousel.drag_offset());
            Some(SlideView {
                story_title: &story.title,
                segment,
                phase: status.map(|status| status.phase.label()),
                muted: status.is_some_and(|status| status.muted),
                drag: (horizontal, engine.carousels.vertical().drag_offset()),
            })
        });

        session.draw(|frame| {
            let layout = ui::split_layout(frame.area());
            ui::draw_chrome(frame, layout, &chrome);

            match slide.as_ref() {
                Some(view) => {
                    ui::draw_slide(frame, layout.slide, view, wrap_cache);
                    ui::draw_indicator(frame, layout.slide, engine.playback.indicator());
                }
                None => ui::draw_empty_state(
                    frame,
                    layout.slide,
                    state.catalog.loading,
                    state.catalog.filter.selected(),
                ),
            }

            match state.mode {
                Mode::Viewer => {}
                Mode::Content => {
                    if let Some(modal) = state.modal.as_ref() {
                        ui::draw_content_modal(frame, layout.slide, modal, wrap_cache);
                    }
                }
                Mode::Onboarding => ui::draw_onboarding_overlay(frame, frame.area()),
            }
        })?;
        Ok(())
    }
}
