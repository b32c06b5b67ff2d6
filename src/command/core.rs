use tracing::debug;

use crate::app::{Mode, ModalContent};
use crate::carousel::IndexRequest;
use crate::event::AppEvent;
use crate::nav::{NavDirection, Slot};
use crate::playback::PlaybackPhase;

use super::dispatch::CommandContext;
use super::types::{ActionId, CommandOutcome};

pub(crate) fn step_story(
    ctx: &mut CommandContext<'_>,
    direction: NavDirection,
    action_id: ActionId,
) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(action_id);
    if !require_stories(ctx) {
        return CommandOutcome::Noop;
    }
    match ctx.engine.carousels.vertical_mut().step(direction) {
        Some(request) => commit(ctx, request),
        None => {
            let edge = match direction {
                NavDirection::Backward => "first",
                NavDirection::Forward => "last",
            };
            ctx.state.status.message = format!("already at {edge} story");
            CommandOutcome::Noop
        }
    }
}

pub(crate) fn step_segment(
    ctx: &mut CommandContext<'_>,
    direction: NavDirection,
    action_id: ActionId,
) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(action_id);
    if !require_stories(ctx) {
        return CommandOutcome::Noop;
    }
    let story = ctx.engine.nav.active_story();
    let request = ctx
        .engine
        .carousels
        .horizontal_mut(story)
        .and_then(|carousel| carousel.step(direction));
    match request {
        Some(request) => commit(ctx, request),
        None => {
            let edge = match direction {
                NavDirection::Backward => "first",
                NavDirection::Forward => "last",
            };
            ctx.state.status.message = format!("already at {edge} segment");
            CommandOutcome::Noop
        }
    }
}

pub(crate) fn jump_segment(ctx: &mut CommandContext<'_>, segment: usize) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::JumpSegment);
    if !require_stories(ctx) {
        return CommandOutcome::Noop;
    }
    let story = ctx.engine.nav.active_story();
    let request = ctx
        .engine
        .carousels
        .horizontal_mut(story)
        .and_then(|carousel| carousel.jump(segment));
    match request {
        Some(request) => commit(ctx, request),
        None => {
            ctx.state.status.message = format!("no segment {} to jump to", segment + 1);
            CommandOutcome::Noop
        }
    }
}

pub(crate) fn apply_gesture(ctx: &mut CommandContext<'_>, request: IndexRequest) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::Gesture);
    commit(ctx, request)
}

/// Moves on from a finished video, unless an overlay covers the viewer.
pub(crate) fn media_ended(ctx: &mut CommandContext<'_>, slot: Slot) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::MediaEnded);
    if ctx.state.mode != Mode::Viewer {
        return CommandOutcome::Noop;
    }
    match ctx.engine.end_of_media_request(slot) {
        Some(request) => commit(ctx, request),
        None => CommandOutcome::Noop,
    }
}

pub(crate) fn toggle_play(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::TogglePlay);
    let Some(slot) = ctx.engine.playback.active() else {
        ctx.state.status.message = "nothing is playing".to_string();
        return CommandOutcome::Noop;
    };
    let before = ctx.engine.playback.phase(slot);
    if let Some(play) = ctx.engine.playback.toggle_play() {
        ctx.pending.plays.push(play);
        ctx.state.status.message = "play requested".to_string();
        return CommandOutcome::Applied;
    }
    let after = ctx.engine.playback.phase(slot);
    if before == after {
        ctx.state.status.message = format!("cannot toggle playback ({})", after.label());
        return CommandOutcome::Noop;
    }
    ctx.state.status.message = match after {
        PlaybackPhase::Paused => "paused".to_string(),
        phase => phase.label().to_string(),
    };
    CommandOutcome::Applied
}

pub(crate) fn toggle_mute(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::ToggleMute);
    match ctx.engine.playback.toggle_mute() {
        Some(muted) => {
            ctx.state.status.message = if muted { "muted" } else { "unmuted" }.to_string();
            CommandOutcome::Applied
        }
        None => {
            ctx.state.status.message = "nothing to mute".to_string();
            CommandOutcome::Noop
        }
    }
}

pub(crate) fn open_content(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::OpenContent);
    if ctx.state.mode != Mode::Viewer {
        return CommandOutcome::Noop;
    }
    let Some(slot) = ctx.engine.nav.active() else {
        ctx.state.status.message = "nothing to read".to_string();
        return CommandOutcome::Noop;
    };
    let Some(story) = ctx.state.catalog.visible.get(slot.story) else {
        return CommandOutcome::Noop;
    };
    let has_button = story
        .segments
        .get(slot.segment)
        .is_some_and(|segment| segment.show_button);
    if !has_button {
        ctx.state.status.message = "this segment has no content to open".to_string();
        return CommandOutcome::Noop;
    }

    ctx.state.modal = Some(ModalContent::from_story(slot.story, story));
    ctx.state.mode = Mode::Content;
    ctx.engine.set_suspended(true, ctx.pending);
    ctx.state.status.message = format!("reading \"{}\"", story.title);
    CommandOutcome::Applied
}

pub(crate) fn close_content(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::CloseContent);
    if !close_modal(ctx) {
        return CommandOutcome::Noop;
    }
    ctx.state.status.message = "content closed".to_string();
    CommandOutcome::Applied
}

/// Returns false when no modal was open.
pub(crate) fn close_modal(ctx: &mut CommandContext<'_>) -> bool {
    if ctx.state.mode != Mode::Content {
        return false;
    }
    ctx.state.mode = Mode::Viewer;
    ctx.state.modal = None;
    ctx.engine.set_suspended(false, ctx.pending);
    true
}

pub(crate) fn cycle_category(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::CycleCategory);
    if ctx.state.catalog.filter.categories().len() < 2 {
        ctx.state.status.message = "no other categories".to_string();
        return CommandOutcome::Noop;
    }
    ctx.state.catalog.filter.cycle();
    apply_catalog_view(ctx);
    CommandOutcome::Applied
}

pub(crate) fn select_category(ctx: &mut CommandContext<'_>, name: &str) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::SelectCategory);
    if !ctx.state.catalog.filter.select(name) {
        ctx.state.status.message = format!("category unchanged ({})", ctx.state.catalog.filter.selected());
        return CommandOutcome::Noop;
    }
    apply_catalog_view(ctx);
    CommandOutcome::Applied
}

/// Re-derives the visible stories from the full catalog and the selected
/// category, and restarts navigation on them.
pub(crate) fn apply_catalog_view(ctx: &mut CommandContext<'_>) {
    let catalog = &mut ctx.state.catalog;
    catalog.visible = catalog.filter.apply(&catalog.all);
    let category = catalog.filter.selected().to_string();
    let count = catalog.visible.len();
    debug!(%category, count, "catalog view replaced");

    close_modal(ctx);
    ctx.engine
        .replace_catalog(&ctx.state.catalog.visible, ctx.pending);
    ctx.state.status.message = if count == 0 {
        format!("{category}: nothing here")
    } else {
        format!("{category}: {count} stories")
    };
    ctx.pending.events.push(AppEvent::CatalogChanged {
        stories: count,
        category,
    });
}

pub(crate) fn refresh(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::Refresh);
    if ctx.state.catalog.loading {
        ctx.state.status.message = "catalog already loading".to_string();
        return CommandOutcome::Noop;
    }
    ctx.state.catalog.loading = true;
    ctx.pending.catalog_fetches.push_back(true);
    ctx.state.status.message = "refreshing catalog".to_string();
    CommandOutcome::Applied
}

pub(crate) fn dismiss_onboarding(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::DismissOnboarding);
    if ctx.state.mode != Mode::Onboarding {
        return CommandOutcome::Noop;
    }
    ctx.session.onboarding_mut().complete();
    ctx.state.mode = Mode::Viewer;
    ctx.state.status.message = "welcome".to_string();
    CommandOutcome::Applied
}

pub(crate) fn back(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    match ctx.state.mode {
        Mode::Onboarding => dismiss_onboarding(ctx),
        Mode::Content => close_content(ctx),
        Mode::Viewer => quit(ctx),
    }
}

pub(crate) fn quit(ctx: &mut CommandContext<'_>) -> CommandOutcome {
    ctx.state.status.last_action_id = Some(ActionId::Quit);
    ctx.state.status.message = "quit requested".to_string();
    CommandOutcome::QuitRequested
}

fn commit(ctx: &mut CommandContext<'_>, request: IndexRequest) -> CommandOutcome {
    let change = ctx
        .engine
        .apply_request(&ctx.state.catalog.visible, request, ctx.pending);
    let Some(change) = change else {
        ctx.state.status.message = "position unchanged".to_string();
        return CommandOutcome::Noop;
    };
    let story_count = ctx.engine.nav.story_count();
    let segment_count = ctx.engine.nav.segment_count(change.to.story);
    ctx.state.status.message = format!(
        "story {}/{} | segment {}/{}",
        change.to.story + 1,
        story_count,
        change.to.segment + 1,
        segment_count
    );
    CommandOutcome::Applied
}

fn require_stories(ctx: &mut CommandContext<'_>) -> bool {
    if ctx.engine.nav.is_empty() {
        ctx.state.status.message = "nothing here".to_string();
        return false;
    }
    true
}
