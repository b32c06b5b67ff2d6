use crate::app::{AppState, EngineSubsystem, Mode, PendingWork};
use crate::event::{AppEvent, NavReason};
use crate::nav::{NavDirection, Slot};
use crate::session::ViewerSession;

use super::core::{
    apply_gesture, back, close_content, close_modal, cycle_category, dismiss_onboarding,
    jump_segment, media_ended, open_content, quit, refresh, select_category, step_segment, step_story,
    toggle_mute, toggle_play,
};
use super::types::{ActionId, Command, CommandOutcome};
use crate::carousel::IndexRequest;

/// Everything a command may touch.
pub struct CommandContext<'a> {
    pub state: &'a mut AppState,
    pub engine: &'a mut EngineSubsystem,
    pub session: &'a mut ViewerSession,
    pub pending: &'a mut PendingWork,
}

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub emitted_events: Vec<AppEvent>,
}

pub fn dispatch(mut ctx: CommandContext<'_>, cmd: Command) -> CommandDispatchResult {
    let previous = ctx.engine.nav.active();
    let prev_mode = ctx.state.mode;
    let action_id = cmd.action_id();
    let reason = derive_nav_reason(&cmd);

    let outcome = match cmd {
        Command::NextStory => step_story(&mut ctx, NavDirection::Forward, ActionId::NextStory),
        Command::PrevStory => step_story(&mut ctx, NavDirection::Backward, ActionId::PrevStory),
        Command::NextSegment => {
            step_segment(&mut ctx, NavDirection::Forward, ActionId::NextSegment)
        }
        Command::PrevSegment => {
            step_segment(&mut ctx, NavDirection::Backward, ActionId::PrevSegment)
        }
        Command::JumpSegment { segment } => jump_segment(&mut ctx, segment),
        Command::Gesture { request } => apply_gesture(&mut ctx, request),
        Command::MediaEnded { slot } => media_ended(&mut ctx, slot),
        Command::TogglePlay => toggle_play(&mut ctx),
        Command::ToggleMute => toggle_mute(&mut ctx),
        Command::OpenContent => open_content(&mut ctx),
        Command::CloseContent => close_content(&mut ctx),
        Command::CycleCategory => cycle_category(&mut ctx),
        Command::SelectCategory { name } => select_category(&mut ctx, &name),
        Command::Refresh => refresh(&mut ctx),
        Command::DismissOnboarding => dismiss_onboarding(&mut ctx),
        Command::Back => back(&mut ctx),
        Command::Quit => quit(&mut ctx),
    };

    let mut emitted_events = collect_transition_events(&mut ctx, previous, prev_mode, reason);
    emitted_events.push(AppEvent::CommandExecuted {
        id: action_id,
        outcome,
    });

    CommandDispatchResult {
        outcome,
        emitted_events,
    }
}

fn collect_transition_events(
    ctx: &mut CommandContext<'_>,
    previous: Option<Slot>,
    prev_mode: Mode,
    reason: Option<NavReason>,
) -> Vec<AppEvent> {
    let current = ctx.engine.nav.active();
    // The modal belongs to the story it was opened on.
    if previous.map(|slot| slot.story) != current.map(|slot| slot.story) {
        close_modal(ctx);
    }

    let mut events: Vec<AppEvent> = ctx.pending.events.drain(..).collect();
    if let (Some(from), Some(to), Some(reason)) = (previous, current, reason)
        && from != to
    {
        events.push(AppEvent::NavigationCommitted { from, to, reason });
    }

    if ctx.state.mode != prev_mode {
        events.push(AppEvent::ModeChanged {
            from: prev_mode,
            to: ctx.state.mode,
        });
    }
    events
}

/// `None` for commands that replace the catalog rather than move within it.
fn derive_nav_reason(command: &Command) -> Option<NavReason> {
    match command {
        Command::NextStory | Command::PrevStory | Command::NextSegment | Command::PrevSegment => {
            Some(NavReason::Step)
        }
        Command::JumpSegment { .. } => Some(NavReason::Jump),
        Command::Gesture { request } => Some(match request {
            IndexRequest::EdgeForward { .. } => NavReason::EdgeForward,
            IndexRequest::JumpSegment { .. } => NavReason::Jump,
            IndexRequest::Story(_) | IndexRequest::Segment { .. } => NavReason::Gesture,
        }),
        Command::MediaEnded { .. } => Some(NavReason::MediaEnded),
        Command::CycleCategory | Command::SelectCategory { .. } | Command::Refresh => None,
        _ => Some(NavReason::Jump),
    }
}
