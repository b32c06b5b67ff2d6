use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::catalog::{MediaKind, Story};
use crate::config::PlaybackConfig;
use crate::error::AppResult;
use crate::nav::{GenerationGuard, NavigationState, RenderWindow, Slot, Ticket};

use super::backend::{Activation, MediaBackend, backend_for};
use super::host::{MediaHost, MediaSignal, MediaSignalKind, MountId, PlayFuture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Unloaded,
    Loading,
    Ready,
    Playing,
    Paused,
    Failed,
}

impl PlaybackPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Failed => "failed",
        }
    }
}

/// What the active slide should show on top of its media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    None,
    Loading,
    TapToPlay,
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub kind: MediaKind,
    pub phase: PlaybackPhase,
    pub buffering: bool,
    pub muted: bool,
    pub awaiting_gesture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackPolicy {
    pub reset_on_deactivate: bool,
    pub pause_on_modal: bool,
    pub advance_on_end: bool,
}

impl PlaybackPolicy {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            reset_on_deactivate: config.reset_on_deactivate,
            pause_on_modal: config.pause_on_modal,
            advance_on_end: config.advance_on_end,
        }
    }
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

/// A play request the caller must drive to completion and hand back through
/// [`PlaybackCoordinator::settle_play`].
pub struct PendingPlay {
    pub ticket: Ticket<Slot>,
    pub future: PlayFuture,
}

impl std::fmt::Debug for PendingPlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPlay")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Playback owed to the active slot once suspension ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Nothing,
    Resume,
    Activate,
}

struct MountedSlot {
    mount: MountId,
    backend: Box<dyn MediaBackend>,
    phase: PlaybackPhase,
    /// The host reported the source loaded. Stays set across deactivation.
    loaded: bool,
    buffering: bool,
    awaiting_gesture: bool,
}

impl MountedSlot {
    fn status(&self) -> SlotStatus {
        SlotStatus {
            kind: self.backend.kind(),
            phase: self.phase,
            buffering: self.buffering,
            muted: self.backend.is_muted(),
            awaiting_gesture: self.awaiting_gesture,
        }
    }

    fn is_embed(&self) -> bool {
        matches!(self.backend.kind(), MediaKind::Youtube | MediaKind::Vimeo)
    }
}

/// Owns every mounted media backend and keeps exactly the active slot playing.
pub struct PlaybackCoordinator {
    host: Box<dyn MediaHost>,
    policy: PlaybackPolicy,
    slots: BTreeMap<Slot, MountedSlot>,
    active: Option<Slot>,
    plays: GenerationGuard<Slot>,
    next_epoch: u64,
    suspended: bool,
    deferred: Deferred,
    finished: Option<Slot>,
}

impl PlaybackCoordinator {
    pub fn new(host: Box<dyn MediaHost>, policy: PlaybackPolicy) -> Self {
        Self {
            host,
            policy,
            slots: BTreeMap::new(),
            active: None,
            plays: GenerationGuard::default(),
            next_epoch: 0,
            suspended: false,
            deferred: Deferred::Nothing,
            finished: None,
        }
    }

    pub fn active(&self) -> Option<Slot> {
        self.active
    }

    pub fn is_mounted(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn mounted(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.keys().copied()
    }

    pub fn status(&self, slot: Slot) -> Option<SlotStatus> {
        self.slots.get(&slot).map(MountedSlot::status)
    }

    pub fn phase(&self, slot: Slot) -> PlaybackPhase {
        self.slots
            .get(&slot)
            .map_or(PlaybackPhase::Unloaded, |entry| entry.phase)
    }

    pub fn indicator(&self) -> Indicator {
        let Some(entry) = self.active.and_then(|slot| self.slots.get(&slot)) else {
            return Indicator::None;
        };
        match entry.phase {
            PlaybackPhase::Failed => Indicator::Placeholder,
            PlaybackPhase::Paused => Indicator::TapToPlay,
            PlaybackPhase::Unloaded | PlaybackPhase::Loading => Indicator::Loading,
            PlaybackPhase::Ready | PlaybackPhase::Playing if entry.buffering => Indicator::Loading,
            PlaybackPhase::Ready | PlaybackPhase::Playing => Indicator::None,
        }
    }

    /// Brings mounted media in line with navigation: slots leaving the window
    /// are torn down, entering slots start loading, and the active slot changes
    /// hands. Returns the play request for a newly activated video.
    pub fn sync(&mut self, stories: &[Story], state: &NavigationState) -> Option<PendingPlay> {
        let target: BTreeSet<Slot> = RenderWindow::from_state(state)
            .map(|window| window.mounted_slots(state).into_iter().collect())
            .unwrap_or_default();
        let next_active = state.active();

        if self.active != next_active
            && let Some(previous) = self.active.take()
        {
            self.deactivate(previous);
        }

        let leaving: Vec<Slot> = self
            .slots
            .keys()
            .filter(|slot| !target.contains(slot))
            .copied()
            .collect();
        for slot in leaving {
            self.teardown(slot);
        }
        for slot in &target {
            if !self.slots.contains_key(slot) {
                self.mount(stories, *slot);
            }
        }

        if self.active == next_active {
            return None;
        }
        self.active = next_active;
        let slot = next_active?;
        if self.suspended {
            self.deferred = Deferred::Activate;
            return None;
        }
        self.start(slot, true)
    }

    /// Applies the outcome of a play request. Returns false when the request
    /// was superseded and its outcome ignored.
    pub fn settle_play(&mut self, ticket: Ticket<Slot>, result: AppResult<()>) -> bool {
        if !self.plays.is_current(&ticket) {
            debug!(
                story = ticket.key.story,
                segment = ticket.key.segment,
                generation = ticket.generation,
                "stale play settlement discarded"
            );
            return false;
        }
        let Some(entry) = self.slots.get_mut(&ticket.key) else {
            return false;
        };
        match result {
            Ok(()) => {
                entry.phase = PlaybackPhase::Playing;
                entry.awaiting_gesture = false;
            }
            Err(err) => {
                debug!(%err, "play request rejected; waiting for a gesture");
                entry.awaiting_gesture = true;
                if entry.phase != PlaybackPhase::Loading {
                    entry.phase = PlaybackPhase::Paused;
                }
            }
        }
        self.plays.invalidate();
        true
    }

    /// The active slot whose media played to the end, once per ending. Only
    /// recorded when the policy advances on end.
    pub fn take_finished(&mut self) -> Option<Slot> {
        self.finished.take()
    }

    /// Applies a load/buffering report from the host. Reports from an older
    /// mounting of the same slot are ignored.
    pub fn on_signal(&mut self, signal: MediaSignal) -> bool {
        let slot = signal.mount.slot;
        let is_active = self.active == Some(slot);
        let suspended = self.suspended;
        let Some(entry) = self
            .slots
            .get_mut(&slot)
            .filter(|entry| entry.mount == signal.mount)
        else {
            trace!(?signal, "signal for unmounted media ignored");
            return false;
        };

        match signal.kind {
            MediaSignalKind::Loaded => {
                if entry.loaded {
                    return false;
                }
                entry.loaded = true;
                // A slot deactivated mid-load stays paused.
                if entry.phase != PlaybackPhase::Loading {
                    return true;
                }
                entry.phase = if entry.awaiting_gesture {
                    PlaybackPhase::Paused
                } else {
                    PlaybackPhase::Ready
                };
                // Embeds ignore commands posted before the frame loaded.
                if is_active
                    && !suspended
                    && entry.is_embed()
                    && matches!(entry.backend.activate(), Activation::Fired)
                {
                    entry.phase = PlaybackPhase::Playing;
                }
            }
            MediaSignalKind::Failed(message) => {
                warn!(
                    story = slot.story,
                    segment = slot.segment,
                    %message,
                    "media failed to load"
                );
                entry.phase = PlaybackPhase::Failed;
                entry.buffering = false;
                if is_active {
                    self.plays.invalidate();
                }
            }
            MediaSignalKind::Waiting => {
                if !is_active {
                    return false;
                }
                entry.buffering = true;
            }
            MediaSignalKind::Playing => {
                entry.buffering = false;
                if is_active && entry.phase == PlaybackPhase::Ready {
                    entry.phase = PlaybackPhase::Playing;
                }
            }
            MediaSignalKind::Ended => {
                if !is_active || entry.phase != PlaybackPhase::Playing {
                    return false;
                }
                entry.phase = PlaybackPhase::Paused;
                entry.buffering = false;
                if self.policy.advance_on_end {
                    self.finished = Some(slot);
                }
            }
        }
        true
    }

    pub fn toggle_play(&mut self) -> Option<PendingPlay> {
        let slot = self.active?;
        self.host.note_user_gesture();
        let entry = self.slots.get_mut(&slot)?;
        match entry.phase {
            PlaybackPhase::Playing => {
                entry.backend.pause();
                entry.phase = PlaybackPhase::Paused;
                self.plays.invalidate();
                None
            }
            PlaybackPhase::Ready | PlaybackPhase::Paused => self.start(slot, false),
            PlaybackPhase::Unloaded | PlaybackPhase::Loading | PlaybackPhase::Failed => None,
        }
    }

    /// Returns the new muted state of the active media.
    pub fn toggle_mute(&mut self) -> Option<bool> {
        let slot = self.active?;
        self.host.note_user_gesture();
        let entry = self.slots.get_mut(&slot)?;
        if !entry.backend.kind().is_playable() {
            return None;
        }
        let muted = !entry.backend.is_muted();
        entry.backend.set_muted(muted);
        Some(muted)
    }

    /// Pauses the active media while something covers it, and resumes it when
    /// uncovered if it was playing before.
    pub fn set_suspended(&mut self, suspended: bool) -> Option<PendingPlay> {
        if !self.policy.pause_on_modal || self.suspended == suspended {
            return None;
        }
        self.suspended = suspended;
        let slot = self.active?;

        if suspended {
            let entry = self.slots.get_mut(&slot)?;
            let pending = self.plays.is_current(&Ticket {
                key: slot,
                generation: self.plays.generation(),
            });
            if entry.phase == PlaybackPhase::Playing || pending {
                self.deferred = Deferred::Resume;
                entry.backend.pause();
                if entry.phase == PlaybackPhase::Playing {
                    entry.phase = PlaybackPhase::Paused;
                }
                self.plays.invalidate();
            }
            return None;
        }

        match std::mem::replace(&mut self.deferred, Deferred::Nothing) {
            Deferred::Nothing => None,
            Deferred::Resume => self.start(slot, false),
            Deferred::Activate => self.start(slot, true),
        }
    }

    /// Tears down everything, e.g. before the catalog is replaced.
    pub fn reset(&mut self) {
        let slots: Vec<Slot> = self.slots.keys().copied().collect();
        for slot in slots {
            self.teardown(slot);
        }
        self.active = None;
        self.deferred = Deferred::Nothing;
        self.finished = None;
        self.plays.invalidate();
    }

    fn mount(&mut self, stories: &[Story], slot: Slot) {
        let Some(segment) = stories
            .get(slot.story)
            .and_then(|story| story.segments.get(slot.segment))
        else {
            return;
        };
        self.next_epoch += 1;
        let mount = MountId {
            slot,
            epoch: self.next_epoch,
        };
        let mut backend = backend_for(segment, mount, self.host.as_mut());
        let phase = match backend.mount() {
            Ok(()) => PlaybackPhase::Loading,
            Err(err) => {
                warn!(%err, "media could not be mounted");
                PlaybackPhase::Failed
            }
        };
        trace!(story = slot.story, segment = slot.segment, kind = backend.kind().as_str(), "mounted");
        self.slots.insert(
            slot,
            MountedSlot {
                mount,
                backend,
                phase,
                loaded: false,
                buffering: false,
                awaiting_gesture: false,
            },
        );
    }

    fn teardown(&mut self, slot: Slot) {
        if let Some(mut entry) = self.slots.remove(&slot) {
            entry.backend.unmount();
            trace!(story = slot.story, segment = slot.segment, "unmounted");
        }
        if self.active == Some(slot) {
            self.plays.invalidate();
        }
    }

    fn deactivate(&mut self, slot: Slot) {
        self.plays.invalidate();
        self.deferred = Deferred::Nothing;
        self.finished = None;
        let Some(entry) = self.slots.get_mut(&slot) else {
            return;
        };
        entry.backend.deactivate(self.policy.reset_on_deactivate);
        entry.awaiting_gesture = false;
        entry.buffering = false;
        if entry.backend.kind().is_playable()
            && matches!(
                entry.phase,
                PlaybackPhase::Loading | PlaybackPhase::Ready | PlaybackPhase::Playing
            )
        {
            entry.phase = PlaybackPhase::Paused;
        }
    }

    fn start(&mut self, slot: Slot, from_start: bool) -> Option<PendingPlay> {
        let entry = self.slots.get_mut(&slot)?;
        if entry.phase == PlaybackPhase::Failed {
            return None;
        }
        if entry.phase == PlaybackPhase::Paused && !entry.loaded {
            entry.phase = PlaybackPhase::Loading;
        }
        let activation = if from_start {
            entry.backend.activate()
        } else {
            entry.backend.resume()
        };
        match activation {
            Activation::Pending(future) => {
                entry.awaiting_gesture = false;
                let ticket = self.plays.issue(slot);
                Some(PendingPlay { ticket, future })
            }
            Activation::Fired => {
                if !matches!(entry.phase, PlaybackPhase::Loading | PlaybackPhase::Unloaded) {
                    entry.phase = PlaybackPhase::Playing;
                }
                None
            }
            Activation::Static => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Indicator, PlaybackCoordinator, PlaybackPhase, PlaybackPolicy};
    use crate::catalog::fixtures::{catalog, story};
    use crate::catalog::{MediaKind, Story};
    use crate::error::AppError;
    use crate::nav::{NavDirection, NavigationState, Slot};
    use crate::playback::host::testing::{HostCall, RecordingHost};
    use crate::playback::host::{MediaSignal, MediaSignalKind, MountId};

    fn videos(counts: &[usize]) -> Vec<Story> {
        counts
            .iter()
            .enumerate()
            .map(|(idx, count)| story(&format!("v{idx}"), "Geral", &vec![MediaKind::Video; *count]))
            .collect()
    }

    fn coordinator(host: &RecordingHost) -> PlaybackCoordinator {
        PlaybackCoordinator::new(Box::new(host.clone()), PlaybackPolicy::default())
    }

    fn mount_of(host: &RecordingHost, slot: Slot) -> MountId {
        host.calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                HostCall::Source { mount, url: Some(_) } if mount.slot == slot => Some(*mount),
                _ => None,
            })
            .expect("slot was mounted")
    }

    fn loaded(host: &RecordingHost, slot: Slot) -> MediaSignal {
        MediaSignal {
            mount: mount_of(host, slot),
            kind: MediaSignalKind::Loaded,
        }
    }

    #[test]
    fn mounts_only_windowed_slots() {
        let stories = catalog(&[5, 2, 2, 2]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        playback.sync(&stories, &state);

        let mounted: Vec<Slot> = playback.mounted().collect();
        assert_eq!(
            mounted,
            vec![Slot::new(0, 0), Slot::new(0, 1), Slot::new(1, 0)]
        );
    }

    #[test]
    fn activation_resets_mutes_and_requests_play() {
        let stories = videos(&[2]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let pending = playback.sync(&stories, &state).expect("play requested");
        assert_eq!(pending.ticket.key, Slot::new(0, 0));
        let mount = mount_of(&host, Slot::new(0, 0));
        let calls = host.calls();
        assert!(calls.contains(&HostCall::Seek { mount, seconds: 0.0 }));
        assert!(calls.contains(&HostCall::Muted { mount, muted: true }));
        assert!(calls.contains(&HostCall::Play(mount)));
        assert_eq!(playback.indicator(), Indicator::Loading);

        assert!(playback.settle_play(pending.ticket, Ok(())));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Playing);
        assert_eq!(playback.indicator(), Indicator::None);
    }

    #[test]
    fn stale_play_settlement_is_ignored() {
        let stories = videos(&[2]);
        let mut state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let first = playback.sync(&stories, &state).expect("play for A");
        playback.on_signal(loaded(&host, Slot::new(0, 0)));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Ready);

        state.advance_segment(NavDirection::Forward);
        let second = playback.sync(&stories, &state).expect("play for B");
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);

        assert!(!playback.settle_play(first.ticket, Ok(())));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);

        assert!(playback.settle_play(second.ticket, Ok(())));
        assert_eq!(playback.phase(Slot::new(0, 1)), PlaybackPhase::Playing);
    }

    #[test]
    fn superseded_slot_stays_paused_through_its_late_load() {
        let stories = videos(&[2]);
        let mut state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let first = playback.sync(&stories, &state).expect("play for A");
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Loading);

        state.advance_segment(NavDirection::Forward);
        let second = playback.sync(&stories, &state).expect("play for B");
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);

        assert!(!playback.settle_play(first.ticket, Err(AppError::unsupported("aborted"))));
        assert!(playback.on_signal(loaded(&host, Slot::new(0, 0))));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);

        assert!(playback.settle_play(second.ticket, Ok(())));
        assert_eq!(playback.phase(Slot::new(0, 1)), PlaybackPhase::Playing);
    }

    #[test]
    fn reactivated_unloaded_slot_shows_loading_until_played() {
        let stories = videos(&[2]);
        let mut state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        playback.sync(&stories, &state);
        state.advance_segment(NavDirection::Forward);
        playback.sync(&stories, &state);
        state.advance_segment(NavDirection::Backward);
        let again = playback.sync(&stories, &state).expect("play for A again");

        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Loading);
        assert_eq!(playback.indicator(), Indicator::Loading);
        assert!(playback.settle_play(again.ticket, Ok(())));
        assert_eq!(playback.indicator(), Indicator::None);
    }

    #[test]
    fn buffering_on_active_slot_shows_loading() {
        let stories = videos(&[1]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.on_signal(loaded(&host, Slot::new(0, 0)));
        playback.settle_play(pending.ticket, Ok(()));
        assert_eq!(playback.indicator(), Indicator::None);

        let mount = mount_of(&host, Slot::new(0, 0));
        assert!(playback.on_signal(MediaSignal {
            mount,
            kind: MediaSignalKind::Waiting,
        }));
        assert_eq!(playback.indicator(), Indicator::Loading);
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Playing);

        assert!(playback.on_signal(MediaSignal {
            mount,
            kind: MediaSignalKind::Playing,
        }));
        assert_eq!(playback.indicator(), Indicator::None);
    }

    #[test]
    fn ended_active_video_is_reported_once() {
        let stories = videos(&[2]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.settle_play(pending.ticket, Ok(()));

        let ended = |slot| MediaSignal {
            mount: mount_of(&host, slot),
            kind: MediaSignalKind::Ended,
        };
        assert!(!playback.on_signal(ended(Slot::new(0, 1))));
        assert_eq!(playback.take_finished(), None);

        assert!(playback.on_signal(ended(Slot::new(0, 0))));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);
        assert_eq!(playback.take_finished(), Some(Slot::new(0, 0)));
        assert_eq!(playback.take_finished(), None);
    }

    #[test]
    fn ended_video_is_not_reported_when_advance_is_off() {
        let stories = videos(&[2]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let policy = PlaybackPolicy {
            advance_on_end: false,
            ..PlaybackPolicy::default()
        };
        let mut playback = PlaybackCoordinator::new(Box::new(host.clone()), policy);
        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.settle_play(pending.ticket, Ok(()));

        assert!(playback.on_signal(MediaSignal {
            mount: mount_of(&host, Slot::new(0, 0)),
            kind: MediaSignalKind::Ended,
        }));
        assert_eq!(playback.take_finished(), None);
        assert_eq!(playback.indicator(), Indicator::TapToPlay);
    }

    #[test]
    fn at_most_one_slot_is_playing() {
        let stories = videos(&[3, 3]);
        let mut state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let moves = [
            NavDirection::Forward,
            NavDirection::Forward,
            NavDirection::Backward,
        ];
        if let Some(pending) = playback.sync(&stories, &state) {
            playback.settle_play(pending.ticket, Ok(()));
        }
        for direction in moves {
            state.advance_segment(direction);
            if let Some(pending) = playback.sync(&stories, &state) {
                playback.settle_play(pending.ticket, Ok(()));
            }
            state.advance_story(direction);
            if let Some(pending) = playback.sync(&stories, &state) {
                playback.settle_play(pending.ticket, Ok(()));
            }
            let playing: Vec<Slot> = playback
                .mounted()
                .filter(|slot| playback.phase(*slot) == PlaybackPhase::Playing)
                .collect();
            assert!(playing.len() <= 1, "{playing:?}");
            if let Some(slot) = playing.first() {
                assert_eq!(Some(*slot), state.active());
            }
        }
    }

    #[test]
    fn rejected_autoplay_waits_for_a_gesture() {
        let stories = videos(&[1]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.on_signal(loaded(&host, Slot::new(0, 0)));
        playback.settle_play(pending.ticket, Err(AppError::unsupported("blocked")));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);
        assert_eq!(playback.indicator(), Indicator::TapToPlay);

        let retry = playback.toggle_play().expect("tap retries play");
        assert!(host.calls().contains(&HostCall::Gesture));
        playback.settle_play(retry.ticket, Ok(()));
        assert_eq!(playback.indicator(), Indicator::None);
    }

    #[test]
    fn load_failure_shows_placeholder_without_retry() {
        let stories = videos(&[1]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let pending = playback.sync(&stories, &state).expect("play requested");
        let mount = mount_of(&host, Slot::new(0, 0));
        playback.on_signal(MediaSignal {
            mount,
            kind: MediaSignalKind::Failed("404".to_string()),
        });
        assert_eq!(playback.indicator(), Indicator::Placeholder);
        assert!(!playback.settle_play(pending.ticket, Ok(())));
        assert!(playback.toggle_play().is_none());
    }

    #[test]
    fn signals_from_previous_mount_are_ignored() {
        let stories = videos(&[1, 1, 1]);
        let mut state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        playback.sync(&stories, &state);
        let old_mount = mount_of(&host, Slot::new(0, 0));

        state.advance_story(NavDirection::Forward);
        state.advance_story(NavDirection::Forward);
        playback.sync(&stories, &state);
        assert!(!playback.is_mounted(Slot::new(0, 0)));

        state.advance_story(NavDirection::Backward);
        state.advance_story(NavDirection::Backward);
        playback.sync(&stories, &state);
        assert!(!playback.on_signal(MediaSignal {
            mount: old_mount,
            kind: MediaSignalKind::Loaded,
        }));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Loading);
    }

    #[test]
    fn embeds_replay_commands_once_loaded() {
        let mut stories = videos(&[1]);
        stories[0].segments[0].media_kind = MediaKind::Youtube;
        stories[0].segments[0].media_url = "https://youtu.be/dQw4w9WgXcQ".to_string();
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        assert!(playback.sync(&stories, &state).is_none());
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Loading);

        let signal = loaded(&host, Slot::new(0, 0));
        host.clear();
        playback.on_signal(signal);
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Playing);
        let posts: Vec<String> = host
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Post { message, .. } => Some(message),
                _ => None,
            })
            .collect();
        assert!(posts.iter().any(|message| message.contains("playVideo")));
        assert!(posts.iter().any(|message| message.contains("\"mute\"")));
    }

    #[test]
    fn unparseable_embed_fails_on_mount() {
        let mut stories = videos(&[1]);
        stories[0].segments[0].media_kind = MediaKind::Vimeo;
        stories[0].segments[0].media_url = "https://example.com/nothing".to_string();
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        playback.sync(&stories, &state);
        assert_eq!(playback.indicator(), Indicator::Placeholder);
    }

    #[test]
    fn suspension_pauses_and_resumes_active_media() {
        let stories = videos(&[1]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);

        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.on_signal(loaded(&host, Slot::new(0, 0)));
        playback.settle_play(pending.ticket, Ok(()));

        assert!(playback.set_suspended(true).is_none());
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);

        let resumed = playback.set_suspended(false).expect("resume after modal");
        playback.settle_play(resumed.ticket, Ok(()));
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Playing);
    }

    #[test]
    fn activation_while_suspended_is_deferred() {
        let stories = videos(&[2]);
        let mut state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        let first = playback.sync(&stories, &state).expect("play requested");
        playback.settle_play(first.ticket, Ok(()));

        playback.set_suspended(true);
        state.advance_segment(NavDirection::Forward);
        assert!(playback.sync(&stories, &state).is_none());

        let mount = mount_of(&host, Slot::new(0, 1));
        host.clear();
        let pending = playback.set_suspended(false).expect("deferred activation");
        assert_eq!(pending.ticket.key, Slot::new(0, 1));
        assert!(host.calls().contains(&HostCall::Seek { mount, seconds: 0.0 }));
    }

    #[test]
    fn user_pause_and_mute_toggle() {
        let stories = videos(&[1]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.settle_play(pending.ticket, Ok(()));

        assert!(playback.toggle_play().is_none());
        assert_eq!(playback.phase(Slot::new(0, 0)), PlaybackPhase::Paused);
        assert_eq!(playback.toggle_mute(), Some(false));
        assert_eq!(playback.toggle_mute(), Some(true));
    }

    #[test]
    fn reset_unmounts_everything() {
        let stories = videos(&[2, 2]);
        let state = NavigationState::new(&stories);
        let host = RecordingHost::default();
        let mut playback = coordinator(&host);
        let pending = playback.sync(&stories, &state).expect("play requested");
        playback.reset();
        assert_eq!(playback.mounted().count(), 0);
        assert_eq!(playback.active(), None);
        assert!(!playback.settle_play(pending.ticket, Ok(())));
    }
}
