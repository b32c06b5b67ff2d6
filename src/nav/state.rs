use tracing::debug;

use crate::catalog::Story;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Backward,
    Forward,
}

impl NavDirection {
    fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Backward => index.checked_sub(1),
            Self::Forward => (index + 1 < len).then_some(index + 1),
        }
    }
}

/// One (story, segment) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub story: usize,
    pub segment: usize,
}

impl Slot {
    pub const fn new(story: usize, segment: usize) -> Self {
        Self { story, segment }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavChange {
    pub from: Slot,
    pub to: Slot,
}

impl NavChange {
    pub fn story_changed(&self) -> bool {
        self.from.story != self.to.story
    }
}

/// Resolves a deep link into indices. Unknown ids fall back to 0.
pub fn initialize(
    stories: &[Story],
    initial_story_id: Option<&str>,
    initial_segment_id: Option<&str>,
) -> (usize, usize) {
    let story_index = initial_story_id
        .and_then(|id| stories.iter().position(|story| story.id == id))
        .unwrap_or(0);
    let segment_index = initial_segment_id
        .and_then(|id| stories.get(story_index)?.segment_index(id))
        .unwrap_or(0);
    (story_index, segment_index)
}

/// Active story plus the remembered segment of every story.
///
/// With an empty catalog there is no active slot and every movement is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    active_story: usize,
    segment_by_story: Vec<usize>,
    segment_counts: Vec<usize>,
}

impl NavigationState {
    pub fn new(stories: &[Story]) -> Self {
        Self {
            active_story: 0,
            segment_by_story: vec![0; stories.len()],
            segment_counts: stories.iter().map(|story| story.segment_count().max(1)).collect(),
        }
    }

    pub fn initialize(
        stories: &[Story],
        initial_story_id: Option<&str>,
        initial_segment_id: Option<&str>,
    ) -> Self {
        let mut state = Self::new(stories);
        if state.is_empty() {
            return state;
        }
        let (story, segment) = initialize(stories, initial_story_id, initial_segment_id);
        state.active_story = story;
        state.segment_by_story[story] = segment;
        state
    }

    pub fn is_empty(&self) -> bool {
        self.segment_counts.is_empty()
    }

    pub fn story_count(&self) -> usize {
        self.segment_counts.len()
    }

    pub fn segment_count(&self, story: usize) -> usize {
        self.segment_counts.get(story).copied().unwrap_or(0)
    }

    pub fn active_story(&self) -> usize {
        self.active_story
    }

    pub fn segment_of(&self, story: usize) -> Option<usize> {
        self.segment_by_story.get(story).copied()
    }

    pub fn active(&self) -> Option<Slot> {
        let segment = self.segment_of(self.active_story)?;
        Some(Slot::new(self.active_story, segment))
    }

    pub fn is_active(&self, slot: Slot) -> bool {
        self.active() == Some(slot)
    }

    pub fn advance_story(&mut self, direction: NavDirection) -> Option<NavChange> {
        let from = self.active()?;
        let next = direction.step(self.active_story, self.story_count())?;
        self.active_story = next;
        self.commit(from)
    }

    /// Clamped within the active story; edges are no-ops.
    pub fn advance_segment(&mut self, direction: NavDirection) -> Option<NavChange> {
        let from = self.active()?;
        let count = self.segment_count(from.story);
        let next = direction.step(from.segment, count)?;
        self.segment_by_story[from.story] = next;
        self.commit(from)
    }

    /// Like [`Self::advance_segment`], but an edge hit moves the story instead when forwarding is on.
    pub fn advance_segment_or_forward(
        &mut self,
        direction: NavDirection,
        edge_forwarding: bool,
    ) -> Option<NavChange> {
        if let Some(change) = self.advance_segment(direction) {
            return Some(change);
        }
        if !edge_forwarding {
            return None;
        }
        self.advance_story(direction)
    }

    /// Explicit jump. Out-of-range targets are ignored; a jump inside a
    /// non-active story only updates its remembered segment.
    pub fn set_segment(&mut self, story: usize, segment: usize) -> Option<NavChange> {
        let from = self.active()?;
        if segment >= self.segment_count(story) {
            debug!(story, segment, "segment jump out of bounds ignored");
            return None;
        }
        self.segment_by_story[story] = segment;
        if story != from.story {
            return None;
        }
        self.commit(from)
    }

    pub fn on_catalog_changed(&mut self, stories: &[Story]) {
        debug!(
            previous = self.story_count(),
            next = stories.len(),
            "catalog changed, navigation reset"
        );
        *self = Self::new(stories);
    }

    fn commit(&self, from: Slot) -> Option<NavChange> {
        let to = self.active()?;
        if to == from {
            return None;
        }
        debug!(
            from_story = from.story,
            from_segment = from.segment,
            to_story = to.story,
            to_segment = to.segment,
            "navigation committed"
        );
        Some(NavChange { from, to })
    }
}
