use tracing::debug;

use crate::catalog::Story;
use crate::nav::NavigationState;

use super::codec::DeepLink;

/// Where the viewer's location lives. Writes never add history entries when
/// going through [`LocationHistory::replace`].
pub trait LocationHistory: Send {
    fn current(&self) -> &str;
    fn replace(&mut self, location: &str);
    fn push(&mut self, location: &str);
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl LocationHistory for MemoryHistory {
    fn current(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or_default()
    }

    fn replace(&mut self, location: &str) {
        match self.entries.last_mut() {
            Some(last) => *last = location.to_string(),
            None => self.entries.push(location.to_string()),
        }
    }

    fn push(&mut self, location: &str) {
        self.entries.push(location.to_string());
    }
}

/// Keeps the location and navigation in agreement.
///
/// The initial link is read once at construction and applied once, as soon as
/// a non-empty catalog is available. Until then nothing is written back, so
/// the incoming link survives a slow catalog load.
pub struct DeepLinkSync<H> {
    history: H,
    pending: Option<DeepLink>,
}

impl<H: LocationHistory> DeepLinkSync<H> {
    pub fn new(history: H) -> Self {
        let link = DeepLink::parse(history.current());
        Self {
            history,
            pending: Some(link),
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn location(&self) -> &str {
        self.history.current()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves the deferred initial link against the first non-empty catalog.
    /// Returns the resulting state, or `None` if there is nothing to apply.
    pub fn apply_initial(&mut self, stories: &[Story]) -> Option<NavigationState> {
        if stories.is_empty() {
            return None;
        }
        let link = self.pending.take()?;
        debug!(story = ?link.story, segment = ?link.segment, "initial deep link applied");
        Some(NavigationState::initialize(
            stories,
            link.story.as_deref(),
            link.segment.as_deref(),
        ))
    }

    /// Replaces the location with the active ids. Returns true if it changed.
    pub fn write(&mut self, stories: &[Story], state: &NavigationState) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let Some(link) = link_for(stories, state) else {
            return false;
        };
        let location = link.to_location();
        if self.history.current() == location {
            return false;
        }
        self.history.replace(&location);
        true
    }
}

pub fn link_for(stories: &[Story], state: &NavigationState) -> Option<DeepLink> {
    let slot = state.active()?;
    let story = stories.get(slot.story)?;
    let segment = story.segments.get(slot.segment)?;
    Some(DeepLink::new(story.id.clone(), segment.id.clone()))
}
