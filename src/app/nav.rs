use tracing::debug;

use crate::carousel::IndexRequest;
use crate::catalog::Story;
use crate::nav::{NavChange, NavDirection, Slot};

use super::core::{EngineSubsystem, PendingWork};

impl EngineSubsystem {
    /// Applies one controller request to navigation, then brings every
    /// mirror of the navigation state up to date.
    pub fn apply_request(
        &mut self,
        stories: &[Story],
        request: IndexRequest,
        pending: &mut PendingWork,
    ) -> Option<NavChange> {
        let active = self.nav.active_story();
        let change = match request {
            IndexRequest::Story(direction) => self.nav.advance_story(direction),
            IndexRequest::JumpSegment { story, segment } => self.nav.set_segment(story, segment),
            IndexRequest::Segment { story, direction } if story == active => {
                self.nav.advance_segment(direction)
            }
            IndexRequest::EdgeForward { story, direction } if story == active => self
                .nav
                .advance_segment_or_forward(direction, self.edge_forwarding),
            IndexRequest::Segment { story, .. } | IndexRequest::EdgeForward { story, .. } => {
                debug!(story, active, "request from a non-active story ignored");
                None
            }
        };
        self.sync(stories, pending);
        change
    }

    /// Where a finished video leads: the next segment, or the next story
    /// from the last one. `None` once `slot` is no longer active.
    pub fn end_of_media_request(&self, slot: Slot) -> Option<IndexRequest> {
        if self.nav.active() != Some(slot) {
            return None;
        }
        if slot.segment + 1 < self.nav.segment_count(slot.story) {
            Some(IndexRequest::Segment {
                story: slot.story,
                direction: NavDirection::Forward,
            })
        } else {
            Some(IndexRequest::Story(NavDirection::Forward))
        }
    }

    /// Carousels first, then mounted media, then the location.
    pub fn sync(&mut self, stories: &[Story], pending: &mut PendingWork) {
        self.carousels.sync(&self.nav);
        if let Some(play) = self.playback.sync(stories, &self.nav) {
            pending.plays.push(play);
        }
        self.deeplink.write(stories, &self.nav);
    }

    /// Starts over on a new catalog. A deep link still waiting for its first
    /// catalog is resolved here; otherwise navigation resets to the start.
    pub fn replace_catalog(&mut self, stories: &[Story], pending: &mut PendingWork) {
        self.playback.reset();
        match self.deeplink.apply_initial(stories) {
            Some(state) => self.nav = state,
            None => self.nav.on_catalog_changed(stories),
        }
        self.sync(stories, pending);
    }

    pub fn set_suspended(&mut self, suspended: bool, pending: &mut PendingWork) {
        if let Some(play) = self.playback.set_suspended(suspended) {
            pending.plays.push(play);
        }
    }
}
