use std::ops::RangeInclusive;

use super::state::{NavigationState, Slot};

const WINDOW_RADIUS: usize = 1;

/// Slots eligible to mount media: active story ± 1 and, inside the active
/// story, active segment ± 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWindow {
    pub stories: RangeInclusive<usize>,
    pub segments: RangeInclusive<usize>,
    pub active: Slot,
}

impl RenderWindow {
    pub fn from_state(state: &NavigationState) -> Option<Self> {
        let active = state.active()?;
        Some(Self {
            stories: radius_range(active.story, state.story_count()),
            segments: radius_range(active.segment, state.segment_count(active.story)),
            active,
        })
    }

    pub fn contains_story(&self, story: usize) -> bool {
        self.stories.contains(&story)
    }

    pub fn contains_segment(&self, segment: usize) -> bool {
        self.segments.contains(&segment)
    }

    /// Active story's windowed segments, plus the remembered segment of each
    /// neighbouring story so a story swipe lands on already-loaded media.
    pub fn mounted_slots(&self, state: &NavigationState) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .segments
            .clone()
            .map(|segment| Slot::new(self.active.story, segment))
            .collect();
        for story in self.stories.clone() {
            if story == self.active.story {
                continue;
            }
            if let Some(segment) = state.segment_of(story) {
                slots.push(Slot::new(story, segment));
            }
        }
        slots.sort();
        slots
    }

    pub fn is_mounted(&self, state: &NavigationState, slot: Slot) -> bool {
        if !self.contains_story(slot.story) {
            return false;
        }
        if slot.story == self.active.story {
            return self.contains_segment(slot.segment);
        }
        state.segment_of(slot.story) == Some(slot.segment)
    }
}

fn radius_range(center: usize, len: usize) -> RangeInclusive<usize> {
    let start = center.saturating_sub(WINDOW_RADIUS);
    let end = center
        .saturating_add(WINDOW_RADIUS)
        .min(len.saturating_sub(1));
    start..=end
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::RenderWindow;
    use crate::catalog::fixtures::catalog;
    use crate::nav::state::{NavDirection, NavigationState, Slot};

    #[test]
    fn window_clamps_at_catalog_edges() {
        let stories = catalog(&[3, 1, 4]);
        let state = NavigationState::new(&stories);
        let window = RenderWindow::from_state(&state).expect("window");
        assert_eq!(window.stories, 0..=1);
        assert_eq!(window.segments, 0..=1);
    }

    #[test]
    fn mounted_slots_cover_neighbours_once() {
        let stories = catalog(&[3, 4, 2]);
        let mut state = NavigationState::new(&stories);
        state.set_segment(2, 1);
        state.advance_story(NavDirection::Forward);
        state.advance_segment(NavDirection::Forward);
        state.advance_segment(NavDirection::Forward);

        let window = RenderWindow::from_state(&state).expect("window");
        assert_eq!(
            window.mounted_slots(&state),
            vec![
                Slot::new(0, 0),
                Slot::new(1, 1),
                Slot::new(1, 2),
                Slot::new(1, 3),
                Slot::new(2, 1),
            ]
        );
        assert!(window.is_mounted(&state, Slot::new(2, 1)));
        assert!(!window.is_mounted(&state, Slot::new(2, 0)));
        assert!(!window.is_mounted(&state, Slot::new(1, 0)));
    }

    #[test]
    fn empty_catalog_has_no_window() {
        assert!(RenderWindow::from_state(&NavigationState::new(&[])).is_none());
    }

    proptest! {
        #[test]
        fn window_stays_in_bounds_and_holds_active(
            counts in prop::collection::vec(1_usize..6, 1..12),
            steps in prop::collection::vec(any::<(bool, bool)>(), 0..30),
        ) {
            let stories = catalog(&counts);
            let mut state = NavigationState::new(&stories);
            for (vertical, forward) in steps {
                let dir = if forward { NavDirection::Forward } else { NavDirection::Backward };
                if vertical {
                    state.advance_story(dir);
                } else {
                    state.advance_segment(dir);
                }

                let window = RenderWindow::from_state(&state).expect("window");
                prop_assert!(*window.stories.end() < counts.len());
                prop_assert!(window.contains_story(state.active_story()));
                prop_assert!(window.stories.clone().count() <= 3);
                prop_assert!(window.segments.clone().count() <= 3);
                prop_assert!(*window.segments.end() < counts[window.active.story]);
                prop_assert!(window.mounted_slots(&state).contains(&window.active));
            }
        }
    }
}
