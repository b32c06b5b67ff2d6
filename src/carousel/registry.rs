use std::collections::BTreeMap;
use std::time::Instant;

use tracing::trace;

use crate::nav::{NavigationState, RenderWindow};

use super::controller::{CarouselController, GestureThresholds};

/// The vertical controller plus one horizontal controller per windowed story.
#[derive(Debug, Clone)]
pub struct CarouselSet {
    vertical: CarouselController,
    horizontal: BTreeMap<usize, CarouselController>,
    thresholds: GestureThresholds,
}

impl CarouselSet {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            vertical: CarouselController::vertical(thresholds),
            horizontal: BTreeMap::new(),
            thresholds,
        }
    }

    pub fn vertical(&self) -> &CarouselController {
        &self.vertical
    }

    pub fn vertical_mut(&mut self) -> &mut CarouselController {
        &mut self.vertical
    }

    pub fn horizontal(&self, story: usize) -> Option<&CarouselController> {
        self.horizontal.get(&story)
    }

    pub fn horizontal_mut(&mut self, story: usize) -> Option<&mut CarouselController> {
        self.horizontal.get_mut(&story)
    }

    pub fn horizontal_stories(&self) -> impl Iterator<Item = usize> + '_ {
        self.horizontal.keys().copied()
    }

    /// Creates controllers for stories entering the window, drops those that left,
    /// and mirrors committed indices into every survivor.
    pub fn sync(&mut self, state: &NavigationState) {
        self.vertical
            .sync(state.active_story(), state.story_count());

        let Some(window) = RenderWindow::from_state(state) else {
            self.horizontal.clear();
            return;
        };
        self.horizontal.retain(|story, _| {
            let keep = window.contains_story(*story);
            if !keep {
                trace!(story, "horizontal carousel destroyed");
            }
            keep
        });
        for story in window.stories.clone() {
            let thresholds = self.thresholds;
            let controller = self.horizontal.entry(story).or_insert_with(|| {
                trace!(story, "horizontal carousel created");
                CarouselController::horizontal(story, thresholds)
            });
            controller.sync(
                state.segment_of(story).unwrap_or(0),
                state.segment_count(story),
            );
        }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.vertical.tick(now);
        for controller in self.horizontal.values_mut() {
            changed |= controller.tick(now);
        }
        changed
    }

    pub fn is_settled(&self) -> bool {
        use super::controller::CarouselPhase;

        matches!(self.vertical.phase(), CarouselPhase::Idle)
            && self
                .horizontal
                .values()
                .all(|controller| matches!(controller.phase(), CarouselPhase::Idle))
    }
}
