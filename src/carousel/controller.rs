use std::time::{Duration, Instant};

use crate::config::NavigationConfig;
use crate::nav::NavDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// What a committed gesture asks navigation to do. Controllers never mutate
/// navigation themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRequest {
    Story(NavDirection),
    Segment {
        story: usize,
        direction: NavDirection,
    },
    JumpSegment {
        story: usize,
        segment: usize,
    },
    /// A horizontal swipe past the first/last segment, forwarded to the story axis.
    EdgeForward {
        story: usize,
        direction: NavDirection,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub commit_distance: u16,
    pub commit_velocity: f32,
    pub edge_distance: u16,
    pub settle: Duration,
    pub edge_forwarding: bool,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}

impl GestureThresholds {
    pub fn from_config(config: &NavigationConfig) -> Self {
        Self {
            commit_distance: config.drag_commit_distance,
            commit_velocity: config.drag_commit_velocity,
            edge_distance: config.edge_swipe_threshold,
            settle: Duration::from_millis(config.settle_ms),
            edge_forwarding: config.edge_forwarding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselPhase {
    Idle,
    Dragging {
        origin: i32,
        offset: i32,
        started_at: Instant,
    },
    Settling {
        until: Instant,
    },
}

#[derive(Debug, Clone)]
pub struct CarouselController {
    axis: Axis,
    /// Owning story for horizontal controllers.
    story: Option<usize>,
    phase: CarouselPhase,
    index: usize,
    len: usize,
    thresholds: GestureThresholds,
}

impl CarouselController {
    pub fn vertical(thresholds: GestureThresholds) -> Self {
        Self {
            axis: Axis::Vertical,
            story: None,
            phase: CarouselPhase::Idle,
            index: 0,
            len: 0,
            thresholds,
        }
    }

    pub fn horizontal(story: usize, thresholds: GestureThresholds) -> Self {
        Self {
            axis: Axis::Horizontal,
            story: Some(story),
            phase: CarouselPhase::Idle,
            index: 0,
            len: 0,
            thresholds,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn story(&self) -> Option<usize> {
        self.story
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn drag_offset(&self) -> i32 {
        match self.phase {
            CarouselPhase::Dragging { offset, .. } => offset,
            _ => 0,
        }
    }

    /// Mirrors the committed index back from navigation.
    pub fn sync(&mut self, index: usize, len: usize) {
        self.index = index;
        self.len = len;
    }

    /// A press while settling interrupts the animation.
    pub fn press(&mut self, position: i32, now: Instant) {
        self.phase = CarouselPhase::Dragging {
            origin: position,
            offset: 0,
            started_at: now,
        };
    }

    pub fn drag(&mut self, position: i32) {
        if let CarouselPhase::Dragging { origin, offset, .. } = &mut self.phase {
            *offset = position - *origin;
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.phase, CarouselPhase::Dragging { .. }) {
            self.phase = CarouselPhase::Idle;
        }
    }

    /// Ends a drag. At most one request per release.
    pub fn release(&mut self, position: i32, now: Instant) -> Option<IndexRequest> {
        let CarouselPhase::Dragging {
            origin, started_at, ..
        } = self.phase
        else {
            return None;
        };
        self.phase = CarouselPhase::Settling {
            until: now + self.thresholds.settle,
        };

        let delta = position - origin;
        if delta == 0 {
            return None;
        }
        let distance = delta.unsigned_abs();
        let elapsed = now.saturating_duration_since(started_at).as_secs_f32();
        let velocity = if elapsed > 0.0 {
            distance as f32 / elapsed
        } else {
            f32::INFINITY
        };
        let committed = distance >= u32::from(self.thresholds.commit_distance)
            || velocity >= self.thresholds.commit_velocity;

        // Content follows the pointer: pulling toward the start reveals the next item.
        let direction = if delta < 0 {
            NavDirection::Forward
        } else {
            NavDirection::Backward
        };

        if self.at_edge(direction) {
            return self.edge_request(direction, distance);
        }
        if !committed {
            return None;
        }
        Some(self.request(direction))
    }

    /// Discrete input (key press, wheel notch).
    pub fn step(&mut self, direction: NavDirection) -> Option<IndexRequest> {
        if self.at_edge(direction) {
            return None;
        }
        Some(self.request(direction))
    }

    /// Pagination click on this controller's story.
    pub fn jump(&mut self, segment: usize) -> Option<IndexRequest> {
        let story = self.story?;
        if segment >= self.len || segment == self.index {
            return None;
        }
        Some(IndexRequest::JumpSegment { story, segment })
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        if let CarouselPhase::Settling { until } = self.phase
            && now >= until
        {
            self.phase = CarouselPhase::Idle;
            return true;
        }
        false
    }

    fn at_edge(&self, direction: NavDirection) -> bool {
        match direction {
            NavDirection::Backward => self.index == 0,
            NavDirection::Forward => self.index + 1 >= self.len,
        }
    }

    fn edge_request(&self, direction: NavDirection, distance: u32) -> Option<IndexRequest> {
        let story = self.story?;
        if !self.thresholds.edge_forwarding
            || distance < u32::from(self.thresholds.edge_distance)
        {
            return None;
        }
        Some(IndexRequest::EdgeForward { story, direction })
    }

    fn request(&self, direction: NavDirection) -> IndexRequest {
        match (self.axis, self.story) {
            (Axis::Horizontal, Some(story)) => IndexRequest::Segment { story, direction },
            _ => IndexRequest::Story(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{CarouselController, CarouselPhase, GestureThresholds, IndexRequest};
    use crate::nav::NavDirection;

    fn thresholds(edge_forwarding: bool) -> GestureThresholds {
        GestureThresholds {
            commit_distance: 3,
            commit_velocity: 30.0,
            edge_distance: 2,
            settle: Duration::from_millis(100),
            edge_forwarding,
        }
    }

    #[test]
    fn committed_drag_emits_exactly_one_request() {
        let mut ctl = CarouselController::vertical(thresholds(true));
        ctl.sync(1, 3);
        let t0 = Instant::now();

        ctl.press(20, t0);
        ctl.drag(15);
        assert_eq!(ctl.drag_offset(), -5);
        let request = ctl.release(14, t0 + Duration::from_secs(1));
        assert_eq!(request, Some(IndexRequest::Story(NavDirection::Forward)));
        assert!(matches!(ctl.phase(), CarouselPhase::Settling { .. }));

        assert_eq!(ctl.release(10, t0 + Duration::from_secs(2)), None);
    }

    #[test]
    fn short_slow_drag_is_aborted() {
        let mut ctl = CarouselController::vertical(thresholds(true));
        ctl.sync(1, 3);
        let t0 = Instant::now();

        ctl.press(20, t0);
        assert_eq!(ctl.release(19, t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn fast_flick_commits_below_distance() {
        let mut ctl = CarouselController::vertical(thresholds(true));
        ctl.sync(1, 3);
        let t0 = Instant::now();

        ctl.press(20, t0);
        assert_eq!(
            ctl.release(22, t0 + Duration::from_millis(20)),
            Some(IndexRequest::Story(NavDirection::Backward))
        );
    }

    #[test]
    fn cancel_returns_to_idle_without_request() {
        let mut ctl = CarouselController::horizontal(0, thresholds(true));
        ctl.sync(0, 3);
        ctl.press(10, Instant::now());
        ctl.cancel();
        assert_eq!(ctl.phase(), CarouselPhase::Idle);
        assert_eq!(ctl.release(0, Instant::now()), None);
    }

    #[test]
    fn horizontal_requests_are_scoped_to_owner_story() {
        let mut ctl = CarouselController::horizontal(4, thresholds(true));
        ctl.sync(0, 3);
        assert_eq!(
            ctl.step(NavDirection::Forward),
            Some(IndexRequest::Segment {
                story: 4,
                direction: NavDirection::Forward
            })
        );
        assert_eq!(ctl.step(NavDirection::Backward), None);
        assert_eq!(
            ctl.jump(2),
            Some(IndexRequest::JumpSegment {
                story: 4,
                segment: 2
            })
        );
        assert_eq!(ctl.jump(3), None);
        assert_eq!(ctl.jump(0), None);
    }

    #[test]
    fn horizontal_edge_swipe_forwards_only_when_enabled() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(1);

        let mut enabled = CarouselController::horizontal(1, thresholds(true));
        enabled.sync(2, 3);
        enabled.press(30, t0);
        assert_eq!(
            enabled.release(27, later),
            Some(IndexRequest::EdgeForward {
                story: 1,
                direction: NavDirection::Forward
            })
        );

        let mut disabled = CarouselController::horizontal(1, thresholds(false));
        disabled.sync(2, 3);
        disabled.press(30, t0);
        assert_eq!(disabled.release(20, later), None);

        let mut short = CarouselController::horizontal(1, thresholds(true));
        short.sync(0, 3);
        short.press(30, t0);
        assert_eq!(short.release(31, later), None);
    }

    #[test]
    fn vertical_edge_never_forwards() {
        let mut ctl = CarouselController::vertical(thresholds(true));
        ctl.sync(2, 3);
        let t0 = Instant::now();
        ctl.press(30, t0);
        assert_eq!(ctl.release(10, t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn settling_ends_after_tick_deadline() {
        let mut ctl = CarouselController::vertical(thresholds(true));
        ctl.sync(0, 3);
        let t0 = Instant::now();
        ctl.press(30, t0);
        ctl.release(20, t0);
        assert!(!ctl.tick(t0 + Duration::from_millis(50)));
        assert!(ctl.tick(t0 + Duration::from_millis(100)));
        assert_eq!(ctl.phase(), CarouselPhase::Idle);
    }
}
