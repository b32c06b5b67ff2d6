use super::controller::Axis;

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: i32 = 2;
const AXIS_LOCK_DISTANCE: i32 = 1;

/// Decides which carousel a pointer drag belongs to, using the dominant
/// direction of the first movement (the 45° rule in screen space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerTracker {
    origin: Option<(i32, i32)>,
    axis: Option<Axis>,
}

impl PointerTracker {
    pub fn press(&mut self, column: u16, row: u16) {
        self.origin = Some((i32::from(column), i32::from(row)));
        self.axis = None;
    }

    /// Returns the axis once it is locked, along with the press origin on that axis.
    pub fn drag(&mut self, column: u16, row: u16) -> Option<(Axis, i32)> {
        let (x0, y0) = self.origin?;
        if self.axis.is_none() {
            let dx = (i32::from(column) - x0).abs();
            let dy = (i32::from(row) - y0).abs() * CELL_ASPECT;
            if dx.max(dy) < AXIS_LOCK_DISTANCE {
                return None;
            }
            self.axis = Some(if dx > dy {
                Axis::Horizontal
            } else {
                Axis::Vertical
            });
        }
        let axis = self.axis?;
        Some((axis, origin_on(axis, x0, y0)))
    }

    pub fn release(&mut self) -> Option<Axis> {
        self.origin = None;
        self.axis.take()
    }

    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }
}

pub fn position_on(axis: Axis, column: u16, row: u16) -> i32 {
    origin_on(axis, i32::from(column), i32::from(row))
}

fn origin_on(axis: Axis, x: i32, y: i32) -> i32 {
    match axis {
        Axis::Horizontal => x,
        Axis::Vertical => y,
    }
}
