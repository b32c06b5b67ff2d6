use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub header: Rect,
    pub slide: Rect,
    pub footer: Rect,
}

pub fn split_layout(area: Rect) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    UiLayout {
        header: chunks[0],
        slide: chunks[1],
        footer: chunks[2],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Moves `area` by a drag offset in cells, clipped to `bounds`.
pub(crate) fn offset_rect(area: Rect, bounds: Rect, dx: i32, dy: i32) -> Rect {
    let shift = |start: u16, len: u16, lo: u16, hi: u16, delta: i32| -> (u16, u16) {
        let from = (i32::from(start) + delta).max(i32::from(lo));
        let to = (i32::from(start) + i32::from(len) + delta).min(i32::from(hi));
        if to <= from {
            return (start, 0);
        }
        (from as u16, (to - from) as u16)
    };
    let (x, width) = shift(area.x, area.width, bounds.x, bounds.right(), dx);
    let (y, height) = shift(area.y, area.height, bounds.y, bounds.bottom(), dy);
    Rect::new(x, y, width, height)
}
