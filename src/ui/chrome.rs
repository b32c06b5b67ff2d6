use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::Mode;

use super::layout::UiLayout;

const BRAND: &str = " stv ";
const DOT_ACTIVE: &str = "●";
const DOT_IDLE: &str = "○";
/// Dots sit one column in from the footer edge, one blank column apart.
const DOT_LEFT_PAD: u16 = 1;
const DOT_STRIDE: u16 = 2;

/// Everything the header and footer rows show.
#[derive(Debug, Clone, Copy)]
pub struct ChromeView<'a> {
    pub mode: Mode,
    pub categories: &'a [String],
    pub selected_category: &'a str,
    pub story: Option<(usize, usize)>,
    pub segment: Option<(usize, usize)>,
    pub location: &'a str,
    pub playback: Option<&'a str>,
    pub message: &'a str,
}

pub fn draw_chrome(frame: &mut Frame<'_>, layout: UiLayout, view: &ChromeView<'_>) {
    frame.render_widget(Paragraph::new(header_line(view)), layout.header);

    let mode = Paragraph::new(Span::styled(
        format!(" {} ", view.mode.label()),
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Right);
    frame.render_widget(mode, layout.header);

    frame.render_widget(Paragraph::new(footer_line(view)), layout.footer);
}

fn header_line(view: &ChromeView<'_>) -> Line<'static> {
    let mut spans = vec![Span::styled(
        BRAND,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )];
    for category in view.categories {
        spans.push(Span::raw(" "));
        let style = if category.eq_ignore_ascii_case(view.selected_category) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {category} "), style));
    }
    if let Some((story, count)) = view.story {
        spans.push(Span::styled(
            format!("  story {}/{}", story + 1, count),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn footer_line(view: &ChromeView<'_>) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(usize::from(DOT_LEFT_PAD)))];
    if let Some((active, count)) = view.segment {
        for index in 0..count {
            let (dot, style) = if index == active {
                (DOT_ACTIVE, Style::default().fg(Color::White))
            } else {
                (DOT_IDLE, Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(dot, style));
            spans.push(Span::raw(" "));
        }
    }

    spans.push(Span::styled(
        format!(" {}", view.location),
        Style::default().fg(Color::Cyan),
    ));
    if let Some(playback) = view.playback {
        spans.push(Span::styled(
            format!(" | {playback}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    if !view.message.is_empty() {
        spans.push(Span::raw(format!(" | {}", view.message)));
    }
    Line::from(spans)
}

/// Cell of the pagination dot for `index` in the footer row.
pub fn pagination_dot_position(footer: Rect, index: usize) -> (u16, u16) {
    let offset = u16::try_from(index)
        .unwrap_or(u16::MAX)
        .saturating_mul(DOT_STRIDE);
    (
        footer.x.saturating_add(DOT_LEFT_PAD).saturating_add(offset),
        footer.y,
    )
}

/// The pagination dot under (`column`, `row`), if any.
pub fn pagination_dot_at(footer: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
    if row != footer.y || column >= footer.right() {
        return None;
    }
    let offset = column.checked_sub(footer.x.saturating_add(DOT_LEFT_PAD))?;
    if offset % DOT_STRIDE != 0 {
        return None;
    }
    let index = usize::from(offset / DOT_STRIDE);
    (index < count).then_some(index)
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::{ChromeView, draw_chrome, pagination_dot_at, pagination_dot_position};
    use crate::app::Mode;
    use crate::ui::split_layout;

    #[test]
    fn dot_hit_testing_matches_positions() {
        let footer = Rect::new(0, 23, 80, 1);
        for index in 0..5 {
            let (column, row) = pagination_dot_position(footer, index);
            assert_eq!(pagination_dot_at(footer, 5, column, row), Some(index));
        }
        let (column, row) = pagination_dot_position(footer, 1);
        assert_eq!(pagination_dot_at(footer, 5, column + 1, row), None);
        assert_eq!(pagination_dot_at(footer, 5, column, row - 1), None);
        assert_eq!(pagination_dot_at(footer, 1, column, row), None);
        assert_eq!(pagination_dot_at(footer, 5, 0, row), None);
    }

    #[test]
    fn chrome_renders_chips_and_dots() {
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).expect("test terminal");
        let categories = vec!["All".to_string(), "News".to_string()];
        let view = ChromeView {
            mode: Mode::Viewer,
            categories: &categories,
            selected_category: "News",
            story: Some((0, 2)),
            segment: Some((1, 3)),
            location: "/player?story=a&segment=b",
            playback: Some("playing"),
            message: "",
        };
        terminal
            .draw(|frame| draw_chrome(frame, split_layout(frame.area()), &view))
            .expect("draw should pass");

        let buffer = terminal.backend().buffer();
        let header: String = (0..60).map(|x| buffer[(x, 0)].symbol()).collect();
        assert!(header.contains(" News "));
        assert!(header.contains("VIEWER"));
        let footer: String = (0..60).map(|x| buffer[(x, 5)].symbol()).collect();
        assert!(footer.starts_with(" ○ ● ○"));
        assert!(footer.contains("/player?story=a&segment=b"));
    }
}
