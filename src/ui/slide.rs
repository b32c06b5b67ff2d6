use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::catalog::{Segment, TextSize, VerticalAnchor};

use super::layout::offset_rect;
use super::text::{WrapCache, strip_html};

const SIDE_MARGIN: u16 = 2;

/// The active segment plus its playback and drag state.
#[derive(Debug, Clone, Copy)]
pub struct SlideView<'a> {
    pub story_title: &'a str,
    pub segment: &'a Segment,
    pub phase: Option<&'a str>,
    pub muted: bool,
    /// Carousel drag offsets in cells: horizontal, vertical.
    pub drag: (i32, i32),
}

pub fn draw_slide(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &SlideView<'_>,
    wrap_cache: &mut WrapCache,
) {
    frame.render_widget(Clear, area);
    let (dx, dy) = view.drag;
    let area = offset_rect(area, area, dx, dy);
    if area.width <= SIDE_MARGIN * 2 || area.height == 0 {
        return;
    }

    let segment = view.segment;
    if segment.show_overlay {
        let scrim = Block::default().style(Style::default().bg(Color::Rgb(20, 20, 24)));
        frame.render_widget(scrim, area);
    }

    let text_width = area.width - SIDE_MARGIN * 2;
    let mut lines = vec![media_line(view), Line::default()];
    if let Some(title) = segment.title.as_deref().filter(|title| !title.is_empty()) {
        for line in wrap_cache.wrap(&styled_title(title, segment.layout.text_size), text_width) {
            lines.push(Line::from(Span::styled(
                line,
                title_style(segment.layout.text_size),
            )));
        }
    }
    if let Some(html) = segment.description_html.as_deref() {
        let text = strip_html(html);
        if !text.is_empty() {
            lines.push(Line::default());
            lines.extend(wrap_cache.wrap(&text, text_width).into_iter().map(Line::from));
        }
    }
    if segment.show_button {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("[ Read more: {} ]  (r)", view.story_title),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    }

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).min(area.height);
    let top = anchored_top(area, height, segment.layout.vertical_anchor);
    let content = Rect::new(area.x + SIDE_MARGIN, top, text_width, height);
    frame.render_widget(Paragraph::new(lines), content);
}

fn media_line(view: &SlideView<'_>) -> Line<'static> {
    let segment = view.segment;
    let mut spans = vec![
        Span::styled(
            format!("[{}]", segment.media_kind.as_str()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
            segment.media_url.clone(),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(phase) = view.phase {
        spans.push(Span::raw(format!("  {phase}")));
    }
    if view.muted {
        spans.push(Span::styled(" muted", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn styled_title(title: &str, size: TextSize) -> String {
    match size {
        TextSize::Large => title.to_uppercase(),
        TextSize::Small | TextSize::Medium => title.to_string(),
    }
}

fn title_style(size: TextSize) -> Style {
    match size {
        TextSize::Small => Style::default(),
        TextSize::Medium => Style::default().add_modifier(Modifier::BOLD),
        TextSize::Large => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    }
}

pub(crate) fn anchored_top(area: Rect, height: u16, anchor: VerticalAnchor) -> u16 {
    let free = area.height.saturating_sub(height);
    match anchor {
        VerticalAnchor::Top => area.y,
        VerticalAnchor::Center => area.y + free / 2,
        VerticalAnchor::Bottom => area.y + free,
    }
}
