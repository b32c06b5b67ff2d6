use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::ModalContent;
use crate::playback::Indicator;

use super::layout::centered_rect;
use super::text::{WrapCache, strip_html};

const ONBOARDING_LINES: [&str; 5] = [
    "Up / Down       switch stories",
    "Left / Right    switch segments",
    "Drag or scroll  swipe like a phone",
    "Space / m       play-pause / mute",
    "r               read the full story",
];

/// Media state drawn over the active slide.
pub fn draw_indicator(frame: &mut Frame<'_>, area: Rect, indicator: Indicator) {
    match indicator {
        Indicator::None => {}
        Indicator::Loading => draw_notice(frame, area, "Loading", "loading media...", Color::Yellow),
        Indicator::TapToPlay => {
            draw_notice(frame, area, "Paused", "press space or click to play", Color::White)
        }
        Indicator::Placeholder => {
            draw_notice(frame, area, "Unavailable", "this media could not load", Color::Red)
        }
    }
}

/// Shown in place of the slide when the viewer has nothing to navigate.
pub fn draw_empty_state(frame: &mut Frame<'_>, area: Rect, loading: bool, category: &str) {
    frame.render_widget(Clear, area);
    if loading {
        draw_notice(frame, area, "Stories", "loading stories...", Color::Yellow);
    } else {
        let message = format!("no stories in {category}");
        draw_notice(frame, area, "Stories", &message, Color::DarkGray);
    }
}

fn draw_notice(frame: &mut Frame<'_>, area: Rect, title: &str, message: &str, color: Color) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup_width = area.width.min(36);
    let popup_height = area.height.min(3);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let message = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(message, inner);
}

/// The "read more" modal: story title, cover reference and the full content.
pub fn draw_content_modal(
    frame: &mut Frame<'_>,
    area: Rect,
    modal: &ModalContent,
    wrap_cache: &mut WrapCache,
) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    let popup_width = area.width.saturating_sub(4).min(80);
    let popup_height = area.height.saturating_sub(2);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", modal.title))
        .title_bottom(Line::from(" Esc to close ").alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled("cover ", Style::default().fg(Color::DarkGray)),
            Span::styled(modal.cover_image.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::default(),
    ];
    let body = strip_html(&modal.html_content);
    lines.extend(wrap_cache.wrap(&body, inner.width).into_iter().map(Line::from));
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn draw_onboarding_overlay(frame: &mut Frame<'_>, area: Rect) {
    let height = u16::try_from(ONBOARDING_LINES.len()).unwrap_or(u16::MAX) + 4;
    let popup = centered_rect(area, area.width.min(44), area.height.min(height));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Welcome ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line<'_>> = ONBOARDING_LINES.iter().map(|line| Line::from(*line)).collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press Enter to start",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}
