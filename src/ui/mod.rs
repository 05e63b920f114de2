mod catalog;
mod detail;
mod help;

use crate::app::{App, View};
use crate::config::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Block,
};
use unicode_width::UnicodeWidthStr;

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub emphasis: Color,
    pub success: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::Reset,
                fg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Green,
                highlight_bg: Color::LightGreen,
                emphasis: Color::Yellow,
                success: Color::Green,
                error: Color::Red,
            },
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                muted: Color::Gray,
                accent: Color::LightGreen,
                highlight_bg: Color::DarkGray,
                emphasis: Color::LightYellow,
                success: Color::LightGreen,
                error: Color::LightRed,
            },
        }
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    let palette = Palette::for_theme(app.theme());
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)), frame.area());

    match app.view {
        View::Catalog => catalog::render(app, &palette, frame),
        View::Detail => detail::render(app, &palette, frame),
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(&palette, frame);
    }
}

/// Status-bar spans for `(key, label)` pairs followed by the status message.
fn key_hints<'a>(palette: &Palette, hints: &[(&'a str, &'a str)], status: &'a str) -> Line<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 2 + 1);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {}", key), palette.key()));
        spans.push(Span::raw(format!(" {} ", label)));
    }
    spans.push(Span::styled(format!(" {}", status), palette.dim()));
    Line::from(spans)
}

/// Column for a text cursor `offset + width(text)` cells into `area`.
/// `None` when it would land on or past the right border.
fn cursor_column(area: Rect, offset: u16, text: &str) -> Option<u16> {
    let width = u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(offset).saturating_add(width);
    let limit = area.x.saturating_add(area.width.saturating_sub(1));
    (x < limit).then_some(x)
}
