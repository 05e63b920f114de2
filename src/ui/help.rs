use crate::ui::Palette;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("t", "Toggle light/dark theme"),
            ("q", "Quit (Back on the detail view)"),
            ("Ctrl+C", "Quit immediately"),
        ],
    ),
    (
        "Catalog",
        &[
            ("↑/k ↓/j", "Navigate up/down"),
            ("g/G", "Jump to first/last product"),
            ("/", "Search name, brand and description"),
            ("←/→ Tab", "Cycle category filter"),
            ("Esc", "Clear search"),
            ("Enter", "Open product detail"),
            ("r", "Reload products"),
        ],
    ),
    (
        "Product Detail",
        &[
            ("↑/↓", "Scroll reviews"),
            ("PgUp/PgDn", "Scroll page up/down"),
            ("f", "Write feedback"),
            ("Tab", "Switch between name and message"),
            ("Enter", "Send feedback"),
            ("r", "Reload product"),
            ("Esc", "Back to products"),
        ],
    ),
];

pub fn render(palette: &Palette, frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let key_style = Style::default().fg(palette.emphasis);
    let mut help_text = vec![Line::from("")];
    for (title, bindings) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )));
        for (key, action) in *bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {:<12}", key), key_style),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(palette.dim())),
        )
        .style(Style::default().fg(palette.fg).bg(palette.bg));

    frame.render_widget(help, area);
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
