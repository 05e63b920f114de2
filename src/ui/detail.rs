use crate::app::{App, FormField, InputMode, SubmitStatus};
use crate::format::{initials, relative_time, review_count};
use crate::ui::{Palette, cursor_column, key_hints};
use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &App, palette: &Palette, frame: &mut Frame) {
    let area = frame.area();
    let detail = &app.detail;

    if detail.is_loading() {
        let loading = Paragraph::new(" Loading product details...")
            .style(palette.dim())
            .block(Block::default().borders(Borders::ALL).border_style(palette.dim()));
        frame.render_widget(loading, area);
        return;
    }

    let Some(product) = detail.product() else {
        let missing = Paragraph::new(" Product not found. Press Esc to go back to products.")
            .style(Style::default().fg(palette.error))
            .block(Block::default().borders(Borders::ALL).border_style(palette.dim()));
        frame.render_widget(missing, area);
        return;
    };

    let notice_height = if detail.error().is_some() { 3 } else { 0 };

    // Layout: notice + header(5) + body(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(notice_height),
            Constraint::Length(5),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Error notice ──
    if let Some(error) = detail.error() {
        let notice = Paragraph::new(format!(" {}  Showing sample content.", error))
            .style(Style::default().fg(palette.error))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.error)),
            );
        frame.render_widget(notice, chunks[0]);
    }

    // ── Metadata header ──
    let mut first_line = vec![
        Span::styled(
            format!(" {}", product.name),
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Brand: ", palette.dim()),
        Span::styled(&product.brand, Style::default().fg(palette.accent)),
    ];
    if !product.certification.is_empty() {
        first_line.push(Span::raw("   "));
        first_line.push(Span::styled(
            format!("✔ {}", product.certification),
            Style::default().fg(palette.success),
        ));
    }
    let meta_lines = vec![
        Line::from(first_line),
        Line::from(vec![
            Span::styled(" Category: ", palette.dim()),
            Span::styled(&product.category, Style::default().fg(palette.fg)),
            Span::raw("   "),
            Span::styled("ID: ", palette.dim()),
            Span::styled(&product.id, Style::default().fg(palette.fg)),
        ]),
        Line::from(vec![
            Span::styled(" Image: ", palette.dim()),
            Span::styled(
                &product.image,
                Style::default().fg(palette.accent).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ];
    let meta = Paragraph::new(meta_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.dim())
            .title(" Product Detail "),
    );
    frame.render_widget(meta, chunks[1]);

    // ── Body: description + reviews | form ──
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    render_reviews(app, palette, frame, body[0]);
    render_form(app, palette, frame, body[1]);

    // ── Status bar ──
    let status = if app.input_mode == InputMode::Feedback {
        key_hints(
            palette,
            &[("Tab", "Switch field"), ("Enter", "Send"), ("Esc", "Cancel")],
            &app.status_msg,
        )
    } else {
        key_hints(
            palette,
            &[
                ("↑↓/PgUp/PgDn", "Scroll"),
                ("f", "Write feedback"),
                ("r", "Reload"),
                ("t", "Theme"),
                ("Esc", "Back"),
            ],
            &app.status_msg,
        )
    };
    frame.render_widget(Paragraph::new(status), chunks[3]);
}

fn render_reviews(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let detail = &app.detail;
    let now = Utc::now();
    let mut lines = Vec::new();

    if let Some(product) = detail.product() {
        lines.push(Line::from(Span::styled(" About this product", palette.key())));
        lines.push(Line::from(format!(" {}", product.description)));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" Customer Reviews ", palette.key()),
        Span::styled(format!("({})", review_count(detail.feedback().len())), palette.dim()),
    ]));
    if detail.feedback().is_empty() {
        lines.push(Line::from(Span::styled(
            " No reviews yet. Be the first to share your thoughts!",
            palette.dim(),
        )));
    }
    for feedback in detail.feedback() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!(" [{}] ", initials(&feedback.name)),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(&feedback.name, Style::default().fg(palette.fg).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", relative_time(feedback.created_at, now)), palette.dim()),
        ]));
        lines.push(Line::from(format!("   {}", feedback.message)));
    }

    let reviews = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.dim())
                .title_bottom(
                    Line::from(format!(" scroll: {} ", app.detail_scroll)).alignment(Alignment::Right),
                ),
        );
    frame.render_widget(reviews, area);
}

fn render_form(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let form = &app.form;
    let active = app.input_mode == InputMode::Feedback;
    let border = if active {
        Style::default().fg(palette.accent)
    } else {
        palette.dim()
    };

    let field_style = |field: FormField| {
        if active && form.focus == field {
            Style::default().fg(palette.emphasis).add_modifier(Modifier::BOLD)
        } else {
            palette.dim()
        }
    };

    let (button, button_style) = if app.detail.is_submitting() {
        ("Sending...".to_string(), palette.dim())
    } else {
        match &form.status {
            SubmitStatus::Idle => ("[ Send Feedback ]".to_string(), palette.key()),
            SubmitStatus::Success => ("Feedback Sent!".to_string(), Style::default().fg(palette.success)),
            SubmitStatus::Error(reason) => (
                format!("Try Again: {}", reason),
                Style::default().fg(palette.error),
            ),
        }
    };

    let lines = vec![
        Line::from(Span::styled(" Your Name", field_style(FormField::Name))),
        Line::from(format!(" > {}", form.name)),
        Line::from(""),
        Line::from(Span::styled(" Your Feedback", field_style(FormField::Message))),
        Line::from(format!(" > {}", form.message)),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", button), button_style)),
    ];

    let title = if active { " Share Your Experience " } else { " Share Your Experience [f] " };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(border).title(title));
    frame.render_widget(widget, area);

    if active {
        let (row, text) = match form.focus {
            FormField::Name => (2, &form.name),
            FormField::Message => (5, &form.message),
        };
        if let Some(x) = cursor_column(area, 4, text) {
            frame.set_cursor_position((x, area.y.saturating_add(row)));
        }
    }
}
