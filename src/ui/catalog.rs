use crate::app::{App, InputMode};
use crate::format::truncate_str;
use crate::ui::{Palette, cursor_column, key_hints};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const SEARCH_LABEL: &str = " Search (/): ";
const SEARCH_LABEL_EDITING: &str = " Search (Enter to apply, Esc to clear): ";

pub fn render(app: &App, palette: &Palette, frame: &mut Frame) {
    let area = frame.area();
    let catalog = &app.catalog;
    let notice_height = if catalog.error().is_some() { 3 } else { 0 };

    // Layout: header(3) + search(3) + categories(3) + notice + list(min) + summary(1) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(notice_height),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Organic Storefront ",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{} products]", catalog.products().len()),
            palette.dim(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(palette.dim()),
    );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let editing = app.input_mode == InputMode::Search;
    let search_style = if editing {
        Style::default().fg(palette.emphasis)
    } else {
        palette.dim()
    };
    let label = if editing { SEARCH_LABEL_EDITING } else { SEARCH_LABEL };
    let search = Paragraph::new(format!("{}{}", label, catalog.query()))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search organic products "),
        );
    frame.render_widget(search, chunks[1]);

    if editing {
        let offset = 1 + label.len() as u16;
        if let Some(x) = cursor_column(chunks[1], offset, catalog.query()) {
            frame.set_cursor_position((x, chunks[1].y.saturating_add(1)));
        }
    }

    // ── Category bar ──
    let mut category_spans = Vec::new();
    for choice in catalog.category_choices() {
        let style = if choice == catalog.active_category() {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            palette.dim()
        };
        category_spans.push(Span::styled(format!(" {} ", choice), style));
        category_spans.push(Span::raw(" "));
    }
    let categories = Paragraph::new(Line::from(category_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.dim())
            .title(" Category [←/→] "),
    );
    frame.render_widget(categories, chunks[2]);

    // ── Error notice ──
    if let Some(error) = catalog.error() {
        let notice = Paragraph::new(format!(" {}  Showing sample products.", error))
            .style(Style::default().fg(palette.error))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.error)),
            );
        frame.render_widget(notice, chunks[3]);
    }

    // ── Product list ──
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.dim())
        .title(" Our Organic Collection ");

    if catalog.is_loading() {
        let loading = Paragraph::new(" Loading products...")
            .style(palette.dim())
            .block(list_block);
        frame.render_widget(loading, chunks[4]);
    } else if catalog.filtered_len() == 0 {
        let empty = Paragraph::new(" No products match your search.")
            .style(palette.dim())
            .block(list_block);
        frame.render_widget(empty, chunks[4]);
    } else {
        let name_width = (area.width as usize).saturating_sub(50).max(12);
        let items: Vec<ListItem> = catalog
            .filtered()
            .map(|product| {
                let badge = if product.certification.is_empty() {
                    String::new()
                } else {
                    format!("  ✔ {}", product.certification)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", truncate_str(&product.name, name_width), width = name_width),
                        Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", truncate_str(&product.brand, 20)), palette.dim()),
                    Span::styled(format!("  [{}]", product.category), Style::default().fg(palette.accent)),
                    Span::styled(badge, Style::default().fg(palette.success)),
                ]))
            })
            .collect();

        let position = format!(" {} of {} ", app.catalog_selected + 1, catalog.filtered_len());
        let list = List::new(items)
            .block(list_block.title_bottom(Line::from(position).alignment(Alignment::Right)))
            .highlight_style(
                Style::default()
                    .bg(palette.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default();
        list_state.select(Some(app.catalog_selected));
        frame.render_stateful_widget(list, chunks[4], &mut list_state);
    }

    // ── Results summary ──
    if !catalog.is_loading() {
        let summary = Paragraph::new(format!(" {}", catalog.results_summary())).style(palette.dim());
        frame.render_widget(summary, chunks[5]);
    }

    // ── Status bar ──
    let status = key_hints(
        palette,
        &[
            ("↑↓", "Navigate"),
            ("/", "Search"),
            ("←→", "Category"),
            ("Enter", "Detail"),
            ("r", "Reload"),
            ("t", "Theme"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        &app.status_msg,
    );
    frame.render_widget(Paragraph::new(status), chunks[6]);
}
