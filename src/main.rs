use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use organic_storefront::api::HttpStoreApi;
use organic_storefront::app::{App, InputMode, View};
use organic_storefront::config::{Settings, Theme};
use organic_storefront::events::TaskRunner;
use organic_storefront::{logging, ui};
use tracing::{error, info};

/// Terminal storefront for browsing organic products and leaving feedback
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the store API (overrides settings and STOREFRONT_API_URL)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Path to the settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Color theme for this run (saved when toggled with `t`)
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Log filter, e.g. "debug" or "organic_storefront=trace"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings_path = match cli.config {
        Some(path) => Some(path),
        None => Settings::default_path().ok(),
    };
    let mut settings = match &settings_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_env(|key| std::env::var(key).ok());
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if let Some(theme) = cli.theme {
        settings.theme = theme;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    let _log_guard = logging::init(&settings.log_level)?;
    info!(api = %settings.api_base_url, theme = settings.theme.label(), "Starting storefront");

    let api = HttpStoreApi::new(&settings.api_base_url, settings.request_timeout())?;
    let (tasks, events) = TaskRunner::new(Arc::new(api));

    // Create app
    let mut app = App::new(settings, settings_path, tasks, events);
    app.load_catalog();

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        error!(error = %e, "Storefront exited with an error");
        return Err(e);
    }

    info!("Storefront closed");
    Ok(())
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_events();
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so task results show up promptly
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key);
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.input_mode {
        InputMode::Search => return handle_search_input(app, key),
        InputMode::Feedback => return handle_form_input(app, key),
        InputMode::Normal => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            return;
        }
        _ => {}
    }

    match app.view {
        View::Catalog => handle_catalog_key(app, key),
        View::Detail => handle_detail_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::BackTab => app.form.toggle_focus(),
        KeyCode::Enter => app.submit_feedback(),
        KeyCode::Backspace => {
            app.form.focused_mut().pop();
        }
        KeyCode::Char(c) => app.form.focused_mut().push(c),
        _ => {}
    }
}

fn handle_catalog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
        }
        KeyCode::Down | KeyCode::Char('j') => app.list_next(),
        KeyCode::Up | KeyCode::Char('k') => app.list_prev(),
        KeyCode::Char('g') | KeyCode::Home => app.list_first(),
        KeyCode::Char('G') | KeyCode::End => app.list_last(),
        KeyCode::Right | KeyCode::Tab => app.next_category(),
        KeyCode::Left | KeyCode::BackTab => app.prev_category(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('r') => app.load_catalog(),
        KeyCode::Esc => {
            // Clear search
            if !app.catalog.query().is_empty() {
                app.clear_search();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::PageDown => app.scroll_page_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        KeyCode::Char('f') => app.open_feedback_form(),
        KeyCode::Char('r') => app.reload_detail(),
        _ => {}
    }
}
