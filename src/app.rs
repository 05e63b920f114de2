use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::catalog::CatalogController;
use crate::config::{Settings, Theme};
use crate::detail::DetailController;
use crate::events::{AppEvent, TaskRunner};

/// How long success/failure feedback stays on screen.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Catalog,
    Detail,
}

/// What keystrokes currently edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Success,
    Error(String),
}

/// The feedback form on the detail view.
#[derive(Debug)]
pub struct FeedbackForm {
    pub name: String,
    pub message: String,
    pub focus: FormField,
    pub status: SubmitStatus,
    status_since: Option<Instant>,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            message: String::new(),
            focus: FormField::Name,
            status: SubmitStatus::Idle,
            status_since: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Message => &mut self.message,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Message,
            FormField::Message => FormField::Name,
        };
    }

    /// Clear the fields and flag success.
    pub fn succeed(&mut self, now: Instant) {
        self.name.clear();
        self.message.clear();
        self.focus = FormField::Name;
        self.status = SubmitStatus::Success;
        self.status_since = Some(now);
    }

    /// Flag failure; what the user typed is kept.
    pub fn fail(&mut self, reason: String, now: Instant) {
        self.status = SubmitStatus::Error(reason);
        self.status_since = Some(now);
    }

    pub fn expire(&mut self, now: Instant) {
        if let Some(since) = self.status_since {
            if now.duration_since(since) >= STATUS_TTL {
                self.status = SubmitStatus::Idle;
                self.status_since = None;
            }
        }
    }
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,
    pub input_mode: InputMode,

    pub settings: Settings,
    settings_path: Option<PathBuf>,

    tasks: TaskRunner,
    events: UnboundedReceiver<AppEvent>,

    // Catalog view state
    pub catalog: CatalogController,
    pub catalog_selected: usize,

    // Detail view state
    pub detail: DetailController,
    pub detail_scroll: u16,
    pub form: FeedbackForm,

    // Status message
    pub status_msg: String,
}

impl App {
    pub fn new(
        settings: Settings,
        settings_path: Option<PathBuf>,
        tasks: TaskRunner,
        events: UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            view: View::Catalog,
            show_help: false,
            input_mode: InputMode::Normal,

            settings,
            settings_path,

            tasks,
            events,

            catalog: CatalogController::new(),
            catalog_selected: 0,

            detail: DetailController::new(),
            detail_scroll: 0,
            form: FeedbackForm::new(),

            status_msg: String::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    /// Mount the catalog: one fetch per call.
    pub fn load_catalog(&mut self) {
        let mount = self.catalog.begin_load();
        self.status_msg = "Loading products...".to_string();
        self.tasks.load_catalog(mount);
    }

    /// Open the detail view for the selected product.
    pub fn open_detail(&mut self) {
        let Some(id) = self
            .catalog
            .filtered_at(self.catalog_selected)
            .map(|p| p.id.clone())
        else {
            return;
        };
        self.view = View::Detail;
        self.load_detail(&id);
    }

    pub fn reload_detail(&mut self) {
        if let Some(id) = self.detail.product_id().map(str::to_string) {
            self.load_detail(&id);
        }
    }

    fn load_detail(&mut self, id: &str) {
        info!(product_id = id, "Opening product detail");
        let ticket = self.detail.begin_load(id);
        self.detail_scroll = 0;
        self.form.reset();
        self.input_mode = InputMode::Normal;
        self.status_msg = "Loading product details...".to_string();
        self.tasks.load_detail(ticket);
    }

    pub fn close_detail(&mut self) {
        self.detail.deactivate();
        self.form.reset();
        self.input_mode = InputMode::Normal;
        self.view = View::Catalog;
        self.status_msg = self.catalog.results_summary();
    }

    pub fn open_feedback_form(&mut self) {
        if self.detail.product().is_some() {
            self.input_mode = InputMode::Feedback;
        }
    }

    /// Validate and launch the submission. Blank fields fail here, before any request.
    pub fn submit_feedback(&mut self) {
        match self.detail.begin_submit(&self.form.name, &self.form.message) {
            Ok((ticket, draft)) => {
                self.status_msg = "Sending feedback...".to_string();
                self.tasks.submit_feedback(ticket, draft);
            }
            Err(e) => {
                self.form.fail(e.user_message(), Instant::now());
            }
        }
    }

    /// Drain every settled task without blocking.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for the next settled task. Returns `false` if the channel closed.
    #[cfg(test)]
    pub async fn next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded { mount, result } => {
                if self.catalog.finish_load(mount, result) {
                    self.clamp_selection();
                    self.status_msg = format!("{} products loaded", self.catalog.products().len());
                }
            }
            AppEvent::DetailLoaded { ticket, outcome } => {
                if self.detail.finish_load(&ticket, outcome) {
                    self.status_msg = self
                        .detail
                        .product()
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                }
            }
            AppEvent::FeedbackSubmitted { ticket, result } => {
                match self.detail.finish_submit(&ticket, result) {
                    Some(Ok(())) => {
                        self.form.succeed(Instant::now());
                        self.input_mode = InputMode::Normal;
                        self.status_msg = "Feedback sent".to_string();
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Feedback submission failed");
                        self.form.fail(e.user_message(), Instant::now());
                        self.status_msg = "Feedback could not be sent".to_string();
                    }
                    None => {}
                }
            }
        }
    }

    /// Expire transient notices.
    pub fn tick(&mut self, now: Instant) {
        self.form.expire(now);
    }

    /// Flip the theme and persist it right away.
    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggle();
        self.status_msg = format!("Theme: {}", self.settings.theme.label());
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save(path) {
                warn!(error = %e, "Could not save settings");
                self.status_msg = format!("Theme changed but not saved: {}", e);
            }
        }
    }

    // ── Catalog editing ──

    pub fn push_search_char(&mut self, c: char) {
        self.catalog.push_query_char(c);
        self.after_filter_change();
    }

    pub fn pop_search_char(&mut self) {
        self.catalog.pop_query_char();
        self.after_filter_change();
    }

    pub fn clear_search(&mut self) {
        self.catalog.set_query("");
        self.after_filter_change();
    }

    pub fn next_category(&mut self) {
        self.catalog.next_category();
        self.after_filter_change();
    }

    pub fn prev_category(&mut self) {
        self.catalog.prev_category();
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        self.catalog_selected = 0;
        self.status_msg = self.catalog.results_summary();
    }

    fn clamp_selection(&mut self) {
        let len = self.catalog.filtered_len();
        if self.catalog_selected >= len {
            self.catalog_selected = len.saturating_sub(1);
        }
    }

    // ── Navigation ──

    pub fn list_next(&mut self) {
        if self.catalog_selected + 1 < self.catalog.filtered_len() {
            self.catalog_selected += 1;
        }
    }

    pub fn list_prev(&mut self) {
        self.catalog_selected = self.catalog_selected.saturating_sub(1);
    }

    pub fn list_first(&mut self) {
        self.catalog_selected = 0;
    }

    pub fn list_last(&mut self) {
        self.catalog_selected = self.catalog.filtered_len().saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(10);
    }

    pub fn scroll_page_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeStoreApi, product};
    use crate::fallback;
    use std::sync::Arc;

    fn app_with(api: Arc<FakeStoreApi>) -> App {
        let (tasks, events) = TaskRunner::new(api);
        App::new(Settings::default(), None, tasks, events)
    }

    fn shop() -> Arc<FakeStoreApi> {
        Arc::new(FakeStoreApi::with_products(vec![
            product("1", "Honey", "X", "Honey"),
            product("2", "Olive Oil", "M", "Oils"),
        ]))
    }

    #[tokio::test]
    async fn test_catalog_mount_populates_list() {
        let mut app = app_with(shop());
        app.load_catalog();
        assert!(app.catalog.is_loading());
        assert!(app.next_event().await);

        assert!(!app.catalog.is_loading());
        assert_eq!(app.catalog.filtered_len(), 2);
    }

    #[tokio::test]
    async fn test_offline_catalog_shows_notice_and_samples() {
        let mut app = app_with(Arc::new(FakeStoreApi::offline()));
        app.load_catalog();
        app.next_event().await;

        assert_eq!(app.catalog.error(), Some(fallback::CATALOG_NOTICE));
        assert_eq!(app.catalog.filtered_len(), 3);
    }

    #[tokio::test]
    async fn test_search_resets_selection() {
        let mut app = app_with(shop());
        app.load_catalog();
        app.next_event().await;
        app.list_next();
        assert_eq!(app.catalog_selected, 1);

        app.push_search_char('v');
        assert_eq!(app.catalog_selected, 0);
        assert_eq!(app.status_msg, "1 product found for \"v\"");
    }

    #[tokio::test]
    async fn test_open_detail_then_submit_feedback() {
        let api = shop();
        let mut app = app_with(api.clone());
        app.load_catalog();
        app.next_event().await;

        app.open_detail();
        assert_eq!(app.view, View::Detail);
        app.next_event().await;
        assert_eq!(app.detail.product().map(|p| p.id.as_str()), Some("1"));

        app.open_feedback_form();
        assert_eq!(app.input_mode, InputMode::Feedback);
        app.form.name = "Ann".to_string();
        app.form.message = "Great!".to_string();
        app.submit_feedback();
        assert!(app.detail.is_submitting());
        app.next_event().await;

        assert_eq!(app.form.status, SubmitStatus::Success);
        assert!(app.form.name.is_empty());
        assert_eq!(app.detail.feedback().len(), 1);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn test_blank_form_fails_locally() {
        let api = shop();
        let mut app = app_with(api.clone());
        app.load_catalog();
        app.next_event().await;
        app.open_detail();
        app.next_event().await;

        app.form.message = "Great!".to_string();
        app.submit_feedback();

        assert!(matches!(app.form.status, SubmitStatus::Error(_)));
        assert_eq!(app.form.message, "Great!");
        assert_eq!(FakeStoreApi::calls(&api.submit_calls), 0);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_typed_text() {
        let api = shop();
        let mut app = app_with(api.clone());
        app.load_catalog();
        app.next_event().await;
        app.open_detail();
        app.next_event().await;

        *api.fail_submit.lock().unwrap() = Some(crate::api::fake::network_error());
        app.form.name = "Ann".to_string();
        app.form.message = "Great!".to_string();
        app.submit_feedback();
        app.next_event().await;

        assert!(matches!(app.form.status, SubmitStatus::Error(_)));
        assert_eq!(app.form.name, "Ann");
        assert!(app.detail.feedback().is_empty());
    }

    #[tokio::test]
    async fn test_leaving_detail_discards_late_response() {
        let mut app = app_with(shop());
        app.load_catalog();
        app.next_event().await;

        app.open_detail();
        app.close_detail();
        app.next_event().await;

        assert_eq!(app.view, View::Catalog);
        assert!(app.detail.product().is_none());
    }

    #[test]
    fn test_form_status_expires() {
        let mut form = FeedbackForm::new();
        let start = Instant::now();
        form.fail("nope".to_string(), start);
        form.expire(start + Duration::from_secs(1));
        assert!(matches!(form.status, SubmitStatus::Error(_)));
        form.expire(start + STATUS_TTL);
        assert_eq!(form.status, SubmitStatus::Idle);
    }

    #[test]
    fn test_form_focus_switches_edited_field() {
        let mut form = FeedbackForm::new();
        form.focused_mut().push('A');
        form.toggle_focus();
        form.focused_mut().push('B');
        assert_eq!(form.name, "A");
        assert_eq!(form.message, "B");
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let (tasks, events) = TaskRunner::new(shop());
        let mut app = App::new(Settings::default(), Some(path.clone()), tasks, events);

        app.toggle_theme();
        assert_eq!(app.theme(), Theme::Dark);
        assert_eq!(Settings::load(&path).unwrap().theme, Theme::Dark);
    }
}
