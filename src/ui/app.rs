//! Main application UI.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout, RichText};
use tokio::sync::mpsc;

use crate::api::{self, ApiClient, ResourceApi};
use crate::config::AppConfig;
use crate::controller::{
    DeleteTarget, DepartmentResource, ListController, Notice, NoticeLevel, Outcome, Request, Resource, TeamResource,
};
use crate::error::{AppError, UPLOAD_FAILURE};
use crate::export;
use crate::models::TeamMember;
use crate::upload::{HttpUploader, IMAGE_EXTENSIONS, ImageUploader, PickedFile};

use super::components::{colors, primary_button_with_icon, styled_button};
use super::notifications::Notifications;
use super::{dashboard, department_panel, team_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Departments,
    Team,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Departments => "Departments",
            Panel::Team => "Team",
        }
    }
}

/// Where an uploaded image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// The team member's photo field.
    MemberPhoto,
    /// The biography text, at a character offset.
    Bio { at: usize },
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    Departments(Outcome<DepartmentResource>),
    Team(Outcome<TeamResource>),
    ImageUploaded {
        /// Team dialog the upload was started from.
        session: u64,
        target: ImageTarget,
        result: crate::error::Result<String>,
    },
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

const LOG_CAPACITY: usize = 100;

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    api: Arc<dyn ResourceApi>,
    pub uploader: Arc<dyn ImageUploader>,

    // Message channel for async communication
    tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,
    /// Spawned tasks whose message has not arrived yet.
    pending: usize,

    // Navigation
    pub current_panel: Panel,

    // Panels
    pub departments: ListController<DepartmentResource>,
    pub team: ListController<TeamResource>,
    /// Bumped whenever the team dialog opens, so late uploads can be discarded.
    team_session: u64,
    /// Biography image uploads in flight.
    pub bio_uploads: usize,

    // Feedback
    pub notifications: Notifications,
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig, rt: tokio::runtime::Runtime) -> crate::error::Result<Self> {
        let client = ApiClient::new(&config.api.base_url)?;
        let uploader = HttpUploader::new(client.http(), &config.upload);
        Ok(Self::with_backend(config, rt, Arc::new(client), Arc::new(uploader)))
    }

    /// Build the shell over any backend implementation.
    pub fn with_backend(
        config: AppConfig,
        rt: tokio::runtime::Runtime,
        api: Arc<dyn ResourceApi>,
        uploader: Arc<dyn ImageUploader>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            api,
            uploader,
            tx,
            rx,
            pending: 0,
            current_panel: Panel::default(),
            departments: ListController::new(),
            team: ListController::new(),
            team_session: 0,
            bio_uploads: 0,
            notifications: Notifications::new(config.ui.toast_seconds),
            log_messages: Vec::new(),
            config,
        };

        // Load initial data for the dashboard counts
        let request = app.departments.mount();
        app.dispatch_departments(request);
        let request = app.team.mount();
        app.dispatch_team(request);

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        if self.log_messages.len() > LOG_CAPACITY {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Show a notification and record it in the activity log.
    pub fn notify(&mut self, notice: Notice) {
        let level = match notice.level {
            NoticeLevel::Success => LogLevel::Success,
            NoticeLevel::Error => LogLevel::Error,
        };
        self.log(level, notice.text.clone());
        self.notifications.push(notice);
    }

    /// Whether any background task is still running.
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// Switch panels, loading the panel's collection.
    pub fn navigate(&mut self, panel: Panel) {
        tracing::debug!("Navigating to {}", panel.name());
        self.current_panel = panel;
        match panel {
            Panel::Dashboard => {}
            Panel::Departments => {
                let request = self.departments.mount();
                self.dispatch_departments(request);
            }
            Panel::Team => {
                let request = self.team.mount();
                self.dispatch_team(request);
                // Department choices for the form
                let request = self.departments.refresh();
                self.dispatch_departments(request);
            }
        }
    }

    fn dispatch<R: Resource>(&mut self, request: Request<R>, wrap: fn(Outcome<R>) -> UiMessage) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.pending += 1;

        self.rt.spawn(async move {
            let outcome = api::execute(api.as_ref(), request).await;
            let _ = tx.send(wrap(outcome));
        });
    }

    pub fn dispatch_departments(&mut self, request: Request<DepartmentResource>) {
        self.dispatch(request, UiMessage::Departments);
    }

    pub fn dispatch_team(&mut self, request: Request<TeamResource>) {
        self.dispatch(request, UiMessage::Team);
    }

    /// Open a blank team member dialog.
    pub fn open_team_create(&mut self) {
        self.team_session += 1;
        self.team.open_create();
    }

    /// Open the team member dialog for `member`.
    pub fn open_team_edit(&mut self, member: &TeamMember) {
        self.team_session += 1;
        self.team.open_edit(member);
    }

    /// Pick a photo for the open team member dialog and upload it.
    pub fn pick_member_photo(&mut self) {
        let Some(path) = pick_image_file() else {
            return;
        };
        self.team.begin_upload();
        self.spawn_upload(path, ImageTarget::MemberPhoto);
    }

    /// Image routine behind the editor's image button.
    pub fn insert_bio_image(&mut self, at: usize) {
        let Some(path) = pick_image_file() else {
            return;
        };
        self.bio_uploads += 1;
        self.spawn_upload(path, ImageTarget::Bio { at });
    }

    fn spawn_upload(&mut self, path: PathBuf, target: ImageTarget) {
        let uploader = Arc::clone(&self.uploader);
        let tx = self.tx.clone();
        let session = self.team_session;
        self.pending += 1;

        self.rt.spawn(async move {
            let result = match PickedFile::read(&path).await {
                Ok(file) => uploader.upload(file).await,
                Err(e) => Err(AppError::upload(e.to_string())),
            };
            let _ = tx.send(UiMessage::ImageUploaded {
                session,
                target,
                result,
            });
        });
    }

    fn finish_bio_image(&mut self, at: usize, result: crate::error::Result<String>) {
        self.bio_uploads = self.bio_uploads.saturating_sub(1);
        match result {
            Ok(reference) => {
                let url = self.uploader.resolve_url(&reference);
                self.team.form_mut().values.bio.insert_image(at, &url);
                self.log_info(format!("Inserted image {url}"));
            }
            Err(e) => {
                tracing::warn!("Biography image upload failed: {}", e);
                self.notify(Notice::error(UPLOAD_FAILURE));
            }
        }
    }

    /// Export the loaded departments to Excel.
    pub fn export_departments(&mut self) {
        if self.departments.rows().is_empty() {
            self.notify(Notice::error("No departments to export"));
            return;
        }
        let Some(path) = export::show_save_dialog(&export::generate_export_filename("departments")) else {
            return;
        };

        let result = export::export_departments_to_excel(self.departments.rows(), &path);
        self.report_export(result, &path);
    }

    /// Export the loaded team members to Excel.
    pub fn export_team(&mut self) {
        if self.team.rows().is_empty() {
            self.notify(Notice::error("No team members to export"));
            return;
        }
        let Some(path) = export::show_save_dialog(&export::generate_export_filename("team")) else {
            return;
        };

        let uploader = Arc::clone(&self.uploader);
        let result = export::export_team_to_excel(self.team.rows(), |r| uploader.resolve_url(r), &path);
        self.report_export(result, &path);
    }

    fn report_export(&mut self, result: Result<(), rust_xlsxwriter::XlsxError>, path: &std::path::Path) {
        match result {
            Ok(()) => {
                tracing::info!("Exported to {}", path.display());
                self.notify(Notice::success(format!("Exported to: {}", path.display())));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.notify(Notice::error(format!("Export failed: {e}")));
            }
        }
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);

            match msg {
                UiMessage::Departments(outcome) => {
                    if let Some(next) = self.departments.apply(outcome) {
                        self.dispatch_departments(next);
                    }
                }
                UiMessage::Team(outcome) => {
                    if let Some(next) = self.team.apply(outcome) {
                        self.dispatch_team(next);
                    }
                }
                UiMessage::ImageUploaded {
                    session,
                    target,
                    result,
                } => {
                    if session != self.team_session || !self.team.form().open {
                        tracing::debug!("Discarding upload for a closed dialog");
                        self.log(LogLevel::Warning, "Discarded an upload for a closed dialog");
                        if matches!(target, ImageTarget::Bio { .. }) {
                            self.bio_uploads = self.bio_uploads.saturating_sub(1);
                        }
                        continue;
                    }
                    match target {
                        ImageTarget::MemberPhoto => self.team.finish_upload(result),
                        ImageTarget::Bio { at } => self.finish_bio_image(at, result),
                    }
                }
            }
        }

        let notices: Vec<Notice> = self
            .departments
            .take_notices()
            .into_iter()
            .chain(self.team.take_notices())
            .collect();
        for notice in notices {
            self.notify(notice);
        }
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    ui.colored_label(colors::NEUTRAL, format!("API: {}", self.config.api.base_url));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_busy() {
                            ui.spinner();
                            ui.label("Working...");
                        }
                    });
                });
            });
    }

    /// Render the delete confirmations of both panels.
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(target) = self.departments.delete_target().cloned() {
            match delete_dialog(ctx, "Delete Department", &target) {
                Some(true) => {
                    if let Some(request) = self.departments.confirm_delete() {
                        self.log_info(format!("Deleting department: {}", target.label));
                        self.dispatch_departments(request);
                    }
                }
                Some(false) => self.departments.cancel_delete(),
                None => {}
            }
        }

        if let Some(target) = self.team.delete_target().cloned() {
            match delete_dialog(ctx, "Delete Team Member", &target) {
                Some(true) => {
                    if let Some(request) = self.team.confirm_delete() {
                        self.log_info(format!("Deleting team member: {}", target.label));
                        self.dispatch_team(request);
                    }
                }
                Some(false) => self.team.cancel_delete(),
                None => {}
            }
        }
    }
}

/// Confirmation window. `Some(true)` confirms, `Some(false)` cancels.
fn delete_dialog(ctx: &egui::Context, title: &str, target: &DeleteTarget) -> Option<bool> {
    let mut choice = None;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Are you sure you want to delete '{}'?", target.label));
            ui.label(RichText::new("This action cannot be undone.").small().weak());
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    choice = Some(false);
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Delete").clicked() {
                        choice = Some(true);
                    }
                });
            });
        });

    choice
}

/// Native file picker limited to image types.
fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations and while toasts are visible
        if self.is_busy() || !self.notifications.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // Status bar
        self.show_status_bar(ctx);

        // Delete confirmations
        self.show_dialogs(ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.navigate(next);
                }
            }
            Panel::Departments => {
                if department_panel::show(self, ui) {
                    self.navigate(Panel::Dashboard);
                }
            }
            Panel::Team => {
                if team_panel::show(self, ui) {
                    self.navigate(Panel::Dashboard);
                }
            }
        });

        self.notifications.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeApi, Reply};
    use crate::error::Result;
    use async_trait::async_trait;
    use serde_json::json;

    struct FakeUploader;

    #[async_trait]
    impl ImageUploader for FakeUploader {
        async fn upload(&self, _file: PickedFile) -> Result<String> {
            Ok("members/a.png".to_string())
        }

        fn resolve_url(&self, reference: &str) -> String {
            format!("https://cdn.test/{reference}")
        }
    }

    fn app_with(api: Arc<FakeApi>) -> App {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        App::with_backend(AppConfig::default(), rt, api, Arc::new(FakeUploader))
    }

    /// Startup issues two list reads; an empty array decodes for both.
    fn started() -> App {
        let mut app = app_with(Arc::new(FakeApi::new([Reply::Data(json!([])), Reply::Data(json!([]))])));
        settle(&mut app);
        app
    }

    /// Wait until every spawned task has reported back.
    fn settle(app: &mut App) {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while app.is_busy() {
            assert!(std::time::Instant::now() < deadline, "background tasks did not finish");
            std::thread::sleep(std::time::Duration::from_millis(1));
            app.poll_async_results();
        }
    }

    #[test]
    fn test_startup_loads_both_collections() {
        let api = Arc::new(FakeApi::new([Reply::Data(json!([])), Reply::Data(json!([]))]));
        let mut app = app_with(Arc::clone(&api));
        assert!(app.departments.is_loading());
        assert!(app.team.is_loading());

        settle(&mut app);

        let mut paths: Vec<String> = api.calls().into_iter().map(|c| c.path).collect();
        paths.sort();
        assert_eq!(paths, ["department", "team"]);
        assert!(!app.departments.is_loading());
        assert!(!app.team.is_loading());
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_save_notifies_and_logs() {
        let mut app = app_with(Arc::new(FakeApi::new([
            Reply::Data(json!([])),
            Reply::Data(json!([])),
            Reply::Message(Some("Department created!".to_string())),
            Reply::Data(json!([{"id": "1", "name": "Ops"}])),
        ])));
        settle(&mut app);

        app.departments.open_create();
        app.departments.form_mut().values.name = "Ops".to_string();
        let request = app.departments.submit().unwrap();
        app.dispatch_departments(request);
        settle(&mut app);

        assert!(!app.departments.form().open);
        assert_eq!(app.departments.rows()[0].name, "Ops");
        assert_eq!(app.notifications.toasts()[0].notice, Notice::success("Department created!"));
        assert!(app.log_messages.iter().any(|e| e.message == "Department created!"));
    }

    #[test]
    fn test_upload_for_closed_dialog_is_discarded() {
        let mut app = started();

        app.open_team_create();
        app.team.begin_upload();
        let stale = app.team_session;
        app.team.close_form();
        app.open_team_create();

        app.pending += 1;
        app.tx
            .send(UiMessage::ImageUploaded {
                session: stale,
                target: ImageTarget::MemberPhoto,
                result: Ok("old.png".to_string()),
            })
            .unwrap();
        app.poll_async_results();

        assert_eq!(app.team.form().values.image, None);
        assert!(!app.team.is_uploading());
    }

    #[test]
    fn test_bio_image_inserted_at_caret() {
        let mut app = started();

        app.open_team_create();
        app.team.form_mut().values.bio = crate::editor::EditorDocument::new("Hello");
        app.bio_uploads = 1;
        app.pending += 1;
        app.tx
            .send(UiMessage::ImageUploaded {
                session: app.team_session,
                target: ImageTarget::Bio { at: 5 },
                result: Ok("members/a.png".to_string()),
            })
            .unwrap();
        app.poll_async_results();

        assert_eq!(
            app.team.form().values.bio.text(),
            "Hello![](https://cdn.test/members/a.png)"
        );
        assert_eq!(app.bio_uploads, 0);
    }

    #[test]
    fn test_team_panel_also_loads_departments() {
        // Both rows decode as a department and as a team member, so reply order does not matter
        let row = json!([{"id": "1", "name": "Ops"}]);
        let api = Arc::new(FakeApi::new([
            Reply::Data(json!([])),
            Reply::Data(json!([])),
            Reply::Data(row.clone()),
            Reply::Data(row),
        ]));
        let mut app = app_with(Arc::clone(&api));
        settle(&mut app);

        app.navigate(Panel::Team);
        settle(&mut app);

        let mut paths: Vec<String> = api.calls()[2..].iter().map(|c| c.path.clone()).collect();
        paths.sort();
        assert_eq!(paths, ["department", "team"]);
        assert!(api.calls().iter().all(|c| c.method == "GET"));
        assert_eq!(app.current_panel, Panel::Team);
        assert_eq!(app.departments.rows().len(), 1);
        assert_eq!(app.departments.rows()[0].name, "Ops");
        assert_eq!(app.team.rows().len(), 1);
    }

    #[test]
    fn test_log_keeps_last_entries() {
        let mut app = started();
        for i in 0..(LOG_CAPACITY + 5) {
            app.log_info(format!("entry {i}"));
        }
        assert_eq!(app.log_messages.len(), LOG_CAPACITY);
        assert_eq!(app.log_messages[0].message, "entry 5");
    }
}
