//! List/form/delete state shared by the department and team panels.
//!
//! A [`ListController`] never performs I/O. Its operations hand back
//! [`Request`] values; the UI shell executes them (see [`crate::api::execute`])
//! and feeds the [`Outcome`] back through [`ListController::apply`], which may
//! ask for a follow-up refetch.

pub mod department;
pub mod team;

pub use department::{DepartmentForm, DepartmentResource};
pub use team::{TeamMemberForm, TeamResource};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Per-entity behavior plugged into a [`ListController`].
pub trait Resource: Send + Sync + 'static {
    /// Collection path under the API base URL.
    const PATH: &'static str;
    /// Singular display label ("Department").
    const LABEL: &'static str;

    type Row: Clone + Send + DeserializeOwned + 'static;
    type Form: Clone + Default + Send;
    type Payload: Serialize + Send + 'static;

    fn row_id(row: &Self::Row) -> &str;

    /// Human-readable name shown in the delete confirmation.
    fn row_label(row: &Self::Row) -> &str;

    /// Pre-populate the edit form from a row.
    fn form_from_row(row: &Self::Row) -> Self::Form;

    fn payload(form: &Self::Form) -> Self::Payload;

    /// Name of the first empty required field, if any.
    fn missing_required(form: &Self::Form) -> Option<&'static str>;

    /// Whether the form currently refuses submission (e.g. upload running).
    fn submit_blocked(_form: &Self::Form) -> bool {
        false
    }

    /// Decode the `data` field of the list response.
    fn decode_list(data: Value) -> Result<Vec<Self::Row>> {
        serde_json::from_value(data).map_err(|e| AppError::decode(format!("{} list: {e}", Self::PATH)))
    }
}

/// Work for the shell to execute against the API.
pub enum Request<R: Resource> {
    List,
    Create(R::Payload),
    Update { id: String, payload: R::Payload },
    Delete { id: String },
}

/// Completed [`Request`].
pub enum Outcome<R: Resource> {
    Listed(Result<Vec<R::Row>>),
    /// Create or update finished; the value is the server's `message`, if any.
    Saved { was_edit: bool, result: Result<Option<String>> },
    Deleted(Result<Option<String>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing notification produced by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Create/edit dialog state.
#[derive(Debug, Clone, Default)]
pub struct FormDialog<F> {
    pub open: bool,
    pub is_edit: bool,
    pub target_id: Option<String>,
    pub values: F,
    /// Required field that blocked the last submit.
    pub missing: Option<&'static str>,
}

/// Row awaiting delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub label: String,
}

/// State of one management panel.
pub struct ListController<R: Resource> {
    rows: Vec<R::Row>,
    loading: bool,
    form: FormDialog<R::Form>,
    delete_target: Option<DeleteTarget>,
    notices: Vec<Notice>,
}

impl<R: Resource> Default for ListController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ListController<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            loading: false,
            form: FormDialog::default(),
            delete_target: None,
            notices: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[R::Row] {
        &self.rows
    }

    /// True until the first list response after [`Self::mount`] arrives.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn form(&self) -> &FormDialog<R::Form> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormDialog<R::Form> {
        &mut self.form
    }

    pub fn delete_target(&self) -> Option<&DeleteTarget> {
        self.delete_target.as_ref()
    }

    /// Drain notifications produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Panel shown: load the full collection, showing placeholders meanwhile.
    pub fn mount(&mut self) -> Request<R> {
        self.loading = true;
        Request::List
    }

    /// Reload without switching to placeholders.
    pub fn refresh(&self) -> Request<R> {
        Request::List
    }

    /// Open a blank creation dialog.
    pub fn open_create(&mut self) {
        self.form = FormDialog {
            open: true,
            ..FormDialog::default()
        };
    }

    /// Open the dialog pre-filled from `row`.
    pub fn open_edit(&mut self, row: &R::Row) {
        self.form = FormDialog {
            open: true,
            is_edit: true,
            target_id: Some(R::row_id(row).to_string()),
            values: R::form_from_row(row),
            missing: None,
        };
    }

    /// Close the dialog and discard entered values.
    pub fn close_form(&mut self) {
        self.form = FormDialog::default();
    }

    pub fn can_submit(&self) -> bool {
        self.form.open && !R::submit_blocked(&self.form.values)
    }

    /// Build the create/update request for the open dialog.
    ///
    /// Returns `None` without touching the entered values when the dialog is
    /// closed, submission is blocked, or a required field is empty.
    pub fn submit(&mut self) -> Option<Request<R>> {
        if !self.can_submit() {
            return None;
        }
        if let Some(field) = R::missing_required(&self.form.values) {
            self.form.missing = Some(field);
            return None;
        }
        self.form.missing = None;

        let payload = R::payload(&self.form.values);
        if self.form.is_edit {
            let id = self.form.target_id.clone()?;
            tracing::info!("Updating {} {}", R::LABEL, id);
            Some(Request::Update { id, payload })
        } else {
            tracing::info!("Creating {}", R::LABEL);
            Some(Request::Create(payload))
        }
    }

    /// First delete step: remember the row and ask for confirmation.
    pub fn request_delete(&mut self, row: &R::Row) {
        self.delete_target = Some(DeleteTarget {
            id: R::row_id(row).to_string(),
            label: R::row_label(row).to_string(),
        });
    }

    /// Dismiss the confirmation without any request.
    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
    }

    /// Second delete step. The confirmation closes whatever the outcome.
    pub fn confirm_delete(&mut self) -> Option<Request<R>> {
        let target = self.delete_target.take()?;
        tracing::info!("Deleting {} {} ({})", R::LABEL, target.id, target.label);
        Some(Request::Delete { id: target.id })
    }

    /// Fold a completed request into the state, returning a refetch when the
    /// server state changed.
    pub fn apply(&mut self, outcome: Outcome<R>) -> Option<Request<R>> {
        match outcome {
            Outcome::Listed(Ok(rows)) => {
                tracing::debug!("Loaded {} {} rows", rows.len(), R::PATH);
                self.rows = rows;
                self.loading = false;
                None
            }
            Outcome::Listed(Err(e)) => {
                tracing::warn!("Failed to load {}: {}", R::PATH, e);
                self.loading = false;
                self.notify(Notice::error(e.user_message()));
                None
            }
            Outcome::Saved { was_edit, result: Ok(message) } => {
                let fallback = if was_edit { "updated" } else { "created" };
                let text = message.unwrap_or_else(|| format!("{} {fallback}", R::LABEL));
                self.notify(Notice::success(text));
                self.close_form();
                Some(Request::List)
            }
            Outcome::Saved { result: Err(e), .. } => {
                tracing::warn!("Failed to save {}: {}", R::LABEL, e);
                self.notify(Notice::error(e.user_message()));
                None
            }
            Outcome::Deleted(Ok(message)) => {
                let text = message.unwrap_or_else(|| format!("{} deleted", R::LABEL));
                self.notify(Notice::success(text));
                Some(Request::List)
            }
            Outcome::Deleted(Err(e)) => {
                tracing::warn!("Failed to delete {}: {}", R::LABEL, e);
                self.notify(Notice::error(e.user_message()));
                None
            }
        }
    }
}
