//! Team member resource binding and image upload state.

use serde_json::Value;

use super::{ListController, Notice, Resource};
use crate::editor::EditorDocument;
use crate::error::{Result, UPLOAD_FAILURE};
use crate::models::{TeamMember, TeamMemberPayload, flatten_grouped};

pub struct TeamResource;

/// Editable team member fields plus upload progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMemberForm {
    pub name: String,
    pub designation: String,
    pub bio: EditorDocument,
    pub department_id: Option<String>,
    /// Reference from an upload made in this dialog; sent only when set.
    pub image: Option<String>,
    /// Image already stored on the record, for preview only.
    pub current_image: Option<String>,
    pub uploading: bool,
}

impl Resource for TeamResource {
    const PATH: &'static str = "team";
    const LABEL: &'static str = "Team member";

    type Row = TeamMember;
    type Form = TeamMemberForm;
    type Payload = TeamMemberPayload;

    fn row_id(row: &TeamMember) -> &str {
        &row.id
    }

    fn row_label(row: &TeamMember) -> &str {
        &row.name
    }

    fn form_from_row(row: &TeamMember) -> TeamMemberForm {
        TeamMemberForm {
            name: row.name.clone(),
            designation: row.designation.clone(),
            bio: EditorDocument::new(row.bio.clone()),
            department_id: row.department_id.clone(),
            image: None,
            current_image: row.image.clone(),
            uploading: false,
        }
    }

    fn payload(form: &TeamMemberForm) -> TeamMemberPayload {
        TeamMemberPayload {
            name: form.name.trim().to_string(),
            designation: form.designation.trim().to_string(),
            bio: form.bio.text().to_string(),
            department_id: form.department_id.clone(),
            image: form.image.clone(),
        }
    }

    fn missing_required(form: &TeamMemberForm) -> Option<&'static str> {
        if form.name.trim().is_empty() {
            Some("Name")
        } else if form.designation.trim().is_empty() {
            Some("Designation")
        } else {
            None
        }
    }

    fn submit_blocked(form: &TeamMemberForm) -> bool {
        form.uploading
    }

    fn decode_list(data: Value) -> Result<Vec<TeamMember>> {
        flatten_grouped(data)
    }
}

impl ListController<TeamResource> {
    /// A file was picked: clear the stored reference and mark the upload running.
    pub fn begin_upload(&mut self) {
        let values = &mut self.form.values;
        values.image = None;
        values.uploading = true;
    }

    pub fn is_uploading(&self) -> bool {
        self.form.values.uploading
    }

    /// Record the upload result. A failure leaves the reference empty.
    pub fn finish_upload(&mut self, result: Result<String>) {
        self.form.values.uploading = false;
        match result {
            Ok(reference) => {
                tracing::info!("Image uploaded: {}", reference);
                self.form.values.image = Some(reference);
            }
            Err(e) => {
                tracing::warn!("Image upload failed: {}", e);
                self.notify(Notice::error(UPLOAD_FAILURE));
            }
        }
    }
}
