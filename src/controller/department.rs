//! Department resource binding.

use super::Resource;
use crate::models::{Department, DepartmentPayload};

pub struct DepartmentResource;

/// Editable department fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentForm {
    pub name: String,
    pub description: String,
}

impl Resource for DepartmentResource {
    const PATH: &'static str = "department";
    const LABEL: &'static str = "Department";

    type Row = Department;
    type Form = DepartmentForm;
    type Payload = DepartmentPayload;

    fn row_id(row: &Department) -> &str {
        &row.id
    }

    fn row_label(row: &Department) -> &str {
        &row.name
    }

    fn form_from_row(row: &Department) -> DepartmentForm {
        DepartmentForm {
            name: row.name.clone(),
            description: row.description.clone().unwrap_or_default(),
        }
    }

    fn payload(form: &DepartmentForm) -> DepartmentPayload {
        let description = form.description.trim();
        DepartmentPayload {
            name: form.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }

    fn missing_required(form: &DepartmentForm) -> Option<&'static str> {
        form.name.trim().is_empty().then_some("Name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ListController, Notice, NoticeLevel, Outcome, Request};
    use crate::error::{AppError, GENERIC_FAILURE};
    use reqwest::StatusCode;
    use serde_json::json;

    type Controller = ListController<DepartmentResource>;

    fn dept(id: &str, name: &str) -> Department {
        serde_json::from_value(json!({"id": id, "name": name})).unwrap()
    }

    fn api_error(message: Option<&str>) -> AppError {
        AppError::Api {
            status: StatusCode::BAD_REQUEST,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_mount_loads_and_replaces_rows() {
        let mut c = Controller::new();
        assert!(matches!(c.mount(), Request::List));
        assert!(c.is_loading());

        let rows = DepartmentResource::decode_list(json!([{"id": "1", "name": "Engineering"}])).unwrap();
        assert!(c.apply(Outcome::Listed(Ok(rows))).is_none());

        assert!(!c.is_loading());
        assert_eq!(c.rows().len(), 1);
        assert_eq!(c.rows()[0].name, "Engineering");
        assert_eq!(c.rows()[0].team_member_count(), 0);
    }

    #[test]
    fn test_failed_load_keeps_prior_rows() {
        let mut c = Controller::new();
        c.apply(Outcome::Listed(Ok(vec![dept("1", "Engineering")])));
        c.mount();

        c.apply(Outcome::Listed(Err(api_error(None))));

        assert!(!c.is_loading());
        assert_eq!(c.rows().len(), 1);
        assert_eq!(c.take_notices(), vec![Notice::error(GENERIC_FAILURE)]);
    }

    #[test]
    fn test_create_posts_and_refetches() {
        let mut c = Controller::new();
        c.apply(Outcome::Listed(Ok(vec![dept("1", "Old")])));

        c.open_create();
        assert!(c.form().open);
        assert!(!c.form().is_edit);
        c.form_mut().values.name = "Sales".to_string();

        match c.submit() {
            Some(Request::Create(payload)) => {
                assert_eq!(payload.name, "Sales");
                assert_eq!(payload.description, None);
            }
            _ => panic!("expected create request"),
        }

        let next = c.apply(Outcome::Saved {
            was_edit: false,
            result: Ok(Some("Department created!".to_string())),
        });
        assert!(matches!(next, Some(Request::List)));
        assert!(!c.form().open);
        assert_eq!(c.take_notices(), vec![Notice::success("Department created!")]);

        c.apply(Outcome::Listed(Ok(vec![dept("1", "Old"), dept("2", "Sales")])));
        let names: Vec<_> = c.rows().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Old", "Sales"]);
    }

    #[test]
    fn test_edit_patches_target() {
        let mut c = Controller::new();
        let mut row = dept("4", "Support");
        row.description = Some("Tier 1".to_string());

        c.open_edit(&row);
        assert!(c.form().is_edit);
        assert_eq!(c.form().target_id.as_deref(), Some("4"));
        assert_eq!(c.form().values.description, "Tier 1");

        c.form_mut().values.description.clear();
        match c.submit() {
            Some(Request::Update { id, payload }) => {
                assert_eq!(id, "4");
                assert_eq!(payload.name, "Support");
                assert_eq!(payload.description, None);
            }
            _ => panic!("expected update request"),
        }

        let next = c.apply(Outcome::Saved {
            was_edit: true,
            result: Ok(None),
        });
        assert!(matches!(next, Some(Request::List)));
        assert_eq!(c.take_notices(), vec![Notice::success("Department updated")]);
    }

    #[test]
    fn test_failed_save_keeps_dialog_and_values() {
        let mut c = Controller::new();
        c.open_create();
        c.form_mut().values = DepartmentForm {
            name: "Engineering".to_string(),
            description: "Builds things".to_string(),
        };
        assert!(c.submit().is_some());

        let next = c.apply(Outcome::Saved {
            was_edit: false,
            result: Err(api_error(Some("Department already exists"))),
        });

        assert!(next.is_none());
        assert!(c.form().open);
        assert_eq!(c.form().values.name, "Engineering");
        assert_eq!(c.form().values.description, "Builds things");
        let notices = c.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].text, "Department already exists");
    }

    #[test]
    fn test_required_name_blocks_submit() {
        let mut c = Controller::new();
        c.open_create();
        c.form_mut().values.description = "No name yet".to_string();

        assert!(c.submit().is_none());
        assert_eq!(c.form().missing, Some("Name"));
        assert!(c.form().open);
        assert_eq!(c.form().values.description, "No name yet");
    }

    #[test]
    fn test_submit_without_open_dialog() {
        let mut c = Controller::new();
        assert!(c.submit().is_none());
    }

    #[test]
    fn test_delete_is_two_step() {
        let mut c = Controller::new();
        let row = dept("3", "Legal");

        c.request_delete(&row);
        assert_eq!(c.delete_target().map(|t| t.id.as_str()), Some("3"));

        match c.confirm_delete() {
            Some(Request::Delete { id }) => assert_eq!(id, "3"),
            _ => panic!("expected delete request"),
        }
        assert!(c.delete_target().is_none());
        assert!(c.confirm_delete().is_none());
    }

    #[test]
    fn test_cancel_delete_issues_nothing() {
        let mut c = Controller::new();
        c.request_delete(&dept("3", "Legal"));
        c.cancel_delete();

        assert!(c.delete_target().is_none());
        assert!(c.confirm_delete().is_none());
        assert!(c.take_notices().is_empty());
    }

    #[test]
    fn test_delete_success_uses_server_message_and_refetches() {
        let mut c = Controller::new();
        c.request_delete(&dept("3", "Legal"));
        c.confirm_delete();

        let next = c.apply(Outcome::Deleted(Ok(Some("Department deleted!".to_string()))));

        assert!(matches!(next, Some(Request::List)));
        assert_eq!(c.take_notices(), vec![Notice::success("Department deleted!")]);
    }

    #[test]
    fn test_delete_failure_notifies_without_refetch() {
        let mut c = Controller::new();
        let next = c.apply(Outcome::Deleted(Err(api_error(Some("Department has team members")))));

        assert!(next.is_none());
        assert_eq!(c.take_notices(), vec![Notice::error("Department has team members")]);
    }
}
