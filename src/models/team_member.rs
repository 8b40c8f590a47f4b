//! Team member record, request payload, and grouped-list flattening.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Team member as returned inside the grouped `GET /team` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "super::string_or_null")]
    pub designation: String,
    /// Markdown biography.
    #[serde(default, deserialize_with = "super::string_or_null")]
    pub bio: String,
    /// Upload reference (key or absolute URL).
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "super::opt_id_string")]
    pub department_id: Option<String>,
    /// Department resolved by the server for display.
    #[serde(default)]
    pub department: Option<DepartmentRef>,
}

/// Minimal department info embedded in a team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub name: String,
}

impl TeamMember {
    /// Display name of the assigned department, if the server resolved one.
    pub fn department_name(&self) -> Option<&str> {
        self.department.as_ref().map(|d| d.name.as_str())
    }
}

/// Body for `POST /team` and `PATCH /team/{id}`.
///
/// `image` is omitted entirely when no new upload happened, leaving the stored
/// image untouched on edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPayload {
    pub name: String,
    pub designation: String,
    pub bio: String,
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Flatten the `data` of `GET /team` into one sequence.
///
/// The server groups members by department id (`{"<deptId>": [..], ..}`).
/// Groups are visited in document order, members in received order; nothing
/// is re-sorted. Numeric-looking keys are not put in ascending order, so
/// `{"2": .., "1": ..}` yields group 2 first. A plain array is accepted as an
/// already-flat list.
pub fn flatten_grouped(data: Value) -> Result<Vec<TeamMember>> {
    match data {
        Value::Object(groups) => {
            let mut members = Vec::new();
            for (department_id, group) in groups {
                let chunk: Vec<TeamMember> = serde_json::from_value(group)
                    .map_err(|e| AppError::decode(format!("team group '{department_id}': {e}")))?;
                members.extend(chunk);
            }
            Ok(members)
        }
        Value::Array(_) => serde_json::from_value(data).map_err(|e| AppError::decode(format!("team list: {e}"))),
        Value::Null => Ok(Vec::new()),
        other => Err(AppError::decode(format!("unexpected team data: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(id: &str, dept: &str) -> Value {
        json!({"id": id, "name": format!("Member {id}"), "designation": "Engineer", "bio": "", "departmentId": dept})
    }

    #[test]
    fn test_flatten_keeps_group_then_member_order() {
        let data = json!({
            "9": [member("a", "9"), member("b", "9")],
            "2": [member("c", "2")],
            "5": [member("d", "5"), member("e", "5"), member("f", "5")]
        });

        let ids: Vec<String> = flatten_grouped(data).unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_flatten_preserves_every_member_once() {
        let data = json!({
            "1": [member("x", "1")],
            "2": [],
            "3": [member("y", "3"), member("z", "3")]
        });

        let members = flatten_grouped(data).unwrap();
        assert_eq!(members.len(), 3);
        let mut ids: Vec<&str> = members.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_flatten_accepts_flat_array_and_null() {
        let flat = flatten_grouped(json!([member("a", "1")])).unwrap();
        assert_eq!(flat.len(), 1);
        assert!(flatten_grouped(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_keeps_numeric_keys_in_document_order() {
        let data = json!({"2": [member("b", "2")], "1": [member("a", "1")]});
        let ids: Vec<String> = flatten_grouped(data).unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_flatten_accepts_null_text_fields() {
        let data = json!({
            "1": [
                {"id": "a", "name": "A", "designation": "X", "bio": null},
                {"id": "b", "name": "B", "designation": null, "bio": "Hi", "image": null, "departmentId": null}
            ]
        });

        let members = flatten_grouped(data).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].bio, "");
        assert_eq!(members[0].designation, "X");
        assert_eq!(members[1].designation, "");
        assert_eq!(members[1].bio, "Hi");
        assert_eq!(members[1].department_id, None);
    }

    #[test]
    fn test_flatten_rejects_bad_group() {
        let err = flatten_grouped(json!({"1": "not a list"})).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert!(flatten_grouped(json!(42)).is_err());
    }

    #[test]
    fn test_member_optional_fields() {
        let m: TeamMember = serde_json::from_value(json!({
            "id": 3,
            "name": "Ana",
            "designation": "Lead",
            "bio": "**Hi**",
            "image": "members/ana.png",
            "departmentId": 2,
            "department": {"name": "Design"}
        }))
        .unwrap();
        assert_eq!(m.id, "3");
        assert_eq!(m.department_id.as_deref(), Some("2"));
        assert_eq!(m.department_name(), Some("Design"));

        let bare: TeamMember = serde_json::from_value(json!({"id": "4", "name": "Bo"})).unwrap();
        assert_eq!(bare.image, None);
        assert_eq!(bare.department_name(), None);
    }

    #[test]
    fn test_payload_omits_missing_image() {
        let payload = TeamMemberPayload {
            name: "Ana".to_string(),
            designation: "Lead".to_string(),
            bio: String::new(),
            department_id: None,
            image: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("image").is_none());
        assert_eq!(value["departmentId"], Value::Null);

        let with_image = TeamMemberPayload {
            image: Some("members/ana.png".to_string()),
            ..payload
        };
        assert_eq!(serde_json::to_value(&with_image).unwrap()["image"], "members/ana.png");
    }
}
