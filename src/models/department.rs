//! Department record and request payload.

use serde::{Deserialize, Serialize};

/// Department as returned by `GET /department`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Relation counts computed by the server.
    #[serde(default, rename = "_count")]
    pub counts: DepartmentCounts,
}

/// Server-side relation counts for a department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCounts {
    #[serde(default)]
    pub team_members: u32,
}

impl Department {
    /// Number of team members assigned to this department.
    pub fn team_member_count(&self) -> u32 {
        self.counts.team_members
    }
}

/// Body for `POST /department` and `PATCH /department/{id}`.
///
/// `description` serializes as `null` when empty so an edit can clear it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_defaults_to_zero() {
        let dept: Department = serde_json::from_value(json!({"id": "1", "name": "Engineering"})).unwrap();
        assert_eq!(dept.name, "Engineering");
        assert_eq!(dept.description, None);
        assert_eq!(dept.team_member_count(), 0);
    }

    #[test]
    fn test_count_and_numeric_id() {
        let dept: Department = serde_json::from_value(json!({
            "id": 7,
            "name": "Design",
            "description": "Product and brand",
            "_count": {"teamMembers": 4}
        }))
        .unwrap();
        assert_eq!(dept.id, "7");
        assert_eq!(dept.description.as_deref(), Some("Product and brand"));
        assert_eq!(dept.team_member_count(), 4);
    }

    #[test]
    fn test_payload_sends_null_description() {
        let payload = DepartmentPayload {
            name: "Ops".to_string(),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Ops", "description": null})
        );
    }
}
