//! Tool data model — the stored record, the create payload, and partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, DatabaseError};

/// Fields every tool must carry at creation time.
pub const REQUIRED_FIELDS: [&str; 5] = ["name", "category", "owner", "description", "link"];

/// A persisted tool record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Store-assigned identifier. Never changes after creation.
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub owner: String,
    pub description: String,
    /// Expected to be a URL; not checked.
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTool {
    pub name: String,
    pub category: String,
    pub owner: String,
    pub description: String,
    pub link: String,
}

impl NewTool {
    /// Build a create payload from a request body.
    ///
    /// Each required field must be a non-empty JSON string. Absent fields,
    /// `null`, `""`, and values of any other type (`0`, `false`, arrays, ...)
    /// all fail with [`ApiError::Validation`]. Extra fields are dropped.
    pub fn from_body(body: &Value) -> Result<Self, ApiError> {
        for key in REQUIRED_FIELDS {
            match body.get(key) {
                Some(Value::String(s)) if !s.is_empty() => {}
                other => {
                    debug!(field = key, value = ?other, "Create rejected: field missing or empty");
                    return Err(ApiError::Validation);
                }
            }
        }

        serde_json::from_value(body.clone()).map_err(|e| {
            debug!(error = %e, "Create rejected: body does not map to a tool");
            ApiError::Validation
        })
    }
}

/// Partial update applied verbatim to a stored tool.
///
/// `None` leaves the stored value untouched. Unknown keys in the request body,
/// including `id` and the timestamps, are ignored. Empty strings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl ToolPatch {
    /// Convert an update body into a patch.
    ///
    /// Numbers and booleans in known fields are stored as their string form
    /// (`5` becomes `"5"`). `null` leaves the field untouched. An object or
    /// array in a known field cannot be written to the store, so it surfaces
    /// as a store-side serialization failure.
    pub fn from_body(mut body: Value) -> Result<Self, DatabaseError> {
        if let Value::Object(map) = &mut body {
            for key in REQUIRED_FIELDS {
                if let Some(value) = map.get_mut(key) {
                    if matches!(value, Value::Number(_) | Value::Bool(_)) {
                        *value = Value::String(value.to_string());
                    }
                }
            }
        }

        serde_json::from_value(body)
            .map_err(|e| DatabaseError::Serialization(format!("tool patch: {e}")))
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.owner.is_none()
            && self.description.is_none()
            && self.link.is_none()
    }

    /// Builder: set owner.
    #[cfg(test)]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Builder: set name.
    #[cfg(test)]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_body() -> Value {
        json!({
            "name": "ripgrep",
            "category": "search",
            "owner": "platform",
            "description": "Fast recursive grep",
            "link": "https://github.com/BurntSushi/ripgrep"
        })
    }

    #[test]
    fn new_tool_accepts_all_fields() {
        let tool = NewTool::from_body(&full_body()).unwrap();
        assert_eq!(tool.name, "ripgrep");
        assert_eq!(tool.link, "https://github.com/BurntSushi/ripgrep");
    }

    #[test]
    fn new_tool_ignores_extra_fields() {
        let mut body = full_body();
        body["id"] = json!("not-an-id");
        body["stars"] = json!(42);
        let tool = NewTool::from_body(&body).unwrap();
        assert_eq!(tool.owner, "platform");
    }

    #[test]
    fn new_tool_rejects_each_missing_field() {
        for key in REQUIRED_FIELDS {
            let mut body = full_body();
            body.as_object_mut().unwrap().remove(key);
            assert!(
                matches!(NewTool::from_body(&body), Err(ApiError::Validation)),
                "missing {key} should fail"
            );
        }
    }

    #[test]
    fn new_tool_rejects_empty_and_falsy_values() {
        for bad in [json!(""), json!(null), json!(0), json!(false)] {
            let mut body = full_body();
            body["category"] = bad.clone();
            assert!(
                matches!(NewTool::from_body(&body), Err(ApiError::Validation)),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn new_tool_rejects_non_string_truthy_values() {
        let mut body = full_body();
        body["owner"] = json!(7);
        assert!(NewTool::from_body(&body).is_err());
    }

    #[test]
    fn new_tool_rejects_non_object_body() {
        assert!(NewTool::from_body(&json!(["name"])).is_err());
        assert!(NewTool::from_body(&json!("ripgrep")).is_err());
    }

    #[test]
    fn patch_keeps_only_known_fields() {
        let patch = ToolPatch::from_body(json!({
            "owner": "new-owner",
            "id": "00000000-0000-0000-0000-000000000000",
            "color": "blue"
        }))
        .unwrap();
        assert_eq!(patch, ToolPatch::default().with_owner("new-owner"));
    }

    #[test]
    fn patch_accepts_empty_body_and_empty_strings() {
        let empty = ToolPatch::from_body(json!({})).unwrap();
        assert!(empty.is_empty());

        let blank = ToolPatch::from_body(json!({"name": ""})).unwrap();
        assert_eq!(blank.name.as_deref(), Some(""));
        assert!(!blank.is_empty());
    }

    #[test]
    fn patch_stringifies_numbers_and_booleans() {
        let patch = ToolPatch::from_body(json!({"name": 12, "owner": true, "link": 1.5})).unwrap();
        assert_eq!(patch.name.as_deref(), Some("12"));
        assert_eq!(patch.owner.as_deref(), Some("true"));
        assert_eq!(patch.link.as_deref(), Some("1.5"));
    }

    #[test]
    fn patch_null_leaves_field_untouched() {
        let patch = ToolPatch::from_body(json!({"owner": null})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_rejects_object_or_array_in_known_field() {
        for bad in [json!({"name": {"first": "x"}}), json!({"owner": ["a"]})] {
            let err = ToolPatch::from_body(bad).unwrap_err();
            assert!(matches!(err, DatabaseError::Serialization(_)));
        }
    }

    #[test]
    fn patch_leaves_unknown_numeric_fields_alone() {
        let patch = ToolPatch::from_body(json!({"stars": 5, "category": "cli"})).unwrap();
        assert_eq!(patch.category.as_deref(), Some("cli"));
        assert!(patch.owner.is_none());
    }

    #[test]
    fn tool_serializes_camel_case_timestamps() {
        let now = Utc::now();
        let tool = Tool {
            id: Uuid::new_v4(),
            name: "n".into(),
            category: "c".into(),
            owner: "o".into(),
            description: "d".into(),
            link: "l".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["id"], tool.id.to_string());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
