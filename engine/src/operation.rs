//! Mutation types for expressing builder changes.
//!
//! The builder is never edited directly; the interaction layer produces a
//! [`Mutation`] and the store applies it. On the wire a mutation is an object
//! tagged by `"type"`:
//!
//! ```json
//! {"type": "REORDER_FIELDS", "activeId": "f2", "overId": "f1"}
//! ```

use crate::{FieldId, FieldPatch, FieldType, OptionId, OptionPatch};
use serde::{Deserialize, Serialize};

/// A change that can be dispatched to the builder store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutation {
    /// Append a default field of the given type.
    AddField {
        #[serde(rename = "fieldType")]
        field_type: FieldType,
    },
    /// Merge a patch onto an existing field.
    UpdateField { id: FieldId, patch: FieldPatch },
    RemoveField { id: FieldId },
    /// Move `active_id` to the position currently held by `over_id`.
    ReorderFields {
        #[serde(rename = "activeId")]
        active_id: FieldId,
        #[serde(rename = "overId")]
        over_id: FieldId,
    },
    /// Snapshot the current field list under a fresh form id.
    PublishForm,

    // Option editing on select, radio and checkbox-group fields.
    AddOption {
        #[serde(rename = "fieldId")]
        field_id: FieldId,
    },
    UpdateOption {
        #[serde(rename = "fieldId")]
        field_id: FieldId,
        #[serde(rename = "optionId")]
        option_id: OptionId,
        patch: OptionPatch,
    },
    RemoveOption {
        #[serde(rename = "fieldId")]
        field_id: FieldId,
        #[serde(rename = "optionId")]
        option_id: OptionId,
    },
    DuplicateOption {
        #[serde(rename = "fieldId")]
        field_id: FieldId,
        #[serde(rename = "optionId")]
        option_id: OptionId,
    },
}

impl Mutation {
    pub fn add_field(field_type: FieldType) -> Self {
        Mutation::AddField { field_type }
    }

    pub fn update_field(id: impl Into<FieldId>, patch: FieldPatch) -> Self {
        Mutation::UpdateField {
            id: id.into(),
            patch,
        }
    }

    pub fn remove_field(id: impl Into<FieldId>) -> Self {
        Mutation::RemoveField { id: id.into() }
    }

    pub fn reorder_fields(active_id: impl Into<FieldId>, over_id: impl Into<FieldId>) -> Self {
        Mutation::ReorderFields {
            active_id: active_id.into(),
            over_id: over_id.into(),
        }
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::AddField { .. } => "add_field",
            Mutation::UpdateField { .. } => "update_field",
            Mutation::RemoveField { .. } => "remove_field",
            Mutation::ReorderFields { .. } => "reorder_fields",
            Mutation::PublishForm => "publish_form",
            Mutation::AddOption { .. } => "add_option",
            Mutation::UpdateOption { .. } => "update_option",
            Mutation::RemoveOption { .. } => "remove_option",
            Mutation::DuplicateOption { .. } => "duplicate_option",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors() {
        assert_eq!(
            Mutation::add_field(FieldType::Select),
            Mutation::AddField {
                field_type: FieldType::Select
            }
        );
        assert_eq!(Mutation::remove_field("f1").kind(), "remove_field");
        assert_eq!(Mutation::reorder_fields("a", "b").kind(), "reorder_fields");
    }

    #[test]
    fn serialization_add_field() {
        let json = serde_json::to_value(Mutation::add_field(FieldType::Textarea)).unwrap();
        assert_eq!(json, json!({"type": "ADD_FIELD", "fieldType": "textarea"}));
    }

    #[test]
    fn serialization_reorder() {
        let mutation: Mutation = serde_json::from_value(json!({
            "type": "REORDER_FIELDS",
            "activeId": "f2",
            "overId": "f1"
        }))
        .unwrap();
        assert_eq!(mutation, Mutation::reorder_fields("f2", "f1"));
    }

    #[test]
    fn serialization_update_field() {
        let mutation: Mutation = serde_json::from_value(json!({
            "type": "UPDATE_FIELD",
            "id": "f1",
            "patch": {"label": "Email", "required": true, "inputType": "email"}
        }))
        .unwrap();

        match mutation {
            Mutation::UpdateField { id, patch } => {
                assert_eq!(id, "f1");
                assert_eq!(patch.label.as_deref(), Some("Email"));
                assert_eq!(patch.required, Some(true));
                assert_eq!(patch.input_type, Some(crate::InputType::Email));
            }
            other => panic!("unexpected mutation: {:?}", other),
        }
    }

    #[test]
    fn serialization_publish() {
        let json = serde_json::to_string(&Mutation::PublishForm).unwrap();
        assert_eq!(json, r#"{"type":"PUBLISH_FORM"}"#);

        let parsed: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Mutation::PublishForm);
    }

    #[test]
    fn unknown_field_type_fails_to_parse() {
        let result: Result<Mutation, _> =
            serde_json::from_value(json!({"type": "ADD_FIELD", "fieldType": "slider"}));
        assert!(result.is_err());
    }
}
