//! Unit tests for the submission protocol.
//!
//! These tests pin the JSON exchanged between a filler and the server.

use formwright_engine::{
    Error, FieldDefinition, FieldPatch, FieldType, FieldValue, FormSession, InputType, Mutation,
    Store, SubmissionEndpoint, SubmissionPayload, SubmissionReceipt, SubmitOutcome, SubmitResponse,
};
use serde_json::json;

/// Test helper to publish a one-field contact form.
fn publish_contact_form() -> (Store, String, String) {
    let mut store = Store::new();
    store.dispatch(Mutation::add_field(FieldType::Text));
    let field_id = store.fields()[0].id().clone();
    store.dispatch(Mutation::update_field(
        field_id.clone(),
        FieldPatch::new()
            .label("Email")
            .required(true)
            .input_type(InputType::Email),
    ));
    let form_id = store.publish();
    (store, form_id, field_id)
}

/// Replays a recorded server reply instead of calling the network.
struct CannedEndpoint {
    reply: serde_json::Value,
    sent: Vec<serde_json::Value>,
}

impl SubmissionEndpoint for CannedEndpoint {
    fn submit(
        &mut self,
        _form_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, Error> {
        self.sent.push(serde_json::to_value(payload).unwrap());
        let response: SubmitResponse = serde_json::from_value(self.reply.clone())
            .map_err(|e| Error::Transport(e.to_string()))?;
        response.into_result()
    }
}

#[cfg(test)]
mod protocol_tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let (store, form_id, field_id) = publish_contact_form();
        let mut session = store.open_form(&form_id).unwrap();
        session.set_value(field_id.clone(), "ada@example.com");

        let mut endpoint = CannedEndpoint {
            reply: json!({
                "success": true,
                "message": "Form submitted successfully",
                "submissionId": "form_x_1.json",
                "submittedAt": "2026-01-01T00:00:00.000Z"
            }),
            sent: Vec::new(),
        };
        session.submit(&mut endpoint).unwrap();

        let body = &endpoint.sent[0];
        assert_eq!(body["values"][&field_id], "ada@example.com");
        assert_eq!(body["fields"][0]["inputType"], "email");
        assert_eq!(body["fields"][0]["required"], true);
    }

    #[test]
    fn test_success_reply_parsing() {
        let (store, form_id, field_id) = publish_contact_form();
        let mut session = store.open_form(&form_id).unwrap();
        session.set_value(field_id, "ada@example.com");

        let mut endpoint = CannedEndpoint {
            reply: json!({
                "success": true,
                "message": "Form submitted successfully",
                "submissionId": "form_x_1767225600000.json",
                "submittedAt": "2026-01-01T00:00:00.000Z"
            }),
            sent: Vec::new(),
        };

        match session.submit(&mut endpoint).unwrap() {
            SubmitOutcome::Accepted(receipt) => {
                assert_eq!(receipt.submission_id, "form_x_1767225600000.json");
                assert_eq!(receipt.submitted_at, "2026-01-01T00:00:00.000Z");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(session.values().is_empty());
    }

    #[test]
    fn test_error_reply_keeps_values() {
        let (store, form_id, field_id) = publish_contact_form();
        let mut session: FormSession = store.open_form(&form_id).unwrap();
        session.set_value(field_id.clone(), "ada@example.com");

        let mut endpoint = CannedEndpoint {
            reply: json!({
                "success": false,
                "message": "Error submitting form",
                "error": "Storage error: disk full"
            }),
            sent: Vec::new(),
        };

        let result = session.submit(&mut endpoint);
        assert_eq!(
            result,
            Err(Error::Transport("Error submitting form".to_string()))
        );
        assert_eq!(
            session.values()[&field_id],
            FieldValue::Text("ada@example.com".into())
        );
    }

    #[test]
    fn test_invalid_values_never_reach_endpoint() {
        let (store, form_id, field_id) = publish_contact_form();
        let mut session = store.open_form(&form_id).unwrap();
        session.set_value(field_id.clone(), "not-an-email");

        let mut endpoint = CannedEndpoint {
            reply: json!({"success": true}),
            sent: Vec::new(),
        };

        let outcome = session.submit(&mut endpoint).unwrap();
        match outcome {
            SubmitOutcome::Rejected(errors) => {
                assert_eq!(
                    errors.get(&field_id),
                    Some("Please enter a valid email address")
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(endpoint.sent.is_empty());
    }

    #[test]
    fn test_legacy_form_data_body() {
        let body = json!({
            "formData": {"name": "Ada", "consent": true, "toppings": ["cheese"]},
            "fields": [
                {"id": "name", "type": "text", "label": "Name"},
                {"id": "consent", "type": "checkbox", "checkboxType": "single", "label": "OK?"}
            ]
        });
        let payload: SubmissionPayload = serde_json::from_value(body).unwrap();

        assert_eq!(payload.values.len(), 3);
        assert_eq!(payload.values["consent"], FieldValue::Bool(true));
        assert_eq!(payload.fields.len(), 2);
        let expected = FieldDefinition::with_id("consent", FieldType::Checkbox)
            .apply_update(&FieldPatch::new().label("OK?"));
        assert_eq!(payload.fields[1], expected);
    }
}
