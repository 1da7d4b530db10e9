//! Filling in a published form and handing it to the submission endpoint.
//!
//! The endpoint is an external collaborator reached through
//! [`SubmissionEndpoint`]. A [`FormSession`] only calls it once validation
//! passes, and a failed call leaves the session as it was.

use crate::{
    error::Result, validate, Error, FieldDefinition, FieldId, FieldValue, FormDefinition, FormId,
    FormValues, ValidationErrors,
};
use serde::{Deserialize, Serialize};

/// Body sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Values by field id
    #[serde(alias = "formData", default)]
    pub values: FormValues,
    /// The published field list the values were entered against
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Acknowledgement of a stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: String,
    /// RFC 3339 timestamp assigned by the endpoint
    pub submitted_at: String,
}

/// Endpoint reply on the wire.
///
/// `{"success": true, "submissionId": ..., "submittedAt": ...}` or
/// `{"success": false, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

impl SubmitResponse {
    pub fn accepted(receipt: SubmissionReceipt, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            submission_id: Some(receipt.submission_id),
            submitted_at: Some(receipt.submitted_at),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            submission_id: None,
            submitted_at: None,
        }
    }

    /// Turn the reply into a receipt or a transport error.
    pub fn into_result(self) -> Result<SubmissionReceipt> {
        match self {
            SubmitResponse {
                success: true,
                submission_id: Some(submission_id),
                submitted_at: Some(submitted_at),
                ..
            } => Ok(SubmissionReceipt {
                submission_id,
                submitted_at,
            }),
            SubmitResponse { success: true, .. } => Err(Error::Transport(
                "acknowledgement without submission id".to_string(),
            )),
            SubmitResponse { message, .. } => Err(Error::Transport(
                message.unwrap_or_else(|| "submission rejected".to_string()),
            )),
        }
    }
}

/// The external store for submissions.
pub trait SubmissionEndpoint {
    /// Durably store one submission. Failures are reported as
    /// [`Error::Transport`].
    fn submit(&mut self, form_id: &str, payload: &SubmissionPayload) -> Result<SubmissionReceipt>;
}

/// What happened to a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationErrors),
    /// The endpoint stored the submission.
    Accepted(SubmissionReceipt),
}

/// Filler state for one published form.
#[derive(Debug, Clone)]
pub struct FormSession {
    form_id: FormId,
    form: FormDefinition,
    values: FormValues,
    errors: ValidationErrors,
    attempted: bool,
}

impl FormSession {
    pub fn new(form_id: impl Into<FormId>, form: FormDefinition) -> Self {
        Self {
            form_id: form_id.into(),
            form,
            values: FormValues::new(),
            errors: ValidationErrors::new(),
            attempted: false,
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Errors from the latest validation pass.
    ///
    /// Empty until the first [`validate`](Self::validate) or
    /// [`submit`](Self::submit); from then on every value change recomputes
    /// the whole map.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Record a value. Once the form was validated, errors are recomputed.
    pub fn set_value(&mut self, field_id: impl Into<FieldId>, value: impl Into<FieldValue>) {
        self.values.insert(field_id.into(), value.into());
        self.revalidate();
    }

    pub fn clear_value(&mut self, field_id: &str) {
        self.values.remove(field_id);
        self.revalidate();
    }

    /// Run a full validation pass and keep its result. Later value changes
    /// keep the result current.
    pub fn validate(&mut self) -> &ValidationErrors {
        self.attempted = true;
        self.errors = validate(self.form.fields(), &self.values);
        &self.errors
    }

    fn revalidate(&mut self) {
        if self.attempted {
            self.validate();
        }
    }

    /// Validate and, when clean, hand the values to `endpoint`.
    ///
    /// On acceptance the values are cleared for a fresh entry. On a
    /// transport failure the values stay and the error is returned.
    pub fn submit<E>(&mut self, endpoint: &mut E) -> Result<SubmitOutcome>
    where
        E: SubmissionEndpoint + ?Sized,
    {
        if !self.validate().is_valid() {
            tracing::debug!(
                form_id = %self.form_id,
                failed = self.errors.len(),
                "submission blocked by validation"
            );
            return Ok(SubmitOutcome::Rejected(self.errors.clone()));
        }

        let payload = SubmissionPayload {
            values: self.values.clone(),
            fields: self.form.fields().to_vec(),
        };
        match endpoint.submit(&self.form_id, &payload) {
            Ok(receipt) => {
                tracing::info!(
                    form_id = %self.form_id,
                    submission_id = %receipt.submission_id,
                    "form submitted"
                );
                self.values.clear();
                self.attempted = false;
                Ok(SubmitOutcome::Accepted(receipt))
            }
            Err(e) => {
                tracing::warn!(form_id = %self.form_id, error = %e, "submission failed");
                Err(e)
            }
        }
    }
}
