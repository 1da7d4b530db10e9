//! Submit handler - stores one filled-in form.

use crate::error::Result;
use crate::storage::{Storage, SubmissionRecord};
use chrono::{SecondsFormat, Utc};
use formwright_engine::{SubmissionPayload, SubmissionReceipt, SubmitResponse};

/// Reply message for stored submissions.
pub const SUBMITTED_MESSAGE: &str = "Form submitted successfully";

/// Store a submission for `form_id`.
///
/// Values are stored as received; validation already happened on the
/// filler side.
pub async fn handle_submit(
    storage: &Storage,
    form_id: String,
    payload: SubmissionPayload,
) -> Result<SubmitResponse> {
    let record = SubmissionRecord {
        form_id,
        data: payload.values,
        fields: payload.fields,
        submitted_at: Utc::now(),
    };

    let submission_id = storage.store(&record).await?;
    tracing::info!(
        form_id = %record.form_id,
        submission_id = %submission_id,
        values = record.data.len(),
        "Form submitted"
    );

    let receipt = SubmissionReceipt {
        submission_id,
        submitted_at: record
            .submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(SubmitResponse::accepted(receipt, SUBMITTED_MESSAGE))
}
