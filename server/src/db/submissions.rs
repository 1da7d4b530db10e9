//! Database operations for the submissions table.

use crate::storage::SubmissionRecord;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a submission, returning its generated id.
pub async fn insert_submission(pool: &PgPool, record: &SubmissionRecord) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO submissions (id, form_id, data, fields, submitted_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(&record.form_id)
    .bind(Json(&record.data))
    .bind(Json(&record.fields))
    .bind(record.submitted_at)
    .execute(pool)
    .await?;

    tracing::debug!(submission_id = %id, form_id = %record.form_id, "submission inserted");
    Ok(id)
}
