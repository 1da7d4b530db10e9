//! Durable storage for submissions.
//!
//! Two backends sit behind [`Storage`]: one JSON file per submission in a
//! data directory, or a row in the PostgreSQL `submissions` table.

mod files;

pub use files::FileStore;

use crate::db::{self, Pool};
use crate::error::Result;
use chrono::{DateTime, Utc};
use formwright_engine::{FieldDefinition, FormValues};
use serde::{Deserialize, Serialize};

/// One stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub form_id: String,
    /// Submitted values by field id
    pub data: FormValues,
    /// The published field list the values were entered against
    pub fields: Vec<FieldDefinition>,
    pub submitted_at: DateTime<Utc>,
}

/// Where submissions are written.
#[derive(Clone)]
pub enum Storage {
    Files(FileStore),
    Postgres(Pool),
}

impl Storage {
    /// Persist a record, returning its submission id.
    pub async fn store(&self, record: &SubmissionRecord) -> Result<String> {
        match self {
            Storage::Files(files) => files.write(record).await,
            Storage::Postgres(pool) => {
                let id = db::insert_submission(pool, record).await?;
                Ok(id.to_string())
            }
        }
    }

    /// Human-readable location for start-up logs.
    pub fn describe(&self) -> String {
        match self {
            Storage::Files(files) => files.dir().display().to_string(),
            Storage::Postgres(_) => "PostgreSQL".to_string(),
        }
    }
}
