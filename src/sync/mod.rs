//! One-shot import of developer profiles from the shared `jobs.json` document.
//!
//! Each entry is upserted on its own: there is no transaction around the whole
//! run, so when an entry fails the ones before it stay committed and the caller
//! is expected to stop.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::services::developer_service::DeveloperService;

/// Location of the document relative to this crate's directory.
pub const SOURCE_RELATIVE_PATH: &str = "../src/jobs.json";

pub fn default_source_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SOURCE_RELATIVE_PATH)
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed sync document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("user #{index} has no id")]
    MissingId { index: usize },

    #[error("user #{index} has a non-integer id: {value}")]
    InvalidId { index: usize, value: Value },

    #[error(transparent)]
    Storage(#[from] crate::error::Error),

    #[error("failed to write progress: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct UsersDocument {
    #[serde(default)]
    pub users: Vec<SyncUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncUser {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRecord {
    pub id: i64,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub about: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
}

impl SyncUser {
    pub fn into_record(self, index: usize) -> Result<SyncRecord, SyncError> {
        let raw = self.id.ok_or(SyncError::MissingId { index })?;
        let id = coerce_id(&raw).ok_or(SyncError::InvalidId { index, value: raw })?;

        Ok(SyncRecord {
            id,
            email: self.email,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            about: self.about.unwrap_or_default(),
        })
    }
}

/// Integers, integral floats truncated toward zero, and numeric strings.
fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub async fn load(path: &Path) -> Result<UsersDocument, SyncError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Upserts every user in order, writing one progress line per record to `out`.
/// Stops at the first failing entry.
pub async fn run<W: Write>(
    service: &DeveloperService,
    document: UsersDocument,
    out: &mut W,
) -> Result<SyncSummary, SyncError> {
    let mut summary = SyncSummary::default();

    for (index, user) in document.users.into_iter().enumerate() {
        let record = user.into_record(index)?;
        let created = service
            .upsert_profile(
                record.id,
                record.email.as_deref(),
                &record.first_name,
                &record.last_name,
                &record.about,
            )
            .await?;

        if created {
            summary.created += 1;
        } else {
            summary.updated += 1;
        }
        writeln!(
            out,
            "{} developer: {} - {}",
            if created { "Created" } else { "Updated" },
            record.id,
            record.email.as_deref().unwrap_or("None")
        )?;
    }

    writeln!(out, "Sync complete!")?;
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        "Developer sync finished"
    );
    Ok(summary)
}
