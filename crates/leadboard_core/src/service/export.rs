//! Record mirror export.
//!
//! The export is a pretty-printed JSON document with both record
//! collections and an RFC 3339 generation timestamp, written to
//! `leadboard_data_<YYYY-MM-DD>.json`.

use crate::clock::Clock;
use crate::model::record::Record;
use crate::repo::card_repo::CardRepository;
use crate::repo::record_repo::RecordRepository;
use crate::service::lifecycle::LifecycleEngine;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const EXPORT_FILE_PREFIX: &str = "leadboard_data_";

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    /// Clock reading outside the representable date range.
    Timestamp(i64),
    Format(time::error::Format),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timestamp(ms) => write!(f, "timestamp out of range: {ms}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Timestamp(_) => None,
            Self::Format(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<time::error::Format> for ExportError {
    fn from(value: time::error::Format) -> Self {
        Self::Format(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Downloadable snapshot of the record mirror.
/// Write-only: `generated_at_ms` is not part of the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub deals: Vec<Record>,
    pub orders: Vec<Record>,
    pub generated_at: String,
    #[serde(skip)]
    generated_at_ms: i64,
}

impl ExportDocument {
    /// File name carrying the generation date, e.g. `leadboard_data_2024-05-01.json`.
    pub fn file_name(&self) -> Result<String, ExportError> {
        let date = utc_datetime(self.generated_at_ms)?.date();
        Ok(format!(
            "{EXPORT_FILE_PREFIX}{:04}-{:02}-{:02}.json",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }

    /// Writes the document into `dir` and returns the file path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(self.file_name()?);
        let body = serde_json::to_string_pretty(self)?;
        if let Err(err) = std::fs::write(&path, body) {
            error!(
                "event=export_write module=export status=error error_code=write_failed error={err}"
            );
            return Err(err.into());
        }
        info!(
            "event=export_write module=export status=ok deals={} orders={}",
            self.deals.len(),
            self.orders.len()
        );
        Ok(path)
    }
}

impl<C, R, K> LifecycleEngine<C, R, K>
where
    C: CardRepository,
    R: RecordRepository,
    K: Clock,
{
    /// Snapshots both record collections at the current time.
    pub fn export_document(&self) -> Result<ExportDocument, ExportError> {
        let now = self.now_ms();
        let records = self.records();
        Ok(ExportDocument {
            deals: records.deals.clone(),
            orders: records.orders.clone(),
            generated_at: utc_datetime(now)?.format(&Rfc3339)?,
            generated_at_ms: now,
        })
    }
}

fn utc_datetime(ms: i64) -> Result<OffsetDateTime, ExportError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .map_err(|_| ExportError::Timestamp(ms))
}
