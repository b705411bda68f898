//! Persisted dashboard state.
//!
//! The merged indicator mapping and the vendor list live as JSON documents in
//! `internal_state` under fixed keys. Every import attempt that reaches the
//! store leaves a row in `internal_import_runs`.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use ulid::Ulid;

use crate::merge::{MergeMode, merge_indicators, replace_vendors};
use crate::model::{IndicatorYears, VendorRecord};
use crate::setup::SetupContext;
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult, StoreFault};

pub const INDICATORS_KEY: &str = "dashboard.indicators";
pub const VENDORS_KEY: &str = "dashboard.vendors";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Committed,
    Rejected,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Rejected => "rejected",
        }
    }
}

/// What the caller knows about an import attempt before it is recorded.
#[derive(Debug, Clone, Default)]
pub struct RunInput<'a> {
    pub message: &'a str,
    pub indicator_rows: usize,
    pub vendor_rows: usize,
    pub duplicates_dropped: usize,
    pub source_kind: Option<&'a str>,
    pub source_ref: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRun {
    pub import_id: String,
    pub status: String,
    pub created_at: String,
    pub merge_mode: Option<String>,
    pub message: String,
    pub indicator_rows: i64,
    pub vendor_rows: i64,
    pub duplicates_dropped: i64,
    pub source_kind: Option<String>,
    pub source_ref: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommittedImport {
    pub import_id: String,
    pub indicators: IndicatorYears,
    pub vendors: Vec<VendorRecord>,
}

pub struct Store {
    connection: Connection,
    db_path: PathBuf,
}

impl Store {
    pub fn open(setup: &SetupContext) -> ClientResult<Self> {
        let connection = open_connection(&setup.db_path)?;
        Ok(Self {
            connection,
            db_path: setup.db_path.clone(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn load_indicators(&self) -> ClientResult<IndicatorYears> {
        Ok(read_document(&self.connection, &self.db_path, INDICATORS_KEY)?.unwrap_or_default())
    }

    pub fn load_vendors(&self) -> ClientResult<Vec<VendorRecord>> {
        Ok(read_document(&self.connection, &self.db_path, VENDORS_KEY)?.unwrap_or_default())
    }

    /// Merges `incoming` into the stored indicators, replaces the vendor
    /// list and records a committed run, all in one write transaction.
    pub fn save_import(
        &mut self,
        incoming: &IndicatorYears,
        vendors: Vec<VendorRecord>,
        mode: MergeMode,
        run: &RunInput<'_>,
    ) -> ClientResult<CommittedImport> {
        let db_path = self.db_path.clone();
        let import_id = new_import_id();
        let timestamp = now_timestamp();

        let transaction = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_sqlite_error(&db_path, &error))?;

        let existing: IndicatorYears =
            read_document(&transaction, &db_path, INDICATORS_KEY)?.unwrap_or_default();
        let indicators = merge_indicators(&existing, incoming, mode);
        let vendors = replace_vendors(vendors);

        write_document(
            &transaction,
            &db_path,
            INDICATORS_KEY,
            &indicators,
            &timestamp,
            Some(&import_id),
        )?;
        write_document(
            &transaction,
            &db_path,
            VENDORS_KEY,
            &vendors,
            &timestamp,
            Some(&import_id),
        )?;
        insert_run(
            &transaction,
            &db_path,
            &import_id,
            RunStatus::Committed,
            Some(mode),
            &timestamp,
            run,
        )?;

        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&db_path, &error))?;

        tracing::info!(%import_id, merge_mode = mode.as_str(), "import committed");
        Ok(CommittedImport {
            import_id,
            indicators,
            vendors,
        })
    }

    /// Records a rejected attempt. Dashboard documents are untouched.
    pub fn record_rejected_import(&mut self, run: &RunInput<'_>) -> ClientResult<String> {
        let import_id = new_import_id();
        insert_run(
            &self.connection,
            &self.db_path,
            &import_id,
            RunStatus::Rejected,
            None,
            &now_timestamp(),
            run,
        )?;
        Ok(import_id)
    }

    /// Overwrites the indicator document, used by inline edits.
    pub fn save_indicators(&mut self, indicators: &IndicatorYears) -> ClientResult<()> {
        let db_path = self.db_path.clone();
        let transaction = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_sqlite_error(&db_path, &error))?;
        write_document(
            &transaction,
            &db_path,
            INDICATORS_KEY,
            indicators,
            &now_timestamp(),
            None,
        )?;
        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&db_path, &error))
    }

    /// Import history, newest first.
    pub fn list_import_runs(&self) -> ClientResult<Vec<ImportRun>> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT
                    import_id,
                    status,
                    created_at,
                    merge_mode,
                    message,
                    indicator_rows,
                    vendor_rows,
                    duplicates_dropped,
                    source_kind,
                    source_ref
                 FROM internal_import_runs
                 ORDER BY created_at DESC, import_id DESC",
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        let rows_iter = statement
            .query_map([], |row| {
                Ok(ImportRun {
                    import_id: row.get(0)?,
                    status: row.get(1)?,
                    created_at: row.get(2)?,
                    merge_mode: row.get(3)?,
                    message: row.get(4)?,
                    indicator_rows: row.get(5)?,
                    vendor_rows: row.get(6)?,
                    duplicates_dropped: row.get(7)?,
                    source_kind: row.get(8)?,
                    source_ref: row.get(9)?,
                })
            })
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut runs = Vec::new();
        for row in rows_iter {
            runs.push(row.map_err(|error| map_sqlite_error(&self.db_path, &error))?);
        }
        Ok(runs)
    }
}

fn read_document<T>(connection: &Connection, db_path: &Path, key: &str) -> ClientResult<Option<T>>
where
    T: DeserializeOwned,
{
    let raw = connection
        .query_row(
            "SELECT value FROM internal_state WHERE key = ?1 LIMIT 1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let Some(json) = raw else {
        return Ok(None);
    };

    serde_json::from_str::<T>(&json).map(Some).map_err(|error| {
        tracing::error!(key, %error, "stored document could not be decoded");
        ClientError::store(StoreFault::Corrupt, db_path, None)
    })
}

fn write_document<T>(
    connection: &Connection,
    db_path: &Path,
    key: &str,
    value: &T,
    timestamp: &str,
    import_id: Option<&str>,
) -> ClientResult<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    connection
        .execute(
            "INSERT INTO internal_state (key, value, updated_at, import_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at,
                import_id = excluded.import_id",
            params![key, json, timestamp, import_id],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(())
}

fn insert_run(
    connection: &Connection,
    db_path: &Path,
    import_id: &str,
    status: RunStatus,
    mode: Option<MergeMode>,
    timestamp: &str,
    run: &RunInput<'_>,
) -> ClientResult<()> {
    connection
        .execute(
            "INSERT INTO internal_import_runs (
                import_id,
                status,
                created_at,
                merge_mode,
                message,
                indicator_rows,
                vendor_rows,
                duplicates_dropped,
                source_kind,
                source_ref
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                import_id,
                status.as_str(),
                timestamp,
                mode.map(|value| value.as_str()),
                run.message,
                run.indicator_rows as i64,
                run.vendor_rows as i64,
                run.duplicates_dropped as i64,
                run.source_kind,
                run.source_ref
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(())
}

fn new_import_id() -> String {
    format!("imp_{}", Ulid::new())
}

/// RFC 3339 in UTC with millisecond precision. The fixed width keeps text
/// order equal to time order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
