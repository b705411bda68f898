use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};

use crate::migrations::{
    EXPECTED_USER_VERSION, REQUIRED_INDEX_NAMES, REQUIRED_META_KEYS, run_pending,
    safe_repair_statement,
};
use crate::state::{StoreHome, map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult, StoreFault};

/// Tables every store must carry, with the columns the code reads.
const CORE_TABLES: [(&str, &[&str]); 3] = [
    ("internal_meta", &["key", "value"]),
    ("internal_state", &["key", "value", "updated_at", "import_id"]),
    (
        "internal_import_runs",
        &[
            "import_id",
            "status",
            "created_at",
            "merge_mode",
            "message",
            "indicator_rows",
            "vendor_rows",
            "duplicates_dropped",
            "source_kind",
            "source_ref",
        ],
    ),
];

const DEFAULT_SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub db_path: PathBuf,
    pub schema_version: String,
}

/// Opens (creating on first use) the store under the resolved home.
pub fn ensure_initialized() -> ClientResult<SetupContext> {
    initialize(None)
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    initialize(Some(home_override))
}

fn initialize(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    let home = StoreHome::resolve(home_override)?;
    home.create()?;

    let db_path = home.db_path();
    let mut connection = open_connection(&db_path)?;
    run_pending(&mut connection).map_err(|error| migration_error(&db_path, &error))?;

    let schema = Schema {
        connection: &connection,
        db_path: &db_path,
    };
    schema.check_tables()?;
    schema.restore_missing()?;
    schema.check_contract()?;

    let schema_version = schema
        .meta_value("schema_version")?
        .unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string());
    tracing::debug!(db_path = %db_path.display(), %schema_version, "store ready");

    Ok(SetupContext {
        db_path,
        schema_version,
    })
}

/// Lock, corruption and permission problems keep their own codes even when
/// they surface mid-migration.
fn migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    if let rusqlite_migration::Error::RusqliteError { err, .. } = error {
        let mapped = map_sqlite_error(db_path, err);
        if !mapped.is_store_fault(StoreFault::InitFailed) {
            return mapped;
        }
    }
    ClientError::store(StoreFault::MigrationFailed, db_path, Some(&error.to_string()))
}

struct Schema<'a> {
    connection: &'a Connection,
    db_path: &'a Path,
}

impl Schema<'_> {
    fn sql_error(&self, error: rusqlite::Error) -> ClientError {
        map_sqlite_error(self.db_path, &error)
    }

    fn corrupt(&self) -> ClientError {
        ClientError::store(StoreFault::Corrupt, self.db_path, None)
    }

    fn has_object(&self, kind: &str, name: &str) -> ClientResult<bool> {
        self.connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2",
                params![kind, name],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .map_err(|error| self.sql_error(error))
    }

    fn columns(&self, table: &str) -> ClientResult<Vec<String>> {
        let mut statement = self
            .connection
            .prepare("SELECT name FROM pragma_table_info(?1)")
            .map_err(|error| self.sql_error(error))?;
        let names = statement
            .query_map([table], |row| row.get::<_, String>(0))
            .map_err(|error| self.sql_error(error))?;
        names
            .collect::<Result<Vec<String>, _>>()
            .map_err(|error| self.sql_error(error))
    }

    fn meta_value(&self, key: &str) -> ClientResult<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM internal_meta WHERE key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| self.sql_error(error))
    }

    fn check_tables(&self) -> ClientResult<()> {
        for (table, required) in CORE_TABLES {
            if !self.has_object("table", table)? {
                tracing::warn!(table, "store table is missing");
                return Err(self.corrupt());
            }
            let columns = self.columns(table)?;
            if let Some(missing) = required
                .iter()
                .find(|column| !columns.iter().any(|present| present == *column))
            {
                tracing::warn!(table, column = *missing, "store table is missing a column");
                return Err(self.corrupt());
            }
        }
        Ok(())
    }

    /// Insert-only: a missing meta key comes back, a drifted value does not.
    fn restore_missing(&self) -> ClientResult<()> {
        for (key, value) in REQUIRED_META_KEYS {
            self.connection
                .execute(
                    "INSERT OR IGNORE INTO internal_meta (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )
                .map_err(|error| self.sql_error(error))?;
        }

        for index in REQUIRED_INDEX_NAMES {
            if self.has_object("index", index)? {
                continue;
            }
            let Some(sql) = safe_repair_statement(index) else {
                return Err(ClientError::store(
                    StoreFault::InitFailed,
                    self.db_path,
                    Some(&format!("no repair statement for index `{index}`")),
                ));
            };
            tracing::warn!(index, "recreating missing index");
            self.connection
                .execute_batch(&sql)
                .map_err(|error| self.sql_error(error))?;
        }
        Ok(())
    }

    fn check_contract(&self) -> ClientResult<()> {
        let user_version = self
            .connection
            .pragma_query_value(None, "user_version", |row| row.get::<_, i64>(0))
            .map_err(|error| self.sql_error(error))?;
        if user_version != EXPECTED_USER_VERSION {
            return Err(self.corrupt());
        }

        for (key, expected) in REQUIRED_META_KEYS {
            if self.meta_value(key)?.as_deref() != Some(expected) {
                tracing::warn!(key, "store meta value drifted");
                return Err(self.corrupt());
            }
        }

        for index in REQUIRED_INDEX_NAMES {
            if !self.has_object("index", index)? {
                return Err(self.corrupt());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{CORE_TABLES, Schema};
    use crate::migrations::run_pending;

    #[test]
    fn bootstrap_creates_every_core_column() {
        let connection = Connection::open_in_memory();
        assert!(connection.is_ok());
        if let Ok(mut connection) = connection {
            assert!(run_pending(&mut connection).is_ok());
            let db_path = std::path::Path::new(":memory:");
            let schema = Schema {
                connection: &connection,
                db_path,
            };
            assert!(schema.check_tables().is_ok());
            assert!(schema.check_contract().is_ok());
            for (table, required) in CORE_TABLES {
                let columns = schema.columns(table);
                assert!(columns.is_ok());
                if let Ok(columns) = columns {
                    assert_eq!(columns.len(), required.len());
                }
            }
        }
    }

    #[test]
    fn unknown_table_reports_no_columns() {
        let connection = Connection::open_in_memory();
        assert!(connection.is_ok());
        if let Ok(connection) = connection {
            let schema = Schema {
                connection: &connection,
                db_path: std::path::Path::new(":memory:"),
            };
            let columns = schema.columns("internal_missing");
            assert!(columns.is_ok());
            if let Ok(columns) = columns {
                assert!(columns.is_empty());
            }
        }
    }
}
