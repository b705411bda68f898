//! Location of the board database and the mapping from io and sqlite
//! failures onto [`StoreFault`] codes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::ffi::ErrorCode;

use crate::error::StoreFault;
use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "TRADEBOARD_HOME";

const DEFAULT_DIR_NAME: &str = ".tradeboard";
const DB_FILE_NAME: &str = "tradeboard.db";
const BUSY_WAIT: Duration = Duration::from_millis(250);

/// Absolute directory that holds `tradeboard.db`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHome {
    dir: PathBuf,
}

impl StoreHome {
    /// Explicit override first, then `TRADEBOARD_HOME`, then `~/.tradeboard`.
    pub fn resolve(home_override: Option<&Path>) -> ClientResult<Self> {
        let chosen = home_override
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(HOME_ENV_VAR).map(PathBuf::from))
            .or_else(|| home::home_dir().map(|user_home| user_home.join(DEFAULT_DIR_NAME)));
        let Some(chosen) = chosen else {
            return Err(ClientError::store(
                StoreFault::InitFailed,
                Path::new(DEFAULT_DIR_NAME),
                Some("no home directory to place the board database in"),
            ));
        };

        let dir = if chosen.is_absolute() {
            chosen
        } else {
            std::env::current_dir()
                .map_err(|error| map_io_error(&chosen, &error))?
                .join(chosen)
        };
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.join(DB_FILE_NAME)
    }

    /// Creates the directory on first use and narrows it to the owner.
    pub fn create(&self) -> ClientResult<()> {
        fs::create_dir_all(&self.dir).map_err(|error| map_io_error(&self.dir, &error))?;
        restrict_to_owner(&self.dir);
        Ok(())
    }
}

/// Opens the database with a short busy wait so a concurrent import reads
/// as `store_locked` instead of hanging.
pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    let connection =
        Connection::open(db_path).map_err(|error| map_sqlite_error(db_path, &error))?;
    connection
        .busy_timeout(BUSY_WAIT)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(connection)
}

pub fn map_io_error(path: &Path, error: &io::Error) -> ClientError {
    let fault = match error.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
            StoreFault::PermissionDenied
        }
        _ => StoreFault::InitFailed,
    };
    ClientError::store(fault, path, Some(&error.to_string()))
}

pub fn sqlite_fault(error: &rusqlite::Error) -> StoreFault {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => StoreFault::Locked,
        Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt) => StoreFault::Corrupt,
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly | ErrorCode::PermissionDenied) => {
            StoreFault::PermissionDenied
        }
        _ => StoreFault::InitFailed,
    }
}

/// Lock and corruption messages stand on their own; the rest keep sqlite's
/// text as detail.
pub fn map_sqlite_error(path: &Path, error: &rusqlite::Error) -> ClientError {
    match sqlite_fault(error) {
        fault @ (StoreFault::Locked | StoreFault::Corrupt) => ClientError::store(fault, path, None),
        fault => ClientError::store(fault, path, Some(&error.to_string())),
    }
}

#[cfg(unix)]
fn restrict_to_owner(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(error) = fs::set_permissions(dir, fs::Permissions::from_mode(0o700)) {
        tracing::debug!(dir = %dir.display(), %error, "could not restrict store directory");
    }
}

#[cfg(not(unix))]
fn restrict_to_owner(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusqlite::ffi;

    use super::{StoreHome, map_sqlite_error, sqlite_fault};
    use crate::error::StoreFault;

    fn sqlite_error(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
    }

    #[test]
    fn override_wins_and_db_file_name_is_fixed() {
        let resolved = StoreHome::resolve(Some(Path::new("/tmp/tradeboard-test-home")));
        assert!(resolved.is_ok());
        if let Ok(home) = resolved {
            assert_eq!(home.dir(), Path::new("/tmp/tradeboard-test-home"));
            assert_eq!(
                home.db_path(),
                Path::new("/tmp/tradeboard-test-home/tradeboard.db")
            );
        }
    }

    #[test]
    fn relative_override_is_absolutized() {
        let resolved = StoreHome::resolve(Some(Path::new("relative-home")));
        assert!(resolved.is_ok());
        if let Ok(home) = resolved {
            assert!(home.dir().is_absolute());
            assert!(home.dir().ends_with("relative-home"));
        }
    }

    #[test]
    fn sqlite_codes_map_onto_store_faults() {
        assert_eq!(sqlite_fault(&sqlite_error(ffi::SQLITE_BUSY)), StoreFault::Locked);
        assert_eq!(sqlite_fault(&sqlite_error(ffi::SQLITE_NOTADB)), StoreFault::Corrupt);
        assert_eq!(
            sqlite_fault(&sqlite_error(ffi::SQLITE_READONLY)),
            StoreFault::PermissionDenied
        );
        assert_eq!(sqlite_fault(&sqlite_error(ffi::SQLITE_FULL)), StoreFault::InitFailed);
        assert_eq!(
            sqlite_fault(&rusqlite::Error::QueryReturnedNoRows),
            StoreFault::InitFailed
        );
    }

    #[test]
    fn locked_store_message_has_no_sqlite_detail() {
        let db_path = Path::new("/tmp/board/tradeboard.db");
        let locked = map_sqlite_error(db_path, &sqlite_error(ffi::SQLITE_LOCKED));
        assert_eq!(locked.code, "store_locked");
        assert!(locked.message.ends_with('.'));

        let full = map_sqlite_error(db_path, &sqlite_error(ffi::SQLITE_FULL));
        assert_eq!(full.code, "store_init_failed");
        assert!(full.message.contains(": "));
    }
}
