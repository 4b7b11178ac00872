// cat-manager-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Kitten Store
// Description: Durable KittenStore backed by SQLite.
// Purpose: Persist agencies and kittens with unique external ids.
// Dependencies: cat-manager-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`KittenStore`] on one `SQLite` connection guarded by
//! a mutex. Agency ids and kitten ids are unique keys; a kitten's agency id is
//! stored as a plain column with no foreign key, because fixtures may seed
//! kittens for agencies that have no row.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use cat_manager_core::Agency;
use cat_manager_core::AgencyId;
use cat_manager_core::AgencyKind;
use cat_manager_core::Kitten;
use cat_manager_core::KittenId;
use cat_manager_core::KittenStore;
use cat_manager_core::NewAgency;
use cat_manager_core::NewKitten;
use cat_manager_core::StoreError;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` kitten store.
///
/// Built from the `[store]` section of the server config.
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    pub sync_mode: SqliteSyncMode,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Unique key violation.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps an engine error to a store error.
fn db_error(err: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

/// Maps an insert error, translating unique violations into conflicts.
fn insert_error(err: &rusqlite::Error, what: &str) -> SqliteStoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => {
            SqliteStoreError::Conflict(format!("{what} already exists"))
        }
        _ => db_error(err),
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed kitten store.
#[derive(Clone)]
pub struct SqliteKittenStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteKittenStore {
    /// Opens an `SQLite`-backed kitten store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Inserts an agency row.
    fn insert_agency_row(&self, agency: &Agency) -> Result<(), SqliteStoreError> {
        let id = to_sql_id(agency.id.get())?;
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO agencies (online_id, name, kind) VALUES (?1, ?2, ?3)",
                params![id, agency.name, agency.kind.as_str()],
            )
            .map_err(|err| insert_error(&err, &format!("agency {}", agency.id)))?;
        drop(guard);
        Ok(())
    }

    /// Loads an agency row.
    fn load_agency(&self, agency_id: AgencyId) -> Result<Option<Agency>, SqliteStoreError> {
        let Some(id) = lookup_sql_id(agency_id) else {
            return Ok(None);
        };
        let guard = self.lock()?;
        let row = guard
            .query_row(
                "SELECT name, kind FROM agencies WHERE online_id = ?1",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|err| db_error(&err))?;
        drop(guard);
        let Some((name, kind)) = row else {
            return Ok(None);
        };
        let kind = AgencyKind::parse(&kind)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        Ok(Some(Agency {
            id: agency_id,
            name,
            kind,
        }))
    }

    /// Inserts a kitten row.
    fn insert_kitten_row(&self, kitten: &Kitten) -> Result<(), SqliteStoreError> {
        let agency_id = to_sql_id(kitten.agency_id.get())?;
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO kittens (kitten_id, agency_id, first_name, last_name) VALUES (?1, \
                 ?2, ?3, ?4)",
                params![kitten.kitten_id.as_str(), agency_id, kitten.first_name, kitten.last_name],
            )
            .map_err(|err| insert_error(&err, &format!("kitten {}", kitten.kitten_id)))?;
        drop(guard);
        Ok(())
    }

    /// Loads kitten rows, optionally scoped to one agency.
    fn load_kittens(&self, agency_id: Option<AgencyId>) -> Result<Vec<Kitten>, SqliteStoreError> {
        let guard = self.lock()?;
        let kittens = match agency_id {
            Some(agency_id) => {
                let Some(id) = lookup_sql_id(agency_id) else {
                    return Ok(Vec::new());
                };
                let mut statement = guard
                    .prepare(
                        "SELECT kitten_id, agency_id, first_name, last_name FROM kittens WHERE \
                         agency_id = ?1",
                    )
                    .map_err(|err| db_error(&err))?;
                let rows = statement
                    .query_map(params![id], read_kitten_row)
                    .map_err(|err| db_error(&err))?;
                rows.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))?
            }
            None => {
                let mut statement = guard
                    .prepare("SELECT kitten_id, agency_id, first_name, last_name FROM kittens")
                    .map_err(|err| db_error(&err))?;
                let rows = statement
                    .query_map(params![], read_kitten_row)
                    .map_err(|err| db_error(&err))?;
                rows.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))?
            }
        };
        drop(guard);
        kittens.into_iter().map(KittenRow::into_kitten).collect()
    }

    /// Deletes every row of a table.
    fn clear_table(&self, table: Table) -> Result<usize, SqliteStoreError> {
        let guard = self.lock()?;
        let removed =
            guard.execute(table.delete_all_sql(), params![]).map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(removed)
    }
}

impl KittenStore for SqliteKittenStore {
    fn insert_agency(&self, agency: NewAgency) -> Result<Agency, StoreError> {
        let agency = agency.into_agency();
        self.insert_agency_row(&agency)?;
        Ok(agency)
    }

    fn agency(&self, agency_id: AgencyId) -> Result<Option<Agency>, StoreError> {
        self.load_agency(agency_id).map_err(StoreError::from)
    }

    fn remove_agencies(&self) -> Result<usize, StoreError> {
        self.clear_table(Table::Agencies).map_err(StoreError::from)
    }

    fn insert_kitten(&self, kitten: NewKitten) -> Result<Kitten, StoreError> {
        let kitten = kitten.validate()?;
        self.insert_kitten_row(&kitten)?;
        Ok(kitten)
    }

    fn kittens_for_agency(&self, agency_id: AgencyId) -> Result<Vec<Kitten>, StoreError> {
        self.load_kittens(Some(agency_id)).map_err(StoreError::from)
    }

    fn kittens(&self) -> Result<Vec<Kitten>, StoreError> {
        self.load_kittens(None).map_err(StoreError::from)
    }

    fn remove_kittens(&self) -> Result<usize, StoreError> {
        self.clear_table(Table::Kittens).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Store tables that support bulk deletion.
#[derive(Debug, Clone, Copy)]
enum Table {
    /// Agencies table.
    Agencies,
    /// Kittens table.
    Kittens,
}

impl Table {
    /// Returns the bulk delete statement.
    const fn delete_all_sql(self) -> &'static str {
        match self {
            Self::Agencies => "DELETE FROM agencies",
            Self::Kittens => "DELETE FROM kittens",
        }
    }
}

/// Raw kitten row before id conversion.
struct KittenRow {
    /// External kitten id.
    kitten_id: String,
    /// Agency id as stored.
    agency_id: i64,
    /// First name.
    first_name: String,
    /// Last name.
    last_name: String,
}

impl KittenRow {
    /// Converts the raw row into a domain record.
    fn into_kitten(self) -> Result<Kitten, SqliteStoreError> {
        let agency_id = u64::try_from(self.agency_id)
            .map_err(|_| SqliteStoreError::Invalid("negative agency id".to_string()))?;
        Ok(Kitten {
            kitten_id: KittenId::new(self.kitten_id),
            agency_id: AgencyId::new(agency_id),
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// Reads a kitten row from a query result.
fn read_kitten_row(row: &Row<'_>) -> rusqlite::Result<KittenRow> {
    Ok(KittenRow {
        kitten_id: row.get(0)?,
        agency_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
    })
}

/// Converts an external id into an `SQLite` integer for writes.
fn to_sql_id(id: u64) -> Result<i64, SqliteStoreError> {
    i64::try_from(id).map_err(|_| SqliteStoreError::Invalid(format!("id {id} out of range")))
}

/// Converts an agency id for lookups; ids above `i64::MAX` can never be stored.
fn lookup_sql_id(agency_id: AgencyId) -> Option<i64> {
    i64::try_from(agency_id.get()).ok()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_error(&err))?;
    Ok(connection)
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_error(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS agencies (
                    online_id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    kind TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS kittens (
                    kitten_id TEXT PRIMARY KEY,
                    agency_id INTEGER NOT NULL,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_kittens_agency_id ON kittens (agency_id);",
            )
            .map_err(|err| db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| db_error(&err))?;
    Ok(())
}
