//! Database layer: the patient store and the encounter store.

mod encounters;
mod patients;
mod schema;
mod seed;

#[allow(unused_imports)]
pub use encounters::*;
#[allow(unused_imports)]
pub use patients::*;
pub use schema::*;
pub use seed::*;

use rusqlite::types::Value;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid stored decimal: {0}")]
    Decimal(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction: committed on `Ok`, rolled back on `Err`.
    ///
    /// Store calls made by `f` through this `Database` join the transaction,
    /// so a check and the write that depends on it are applied together.
    pub fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(DbError::from)?;
        let value = f()?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}

/// Column/value pairs of an example filter. Only set fields appear.
pub(crate) type Conditions = Vec<(&'static str, Value)>;

/// Push `column = value` when the filter field is set.
pub(crate) fn push_condition<T: Into<Value>>(
    conditions: &mut Conditions,
    column: &'static str,
    value: Option<T>,
) {
    if let Some(v) = value {
        conditions.push((column, v.into()));
    }
}

/// `WHERE a = ?1 AND b = ?2 ...` for the given conditions (empty when none).
pub(crate) fn where_clause(conditions: &Conditions) -> String {
    if conditions.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = conditions
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect();
    format!("WHERE {}", terms.join(" AND "))
}
