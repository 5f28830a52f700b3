//! Driver connection abstraction.
//!
//! The adapter never talks to Derby directly; it drives a JDBC-style
//! connection behind this trait. Implementations wrap whatever actually
//! reaches the engine (an embedded JVM bridge, the network server, a test
//! double) and surface the metadata calls the JDBC `DatabaseMetaData`
//! surface provides.

use crate::config::IsolationLevel;
use crate::version::DatabaseVersion;

/// SQLSTATE classes Derby reports for alterations it cannot perform in
/// place. `42Z15`/`42Z16` cover column-type modification limits; class `0A`
/// is "feature not supported".
const UNSUPPORTED_ALTERATION_STATES: &[&str] = &["42Z15", "42Z16"];

/// An error reported by the driver, carrying the engine's SQLSTATE and
/// vendor code when available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    /// Human-readable message from the driver.
    pub message: String,
    /// Five-character SQLSTATE, when the driver reported one.
    pub sql_state: Option<String>,
    /// Vendor-specific error code.
    pub vendor_code: i32,
}

impl DriverError {
    /// Creates an error with no SQLSTATE.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql_state: None,
            vendor_code: 0,
        }
    }

    /// Creates an error carrying a SQLSTATE.
    #[must_use]
    pub fn with_state(message: impl Into<String>, sql_state: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql_state: Some(sql_state.into()),
            vendor_code: 0,
        }
    }

    /// Whether this error means the engine rejected an in-place column
    /// alteration (as opposed to an unrelated failure such as a lock
    /// timeout). Only these trigger the copy-cast fallback.
    #[must_use]
    pub fn is_unsupported_alteration(&self) -> bool {
        match self.sql_state.as_deref() {
            Some(state) => {
                UNSUPPORTED_ALTERATION_STATES.contains(&state) || state.starts_with("0A")
            }
            None => false,
        }
    }
}

/// A column row as the driver reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    /// Column name.
    pub name: String,
    /// Native type string, e.g. `VARCHAR(255)` or `DECIMAL(5,0)`.
    pub sql_type: String,
    /// Default literal as reported, including any driver-added quoting.
    pub default: Option<String>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

/// A JDBC-style connection to a Derby engine.
#[allow(async_fn_in_trait)]
pub trait DriverConnection {
    /// Executes a statement, returning the affected-row count.
    async fn execute_update(&mut self, sql: &str) -> Result<u64, DriverError>;

    /// Runs a query expected to produce at most one value.
    async fn query_scalar(&mut self, sql: &str) -> Result<Option<String>, DriverError>;

    /// Reports the engine's major/minor version.
    async fn database_version(&mut self) -> Result<DatabaseVersion, DriverError>;

    /// Lists table names, optionally scoped to a schema.
    async fn table_names(&mut self, schema: Option<&str>) -> Result<Vec<String>, DriverError>;

    /// Lists the primary-key column names of a table.
    async fn primary_keys(&mut self, table: &str) -> Result<Vec<String>, DriverError>;

    /// Reports column metadata rows for a table.
    async fn column_metadata(&mut self, table: &str) -> Result<Vec<RawColumn>, DriverError>;

    /// Returns the identity value of the last INSERT on this connection
    /// (Derby's `IDENTITY_VAL_LOCAL`).
    async fn identity_val_local(&mut self) -> Result<i64, DriverError>;

    /// Sets the connection's transaction isolation level.
    async fn set_transaction_isolation(
        &mut self,
        level: IsolationLevel,
    ) -> Result<(), DriverError>;

    /// Checks connection liveness the driver's own way.
    async fn is_valid(&mut self) -> Result<bool, DriverError>;

    /// Begins an explicit transaction.
    async fn begin(&mut self) -> Result<(), DriverError>;

    /// Commits the current transaction.
    async fn commit(&mut self) -> Result<(), DriverError>;

    /// Rolls back the current transaction.
    async fn rollback(&mut self) -> Result<(), DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_alteration_detection() {
        assert!(DriverError::with_state("no", "42Z16").is_unsupported_alteration());
        assert!(DriverError::with_state("no", "42Z15").is_unsupported_alteration());
        assert!(DriverError::with_state("no", "0A000").is_unsupported_alteration());
        assert!(!DriverError::with_state("deadlock", "40001").is_unsupported_alteration());
        assert!(!DriverError::new("plain failure").is_unsupported_alteration());
    }

    #[test]
    fn test_display_uses_message() {
        let err = DriverError::with_state("lock timeout", "40XL1");
        assert_eq!(err.to_string(), "lock timeout");
    }
}
