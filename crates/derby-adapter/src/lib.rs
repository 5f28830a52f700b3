//! # derby-adapter
//!
//! Apache Derby dialect and connection adapter.
//!
//! Derby speaks a strict flavor of SQL: no native boolean, no implicit
//! numeric-to-varchar coercion, mandatory FROM clauses, explicit casts into
//! LOB columns, and an `ALTER TABLE` surface that rejects many in-place type
//! changes. This crate binds those rules behind the generic
//! [`Dialect`](derby_sql_core::Dialect) vocabulary:
//!
//! - [`DerbyDialect`] overrides quoting, type rendering and DDL where Derby
//!   diverges from standard SQL
//! - [`DerbyColumn`] normalizes driver-reported column metadata back into
//!   the abstract type vocabulary
//! - [`DerbyAdapter`] drives a [`DriverConnection`] (a JDBC-style driver
//!   behind a trait): connection setup and version gating, schema switching
//!   with a cached current-schema name, NULL-comparison rewriting, identity
//!   restarts, and the transactional copy-cast-drop-rename fallback for
//!   column type changes Derby refuses to do in place
//!
//! Execution, pooling and transactions belong to the caller; the adapter
//! only translates and dispatches.

pub mod adapter;
pub mod column;
pub mod config;
pub mod ddl;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod rewrite;
pub mod version;

pub use adapter::{DerbyAdapter, ADAPTER_NAME, DEGRADED_ALIVE_SQL};
pub use column::DerbyColumn;
pub use config::{AdapterConfig, IsolationLevel};
pub use ddl::{ColumnChange, CURRENT_SCHEMA_SQL};
pub use dialect::{DerbyDialect, TimestampZone};
pub use driver::{DriverConnection, DriverError, RawColumn};
pub use error::{AdapterError, Result};
pub use version::{DatabaseVersion, Jdbc4Capability};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapter::DerbyAdapter;
    pub use crate::column::DerbyColumn;
    pub use crate::config::{AdapterConfig, IsolationLevel};
    pub use crate::ddl::ColumnChange;
    pub use crate::dialect::{DerbyDialect, TimestampZone};
    pub use crate::driver::{DriverConnection, DriverError, RawColumn};
    pub use crate::error::{AdapterError, Result};
    pub use crate::version::{DatabaseVersion, Jdbc4Capability};
    pub use derby_sql_core::{AbstractType, ColumnDefinition, Dialect, SqlValue};
}
