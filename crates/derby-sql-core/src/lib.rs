//! # derby-sql-core
//!
//! Dialect-agnostic SQL vocabulary shared by engine adapters.
//!
//! This crate provides:
//! - An abstract type vocabulary (`AbstractType`) and the fixed mapping from
//!   abstract types to an engine's native types (`TypeMap`)
//! - A SQL value representation (`SqlValue`) with inline quoting support
//! - The [`Dialect`] trait: generic quoting, type rendering, type-string
//!   parsing and DDL rendering, with engine adapters overriding only the
//!   methods where their engine diverges
//!
//! The trait-with-defaults design keeps engine behavior explicit: a dialect
//! implementation states exactly which translations it specializes, and
//! everything else falls through to the generic SQL rendering here.
//!
//! ```rust
//! use derby_sql_core::dialect::{Dialect, GenericDialect};
//! use derby_sql_core::types::AbstractType;
//!
//! let dialect = GenericDialect::new();
//! let ddl = dialect.type_to_sql(AbstractType::String, Some(40), None, None);
//! assert_eq!(ddl, "varchar(40)");
//! ```

pub mod dialect;
pub mod types;
pub mod value;

pub use dialect::{Dialect, GenericDialect};
pub use types::{AbstractType, ColumnDefinition, NativeType, TypeMap};
pub use value::{SqlValue, ToSqlValue};
