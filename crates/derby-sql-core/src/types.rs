//! Abstract type vocabulary and native-type mapping.
//!
//! These types describe columns in engine-independent terms. An engine
//! adapter supplies a [`TypeMap`] translating each abstract type to the
//! engine's native SQL type, and the dialect layer renders DDL from it.

use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// Engine-independent column type symbols.
///
/// These mirror the vocabulary schema-management frontends speak; the
/// engine's `TypeMap` decides what each one means in native SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractType {
    /// Variable-length character string.
    String,
    /// Unbounded character data (CLOB/TEXT).
    Text,
    /// Fixed-length character string.
    Char,
    /// Binary large object.
    Binary,
    /// Floating point.
    Float,
    /// Single-precision floating point.
    Real,
    /// Double-precision floating point.
    Double,
    /// Exact decimal with precision and scale.
    Decimal,
    /// Alias for decimal.
    Numeric,
    /// Integer (32-bit).
    Integer,
    /// Small integer (16-bit).
    SmallInt,
    /// Big integer (64-bit).
    BigInt,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    DateTime,
    /// Timestamp (alias for DateTime in most engines).
    Timestamp,
    /// XML document.
    Xml,
    /// Boolean.
    Boolean,
}

/// A native SQL type: name plus the default qualifiers the engine documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeType {
    /// Native type name as it appears in DDL.
    pub name: &'static str,
    /// Default length for length-qualified types.
    pub limit: Option<u32>,
    /// Default precision for decimal types.
    pub precision: Option<u8>,
    /// Default scale for decimal types.
    pub scale: Option<u8>,
}

impl NativeType {
    /// A bare native type with no default qualifiers.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            limit: None,
            precision: None,
            scale: None,
        }
    }

    /// A native type carrying a default length.
    #[must_use]
    pub const fn with_limit(name: &'static str, limit: u32) -> Self {
        Self {
            name,
            limit: Some(limit),
            precision: None,
            scale: None,
        }
    }

    /// A native type carrying default precision and scale.
    #[must_use]
    pub const fn with_precision(name: &'static str, precision: u8, scale: u8) -> Self {
        Self {
            name,
            limit: None,
            precision: Some(precision),
            scale: Some(scale),
        }
    }
}

/// The fixed mapping from abstract types to an engine's native types.
///
/// Built once from static data and never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct TypeMap {
    primary_key: &'static str,
    entries: &'static [(AbstractType, NativeType)],
}

impl TypeMap {
    /// Creates a type map over static entries.
    #[must_use]
    pub const fn new(
        primary_key: &'static str,
        entries: &'static [(AbstractType, NativeType)],
    ) -> Self {
        Self {
            primary_key,
            entries,
        }
    }

    /// The engine's full primary-key column definition.
    #[must_use]
    pub const fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    /// Looks up the native type for an abstract type.
    #[must_use]
    pub fn native(&self, abstract_type: AbstractType) -> Option<&NativeType> {
        self.entries
            .iter()
            .find(|(t, _)| *t == abstract_type)
            .map(|(_, native)| native)
    }

    /// Iterates over all mapped abstract types.
    pub fn abstract_types(&self) -> impl Iterator<Item = AbstractType> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }
}

/// Definition of a column in an abstract schema request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Abstract column type.
    pub sql_type: AbstractType,
    /// Requested length.
    pub limit: Option<u32>,
    /// Requested precision.
    pub precision: Option<u8>,
    /// Requested scale.
    pub scale: Option<u8>,
    /// Default value. `Some(SqlValue::Null)` is an explicit null default,
    /// which dialects may render differently from no default at all.
    pub default: Option<SqlValue>,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Whether the column is the table's identity primary key.
    pub primary_key: bool,
}

impl ColumnDefinition {
    /// Creates a nullable column with no qualifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: AbstractType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            limit: None,
            precision: None,
            scale: None,
            default: None,
            nullable: true,
            primary_key: false,
        }
    }

    /// Sets the requested length.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the requested precision and scale.
    #[must_use]
    pub fn precision_scale(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: SqlValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as the identity primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
}
