//! Column metadata normalization.
//!
//! The driver reports columns the JDBC way: a native type string, a default
//! literal carrying its own quoting, and nullability. [`DerbyColumn`] turns
//! one such row into the abstract vocabulary schema frontends expect.
//! Nothing here is cached; rows are normalized fresh on every
//! introspection call.

use derby_sql_core::{AbstractType, Dialect};

use crate::dialect::DerbyDialect;
use crate::driver::RawColumn;

/// Sentinel Derby reports as the default of identity columns; it means the
/// value is system-generated, not that a default exists.
const GENERATED_BY_DEFAULT: &str = "GENERATED_BY_DEFAULT";

/// A normalized Derby column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerbyColumn {
    /// Column name as reported by the driver.
    pub name: String,
    /// Native type string as reported by the driver, lower-cased.
    pub sql_type: String,
    /// Abstract classification of the native type.
    pub simplified: Option<AbstractType>,
    /// Byte/character limit of the type, where applicable.
    pub limit: Option<u32>,
    /// Declared precision for decimal types.
    pub precision: Option<u32>,
    /// Declared scale for decimal types.
    pub scale: Option<u32>,
    /// Normalized default value, driver quoting stripped.
    pub default: Option<String>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

impl DerbyColumn {
    /// Normalizes a driver-reported column row.
    #[must_use]
    pub fn from_raw(dialect: &DerbyDialect, raw: &RawColumn) -> Self {
        let sql_type = raw.sql_type.to_lowercase();
        let simplified = dialect.simplified_type(&sql_type);
        let (precision, scale) = if matches!(
            simplified,
            Some(AbstractType::Decimal | AbstractType::Integer)
        ) && sql_type.starts_with("dec")
        {
            (
                dialect.extract_precision(&sql_type),
                dialect.extract_scale(&sql_type),
            )
        } else {
            (None, None)
        };

        Self {
            name: raw.name.clone(),
            limit: dialect.extract_limit(&sql_type),
            simplified,
            precision,
            scale,
            default: normalize_default(raw.default.as_deref()),
            nullable: raw.nullable,
            sql_type,
        }
    }

    /// Whether the column's abstract type is Integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.simplified == Some(AbstractType::Integer)
    }
}

/// Strips driver-added quoting from a default literal and drops the
/// system-generated sentinel.
#[must_use]
pub fn normalize_default(raw: Option<&str>) -> Option<String> {
    let value = raw?;
    if let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Some(String::from(inner));
    }
    if value == GENERATED_BY_DEFAULT {
        return None;
    }
    Some(String::from(value))
}
