//! SQL dialect support.
//!
//! [`Dialect`] carries the generic rendering rules shared by SQL engines:
//! identifier and value quoting, abstract-type-to-DDL rendering, native
//! type-string parsing, and the standard DDL statements. An engine adapter
//! implements the trait and overrides only the methods its engine bends.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::{AbstractType, ColumnDefinition, TypeMap};
use crate::value::SqlValue;

fn paren_args(sql_type: &str) -> Option<(u32, Option<u32>)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\)").unwrap_or_else(|e| panic!("{e}"))
    });
    let caps = re.captures(sql_type)?;
    let first = caps.get(1)?.as_str().parse().ok()?;
    let second = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((first, second))
}

/// Generic length extraction: the first parenthesized number of a
/// driver-reported type string. Engine dialects fall back to this after
/// their own fixed-width cases.
#[must_use]
pub fn generic_extract_limit(sql_type: &str) -> Option<u32> {
    paren_args(sql_type).map(|(first, _)| first)
}

/// Generic classification of a native type string. Engine dialects consult
/// this after their own quirks.
#[must_use]
pub fn generic_simplified_type(sql_type: &str) -> Option<AbstractType> {
    let t = sql_type.to_lowercase();
    if t.contains("bool") {
        Some(AbstractType::Boolean)
    } else if t.contains("datetime") || t.contains("timestamp") {
        Some(AbstractType::DateTime)
    } else if t.starts_with("time") {
        Some(AbstractType::Time)
    } else if t.starts_with("date") {
        Some(AbstractType::Date)
    } else if t.contains("clob") || t.starts_with("text") || t == "long varchar" {
        Some(AbstractType::Text)
    } else if t.contains("blob") || t.contains("binary") {
        Some(AbstractType::Binary)
    } else if t.contains("char") || t.contains("string") {
        Some(AbstractType::String)
    } else if t.contains("float") || t.contains("double") || t.starts_with("real") {
        Some(AbstractType::Float)
    } else if t.starts_with("dec") || t.contains("numeric") || t.contains("number") {
        Some(AbstractType::Decimal)
    } else if t.contains("int") {
        Some(AbstractType::Integer)
    } else if t.contains("xml") {
        Some(AbstractType::Xml)
    } else {
        None
    }
}

/// Generic value quoting, ignoring the target column type. Engine dialects
/// fall back to this for values their engine treats conventionally.
pub fn generic_quote_value<D: Dialect + ?Sized>(dialect: &D, value: &SqlValue) -> String {
    match value {
        SqlValue::Null => String::from("NULL"),
        SqlValue::Bool(true) => String::from(dialect.quoted_true()),
        SqlValue::Bool(false) => String::from(dialect.quoted_false()),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Text(s) => format!("'{}'", dialect.quote_string(s)),
        SqlValue::Bytes(_) => {
            let hex = value.as_hex().unwrap_or_default();
            format!("X'{hex}'")
        }
        SqlValue::Date(d) => format!("'{d}'"),
        SqlValue::Time(t) => format!("'{t}'"),
        SqlValue::DateTime(ts) => format!("'{}'", dialect.quoted_date(ts)),
        SqlValue::Literal(sql) => sql.clone(),
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the fixed abstract-to-native type mapping for this engine.
    fn type_map(&self) -> &TypeMap;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Maximum length of index names for this engine.
    fn index_name_length(&self) -> usize {
        64
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let doubled = format!("{quote}{quote}");
        format!("{quote}{}{quote}", name.replace(quote, &doubled))
    }

    /// Quotes a column name.
    fn quote_column_name(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    /// Quotes a table name.
    fn quote_table_name(&self, name: &str) -> String {
        self.quote_column_name(name)
    }

    /// Escapes string content for inclusion in a single-quoted literal.
    fn quote_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// SQL literal for boolean true.
    fn quoted_true(&self) -> &'static str {
        "TRUE"
    }

    /// SQL literal for boolean false.
    fn quoted_false(&self) -> &'static str {
        "FALSE"
    }

    /// Formats a timestamp for inclusion in a quoted literal.
    fn quoted_date(&self, value: &DateTime<Utc>) -> String {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Renders a value as SQL literal text for a column of the given
    /// abstract type. The generic rendering ignores the column type; engine
    /// dialects override this when their engine cares.
    fn quote_value(&self, value: &SqlValue, _column_type: Option<AbstractType>) -> String {
        generic_quote_value(self, value)
    }

    /// Renders an abstract column type as DDL type text.
    ///
    /// Supplied qualifiers win over the type map's defaults; a type mapped
    /// without qualifiers renders as the bare native name.
    fn type_to_sql(
        &self,
        abstract_type: AbstractType,
        limit: Option<u32>,
        precision: Option<u8>,
        scale: Option<u8>,
    ) -> String {
        let Some(native) = self.type_map().native(abstract_type) else {
            return format!("{abstract_type:?}").to_lowercase();
        };

        if precision.is_some() || native.precision.is_some() {
            let p = precision.or(native.precision);
            let s = scale.or(native.scale);
            return match (p, s) {
                (Some(p), Some(s)) => format!("{}({p},{s})", native.name),
                (Some(p), None) => format!("{}({p})", native.name),
                _ => String::from(native.name),
            };
        }

        match limit.or(native.limit) {
            Some(l) => format!("{}({l})", native.name),
            None => String::from(native.name),
        }
    }

    /// Parses the length out of a driver-reported type string, e.g.
    /// `varchar(255)` → 255. Returns the first parenthesized number.
    fn extract_limit(&self, sql_type: &str) -> Option<u32> {
        generic_extract_limit(sql_type)
    }

    /// Parses the precision out of a driver-reported decimal type string.
    fn extract_precision(&self, sql_type: &str) -> Option<u32> {
        paren_args(sql_type).map(|(first, _)| first)
    }

    /// Parses the scale out of a driver-reported decimal type string,
    /// e.g. `decimal(8,2)` → 2. A single-number qualifier has no scale.
    fn extract_scale(&self, sql_type: &str) -> Option<u32> {
        paren_args(sql_type).and_then(|(_, second)| second)
    }

    /// Classifies a driver-reported native type string into an abstract
    /// type. Returns `None` for strings the generic classifier cannot place.
    fn simplified_type(&self, sql_type: &str) -> Option<AbstractType> {
        generic_simplified_type(sql_type)
    }

    /// Renders a single column definition for CREATE TABLE / ADD COLUMN.
    ///
    /// An explicit null default renders no DEFAULT clause at all, matching
    /// what schema frontends mean by `default: nil`.
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        if column.primary_key {
            return format!(
                "{} {}",
                self.quote_column_name(&column.name),
                self.type_map().primary_key()
            );
        }

        let mut parts = vec![
            self.quote_column_name(&column.name),
            self.type_to_sql(column.sql_type, column.limit, column.precision, column.scale),
        ];

        if let Some(default) = &column.default {
            if !default.is_null() {
                parts.push(format!(
                    "DEFAULT {}",
                    self.quote_value(default, Some(column.sql_type))
                ));
            }
        }

        if !column.nullable {
            parts.push(String::from("NOT NULL"));
        }

        parts.join(" ")
    }

    /// Generates SQL for creating a table.
    fn create_table_sql(&self, name: &str, columns: &[ColumnDefinition]) -> String {
        let col_defs: Vec<String> = columns.iter().map(|c| self.column_definition(c)).collect();
        format!(
            "CREATE TABLE {} (\n  {}\n)",
            self.quote_table_name(name),
            col_defs.join(",\n  ")
        )
    }

    /// Generates SQL for dropping a table.
    fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE {}", self.quote_table_name(name))
    }

    /// Generates SQL for adding a column.
    fn add_column_sql(&self, table: &str, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_table_name(table),
            self.column_definition(column)
        )
    }

    /// Generates SQL for dropping a column.
    fn remove_column_sql(&self, table: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_table_name(table),
            self.quote_column_name(column_name)
        )
    }

    /// Generates SQL for renaming a column.
    fn rename_column_sql(&self, table: &str, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.quote_table_name(table),
            self.quote_column_name(old_name),
            self.quote_column_name(new_name)
        )
    }

    /// Generates SQL for renaming a table.
    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_table_name(old_name),
            self.quote_table_name(new_name)
        )
    }

    /// Derives an index name from the table and indexed columns, truncated
    /// to [`index_name_length`](Self::index_name_length).
    fn index_name(&self, table: &str, columns: &[&str]) -> String {
        let mut name = format!("index_{}_on_{}", table, columns.join("_and_"));
        name.truncate(self.index_name_length());
        name
    }

    /// Generates SQL for creating an index.
    fn create_index_sql(
        &self,
        table: &str,
        columns: &[&str],
        unique: bool,
        name: Option<&str>,
    ) -> String {
        let index_name = name.map_or_else(|| self.index_name(table, columns), String::from);
        let quoted: Vec<String> = columns.iter().map(|c| self.quote_column_name(c)).collect();
        format!(
            "CREATE {}INDEX {} ON {} ({})",
            if unique { "UNIQUE " } else { "" },
            self.quote_identifier(&index_name),
            self.quote_table_name(table),
            quoted.join(", ")
        )
    }

    /// Generates SQL for dropping an index.
    fn remove_index_sql(&self, name: &str) -> String {
        format!("DROP INDEX {}", self.quote_identifier(name))
    }

    /// Builds a SELECT DISTINCT column list for the given columns and ORDER
    /// BY expressions. The generic form ignores the ordering.
    fn distinct(&self, columns: &str, order_by: &[&str]) -> String {
        format!("DISTINCT {}", self.columns_for_distinct(columns, order_by))
    }

    /// Returns the column list a DISTINCT query must select. Engines that
    /// require ORDER BY expressions in the select list override this.
    fn columns_for_distinct(&self, columns: &str, _order_by: &[&str]) -> String {
        String::from(columns)
    }

    /// The VALUES clause for an INSERT with no explicit columns.
    fn empty_insert_statement_value(&self) -> &'static str {
        "DEFAULT VALUES"
    }

    /// Renders a limit/offset clause to append to a SELECT.
    fn limit_offset_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }
        if let Some(o) = offset {
            sql.push_str(&format!(" OFFSET {o}"));
        }
        sql
    }
}

/// Generic standard-SQL dialect used as a baseline and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

static GENERIC_TYPES: TypeMap = TypeMap::new(
    "integer GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY",
    &[
        (
            AbstractType::String,
            crate::types::NativeType::with_limit("varchar", 255),
        ),
        (AbstractType::Text, crate::types::NativeType::named("text")),
        (
            AbstractType::Char,
            crate::types::NativeType::with_limit("char", 255),
        ),
        (AbstractType::Binary, crate::types::NativeType::named("blob")),
        (AbstractType::Float, crate::types::NativeType::named("float")),
        (AbstractType::Real, crate::types::NativeType::named("real")),
        (
            AbstractType::Double,
            crate::types::NativeType::named("double precision"),
        ),
        (
            AbstractType::Decimal,
            crate::types::NativeType::named("decimal"),
        ),
        (
            AbstractType::Numeric,
            crate::types::NativeType::named("numeric"),
        ),
        (
            AbstractType::Integer,
            crate::types::NativeType::named("integer"),
        ),
        (
            AbstractType::SmallInt,
            crate::types::NativeType::named("smallint"),
        ),
        (
            AbstractType::BigInt,
            crate::types::NativeType::named("bigint"),
        ),
        (AbstractType::Date, crate::types::NativeType::named("date")),
        (AbstractType::Time, crate::types::NativeType::named("time")),
        (
            AbstractType::DateTime,
            crate::types::NativeType::named("timestamp"),
        ),
        (
            AbstractType::Timestamp,
            crate::types::NativeType::named("timestamp"),
        ),
        (AbstractType::Xml, crate::types::NativeType::named("xml")),
        (
            AbstractType::Boolean,
            crate::types::NativeType::named("boolean"),
        ),
    ],
);

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn type_map(&self) -> &TypeMap {
        &GENERIC_TYPES
    }
}
