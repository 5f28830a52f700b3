//! Apache Derby dialect implementation.
//!
//! Derby folds unquoted identifiers to upper case, has no native boolean
//! (smallint stands in), refuses implicit numeric-to-varchar coercion, and
//! requires explicit casts when string data targets CLOB/BLOB/XML columns.
//! Every override here exists because Derby rejects the generic rendering.

use chrono::{DateTime, Utc};
use derby_sql_core::dialect::{generic_extract_limit, generic_quote_value, generic_simplified_type};
use derby_sql_core::types::NativeType;
use derby_sql_core::{AbstractType, Dialect, SqlValue, TypeMap};

/// Maximum length of an unqualified VARCHAR in Derby.
pub const VARCHAR_MAX_LENGTH: u32 = 32672;

/// Types Derby does not allow length/precision qualifiers on.
const NO_LIMIT_TYPES: &[AbstractType] = &[
    AbstractType::Integer,
    AbstractType::Boolean,
    AbstractType::Timestamp,
    AbstractType::DateTime,
    AbstractType::Date,
    AbstractType::Time,
];

static DERBY_TYPES: TypeMap = TypeMap::new(
    "int GENERATED BY DEFAULT AS identity NOT NULL PRIMARY KEY",
    &[
        (AbstractType::String, NativeType::with_limit("varchar", 255)),
        (AbstractType::Text, NativeType::named("clob")),
        (AbstractType::Char, NativeType::with_limit("char", 254)),
        (AbstractType::Binary, NativeType::named("blob")),
        (AbstractType::Float, NativeType::named("float")),
        (AbstractType::Real, NativeType::named("real")),
        (AbstractType::Double, NativeType::named("double")),
        (AbstractType::Decimal, NativeType::with_precision("decimal", 5, 0)),
        (AbstractType::Numeric, NativeType::with_precision("decimal", 5, 0)),
        (AbstractType::Integer, NativeType::named("integer")),
        (AbstractType::SmallInt, NativeType::named("smallint")),
        (AbstractType::BigInt, NativeType::named("bigint")),
        (AbstractType::Date, NativeType::named("date")),
        (AbstractType::Time, NativeType::named("time")),
        (AbstractType::DateTime, NativeType::named("timestamp")),
        (AbstractType::Timestamp, NativeType::named("timestamp")),
        (AbstractType::Xml, NativeType::named("xml")),
        (AbstractType::Boolean, NativeType::named("smallint")),
    ],
);

/// Timezone used when rendering timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampZone {
    /// Render in UTC.
    #[default]
    Utc,
    /// Render in the process-local timezone.
    Local,
}

/// Apache Derby dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct DerbyDialect {
    timezone: TimestampZone,
}

impl DerbyDialect {
    /// Creates a new Derby dialect rendering timestamps in UTC.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timezone: TimestampZone::Utc,
        }
    }

    /// Creates a dialect rendering timestamps in local time.
    #[must_use]
    pub const fn with_local_timezone() -> Self {
        Self {
            timezone: TimestampZone::Local,
        }
    }

    /// Returns the timestamp rendering timezone.
    #[must_use]
    pub const fn timezone(&self) -> TimestampZone {
        self.timezone
    }

    // Derby rejects implicit coercion, e.g. sending an integer literal to a
    // VARCHAR column fails. Values headed for character columns are
    // stringified up front.
    fn stringified(&self, value: &SqlValue) -> Option<SqlValue> {
        let text = match value {
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Bool(b) => b.to_string(),
            SqlValue::Date(d) => d.to_string(),
            SqlValue::Time(t) => t.to_string(),
            SqlValue::DateTime(ts) => self.quoted_date(ts),
            _ => return None,
        };
        Some(SqlValue::Text(text))
    }
}

// String-to-number coercions used when a string value targets a numeric
// column. Mirrors lenient leading-number parsing: "12abc" reads as 12,
// garbage reads as zero.
fn leading_i64(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let mut end = 0;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    trimmed[..end].parse().unwrap_or(0)
}

fn leading_f64(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else if c == '.' && !seen_dot && end == i {
            seen_dot = true;
            end = i + 1;
        } else {
            break;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

impl Dialect for DerbyDialect {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn type_map(&self) -> &TypeMap {
        &DERBY_TYPES
    }

    fn index_name_length(&self) -> usize {
        128
    }

    // Derby folds identifiers to upper case.
    fn quote_column_name(&self, name: &str) -> String {
        self.quote_identifier(&name.to_uppercase())
    }

    fn quoted_true(&self) -> &'static str {
        "1"
    }

    fn quoted_false(&self) -> &'static str {
        "0"
    }

    /// Six-digit sub-second precision, in UTC or local time per the
    /// dialect's timezone setting.
    fn quoted_date(&self, value: &DateTime<Utc>) -> String {
        match self.timezone {
            TimestampZone::Utc => value.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            TimestampZone::Local => value
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S%.6f")
                .to_string(),
        }
    }

    fn quote_value(&self, value: &SqlValue, column_type: Option<AbstractType>) -> String {
        if let SqlValue::Literal(sql) = value {
            return sql.clone();
        }
        if value.is_null() {
            return String::from("NULL");
        }

        let coerced;
        let value = if matches!(
            column_type,
            Some(AbstractType::String | AbstractType::Text | AbstractType::Char)
        ) {
            match self.stringified(value) {
                Some(v) => {
                    coerced = v;
                    &coerced
                }
                None => value,
            }
        } else {
            value
        };

        match (value, column_type) {
            (SqlValue::Text(s), Some(AbstractType::Text)) => {
                format!("CAST('{}' AS CLOB)", self.quote_string(s))
            }
            (SqlValue::Text(s), Some(AbstractType::Xml)) => {
                format!(
                    "XMLPARSE(DOCUMENT '{}' PRESERVE WHITESPACE)",
                    self.quote_string(s)
                )
            }
            (SqlValue::Text(s), Some(AbstractType::Binary)) => {
                let hex: String = s.bytes().map(|b| format!("{b:02X}")).collect();
                format!("CAST(X'{hex}' AS BLOB)")
            }
            (SqlValue::Bytes(_), Some(AbstractType::Binary)) => {
                let hex = value.as_hex().unwrap_or_default();
                format!("CAST(X'{hex}' AS BLOB)")
            }
            (SqlValue::Text(s), Some(AbstractType::Integer)) => leading_i64(s).to_string(),
            (SqlValue::Text(s), Some(AbstractType::Float)) => leading_f64(s).to_string(),
            _ => generic_quote_value(self, value),
        }
    }

    /// Derby rejects length qualifiers on integer, boolean and temporal
    /// types; those render as the bare native name whatever was supplied.
    fn type_to_sql(
        &self,
        abstract_type: AbstractType,
        limit: Option<u32>,
        precision: Option<u8>,
        scale: Option<u8>,
    ) -> String {
        if NO_LIMIT_TYPES.contains(&abstract_type) {
            return self
                .type_map()
                .native(abstract_type)
                .map_or_else(|| format!("{abstract_type:?}").to_lowercase(), |n| {
                    String::from(n.name)
                });
        }

        // Re-implements the generic renderer; trait defaults are shadowed
        // once overridden.
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

    fn extract_limit(&self, sql_type: &str) -> Option<u32> {
        let t = sql_type.to_lowercase();
        if t.starts_with("smallint") {
            Some(2)
        } else if t.starts_with("bigint") || t.starts_with("double") {
            Some(8)
        } else if t.starts_with("real") {
            Some(4)
        } else if t.starts_with("integer") {
            Some(4)
        } else if t.starts_with("datetime")
            || t.starts_with("timestamp")
            || t.starts_with("time")
            || t.starts_with("date")
            || t.starts_with("xml")
        {
            None
        } else {
            match generic_extract_limit(&t) {
                Some(limit) => Some(limit),
                // VARCHAR without a reported length means the documented max.
                None if t.starts_with("varchar") => Some(VARCHAR_MAX_LENGTH),
                None => None,
            }
        }
    }

    fn simplified_type(&self, sql_type: &str) -> Option<AbstractType> {
        let t = sql_type.to_lowercase();
        if t.contains("for bit data") {
            // "varchar() for bit data", "char() for bit data", ...
            Some(AbstractType::Binary)
        } else if t.starts_with("smallint") {
            // Derby has no native boolean; smallint stands in.
            Some(AbstractType::Boolean)
        } else if t.starts_with("bigint") || t.contains("int") {
            Some(AbstractType::Integer)
        } else if t.starts_with("real") || t.starts_with("double") {
            Some(AbstractType::Float)
        } else if t.starts_with("dec") {
            // DEC is a DECIMAL alias; zero declared scale reads as integer.
            if self.extract_scale(&t).unwrap_or(0) == 0 {
                Some(AbstractType::Integer)
            } else {
                Some(AbstractType::Decimal)
            }
        } else if t.starts_with("timestamp") {
            Some(AbstractType::DateTime)
        } else if t.starts_with("xml") {
            Some(AbstractType::Xml)
        } else if t == "long varchar" {
            Some(AbstractType::Text)
        } else {
            generic_simplified_type(&t)
        }
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "RENAME TABLE {} TO {}",
            self.quote_table_name(old_name),
            self.quote_table_name(new_name)
        )
    }

    fn rename_column_sql(&self, table: &str, old_name: &str, new_name: &str) -> String {
        format!(
            "RENAME COLUMN {}.{} TO {}",
            self.quote_table_name(table),
            self.quote_column_name(old_name),
            self.quote_column_name(new_name)
        )
    }

    fn remove_column_sql(&self, table: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {} RESTRICT",
            self.quote_table_name(table),
            self.quote_column_name(column_name)
        )
    }

    /// Derby requires every ORDER BY expression in the SELECT DISTINCT
    /// list. Each expression (stripped of ASC/DESC) is appended under a
    /// synthetic alias so the query stays valid while remaining distinct on
    /// the requested columns.
    fn columns_for_distinct(&self, columns: &str, order_by: &[&str]) -> String {
        let mut order_columns = Vec::new();
        for order in order_by {
            for part in order.split(',') {
                if let Some(expr) = part.split_whitespace().next() {
                    order_columns.push(expr);
                }
            }
        }
        if order_columns.is_empty() {
            return String::from(columns);
        }

        let aliased: Vec<String> = order_columns
            .iter()
            .enumerate()
            .map(|(i, expr)| format!("{expr} AS alias_{i}"))
            .collect();
        format!("{columns}, {}", aliased.join(", "))
    }

    /// Derby needs to know the column count even for default-only inserts.
    fn empty_insert_statement_value(&self) -> &'static str {
        "VALUES ( DEFAULT )"
    }

    fn limit_offset_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(o) = offset {
            sql.push_str(&format!(" OFFSET {o} ROWS"));
        }
        if let Some(l) = limit {
            sql.push_str(&format!(" FETCH FIRST {l} ROWS ONLY"));
        }
        sql
    }
}
