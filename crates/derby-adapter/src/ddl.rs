//! Derby-specific schema statements.
//!
//! Statements the generic [`Dialect`](derby_sql_core::Dialect) surface has
//! no slot for: schema switching, nullability toggles, in-place type
//! changes, identity restarts, and the copy-cast step of the type-change
//! fallback.

use derby_sql_core::{AbstractType, Dialect, SqlValue};

use crate::dialect::DerbyDialect;

/// Query returning the connection's current schema. Derby mandates a FROM
/// clause, hence the system-table read.
pub const CURRENT_SCHEMA_SQL: &str =
    "SELECT CURRENT SCHEMA FROM SYS.SYSSCHEMAS FETCH FIRST 1 ROWS ONLY";

/// Requested changes to an existing column. Unset fields stay as they are.
#[derive(Debug, Clone, Default)]
pub struct ColumnChange {
    /// New abstract type, when the type itself changes.
    pub sql_type: Option<AbstractType>,
    /// New length.
    pub limit: Option<u32>,
    /// New precision.
    pub precision: Option<u8>,
    /// New scale.
    pub scale: Option<u8>,
    /// New nullability.
    pub null: Option<bool>,
    /// Default applied to the replacement column on the fallback path.
    pub default: Option<SqlValue>,
}

impl ColumnChange {
    /// A change of type only.
    #[must_use]
    pub fn to_type(sql_type: AbstractType) -> Self {
        Self {
            sql_type: Some(sql_type),
            ..Self::default()
        }
    }

    /// Sets the new length.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the new nullability.
    #[must_use]
    pub fn null(mut self, nullable: bool) -> Self {
        self.null = Some(nullable);
        self
    }
}

impl DerbyDialect {
    /// `SET SCHEMA` statement. Schema names are not quoted; Derby folds
    /// them the same way it folds the connection's implicit schema.
    #[must_use]
    pub fn set_schema_sql(&self, schema: &str) -> String {
        format!("SET SCHEMA {schema}")
    }

    /// `CREATE SCHEMA` statement.
    #[must_use]
    pub fn create_schema_sql(&self, schema: &str) -> String {
        format!("CREATE SCHEMA {schema}")
    }

    /// `DROP SCHEMA` statement; the schema must hold no objects.
    #[must_use]
    pub fn drop_schema_sql(&self, schema: &str) -> String {
        format!("DROP SCHEMA {schema} RESTRICT")
    }

    /// Toggles a column's nullability.
    #[must_use]
    pub fn alter_column_nullability_sql(
        &self,
        table: &str,
        column: &str,
        nullable: bool,
    ) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            self.quote_table_name(table),
            self.quote_column_name(column),
            if nullable { "NULL" } else { "NOT NULL" }
        )
    }

    /// In-place column type change. Derby rejects this for many type
    /// combinations; callers fall back to the copy-cast strategy then.
    #[must_use]
    pub fn alter_column_type_sql(&self, table: &str, column: &str, type_sql: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {type_sql}",
            self.quote_table_name(table),
            self.quote_column_name(column)
        )
    }

    /// Restarts an identity column at the given value.
    #[must_use]
    pub fn restart_identity_sql(&self, table: &str, column: &str, with: i64) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} RESTART WITH {with}",
            self.quote_table_name(table),
            self.quote_column_name(column)
        )
    }

    /// Copy-cast step of the type-change fallback: fills the replacement
    /// column from the original under the new type's cast semantics.
    #[must_use]
    pub fn copy_cast_sql(&self, table: &str, target: &str, source: &str, type_sql: &str) -> String {
        format!(
            "UPDATE {} SET {} = CAST({} AS {type_sql})",
            self.quote_table_name(table),
            self.quote_column_name(target),
            self.quote_column_name(source)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect() -> DerbyDialect {
        DerbyDialect::new()
    }

    #[test]
    fn test_schema_statements() {
        let d = dialect();
        assert_eq!(d.set_schema_sql("APP"), "SET SCHEMA APP");
        assert_eq!(d.create_schema_sql("REPORTS"), "CREATE SCHEMA REPORTS");
        assert_eq!(d.drop_schema_sql("REPORTS"), "DROP SCHEMA REPORTS RESTRICT");
    }

    #[test]
    fn test_alter_column_nullability() {
        let d = dialect();
        assert_eq!(
            d.alter_column_nullability_sql("posts", "title", false),
            "ALTER TABLE \"POSTS\" ALTER COLUMN \"TITLE\" NOT NULL"
        );
        assert_eq!(
            d.alter_column_nullability_sql("posts", "title", true),
            "ALTER TABLE \"POSTS\" ALTER COLUMN \"TITLE\" NULL"
        );
    }

    #[test]
    fn test_alter_column_type() {
        assert_eq!(
            dialect().alter_column_type_sql("posts", "views", "bigint"),
            "ALTER TABLE \"POSTS\" ALTER COLUMN \"VIEWS\" SET DATA TYPE bigint"
        );
    }

    #[test]
    fn test_restart_identity() {
        assert_eq!(
            dialect().restart_identity_sql("posts", "id", 42),
            "ALTER TABLE \"POSTS\" ALTER COLUMN \"ID\" RESTART WITH 42"
        );
    }

    #[test]
    fn test_copy_cast() {
        assert_eq!(
            dialect().copy_cast_sql("posts", "views_newtype", "views", "bigint"),
            "UPDATE \"POSTS\" SET \"VIEWS_NEWTYPE\" = CAST(\"VIEWS\" AS bigint)"
        );
    }

    #[test]
    fn test_column_change_builder() {
        let change = ColumnChange::to_type(AbstractType::String).limit(80).null(false);
        assert_eq!(change.sql_type, Some(AbstractType::String));
        assert_eq!(change.limit, Some(80));
        assert_eq!(change.null, Some(false));
        assert!(change.default.is_none());
    }
}
