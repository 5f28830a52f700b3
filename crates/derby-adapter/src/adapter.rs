//! Connection adapter.
//!
//! [`DerbyAdapter`] drives a [`DriverConnection`]: version gating at setup,
//! isolation and schema configuration, statement dispatch with
//! NULL-comparison rewriting, metadata delegation with Derby's upper-case
//! identifier folding, identity restarts, and the transactional fallback
//! for column type changes the engine refuses to do in place.

use tracing::{debug, info, warn};

use derby_sql_core::{AbstractType, ColumnDefinition, Dialect};

use crate::column::DerbyColumn;
use crate::config::AdapterConfig;
use crate::ddl::{ColumnChange, CURRENT_SCHEMA_SQL};
use crate::dialect::DerbyDialect;
use crate::driver::DriverConnection;
use crate::error::{AdapterError, Result};
use crate::rewrite;
use crate::version::{self, Jdbc4Capability, MINIMUM_SUPPORTED};

/// Liveness query installed for drivers without a native check. Derby
/// mandates a FROM clause even here.
pub const DEGRADED_ALIVE_SQL: &str = "SELECT 1 FROM SYS.SYSSCHEMAS FETCH FIRST 1 ROWS ONLY";

/// Adapter name reported to callers.
pub const ADAPTER_NAME: &str = "Derby";

/// The Derby connection adapter.
pub struct DerbyAdapter<C> {
    conn: C,
    dialect: DerbyDialect,
    config: AdapterConfig,
    current_schema: Option<String>,
    capability: &'static Jdbc4Capability,
}

impl<C: DriverConnection> DerbyAdapter<C> {
    /// Connects the adapter: gates on the engine version, applies the
    /// configured isolation level and schema.
    pub async fn connect(conn: C, config: AdapterConfig) -> Result<Self> {
        Self::connect_with_capability(conn, config, version::process_capability()).await
    }

    /// Like [`connect`](Self::connect) with an explicit capability record;
    /// used by tests to stay isolated from the process-global probe.
    pub async fn connect_with_capability(
        conn: C,
        config: AdapterConfig,
        capability: &'static Jdbc4Capability,
    ) -> Result<Self> {
        let mut adapter = Self {
            conn,
            dialect: DerbyDialect::new(),
            config,
            current_schema: None,
            capability,
        };
        adapter.init_connection().await?;
        adapter.configure_connection().await?;
        Ok(adapter)
    }

    /// The adapter name.
    #[must_use]
    pub const fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }

    /// The dialect used for rendering.
    #[must_use]
    pub const fn dialect(&self) -> &DerbyDialect {
        &self.dialect
    }

    /// The effective configuration, including any installed liveness query.
    #[must_use]
    pub const fn config(&self) -> &AdapterConfig {
        &self.config
    }

    async fn init_connection(&mut self) -> Result<()> {
        if self.capability.is_full_support() {
            // A fully capable driver was already seen and the loaded driver
            // class cannot change mid-process.
            debug!("driver capability already probed, skipping version gate");
            return Ok(());
        }

        let version = self.conn.database_version().await?;
        if !version.at_least(MINIMUM_SUPPORTED) {
            return Err(AdapterError::ConnectionNotEstablished(format!(
                "Derby adapter requires Derby >= {MINIMUM_SUPPORTED}, server reports {version}"
            )));
        }

        if version.supports_full_jdbc() {
            self.capability.record_full_support();
        } else if self.config.connection_alive_sql.is_none() {
            info!(%version, "driver lacks full JDBC support, installing degraded liveness query");
            self.config.connection_alive_sql = Some(String::from(DEGRADED_ALIVE_SQL));
        }
        Ok(())
    }

    async fn configure_connection(&mut self) -> Result<()> {
        // Locking reads (SELECT ... FOR UPDATE) misbehave below
        // serializable, so that is the default unless config opts out.
        if let Some(level) = self.config.transaction_isolation {
            self.conn.set_transaction_isolation(level).await?;
        }
        if let Some(schema) = self.config.schema.clone() {
            self.set_schema(&schema).await?;
        }
        Ok(())
    }

    /// Executes a statement after NULL-comparison rewriting.
    pub async fn execute(&mut self, sql: &str) -> Result<u64> {
        let sql = rewrite::correct_is_null(sql);
        debug!(sql = %sql, "executing");
        Ok(self.conn.execute_update(&sql).await?)
    }

    /// Runs the configured liveness check, or the driver's native one when
    /// no query is installed.
    pub async fn verify_alive(&mut self) -> Result<bool> {
        match self.config.connection_alive_sql.clone() {
            Some(sql) => {
                self.conn.query_scalar(&sql).await?;
                Ok(true)
            }
            None => Ok(self.conn.is_valid().await?),
        }
    }

    /// The identity value of the last INSERT on this connection.
    pub async fn last_insert_id(&mut self) -> Result<i64> {
        Ok(self.conn.identity_val_local().await?)
    }

    // ------------------------------------------------------------------
    // Schema accessors
    // ------------------------------------------------------------------

    /// The connection's current schema, cached after the first query.
    pub async fn current_schema(&mut self) -> Result<String> {
        if let Some(schema) = &self.current_schema {
            return Ok(schema.clone());
        }
        let schema = self
            .conn
            .query_scalar(CURRENT_SCHEMA_SQL)
            .await?
            .unwrap_or_default();
        self.current_schema = Some(schema.clone());
        Ok(schema)
    }

    /// Switches the connection's implicit schema, invalidating the cache.
    pub async fn set_schema(&mut self, schema: &str) -> Result<()> {
        self.current_schema = None;
        let sql = self.dialect.set_schema_sql(schema);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Creates a schema.
    pub async fn create_schema(&mut self, schema: &str) -> Result<()> {
        let sql = self.dialect.create_schema_sql(schema);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Drops a schema; it must hold no objects.
    pub async fn drop_schema(&mut self, schema: &str) -> Result<()> {
        let sql = self.dialect.drop_schema_sql(schema);
        self.execute(&sql).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Lists tables in the current schema.
    pub async fn tables(&mut self) -> Result<Vec<String>> {
        let schema = self.current_schema().await?;
        Ok(self.conn.table_names(Some(&schema)).await?)
    }

    /// Primary-key column names; Derby folds identifiers to upper case.
    pub async fn primary_keys(&mut self, table: &str) -> Result<Vec<String>> {
        Ok(self.conn.primary_keys(&table.to_uppercase()).await?)
    }

    /// Normalized column metadata for a table.
    pub async fn columns(&mut self, table: &str) -> Result<Vec<DerbyColumn>> {
        let raw = self.conn.column_metadata(&table.to_uppercase()).await?;
        Ok(raw
            .iter()
            .map(|row| DerbyColumn::from_raw(&self.dialect, row))
            .collect())
    }

    // ------------------------------------------------------------------
    // DDL
    // ------------------------------------------------------------------

    /// Creates a table.
    pub async fn create_table(&mut self, name: &str, columns: &[ColumnDefinition]) -> Result<()> {
        let sql = self.dialect.create_table_sql(name, columns);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Drops a table.
    pub async fn drop_table(&mut self, name: &str) -> Result<()> {
        let sql = self.dialect.drop_table_sql(name);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Drops every table in the current schema.
    pub async fn drop_all_tables(&mut self) -> Result<()> {
        for table in self.tables().await? {
            self.drop_table(&table).await?;
        }
        Ok(())
    }

    /// Adds a column.
    pub async fn add_column(&mut self, table: &str, column: &ColumnDefinition) -> Result<()> {
        let sql = self.dialect.add_column_sql(table, column);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Drops a column.
    pub async fn remove_column(&mut self, table: &str, column: &str) -> Result<()> {
        let sql = self.dialect.remove_column_sql(table, column);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Drops several columns, one statement each.
    pub async fn remove_columns(&mut self, table: &str, columns: &[&str]) -> Result<()> {
        for column in columns {
            self.remove_column(table, column).await?;
        }
        Ok(())
    }

    /// Renames a column.
    pub async fn rename_column(
        &mut self,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        let sql = self.dialect.rename_column_sql(table, old_name, new_name);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Renames a table.
    pub async fn rename_table(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let sql = self.dialect.rename_table_sql(old_name, new_name);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Creates an index.
    pub async fn add_index(
        &mut self,
        table: &str,
        columns: &[&str],
        unique: bool,
        name: Option<&str>,
    ) -> Result<()> {
        let sql = self.dialect.create_index_sql(table, columns, unique, name);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Drops an index by name.
    pub async fn remove_index(&mut self, name: &str) -> Result<()> {
        let sql = self.dialect.remove_index_sql(name);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Restarts an identity column at `MAX(column) + 1`.
    pub async fn reset_sequence(&mut self, table: &str, column: &str) -> Result<()> {
        let max_sql = format!(
            "SELECT MAX({}) FROM {}",
            self.dialect.quote_column_name(column),
            self.dialect.quote_table_name(table)
        );
        let max = self
            .conn
            .query_scalar(&max_sql)
            .await?
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(0);
        let sql = self.dialect.restart_identity_sql(table, column, max + 1);
        self.execute(&sql).await?;
        Ok(())
    }

    /// Restarts the table's primary-key identity, a no-op unless the table
    /// has a single integer primary key.
    pub async fn reset_pk_sequence(&mut self, table: &str) -> Result<()> {
        let pks = self.primary_keys(table).await?;
        let [pk] = pks.as_slice() else {
            return Ok(());
        };
        let pk = pk.clone();

        let columns = self.columns(table).await?;
        let Some(column) = columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&pk))
        else {
            return Ok(());
        };
        if column.is_integer() {
            self.reset_sequence(table, &column.name).await?;
        }
        Ok(())
    }

    /// Changes a column's nullability and/or type.
    ///
    /// The type change is attempted in place first. When Derby rejects the
    /// alteration (and only then; unrelated errors propagate), the change
    /// runs as a transaction: add a shadow column of the new type, copy-cast
    /// the data in, drop the original, rename the shadow back. Any step
    /// failing rolls the whole transaction back, leaving the original
    /// column intact.
    pub async fn change_column(
        &mut self,
        table: &str,
        column: &str,
        change: &ColumnChange,
    ) -> Result<()> {
        if let Some(nullable) = change.null {
            let sql = self
                .dialect
                .alter_column_nullability_sql(table, column, nullable);
            self.execute(&sql).await?;
        }

        let Some(new_type) = change.sql_type else {
            return Ok(());
        };
        let type_sql =
            self.dialect
                .type_to_sql(new_type, change.limit, change.precision, change.scale);

        let in_place = self.dialect.alter_column_type_sql(table, column, &type_sql);
        match self.execute(&in_place).await {
            Ok(_) => Ok(()),
            Err(AdapterError::Driver(cause)) if cause.is_unsupported_alteration() => {
                warn!(
                    table,
                    column,
                    error = %cause,
                    "in-place type change rejected, falling back to copy-cast"
                );
                self.change_column_via_copy(table, column, change, new_type, &type_sql)
                    .await
            }
            Err(other) => Err(other),
        }
    }

    async fn change_column_via_copy(
        &mut self,
        table: &str,
        column: &str,
        change: &ColumnChange,
        new_type: AbstractType,
        type_sql: &str,
    ) -> Result<()> {
        self.conn.begin().await?;
        let outcome = self
            .copy_cast_steps(table, column, change, new_type, type_sql)
            .await;
        match outcome {
            Ok(()) => {
                self.conn.commit().await?;
                Ok(())
            }
            Err(cause) => {
                if let Err(rollback_error) = self.conn.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed column change also failed");
                }
                Err(cause)
            }
        }
    }

    async fn copy_cast_steps(
        &mut self,
        table: &str,
        column: &str,
        change: &ColumnChange,
        new_type: AbstractType,
        type_sql: &str,
    ) -> Result<()> {
        let shadow = format!("{column}_newtype");

        let mut definition = ColumnDefinition::new(shadow.clone(), new_type);
        definition.limit = change.limit;
        definition.precision = change.precision;
        definition.scale = change.scale;
        definition.default = change.default.clone();

        let sql = self.dialect.add_column_sql(table, &definition);
        self.execute(&sql).await?;

        let sql = self.dialect.copy_cast_sql(table, &shadow, column, type_sql);
        self.execute(&sql).await?;

        let sql = self.dialect.remove_column_sql(table, column);
        self.execute(&sql).await?;

        let sql = self.dialect.rename_column_sql(table, &shadow, column);
        self.execute(&sql).await?;

        Ok(())
    }
}
