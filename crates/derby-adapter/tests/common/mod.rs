//! Shared mock driver for adapter integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use derby_adapter::config::IsolationLevel;
use derby_adapter::driver::{DriverConnection, DriverError, RawColumn};
use derby_adapter::version::DatabaseVersion;

/// Everything the mock observed, shared with the test body.
#[derive(Debug, Default)]
pub struct MockState {
    /// Statements passed to `execute_update`, interleaved with BEGIN /
    /// COMMIT / ROLLBACK markers.
    pub executed: Vec<String>,
    /// Queries passed to `query_scalar`.
    pub scalar_calls: Vec<String>,
    /// How many times the version was read.
    pub version_calls: usize,
    /// Last isolation level set on the connection.
    pub isolation: Option<IsolationLevel>,
}

pub struct MockDriver {
    version: DatabaseVersion,
    state: Arc<Mutex<MockState>>,
    scalars: HashMap<String, String>,
    tables: Vec<String>,
    primary_keys: HashMap<String, Vec<String>>,
    columns: HashMap<String, Vec<RawColumn>>,
    failures: Vec<(String, DriverError)>,
}

impl MockDriver {
    pub fn with_version(major: u32, minor: u32) -> Self {
        Self {
            version: DatabaseVersion::new(major, minor),
            state: Arc::new(Mutex::new(MockState::default())),
            scalars: HashMap::new(),
            tables: Vec::new(),
            primary_keys: HashMap::new(),
            columns: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Handle onto the observation log, kept by the test body.
    pub fn state(&self) -> Arc<Mutex<MockState>> {
        Arc::clone(&self.state)
    }

    /// Cans a scalar response for an exact query text.
    pub fn scalar(mut self, sql: &str, value: &str) -> Self {
        self.scalars.insert(String::from(sql), String::from(value));
        self
    }

    /// Makes any statement containing `fragment` fail with `error`.
    pub fn fail_matching(mut self, fragment: &str, error: DriverError) -> Self {
        self.failures.push((String::from(fragment), error));
        self
    }

    pub fn table(mut self, name: &str) -> Self {
        self.tables.push(String::from(name));
        self
    }

    pub fn with_primary_keys(mut self, table: &str, keys: &[&str]) -> Self {
        self.primary_keys.insert(
            String::from(table),
            keys.iter().map(|k| String::from(*k)).collect(),
        );
        self
    }

    pub fn with_columns(mut self, table: &str, columns: Vec<RawColumn>) -> Self {
        self.columns.insert(String::from(table), columns);
        self
    }

    fn log(&self, entry: &str) {
        self.state
            .lock()
            .expect("mock state poisoned")
            .executed
            .push(String::from(entry));
    }
}

/// A column row the way the Derby driver would report it.
pub fn raw_column(name: &str, sql_type: &str, default: Option<&str>) -> RawColumn {
    RawColumn {
        name: String::from(name),
        sql_type: String::from(sql_type),
        default: default.map(String::from),
        nullable: true,
    }
}

impl DriverConnection for MockDriver {
    async fn execute_update(&mut self, sql: &str) -> Result<u64, DriverError> {
        for (fragment, error) in &self.failures {
            if sql.contains(fragment.as_str()) {
                self.log(sql);
                return Err(error.clone());
            }
        }
        self.log(sql);
        Ok(1)
    }

    async fn query_scalar(&mut self, sql: &str) -> Result<Option<String>, DriverError> {
        self.state
            .lock()
            .expect("mock state poisoned")
            .scalar_calls
            .push(String::from(sql));
        Ok(self.scalars.get(sql).cloned())
    }

    async fn database_version(&mut self) -> Result<DatabaseVersion, DriverError> {
        self.state.lock().expect("mock state poisoned").version_calls += 1;
        Ok(self.version)
    }

    async fn table_names(&mut self, _schema: Option<&str>) -> Result<Vec<String>, DriverError> {
        Ok(self.tables.clone())
    }

    async fn primary_keys(&mut self, table: &str) -> Result<Vec<String>, DriverError> {
        Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
    }

    async fn column_metadata(&mut self, table: &str) -> Result<Vec<RawColumn>, DriverError> {
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn identity_val_local(&mut self) -> Result<i64, DriverError> {
        Ok(42)
    }

    async fn set_transaction_isolation(
        &mut self,
        level: IsolationLevel,
    ) -> Result<(), DriverError> {
        self.state.lock().expect("mock state poisoned").isolation = Some(level);
        Ok(())
    }

    async fn is_valid(&mut self) -> Result<bool, DriverError> {
        Ok(true)
    }

    async fn begin(&mut self) -> Result<(), DriverError> {
        self.log("BEGIN");
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DriverError> {
        self.log("COMMIT");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DriverError> {
        self.log("ROLLBACK");
        Ok(())
    }
}
