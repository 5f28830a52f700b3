//! Adapter configuration.

use serde::{Deserialize, Serialize};

/// Transaction isolation levels Derby understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Dirty reads allowed.
    ReadUncommitted,
    /// Only committed rows visible.
    ReadCommitted,
    /// Read rows stay stable for the transaction.
    RepeatableRead,
    /// Full serializability.
    Serializable,
}

impl IsolationLevel {
    /// The level as SQL keywords.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// Options consumed by the adapter. Deserializable from whatever
/// configuration source the caller owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Isolation level applied at connection setup. Defaults to
    /// serializable, which Derby needs for locking reads
    /// (`SELECT ... FOR UPDATE`) to behave as callers expect. An explicit
    /// null leaves the connection's level untouched.
    #[serde(default = "default_isolation")]
    pub transaction_isolation: Option<IsolationLevel>,

    /// Schema to switch to after connecting. When a user name was given at
    /// connection time Derby already uses it as the implicit schema, so
    /// this is optional.
    #[serde(default)]
    pub schema: Option<String>,

    /// Liveness-check query. Left unset, a degraded default is installed
    /// for engine versions whose driver lacks a native liveness check.
    #[serde(default)]
    pub connection_alive_sql: Option<String>,
}

fn default_isolation() -> Option<IsolationLevel> {
    Some(IsolationLevel::Serializable)
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            transaction_isolation: default_isolation(),
            schema: None,
            connection_alive_sql: None,
        }
    }
}
