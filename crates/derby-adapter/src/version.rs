//! Engine version gating and the one-time driver capability probe.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// Oldest Derby release the adapter supports.
pub const MINIMUM_SUPPORTED: DatabaseVersion = DatabaseVersion::new(10, 5);

/// First release whose driver carries full JDBC 4.1 support, including a
/// native connection-liveness check.
pub const FULL_JDBC_SUPPORT: DatabaseVersion = DatabaseVersion::new(10, 8);

/// Major/minor version as the driver metadata reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl DatabaseVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether this version is at least the given one.
    #[must_use]
    pub fn at_least(&self, other: DatabaseVersion) -> bool {
        *self >= other
    }

    /// Whether the driver for this version carries full JDBC 4.1 support.
    #[must_use]
    pub fn supports_full_jdbc(&self) -> bool {
        self.at_least(FULL_JDBC_SUPPORT)
    }
}

impl fmt::Display for DatabaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl PartialOrd for DatabaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DatabaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
    }
}

/// One-time record that a fully JDBC 4.1 capable driver has been seen.
///
/// The loaded driver class cannot change mid-process, so once a connection
/// reports a sufficiently new version there is nothing left to probe:
/// subsequent connections skip version gating entirely. The flag lives in
/// explicit state rather than behind runtime method removal; a
/// process-global instance exists via [`process_capability`], and tests
/// construct their own instances to stay isolated.
#[derive(Debug, Default)]
pub struct Jdbc4Capability {
    full_support: OnceLock<bool>,
}

impl Jdbc4Capability {
    /// Creates an unprobed capability record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            full_support: OnceLock::new(),
        }
    }

    /// Records that a fully capable driver has been seen.
    pub fn record_full_support(&self) {
        let _ = self.full_support.set(true);
    }

    /// Whether a fully capable driver has been recorded.
    #[must_use]
    pub fn is_full_support(&self) -> bool {
        self.full_support.get().copied().unwrap_or(false)
    }
}

/// The process-global capability record.
#[must_use]
pub fn process_capability() -> &'static Jdbc4Capability {
    static CAPABILITY: Jdbc4Capability = Jdbc4Capability::new();
    &CAPABILITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(DatabaseVersion::new(10, 5) > DatabaseVersion::new(10, 4));
        assert!(DatabaseVersion::new(11, 0) > DatabaseVersion::new(10, 8));
        assert!(DatabaseVersion::new(10, 5).at_least(MINIMUM_SUPPORTED));
        assert!(!DatabaseVersion::new(10, 4).at_least(MINIMUM_SUPPORTED));
    }

    #[test]
    fn test_full_jdbc_threshold() {
        assert!(!DatabaseVersion::new(10, 7).supports_full_jdbc());
        assert!(DatabaseVersion::new(10, 8).supports_full_jdbc());
        assert!(DatabaseVersion::new(11, 0).supports_full_jdbc());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(DatabaseVersion::new(10, 8).to_string(), "10.8");
    }

    #[test]
    fn test_capability_records_once() {
        let cap = Jdbc4Capability::new();
        assert!(!cap.is_full_support());
        cap.record_full_support();
        assert!(cap.is_full_support());
        // Recording again is a no-op.
        cap.record_full_support();
        assert!(cap.is_full_support());
    }
}
