//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Directory errors (lookups, uniqueness)
//! - 3xx: Config errors
//! - 6xx: Storage errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `NotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Directory errors (1xx)
    // ========================================
    /// E101: No row matched a lookup that expected one
    NotFound,
    /// E102: More than one row matched a key that is unique by schema
    InvariantViolation,
    /// E103: Caller supplied an unusable argument (bad type name, etc.)
    InvalidArgument,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,
    /// E606: Filesystem I/O failed
    IoError,
}

impl ErrorCode {
    /// Numeric code (e.g. 101 for `NotFound`).
    #[must_use]
    pub const fn numeric(self) -> u16 {
        match self {
            Self::NotFound => 101,
            Self::InvariantViolation => 102,
            Self::InvalidArgument => 103,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,
            Self::DatabaseError => 604,
            Self::SerializationError => 605,
            Self::IoError => 606,
        }
    }

    /// Category name, matching the hundreds digit of the numeric code.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::NotFound | Self::InvariantViolation | Self::InvalidArgument => "directory",
            Self::ConfigInvalid | Self::ConfigMissingRequired => "config",
            Self::DatabaseError | Self::SerializationError | Self::IoError => "storage",
        }
    }

    /// Whether the user can plausibly fix the condition and retry.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::InvalidArgument
                | Self::ConfigInvalid
                | Self::ConfigMissingRequired
        )
    }

    /// Default recovery hint.
    #[must_use]
    pub const fn suggestion(self) -> &'static str {
        match self {
            Self::NotFound => "Check the identifier with `opdir op list` or `opdir node list`",
            Self::InvariantViolation => {
                "The database violates a uniqueness constraint; inspect the operations table"
            }
            Self::InvalidArgument => "Run the command with --help to see accepted values",
            Self::ConfigInvalid => "Fix the config file or the OPDIR_* environment variables",
            Self::ConfigMissingRequired => {
                "Set the missing value in config.toml, the environment, or a CLI flag"
            }
            Self::DatabaseError => "Check that the database file is reachable and not locked",
            Self::SerializationError => "Report this as a bug",
            Self::IoError => "Check file permissions and available disk space",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:03}", self.numeric())
    }
}
