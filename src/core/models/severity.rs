//! Issue severity levels
//!
//! Ranks findings and gates the pass/fail verdict through `fail_on`.

use serde::{Deserialize, Serialize};

/// Issue severity levels, ordered `Notice < Warning < Error`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor suggestion
    Notice,
    /// Important, but not critical
    Warning,
    /// Critical violation
    #[default]
    Error,
}

impl Severity {
    /// All severities, highest rank first
    pub const ALL: [Self; 3] = [Self::Error, Self::Warning, Self::Notice];

    /// Numeric rank: error=3, warning=2, notice=1
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Notice => 1,
            Self::Warning => 2,
            Self::Error => 3,
        }
    }

    /// Whether an issue of this severity meets a binding's `fail_on` threshold
    #[must_use]
    pub const fn meets(self, threshold: Self) -> bool {
        self.rank() >= threshold.rank()
    }

    /// Lowercase name as used in configuration and reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "notice" => Ok(Self::Notice),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid severity: {s}. Use: error, warning, notice")),
        }
    }
}
