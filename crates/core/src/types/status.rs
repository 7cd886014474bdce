//! Status enums for user-facing feedback.

use serde::{Deserialize, Serialize};

/// Notification severity.
///
/// Maps onto the storefront's toast styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    #[default]
    Info,
    Warning,
    Danger,
}

impl Severity {
    /// Lowercase name, also used as the toast CSS modifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Whether this severity reports a failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Warning | Self::Danger)
    }
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
        let parsed: Severity = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(parsed, Severity::Success);
    }

    #[test]
    fn test_severity_failure_classification() {
        assert!(Severity::Warning.is_failure());
        assert!(Severity::Danger.is_failure());
        assert!(!Severity::Success.is_failure());
        assert!(!Severity::Info.is_failure());
    }
}
