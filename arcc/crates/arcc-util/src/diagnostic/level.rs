//! Diagnostic severity levels.
//!
//! # Examples
//!
//! ```
//! use arcc_util::diagnostic::Severity;
//!
//! assert!(Severity::Error.is_error());
//! assert!(Severity::Error.is_higher_than(Severity::Warning));
//! assert_eq!(Severity::Hint.to_string(), "hint");
//! ```

use std::fmt;

/// Diagnostic severity level
///
/// The discriminant orders severities from most to least severe, so a lower
/// numeric value means a higher severity. The store relies on this when two
/// diagnostics collide at the same position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// A problem that makes the program invalid
    Error = 0,
    /// Suspicious but valid code
    Warning = 1,
    /// Informational message, e.g. cancellation
    Info = 2,
    /// A suggestion
    Hint = 3,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Hint,
    ];

    /// Returns true if this level represents an error
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns true if `self` is strictly more severe than `other`
    #[inline]
    pub fn is_higher_than(self, other: Severity) -> bool {
        (self as u8) < (other as u8)
    }

    /// Lowercase name used when rendering
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Error.is_higher_than(Severity::Warning));
        assert!(Severity::Warning.is_higher_than(Severity::Info));
        assert!(Severity::Info.is_higher_than(Severity::Hint));
        assert!(!Severity::Hint.is_higher_than(Severity::Hint));
        assert!(!Severity::Hint.is_higher_than(Severity::Error));
    }

    #[test]
    fn test_severity_display() {
        let names: Vec<String> = Severity::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["error", "warning", "info", "hint"]);
    }
}
