//! Diagnostic verbosity
//!
//! Levels are cumulative: Debug includes Verbose, Trace includes Debug.

use std::fmt;

/// Verbosity level for diagnostics on stderr
///
/// Levels are ordered: Quiet < Normal < Verbose < Debug < Trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only
    Quiet = 0,
    /// Warnings and errors (default)
    #[default]
    Normal = 1,
    /// One line per applied change
    Verbose = 2,
    /// HTTP method, URL, status code, timing
    Debug = 3,
    /// Everything, including dependency internals
    Trace = 4,
}

impl LogLevel {
    /// Create LogLevel from CLI flags
    ///
    /// `quiet` overrides everything, otherwise the highest flag wins.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if trace {
            Self::Trace
        } else if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    pub fn is_trace(&self) -> bool {
        *self >= Self::Trace
    }

    /// `EnvFilter` directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "warn,kc_cli=info",
            Self::Debug => "warn,kc_cli=debug",
            Self::Trace => "debug,kc_cli=trace",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Quiet => "QUIET",
            Self::Normal => "NORMAL",
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Quiet < LogLevel::Normal);
        assert!(LogLevel::Normal < LogLevel::Verbose);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(LogLevel::from_flags(false, false, false, false), LogLevel::Normal);
        assert_eq!(LogLevel::from_flags(true, false, false, false), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(true, true, false, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(true, true, true, false), LogLevel::Trace);
    }

    #[test]
    fn test_quiet_overrides() {
        assert_eq!(LogLevel::from_flags(true, true, true, true), LogLevel::Quiet);
    }

    #[test]
    fn test_cumulative() {
        assert!(LogLevel::Trace.is_trace());
        assert!(!LogLevel::Debug.is_trace());
        assert!(LogLevel::Debug > LogLevel::Verbose);
        assert!(LogLevel::Quiet < LogLevel::Normal);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(LogLevel::Normal.filter_directive(), "warn");
        assert_eq!(LogLevel::Debug.filter_directive(), "warn,kc_cli=debug");
    }

    #[test]
    fn test_display() {
        assert_eq!(LogLevel::Verbose.to_string(), "VERBOSE");
    }
}
