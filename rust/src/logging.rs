//! Logging macros for the engine with verbosity level control.
//!
//! Nothing is emitted when verbosity is 0. Above that, events go to `tracing`
//! and the host decides where they end up.
//! - 0: SILENT
//! - 1: CHANGES (fallbacks applied, pass summaries)
//! - 2: CHECKS (per-task decisions)
//! - 3: DEBUG (full algorithm internals)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: applied fallbacks, pass results.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: rule hits, queue decisions.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: per-task offsets, longest-path relaxation steps.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_compile() {
        // No subscriber installed: macros must still expand and not panic.
        let verbosity = VERBOSITY_DEBUG;
        log_changes!(verbosity, "changes {}", 1);
        log_checks!(verbosity, task = "A", "checks {}", 2);
        log_debug!(VERBOSITY_SILENT, "debug {}", 3);
    }
}
