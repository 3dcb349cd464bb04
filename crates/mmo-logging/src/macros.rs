//! ---
//! mmo_section: "03-diagnostics-logging"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Call-site logging macros for the engine logger."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
//! Macros that fill a `{}` template and tag the line with `file!()`/`line!()`.
//!
//! ```ignore
//! mmo_info!(logger, "player {} joined zone {}", player_id, zone);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __mmo_log {
    ($level:expr, $logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        if logger.enabled($level) {
            let args: &[&dyn ::std::fmt::Display] = &[$(&$arg),*];
            logger.log(
                $level,
                &$crate::format_template($template, args),
                Some($crate::SourceLocation::new(file!(), line!())),
            );
        }
    }};
}

/// Emit a debug line with call-site location.
#[macro_export]
macro_rules! mmo_debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__mmo_log!($crate::LogLevel::Debug, $logger, $($rest)+)
    };
}

/// Emit an informational line with call-site location.
#[macro_export]
macro_rules! mmo_info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__mmo_log!($crate::LogLevel::Info, $logger, $($rest)+)
    };
}

/// Emit a warning line with call-site location.
#[macro_export]
macro_rules! mmo_warning {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__mmo_log!($crate::LogLevel::Warning, $logger, $($rest)+)
    };
}

/// Emit an error line with call-site location.
#[macro_export]
macro_rules! mmo_error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__mmo_log!($crate::LogLevel::Error, $logger, $($rest)+)
    };
}

/// Emit a critical line with call-site location.
#[macro_export]
macro_rules! mmo_critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__mmo_log!($crate::LogLevel::Critical, $logger, $($rest)+)
    };
}
