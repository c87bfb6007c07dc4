//! Process-level support: file logging and crash reporting.

mod logging;

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use logging::set_logging_for_tests;
pub use logging::{crash_log_path, init_logging, log_debug, log_file_path, log_panic};
