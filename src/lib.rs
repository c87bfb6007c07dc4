pub mod app;
pub mod audio;
pub mod config;
pub mod display;
mod telemetry;

pub use app::{crash_log_path, init_logging, log_debug, log_file_path, log_panic};
pub use telemetry::init_tracing;
