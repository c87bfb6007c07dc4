//! Audio capture and loudness monitoring pipeline.
//!
//! Fixed-size sample buffers are captured via CPAL, reduced to a scalar level
//! per buffer, tracked in a rolling window, and checked against an alert
//! threshold with a cooldown. The loop fans out to the alert tone, the echo
//! stream, and the terminal meter without ever blocking on any of them.

mod capture;
mod dispatch;
mod level;
mod monitor;
mod output;
mod source;
mod window;

pub use capture::{
    buffer_period, run_loop, run_monitor, DisplaySink, LoopOptions, MonitorFeed, MonitorPipeline,
    MonitorSinks, RunMetrics, RunSummary, StopReason,
};
pub use level::{LevelError, LevelEstimator};
pub use monitor::{AlertDecision, ThresholdMonitor};
pub use output::{EchoSink, ToneAlert};
pub use source::InputSource;
pub use window::RollingWindow;
