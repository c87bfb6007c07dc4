//! Steady-state monitor loop.
//!
//! Drives level estimation, the rolling window, and the threshold monitor for
//! each captured buffer, and fans decisions out to the alert, echo, and
//! display sinks. Recoverable conditions (overruns, invalid buffers) are
//! counted and skipped; only a stop signal, a duration limit, a device
//! failure, or a dead stream ends the loop.

use super::level::{LevelError, LevelEstimator};
use super::monitor::{AlertDecision, ThresholdMonitor};
use super::output::{EchoSink, ToneAlert};
use super::source::InputSource;
use super::window::RollingWindow;
use crate::config::MonitorParams;
use crate::log_debug;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Counters collected while the monitor runs, reported in the final summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    pub buffers_processed: usize,
    pub buffers_skipped: usize,
    pub silent_buffers: usize,
    pub overruns: usize,
    pub alerts_fired: usize,
    pub alerts_suppressed: usize,
}

/// Why the monitor loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    MaxDuration,
    StreamClosed,
    Error(String),
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::Interrupted => "interrupted",
            StopReason::MaxDuration => "max_duration",
            StopReason::StreamClosed => "stream_closed",
            StopReason::Error(_) => "error",
        }
    }
}

/// Final report handed back to the caller when the loop ends.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub metrics: RunMetrics,
    pub stop_reason: StopReason,
    /// Window max at shutdown, 0 if nothing was measured.
    pub peak: f32,
    /// Window min at shutdown, 0 if nothing was measured.
    pub floor: f32,
    pub elapsed: Duration,
}

/// Display side of the loop. Render failures are reported back so the loop
/// can log them without dying; a headless deployment passes no sink at all.
pub trait DisplaySink {
    fn render(&mut self, snapshot: &[f32], latest: f32, max: f32, min: f32) -> io::Result<()>;
    fn alert_notice(&mut self, level: f32) -> io::Result<()>;
}

/// Optional fan-out targets for the loop.
#[derive(Default)]
pub struct MonitorSinks<'a> {
    pub alert: Option<&'a ToneAlert>,
    pub echo: Option<&'a EchoSink>,
    pub display: Option<&'a mut dyn DisplaySink>,
}

/// Capture side of the loop: the buffer channel plus the shared slots the
/// stream callbacks write into.
pub struct MonitorFeed<'a> {
    pub receiver: &'a Receiver<Vec<i16>>,
    pub overruns: &'a AtomicUsize,
    pub failure: Option<&'a Mutex<Option<String>>>,
}

/// Estimator, window, and monitor wired together for one run.
pub struct MonitorPipeline {
    estimator: LevelEstimator,
    window: RollingWindow,
    monitor: ThresholdMonitor,
    metrics: RunMetrics,
}

impl MonitorPipeline {
    pub fn from_params(params: &MonitorParams) -> Self {
        Self {
            estimator: LevelEstimator::new(params.gain, params.scale),
            window: RollingWindow::new(params.window),
            monitor: ThresholdMonitor::new(
                params.threshold,
                Duration::from_secs_f32(params.cooldown_secs.max(0.0)),
            ),
            metrics: RunMetrics::default(),
        }
    }

    /// Run one buffer through the estimator and the monitor.
    ///
    /// Returns the level and decision when the buffer produced a valid level.
    /// Invalid buffers are counted and skipped. Silence in decibel mode means
    /// "no sound", not an error worth logging, so it gets its own counter and
    /// stays out of the debug log.
    pub fn on_buffer(&mut self, buffer: &[i16], now: Instant) -> Option<(f32, AlertDecision)> {
        match self.estimator.estimate(buffer) {
            Ok(level) => {
                self.metrics.buffers_processed += 1;
                self.window.push(level);
                let decision = self.monitor.evaluate(level, now);
                match decision {
                    AlertDecision::Fire => self.metrics.alerts_fired += 1,
                    AlertDecision::Suppressed => self.metrics.alerts_suppressed += 1,
                    AlertDecision::BelowThreshold => {}
                }
                Some((level, decision))
            }
            Err(LevelError::SilenceUndefined) => {
                self.metrics.silent_buffers += 1;
                None
            }
            Err(err) => {
                self.metrics.buffers_skipped += 1;
                log_debug(&format!("level_skipped: {err}"));
                None
            }
        }
    }

    pub fn note_overruns(&mut self, count: usize) {
        self.metrics.overruns = self.metrics.overruns.saturating_add(count);
    }

    pub fn estimator(&self) -> &LevelEstimator {
        &self.estimator
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub fn threshold(&self) -> f32 {
        self.monitor.threshold()
    }
}

/// Knobs for the loop itself, separate from the analysis parameters.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Bound on each channel read, so a stop signal is observed within one
    /// buffer period even when the device goes quiet.
    pub read_timeout: Duration,
    /// Redraw the meter every this many received buffers.
    pub refresh_every: u64,
    pub max_duration: Option<Duration>,
}

impl LoopOptions {
    pub fn from_params(params: &MonitorParams) -> Self {
        Self {
            read_timeout: buffer_period(params),
            refresh_every: params.refresh_every.max(1),
            max_duration: (params.max_secs > 0).then(|| Duration::from_secs(params.max_secs)),
        }
    }
}

/// Wall-clock length of one capture buffer.
pub fn buffer_period(params: &MonitorParams) -> Duration {
    let rate = params.sample_rate.max(1);
    Duration::from_secs_f64(params.buffer_size.max(1) as f64 / f64::from(rate))
}

/// Drive the monitor until a stop condition.
///
/// The feed's overrun counter is drained each pass so the stream callback
/// never blocks on bookkeeping, and a device failure reported through the
/// feed ends the run. Sink failures are logged and isolated: a broken
/// display or alert never stops capture.
pub fn run_loop(
    feed: MonitorFeed<'_>,
    pipeline: &mut MonitorPipeline,
    opts: &LoopOptions,
    stop_flag: &AtomicBool,
    mut sinks: MonitorSinks<'_>,
) -> RunSummary {
    let started = Instant::now();
    let mut received: u64 = 0;

    let stop_reason = loop {
        if stop_flag.load(Ordering::Relaxed) {
            break StopReason::Interrupted;
        }
        if let Some(limit) = opts.max_duration {
            if started.elapsed() >= limit {
                break StopReason::MaxDuration;
            }
        }

        let lost = feed.overruns.swap(0, Ordering::Relaxed);
        if lost > 0 {
            pipeline.note_overruns(lost);
            log_debug(&format!("capture_overrun: {lost} buffers lost"));
        }
        if let Some(failure) = feed.failure {
            let message = failure
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            if let Some(message) = message {
                break StopReason::Error(message);
            }
        }

        match feed.receiver.recv_timeout(opts.read_timeout) {
            Ok(buffer) => {
                received += 1;
                if let Some((level, decision)) = pipeline.on_buffer(&buffer, Instant::now()) {
                    if decision == AlertDecision::Fire {
                        log_debug(&format!("alert_fired: level={level:.2}"));
                        if let Some(alert) = sinks.alert {
                            alert.play();
                        }
                        if let Some(view) = sinks.display.as_mut() {
                            if let Err(err) = view.alert_notice(level) {
                                log_debug(&format!("display_error: {err}"));
                            }
                        }
                    }
                    if received % opts.refresh_every == 0 {
                        if let Some(view) = sinks.display.as_mut() {
                            let snapshot = pipeline.window().snapshot();
                            let max = pipeline.window().max();
                            let min = pipeline.window().min();
                            if let Err(err) = view.render(&snapshot, level, max, min) {
                                log_debug(&format!("display_error: {err}"));
                            }
                        }
                    }
                }
                if let Some(echo) = sinks.echo {
                    echo.write(pipeline.estimator().gained(&buffer));
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break StopReason::StreamClosed,
        }
    };

    RunSummary {
        peak: pipeline.window().max(),
        floor: pipeline.window().min(),
        metrics: pipeline.metrics().clone(),
        stop_reason,
        elapsed: started.elapsed(),
    }
}

/// Run the monitor over an already-open source until it stops, then release
/// the stream.
pub fn run_monitor(
    source: InputSource,
    params: &MonitorParams,
    stop_flag: &AtomicBool,
    sinks: MonitorSinks<'_>,
) -> RunSummary {
    let mut pipeline = MonitorPipeline::from_params(params);
    let opts = LoopOptions::from_params(params);
    let feed = MonitorFeed {
        receiver: source.receiver(),
        overruns: source.overruns().as_ref(),
        failure: Some(source.failure().as_ref()),
    };
    let summary = run_loop(feed, &mut pipeline, &opts, stop_flag, sinks);
    source.pause();
    log_debug(&format!(
        "monitor stopped: reason={} processed={} fired={}",
        summary.stop_reason.label(),
        summary.metrics.buffers_processed,
        summary.metrics.alerts_fired
    ));
    summary
}
