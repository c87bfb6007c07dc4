//! Noisewatch entrypoint: capture, measure, alert, and report as one run.
//!
//! Opens the configured input device, drives the monitor loop until Ctrl+C,
//! a duration limit, or a device failure, and prints a run summary on the
//! way out. The meter redraws a single terminal line; `--quiet` drops it
//! for headless use.

mod cli_utils;
mod signals;
mod summary;

use anyhow::Result;
use clap::Parser;
use noisewatch::audio::{
    run_monitor, DisplaySink, EchoSink, InputSource, MonitorSinks, StopReason, ToneAlert,
};
use noisewatch::config::AppConfig;
use noisewatch::display::{detect_width, MeterColors, MeterOptions, MeterView};
use noisewatch::{init_logging, init_tracing, log_debug, log_file_path, log_panic};
use std::io::{self, Write};
use std::panic;
use std::sync::OnceLock;
use std::time::Duration;

use crate::cli_utils::list_input_devices;
use crate::signals::{install_sigint_handler, stop_flag};
use crate::summary::{format_run_summary, summary_json};

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Chain the crash reporter in front of the default panic hook.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log_panic(info);
            previous(info);
        }));
    });
}

fn main() -> Result<()> {
    let mut config = AppConfig::parse();
    if config.list_devices {
        list_input_devices()?;
        return Ok(());
    }

    config.validate()?;
    let logs_enabled = config.logs && !config.no_logs;
    init_logging(logs_enabled);
    init_tracing(logs_enabled);
    install_panic_hook();
    log_debug("=== Noisewatch Started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    install_sigint_handler()?;

    let params = config.monitor_params();
    let source = InputSource::open(&params, config.input_device.as_deref())?;

    let alert = if config.no_alert {
        None
    } else {
        Some(ToneAlert::new(
            config.output_device.clone(),
            config.alert_hz,
            Duration::from_millis(config.alert_ms),
        ))
    };
    let echo = if config.echo {
        Some(EchoSink::open(
            config.output_device.as_deref(),
            params.sample_rate,
            params.channel_capacity,
        )?)
    } else {
        None
    };

    let colors = if config.no_color {
        MeterColors::none()
    } else {
        MeterColors::ansi()
    };
    let mut view = if config.quiet {
        None
    } else {
        Some(MeterView::stdout(MeterOptions {
            threshold: params.threshold,
            width: detect_width(),
            colors,
        }))
    };

    println!(
        "Listening on '{}'... press Ctrl+C to stop.",
        source.device_name()
    );
    println!(
        "Threshold {:.2} ({}), cooldown {:.1}s",
        params.threshold,
        params.scale.label(),
        config.cooldown_secs
    );
    tracing::info!(
        device = source.device_name(),
        threshold = params.threshold,
        scale = params.scale.label(),
        "monitor_started"
    );

    let sinks = MonitorSinks {
        alert: alert.as_ref(),
        echo: echo.as_ref(),
        display: view.as_mut().map(|meter| meter as &mut dyn DisplaySink),
    };
    let run = run_monitor(source, &params, stop_flag(), sinks);

    tracing::info!(
        stop_reason = run.stop_reason.label(),
        buffers = run.metrics.buffers_processed,
        alerts = run.metrics.alerts_fired,
        "monitor_stopped"
    );

    if !config.quiet {
        // Finish the meter's in-place line before printing below it.
        println!();
    }
    if config.summary_json {
        println!("{}", summary_json(&run));
    } else {
        print!("{}", format_run_summary(&run, &colors));
        let _ = io::stdout().flush();
    }
    log_debug("=== Noisewatch Exiting ===");

    if let StopReason::Error(message) = &run.stop_reason {
        anyhow::bail!("capture failed: {message}");
    }
    Ok(())
}
