//! End-of-run reporting.
//!
//! Formats the monitor's final counters for display on exit, either as an
//! aligned text block or as a single JSON line for scripted callers.

use noisewatch::audio::{RunSummary, StopReason};
use noisewatch::display::MeterColors;
use serde_json::json;

/// Format the run summary for display on exit.
pub(crate) fn format_run_summary(summary: &RunSummary, colors: &MeterColors) -> String {
    let metrics = &summary.metrics;
    let mut lines = vec![
        String::new(), // Empty line before
        format_header(colors),
        format_separator(),
        format_stat_line(
            colors,
            "Buffers",
            &metrics.buffers_processed.to_string(),
            colors.success,
        ),
    ];

    if metrics.buffers_skipped > 0 {
        lines.push(format_stat_line(
            colors,
            "Skipped",
            &metrics.buffers_skipped.to_string(),
            colors.warning,
        ));
    }
    if metrics.silent_buffers > 0 {
        lines.push(format_stat_line(
            colors,
            "Silent",
            &metrics.silent_buffers.to_string(),
            "",
        ));
    }
    if metrics.overruns > 0 {
        lines.push(format_stat_line(
            colors,
            "Overruns",
            &metrics.overruns.to_string(),
            colors.warning,
        ));
    }

    let alert_color = if metrics.alerts_fired > 0 {
        colors.error
    } else {
        ""
    };
    lines.push(format_stat_line(
        colors,
        "Alerts",
        &metrics.alerts_fired.to_string(),
        alert_color,
    ));
    if metrics.alerts_suppressed > 0 {
        lines.push(format_stat_line(
            colors,
            "Suppressed",
            &metrics.alerts_suppressed.to_string(),
            "",
        ));
    }

    lines.push(format_stat_line(
        colors,
        "Peak",
        &format!("{:.2}", summary.peak),
        "",
    ));
    lines.push(format_stat_line(
        colors,
        "Floor",
        &format!("{:.2}", summary.floor),
        "",
    ));
    lines.push(format_stat_line(
        colors,
        "Duration",
        &format_duration(summary.elapsed.as_secs_f32()),
        "",
    ));

    let (stopped, stop_color) = match &summary.stop_reason {
        StopReason::Error(message) => (
            format!("{} ({message})", summary.stop_reason.label()),
            colors.error,
        ),
        StopReason::StreamClosed => (summary.stop_reason.label().to_string(), colors.warning),
        other => (other.label().to_string(), ""),
    };
    lines.push(format_stat_line(colors, "Stopped", &stopped, stop_color));

    lines.push(String::new()); // Empty line after

    lines.join("\n")
}

/// One-line JSON rendering of the same counters.
pub(crate) fn summary_json(summary: &RunSummary) -> String {
    let mut value = json!({
        "elapsed_secs": summary.elapsed.as_secs_f64(),
        "peak": summary.peak,
        "floor": summary.floor,
        "metrics": summary.metrics,
        "stop_reason": summary.stop_reason.label(),
    });
    if let StopReason::Error(message) = &summary.stop_reason {
        value["stop_detail"] = json!(message);
    }
    value.to_string()
}

fn format_header(colors: &MeterColors) -> String {
    format!("{}Run Summary{}", colors.info, colors.reset)
}

fn format_separator() -> String {
    "───────────".to_string()
}

fn format_stat_line(colors: &MeterColors, label: &str, value: &str, value_color: &str) -> String {
    let value_display = if value_color.is_empty() {
        value.to_string()
    } else {
        format!("{}{}{}", value_color, value, colors.reset)
    };
    format!("{:<12} {}", label, value_display)
}

fn format_duration(secs: f32) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins as u32, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining_mins = ((secs % 3600.0) / 60.0).floor();
        format!("{}h {}m", hours as u32, remaining_mins as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noisewatch::audio::RunMetrics;
    use std::time::Duration;

    fn quiet_summary() -> RunSummary {
        RunSummary {
            metrics: RunMetrics {
                buffers_processed: 120,
                ..Default::default()
            },
            stop_reason: StopReason::Interrupted,
            peak: 84.5,
            floor: 2.25,
            elapsed: Duration::from_secs_f32(12.5),
        }
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(30.5), "30.5s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(125.0), "2m 5s");
    }

    #[test]
    fn format_duration_hours() {
        assert_eq!(format_duration(3725.0), "1h 2m");
    }

    #[test]
    fn summary_text_reports_the_core_counters() {
        let output = format_run_summary(&quiet_summary(), &MeterColors::none());
        assert!(output.contains("Run Summary"));
        assert!(output.contains("Buffers"));
        assert!(output.contains("120"));
        assert!(output.contains("84.50"));
        assert!(output.contains("12.5s"));
        assert!(output.contains("interrupted"));
    }

    #[test]
    fn summary_text_hides_zero_only_rows() {
        let output = format_run_summary(&quiet_summary(), &MeterColors::none());
        assert!(!output.contains("Skipped"));
        assert!(!output.contains("Overruns"));
        assert!(!output.contains("Suppressed"));
    }

    #[test]
    fn summary_text_shows_trouble_rows_when_counted() {
        let mut summary = quiet_summary();
        summary.metrics.buffers_skipped = 2;
        summary.metrics.overruns = 7;
        summary.metrics.alerts_suppressed = 3;
        let output = format_run_summary(&summary, &MeterColors::none());
        assert!(output.contains("Skipped      2"));
        assert!(output.contains("Overruns     7"));
        assert!(output.contains("Suppressed   3"));
    }

    #[test]
    fn summary_text_includes_the_error_detail() {
        let mut summary = quiet_summary();
        summary.stop_reason = StopReason::Error("device unplugged".to_string());
        let output = format_run_summary(&summary, &MeterColors::none());
        assert!(output.contains("error (device unplugged)"));
    }

    #[test]
    fn summary_json_round_trips_through_serde() {
        let parsed: serde_json::Value =
            serde_json::from_str(&summary_json(&quiet_summary())).expect("invalid json");
        assert_eq!(parsed["stop_reason"], "interrupted");
        assert_eq!(parsed["metrics"]["buffers_processed"], 120);
        assert!(parsed.get("stop_detail").is_none());
        assert!((parsed["peak"].as_f64().expect("peak missing") - 84.5).abs() < 1e-6);
    }

    #[test]
    fn summary_json_carries_the_error_detail() {
        let mut summary = quiet_summary();
        summary.stop_reason = StopReason::Error("device unplugged".to_string());
        let parsed: serde_json::Value =
            serde_json::from_str(&summary_json(&summary)).expect("invalid json");
        assert_eq!(parsed["stop_reason"], "error");
        assert_eq!(parsed["stop_detail"], "device unplugged");
    }
}
