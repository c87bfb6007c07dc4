//! Single-line terminal meter.
//!
//! Renders the rolling window as a waveform strip with the latest level and
//! the window extremes beside it, redrawn in place. Colors grade each value
//! against the alert threshold; `MeterColors::none` turns them off for pipes.

use crate::audio::DisplaySink;
use crossterm::terminal::size as terminal_size;
use std::io::{self, Stdout, Write};

/// Waveform characters, quietest to loudest.
const WAVEFORM_CHARS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// ANSI codes used by the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterColors {
    pub success: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
    pub info: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl MeterColors {
    pub fn ansi() -> Self {
        Self {
            success: "\x1b[32m",
            warning: "\x1b[33m",
            error: "\x1b[31m",
            info: "\x1b[36m",
            dim: "\x1b[2m",
            reset: "\x1b[0m",
        }
    }

    /// Every code empty, for `--no-color` and non-tty output.
    pub fn none() -> Self {
        Self {
            success: "",
            warning: "",
            error: "",
            info: "",
            dim: "",
            reset: "",
        }
    }
}

/// Meter display configuration.
#[derive(Debug, Clone, Copy)]
pub struct MeterOptions {
    /// Alert threshold the colors grade against.
    pub threshold: f32,
    /// Width of the waveform strip in characters.
    pub width: usize,
    pub colors: MeterColors,
}

impl Default for MeterOptions {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            width: 30,
            colors: MeterColors::ansi(),
        }
    }
}

/// Strip width that leaves room for the numeric readout on one line.
pub fn detect_width() -> usize {
    let cols = terminal_size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(80);
    cols.saturating_sub(40).clamp(16, 60)
}

/// Color for a level relative to the threshold (green, then yellow from 60%,
/// then red from 85%).
fn level_color(level: f32, threshold: f32, colors: &MeterColors) -> &'static str {
    if threshold <= 0.0 {
        return colors.error;
    }
    let ratio = level / threshold;
    if ratio < 0.6 {
        colors.success
    } else if ratio < 0.85 {
        colors.warning
    } else {
        colors.error
    }
}

/// Render recent levels as a fixed-width strip, newest at the right edge.
///
/// Heights are scaled against the window maximum so the strip stays readable
/// whatever the absolute level range; an entry that was the loudest in the
/// window always draws full height.
pub fn format_waveform(
    levels: &[f32],
    width: usize,
    threshold: f32,
    colors: &MeterColors,
) -> String {
    if width == 0 {
        return String::new();
    }
    if levels.is_empty() {
        return " ".repeat(width);
    }

    let scale = levels
        .iter()
        .copied()
        .fold(0.0f32, f32::max)
        .max(f32::EPSILON);
    let start = levels.len().saturating_sub(width);
    let pad_count = width.saturating_sub(levels.len());
    let samples_iter =
        std::iter::repeat_n(0.0f32, pad_count).chain(levels[start..].iter().copied());

    let mut strip = String::new();
    for level in samples_iter {
        let normalized = (level / scale).clamp(0.0, 1.0);
        let char_idx = (normalized * (WAVEFORM_CHARS.len() - 1) as f32) as usize;
        strip.push_str(level_color(level, threshold, colors));
        strip.push(WAVEFORM_CHARS[char_idx]);
        strip.push_str(colors.reset);
    }
    strip
}

/// Redraw the meter line in place.
pub fn render_meter(
    out: &mut dyn Write,
    snapshot: &[f32],
    latest: f32,
    max: f32,
    min: f32,
    opts: &MeterOptions,
) -> io::Result<()> {
    let colors = &opts.colors;
    let strip = format_waveform(snapshot, opts.width, opts.threshold, colors);
    write!(
        out,
        "\r\x1b[2K{strip} {}{latest:>8.2}{} {}max {max:.2} min {min:.2}{}",
        level_color(latest, opts.threshold, colors),
        colors.reset,
        colors.dim,
        colors.reset
    )?;
    out.flush()
}

/// Print a persistent alert line; the meter picks up again on the next row.
pub fn render_notice(
    out: &mut dyn Write,
    level: f32,
    threshold: f32,
    colors: &MeterColors,
) -> io::Result<()> {
    writeln!(
        out,
        "\r\x1b[2K{}loud: level {level:.2} crossed {threshold:.2}{}",
        colors.error, colors.reset
    )?;
    out.flush()
}

/// Owns the output handle and render options for one monitor run.
pub struct MeterView<W: Write> {
    out: W,
    opts: MeterOptions,
}

impl MeterView<Stdout> {
    pub fn stdout(opts: MeterOptions) -> Self {
        Self {
            out: io::stdout(),
            opts,
        }
    }
}

impl<W: Write> MeterView<W> {
    pub fn new(out: W, opts: MeterOptions) -> Self {
        Self { out, opts }
    }

    pub fn options(&self) -> &MeterOptions {
        &self.opts
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for MeterView<W> {
    fn render(&mut self, snapshot: &[f32], latest: f32, max: f32, min: f32) -> io::Result<()> {
        render_meter(&mut self.out, snapshot, latest, max, min, &self.opts)
    }

    fn alert_notice(&mut self, level: f32) -> io::Result<()> {
        render_notice(&mut self.out, level, self.opts.threshold, &self.opts.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(bytes: &[u8]) -> String {
        String::from_utf8(strip_ansi_escapes::strip(bytes)).expect("valid utf8")
    }

    fn plain_options() -> MeterOptions {
        MeterOptions {
            threshold: 50.0,
            width: 4,
            colors: MeterColors::none(),
        }
    }

    #[test]
    fn waveform_of_empty_window_is_blank() {
        let strip = format_waveform(&[], 5, 50.0, &MeterColors::none());
        assert_eq!(strip, "     ");
    }

    #[test]
    fn waveform_normalizes_against_window_max() {
        let strip = format_waveform(&[0.0, 50.0, 100.0], 3, 200.0, &MeterColors::none());
        assert_eq!(strip, "▁▄█");
    }

    #[test]
    fn waveform_pads_short_history_on_the_left() {
        let strip = format_waveform(&[100.0], 3, 200.0, &MeterColors::none());
        assert_eq!(strip, "▁▁█");
    }

    #[test]
    fn waveform_keeps_newest_levels_when_history_is_long() {
        let strip = format_waveform(&[0.0, 0.0, 100.0, 100.0], 2, 200.0, &MeterColors::none());
        assert_eq!(strip, "██");
    }

    #[test]
    fn waveform_zero_width_is_empty() {
        assert_eq!(format_waveform(&[1.0], 0, 50.0, &MeterColors::none()), "");
    }

    #[test]
    fn level_color_bands_follow_the_threshold() {
        let colors = MeterColors::ansi();
        assert_eq!(level_color(10.0, 50.0, &colors), colors.success);
        assert_eq!(level_color(40.0, 50.0, &colors), colors.warning);
        assert_eq!(level_color(60.0, 50.0, &colors), colors.error);
        assert_eq!(level_color(1.0, 0.0, &colors), colors.error);
    }

    #[test]
    fn meter_line_shows_latest_and_extremes() {
        let mut out = Vec::new();
        render_meter(&mut out, &[10.0], 42.0, 99.5, 1.25, &plain_options())
            .expect("render failed");
        assert!(out.starts_with(b"\r"));
        let line = plain(&out);
        assert!(line.contains("42.00"));
        assert!(line.contains("max 99.50"));
        assert!(line.contains("min 1.25"));
    }

    #[test]
    fn alert_notice_names_both_values() {
        let mut out = Vec::new();
        render_notice(&mut out, 80.0, 50.0, &MeterColors::none()).expect("render failed");
        assert!(out.ends_with(b"\n"));
        let line = plain(&out);
        assert!(line.contains("loud: level 80.00 crossed 50.00"));
    }

    #[test]
    fn meter_view_renders_through_the_sink_trait() {
        let mut view = MeterView::new(Vec::new(), plain_options());
        view.render(&[25.0, 50.0], 50.0, 50.0, 25.0)
            .expect("render failed");
        view.alert_notice(75.0).expect("notice failed");
        let text = plain(&view.into_inner());
        assert!(text.contains("50.00"));
        assert!(text.contains("loud: level 75.00"));
    }

    #[test]
    fn detected_width_stays_in_bounds() {
        let width = detect_width();
        assert!((16..=60).contains(&width));
    }
}
