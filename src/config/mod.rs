//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::{Parser, ValueEnum};

pub use defaults::{
    DEFAULT_ALERT_HZ, DEFAULT_ALERT_MS, DEFAULT_BUFFER_SIZE, DEFAULT_CHANNELS,
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_COOLDOWN_SECS, DEFAULT_GAIN, DEFAULT_REFRESH_EVERY,
    DEFAULT_SAMPLE_RATE, DEFAULT_THRESHOLD, DEFAULT_WINDOW,
};

/// CLI options for the noisewatch monitor. Validated values keep the audio
/// layer inside safe operating ranges.
#[derive(Debug, Parser, Clone)]
#[command(about = "Terminal audio loudness monitor", author, version)]
pub struct AppConfig {
    /// Preferred audio input device name
    #[arg(long = "input-device")]
    pub input_device: Option<String>,

    /// Output device for the alert tone and echo stream
    #[arg(long = "output-device")]
    pub output_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-devices", default_value_t = false)]
    pub list_devices: bool,

    /// Samples per analysis buffer
    #[arg(long = "buffer-size", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Capture sample rate (Hz)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Capture channel count (downmixed to mono for analysis)
    #[arg(long, default_value_t = DEFAULT_CHANNELS)]
    pub channels: u16,

    /// Linear gain applied before analysis, clamped to the sample range
    #[arg(long, default_value_t = DEFAULT_GAIN)]
    pub gain: f32,

    /// Loudness scale used for the threshold and the meter
    #[arg(long, value_enum, default_value_t = ScaleMode::Rms)]
    pub scale: ScaleMode,

    /// Alert threshold in the active scale
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Minimum seconds between audible alerts
    #[arg(long = "cooldown-secs", default_value_t = DEFAULT_COOLDOWN_SECS)]
    pub cooldown_secs: f32,

    /// Rolling window capacity (buffers)
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Redraw the meter every N buffers
    #[arg(long = "refresh-every", default_value_t = DEFAULT_REFRESH_EVERY)]
    pub refresh_every: u64,

    /// Capture queue depth between the stream callback and the monitor
    #[arg(long = "channel-capacity", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Alert tone frequency (Hz)
    #[arg(long = "alert-hz", default_value_t = DEFAULT_ALERT_HZ)]
    pub alert_hz: f32,

    /// Alert tone duration (milliseconds)
    #[arg(long = "alert-ms", default_value_t = DEFAULT_ALERT_MS)]
    pub alert_ms: u64,

    /// Disable the audible alert
    #[arg(long = "no-alert", default_value_t = false)]
    pub no_alert: bool,

    /// Echo gained capture audio to the output device
    #[arg(long, default_value_t = false)]
    pub echo: bool,

    /// Disable the meter line
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Disable ANSI colors in the meter
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Print the run summary as JSON
    #[arg(long = "summary-json", default_value_t = false)]
    pub summary_json: bool,

    /// Stop after this many seconds (0 = run until interrupted)
    #[arg(long = "max-secs", default_value_t = 0)]
    pub max_secs: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "NOISEWATCH_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "NOISEWATCH_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,
}

/// Tunable parameters for the capture + analysis pipeline.
#[derive(Debug, Clone)]
pub struct MonitorParams {
    pub buffer_size: usize,
    pub sample_rate: u32,
    pub channels: u16,
    pub gain: f32,
    pub scale: ScaleMode,
    pub threshold: f32,
    pub cooldown_secs: f32,
    pub window: usize,
    pub refresh_every: u64,
    pub channel_capacity: usize,
    pub max_secs: u64,
}

/// Loudness scales the estimator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScaleMode {
    /// Linear root-mean-square of the sample values
    Rms,
    /// 20 * log10(rms); undefined for silence
    Db,
}

impl ScaleMode {
    pub fn label(self) -> &'static str {
        match self {
            ScaleMode::Rms => "rms",
            ScaleMode::Db => "db",
        }
    }
}
