use super::defaults::{
    MAX_ALERT_HZ, MAX_ALERT_MS, MAX_BUFFER_SIZE, MAX_CHANNELS, MAX_CHANNEL_CAPACITY,
    MAX_COOLDOWN_SECS, MAX_DEVICE_NAME_LEN, MAX_GAIN, MAX_SAMPLE_RATE, MAX_WINDOW, MIN_ALERT_HZ,
    MIN_ALERT_MS, MIN_BUFFER_SIZE, MIN_CHANNEL_CAPACITY, MIN_SAMPLE_RATE,
};
use super::{AppConfig, MonitorParams};
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before anything touches an audio device.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&self.buffer_size) {
            bail!(
                "--buffer-size must be between {MIN_BUFFER_SIZE} and {MAX_BUFFER_SIZE} samples, got {}",
                self.buffer_size
            );
        }
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz, got {}",
                self.sample_rate
            );
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            bail!(
                "--channels must be between 1 and {MAX_CHANNELS}, got {}",
                self.channels
            );
        }
        if !self.gain.is_finite() || self.gain <= 0.0 || self.gain > MAX_GAIN {
            bail!(
                "--gain must be a finite value in (0, {MAX_GAIN}], got {}",
                self.gain
            );
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            bail!(
                "--threshold must be a finite non-negative value, got {}",
                self.threshold
            );
        }
        if !self.cooldown_secs.is_finite()
            || self.cooldown_secs < 0.0
            || self.cooldown_secs > MAX_COOLDOWN_SECS
        {
            bail!(
                "--cooldown-secs must be between 0 and {MAX_COOLDOWN_SECS} seconds, got {}",
                self.cooldown_secs
            );
        }
        if self.window == 0 || self.window > MAX_WINDOW {
            bail!(
                "--window must be between 1 and {MAX_WINDOW}, got {}",
                self.window
            );
        }
        if self.refresh_every == 0 {
            bail!("--refresh-every must be at least 1");
        }
        if !(MIN_CHANNEL_CAPACITY..=MAX_CHANNEL_CAPACITY).contains(&self.channel_capacity) {
            bail!(
                "--channel-capacity must be between {MIN_CHANNEL_CAPACITY} and {MAX_CHANNEL_CAPACITY}, got {}",
                self.channel_capacity
            );
        }
        if !(MIN_ALERT_HZ..=MAX_ALERT_HZ).contains(&self.alert_hz) {
            bail!(
                "--alert-hz must be between {MIN_ALERT_HZ} and {MAX_ALERT_HZ} Hz, got {}",
                self.alert_hz
            );
        }
        if !(MIN_ALERT_MS..=MAX_ALERT_MS).contains(&self.alert_ms) {
            bail!(
                "--alert-ms must be between {MIN_ALERT_MS} and {MAX_ALERT_MS} ms, got {}",
                self.alert_ms
            );
        }

        if let Some(device) = &mut self.input_device {
            *device = sanitize_device_name(device, "--input-device")?;
        }
        if let Some(device) = &mut self.output_device {
            *device = sanitize_device_name(device, "--output-device")?;
        }

        Ok(())
    }

    /// Snapshot the CLI-controlled pipeline settings for downstream consumers.
    pub fn monitor_params(&self) -> MonitorParams {
        MonitorParams {
            buffer_size: self.buffer_size,
            sample_rate: self.sample_rate,
            channels: self.channels,
            gain: self.gain,
            scale: self.scale,
            threshold: self.threshold,
            cooldown_secs: self.cooldown_secs,
            window: self.window,
            refresh_every: self.refresh_every,
            channel_capacity: self.channel_capacity,
            max_secs: self.max_secs,
        }
    }
}

/// Device names travel into OS audio APIs; keep them short and printable.
pub(super) fn sanitize_device_name(value: &str, flag: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    if trimmed.len() > MAX_DEVICE_NAME_LEN {
        bail!("{flag} must be at most {MAX_DEVICE_NAME_LEN} characters");
    }
    if trimmed.chars().any(|ch| ch.is_control()) {
        bail!("{flag} must not contain control characters");
    }
    Ok(trimmed.to_string())
}
