//! Capture-side device plumbing via CPAL.
//!
//! Opens the input device at the configured rate and channel count, converts
//! whatever sample format the device speaks into i16, and feeds fixed-size
//! buffers to the monitor thread over a bounded channel.

use super::dispatch::BufferDispatcher;
use crate::config::MonitorParams;
use crate::log_debug;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig};
use crossbeam_channel::{bounded, Receiver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An open, playing capture stream and the receiving end of its buffer feed.
///
/// Dropping the source tears the stream down; call `pause` first so shutdown
/// is logged rather than silent.
pub struct InputSource {
    stream: cpal::Stream,
    receiver: Receiver<Vec<i16>>,
    dropped: Arc<AtomicUsize>,
    failure: Arc<Mutex<Option<String>>>,
    device_name: String,
}

impl InputSource {
    /// List input device names so the CLI can expose a selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Open the named device (or the default) and start capturing.
    ///
    /// The stream is requested at the configured rate and channel count; a
    /// device that rejects the config is a fatal error, surfaced here rather
    /// than as silence later.
    pub fn open(params: &MonitorParams, preferred_device: Option<&str>) -> Result<Self> {
        let device = resolve_input_device(preferred_device)?;
        let device_name = device
            .name()
            .unwrap_or_else(|_| "unknown input device".to_string());
        let format = device
            .default_input_config()
            .with_context(|| format!("no input config for '{device_name}'"))?
            .sample_format();
        let config = StreamConfig {
            channels: params.channels.max(1),
            sample_rate: SampleRate(params.sample_rate),
            buffer_size: BufferSize::Default,
        };
        let channels = usize::from(params.channels.max(1));

        log_debug(&format!(
            "capture config: device='{device_name}' format={format:?} rate={}Hz channels={channels} buffer={}",
            params.sample_rate, params.buffer_size
        ));

        let (sender, receiver) = bounded::<Vec<i16>>(params.channel_capacity.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let dispatcher = Arc::new(Mutex::new(BufferDispatcher::new(
            params.buffer_size,
            sender,
            dropped.clone(),
        )));

        let failure = Arc::new(Mutex::new(None));
        // The callback must never block: a contended dispatcher lock counts
        // the delivery as lost instead of waiting.
        let stream = match format {
            SampleFormat::I16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    stream_error_hook(&failure),
                    None,
                )?
            }
            SampleFormat::F32 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, f32_to_i16);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    stream_error_hook(&failure),
                    None,
                )?
            }
            SampleFormat::U16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[u16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, u16_to_i16);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    stream_error_hook(&failure),
                    None,
                )?
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        stream
            .play()
            .with_context(|| format!("failed to start capture on '{device_name}'"))?;

        Ok(Self {
            stream,
            receiver,
            dropped,
            failure,
            device_name,
        })
    }

    pub fn receiver(&self) -> &Receiver<Vec<i16>> {
        &self.receiver
    }

    /// Shared overrun counter, incremented by the callback side whenever a
    /// buffer had to be discarded.
    pub fn overruns(&self) -> &Arc<AtomicUsize> {
        &self.dropped
    }

    /// First stream error reported by the device, if any. The monitor loop
    /// treats a populated slot as fatal.
    pub fn failure(&self) -> &Arc<Mutex<Option<String>>> {
        &self.failure
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn pause(&self) {
        if let Err(err) = self.stream.pause() {
            log_debug(&format!("failed to pause capture stream: {err}"));
        }
    }
}

/// Error callback for a capture stream. Keeps the first failure so the
/// monitor loop can report why the device went away.
fn stream_error_hook(
    failure: &Arc<Mutex<Option<String>>>,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    let failure = failure.clone();
    move |err| {
        log_debug(&format!("capture_stream_error: {err}"));
        let mut slot = failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.get_or_insert_with(|| err.to_string());
    }
}

fn resolve_input_device(preferred: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match preferred {
        Some(name) => {
            let mut devices = host.input_devices().context("no input devices available")?;
            devices
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| anyhow!("input device '{name}' not found"))
        }
        None => host
            .default_input_device()
            .context("no default input device available"),
    }
}

/// Scale a float sample into the i16 range, saturating at the rails.
pub(super) fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32_767.0).clamp(-32_768.0, 32_767.0) as i16
}

/// Recenter an unsigned sample around the signed zero point.
pub(super) fn u16_to_i16(sample: u16) -> i16 {
    (i32::from(sample) - 32_768) as i16
}
