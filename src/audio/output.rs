//! Playback-side collaborators: the alert tone and the optional echo stream.

use crate::log_debug;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TONE_AMPLITUDE: f32 = 0.4;

/// Audible alert: a fixed sine tone on the playback device.
///
/// `play` is fire-and-forget. The tone thread resolves its own device handle,
/// so a slow or missing output device can never stall the monitor loop, and
/// overlapping alerts are just independent threads. Failures are logged and
/// swallowed.
#[derive(Debug, Clone)]
pub struct ToneAlert {
    device: Option<String>,
    frequency_hz: f32,
    duration: Duration,
}

impl ToneAlert {
    pub fn new(device: Option<String>, frequency_hz: f32, duration: Duration) -> Self {
        Self {
            device,
            frequency_hz,
            duration,
        }
    }

    pub fn play(&self) {
        let device = self.device.clone();
        let frequency_hz = self.frequency_hz;
        let duration = self.duration;
        thread::spawn(move || {
            if let Err(err) = play_tone(device.as_deref(), frequency_hz, duration) {
                log_debug(&format!("alert_error: {err}"));
            }
        });
    }
}

fn play_tone(preferred_device: Option<&str>, frequency_hz: f32, duration: Duration) -> Result<()> {
    let device = resolve_output_device(preferred_device)?;
    let default_config = device
        .default_output_config()
        .context("no default output config")?;
    let format = default_config.sample_format();
    let config: StreamConfig = default_config.into();
    let channels = usize::from(config.channels.max(1));
    let step = frequency_hz / config.sample_rate.0 as f32;

    let err_fn = |err| log_debug(&format!("alert_stream_error: {err}"));
    let stream = match format {
        SampleFormat::F32 => {
            let mut phase = 0.0f32;
            device.build_output_stream(
                &config,
                move |data: &mut [f32], _| fill_tone(data, channels, step, &mut phase, |v| v),
                err_fn,
                None,
            )?
        }
        SampleFormat::I16 => {
            let mut phase = 0.0f32;
            device.build_output_stream(
                &config,
                move |data: &mut [i16], _| {
                    fill_tone(data, channels, step, &mut phase, |v| (v * 32_767.0) as i16)
                },
                err_fn,
                None,
            )?
        }
        SampleFormat::U16 => {
            let mut phase = 0.0f32;
            device.build_output_stream(
                &config,
                move |data: &mut [u16], _| {
                    fill_tone(data, channels, step, &mut phase, |v| {
                        ((v * 0.5 + 0.5) * f32::from(u16::MAX)) as u16
                    })
                },
                err_fn,
                None,
            )?
        }
        other => return Err(anyhow!("unsupported sample format: {other:?}")),
    };

    stream.play().context("failed to start alert stream")?;
    thread::sleep(duration);
    if let Err(err) = stream.pause() {
        log_debug(&format!("failed to pause alert stream: {err}"));
    }
    Ok(())
}

/// Write one sine value per frame, duplicated across the device channels.
/// Phase stays in [0, 1) across callbacks so the tone is continuous.
pub(super) fn fill_tone<T, F>(
    data: &mut [T],
    channels: usize,
    step: f32,
    phase: &mut f32,
    mut convert: F,
) where
    T: Copy,
    F: FnMut(f32) -> T,
{
    for frame in data.chunks_mut(channels.max(1)) {
        let value = (*phase * std::f32::consts::TAU).sin() * TONE_AMPLITUDE;
        *phase = (*phase + step) % 1.0;
        let sample = convert(value);
        for slot in frame.iter_mut() {
            *slot = sample;
        }
    }
}

/// Loops gained capture buffers back out to the playback device.
///
/// Writes are non-blocking; a saturated queue drops the buffer and counts it.
/// The output callback zero-fills once the queue runs dry, so starvation
/// plays silence instead of stale samples.
pub struct EchoSink {
    sender: Sender<Vec<i16>>,
    dropped: Arc<AtomicUsize>,
    _stream: Option<cpal::Stream>,
}

impl EchoSink {
    /// Open the playback stream at the capture rate. Failure here is fatal to
    /// echo mode; the caller decides whether to run without it.
    pub fn open(
        preferred_device: Option<&str>,
        sample_rate: u32,
        queue_depth: usize,
    ) -> Result<Self> {
        let device = resolve_output_device(preferred_device)?;
        let device_name = device
            .name()
            .unwrap_or_else(|_| "unknown output device".to_string());
        let default_config = device
            .default_output_config()
            .with_context(|| format!("no output config for '{device_name}'"))?;
        let format = default_config.sample_format();
        let channels = usize::from(default_config.channels().max(1));
        let config = StreamConfig {
            channels: default_config.channels().max(1),
            sample_rate: SampleRate(sample_rate),
            buffer_size: BufferSize::Default,
        };

        let (sender, receiver) = bounded::<Vec<i16>>(queue_depth.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut pending: VecDeque<i16> = VecDeque::new();

        let err_fn = |err| log_debug(&format!("echo_stream_error: {err}"));
        let stream = match format {
            SampleFormat::I16 => device.build_output_stream(
                &config,
                move |data: &mut [i16], _| {
                    fill_from_pending(data, channels, &mut pending, &receiver, |s| s)
                },
                err_fn,
                None,
            )?,
            SampleFormat::F32 => device.build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    fill_from_pending(data, channels, &mut pending, &receiver, |s| {
                        f32::from(s) / 32_768.0
                    })
                },
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_output_stream(
                &config,
                move |data: &mut [u16], _| {
                    fill_from_pending(data, channels, &mut pending, &receiver, |s| {
                        (i32::from(s) + 32_768) as u16
                    })
                },
                err_fn,
                None,
            )?,
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        stream
            .play()
            .with_context(|| format!("failed to start echo on '{device_name}'"))?;

        Ok(Self {
            sender,
            dropped,
            _stream: Some(stream),
        })
    }

    /// Queue one buffer; drops it if the device is not keeping up.
    pub fn write(&self, buffer: Vec<i16>) {
        if let Err(err) = self.sender.try_send(buffer) {
            match err {
                TrySendError::Full(_) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                TrySendError::Disconnected(_) => {}
            }
        }
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(super) fn for_tests(sender: Sender<Vec<i16>>, dropped: Arc<AtomicUsize>) -> Self {
        Self {
            sender,
            dropped,
            _stream: None,
        }
    }
}

/// Drain queued capture buffers into one output callback, duplicating the
/// mono feed across channels and zero-filling when the queue is empty.
pub(super) fn fill_from_pending<T, F>(
    data: &mut [T],
    channels: usize,
    pending: &mut VecDeque<i16>,
    receiver: &Receiver<Vec<i16>>,
    mut convert: F,
) where
    T: Copy,
    F: FnMut(i16) -> T,
{
    for frame in data.chunks_mut(channels.max(1)) {
        if pending.is_empty() {
            if let Ok(buffer) = receiver.try_recv() {
                pending.extend(buffer);
            }
        }
        let sample = convert(pending.pop_front().unwrap_or(0));
        for slot in frame.iter_mut() {
            *slot = sample;
        }
    }
}

fn resolve_output_device(preferred: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match preferred {
        Some(name) => {
            let mut devices = host
                .output_devices()
                .context("no output devices available")?;
            devices
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| anyhow!("output device '{name}' not found"))
        }
        None => host
            .default_output_device()
            .context("no default output device available"),
    }
}
