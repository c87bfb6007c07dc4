//! Per-buffer loudness estimation.
//!
//! One capture buffer of i16 samples in, one scalar level out: linear RMS by
//! default, optionally the decibel equivalent. An invalid value never leaves
//! this module; every failure mode is an explicit error variant.

use crate::config::ScaleMode;
use thiserror::Error;

/// Why a buffer produced no loudness value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("empty sample buffer")]
    EmptyBuffer,
    #[error("loudness computation produced an invalid value")]
    InvalidComputation,
    #[error("decibel level is undefined for silence")]
    SilenceUndefined,
}

/// Converts one sample buffer into a scalar loudness value.
///
/// Pure: the result depends only on the buffer and the configured gain and
/// scale. The same gain-and-clamp transform that feeds the analysis is what
/// the echo path forwards, so what you hear is what was measured.
#[derive(Debug, Clone, Copy)]
pub struct LevelEstimator {
    gain: f32,
    scale: ScaleMode,
}

impl LevelEstimator {
    pub fn new(gain: f32, scale: ScaleMode) -> Self {
        Self { gain, scale }
    }

    pub fn scale(&self) -> ScaleMode {
        self.scale
    }

    /// RMS (or dB) of one buffer.
    ///
    /// The sum of squares accumulates in f64; full-scale i16 squared times any
    /// practical buffer length stays well inside the mantissa.
    pub fn estimate(&self, buffer: &[i16]) -> Result<f32, LevelError> {
        if buffer.is_empty() {
            return Err(LevelError::EmptyBuffer);
        }
        let mut energy = 0.0f64;
        for &sample in buffer {
            let gained = f64::from(apply_gain(sample, self.gain));
            energy += gained * gained;
        }
        let mean_square = energy / buffer.len() as f64;
        if !mean_square.is_finite() || mean_square < 0.0 {
            return Err(LevelError::InvalidComputation);
        }
        let rms = mean_square.sqrt() as f32;
        match self.scale {
            ScaleMode::Rms => valid_level(rms),
            ScaleMode::Db => {
                if rms == 0.0 {
                    return Err(LevelError::SilenceUndefined);
                }
                valid_level(20.0 * rms.log10())
            }
        }
    }

    /// The gained samples exactly as the estimator saw them, for the echo path.
    pub fn gained(&self, buffer: &[i16]) -> Vec<i16> {
        buffer
            .iter()
            .map(|&sample| apply_gain(sample, self.gain))
            .collect()
    }
}

/// Apply a linear gain and clamp back into the i16 range, so a hot gain
/// saturates instead of wrapping.
pub(super) fn apply_gain(sample: i16, gain: f32) -> i16 {
    let scaled = f32::from(sample) * gain;
    scaled.clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

fn valid_level(value: f32) -> Result<f32, LevelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LevelError::InvalidComputation)
    }
}
