//! Default values and validation bounds for the CLI surface.

pub const DEFAULT_BUFFER_SIZE: usize = 1024;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_CHANNELS: u16 = 1;
pub const DEFAULT_GAIN: f32 = 1.0;
pub const DEFAULT_THRESHOLD: f32 = 50.0;
pub const DEFAULT_COOLDOWN_SECS: f32 = 3.0;
pub const DEFAULT_WINDOW: usize = 24;
pub const DEFAULT_REFRESH_EVERY: u64 = 24;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;
pub const DEFAULT_ALERT_HZ: f32 = 880.0;
pub const DEFAULT_ALERT_MS: u64 = 500;

pub const MIN_BUFFER_SIZE: usize = 64;
pub const MAX_BUFFER_SIZE: usize = 262_144;
pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;
pub const MAX_CHANNELS: u16 = 32;
pub const MAX_GAIN: f32 = 64.0;
pub const MAX_COOLDOWN_SECS: f32 = 3_600.0;
pub const MAX_WINDOW: usize = 4_096;
pub const MIN_CHANNEL_CAPACITY: usize = 4;
pub const MAX_CHANNEL_CAPACITY: usize = 1_024;
pub const MIN_ALERT_HZ: f32 = 20.0;
pub const MAX_ALERT_HZ: f32 = 20_000.0;
pub const MIN_ALERT_MS: u64 = 10;
pub const MAX_ALERT_MS: u64 = 10_000;
pub const MAX_DEVICE_NAME_LEN: usize = 256;
