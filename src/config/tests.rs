use super::defaults::{
    MAX_ALERT_MS, MAX_BUFFER_SIZE, MAX_CHANNEL_CAPACITY, MAX_DEVICE_NAME_LEN, MAX_WINDOW,
};
use super::validation::sanitize_device_name;
use super::{AppConfig, ScaleMode};
use clap::Parser;

#[test]
fn accepts_valid_defaults() {
    let mut cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_buffer_size_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--buffer-size", "63"]);
    assert!(cfg.validate().is_err());

    let too_big = (MAX_BUFFER_SIZE + 1).to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--buffer-size", &too_big]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_buffer_size_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--buffer-size", "64"]);
    assert!(cfg.validate().is_ok());

    let max = MAX_BUFFER_SIZE.to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--buffer-size", &max]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_sample_rate_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--sample-rate", "7999"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--sample-rate", "192001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_sample_rate_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--sample-rate", "8000"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--sample-rate", "192000"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_channels_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--channels", "0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--channels", "33"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_channels_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--channels", "1"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--channels", "32"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_non_positive_gain() {
    let mut cfg = AppConfig::parse_from(["test-app", "--gain", "0.0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--gain=-1.0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_gain_above_max() {
    let mut cfg = AppConfig::parse_from(["test-app", "--gain", "64.1"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_nan_gain() {
    let mut cfg = AppConfig::parse_from(["test-app", "--gain", "NaN"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_gain_at_max() {
    let mut cfg = AppConfig::parse_from(["test-app", "--gain", "64.0"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_negative_threshold() {
    let mut cfg = AppConfig::parse_from(["test-app", "--threshold=-0.1"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_nan_threshold() {
    let mut cfg = AppConfig::parse_from(["test-app", "--threshold", "NaN"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_zero_threshold() {
    let mut cfg = AppConfig::parse_from(["test-app", "--threshold", "0.0"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_cooldown_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--cooldown-secs=-1.0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--cooldown-secs", "3600.1"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_cooldown_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--cooldown-secs", "0.0"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--cooldown-secs", "3600.0"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_window_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--window", "0"]);
    assert!(cfg.validate().is_err());

    let too_big = (MAX_WINDOW + 1).to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--window", &too_big]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_window_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--window", "1"]);
    assert!(cfg.validate().is_ok());

    let max = MAX_WINDOW.to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--window", &max]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_zero_refresh_interval() {
    let mut cfg = AppConfig::parse_from(["test-app", "--refresh-every", "0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_channel_capacity_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--channel-capacity", "3"]);
    assert!(cfg.validate().is_err());

    let too_big = (MAX_CHANNEL_CAPACITY + 1).to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--channel-capacity", &too_big]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_channel_capacity_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--channel-capacity", "4"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--channel-capacity", "1024"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_alert_hz_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-hz", "19.9"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-hz", "20001.0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_alert_hz_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-hz", "20.0"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-hz", "20000.0"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_alert_ms_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-ms", "9"]);
    assert!(cfg.validate().is_err());

    let too_big = (MAX_ALERT_MS + 1).to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-ms", &too_big]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_alert_ms_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-ms", "10"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--alert-ms", "10000"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_blank_input_device() {
    let mut cfg = AppConfig::parse_from(["test-app", "--input-device", "   "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_device_name_over_max_length() {
    let long_name = "a".repeat(MAX_DEVICE_NAME_LEN + 1);
    let mut cfg = AppConfig::parse_from(["test-app", "--output-device", &long_name]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_device_name_at_max_length() {
    let name = "a".repeat(MAX_DEVICE_NAME_LEN);
    let mut cfg = AppConfig::parse_from(["test-app", "--output-device", &name]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_device_name_with_control_characters() {
    let mut cfg = AppConfig::parse_from(["test-app", "--input-device", "mic\nname"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_trims_device_names() {
    let mut cfg = AppConfig::parse_from(["test-app", "--input-device", "  USB Mic  "]);
    cfg.validate().expect("padded device name should be valid");
    assert_eq!(cfg.input_device.as_deref(), Some("USB Mic"));
}

#[test]
fn sanitize_device_name_rejects_empty() {
    assert!(sanitize_device_name("   ", "--input-device").is_err());
}

#[test]
fn sanitize_device_name_keeps_interior_spaces() {
    let name = sanitize_device_name("Built-in Microphone", "--input-device").unwrap();
    assert_eq!(name, "Built-in Microphone");
}

#[test]
fn scale_labels_are_stable() {
    assert_eq!(ScaleMode::Rms.label(), "rms");
    assert_eq!(ScaleMode::Db.label(), "db");
}

#[test]
fn scale_flag_round_trips_into_monitor_params() {
    let mut cfg = AppConfig::parse_from(["test-app", "--scale", "db"]);
    cfg.validate().expect("db scale should be valid");
    assert_eq!(cfg.monitor_params().scale, ScaleMode::Db);
}

#[test]
fn monitor_params_copies_cli_values() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "--buffer-size",
        "2048",
        "--sample-rate",
        "22050",
        "--channels",
        "2",
        "--gain",
        "2.0",
        "--threshold",
        "65.5",
        "--cooldown-secs",
        "1.5",
        "--window",
        "12",
        "--refresh-every",
        "6",
        "--max-secs",
        "30",
    ]);
    cfg.validate().expect("values should be valid");
    let params = cfg.monitor_params();
    assert_eq!(params.buffer_size, 2048);
    assert_eq!(params.sample_rate, 22_050);
    assert_eq!(params.channels, 2);
    assert_eq!(params.gain, 2.0);
    assert_eq!(params.threshold, 65.5);
    assert_eq!(params.cooldown_secs, 1.5);
    assert_eq!(params.window, 12);
    assert_eq!(params.refresh_every, 6);
    assert_eq!(params.max_secs, 30);
}
