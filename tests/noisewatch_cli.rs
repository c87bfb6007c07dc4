use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn noisewatch_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_noisewatch").expect("noisewatch test binary not built")
}

#[test]
fn noisewatch_help_mentions_the_monitor() {
    let output = Command::new(noisewatch_bin())
        .arg("--help")
        .output()
        .expect("run noisewatch --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("loudness monitor"));
    assert!(combined.contains("--threshold"));
    assert!(combined.contains("--list-devices"));
}

#[test]
fn noisewatch_list_devices_prints_the_override() {
    let output = Command::new(noisewatch_bin())
        .arg("--list-devices")
        .env("NOISEWATCH_TEST_DEVICES", "Mic A,Mic B")
        .output()
        .expect("run noisewatch --list-devices");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("Available audio input devices:"));
    assert!(combined.contains("  - Mic A"));
    assert!(combined.contains("  - Mic B"));
}

#[test]
fn noisewatch_list_devices_reports_an_empty_override() {
    let output = Command::new(noisewatch_bin())
        .arg("--list-devices")
        .env("NOISEWATCH_TEST_DEVICES", " ")
        .output()
        .expect("run noisewatch --list-devices");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("No audio input devices detected."));
}

#[test]
fn noisewatch_rejects_an_invalid_buffer_size() {
    let output = Command::new(noisewatch_bin())
        .args(["--buffer-size", "0"])
        .output()
        .expect("run noisewatch --buffer-size 0");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("--buffer-size must be between"));
}
