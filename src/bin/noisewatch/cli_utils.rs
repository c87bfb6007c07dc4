use anyhow::Result;
use noisewatch::audio::InputSource;

/// Split a comma-separated device override into names.
pub(crate) fn devices_from_override(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

pub(crate) fn list_input_devices() -> Result<()> {
    // Support NOISEWATCH_TEST_DEVICES for testing
    let devices = if let Ok(raw) = std::env::var("NOISEWATCH_TEST_DEVICES") {
        devices_from_override(&raw)
    } else {
        InputSource::list_devices().unwrap_or_else(|err| {
            eprintln!("Failed to list audio input devices: {err}");
            Vec::new()
        })
    };

    if devices.is_empty() {
        println!("No audio input devices detected.");
    } else {
        println!("Available audio input devices:");
        for name in devices {
            println!("  - {name}");
        }
    }
    Ok(())
}
