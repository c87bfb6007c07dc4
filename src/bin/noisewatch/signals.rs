use anyhow::{anyhow, Result};
use noisewatch::log_debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag set by the SIGINT handler to request a clean shutdown.
static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Signal handler for Ctrl+C.
///
/// Sets a flag that the monitor loop checks between buffers. Only uses
/// atomic operations (async-signal-safe).
extern "C" fn handle_sigint(_: libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

pub(crate) fn install_sigint_handler() -> Result<()> {
    unsafe {
        // SAFETY: handle_sigint is an extern "C" signal handler with no side effects
        // beyond flipping an atomic flag, which is async-signal-safe.
        let handler = handle_sigint as *const () as libc::sighandler_t;
        if libc::signal(libc::SIGINT, handler) == libc::SIG_ERR {
            log_debug("failed to install SIGINT handler");
            return Err(anyhow!("failed to install SIGINT handler"));
        }
    }
    Ok(())
}

/// Shared stop flag for the monitor loop.
pub(crate) fn stop_flag() -> &'static AtomicBool {
    &STOP_REQUESTED
}
