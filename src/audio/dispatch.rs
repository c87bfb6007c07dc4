use crossbeam_channel::{Sender, TrySendError};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Downmix multi-channel input to mono while applying the provided converter
/// so the analysis loop sees a single channel regardless of the device layout.
pub(super) fn append_downmixed<T, F>(
    buf: &mut Vec<i16>,
    data: &[T],
    channels: usize,
    mut convert: F,
) where
    T: Copy,
    F: FnMut(T) -> i16,
{
    if channels <= 1 {
        buf.extend(data.iter().copied().map(&mut convert));
        return;
    }

    // Average each interleaved frame to produce a mono sample. The i32
    // accumulator holds up to 32 channels of full-scale i16 without overflow.
    let mut acc = 0i32;
    let mut count = 0usize;
    for sample in data.iter().copied() {
        acc += i32::from(convert(sample));
        count += 1;
        if count == channels {
            buf.push((acc / channels as i32) as i16);
            acc = 0;
            count = 0;
        }
    }
    if count > 0 {
        buf.push((acc / count as i32) as i16);
    }
}

/// Callback-side buffering: slices the incoming sample flow into exact
/// analysis-sized chunks and hands them to the monitor thread without ever
/// blocking. A full channel drops the chunk and counts it as an overrun.
pub(super) struct BufferDispatcher {
    buffer_samples: usize,
    pending: Vec<i16>,
    scratch: Vec<i16>,
    sender: Sender<Vec<i16>>,
    dropped: Arc<AtomicUsize>,
}

impl BufferDispatcher {
    pub(super) fn new(
        buffer_samples: usize,
        sender: Sender<Vec<i16>>,
        dropped: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            buffer_samples: buffer_samples.max(1),
            pending: Vec::with_capacity(buffer_samples),
            scratch: Vec::new(),
            sender,
            dropped,
        }
    }

    pub(super) fn push<T, F>(&mut self, data: &[T], channels: usize, convert: F)
    where
        T: Copy,
        F: FnMut(T) -> i16,
    {
        self.scratch.clear();
        append_downmixed(&mut self.scratch, data, channels, convert);
        self.pending.extend_from_slice(&self.scratch);

        while self.pending.len() >= self.buffer_samples {
            let buffer: Vec<i16> = self.pending.drain(..self.buffer_samples).collect();
            if let Err(err) = self.sender.try_send(buffer) {
                match err {
                    TrySendError::Full(_) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                    TrySendError::Disconnected(_) => break,
                }
            }
        }
    }
}
