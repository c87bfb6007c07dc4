//! Bounded history of recent loudness values.

use std::collections::VecDeque;

/// FIFO window over the last N levels, oldest evicted first.
///
/// Single-writer: the monitor loop pushes, the display reads copied
/// snapshots. Max and min report 0 while the window is empty so the first
/// render before any sample arrives has something to draw.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f32>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().reduce(f32::max).unwrap_or(0.0)
    }

    pub fn min(&self) -> f32 {
        self.values.iter().copied().reduce(f32::min).unwrap_or(0.0)
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<f32> {
        self.values.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
