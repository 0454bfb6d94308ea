//! Exponential moving averages of search metrics.
use std::collections::VecDeque;

/// Compares the average of recent samples with a long term exponential moving average.
///
/// The first `recent` samples only fill the window. Their mean seeds the long term average, which
/// is then updated with every further sample.
pub struct EmaTracker {
    window: VecDeque<f64>,
    recent: usize,
    window_sum: f64,
    ema: Option<f64>,
    decay: f64,
}

impl EmaTracker {
    pub fn new(recent: usize, decay: f64) -> EmaTracker {
        debug_assert!(recent > 0);
        EmaTracker {
            window: VecDeque::with_capacity(recent),
            recent,
            window_sum: 0.0,
            ema: None,
            decay,
        }
    }

    pub fn push(&mut self, sample: f64) {
        if self.window.len() == self.recent {
            if let Some(old) = self.window.pop_front() {
                self.window_sum -= old;
            }
        }
        self.window.push_back(sample);
        self.window_sum += sample;

        match self.ema {
            Some(ref mut ema) => *ema = self.decay * *ema + (1.0 - self.decay) * sample,
            None if self.window.len() == self.recent => {
                self.ema = Some(self.window_sum / self.recent as f64)
            }
            None => (),
        }
    }

    /// Mean of the recent window divided by the long term average.
    ///
    /// `None` until the long term average is seeded and the window is full.
    pub fn ratio(&self) -> Option<f64> {
        let ema = self.ema?;
        if self.window.len() < self.recent || ema == 0.0 {
            return None;
        }
        Some(self.window_sum / self.recent as f64 / ema)
    }

    /// Drop the recent samples, keeping the long term average.
    pub fn clear_recent(&mut self) {
        self.window.clear();
        self.window_sum = 0.0;
    }
}
