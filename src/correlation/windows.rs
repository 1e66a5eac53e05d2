//! Fixed-length partitioning of the time axis.
use crate::config::errors::{ConfigError, ConfigResult};

/// One contiguous window of the time axis, `[start, end)` with
/// `end - start == time_slice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl TimeWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits a time axis of length T into `floor(T / time_slice)` windows of
/// exactly `time_slice` samples each, in increasing order. The trailing
/// remainder shorter than `time_slice` is discarded: a truncated window
/// would bias per-window statistics against the full-length ones.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowSplitter {
    time_slice: usize,
}

impl TimeWindowSplitter {
    /// # Errors
    /// [`ConfigError::InvalidTimeSlice`] when `time_slice == 0`; the
    /// per-axis bound is checked in [`TimeWindowSplitter::split`], where
    /// the axis length is known.
    pub fn new(time_slice: usize) -> ConfigResult<Self> {
        if time_slice == 0 {
            return Err(ConfigError::InvalidTimeSlice { time_slice, nt: 0 });
        }
        Ok(TimeWindowSplitter { time_slice })
    }

    pub fn time_slice(&self) -> usize {
        self.time_slice
    }

    /// Partition an axis of length `nt`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidTimeSlice`] when `time_slice > nt`: not even
    /// one full window fits, so the run cannot produce any statistics.
    pub fn split(&self, nt: usize) -> ConfigResult<Vec<TimeWindow>> {
        if self.time_slice > nt {
            return Err(ConfigError::InvalidTimeSlice { time_slice: self.time_slice, nt });
        }
        Ok((0..nt / self.time_slice)
            .map(|index| TimeWindow {
                index,
                start: index * self.time_slice,
                end: (index + 1) * self.time_slice,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // T = 27, time_slice = 9: exactly [0,9), [9,18), [18,27).
    fn split_covers_exact_multiple() {
        let windows = TimeWindowSplitter::new(9).unwrap().split(27).unwrap();
        assert_eq!(windows.len(), 3);
        for (i, w) in windows.iter().enumerate() {
            assert_eq!(w.index, i);
            assert_eq!(w.start, 9 * i);
            assert_eq!(w.end, 9 * (i + 1));
            assert_eq!(w.len(), 9);
        }
    }

    #[test]
    // T = 10, time_slice = 9: one window [0,9); sample 9 is discarded.
    fn split_discards_short_remainder() {
        let windows = TimeWindowSplitter::new(9).unwrap().split(10).unwrap();
        assert_eq!(windows, vec![TimeWindow { index: 0, start: 0, end: 9 }]);
    }

    #[test]
    fn zero_and_oversized_slices_are_rejected() {
        assert!(matches!(
            TimeWindowSplitter::new(0),
            Err(ConfigError::InvalidTimeSlice { time_slice: 0, .. })
        ));
        assert!(matches!(
            TimeWindowSplitter::new(9).unwrap().split(8),
            Err(ConfigError::InvalidTimeSlice { time_slice: 9, nt: 8 })
        ));
    }
}
