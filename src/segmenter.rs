// Audio segmentation: tile the full duration into bounded windows.

use serde::{Deserialize, Serialize};

/// A half-open time slice `[start, end)` of the input audio, processed as
/// one transcription/diarization unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Split `total_duration` seconds into `ceil(total_duration / max_window)`
/// contiguous, non-overlapping windows. Every window is `max_window` long
/// except possibly the last, which absorbs the remainder.
///
/// Pure function; both arguments must be positive.
pub fn segment(total_duration: f64, max_window: f64) -> Vec<Window> {
    debug_assert!(total_duration > 0.0, "total_duration must be positive");
    debug_assert!(max_window > 0.0, "max_window must be positive");

    let count = ((total_duration / max_window).ceil() as usize).max(1);
    let mut windows = Vec::with_capacity(count);
    for index in 0..count {
        let start = index as f64 * max_window;
        let end = if index + 1 == count {
            total_duration
        } else {
            start + max_window
        };
        windows.push(Window { index, start, end });
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(windows: &[Window], total: f64) {
        assert_eq!(windows[0].start, 0.0);
        assert!((windows[windows.len() - 1].end - total).abs() < 1e-9);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn test_window_count_and_tiling() {
        for &(total, max) in &[(130.0, 60.0), (120.0, 60.0), (59.9, 60.0), (600.5, 30.0)] {
            let windows = segment(total, max);
            assert_eq!(windows.len(), (total / max).ceil() as usize);
            assert_tiles(&windows, total);
            for w in &windows[..windows.len() - 1] {
                assert!((w.duration() - max).abs() < 1e-9);
            }
            assert!(windows[windows.len() - 1].duration() <= max + 1e-9);
        }
    }

    #[test]
    fn test_single_window_when_short() {
        let windows = segment(45.0, 60.0);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0], Window { index: 0, start: 0.0, end: 45.0 });
    }

    #[test]
    fn test_exact_multiple() {
        let windows = segment(120.0, 60.0);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].end, 120.0);
        assert_eq!(windows[1].duration(), 60.0);
    }

    #[test]
    fn test_spec_example_three_windows() {
        let windows = segment(130.0, 60.0);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].start, 120.0);
        assert_eq!(windows[2].end, 130.0);
    }
}
