// Timeline stitching: shift window-local segments onto the global timeline.
//
// Windows are stitched strictly in increasing index order and appended to
// the transcript without a global re-sort; that is sound because the
// segmenter guarantees non-overlapping increasing windows and each window's
// segments are ordered locally before the offset is applied.

use std::cmp::Ordering;

use crate::segmenter::Window;
use crate::transcript::TranscriptSegment;

/// Offset one window's segments (and their words) by `window.start`.
///
/// Backends emit segments ordered by start time; a backend that does not is
/// stable-sorted here before the offset so the append-in-order invariant
/// holds.
pub fn stitch_window(window: &Window, mut segments: Vec<TranscriptSegment>) -> Vec<TranscriptSegment> {
    let ordered = segments
        .windows(2)
        .all(|pair| pair[0].start <= pair[1].start);
    if !ordered {
        segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
    }

    for segment in &mut segments {
        segment.start += window.start;
        segment.end += window.start;
        for word in &mut segment.words {
            word.start += window.start;
            word.end += window.start;
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Word;

    fn window(index: usize, start: f64, end: f64) -> Window {
        Window { index, start, end }
    }

    #[test]
    fn test_offsets_segments_and_words() {
        let words = vec![
            Word {
                text: "hello".to_string(),
                start: 5.0,
                end: 5.8,
            },
            Word {
                text: "world".to_string(),
                start: 6.0,
                end: 7.2,
            },
        ];
        let segments = vec![TranscriptSegment::new(5.0, 7.2, "hello world", words)];

        let stitched = stitch_window(&window(1, 60.0, 120.0), segments);
        assert_eq!(stitched[0].start, 65.0);
        assert_eq!(stitched[0].end, 67.2);
        assert_eq!(stitched[0].words[0].start, 65.0);
        assert_eq!(stitched[0].words[1].end, 67.2);
    }

    #[test]
    fn test_unordered_backend_output_is_stable_sorted() {
        let segments = vec![
            TranscriptSegment::new(10.0, 12.0, "b", vec![]),
            TranscriptSegment::new(2.0, 4.0, "a", vec![]),
        ];

        let stitched = stitch_window(&window(0, 0.0, 60.0), segments);
        assert_eq!(stitched[0].text, "a");
        assert_eq!(stitched[1].text, "b");
    }

    #[test]
    fn test_concatenated_windows_are_monotonic() {
        let mut all = Vec::new();
        for (i, start) in [(0usize, 0.0), (1, 60.0), (2, 120.0)] {
            let segments = vec![
                TranscriptSegment::new(1.0, 10.0, "x", vec![]),
                TranscriptSegment::new(20.0, 30.0, "y", vec![]),
            ];
            all.extend(stitch_window(&window(i, start, start + 60.0), segments));
        }

        for pair in all.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        assert_eq!(all[0].start, 1.0);
        assert_eq!(all[5].end, 150.0);
    }
}
