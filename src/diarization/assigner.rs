// Speaker assignment: overlap-duration majority vote.
//
// For each segment, overlap with every turn is summed per speaker label and
// the label with the greatest cumulative overlap wins. Accumulation is
// order-preserving, so an exact tie resolves to the label encountered first
// in turn iteration order — reproducible for a given turn list.

use crate::transcript::{DiarizationTurn, TranscriptSegment, FALLBACK_SPEAKER, UNKNOWN_SPEAKER};

use super::engine::DiarizationOutcome;

/// Assign a speaker label to every segment of one window.
///
/// Unavailable diarization labels the whole window with the fallback
/// sentinel without any overlap computation. A segment no turn overlaps
/// gets the distinct unknown sentinel.
pub fn assign_speakers(segments: &mut [TranscriptSegment], outcome: &DiarizationOutcome) {
    match outcome {
        DiarizationOutcome::Unavailable => {
            for segment in segments.iter_mut() {
                segment.speaker_id = FALLBACK_SPEAKER.to_string();
            }
        }
        DiarizationOutcome::Turns(turns) => {
            for segment in segments.iter_mut() {
                segment.speaker_id = majority_speaker(segment, turns)
                    .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());
            }
        }
    }
}

fn majority_speaker(segment: &TranscriptSegment, turns: &[DiarizationTurn]) -> Option<String> {
    let mut durations: Vec<(&str, f64)> = Vec::new();

    for turn in turns {
        let overlap = (segment.end.min(turn.end) - segment.start.max(turn.start)).max(0.0);
        if overlap <= 0.0 {
            continue;
        }
        match durations
            .iter_mut()
            .find(|(label, _)| *label == turn.speaker)
        {
            Some((_, total)) => *total += overlap,
            None => durations.push((turn.speaker.as_str(), overlap)),
        }
    }

    // Strictly-greater comparison keeps the first label on ties.
    let mut best: Option<(&str, f64)> = None;
    for &(label, total) in &durations {
        if best.map_or(true, |(_, best_total)| total > best_total) {
            best = Some((label, total));
        }
    }
    best.map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(start: f64, end: f64, speaker: &str) -> DiarizationTurn {
        DiarizationTurn {
            start,
            end,
            speaker: speaker.to_string(),
        }
    }

    fn segment(start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment::new(start, end, "text", vec![])
    }

    #[test]
    fn test_majority_vote_picks_largest_cumulative_overlap() {
        let mut segments = vec![segment(10.0, 15.0)];
        let turns = vec![turn(9.0, 12.0, "A"), turn(12.0, 16.0, "B")];

        assign_speakers(&mut segments, &DiarizationOutcome::Turns(turns));
        // A overlaps 2.0s, B overlaps 3.0s
        assert_eq!(segments[0].speaker_id, "B");
    }

    #[test]
    fn test_cumulative_overlap_across_split_turns() {
        let mut segments = vec![segment(0.0, 10.0)];
        // B holds the single largest turn but A wins on total duration.
        let turns = vec![
            turn(0.0, 3.0, "A"),
            turn(3.0, 7.0, "B"),
            turn(7.0, 10.0, "A"),
        ];

        assign_speakers(&mut segments, &DiarizationOutcome::Turns(turns));
        assert_eq!(segments[0].speaker_id, "A");
    }

    #[test]
    fn test_tie_break_is_first_in_turn_order() {
        let mut segments = vec![segment(0.0, 10.0)];
        let turns = vec![turn(0.0, 5.0, "A"), turn(5.0, 10.0, "B")];

        for _ in 0..10 {
            assign_speakers(&mut segments, &DiarizationOutcome::Turns(turns.clone()));
            assert_eq!(segments[0].speaker_id, "A");
        }

        // Reversed turn order flips the winner: the tie-break follows
        // iteration order, nothing else.
        let reversed = vec![turn(5.0, 10.0, "B"), turn(0.0, 5.0, "A")];
        assign_speakers(&mut segments, &DiarizationOutcome::Turns(reversed));
        assert_eq!(segments[0].speaker_id, "B");
    }

    #[test]
    fn test_unavailable_applies_fallback_uniformly() {
        let mut segments = vec![segment(0.0, 5.0), segment(5.0, 9.0), segment(9.0, 12.0)];

        assign_speakers(&mut segments, &DiarizationOutcome::Unavailable);
        for seg in &segments {
            assert_eq!(seg.speaker_id, FALLBACK_SPEAKER);
        }
    }

    #[test]
    fn test_no_overlap_gets_unknown_sentinel() {
        let mut segments = vec![segment(20.0, 25.0)];
        let turns = vec![turn(0.0, 5.0, "A")];

        assign_speakers(&mut segments, &DiarizationOutcome::Turns(turns));
        assert_eq!(segments[0].speaker_id, UNKNOWN_SPEAKER);
        assert_ne!(segments[0].speaker_id, FALLBACK_SPEAKER);
    }

    #[test]
    fn test_zero_turns_gets_unknown_sentinel() {
        let mut segments = vec![segment(0.0, 5.0)];

        assign_speakers(&mut segments, &DiarizationOutcome::Turns(vec![]));
        assert_eq!(segments[0].speaker_id, UNKNOWN_SPEAKER);
    }

    #[test]
    fn test_touching_interval_is_not_overlap() {
        let mut segments = vec![segment(5.0, 10.0)];
        let turns = vec![turn(0.0, 5.0, "A"), turn(10.0, 12.0, "B")];

        assign_speakers(&mut segments, &DiarizationOutcome::Turns(turns));
        assert_eq!(segments[0].speaker_id, UNKNOWN_SPEAKER);
    }
}
