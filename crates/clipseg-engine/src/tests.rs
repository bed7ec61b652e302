//! End-to-end tests for clip detection over small synthetic transcripts.

#[cfg(test)]
mod fixtures {
    use clipseg_models::Transcription;

    pub const RUST_TOPIC: &str = "rust borrow compiler ownership rust borrow compiler ownership \
                                  rust borrow compiler ownership";
    pub const COOKING_TOPIC: &str = "pasta garlic tomato basil pasta garlic tomato basil \
                                     pasta garlic tomato basil";

    /// Two 40 s sentences on one topic, then a 40 s sentence on another.
    pub fn topic_shift() -> Transcription {
        Transcription::from_sentence_spans(&[
            (0.0, 40.0, RUST_TOPIC),
            (40.0, 80.0, RUST_TOPIC),
            (80.0, 120.0, COOKING_TOPIC),
        ])
        .unwrap()
    }

    /// A 20 s sentence followed by a 90 s sentence on another topic.
    pub fn short_then_long() -> Transcription {
        Transcription::from_sentence_spans(&[(0.0, 20.0, RUST_TOPIC), (20.0, 110.0, COOKING_TOPIC)])
            .unwrap()
    }

    pub fn uniform() -> Transcription {
        Transcription::from_sentence_spans(&[
            (0.0, 40.0, RUST_TOPIC),
            (40.0, 80.0, RUST_TOPIC),
            (80.0, 120.0, RUST_TOPIC),
        ])
        .unwrap()
    }

    /// Every block holds the same single term, whatever its length.
    pub fn single_term() -> Transcription {
        let text = ["rust"; 12].join(" ");
        Transcription::from_sentence_spans(&[
            (0.0, 40.0, text.as_str()),
            (40.0, 80.0, text.as_str()),
            (80.0, 120.0, text.as_str()),
        ])
        .unwrap()
    }

    /// A long talk drifting through several topics, 10 s per sentence.
    pub fn long_talk() -> Transcription {
        let topics: [[&str; 8]; 4] = [
            ["kernel", "scheduler", "thread", "process", "memory", "page", "cache", "syscall"],
            ["garden", "tomato", "soil", "compost", "water", "seed", "sunlight", "harvest"],
            ["guitar", "chord", "melody", "rhythm", "tempo", "string", "amplifier", "solo"],
            ["orbit", "rocket", "thrust", "payload", "launch", "gravity", "fuel", "satellite"],
        ];

        let texts: Vec<String> = (0..24)
            .map(|j| {
                let topic = &topics[(j / 6) % topics.len()];
                (0..10)
                    .map(|i| topic[(j * 3 + i) % topic.len()])
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let spans: Vec<(f64, f64, &str)> = texts
            .iter()
            .enumerate()
            .map(|(j, text)| (j as f64 * 10.0, (j + 1) as f64 * 10.0, text.as_str()))
            .collect();

        Transcription::from_sentence_spans(&spans).unwrap()
    }
}

#[cfg(test)]
mod clip_finder_tests {
    use super::fixtures;
    use crate::config::SegmenterConfig;
    use crate::error::{ErrorKind, SegmentationError};
    use crate::finder::ClipFinder;

    fn finder(config: SegmenterConfig) -> ClipFinder {
        ClipFinder::new(config).unwrap()
    }

    #[test]
    fn test_topic_shift_cuts_between_sentences() {
        let t = fixtures::topic_shift();
        let finder = finder(SegmenterConfig::default().with_block_size(4));

        let outcome = finder.detect_boundaries(&t).unwrap();
        assert_eq!(outcome.blocks.len(), 9);
        assert_eq!(outcome.candidates.len(), 8);
        assert_eq!(outcome.boundaries, vec![5]);
        assert_eq!(outcome.cuts.len(), 1);
        assert_eq!(outcome.cuts[0].time, 80.0);

        let clips = finder.find_clips(&t).unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!((clips[0].start_time, clips[0].end_time), (0.0, 80.0));
        assert_eq!((clips[1].start_time, clips[1].end_time), (80.0, 120.0));
        assert_eq!((clips[1].start_sentence, clips[1].end_sentence), (2, 3));
        assert!(clips.iter().all(|c| !c.needs_trim));
    }

    #[test]
    fn test_uniform_text_is_one_clip() {
        let t = fixtures::uniform();
        let finder = finder(SegmenterConfig::default().with_block_size(4));

        let outcome = finder.detect_boundaries(&t).unwrap();
        assert!(outcome.boundaries.is_empty());

        let clips = finder.find_clips(&t).unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!((clips[0].start_time, clips[0].end_time), (0.0, 120.0));
    }

    #[test]
    fn test_topic_shift_found_at_every_small_block_size() {
        let t = fixtures::topic_shift();

        for block_size in 3..=12 {
            let finder = finder(SegmenterConfig::default().with_block_size(block_size));
            let outcome = finder.detect_boundaries(&t).unwrap();
            let times: Vec<f64> = outcome.cuts.iter().map(|c| c.time).collect();
            assert_eq!(times, vec![80.0], "block_size {}", block_size);

            let spans: Vec<(f64, f64)> = finder
                .find_clips(&t)
                .unwrap()
                .iter()
                .map(|c| (c.start_time, c.end_time))
                .collect();
            assert_eq!(spans, vec![(0.0, 80.0), (80.0, 120.0)], "block_size {}", block_size);
        }
    }

    #[test]
    fn test_three_blocks_are_not_smoothed_flat() {
        let t = fixtures::topic_shift();
        let outcome = finder(SegmenterConfig::default().with_block_size(12))
            .detect_boundaries(&t)
            .unwrap();

        assert_eq!(outcome.blocks.len(), 3);
        let smoothed: Vec<f64> = outcome.candidates.iter().map(|c| c.smoothed_score).collect();
        assert_eq!(smoothed, vec![1.0, 0.0]);
        assert_eq!(outcome.boundaries, vec![1]);
        assert_eq!(outcome.cuts[0].time, 80.0);
    }

    #[test]
    fn test_equal_smoothed_scores_form_one_valley() {
        let t = fixtures::topic_shift();
        // 7 blocks of 5 words and a single-word tail
        let outcome = finder(SegmenterConfig::default().with_block_size(5))
            .detect_boundaries(&t)
            .unwrap();

        let depths: Vec<f64> = outcome.candidates.iter().map(|c| c.depth_score).collect();
        assert!((depths[3] - depths[4]).abs() < 1e-9);
        assert!(depths[3] > 0.0);
        assert_eq!(outcome.boundaries, vec![4]);
        assert_eq!(outcome.cuts.len(), 1);
        assert_eq!(outcome.cuts[0].time, 80.0);
    }

    #[test]
    fn test_uniform_text_with_shorter_final_block() {
        let t = fixtures::single_term();
        for block_size in 3..=12 {
            let finder = finder(SegmenterConfig::default().with_block_size(block_size));
            let outcome = finder.detect_boundaries(&t).unwrap();
            assert!(outcome.boundaries.is_empty(), "block_size {}", block_size);

            let clips = finder.find_clips(&t).unwrap();
            assert_eq!(clips.len(), 1);
            assert_eq!((clips[0].start_time, clips[0].end_time), (0.0, 120.0));
        }

        // Four blocks of 8 and a tail of 4, all with equal term proportions
        let t = fixtures::uniform();
        let outcome = finder(SegmenterConfig::default().with_block_size(8))
            .detect_boundaries(&t)
            .unwrap();
        assert_eq!(outcome.blocks.last().map(|b| b.len()), Some(4));
        assert!(outcome.boundaries.is_empty());
        assert!(outcome.cuts.is_empty());
    }

    #[test]
    fn test_too_short_for_block_size() {
        let t = fixtures::topic_shift();
        let err = finder(SegmenterConfig::default().with_block_size(40))
            .find_clips(&t)
            .unwrap_err();

        assert_eq!(
            err,
            SegmentationError::TranscriptTooShort {
                words: 36,
                block_size: 40
            }
        );
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(err.is_tiling_error());
    }

    #[test]
    fn test_fewer_than_three_blocks() {
        let t = fixtures::topic_shift();
        let err = finder(SegmenterConfig::default().with_block_size(20))
            .detect_boundaries(&t)
            .unwrap_err();
        assert_eq!(err, SegmentationError::InsufficientData { blocks: 2 });
    }

    #[test]
    fn test_short_segment_dropped_long_segment_flagged() {
        let t = fixtures::short_then_long();
        let finder = finder(
            SegmenterConfig::default()
                .with_block_size(4)
                .with_duration_bounds(30.0, 60.0),
        );

        let outcome = finder.detect_boundaries(&t).unwrap();
        assert_eq!(outcome.cuts[0].time, 20.0);

        let clips = finder.find_clips(&t).unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!((clips[0].start_time, clips[0].end_time), (20.0, 110.0));
        assert!(clips[0].needs_trim);
    }

    #[test]
    fn test_all_segments_too_short() {
        let t = fixtures::short_then_long();
        let err = finder(
            SegmenterConfig::default()
                .with_block_size(4)
                .with_duration_bounds(100.0, 200.0),
        )
        .find_clips(&t)
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoSegmentsFound);
        assert!(err.is_clip_selection_error());
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let err = ClipFinder::new(SegmenterConfig::default().with_duration_bounds(60.0, 30.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationInvalid);
    }

    #[test]
    fn test_top_clips() {
        let t = fixtures::topic_shift();
        let finder = finder(SegmenterConfig::default().with_block_size(4));

        let top = finder.find_top_clips(&t, 1).unwrap();
        assert_eq!(top.len(), 1);

        let all = finder.find_top_clips(&t, 10).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].score >= all[1].score);

        let err = finder.find_top_clips(&t, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationInvalid);
    }

    #[test]
    fn test_clips_cover_transcript_in_order() {
        let t = fixtures::long_talk();
        let finder = finder(
            SegmenterConfig::default()
                .with_block_size(10)
                .with_duration_bounds(0.0, 900.0),
        );

        let clips = finder.find_clips(&t).unwrap();
        assert_eq!(clips.first().map(|c| c.start_time), Some(0.0));
        assert_eq!(clips.last().map(|c| c.end_time), Some(t.end_time()));
        for pair in clips.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
            assert!(!pair[0].overlaps(&pair[1]));
        }
        for clip in &clips {
            assert!(clip.end_time > clip.start_time);
            assert!((0.0..=1.0).contains(&clip.score));
        }
    }

    #[test]
    fn test_deterministic_and_parallel_identical() {
        let t = fixtures::long_talk();
        let base = SegmenterConfig::default()
            .with_block_size(5)
            .with_comparison_window(2)
            .with_duration_bounds(0.0, 900.0);

        let sequential = finder(base.clone());
        let parallel = finder(base.with_parallel_scoring(true));

        let first = sequential.detect_boundaries(&t).unwrap();
        let second = sequential.detect_boundaries(&t).unwrap();
        let threaded = parallel.detect_boundaries(&t).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, threaded);

        assert_eq!(
            sequential.find_clips(&t).unwrap(),
            parallel.find_clips(&t).unwrap()
        );
    }
}

#[cfg(test)]
mod multiscale_tests {
    use super::fixtures;
    use crate::config::SegmenterConfig;
    use crate::error::ErrorKind;
    use crate::multiscale::MultiScaleFinder;

    #[test]
    fn test_pools_whole_transcript_and_scale_clips() {
        let t = fixtures::topic_shift();
        let finder = MultiScaleFinder::new(SegmenterConfig::default())
            .unwrap()
            .with_block_sizes(vec![4, 100])
            .unwrap();

        let candidates = finder.find_candidates(&t).unwrap();
        let spans: Vec<(f64, f64)> = candidates
            .iter()
            .map(|c| (c.start_time, c.end_time))
            .collect();
        assert_eq!(spans, vec![(0.0, 80.0), (0.0, 120.0), (80.0, 120.0)]);
    }

    #[test]
    fn test_duplicates_across_scales_are_skipped() {
        let t = fixtures::topic_shift();
        let finder = MultiScaleFinder::new(SegmenterConfig::default())
            .unwrap()
            .with_block_sizes(vec![4, 4])
            .unwrap();

        assert_eq!(finder.find_candidates(&t).unwrap().len(), 3);
    }

    #[test]
    fn test_nothing_within_bounds() {
        let t = fixtures::topic_shift();
        let finder = MultiScaleFinder::new(SegmenterConfig::default().with_duration_bounds(0.0, 30.0))
            .unwrap()
            .with_block_sizes(vec![4])
            .unwrap();

        let err = finder.find_candidates(&t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSegmentsFound);
    }

    #[test]
    fn test_long_talk_candidates_are_sorted_and_bounded() {
        let t = fixtures::long_talk();
        let config = SegmenterConfig::default().with_duration_bounds(15.0, 120.0);
        let finder = MultiScaleFinder::new(config).unwrap().with_block_sizes(vec![5, 10, 20]).unwrap();

        let candidates = finder.find_candidates(&t).unwrap();
        for pair in candidates.windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
        }
        for c in &candidates {
            assert!(c.duration() >= 15.0 && c.duration() <= 120.0);
        }
    }
}
