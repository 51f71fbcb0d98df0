//! crates/eduvisual_core/src/progress.rs
//!
//! Pure progress arithmetic for the lecture generation job, kept apart from
//! the orchestration loop so monotonicity can be tested on its own.

/// The gateway calls made per topic: enhance, questions, visuals.
pub const GENERATION_SUB_STEPS: usize = 3;

/// The percentage reported the moment the job enters `Processing`.
pub const PROCESSING_FLOOR: u8 = 10;

/// The ceiling while any topic remains; completion forces 100 at the job
/// layer, never here.
pub const PROCESSING_CEILING: u8 = 90;

/// Maps job position to a percentage: an 80-point band spread evenly across
/// topics, each topic split across its sub-steps, on top of the processing
/// floor. Non-decreasing in `(topics_done, sub_steps_done)` and clamped to
/// the ceiling.
pub fn compute_progress(topics_done: usize, total_topics: usize, sub_steps_done: usize) -> u8 {
    if total_topics == 0 {
        return PROCESSING_CEILING;
    }

    let sub_steps_done = sub_steps_done.min(GENERATION_SUB_STEPS);
    let per_topic = 80.0 / total_topics as f64;
    let fraction = topics_done as f64 + sub_steps_done as f64 / GENERATION_SUB_STEPS as f64;
    let raw = PROCESSING_FLOOR as f64 + per_topic * fraction;

    (raw as u8).min(PROCESSING_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_floor_and_ends_at_ceiling() {
        assert_eq!(compute_progress(0, 4, 0), PROCESSING_FLOOR);
        assert_eq!(compute_progress(4, 4, 0), PROCESSING_CEILING);
    }

    #[test]
    fn single_topic_walks_the_full_band() {
        assert_eq!(compute_progress(0, 1, 0), 10);
        assert_eq!(compute_progress(0, 1, 1), 36);
        assert_eq!(compute_progress(0, 1, 2), 63);
        assert_eq!(compute_progress(1, 1, 0), 90);
    }

    #[test]
    fn monotone_across_every_step_sequence() {
        for total in 1..=7 {
            let mut last = 0;
            for topic in 0..total {
                for sub in 0..=GENERATION_SUB_STEPS {
                    let p = compute_progress(topic, total, sub);
                    assert!(p >= last, "regressed at topic {topic} sub {sub} of {total}");
                    last = p;
                }
            }
            assert!(compute_progress(total, total, 0) >= last);
        }
    }

    #[test]
    fn never_exceeds_ceiling() {
        assert_eq!(compute_progress(9, 3, 3), PROCESSING_CEILING);
        assert_eq!(compute_progress(0, 0, 0), PROCESSING_CEILING);
    }

    #[test]
    fn excess_sub_steps_are_clamped() {
        assert_eq!(
            compute_progress(0, 2, 9),
            compute_progress(0, 2, GENERATION_SUB_STEPS)
        );
    }
}
