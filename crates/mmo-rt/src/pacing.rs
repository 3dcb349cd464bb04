//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Runtime helpers supporting the frame loop."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

use mmo_common::time::duration_to_micros;
use tracing::trace;

/// Outcome of closing a frame with [`FramePacer::end_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePace {
    /// The frame finished early and the pacer slept for the remainder.
    Slept(Duration),
    /// The frame used the whole budget or more; no sleep happened.
    Overran(Duration),
}

/// Blocking frame limiter that caps a loop at a target rate.
///
/// Each frame is bracketed by [`begin_frame`](Self::begin_frame) and
/// [`end_frame`](Self::end_frame). The sleep covers only what the frame's own
/// work left of the budget. Overruns are not caught up.
#[derive(Debug)]
pub struct FramePacer {
    budget: Duration,
    last_start: Instant,
    frame_start: Instant,
}

impl FramePacer {
    /// Pacer for frames of length `budget`, usually from
    /// [`frame_budget`](mmo_common::time::frame_budget).
    pub fn new(budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            budget,
            last_start: now,
            frame_start: now,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Start a frame and return the wall-clock time since the previous frame
    /// started (or since the pacer was created, for the first frame).
    pub fn begin_frame(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_start);
        self.last_start = now;
        self.frame_start = now;
        delta
    }

    /// Finish the frame, sleeping for whatever is left of the budget.
    pub fn end_frame(&mut self) -> FramePace {
        let work = self.frame_start.elapsed();
        match remaining_budget(self.budget, work) {
            Some(remaining) => {
                std::thread::sleep(remaining);
                FramePace::Slept(remaining)
            }
            None => {
                trace!(
                    work_us = duration_to_micros(work),
                    budget_us = duration_to_micros(self.budget),
                    "frame overran budget"
                );
                FramePace::Overran(work)
            }
        }
    }
}

/// Time left of `budget` after `work`, or `None` when nothing is left.
pub fn remaining_budget(budget: Duration, work: Duration) -> Option<Duration> {
    budget.checked_sub(work).filter(|left| !left.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrun_never_sleeps() {
        let budget = Duration::from_millis(100);
        assert_eq!(remaining_budget(budget, Duration::from_millis(150)), None);
        assert_eq!(remaining_budget(budget, budget), None);
        assert_eq!(
            remaining_budget(budget, Duration::from_millis(30)),
            Some(Duration::from_millis(70))
        );
    }

    #[test]
    fn end_frame_sleeps_out_the_budget() {
        let mut pacer = FramePacer::new(Duration::from_millis(20));
        let started = Instant::now();
        pacer.begin_frame();
        let pace = pacer.end_frame();
        assert!(matches!(pace, FramePace::Slept(_)));
        assert!(started.elapsed() >= Duration::from_millis(18));
    }

    #[test]
    fn slow_frame_reports_overrun() {
        let mut pacer = FramePacer::new(Duration::from_millis(5));
        pacer.begin_frame();
        std::thread::sleep(Duration::from_millis(10));
        assert!(matches!(pacer.end_frame(), FramePace::Overran(_)));
    }

    #[test]
    fn delta_spans_frame_starts() {
        let mut pacer = FramePacer::new(Duration::from_millis(20));
        pacer.begin_frame();
        pacer.end_frame();
        let delta = pacer.begin_frame();
        assert!(delta >= Duration::from_millis(18), "delta was {:?}", delta);
    }
}
