//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Runtime helpers supporting the frame loop."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

/// Number of recent frames kept for statistics.
pub const DEFAULT_WINDOW: usize = 1024;

/// Rolling window of jitter samples, in nanoseconds.
#[derive(Debug)]
pub struct JitterHistogram {
    samples: Mutex<VecDeque<f64>>,
    window: usize,
}

impl Default for JitterHistogram {
    fn default() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }
}

impl JitterHistogram {
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: Mutex::new(VecDeque::with_capacity(window)),
            window,
        }
    }

    pub fn record(&self, jitter: Duration) {
        let nanos = jitter.as_secs_f64() * 1_000_000_000.0;
        let mut samples = self.samples.lock();
        if samples.len() == self.window {
            samples.pop_front();
        }
        samples.push_back(nanos);
    }

    pub fn summary(&self) -> Option<JitterSummary> {
        let samples = self.samples.lock();
        if samples.is_empty() {
            return None;
        }
        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = if samples.len() > 1 {
            let sum_sq = samples
                .iter()
                .map(|value| {
                    let delta = value - mean;
                    delta * delta
                })
                .sum::<f64>();
            sum_sq / (count - 1.0)
        } else {
            0.0
        };
        let max = samples.iter().copied().fold(f64::MIN, f64::max);
        let min = samples.iter().copied().fold(f64::MAX, f64::min);
        Some(JitterSummary {
            mean_ns: mean,
            std_dev_ns: variance.sqrt(),
            max_ns: max,
            min_ns: min,
            samples: samples.len() as u64,
        })
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(summary) = self.summary() {
            let mut file = File::create(path)?;
            let json = serde_json::to_vec_pretty(&summary).map_err(std::io::Error::other)?;
            file.write_all(&json)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JitterSummary {
    pub mean_ns: f64,
    pub std_dev_ns: f64,
    pub max_ns: f64,
    pub min_ns: f64,
    pub samples: u64,
}

/// Measures frame spacing against the frame budget and derives the
/// effective frame rate.
#[derive(Debug)]
pub struct FrameTimingReporter {
    target_interval: Duration,
    state: Mutex<TimingState>,
    histogram: JitterHistogram,
}

#[derive(Debug, Default)]
struct TimingState {
    last_tick: Option<Instant>,
    intervals: VecDeque<Duration>,
    interval_sum: Duration,
    frames: u64,
}

impl Default for FrameTimingReporter {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl FrameTimingReporter {
    pub fn new(target_interval: Duration) -> Self {
        Self {
            target_interval,
            state: Mutex::new(TimingState::default()),
            histogram: JitterHistogram::default(),
        }
    }

    pub fn target_interval(&self) -> Duration {
        self.target_interval
    }

    pub fn record_tick(&self) {
        self.record_tick_at(Instant::now());
    }

    /// Record a frame that started at `now`.
    pub fn record_tick_at(&self, now: Instant) {
        let mut state = self.state.lock();
        state.frames += 1;
        if let Some(previous) = state.last_tick {
            let actual = now.saturating_duration_since(previous);
            let jitter = if actual > self.target_interval {
                actual - self.target_interval
            } else {
                self.target_interval - actual
            };
            self.histogram.record(jitter);

            if state.intervals.len() == DEFAULT_WINDOW {
                if let Some(oldest) = state.intervals.pop_front() {
                    state.interval_sum = state.interval_sum.saturating_sub(oldest);
                }
            }
            state.intervals.push_back(actual);
            state.interval_sum += actual;
        }
        state.last_tick = Some(now);
    }

    /// Frames recorded since creation, across runs.
    pub fn frames(&self) -> u64 {
        self.state.lock().frames
    }

    /// Measured frames per second over the recent window, if at least two
    /// frames have been recorded.
    pub fn frame_rate(&self) -> Option<f64> {
        let state = self.state.lock();
        if state.intervals.is_empty() || state.interval_sum.is_zero() {
            return None;
        }
        Some(state.intervals.len() as f64 / state.interval_sum.as_secs_f64())
    }

    /// Start a new run against `target_interval`.
    ///
    /// The previous tick is forgotten so the pause between runs is not
    /// measured. Frame count and window statistics carry over.
    pub fn restart(&mut self, target_interval: Duration) {
        self.target_interval = target_interval;
        self.state.get_mut().last_tick = None;
    }

    pub fn histogram(&self) -> &JitterHistogram {
        &self.histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_from_even_spacing() {
        let reporter = FrameTimingReporter::new(Duration::from_millis(100));
        let start = Instant::now();
        for n in 0..5u32 {
            reporter.record_tick_at(start + Duration::from_millis(100) * n);
        }
        assert_eq!(reporter.frames(), 5);
        let fps = reporter.frame_rate().expect("rate after several frames");
        assert!((fps - 10.0).abs() < 1e-6, "fps was {}", fps);

        let summary = reporter.histogram().summary().expect("jitter summary");
        assert_eq!(summary.samples, 4);
        assert!(summary.max_ns.abs() < 1.0);
    }

    #[test]
    fn single_frame_has_no_rate() {
        let reporter = FrameTimingReporter::new(Duration::from_millis(16));
        reporter.record_tick();
        assert!(reporter.frame_rate().is_none());
        assert!(reporter.histogram().summary().is_none());
    }

    #[test]
    fn restart_skips_the_gap() {
        let mut reporter = FrameTimingReporter::new(Duration::from_millis(10));
        let start = Instant::now();
        reporter.record_tick_at(start);
        reporter.record_tick_at(start + Duration::from_millis(10));
        reporter.restart(Duration::from_millis(20));
        assert_eq!(reporter.target_interval(), Duration::from_millis(20));
        reporter.record_tick_at(start + Duration::from_secs(5));
        let fps = reporter.frame_rate().unwrap();
        assert!((fps - 100.0).abs() < 1e-6);
        assert_eq!(reporter.frames(), 3);
    }

    #[test]
    fn histogram_window_is_bounded() {
        let histogram = JitterHistogram::with_window(3);
        for ms in 1..=5u64 {
            histogram.record(Duration::from_millis(ms));
        }
        let summary = histogram.summary().unwrap();
        assert_eq!(summary.samples, 3);
        assert!((summary.min_ns - 3_000_000.0).abs() < 1.0);
    }

    #[test]
    fn summary_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timing.json");
        let histogram = JitterHistogram::default();
        histogram.record(Duration::from_micros(250));
        histogram.write_json(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"samples\": 1"));
    }
}
