use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

/// Progress tracker for a run's collection tasks.
/// Logs periodic progress and a final summary instead of a line per task.
pub struct ProgressTracker {
    total: usize,
    completed: usize,
    failed: usize,
    start_time: Instant,
    progress_interval: usize, // Log every N completions
    last_progress_log: usize,
    error_counts: HashMap<String, usize>, // Failures by category
}

impl ProgressTracker {
    pub fn new(total: usize, progress_interval: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
            start_time: Instant::now(),
            progress_interval: progress_interval.max(1),
            last_progress_log: 0,
            error_counts: HashMap::new(),
        }
    }

    /// Interval scaled to the amount of work: every 10 for small runs, every 50 for large ones
    pub fn for_total(total: usize) -> Self {
        let interval = if total < 100 { 10 } else { 50 };
        Self::new(total, interval)
    }

    pub fn record_completed(&mut self) {
        self.completed += 1;
    }

    pub fn record_failed(&mut self, error_category: &str) {
        self.failed += 1;
        *self.error_counts.entry(error_category.to_string()).or_insert(0) += 1;
    }

    pub fn processed(&self) -> usize {
        self.completed + self.failed
    }

    /// Call after each completion
    pub fn log_progress(&mut self) {
        let current = self.processed();
        if current - self.last_progress_log >= self.progress_interval || current == self.total {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 { current as f64 / elapsed } else { 0.0 };
            info!(
                "Progress: {}/{} collections ({} ok, {} failed) - {:.1}/sec",
                current, self.total, self.completed, self.failed, rate
            );
            self.last_progress_log = current;
        }
    }

    pub fn log_summary(&self, operation: &str) {
        let elapsed = self.start_time.elapsed();
        info!(
            "{} complete: {} collections processed, {} failed in {:.1}s",
            operation,
            self.completed,
            self.failed,
            elapsed.as_secs_f64()
        );
        if !self.error_counts.is_empty() {
            let mut categories: Vec<_> = self.error_counts.iter().collect();
            categories.sort();
            for (category, count) in categories {
                warn!("  {} failures: {}", category, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut tracker = ProgressTracker::new(3, 1);
        tracker.record_completed();
        tracker.log_progress();
        tracker.record_failed("fetch");
        tracker.log_progress();
        tracker.record_failed("task");
        tracker.log_progress();

        assert_eq!(tracker.processed(), 3);
        assert_eq!(tracker.completed, 1);
        assert_eq!(tracker.failed, 2);
        assert_eq!(tracker.last_progress_log, 3);
    }

    #[test]
    fn test_interval_scales_with_total() {
        assert_eq!(ProgressTracker::for_total(20).progress_interval, 10);
        assert_eq!(ProgressTracker::for_total(500).progress_interval, 50);
        assert_eq!(ProgressTracker::new(5, 0).progress_interval, 1);
    }
}
