//! Summary figures for a finished concurrency run

use super::task::{Task, TaskStatus};
use crate::scenario::{ConcurrencyModel, MemoryOverhead};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetrics {
    /// Simulated ms from start to termination
    pub total_time: u64,
    /// Best-case time over actual time, as a percentage in `[0, 100]`
    pub efficiency: u32,
    pub memory_overhead: MemoryOverhead,
    pub completed: usize,
    pub total: usize,
}

impl RunMetrics {
    /// Summarize `tasks` after a run that ended at `total_time`.
    ///
    /// Returns `None` when there are no tasks.
    pub fn compute(tasks: &[Task], total_time: u64, model: ConcurrencyModel) -> Option<Self> {
        let best_case = tasks.iter().map(Task::duration_ms).max()?;

        Some(RunMetrics {
            total_time,
            efficiency: efficiency(best_case, total_time),
            memory_overhead: model.memory_overhead(),
            completed: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            total: tasks.len(),
        })
    }
}

/// `min(100, round(best_case / total_time * 100))`; a zero-length run is 100%
pub fn efficiency(best_case: u64, total_time: u64) -> u32 {
    if total_time == 0 {
        return 100;
    }
    let percent = (best_case as f64 / total_time as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_of_serial_run() {
        assert_eq!(efficiency(2000, 2350), 85);
    }

    #[test]
    fn efficiency_is_capped() {
        assert_eq!(efficiency(2000, 2000), 100);
        assert_eq!(efficiency(2000, 1000), 100);
        assert_eq!(efficiency(0, 500), 0);
        assert_eq!(efficiency(10, 0), 100);
    }

    #[test]
    fn no_tasks_no_metrics() {
        assert!(RunMetrics::compute(&[], 0, ConcurrencyModel::Threads).is_none());
    }
}
