//! Runtime task instances

use crate::scenario::TaskDefinition;
use std::fmt;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Queued,
    Running,
    Blocked, // Legacy single-model data only; the simulator never assigns it
    Completed,
}

impl TaskStatus {
    /// Position in the forward lifecycle, used to check monotonic progress
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Queued => 0,
            TaskStatus::Running => 1,
            TaskStatus::Blocked | TaskStatus::Completed => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Running => "running",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Completed => "completed",
        };
        f.pad(label)
    }
}

/// A task definition plus its simulated state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub def: TaskDefinition,
    pub status: TaskStatus,
    pub lane: usize,
    pub start_time: Option<u64>, // Simulated ms, set once on admission
    pub end_time: Option<u64>,   // Simulated ms, set once on completion
}

impl Task {
    pub fn new(def: TaskDefinition, lane: usize) -> Self {
        Task {
            def,
            status: TaskStatus::Queued,
            lane,
            start_time: None,
            end_time: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn duration_ms(&self) -> u64 {
        self.def.duration_ms
    }

    /// Fraction of the work done at `elapsed`, in `[0, 1]`
    pub fn progress(&self, elapsed: u64) -> f64 {
        match (self.status, self.start_time) {
            (TaskStatus::Completed, _) => 1.0,
            (TaskStatus::Running, Some(start)) => {
                if self.def.duration_ms == 0 {
                    1.0
                } else {
                    let done = elapsed.saturating_sub(start) as f64;
                    (done / self.def.duration_ms as f64).min(1.0)
                }
            }
            _ => 0.0,
        }
    }

    pub(crate) fn admit(&mut self, elapsed: u64) {
        self.status = TaskStatus::Running;
        if self.start_time.is_none() {
            self.start_time = Some(elapsed);
        }
    }

    pub(crate) fn complete(&mut self, elapsed: u64) {
        self.status = TaskStatus::Completed;
        if self.end_time.is_none() {
            self.end_time = Some(elapsed);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.status = TaskStatus::Queued;
        self.start_time = None;
        self.end_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::TaskKind;

    #[test]
    fn progress_tracks_elapsed_time() {
        let mut task = Task::new(TaskDefinition::new("t", "t", 200, TaskKind::Io), 0);
        assert_eq!(task.progress(50), 0.0);
        task.admit(100);
        assert_eq!(task.progress(200), 0.5);
        assert_eq!(task.progress(900), 1.0);
        task.complete(300);
        assert_eq!(task.progress(0), 1.0);
    }

    #[test]
    fn start_time_is_set_once() {
        let mut task = Task::new(TaskDefinition::new("t", "t", 10, TaskKind::Cpu), 1);
        task.admit(40);
        task.admit(80);
        assert_eq!(task.start_time, Some(40));
        task.reset();
        assert_eq!(task.status, TaskStatus::Queued);
        assert_eq!(task.start_time, None);
    }
}
