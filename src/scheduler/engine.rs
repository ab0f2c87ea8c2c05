//! Tick-driven concurrency simulator
//!
//! [`ConcurrencySim`] owns every task of one run. Callers drive it by calling
//! [`ConcurrencySim::tick`] with a [`Clock`]; each tick reads the clock once
//! and then:
//!
//! 1. completes every running task whose duration has elapsed
//! 2. admits queued tasks, in list order, under the model's admission rule
//! 3. stops the run when all tasks are done or the time ceiling is exceeded
//!
//! Admission sees the state left by step 1 plus the admissions already granted
//! earlier in the same tick, so a lane freed in this tick can be reused right
//! away but two tasks can never claim the same lane in one tick. A task
//! admitted in a tick is checked for completion starting with the next tick.

use super::clock::{Clock, ManualClock};
use super::metrics::RunMetrics;
use super::task::{Task, TaskStatus};
use crate::constants::SIMULATION_CEILING_MS;
use crate::scenario::{ConcurrencyImpl, ConcurrencyModel, TaskDefinition};

/// Where a run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Stopped,
    Finished,
    TimedOut,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Finished | RunPhase::TimedOut)
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The run is not active; nothing happened
    Inactive,
    Continue,
    Finished,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct ConcurrencySim {
    model: ConcurrencyModel,
    lanes: usize,
    tasks: Vec<Task>,
    phase: RunPhase,
    epoch: Option<u64>, // Clock reading that corresponds to elapsed == 0
    elapsed: u64,
    ceiling_ms: u64,
    metrics: Option<RunMetrics>,
}

impl ConcurrencySim {
    /// Create a run with lanes assigned round-robin in task order
    pub fn new(defs: &[TaskDefinition], model: ConcurrencyModel, lanes: usize) -> Self {
        let lanes = if model == ConcurrencyModel::EventLoop {
            1
        } else {
            lanes.max(1)
        };
        let tasks = defs
            .iter()
            .enumerate()
            .map(|(i, def)| Task::new(def.clone(), i % lanes))
            .collect();

        ConcurrencySim {
            model,
            lanes,
            tasks,
            phase: RunPhase::Idle,
            epoch: None,
            elapsed: 0,
            ceiling_ms: SIMULATION_CEILING_MS,
            metrics: None,
        }
    }

    /// Create a run for one language's implementation of a scenario
    pub fn for_impl(defs: &[TaskDefinition], implementation: &ConcurrencyImpl) -> Self {
        Self::new(defs, implementation.model, implementation.lane_count())
    }

    pub fn with_ceiling(mut self, ceiling_ms: u64) -> Self {
        self.ceiling_ms = ceiling_ms;
        self
    }

    // ========== Control ==========

    /// Begin or resume the run. A stopped run resumes at the simulated time it
    /// was stopped at. Finished runs must be [`reset`](Self::reset) first.
    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C) {
        match self.phase {
            RunPhase::Running => return,
            RunPhase::Finished | RunPhase::TimedOut => {
                log::debug!("start ignored: run already ended, reset first");
                return;
            }
            RunPhase::Idle | RunPhase::Stopped => {}
        }

        if self.tasks.is_empty() {
            self.phase = RunPhase::Finished;
            self.metrics = None;
            log::info!("{} run has no tasks, finished immediately", self.model);
            return;
        }

        self.epoch = Some(clock.now_ms().saturating_sub(self.elapsed));
        self.phase = RunPhase::Running;
        log::info!(
            "{} run started at {} ms with {} task(s) on {} lane(s)",
            self.model,
            self.elapsed,
            self.tasks.len(),
            self.lanes
        );
    }

    /// Halt ticking. Task state is left exactly as it is.
    pub fn stop<C: Clock + ?Sized>(&mut self, clock: &C) {
        if self.phase != RunPhase::Running {
            return;
        }
        if let Some(epoch) = self.epoch.take() {
            self.elapsed = clock.now_ms().saturating_sub(epoch);
        }
        self.phase = RunPhase::Stopped;
        log::info!("{} run stopped at {} ms", self.model, self.elapsed);
    }

    /// Return every task to `queued` and forget the run
    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.reset();
        }
        self.phase = RunPhase::Idle;
        self.epoch = None;
        self.elapsed = 0;
        self.metrics = None;
    }

    /// Advance the run to the clock's current time
    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &C) -> TickOutcome {
        if self.phase != RunPhase::Running {
            return TickOutcome::Inactive;
        }
        let Some(epoch) = self.epoch else {
            return TickOutcome::Inactive;
        };
        let elapsed = clock.now_ms().saturating_sub(epoch).max(self.elapsed);
        self.advance(elapsed)
    }

    /// Drive the run headlessly with a fixed tick length until it ends.
    ///
    /// Returns the metrics of the finished run.
    pub fn run_to_completion(&mut self, tick_ms: u64) -> Option<&RunMetrics> {
        let clock = ManualClock::new();
        clock.set(self.elapsed);
        self.start(&clock);

        while self.phase == RunPhase::Running {
            match self.tick(&clock) {
                TickOutcome::Continue => clock.advance(tick_ms.max(1)),
                _ => break,
            }
        }
        self.metrics.as_ref()
    }

    fn advance(&mut self, elapsed: u64) -> TickOutcome {
        self.elapsed = elapsed;

        // Completions
        for task in &mut self.tasks {
            if task.status != TaskStatus::Running {
                continue;
            }
            let started = task.start_time.unwrap_or(elapsed);
            if elapsed.saturating_sub(started) >= task.duration_ms() {
                task.complete(elapsed);
                log::debug!("t={}ms {} completed on lane {}", elapsed, task.id(), task.lane);
            }
        }

        // Admissions
        let mut any_running = self.tasks.iter().any(|t| t.status == TaskStatus::Running);
        let mut lane_busy = vec![false; self.lanes];
        for task in self.tasks.iter().filter(|t| t.status == TaskStatus::Running) {
            lane_busy[task.lane] = true;
        }

        for task in &mut self.tasks {
            if task.status != TaskStatus::Queued {
                continue;
            }
            let admitted = match self.model {
                ConcurrencyModel::EventLoop => !any_running,
                ConcurrencyModel::Goroutines => true,
                ConcurrencyModel::Threads
                | ConcurrencyModel::AsyncAwait
                | ConcurrencyModel::Multiprocessing => !lane_busy[task.lane],
            };
            if admitted {
                task.admit(elapsed);
                any_running = true;
                lane_busy[task.lane] = true;
                log::debug!("t={}ms {} admitted on lane {}", elapsed, task.id(), task.lane);
            }
        }

        // Termination
        if self.tasks.iter().all(|t| t.status == TaskStatus::Completed) {
            self.finish(RunPhase::Finished);
            log::info!("{} run finished in {} ms", self.model, elapsed);
            TickOutcome::Finished
        } else if elapsed > self.ceiling_ms {
            self.finish(RunPhase::TimedOut);
            log::warn!(
                "{} run hit the {} ms ceiling with {} task(s) unfinished",
                self.model,
                self.ceiling_ms,
                self.tasks
                    .iter()
                    .filter(|t| t.status != TaskStatus::Completed)
                    .count()
            );
            TickOutcome::TimedOut
        } else {
            TickOutcome::Continue
        }
    }

    fn finish(&mut self, phase: RunPhase) {
        self.phase = phase;
        self.epoch = None;
        self.metrics = RunMetrics::compute(&self.tasks, self.elapsed, self.model);
    }

    // ========== Getters for UI ==========

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn model(&self) -> ConcurrencyModel {
        self.model
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Simulated ms observed at the last tick (or at stop)
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn ceiling_ms(&self) -> u64 {
        self.ceiling_ms
    }

    pub fn metrics(&self) -> Option<&RunMetrics> {
        self.metrics.as_ref()
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Whether a task flagged as blocking currently holds the event loop
    pub fn is_event_loop_blocked(&self) -> bool {
        self.model == ConcurrencyModel::EventLoop
            && self
                .tasks
                .iter()
                .any(|t| t.status == TaskStatus::Running && t.def.blocks_event_loop)
    }
}
