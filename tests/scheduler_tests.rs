use runtimelab::scenario::{ConcurrencyModel, MemoryOverhead, TaskDefinition, TaskKind};
use runtimelab::scheduler::{
    efficiency, ConcurrencySim, ManualClock, RunPhase, TaskStatus, TickOutcome,
};

fn web_tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition::new("a", "A", 200, TaskKind::Network),
        TaskDefinition::new("b", "B", 150, TaskKind::Io),
        TaskDefinition::new("c", "C", 2000, TaskKind::Cpu).blocking(),
    ]
}

fn many_tasks(count: usize) -> Vec<TaskDefinition> {
    (0..count)
        .map(|i| {
            TaskDefinition::new(
                &format!("t{}", i),
                &format!("Task {}", i),
                100 + 37 * i as u64,
                TaskKind::Io,
            )
        })
        .collect()
}

/// Drive a run with `tick_ms` steps, calling `observe` after every tick
fn drive<F>(sim: &mut ConcurrencySim, tick_ms: u64, mut observe: F) -> TickOutcome
where
    F: FnMut(&ConcurrencySim),
{
    let clock = ManualClock::new();
    sim.start(&clock);
    loop {
        let outcome = sim.tick(&clock);
        observe(sim);
        if outcome != TickOutcome::Continue {
            return outcome;
        }
        clock.advance(tick_ms);
    }
}

#[test]
fn test_event_loop_example_serializes() {
    let mut sim = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::EventLoop, 4);
    assert_eq!(sim.lanes(), 1);

    let metrics = sim.run_to_completion(10).cloned().expect("metrics");
    assert_eq!(metrics.total_time, 2350);
    assert_eq!(metrics.efficiency, 85);
    assert_eq!(metrics.memory_overhead, MemoryOverhead::Minimal);
    assert_eq!(metrics.completed, 3);
    assert_eq!(sim.phase(), RunPhase::Finished);

    let starts: Vec<Option<u64>> = sim.tasks().iter().map(|t| t.start_time).collect();
    assert_eq!(starts, vec![Some(0), Some(200), Some(350)]);
}

#[test]
fn test_threads_example_runs_in_parallel() {
    let mut sim = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::Threads, 4);
    let lanes: Vec<usize> = sim.tasks().iter().map(|t| t.lane).collect();
    assert_eq!(lanes, vec![0, 1, 2]);

    let metrics = sim.run_to_completion(10).cloned().expect("metrics");
    assert_eq!(metrics.total_time, 2000);
    assert_eq!(metrics.efficiency, 100);
    assert_eq!(metrics.memory_overhead, MemoryOverhead::High);
}

#[test]
fn test_event_loop_never_runs_two_tasks() {
    let mut sim = ConcurrencySim::new(&many_tasks(6), ConcurrencyModel::EventLoop, 4);
    let outcome = drive(&mut sim, 7, |s| {
        assert!(s.count(TaskStatus::Running) <= 1);
    });
    assert_eq!(outcome, TickOutcome::Finished);
}

#[test]
fn test_lane_bound_models_keep_lanes_exclusive() {
    for model in [
        ConcurrencyModel::Threads,
        ConcurrencyModel::AsyncAwait,
        ConcurrencyModel::Multiprocessing,
    ] {
        let mut sim = ConcurrencySim::new(&many_tasks(7), model, 2);
        let outcome = drive(&mut sim, 5, |s| {
            for lane in 0..s.lanes() {
                let running = s
                    .tasks()
                    .iter()
                    .filter(|t| t.lane == lane && t.status == TaskStatus::Running)
                    .count();
                assert!(running <= 1, "{} lane {} has {} running", model, lane, running);
            }
        });
        assert_eq!(outcome, TickOutcome::Finished);
    }
}

#[test]
fn test_goroutines_admit_everything_at_once() {
    let mut sim = ConcurrencySim::new(&many_tasks(8), ConcurrencyModel::Goroutines, 4);
    let clock = ManualClock::new();
    sim.start(&clock);
    assert_eq!(sim.tick(&clock), TickOutcome::Continue);
    assert_eq!(sim.count(TaskStatus::Running), 8);
    assert!(sim.tasks().iter().all(|t| t.start_time == Some(0)));

    let metrics = sim.run_to_completion(1).cloned().expect("metrics");
    assert_eq!(metrics.total_time, 100 + 37 * 7);
    assert_eq!(metrics.efficiency, 100);
}

#[test]
fn test_task_lifecycle_is_monotonic() {
    for model in ConcurrencyModel::ALL {
        let mut sim = ConcurrencySim::new(&many_tasks(5), model, 2);
        let mut last_rank = vec![0u8; 5];
        let mut last_start = vec![None; 5];
        drive(&mut sim, 3, |s| {
            for (i, task) in s.tasks().iter().enumerate() {
                let rank = task.status.rank();
                assert!(rank >= last_rank[i], "{} went backwards under {}", task.id(), model);
                if last_start[i].is_some() {
                    assert_eq!(task.start_time, last_start[i]);
                }
                last_rank[i] = rank;
                last_start[i] = task.start_time;
            }
        });
        assert!(sim.tasks().iter().all(|t| t.status == TaskStatus::Completed));
        assert!(sim.tasks().iter().all(|t| t.end_time.is_some()));
    }
}

#[test]
fn test_efficiency_stays_in_bounds() {
    assert_eq!(efficiency(2000, 2350), 85);
    assert_eq!(efficiency(5000, 100), 100);
    assert_eq!(efficiency(0, 100), 0);
    assert_eq!(efficiency(10, 0), 100);
    for total in [1u64, 7, 350, 2350, 30_000] {
        for best in [0u64, 1, 200, 2000, 40_000] {
            assert!(efficiency(best, total) <= 100);
        }
    }
}

#[test]
fn test_zero_tasks_finish_without_metrics() {
    let mut sim = ConcurrencySim::new(&[], ConcurrencyModel::Threads, 4);
    let clock = ManualClock::new();
    sim.start(&clock);
    assert_eq!(sim.phase(), RunPhase::Finished);
    assert!(sim.metrics().is_none());
    assert_eq!(sim.tick(&clock), TickOutcome::Inactive);
}

#[test]
fn test_zero_duration_task_completes_next_tick() {
    let defs = vec![TaskDefinition::new("z", "Zero", 0, TaskKind::Cpu)];
    let mut sim = ConcurrencySim::new(&defs, ConcurrencyModel::EventLoop, 1);
    let clock = ManualClock::new();
    sim.start(&clock);

    assert_eq!(sim.tick(&clock), TickOutcome::Continue);
    assert_eq!(sim.tasks()[0].status, TaskStatus::Running);
    assert_eq!(sim.tick(&clock), TickOutcome::Finished);
    assert_eq!(sim.metrics().map(|m| m.total_time), Some(0));
    assert_eq!(sim.metrics().map(|m| m.efficiency), Some(100));
}

#[test]
fn test_ceiling_stops_run_and_keeps_metrics() {
    let defs = vec![TaskDefinition::new("slow", "Slow", 500, TaskKind::Cpu)];
    let mut sim = ConcurrencySim::new(&defs, ConcurrencyModel::Threads, 1).with_ceiling(100);

    let metrics = sim.run_to_completion(10).cloned().expect("metrics");
    assert_eq!(sim.phase(), RunPhase::TimedOut);
    assert_eq!(metrics.total_time, 110);
    assert_eq!(metrics.completed, 0);
    assert_eq!(metrics.total, 1);
    assert!(metrics.efficiency <= 100);
    assert_eq!(sim.tasks()[0].status, TaskStatus::Running);
}

#[test]
fn test_ceiling_is_only_hit_once_exceeded() {
    let defs = vec![TaskDefinition::new("slow", "Slow", 500, TaskKind::Cpu)];
    let mut sim = ConcurrencySim::new(&defs, ConcurrencyModel::Threads, 1).with_ceiling(100);
    let clock = ManualClock::new();
    sim.start(&clock);

    clock.set(100);
    assert_eq!(sim.tick(&clock), TickOutcome::Continue);
    assert_eq!(sim.phase(), RunPhase::Running);

    clock.set(101);
    assert_eq!(sim.tick(&clock), TickOutcome::TimedOut);
    assert_eq!(sim.metrics().map(|m| m.total_time), Some(101));
}

#[test]
fn test_stop_then_start_resumes_simulated_time() {
    let mut sim = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::EventLoop, 1);
    let clock = ManualClock::new();
    sim.start(&clock);
    sim.tick(&clock);
    clock.set(150);
    sim.tick(&clock);
    sim.stop(&clock);
    assert_eq!(sim.phase(), RunPhase::Stopped);
    assert_eq!(sim.elapsed(), 150);

    // Ticks while stopped do nothing, wall time passing is not counted
    clock.set(5_000);
    assert_eq!(sim.tick(&clock), TickOutcome::Inactive);
    assert_eq!(sim.tasks()[0].status, TaskStatus::Running);

    sim.start(&clock);
    clock.set(5_050);
    sim.tick(&clock);
    assert_eq!(sim.elapsed(), 200);
    assert_eq!(sim.tasks()[0].status, TaskStatus::Completed);
    assert_eq!(sim.tasks()[0].end_time, Some(200));
}

#[test]
fn test_reset_returns_everything_to_queued() {
    let mut sim = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::Goroutines, 4);
    sim.run_to_completion(10);
    assert_eq!(sim.phase(), RunPhase::Finished);

    // A finished run ignores start until reset
    let clock = ManualClock::new();
    sim.start(&clock);
    assert_eq!(sim.phase(), RunPhase::Finished);

    sim.reset();
    assert_eq!(sim.phase(), RunPhase::Idle);
    assert_eq!(sim.elapsed(), 0);
    assert!(sim.metrics().is_none());
    for task in sim.tasks() {
        assert_eq!(task.status, TaskStatus::Queued);
        assert_eq!(task.start_time, None);
        assert_eq!(task.end_time, None);
    }

    let metrics = sim.run_to_completion(10).cloned().expect("metrics");
    assert_eq!(metrics.total_time, 2000);
}

#[test]
fn test_event_loop_blocked_flag() {
    let mut sim = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::EventLoop, 1);
    let clock = ManualClock::new();
    sim.start(&clock);
    sim.tick(&clock);
    assert!(!sim.is_event_loop_blocked());

    for t in [200, 350] {
        clock.set(t);
        sim.tick(&clock);
    }
    assert_eq!(sim.tasks()[2].status, TaskStatus::Running);
    assert!(sim.is_event_loop_blocked());

    let mut threads = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::Threads, 4);
    threads.start(&clock);
    threads.tick(&clock);
    assert!(!threads.is_event_loop_blocked());
}

#[test]
fn test_idle_run_does_not_tick() {
    let mut sim = ConcurrencySim::new(&web_tasks(), ConcurrencyModel::Threads, 4);
    let clock = ManualClock::new();
    assert_eq!(sim.tick(&clock), TickOutcome::Inactive);
    assert_eq!(sim.count(TaskStatus::Queued), 3);
}
