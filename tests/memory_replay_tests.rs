use runtimelab::memory::{
    reconstruct, reconstruct_with, BlockKind, BlockStatus, MemoryState, ReplayOptions,
};
use runtimelab::scenario::{Language, MemoryAction as A, MemoryStep as S, ScenarioCatalog};

fn ids(state: &MemoryState) -> Vec<&str> {
    state.blocks.iter().map(|b| b.id.as_str()).collect()
}

fn leak_steps() -> Vec<S> {
    vec![
        S::new(1, A::AllocateHeap).block("b1").size(400),
        S::new(2, A::ScopeEnter),
        S::new(3, A::Leak).block("b1"),
    ]
}

#[test]
fn test_leak_example() {
    let steps = leak_steps();

    let at_leak = reconstruct(&steps, 2, Language::C);
    assert_eq!(at_leak.blocks.len(), 1);
    assert_eq!(at_leak.blocks[0].id, "b1");
    assert_eq!(at_leak.blocks[0].status, BlockStatus::Leaked);
    assert_eq!(at_leak.blocks[0].size, 400);

    let at_alloc = reconstruct(&steps, 0, Language::C);
    assert_eq!(at_alloc.blocks.len(), 1);
    assert_eq!(at_alloc.blocks[0].status, BlockStatus::Allocated);
}

#[test]
fn test_reconstruction_is_independent_of_history() {
    let catalog = ScenarioCatalog::builtin();
    for scenario in catalog.memory_scenarios() {
        for (language, program) in &scenario.programs {
            for target in 0..program.steps.len() {
                let direct = reconstruct(&program.steps, target, *language);

                // Walk forward to the end, back to 0, then forward to target
                for i in (0..program.steps.len()).chain((0..program.steps.len()).rev()) {
                    reconstruct(&program.steps, i, *language);
                }
                let walked = reconstruct(&program.steps, target, *language);

                assert_eq!(direct, walked, "{} {} @{}", scenario.id, language, target);
            }
        }
    }
}

#[test]
fn test_leaked_block_survives_every_later_step() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("cache").size(64),
        S::new(2, A::Leak).block("cache"),
        S::new(3, A::Free).block("cache"),
        S::new(4, A::RemoveReference).block("cache"),
        S::new(5, A::GcMark).block("cache"),
        S::new(6, A::GcSweep),
        S::new(7, A::AllocateHeap).block("cache").size(8),
    ];

    for language in [Language::C, Language::Python, Language::Go] {
        for target in 1..steps.len() {
            let state = reconstruct(&steps, target, language);
            let block = state.block("cache").expect("leaked block must remain");
            assert_eq!(block.status, BlockStatus::Leaked);
            assert_eq!(block.size, 64);
        }
    }
}

#[test]
fn test_reference_count_never_goes_below_zero() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("obj").size(32),
        S::new(2, A::AddReference).block("obj"),
        S::new(3, A::RemoveReference).block("obj"),
        S::new(4, A::RemoveReference).block("obj"),
        S::new(5, A::RemoveReference).block("obj"),
    ];

    assert_eq!(
        reconstruct(&steps, 1, Language::Python)
            .block("obj")
            .and_then(|b| b.ref_count),
        Some(2)
    );
    assert_eq!(
        reconstruct(&steps, 2, Language::Python)
            .block("obj")
            .and_then(|b| b.ref_count),
        Some(1)
    );
    // Reaching zero removes the block in the same pass
    assert!(reconstruct(&steps, 3, Language::Python).is_empty());
    assert!(reconstruct(&steps, 4, Language::Python).is_empty());
}

#[test]
fn test_ref_count_only_for_refcounted_languages() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("obj").size(32),
        S::new(2, A::RemoveReference).block("obj"),
    ];

    let c = reconstruct(&steps, 1, Language::C);
    assert_eq!(c.block("obj").map(|b| b.ref_count), Some(None));

    let swift = reconstruct(&steps, 0, Language::Swift);
    assert_eq!(swift.block("obj").and_then(|b| b.ref_count), Some(1));
    assert!(reconstruct(&steps, 1, Language::Swift).is_empty());
}

#[test]
fn test_sweep_removes_all_garbage() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("a").size(16),
        S::new(2, A::AllocateHeap).block("b").size(16),
        S::new(3, A::AllocateHeap).block("c").size(16),
        S::new(4, A::GcMark).block("a"),
        S::new(5, A::GcMark).block("c"),
        S::new(6, A::GcSweep),
        S::new(7, A::AllocateHeap).block("d").size(16),
    ];

    let marked = reconstruct(&steps, 4, Language::Java);
    assert_eq!(marked.block("a").map(|b| b.status), Some(BlockStatus::Garbage));
    assert_eq!(marked.block("c").map(|b| b.status), Some(BlockStatus::Garbage));

    for target in 5..steps.len() {
        let state = reconstruct(&steps, target, Language::Java);
        assert!(state.blocks.iter().all(|b| b.status != BlockStatus::Garbage));
    }
    assert_eq!(ids(&reconstruct(&steps, 6, Language::Java)), vec!["b", "d"]);
}

#[test]
fn test_builtin_sweeps_leave_no_garbage() {
    let catalog = ScenarioCatalog::builtin();
    for scenario in catalog.memory_scenarios() {
        for (language, program) in &scenario.programs {
            let Some(sweep) = program.steps.iter().position(|s| s.action == A::GcSweep) else {
                continue;
            };
            for target in sweep..program.steps.len() {
                let state = reconstruct(&program.steps, target, *language);
                assert!(
                    state.blocks.iter().all(|b| b.status != BlockStatus::Garbage),
                    "{} {} @{}",
                    scenario.id,
                    language,
                    target
                );
            }
        }
    }
}

#[test]
fn test_unknown_block_id_is_ignored() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("real").size(10),
        S::new(2, A::Free).block("ghost"),
        S::new(3, A::TransferOwnership).block("ghost").target_owner("x"),
        S::new(4, A::Free),
    ];

    let state = reconstruct(&steps, 3, Language::C);
    assert_eq!(ids(&state), vec!["real"]);
    assert_eq!(state.line_number, Some(4));
}

#[test]
fn test_target_past_end_is_clamped() {
    let steps = leak_steps();
    let state = reconstruct(&steps, 99, Language::C);
    assert_eq!(state.step_index, Some(2));
    assert_eq!(state, reconstruct(&steps, 2, Language::C));
}

#[test]
fn test_empty_steps_give_empty_state() {
    let state = reconstruct(&[], 5, Language::Rust);
    assert!(state.is_empty());
    assert_eq!(state.step_index, None);
    assert_eq!(state.line_number, None);
}

#[test]
fn test_addresses_are_stable_across_replays() {
    let steps = vec![
        S::new(1, A::AllocateStack).block("x").size(4),
        S::new(2, A::AllocateHeap).block("h").size(100),
        S::new(3, A::AllocateStack).block("y").size(4),
    ];

    let first = reconstruct(&steps, 2, Language::C);
    let second = reconstruct(&steps, 2, Language::C);
    assert_eq!(first, second);
    assert_eq!(first.block("x").map(|b| b.address.as_str()), Some("0x7ffff000"));
    assert_eq!(first.block("h").map(|b| b.address.as_str()), Some("0x10000040"));
    assert_eq!(first.block("y").map(|b| b.address.as_str()), Some("0x7fffef80"));
}

#[test]
fn test_transfer_and_free() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("text").size(5).owner("s1"),
        S::new(2, A::TransferOwnership).block("text").target_owner("s2"),
        S::new(3, A::Free).block("text"),
    ];

    let moved = reconstruct(&steps, 1, Language::Rust);
    assert_eq!(moved.block("text").and_then(|b| b.owner.as_deref()), Some("s2"));
    assert!(reconstruct(&steps, 2, Language::Rust).is_empty());
}

#[test]
fn test_linger_freed_shows_block_only_at_free_step() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("buf").size(8),
        S::new(2, A::Free).block("buf"),
        S::new(3, A::ScopeExit),
    ];
    let options = ReplayOptions { linger_freed: true };

    let at_free = reconstruct_with(&steps, 1, Language::C, options);
    assert_eq!(at_free.block("buf").map(|b| b.status), Some(BlockStatus::Freed));
    assert_eq!(at_free.live_bytes(BlockKind::Heap), 0);

    assert!(reconstruct_with(&steps, 2, Language::C, options).is_empty());
    assert!(reconstruct(&steps, 1, Language::C).is_empty());
}

#[test]
fn test_linger_does_not_mark_leaked_block_freed() {
    let steps = vec![
        S::new(1, A::AllocateHeap).block("b1").size(400),
        S::new(2, A::Leak).block("b1"),
        S::new(3, A::Free).block("b1"),
    ];
    let options = ReplayOptions { linger_freed: true };

    let state = reconstruct_with(&steps, 2, Language::C, options);
    assert_eq!(state.block("b1").map(|b| b.status), Some(BlockStatus::Leaked));
    assert_eq!(state.leaked_bytes(), 400);
}

#[test]
fn test_scope_depth_and_byte_totals() {
    let catalog = ScenarioCatalog::builtin();
    let program = catalog
        .memory_scenario("stack-vs-heap")
        .and_then(|s| s.program(Language::C))
        .expect("builtin C program");

    let state = reconstruct(&program.steps, 3, Language::C);
    assert_eq!(state.scope_depth, 1);
    assert_eq!(state.live_bytes(BlockKind::Stack), 12);
    assert_eq!(state.live_bytes(BlockKind::Heap), 400);

    let end = reconstruct(&program.steps, program.steps.len() - 1, Language::C);
    assert!(end.is_empty());
    assert_eq!(end.scope_depth, 0);
}

#[test]
fn test_builtin_c_leak_scenario() {
    let catalog = ScenarioCatalog::builtin();
    let program = catalog
        .memory_scenario("memory-leak")
        .and_then(|s| s.program(Language::C))
        .expect("builtin C program");

    let end = reconstruct(&program.steps, program.steps.len() - 1, Language::C);
    assert_eq!(ids(&end), vec!["cache"]);
    assert_eq!(end.leaked_bytes(), 400);
}
