//! Pure-fold reconstruction of memory state
//!
//! [`reconstruct`] replays a step list from the beginning up to and including
//! a target index. Nothing is cached between calls: the result for a given
//! `(steps, target, language)` is always the same, regardless of which
//! indices were visited before.
//!
//! Steps that name a block which is not in the working set are skipped. This
//! keeps scenarios with a bad block id viewable instead of aborting the replay.

use super::block::{BlockKind, BlockStatus, MemoryBlock};
use crate::scenario::{Language, MemoryAction, MemoryStep};
use rustc_hash::FxHashMap;

/// Knobs for a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Keep a block freed by the target step in the output, marked
    /// [`BlockStatus::Freed`], so the UI can show it disappearing.
    /// It is gone at every later index.
    pub linger_freed: bool,
}

/// Materialized memory after replaying a prefix of a step list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryState {
    /// Blocks in allocation order
    pub blocks: Vec<MemoryBlock>,
    /// Index of the last replayed step (`None` for an empty step list)
    pub step_index: Option<usize>,
    pub line_number: Option<u32>,
    pub label: Option<String>,
    pub scope_depth: usize,
}

impl MemoryState {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: &str) -> Option<&MemoryBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn heap_blocks(&self) -> impl Iterator<Item = &MemoryBlock> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Heap)
    }

    pub fn stack_blocks(&self) -> impl Iterator<Item = &MemoryBlock> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Stack)
    }

    /// Bytes held by live blocks of one region
    pub fn live_bytes(&self, kind: BlockKind) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.kind == kind && b.is_live())
            .map(|b| b.size)
            .sum()
    }

    pub fn leaked_bytes(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.status == BlockStatus::Leaked)
            .map(|b| b.size)
            .sum()
    }
}

/// Replay `steps[0..=target]` for `language` with default options.
///
/// `target` past the end is clamped to the last step.
pub fn reconstruct(steps: &[MemoryStep], target: usize, language: Language) -> MemoryState {
    reconstruct_with(steps, target, language, ReplayOptions::default())
}

pub fn reconstruct_with(
    steps: &[MemoryStep],
    target: usize,
    language: Language,
    options: ReplayOptions,
) -> MemoryState {
    let Some(last) = steps.len().checked_sub(1) else {
        return MemoryState::default();
    };
    let target = target.min(last);

    let mut replay = Replay::new(language.uses_reference_counting());
    for (index, step) in steps[..=target].iter().enumerate() {
        let linger = options.linger_freed && index == target;
        replay.apply(index, step, linger);
    }

    let step = &steps[target];
    MemoryState {
        blocks: replay.into_blocks(),
        step_index: Some(target),
        line_number: Some(step.line_number),
        label: step.label.clone(),
        scope_depth: replay_scope_depth(&steps[..=target]),
    }
}

fn replay_scope_depth(steps: &[MemoryStep]) -> usize {
    steps.iter().fold(0usize, |depth, step| match step.action {
        MemoryAction::ScopeEnter => depth + 1,
        MemoryAction::ScopeExit => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Working set for one fold
struct Replay {
    blocks: Vec<MemoryBlock>,
    slots: FxHashMap<String, usize>, // Block id -> position in `blocks`
    ref_counted: bool,
}

impl Replay {
    fn new(ref_counted: bool) -> Self {
        Replay {
            blocks: Vec::new(),
            slots: FxHashMap::default(),
            ref_counted,
        }
    }

    fn into_blocks(self) -> Vec<MemoryBlock> {
        self.blocks
    }

    fn apply(&mut self, index: usize, step: &MemoryStep, linger: bool) {
        let id = step.block_id.as_deref();

        match step.action {
            MemoryAction::AllocateHeap => self.allocate(index, step, BlockKind::Heap),
            MemoryAction::AllocateStack => self.allocate(index, step, BlockKind::Stack),
            MemoryAction::Free => {
                if linger {
                    self.update(index, id, |b| {
                        if b.status != BlockStatus::Leaked {
                            b.status = BlockStatus::Freed;
                        }
                    });
                } else {
                    self.remove(index, id);
                }
            }
            MemoryAction::Leak => self.update(index, id, |b| b.status = BlockStatus::Leaked),
            MemoryAction::TransferOwnership => {
                let target = step.target_owner.clone();
                self.update(index, id, |b| b.owner = target);
            }
            MemoryAction::AddReference => self.update(index, id, |b| {
                if let Some(count) = b.ref_count.as_mut() {
                    *count += 1;
                }
            }),
            MemoryAction::RemoveReference => {
                let mut collect = false;
                self.update(index, id, |b| {
                    if b.status == BlockStatus::Leaked {
                        return;
                    }
                    if let Some(count) = b.ref_count.as_mut() {
                        *count = count.saturating_sub(1);
                        collect = *count == 0;
                    }
                });
                if collect {
                    log::trace!("step {}: reference count of {:?} reached zero", index, id);
                    self.remove(index, id);
                }
            }
            MemoryAction::GcMark => self.update(index, id, |b| {
                if b.status != BlockStatus::Leaked {
                    b.status = BlockStatus::Garbage;
                }
            }),
            MemoryAction::GcSweep => self.sweep(),
            MemoryAction::ScopeEnter | MemoryAction::ScopeExit => {}
        }
    }

    fn allocate(&mut self, index: usize, step: &MemoryStep, kind: BlockKind) {
        let Some(id) = step.block_id.clone() else {
            log::trace!("step {}: allocation without a block id skipped", index);
            return;
        };

        let mut block = MemoryBlock::new(id.clone(), step.block_size.unwrap_or(0), kind, index);
        block.owner = step.owner.clone();
        block.points_to = step.points_to.clone();
        if self.ref_counted {
            block.ref_count = Some(1);
        }

        match self.slots.get(&id) {
            Some(&slot) if self.blocks[slot].status == BlockStatus::Leaked => {
                log::trace!("step {}: {} is leaked, allocation skipped", index, id);
            }
            // Ids stay unique: a second allocation under a live id replaces it
            Some(&slot) => self.blocks[slot] = block,
            None => {
                self.slots.insert(id, self.blocks.len());
                self.blocks.push(block);
            }
        }
    }

    fn update<F>(&mut self, index: usize, id: Option<&str>, f: F)
    where
        F: FnOnce(&mut MemoryBlock),
    {
        match id.and_then(|id| self.slots.get(id)) {
            Some(&slot) => f(&mut self.blocks[slot]),
            None => log::trace!("step {}: no block {:?}, step ignored", index, id),
        }
    }

    fn remove(&mut self, index: usize, id: Option<&str>) {
        match id.and_then(|id| self.slots.get(id).copied()) {
            // Leaked blocks are never reclaimed
            Some(slot) if self.blocks[slot].status == BlockStatus::Leaked => {
                log::trace!("step {}: {:?} is leaked and stays", index, id);
            }
            Some(slot) => {
                self.blocks.remove(slot);
                self.reindex();
            }
            None => log::trace!("step {}: no block {:?} to remove", index, id),
        }
    }

    fn sweep(&mut self) {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.status != BlockStatus::Garbage);
        if self.blocks.len() != before {
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        self.slots.clear();
        for (slot, block) in self.blocks.iter().enumerate() {
            self.slots.insert(block.id.clone(), slot);
        }
    }
}
