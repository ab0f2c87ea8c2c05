//! Memory blocks produced by replaying a scenario

use crate::constants::{ADDRESS_STRIDE, HEAP_ADDRESS_START, STACK_ADDRESS_START};
use std::fmt;

/// Region a block lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heap,
    Stack,
}

/// State of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    Allocated,
    Freed, // Only seen when freed blocks linger for display
    Leaked,
    Garbage,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heap => f.pad("heap"),
            BlockKind::Stack => f.pad("stack"),
        }
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockStatus::Allocated => "allocated",
            BlockStatus::Freed => "freed",
            BlockStatus::Leaked => "leaked",
            BlockStatus::Garbage => "garbage",
        };
        f.pad(label)
    }
}

/// A simulated block of memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    pub id: String,
    pub address: String, // Display only, see `synthetic_address`
    pub size: usize,
    pub kind: BlockKind,
    pub status: BlockStatus,
    pub owner: Option<String>,
    pub ref_count: Option<u32>,
    pub points_to: Option<String>,
    pub allocated_at: usize, // Index of the allocating step
}

impl MemoryBlock {
    pub fn new(id: String, size: usize, kind: BlockKind, allocated_at: usize) -> Self {
        MemoryBlock {
            address: synthetic_address(kind, allocated_at),
            id,
            size,
            kind,
            status: BlockStatus::Allocated,
            owner: None,
            ref_count: None,
            points_to: None,
            allocated_at,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.status, BlockStatus::Allocated | BlockStatus::Garbage)
    }
}

/// Address shown for a block allocated by the step at `step_index`.
///
/// Derived only from the region and the step index so the same replay always
/// shows the same addresses. Heap addresses grow up, stack addresses grow down.
pub fn synthetic_address(kind: BlockKind, step_index: usize) -> String {
    let offset = step_index as u64 * ADDRESS_STRIDE;
    let addr = match kind {
        BlockKind::Heap => HEAP_ADDRESS_START + offset,
        BlockKind::Stack => STACK_ADDRESS_START.saturating_sub(offset),
    };
    format!("0x{:08x}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_addresses_grow_up() {
        assert_eq!(synthetic_address(BlockKind::Heap, 0), "0x10000000");
        assert_eq!(synthetic_address(BlockKind::Heap, 2), "0x10000080");
    }

    #[test]
    fn stack_addresses_grow_down() {
        assert_eq!(synthetic_address(BlockKind::Stack, 0), "0x7ffff000");
        assert_eq!(synthetic_address(BlockKind::Stack, 1), "0x7fffefc0");
    }

    #[test]
    fn same_step_same_address() {
        let a = MemoryBlock::new("a".into(), 8, BlockKind::Heap, 5);
        let b = MemoryBlock::new("b".into(), 16, BlockKind::Heap, 5);
        assert_eq!(a.address, b.address);
    }
}
