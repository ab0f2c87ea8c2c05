// Constants for the simulators

/// Starting address for synthetic heap addresses
/// Heap addresses start at 0x10000000 to clearly distinguish them from stack addresses
pub const HEAP_ADDRESS_START: u64 = 0x1000_0000;

/// Starting address for synthetic stack addresses (the stack grows downward)
pub const STACK_ADDRESS_START: u64 = 0x7fff_f000;

/// Distance between the synthetic addresses of two consecutive steps
pub const ADDRESS_STRIDE: u64 = 0x40;

/// Hard ceiling on simulated time for one concurrency run, in milliseconds.
/// A run times out on the first tick past it; a tick landing exactly on it still continues.
pub const SIMULATION_CEILING_MS: u64 = 30_000;

/// Lane count for every lane-bound model unless a scenario overrides it
pub const DEFAULT_LANE_COUNT: usize = 4;

/// Tick length used by headless concurrency reports
pub const DEFAULT_TICK_MS: u64 = 10;

/// How long the TUI waits for a key event before redrawing
pub const FRAME_POLL_MS: u64 = 16;

/// Delay between two steps while the memory view auto-plays
pub const PLAY_INTERVAL_MS: u64 = 1_000;
