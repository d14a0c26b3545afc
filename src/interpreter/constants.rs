// Constants for the interpreter

/// Iterations a single loop may run before the run is aborted
pub const MAX_LOOP_ITERATIONS: usize = 10_000;

/// Statements a whole run may execute
pub const MAX_STEPS: usize = 100_000;

/// Nested user function calls, `main` included
pub const MAX_CALL_DEPTH: usize = 200;

/// Bytes charged to the memory estimate for every call frame
pub const FRAME_OVERHEAD_BYTES: usize = 16;

/// Largest value `rand()` returns
pub const RAND_MAX: i64 = 32_767;

/// Seed `rand()` uses until `srand()` is called
pub const DEFAULT_RAND_SEED: u32 = 1;

/// Free native stack below which a user call moves onto a fresh segment
pub const STACK_RED_ZONE: usize = 256 * 1024;

/// Size of each extra native stack segment
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;
