//! Architectural constants.
//!
//! These are the default sizes of every bounded structure in the core and
//! the latency of the memory unit. The configuration file may override the
//! runtime copies; these values are the contract defaults.

/// Size of the unified byte-addressed memory (1 MiB).
pub const MEMORY_SIZE: usize = 1024 * 1024;

/// Fixed latency of the memory unit, in cycles.
pub const MEMORY_LATENCY: u32 = 3;

/// Number of architectural registers (x0-x31).
pub const REG_COUNT: usize = 32;

/// Reorder buffer depth.
pub const ROB_SIZE: usize = 32;

/// ALU reservation station depth.
pub const RS_ALU_SIZE: usize = 32;

/// Branch reservation station depth.
pub const RS_BRANCH_SIZE: usize = 32;

/// Memory reservation station depth.
pub const RS_MEM_SIZE: usize = 32;

/// Memory-order buffer depth.
pub const MOB_SIZE: usize = 32;

/// The HALT sentinel encoding: `addi x10, x0, 255`.
///
/// When this instruction commits, the simulator prints `a0 & 0xff` and stops.
pub const HALT_WORD: u32 = 0x0FF0_0513;
