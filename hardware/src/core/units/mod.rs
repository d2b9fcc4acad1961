//! Functional units: ALU, branch unit, and the memory unit.

/// Integer ALU.
pub mod alu;

/// Branch resolution unit.
pub mod branch;

/// Memory unit with fixed access latency.
pub mod memory;
