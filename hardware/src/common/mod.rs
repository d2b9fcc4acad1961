//! Common utilities and types used throughout the out-of-order core simulator.
//!
//! This module provides the fundamental types for reorder-buffer tags,
//! little-endian byte conversion, error handling, and the architectural
//! constants that are shared across different components of the simulator.

/// Architectural constants (memory size, buffer depths, latencies).
pub mod constants;

/// Core identifier types and little-endian byte helpers.
pub mod data;

/// Simulator error types.
pub mod error;

pub use data::{bytes_to_int, bytes_to_uint, uint_to_bytes, RobId};
pub use error::SimError;
