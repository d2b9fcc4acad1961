//! Simulator error types.
//!
//! Only fatal conditions surface as errors. Structural hazards (a full
//! buffer, a busy channel) are modeled as stalls and never reach this type;
//! out-of-bounds data accesses are logged and recovered per component.

use std::error::Error;
use std::fmt;

/// Fatal simulation errors.
///
/// Any of these aborts the run with a diagnostic. User-visible output on
/// stdout remains the single line produced at HALT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// An unrecognized instruction encoding reached the reorder-buffer head.
    ///
    /// Carries the program counter of the faulting word.
    InvalidInstruction(u32),

    /// An allocation was attempted on a full reorder buffer.
    ///
    /// The dispatcher's stall check makes this unreachable; hitting it means
    /// an internal invariant was violated.
    RobOverflow,

    /// The cycle limit was reached without committing the HALT sentinel.
    CycleLimit(u64),

    /// The memory image could not be parsed.
    ///
    /// Carries the offending line and a description.
    BadImage(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInstruction(pc) => {
                write!(f, "invalid instruction committed at pc {:#010x}", pc)
            }
            SimError::RobOverflow => write!(f, "allocation into a full reorder buffer"),
            SimError::CycleLimit(n) => {
                write!(f, "no HALT after {} cycles; giving up", n)
            }
            SimError::BadImage(msg) => write!(f, "bad memory image: {}", msg),
        }
    }
}

impl Error for SimError {}
