//! Instruction Set Architecture definitions and decoding.
//!
//! Implements the RV32I base integer subset recognized by the core:
//! opcode/funct constants, the decoded and filled instruction records, and
//! the binary decoder that maps 32-bit little-endian words onto them.

/// ABI register index names.
pub mod abi;

/// RV32I binary decoder.
pub mod decode;

/// Instruction records and operation classification.
pub mod instruction;

/// Major opcode and funct-field constants.
pub mod opcodes;

pub use decode::decode;
pub use instruction::{DecodedInst, FilledInst, Op};
