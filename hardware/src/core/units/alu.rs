//! Arithmetic Logic Unit.
//!
//! Single-cycle, single-issue. The execute stage pulls one filled
//! instruction per cycle from the ALU reservation station's output channel
//! and posts `(tag, result)` on the ALU's CDB producer channel.
//!
//! AUIPC reaches the ALU with the instruction's `pc` already substituted
//! into `v_rs1` by the dispatcher, so every operation here is a pure
//! function of operand data.

use crate::isa::{FilledInst, Op};

/// Computes the result of an integer operation.
///
/// All arithmetic wraps at 32 bits; shift amounts are masked to 5 bits.
pub fn evaluate(inst: &FilledInst) -> u32 {
    let a = inst.v_rs1;
    let b = inst.v_rs2;
    let imm = inst.inst.imm;

    match inst.inst.op {
        // R-type
        Op::Add => a.wrapping_add(b),
        Op::Sub => a.wrapping_sub(b),
        Op::And => a & b,
        Op::Or => a | b,
        Op::Xor => a ^ b,
        Op::Sll => a.wrapping_shl(b & 0x1f),
        Op::Srl => a.wrapping_shr(b & 0x1f),
        Op::Sra => ((a as i32) >> (b & 0x1f)) as u32,
        Op::Slt => ((a as i32) < (b as i32)) as u32,
        Op::Sltu => (a < b) as u32,

        // I-type
        Op::Addi => a.wrapping_add(imm as u32),
        Op::Andi => a & imm as u32,
        Op::Ori => a | imm as u32,
        Op::Xori => a ^ imm as u32,
        Op::Slli => a.wrapping_shl(imm as u32 & 0x1f),
        Op::Srli => a.wrapping_shr(imm as u32 & 0x1f),
        Op::Srai => ((a as i32) >> (imm & 0x1f)) as u32,
        Op::Slti => ((a as i32) < imm) as u32,
        Op::Sltiu => (a < imm as u32) as u32,

        // U-type; the decoder pre-shifted the immediate, and for AUIPC the
        // dispatcher routed `pc` through v_rs1.
        Op::Lui => imm as u32,
        Op::Auipc => a.wrapping_add(imm as u32),

        _ => {
            log::warn!("alu: unsupported op {:?} (id={})", inst.inst.op, inst.id);
            0
        }
    }
}
