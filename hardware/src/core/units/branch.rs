//! Branch resolution unit.
//!
//! Resolves the direction and target of conditional branches and jumps as a
//! pure function of operand data. The execute stage forwards the resolution
//! to the committer over the branch-result channel and, for JAL/JALR, posts
//! the link address `pc + 4` on the branch unit's CDB producer channel so
//! the reorder buffer learns the value destined for `rd`.

use crate::common::RobId;
use crate::isa::{FilledInst, Op};

/// A resolved branch: actual direction and target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchResult {
    pub id: RobId,
    pub taken: bool,
    pub target_pc: u32,
}

/// Evaluates a branch instruction.
pub fn resolve(inst: &FilledInst) -> BranchResult {
    let a = inst.v_rs1;
    let b = inst.v_rs2;
    let imm = inst.inst.imm;
    let pc = inst.inst.pc;

    let taken = match inst.inst.op {
        Op::Beq => a == b,
        Op::Bne => a != b,
        Op::Blt => (a as i32) < (b as i32),
        Op::Bge => (a as i32) >= (b as i32),
        Op::Bltu => a < b,
        Op::Bgeu => a >= b,
        Op::Jal | Op::Jalr => true,
        op => {
            log::warn!("branch: non-branch op {:?} (id={})", op, inst.id);
            false
        }
    };

    let target_pc = match inst.inst.op {
        // JALR computes an indirect target with the low bit forced clear.
        Op::Jalr => a.wrapping_add(imm as u32) & !1,
        _ => pc.wrapping_add(imm as u32),
    };

    BranchResult {
        id: inst.id,
        taken,
        target_pc,
    }
}

/// The link value JAL/JALR write to their destination register.
pub fn link_value(inst: &FilledInst) -> u32 {
    inst.inst.pc.wrapping_add(4)
}
