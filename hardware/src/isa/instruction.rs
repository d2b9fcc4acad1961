//! Instruction records.
//!
//! A [`DecodedInst`] is what the frontend hands to the dispatcher. A
//! [`FilledInst`] is the same instruction after rename: it carries a
//! reorder-buffer tag and its operands either as final values (`v_*`) or as
//! the tags of their in-flight producers (`q_*`). An operand value is only
//! meaningful while its tag slot is the sentinel.

use crate::common::RobId;

/// The RV32I integer operations recognized by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Op {
    // R-type
    Add,
    Sub,
    Or,
    Xor,
    And,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,

    // I-type ALU
    Addi,
    Andi,
    Ori,
    Xori,
    Slli,
    Srli,
    Srai,
    Slti,
    Sltiu,

    // I-type loads
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,

    // I-type jump
    Jalr,

    // S-type
    Sb,
    Sh,
    Sw,

    // B-type
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,

    // U-type
    Lui,
    Auipc,

    // J-type
    Jal,

    /// Unrecognized encoding. Fatal if it reaches the reorder-buffer head.
    #[default]
    Invalid,
}

impl Op {
    /// Operations executed by the ALU.
    pub fn is_alu(self) -> bool {
        matches!(
            self,
            Op::Add
                | Op::Sub
                | Op::Or
                | Op::Xor
                | Op::And
                | Op::Sll
                | Op::Srl
                | Op::Sra
                | Op::Slt
                | Op::Sltu
                | Op::Addi
                | Op::Andi
                | Op::Ori
                | Op::Xori
                | Op::Slli
                | Op::Srli
                | Op::Srai
                | Op::Slti
                | Op::Sltiu
                | Op::Lui
                | Op::Auipc
        )
    }

    /// Operations routed through the memory subsystem.
    pub fn is_mem(self) -> bool {
        self.is_load() || self.is_store()
    }

    pub fn is_load(self) -> bool {
        matches!(self, Op::Lb | Op::Lh | Op::Lw | Op::Lbu | Op::Lhu)
    }

    pub fn is_store(self) -> bool {
        matches!(self, Op::Sb | Op::Sh | Op::Sw)
    }

    /// Operations resolved by the branch unit (conditional and jumps).
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Op::Beq | Op::Bne | Op::Blt | Op::Bge | Op::Bltu | Op::Bgeu | Op::Jal | Op::Jalr
        )
    }

    /// Conditional branches write no destination register.
    pub fn is_cond_branch(self) -> bool {
        matches!(self, Op::Beq | Op::Bne | Op::Blt | Op::Bge | Op::Bltu | Op::Bgeu)
    }
}

/// An instruction as produced by the decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodedInst {
    pub op: Op,
    pub pc: u32,
    pub rd: u8,
    pub rs1: u8,
    pub rs2: u8,
    /// Sign-extended immediate (shift amounts and U-type values pre-shifted).
    pub imm: i32,
    pub is_branch: bool,
    pub predicted_taken: bool,
}

impl DecodedInst {
    /// True for the HALT sentinel `addi x10, x0, 255`.
    pub fn is_halt(&self) -> bool {
        self.op == Op::Addi && self.rd == 10 && self.rs1 == 0 && self.imm == 255
    }
}

/// A decoded instruction after rename.
///
/// `q_rs1`/`q_rs2` name the producers still owed; once a slot is
/// [`RobId::NONE`] the matching `v_` field holds the final operand value.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilledInst {
    pub inst: DecodedInst,
    pub id: RobId,
    pub v_rs1: u32,
    pub v_rs2: u32,
    pub q_rs1: RobId,
    pub q_rs2: RobId,
}

impl FilledInst {
    /// Both operands captured; the instruction may issue.
    pub fn ready(&self) -> bool {
        self.q_rs1.is_none() && self.q_rs2.is_none()
    }
}
