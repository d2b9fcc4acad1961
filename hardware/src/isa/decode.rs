//! RV32I binary decoder.
//!
//! Maps a 32-bit little-endian instruction word onto a [`DecodedInst`].
//! Immediates come out sign-extended; U-type immediates keep their
//! pre-shifted position and I-type shifts take the 5-bit shamt from the rs2
//! field. Anything unrecognized decodes to [`Op::Invalid`].

use super::instruction::{DecodedInst, Op};
use super::opcodes::{self, funct3, funct7};

/// Decodes one instruction word fetched at `pc`.
pub fn decode(word: u32, pc: u32) -> DecodedInst {
    let opcode = word & 0x7f;
    let rd = ((word >> 7) & 0x1f) as u8;
    let f3 = (word >> 12) & 0x7;
    let rs1 = ((word >> 15) & 0x1f) as u8;
    let rs2 = ((word >> 20) & 0x1f) as u8;
    let f7 = (word >> 25) & 0x7f;

    let mut d = DecodedInst {
        pc,
        ..Default::default()
    };

    match opcode {
        opcodes::OP_LUI => {
            d.op = Op::Lui;
            d.rd = rd;
            d.imm = (word & 0xffff_f000) as i32;
        }
        opcodes::OP_AUIPC => {
            d.op = Op::Auipc;
            d.rd = rd;
            d.imm = (word & 0xffff_f000) as i32;
        }
        opcodes::OP_JAL => {
            d.op = Op::Jal;
            d.rd = rd;
            d.imm = imm_j(word);
        }
        opcodes::OP_JALR => {
            d.op = Op::Jalr;
            d.rd = rd;
            d.rs1 = rs1;
            d.imm = imm_i(word);
        }
        opcodes::OP_BRANCH => {
            d.rs1 = rs1;
            d.rs2 = rs2;
            d.imm = imm_b(word);
            d.op = match f3 {
                funct3::BEQ => Op::Beq,
                funct3::BNE => Op::Bne,
                funct3::BLT => Op::Blt,
                funct3::BGE => Op::Bge,
                funct3::BLTU => Op::Bltu,
                funct3::BGEU => Op::Bgeu,
                _ => Op::Invalid,
            };
        }
        opcodes::OP_LOAD => {
            d.rd = rd;
            d.rs1 = rs1;
            d.imm = imm_i(word);
            d.op = match f3 {
                funct3::LB => Op::Lb,
                funct3::LH => Op::Lh,
                funct3::LW => Op::Lw,
                funct3::LBU => Op::Lbu,
                funct3::LHU => Op::Lhu,
                _ => Op::Invalid,
            };
        }
        opcodes::OP_STORE => {
            d.rs1 = rs1;
            d.rs2 = rs2;
            d.imm = imm_s(word);
            d.op = match f3 {
                funct3::SB => Op::Sb,
                funct3::SH => Op::Sh,
                funct3::SW => Op::Sw,
                _ => Op::Invalid,
            };
        }
        opcodes::OP_IMM => {
            d.rd = rd;
            d.rs1 = rs1;
            d.op = match f3 {
                funct3::ADD_SUB => Op::Addi,
                funct3::SLT => Op::Slti,
                funct3::SLTU => Op::Sltiu,
                funct3::XOR => Op::Xori,
                funct3::OR => Op::Ori,
                funct3::AND => Op::Andi,
                funct3::SLL => Op::Slli,
                funct3::SRL_SRA => {
                    if f7 == funct7::ALT {
                        Op::Srai
                    } else {
                        Op::Srli
                    }
                }
                _ => Op::Invalid,
            };
            // Shifts carry the 5-bit shamt in the rs2 field; every other
            // I-type ALU op takes a 12-bit sign-extended immediate.
            d.imm = if f3 == funct3::SLL || f3 == funct3::SRL_SRA {
                rs2 as i32
            } else {
                imm_i(word)
            };
        }
        opcodes::OP_REG => {
            d.rd = rd;
            d.rs1 = rs1;
            d.rs2 = rs2;
            d.op = match f3 {
                funct3::ADD_SUB => {
                    if f7 == funct7::ALT {
                        Op::Sub
                    } else {
                        Op::Add
                    }
                }
                funct3::SLL => Op::Sll,
                funct3::SLT => Op::Slt,
                funct3::SLTU => Op::Sltu,
                funct3::XOR => Op::Xor,
                funct3::SRL_SRA => {
                    if f7 == funct7::ALT {
                        Op::Sra
                    } else {
                        Op::Srl
                    }
                }
                funct3::OR => Op::Or,
                funct3::AND => Op::And,
                _ => Op::Invalid,
            };
        }
        _ => {
            d.op = Op::Invalid;
        }
    }

    if d.op == Op::Invalid {
        d.rd = 0;
        d.rs1 = 0;
        d.rs2 = 0;
        d.imm = 0;
    }
    d.is_branch = d.op.is_branch();
    d
}

/// I-type immediate: bits [31:20], sign-extended.
fn imm_i(word: u32) -> i32 {
    (word as i32) >> 20
}

/// S-type immediate: bits [31:25] and [11:7], sign-extended.
fn imm_s(word: u32) -> i32 {
    let hi = (word >> 25) & 0x7f;
    let lo = (word >> 7) & 0x1f;
    (((hi << 5) | lo) as i32) << 20 >> 20
}

/// B-type immediate: [12|10:5|4:1|11] << 1, sign-extended.
fn imm_b(word: u32) -> i32 {
    let imm12 = (word >> 31) & 1;
    let imm10_5 = (word >> 25) & 0x3f;
    let imm4_1 = (word >> 8) & 0xf;
    let imm11 = (word >> 7) & 1;
    let v = (imm12 << 12) | (imm11 << 11) | (imm10_5 << 5) | (imm4_1 << 1);
    ((v as i32) << 19) >> 19
}

/// J-type immediate: [20|10:1|11|19:12] << 1, sign-extended.
fn imm_j(word: u32) -> i32 {
    let imm20 = (word >> 31) & 1;
    let imm10_1 = (word >> 21) & 0x3ff;
    let imm11 = (word >> 20) & 1;
    let imm19_12 = (word >> 12) & 0xff;
    let v = (imm20 << 20) | (imm19_12 << 12) | (imm11 << 11) | (imm10_1 << 1);
    ((v as i32) << 11) >> 11
}
