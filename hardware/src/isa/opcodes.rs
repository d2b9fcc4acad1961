//! Major opcode and funct-field constants for the RV32I base ISA.

pub const OP_LUI: u32 = 0b011_0111;
pub const OP_AUIPC: u32 = 0b001_0111;
pub const OP_JAL: u32 = 0b110_1111;
pub const OP_JALR: u32 = 0b110_0111;
pub const OP_BRANCH: u32 = 0b110_0011;
pub const OP_LOAD: u32 = 0b000_0011;
pub const OP_STORE: u32 = 0b010_0011;
pub const OP_IMM: u32 = 0b001_0011;
pub const OP_REG: u32 = 0b011_0011;

pub mod funct3 {
    pub const BEQ: u32 = 0b000;
    pub const BNE: u32 = 0b001;
    pub const BLT: u32 = 0b100;
    pub const BGE: u32 = 0b101;
    pub const BLTU: u32 = 0b110;
    pub const BGEU: u32 = 0b111;

    pub const LB: u32 = 0b000;
    pub const LH: u32 = 0b001;
    pub const LW: u32 = 0b010;
    pub const LBU: u32 = 0b100;
    pub const LHU: u32 = 0b101;

    pub const SB: u32 = 0b000;
    pub const SH: u32 = 0b001;
    pub const SW: u32 = 0b010;

    pub const ADD_SUB: u32 = 0b000;
    pub const SLL: u32 = 0b001;
    pub const SLT: u32 = 0b010;
    pub const SLTU: u32 = 0b011;
    pub const XOR: u32 = 0b100;
    pub const SRL_SRA: u32 = 0b101;
    pub const OR: u32 = 0b110;
    pub const AND: u32 = 0b111;
}

pub mod funct7 {
    /// Distinguishes SUB from ADD and SRA(I) from SRL(I).
    pub const ALT: u32 = 0b010_0000;
}
