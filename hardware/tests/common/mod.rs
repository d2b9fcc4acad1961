//! Shared helpers for the integration tests: RV32I encoders and a small
//! driver that runs an instruction sequence to the HALT sentinel.

#![allow(dead_code)]

use riscv_ooo::config::Config;
use riscv_ooo::core::rob::RobEntry;
use riscv_ooo::core::Cpu;
use riscv_ooo::sim;

/// `addi x10, x0, 255` — stops the simulation.
pub const HALT: u32 = 0x0ff0_0513;

pub fn r_type(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    (funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

pub fn i_type(imm: i32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    ((imm as u32 & 0xfff) << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

pub fn s_type(imm: i32, rs2: u32, rs1: u32, funct3: u32) -> u32 {
    let imm = imm as u32 & 0xfff;
    ((imm >> 5) << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | ((imm & 0x1f) << 7) | 0x23
}

pub fn b_type(imm: i32, rs2: u32, rs1: u32, funct3: u32) -> u32 {
    let imm = imm as u32 & 0x1fff;
    (((imm >> 12) & 1) << 31)
        | (((imm >> 5) & 0x3f) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | (((imm >> 1) & 0xf) << 8)
        | (((imm >> 11) & 1) << 7)
        | 0x63
}

pub fn j_type(imm: i32, rd: u32) -> u32 {
    let imm = imm as u32 & 0x1f_ffff;
    (((imm >> 20) & 1) << 31)
        | (((imm >> 1) & 0x3ff) << 21)
        | (((imm >> 11) & 1) << 20)
        | (((imm >> 12) & 0xff) << 12)
        | (rd << 7)
        | 0x6f
}

// R-type
pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b000, rd, 0x33)
}
pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0b010_0000, rs2, rs1, 0b000, rd, 0x33)
}
pub fn and(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b111, rd, 0x33)
}
pub fn or(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b110, rd, 0x33)
}
pub fn xor(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b100, rd, 0x33)
}
pub fn sll(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b001, rd, 0x33)
}
pub fn srl(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b101, rd, 0x33)
}
pub fn sra(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0b010_0000, rs2, rs1, 0b101, rd, 0x33)
}
pub fn slt(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b010, rd, 0x33)
}
pub fn sltu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b011, rd, 0x33)
}

// I-type ALU
pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b000, rd, 0x13)
}
pub fn andi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b111, rd, 0x13)
}
pub fn ori(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b110, rd, 0x13)
}
pub fn xori(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b100, rd, 0x13)
}
pub fn slli(rd: u32, rs1: u32, shamt: u32) -> u32 {
    i_type(shamt as i32, rs1, 0b001, rd, 0x13)
}
pub fn srli(rd: u32, rs1: u32, shamt: u32) -> u32 {
    i_type(shamt as i32, rs1, 0b101, rd, 0x13)
}
pub fn srai(rd: u32, rs1: u32, shamt: u32) -> u32 {
    i_type(shamt as i32 | 0x400, rs1, 0b101, rd, 0x13)
}
pub fn slti(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b010, rd, 0x13)
}
pub fn sltiu(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b011, rd, 0x13)
}

// U-type; `value` is the final 32-bit immediate (low 12 bits zero).
pub fn lui(rd: u32, value: u32) -> u32 {
    (value & 0xffff_f000) | (rd << 7) | 0x37
}
pub fn auipc(rd: u32, value: u32) -> u32 {
    (value & 0xffff_f000) | (rd << 7) | 0x17
}

// Jumps and branches
pub fn jal(rd: u32, offset: i32) -> u32 {
    j_type(offset, rd)
}
pub fn jalr(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b000, rd, 0x67)
}
pub fn beq(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b000)
}
pub fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b001)
}
pub fn blt(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b100)
}
pub fn bge(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b101)
}
pub fn bltu(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b110)
}
pub fn bgeu(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 0b111)
}

// Loads and stores
pub fn lb(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b000, rd, 0x03)
}
pub fn lh(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b001, rd, 0x03)
}
pub fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b010, rd, 0x03)
}
pub fn lbu(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b100, rd, 0x03)
}
pub fn lhu(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b101, rd, 0x03)
}
pub fn sb(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(imm, rs2, rs1, 0b000)
}
pub fn sh(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(imm, rs2, rs1, 0b001)
}
pub fn sw(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(imm, rs2, rs1, 0b010)
}

/// Lays instruction words out as little-endian bytes from address 0.
pub fn words_to_image(words: &[u32]) -> Vec<u8> {
    let mut image = Vec::with_capacity(words.len() * 4);
    for word in words {
        image.extend_from_slice(&word.to_le_bytes());
    }
    image
}

/// Runs a word sequence to HALT with commit logging on.
///
/// Returns the HALT output value and the CPU for commit-stream and
/// statistics assertions.
pub fn run_words(words: &[u32]) -> (u8, Cpu) {
    let mut config = Config::default();
    config.general.log_commits = true;
    let mut cpu = Cpu::new(&config, &words_to_image(words));
    let value = sim::run(&mut cpu, 100_000).expect("program did not reach HALT");
    (value, cpu)
}

/// The last committed write to architectural register `rd`.
pub fn last_commit_to(cpu: &Cpu, rd: u8) -> Option<RobEntry> {
    cpu.commit_log().iter().rev().find(|e| e.dest == rd).copied()
}
