//! Dispatch: rename and issue.
//!
//! Pulls one decoded instruction per cycle, allocates its reorder-buffer
//! entry, resolves source operands against the rename table with a
//! three-step bypass (current CDB broadcast, then commit-ready ROB entry,
//! then producer tag), and routes the filled instruction to the reservation
//! station of its class. Structural hazards stall; nothing here is an error
//! except allocation into a full ROB, which the stall check rules out.

use log::{debug, trace};

use crate::common::{RobId, SimError};
use crate::core::rob::{RobEntry, RobState};
use crate::core::Cpu;
use crate::isa::{FilledInst, Op};

pub fn dispatch_stage(cpu: &mut Cpu, flush: bool) -> Result<(), SimError> {
    if flush {
        return Ok(());
    }
    let inst = match cpu.wires.decoded.peek() {
        Some(inst) => *inst,
        None => return Ok(()),
    };

    if !cpu.rob.can_allocate() {
        cpu.stats.stalls_rob_full += 1;
        return Ok(());
    }

    // The HALT sentinel allocates its marker entry and goes nowhere else.
    // It is still an ADDI, so it carries its result (255) to commit.
    if inst.is_halt() {
        cpu.wires.decoded.receive();
        cpu.rob
            .allocate(RobEntry {
                op: inst.op,
                pc: inst.pc,
                dest: inst.rd,
                value: inst.imm as u32,
                state: RobState::Halt,
                ..Default::default()
            })
            .ok_or(SimError::RobOverflow)?;
        debug!("dispatch: HALT sentinel at pc {:#x}", inst.pc);
        return Ok(());
    }

    if !can_route(cpu, inst.op) {
        cpu.stats.stalls_backend += 1;
        return Ok(());
    }

    cpu.wires.decoded.receive();

    let id = cpu.rob.next_id();
    let mut filled = FilledInst {
        inst,
        id,
        ..Default::default()
    };
    let (v_rs1, q_rs1) = resolve_operand(cpu, inst.rs1);
    let (v_rs2, q_rs2) = resolve_operand(cpu, inst.rs2);
    filled.v_rs1 = v_rs1;
    filled.q_rs1 = q_rs1;
    filled.v_rs2 = v_rs2;
    filled.q_rs2 = q_rs2;

    // AUIPC computes against the instruction's own address; route the PC
    // through the first operand so the ALU stays a pure function of operands.
    if inst.op == Op::Auipc {
        filled.v_rs1 = inst.pc;
        filled.q_rs1 = RobId::NONE;
    }

    let allocated = cpu
        .rob
        .allocate(RobEntry {
            op: inst.op,
            pc: inst.pc,
            dest: inst.rd,
            state: RobState::Issued,
            is_branch: inst.is_branch,
            predicted_taken: inst.predicted_taken,
            ..Default::default()
        })
        .ok_or(SimError::RobOverflow)?;
    debug_assert_eq!(allocated, id);

    if inst.rd != 0 {
        cpu.regs.preset(inst.rd, id);
    }

    trace!(
        "dispatch: id={} pc={:#x} op={:?} q_rs1={} q_rs2={}",
        id,
        inst.pc,
        inst.op,
        filled.q_rs1,
        filled.q_rs2
    );

    if inst.op.is_alu() {
        cpu.wires.alu_issue.send(filled);
    } else if inst.op.is_mem() {
        cpu.wires.mem_issue.send(filled);
    } else if inst.op.is_branch() {
        cpu.wires.branch_issue.send(filled);
    } else {
        // INVALID occupies its ROB slot and trips a fatal diagnostic if it
        // ever reaches the head.
        debug!("dispatch: invalid encoding at pc {:#x}", inst.pc);
    }
    Ok(())
}

/// True when the reservation-station channel for `op` can accept this cycle.
fn can_route(cpu: &Cpu, op: Op) -> bool {
    if op.is_alu() {
        cpu.wires.alu_issue.can_send()
    } else if op.is_mem() {
        cpu.wires.mem_issue.can_send()
    } else if op.is_branch() {
        cpu.wires.branch_issue.can_send()
    } else {
        true
    }
}

/// Resolves one source register to a value or a pending producer tag.
fn resolve_operand(cpu: &Cpu, reg: u8) -> (u32, RobId) {
    if reg == 0 {
        return (0, RobId::NONE);
    }
    let (value, tag) = cpu.regs.read(reg);
    if tag.is_none() {
        return (value, RobId::NONE);
    }
    // Producer still in flight: the broadcast landing this very cycle, a
    // completed-but-unretired ROB entry, or else wait on the tag.
    if let Some(broadcast) = cpu.cdb.get() {
        if broadcast.id == tag {
            return (broadcast.value, RobId::NONE);
        }
    }
    if let Some(value) = cpu.rob.lookup(tag) {
        return (value, RobId::NONE);
    }
    (0, tag)
}
