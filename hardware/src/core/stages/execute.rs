//! Execute: reservation stations, ALU, and branch unit.
//!
//! The two non-memory reservation stations accept at most one filled
//! instruction per cycle, capture operands from the cycle's CDB broadcast,
//! and forward at most one ready entry to their functional unit. The ALU is
//! single-cycle and posts its result on its CDB producer channel. The
//! branch unit forwards resolutions to the committer and, for JAL/JALR,
//! the link address to the CDB; it refuses to start an instruction until
//! every output it will need can accept.

use crate::core::cdb::{CdbPort, CdbResult};
use crate::core::units::{alu, branch};
use crate::core::Cpu;
use crate::isa::Op;

pub fn execute_stage(cpu: &mut Cpu, flush: bool) {
    let broadcast = cpu.cdb.get().copied();

    // ALU reservation station.
    if flush {
        cpu.alu_rs.clear();
        cpu.wires.alu_issue.clear();
    } else {
        if !cpu.alu_rs.is_full() {
            if let Some(inst) = cpu.wires.alu_issue.receive() {
                cpu.alu_rs.insert(inst);
            }
        }
        if let Some(result) = &broadcast {
            cpu.alu_rs.capture(result);
        }
        if cpu.wires.alu_exec.can_send() {
            if let Some(inst) = cpu.alu_rs.take_ready() {
                cpu.wires.alu_exec.send(inst);
            }
        }
    }

    // Branch reservation station.
    if flush {
        cpu.branch_rs.clear();
        cpu.wires.branch_issue.clear();
    } else {
        if !cpu.branch_rs.is_full() {
            if let Some(inst) = cpu.wires.branch_issue.receive() {
                cpu.branch_rs.insert(inst);
            }
        }
        if let Some(result) = &broadcast {
            cpu.branch_rs.capture(result);
        }
        if cpu.wires.branch_exec.can_send() {
            if let Some(inst) = cpu.branch_rs.take_ready() {
                cpu.wires.branch_exec.send(inst);
            }
        }
    }

    // ALU.
    if flush {
        cpu.wires.alu_exec.clear();
    } else if cpu.cdb.port_mut(CdbPort::Alu).can_send() {
        if let Some(inst) = cpu.wires.alu_exec.receive() {
            let value = alu::evaluate(&inst);
            cpu.cdb
                .port_mut(CdbPort::Alu)
                .send(CdbResult { id: inst.id, value });
        }
    }

    // Branch unit.
    if flush {
        cpu.wires.branch_exec.clear();
        return;
    }
    if let Some(inst) = cpu.wires.branch_exec.peek().copied() {
        let needs_link = matches!(inst.inst.op, Op::Jal | Op::Jalr);
        let outputs_free = cpu.wires.branch_result.can_send()
            && (!needs_link || cpu.cdb.port_mut(CdbPort::Branch).can_send());
        if outputs_free {
            cpu.wires.branch_exec.receive();
            cpu.wires.branch_result.send(branch::resolve(&inst));
            if needs_link {
                cpu.cdb.port_mut(CdbPort::Branch).send(CdbResult {
                    id: inst.id,
                    value: branch::link_value(&inst),
                });
            }
        }
    }
}
