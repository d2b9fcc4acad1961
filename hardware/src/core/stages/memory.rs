//! Memory pipeline: memory unit, memory-order buffer, and the memory
//! reservation station.
//!
//! Ticked unit-first so that the handshake `ready` the memory unit raises
//! while idle is visible to the MOB's head-issue in the same cycle, while a
//! request the MOB sends is only taken by the unit on the next cycle.
//!
//! The memory reservation station is the ordinary operand-capture pool plus
//! one extra duty: the cycle it accepts a load or store it sends the MOB a
//! program-order mark, so the MOB knows about every memory instruction
//! before operands resolve.

use log::warn;

use crate::core::cdb::CdbResult;
use crate::core::memsys::{self, Access};
use crate::core::Cpu;

pub fn memory_stage(cpu: &mut Cpu, flush: bool) {
    let broadcast = cpu.cdb.get().copied();
    let (load_port, ack_port) = cpu.cdb.mem_ports_mut();

    // Memory unit (flush handling is its own: reads abort, writes finish).
    cpu.mem_unit
        .tick(&mut cpu.mem, &mut cpu.wires.mem_req, load_port, flush);

    // Memory-order buffer. Commit confirmations are observed even on a
    // flush cycle, before the speculative tail is dropped.
    if let Some(record) = cpu.wires.commit.get() {
        cpu.mob.observe_commit(record.id);
    }
    if flush {
        cpu.mob.flush();
        cpu.wires.mob_mark.clear();
        cpu.wires.mob_fill.clear();
    } else {
        if !cpu.mob.is_full() {
            if let Some((id, access)) = cpu.wires.mob_mark.receive() {
                cpu.mob.mark(id, access);
            }
        }

        if let Some(inst) = cpu.wires.mob_fill.peek().copied() {
            match memsys::translate(&inst) {
                Some(request) => {
                    // A store's acceptance is itself a CDB result; hold the
                    // fill until that channel can take it.
                    let ack_ok = request.access == Access::Read || ack_port.can_send();
                    if ack_ok {
                        cpu.wires.mob_fill.receive();
                        if request.access == Access::Write {
                            ack_port.send(CdbResult {
                                id: request.id,
                                value: 0,
                            });
                        }
                        cpu.mob.fill(request);
                    }
                }
                None => {
                    warn!("mob: non-memory instruction id={} in fill channel", inst.id);
                    cpu.wires.mob_fill.receive();
                }
            }
        }

        if let Some(request) = cpu.mob.head_issuable().copied() {
            if cpu.wires.mem_req.send(request) {
                cpu.mob.pop_head();
            }
        }
    }

    // Memory reservation station.
    if flush {
        cpu.mem_rs.clear();
        cpu.wires.mem_issue.clear();
        return;
    }
    if !cpu.mem_rs.is_full() && cpu.wires.mem_issue.peek().is_some() && cpu.wires.mob_mark.can_send()
    {
        if let Some(inst) = cpu.wires.mem_issue.receive() {
            if let Some(access) = memsys::access_kind(inst.inst.op) {
                cpu.wires.mob_mark.send((inst.id, access));
            }
            cpu.mem_rs.insert(inst);
        }
    }
    if let Some(result) = &broadcast {
        cpu.mem_rs.capture(result);
    }
    if cpu.wires.mob_fill.can_send() {
        if let Some(inst) = cpu.mem_rs.take_ready() {
            cpu.wires.mob_fill.send(inst);
        }
    }
}
