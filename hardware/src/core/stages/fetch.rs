//! Frontend: PC logic, fetch, and decode.
//!
//! Three small workers chained by channels, ticked in order each cycle:
//!
//! * **PC logic** owns the fetch PC. A commit-time flush redirect wins over
//!   a decode-time predicted target; otherwise the PC advances sequentially.
//! * **Fetch** reads the 32-bit little-endian word at the PC from the
//!   unified memory.
//! * **Decode** maps the word onto a [`DecodedInst`], consults the branch
//!   predictor, and steers the PC at a predicted-taken branch or a direct
//!   jump. A redirect raises a one-cycle frontend squash pulse that discards
//!   the wrong-path word already in flight.
//!
//! The frontend also trains the predictor from the commit bus.

use log::{trace, warn};

use crate::common::bytes_to_uint;
use crate::core::Cpu;
use crate::isa::{decode, Op};

/// One fetched instruction word.
#[derive(Clone, Copy, Debug)]
pub struct FetchResult {
    pub pc: u32,
    pub word: u32,
}

pub fn fetch_stage(cpu: &mut Cpu, flush: bool) {
    // Train the predictor with every committed branch, including the
    // mispredicted one whose record rides the same cycle as the flush.
    if let Some(record) = cpu.wires.commit.get() {
        if record.is_branch {
            cpu.predictor.update(record.pc, record.taken);
        }
    }

    // On a redirect cycle the whole frontend squashes: both PC-channel
    // slots may hold wrong-path PCs, so the channel is cleared outright and
    // fetching restarts from the corrected PC next cycle.
    let squash = flush || cpu.wires.fetch_flush.get().copied().unwrap_or(false);

    pc_logic(cpu, flush, squash);
    fetch(cpu, squash);
    decode_word(cpu, squash);
}

fn pc_logic(cpu: &mut Cpu, flush: bool, squash: bool) {
    if flush {
        if let Some(target) = cpu.wires.flush_pc.receive() {
            trace!("pc: redirect to {:#x} (flush)", target);
            cpu.pc = target;
        }
        // A stale predicted target must not override the correction.
        cpu.wires.predicted_pc.clear();
        return;
    }
    if squash {
        if let Some(target) = cpu.wires.predicted_pc.receive() {
            trace!("pc: redirect to {:#x} (predicted)", target);
            cpu.pc = target;
        }
        return;
    }
    if !cpu.wires.fetch_pc.can_send() {
        return; // fetch is backed up
    }
    cpu.wires.fetch_pc.send(cpu.pc);
    cpu.pc = cpu.pc.wrapping_add(4);
}

fn fetch(cpu: &mut Cpu, squash: bool) {
    if squash {
        cpu.wires.fetch_pc.clear();
        return;
    }
    if !cpu.wires.fetched.can_send() {
        return;
    }
    if let Some(pc) = cpu.wires.fetch_pc.receive() {
        let addr = pc as usize;
        let word = if addr + 4 <= cpu.mem.len() {
            bytes_to_uint(&cpu.mem[addr..addr + 4])
        } else {
            warn!("fetch: out of bounds at pc {:#x}", pc);
            0
        };
        cpu.wires.fetched.send(FetchResult { pc, word });
    }
}

fn decode_word(cpu: &mut Cpu, squash: bool) {
    if squash {
        cpu.wires.fetched.clear();
        return;
    }
    if !cpu.wires.decoded.can_send() || !cpu.wires.predicted_pc.can_send() {
        return;
    }
    if let Some(fetched) = cpu.wires.fetched.receive() {
        let mut inst = decode(fetched.word, fetched.pc);

        // Steer the PC where the target is knowable at decode. JALR has no
        // computable target here, so it decodes predicted-not-taken and pays
        // a commit-time flush instead.
        let mut redirect = None;
        if inst.op == Op::Jal {
            inst.predicted_taken = true;
            redirect = Some(fetched.pc.wrapping_add(inst.imm as u32));
        } else if inst.op.is_cond_branch() {
            cpu.stats.branch_predictions += 1;
            inst.predicted_taken = cpu.predictor.predict(fetched.pc);
            if inst.predicted_taken {
                redirect = Some(fetched.pc.wrapping_add(inst.imm as u32));
            }
        }

        trace!(
            "decode: pc={:#x} op={:?} rd={} rs1={} rs2={} imm={}",
            inst.pc,
            inst.op,
            inst.rd,
            inst.rs1,
            inst.rs2,
            inst.imm
        );
        cpu.wires.decoded.send(inst);

        if let Some(target) = redirect {
            trace!("decode: predicted taken to {:#x}", target);
            cpu.wires.predicted_pc.send(target);
            cpu.wires.fetch_flush.send(true);
        }
    }
}
