//! Commit: retire and flush.
//!
//! Feeds completion traffic (CDB broadcasts and branch resolutions) into
//! the reorder buffer, then examines the head. A commit-ready head retires:
//! its value lands in the architectural register file, the committed entry
//! is broadcast on the commit bus, and a mispredicted branch additionally
//! raises the global flush pulse with the corrected PC. The HALT sentinel
//! at the head ends the simulation with the low byte of `a0`.
//!
//! On a flush cycle this stage performs the core-side cleanup: the reorder
//! buffer empties, the rename table resets, and the decoded and
//! branch-result channels drop their stale contents.

use log::{debug, info, trace};

use crate::common::SimError;
use crate::core::rob::RobState;
use crate::core::Cpu;
use crate::isa::{abi, Op};

pub fn commit_stage(cpu: &mut Cpu, flush: bool) -> Result<(), SimError> {
    if flush {
        cpu.rob.flush();
        cpu.regs.flush();
        cpu.wires.branch_result.clear();
        cpu.wires.decoded.clear();
        cpu.stats.flushes += 1;
        return Ok(());
    }

    if let Some(result) = cpu.cdb.get().copied() {
        cpu.stats.cdb_broadcasts += 1;
        cpu.rob.observe_cdb(&result);
    }
    if let Some(result) = cpu.wires.branch_result.receive() {
        cpu.rob.observe_branch(&result);
    }

    let head = match cpu.rob.front() {
        Some(head) => *head,
        None => return Ok(()),
    };

    if head.op == Op::Invalid {
        return Err(SimError::InvalidInstruction(head.pc));
    }

    match head.state {
        RobState::Halt => {
            // The sentinel is still an ADDI; its write retires before a0 is
            // sampled, so a bare HALT program prints 255.
            if head.dest != 0 {
                cpu.regs.writeback(head.dest, head.id, head.value);
            }
            let (a0, _) = cpu.regs.read(abi::REG_A0);
            info!("commit: HALT at pc {:#x}, a0={:#x}", head.pc, a0);
            cpu.set_exit((a0 & 0xff) as u8);
        }
        RobState::CommitReady => {
            if head.dest != 0 {
                cpu.regs.writeback(head.dest, head.id, head.value);
            }
            trace!(
                "commit: id={} pc={:#x} op={:?} rd={} value={:#x}",
                head.id,
                head.pc,
                head.op,
                head.dest,
                head.value
            );
            cpu.wires.commit.send(head);
            cpu.log_commit(&head);
            cpu.stats.instructions_retired += 1;
            if head.op.is_load() {
                cpu.stats.inst_load += 1;
            } else if head.op.is_store() {
                cpu.stats.inst_store += 1;
            } else if head.op.is_branch() {
                cpu.stats.inst_branch += 1;
            } else {
                cpu.stats.inst_alu += 1;
            }

            if head.is_branch && head.taken != head.predicted_taken {
                let correct_pc = if head.taken {
                    head.target_pc
                } else {
                    head.pc.wrapping_add(4)
                };
                debug!(
                    "commit: mispredicted branch id={} pc={:#x}, redirect to {:#x}",
                    head.id, head.pc, correct_pc
                );
                cpu.stats.branch_mispredictions += 1;
                cpu.wires.flush_pc.send(correct_pc);
                cpu.wires.flush.send(true);
                // The entry stays; next cycle's flush empties the ROB.
                return Ok(());
            }

            cpu.rob.pop_front();
        }
        RobState::Issued => {}
    }
    Ok(())
}
