//! Reorder Buffer.
//!
//! The ROB is the FIFO of in-flight instructions. It provides:
//! 1. **Allocation:** assigns a fresh nonzero tag to every dispatched
//!    instruction, in program order.
//! 2. **Completion:** entries transition to commit-ready when their result
//!    arrives on the CDB, or — for branches without a destination register —
//!    when the branch unit resolves them.
//! 3. **In-order retirement:** only the head may be popped.
//! 4. **Operand bypass:** the dispatcher may read a commit-ready value by
//!    tag before it reaches the architectural register file.
//! 5. **Flush:** drops every entry and restarts tag allocation at 1.

use std::collections::VecDeque;

use log::{debug, trace};

use super::cdb::CdbResult;
use super::units::branch::BranchResult;
use crate::common::RobId;
use crate::isa::Op;

/// Lifecycle state of a reorder-buffer entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RobState {
    /// Allocated, result not yet available.
    #[default]
    Issued,
    /// Result available; retires when it reaches the head.
    CommitReady,
    /// The HALT sentinel; stops the simulation when observed at the head.
    Halt,
}

/// One in-flight instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobEntry {
    pub id: RobId,
    pub op: Op,
    pub pc: u32,
    /// Destination register, 0 when the instruction writes none.
    pub dest: u8,
    pub value: u32,
    pub state: RobState,
    pub is_branch: bool,
    pub predicted_taken: bool,
    pub taken: bool,
    pub target_pc: u32,
}

/// FIFO of in-flight instructions with monotonic nonzero tag assignment.
pub struct ReorderBuffer {
    entries: VecDeque<RobEntry>,
    capacity: usize,
    next_id: u32,
}

impl ReorderBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn can_allocate(&self) -> bool {
        self.entries.len() < self.capacity
    }

    /// The tag the next allocation will receive.
    pub fn next_id(&self) -> RobId {
        RobId(self.next_id)
    }

    /// Appends `entry` at the tail under a fresh tag.
    ///
    /// Returns `None` when full; the dispatcher's stall check makes that an
    /// internal invariant violation, surfaced as a fatal error by the caller.
    pub fn allocate(&mut self, mut entry: RobEntry) -> Option<RobId> {
        if !self.can_allocate() {
            return None;
        }
        let id = RobId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == 0 {
            self.next_id = 1; // tag 0 is the "no producer" sentinel
        }
        entry.id = id;
        trace!("rob: allocated id={} pc={:#x} op={:?}", id, entry.pc, entry.op);
        self.entries.push_back(entry);
        Some(id)
    }

    /// The oldest in-flight instruction.
    pub fn front(&self) -> Option<&RobEntry> {
        self.entries.front()
    }

    /// Retires the head. Only ever called after `front` showed it ready.
    pub fn pop_front(&mut self) -> Option<RobEntry> {
        self.entries.pop_front()
    }

    /// Commit-ready value bypass for the dispatcher.
    ///
    /// Returns the value of the entry named by `tag` only once that entry
    /// has completed; an issued entry still owes its result.
    pub fn lookup(&self, tag: RobId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.id == tag)
            .filter(|e| e.state == RobState::CommitReady)
            .map(|e| e.value)
    }

    /// Applies a CDB broadcast: the matching entry records its value and
    /// becomes commit-ready.
    pub fn observe_cdb(&mut self, result: &CdbResult) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == result.id) {
            entry.value = result.value;
            entry.state = RobState::CommitReady;
            trace!("rob: id={} completed value={:#x}", entry.id, entry.value);
        }
    }

    /// Applies a branch-unit resolution.
    ///
    /// Records direction and target. An entry with no destination register
    /// (a conditional branch) has nothing more to wait for; JAL/JALR still
    /// await their link value from the CDB.
    pub fn observe_branch(&mut self, result: &BranchResult) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == result.id) {
            entry.taken = result.taken;
            entry.target_pc = result.target_pc;
            if entry.dest == 0 {
                entry.state = RobState::CommitReady;
            }
            trace!(
                "rob: id={} branch resolved taken={} target={:#x}",
                entry.id,
                entry.taken,
                entry.target_pc
            );
        }
    }

    /// Drops every entry and restarts tag allocation.
    pub fn flush(&mut self) {
        if !self.entries.is_empty() {
            debug!("rob: flushed {} entries", self.entries.len());
        }
        self.entries.clear();
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dest: u8) -> RobEntry {
        RobEntry {
            op: Op::Addi,
            dest,
            ..Default::default()
        }
    }

    #[test]
    fn tags_are_monotonic_and_nonzero() {
        let mut rob = ReorderBuffer::new(4);
        let a = rob.allocate(entry(1)).unwrap();
        let b = rob.allocate(entry(2)).unwrap();
        assert_eq!(a, RobId(1));
        assert_eq!(b, RobId(2));
    }

    #[test]
    fn allocate_fails_when_full() {
        let mut rob = ReorderBuffer::new(2);
        rob.allocate(entry(1)).unwrap();
        rob.allocate(entry(2)).unwrap();
        assert!(!rob.can_allocate());
        assert!(rob.allocate(entry(3)).is_none());
    }

    #[test]
    fn completion_is_out_of_order_retirement_is_not() {
        let mut rob = ReorderBuffer::new(4);
        let a = rob.allocate(entry(1)).unwrap();
        let b = rob.allocate(entry(2)).unwrap();

        rob.observe_cdb(&CdbResult { id: b, value: 20 });
        // Head still issued: the younger completion must wait.
        assert_eq!(rob.front().unwrap().state, RobState::Issued);

        rob.observe_cdb(&CdbResult { id: a, value: 10 });
        assert_eq!(rob.front().unwrap().state, RobState::CommitReady);
        assert_eq!(rob.pop_front().unwrap().value, 10);
        assert_eq!(rob.front().unwrap().value, 20);
    }

    #[test]
    fn lookup_only_sees_completed_values() {
        let mut rob = ReorderBuffer::new(4);
        let a = rob.allocate(entry(5)).unwrap();
        assert_eq!(rob.lookup(a), None);
        rob.observe_cdb(&CdbResult { id: a, value: 99 });
        assert_eq!(rob.lookup(a), Some(99));
        assert_eq!(rob.lookup(RobId(42)), None);
    }

    #[test]
    fn conditional_branch_completes_on_resolution() {
        let mut rob = ReorderBuffer::new(4);
        let cond = rob
            .allocate(RobEntry {
                op: Op::Beq,
                is_branch: true,
                ..Default::default()
            })
            .unwrap();
        let link = rob
            .allocate(RobEntry {
                op: Op::Jal,
                dest: 1,
                is_branch: true,
                ..Default::default()
            })
            .unwrap();

        rob.observe_branch(&BranchResult {
            id: cond,
            taken: true,
            target_pc: 0x40,
        });
        assert_eq!(rob.front().unwrap().state, RobState::CommitReady);
        assert!(rob.front().unwrap().taken);

        // JAL keeps waiting for its link value.
        rob.observe_branch(&BranchResult {
            id: link,
            taken: true,
            target_pc: 0x80,
        });
        assert_eq!(rob.lookup(link), None);
        rob.observe_cdb(&CdbResult { id: link, value: 8 });
        assert_eq!(rob.lookup(link), Some(8));
    }

    #[test]
    fn flush_resets_tags() {
        let mut rob = ReorderBuffer::new(4);
        rob.allocate(entry(1)).unwrap();
        rob.allocate(entry(2)).unwrap();
        rob.flush();
        assert!(rob.is_empty());
        assert_eq!(rob.allocate(entry(3)).unwrap(), RobId(1));
    }
}
