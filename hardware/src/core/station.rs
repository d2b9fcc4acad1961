//! Reservation stations.
//!
//! A reservation station is an unordered pool of filled instructions waiting
//! for their operands. Entries capture values from CDB broadcasts that match
//! their pending producer tags; once both tags are clear the entry may issue
//! to its functional unit. At most one entry issues per cycle, the first
//! ready one in storage order — correctness does not depend on a smarter
//! pick.

use log::trace;

use super::cdb::CdbResult;
use crate::common::RobId;
use crate::isa::FilledInst;

pub struct ReservationStation {
    /// Display name for logging ("alu", "branch", "mem").
    name: &'static str,
    slots: Vec<FilledInst>,
    capacity: usize,
}

impl ReservationStation {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, inst: FilledInst) {
        trace!(
            "rs/{}: accepted id={} q_rs1={} q_rs2={}",
            self.name,
            inst.id,
            inst.q_rs1,
            inst.q_rs2
        );
        self.slots.push(inst);
    }

    /// Applies a CDB broadcast to every waiting entry.
    pub fn capture(&mut self, result: &CdbResult) {
        for slot in &mut self.slots {
            if slot.q_rs1 == result.id {
                slot.v_rs1 = result.value;
                slot.q_rs1 = RobId::NONE;
                trace!("rs/{}: id={} captured rs1 from {}", self.name, slot.id, result.id);
            }
            if slot.q_rs2 == result.id {
                slot.v_rs2 = result.value;
                slot.q_rs2 = RobId::NONE;
                trace!("rs/{}: id={} captured rs2 from {}", self.name, slot.id, result.id);
            }
        }
    }

    /// Removes and returns the first entry whose operands are both final.
    pub fn take_ready(&mut self) -> Option<FilledInst> {
        let pos = self.slots.iter().position(|s| s.ready())?;
        Some(self.slots.remove(pos))
    }

    /// Like `take_ready`, but only peeks.
    pub fn has_ready(&self) -> bool {
        self.slots.iter().any(|s| s.ready())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RobId;
    use crate::isa::{DecodedInst, Op};

    fn waiting(id: u32, q1: u32, q2: u32) -> FilledInst {
        FilledInst {
            inst: DecodedInst {
                op: Op::Add,
                ..Default::default()
            },
            id: RobId(id),
            q_rs1: RobId(q1),
            q_rs2: RobId(q2),
            ..Default::default()
        }
    }

    #[test]
    fn capture_clears_matching_tags() {
        let mut rs = ReservationStation::new("alu", 4);
        rs.insert(waiting(3, 1, 2));
        rs.capture(&CdbResult {
            id: RobId(1),
            value: 10,
        });
        assert!(!rs.has_ready());
        rs.capture(&CdbResult {
            id: RobId(2),
            value: 20,
        });
        let inst = rs.take_ready().unwrap();
        assert_eq!((inst.v_rs1, inst.v_rs2), (10, 20));
    }

    #[test]
    fn one_broadcast_feeds_both_operands() {
        let mut rs = ReservationStation::new("alu", 4);
        rs.insert(waiting(3, 1, 1));
        rs.capture(&CdbResult {
            id: RobId(1),
            value: 7,
        });
        let inst = rs.take_ready().unwrap();
        assert_eq!((inst.v_rs1, inst.v_rs2), (7, 7));
    }

    #[test]
    fn issue_is_one_per_call_first_ready() {
        let mut rs = ReservationStation::new("alu", 4);
        rs.insert(waiting(1, 0, 0));
        rs.insert(waiting(2, 0, 0));
        rs.insert(waiting(3, 9, 0));
        assert_eq!(rs.take_ready().unwrap().id, RobId(1));
        assert_eq!(rs.take_ready().unwrap().id, RobId(2));
        assert!(rs.take_ready().is_none());
        assert_eq!(rs.len(), 1);
    }
}
