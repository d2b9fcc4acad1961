//! Memory-Order Buffer.
//!
//! A FIFO of every in-flight memory operation in program order. Entries are
//! marked (placeholder, order only) when the memory reservation station
//! accepts an instruction, filled (address and data) once operands resolve,
//! and released to the memory unit head-first. Because the buffer is a
//! strict FIFO, a load at the head necessarily waits behind every older
//! store, which gives load/store ordering without address comparison.
//!
//! Stores become architecturally visible only after commit: a filled store
//! sends a store-accepted `(tag, 0)` result to the CDB so the reorder buffer
//! can retire it, and the head will not issue a store to memory until the
//! commit bus has confirmed it.

use std::collections::VecDeque;

use log::{debug, trace, warn};

use super::{Access, MemRequest};
use crate::common::RobId;

#[derive(Clone, Copy, Debug)]
struct MobEntry {
    request: MemRequest,
    /// Address/data resolved; the request field is meaningful.
    ready: bool,
    /// Confirmed by the commit bus; stores may reach memory.
    committed: bool,
}

pub struct MemoryOrderBuffer {
    entries: VecDeque<MobEntry>,
    capacity: usize,
}

impl MemoryOrderBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends a placeholder for a newly-accepted memory instruction,
    /// pinning its position in program order before operands are known.
    pub fn mark(&mut self, id: RobId, access: Access) {
        trace!("mob: marked id={} {:?}", id, access);
        self.entries.push_back(MobEntry {
            request: match access {
                Access::Read => MemRequest::read(id, 0, 0, false),
                Access::Write => MemRequest::write(id, 0, 0, 0),
            },
            ready: false,
            committed: false,
        });
    }

    /// Installs the resolved request into its placeholder.
    ///
    /// Matches only unfilled entries: a committed store surviving a flush
    /// may share a recycled tag with a younger instruction and must not be
    /// overwritten.
    pub fn fill(&mut self, request: MemRequest) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.request.id == request.id && !e.ready)
        {
            Some(entry) => {
                trace!(
                    "mob: filled id={} {:?} addr={:#x}",
                    request.id,
                    request.access,
                    request.addr
                );
                entry.request = request;
                entry.ready = true;
            }
            None => warn!("mob: fill for unmarked id={}", request.id),
        }
    }

    /// Records a commit-bus confirmation.
    pub fn observe_commit(&mut self, id: RobId) {
        for entry in &mut self.entries {
            if entry.request.id == id {
                entry.committed = true;
                trace!("mob: id={} committed", id);
            }
        }
    }

    /// The head request, if it is allowed to reach memory this cycle:
    /// ready, and for stores also committed.
    pub fn head_issuable(&self) -> Option<&MemRequest> {
        let head = self.entries.front()?;
        if !head.ready {
            return None;
        }
        if head.request.access == Access::Write && !head.committed {
            return None;
        }
        Some(&head.request)
    }

    /// Removes the head after it was handed to the memory unit.
    pub fn pop_head(&mut self) {
        self.entries.pop_front();
    }

    /// Drops every entry that has not committed, youngest first.
    ///
    /// Committed entries are retired stores whose architectural effect is
    /// already owed to memory; they survive the flush and still issue.
    pub fn flush(&mut self) {
        let before = self.entries.len();
        while matches!(self.entries.back(), Some(e) if !e.committed) {
            self.entries.pop_back();
        }
        if before != self.entries.len() {
            debug!(
                "mob: flushed {} speculative entries, {} committed remain",
                before - self.entries.len(),
                self.entries.len()
            );
        }
    }
}
