//! Common Data Bus.
//!
//! The CDB multiplexes the result channels of every functional unit onto a
//! single broadcast slot per cycle. Arbitration is round-robin with a
//! cycle-varying starting index so no producer can be starved forever while
//! keeping the pick constant-time.

use log::trace;

use super::channel::{Bus, Channel};
use crate::common::RobId;

/// A completed result: the tag of the producing instruction and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CdbResult {
    pub id: RobId,
    pub value: u32,
}

/// The producer channels feeding the CDB, in arbitration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CdbPort {
    Alu = 0,
    /// Link addresses from JAL/JALR.
    Branch = 1,
    /// Load results from the memory unit.
    MemLoad = 2,
    /// Store-accepted acknowledgements from the memory-order buffer.
    StoreAck = 3,
}

const PORT_COUNT: usize = 4;

/// The broadcast arbiter. Owns its input channels and the outgoing bus.
pub struct CommonDataBus {
    inputs: [Channel<CdbResult>; PORT_COUNT],
    out: Bus<CdbResult>,
}

impl CommonDataBus {
    pub fn new() -> Self {
        Self {
            inputs: Default::default(),
            out: Bus::new(),
        }
    }

    /// The producer channel for one functional unit.
    pub fn port_mut(&mut self, port: CdbPort) -> &mut Channel<CdbResult> {
        &mut self.inputs[port as usize]
    }

    /// The load-result and store-ack ports together, for the memory
    /// subsystem's split borrow.
    pub fn mem_ports_mut(&mut self) -> (&mut Channel<CdbResult>, &mut Channel<CdbResult>) {
        let [_, _, load, ack] = &mut self.inputs;
        (load, ack)
    }

    /// The value broadcast this cycle, if any.
    pub fn get(&self) -> Option<&CdbResult> {
        self.out.get()
    }

    /// Rising-edge arbitration.
    ///
    /// On a flush cycle every pending producer result is stale; drain and
    /// discard them all. Otherwise scan the inputs round-robin from
    /// `cycle mod N` and forward the first pending result to the bus.
    pub fn tick(&mut self, cycle: u64, flush: bool) {
        if flush {
            for input in &mut self.inputs {
                input.clear();
            }
            return;
        }
        let start = (cycle % PORT_COUNT as u64) as usize;
        for i in 0..PORT_COUNT {
            let index = (start + i) % PORT_COUNT;
            if let Some(result) = self.inputs[index].receive() {
                trace!(
                    "cdb: broadcasting id={} value={:#x} (port {})",
                    result.id,
                    result.value,
                    index
                );
                self.out.send(result);
                break;
            }
        }
    }

    /// Falling-edge latch of the input channels and the broadcast bus.
    pub fn latch(&mut self) {
        for input in &mut self.inputs {
            input.latch();
        }
        self.out.latch();
    }
}

impl Default for CommonDataBus {
    fn default() -> Self {
        Self::new()
    }
}
