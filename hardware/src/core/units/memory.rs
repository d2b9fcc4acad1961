//! Memory unit.
//!
//! Services one request at a time from the memory-order buffer over the
//! handshake channel, against the unified byte array shared with the
//! fetcher. Every access takes a fixed number of cycles. Completed loads
//! post their value on the memory unit's CDB producer channel; stores write
//! their bytes and produce no result (the store-accepted broadcast already
//! happened at MOB fill time).
//!
//! Out-of-bounds accesses are diagnosed and recovered: reads return 0,
//! writes are dropped.

use log::{error, trace};

use super::super::cdb::CdbResult;
use super::super::channel::{Channel, HandshakeChannel};
use super::super::memsys::{Access, MemRequest};
use crate::common::{bytes_to_int, bytes_to_uint, uint_to_bytes};

pub struct MemoryUnit {
    latency: u32,
    timer: u32,
    pending: Option<MemRequest>,
}

impl MemoryUnit {
    pub fn new(latency: u32) -> Self {
        Self {
            // The countdown needs at least one cycle in service.
            latency: latency.max(1),
            timer: 0,
            pending: None,
        }
    }

    /// Rising-edge step.
    ///
    /// On flush, an in-flight read is abandoned (its consumer is being
    /// discarded); an in-flight write always completes, because a write only
    /// ever enters the unit after its store committed.
    pub fn tick(
        &mut self,
        mem: &mut [u8],
        requests: &mut HandshakeChannel<MemRequest>,
        load_out: &mut Channel<CdbResult>,
        flush: bool,
    ) {
        if flush {
            if matches!(self.pending, Some(r) if r.access == Access::Read) {
                trace!("mem: aborting in-flight read on flush");
                self.pending = None;
                self.timer = 0;
            }
            // A wrong-path read parked in the handshake slot must not be
            // serviced either; a parked write is a committed store and stays.
            if matches!(requests.peek(), Some(r) if r.access == Access::Read) {
                requests.receive();
            }
        }

        match self.pending {
            None => {
                requests.ready();
                if let Some(request) = requests.receive() {
                    trace!(
                        "mem: accepted id={} {:?} addr={:#x} size={}",
                        request.id,
                        request.access,
                        request.addr,
                        request.size
                    );
                    self.pending = Some(request);
                    self.timer = self.latency;
                }
            }
            Some(request) => {
                self.timer -= 1;
                if self.timer > 0 {
                    return;
                }
                match request.access {
                    Access::Read => {
                        if !load_out.can_send() {
                            // Output blocked; hold the result one more cycle.
                            self.timer = 1;
                            return;
                        }
                        let value = self.load(mem, &request);
                        load_out.send(CdbResult {
                            id: request.id,
                            value,
                        });
                        trace!("mem: read id={} -> {:#x}", request.id, value);
                        self.pending = None;
                    }
                    Access::Write => {
                        self.store(mem, &request);
                        self.pending = None;
                    }
                }
            }
        }
    }

    fn load(&self, mem: &[u8], request: &MemRequest) -> u32 {
        let addr = request.addr as usize;
        let size = request.size as usize;
        if addr + size > mem.len() {
            error!(
                "mem: out-of-bounds read at {:#x}+{} (id={})",
                request.addr, size, request.id
            );
            return 0;
        }
        let bytes = &mem[addr..addr + size];
        if request.signed {
            bytes_to_int(bytes)
        } else {
            bytes_to_uint(bytes)
        }
    }

    fn store(&self, mem: &mut [u8], request: &MemRequest) {
        let addr = request.addr as usize;
        let size = request.size as usize;
        if addr + size > mem.len() {
            error!(
                "mem: out-of-bounds write at {:#x}+{} dropped (id={})",
                request.addr, size, request.id
            );
            return;
        }
        let bytes = uint_to_bytes(request.data);
        mem[addr..addr + size].copy_from_slice(&bytes[..size]);
        trace!(
            "mem: wrote {:#x} ({} bytes) at {:#x}",
            request.data,
            size,
            request.addr
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::MEMORY_LATENCY;
    use crate::common::RobId;

    fn harness() -> (
        Vec<u8>,
        HandshakeChannel<MemRequest>,
        Channel<CdbResult>,
        MemoryUnit,
    ) {
        (
            vec![0u8; 256],
            HandshakeChannel::new(),
            Channel::new(),
            MemoryUnit::new(MEMORY_LATENCY),
        )
    }

    fn cycle(
        unit: &mut MemoryUnit,
        mem: &mut [u8],
        req: &mut HandshakeChannel<MemRequest>,
        out: &mut Channel<CdbResult>,
        flush: bool,
    ) {
        unit.tick(mem, req, out, flush);
        out.latch();
    }

    #[test]
    fn read_takes_latency_cycles() {
        let (mut mem, mut req, mut out, mut unit) = harness();
        mem[0x10] = 0x2a;

        // Cycle 0: unit raises ready; nothing queued yet.
        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        assert!(req.send(MemRequest::read(RobId(1), 0x10, 1, false)));

        // Cycle 1: accepted. Cycles 2..: counting down.
        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        for _ in 0..MEMORY_LATENCY {
            assert!(out.peek().is_none());
            cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        }
        assert_eq!(out.receive().unwrap().value, 0x2a);
    }

    #[test]
    fn flush_aborts_read_but_not_write() {
        let (mut mem, mut req, mut out, mut unit) = harness();

        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        req.send(MemRequest::read(RobId(1), 0x10, 1, false));
        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        // Flush mid-access: the read never produces a result.
        cycle(&mut unit, &mut mem, &mut req, &mut out, true);
        for _ in 0..2 * MEMORY_LATENCY {
            cycle(&mut unit, &mut mem, &mut req, &mut out, false);
            assert!(out.peek().is_none());
        }

        req.send(MemRequest::write(RobId(2), 0x20, 4, 0xdead_beef));
        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        cycle(&mut unit, &mut mem, &mut req, &mut out, true);
        for _ in 0..MEMORY_LATENCY {
            cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        }
        assert_eq!(&mem[0x20..0x24], &[0xef, 0xbe, 0xad, 0xde]);
    }

    #[test]
    fn out_of_bounds_read_returns_zero_write_dropped() {
        let (mut mem, mut req, mut out, mut unit) = harness();
        let oob = mem.len() as u32 - 3;

        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        req.send(MemRequest::read(RobId(1), oob, 4, false));
        for _ in 0..=MEMORY_LATENCY {
            cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        }
        assert_eq!(out.receive().unwrap().value, 0);
        out.latch();

        cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        req.send(MemRequest::write(RobId(2), oob, 4, 0xffff_ffff));
        for _ in 0..=MEMORY_LATENCY {
            cycle(&mut unit, &mut mem, &mut req, &mut out, false);
        }
        assert!(mem.iter().all(|&b| b == 0));
    }
}
