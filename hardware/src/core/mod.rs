//! The out-of-order core.
//!
//! [`Cpu`] is the harness: it owns the unified memory, every architectural
//! and micro-architectural structure, and the full channel fabric in
//! [`Wires`]. One call to [`Cpu::tick`] is one clock cycle:
//!
//! 1. **Rising phase** — the stages run in a fixed order (CDB arbitration,
//!    frontend, commit, dispatch, execute, memory). Stages read the values
//!    their input channels latched at the end of the previous cycle and
//!    deposit outputs into writer slots.
//! 2. **Falling phase** — every channel and bus latches, making this
//!    cycle's sends visible to next cycle's readers.
//!
//! Because all cross-stage traffic rides the fabric, the calling order
//! inside the rising phase cannot leak one stage's same-cycle output into
//! another; the order only fixes who observes shared state (reorder buffer,
//! register file) first, matching the hardware's registration order.

/// Common Data Bus arbiter.
pub mod cdb;

/// Channel / bus / handshake fabric.
pub mod channel;

/// Memory request model and memory-order buffer.
pub mod memsys;

/// Branch predictor.
pub mod predictor;

/// Architectural register file with renaming.
pub mod regfile;

/// Reorder buffer.
pub mod rob;

/// Pipeline stage functions.
pub mod stages;

/// Reservation stations.
pub mod station;

/// Functional units.
pub mod units;

use cdb::CommonDataBus;
use channel::{Bus, Channel, HandshakeChannel};
use memsys::{mob::MemoryOrderBuffer, Access, MemRequest};
use predictor::BranchPredictor;
use regfile::RegFile;
use rob::{ReorderBuffer, RobEntry};
use stages::fetch::FetchResult;
use station::ReservationStation;
use units::branch::BranchResult;
use units::memory::MemoryUnit;

use crate::common::{RobId, SimError};
use crate::config::Config;
use crate::isa::{DecodedInst, FilledInst};
use crate::stats::SimStats;

/// Every channel and bus connecting the pipeline stages.
///
/// The harness owns them all by value; components receive borrows for the
/// duration of one stage call. [`Wires::latch`] is the falling clock edge.
pub struct Wires {
    /// PC logic -> fetch.
    pub fetch_pc: Channel<u32>,
    /// Fetch -> decode.
    pub fetched: Channel<FetchResult>,
    /// Decode -> PC logic (predicted-taken target).
    pub predicted_pc: Channel<u32>,
    /// Decode -> dispatch.
    pub decoded: Channel<DecodedInst>,
    /// Dispatch -> reservation stations, by class.
    pub alu_issue: Channel<FilledInst>,
    pub mem_issue: Channel<FilledInst>,
    pub branch_issue: Channel<FilledInst>,
    /// Reservation station -> functional unit.
    pub alu_exec: Channel<FilledInst>,
    pub branch_exec: Channel<FilledInst>,
    /// Memory reservation station -> MOB (program-order mark, then fill).
    pub mob_mark: Channel<(RobId, Access)>,
    pub mob_fill: Channel<FilledInst>,
    /// MOB -> memory unit.
    pub mem_req: HandshakeChannel<MemRequest>,
    /// Branch unit -> commit.
    pub branch_result: Channel<BranchResult>,
    /// Commit -> PC logic (corrected PC after a misprediction).
    pub flush_pc: Channel<u32>,
    /// Global flush pulse.
    pub flush: Bus<bool>,
    /// Frontend-local squash pulse after a decode-time redirect.
    pub fetch_flush: Bus<bool>,
    /// Committed-instruction broadcast (MOB, predictor, observers).
    pub commit: Bus<RobEntry>,
}

impl Wires {
    fn new() -> Self {
        Self {
            fetch_pc: Channel::new(),
            fetched: Channel::new(),
            predicted_pc: Channel::new(),
            decoded: Channel::new(),
            alu_issue: Channel::new(),
            mem_issue: Channel::new(),
            branch_issue: Channel::new(),
            alu_exec: Channel::new(),
            branch_exec: Channel::new(),
            mob_mark: Channel::new(),
            mob_fill: Channel::new(),
            mem_req: HandshakeChannel::new(),
            branch_result: Channel::new(),
            flush_pc: Channel::new(),
            flush: Bus::new(),
            fetch_flush: Bus::new(),
            commit: Bus::new(),
        }
    }

    /// Falling-edge state commit for every transport.
    ///
    /// The handshake channel is deliberately absent: its protocol is
    /// level-sensitive, not latched.
    fn latch(&mut self) {
        self.fetch_pc.latch();
        self.fetched.latch();
        self.predicted_pc.latch();
        self.decoded.latch();
        self.alu_issue.latch();
        self.mem_issue.latch();
        self.branch_issue.latch();
        self.alu_exec.latch();
        self.branch_exec.latch();
        self.mob_mark.latch();
        self.mob_fill.latch();
        self.branch_result.latch();
        self.flush_pc.latch();
        self.flush.latch();
        self.fetch_flush.latch();
        self.commit.latch();
    }
}

/// The simulated core plus its unified memory.
pub struct Cpu {
    pub mem: Vec<u8>,
    /// The fetch PC (PC-logic state).
    pub pc: u32,
    pub regs: RegFile,
    pub rob: ReorderBuffer,
    pub alu_rs: ReservationStation,
    pub branch_rs: ReservationStation,
    pub mem_rs: ReservationStation,
    pub mob: MemoryOrderBuffer,
    pub mem_unit: MemoryUnit,
    pub predictor: BranchPredictor,
    pub cdb: CommonDataBus,
    pub wires: Wires,
    pub stats: SimStats,
    pub cycle: u64,

    exit_code: Option<u8>,
    commit_log: Option<Vec<RobEntry>>,
}

impl Cpu {
    /// Builds a core with `image` loaded at address 0 of the unified memory.
    pub fn new(config: &Config, image: &[u8]) -> Self {
        let mut mem = vec![0u8; config.memory.size];
        let n = image.len().min(mem.len());
        mem[..n].copy_from_slice(&image[..n]);

        Self {
            mem,
            pc: 0,
            regs: RegFile::new(),
            rob: ReorderBuffer::new(config.core.rob_size),
            alu_rs: ReservationStation::new("alu", config.core.rs_alu_size),
            branch_rs: ReservationStation::new("branch", config.core.rs_branch_size),
            mem_rs: ReservationStation::new("mem", config.core.rs_mem_size),
            mob: MemoryOrderBuffer::new(config.core.mob_size),
            mem_unit: MemoryUnit::new(config.memory.latency),
            predictor: BranchPredictor::new(),
            cdb: CommonDataBus::new(),
            wires: Wires::new(),
            stats: SimStats::default(),
            cycle: 0,
            exit_code: None,
            commit_log: if config.general.log_commits {
                Some(Vec::new())
            } else {
                None
            },
        }
    }

    /// Advances the whole machine by one clock cycle.
    pub fn tick(&mut self) -> Result<(), SimError> {
        // The flush pulse raised last cycle is visible to every stage now.
        let flush = self.wires.flush.get().copied().unwrap_or(false);
        self.cycle += 1;
        self.stats.cycles += 1;

        self.cdb.tick(self.cycle, flush);
        stages::fetch::fetch_stage(self, flush);
        stages::commit::commit_stage(self, flush)?;
        stages::dispatch::dispatch_stage(self, flush)?;
        stages::execute::execute_stage(self, flush);
        stages::memory::memory_stage(self, flush);

        self.wires.latch();
        self.cdb.latch();
        Ok(())
    }

    /// The HALT result, once the sentinel has committed.
    pub fn take_exit(&mut self) -> Option<u8> {
        self.exit_code.take()
    }

    pub(crate) fn set_exit(&mut self, value: u8) {
        self.exit_code = Some(value);
    }

    /// Appends to the committed-instruction record when enabled.
    pub(crate) fn log_commit(&mut self, entry: &RobEntry) {
        if let Some(records) = &mut self.commit_log {
            records.push(*entry);
        }
    }

    /// The committed-instruction record (`general.log_commits = true`).
    pub fn commit_log(&self) -> &[RobEntry] {
        self.commit_log.as_deref().unwrap_or(&[])
    }
}
