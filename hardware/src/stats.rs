//! Simulation statistics collection and reporting.
//!
//! Tracks cycle and instruction counts, the instruction mix, branch
//! prediction accuracy, dispatch stalls, and execution time.

use std::time::Instant;

/// Counters accumulated over a simulation run.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_alu: u64,
    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,

    pub branch_predictions: u64,
    pub branch_mispredictions: u64,
    pub flushes: u64,

    pub cdb_broadcasts: u64,

    pub stalls_rob_full: u64,
    pub stalls_backend: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            branch_predictions: 0,
            branch_mispredictions: 0,
            flushes: 0,
            cdb_broadcasts: 0,
            stalls_rob_full: 0,
            stalls_backend: 0,
        }
    }
}

impl SimStats {
    /// Prints a formatted summary of the run to stderr.
    ///
    /// Stderr so the single stdout line produced at HALT stays clean.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);

        let ipc = self.instructions_retired as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        let pct = |n: u64| (n as f64 / instr as f64) * 100.0;

        eprintln!("==========================================================");
        eprintln!("OUT-OF-ORDER CORE SIMULATION STATISTICS");
        eprintln!("==========================================================");
        eprintln!("host_seconds             {:.4} s", seconds);
        eprintln!("sim_cycles               {}", self.cycles);
        eprintln!("sim_freq                 {:.2} kHz", khz);
        eprintln!("sim_insts                {}", self.instructions_retired);
        eprintln!("sim_ipc                  {:.4}", ipc);
        eprintln!("sim_cpi                  {:.4}", cpi);
        eprintln!("----------------------------------------------------------");
        eprintln!("INSTRUCTION MIX");
        eprintln!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            pct(self.inst_alu)
        );
        eprintln!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            pct(self.inst_load)
        );
        eprintln!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            pct(self.inst_store)
        );
        eprintln!(
            "  op.branch              {} ({:.2}%)",
            self.inst_branch,
            pct(self.inst_branch)
        );
        eprintln!("----------------------------------------------------------");
        eprintln!("BRANCH PREDICTION");
        let bp_acc = if self.branch_predictions > 0 {
            100.0 * (1.0 - self.branch_mispredictions as f64 / self.branch_predictions as f64)
        } else {
            0.0
        };
        eprintln!("  bp.lookups             {}", self.branch_predictions);
        eprintln!("  bp.mispredicts         {}", self.branch_mispredictions);
        eprintln!("  bp.accuracy            {:.2}%", bp_acc);
        eprintln!("  pipeline.flushes       {}", self.flushes);
        eprintln!("----------------------------------------------------------");
        eprintln!("BACKEND");
        eprintln!("  cdb.broadcasts         {}", self.cdb_broadcasts);
        eprintln!("  stalls.rob_full        {}", self.stalls_rob_full);
        eprintln!("  stalls.backend_busy    {}", self.stalls_backend);
        eprintln!("==========================================================");
    }
}
