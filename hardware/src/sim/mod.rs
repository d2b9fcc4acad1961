//! Simulation harness and memory-image loading.

/// Memory-image parser (`@addr` / hex-byte format).
pub mod loader;

use log::debug;

use crate::common::SimError;
use crate::core::Cpu;

/// Ticks `cpu` until the HALT sentinel commits.
///
/// Returns the value HALT printed (`a0 & 0xff`). Gives up with
/// [`SimError::CycleLimit`] after `max_cycles` so a program that never
/// reaches the sentinel cannot hang the host.
pub fn run(cpu: &mut Cpu, max_cycles: u64) -> Result<u8, SimError> {
    loop {
        cpu.tick()?;
        if let Some(value) = cpu.take_exit() {
            debug!("run: halted after {} cycles", cpu.cycle);
            return Ok(value);
        }
        if cpu.cycle >= max_cycles {
            return Err(SimError::CycleLimit(cpu.cycle));
        }
    }
}
