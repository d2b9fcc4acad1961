//! Configuration loading and parsing.
//!
//! The simulator reads a TOML file describing the memory footprint and the
//! depths of the core's bounded structures. Every field has a default equal
//! to the architectural contract value, so an empty file (or no file at all)
//! yields the reference configuration.

use serde::Deserialize;

use crate::common::constants;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub core: CoreConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    /// Record every committed instruction (test / debugging aid).
    #[serde(default)]
    pub log_commits: bool,

    /// Abort if the HALT sentinel has not committed after this many cycles.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_commits: false,
            max_cycles: default_max_cycles(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MemoryConfig {
    /// Unified memory size in bytes.
    #[serde(default = "default_memory_size")]
    pub size: usize,

    /// Memory unit access latency in cycles.
    #[serde(default = "default_memory_latency")]
    pub latency: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: default_memory_size(),
            latency: default_memory_latency(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_rob_size")]
    pub rob_size: usize,

    #[serde(default = "default_rs_size")]
    pub rs_alu_size: usize,

    #[serde(default = "default_rs_size")]
    pub rs_branch_size: usize,

    #[serde(default = "default_rs_size")]
    pub rs_mem_size: usize,

    #[serde(default = "default_mob_size")]
    pub mob_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rob_size: default_rob_size(),
            rs_alu_size: default_rs_size(),
            rs_branch_size: default_rs_size(),
            rs_mem_size: default_rs_size(),
            mob_size: default_mob_size(),
        }
    }
}

fn default_max_cycles() -> u64 {
    100_000_000
}

fn default_memory_size() -> usize {
    constants::MEMORY_SIZE
}

fn default_memory_latency() -> u32 {
    constants::MEMORY_LATENCY
}

fn default_rob_size() -> usize {
    constants::ROB_SIZE
}

fn default_rs_size() -> usize {
    constants::RS_ALU_SIZE
}

fn default_mob_size() -> usize {
    constants::MOB_SIZE
}
