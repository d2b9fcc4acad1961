//! Branch predictor.
//!
//! A table of 2-bit saturating counters keyed by PC, initialized weakly
//! not-taken on first touch. The frontend consults it for conditional
//! branches; the commit stage trains it with every retired branch.

use std::collections::HashMap;

const STRONG_NOT: u8 = 0;
const WEAK_NOT: u8 = 1;
const WEAK_TAKEN: u8 = 2;
const STRONG_TAKEN: u8 = 3;

pub struct BranchPredictor {
    table: HashMap<u32, u8>,
}

impl BranchPredictor {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Predicted direction for the branch at `pc`. Unseen branches predict
    /// not-taken.
    pub fn predict(&self, pc: u32) -> bool {
        match self.table.get(&pc) {
            Some(&state) => state >= WEAK_TAKEN,
            None => false,
        }
    }

    /// Trains the counter for `pc` with the actual direction.
    pub fn update(&mut self, pc: u32, taken: bool) {
        let state = self.table.entry(pc).or_insert(WEAK_NOT);
        if taken {
            if *state != STRONG_TAKEN {
                *state += 1;
            }
        } else if *state != STRONG_NOT {
            *state -= 1;
        }
    }
}

impl Default for BranchPredictor {
    fn default() -> Self {
        Self::new()
    }
}
