// Copyright (C) 2025, Cloudflare, Inc.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//
//     * Redistributions in binary form must reproduce the above copyright
//       notice, this list of conditions and the following disclaimer in the
//       documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS
// IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO,
// THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR
// PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Multi-round driver.
//!
//! The [`Driver`] repeatedly steps one source/destination pair until a round
//! budget is exhausted or it is stopped. It owns no clock: callers wanting a
//! fixed cadence call [`Driver::tick()`] from their own timer.
//!
//! [`Driver`]: struct.Driver.html
//! [`Driver::tick()`]: struct.Driver.html#method.tick

use crate::Error;
use crate::NodeId;
use crate::Result;
use crate::Simulation;
use crate::Transcript;

/// Default number of rounds per run.
pub const DEFAULT_ROUNDS: u64 = 10;

/// Steps a simulation for a bounded number of rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Driver {
    budget: u64,

    current_round: u64,

    running: bool,
}

impl Driver {
    /// Creates a stopped driver allowed `budget` rounds per run.
    ///
    /// Returns [`Error::InvalidArgument`] when `budget` is 0.
    ///
    /// [`Error::InvalidArgument`]: ../enum.Error.html#variant.InvalidArgument
    pub fn new(budget: u64) -> Result<Self> {
        if budget < 1 {
            return Err(Error::InvalidArgument("round budget"));
        }

        Ok(Driver {
            budget,
            current_round: 0,
            running: false,
        })
    }

    /// Resets `sim` and starts a new run.
    pub fn start(&mut self, sim: &mut Simulation) {
        sim.reset();

        self.current_round = 0;
        self.running = true;

        info!("simulation started, {} rounds", self.budget);
    }

    /// Halts the run. Further ticks do nothing until the next start.
    pub fn stop(&mut self) {
        if self.running {
            info!("simulation stopped at round {}", self.current_round);
        }

        self.running = false;
    }

    /// Steps `source` towards `dest` once.
    ///
    /// Returns `Ok(None)` when the driver is stopped or the budget is spent.
    /// The driver stops itself after the last round of the budget, and also
    /// when a step fails.
    pub fn tick(
        &mut self, sim: &mut Simulation, source: NodeId, dest: NodeId,
    ) -> Result<Option<Transcript>> {
        if !self.running || self.current_round >= self.budget {
            self.running = false;
            return Ok(None);
        }

        let transcript = match sim.step(source, dest) {
            Ok(v) => v,

            Err(e) => {
                error!("round {} failed: {}", self.current_round + 1, e);
                self.running = false;
                return Err(e);
            },
        };

        self.current_round += 1;

        if self.current_round >= self.budget {
            info!("simulation finished after {} rounds", self.current_round);
            self.running = false;
        }

        Ok(Some(transcript))
    }

    /// Starts a run and ticks it to completion, collecting the transcripts.
    pub fn run(
        &mut self, sim: &mut Simulation, source: NodeId, dest: NodeId,
    ) -> Result<Vec<Transcript>> {
        self.start(sim);

        let capacity = self.budget.min(1024) as usize;
        let mut transcripts = Vec::with_capacity(capacity);

        while let Some(t) = self.tick(sim, source, dest)? {
            transcripts.push(t);
        }

        Ok(transcripts)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_round(&self) -> u64 {
        self.current_round
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }
}
