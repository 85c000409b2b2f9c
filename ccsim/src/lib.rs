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

//! 🐢 Window-based congestion control simulator.
//!
//! ccsim models the sender side of a TCP-like congestion control scheme
//! (slow start, threshold halving, go-back-N retransmission and fast
//! retransmit) for one or more independent senders, optionally connected
//! into an arbitrary topology.
//!
//! The simulator is discrete: every call to [`Simulation::step()`] is one
//! round, in which one window is transmitted, losses are applied, the
//! window is acknowledged and the next window is chosen. There is no clock,
//! no byte-level modelling and no bandwidth sharing between senders.
//!
//! ## Configuration
//!
//! A [`Config`] describes the initial slow-start threshold and how packets
//! are lost:
//!
//! ```
//! let mut config = ccsim::Config::new();
//!
//! config.set_initial_ssthresh(32)?;
//! config.set_manual_lost_packets_str("3, 5")?;
//! # Ok::<(), ccsim::Error>(())
//! ```
//!
//! When no packet is designated lost, the last packet of each window is lost
//! with probability [`set_loss_rate()`], drawn from a generator seeded with
//! [`set_seed()`] so that runs can be replayed.
//!
//! ## Stepping
//!
//! Senders are created by [`Simulation::new()`] with ids `0..n`. A sender
//! can only be stepped towards a destination it is connected to, or towards
//! itself:
//!
//! ```
//! let config = ccsim::Config::new();
//! let mut sim = ccsim::Simulation::new(2, &config)?;
//!
//! sim.add_connection(0, 1)?;
//!
//! let transcript = sim.step(0, 1)?;
//! assert_eq!(transcript.cwnd, 2);
//! assert_eq!(transcript.sent, vec![2, 3]);
//!
//! assert_eq!(sim.step(1, 1)?.cwnd, 2);
//! # Ok::<(), ccsim::Error>(())
//! ```
//!
//! A [`Driver`] runs a bounded number of rounds.
//!
//! [`Config`]: struct.Config.html
//! [`set_loss_rate()`]: struct.Config.html#method.set_loss_rate
//! [`set_seed()`]: struct.Config.html#method.set_seed
//! [`Simulation::new()`]: struct.Simulation.html#method.new
//! [`Simulation::step()`]: struct.Simulation.html#method.step
//! [`Driver`]: driver/struct.Driver.html

#[macro_use]
extern crate log;

/// Identifier of a sender, unique within a simulation.
pub type NodeId = u32;

/// Stores configuration shared between simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    initial_ssthresh: u64,

    loss_rate: f64,

    manual_lost_packets: Vec<u64>,

    seed: u64,
}

impl Config {
    /// Creates a config with a threshold of 64 packets and no loss.
    pub fn new() -> Self {
        Config {
            initial_ssthresh: node::DEFAULT_SSTHRESH,
            loss_rate: 0.0,
            manual_lost_packets: Vec::new(),
            seed: 0,
        }
    }

    /// Sets the slow-start threshold senders start with, in packets.
    ///
    /// Returns [`Error::InvalidArgument`] when `v` is 0.
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn set_initial_ssthresh(&mut self, v: u64) -> Result<()> {
        if v < 1 {
            return Err(Error::InvalidArgument("ssthresh"));
        }

        self.initial_ssthresh = v;

        Ok(())
    }

    /// Sets the probability, in percent, of losing the last packet of each
    /// window.
    ///
    /// Only used when no packet is designated lost. Returns
    /// [`Error::InvalidArgument`] unless `v` is within `0..=100`.
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn set_loss_rate(&mut self, v: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&v) {
            return Err(Error::InvalidArgument("loss rate"));
        }

        self.loss_rate = v;

        Ok(())
    }

    /// Designates sequence numbers to drop whenever they are in flight.
    ///
    /// A non-empty list disables random loss.
    pub fn set_manual_lost_packets(&mut self, pkts: &[u64]) {
        self.manual_lost_packets = pkts.to_vec();
    }

    /// Same as [`set_manual_lost_packets()`], from a comma-separated list
    /// such as `"1,2,3"`.
    ///
    /// [`set_manual_lost_packets()`]: struct.Config.html#method.set_manual_lost_packets
    pub fn set_manual_lost_packets_str(&mut self, list: &str) -> Result<()> {
        self.manual_lost_packets = loss::parse_lost_packets(list)?;

        Ok(())
    }

    /// Sets the seed of the random loss draws.
    pub fn set_seed(&mut self, v: u64) {
        self.seed = v;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

pub use crate::congestion::Transition;
pub use crate::driver::Driver;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::graph::ConnectivityGraph;
pub use crate::node::NodeState;
pub use crate::settings::SimulationSettings;
pub use crate::simulation::Simulation;
pub use crate::transcript::Transcript;

pub mod congestion;
pub mod driver;
mod error;
mod graph;
pub mod loss;
mod node;
pub mod seq;
pub mod settings;
mod simulation;
pub mod stepper;
mod transcript;
