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

//! Simulation settings, as loaded from a JSON document.

use serde::Deserialize;

use crate::driver::Driver;
use crate::driver::DEFAULT_ROUNDS;
use crate::node::DEFAULT_SSTHRESH;
use crate::Config;
use crate::Error;
use crate::NodeId;
use crate::Result;
use crate::Simulation;

/// Everything needed to set up and drive a simulation run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Number of senders.
    ///
    /// Defaults to `1`.
    #[serde(default = "SimulationSettings::default_nodes")]
    pub nodes: u32,

    /// Pairs of connected senders.
    ///
    /// Defaults to no connections.
    #[serde(default)]
    pub connections: Vec<(NodeId, NodeId)>,

    /// Sender to step.
    ///
    /// Defaults to `0`.
    #[serde(default)]
    pub source: NodeId,

    /// Destination of the stepped sender.
    ///
    /// Defaults to `0`, i.e. the lone sender case.
    #[serde(default)]
    pub dest: NodeId,

    /// Initial slow-start threshold, in packets.
    ///
    /// Defaults to `64`.
    #[serde(default = "SimulationSettings::default_ssthresh")]
    pub initial_ssthresh: u64,

    /// Probability of losing the last packet of each window, in percent.
    ///
    /// Defaults to `0`.
    #[serde(default)]
    pub loss_rate: f64,

    /// Sequence numbers to drop whenever they are in flight. Takes
    /// precedence over `loss_rate` when non-empty.
    ///
    /// Defaults to none.
    #[serde(default)]
    pub manual_lost_packets: Vec<u64>,

    /// Seed of the random loss draws.
    ///
    /// Defaults to `0`.
    #[serde(default)]
    pub seed: u64,

    /// Round budget of a run.
    ///
    /// Defaults to `10`.
    #[serde(default = "SimulationSettings::default_rounds")]
    pub rounds: u64,

    /// Delay between rounds, in milliseconds.
    ///
    /// Defaults to `0`.
    #[serde(rename = "interval_ms", default)]
    pub interval: u64,
}

impl SimulationSettings {
    #[inline]
    fn default_nodes() -> u32 {
        1
    }

    #[inline]
    fn default_ssthresh() -> u64 {
        DEFAULT_SSTHRESH
    }

    #[inline]
    fn default_rounds() -> u64 {
        DEFAULT_ROUNDS
    }

    /// Parses settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            warn!("invalid settings: {}", e);
            Error::InvalidArgument("settings")
        })
    }

    /// Returns the validated simulation configuration.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::new();

        config.set_initial_ssthresh(self.initial_ssthresh)?;
        config.set_loss_rate(self.loss_rate)?;
        config.set_manual_lost_packets(&self.manual_lost_packets);
        config.set_seed(self.seed);

        Ok(config)
    }

    /// Creates the simulation described by these settings, topology
    /// included.
    ///
    /// Fails with [`Error::UnknownNode`] when `source` or `dest` is not one
    /// of the simulated nodes.
    ///
    /// [`Error::UnknownNode`]: ../enum.Error.html#variant.UnknownNode
    pub fn simulation(&self) -> Result<Simulation> {
        let mut sim = Simulation::new(self.nodes, &self.to_config()?)?;

        for &(a, b) in &self.connections {
            sim.add_connection(a, b)?;
        }

        sim.node(self.source)?;
        sim.node(self.dest)?;

        Ok(sim)
    }

    pub fn driver(&self) -> Result<Driver> {
        Driver::new(self.rounds)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            nodes: Self::default_nodes(),
            connections: Vec::new(),
            source: 0,
            dest: 0,
            initial_ssthresh: Self::default_ssthresh(),
            loss_rate: 0.0,
            manual_lost_packets: Vec::new(),
            seed: 0,
            rounds: Self::default_rounds(),
            interval: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(
            SimulationSettings::from_json("{}"),
            Ok(SimulationSettings::default())
        );
    }

    #[test]
    fn full_document() {
        let s = SimulationSettings::from_json(
            r#"{
                "nodes": 3,
                "connections": [[0, 1], [1, 2]],
                "source": 1,
                "dest": 2,
                "initial_ssthresh": 8,
                "loss_rate": 12.5,
                "manual_lost_packets": [3, 4],
                "seed": 99,
                "rounds": 20,
                "interval_ms": 1000
            }"#,
        )
        .unwrap();

        assert_eq!(s.nodes, 3);
        assert_eq!(s.connections, vec![(0, 1), (1, 2)]);
        assert_eq!(s.interval, 1000);

        let sim = s.simulation().unwrap();
        assert!(sim.is_connected(2, 1));
        assert!(!sim.is_connected(0, 2));
        assert!(sim.nodes().all(|n| n.ssthresh() == 8));

        assert_eq!(s.driver().unwrap().budget(), 20);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert_eq!(
            SimulationSettings::from_json(r#"{"cwnd": 4}"#),
            Err(Error::InvalidArgument("settings"))
        );
    }

    #[test]
    fn invalid_values() {
        let s = SimulationSettings {
            loss_rate: 101.0,
            ..Default::default()
        };
        assert_eq!(
            s.to_config().err(),
            Some(Error::InvalidArgument("loss rate"))
        );

        let s = SimulationSettings {
            connections: vec![(0, 4)],
            ..Default::default()
        };
        assert_eq!(s.simulation().err(), Some(Error::UnknownNode(4)));
    }

    #[test]
    fn endpoints_must_exist() {
        let s = SimulationSettings {
            source: 5,
            ..Default::default()
        };
        assert_eq!(s.simulation().err(), Some(Error::UnknownNode(5)));

        let s = SimulationSettings {
            nodes: 3,
            dest: 3,
            ..Default::default()
        };
        assert_eq!(s.simulation().err(), Some(Error::UnknownNode(3)));

        let s = SimulationSettings {
            nodes: 3,
            source: 2,
            dest: 1,
            ..Default::default()
        };
        assert!(s.simulation().is_ok());
    }
}
