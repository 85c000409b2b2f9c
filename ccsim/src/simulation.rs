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

use std::collections::BTreeMap;

use crate::graph::ConnectivityGraph;
use crate::loss;
use crate::loss::LossModel;
use crate::stepper;
use crate::Config;
use crate::Error;
use crate::NodeId;
use crate::NodeState;
use crate::Result;
use crate::Transcript;

/// A set of independent senders and the topology connecting them.
///
/// Each call to [`step()`] touches exactly one sender; the others are never
/// read or written.
///
/// [`step()`]: struct.Simulation.html#method.step
pub struct Simulation {
    initial_ssthresh: u64,

    nodes: BTreeMap<NodeId, NodeState>,

    graph: ConnectivityGraph,

    loss: LossModel,

    rounds: u64,
}

impl Simulation {
    /// Creates `node_count` senders, with ids `0..node_count`.
    ///
    /// Returns [`Error::InvalidArgument`] when `node_count` is 0.
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn new(node_count: u32, config: &Config) -> Result<Self> {
        if node_count < 1 {
            return Err(Error::InvalidArgument("node count"));
        }

        let mut nodes = BTreeMap::new();

        for id in 0..node_count {
            let node = NodeState::with_ssthresh(id, config.initial_ssthresh)?;
            nodes.insert(id, node);
        }

        let loss = LossModel::from_config(config);

        debug!(
            "simulation created with {} nodes, ssthresh={} loss={:?}",
            node_count,
            config.initial_ssthresh,
            loss.mode()
        );

        Ok(Simulation {
            initial_ssthresh: config.initial_ssthresh,
            nodes,
            graph: ConnectivityGraph::new(),
            loss,
            rounds: 0,
        })
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeState> {
        self.nodes.get(&id).ok_or(Error::UnknownNode(id))
    }

    /// Iterates over the senders in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeState> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn graph(&self) -> &ConnectivityGraph {
        &self.graph
    }

    /// Connects `a` and `b`. Connecting an already connected pair is a
    /// no-op; the return value tells whether the edge is new.
    pub fn add_connection(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        self.node(a)?;
        self.node(b)?;

        self.graph.add_connection(a, b)
    }

    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.is_connected(a, b)
    }

    /// Declares `seq` lost on node `id`, see [`loss::mark_lost()`].
    ///
    /// [`loss::mark_lost()`]: loss/fn.mark_lost.html
    pub fn mark_lost(&mut self, id: NodeId, seq: u64) -> Result<bool> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;

        Ok(loss::mark_lost(node, seq))
    }

    /// Runs one round for `source` sending to `dest`.
    pub fn step(&mut self, source: NodeId, dest: NodeId) -> Result<Transcript> {
        self.node(dest)?;

        let node = self
            .nodes
            .get_mut(&source)
            .ok_or(Error::UnknownNode(source))?;

        let transcript = stepper::step(
            node,
            &self.graph,
            source,
            dest,
            &mut self.loss,
            self.rounds + 1,
        )?;

        self.rounds += 1;

        trace!("{}", transcript);

        Ok(transcript)
    }

    /// Puts every sender back in its initial state and replays the loss
    /// model from its seed. The topology is kept.
    pub fn reset(&mut self) {
        for node in self.nodes.values_mut() {
            node.reset(self.initial_ssthresh);
        }

        self.loss.reset();
        self.rounds = 0;

        debug!("simulation reset");
    }

    /// Number of rounds stepped since creation or the last reset.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }
}
