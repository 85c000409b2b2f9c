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

use std::collections::BTreeSet;

use crate::Error;
use crate::NodeId;
use crate::Result;

/// Undirected set of node pairs allowed to exchange traffic.
///
/// Edges are only ever added. Pairs are stored with the smaller id first, so
/// `{a, b}` and `{b, a}` are the same edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityGraph {
    edges: BTreeSet<(NodeId, NodeId)>,
}

impl ConnectivityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge `{a, b}`.
    ///
    /// Re-adding an existing edge, in either direction, is a no-op. Returns
    /// whether the edge is new. Self-loops are rejected with
    /// [`Error::InvalidArgument`].
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn add_connection(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        if a == b {
            return Err(Error::InvalidArgument("self connection"));
        }

        let added = self.edges.insert(edge(a, b));

        if added {
            debug!("connected {} <-> {}", a, b);
        }

        Ok(added)
    }

    /// Returns whether `a` and `b` share an edge.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&edge(a, b))
    }

    /// Iterates over the edges, smaller id first, in ascending order.
    pub fn connections(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn edge(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    (a.min(b), a.max(b))
}
