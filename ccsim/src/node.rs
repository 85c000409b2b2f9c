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

use std::cmp;

use crate::Error;
use crate::NodeId;
use crate::Result;

/// Default slow-start threshold, in packets.
pub const DEFAULT_SSTHRESH: u64 = 64;

/// Congestion-control state of a single sender.
///
/// A node starts with a one-packet window holding sequence number `0` and is
/// only mutated by the congestion engine and the loss model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeState {
    id: NodeId,

    /// Congestion window, in packets. Never below 1.
    pub(crate) cwnd: u64,

    /// Slow-start threshold, in packets. Never below 1.
    pub(crate) ssthresh: u64,

    // Sequence numbers in flight for the current round, in transmission
    // order.
    pub(crate) sent: Vec<u64>,

    // Sequence numbers declared lost, in marking order. No duplicates.
    pub(crate) lost: Vec<u64>,

    pub(crate) ack: u64,

    pub(crate) dup_ack_count: u32,
}

impl NodeState {
    /// Creates a node with the default slow-start threshold.
    pub fn new(id: NodeId) -> Self {
        NodeState {
            id,
            cwnd: 1,
            ssthresh: DEFAULT_SSTHRESH,
            sent: vec![0],
            lost: Vec::new(),
            ack: 0,
            dup_ack_count: 0,
        }
    }

    /// Creates a node with the given initial slow-start threshold.
    ///
    /// Returns [`Error::InvalidArgument`] when `ssthresh` is 0.
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn with_ssthresh(id: NodeId, ssthresh: u64) -> Result<Self> {
        if ssthresh < 1 {
            return Err(Error::InvalidArgument("ssthresh"));
        }

        Ok(NodeState {
            ssthresh,
            ..NodeState::new(id)
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn cwnd(&self) -> u64 {
        self.cwnd
    }

    pub fn ssthresh(&self) -> u64 {
        self.ssthresh
    }

    pub fn sent(&self) -> &[u64] {
        &self.sent
    }

    pub fn lost(&self) -> &[u64] {
        &self.lost
    }

    pub fn ack(&self) -> u64 {
        self.ack
    }

    pub fn dup_ack_count(&self) -> u32 {
        self.dup_ack_count
    }

    /// Returns the node to its initial state with the given threshold.
    pub(crate) fn reset(&mut self, ssthresh: u64) {
        *self = NodeState {
            ssthresh: cmp::max(1, ssthresh),
            ..NodeState::new(self.id)
        };
    }

    /// Highest sequence number of the current round, i.e. the last one
    /// transmitted.
    pub(crate) fn last_sent(&self) -> u64 {
        // `sent` is never empty after construction.
        self.sent.last().copied().unwrap_or(0)
    }

    pub(crate) fn in_slow_start(&self) -> bool {
        self.cwnd < self.ssthresh
    }

    pub(crate) fn trace_id(&self) -> String {
        format!("node={}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let n = NodeState::new(3);

        assert_eq!(n.id(), 3);
        assert_eq!(n.cwnd(), 1);
        assert_eq!(n.ssthresh(), DEFAULT_SSTHRESH);
        assert_eq!(n.sent(), &[0]);
        assert!(n.lost().is_empty());
        assert_eq!(n.ack(), 0);
        assert_eq!(n.dup_ack_count(), 0);
    }

    #[test]
    fn custom_ssthresh() {
        let n = NodeState::with_ssthresh(0, 8).unwrap();
        assert_eq!(n.ssthresh(), 8);
        assert_eq!(n.cwnd(), 1);

        assert_eq!(
            NodeState::with_ssthresh(0, 0),
            Err(Error::InvalidArgument("ssthresh"))
        );
    }

    #[test]
    fn reset() {
        let mut n = NodeState::new(2);
        n.cwnd = 9;
        n.sent = vec![4, 5];
        n.lost = vec![5];
        n.dup_ack_count = 2;

        n.reset(16);
        assert_eq!(n, NodeState::with_ssthresh(2, 16).unwrap());
    }

    #[test]
    fn slow_start_predicate() {
        let mut n = NodeState::with_ssthresh(0, 2).unwrap();
        assert!(n.in_slow_start());

        n.cwnd = 2;
        assert!(!n.in_slow_start());
    }
}
