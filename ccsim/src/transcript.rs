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

use std::fmt;

use serde::Serialize;

use crate::congestion::Transition;
use crate::NodeId;
use crate::NodeState;

/// Snapshot of a sender after one simulated round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transcript {
    /// 1-based index of the round since the simulation was (re)started.
    pub round: u64,

    pub source: NodeId,

    pub dest: NodeId,

    pub ack: u64,

    pub cwnd: u64,

    pub ssthresh: u64,

    /// The window to be transmitted next round.
    pub sent: Vec<u64>,

    /// Packets still declared lost.
    pub lost: Vec<u64>,

    pub dup_ack_count: u32,

    /// Packets the loss model declared lost during this round.
    pub newly_lost: Vec<u64>,

    /// Packet retransmitted by the acknowledgement half of the round, if a
    /// fast retransmit fired there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retransmitted: Option<u64>,

    pub transition: Transition,
}

impl Transcript {
    pub(crate) fn new(
        round: u64, dest: NodeId, node: &NodeState, newly_lost: Vec<u64>,
        retransmitted: Option<u64>, transition: Transition,
    ) -> Self {
        Transcript {
            round,
            source: node.id(),
            dest,
            ack: node.ack(),
            cwnd: node.cwnd(),
            ssthresh: node.ssthresh(),
            sent: node.sent().to_vec(),
            lost: node.lost().to_vec(),
            dup_ack_count: node.dup_ack_count(),
            newly_lost,
            retransmitted,
            transition,
        }
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "round={} {}->{} {:?} ack={} cwnd={} ssthresh={} dup_acks={} sent={:?} lost={:?}",
            self.round,
            self.source,
            self.dest,
            self.transition,
            self.ack,
            self.cwnd,
            self.ssthresh,
            self.dup_ack_count,
            self.sent,
            self.lost,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Transcript {
        let node = NodeState::new(1);
        Transcript::new(3, 2, &node, vec![], None, Transition::SlowStart)
    }

    #[test]
    fn snapshot() {
        let t = transcript();

        assert_eq!(t.source, 1);
        assert_eq!(t.dest, 2);
        assert_eq!(t.cwnd, 1);
        assert_eq!(t.ssthresh, 64);
        assert_eq!(t.sent, vec![0]);
    }

    #[test]
    fn display() {
        assert_eq!(
            transcript().to_string(),
            "round=3 1->2 SlowStart ack=0 cwnd=1 ssthresh=64 dup_acks=0 sent=[0] lost=[]"
        );
    }

    #[test]
    fn json() {
        let v = serde_json::to_value(transcript()).unwrap();

        assert_eq!(v["transition"], "slow_start");
        assert_eq!(v["sent"], serde_json::json!([0]));
        assert!(v.get("retransmitted").is_none());
    }
}
