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

//! One simulated round for a single sender.

use crate::congestion;
use crate::graph::ConnectivityGraph;
use crate::loss::LossModel;
use crate::Error;
use crate::NodeId;
use crate::NodeState;
use crate::Result;
use crate::Transcript;

/// Runs one round for `node` sending from `source` to `dest`.
///
/// The round applies `loss` to the node, acknowledges the window in flight
/// and advances the window. The node must be `source`, otherwise
/// [`Error::UnknownNode`] is returned. Either the whole round is applied or,
/// on error, the node is left untouched.
///
/// [`Error::UnknownNode`]: ../enum.Error.html#variant.UnknownNode
pub fn step(
    node: &mut NodeState, graph: &ConnectivityGraph, source: NodeId,
    dest: NodeId, loss: &mut LossModel, round: u64,
) -> Result<Transcript> {
    if node.id() != source {
        return Err(Error::UnknownNode(source));
    }

    congestion::check_path(graph, source, dest)?;

    let mut next = node.clone();

    let newly_lost = loss.apply(&mut next);
    let retransmitted = congestion::acknowledge(&mut next);
    let transition = congestion::advance(&mut next)?;

    *node = next;

    Ok(Transcript::new(
        round,
        dest,
        node,
        newly_lost,
        retransmitted,
        transition,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::congestion::Transition;
    use crate::loss::LossMode;

    fn no_loss() -> LossModel {
        LossModel::new(LossMode::Random(0.0), 0)
    }

    #[test]
    fn clean_round() {
        let graph = ConnectivityGraph::new();
        let mut node = NodeState::new(0);

        let t = step(&mut node, &graph, 0, 0, &mut no_loss(), 1).unwrap();

        assert_eq!(t.transition, Transition::SlowStart);
        assert_eq!(t.ack, 1);
        assert_eq!(t.cwnd, 2);
        assert_eq!(t.sent, vec![2, 3]);
        assert_eq!(node.sent(), &[2, 3]);
    }

    #[test]
    fn wrong_source() {
        let graph = ConnectivityGraph::new();
        let mut node = NodeState::new(0);

        assert_eq!(
            step(&mut node, &graph, 4, 4, &mut no_loss(), 1),
            Err(Error::UnknownNode(4))
        );
    }

    #[test]
    fn not_connected_leaves_node_untouched() {
        let graph = ConnectivityGraph::new();
        let mut node = NodeState::new(0);
        let mut loss = LossModel::new(LossMode::Manual(vec![0]), 0);

        assert_eq!(
            step(&mut node, &graph, 0, 1, &mut loss, 1),
            Err(Error::NotConnected(0, 1))
        );
        assert_eq!(node, NodeState::new(0));
    }

    #[test]
    fn manual_loss_round() {
        let mut graph = ConnectivityGraph::new();
        graph.add_connection(0, 1).unwrap();

        let mut node = NodeState::new(0);
        let mut loss = LossModel::new(LossMode::Manual(vec![0]), 0);

        let t = step(&mut node, &graph, 0, 1, &mut loss, 1).unwrap();

        assert_eq!(t.newly_lost, vec![0]);
        assert_eq!(t.ack, 0);
        assert_eq!(t.dup_ack_count, 1);
        assert_eq!(t.transition, Transition::GoBackN);
        assert_eq!(t.sent, vec![0]);
        assert!(t.lost.is_empty());
    }
}
