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

//! Window-based congestion control.
//!
//! Each round is split in two halves. [`acknowledge`] computes the
//! cumulative acknowledgement for the window in flight and counts duplicate
//! acknowledgements, and [`advance_window`] picks the next window:
//!
//! * no loss, below the threshold: slow start, the window grows by one
//!   packet per round;
//! * no loss, threshold reached: the window collapses to one packet and the
//!   threshold is halved;
//! * loss, fewer than three duplicate acknowledgements: the window is halved
//!   and the lost packets are sent again (go-back-N);
//! * loss, three duplicate acknowledgements: fast retransmit of the first
//!   lost packet, growing the window up to the threshold.
//!
//! There is no explicit state enum, the phase is derived from the node's
//! loss set and duplicate acknowledgement counter every round.

use std::cmp;

use serde::Serialize;

use crate::graph::ConnectivityGraph;
use crate::seq;
use crate::Error;
use crate::NodeId;
use crate::NodeState;
use crate::Result;

/// Number of duplicate acknowledgements that triggers a fast retransmit.
pub const FAST_RETRANSMIT_THRESHOLD: u32 = 3;

/// The branch taken by [`advance_window`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// No loss and `cwnd < ssthresh`: the window grew by one packet.
    SlowStart,

    /// No loss and `cwnd >= ssthresh`: the window collapsed to one packet
    /// and the threshold was halved.
    ThresholdReached,

    /// Loss without enough duplicate acknowledgements: the window was
    /// halved and the lost packets became the next window.
    GoBackN,

    /// Loss with three duplicate acknowledgements: the first lost packet
    /// was retransmitted.
    FastRetransmit,
}

/// Computes the acknowledgement for the window currently in flight.
///
/// With no loss the whole window is acknowledged. With loss the
/// acknowledgement stops at the first lost packet, unless three duplicate
/// acknowledgements were already counted, in which case the first lost
/// packet is retransmitted instead and its sequence number returned.
///
/// An acknowledgement that does not go past the highest sequence number
/// sent is a duplicate.
pub fn acknowledge(node: &mut NodeState) -> Option<u64> {
    let last_sent = node.last_sent();

    if let Some(&first_lost) = node.lost.first() {
        if node.dup_ack_count == FAST_RETRANSMIT_THRESHOLD {
            fast_retransmit(node, first_lost);
            return Some(first_lost);
        }

        node.ack = first_lost;
    } else {
        node.ack = last_sent + 1;
    }

    if node.ack <= last_sent {
        node.dup_ack_count += 1;

        trace!(
            "{} duplicate ack {} count={}",
            node.trace_id(),
            node.ack,
            node.dup_ack_count
        );
    } else {
        node.dup_ack_count = 0;

        trace!("{} ack {}", node.trace_id(), node.ack);
    }

    None
}

/// Shifts the window of `node` for the next round.
///
/// `source` and `dest` must be connected in `graph`, or be the same node; if
/// not, [`Error::NotConnected`] is returned and `node` is left unchanged.
///
/// [`Error::NotConnected`]: ../enum.Error.html#variant.NotConnected
pub fn advance_window(
    node: &mut NodeState, graph: &ConnectivityGraph, source: NodeId,
    dest: NodeId,
) -> Result<Transition> {
    check_path(graph, source, dest)?;

    advance(node)
}

pub(crate) fn check_path(
    graph: &ConnectivityGraph, source: NodeId, dest: NodeId,
) -> Result<()> {
    // A lone sender is always allowed to talk to itself.
    if source == dest || graph.is_connected(source, dest) {
        return Ok(());
    }

    Err(Error::NotConnected(source, dest))
}

pub(crate) fn advance(node: &mut NodeState) -> Result<Transition> {
    if let Some(&first_lost) = node.lost.first() {
        if node.dup_ack_count >= FAST_RETRANSMIT_THRESHOLD {
            fast_retransmit(node, first_lost);
            return Ok(Transition::FastRetransmit);
        }

        node.cwnd = cmp::max(1, node.cwnd / 2);
        node.sent = std::mem::take(&mut node.lost);

        trace!(
            "{} go-back-n cwnd={} sent={:?}",
            node.trace_id(),
            node.cwnd,
            node.sent
        );

        return Ok(Transition::GoBackN);
    }

    if node.in_slow_start() {
        let cwnd = node.cwnd + 1;
        let sent = seq::next_window(node.ack, cwnd)?;

        node.cwnd = cwnd;
        node.sent = sent;
        node.dup_ack_count = 0;

        trace!(
            "{} slow start cwnd={} ssthresh={}",
            node.trace_id(),
            node.cwnd,
            node.ssthresh
        );

        return Ok(Transition::SlowStart);
    }

    let sent = seq::next_window(node.ack, 1)?;

    node.cwnd = 1;
    node.ssthresh = cmp::max(1, node.ssthresh / 2);
    node.sent = sent;

    trace!(
        "{} threshold reached cwnd={} ssthresh={}",
        node.trace_id(),
        node.cwnd,
        node.ssthresh
    );

    Ok(Transition::ThresholdReached)
}

fn fast_retransmit(node: &mut NodeState, seq: u64) {
    node.sent.push(seq);
    node.cwnd = cmp::min(node.cwnd.saturating_mul(2), node.ssthresh);
    node.dup_ack_count = 0;

    trace!(
        "{} fast retransmit {} cwnd={}",
        node.trace_id(),
        seq,
        node.cwnd
    );
}


#[cfg(test)]
pub(crate) mod test_sender;
