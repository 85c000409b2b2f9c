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

//! Loss injection.
//!
//! Losses are either designated explicitly, as a list of sequence numbers
//! re-applied every round, or drawn at random once per round against the
//! most recently transmitted packet. Either way a sequence number can only
//! be declared lost while it is in flight, and only once.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::Config;
use crate::Error;
use crate::NodeId;
use crate::NodeState;
use crate::Result;

/// How losses are chosen each round.
#[derive(Clone, Debug, PartialEq)]
pub enum LossMode {
    /// The listed sequence numbers are lost whenever they are in flight.
    Manual(Vec<u64>),

    /// The last packet of the window is lost with the given probability, in
    /// percent.
    Random(f64),
}

/// Per-round loss source for a simulation.
///
/// Every node draws from its own generator, seeded from the model's seed and
/// the node id, so the losses of one node do not depend on how often the
/// others are stepped.
#[derive(Clone, Debug)]
pub struct LossModel {
    mode: LossMode,

    seed: u64,

    rngs: BTreeMap<NodeId, StdRng>,
}

impl LossModel {
    pub fn new(mode: LossMode, seed: u64) -> Self {
        LossModel {
            mode,
            seed,
            rngs: BTreeMap::new(),
        }
    }

    /// Builds the loss model selected by `config`.
    ///
    /// A non-empty manual list takes precedence over the loss rate.
    pub fn from_config(config: &Config) -> Self {
        let mode = if config.manual_lost_packets.is_empty() {
            LossMode::Random(config.loss_rate)
        } else {
            LossMode::Manual(config.manual_lost_packets.clone())
        };

        LossModel::new(mode, config.seed)
    }

    pub fn mode(&self) -> &LossMode {
        &self.mode
    }

    /// Restarts the random sequence of every node from the original seed.
    pub fn reset(&mut self) {
        self.rngs.clear();
    }

    /// Applies one round of losses to `node` and returns the sequence
    /// numbers that were newly declared lost.
    pub fn apply(&mut self, node: &mut NodeState) -> Vec<u64> {
        match &self.mode {
            LossMode::Manual(pkts) => pkts
                .iter()
                .copied()
                .filter(|&seq| mark_lost(node, seq))
                .collect(),

            LossMode::Random(rate) => {
                let threshold = rate / 100.0;

                // Always draw, so the random sequence only depends on the
                // number of rounds.
                let seed = self.seed;
                let draw: f64 = self
                    .rngs
                    .entry(node.id())
                    .or_insert_with(|| node_rng(seed, node.id()))
                    .gen();
                let last = node.last_sent();

                if draw < threshold && mark_lost(node, last) {
                    vec![last]
                } else {
                    Vec::new()
                }
            },
        }
    }
}

fn node_rng(seed: u64, id: NodeId) -> StdRng {
    StdRng::seed_from_u64(seed ^ u64::from(id))
}

/// Declares `seq` lost on `node`.
///
/// This is a silent no-op, returning `false`, when `seq` is not currently in
/// flight or is already declared lost.
pub fn mark_lost(node: &mut NodeState, seq: u64) -> bool {
    if !node.sent.contains(&seq) || node.lost.contains(&seq) {
        return false;
    }

    node.lost.push(seq);

    debug!("{} packet lost {}", node.trace_id(), seq);

    true
}

/// Parses a comma-separated list of sequence numbers, e.g. `"1, 2,3"`.
///
/// Blank entries are skipped. Any other non-numeric entry is rejected with
/// [`Error::InvalidArgument`].
///
/// [`Error::InvalidArgument`]: ../enum.Error.html#variant.InvalidArgument
pub fn parse_lost_packets(list: &str) -> Result<Vec<u64>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| Error::InvalidArgument("lost packet list"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_window(sent: &[u64]) -> NodeState {
        let mut n = NodeState::new(0);
        n.sent = sent.to_vec();
        n
    }

    #[test]
    fn mark_in_flight() {
        let mut n = node_with_window(&[1, 2, 3, 4]);

        assert!(mark_lost(&mut n, 3));
        assert_eq!(n.lost(), &[3]);
    }

    #[test]
    fn mark_twice_is_noop() {
        let mut n = node_with_window(&[1, 2, 3, 4]);

        assert!(mark_lost(&mut n, 3));
        assert!(!mark_lost(&mut n, 3));
        assert_eq!(n.lost(), &[3]);
    }

    #[test]
    fn mark_untransmitted_is_noop() {
        let mut n = node_with_window(&[1, 2]);

        assert!(!mark_lost(&mut n, 9));
        assert!(n.lost().is_empty());
    }

    #[test]
    fn manual_mode() {
        let mut n = node_with_window(&[1, 2, 3, 4]);
        let mut loss = LossModel::new(LossMode::Manual(vec![2, 7, 4]), 0);

        assert_eq!(loss.apply(&mut n), vec![2, 4]);
        assert_eq!(n.lost(), &[2, 4]);

        // Nothing new the second time around.
        assert!(loss.apply(&mut n).is_empty());
        assert_eq!(n.lost(), &[2, 4]);
    }

    #[test]
    fn random_mode_bounds() {
        let mut n = node_with_window(&[1, 2, 3]);
        let mut never = LossModel::new(LossMode::Random(0.0), 1);

        for _ in 0..100 {
            assert!(never.apply(&mut n).is_empty());
        }

        let mut always = LossModel::new(LossMode::Random(100.0), 1);
        assert_eq!(always.apply(&mut n), vec![3]);
        assert_eq!(n.lost(), &[3]);

        // Last packet already lost.
        assert!(always.apply(&mut n).is_empty());
    }

    #[test]
    fn random_mode_is_seeded() {
        fn losses(seed: u64) -> Vec<bool> {
            let mut loss = LossModel::new(LossMode::Random(50.0), seed);

            (0..64)
                .map(|_| {
                    let mut n = node_with_window(&[1]);
                    !loss.apply(&mut n).is_empty()
                })
                .collect()
        }

        assert_eq!(losses(42), losses(42));
    }

    #[test]
    fn reset_replays_draws() {
        let mut loss = LossModel::new(LossMode::Random(50.0), 7);

        let first: Vec<bool> = (0..32)
            .map(|_| !loss.apply(&mut node_with_window(&[5])).is_empty())
            .collect();

        loss.reset();

        let second: Vec<bool> = (0..32)
            .map(|_| !loss.apply(&mut node_with_window(&[5])).is_empty())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn nodes_draw_independently() {
        fn pattern(loss: &mut LossModel, id: NodeId) -> Vec<bool> {
            (0..32)
                .map(|_| {
                    let mut n = NodeState::new(id);
                    !loss.apply(&mut n).is_empty()
                })
                .collect()
        }

        let mut alone = LossModel::new(LossMode::Random(50.0), 42);
        let expected = pattern(&mut alone, 1);

        let mut shared = LossModel::new(LossMode::Random(50.0), 42);
        pattern(&mut shared, 0);

        assert_eq!(pattern(&mut shared, 1), expected);
    }

    #[test]
    fn parse_list() {
        assert_eq!(parse_lost_packets("1,2,3"), Ok(vec![1, 2, 3]));
        assert_eq!(parse_lost_packets(" 4 , ,5,"), Ok(vec![4, 5]));
        assert_eq!(parse_lost_packets(""), Ok(vec![]));
        assert_eq!(
            parse_lost_packets("1,x"),
            Err(Error::InvalidArgument("lost packet list"))
        );
    }
}
