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

use std::ops::Deref;
use std::ops::DerefMut;

use crate::congestion;
use crate::congestion::Transition;
use crate::loss;
use crate::NodeState;
use crate::Result;

/// A single sender driven directly through the congestion engine, without
/// loss model or topology.
pub(crate) struct TestSender {
    node: NodeState,
}

impl TestSender {
    pub(crate) fn new(ssthresh: u64) -> Self {
        TestSender {
            node: NodeState::with_ssthresh(0, ssthresh).unwrap(),
        }
    }

    /// Creates a sender whose current window is `sent`.
    pub(crate) fn with_window(ssthresh: u64, sent: &[u64]) -> Self {
        let mut sender = TestSender::new(ssthresh);
        sender.node.sent = sent.to_vec();
        sender
    }

    pub(crate) fn lose(&mut self, seq: u64) {
        assert!(loss::mark_lost(&mut self.node, seq), "{seq} not in flight");
    }

    pub(crate) fn acknowledge(&mut self) -> Option<u64> {
        congestion::acknowledge(&mut self.node)
    }

    pub(crate) fn advance(&mut self) -> Result<Transition> {
        congestion::advance(&mut self.node)
    }

    /// Runs a full round with no new loss.
    pub(crate) fn round(&mut self) -> Transition {
        self.acknowledge();
        self.advance().unwrap()
    }
}

impl Deref for TestSender {
    type Target = NodeState;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl DerefMut for TestSender {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.node
    }
}
