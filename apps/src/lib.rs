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

//! ccsim application utilities.
//!
//! This module provides the argument handling and run loop shared by the
//! ccsim command-line tools.

#[macro_use]
extern crate log;

pub mod args;
pub mod runner;

/// Usage string of `ccsim-run`.
pub const USAGE: &str = "Usage:
  ccsim-run [options] [--connect=PAIR]...
  ccsim-run -h | --help

Options:
  --nodes COUNT            Number of senders [default: 1].
  --connect PAIR           Connect two senders, given as A-B.
  --source ID              Sender to step [default: 0].
  --dest ID                Destination of the stepped sender [default: 0].
  --ssthresh PACKETS       Initial slow-start threshold [default: 64].
  --rounds ROUNDS          Number of rounds to run [default: 10].
  --loss-rate PERCENT      Probability of losing the last packet of a window [default: 0].
  --lost-packets LIST      Comma-separated sequence numbers to drop every time they are sent.
  --seed SEED              Seed of the random loss draws [default: 0].
  --interval MS            Delay between rounds in milliseconds [default: 0].
  --settings FILE          Read the simulation from a JSON settings file.
  --dump-json              Print one JSON transcript per round.
  -h --help                Show this screen.
";

pub fn stdout_sink(out: String) {
    print!("{out}");
}
