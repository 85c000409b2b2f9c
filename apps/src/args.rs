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

use ccsim::NodeId;
use ccsim::SimulationSettings;

pub trait Args: Sized {
    fn with_docopt(docopt: &docopt::Docopt) -> ccsim::Result<Self>;
}

/// Arguments of a simulation run.
pub struct RunArgs {
    pub settings: SimulationSettings,
    pub dump_json: bool,
}

/// Creates a new `RunArgs` structure using the provided [`Docopt`].
///
/// The `Docopt` usage String needs to include the following:
///
/// --nodes COUNT            Number of senders.
/// --connect PAIR           Connect two senders, given as A-B (repeatable).
/// --source ID              Sender to step.
/// --dest ID                Destination of the stepped sender.
/// --ssthresh PACKETS       Initial slow-start threshold.
/// --rounds ROUNDS          Number of rounds to run.
/// --loss-rate PERCENT      Probability of losing the last packet of a window.
/// --lost-packets LIST      Comma-separated sequence numbers to drop.
/// --seed SEED              Seed of the random loss draws.
/// --interval MS            Delay between rounds.
/// --settings FILE          Read all the above from a JSON file.
/// --dump-json              Print transcripts as JSON.
///
/// When `--settings` is given the other simulation options are ignored.
///
/// [`Docopt`]: https://docs.rs/docopt/1.1.0/docopt/
impl Args for RunArgs {
    fn with_docopt(docopt: &docopt::Docopt) -> ccsim::Result<Self> {
        let args = docopt.parse().unwrap_or_else(|e| e.exit());

        let dump_json = args.get_bool("--dump-json");

        let settings_path = args.get_str("--settings");

        if !settings_path.is_empty() {
            let json = std::fs::read_to_string(settings_path).map_err(|e| {
                error!("failed to read {}: {}", settings_path, e);
                ccsim::Error::InvalidArgument("settings")
            })?;

            return Ok(RunArgs {
                settings: SimulationSettings::from_json(&json)?,
                dump_json,
            });
        }

        let nodes = parse(args.get_str("--nodes"), "node count")?;

        let connections = args
            .get_vec("--connect")
            .into_iter()
            .map(parse_pair)
            .collect::<ccsim::Result<Vec<_>>>()?;

        let source = parse(args.get_str("--source"), "source")?;
        let dest = parse(args.get_str("--dest"), "dest")?;

        let initial_ssthresh = parse(args.get_str("--ssthresh"), "ssthresh")?;

        let rounds = parse(args.get_str("--rounds"), "rounds")?;

        let loss_rate = parse(args.get_str("--loss-rate"), "loss rate")?;

        let manual_lost_packets =
            ccsim::loss::parse_lost_packets(args.get_str("--lost-packets"))?;

        let seed = parse(args.get_str("--seed"), "seed")?;

        let interval = parse(args.get_str("--interval"), "interval")?;

        Ok(RunArgs {
            settings: SimulationSettings {
                nodes,
                connections,
                source,
                dest,
                initial_ssthresh,
                loss_rate,
                manual_lost_packets,
                seed,
                rounds,
                interval,
            },
            dump_json,
        })
    }
}

fn parse<T: std::str::FromStr>(
    v: &str, name: &'static str,
) -> ccsim::Result<T> {
    v.parse::<T>().map_err(|_| {
        error!("invalid {}: {:?}", name, v);
        ccsim::Error::InvalidArgument(name)
    })
}

/// Parses a connection given as `A-B`.
pub fn parse_pair(v: &str) -> ccsim::Result<(NodeId, NodeId)> {
    let (a, b) = v
        .split_once('-')
        .ok_or(ccsim::Error::InvalidArgument("connection"))?;

    Ok((
        parse(a.trim(), "connection")?,
        parse(b.trim(), "connection")?,
    ))
}
