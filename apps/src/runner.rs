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
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::args::RunArgs;

#[derive(Debug)]
pub enum RunError {
    /// The simulation could not be set up from the given arguments.
    InvalidArgs(ccsim::Error),

    /// A round failed, e.g. because the pair is not connected.
    StepFailed(ccsim::Error),

    /// A round completed but could not be written out.
    OutputFailed(serde_json::Error),
}

/// Runs the simulation described by `args`, writing one line per round to
/// `output_sink`.
pub fn run(
    args: RunArgs, mut output_sink: impl FnMut(String),
) -> Result<(), RunError> {
    let settings = &args.settings;

    let mut sim = settings.simulation().map_err(RunError::InvalidArgs)?;
    let mut driver = settings.driver().map_err(RunError::InvalidArgs)?;

    let interval = Duration::from_millis(settings.interval);

    info!(
        "running {} rounds of {} -> {} with {} nodes",
        driver.budget(),
        settings.source,
        settings.dest,
        sim.node_count()
    );

    driver.start(&mut sim);

    while let Some(transcript) = driver
        .tick(&mut sim, settings.source, settings.dest)
        .map_err(RunError::StepFailed)?
    {
        let line = format_line(&transcript, args.dump_json)?;

        output_sink(format!("{line}\n"));

        if driver.is_running() && !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    Ok(())
}

fn format_line<T: Serialize + fmt::Display>(
    v: &T, dump_json: bool,
) -> Result<String, RunError> {
    if !dump_json {
        return Ok(v.to_string());
    }

    serde_json::to_string(v).map_err(|e| {
        error!("failed to serialize transcript: {}", e);
        RunError::OutputFailed(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use ccsim::SimulationSettings;

    fn collect(args: RunArgs) -> Result<Vec<String>, RunError> {
        let mut lines = Vec::new();
        run(args, |l| lines.push(l))?;
        Ok(lines)
    }

    #[test]
    fn text_output() {
        let args = RunArgs {
            settings: SimulationSettings {
                rounds: 3,
                ..Default::default()
            },
            dump_json: false,
        };

        let lines = collect(args).unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("round=1 0->0 SlowStart ack=1 cwnd=2"));
        assert!(lines[2].ends_with("sent=[9, 10, 11, 12] lost=[]\n"));
    }

    #[test]
    fn json_output() {
        let args = RunArgs {
            settings: SimulationSettings {
                nodes: 2,
                connections: vec![(0, 1)],
                dest: 1,
                rounds: 2,
                ..Default::default()
            },
            dump_json: true,
        };

        let lines = collect(args).unwrap();
        let v: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();

        assert_eq!(v["round"], 2);
        assert_eq!(v["dest"], 1);
        assert_eq!(v["cwnd"], 3);
    }

    #[test]
    fn unconnected_pair() {
        let args = RunArgs {
            settings: SimulationSettings {
                nodes: 2,
                dest: 1,
                ..Default::default()
            },
            dump_json: false,
        };

        assert!(matches!(
            collect(args),
            Err(RunError::StepFailed(ccsim::Error::NotConnected(0, 1)))
        ));
    }

    #[test]
    fn invalid_settings() {
        let args = RunArgs {
            settings: SimulationSettings {
                nodes: 0,
                ..Default::default()
            },
            dump_json: false,
        };

        assert!(matches!(collect(args), Err(RunError::InvalidArgs(_))));
    }

    #[test]
    fn unknown_endpoint() {
        let args = RunArgs {
            settings: SimulationSettings {
                nodes: 2,
                connections: vec![(0, 1)],
                dest: 7,
                ..Default::default()
            },
            dump_json: false,
        };

        assert!(matches!(
            collect(args),
            Err(RunError::InvalidArgs(ccsim::Error::UnknownNode(7)))
        ));
    }

    struct Unserializable;

    impl fmt::Display for Unserializable {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "unserializable")
        }
    }

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(
            &self, _: S,
        ) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no json form"))
        }
    }

    #[test]
    fn serialization_failure_is_an_output_error() {
        assert_eq!(
            format_line(&Unserializable, false).unwrap(),
            "unserializable"
        );

        assert!(matches!(
            format_line(&Unserializable, true),
            Err(RunError::OutputFailed(_))
        ));
    }
}
