/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */

//! Liveness check over IPMI. A node answers if `ipmitool fru print` works.
//!
//! racadm and Redfish both depend on the iDRAC web stack; IPMI is the channel
//! operators fall back to, so a failed fact pass is usually followed by one of
//! these.

use serde::Serialize;
use tracing::{debug, warn};

use crate::network::{with_retries, Endpoint, DEFAULT_MAX_ATTEMPTS};
use crate::racadm::{CommandRunner, SystemRunner};
use crate::IdracError;

pub const IPMITOOL: &str = "ipmitool";
pub const FRU_EXIT_CODE_WARNING: &str =
    "Information was successfully retrieved, but got unexpected exit code 1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pong {
    /// Failed attempts before the successful one
    pub retries: u32,
    pub warning: Option<String>,
}

pub struct IpmiPinger<R = SystemRunner> {
    endpoint: Endpoint,
    program: String,
    attempts: u32,
    runner: R,
}

impl<R: CommandRunner> IpmiPinger<R> {
    pub fn new(endpoint: Endpoint, runner: R) -> Self {
        IpmiPinger {
            endpoint,
            program: IPMITOOL.to_string(),
            attempts: DEFAULT_MAX_ATTEMPTS,
            runner,
        }
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Runs `fru print` up to the configured number of times.
    ///
    /// Some BMCs print the FRU inventory and still exit with 1; that counts
    /// as an answer, with a warning attached.
    pub fn ping(&self) -> Result<Pong, IdracError> {
        let e = &self.endpoint;
        if e.address.is_empty() {
            return Err(IdracError::InvalidEndpoint("address"));
        }
        if e.username.is_empty() {
            return Err(IdracError::InvalidEndpoint("username"));
        }
        if e.password.is_empty() {
            return Err(IdracError::InvalidEndpoint("password"));
        }
        let args: Vec<String> = [
            "-I",
            "lanplus",
            "-H",
            e.address.as_str(),
            "-U",
            e.username.as_str(),
            "-P",
            e.password.as_str(),
            "fru",
            "print",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        with_retries(self.attempts, |attempt| {
            debug!("IPMI ping {} attempt {attempt}", e.address);
            let output = self
                .runner
                .run(&self.program, &args)
                .map_err(|err| format!("could not run {}: {err}", self.program))?;
            match output.code {
                Some(0) => Ok(Pong {
                    retries: attempt - 1,
                    warning: None,
                }),
                Some(1) if output.stdout.contains("FRU") => Ok(Pong {
                    retries: attempt - 1,
                    warning: Some(FRU_EXIT_CODE_WARNING.to_string()),
                }),
                Some(code) => Err(format!(
                    "{} exited with code {code}: {}",
                    self.program,
                    e.scrub(output.stderr.trim())
                )),
                None => Err(format!("{} was terminated by a signal", self.program)),
            }
        })
        .map_err(|reason| {
            warn!("IPMI at {} did not answer: {reason}", e.address);
            IdracError::IpmiUnreachable {
                address: e.address.clone(),
                attempts: self.attempts,
                reason,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::racadm::CommandOutput;

    // Hands out the queued outputs in order, repeating the last one.
    struct Script(Mutex<VecDeque<CommandOutput>>, Mutex<u32>);

    impl Script {
        fn new(outputs: &[(i32, &str, &str)]) -> Self {
            let q = outputs
                .iter()
                .map(|(code, stdout, stderr)| CommandOutput {
                    code: Some(*code),
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                })
                .collect();
            Script(Mutex::new(q), Mutex::new(0))
        }

        fn calls(&self) -> u32 {
            *self.1.lock().unwrap()
        }
    }

    impl CommandRunner for &Script {
        fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
            assert_eq!(program, "ipmitool");
            assert_eq!(args[..4], ["-I", "lanplus", "-H", "10.1.2.3"]);
            assert_eq!(args[8..], ["fru", "print"]);
            *self.1.lock().unwrap() += 1;
            let mut q = self.0.lock().unwrap();
            if q.len() > 1 {
                Ok(q.pop_front().unwrap())
            } else {
                Ok(q.front().cloned().unwrap())
            }
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("10.1.2.3", "ADMIN", "hunter2")
    }

    #[test]
    fn test_first_try() {
        let script = Script::new(&[(0, "FRU Device Description : Builtin FRU Device", "")]);
        let pong = IpmiPinger::new(endpoint(), &script).ping().unwrap();
        assert_eq!(
            pong,
            Pong {
                retries: 0,
                warning: None
            }
        );
        assert_eq!(script.calls(), 1);
    }

    #[test]
    fn test_exit_one_with_fru_output_warns() {
        let script = Script::new(&[
            (1, "", "Error: Unable to establish IPMI v2 / RMCP+ session"),
            (1, "FRU Device Description : Builtin FRU Device (ID 0)", ""),
        ]);
        let pong = IpmiPinger::new(endpoint(), &script).ping().unwrap();
        assert_eq!(pong.retries, 1);
        assert_eq!(pong.warning.as_deref(), Some(FRU_EXIT_CODE_WARNING));
    }

    #[test]
    fn test_gives_up_after_attempts() {
        let script = Script::new(&[(1, "", "Error: bad password hunter2")]);
        let err = IpmiPinger::new(endpoint(), &script).ping().unwrap_err();
        assert_eq!(script.calls(), 3);
        match &err {
            IdracError::IpmiUnreachable {
                attempts, reason, ..
            } => {
                assert_eq!(*attempts, 3);
                assert!(reason.contains("exited with code 1"));
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_single_attempt_policy() {
        let script = Script::new(&[(2, "", "")]);
        let res = IpmiPinger::new(endpoint(), &script).attempts(1).ping();
        assert!(res.is_err());
        assert_eq!(script.calls(), 1);
    }

    #[test]
    fn test_missing_credentials_spawn_nothing() {
        let script = Script::new(&[(0, "", "")]);
        let e = Endpoint::new("10.1.2.3", "ADMIN", "");
        let err = IpmiPinger::new(e, &script).ping().unwrap_err();
        assert!(matches!(err, IdracError::InvalidEndpoint("password")));
        assert_eq!(script.calls(), 0);
    }
}
