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
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::network::Endpoint;
use crate::IdracError;

pub const RACADM: &str = "racadm";
/// racadm exits with 1 for some empty results, e.g. no virtual disks.
pub const EXIT_NO_DATA: i32 = 1;

/// What a finished child process left behind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// None if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// Spawns real processes. `output()` waits for the child and drains both
/// pipes, so nothing outlives the call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let out = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Line oriented access to `racadm`.
pub trait RacadmTransport {
    /// Runs `racadm <subcommand> [namespace] [args..]` and returns its stdout
    /// lines. Exit code 1 yields no lines, any other failure is an error.
    fn invoke(
        &self,
        subcommand: &str,
        namespace: Option<&str>,
        args: &[&str],
    ) -> Result<Vec<String>, IdracError>;
}

pub struct Racadm<R = SystemRunner> {
    endpoint: Endpoint,
    program: String,
    runner: R,
    reveal_credentials: bool,
}

impl<R: CommandRunner> Racadm<R> {
    pub fn new(endpoint: Endpoint, runner: R) -> Self {
        Racadm {
            endpoint,
            program: RACADM.to_string(),
            runner,
            reveal_credentials: false,
        }
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn reveal_credentials_in_logs(mut self, reveal: bool) -> Self {
        self.reveal_credentials = reveal;
        self
    }

    /// Arguments after the program name.
    pub fn command_line(
        &self,
        subcommand: &str,
        namespace: Option<&str>,
        args: &[&str],
    ) -> Vec<String> {
        let mut cmd: Vec<String> = vec![
            "-r".to_string(),
            self.endpoint.address.clone(),
            "-u".to_string(),
            self.endpoint.username.clone(),
            "-p".to_string(),
            self.endpoint.password.clone(),
            "--nocertwarn".to_string(),
            subcommand.to_string(),
        ];
        if let Some(ns) = namespace {
            cmd.push(ns.to_string());
        }
        cmd.extend(args.iter().map(|a| a.to_string()));
        cmd
    }

    fn loggable(&self, cmd: &[String]) -> String {
        if self.reveal_credentials {
            return cmd.join(" ");
        }
        let mut masked = Vec::with_capacity(cmd.len());
        let mut password_next = false;
        for arg in cmd {
            masked.push(if password_next { "****" } else { arg.as_str() });
            password_next = arg == "-p";
        }
        masked.join(" ")
    }
}

impl<R: CommandRunner> RacadmTransport for Racadm<R> {
    fn invoke(
        &self,
        subcommand: &str,
        namespace: Option<&str>,
        args: &[&str],
    ) -> Result<Vec<String>, IdracError> {
        let cmd = self.command_line(subcommand, namespace, args);
        debug!("Running {} {}", self.program, self.loggable(&cmd));

        let output =
            self.runner
                .run(&self.program, &cmd)
                .map_err(|e| IdracError::RacadmSpawn {
                    program: self.program.clone(),
                    address: self.endpoint.address.clone(),
                    subcommand: subcommand.to_string(),
                    source: e,
                })?;
        match output.code {
            Some(0) => Ok(split_output(&output.stdout)),
            Some(EXIT_NO_DATA) => {
                warn!(
                    "racadm {subcommand} against {} exited with 1, treating as empty",
                    self.endpoint.address
                );
                Ok(Vec::new())
            }
            Some(code) => {
                let err = IdracError::RacadmFailed {
                    address: self.endpoint.address.clone(),
                    subcommand: subcommand.to_string(),
                    code,
                    stderr: self.endpoint.scrub(output.stderr.trim()),
                };
                warn!("{err}");
                Err(err)
            }
            None => {
                let err = IdracError::RacadmKilled {
                    address: self.endpoint.address.clone(),
                    subcommand: subcommand.to_string(),
                };
                warn!("{err}");
                Err(err)
            }
        }
    }
}

/// Splits racadm stdout into lines. Depending on the subcommand racadm ends
/// lines with `\r\n`, `\n` or a mix of both.
pub fn split_output(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split("\r\n")
        .flat_map(|l| l.split('\n'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    // Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buf = LogBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, buf.contents())
    }

    struct FakeRunner {
        output: CommandOutput,
        seen: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeRunner {
        fn new(code: Option<i32>, stdout: &str, stderr: &str) -> Self {
            FakeRunner {
                output: CommandOutput {
                    code,
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                },
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for &FakeRunner {
        fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
            self.seen
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(self.output.clone())
        }
    }

    struct MissingBinary;

    impl CommandRunner for MissingBinary {
        fn run(&self, _program: &str, _args: &[String]) -> std::io::Result<CommandOutput> {
            Err(std::io::Error::from(std::io::ErrorKind::NotFound))
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("10.1.2.3", "root", "s3cr3t-pw")
    }

    #[test]
    fn test_command_line_layout() {
        let runner = FakeRunner::new(Some(0), "", "");
        let racadm = Racadm::new(endpoint(), &runner);
        racadm
            .invoke("storage", None, &["get", "vdisks", "-o"])
            .unwrap();
        racadm.invoke("get", Some("System.Location"), &[]).unwrap();

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].0, "racadm");
        assert_eq!(
            seen[0].1,
            vec![
                "-r", "10.1.2.3", "-u", "root", "-p", "s3cr3t-pw", "--nocertwarn", "storage",
                "get", "vdisks", "-o"
            ]
        );
        assert_eq!(seen[1].1[7..], ["get", "System.Location"]);
    }

    #[test]
    fn test_custom_program() {
        let runner = FakeRunner::new(Some(0), "", "");
        let racadm = Racadm::new(endpoint(), &runner).program("/opt/dell/srvadmin/bin/racadm");
        racadm.invoke("getsensorinfo", None, &[]).unwrap();
        assert_eq!(
            runner.seen.lock().unwrap()[0].0,
            "/opt/dell/srvadmin/bin/racadm"
        );
    }

    #[test]
    fn test_exit_zero_returns_lines() {
        let runner = FakeRunner::new(Some(0), "Aisle=A7\r\nRack.Slot=31\r\n", "");
        let lines = Racadm::new(endpoint(), &runner)
            .invoke("get", Some("System.Location"), &[])
            .unwrap();
        assert_eq!(lines, vec!["Aisle=A7", "Rack.Slot=31"]);
    }

    #[test]
    fn test_exit_one_is_empty() {
        let runner = FakeRunner::new(Some(1), "ERROR: No virtual disks are displayed.", "");
        let racadm = Racadm::new(endpoint(), &runner);
        let (lines, logs) = capture_warnings(|| {
            racadm
                .invoke("storage", None, &["get", "vdisks", "-o"])
                .unwrap()
        });
        assert!(lines.is_empty());
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("racadm storage against 10.1.2.3"), "{logs}");
        assert!(!logs.contains("s3cr3t-pw"), "{logs}");
    }

    #[test]
    fn test_exit_two_is_fatal_without_password() {
        let runner = FakeRunner::new(Some(2), "", "ERROR: Login failed for root/s3cr3t-pw");
        let err = Racadm::new(endpoint(), &runner)
            .invoke("getsensorinfo", None, &[])
            .unwrap_err();
        assert!(matches!(err, IdracError::RacadmFailed { code: 2, .. }));
        let msg = err.to_string();
        assert!(msg.contains("10.1.2.3"));
        assert!(msg.contains("getsensorinfo"));
        assert!(msg.contains("IPMI"));
        assert!(!msg.contains("s3cr3t-pw"));
    }

    #[test]
    fn test_killed_is_fatal() {
        let runner = FakeRunner::new(None, "", "");
        let err = Racadm::new(endpoint(), &runner)
            .invoke("getsensorinfo", None, &[])
            .unwrap_err();
        assert!(matches!(err, IdracError::RacadmKilled { .. }));
    }

    #[test]
    fn test_spawn_failure_is_fatal() {
        let err = Racadm::new(endpoint(), MissingBinary)
            .invoke("get", Some("BIOS.MemSettings"), &[])
            .unwrap_err();
        assert!(matches!(err, IdracError::RacadmSpawn { .. }));
        assert!(!err.to_string().contains("s3cr3t-pw"));
    }

    #[test]
    fn test_loggable_hides_password_unless_asked() {
        let runner = FakeRunner::new(Some(0), "", "");
        let racadm = Racadm::new(endpoint(), &runner);
        let cmd = racadm.command_line("get", None, &[]);
        assert!(!racadm.loggable(&cmd).contains("s3cr3t-pw"));
        let racadm = racadm.reveal_credentials_in_logs(true);
        assert!(racadm.loggable(&cmd).contains("s3cr3t-pw"));
    }

    #[test]
    fn test_loggable_masks_only_the_password_argument() {
        let runner = FakeRunner::new(Some(0), "", "");
        let racadm = Racadm::new(Endpoint::new("10.1.2.3", "root", "r"), &runner);
        let cmd = racadm.command_line("storage", None, &["get", "pdisks", "-o"]);
        assert_eq!(
            racadm.loggable(&cmd),
            "-r 10.1.2.3 -u root -p **** --nocertwarn storage get pdisks -o"
        );
    }

    #[test]
    fn test_split_output() {
        assert_eq!(split_output("a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_output("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_output("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_output("single"), vec!["single"]);
        assert!(split_output("  \r\n ").is_empty());
    }
}
