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
use std::{fmt, time::Duration};

use reqwest::{
    blocking::Client as HttpClient, blocking::ClientBuilder as HttpClientBuilder,
    header::HeaderValue, header::ACCEPT,
};
use tracing::{debug, warn};

use crate::ipmi::{IpmiPinger, IPMITOOL};
use crate::manager::IdracManager;
use crate::model::{JsonRecord, RedfishPath};
use crate::racadm::{Racadm, SystemRunner, RACADM};
pub use crate::IdracError;

pub const REDFISH_ENDPOINT: &str = "redfish/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug)]
pub struct IdracClientPoolBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    max_attempts: u32,
    accept_invalid_certs: bool,
    racadm_program: String,
    ipmitool_program: String,
    ping_attempts: u32,
    reveal_credentials: bool,
}

impl IdracClientPoolBuilder {
    /// Prevents the Redfish client from accepting self signed certificates
    /// and other invalid certificates.
    ///
    /// By default certificate and hostname verification is off, since iDRACs
    /// ship with self signed certificates.
    pub fn reject_invalid_certs(mut self) -> IdracClientPoolBuilder {
        self.accept_invalid_certs = false;
        self
    }

    /// Overwrites the timeout that will be applied to every request
    pub fn timeout(mut self, timeout: Duration) -> IdracClientPoolBuilder {
        self.timeout = timeout;
        self
    }

    /// Overwrites the timeout for establishing the TCP and TLS connection
    pub fn connect_timeout(mut self, timeout: Duration) -> IdracClientPoolBuilder {
        self.connect_timeout = timeout;
        self
    }

    /// Total number of tries for each Redfish GET, including the first one.
    pub fn max_attempts(mut self, attempts: u32) -> IdracClientPoolBuilder {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Path or name of the racadm binary. Looked up in `PATH` unless it
    /// contains a slash.
    pub fn racadm_program(mut self, program: impl Into<String>) -> IdracClientPoolBuilder {
        self.racadm_program = program.into();
        self
    }

    /// Path or name of the ipmitool binary used by [`IpmiPinger`].
    pub fn ipmitool_program(mut self, program: impl Into<String>) -> IdracClientPoolBuilder {
        self.ipmitool_program = program.into();
        self
    }

    /// Total number of `fru print` runs before a node counts as unreachable.
    pub fn ping_attempts(mut self, attempts: u32) -> IdracClientPoolBuilder {
        self.ping_attempts = attempts.max(1);
        self
    }

    /// Print passwords in the debug logs of spawned commands. Off by default.
    pub fn reveal_credentials_in_logs(mut self) -> IdracClientPoolBuilder {
        self.reveal_credentials = true;
        self
    }

    pub fn build(&self) -> Result<IdracClientPool, IdracError> {
        let http_client = HttpClientBuilder::new()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(IdracError::ClientBuild)?;
        Ok(IdracClientPool {
            http_client,
            max_attempts: self.max_attempts,
            racadm_program: self.racadm_program.clone(),
            ipmitool_program: self.ipmitool_program.clone(),
            ping_attempts: self.ping_attempts,
            reveal_credentials: self.reveal_credentials,
        })
    }
}

/// The controller a client talks to.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address of the iDRAC, optionally with `:port`
    pub address: String,
    pub username: String,
    pub password: String,
}

impl Endpoint {
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Endpoint {
            address: address.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Masks the password wherever it stands on its own in `text`. An
    /// occurrence glued to letters or digits on either side is part of some
    /// other word and is left alone, so short passwords don't mangle the rest.
    pub(crate) fn scrub(&self, text: &str) -> String {
        let password = self.password.as_str();
        if password.is_empty() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(at) = rest.find(password) {
            out.push_str(&rest[..at]);
            let after = &rest[at + password.len()..];
            let glued = out.chars().next_back().is_some_and(char::is_alphanumeric)
                || after.chars().next().is_some_and(char::is_alphanumeric);
            out.push_str(if glued { password } else { "****" });
            rest = after;
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct IdracClientPool {
    http_client: HttpClient,
    max_attempts: u32,
    racadm_program: String,
    ipmitool_program: String,
    ping_attempts: u32,
    reveal_credentials: bool,
}

impl IdracClientPool {
    /// Returns Builder for configuring the HTTP connection pool and the
    /// external tools
    pub fn builder() -> IdracClientPoolBuilder {
        IdracClientPoolBuilder {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            accept_invalid_certs: true,
            racadm_program: RACADM.to_string(),
            ipmitool_program: IPMITOOL.to_string(),
            ping_attempts: DEFAULT_MAX_ATTEMPTS,
            reveal_credentials: false,
        }
    }

    /// A bare Redfish client, for reads outside what [`IdracManager`] offers.
    pub fn create_redfish(&self, endpoint: Endpoint) -> RedfishHttpClient {
        RedfishHttpClient::new(self.http_client.clone(), endpoint).max_attempts(self.max_attempts)
    }

    /// Creates an iDRAC client for a certain endpoint. Nothing is sent until
    /// the first retrieval call.
    pub fn create_client(&self, endpoint: Endpoint) -> IdracManager {
        let redfish = self.create_redfish(endpoint.clone());
        let racadm = Racadm::new(endpoint.clone(), SystemRunner)
            .program(&self.racadm_program)
            .reveal_credentials_in_logs(self.reveal_credentials);
        IdracManager::new(endpoint.address, redfish, racadm)
    }

    /// Creates an IPMI liveness checker for the same kind of endpoint.
    pub fn create_pinger(&self, endpoint: Endpoint) -> IpmiPinger {
        IpmiPinger::new(endpoint, SystemRunner)
            .program(&self.ipmitool_program)
            .attempts(self.ping_attempts)
    }
}

/// Read access to the Redfish tree. Implementations never fail: anything
/// that could not be fetched comes back as an empty record.
pub trait RedfishTransport {
    fn get(&self, path: &RedfishPath) -> JsonRecord;
}

/// Runs `op` until it succeeds or `max_attempts` tries have been made,
/// returning the last error. `op` receives the 1-based attempt number.
pub fn with_retries<T, E, F>(max_attempts: u32, mut op: F) -> Result<T, E>
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                debug!("Attempt {attempt}/{max_attempts} failed: {e}");
                attempt += 1;
            }
        }
    }
}

// Retries op and swaps a final failure for an empty record.
fn get_lenient<F>(max_attempts: u32, url: &str, op: F) -> JsonRecord
where
    F: FnMut(u32) -> Result<JsonRecord, IdracError>,
{
    match with_retries(max_attempts, op) {
        Ok(record) => record,
        Err(e) => {
            warn!("Giving up on {url} after {max_attempts} attempts: {e}");
            JsonRecord::new()
        }
    }
}

/// A HTTP client which targets a single iDRAC Redfish service
pub struct RedfishHttpClient {
    endpoint: Endpoint,
    http_client: HttpClient,
    max_attempts: u32,
}

impl RedfishHttpClient {
    pub fn new(http_client: HttpClient, endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            http_client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn url(&self, path: &RedfishPath) -> String {
        format!(
            "https://{}/{}/{}",
            self.endpoint.address,
            REDFISH_ENDPOINT,
            path.api()
        )
    }

    /// A single GET, with every failure reported.
    pub fn try_get(&self, path: &RedfishPath) -> Result<JsonRecord, IdracError> {
        let url = self.url(path);
        debug!("TX GET {url}");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .basic_auth(&self.endpoint.username, Some(&self.endpoint.password))
            .send()
            .map_err(|e| IdracError::NetworkError {
                url: url.clone(),
                source: e,
            })?;
        let status_code = response.status();
        let response_body = response.text().map_err(|e| IdracError::NetworkError {
            url: url.clone(),
            source: e,
        })?;
        debug!("RX {status_code} {response_body}");

        if !status_code.is_success() {
            return Err(IdracError::HTTPErrorCode { url, status_code });
        }
        match serde_json::from_str(&response_body) {
            Ok(serde_json::Value::Object(record)) => Ok(record),
            Ok(_) => Err(IdracError::NotAnObject { url }),
            Err(e) => Err(IdracError::JsonDeserializeError {
                url,
                body: response_body,
                source: e,
            }),
        }
    }
}

impl RedfishTransport for RedfishHttpClient {
    fn get(&self, path: &RedfishPath) -> JsonRecord {
        let url = self.url(path);
        get_lenient(self.max_attempts, &url, |_| self.try_get(path))
    }
}
