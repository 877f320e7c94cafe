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
use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum IdracError {
    #[error("Could not build HTTP client. {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network error talking to BMC at {url}. {source}")]
    NetworkError { url: String, source: reqwest::Error },

    #[error("HTTP {status_code} at {url}. See debug logs for details.")]
    HTTPErrorCode {
        url: String,
        status_code: StatusCode,
    },

    #[error("Could not deserialize response from {url}. Body: {body}. {source}")]
    JsonDeserializeError {
        url: String,
        body: String,
        source: serde_json::Error,
    },

    #[error("Response from {url} is not a JSON object")]
    NotAnObject { url: String },

    #[error("Could not run {program} {subcommand} against {address}: {source}")]
    RacadmSpawn {
        program: String,
        address: String,
        subcommand: String,
        source: std::io::Error,
    },

    #[error(
        "racadm {subcommand} against {address} exited with code {code}. {stderr} \
         Check the state of the node through its IPMI interface immediately."
    )]
    RacadmFailed {
        address: String,
        subcommand: String,
        code: i32,
        stderr: String,
    },

    #[error(
        "racadm {subcommand} against {address} was terminated by a signal. \
         Check the state of the node through its IPMI interface immediately."
    )]
    RacadmKilled { address: String, subcommand: String },

    #[error("IPMI at {address} unreachable after {attempts} attempts: {reason}")]
    IpmiUnreachable {
        address: String,
        attempts: u32,
        reason: String,
    },

    #[error("Invalid IPMI endpoint or credential: missing {0}")]
    InvalidEndpoint(&'static str),
}
