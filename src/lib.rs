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

//! Inventory and health facts from Dell iDRAC management controllers.
//!
//! Two transports back the client: the Redfish HTTP API, read leniently with
//! bounded retries, and the `racadm` CLI, whose text output is parsed into
//! typed records. A separate IPMI check tells whether the BMC answers at all.
//!
//! ```no_run
//! use libidrac::{Endpoint, IdracClientPool, IdracFacts};
//!
//! let pool = IdracClientPool::builder().build()?;
//! let manager = pool.create_client(Endpoint::new("10.0.0.5", "root", "calvin"));
//! let facts = IdracFacts::collect(&manager)?;
//! println!("{}", facts.idrac_model);
//! # Ok::<(), libidrac::IdracError>(())
//! ```

mod error;
mod facts;
mod ipmi;
pub mod jsonmap;
mod manager;
pub mod model;
mod network;
pub mod parse;
mod racadm;

pub use error::IdracError;
pub use facts::IdracFacts;
pub use ipmi::{IpmiPinger, Pong, FRU_EXIT_CODE_WARNING, IPMITOOL};
pub use manager::{IdracManager, MEM_SETTINGS, SYSTEM_LOCATION};
pub use model::{
    AttributeGroup, AttributeMap, DiskFacts, DiskKind, DiskRecord, JsonRecord, MemorySlots,
    PhysicalDisk, RedfishPath, SensorRecord, VirtualDisk,
};
pub use network::{
    with_retries, Endpoint, IdracClientPool, IdracClientPoolBuilder, RedfishHttpClient,
    RedfishTransport, DEFAULT_MAX_ATTEMPTS, REDFISH_ENDPOINT,
};
pub use racadm::{
    split_output, CommandOutput, CommandRunner, Racadm, RacadmTransport, SystemRunner,
    EXIT_NO_DATA, RACADM,
};
