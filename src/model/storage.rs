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
use serde::{Deserialize, Serialize};

use super::{DiskKind, DiskRecord};

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VirtualDisk {
    pub name: String,
    pub description: String,
    pub status: String,
    pub state: String,
    pub layout: String,
    pub size: String,
    pub media_type: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PhysicalDisk {
    pub name: String,
    pub description: String,
    pub status: String,
    pub state: String,
    pub product_id: String,
    pub serial_number: String,
    pub size: String,
    pub media_type: String,
}

/// A disk record projected down to the fields reported as facts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum DiskFacts {
    Virtual(VirtualDisk),
    Physical(PhysicalDisk),
}

fn field(record: &DiskRecord, key: &str) -> String {
    record.get(key).cloned().unwrap_or_default()
}

impl From<&DiskRecord> for VirtualDisk {
    fn from(r: &DiskRecord) -> Self {
        VirtualDisk {
            name: field(r, "Name"),
            description: field(r, "DeviceDescription"),
            status: field(r, "Status"),
            state: field(r, "State"),
            layout: field(r, "Layout"),
            size: field(r, "Size"),
            media_type: field(r, "MediaType"),
        }
    }
}

impl From<&DiskRecord> for PhysicalDisk {
    fn from(r: &DiskRecord) -> Self {
        PhysicalDisk {
            name: field(r, "Name"),
            description: field(r, "DeviceDescription"),
            status: field(r, "Status"),
            state: field(r, "State"),
            product_id: field(r, "ProductId"),
            serial_number: field(r, "SerialNumber"),
            size: field(r, "Size"),
            media_type: field(r, "MediaType"),
        }
    }
}

impl DiskFacts {
    pub fn project(kind: DiskKind, record: &DiskRecord) -> DiskFacts {
        match kind {
            DiskKind::Virtual => DiskFacts::Virtual(record.into()),
            DiskKind::Physical => DiskFacts::Physical(record.into()),
        }
    }
}
