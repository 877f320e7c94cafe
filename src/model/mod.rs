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
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod sensor;
pub mod storage;

pub use sensor::{MemorySlots, SensorRecord};
pub use storage::{DiskFacts, PhysicalDisk, VirtualDisk};

/// A decoded Redfish response body. No schema is enforced.
pub type JsonRecord = serde_json::Map<String, serde_json::Value>;

/// `racadm get <namespace>` output keyed by attribute name.
pub type AttributeMap = HashMap<String, String>;

/// One `Disk.*` block from `racadm storage get ... -o`.
pub type DiskRecord = HashMap<String, String>;

pub const SYSTEM_NAMESPACE: &str = "Systems/System.Embedded.1";
pub const IDRAC_MANAGER_NAMESPACE: &str = "Managers/iDRAC.Embedded.1";
pub const LC_MANAGER_NAMESPACE: &str = "Managers/LifecycleController.Embedded.1";
pub const SYSTEM_MANAGER_NAMESPACE: &str = "Managers/System.Embedded.1";
pub const UPDATE_SERVICE_NAMESPACE: &str = "UpdateService";

/// A route below `redfish/v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedfishPath {
    pub namespace: String,
    pub suffix: Option<String>,
}

impl RedfishPath {
    pub fn new(namespace: &str, suffix: Option<&str>) -> Self {
        RedfishPath {
            namespace: namespace.to_string(),
            suffix: suffix.map(str::to_string),
        }
    }

    /// A route in the default `Systems/System.Embedded.1` namespace.
    pub fn system(suffix: Option<&str>) -> Self {
        RedfishPath::new(SYSTEM_NAMESPACE, suffix)
    }

    /// The path relative to `redfish/v1`. The namespace always keeps its
    /// trailing slash, iDRAC answers both forms but this is what it advertises.
    pub fn api(&self) -> String {
        format!(
            "{}/{}",
            self.namespace,
            self.suffix.as_deref().unwrap_or_default()
        )
    }
}

impl Default for RedfishPath {
    fn default() -> Self {
        RedfishPath::system(None)
    }
}

/// Attribute groups exposed under the iDRAC `Managers` tree.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeGroup {
    Idrac,
    Lc,
    System,
}

impl AttributeGroup {
    pub fn namespace(self) -> &'static str {
        match self {
            AttributeGroup::Idrac => IDRAC_MANAGER_NAMESPACE,
            AttributeGroup::Lc => LC_MANAGER_NAMESPACE,
            AttributeGroup::System => SYSTEM_MANAGER_NAMESPACE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DiskKind {
    Virtual,
    Physical,
}

impl DiskKind {
    /// Object class passed to `racadm storage get`.
    pub fn racadm_class(self) -> &'static str {
        match self {
            DiskKind::Virtual => "vdisks",
            DiskKind::Physical => "pdisks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_keeps_trailing_slash() {
        assert_eq!(RedfishPath::default().api(), "Systems/System.Embedded.1/");
    }

    #[test]
    fn test_path_with_suffix() {
        let path = RedfishPath::new(UPDATE_SERVICE_NAMESPACE, Some("FirmwareInventory"));
        assert_eq!(path.api(), "UpdateService/FirmwareInventory");
    }

    #[test]
    fn test_attribute_group_namespaces() {
        assert_eq!(
            AttributeGroup::Idrac.namespace(),
            "Managers/iDRAC.Embedded.1"
        );
        assert_eq!(
            AttributeGroup::Lc.namespace(),
            "Managers/LifecycleController.Embedded.1"
        );
        assert_eq!(
            AttributeGroup::System.namespace(),
            "Managers/System.Embedded.1"
        );
    }

    #[test]
    fn test_disk_kind_class() {
        assert_eq!(DiskKind::Virtual.racadm_class(), "vdisks");
        assert_eq!(DiskKind::Physical.racadm_class(), "pdisks");
    }
}
