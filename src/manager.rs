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
use tracing::debug;

use crate::jsonmap;
use crate::model::{
    AttributeGroup, AttributeMap, DiskFacts, DiskKind, DiskRecord, JsonRecord, MemorySlots,
    PhysicalDisk, RedfishPath, SensorRecord, VirtualDisk, IDRAC_MANAGER_NAMESPACE,
    UPDATE_SERVICE_NAMESPACE,
};
use crate::network::{RedfishHttpClient, RedfishTransport};
use crate::parse;
use crate::racadm::{Racadm, RacadmTransport};
use crate::IdracError;

pub const SYSTEM_LOCATION: &str = "System.Location";
pub const MEM_SETTINGS: &str = "BIOS.MemSettings";

/// Inventory reads against one iDRAC. Redfish reads never fail and return an
/// empty record when nothing could be fetched; racadm reads fail only when
/// racadm itself does.
pub struct IdracManager<H = RedfishHttpClient, C = Racadm> {
    address: String,
    redfish: H,
    racadm: C,
}

impl<H: RedfishTransport, C: RacadmTransport> IdracManager<H, C> {
    pub fn new(address: impl Into<String>, redfish: H, racadm: C) -> Self {
        IdracManager {
            address: address.into(),
            redfish,
            racadm,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The ComputerSystem resource: model, BIOS version, host name, power
    /// state.
    pub fn get_power_state(&self) -> JsonRecord {
        self.redfish.get(&RedfishPath::default())
    }

    pub fn get_bios(&self) -> JsonRecord {
        self.redfish.get(&RedfishPath::system(Some("Bios")))
    }

    /// `Attributes.BootMode` from the BIOS resource, e.g. `Uefi` or `Bios`.
    /// Empty if the BIOS could not be read or lacks the attribute.
    pub fn bios_boot_mode(&self) -> String {
        let bios = self.get_bios();
        jsonmap::path_str_or(&bios, &["Attributes", "BootMode"], "").to_string()
    }

    pub fn get_boot_sources(&self) -> JsonRecord {
        self.redfish.get(&RedfishPath::system(Some("BootSources")))
    }

    pub fn get_ethernet_interface(&self, nic: Option<&str>) -> JsonRecord {
        let suffix = match nic {
            Some(nic) => format!("EthernetInterfaces/{nic}"),
            None => "EthernetInterfaces".to_string(),
        };
        self.redfish.get(&RedfishPath::system(Some(&suffix)))
    }

    pub fn get_storage_controller(&self, ctlr: Option<&str>) -> JsonRecord {
        let suffix = match ctlr {
            Some(ctlr) => format!("Storage/Controllers/{ctlr}"),
            None => "Storage/Controllers".to_string(),
        };
        self.redfish.get(&RedfishPath::system(Some(&suffix)))
    }

    pub fn get_firmware_inventory(&self, dev: Option<&str>) -> JsonRecord {
        let suffix = match dev {
            Some(dev) => format!("FirmwareInventory/{dev}"),
            None => "FirmwareInventory".to_string(),
        };
        self.redfish
            .get(&RedfishPath::new(UPDATE_SERVICE_NAMESPACE, Some(&suffix)))
    }

    /// Lifecycle Controller log
    pub fn get_lifecycle_logs(&self) -> JsonRecord {
        self.redfish
            .get(&RedfishPath::new(IDRAC_MANAGER_NAMESPACE, Some("Logs/Lclog")))
    }

    /// The `Attributes` object of an attribute group, empty if absent.
    pub fn get_attribute_group(&self, group: AttributeGroup) -> JsonRecord {
        let record = self
            .redfish
            .get(&RedfishPath::new(group.namespace(), Some("Attributes")));
        jsonmap::object_or_empty(&record, "Attributes")
    }

    /// Runs racadm and parses `key=value` output.
    pub fn call_racadm_kv(
        &self,
        subcommand: &str,
        namespace: Option<&str>,
    ) -> Result<AttributeMap, IdracError> {
        let output = self.racadm.invoke(subcommand, namespace, &[])?;
        Ok(parse::parse_kv(&output))
    }

    pub fn get_system_location(&self) -> Result<AttributeMap, IdracError> {
        self.call_racadm_kv("get", Some(SYSTEM_LOCATION))
    }

    pub fn get_mem_settings(&self) -> Result<AttributeMap, IdracError> {
        self.call_racadm_kv("get", Some(MEM_SETTINGS))
    }

    pub fn get_mem_sensor_info(&self) -> Result<Vec<SensorRecord>, IdracError> {
        let output = self.racadm.invoke("getsensorinfo", None, &[])?;
        Ok(parse::parse_sensors(&output))
    }

    pub fn get_mem_slots(&self) -> Result<MemorySlots, IdracError> {
        let sensors = self.get_mem_sensor_info()?;
        let slots = MemorySlots::from_sensors(&sensors);
        debug!("{} memory slots: {slots:?}", self.address);
        Ok(slots)
    }

    /// Every field racadm reports, one map per disk.
    pub fn get_disks(&self, kind: DiskKind) -> Result<Vec<DiskRecord>, IdracError> {
        let output = self
            .racadm
            .invoke("storage", None, &["get", kind.racadm_class(), "-o"])?;
        Ok(parse::parse_blocks(&output))
    }

    /// Disks of one kind, each cut down to its reported fields.
    pub fn get_disk_facts(&self, kind: DiskKind) -> Result<Vec<DiskFacts>, IdracError> {
        let disks = self.get_disks(kind)?;
        Ok(disks.iter().map(|d| DiskFacts::project(kind, d)).collect())
    }

    pub fn get_virtual_disks(&self) -> Result<Vec<VirtualDisk>, IdracError> {
        let disks = self.get_disks(DiskKind::Virtual)?;
        Ok(disks.iter().map(VirtualDisk::from).collect())
    }

    pub fn get_physical_disks(&self) -> Result<Vec<PhysicalDisk>, IdracError> {
        let disks = self.get_disks(DiskKind::Physical)?;
        Ok(disks.iter().map(PhysicalDisk::from).collect())
    }
}
