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
use serde::Serialize;
use tracing::debug;

use crate::jsonmap::copy_str;
use crate::manager::IdracManager;
use crate::model::{AttributeMap, PhysicalDisk, VirtualDisk};
use crate::network::RedfishTransport;
use crate::racadm::RacadmTransport;
use crate::IdracError;

/// The flat fact set handed to orchestration tooling. Field names are the
/// fact names; serialize it to get the fact map.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IdracFacts {
    pub idrac_address: String,
    pub idrac_model: String,
    pub idrac_bios_version: String,
    pub idrac_bios_boot_mode: String,
    pub idrac_hostname: String,
    pub idrac_system_location_aisle: String,
    pub idrac_system_location_datacenter: String,
    pub idrac_system_location_rack_name: String,
    pub idrac_system_location_rack_slot: String,
    pub idrac_system_location_room_name: String,
    pub idrac_device_size: String,
    pub idrac_total_mem_slots: usize,
    pub idrac_available_mem_slots: usize,
    pub idrac_used_mem_slots: usize,
    pub idrac_mem_capacity: String,
    pub idrac_virtual_disks: Vec<VirtualDisk>,
    pub idrac_physical_disks: Vec<PhysicalDisk>,
}

fn attr(map: &AttributeMap, key: &str) -> String {
    map.get(key).cloned().unwrap_or_default()
}

impl IdracFacts {
    /// Runs every retrieval operation against `manager`, one after another.
    ///
    /// Missing data leaves the matching fact empty. Only a fatal racadm
    /// failure aborts the pass.
    pub fn collect<H, C>(manager: &IdracManager<H, C>) -> Result<IdracFacts, IdracError>
    where
        H: RedfishTransport,
        C: RacadmTransport,
    {
        let power_state = manager.get_power_state();
        let location = manager.get_system_location()?;
        let slots = manager.get_mem_slots()?;
        let mem_settings = manager.get_mem_settings()?;

        let facts = IdracFacts {
            idrac_address: manager.address().to_string(),
            idrac_model: copy_str(&power_state, "Model"),
            idrac_bios_version: copy_str(&power_state, "BiosVersion"),
            idrac_bios_boot_mode: manager.bios_boot_mode(),
            idrac_hostname: copy_str(&power_state, "HostName"),
            idrac_system_location_aisle: attr(&location, "Aisle"),
            idrac_system_location_datacenter: attr(&location, "DataCenter"),
            idrac_system_location_rack_name: attr(&location, "Rack.Name"),
            idrac_system_location_rack_slot: attr(&location, "Rack.Slot"),
            idrac_system_location_room_name: attr(&location, "RoomName"),
            idrac_device_size: attr(&location, "DeviceSize"),
            idrac_total_mem_slots: slots.total,
            idrac_available_mem_slots: slots.available,
            idrac_used_mem_slots: slots.used,
            idrac_mem_capacity: attr(&mem_settings, "SysMemSize"),
            idrac_virtual_disks: manager.get_virtual_disks()?,
            idrac_physical_disks: manager.get_physical_disks()?,
        };
        debug!("Collected facts from {}", manager.address());
        Ok(facts)
    }
}
