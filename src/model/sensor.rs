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

pub const PRESENCE_DETECTED: &str = "Presence_Detected";
pub const ABSENT: &str = "Absent";

/// One row of the `Sensor Type : MEMORY` table from `racadm getsensorinfo`.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SensorRecord {
    pub sensor_name: String,
    pub status: String,
    pub state: String,
    /// Lower critical threshold
    pub lc: String,
    /// Upper critical threshold
    pub uc: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub struct MemorySlots {
    pub total: usize,
    pub available: usize,
    pub used: usize,
}

impl MemorySlots {
    pub fn from_sensors(sensors: &[SensorRecord]) -> Self {
        let mut slots = MemorySlots {
            total: sensors.len(),
            ..Default::default()
        };
        for s in sensors {
            match s.state.as_str() {
                PRESENCE_DETECTED => slots.used += 1,
                ABSENT => slots.available += 1,
                _ => {}
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimm(state: &str) -> SensorRecord {
        SensorRecord {
            sensor_name: "DIMM A1".to_string(),
            status: "OK".to_string(),
            state: state.to_string(),
            lc: "N/A".to_string(),
            uc: "N/A".to_string(),
        }
    }

    #[test]
    fn test_memory_slots_counts() {
        let sensors = vec![
            dimm("Presence_Detected"),
            dimm("Presence_Detected"),
            dimm("Absent"),
            dimm("Absent"),
            dimm("Absent"),
            dimm("Unknown"),
        ];
        let slots = MemorySlots::from_sensors(&sensors);
        assert_eq!(slots.used, 2);
        assert_eq!(slots.available, 3);
        assert_eq!(slots.total, 6);
    }

    #[test]
    fn test_memory_slots_empty() {
        assert_eq!(MemorySlots::from_sensors(&[]), MemorySlots::default());
    }
}
