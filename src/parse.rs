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

//! Parsers for the text `racadm` prints. Each one is a pure function of its
//! input lines.

use tracing::{debug, warn};

use crate::model::{AttributeMap, DiskRecord, SensorRecord};

const DISK_BLOCK_PREFIX: &str = "Disk";
const SENSOR_SECTION_PREFIX: &str = "Sensor Type :";
const MEMORY_SECTION: &str = "Sensor Type : MEMORY";

/// Parses `key=value` lines such as the output of `racadm get System.Location`.
///
/// A leading `#` marks a read-only attribute and is dropped from the key.
/// Later duplicates overwrite earlier ones.
pub fn parse_kv<S: AsRef<str>>(lines: &[S]) -> AttributeMap {
    let mut out = AttributeMap::new();
    for line in lines {
        let Some((k, v)) = line.as_ref().split_once('=') else {
            continue;
        };
        let k = k.strip_prefix('#').unwrap_or(k);
        out.insert(k.to_string(), v.trim().to_string());
    }
    out
}

/// Parses `racadm storage get {vdisks,pdisks} -o` output into one record per
/// disk. Every line starting with `Disk` opens a new record.
pub fn parse_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<DiskRecord> {
    let mut out: Vec<DiskRecord> = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.starts_with(DISK_BLOCK_PREFIX) {
            out.push(DiskRecord::new());
            continue;
        }
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        // Nothing to attach to before the first Disk header.
        let Some(current) = out.last_mut() else {
            debug!("Dropping attribute line before first disk block: {line}");
            continue;
        };
        current.insert(k.trim().to_string(), v.trim().to_string());
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SensorScan {
    SeekingSection,
    InHeader,
    InRows,
    Done,
}

/// Parses the memory table of `racadm getsensorinfo`.
pub fn parse_sensors<S: AsRef<str>>(lines: &[S]) -> Vec<SensorRecord> {
    parse_sensors_with_stats(lines).0
}

/// As [`parse_sensors`], also returning how many rows inside the memory
/// section had neither 5 nor 6 columns and were dropped.
pub fn parse_sensors_with_stats<S: AsRef<str>>(lines: &[S]) -> (Vec<SensorRecord>, usize) {
    let mut out = Vec::new();
    let mut dropped = 0;
    let mut state = SensorScan::SeekingSection;
    for line in lines {
        let line = line.as_ref();
        match state {
            SensorScan::SeekingSection => {
                if line == MEMORY_SECTION {
                    state = SensorScan::InHeader;
                }
            }
            SensorScan::InHeader => state = SensorScan::InRows,
            SensorScan::InRows => {
                if line.starts_with(SENSOR_SECTION_PREFIX) {
                    state = SensorScan::Done;
                    continue;
                }
                match sensor_row(line) {
                    Some(record) => out.push(record),
                    None if line.trim().is_empty() => {}
                    None => {
                        debug!("Dropping memory sensor row: {line:?}");
                        dropped += 1;
                    }
                }
            }
            SensorScan::Done => break,
        }
    }
    if dropped > 0 {
        warn!("Dropped {dropped} memory sensor rows with unexpected column count");
    }
    (out, dropped)
}

// Sensor names are one or two words, the remaining four columns never
// contain spaces.
fn sensor_row(line: &str) -> Option<SensorRecord> {
    let d: Vec<&str> = line.split_whitespace().collect();
    let (sensor_name, rest) = match d.as_slice() {
        [a, b, rest @ ..] if rest.len() == 4 => (format!("{a} {b}"), rest),
        [a, rest @ ..] if rest.len() == 4 => (a.to_string(), rest),
        _ => return None,
    };
    Some(SensorRecord {
        sensor_name,
        status: rest[0].to_string(),
        state: rest[1].to_string(),
        lc: rest[2].to_string(),
        uc: rest[3].to_string(),
    })
}
