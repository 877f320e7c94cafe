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

// jsonmap.rs
// Best-effort field access over Redfish JSON. A missing key or a value of
// the wrong type yields the caller's default instead of an error, so one
// absent field never aborts an inventory pass.

use crate::model::JsonRecord;

// JsonMap is the lookup the helpers below need from a JSON object.
pub trait JsonMap {
    fn get_value(&self, key: &str) -> Option<&serde_json::Value>;
}

impl JsonMap for serde_json::Map<String, serde_json::Value> {
    fn get_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key)
    }
}

// str_or returns the string at key, or default when the key is missing or
// the value is not a string.
pub fn str_or<'a, M: JsonMap>(map: &'a M, key: &str, default: &'a str) -> &'a str {
    map.get_value(key)
        .and_then(serde_json::Value::as_str)
        .unwrap_or(default)
}

// copy_str is str_or with the empty string as default, returned owned.
pub fn copy_str<M: JsonMap>(map: &M, key: &str) -> String {
    str_or(map, key, "").to_string()
}

// path_str_or walks nested objects along path and returns the string at the
// end. Any missing step or non-object intermediate yields default.
pub fn path_str_or<'a, M: JsonMap>(map: &'a M, path: &[&str], default: &'a str) -> &'a str {
    let Some((first, rest)) = path.split_first() else {
        return default;
    };
    let mut current = match map.get_value(first) {
        Some(v) => v,
        None => return default,
    };
    for key in rest {
        current = match current.as_object().and_then(|o| o.get(*key)) {
            Some(v) => v,
            None => return default,
        };
    }
    current.as_str().unwrap_or(default)
}

// object_or_empty clones the object at key, or returns an empty object.
pub fn object_or_empty<M: JsonMap>(map: &M, key: &str) -> JsonRecord {
    map.get_value(key)
        .and_then(serde_json::Value::as_object)
        .cloned()
        .unwrap_or_default()
}
