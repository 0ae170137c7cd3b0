// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::types::Value;

/// An in-memory bio record: schema identity plus an ordered tag → value map.
///
/// Key order is insertion order and is what the encoder walks; the codec
/// never reorders entries. A record with `code == 0 && version == 0` is a
/// properties record and bypasses dictionary validation entirely.
///
/// Equality compares schema identity and entries; `bio_name` is
/// informational (the decoder stamps it from the schema) and is ignored.
#[derive(Clone, Debug, Default)]
pub struct BioObject {
    dictionary: u8,
    code: u16,
    version: u16,
    name: Option<String>,
    entries: Vec<(String, Value)>,
}

impl BioObject {
    pub fn new(dictionary: u8, code: u16, version: u16) -> Self {
        BioObject {
            dictionary,
            code,
            version,
            name: None,
            entries: Vec::new(),
        }
    }

    /// A schema-less properties record (`code = 0, version = 0`).
    pub fn properties() -> Self {
        BioObject::new(0, 0, 0)
    }

    pub fn bio_dictionary(&self) -> u8 {
        self.dictionary
    }

    pub fn bio_code(&self) -> u16 {
        self.code
    }

    pub fn bio_version(&self) -> u16 {
        self.version
    }

    pub fn bio_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_bio_dictionary(&mut self, dictionary: u8) {
        self.dictionary = dictionary;
    }

    pub fn set_bio_code(&mut self, code: u16) {
        self.code = code;
    }

    pub fn set_bio_version(&mut self, version: u16) {
        self.version = version;
    }

    pub fn set_bio_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn is_properties(&self) -> bool {
        self.code == 0 && self.version == 0
    }

    /// Inserts or replaces a value. Replacing keeps the key's original
    /// position, so encode order stays stable across updates.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `source` into this record.
    pub fn put_all(&mut self, source: &BioObject) {
        for (key, value) in source.iter() {
            self.put(key, value.clone());
        }
    }
}

impl PartialEq for BioObject {
    fn eq(&self, other: &Self) -> bool {
        self.dictionary == other.dictionary
            && self.code == other.code
            && self.version == other.version
            && self.entries == other.entries
    }
}

/// A resolved enum value: the wire carries only the ordinal, the name is
/// restored from the dictionary on decode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BioEnum {
    ordinal: i32,
    name: String,
}

impl BioEnum {
    pub fn new(ordinal: i32, name: impl Into<String>) -> Self {
        BioEnum {
            ordinal,
            name: name.into(),
        }
    }

    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
