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

//! Schema registry: dictionaries of object, tag and enum descriptors.
//!
//! The registry is built once at startup, published process-wide via
//! [`init`] and read without locking afterwards — codec instances snapshot
//! an `Arc` at construction. [`teardown`] discards the published registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::compress::{Compressor, Lz4Compressor};
use crate::crypto::Encrypter;
use crate::object::{BioEnum, BioObject};
use crate::types::BioType;

/// On-wire width of tag codes, configured per dictionary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagCodeSize {
    U8,
    #[default]
    U16,
}

/// Schema descriptor of a single tag within an object (or a dictionary-wide
/// super tag). A tag is identified on the wire by its numeric code, never by
/// its name.
#[derive(Clone, Debug)]
pub struct BioTag {
    code: u16,
    name: String,
    bio_type: BioType,
    is_array: bool,
    is_list: bool,
    encodable: bool,
    obj_code: Option<u16>,
    enum_code: Option<u16>,
}

impl BioTag {
    pub fn new(code: u16, name: impl Into<String>, bio_type: BioType) -> Self {
        BioTag {
            code,
            name: name.into(),
            bio_type,
            is_array: false,
            is_list: false,
            encodable: true,
            obj_code: None,
            enum_code: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Tags that live only in memory; they never reach the wire.
    pub fn non_encodable(mut self) -> Self {
        self.encodable = false;
        self
    }

    /// Binds a nested-record tag to the object schema of its elements.
    pub fn with_obj(mut self, obj_code: u16) -> Self {
        self.obj_code = Some(obj_code);
        self
    }

    /// Binds an enum tag to its enum descriptor.
    pub fn with_enum(mut self, enum_code: u16) -> Self {
        self.enum_code = Some(enum_code);
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bio_type(&self) -> BioType {
        self.bio_type
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn is_encodable(&self) -> bool {
        self.encodable
    }

    pub fn obj_code(&self) -> Option<u16> {
        self.obj_code
    }

    pub fn enum_code(&self) -> Option<u16> {
        self.enum_code
    }
}

/// Constructor registered for an object type. Replaces the original
/// reflective instantiation: the loader picks the builder variant explicitly
/// at registration time.
pub type RecordFactory = Arc<dyn Fn() -> BioObject + Send + Sync>;

/// Schema descriptor of an object type.
#[derive(Clone)]
pub struct BioObj {
    dictionary: u8,
    code: u16,
    version: u16,
    name: String,
    is_large: bool,
    tags: Vec<BioTag>,
    by_code: HashMap<u16, usize>,
    by_name: HashMap<String, usize>,
    factory: Option<RecordFactory>,
}

impl BioObj {
    pub fn new(dictionary: u8, code: u16, version: u16, name: impl Into<String>) -> Self {
        BioObj {
            dictionary,
            code,
            version,
            name: name.into(),
            is_large: false,
            tags: Vec::new(),
            by_code: HashMap::new(),
            by_name: HashMap::new(),
            factory: None,
        }
    }

    /// Large objects frame their nested blobs and strings with four-byte
    /// length prefixes instead of two.
    pub fn large(mut self) -> Self {
        self.is_large = true;
        self
    }

    pub fn with_factory(
        mut self,
        factory: impl Fn() -> BioObject + Send + Sync + 'static,
    ) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn with_tag(mut self, tag: BioTag) -> Self {
        self.add_tag(tag);
        self
    }

    pub fn add_tag(&mut self, tag: BioTag) {
        let index = self.tags.len();
        self.by_code.insert(tag.code(), index);
        self.by_name.insert(tag.name().to_string(), index);
        self.tags.push(tag);
    }

    pub fn dictionary(&self) -> u8 {
        self.dictionary
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_large(&self) -> bool {
        self.is_large
    }

    pub fn tag_by_code(&self, code: u16) -> Option<&BioTag> {
        self.by_code.get(&code).map(|&i| &self.tags[i])
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&BioTag> {
        self.by_name.get(name).map(|&i| &self.tags[i])
    }

    /// Builds a fresh record of this type, stamped with the schema identity.
    /// Falls back to a generic record when no constructor was registered.
    pub fn new_record(&self) -> BioObject {
        let mut bio = match &self.factory {
            Some(factory) => factory(),
            None => BioObject::default(),
        };
        bio.set_bio_dictionary(self.dictionary);
        bio.set_bio_code(self.code);
        bio.set_bio_version(self.version);
        bio.set_bio_name(self.name.clone());
        bio
    }
}

/// Schema descriptor of an enum: the ordinal ↔ name table owned by the
/// dictionary.
#[derive(Clone, Debug)]
pub struct BioEnumObj {
    code: u16,
    name: String,
    by_ordinal: HashMap<i32, String>,
}

impl BioEnumObj {
    pub fn new(code: u16, name: impl Into<String>) -> Self {
        BioEnumObj {
            code,
            name: name.into(),
            by_ordinal: HashMap::new(),
        }
    }

    pub fn with_value(mut self, ordinal: i32, name: impl Into<String>) -> Self {
        self.by_ordinal.insert(ordinal, name.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves an ordinal read off the wire; unknown ordinals yield `None`
    /// and the decoder drops the entry.
    pub fn bio_enum(&self, ordinal: i32) -> Option<BioEnum> {
        self.by_ordinal
            .get(&ordinal)
            .map(|name| BioEnum::new(ordinal, name.clone()))
    }
}

/// A namespace of object, enum and super-tag schemas under one u8 id.
#[derive(Clone, Default)]
pub struct BioDictionary {
    id: u8,
    tag_code_size: TagCodeSize,
    objs: Vec<BioObj>,
    by_code: HashMap<u16, usize>,
    by_name: HashMap<String, usize>,
    enums: HashMap<u16, BioEnumObj>,
    super_tags: Vec<BioTag>,
    super_by_code: HashMap<u16, usize>,
    super_by_name: HashMap<String, usize>,
}

impl BioDictionary {
    pub fn new(id: u8) -> Self {
        BioDictionary {
            id,
            ..Default::default()
        }
    }

    pub fn with_tag_code_size(mut self, tag_code_size: TagCodeSize) -> Self {
        self.tag_code_size = tag_code_size;
        self
    }

    pub fn with_obj(mut self, obj: BioObj) -> Self {
        let index = self.objs.len();
        self.by_code.insert(obj.code(), index);
        self.by_name.insert(obj.name().to_string(), index);
        self.objs.push(obj);
        self
    }

    pub fn with_enum(mut self, enum_obj: BioEnumObj) -> Self {
        self.enums.insert(enum_obj.code(), enum_obj);
        self
    }

    /// Super tags are shared across objects: resolution falls back to them
    /// whenever an object has no tag of its own for a code or name.
    pub fn with_super_tag(mut self, tag: BioTag) -> Self {
        let index = self.super_tags.len();
        self.super_by_code.insert(tag.code(), index);
        self.super_by_name.insert(tag.name().to_string(), index);
        self.super_tags.push(tag);
        self
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn tag_code_size(&self) -> TagCodeSize {
        self.tag_code_size
    }

    pub fn obj_by_code(&self, code: u16) -> Option<&BioObj> {
        self.by_code.get(&code).map(|&i| &self.objs[i])
    }

    pub fn obj_by_name(&self, name: &str) -> Option<&BioObj> {
        self.by_name.get(name).map(|&i| &self.objs[i])
    }

    pub fn enum_by_code(&self, code: u16) -> Option<&BioEnumObj> {
        self.enums.get(&code)
    }

    pub fn super_tag_by_code(&self, code: u16) -> Option<&BioTag> {
        self.super_by_code.get(&code).map(|&i| &self.super_tags[i])
    }

    pub fn super_tag_by_name(&self, name: &str) -> Option<&BioTag> {
        self.super_by_name.get(name).map(|&i| &self.super_tags[i])
    }

    /// Factory entry point: a fresh record for a registered object code.
    pub fn new_record(&self, code: u16) -> Option<BioObject> {
        self.obj_by_code(code).map(BioObj::new_record)
    }

    pub fn new_record_by_name(&self, name: &str) -> Option<BioObject> {
        self.obj_by_name(name).map(BioObj::new_record)
    }

    /// Builds a record and merges the entries of `source` into it, the
    /// copy-construct-or-merge fallback of the original factory.
    pub fn new_record_from(&self, code: u16, source: &BioObject) -> Option<BioObject> {
        let mut bio = self.new_record(code)?;
        bio.put_all(source);
        Some(bio)
    }
}

/// The process-wide set of dictionaries plus the pluggable byte transforms.
pub struct DictionaryRegistry {
    dictionaries: HashMap<u8, BioDictionary>,
    compressor: Arc<dyn Compressor>,
    encrypter: Option<Arc<dyn Encrypter>>,
}

impl Default for DictionaryRegistry {
    fn default() -> Self {
        DictionaryRegistry {
            dictionaries: HashMap::new(),
            compressor: Arc::new(Lz4Compressor),
            encrypter: None,
        }
    }
}

impl DictionaryRegistry {
    pub fn new() -> Self {
        DictionaryRegistry::default()
    }

    pub fn with_dictionary(mut self, dictionary: BioDictionary) -> Self {
        self.dictionaries.insert(dictionary.id(), dictionary);
        self
    }

    pub fn with_compressor(mut self, compressor: impl Compressor + 'static) -> Self {
        self.compressor = Arc::new(compressor);
        self
    }

    pub fn with_encrypter(mut self, encrypter: impl Encrypter + 'static) -> Self {
        self.encrypter = Some(Arc::new(encrypter));
        self
    }

    pub fn dictionary(&self, id: u8) -> Option<&BioDictionary> {
        self.dictionaries.get(&id)
    }

    pub fn compressor(&self) -> &Arc<dyn Compressor> {
        &self.compressor
    }

    pub fn encrypter(&self) -> Option<&Arc<dyn Encrypter>> {
        self.encrypter.as_ref()
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

static GLOBAL: RwLock<Option<Arc<DictionaryRegistry>>> = RwLock::new(None);

/// Publishes the registry process-wide. Codecs created afterwards snapshot
/// it; codecs created before keep their old snapshot.
pub fn init(registry: DictionaryRegistry) {
    debug!(dictionaries = registry.len(), "dictionary registry initialized");
    *GLOBAL.write().unwrap() = Some(Arc::new(registry));
}

/// Discards the published registry.
pub fn teardown() {
    debug!("dictionary registry discarded");
    *GLOBAL.write().unwrap() = None;
}

/// The currently published registry, if any.
pub fn global() -> Option<Arc<DictionaryRegistry>> {
    GLOBAL.read().unwrap().clone()
}
