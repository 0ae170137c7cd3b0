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

//! The outer frame: flag byte, optional compression with an explicit
//! original-length prefix, optional encryption, and the array/list wrapper.

use std::sync::Arc;

use tracing::debug;

use crate::buffer::{Reader, Writer};
use crate::codec::{properties, record, xml};
use crate::compress::Compressor;
use crate::config::CodecConfig;
use crate::crypto::Encrypter;
use crate::dictionary::{self, DictionaryRegistry};
use crate::error::BioError;
use crate::object::BioObject;
use crate::types::flags;
use crate::util;

/// What a frame carries: a single record, an array of records, or a list of
/// records. Arrays and lists share a wire encoding apart from the flag bit;
/// the distinction survives a round trip.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Object(BioObject),
    Array(Vec<BioObject>),
    List(Vec<BioObject>),
}

/// Serializer/deserializer for bio objects, arrays and lists, with optional
/// compression and encryption of the frame.
///
/// A codec instance carries configuration but no per-call state; two threads
/// may run `encode`/`decode` on two instances concurrently. The dictionary
/// registry is snapshotted at construction and read without locking.
pub struct BinaryCodec {
    config: CodecConfig,
    registry: Arc<DictionaryRegistry>,
    compressor: Arc<dyn Compressor>,
    encrypter: Option<Arc<dyn Encrypter>>,
}

impl BinaryCodec {
    /// A codec over the process-wide registry published by
    /// [`dictionary::init`].
    pub fn new() -> Result<Self, BioError> {
        let registry = dictionary::global().ok_or(BioError::Uninitialized)?;
        Ok(Self::with_registry(registry))
    }

    pub fn with_registry(registry: Arc<DictionaryRegistry>) -> Self {
        let compressor = registry.compressor().clone();
        let encrypter = registry.encrypter().cloned();
        BinaryCodec {
            config: CodecConfig::default(),
            registry,
            compressor,
            encrypter,
        }
    }

    pub fn compressed(mut self, compressed: bool) -> Self {
        self.config.compressed = compressed;
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.config.encrypted = encrypted;
        self
    }

    pub fn lossless(mut self, lossless: bool) -> Self {
        self.config.lossless = lossless;
        self
    }

    /// Strict mode: unknown dictionaries and objects fail instead of being
    /// silently omitted.
    pub fn validated(mut self, validated: bool) -> Self {
        self.config.validated = validated;
        self
    }

    pub fn set_compressor(&mut self, compressor: impl Compressor + 'static) {
        self.compressor = Arc::new(compressor);
    }

    pub fn set_encrypter(&mut self, encrypter: impl Encrypter + 'static) {
        self.encrypter = Some(Arc::new(encrypter));
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes with the instance defaults. Returns `None` when lenient mode
    /// had nothing to emit (the payload's dictionary or object is
    /// unregistered).
    pub fn encode(&self, payload: &Payload) -> Result<Option<Vec<u8>>, BioError> {
        self.encode_with(
            payload,
            self.config.compressed,
            self.config.lossless,
            self.config.encrypted,
        )
    }

    /// Encodes with explicit per-call overrides of the instance defaults.
    pub fn encode_with(
        &self,
        payload: &Payload,
        compressed: bool,
        lossless: bool,
        encrypted: bool,
    ) -> Result<Option<Vec<u8>>, BioError> {
        let mut flag = if lossless { flags::XML } else { 0 };

        let encoded = match payload {
            Payload::Object(bio) => self.encode_object(bio, lossless)?,
            Payload::Array(items) => {
                flag |= flags::ARRAY;
                Some(self.encode_elements(items, lossless)?)
            }
            Payload::List(items) => {
                flag |= flags::LIST;
                Some(self.encode_elements(items, lossless)?)
            }
        };
        let Some(mut inner) = encoded else {
            return Ok(None);
        };

        if encrypted {
            let encrypter = self
                .encrypter
                .as_ref()
                .ok_or_else(|| BioError::crypto("no encrypter is configured"))?;
            inner = encrypter.encrypt(&inner)?;
            flag |= flags::ENCRYPTED;
        }

        let mut stream = Writer::new();
        if compressed {
            let packed = self.compressor.compress(&inner)?;
            // compressed form is kept only when it pays for its own
            // four-byte original-length prefix
            if packed.len() + 4 < inner.len() {
                flag |= flags::COMPRESSED;
                stream.write_u8(flag);
                stream.write_u32(inner.len() as u32);
                stream.write_bytes(&packed);
                debug!(original = inner.len(), packed = packed.len(), "frame compressed");
            } else {
                stream.write_u8(flag);
                stream.write_bytes(&inner);
                debug!(original = inner.len(), "compression rejected, frame kept raw");
            }
        } else {
            stream.write_u8(flag);
            stream.write_bytes(&inner);
        }
        Ok(Some(stream.into_bytes()))
    }

    fn encode_object(&self, bio: &BioObject, lossless: bool) -> Result<Option<Vec<u8>>, BioError> {
        if lossless {
            return Ok(Some(xml::to_xml(bio).into_bytes()));
        }
        if bio.is_properties() {
            return properties::write_record(bio, &self.registry, self.config.validated).map(Some);
        }
        record::write_bio(bio, &self.registry, self.config.validated)
    }

    /// `[count:u16]` followed by each element framed as `[elemLen][bytes]`.
    /// Lenient mode drops unencodable elements before the count is written.
    fn encode_elements(&self, items: &[BioObject], lossless: bool) -> Result<Vec<u8>, BioError> {
        let mut blobs = Vec::with_capacity(items.len());
        for bio in items {
            if let Some(bytes) = self.encode_object(bio, lossless)? {
                blobs.push(bytes);
            }
        }
        let mut stream = Writer::new();
        stream.write_bytes(&util::short_to_bytes(blobs.len() as u16));
        for blob in &blobs {
            stream.write_blob(blob)?;
        }
        Ok(stream.into_bytes())
    }

    /// Decodes a frame. Returns `None` when the frame held a single record
    /// of an unregistered type and the codec is lenient.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<Payload>, BioError> {
        let mut stream = Reader::new(bytes);
        let flag = stream.read_u8()?;
        let is_compressed = flag & flags::COMPRESSED != 0;
        let is_array = flag & flags::ARRAY != 0;
        let is_list = flag & flags::LIST != 0;
        let is_encrypted = flag & flags::ENCRYPTED != 0;
        let is_lossless = flag & flags::XML != 0;

        let mut payload = if is_compressed {
            let original_len = stream.read_u32()? as usize;
            let packed = stream.read_bytes(stream.remaining())?;
            self.compressor.decompress(packed, original_len)?
        } else {
            stream.read_bytes(stream.remaining())?.to_vec()
        };
        if is_encrypted {
            let encrypter = self
                .encrypter
                .as_ref()
                .ok_or_else(|| BioError::crypto("no encrypter is configured"))?;
            payload = encrypter.decrypt(&payload)?;
        }

        if is_array {
            Ok(Some(Payload::Array(
                self.decode_elements(&payload, is_lossless)?,
            )))
        } else if is_list {
            Ok(Some(Payload::List(
                self.decode_elements(&payload, is_lossless)?,
            )))
        } else {
            Ok(self.decode_object(&payload, is_lossless)?.map(Payload::Object))
        }
    }

    fn decode_object(&self, bytes: &[u8], lossless: bool) -> Result<Option<BioObject>, BioError> {
        if lossless {
            return xml::from_xml(bytes).map(Some);
        }
        record::read_bio(bytes, &self.registry, self.config.validated)
    }

    fn decode_elements(&self, bytes: &[u8], lossless: bool) -> Result<Vec<BioObject>, BioError> {
        let mut stream = Reader::new(bytes);
        let count = stream.read_u16()? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let blob = stream.read_blob()?;
            if let Some(bio) = self.decode_object(blob, lossless)? {
                items.push(bio);
            }
        }
        Ok(items)
    }
}
