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

//! # Bio
//!
//! A schema-driven, compact binary serializer/deserializer for structured
//! records ("bio objects"). Each record maps tag names to typed values; the
//! schema — a dictionary of object and tag descriptors — is registered once
//! at startup and shared by both peers out of band. The codec frames a
//! record, an array or a list of records into a single self-framing byte
//! blob, optionally compressed and/or encrypted, with an XML lane for
//! lossless textual round trips.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bio::{BinaryCodec, BioDictionary, BioObj, BioObject, BioTag, BioType,
//!           DictionaryRegistry, Payload, Value};
//!
//! let registry = Arc::new(DictionaryRegistry::new().with_dictionary(
//!     BioDictionary::new(1).with_obj(
//!         BioObj::new(1, 10, 1, "greeting")
//!             .with_tag(BioTag::new(1, "text", BioType::UtfString)),
//!     ),
//! ));
//!
//! let mut record = BioObject::new(1, 10, 1);
//! record.put("text", Value::Utf("hi".to_string()));
//!
//! let codec = BinaryCodec::with_registry(registry);
//! let bytes = codec.encode(&Payload::Object(record.clone())).unwrap().unwrap();
//! let decoded = codec.decode(&bytes).unwrap().unwrap();
//! assert_eq!(decoded, Payload::Object(record));
//! ```
//!
//! ## Frame layout
//!
//! `[flag:1]` followed by the payload; when the compressed bit is set, a
//! four-byte original length precedes the compressed bytes. Array and list
//! frames carry a two-byte count and length-framed elements. See the
//! `bio-core` crate for the full wire format.

pub use bio_core::codec::xml::{from_xml, to_xml};
pub use bio_core::codec::{BinaryCodec, Payload};
pub use bio_core::compress::{Compressor, Lz4Compressor};
pub use bio_core::config::CodecConfig;
pub use bio_core::crypto::{AesGcmEncrypter, Encrypter};
pub use bio_core::dictionary::{
    self, BioDictionary, BioEnumObj, BioObj, BioTag, DictionaryRegistry, RecordFactory,
    TagCodeSize,
};
pub use bio_core::error::BioError;
pub use bio_core::object::{BioEnum, BioObject};
pub use bio_core::types::{flags, BioType, Container, Value};
