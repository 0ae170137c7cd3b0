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

//! # Bio Core
//!
//! Core implementation of the bio binary codec: a schema-driven, compact
//! binary serializer for structured records whose schemas (dictionaries of
//! object, tag and enum descriptors) are known to both sides out of band.
//!
//! ## Architecture
//!
//! - **`buffer`**: big-endian Writer/Reader with per-record length and
//!   tag-width modes
//! - **`types`**: the wire-type table, container markers and in-memory values
//! - **`object`**: the ordered record container
//! - **`dictionary`**: the process-wide schema registry and record factory
//! - **`codec`**: frame, record, properties and XML codecs
//! - **`compress`** / **`crypto`**: pluggable frame transforms
//! - **`config`**: per-instance codec defaults
//! - **`error`**: the parser error taxonomy

pub mod buffer;
pub mod codec;
pub mod compress;
pub mod config;
pub mod crypto;
pub mod dictionary;
pub mod error;
pub mod object;
pub mod types;
pub mod util;

pub use error::BioError;
