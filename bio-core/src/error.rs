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

use std::borrow::Cow;

use thiserror::Error;

/// Error type for all encode/decode operations of the bio binary codec.
///
/// Schema problems (unknown dictionary/object) are fatal only when the codec
/// runs validated; everything else in this taxonomy is always fatal. Unknown
/// tags on the wire are not errors at all — their bytes are consumed and
/// dropped by the record codec.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BioError {
    /// No dictionary registered under this id.
    #[error("bio dictionary {0} is not found")]
    UnknownDictionary(u8),

    /// Dictionary exists but carries no object with this code.
    #[error("bio obj {code} is not found in dictionary {dictionary}")]
    UnknownObject { dictionary: u8, code: u16 },

    /// The process-wide registry was never published via `dictionary::init`.
    #[error("dictionary registry is not initialized")]
    Uninitialized,

    /// The type byte of a tag entry is outside the wire-type table.
    #[error("wire type {0} is not known")]
    UnknownWireType(u8),

    /// The container byte of a tag entry is not scalar/array/list.
    #[error("container marker {0} is not known")]
    UnknownContainer(u8),

    /// A tag's declared shape does not match the supplied value.
    #[error("for tag {tag} value is not {expected}")]
    TypeMismatch { tag: String, expected: &'static str },

    /// A (type, container) pair with no wire encoding.
    #[error("{0}")]
    Unsupported(Cow<'static, str>),

    #[error("buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// String payload is not representable (non-ASCII in an ASCII tag,
    /// invalid UTF-8 on the wire).
    #[error("{0}")]
    EncodingError(Cow<'static, str>),

    #[error("compression failed: {0}")]
    Compression(Cow<'static, str>),

    #[error("encryption failed: {0}")]
    Crypto(Cow<'static, str>),

    #[error("xml bridge failed: {0}")]
    Xml(Cow<'static, str>),

    /// Context wrapper added by the record codec around per-tag failures.
    #[error("tag {tag} of {object}: {source}")]
    Tag {
        tag: String,
        object: String,
        #[source]
        source: Box<BioError>,
    },
}

impl BioError {
    #[cold]
    #[track_caller]
    pub fn unsupported<S: Into<Cow<'static, str>>>(s: S) -> Self {
        BioError::Unsupported(s.into())
    }

    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        BioError::InvalidData(s.into())
    }

    #[cold]
    #[track_caller]
    pub fn encoding_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        BioError::EncodingError(s.into())
    }

    #[cold]
    #[track_caller]
    pub fn compression<S: Into<Cow<'static, str>>>(s: S) -> Self {
        BioError::Compression(s.into())
    }

    #[cold]
    #[track_caller]
    pub fn crypto<S: Into<Cow<'static, str>>>(s: S) -> Self {
        BioError::Crypto(s.into())
    }

    #[cold]
    #[track_caller]
    pub fn xml<S: Into<Cow<'static, str>>>(s: S) -> Self {
        BioError::Xml(s.into())
    }

    #[cold]
    #[track_caller]
    pub fn type_mismatch(tag: &str, expected: &'static str) -> Self {
        BioError::TypeMismatch {
            tag: tag.to_string(),
            expected,
        }
    }

    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        BioError::BufferOutOfBound(offset, length, capacity)
    }

    /// Wraps a tag-level failure with the tag and object names, preserving
    /// the cause. Schema-lookup context survives through `source`.
    #[cold]
    pub fn tag_context(tag: &str, object: &str, source: BioError) -> Self {
        BioError::Tag {
            tag: tag.to_string(),
            object: object.to_string(),
            source: Box::new(source),
        }
    }
}

/// Ensures a condition holds; otherwise returns the given [`enum@BioError`].
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::BioError::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}
