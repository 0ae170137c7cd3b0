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

use chrono::{DateTime, Utc};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::object::{BioEnum, BioObject};

/// Flag bits of the outer frame byte.
pub mod flags {
    pub const COMPRESSED: u8 = 0x01;
    pub const ARRAY: u8 = 0x02;
    pub const LIST: u8 = 0x04;
    pub const ENCRYPTED: u8 = 0x08;
    pub const XML: u8 = 0x10;
}

/// Wire type tag of a value. The numeric assignments are fixed for
/// compatibility with existing blobs and must never be renumbered.
///
/// `Opaque` occupies the slot the original protocol used for host-language
/// native serialization; its payload is caller-interpreted bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum BioType {
    Byte = 1,
    Short = 2,
    Integer = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    Boolean = 7,
    String = 8,
    UtfString = 9,
    Time = 10,
    BioEnum = 11,
    Opaque = 12,
    BioObject = 13,
    Properties = 14,
}

impl BioType {
    pub fn name(&self) -> &'static str {
        match self {
            BioType::Byte => "Byte",
            BioType::Short => "Short",
            BioType::Integer => "Integer",
            BioType::Long => "Long",
            BioType::Float => "Float",
            BioType::Double => "Double",
            BioType::Boolean => "Boolean",
            BioType::String => "String",
            BioType::UtfString => "UtfString",
            BioType::Time => "Time",
            BioType::BioEnum => "BioEnum",
            BioType::Opaque => "Opaque",
            BioType::BioObject => "BioObject",
            BioType::Properties => "Properties",
        }
    }

    pub fn from_name(name: &str) -> Option<BioType> {
        Some(match name {
            "Byte" => BioType::Byte,
            "Short" => BioType::Short,
            "Integer" => BioType::Integer,
            "Long" => BioType::Long,
            "Float" => BioType::Float,
            "Double" => BioType::Double,
            "Boolean" => BioType::Boolean,
            "String" => BioType::String,
            "UtfString" => BioType::UtfString,
            "Time" => BioType::Time,
            "BioEnum" => BioType::BioEnum,
            "Opaque" => BioType::Opaque,
            "BioObject" => BioType::BioObject,
            "Properties" => BioType::Properties,
            _ => return None,
        })
    }
}

/// Container marker following the type byte of every tag entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Container {
    Scalar = 0,
    Array = 1,
    List = 2,
}

/// A value stored under a tag of a [`BioObject`].
///
/// Arrays and lists are homogeneous; the element type is dictated by the tag
/// schema on encode and by the wire type byte on decode. `Expression` is an
/// unevaluated dynamic value — it lives only in memory and is never encoded.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    /// ASCII (latin-1) string.
    Ascii(String),
    /// UTF-8 string.
    Utf(String),
    Time(DateTime<Utc>),
    Enum(BioEnum),
    /// Caller-interpreted opaque bytes.
    Opaque(Vec<u8>),
    Object(BioObject),
    Properties(BioObject),
    Array(Vec<Value>),
    List(Vec<Value>),
    Expression(String),
}

impl Value {
    /// Wire type of a scalar value; `None` for containers and expressions.
    pub fn scalar_type(&self) -> Option<BioType> {
        Some(match self {
            Value::Byte(_) => BioType::Byte,
            Value::Short(_) => BioType::Short,
            Value::Integer(_) => BioType::Integer,
            Value::Long(_) => BioType::Long,
            Value::Float(_) => BioType::Float,
            Value::Double(_) => BioType::Double,
            Value::Boolean(_) => BioType::Boolean,
            Value::Ascii(_) => BioType::String,
            Value::Utf(_) => BioType::UtfString,
            Value::Time(_) => BioType::Time,
            Value::Enum(_) => BioType::BioEnum,
            Value::Opaque(_) => BioType::Opaque,
            Value::Object(_) => BioType::BioObject,
            Value::Properties(_) => BioType::Properties,
            Value::Array(_) | Value::List(_) | Value::Expression(_) => return None,
        })
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ascii(s) | Value::Utf(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BioObject> {
        match self {
            Value::Object(o) | Value::Properties(o) => Some(o),
            _ => None,
        }
    }

    /// Elements of an array or list value.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }
}
