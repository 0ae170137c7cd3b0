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

//! Per-record framing and per-tag dispatch.
//!
//! A record body is `[dictionary:1][code:2][version:2]` followed by tag
//! entries until the blob is exhausted. Each entry is
//! `[type:1][container:1][tagCode][payload]`. Nested records run on their
//! own buffer so the caller's length and tag-width modes survive untouched.

use chrono::{DateTime, Utc};

use crate::buffer::{Reader, Writer};
use crate::codec::properties;
use crate::dictionary::{BioDictionary, BioObj, BioTag, DictionaryRegistry};
use crate::error::BioError;
use crate::object::{BioEnum, BioObject};
use crate::types::{BioType, Container, Value};

/// Encodes one record. Returns `None` when the record's dictionary or
/// object is unregistered and the codec is lenient; strict mode fails
/// instead.
pub(crate) fn write_bio(
    bio: &BioObject,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<Vec<u8>>, BioError> {
    let Some(dict) = registry.dictionary(bio.bio_dictionary()) else {
        return if validated {
            Err(BioError::UnknownDictionary(bio.bio_dictionary()))
        } else {
            Ok(None)
        };
    };
    let Some(obj) = dict.obj_by_code(bio.bio_code()) else {
        return if validated {
            Err(BioError::UnknownObject {
                dictionary: bio.bio_dictionary(),
                code: bio.bio_code(),
            })
        } else {
            Ok(None)
        };
    };

    let mut stream = Writer::new();
    stream.set_tag_code_size(dict.tag_code_size());
    if obj.is_large() {
        stream.set_length_as_int(true);
    }
    stream.write_u8(obj.dictionary());
    stream.write_u16(obj.code());
    stream.write_u16(obj.version());

    for (key, value) in bio.iter() {
        write_value(obj, dict, registry, &mut stream, key, value, validated)
            .map_err(|e| BioError::tag_context(key, obj.name(), e))?;
    }
    Ok(Some(stream.into_bytes()))
}

fn write_value(
    obj: &BioObj,
    dict: &BioDictionary,
    registry: &DictionaryRegistry,
    stream: &mut Writer,
    key: &str,
    value: &Value,
    validated: bool,
) -> Result<(), BioError> {
    let tag = obj.tag_by_name(key).or_else(|| dict.super_tag_by_name(key));
    // keys with no tag in the schema are not encodable at all
    let Some(tag) = tag else { return Ok(()) };
    if !tag.is_encodable() {
        return Ok(());
    }

    if tag.is_array() {
        let Value::Array(items) = value else {
            return Err(BioError::type_mismatch(key, "an array"));
        };
        stream.write_u8(tag.bio_type().into());
        stream.write_u8(Container::Array.into());
        write_items(tag, items, stream, registry, validated, "arrays")
    } else if tag.is_list() {
        let Value::List(items) = value else {
            return Err(BioError::type_mismatch(key, "a list"));
        };
        stream.write_u8(tag.bio_type().into());
        stream.write_u8(Container::List.into());
        write_items(tag, items, stream, registry, validated, "lists")
    } else {
        write_scalar(tag, value, stream, registry, validated)
    }
}

fn write_scalar(
    tag: &BioTag,
    value: &Value,
    stream: &mut Writer,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<(), BioError> {
    // dynamic expressions are evaluated upstream, never encoded
    if let Value::Expression(_) = value {
        return Ok(());
    }
    // a nested record from an unregistered dictionary is silently omitted
    if let Value::Object(nested) = value {
        if registry.dictionary(nested.bio_dictionary()).is_none() {
            return Ok(());
        }
    }

    match tag.bio_type() {
        BioType::BioObject => {
            let nested = expect_object(tag.name(), value)?;
            let Some(bytes) = write_bio(nested, registry, validated)? else {
                return Ok(());
            };
            stream.write_u8(BioType::BioObject.into());
            stream.write_u8(Container::Scalar.into());
            stream.write_tag(tag)?;
            stream.write_blob(&bytes)
        }
        BioType::Properties => {
            let Value::Properties(props) = value else {
                return Err(BioError::type_mismatch(tag.name(), "a properties record"));
            };
            let bytes = properties::write_record(props, registry, validated)?;
            stream.write_u8(BioType::Properties.into());
            stream.write_u8(Container::Scalar.into());
            stream.write_tag(tag)?;
            stream.write_blob(&bytes)
        }
        bio_type => {
            stream.write_u8(bio_type.into());
            stream.write_u8(Container::Scalar.into());
            stream.write_tag(tag)?;
            match bio_type {
                BioType::Byte => stream.write_i8(expect_byte(tag.name(), value)?),
                BioType::Short => stream.write_i16(expect_short(tag.name(), value)?),
                BioType::Integer => stream.write_i32(expect_int(tag.name(), value)?),
                BioType::Long => stream.write_i64(expect_long(tag.name(), value)?),
                BioType::Float => stream.write_f32(expect_float(tag.name(), value)?),
                BioType::Double => stream.write_f64(expect_double(tag.name(), value)?),
                BioType::Boolean => stream.write_bool(expect_bool(tag.name(), value)?),
                BioType::Time => stream.write_i64(expect_time(tag.name(), value)?),
                BioType::BioEnum => stream.write_i32(expect_enum(tag.name(), value)?.ordinal()),
                BioType::String => stream.write_ascii_value(expect_ascii(tag.name(), value)?)?,
                BioType::UtfString => stream.write_utf_value(expect_utf(tag.name(), value)?)?,
                BioType::Opaque => stream.write_blob(expect_opaque(tag.name(), value)?)?,
                BioType::BioObject | BioType::Properties => unreachable!(),
            }
            Ok(())
        }
    }
}

fn write_items(
    tag: &BioTag,
    items: &[Value],
    stream: &mut Writer,
    registry: &DictionaryRegistry,
    validated: bool,
    shape: &'static str,
) -> Result<(), BioError> {
    match tag.bio_type() {
        BioType::Byte => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_i8(expect_byte(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Short => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_i16(expect_short(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Integer => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_i32(expect_int(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Long => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_i64(expect_long(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Time => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_i64(expect_time(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Float => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_f32(expect_float(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Double => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_f64(expect_double(tag.name(), item)?);
            }
            Ok(())
        }
        BioType::Boolean => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_bool(expect_bool(tag.name(), item)?);
            }
            Ok(())
        }
        // enums travel as their ordinals
        BioType::BioEnum => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_i32(expect_enum(tag.name(), item)?.ordinal());
            }
            Ok(())
        }
        BioType::String => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_ascii_value(expect_ascii(tag.name(), item)?)?;
            }
            Ok(())
        }
        BioType::UtfString => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_utf_value(expect_utf(tag.name(), item)?)?;
            }
            Ok(())
        }
        BioType::Opaque => {
            stream.write_tag(tag)?;
            stream.write_length(items.len())?;
            for item in items {
                stream.write_blob(expect_opaque(tag.name(), item)?)?;
            }
            Ok(())
        }
        BioType::BioObject => {
            // lenient skips must not desynchronize the count, so frame the
            // elements first and emit how many actually made it
            let mut blobs = Vec::with_capacity(items.len());
            for item in items {
                let nested = expect_object(tag.name(), item)?;
                if let Some(bytes) = write_bio(nested, registry, validated)? {
                    blobs.push(bytes);
                }
            }
            stream.write_tag(tag)?;
            stream.write_length(blobs.len())?;
            for blob in &blobs {
                stream.write_blob(blob)?;
            }
            Ok(())
        }
        other => Err(BioError::unsupported(format!(
            "{} {} are not supported",
            other.name(),
            shape
        ))),
    }
}

/// Decodes one record body. Returns `None` when the dictionary or object is
/// unknown and the codec is lenient. Properties records dispatch to the
/// schema-less codec.
pub(crate) fn read_bio(
    bytes: &[u8],
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<BioObject>, BioError> {
    let mut stream = Reader::new(bytes);
    let dictionary = stream.read_u8()?;
    let code = stream.read_u16()?;
    let version = stream.read_u16()?;
    if code == 0 && version == 0 {
        return properties::read_record(dictionary, &mut stream, registry, validated).map(Some);
    }

    let Some(dict) = registry.dictionary(dictionary) else {
        return if validated {
            Err(BioError::UnknownDictionary(dictionary))
        } else {
            Ok(None)
        };
    };
    let Some(obj) = dict.obj_by_code(code) else {
        return if validated {
            Err(BioError::UnknownObject { dictionary, code })
        } else {
            Ok(None)
        };
    };

    stream.set_tag_code_size(dict.tag_code_size());
    if obj.is_large() {
        stream.set_length_as_int(true);
    }

    let mut bio = obj.new_record();
    bio.set_bio_version(version);

    while stream.remaining() > 0 {
        let type_byte = stream.read_u8()?;
        let bio_type =
            BioType::try_from(type_byte).map_err(|_| BioError::UnknownWireType(type_byte))?;
        let container_byte = stream.read_u8()?;
        let container = Container::try_from(container_byte)
            .map_err(|_| BioError::UnknownContainer(container_byte))?;
        let tag_code = stream.read_tag_code()?;
        let tag = obj
            .tag_by_code(tag_code)
            .or_else(|| dict.super_tag_by_code(tag_code));
        // an unknown tag still consumes its payload so the stream stays in sync
        let value = read_value(bio_type, container, tag, &mut stream, dict, registry, validated)?;
        if let (Some(tag), Some(value)) = (tag, value) {
            bio.put(tag.name(), value);
        }
    }
    Ok(Some(bio))
}

pub(crate) fn read_value(
    bio_type: BioType,
    container: Container,
    tag: Option<&BioTag>,
    stream: &mut Reader,
    dict: &BioDictionary,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<Value>, BioError> {
    match container {
        Container::Scalar => read_scalar(bio_type, tag, stream, dict, registry, validated),
        Container::Array => {
            Ok(read_items(bio_type, tag, stream, dict, registry, validated)?.map(Value::Array))
        }
        Container::List => {
            Ok(read_items(bio_type, tag, stream, dict, registry, validated)?.map(Value::List))
        }
    }
}

fn read_scalar(
    bio_type: BioType,
    tag: Option<&BioTag>,
    stream: &mut Reader,
    dict: &BioDictionary,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<Value>, BioError> {
    match bio_type {
        BioType::Byte => Ok(Some(Value::Byte(stream.read_i8()?))),
        BioType::Short => Ok(Some(Value::Short(stream.read_i16()?))),
        BioType::Integer => Ok(Some(Value::Integer(stream.read_i32()?))),
        BioType::Long => Ok(Some(Value::Long(stream.read_i64()?))),
        BioType::Float => Ok(Some(Value::Float(stream.read_f32()?))),
        BioType::Double => Ok(Some(Value::Double(stream.read_f64()?))),
        BioType::Boolean => Ok(Some(Value::Boolean(stream.read_bool()?))),
        BioType::Time => Ok(Some(Value::Time(time_from_millis(stream.read_i64()?)?))),
        BioType::String => Ok(Some(Value::Ascii(stream.read_ascii_value()?))),
        BioType::UtfString => Ok(Some(Value::Utf(stream.read_utf_value()?))),
        BioType::Opaque => Ok(Some(Value::Opaque(stream.read_blob()?.to_vec()))),
        BioType::BioEnum => {
            let ordinal = stream.read_i32()?;
            Ok(resolve_enum(tag, dict, ordinal).map(Value::Enum))
        }
        BioType::BioObject => {
            let blob = stream.read_blob()?;
            if tag.is_none() {
                return Ok(None);
            }
            Ok(read_bio(blob, registry, validated)?.map(Value::Object))
        }
        BioType::Properties => {
            let blob = stream.read_blob()?;
            if tag.is_none() {
                return Ok(None);
            }
            Ok(read_bio(blob, registry, validated)?.map(Value::Properties))
        }
    }
}

macro_rules! primitive_items {
    ($stream:expr, $read:ident, $variant:ident) => {{
        let count = $stream.read_length()?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(Value::$variant($stream.$read()?));
        }
        Ok(Some(items))
    }};
}

fn read_items(
    bio_type: BioType,
    tag: Option<&BioTag>,
    stream: &mut Reader,
    dict: &BioDictionary,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<Vec<Value>>, BioError> {
    match bio_type {
        BioType::Byte => primitive_items!(stream, read_i8, Byte),
        BioType::Short => primitive_items!(stream, read_i16, Short),
        BioType::Integer => primitive_items!(stream, read_i32, Integer),
        BioType::Long => primitive_items!(stream, read_i64, Long),
        BioType::Float => primitive_items!(stream, read_f32, Float),
        BioType::Double => primitive_items!(stream, read_f64, Double),
        BioType::Boolean => primitive_items!(stream, read_bool, Boolean),
        BioType::String => primitive_items!(stream, read_ascii_value, Ascii),
        BioType::UtfString => primitive_items!(stream, read_utf_value, Utf),
        BioType::Time => {
            let count = stream.read_length()?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(Value::Time(time_from_millis(stream.read_i64()?)?));
            }
            Ok(Some(items))
        }
        BioType::Opaque => {
            let count = stream.read_length()?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(Value::Opaque(stream.read_blob()?.to_vec()));
            }
            Ok(Some(items))
        }
        BioType::BioEnum => {
            let count = stream.read_length()?;
            let mut ordinals = Vec::with_capacity(count);
            for _ in 0..count {
                ordinals.push(stream.read_i32()?);
            }
            let Some(enum_obj) = tag
                .and_then(BioTag::enum_code)
                .and_then(|code| dict.enum_by_code(code))
            else {
                return Ok(None);
            };
            let mut items = Vec::with_capacity(count);
            for ordinal in ordinals {
                // unknown ordinals are dropped, the rest survive
                if let Some(e) = enum_obj.bio_enum(ordinal) {
                    items.push(Value::Enum(e));
                }
            }
            Ok(Some(items))
        }
        BioType::BioObject | BioType::Properties => {
            let count = stream.read_length()?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                let blob = stream.read_blob()?;
                if tag.is_none() {
                    continue;
                }
                if let Some(nested) = read_bio(blob, registry, validated)? {
                    items.push(if bio_type == BioType::Properties {
                        Value::Properties(nested)
                    } else {
                        Value::Object(nested)
                    });
                }
            }
            if tag.is_none() {
                return Ok(None);
            }
            Ok(Some(items))
        }
    }
}

fn resolve_enum(tag: Option<&BioTag>, dict: &BioDictionary, ordinal: i32) -> Option<BioEnum> {
    tag.and_then(BioTag::enum_code)
        .and_then(|code| dict.enum_by_code(code))
        .and_then(|enum_obj| enum_obj.bio_enum(ordinal))
}

pub(crate) fn time_from_millis(ms: i64) -> Result<DateTime<Utc>, BioError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| BioError::invalid_data(format!("timestamp {} ms is out of range", ms)))
}

fn expect_byte(tag: &str, value: &Value) -> Result<i8, BioError> {
    match value {
        Value::Byte(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "a Byte")),
    }
}

fn expect_short(tag: &str, value: &Value) -> Result<i16, BioError> {
    match value {
        Value::Short(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "a Short")),
    }
}

fn expect_int(tag: &str, value: &Value) -> Result<i32, BioError> {
    match value {
        Value::Integer(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "an Integer")),
    }
}

fn expect_long(tag: &str, value: &Value) -> Result<i64, BioError> {
    match value {
        Value::Long(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "a Long")),
    }
}

fn expect_float(tag: &str, value: &Value) -> Result<f32, BioError> {
    match value {
        Value::Float(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "a Float")),
    }
}

fn expect_double(tag: &str, value: &Value) -> Result<f64, BioError> {
    match value {
        Value::Double(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "a Double")),
    }
}

fn expect_bool(tag: &str, value: &Value) -> Result<bool, BioError> {
    match value {
        Value::Boolean(v) => Ok(*v),
        _ => Err(BioError::type_mismatch(tag, "a Boolean")),
    }
}

fn expect_time(tag: &str, value: &Value) -> Result<i64, BioError> {
    match value {
        Value::Time(t) => Ok(t.timestamp_millis()),
        _ => Err(BioError::type_mismatch(tag, "a Time")),
    }
}

fn expect_enum<'a>(tag: &str, value: &'a Value) -> Result<&'a BioEnum, BioError> {
    match value {
        Value::Enum(e) => Ok(e),
        _ => Err(BioError::type_mismatch(tag, "an enum")),
    }
}

fn expect_ascii<'a>(tag: &str, value: &'a Value) -> Result<&'a str, BioError> {
    match value {
        Value::Ascii(s) => Ok(s),
        _ => Err(BioError::type_mismatch(tag, "an ASCII string")),
    }
}

fn expect_utf<'a>(tag: &str, value: &'a Value) -> Result<&'a str, BioError> {
    match value {
        Value::Utf(s) => Ok(s),
        _ => Err(BioError::type_mismatch(tag, "a UTF string")),
    }
}

fn expect_opaque<'a>(tag: &str, value: &'a Value) -> Result<&'a [u8], BioError> {
    match value {
        Value::Opaque(bytes) => Ok(bytes),
        _ => Err(BioError::type_mismatch(tag, "opaque bytes")),
    }
}

fn expect_object<'a>(tag: &str, value: &'a Value) -> Result<&'a BioObject, BioError> {
    match value {
        Value::Object(o) => Ok(o),
        _ => Err(BioError::type_mismatch(tag, "a bio object")),
    }
}
