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

//! Schema-less record encoding, the escape hatch for dynamic maps.
//!
//! A properties record carries `code == 0 && version == 0` and bypasses the
//! dictionary. After the header the body is repeated
//! `[keyNameUtf][type:1][container:1][valueBytes]` entries; tags are
//! identified by name, so no tag codes appear. Enums have no schema to
//! resolve against here and travel as plain integers.

use crate::buffer::{Reader, Writer};
use crate::codec::record;
use crate::dictionary::DictionaryRegistry;
use crate::error::BioError;
use crate::object::BioObject;
use crate::types::{BioType, Container, Value};

/// Encodes a full properties record: `[dictionary:1][0:2][0:2]` + entries.
pub(crate) fn write_record(
    bio: &BioObject,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Vec<u8>, BioError> {
    if !bio.is_properties() {
        return Err(BioError::invalid_data(format!(
            "record {}v{} is not a properties record",
            bio.bio_code(),
            bio.bio_version()
        )));
    }
    let mut stream = Writer::new();
    stream.write_u8(bio.bio_dictionary());
    stream.write_u16(bio.bio_code());
    stream.write_u16(bio.bio_version());
    for (key, value) in bio.iter() {
        write_entry(&mut stream, key, value, registry, validated)?;
    }
    Ok(stream.into_bytes())
}

fn write_entry(
    stream: &mut Writer,
    key: &str,
    value: &Value,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<(), BioError> {
    match value {
        Value::Expression(_) => Ok(()),
        Value::Array(items) => {
            write_container_entry(stream, key, items, Container::Array, registry, validated)
        }
        Value::List(items) => {
            write_container_entry(stream, key, items, Container::List, registry, validated)
        }
        scalar => {
            // payload first: a nested record may turn out unencodable and
            // then the whole entry is omitted
            let mut payload = Writer::new();
            let bio_type = match scalar {
                Value::Byte(v) => {
                    payload.write_i8(*v);
                    BioType::Byte
                }
                Value::Short(v) => {
                    payload.write_i16(*v);
                    BioType::Short
                }
                Value::Integer(v) => {
                    payload.write_i32(*v);
                    BioType::Integer
                }
                Value::Long(v) => {
                    payload.write_i64(*v);
                    BioType::Long
                }
                Value::Float(v) => {
                    payload.write_f32(*v);
                    BioType::Float
                }
                Value::Double(v) => {
                    payload.write_f64(*v);
                    BioType::Double
                }
                Value::Boolean(v) => {
                    payload.write_bool(*v);
                    BioType::Boolean
                }
                Value::Ascii(s) => {
                    payload.write_ascii_value(s)?;
                    BioType::String
                }
                Value::Utf(s) => {
                    payload.write_utf_value(s)?;
                    BioType::UtfString
                }
                Value::Time(t) => {
                    payload.write_i64(t.timestamp_millis());
                    BioType::Time
                }
                Value::Enum(e) => {
                    payload.write_i32(e.ordinal());
                    BioType::Integer
                }
                Value::Opaque(bytes) => {
                    payload.write_blob(bytes)?;
                    BioType::Opaque
                }
                Value::Object(nested) => {
                    // records from an unregistered dictionary are silently
                    // omitted, matching the schema-ful scalar path
                    if registry.dictionary(nested.bio_dictionary()).is_none() {
                        return Ok(());
                    }
                    let Some(bytes) = record::write_bio(nested, registry, validated)? else {
                        return Ok(());
                    };
                    payload.write_blob(&bytes)?;
                    BioType::BioObject
                }
                Value::Properties(nested) => {
                    let bytes = write_record(nested, registry, validated)?;
                    payload.write_blob(&bytes)?;
                    BioType::Properties
                }
                Value::Array(_) | Value::List(_) | Value::Expression(_) => unreachable!(),
            };
            stream.write_utf_value(key)?;
            stream.write_u8(bio_type.into());
            stream.write_u8(Container::Scalar.into());
            stream.write_bytes(&payload.into_bytes());
            Ok(())
        }
    }
}

fn write_container_entry(
    stream: &mut Writer,
    key: &str,
    items: &[Value],
    container: Container,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<(), BioError> {
    let bio_type = element_type(key, items)?;
    let mut payload = Writer::new();
    match bio_type {
        BioType::BioObject | BioType::Properties => {
            let mut blobs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(nested) => {
                        if let Some(bytes) = record::write_bio(nested, registry, validated)? {
                            blobs.push(bytes);
                        }
                    }
                    Value::Properties(nested) => {
                        blobs.push(write_record(nested, registry, validated)?);
                    }
                    _ => return Err(BioError::type_mismatch(key, "a record element")),
                }
            }
            payload.write_length(blobs.len())?;
            for blob in &blobs {
                payload.write_blob(blob)?;
            }
        }
        _ => {
            payload.write_length(items.len())?;
            for item in items {
                write_raw_scalar(&mut payload, key, item)?;
            }
        }
    }
    stream.write_utf_value(key)?;
    stream.write_u8(bio_type.into());
    stream.write_u8(container.into());
    stream.write_bytes(&payload.into_bytes());
    Ok(())
}

/// The wire type of a container entry, taken from its first element. Empty
/// containers have nothing to inspect and encode as an empty byte sequence.
fn element_type(key: &str, items: &[Value]) -> Result<BioType, BioError> {
    let Some(first) = items.first() else {
        return Ok(BioType::Byte);
    };
    match first.scalar_type() {
        Some(BioType::BioEnum) => Ok(BioType::Integer),
        Some(bio_type) => Ok(bio_type),
        None => Err(BioError::unsupported(format!(
            "nested containers are not supported under properties key {}",
            key
        ))),
    }
}

fn write_raw_scalar(stream: &mut Writer, key: &str, value: &Value) -> Result<(), BioError> {
    match value {
        Value::Byte(v) => stream.write_i8(*v),
        Value::Short(v) => stream.write_i16(*v),
        Value::Integer(v) => stream.write_i32(*v),
        Value::Long(v) => stream.write_i64(*v),
        Value::Float(v) => stream.write_f32(*v),
        Value::Double(v) => stream.write_f64(*v),
        Value::Boolean(v) => stream.write_bool(*v),
        Value::Ascii(s) => stream.write_ascii_value(s)?,
        Value::Utf(s) => stream.write_utf_value(s)?,
        Value::Time(t) => stream.write_i64(t.timestamp_millis()),
        Value::Enum(e) => stream.write_i32(e.ordinal()),
        Value::Opaque(bytes) => stream.write_blob(bytes)?,
        _ => {
            return Err(BioError::type_mismatch(key, "a homogeneous scalar element"));
        }
    }
    Ok(())
}

/// Decodes the entries of a properties record. The caller has already
/// consumed the `[dictionary][code][version]` header.
pub(crate) fn read_record(
    dictionary: u8,
    stream: &mut Reader,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<BioObject, BioError> {
    let mut bio = BioObject::properties();
    bio.set_bio_dictionary(dictionary);
    while stream.remaining() > 0 {
        let key = stream.read_utf_value()?;
        let type_byte = stream.read_u8()?;
        let bio_type =
            BioType::try_from(type_byte).map_err(|_| BioError::UnknownWireType(type_byte))?;
        let container_byte = stream.read_u8()?;
        let container = Container::try_from(container_byte)
            .map_err(|_| BioError::UnknownContainer(container_byte))?;
        let value = match container {
            Container::Scalar => read_raw_scalar(stream, bio_type, registry, validated)?,
            Container::Array => {
                read_raw_items(stream, bio_type, registry, validated)?.map(Value::Array)
            }
            Container::List => {
                read_raw_items(stream, bio_type, registry, validated)?.map(Value::List)
            }
        };
        if let Some(value) = value {
            bio.put(key, value);
        }
    }
    Ok(bio)
}

fn read_raw_scalar(
    stream: &mut Reader,
    bio_type: BioType,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<Value>, BioError> {
    Ok(Some(match bio_type {
        BioType::Byte => Value::Byte(stream.read_i8()?),
        BioType::Short => Value::Short(stream.read_i16()?),
        BioType::Integer => Value::Integer(stream.read_i32()?),
        BioType::Long => Value::Long(stream.read_i64()?),
        BioType::Float => Value::Float(stream.read_f32()?),
        BioType::Double => Value::Double(stream.read_f64()?),
        BioType::Boolean => Value::Boolean(stream.read_bool()?),
        BioType::String => Value::Ascii(stream.read_ascii_value()?),
        BioType::UtfString => Value::Utf(stream.read_utf_value()?),
        BioType::Time => Value::Time(record::time_from_millis(stream.read_i64()?)?),
        // enums are encoded as plain integers here; a raw ordinal decodes
        // the same way
        BioType::BioEnum => Value::Integer(stream.read_i32()?),
        BioType::Opaque => Value::Opaque(stream.read_blob()?.to_vec()),
        BioType::BioObject => {
            let blob = stream.read_blob()?;
            return Ok(record::read_bio(blob, registry, validated)?.map(Value::Object));
        }
        BioType::Properties => {
            let blob = stream.read_blob()?;
            return Ok(record::read_bio(blob, registry, validated)?.map(Value::Properties));
        }
    }))
}

fn read_raw_items(
    stream: &mut Reader,
    bio_type: BioType,
    registry: &DictionaryRegistry,
    validated: bool,
) -> Result<Option<Vec<Value>>, BioError> {
    match bio_type {
        BioType::BioObject | BioType::Properties => {
            let count = stream.read_length()?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                let blob = stream.read_blob()?;
                if let Some(nested) = record::read_bio(blob, registry, validated)? {
                    items.push(if bio_type == BioType::Properties {
                        Value::Properties(nested)
                    } else {
                        Value::Object(nested)
                    });
                }
            }
            Ok(Some(items))
        }
        _ => {
            let count = stream.read_length()?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                match read_raw_scalar(stream, bio_type, registry, validated)? {
                    Some(value) => items.push(value),
                    None => {}
                }
            }
            Ok(Some(items))
        }
    }
}
