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

//! The lossless lane: textual record serialization selected by the XML
//! frame flag.
//!
//! The writer assembles the document by hand; the reader is a pull parse
//! over `quick-xml` events. The format needs no dictionary on either side —
//! enum names and ordinals are both carried, so the lane round-trips
//! records whose schema the peer never registered.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;

use crate::codec::record::time_from_millis;
use crate::error::BioError;
use crate::object::{BioEnum, BioObject};
use crate::types::{Container, Value};

/// Serializes a record to its XML form.
pub fn to_xml(bio: &BioObject) -> String {
    let mut out = String::new();
    write_bio_element(&mut out, bio);
    out
}

fn write_bio_element(out: &mut String, bio: &BioObject) {
    out.push_str("<bio dictionary=\"");
    out.push_str(&bio.bio_dictionary().to_string());
    out.push_str("\" code=\"");
    out.push_str(&bio.bio_code().to_string());
    out.push_str("\" version=\"");
    out.push_str(&bio.bio_version().to_string());
    out.push('"');
    if let Some(name) = bio.bio_name() {
        out.push_str(" name=\"");
        out.push_str(&escape(name));
        out.push('"');
    }
    out.push('>');
    for (key, value) in bio.iter() {
        write_tag_element(out, key, value);
    }
    out.push_str("</bio>");
}

fn write_tag_element(out: &mut String, key: &str, value: &Value) {
    match value {
        Value::Array(items) => write_container_element(out, key, items, "array"),
        Value::List(items) => write_container_element(out, key, items, "list"),
        Value::Expression(expr) => {
            open_tag(out, key, "Expression", None);
            out.push_str(&escape(expr));
            out.push_str("</tag>");
        }
        Value::Object(nested) => {
            open_tag(out, key, "BioObject", None);
            write_bio_element(out, nested);
            out.push_str("</tag>");
        }
        Value::Properties(nested) => {
            open_tag(out, key, "Properties", None);
            write_bio_element(out, nested);
            out.push_str("</tag>");
        }
        Value::Enum(e) => {
            open_tag(out, key, "BioEnum", Some(e.ordinal()));
            out.push_str(&escape(e.name()));
            out.push_str("</tag>");
        }
        scalar => {
            let ty = scalar.scalar_type().map(|t| t.name()).unwrap_or("Byte");
            open_tag(out, key, ty, None);
            out.push_str(&escape(&scalar_text(scalar)));
            out.push_str("</tag>");
        }
    }
}

fn write_container_element(out: &mut String, key: &str, items: &[Value], container: &str) {
    let ty = items
        .first()
        .map(|item| match item {
            Value::Expression(_) => "Expression",
            other => other.scalar_type().map(|t| t.name()).unwrap_or("Byte"),
        })
        .unwrap_or("Byte");
    out.push_str("<tag name=\"");
    out.push_str(&escape(key));
    out.push_str("\" type=\"");
    out.push_str(ty);
    out.push_str("\" container=\"");
    out.push_str(container);
    out.push_str("\">");
    for item in items {
        match item {
            Value::Object(nested) | Value::Properties(nested) => write_bio_element(out, nested),
            Value::Enum(e) => {
                out.push_str("<item ordinal=\"");
                out.push_str(&e.ordinal().to_string());
                out.push_str("\">");
                out.push_str(&escape(e.name()));
                out.push_str("</item>");
            }
            other => {
                out.push_str("<item>");
                out.push_str(&escape(&scalar_text(other)));
                out.push_str("</item>");
            }
        }
    }
    out.push_str("</tag>");
}

fn open_tag(out: &mut String, key: &str, ty: &str, ordinal: Option<i32>) {
    out.push_str("<tag name=\"");
    out.push_str(&escape(key));
    out.push_str("\" type=\"");
    out.push_str(ty);
    out.push('"');
    if let Some(ordinal) = ordinal {
        out.push_str(" ordinal=\"");
        out.push_str(&ordinal.to_string());
        out.push('"');
    }
    out.push('>');
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Byte(v) => v.to_string(),
        Value::Short(v) => v.to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Boolean(v) => v.to_string(),
        Value::Ascii(s) | Value::Utf(s) => s.clone(),
        Value::Time(t) => t.timestamp_millis().to_string(),
        Value::Enum(e) => e.name().to_string(),
        Value::Opaque(bytes) => hex_encode(bytes),
        Value::Object(_) | Value::Properties(_) => String::new(),
        Value::Array(_) | Value::List(_) => String::new(),
        Value::Expression(expr) => expr.clone(),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

struct BioHeader {
    dictionary: u8,
    code: u16,
    version: u16,
    name: Option<String>,
}

struct TagMeta {
    name: String,
    ty: String,
    container: Container,
    ordinal: Option<i32>,
}

/// Parses a record from its XML form.
pub fn from_xml(bytes: &[u8]) -> Result<BioObject, BioError> {
    let mut reader = XmlReader::from_reader(bytes);
    reader.trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"bio" => {
                let header = bio_header(&e)?;
                return read_bio_element(&mut reader, header);
            }
            Event::Eof => return Err(BioError::xml("document has no <bio> root")),
            _ => {}
        }
        buf.clear();
    }
}

fn read_bio_element(
    reader: &mut XmlReader<&[u8]>,
    header: BioHeader,
) -> Result<BioObject, BioError> {
    let mut bio = BioObject::new(header.dictionary, header.code, header.version);
    if let Some(name) = header.name {
        bio.set_bio_name(name);
    }
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"tag" => {
                let meta = tag_meta(&e)?;
                if let Some(value) = read_tag_value(reader, &meta)? {
                    bio.put(meta.name, value);
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"tag" => {
                let meta = tag_meta(&e)?;
                if let Some(value) = empty_tag_value(&meta)? {
                    bio.put(meta.name, value);
                }
            }
            Event::End(e) if e.name().as_ref() == b"bio" => return Ok(bio),
            Event::Eof => return Err(BioError::xml("unexpected end of document inside <bio>")),
            _ => {}
        }
        buf.clear();
    }
}

fn read_tag_value(
    reader: &mut XmlReader<&[u8]>,
    meta: &TagMeta,
) -> Result<Option<Value>, BioError> {
    let mut text = String::new();
    let mut scalars: Vec<Value> = Vec::new();
    let mut records: Vec<BioObject> = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(xml_err)?),
            Event::Start(e) if e.name().as_ref() == b"item" => {
                let ordinal = ordinal_attr(&e)?;
                let item_text = read_text_until_end(reader, b"item")?;
                scalars.push(scalar_from_text(&meta.ty, &item_text, ordinal)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"item" => {
                let ordinal = ordinal_attr(&e)?;
                scalars.push(scalar_from_text(&meta.ty, "", ordinal)?);
            }
            Event::Start(e) if e.name().as_ref() == b"bio" => {
                let header = bio_header(&e)?;
                records.push(read_bio_element(reader, header)?);
            }
            Event::End(e) if e.name().as_ref() == b"tag" => break,
            Event::Eof => return Err(BioError::xml("unexpected end of document inside <tag>")),
            _ => {}
        }
        buf.clear();
    }

    match meta.container {
        Container::Scalar => match meta.ty.as_str() {
            "BioObject" => Ok(records.into_iter().next().map(Value::Object)),
            "Properties" => Ok(records.into_iter().next().map(Value::Properties)),
            "Expression" => Ok(Some(Value::Expression(text))),
            _ => Ok(Some(scalar_from_text(&meta.ty, &text, meta.ordinal)?)),
        },
        Container::Array | Container::List => {
            let items: Vec<Value> = match meta.ty.as_str() {
                "BioObject" => records.into_iter().map(Value::Object).collect(),
                "Properties" => records.into_iter().map(Value::Properties).collect(),
                _ => scalars,
            };
            Ok(Some(if meta.container == Container::Array {
                Value::Array(items)
            } else {
                Value::List(items)
            }))
        }
    }
}

fn empty_tag_value(meta: &TagMeta) -> Result<Option<Value>, BioError> {
    match meta.container {
        Container::Array => Ok(Some(Value::Array(Vec::new()))),
        Container::List => Ok(Some(Value::List(Vec::new()))),
        Container::Scalar => match meta.ty.as_str() {
            "String" => Ok(Some(Value::Ascii(String::new()))),
            "UtfString" => Ok(Some(Value::Utf(String::new()))),
            "Expression" => Ok(Some(Value::Expression(String::new()))),
            _ => Ok(None),
        },
    }
}

fn read_text_until_end(reader: &mut XmlReader<&[u8]>, end: &[u8]) -> Result<String, BioError> {
    let mut text = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(xml_err)?),
            Event::End(e) if e.name().as_ref() == end => return Ok(text),
            Event::Eof => return Err(BioError::xml("unexpected end of document inside element")),
            _ => {}
        }
        buf.clear();
    }
}

fn scalar_from_text(ty: &str, text: &str, ordinal: Option<i32>) -> Result<Value, BioError> {
    Ok(match ty {
        "Byte" => Value::Byte(parse_number(ty, text)?),
        "Short" => Value::Short(parse_number(ty, text)?),
        "Integer" => Value::Integer(parse_number(ty, text)?),
        "Long" => Value::Long(parse_number(ty, text)?),
        "Float" => Value::Float(parse_number(ty, text)?),
        "Double" => Value::Double(parse_number(ty, text)?),
        "Boolean" => Value::Boolean(match text {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(BioError::xml(format!("{:?} is not a Boolean value", other)));
            }
        }),
        "String" => Value::Ascii(text.to_string()),
        "UtfString" => Value::Utf(text.to_string()),
        "Time" => Value::Time(time_from_millis(parse_number(ty, text)?)?),
        "BioEnum" => {
            let ordinal = ordinal
                .ok_or_else(|| BioError::xml("enum value is missing its ordinal attribute"))?;
            Value::Enum(BioEnum::new(ordinal, text))
        }
        "Opaque" => Value::Opaque(hex_decode(text)?),
        "Expression" => Value::Expression(text.to_string()),
        other => {
            return Err(BioError::xml(format!("{:?} is not a known tag type", other)));
        }
    })
}

fn parse_number<T: std::str::FromStr>(ty: &str, text: &str) -> Result<T, BioError> {
    text.trim()
        .parse()
        .map_err(|_| BioError::xml(format!("{:?} is not a valid {} value", text, ty)))
}

fn bio_header(e: &BytesStart) -> Result<BioHeader, BioError> {
    let mut header = BioHeader {
        dictionary: 0,
        code: 0,
        version: 0,
        name: None,
    };
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        let value = attr.unescape_value().map_err(xml_err)?;
        match attr.key.as_ref() {
            b"dictionary" => header.dictionary = parse_number("dictionary", &value)?,
            b"code" => header.code = parse_number("code", &value)?,
            b"version" => header.version = parse_number("version", &value)?,
            b"name" => header.name = Some(value.to_string()),
            _ => {}
        }
    }
    Ok(header)
}

fn tag_meta(e: &BytesStart) -> Result<TagMeta, BioError> {
    let mut name = None;
    let mut ty = None;
    let mut container = Container::Scalar;
    let mut ordinal = None;
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        let value = attr.unescape_value().map_err(xml_err)?;
        match attr.key.as_ref() {
            b"name" => name = Some(value.to_string()),
            b"type" => ty = Some(value.to_string()),
            b"container" => {
                container = match value.as_ref() {
                    "array" => Container::Array,
                    "list" => Container::List,
                    other => {
                        return Err(BioError::xml(format!(
                            "{:?} is not a known container kind",
                            other
                        )));
                    }
                }
            }
            b"ordinal" => ordinal = Some(parse_number("ordinal", &value)?),
            _ => {}
        }
    }
    Ok(TagMeta {
        name: name.ok_or_else(|| BioError::xml("tag element is missing its name attribute"))?,
        ty: ty.ok_or_else(|| BioError::xml("tag element is missing its type attribute"))?,
        container,
        ordinal,
    })
}

fn ordinal_attr(e: &BytesStart) -> Result<Option<i32>, BioError> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_ref() == b"ordinal" {
            let value = attr.unescape_value().map_err(xml_err)?;
            return Ok(Some(parse_number("ordinal", &value)?));
        }
    }
    Ok(None)
}

fn xml_err(e: impl std::fmt::Display) -> BioError {
    BioError::xml(e.to_string())
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

fn hex_decode(s: &str) -> Result<Vec<u8>, BioError> {
    fn nibble(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }
    let bytes = s.trim().as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(BioError::xml("opaque hex payload has odd length"));
    }
    bytes
        .chunks(2)
        .map(|pair| {
            let hi = nibble(pair[0]);
            let lo = nibble(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(BioError::xml("opaque payload is not valid hex")),
            }
        })
        .collect()
}
