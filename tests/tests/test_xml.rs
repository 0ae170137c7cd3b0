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

use std::sync::Arc;

use anyhow::Result;
use bio::{
    flags, from_xml, to_xml, BinaryCodec, BioDictionary, BioEnum, BioObj, BioObject, BioTag,
    BioType, DictionaryRegistry, Payload, Value,
};

fn registry() -> Arc<DictionaryRegistry> {
    Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1).with_obj(
                BioObj::new(1, 10, 1, "sample")
                    .with_tag(BioTag::new(1, "text", BioType::UtfString)),
            ),
        ),
    )
}

fn sample() -> BioObject {
    let mut child = BioObject::new(1, 10, 1);
    child.put("text", Value::Utf("inner".to_string()));

    let mut bio = BioObject::new(1, 10, 1);
    bio.put("text", Value::Utf("outer".to_string()));
    bio.put("n", Value::Integer(-7));
    bio.put("pi", Value::Double(3.25));
    bio.put("ok", Value::Boolean(true));
    bio.put(
        "when",
        Value::Time(chrono::DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()),
    );
    bio.put("status", Value::Enum(BioEnum::new(3, "ACTIVE")));
    bio.put("blob", Value::Opaque(vec![0x00, 0xFF, 0x10]));
    bio.put("child", Value::Object(child));
    bio.put(
        "xs",
        Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
    );
    bio.put(
        "names",
        Value::List(vec![Value::Utf("a".to_string()), Value::Utf("b".to_string())]),
    );
    bio
}

// The lane needs no dictionary: every typed value survives text and back.
#[test]
fn test_direct_xml_round_trip() -> Result<()> {
    let bio = sample();
    let xml = to_xml(&bio);
    let parsed = from_xml(xml.as_bytes())?;
    assert_eq!(parsed, bio);
    Ok(())
}

#[test]
fn test_lossless_frame_sets_xml_flag() {
    let codec = BinaryCodec::with_registry(registry()).lossless(true);
    let bio = sample();

    let bytes = codec.encode(&Payload::Object(bio.clone())).unwrap().unwrap();
    assert_ne!(bytes[0] & flags::XML, 0);
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::Object(bio));
}

// Array and list frames carry count-prefixed XML blobs.
#[test]
fn test_lossless_list_frame() {
    let codec = BinaryCodec::with_registry(registry()).lossless(true);
    let items = vec![sample(), sample()];

    let bytes = codec.encode(&Payload::List(items.clone())).unwrap().unwrap();
    assert_ne!(bytes[0] & flags::XML, 0);
    assert_ne!(bytes[0] & flags::LIST, 0);
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::List(items));
}

#[test]
fn test_markup_characters_are_escaped() -> Result<()> {
    let mut bio = BioObject::new(1, 10, 1);
    bio.put("text", Value::Utf("a <b> & \"c\" 'd'".to_string()));

    let xml = to_xml(&bio);
    assert!(!xml.contains("<b>"));
    let parsed = from_xml(xml.as_bytes())?;
    assert_eq!(parsed, bio);
    Ok(())
}

// XML keeps what the binary lane drops: dynamic expressions.
#[test]
fn test_expression_survives_the_lossless_lane() -> Result<()> {
    let mut bio = BioObject::new(1, 10, 1);
    bio.put("later", Value::Expression("now() + 5".to_string()));

    let parsed = from_xml(to_xml(&bio).as_bytes())?;
    assert_eq!(
        parsed.get("later"),
        Some(&Value::Expression("now() + 5".to_string()))
    );
    Ok(())
}

#[test]
fn test_properties_record_through_xml() -> Result<()> {
    let mut props = BioObject::properties();
    props.put("k", Value::Utf("v".to_string()));
    props.put("n", Value::Long(12));

    let parsed = from_xml(to_xml(&props).as_bytes())?;
    assert!(parsed.is_properties());
    assert_eq!(parsed, props);
    Ok(())
}

#[test]
fn test_lossless_and_compressed_compose() {
    let codec = BinaryCodec::with_registry(registry()).lossless(true).compressed(true);
    let mut bio = BioObject::new(1, 10, 1);
    bio.put("text", Value::Utf("repeat ".repeat(200)));

    let bytes = codec.encode(&Payload::Object(bio.clone())).unwrap().unwrap();
    assert_ne!(bytes[0] & flags::XML, 0);
    assert_ne!(bytes[0] & flags::COMPRESSED, 0);
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::Object(bio));
}

#[test]
fn test_malformed_xml_fails() {
    assert!(from_xml(b"<bio code=\"1\"><tag></bio>").is_err());
    assert!(from_xml(b"no xml here").is_err());
}
