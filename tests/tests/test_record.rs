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

use bio::{
    BinaryCodec, BioDictionary, BioObj, BioObject, BioTag, BioType, DictionaryRegistry, Payload,
    TagCodeSize, Value,
};

fn greeting_registry() -> Arc<DictionaryRegistry> {
    Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1).with_obj(
                BioObj::new(1, 10, 1, "greeting")
                    .with_tag(BioTag::new(1, "greeting", BioType::UtfString)),
            ),
        ),
    )
}

// Minimal record: one UtfString tag, exact wire bytes.
#[test]
fn test_minimal_record_wire_bytes() {
    let codec = BinaryCodec::with_registry(greeting_registry());
    let mut record = BioObject::new(1, 10, 1);
    record.put("greeting", Value::Utf("hi".to_string()));

    let bytes = codec.encode(&Payload::Object(record.clone())).unwrap().unwrap();
    assert_eq!(
        bytes,
        vec![
            0x00, // flag
            0x01, // dictionary
            0x00, 0x0A, // code
            0x00, 0x01, // version
            0x09, // type = UtfString
            0x00, // container = scalar
            0x00, 0x01, // tag code
            0x00, 0x02, // string length
            b'h', b'i',
        ]
    );

    let decoded = codec.decode(&bytes).unwrap().unwrap();
    assert_eq!(decoded, Payload::Object(record));
}

#[test]
fn test_decoded_header_fields_match_blob() {
    let codec = BinaryCodec::with_registry(greeting_registry());
    let mut record = BioObject::new(1, 10, 1);
    record.put("greeting", Value::Utf("hi".to_string()));

    let bytes = codec.encode(&Payload::Object(record)).unwrap().unwrap();
    let Payload::Object(decoded) = codec.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    assert_eq!(decoded.bio_dictionary(), 1);
    assert_eq!(decoded.bio_code(), 10);
    assert_eq!(decoded.bio_version(), 1);
    assert_eq!(decoded.bio_name(), Some("greeting"));
}

#[test]
fn test_all_scalar_types_round_trip() {
    let registry = Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1).with_obj(
                BioObj::new(1, 20, 1, "everything")
                    .with_tag(BioTag::new(1, "b", BioType::Byte))
                    .with_tag(BioTag::new(2, "s", BioType::Short))
                    .with_tag(BioTag::new(3, "i", BioType::Integer))
                    .with_tag(BioTag::new(4, "l", BioType::Long))
                    .with_tag(BioTag::new(5, "f", BioType::Float))
                    .with_tag(BioTag::new(6, "d", BioType::Double))
                    .with_tag(BioTag::new(7, "flag", BioType::Boolean))
                    .with_tag(BioTag::new(8, "ascii", BioType::String))
                    .with_tag(BioTag::new(9, "utf", BioType::UtfString))
                    .with_tag(BioTag::new(10, "when", BioType::Time))
                    .with_tag(BioTag::new(11, "blob", BioType::Opaque)),
            ),
        ),
    );
    let codec = BinaryCodec::with_registry(registry);

    let mut record = BioObject::new(1, 20, 1);
    record.put("b", Value::Byte(-3));
    record.put("s", Value::Short(-3000));
    record.put("i", Value::Integer(123_456));
    record.put("l", Value::Long(-9_876_543_210));
    record.put("f", Value::Float(1.5));
    record.put("d", Value::Double(-0.125));
    record.put("flag", Value::Boolean(true));
    record.put("ascii", Value::Ascii("plain".to_string()));
    record.put("utf", Value::Utf("ünïcode".to_string()));
    record.put(
        "when",
        Value::Time(chrono::DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()),
    );
    record.put("blob", Value::Opaque(vec![0xDE, 0xAD, 0xBE, 0xEF]));

    let bytes = codec.encode(&Payload::Object(record.clone())).unwrap().unwrap();
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::Object(record));
}

// Only encodable tags reach the wire.
#[test]
fn test_non_encodable_tag_is_skipped() {
    let registry = Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1).with_obj(
                BioObj::new(1, 30, 1, "partial")
                    .with_tag(BioTag::new(1, "kept", BioType::Integer))
                    .with_tag(BioTag::new(2, "dropped", BioType::Integer).non_encodable()),
            ),
        ),
    );
    let codec = BinaryCodec::with_registry(registry);

    let mut record = BioObject::new(1, 30, 1);
    record.put("kept", Value::Integer(1));
    record.put("dropped", Value::Integer(2));

    let bytes = codec.encode(&Payload::Object(record)).unwrap().unwrap();
    let Payload::Object(decoded) = codec.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    assert_eq!(decoded.get("kept"), Some(&Value::Integer(1)));
    assert_eq!(decoded.get("dropped"), None);
}

// Dynamic expression values never reach the wire.
#[test]
fn test_expression_value_is_skipped() {
    let codec = BinaryCodec::with_registry(greeting_registry());
    let mut record = BioObject::new(1, 10, 1);
    record.put("greeting", Value::Expression("now()".to_string()));

    let bytes = codec.encode(&Payload::Object(record)).unwrap().unwrap();
    let Payload::Object(decoded) = codec.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    assert!(decoded.is_empty());
}

// Keys with no tag in the schema are silently omitted.
#[test]
fn test_unknown_key_is_skipped() {
    let codec = BinaryCodec::with_registry(greeting_registry());
    let mut record = BioObject::new(1, 10, 1);
    record.put("greeting", Value::Utf("hi".to_string()));
    record.put("stray", Value::Integer(9));

    let bytes = codec.encode(&Payload::Object(record)).unwrap().unwrap();
    let Payload::Object(decoded) = codec.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get("greeting"), Some(&Value::Utf("hi".to_string())));
}

// A tag missing on the object falls back to the dictionary's super tags.
#[test]
fn test_super_tag_fallback() {
    let registry = Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1)
                .with_super_tag(BioTag::new(99, "trace_id", BioType::UtfString))
                .with_obj(
                    BioObj::new(1, 10, 1, "greeting")
                        .with_tag(BioTag::new(1, "greeting", BioType::UtfString)),
                ),
        ),
    );
    let codec = BinaryCodec::with_registry(registry);

    let mut record = BioObject::new(1, 10, 1);
    record.put("greeting", Value::Utf("hi".to_string()));
    record.put("trace_id", Value::Utf("abc-123".to_string()));

    let bytes = codec.encode(&Payload::Object(record.clone())).unwrap().unwrap();
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::Object(record));
}

// A tag declared scalar fed an array value is a fatal type mismatch.
#[test]
fn test_scalar_tag_with_array_value_fails() {
    let codec = BinaryCodec::with_registry(greeting_registry());
    let mut record = BioObject::new(1, 10, 1);
    record.put("greeting", Value::Array(vec![Value::Integer(1)]));
    assert!(codec.encode(&Payload::Object(record)).is_err());
}

// One-byte tag codes, configured per dictionary.
#[test]
fn test_u8_tag_codes_on_wire() {
    let registry = Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(2)
                .with_tag_code_size(TagCodeSize::U8)
                .with_obj(
                    BioObj::new(2, 10, 1, "compact")
                        .with_tag(BioTag::new(5, "n", BioType::Integer)),
                ),
        ),
    );
    let codec = BinaryCodec::with_registry(registry);

    let mut record = BioObject::new(2, 10, 1);
    record.put("n", Value::Integer(7));

    let bytes = codec.encode(&Payload::Object(record.clone())).unwrap().unwrap();
    assert_eq!(
        bytes,
        vec![
            0x00, // flag
            0x02, // dictionary
            0x00, 0x0A, // code
            0x00, 0x01, // version
            0x03, // type = Integer
            0x00, // container = scalar
            0x05, // tag code, one byte
            0x00, 0x00, 0x00, 0x07,
        ]
    );
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::Object(record));
}
