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

//! Blobs written by a newer schema (extra tag codes) must decode under an
//! older schema without error, dropping the extra values and keeping the
//! stream synchronized through every (type, container) shape.

use std::sync::Arc;

use bio::{
    BinaryCodec, BioDictionary, BioObj, BioObject, BioTag, BioType, DictionaryRegistry, Payload,
    Value,
};

/// The newer peer: every tag registered.
fn writer_registry() -> Arc<DictionaryRegistry> {
    Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1)
                .with_obj(
                    BioObj::new(1, 90, 2, "event")
                        .with_tag(BioTag::new(1, "id", BioType::Integer))
                        .with_tag(BioTag::new(2, "note", BioType::UtfString))
                        .with_tag(BioTag::new(3, "xs", BioType::Long).array())
                        .with_tag(BioTag::new(4, "names", BioType::UtfString).list())
                        .with_tag(BioTag::new(5, "child", BioType::BioObject).with_obj(91))
                        .with_tag(BioTag::new(6, "children", BioType::BioObject).list().with_obj(91))
                        .with_tag(BioTag::new(7, "seen", BioType::Boolean)),
                )
                .with_obj(
                    BioObj::new(1, 91, 1, "detail")
                        .with_tag(BioTag::new(1, "text", BioType::UtfString)),
                ),
        ),
    )
}

/// The older peer: only `id` and `seen` exist.
fn reader_registry() -> Arc<DictionaryRegistry> {
    Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1).with_obj(
                BioObj::new(1, 90, 1, "event")
                    .with_tag(BioTag::new(1, "id", BioType::Integer))
                    .with_tag(BioTag::new(7, "seen", BioType::Boolean)),
            ),
        ),
    )
}

fn full_event() -> BioObject {
    let mut child = BioObject::new(1, 91, 1);
    child.put("text", Value::Utf("nested".to_string()));

    let mut event = BioObject::new(1, 90, 2);
    event.put("id", Value::Integer(42));
    event.put("note", Value::Utf("dropped on old peers".to_string()));
    event.put(
        "xs",
        Value::Array(vec![Value::Long(1), Value::Long(2), Value::Long(3)]),
    );
    event.put(
        "names",
        Value::List(vec![Value::Utf("a".to_string()), Value::Utf("b".to_string())]),
    );
    event.put("child", Value::Object(child.clone()));
    event.put("children", Value::List(vec![Value::Object(child)]));
    event.put("seen", Value::Boolean(true));
    event
}

#[test]
fn test_newer_blob_decodes_under_older_schema() {
    let writer = BinaryCodec::with_registry(writer_registry());
    let reader = BinaryCodec::with_registry(reader_registry());

    let bytes = writer.encode(&Payload::Object(full_event())).unwrap().unwrap();
    let Payload::Object(decoded) = reader.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };

    // known tags survive, and `seen` comes after every skipped shape —
    // scalar string, primitive array, string list, nested blob, nested list
    assert_eq!(decoded.get("id"), Some(&Value::Integer(42)));
    assert_eq!(decoded.get("seen"), Some(&Value::Boolean(true)));
    assert_eq!(decoded.len(), 2);
}

// Skipping is exercised even in strict mode: unknown tags are never fatal.
#[test]
fn test_unknown_tags_are_not_fatal_in_strict_mode() {
    let writer = BinaryCodec::with_registry(writer_registry());
    let reader = BinaryCodec::with_registry(reader_registry()).validated(true);

    let bytes = writer.encode(&Payload::Object(full_event())).unwrap().unwrap();
    let Payload::Object(decoded) = reader.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    assert_eq!(decoded.get("id"), Some(&Value::Integer(42)));
}

// A nested record under an unknown tag must be consumed without being
// parsed: the reader does not know object 91, yet decode succeeds.
#[test]
fn test_unknown_nested_tag_skips_without_parsing() {
    let writer = BinaryCodec::with_registry(writer_registry());
    let reader = BinaryCodec::with_registry(reader_registry()).validated(true);

    let mut child = BioObject::new(1, 91, 1);
    child.put("text", Value::Utf("invisible".to_string()));
    let mut event = BioObject::new(1, 90, 2);
    event.put("child", Value::Object(child));
    event.put("seen", Value::Boolean(false));

    let bytes = writer.encode(&Payload::Object(event)).unwrap().unwrap();
    let Payload::Object(decoded) = reader.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    assert_eq!(decoded.get("seen"), Some(&Value::Boolean(false)));
    assert_eq!(decoded.len(), 1);
}
