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
    BinaryCodec, BioDictionary, BioError, BioObj, BioObject, BioTag, BioType, DictionaryRegistry,
    Payload, Value,
};

fn registry() -> Arc<DictionaryRegistry> {
    Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1).with_obj(
                BioObj::new(1, 10, 1, "known")
                    .with_tag(BioTag::new(1, "n", BioType::Integer)),
            ),
        ),
    )
}

fn known(n: i32) -> BioObject {
    let mut bio = BioObject::new(1, 10, 1);
    bio.put("n", Value::Integer(n));
    bio
}

#[test]
fn test_strict_encode_unknown_dictionary_fails() {
    let codec = BinaryCodec::with_registry(registry()).validated(true);
    let stranger = BioObject::new(9, 10, 1);
    let err = codec.encode(&Payload::Object(stranger)).unwrap_err();
    assert!(matches!(err, BioError::UnknownDictionary(9)));
}

#[test]
fn test_lenient_encode_unknown_dictionary_yields_nothing() {
    let codec = BinaryCodec::with_registry(registry());
    let stranger = BioObject::new(9, 10, 1);
    assert!(codec.encode(&Payload::Object(stranger)).unwrap().is_none());
}

#[test]
fn test_strict_encode_unknown_object_fails() {
    let codec = BinaryCodec::with_registry(registry()).validated(true);
    let stranger = BioObject::new(1, 99, 1);
    let err = codec.encode(&Payload::Object(stranger)).unwrap_err();
    assert!(matches!(
        err,
        BioError::UnknownObject {
            dictionary: 1,
            code: 99
        }
    ));
}

// A lenient array frame drops the unknown element and keeps the count honest.
#[test]
fn test_lenient_array_omits_unknown_element() {
    let codec = BinaryCodec::with_registry(registry());
    let items = vec![known(1), BioObject::new(9, 10, 1), known(2)];

    let bytes = codec.encode(&Payload::Array(items)).unwrap().unwrap();
    assert_eq!(&bytes[1..3], &[0x00, 0x02]);
    assert_eq!(
        codec.decode(&bytes).unwrap().unwrap(),
        Payload::Array(vec![known(1), known(2)])
    );
}

#[test]
fn test_strict_array_with_unknown_element_fails() {
    let codec = BinaryCodec::with_registry(registry()).validated(true);
    let items = vec![known(1), BioObject::new(9, 10, 1)];
    assert!(codec.encode(&Payload::Array(items)).is_err());
}

// Decode side: the writer knows object 20, the reader does not.
fn foreign_blob() -> Vec<u8> {
    let writer_registry = Arc::new(
        DictionaryRegistry::new().with_dictionary(
            BioDictionary::new(1)
                .with_obj(
                    BioObj::new(1, 10, 1, "known")
                        .with_tag(BioTag::new(1, "n", BioType::Integer)),
                )
                .with_obj(
                    BioObj::new(1, 20, 1, "exotic")
                        .with_tag(BioTag::new(1, "n", BioType::Integer)),
                ),
        ),
    );
    let writer = BinaryCodec::with_registry(writer_registry);
    let mut exotic = BioObject::new(1, 20, 1);
    exotic.put("n", Value::Integer(5));
    writer.encode(&Payload::Object(exotic)).unwrap().unwrap()
}

#[test]
fn test_lenient_decode_unknown_object_yields_nothing() {
    let codec = BinaryCodec::with_registry(registry());
    assert!(codec.decode(&foreign_blob()).unwrap().is_none());
}

#[test]
fn test_strict_decode_unknown_object_fails() {
    let codec = BinaryCodec::with_registry(registry()).validated(true);
    let err = codec.decode(&foreign_blob()).unwrap_err();
    assert!(matches!(
        err,
        BioError::UnknownObject {
            dictionary: 1,
            code: 20
        }
    ));
}

#[test]
fn test_tag_errors_carry_context() {
    let codec = BinaryCodec::with_registry(registry()).validated(true);
    let mut bad = BioObject::new(1, 10, 1);
    bad.put("n", Value::Utf("not a number".to_string()));

    let err = codec.encode(&Payload::Object(bad)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("n"), "missing tag name: {}", message);
    assert!(message.contains("known"), "missing object name: {}", message);
}
