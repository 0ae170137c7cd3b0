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

use bio::{
    dictionary, BinaryCodec, BioDictionary, BioError, BioObj, BioObject, BioTag, BioType,
    DictionaryRegistry, Payload, Value,
};

fn sample_registry() -> DictionaryRegistry {
    DictionaryRegistry::new().with_dictionary(
        BioDictionary::new(1).with_obj(
            BioObj::new(1, 10, 1, "greeting")
                .with_tag(BioTag::new(1, "text", BioType::UtfString))
                .with_factory(|| {
                    let mut bio = BioObject::default();
                    bio.put("text", Value::Utf(String::new()));
                    bio
                }),
        ),
    )
}

// init publishes, codecs snapshot, teardown discards. Kept in one test so
// the global lifecycle is exercised sequentially.
#[test]
fn test_global_registry_lifecycle() {
    dictionary::init(sample_registry());

    let codec = BinaryCodec::new().unwrap();
    let mut record = BioObject::new(1, 10, 1);
    record.put("text", Value::Utf("hello".to_string()));
    let bytes = codec.encode(&Payload::Object(record.clone())).unwrap().unwrap();
    assert_eq!(codec.decode(&bytes).unwrap().unwrap(), Payload::Object(record));

    dictionary::teardown();
    assert!(matches!(
        BinaryCodec::new().err(),
        Some(BioError::Uninitialized)
    ));

    // a codec built before teardown keeps its snapshot
    let bytes = codec
        .encode(&Payload::Object({
            let mut bio = BioObject::new(1, 10, 1);
            bio.put("text", Value::Utf("still here".to_string()));
            bio
        }))
        .unwrap();
    assert!(bytes.is_some());
}

#[test]
fn test_factory_builds_stamped_records() {
    let registry = sample_registry();
    let dict = registry.dictionary(1).unwrap();

    let record = dict.new_record(10).unwrap();
    assert_eq!(record.bio_dictionary(), 1);
    assert_eq!(record.bio_code(), 10);
    assert_eq!(record.bio_version(), 1);
    assert_eq!(record.bio_name(), Some("greeting"));
    // the registered constructor pre-seeded a field
    assert_eq!(record.get("text"), Some(&Value::Utf(String::new())));

    assert!(dict.new_record(99).is_none());
    assert!(dict.new_record_by_name("greeting").is_some());
}

#[test]
fn test_factory_merge_from_source() {
    let registry = sample_registry();
    let dict = registry.dictionary(1).unwrap();

    let mut source = BioObject::properties();
    source.put("text", Value::Utf("copied".to_string()));
    source.put("extra", Value::Integer(1));

    let record = dict.new_record_from(10, &source).unwrap();
    assert_eq!(record.bio_code(), 10);
    assert_eq!(record.get("text"), Some(&Value::Utf("copied".to_string())));
    assert_eq!(record.get("extra"), Some(&Value::Integer(1)));
}

// The decoder instantiates through the factory, so registered constructors
// shape decoded records too.
#[test]
fn test_decode_uses_registered_factory() {
    let registry = std::sync::Arc::new(sample_registry());
    let codec = BinaryCodec::with_registry(registry);

    let empty = BioObject::new(1, 10, 1);
    let bytes = codec.encode(&Payload::Object(empty)).unwrap().unwrap();
    let Payload::Object(decoded) = codec.decode(&bytes).unwrap().unwrap() else {
        panic!("expected a single record");
    };
    // nothing on the wire, but the factory seeded the field
    assert_eq!(decoded.get("text"), Some(&Value::Utf(String::new())));
}
