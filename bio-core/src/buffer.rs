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

//! Typed read/write buffers for the binary wire format.
//!
//! Both buffers carry two per-record mode bits set by the record codec:
//! the length mode (`u16` prefixes by default, `u32` for large objects) and
//! the tag-code width (`u16` by default, `u8` for dictionaries configured
//! with one-byte tag codes). Nested records run on their own buffer, so a
//! caller's modes survive nested encode/decode untouched.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::dictionary::{BioTag, TagCodeSize};
use crate::error::BioError;

/// Growable output buffer with big-endian typed writers.
#[derive(Default)]
pub struct Writer {
    bf: Vec<u8>,
    length_as_int: bool,
    tag_code_size: TagCodeSize,
}

impl Writer {
    pub fn new() -> Self {
        Writer::default()
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn set_length_as_int(&mut self, length_as_int: bool) {
        self.length_as_int = length_as_int;
    }

    pub fn is_length_as_int(&self) -> bool {
        self.length_as_int
    }

    pub fn set_tag_code_size(&mut self, tag_code_size: TagCodeSize) {
        self.tag_code_size = tag_code_size;
    }

    pub fn write_bytes(&mut self, v: &[u8]) {
        self.bf.extend_from_slice(v);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bf.write_u8(value).unwrap();
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bf.write_i8(value).unwrap();
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bf.write_u16::<BigEndian>(value).unwrap();
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bf.write_i16::<BigEndian>(value).unwrap();
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bf.write_u32::<BigEndian>(value).unwrap();
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bf.write_i32::<BigEndian>(value).unwrap();
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bf.write_i64::<BigEndian>(value).unwrap();
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bf.write_f32::<BigEndian>(value).unwrap();
    }

    pub fn write_f64(&mut self, value: f64) {
        self.bf.write_f64::<BigEndian>(value).unwrap();
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Emits a length prefix in the current length mode.
    pub fn write_length(&mut self, length: usize) -> Result<(), BioError> {
        if self.length_as_int {
            self.write_u32(length as u32);
        } else {
            if length > u16::MAX as usize {
                return Err(BioError::invalid_data(format!(
                    "length {} does not fit a two-byte prefix, object must be marked large",
                    length
                )));
            }
            self.write_u16(length as u16);
        }
        Ok(())
    }

    /// Emits a tag code in the dictionary's configured width.
    pub fn write_tag(&mut self, tag: &BioTag) -> Result<(), BioError> {
        match self.tag_code_size {
            TagCodeSize::U8 => {
                if tag.code() > u8::MAX as u16 {
                    return Err(BioError::invalid_data(format!(
                        "tag code {} does not fit the dictionary's one-byte tag width",
                        tag.code()
                    )));
                }
                self.write_u8(tag.code() as u8);
            }
            TagCodeSize::U16 => self.write_u16(tag.code()),
        }
        Ok(())
    }

    /// `[length][bytes]` in the current length mode.
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), BioError> {
        self.write_length(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// Length-prefixed latin-1 string. Code points above U+00FF have no
    /// single-byte form and are rejected.
    pub fn write_ascii_value(&mut self, s: &str) -> Result<(), BioError> {
        let count = s.chars().count();
        self.write_length(count)?;
        for c in s.chars() {
            let b = c as u32;
            if b > 0xFF {
                return Err(BioError::encoding_error(format!(
                    "character {:?} is not encodable as a single-byte string",
                    c
                )));
            }
            self.write_u8(b as u8);
        }
        Ok(())
    }

    /// Length-prefixed UTF-8 string; the prefix counts bytes.
    pub fn write_utf_value(&mut self, s: &str) -> Result<(), BioError> {
        self.write_length(s.len())?;
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// Read cursor over an immutable byte slice.
pub struct Reader<'bf> {
    bf: &'bf [u8],
    cursor: usize,
    length_as_int: bool,
    tag_code_size: TagCodeSize,
}

impl<'bf> Reader<'bf> {
    pub fn new(bf: &'bf [u8]) -> Reader<'bf> {
        Reader {
            bf,
            cursor: 0,
            length_as_int: false,
            tag_code_size: TagCodeSize::default(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn set_length_as_int(&mut self, length_as_int: bool) {
        self.length_as_int = length_as_int;
    }

    pub fn is_length_as_int(&self) -> bool {
        self.length_as_int
    }

    pub fn set_tag_code_size(&mut self, tag_code_size: TagCodeSize) {
        self.tag_code_size = tag_code_size;
    }

    fn check(&self, additional: usize) -> Result<(), BioError> {
        if self.cursor + additional > self.bf.len() {
            return Err(BioError::buffer_out_of_bound(
                self.cursor,
                additional,
                self.bf.len(),
            ));
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'bf [u8], BioError> {
        self.check(len)?;
        let result = &self.bf[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(result)
    }

    pub fn read_u8(&mut self) -> Result<u8, BioError> {
        self.check(1)?;
        let result = self.bf[self.cursor];
        self.cursor += 1;
        Ok(result)
    }

    pub fn read_i8(&mut self) -> Result<i8, BioError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, BioError> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, BioError> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, BioError> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, BioError> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, BioError> {
        Ok(BigEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, BioError> {
        Ok(BigEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, BioError> {
        Ok(BigEndian::read_f64(self.read_bytes(8)?))
    }

    pub fn read_bool(&mut self) -> Result<bool, BioError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_length(&mut self) -> Result<usize, BioError> {
        if self.length_as_int {
            Ok(self.read_u32()? as usize)
        } else {
            Ok(self.read_u16()? as usize)
        }
    }

    pub fn read_tag_code(&mut self) -> Result<u16, BioError> {
        match self.tag_code_size {
            TagCodeSize::U8 => Ok(self.read_u8()? as u16),
            TagCodeSize::U16 => self.read_u16(),
        }
    }

    /// `[length][bytes]` in the current length mode.
    pub fn read_blob(&mut self) -> Result<&'bf [u8], BioError> {
        let length = self.read_length()?;
        self.read_bytes(length)
    }

    pub fn read_ascii_value(&mut self) -> Result<String, BioError> {
        let length = self.read_length()?;
        let slice = self.read_bytes(length)?;
        Ok(slice.iter().map(|&b| b as char).collect())
    }

    pub fn read_utf_value(&mut self) -> Result<String, BioError> {
        let length = self.read_length()?;
        let slice = self.read_bytes(length)?;
        String::from_utf8(slice.to_vec())
            .map_err(|e| BioError::encoding_error(format!("invalid utf-8 on the wire: {}", e)))
    }
}
