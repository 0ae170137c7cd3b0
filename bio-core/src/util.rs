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

//! Big-endian conversion helpers. Every multibyte field of the wire format
//! is big-endian.

use byteorder::{BigEndian, ByteOrder};

pub fn short_to_bytes(value: u16) -> [u8; 2] {
    let mut buf = [0u8; 2];
    BigEndian::write_u16(&mut buf, value);
    buf
}

pub fn int_to_bytes(value: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    buf
}

pub fn long_to_bytes(value: u64) -> [u8; 8] {
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, value);
    buf
}

pub fn bytes_to_short(bytes: &[u8]) -> u16 {
    BigEndian::read_u16(bytes)
}

pub fn bytes_to_int(bytes: &[u8]) -> u32 {
    BigEndian::read_u32(bytes)
}

pub fn bytes_to_long(bytes: &[u8]) -> u64 {
    BigEndian::read_u64(bytes)
}
