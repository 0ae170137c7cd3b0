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

use crate::error::BioError;

/// Pluggable synchronous byte compressor. The frame codec records the
/// original length next to the compressed payload, so decompression always
/// knows the expected output size.
pub trait Compressor: Send + Sync {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BioError>;

    fn decompress(&self, bytes: &[u8], original_len: usize) -> Result<Vec<u8>, BioError>;
}

/// LZ4 block compression, the registry default.
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, BioError> {
        Ok(lz4_flex::block::compress(bytes))
    }

    fn decompress(&self, bytes: &[u8], original_len: usize) -> Result<Vec<u8>, BioError> {
        lz4_flex::block::decompress(bytes, original_len)
            .map_err(|e| BioError::compression(e.to_string()))
    }
}
