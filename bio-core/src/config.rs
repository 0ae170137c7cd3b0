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

/// Per-codec-instance defaults for encode/decode behavior.
///
/// `validated` selects strict mode: unknown dictionaries and objects fail
/// instead of being silently omitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodecConfig {
    pub compressed: bool,
    pub encrypted: bool,
    pub lossless: bool,
    pub validated: bool,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    #[inline(always)]
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    #[inline(always)]
    pub fn is_lossless(&self) -> bool {
        self.lossless
    }

    #[inline(always)]
    pub fn is_validated(&self) -> bool {
        self.validated
    }
}
