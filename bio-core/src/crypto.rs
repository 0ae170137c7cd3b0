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

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::Aes256Gcm;

use crate::error::BioError;

/// Byte length of the AES-GCM nonce prepended to every encrypted payload.
pub const NONCE_LEN: usize = 12;

/// Pluggable synchronous byte encrypter.
pub trait Encrypter: Send + Sync {
    fn encrypt(&self, bytes: &[u8]) -> Result<Vec<u8>, BioError>;

    fn decrypt(&self, bytes: &[u8]) -> Result<Vec<u8>, BioError>;
}

/// AES-256-GCM with a random nonce prepended to the ciphertext.
///
/// Payload layout: `[ nonce (12 B) | ciphertext | GCM tag (16 B) ]`.
pub struct AesGcmEncrypter {
    key: [u8; 32],
}

impl AesGcmEncrypter {
    pub fn new(key: [u8; 32]) -> Self {
        AesGcmEncrypter { key }
    }
}

impl Encrypter for AesGcmEncrypter {
    fn encrypt(&self, bytes: &[u8]) -> Result<Vec<u8>, BioError> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| BioError::crypto(e.to_string()))?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, bytes)
            .map_err(|_| BioError::crypto("aes-gcm encryption failed"))?;
        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(nonce.as_slice());
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(&self, bytes: &[u8]) -> Result<Vec<u8>, BioError> {
        if bytes.len() < NONCE_LEN {
            return Err(BioError::crypto(format!(
                "encrypted payload shorter than the {} byte nonce",
                NONCE_LEN
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| BioError::crypto(e.to_string()))?;
        let nonce = aes_gcm::Nonce::from_slice(&bytes[..NONCE_LEN]);
        cipher
            .decrypt(nonce, &bytes[NONCE_LEN..])
            .map_err(|_| BioError::crypto("aes-gcm decryption failed, wrong key or corrupt data"))
    }
}
