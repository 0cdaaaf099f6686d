// Copyright (c) 2023 RBB S.r.l
// opensource@mintlayer.org
// SPDX-License-Identifier: MIT
// Licensed under the MIT License;
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://github.com/mintlayer/mintlayer-core/blob/master/LICENSE
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Authenticated symmetric encryption of key material.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use zeroize::Zeroize;

use crate::random::{CryptoRng, Rng};

const XCHACHA20_POLY1305_NONCE_LEN: usize = 24;

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum SymKeyError {
    #[error("Invalid raw key size")]
    InvalidKeySize,
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed; wrong key or corrupt data")]
    DecryptionFailed,
    #[error("Ciphertext too short to contain a nonce")]
    CiphertextTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetricKeyKind {
    XChacha20Poly1305,
}

pub const fn key_size(kind: SymmetricKeyKind) -> usize {
    match kind {
        SymmetricKeyKind::XChacha20Poly1305 => 32,
    }
}

/// A symmetric encryption key. The raw bytes are zeroized on drop and are
/// never exposed outside the encrypt/decrypt calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey {
    kind: SymmetricKeyKind,
    key: Vec<u8>,
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl SymmetricKey {
    pub fn new_from_rng(rng: &mut (impl Rng + CryptoRng), kind: SymmetricKeyKind) -> Self {
        let key = (0..key_size(kind)).map(|_| rng.gen::<u8>()).collect();
        Self { kind, key }
    }

    pub fn from_raw_key(kind: SymmetricKeyKind, raw: &[u8]) -> Result<Self, SymKeyError> {
        if raw.len() != key_size(kind) {
            return Err(SymKeyError::InvalidKeySize);
        }
        Ok(Self {
            kind,
            key: raw.to_vec(),
        })
    }

    /// Encrypt a message. The result carries the random nonce as a prefix.
    pub fn encrypt(
        &self,
        rng: &mut (impl Rng + CryptoRng),
        message: &[u8],
    ) -> Result<Vec<u8>, SymKeyError> {
        match self.kind {
            SymmetricKeyKind::XChacha20Poly1305 => {
                let cipher = XChaCha20Poly1305::new_from_slice(&self.key)
                    .map_err(|_| SymKeyError::InvalidKeySize)?;
                let mut nonce_bytes = [0_u8; XCHACHA20_POLY1305_NONCE_LEN];
                rng.fill_bytes(&mut nonce_bytes);
                let nonce = XNonce::from_slice(&nonce_bytes);
                let ciphertext =
                    cipher.encrypt(nonce, message).map_err(|_| SymKeyError::EncryptionFailed)?;

                let mut result = nonce_bytes.to_vec();
                result.extend_from_slice(&ciphertext);
                Ok(result)
            }
        }
    }

    /// Decrypt a message produced by [Self::encrypt]. Fails if the key is
    /// wrong or the data was tampered with; the two cases are intentionally
    /// indistinguishable at this level.
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, SymKeyError> {
        match self.kind {
            SymmetricKeyKind::XChacha20Poly1305 => {
                if blob.len() < XCHACHA20_POLY1305_NONCE_LEN {
                    return Err(SymKeyError::CiphertextTooShort);
                }
                let cipher = XChaCha20Poly1305::new_from_slice(&self.key)
                    .map_err(|_| SymKeyError::InvalidKeySize)?;
                let (nonce_bytes, ciphertext) = blob.split_at(XCHACHA20_POLY1305_NONCE_LEN);
                let nonce = XNonce::from_slice(nonce_bytes);
                cipher.decrypt(nonce, ciphertext).map_err(|_| SymKeyError::DecryptionFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::make_true_rng;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut rng = make_true_rng();
        let key = SymmetricKey::new_from_rng(&mut rng, SymmetricKeyKind::XChacha20Poly1305);
        let message = b"an extended private key".to_vec();
        let blob = key.encrypt(&mut rng, &message).unwrap();
        assert_ne!(blob, message);
        assert_eq!(key.decrypt(&blob).unwrap(), message);
    }

    #[test]
    fn decrypt_with_wrong_key_fails() {
        let mut rng = make_true_rng();
        let key = SymmetricKey::new_from_rng(&mut rng, SymmetricKeyKind::XChacha20Poly1305);
        let other = SymmetricKey::new_from_rng(&mut rng, SymmetricKeyKind::XChacha20Poly1305);
        let blob = key.encrypt(&mut rng, b"data").unwrap();
        assert_eq!(other.decrypt(&blob), Err(SymKeyError::DecryptionFailed));
    }

    #[test]
    fn decrypt_tampered_data_fails() {
        let mut rng = make_true_rng();
        let key = SymmetricKey::new_from_rng(&mut rng, SymmetricKeyKind::XChacha20Poly1305);
        let mut blob = key.encrypt(&mut rng, b"data").unwrap();
        let last = blob.last_mut().unwrap();
        *last = last.wrapping_add(1);
        assert_eq!(key.decrypt(&blob), Err(SymKeyError::DecryptionFailed));
    }
}
