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

//! Password-based key derivation.
//!
//! A password is stretched into key material with argon2id. The parameters
//! and the salt that produced a hash are kept as a [KdfChallenge], which is
//! stored next to the data encrypted with the derived key so that the same
//! key can be re-derived from the password later.

use argon2::{Algorithm, Argon2, Params, Version};
use parity_scale_codec::{Decode, Encode};

use crate::random::{CryptoRng, Rng};

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum KdfError {
    #[error("Argon2 hashing error: {0}")]
    Argon2HashingFailed(String),
    #[error("Invalid argon2 parameters: {0}")]
    InvalidArgon2Params(String),
}

/// Argon2id cost parameters together with the produced hash length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Argon2Config {
    m_cost_memory_kib: u32,
    t_cost_iterations: u32,
    p_cost_parallelism: u32,
    hash_length: u32,
}

impl Argon2Config {
    pub const fn new(
        m_cost_memory_kib: u32,
        t_cost_iterations: u32,
        p_cost_parallelism: u32,
        hash_length: u32,
    ) -> Self {
        Self {
            m_cost_memory_kib,
            t_cost_iterations,
            p_cost_parallelism,
            hash_length,
        }
    }
}

/// Key derivation function configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdfConfig {
    Argon2id {
        config: Argon2Config,
        salt_length: usize,
    },
}

/// The non-secret values needed to re-derive a key from a password.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum KdfChallenge {
    #[codec(index = 0)]
    Argon2id {
        config: Argon2Config,
        salt: Vec<u8>,
    },
}

/// The result of hashing a password. Holds the derived key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdfResult {
    Argon2id {
        config: Argon2Config,
        salt: Vec<u8>,
        hashed_password: Vec<u8>,
    },
}

impl KdfResult {
    pub fn into_challenge(self) -> KdfChallenge {
        match self {
            KdfResult::Argon2id {
                config,
                salt,
                hashed_password: _,
            } => KdfChallenge::Argon2id { config, salt },
        }
    }

    pub fn hashed_password(&self) -> &[u8] {
        match self {
            KdfResult::Argon2id {
                hashed_password, ..
            } => hashed_password,
        }
    }
}

fn argon2id_hash(
    config: &Argon2Config,
    salt: &[u8],
    password: &[u8],
) -> Result<Vec<u8>, KdfError> {
    let params = Params::new(
        config.m_cost_memory_kib,
        config.t_cost_iterations,
        config.p_cost_parallelism,
        Some(config.hash_length as usize),
    )
    .map_err(|e| KdfError::InvalidArgon2Params(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut hash = vec![0_u8; config.hash_length as usize];
    argon2
        .hash_password_into(password, salt, &mut hash)
        .map_err(|e| KdfError::Argon2HashingFailed(e.to_string()))?;
    Ok(hash)
}

/// Hash a password with a freshly generated salt.
pub fn hash_password(
    rng: &mut (impl Rng + CryptoRng),
    config: KdfConfig,
    password: &[u8],
) -> Result<KdfResult, KdfError> {
    match config {
        KdfConfig::Argon2id {
            config,
            salt_length,
        } => {
            let salt: Vec<u8> = (0..salt_length).map(|_| rng.gen::<u8>()).collect();
            let hashed_password = argon2id_hash(&config, &salt, password)?;
            Ok(KdfResult::Argon2id {
                config,
                salt,
                hashed_password,
            })
        }
    }
}

/// Re-derive key material from a password and a previously stored challenge.
pub fn hash_from_challenge(
    challenge: KdfChallenge,
    password: &[u8],
) -> Result<KdfResult, KdfError> {
    match challenge {
        KdfChallenge::Argon2id { config, salt } => {
            let hashed_password = argon2id_hash(&config, &salt, password)?;
            Ok(KdfResult::Argon2id {
                config,
                salt,
                hashed_password,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::make_true_rng;

    const TEST_CONFIG: KdfConfig = KdfConfig::Argon2id {
        config: Argon2Config::new(128, 1, 1, 32),
        salt_length: 16,
    };

    #[test]
    fn hash_and_rehash_from_challenge_agree() {
        let mut rng = make_true_rng();
        let result = hash_password(&mut rng, TEST_CONFIG, b"correct horse").unwrap();
        let rehash = hash_from_challenge(result.clone().into_challenge(), b"correct horse").unwrap();
        assert_eq!(result, rehash);
    }

    #[test]
    fn different_password_different_hash() {
        let mut rng = make_true_rng();
        let result = hash_password(&mut rng, TEST_CONFIG, b"password one").unwrap();
        let other = hash_from_challenge(result.clone().into_challenge(), b"password two").unwrap();
        assert_ne!(result.hashed_password(), other.hashed_password());
    }
}
