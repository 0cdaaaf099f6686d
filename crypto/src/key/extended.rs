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

//! Extended (chain-code carrying) keys of the two supported kinds.
//!
//! The two kinds are not interchangeable: a key is tagged with its kind and
//! all derivation is routed through the kind-specific scheme. Hardened steps
//! require the private key; soft steps are available on public keys too and
//! agree with the private-side derivation.

use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::{EdwardsPoint, Scalar as EdScalar};
use hmac::{Hmac, Mac};
use parity_scale_codec::{Decode, Encode};
use secp256k1::{PublicKey as SecpPublicKey, Scalar as SecpScalar, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::Zeroize;

use super::hdkd::child_number::ChildNumber;
use super::hdkd::derivable::{Derivable, DerivationError};
use super::hdkd::derivation_path::DerivationPath;

type HmacSha512 = Hmac<Sha512>;

const SECP256K1_MASTER_KEY: &[u8] = b"Bitcoin seed";
const ED25519_MASTER_KEY: &[u8] = b"ed25519 seed";

/// The supported key cryptography kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub enum ExtendedKeyKind {
    #[codec(index = 0)]
    Secp256k1Ecdsa,
    #[codec(index = 1)]
    Ed25519Bip32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
struct ChainCode([u8; 32]);

fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    let mut out = [0_u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

fn split_hmac(out: [u8; 64]) -> ([u8; 32], ChainCode) {
    let mut left = [0_u8; 32];
    let mut right = [0_u8; 32];
    left.copy_from_slice(&out[..32]);
    right.copy_from_slice(&out[32..]);
    (left, ChainCode(right))
}

/// An extended private key: kind tag, the path it was derived along, a chain
/// code and 32 bytes of kind-specific private key material.
#[derive(Clone, PartialEq, Eq, Encode, Decode)]
pub struct ExtendedPrivateKey {
    kind: ExtendedKeyKind,
    derivation_path: DerivationPath,
    chain_code: ChainCode,
    private_bytes: [u8; 32],
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.private_bytes.zeroize();
    }
}

// The private bytes must never end up in logs or error messages.
impl std::fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("kind", &self.kind)
            .field("derivation_path", &self.derivation_path)
            .finish_non_exhaustive()
    }
}

impl ExtendedPrivateKey {
    /// Build the master key of the given kind from seed entropy.
    pub fn new_master(seed: &[u8], kind: ExtendedKeyKind) -> Result<Self, DerivationError> {
        let domain = match kind {
            ExtendedKeyKind::Secp256k1Ecdsa => SECP256K1_MASTER_KEY,
            ExtendedKeyKind::Ed25519Bip32 => ED25519_MASTER_KEY,
        };
        let (left, chain_code) = split_hmac(hmac_sha512(domain, seed));

        let private_bytes = match kind {
            ExtendedKeyKind::Secp256k1Ecdsa => {
                // Reject the (astronomically unlikely) out-of-range material
                SecretKey::from_slice(&left)
                    .map_err(|_| DerivationError::InvalidKeyMaterial)?
                    .secret_bytes()
            }
            ExtendedKeyKind::Ed25519Bip32 => EdScalar::from_bytes_mod_order(left).to_bytes(),
        };

        Ok(ExtendedPrivateKey {
            kind,
            derivation_path: DerivationPath::empty(),
            chain_code,
            private_bytes,
        })
    }

    pub fn kind(&self) -> ExtendedKeyKind {
        self.kind
    }

    pub fn to_public_key(&self) -> ExtendedPublicKey {
        let public_bytes = match self.kind {
            ExtendedKeyKind::Secp256k1Ecdsa => {
                let secp = Secp256k1::new();
                let sk = SecretKey::from_slice(&self.private_bytes)
                    .expect("stored key material is valid");
                SecpPublicKey::from_secret_key(&secp, &sk).serialize().to_vec()
            }
            ExtendedKeyKind::Ed25519Bip32 => {
                let scalar = EdScalar::from_bytes_mod_order(self.private_bytes);
                EdwardsPoint::mul_base(&scalar).compress().to_bytes().to_vec()
            }
        };
        ExtendedPublicKey {
            kind: self.kind,
            derivation_path: self.derivation_path.clone(),
            chain_code: self.chain_code,
            public_bytes,
        }
    }
}

impl Derivable for ExtendedPrivateKey {
    fn derive_child(self, num: ChildNumber) -> Result<Self, DerivationError> {
        let mut data = Vec::with_capacity(37);
        if num.is_hardened() {
            data.push(0x00);
            data.extend_from_slice(&self.private_bytes);
        } else {
            data.extend_from_slice(&self.to_public_key().public_bytes);
        }
        data.extend_from_slice(&num.into_be_bytes());

        let (left, chain_code) = split_hmac(hmac_sha512(&self.chain_code.0, &data));

        let private_bytes = match self.kind {
            ExtendedKeyKind::Secp256k1Ecdsa => {
                let tweak = SecpScalar::from_be_bytes(left)
                    .map_err(|_| DerivationError::InvalidKeyMaterial)?;
                SecretKey::from_slice(&self.private_bytes)
                    .expect("stored key material is valid")
                    .add_tweak(&tweak)
                    .map_err(|_| DerivationError::InvalidKeyMaterial)?
                    .secret_bytes()
            }
            ExtendedKeyKind::Ed25519Bip32 => {
                let parent = EdScalar::from_bytes_mod_order(self.private_bytes);
                (parent + EdScalar::from_bytes_mod_order(left)).to_bytes()
            }
        };

        Ok(ExtendedPrivateKey {
            kind: self.kind,
            derivation_path: self.derivation_path.new_child(num),
            chain_code,
            private_bytes,
        })
    }

    fn get_derivation_path(&self) -> &DerivationPath {
        &self.derivation_path
    }
}

/// An extended public key. Supports soft derivation only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct ExtendedPublicKey {
    kind: ExtendedKeyKind,
    derivation_path: DerivationPath,
    chain_code: ChainCode,
    public_bytes: Vec<u8>,
}

impl ExtendedPublicKey {
    pub fn kind(&self) -> ExtendedKeyKind {
        self.kind
    }

    /// The serialized public key point (33 bytes compressed secp256k1 or
    /// 32 bytes compressed Edwards, depending on the kind).
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_bytes
    }
}

impl Derivable for ExtendedPublicKey {
    fn derive_child(self, num: ChildNumber) -> Result<Self, DerivationError> {
        if num.is_hardened() {
            return Err(DerivationError::CannotDeriveHardenedInPublic(num));
        }

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.public_bytes);
        data.extend_from_slice(&num.into_be_bytes());

        let (left, chain_code) = split_hmac(hmac_sha512(&self.chain_code.0, &data));

        let public_bytes = match self.kind {
            ExtendedKeyKind::Secp256k1Ecdsa => {
                let secp = Secp256k1::new();
                let tweak = SecpScalar::from_be_bytes(left)
                    .map_err(|_| DerivationError::InvalidKeyMaterial)?;
                SecpPublicKey::from_slice(&self.public_bytes)
                    .map_err(|_| DerivationError::InvalidPublicKeyEncoding)?
                    .add_exp_tweak(&secp, &tweak)
                    .map_err(|_| DerivationError::InvalidKeyMaterial)?
                    .serialize()
                    .to_vec()
            }
            ExtendedKeyKind::Ed25519Bip32 => {
                let point = CompressedEdwardsY::from_slice(&self.public_bytes)
                    .map_err(|_| DerivationError::InvalidPublicKeyEncoding)?
                    .decompress()
                    .ok_or(DerivationError::InvalidPublicKeyEncoding)?;
                let delta = EdwardsPoint::mul_base(&EdScalar::from_bytes_mod_order(left));
                (point + delta).compress().to_bytes().to_vec()
            }
        };

        Ok(ExtendedPublicKey {
            kind: self.kind,
            derivation_path: self.derivation_path.new_child(num),
            chain_code,
            public_bytes,
        })
    }

    fn get_derivation_path(&self) -> &DerivationPath {
        &self.derivation_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::hdkd::u31::U31;
    use rstest::rstest;
    use test_utils::random::{make_seedable_rng, Seed};

    use rand::Rng;

    fn random_seed(rng: &mut impl Rng) -> [u8; 64] {
        let mut seed = [0_u8; 64];
        rng.fill(&mut seed[..]);
        seed
    }

    #[rstest]
    #[case(ExtendedKeyKind::Secp256k1Ecdsa, Seed::from_entropy())]
    #[case(ExtendedKeyKind::Ed25519Bip32, Seed::from_entropy())]
    fn master_key_is_deterministic(#[case] kind: ExtendedKeyKind, #[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);
        let entropy = random_seed(&mut rng);
        let a = ExtendedPrivateKey::new_master(&entropy, kind).unwrap();
        let b = ExtendedPrivateKey::new_master(&entropy, kind).unwrap();
        assert_eq!(a, b);
        assert!(a.get_derivation_path().is_root());
    }

    #[rstest]
    #[case(ExtendedKeyKind::Secp256k1Ecdsa, Seed::from_entropy())]
    #[case(ExtendedKeyKind::Ed25519Bip32, Seed::from_entropy())]
    fn soft_derivation_agrees_between_private_and_public(
        #[case] kind: ExtendedKeyKind,
        #[case] seed: Seed,
    ) {
        let mut rng = make_seedable_rng(seed);
        let entropy = random_seed(&mut rng);
        let master = ExtendedPrivateKey::new_master(&entropy, kind).unwrap();

        let index = ChildNumber::from_normal(U31::from_u32(rng.gen_range(0..1000)).unwrap());
        let via_private = master.clone().derive_child(index).unwrap().to_public_key();
        let via_public = master.to_public_key().derive_child(index).unwrap();

        assert_eq!(via_private, via_public);
    }

    #[rstest]
    #[case(ExtendedKeyKind::Secp256k1Ecdsa, Seed::from_entropy())]
    #[case(ExtendedKeyKind::Ed25519Bip32, Seed::from_entropy())]
    fn hardened_derivation_from_public_fails(
        #[case] kind: ExtendedKeyKind,
        #[case] seed: Seed,
    ) {
        let mut rng = make_seedable_rng(seed);
        let entropy = random_seed(&mut rng);
        let master = ExtendedPrivateKey::new_master(&entropy, kind).unwrap();

        let index = ChildNumber::from_hardened(U31::ZERO);
        assert_eq!(
            master.to_public_key().derive_child(index).unwrap_err(),
            DerivationError::CannotDeriveHardenedInPublic(index),
        );
        // While the private key can take the same step
        assert!(master.derive_child(index).is_ok());
    }

    #[rstest]
    #[case(Seed::from_entropy())]
    fn derivation_path_is_tracked(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);
        let entropy = random_seed(&mut rng);
        let master =
            ExtendedPrivateKey::new_master(&entropy, ExtendedKeyKind::Ed25519Bip32).unwrap();

        let path = vec![
            ChildNumber::from_hardened(U31::from_u32(1852).unwrap()),
            ChildNumber::from_hardened(U31::from_u32(1815).unwrap()),
            ChildNumber::from_hardened(U31::ZERO),
        ];
        let derived = master.derive_path(&path).unwrap();
        assert_eq!(derived.get_derivation_path().as_slice(), path.as_slice());
        assert_eq!(derived.get_derivation_path().to_string(), "m/1852'/1815'/0'");
    }
}
