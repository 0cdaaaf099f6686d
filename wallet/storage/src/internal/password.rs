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

use crypto::kdf::{hash_from_challenge, hash_password, Argon2Config, KdfChallenge, KdfConfig};
use crypto::random::make_true_rng;
use crypto::symkey::{key_size, SymmetricKey, SymmetricKeyKind};

const KDF_CONFIG: KdfConfig = KdfConfig::Argon2id {
    config: Argon2Config::new(
        16384,
        4,
        4,
        key_size(SymmetricKeyKind::XChacha20Poly1305) as u32,
    ),
    salt_length: 32,
};

/// Convert a password into a symmetric encryption key, generating a fresh
/// KDF challenge that allows re-deriving the same key later.
///
/// Returns an error for the empty password, which is never a valid wallet
/// password.
pub fn password_to_sym_key(password: &str) -> crate::Result<(SymmetricKey, KdfChallenge)> {
    if password.is_empty() {
        return Err(crate::Error::WalletEmptyPassword);
    }

    let mut rng = make_true_rng();
    let kdf_result = hash_password(&mut rng, KDF_CONFIG, password.as_bytes())
        .map_err(|_| crate::Error::WalletInvalidPassword)?;

    let sym_key = SymmetricKey::from_raw_key(
        SymmetricKeyKind::XChacha20Poly1305,
        kdf_result.hashed_password(),
    )
    .expect("must be correct size");

    let challenge = kdf_result.into_challenge();

    Ok((sym_key, challenge))
}

/// Re-derive the symmetric encryption key from a password and a stored KDF
/// challenge. Whether the password is actually the right one is only known
/// once the key is used to decrypt authenticated data.
pub fn challenge_to_sym_key(
    password: &str,
    kdf_challenge: KdfChallenge,
) -> crate::Result<SymmetricKey> {
    if password.is_empty() {
        return Err(crate::Error::WalletEmptyPassword);
    }

    let kdf_result = hash_from_challenge(kdf_challenge, password.as_bytes())
        .map_err(|_| crate::Error::WalletInvalidPassword)?;

    let sym_key = SymmetricKey::from_raw_key(
        SymmetricKeyKind::XChacha20Poly1305,
        kdf_result.hashed_password(),
    )
    .expect("must be correct size");

    Ok(sym_key)
}

#[cfg(test)]
mod test {
    use crypto::random::Rng;
    use rstest::rstest;
    use test_utils::random::{make_seedable_rng, Seed};

    use super::{challenge_to_sym_key, password_to_sym_key};

    #[rstest]
    #[case(Seed::from_entropy())]
    fn password_to_challenge_and_back(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);

        let password: String =
            (0..rng.gen_range(1..100)).map(|_| rng.gen::<char>()).collect();
        let (original_key, kdf_challenge) = password_to_sym_key(&password).unwrap();

        let reconstructed_key = challenge_to_sym_key(&password, kdf_challenge).unwrap();

        assert_eq!(original_key, reconstructed_key);
    }

    #[test]
    fn empty_password_error() {
        assert_eq!(
            password_to_sym_key("").unwrap_err(),
            crate::Error::WalletEmptyPassword
        );
    }
}
