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

use common::chain::ChainConfig;
use crypto::key::extended::ExtendedPrivateKey;
use crypto::key::hdkd::derivable::Derivable;
use crypto::key::hdkd::u31::U31;

use super::{make_account_path, KeyChainError, KeyChainResult, WalletScheme};

/// Operations on the root of a software wallet's derivation hierarchy.
/// The root key itself is only ever held in memory transiently; at rest it
/// lives encrypted in the root node's key row.
pub struct MasterKeyChain;

impl MasterKeyChain {
    /// Derive the root key of the given scheme from a mnemonic sentence.
    /// The intermediate seed material is zeroized.
    pub fn mnemonic_to_root_key(
        mnemonic_str: &str,
        passphrase: Option<&str>,
        scheme: WalletScheme,
    ) -> KeyChainResult<ExtendedPrivateKey> {
        let mnemonic = zeroize::Zeroizing::new(
            bip39::Mnemonic::parse(mnemonic_str)
                .map_err(|e| KeyChainError::Mnemonic(e.to_string()))?,
        );
        let seed = zeroize::Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or("")));
        let root_key = ExtendedPrivateKey::new_master(seed.as_ref(), scheme.key_kind())?;
        Ok(root_key)
    }

    /// Derive the account-level private key for `account_index` from the
    /// root key. The caller is responsible for not letting the result
    /// outlive the operation that needed it.
    pub fn derive_account_key(
        chain_config: &ChainConfig,
        root_key: &ExtendedPrivateKey,
        scheme: WalletScheme,
        account_index: U31,
    ) -> KeyChainResult<ExtendedPrivateKey> {
        if !root_key.get_derivation_path().is_root() {
            return Err(KeyChainError::KeyNotRoot);
        }
        let path = make_account_path(chain_config, scheme, account_index);
        Ok(root_key.clone().derive_path(path.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::chain::config::create_regtest;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn mnemonic_derivation_is_deterministic() {
        let a = MasterKeyChain::mnemonic_to_root_key(MNEMONIC, None, WalletScheme::Cip1852)
            .unwrap();
        let b = MasterKeyChain::mnemonic_to_root_key(MNEMONIC, None, WalletScheme::Cip1852)
            .unwrap();
        assert_eq!(a, b);

        let with_passphrase =
            MasterKeyChain::mnemonic_to_root_key(MNEMONIC, Some("extra"), WalletScheme::Cip1852)
                .unwrap();
        assert_ne!(a, with_passphrase);
    }

    #[test]
    fn invalid_mnemonic_is_rejected() {
        let result =
            MasterKeyChain::mnemonic_to_root_key("not a mnemonic", None, WalletScheme::Cip1852);
        assert!(matches!(result, Err(KeyChainError::Mnemonic(_))));
    }

    #[test]
    fn account_key_path() {
        let chain_config = create_regtest();
        let root =
            MasterKeyChain::mnemonic_to_root_key(MNEMONIC, None, WalletScheme::Cip1852).unwrap();
        let account = MasterKeyChain::derive_account_key(
            &chain_config,
            &root,
            WalletScheme::Cip1852,
            U31::ZERO,
        )
        .unwrap();
        assert_eq!(
            account.get_derivation_path().to_string(),
            "m/1852'/1815'/0'"
        );

        // A non-root key cannot serve as a hierarchy root
        assert_eq!(
            MasterKeyChain::derive_account_key(
                &chain_config,
                &account,
                WalletScheme::Cip1852,
                U31::ZERO
            )
            .unwrap_err(),
            KeyChainError::KeyNotRoot
        );
    }
}
