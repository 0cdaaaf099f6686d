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

//! # HD key chains
//!
//! The persisted derivation tree and the in-memory chains that constantly
//! derive addresses for it. The derivation scheme is:
//!
//! m/<purpose>'/1815'/<account_number>'/<chain>/<key_index>
//!
//! Where `purpose` is 44' for the legacy scheme and 1852' for the current
//!       one (the two use different key cryptography and address shapes),
//!       `account_number` is the index of a public deriver,
//!       `chain` is 0 for externally visible addresses, 1 for change, and
//!       2 for the staking key of the account,
//!       `key_index` starts from 0 and is incremented for each new address.
//!
//! Every chain keeps `lookahead_size` consecutive unused addresses derived
//! past the last used one, so remote scanners can always find the wallet's
//! activity (the gap limit).

mod account_key_chain;
mod leaf_key_chain;
mod master_key_chain;
mod with_purpose;

use std::fmt;

pub use account_key_chain::AccountKeyChain;
pub use leaf_key_chain::LeafKeyChain;
pub use master_key_chain::MasterKeyChain;
pub use with_purpose::WithPurpose;

use common::address::{Address, Credential};
use common::chain::config::{BIP44_PURPOSE, CIP1852_PURPOSE};
use common::chain::ChainConfig;
use crypto::key::extended::{ExtendedKeyKind, ExtendedPublicKey};
use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::derivable::DerivationError;
use crypto::key::hdkd::derivation_path::DerivationPath;
use crypto::key::hdkd::u31::U31;
use parity_scale_codec::Encode;
use wallet_storage::WalletStorageWriteLocked;
use wallet_types::{
    KeyDerivationNode, KeyMaterial, KeyRow, KeyRowId, NextRowIds, NodeChildId, NodeId,
};

/// Default number of unused addresses that need to be kept derived after
/// the last used address.
pub const LOOKAHEAD_SIZE: u32 = 20;

/// The chain index holding the staking key of an account.
pub const STAKING_CHAIN_INDEX: ChildNumber = ChildNumber::from_normal(U31::TWO);

/// KeyChain errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeyChainError {
    #[error("Wallet database error: {0}")]
    DatabaseError(#[from] wallet_storage::Error),
    #[error("Missing database property: {0}")]
    MissingDatabaseProperty(&'static str),
    #[error("Key derivation error: {0}")]
    Derivation(#[from] DerivationError),
    #[error("Mnemonic error: {0}")]
    Mnemonic(String),
    #[error("Could not load key chain")]
    CouldNotLoadKeyChain,
    #[error("Cannot issue more keys, lookahead exceeded")]
    LookAheadExceeded,
    #[error("The provided key is not a root in a hierarchy")]
    KeyNotRoot,
    #[error("Key kind does not match the wallet scheme")]
    KeyKindMismatch,
}

/// Result type used for the key chain
pub type KeyChainResult<T> = Result<T, KeyChainError>;

/// The two supported wallet derivation schemes. Mutually exclusive per
/// wallet; the scheme decides the purpose path, the key cryptography and
/// the shape of generated addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletScheme {
    Bip44,
    Cip1852,
}

impl WalletScheme {
    pub fn purpose_index(self) -> ChildNumber {
        match self {
            WalletScheme::Bip44 => BIP44_PURPOSE,
            WalletScheme::Cip1852 => CIP1852_PURPOSE,
        }
    }

    pub fn key_kind(self) -> ExtendedKeyKind {
        match self {
            WalletScheme::Bip44 => ExtendedKeyKind::Secp256k1Ecdsa,
            WalletScheme::Cip1852 => ExtendedKeyKind::Ed25519Bip32,
        }
    }
}

impl fmt::Display for WalletScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletScheme::Bip44 => f.write_str("bip44"),
            WalletScheme::Cip1852 => f.write_str("cip1852"),
        }
    }
}

/// The shape of addresses a leaf chain generates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressStyle {
    /// Payment credential paired with the account's staking credential.
    Base { staking: Credential },
    /// Payment credential only.
    Enterprise,
}

impl AddressStyle {
    pub fn make_address(&self, payment: Credential) -> Address {
        match self {
            AddressStyle::Base { staking } => Address::Base {
                payment,
                staking: *staking,
            },
            AddressStyle::Enterprise => Address::Enterprise { payment },
        }
    }
}

/// Create a deterministic path for an account identified by `account_index`.
pub fn make_account_path(
    chain_config: &ChainConfig,
    scheme: WalletScheme,
    account_index: U31,
) -> DerivationPath {
    // The path is m/<purpose>'/<coin_type>'/<account_index>'
    let path = vec![
        scheme.purpose_index(),
        chain_config.coin_type(),
        ChildNumber::from_hardened(account_index),
    ];
    debug_assert!(path.iter().all(|num| num.is_hardened()));
    path.into()
}

/// The payment or staking credential of an extended public key.
pub fn credential_from_key(key: &ExtendedPublicKey) -> Credential {
    Credential::from_public_key_bytes(key.public_key_bytes())
}

/// Persist a tree root node, returning its id.
pub(crate) fn add_root_node(
    db_tx: &mut impl WalletStorageWriteLocked,
    ids: &mut NextRowIds,
    private_key_id: Option<KeyRowId>,
    public_key_id: Option<KeyRowId>,
) -> KeyChainResult<NodeId> {
    let node_id = ids.next_node_id();
    let node = KeyDerivationNode::root(private_key_id, public_key_id);
    db_tx.set_derivation_node(&node_id, &node)?;
    Ok(node_id)
}

/// Persist a child node plus the parent→child edge, returning the child id.
pub(crate) fn add_child_node(
    db_tx: &mut impl WalletStorageWriteLocked,
    ids: &mut NextRowIds,
    parent: NodeId,
    index: ChildNumber,
    private_key_id: Option<KeyRowId>,
    public_key_id: Option<KeyRowId>,
) -> KeyChainResult<NodeId> {
    let node_id = ids.next_node_id();
    let node = KeyDerivationNode::child(parent, index, private_key_id, public_key_id);
    db_tx.set_derivation_node(&node_id, &node)?;
    db_tx.set_node_child(&NodeChildId::new(parent, index), &node_id)?;
    Ok(node_id)
}

/// Persist a public key as a plain key row, returning its id.
pub(crate) fn add_public_key_row(
    db_tx: &mut impl WalletStorageWriteLocked,
    ids: &mut NextRowIds,
    key: &ExtendedPublicKey,
) -> KeyChainResult<KeyRowId> {
    let key_id = ids.next_key_id();
    let row = KeyRow::new(key.kind(), KeyMaterial::Plain(key.encode()));
    db_tx.set_key_row(&key_id, &row)?;
    Ok(key_id)
}
