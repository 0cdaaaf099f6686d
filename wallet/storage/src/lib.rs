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

//! Application-level interface for the persistent wallet storage.
//!
//! Access is mediated by transaction tokens. [StoreTxRo] and [StoreTxRw]
//! grant row access without any key material ("locked"); [StoreTxRwUnlocked]
//! additionally carries the symmetric key derived from the wallet password
//! and is the only way to reach decrypted private keys. Functions state the
//! access they need by taking `impl WalletStorage…` bounds, so a call that
//! would need more access than its caller holds does not compile. Decrypted
//! key material lives at most as long as the unlocked token that produced it.

mod internal;
pub mod schema;

use std::collections::BTreeMap;

use common::primitives::BlockHeight;
use crypto::key::extended::ExtendedPrivateKey;
use crypto::key::hdkd::u31::U31;
use wallet_types::{
    AccountingInputRow, AccountingOutputRow, AddressDigest, AddressRow, AddressRowId, BlockHash,
    BlockRow, BlockRowId, Certificate, ChainAddressId, DeriverId, DeriverPurposeId,
    KeyDerivationNode, KeyRow, KeyRowId, KeychainUsageState, LastSyncInfo, NextRowIds,
    NodeChildId, NodeId, OutPoint, PublicDeriverInfo, TokenId, TokenInfo, TxDigest, TxRow,
    TxRowId, UtxoInputRow, UtxoOutputRow, WalletId, WalletInfo, WalletWrapper,
};

pub use internal::password::{challenge_to_sym_key, password_to_sym_key};
pub use internal::{encrypt_key_material, Store, StoreTxRo, StoreTxRw, StoreTxRwUnlocked};

/// The storage version produced by the current schema.
pub const CURRENT_STORAGE_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::Error),
    #[error("The wallet password cannot be empty")]
    WalletEmptyPassword,
    #[error("Invalid wallet password")]
    WalletInvalidPassword,
    #[error("Wallet {0} not found")]
    WalletNotFound(WalletId),
    #[error("Wallet {0} has no encrypted root key")]
    MissingRootKey(WalletId),
    #[error("Stored key material is corrupt")]
    CorruptKeyMaterial,
    #[error("Key encryption failed")]
    KeyEncryptionFailed,
}

/// Possibly failing result of a wallet storage query
pub type Result<T> = std::result::Result<T, Error>;

/// Queries on persistent wallet data available without key material.
pub trait WalletStorageReadLocked {
    fn get_storage_version(&self) -> Result<u32>;
    fn get_next_row_ids(&self) -> Result<NextRowIds>;

    fn get_wallet(&self, id: &WalletId) -> Result<Option<WalletInfo>>;
    fn get_wallets(&self) -> Result<BTreeMap<WalletId, WalletInfo>>;
    fn get_wallet_wrapper(&self, id: &WalletId) -> Result<Option<WalletWrapper>>;

    fn get_key_row(&self, id: &KeyRowId) -> Result<Option<KeyRow>>;
    fn get_derivation_node(&self, id: &NodeId) -> Result<Option<KeyDerivationNode>>;
    fn get_node_children(&self, parent: &NodeId) -> Result<BTreeMap<NodeChildId, NodeId>>;

    fn get_public_deriver(&self, id: &DeriverId) -> Result<Option<PublicDeriverInfo>>;
    fn get_public_derivers(&self) -> Result<BTreeMap<DeriverId, PublicDeriverInfo>>;
    fn get_keychain_usage_state(
        &self,
        id: &DeriverPurposeId,
    ) -> Result<Option<KeychainUsageState>>;
    fn get_chain_addresses(&self, id: &DeriverPurposeId) -> Result<BTreeMap<U31, AddressRowId>>;

    fn get_address(&self, id: &AddressRowId) -> Result<Option<AddressRow>>;
    fn get_address_id_by_digest(&self, digest: &AddressDigest) -> Result<Option<AddressRowId>>;
    fn get_address_mapping(
        &self,
        wallet_id: &WalletId,
        address: &AddressRowId,
    ) -> Result<Option<NodeId>>;
    fn get_address_mappings(
        &self,
        wallet_id: &WalletId,
    ) -> Result<BTreeMap<AddressRowId, NodeId>>;

    fn get_transaction(&self, wallet_id: &WalletId, id: &TxRowId) -> Result<Option<TxRow>>;
    fn get_transactions(&self, wallet_id: &WalletId) -> Result<BTreeMap<TxRowId, TxRow>>;
    fn get_tx_id_by_digest(
        &self,
        wallet_id: &WalletId,
        digest: &TxDigest,
    ) -> Result<Option<TxRowId>>;

    fn get_block(&self, id: &BlockRowId) -> Result<Option<BlockRow>>;
    fn get_blocks(&self) -> Result<BTreeMap<BlockRowId, BlockRow>>;
    fn get_block_id_by_hash(&self, hash: &BlockHash) -> Result<Option<BlockRowId>>;

    fn get_utxo_output(&self, outpoint: &OutPoint) -> Result<Option<UtxoOutputRow>>;
    fn get_utxo_outputs(&self, tx: &TxRowId) -> Result<BTreeMap<OutPoint, UtxoOutputRow>>;
    fn get_utxo_inputs(&self, tx: &TxRowId) -> Result<BTreeMap<OutPoint, UtxoInputRow>>;
    fn get_accounting_output(&self, outpoint: &OutPoint) -> Result<Option<AccountingOutputRow>>;
    fn get_accounting_outputs(
        &self,
        tx: &TxRowId,
    ) -> Result<BTreeMap<OutPoint, AccountingOutputRow>>;
    fn get_accounting_inputs(
        &self,
        tx: &TxRowId,
    ) -> Result<BTreeMap<OutPoint, AccountingInputRow>>;
    fn get_certificates(&self, tx: &TxRowId) -> Result<BTreeMap<OutPoint, Certificate>>;

    fn get_token(&self, id: &TokenId) -> Result<Option<TokenInfo>>;
    fn get_last_sync_info(&self, id: &DeriverId) -> Result<Option<LastSyncInfo>>;

    /// The height of the block a transaction is anchored in, if any.
    fn get_transaction_height(
        &self,
        wallet_id: &WalletId,
        tx: &TxRow,
    ) -> Result<Option<BlockHeight>> {
        let _ = wallet_id;
        match tx.block_id() {
            Some(block_id) => Ok(self.get_block(&block_id)?.map(|block| block.height())),
            None => Ok(None),
        }
    }
}

/// Modifying operations on persistent wallet data, no key material needed.
pub trait WalletStorageWriteLocked: WalletStorageReadLocked {
    fn set_storage_version(&mut self, version: u32) -> Result<()>;
    fn set_next_row_ids(&mut self, ids: &NextRowIds) -> Result<()>;

    fn set_wallet(&mut self, id: &WalletId, wallet: &WalletInfo) -> Result<()>;
    fn del_wallet(&mut self, id: &WalletId) -> Result<()>;
    fn set_wallet_wrapper(&mut self, id: &WalletId, wrapper: &WalletWrapper) -> Result<()>;
    fn del_wallet_wrapper(&mut self, id: &WalletId) -> Result<()>;

    fn set_key_row(&mut self, id: &KeyRowId, key: &KeyRow) -> Result<()>;
    fn del_key_row(&mut self, id: &KeyRowId) -> Result<()>;
    fn set_derivation_node(&mut self, id: &NodeId, node: &KeyDerivationNode) -> Result<()>;
    fn del_derivation_node(&mut self, id: &NodeId) -> Result<()>;
    fn set_node_child(&mut self, edge: &NodeChildId, child: &NodeId) -> Result<()>;
    fn del_node_child(&mut self, edge: &NodeChildId) -> Result<()>;

    fn set_public_deriver(&mut self, id: &DeriverId, info: &PublicDeriverInfo) -> Result<()>;
    fn del_public_deriver(&mut self, id: &DeriverId) -> Result<()>;
    fn set_keychain_usage_state(
        &mut self,
        id: &DeriverPurposeId,
        state: &KeychainUsageState,
    ) -> Result<()>;
    fn del_keychain_usage_state(&mut self, id: &DeriverPurposeId) -> Result<()>;
    fn set_chain_address(&mut self, id: &ChainAddressId, address: &AddressRowId) -> Result<()>;
    fn del_chain_address(&mut self, id: &ChainAddressId) -> Result<()>;

    fn set_address(&mut self, id: &AddressRowId, address: &AddressRow) -> Result<()>;
    fn set_address_id_by_digest(
        &mut self,
        digest: &AddressDigest,
        id: &AddressRowId,
    ) -> Result<()>;
    fn set_address_mapping(
        &mut self,
        wallet_id: &WalletId,
        address: &AddressRowId,
        node: &NodeId,
    ) -> Result<()>;
    fn del_address_mapping(&mut self, wallet_id: &WalletId, address: &AddressRowId) -> Result<()>;

    fn set_transaction(&mut self, wallet_id: &WalletId, id: &TxRowId, tx: &TxRow) -> Result<()>;
    fn del_transaction(&mut self, wallet_id: &WalletId, id: &TxRowId) -> Result<()>;
    fn set_tx_id_by_digest(
        &mut self,
        wallet_id: &WalletId,
        digest: &TxDigest,
        id: &TxRowId,
    ) -> Result<()>;
    fn del_tx_id_by_digest(&mut self, wallet_id: &WalletId, digest: &TxDigest) -> Result<()>;

    fn set_block(&mut self, id: &BlockRowId, block: &BlockRow) -> Result<()>;
    fn del_block(&mut self, id: &BlockRowId) -> Result<()>;
    fn set_block_id_by_hash(&mut self, hash: &BlockHash, id: &BlockRowId) -> Result<()>;
    fn del_block_id_by_hash(&mut self, hash: &BlockHash) -> Result<()>;

    fn set_utxo_output(&mut self, outpoint: &OutPoint, output: &UtxoOutputRow) -> Result<()>;
    fn del_utxo_output(&mut self, outpoint: &OutPoint) -> Result<()>;
    fn set_utxo_input(&mut self, outpoint: &OutPoint, input: &UtxoInputRow) -> Result<()>;
    fn del_utxo_input(&mut self, outpoint: &OutPoint) -> Result<()>;
    fn set_accounting_output(
        &mut self,
        outpoint: &OutPoint,
        output: &AccountingOutputRow,
    ) -> Result<()>;
    fn del_accounting_output(&mut self, outpoint: &OutPoint) -> Result<()>;
    fn set_accounting_input(
        &mut self,
        outpoint: &OutPoint,
        input: &AccountingInputRow,
    ) -> Result<()>;
    fn del_accounting_input(&mut self, outpoint: &OutPoint) -> Result<()>;
    fn set_certificate(&mut self, outpoint: &OutPoint, certificate: &Certificate) -> Result<()>;
    fn del_certificate(&mut self, outpoint: &OutPoint) -> Result<()>;

    fn set_token(&mut self, id: &TokenId, info: &TokenInfo) -> Result<()>;
    fn set_last_sync_info(&mut self, id: &DeriverId, info: &LastSyncInfo) -> Result<()>;
    fn del_last_sync_info(&mut self, id: &DeriverId) -> Result<()>;
}

/// Queries that expose decrypted private key material. Only implemented by
/// the unlocked transaction token.
pub trait WalletStorageReadUnlocked: WalletStorageReadLocked {
    /// Decrypt and decode the private key stored under the given row id.
    /// `None` when the row is absent or does not hold private key material.
    fn get_private_key(&self, id: &KeyRowId) -> Result<Option<ExtendedPrivateKey>>;
}

/// Modifying operations that require the wallet to be unlocked.
pub trait WalletStorageWriteUnlocked: WalletStorageWriteLocked + WalletStorageReadUnlocked {}
