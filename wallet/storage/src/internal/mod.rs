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

use std::collections::BTreeMap;

use common::primitives::BlockHeight;
use crypto::kdf::KdfChallenge;
use crypto::key::extended::ExtendedPrivateKey;
use crypto::key::hdkd::u31::U31;
use crypto::random::make_true_rng;
use crypto::symkey::SymmetricKey;
use parity_scale_codec::Encode;

use crate::schema::Schema;
use crate::WalletStorageReadLocked;
use wallet_types::{
    AccountingInputRow, AccountingOutputRow, AddressDigest, AddressRow, AddressRowId, BlockHash,
    BlockRow, BlockRowId, Certificate, ChainAddressId, DeriverId, DeriverPurposeId,
    KeyDerivationNode, KeyMaterial, KeyRow, KeyRowId, KeychainUsageState, LastSyncInfo,
    NextRowIds, NodeChildId, NodeId, OutPoint, PublicDeriverInfo, TokenId, TokenInfo, TxDigest,
    TxRow, TxRowId, UtxoInputRow, UtxoOutputRow, WalletId, WalletInfo, WalletWrapper,
};

pub mod password;
mod store_tx;

pub use store_tx::{StoreTxRo, StoreTxRw, StoreTxRwUnlocked};

/// Encrypt a private key for storage under the given symmetric key. The
/// challenge is stored next to the blob so the key can be re-derived from
/// the password alone.
pub fn encrypt_key_material(
    sym_key: &SymmetricKey,
    challenge: &KdfChallenge,
    key: &ExtendedPrivateKey,
) -> crate::Result<KeyMaterial> {
    let mut rng = make_true_rng();
    let blob = sym_key
        .encrypt(&mut rng, &key.encode())
        .map_err(|_| crate::Error::KeyEncryptionFailed)?;
    Ok(KeyMaterial::Encrypted {
        challenge: challenge.clone(),
        blob,
    })
}

/// Store for wallet data, parametrized over the backend B
pub struct Store<B: storage::Backend> {
    storage: storage::Storage<B, Schema>,
}

impl<B: storage::Backend> Store<B> {
    /// Create a new wallet storage
    pub fn new(backend: B) -> crate::Result<Self> {
        let storage = storage::Storage::new(backend).map_err(crate::Error::from)?;
        Ok(Store { storage })
    }

    /// Start a read-only transaction.
    pub fn transaction_ro(&self) -> crate::Result<StoreTxRo<'_, B>> {
        self.storage.transaction_ro().map_err(crate::Error::from).map(StoreTxRo::new)
    }

    /// Start a read-write transaction without access to key material.
    pub fn transaction_rw(&self) -> crate::Result<StoreTxRw<'_, B>> {
        self.storage.transaction_rw().map_err(crate::Error::from).map(StoreTxRw::new)
    }

    /// Start a read-write transaction that can reach the private keys of the
    /// given wallet. Fails with [crate::Error::WalletInvalidPassword] when
    /// the password does not match the stored root key.
    pub fn transaction_rw_unlocked(
        &self,
        wallet_id: &WalletId,
        password: &str,
    ) -> crate::Result<StoreTxRwUnlocked<'_, B>> {
        self.transaction_rw()?.unlock(wallet_id, password)
    }
}

impl<B: storage::Backend + Clone> Clone for Store<B> {
    fn clone(&self) -> Self {
        Store {
            storage: self.storage.clone(),
        }
    }
}

macro_rules! delegate_to_transaction {
    ($(fn $func:ident $args:tt -> $ret:ty;)*) => {
        $(delegate_to_transaction!(@FN $func $args -> $ret);)*
    };
    (@FN $f:ident(&self $(, $arg:ident: $aty:ty)* $(,)?) -> $ret:ty) => {
        fn $f(&self $(, $arg: $aty)*) -> $ret {
            self.transaction_ro().and_then(|tx| tx.$f($($arg),*))
        }
    };
    (@FN $f:ident(&mut self $(, $arg:ident: $aty:ty)* $(,)?) -> $ret:ty) => {
        fn $f(&mut self $(, $arg: $aty)*) -> $ret {
            let mut tx = self.transaction_rw()?;
            let val = tx.$f($($arg),*)?;
            tx.commit()?;
            Ok(val)
        }
    };
}

impl<B: storage::Backend> WalletStorageReadLocked for Store<B> {
    delegate_to_transaction! {
        fn get_storage_version(&self) -> crate::Result<u32>;
        fn get_next_row_ids(&self) -> crate::Result<NextRowIds>;
        fn get_wallet(&self, id: &WalletId) -> crate::Result<Option<WalletInfo>>;
        fn get_wallets(&self) -> crate::Result<BTreeMap<WalletId, WalletInfo>>;
        fn get_wallet_wrapper(&self, id: &WalletId) -> crate::Result<Option<WalletWrapper>>;
        fn get_key_row(&self, id: &KeyRowId) -> crate::Result<Option<KeyRow>>;
        fn get_derivation_node(&self, id: &NodeId) -> crate::Result<Option<KeyDerivationNode>>;
        fn get_node_children(&self, parent: &NodeId) -> crate::Result<BTreeMap<NodeChildId, NodeId>>;
        fn get_public_deriver(&self, id: &DeriverId) -> crate::Result<Option<PublicDeriverInfo>>;
        fn get_public_derivers(&self) -> crate::Result<BTreeMap<DeriverId, PublicDeriverInfo>>;
        fn get_keychain_usage_state(&self, id: &DeriverPurposeId) -> crate::Result<Option<KeychainUsageState>>;
        fn get_chain_addresses(&self, id: &DeriverPurposeId) -> crate::Result<BTreeMap<U31, AddressRowId>>;
        fn get_address(&self, id: &AddressRowId) -> crate::Result<Option<AddressRow>>;
        fn get_address_id_by_digest(&self, digest: &AddressDigest) -> crate::Result<Option<AddressRowId>>;
        fn get_address_mapping(&self, wallet_id: &WalletId, address: &AddressRowId) -> crate::Result<Option<NodeId>>;
        fn get_address_mappings(&self, wallet_id: &WalletId) -> crate::Result<BTreeMap<AddressRowId, NodeId>>;
        fn get_transaction(&self, wallet_id: &WalletId, id: &TxRowId) -> crate::Result<Option<TxRow>>;
        fn get_transactions(&self, wallet_id: &WalletId) -> crate::Result<BTreeMap<TxRowId, TxRow>>;
        fn get_tx_id_by_digest(&self, wallet_id: &WalletId, digest: &TxDigest) -> crate::Result<Option<TxRowId>>;
        fn get_block(&self, id: &BlockRowId) -> crate::Result<Option<BlockRow>>;
        fn get_blocks(&self) -> crate::Result<BTreeMap<BlockRowId, BlockRow>>;
        fn get_block_id_by_hash(&self, hash: &BlockHash) -> crate::Result<Option<BlockRowId>>;
        fn get_utxo_output(&self, outpoint: &OutPoint) -> crate::Result<Option<UtxoOutputRow>>;
        fn get_utxo_outputs(&self, tx: &TxRowId) -> crate::Result<BTreeMap<OutPoint, UtxoOutputRow>>;
        fn get_utxo_inputs(&self, tx: &TxRowId) -> crate::Result<BTreeMap<OutPoint, UtxoInputRow>>;
        fn get_accounting_output(&self, outpoint: &OutPoint) -> crate::Result<Option<AccountingOutputRow>>;
        fn get_accounting_outputs(&self, tx: &TxRowId) -> crate::Result<BTreeMap<OutPoint, AccountingOutputRow>>;
        fn get_accounting_inputs(&self, tx: &TxRowId) -> crate::Result<BTreeMap<OutPoint, AccountingInputRow>>;
        fn get_certificates(&self, tx: &TxRowId) -> crate::Result<BTreeMap<OutPoint, Certificate>>;
        fn get_token(&self, id: &TokenId) -> crate::Result<Option<TokenInfo>>;
        fn get_last_sync_info(&self, id: &DeriverId) -> crate::Result<Option<LastSyncInfo>>;
    }

    fn get_transaction_height(
        &self,
        wallet_id: &WalletId,
        tx: &TxRow,
    ) -> crate::Result<Option<BlockHeight>> {
        self.transaction_ro().and_then(|db_tx| db_tx.get_transaction_height(wallet_id, tx))
    }
}

#[cfg(test)]
mod test;
