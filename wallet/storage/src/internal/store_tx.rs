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

//! The transaction tokens giving typed access to the wallet tables.

use std::collections::BTreeMap;

use crypto::kdf::KdfChallenge;
use crypto::key::extended::ExtendedPrivateKey;
use crypto::key::hdkd::u31::U31;
use crypto::symkey::SymmetricKey;
use parity_scale_codec::Decode;

use crate::schema::{
    DBAccountingInput, DBAccountingOutput, DBAddress, DBAddressDigest, DBAddressMapping, DBBlock,
    DBBlockHash, DBCertificate, DBChainAddress, DBDerivationNode, DBKey, DBKeychainUsage,
    DBLastSyncInfo, DBNextIds, DBNodeChild, DBPublicDeriver, DBToken, DBTx, DBTxDigest, DBValue,
    DBUtxoInput, DBUtxoOutput, DBWallet, DBWrapper, Schema,
};
use crate::{
    WalletStorageReadLocked, WalletStorageReadUnlocked, WalletStorageWriteLocked,
    WalletStorageWriteUnlocked,
};
use wallet_types::{
    AccountingInputRow, AccountingOutputRow, AddressDigest, AddressRow, AddressRowId, BlockHash,
    BlockRow, BlockRowId, Certificate, ChainAddressId, DeriverId, DeriverPurposeId,
    KeyDerivationNode, KeyMaterial, KeyRow, KeyRowId, KeychainUsageState, LastSyncInfo,
    NextRowIds, NodeChildId, NodeId, OutPoint, PublicDeriverInfo, TokenId, TokenInfo, TxDigest,
    TxRow, TxRowId, UtxoInputRow, UtxoOutputRow, WalletId, WalletInfo, WalletPrefixedId,
    WalletWrapper,
};

const VERSION_KEY: &[u8] = b"version";

fn decoding_err(e: parity_scale_codec::Error) -> crate::Error {
    crate::Error::Storage(storage::Error::Decoding(e.to_string()))
}

/// A read-only transaction token.
pub struct StoreTxRo<'st, B: storage::Backend>(storage::TransactionRo<'st, B, Schema>);

impl<'st, B: storage::Backend> StoreTxRo<'st, B> {
    pub(super) fn new(tx: storage::TransactionRo<'st, B, Schema>) -> Self {
        StoreTxRo(tx)
    }

    /// Close the transaction.
    pub fn close(self) {
        self.0.close()
    }
}

/// A read-write transaction token without access to key material.
pub struct StoreTxRw<'st, B: storage::Backend>(storage::TransactionRw<'st, B, Schema>);

impl<'st, B: storage::Backend> StoreTxRw<'st, B> {
    pub(super) fn new(tx: storage::TransactionRw<'st, B, Schema>) -> Self {
        StoreTxRw(tx)
    }

    /// Commit the transaction.
    pub fn commit(self) -> crate::Result<()> {
        Ok(self.0.commit()?)
    }

    /// Abort the transaction, discarding all buffered writes.
    pub fn abort(self) {
        self.0.abort()
    }

    /// Upgrade to an unlocked token by verifying the password against the
    /// encrypted root key of the given wallet.
    pub fn unlock(
        self,
        wallet_id: &WalletId,
        password: &str,
    ) -> crate::Result<StoreTxRwUnlocked<'st, B>> {
        let wrapper = self
            .get_wallet_wrapper(wallet_id)?
            .ok_or(crate::Error::WalletNotFound(*wallet_id))?;
        let root_node = wrapper.private_root().ok_or(crate::Error::MissingRootKey(*wallet_id))?;
        let node = self
            .get_derivation_node(&root_node)?
            .ok_or(crate::Error::MissingRootKey(*wallet_id))?;
        let key_id = node.private_key_id().ok_or(crate::Error::MissingRootKey(*wallet_id))?;
        let row = self.get_key_row(&key_id)?.ok_or(crate::Error::MissingRootKey(*wallet_id))?;

        match row.material() {
            KeyMaterial::Encrypted { challenge, blob } => {
                let sym_key = super::password::challenge_to_sym_key(password, challenge.clone())?;
                // The authenticated cipher tells a wrong password apart here
                sym_key.decrypt(blob).map_err(|_| crate::Error::WalletInvalidPassword)?;
                Ok(StoreTxRwUnlocked {
                    tx: self.0,
                    sym_key,
                    challenge: challenge.clone(),
                })
            }
            KeyMaterial::Plain(_) => Err(crate::Error::MissingRootKey(*wallet_id)),
        }
    }
}

/// A read-write transaction token carrying the symmetric key of one wallet.
/// The key, and anything decrypted with it, dies with the token.
pub struct StoreTxRwUnlocked<'st, B: storage::Backend> {
    tx: storage::TransactionRw<'st, B, Schema>,
    sym_key: SymmetricKey,
    challenge: KdfChallenge,
}

impl<'st, B: storage::Backend> StoreTxRwUnlocked<'st, B> {
    /// Commit the transaction.
    pub fn commit(self) -> crate::Result<()> {
        Ok(self.tx.commit()?)
    }

    /// Abort the transaction, discarding all buffered writes.
    pub fn abort(self) {
        self.tx.abort()
    }

    /// Encrypt a private key under this wallet's current password.
    pub fn encrypt_private_key(&self, key: &ExtendedPrivateKey) -> crate::Result<KeyMaterial> {
        super::encrypt_key_material(&self.sym_key, &self.challenge, key)
    }
}

macro_rules! impl_read_ops {
    ($t:ident, $($field:tt)+) => {
        impl<'st, B: storage::Backend> WalletStorageReadLocked for $t<'st, B> {
            fn get_storage_version(&self) -> crate::Result<u32> {
                self.$($field)+
                    .get::<DBValue, _>(&VERSION_KEY.to_vec())?
                    .map(|data| u32::decode(&mut data.as_slice()).map_err(decoding_err))
                    .transpose()
                    .map(|version| version.unwrap_or(0))
            }

            fn get_next_row_ids(&self) -> crate::Result<NextRowIds> {
                Ok(self.$($field)+.get::<DBNextIds, _>(&())?.unwrap_or_default())
            }

            fn get_wallet(&self, id: &WalletId) -> crate::Result<Option<WalletInfo>> {
                Ok(self.$($field)+.get::<DBWallet, _>(id)?)
            }

            fn get_wallets(&self) -> crate::Result<BTreeMap<WalletId, WalletInfo>> {
                Ok(self.$($field)+.prefix_iter::<DBWallet, _, _>(&())?.into_iter().collect())
            }

            fn get_wallet_wrapper(&self, id: &WalletId) -> crate::Result<Option<WalletWrapper>> {
                Ok(self.$($field)+.get::<DBWrapper, _>(id)?)
            }

            fn get_key_row(&self, id: &KeyRowId) -> crate::Result<Option<KeyRow>> {
                Ok(self.$($field)+.get::<DBKey, _>(id)?)
            }

            fn get_derivation_node(
                &self,
                id: &NodeId,
            ) -> crate::Result<Option<KeyDerivationNode>> {
                Ok(self.$($field)+.get::<DBDerivationNode, _>(id)?)
            }

            fn get_node_children(
                &self,
                parent: &NodeId,
            ) -> crate::Result<BTreeMap<NodeChildId, NodeId>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBNodeChild, _, _>(parent)?
                    .into_iter()
                    .collect())
            }

            fn get_public_deriver(
                &self,
                id: &DeriverId,
            ) -> crate::Result<Option<PublicDeriverInfo>> {
                Ok(self.$($field)+.get::<DBPublicDeriver, _>(id)?)
            }

            fn get_public_derivers(
                &self,
            ) -> crate::Result<BTreeMap<DeriverId, PublicDeriverInfo>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBPublicDeriver, _, _>(&())?
                    .into_iter()
                    .collect())
            }

            fn get_keychain_usage_state(
                &self,
                id: &DeriverPurposeId,
            ) -> crate::Result<Option<KeychainUsageState>> {
                Ok(self.$($field)+.get::<DBKeychainUsage, _>(id)?)
            }

            fn get_chain_addresses(
                &self,
                id: &DeriverPurposeId,
            ) -> crate::Result<BTreeMap<U31, AddressRowId>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBChainAddress, _, _>(id)?
                    .into_iter()
                    .map(|(key, address)| (key.index(), address))
                    .collect())
            }

            fn get_address(&self, id: &AddressRowId) -> crate::Result<Option<AddressRow>> {
                Ok(self.$($field)+.get::<DBAddress, _>(id)?)
            }

            fn get_address_id_by_digest(
                &self,
                digest: &AddressDigest,
            ) -> crate::Result<Option<AddressRowId>> {
                Ok(self.$($field)+.get::<DBAddressDigest, _>(digest)?)
            }

            fn get_address_mapping(
                &self,
                wallet_id: &WalletId,
                address: &AddressRowId,
            ) -> crate::Result<Option<NodeId>> {
                let key = WalletPrefixedId::new(*wallet_id, *address);
                Ok(self.$($field)+.get::<DBAddressMapping, _>(&key)?)
            }

            fn get_address_mappings(
                &self,
                wallet_id: &WalletId,
            ) -> crate::Result<BTreeMap<AddressRowId, NodeId>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBAddressMapping, _, _>(wallet_id)?
                    .into_iter()
                    .map(|(key, node)| (key.into_item_id(), node))
                    .collect())
            }

            fn get_transaction(
                &self,
                wallet_id: &WalletId,
                id: &TxRowId,
            ) -> crate::Result<Option<TxRow>> {
                let key = WalletPrefixedId::new(*wallet_id, *id);
                Ok(self.$($field)+.get::<DBTx, _>(&key)?)
            }

            fn get_transactions(
                &self,
                wallet_id: &WalletId,
            ) -> crate::Result<BTreeMap<TxRowId, TxRow>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBTx, _, _>(wallet_id)?
                    .into_iter()
                    .map(|(key, tx)| (key.into_item_id(), tx))
                    .collect())
            }

            fn get_tx_id_by_digest(
                &self,
                wallet_id: &WalletId,
                digest: &TxDigest,
            ) -> crate::Result<Option<TxRowId>> {
                let key = WalletPrefixedId::new(*wallet_id, *digest);
                Ok(self.$($field)+.get::<DBTxDigest, _>(&key)?)
            }

            fn get_block(&self, id: &BlockRowId) -> crate::Result<Option<BlockRow>> {
                Ok(self.$($field)+.get::<DBBlock, _>(id)?)
            }

            fn get_blocks(&self) -> crate::Result<BTreeMap<BlockRowId, BlockRow>> {
                Ok(self.$($field)+.prefix_iter::<DBBlock, _, _>(&())?.into_iter().collect())
            }

            fn get_block_id_by_hash(
                &self,
                hash: &BlockHash,
            ) -> crate::Result<Option<BlockRowId>> {
                Ok(self.$($field)+.get::<DBBlockHash, _>(hash)?)
            }

            fn get_utxo_output(
                &self,
                outpoint: &OutPoint,
            ) -> crate::Result<Option<UtxoOutputRow>> {
                Ok(self.$($field)+.get::<DBUtxoOutput, _>(outpoint)?)
            }

            fn get_utxo_outputs(
                &self,
                tx: &TxRowId,
            ) -> crate::Result<BTreeMap<OutPoint, UtxoOutputRow>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBUtxoOutput, _, _>(tx)?
                    .into_iter()
                    .collect())
            }

            fn get_utxo_inputs(
                &self,
                tx: &TxRowId,
            ) -> crate::Result<BTreeMap<OutPoint, UtxoInputRow>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBUtxoInput, _, _>(tx)?
                    .into_iter()
                    .collect())
            }

            fn get_accounting_output(
                &self,
                outpoint: &OutPoint,
            ) -> crate::Result<Option<AccountingOutputRow>> {
                Ok(self.$($field)+.get::<DBAccountingOutput, _>(outpoint)?)
            }

            fn get_accounting_outputs(
                &self,
                tx: &TxRowId,
            ) -> crate::Result<BTreeMap<OutPoint, AccountingOutputRow>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBAccountingOutput, _, _>(tx)?
                    .into_iter()
                    .collect())
            }

            fn get_accounting_inputs(
                &self,
                tx: &TxRowId,
            ) -> crate::Result<BTreeMap<OutPoint, AccountingInputRow>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBAccountingInput, _, _>(tx)?
                    .into_iter()
                    .collect())
            }

            fn get_certificates(
                &self,
                tx: &TxRowId,
            ) -> crate::Result<BTreeMap<OutPoint, Certificate>> {
                Ok(self
                    .$($field)+
                    .prefix_iter::<DBCertificate, _, _>(tx)?
                    .into_iter()
                    .collect())
            }

            fn get_token(&self, id: &TokenId) -> crate::Result<Option<TokenInfo>> {
                Ok(self.$($field)+.get::<DBToken, _>(id)?)
            }

            fn get_last_sync_info(
                &self,
                id: &DeriverId,
            ) -> crate::Result<Option<LastSyncInfo>> {
                Ok(self.$($field)+.get::<DBLastSyncInfo, _>(id)?)
            }
        }
    };
}

impl_read_ops!(StoreTxRo, 0);
impl_read_ops!(StoreTxRw, 0);
impl_read_ops!(StoreTxRwUnlocked, tx);

macro_rules! impl_write_ops {
    ($t:ident, $($field:tt)+) => {
        impl<'st, B: storage::Backend> WalletStorageWriteLocked for $t<'st, B> {
            fn set_storage_version(&mut self, version: u32) -> crate::Result<()> {
                use parity_scale_codec::Encode;
                Ok(self
                    .$($field)+
                    .put::<DBValue, _>(&VERSION_KEY.to_vec(), &version.encode())?)
            }

            fn set_next_row_ids(&mut self, ids: &NextRowIds) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBNextIds, _>(&(), ids)?)
            }

            fn set_wallet(&mut self, id: &WalletId, wallet: &WalletInfo) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBWallet, _>(id, wallet)?)
            }

            fn del_wallet(&mut self, id: &WalletId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBWallet, _>(id)?)
            }

            fn set_wallet_wrapper(
                &mut self,
                id: &WalletId,
                wrapper: &WalletWrapper,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBWrapper, _>(id, wrapper)?)
            }

            fn del_wallet_wrapper(&mut self, id: &WalletId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBWrapper, _>(id)?)
            }

            fn set_key_row(&mut self, id: &KeyRowId, key: &KeyRow) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBKey, _>(id, key)?)
            }

            fn del_key_row(&mut self, id: &KeyRowId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBKey, _>(id)?)
            }

            fn set_derivation_node(
                &mut self,
                id: &NodeId,
                node: &KeyDerivationNode,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBDerivationNode, _>(id, node)?)
            }

            fn del_derivation_node(&mut self, id: &NodeId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBDerivationNode, _>(id)?)
            }

            fn set_node_child(&mut self, edge: &NodeChildId, child: &NodeId) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBNodeChild, _>(edge, child)?)
            }

            fn del_node_child(&mut self, edge: &NodeChildId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBNodeChild, _>(edge)?)
            }

            fn set_public_deriver(
                &mut self,
                id: &DeriverId,
                info: &PublicDeriverInfo,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBPublicDeriver, _>(id, info)?)
            }

            fn del_public_deriver(&mut self, id: &DeriverId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBPublicDeriver, _>(id)?)
            }

            fn set_keychain_usage_state(
                &mut self,
                id: &DeriverPurposeId,
                state: &KeychainUsageState,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBKeychainUsage, _>(id, state)?)
            }

            fn del_keychain_usage_state(&mut self, id: &DeriverPurposeId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBKeychainUsage, _>(id)?)
            }

            fn set_chain_address(
                &mut self,
                id: &ChainAddressId,
                address: &AddressRowId,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBChainAddress, _>(id, address)?)
            }

            fn del_chain_address(&mut self, id: &ChainAddressId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBChainAddress, _>(id)?)
            }

            fn set_address(&mut self, id: &AddressRowId, address: &AddressRow) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBAddress, _>(id, address)?)
            }

            fn set_address_id_by_digest(
                &mut self,
                digest: &AddressDigest,
                id: &AddressRowId,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBAddressDigest, _>(digest, id)?)
            }

            fn set_address_mapping(
                &mut self,
                wallet_id: &WalletId,
                address: &AddressRowId,
                node: &NodeId,
            ) -> crate::Result<()> {
                let key = WalletPrefixedId::new(*wallet_id, *address);
                Ok(self.$($field)+.put::<DBAddressMapping, _>(&key, node)?)
            }

            fn del_address_mapping(
                &mut self,
                wallet_id: &WalletId,
                address: &AddressRowId,
            ) -> crate::Result<()> {
                let key = WalletPrefixedId::new(*wallet_id, *address);
                Ok(self.$($field)+.del::<DBAddressMapping, _>(&key)?)
            }

            fn set_transaction(
                &mut self,
                wallet_id: &WalletId,
                id: &TxRowId,
                tx: &TxRow,
            ) -> crate::Result<()> {
                let key = WalletPrefixedId::new(*wallet_id, *id);
                Ok(self.$($field)+.put::<DBTx, _>(&key, tx)?)
            }

            fn del_transaction(&mut self, wallet_id: &WalletId, id: &TxRowId) -> crate::Result<()> {
                let key = WalletPrefixedId::new(*wallet_id, *id);
                Ok(self.$($field)+.del::<DBTx, _>(&key)?)
            }

            fn set_tx_id_by_digest(
                &mut self,
                wallet_id: &WalletId,
                digest: &TxDigest,
                id: &TxRowId,
            ) -> crate::Result<()> {
                let key = WalletPrefixedId::new(*wallet_id, *digest);
                Ok(self.$($field)+.put::<DBTxDigest, _>(&key, id)?)
            }

            fn del_tx_id_by_digest(
                &mut self,
                wallet_id: &WalletId,
                digest: &TxDigest,
            ) -> crate::Result<()> {
                let key = WalletPrefixedId::new(*wallet_id, *digest);
                Ok(self.$($field)+.del::<DBTxDigest, _>(&key)?)
            }

            fn set_block(&mut self, id: &BlockRowId, block: &BlockRow) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBBlock, _>(id, block)?)
            }

            fn del_block(&mut self, id: &BlockRowId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBBlock, _>(id)?)
            }

            fn set_block_id_by_hash(
                &mut self,
                hash: &BlockHash,
                id: &BlockRowId,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBBlockHash, _>(hash, id)?)
            }

            fn del_block_id_by_hash(&mut self, hash: &BlockHash) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBBlockHash, _>(hash)?)
            }

            fn set_utxo_output(
                &mut self,
                outpoint: &OutPoint,
                output: &UtxoOutputRow,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBUtxoOutput, _>(outpoint, output)?)
            }

            fn del_utxo_output(&mut self, outpoint: &OutPoint) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBUtxoOutput, _>(outpoint)?)
            }

            fn set_utxo_input(
                &mut self,
                outpoint: &OutPoint,
                input: &UtxoInputRow,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBUtxoInput, _>(outpoint, input)?)
            }

            fn del_utxo_input(&mut self, outpoint: &OutPoint) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBUtxoInput, _>(outpoint)?)
            }

            fn set_accounting_output(
                &mut self,
                outpoint: &OutPoint,
                output: &AccountingOutputRow,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBAccountingOutput, _>(outpoint, output)?)
            }

            fn del_accounting_output(&mut self, outpoint: &OutPoint) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBAccountingOutput, _>(outpoint)?)
            }

            fn set_accounting_input(
                &mut self,
                outpoint: &OutPoint,
                input: &AccountingInputRow,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBAccountingInput, _>(outpoint, input)?)
            }

            fn del_accounting_input(&mut self, outpoint: &OutPoint) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBAccountingInput, _>(outpoint)?)
            }

            fn set_certificate(
                &mut self,
                outpoint: &OutPoint,
                certificate: &Certificate,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBCertificate, _>(outpoint, certificate)?)
            }

            fn del_certificate(&mut self, outpoint: &OutPoint) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBCertificate, _>(outpoint)?)
            }

            fn set_token(&mut self, id: &TokenId, info: &TokenInfo) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBToken, _>(id, info)?)
            }

            fn set_last_sync_info(
                &mut self,
                id: &DeriverId,
                info: &LastSyncInfo,
            ) -> crate::Result<()> {
                Ok(self.$($field)+.put::<DBLastSyncInfo, _>(id, info)?)
            }

            fn del_last_sync_info(&mut self, id: &DeriverId) -> crate::Result<()> {
                Ok(self.$($field)+.del::<DBLastSyncInfo, _>(id)?)
            }
        }
    };
}

impl_write_ops!(StoreTxRw, 0);
impl_write_ops!(StoreTxRwUnlocked, tx);

impl<'st, B: storage::Backend> WalletStorageReadUnlocked for StoreTxRwUnlocked<'st, B> {
    fn get_private_key(&self, id: &KeyRowId) -> crate::Result<Option<ExtendedPrivateKey>> {
        let row = match self.get_key_row(id)? {
            Some(row) => row,
            None => return Ok(None),
        };
        match row.material() {
            KeyMaterial::Encrypted { challenge: _, blob } => {
                let bytes =
                    self.sym_key.decrypt(blob).map_err(|_| crate::Error::CorruptKeyMaterial)?;
                let key = ExtendedPrivateKey::decode(&mut bytes.as_slice())
                    .map_err(|_| crate::Error::CorruptKeyMaterial)?;
                Ok(Some(key))
            }
            // Plain rows hold public key material only
            KeyMaterial::Plain(_) => Ok(None),
        }
    }
}

impl<'st, B: storage::Backend> WalletStorageWriteUnlocked for StoreTxRwUnlocked<'st, B> {}
