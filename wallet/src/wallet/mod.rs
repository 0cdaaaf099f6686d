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

//! The wallet facade: one loaded wallet with its account key chains,
//! exposing construction, queries, synchronization and maintenance.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use common::address::Address;
use common::chain::ChainConfig;
use crypto::key::extended::ExtendedPublicKey;
use crypto::key::hdkd::u31::U31;
use node_comm::ChainBackend;
use wallet_storage::{
    encrypt_key_material, password_to_sym_key, Store, WalletStorageReadLocked,
    WalletStorageReadUnlocked, WalletStorageWriteLocked,
};
use wallet_types::{
    DeriverId, DeriverPurposeId, HardwareWalletData, KeyPurpose, KeyRow, LastSyncInfo, NodeId,
    OutPoint, TokenBundle, TxRow, TxRowId, UtxoOutputRow, WalletId, WalletWrapper,
};

use crate::builder::WalletBuilder;
use crate::key_chain::{AccountKeyChain, MasterKeyChain, WalletScheme};
use crate::ledger;
use crate::sync::{self, SyncOutcome, SyncParts};
use crate::{SyncError, WalletError, WalletResult};

pub struct Wallet<B: storage::Backend> {
    chain_config: Arc<ChainConfig>,
    db: Store<B>,
    wallet_id: WalletId,
    scheme: WalletScheme,
    accounts: BTreeMap<DeriverId, AccountKeyChain>,
}

impl<B: storage::Backend> Wallet<B> {
    /// Create and load a software wallet: the mnemonic becomes the root
    /// key, stored encrypted under the password, and one public deriver is
    /// created per account name, each with its initial gap-limit address
    /// set. All of it commits atomically.
    #[allow(clippy::too_many_arguments)]
    pub fn create_software(
        chain_config: Arc<ChainConfig>,
        db: Store<B>,
        name: &str,
        mnemonic: &str,
        mnemonic_passphrase: Option<&str>,
        password: &str,
        scheme: WalletScheme,
        account_names: &[&str],
    ) -> WalletResult<Self> {
        let root = MasterKeyChain::mnemonic_to_root_key(mnemonic, mnemonic_passphrase, scheme)?;

        let builder = WalletBuilder::new(&db, chain_config.clone()).create_wallet(name);
        let builder = match scheme {
            WalletScheme::Bip44 => builder.with_bip44_wrapper(),
            WalletScheme::Cip1852 => builder.with_cip1852_wrapper(),
        };
        let mut builder = builder.with_encrypted_root(root, password);
        for account_name in account_names {
            builder = builder.add_public_deriver(account_name);
        }
        let built = builder.commit()?;

        Self::load(chain_config, db, built.wallet_id)
    }

    /// Create and load a hardware wallet from a device-exported account
    /// public key and the device metadata. No private material is stored.
    pub fn create_hardware(
        chain_config: Arc<ChainConfig>,
        db: Store<B>,
        name: &str,
        account_pubkey: ExtendedPublicKey,
        hw_data: HardwareWalletData,
        scheme: WalletScheme,
        account_name: &str,
    ) -> WalletResult<Self> {
        let builder = WalletBuilder::new(&db, chain_config.clone()).create_wallet(name);
        let builder = match scheme {
            WalletScheme::Bip44 => builder.with_bip44_wrapper(),
            WalletScheme::Cip1852 => builder.with_cip1852_wrapper(),
        };
        let built = builder
            .with_adhoc_public_root(account_pubkey, hw_data)
            .add_public_deriver(account_name)
            .commit()?;

        Self::load(chain_config, db, built.wallet_id)
    }

    /// Load an existing wallet and rebuild its account key chains.
    pub fn load(
        chain_config: Arc<ChainConfig>,
        db: Store<B>,
        wallet_id: WalletId,
    ) -> WalletResult<Self> {
        let (scheme, accounts) = {
            let db_tx = db.transaction_ro()?;
            db_tx.get_wallet(&wallet_id)?.ok_or(WalletError::NoWalletFound(wallet_id))?;
            let wrapper = db_tx
                .get_wallet_wrapper(&wallet_id)?
                .ok_or(WalletError::StaleState("wallet row exists without its wrapper"))?;
            let scheme = match wrapper {
                WalletWrapper::Bip44(_) => WalletScheme::Bip44,
                WalletWrapper::Cip1852(_) => WalletScheme::Cip1852,
            };

            let mut accounts = BTreeMap::new();
            for (deriver_id, info) in db_tx.get_public_derivers()? {
                if info.wallet_id() != wallet_id {
                    continue;
                }
                let key_chain =
                    AccountKeyChain::load(&db_tx, chain_config.clone(), deriver_id, &info, scheme)?;
                accounts.insert(deriver_id, key_chain);
            }
            (scheme, accounts)
        };

        Ok(Wallet {
            chain_config,
            db,
            wallet_id,
            scheme,
            accounts,
        })
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn scheme(&self) -> WalletScheme {
        self.scheme
    }

    /// The public derivers of this wallet, in creation order.
    pub fn deriver_ids(&self) -> Vec<DeriverId> {
        self.accounts.keys().copied().collect()
    }

    pub fn account(&self, deriver_id: DeriverId) -> WalletResult<&AccountKeyChain> {
        self.accounts.get(&deriver_id).ok_or(WalletError::NoDeriverFound(deriver_id))
    }

    pub(crate) fn sync_parts(&mut self) -> SyncParts<'_, B> {
        SyncParts {
            db: &self.db,
            chain_config: &self.chain_config,
            wallet_id: self.wallet_id,
            accounts: &mut self.accounts,
        }
    }

    /// Run one sync cycle for the given public deriver. `now` is the
    /// caller's clock, recorded in the sync pointer.
    pub fn sync_once<N: ChainBackend>(
        &mut self,
        backend: &N,
        deriver_id: DeriverId,
        now: u64,
    ) -> Result<SyncOutcome, SyncError<N::Error>> {
        sync::sync_once(self, backend, deriver_id, now)
    }

    /// Issue a fresh address on the given chain of the given deriver.
    pub fn issue_address(
        &mut self,
        deriver_id: DeriverId,
        purpose: KeyPurpose,
    ) -> WalletResult<(U31, Address)> {
        let account = self
            .accounts
            .get_mut(&deriver_id)
            .ok_or(WalletError::NoDeriverFound(deriver_id))?;
        let mut db_tx = self.db.transaction_rw()?;
        let mut ids = db_tx.get_next_row_ids()?;
        let issued = account.issue_address(&mut db_tx, &mut ids, purpose)?;
        db_tx.set_next_row_ids(&ids)?;
        db_tx.commit()?;
        Ok(issued)
    }

    /// The issued addresses surfaced to display layers: everything issued,
    /// but at most `display_cutoff` unused ones past the last used index.
    pub fn get_display_addresses(
        &self,
        deriver_id: DeriverId,
        purpose: KeyPurpose,
    ) -> WalletResult<BTreeMap<U31, Address>> {
        let chain = self.account(deriver_id)?.sub_chain(purpose);
        let cutoff = self.chain_config.display_cutoff();
        let limit = match chain.last_used() {
            None => cutoff,
            Some(last_used) => last_used.into_u32().saturating_add(cutoff).saturating_add(1),
        };
        Ok(chain
            .get_all_issued_addresses()
            .into_iter()
            .filter(|(index, _)| index.into_u32() < limit)
            .collect())
    }

    pub fn get_balance(&self) -> WalletResult<TokenBundle> {
        let db_tx = self.db.transaction_ro()?;
        ledger::get_balance(&db_tx, &self.wallet_id)
    }

    pub fn get_spendable_utxos(&self) -> WalletResult<Vec<(OutPoint, UtxoOutputRow)>> {
        let db_tx = self.db.transaction_ro()?;
        ledger::get_spendable_utxos(&db_tx, &self.wallet_id)
    }

    pub fn get_transactions_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> WalletResult<Vec<(TxRowId, TxRow)>> {
        let db_tx = self.db.transaction_ro()?;
        ledger::get_transactions_page(&db_tx, &self.wallet_id, offset, limit)
    }

    pub fn get_last_sync_info(&self, deriver_id: DeriverId) -> WalletResult<LastSyncInfo> {
        let db_tx = self.db.transaction_ro()?;
        Ok(db_tx.get_last_sync_info(&deriver_id)?.unwrap_or_default())
    }

    /// Re-encrypt the root key under a new password. The decrypted key
    /// lives only inside this single transaction.
    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> WalletResult<()> {
        let unlocked = self.db.transaction_rw_unlocked(&self.wallet_id, old_password)?;

        let wrapper = unlocked
            .get_wallet_wrapper(&self.wallet_id)?
            .ok_or(WalletError::StaleState("wallet row exists without its wrapper"))?;
        let root_node = wrapper
            .private_root()
            .ok_or(WalletError::DatabaseError(wallet_storage::Error::MissingRootKey(
                self.wallet_id,
            )))?;
        let node = unlocked
            .get_derivation_node(&root_node)?
            .ok_or(WalletError::StaleState("private root node missing"))?;
        let key_row_id = node
            .private_key_id()
            .ok_or(WalletError::StaleState("private root node has no key row"))?;
        let root_key = unlocked
            .get_private_key(&key_row_id)?
            .ok_or(WalletError::StaleState("root key row holds no private key"))?;

        let (new_sym_key, new_challenge) = password_to_sym_key(new_password)?;
        let material = encrypt_key_material(&new_sym_key, &new_challenge, &root_key)?;

        let mut unlocked = unlocked;
        unlocked.set_key_row(&key_row_id, &KeyRow::new(root_key.kind(), material))?;
        unlocked.commit()?;
        log::info!("wallet {} password changed", self.wallet_id);
        Ok(())
    }

    /// Delete the wallet and everything it owns: transactions with their
    /// inputs/outputs, derivation tree, key rows, derivers and mappings.
    /// Shared address rows stay behind; they are content-addressed and may
    /// be referenced by other wallets.
    pub fn remove_wallet(self) -> WalletResult<()> {
        let wallet_id = self.wallet_id;
        let mut db_tx = self.db.transaction_rw()?;

        ledger::remove_wallet_transactions(&mut db_tx, &wallet_id)?;

        for address_id in db_tx.get_address_mappings(&wallet_id)?.into_keys() {
            db_tx.del_address_mapping(&wallet_id, &address_id)?;
        }

        // Roots of the tree portions owned by this wallet
        let mut roots: BTreeSet<NodeId> = BTreeSet::new();
        if let Some(wrapper) = db_tx.get_wallet_wrapper(&wallet_id)? {
            if let Some(private_root) = wrapper.private_root() {
                roots.insert(private_root);
            }
        }
        for (deriver_id, info) in db_tx.get_public_derivers()? {
            if info.wallet_id() != wallet_id {
                continue;
            }
            roots.insert(info.account_node());
            for purpose in KeyPurpose::ALL {
                db_tx.del_keychain_usage_state(&DeriverPurposeId::new(deriver_id, purpose))?;
                let purpose_id = DeriverPurposeId::new(deriver_id, purpose);
                for index in db_tx.get_chain_addresses(&purpose_id)?.into_keys() {
                    db_tx.del_chain_address(&wallet_types::ChainAddressId::new(
                        deriver_id, purpose, index,
                    ))?;
                }
            }
            db_tx.del_last_sync_info(&deriver_id)?;
            db_tx.del_public_deriver(&deriver_id)?;
        }

        // Cascade: delete each owned subtree with its edges and key rows
        let mut stack: Vec<NodeId> = roots.into_iter().collect();
        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        while let Some(node_id) = stack.pop() {
            if !visited.insert(node_id) {
                continue;
            }
            for (edge, child) in db_tx.get_node_children(&node_id)? {
                db_tx.del_node_child(&edge)?;
                stack.push(child);
            }
            if let Some(node) = db_tx.get_derivation_node(&node_id)? {
                if let Some(key_row) = node.private_key_id() {
                    db_tx.del_key_row(&key_row)?;
                }
                if let Some(key_row) = node.public_key_id() {
                    db_tx.del_key_row(&key_row)?;
                }
            }
            db_tx.del_derivation_node(&node_id)?;
        }

        db_tx.del_wallet_wrapper(&wallet_id)?;
        db_tx.del_wallet(&wallet_id)?;
        db_tx.commit()?;
        log::info!("wallet {} removed", wallet_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
