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

use std::sync::Arc;

use common::address::{Address, Credential};
use common::chain::ChainConfig;
use crypto::key::extended::ExtendedPublicKey;
use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::derivable::Derivable;
use crypto::key::hdkd::u31::U31;
use parity_scale_codec::Decode;
use wallet_storage::{WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{
    DeriverId, DeriverPurposeId, KeyMaterial, KeyPurpose, KeychainUsageState, NextRowIds,
    NodeChildId, NodeId, PublicDeriverInfo, WalletId,
};

use crate::address_map::{self, OwnedAddressIndex};
use crate::key_chain::{
    add_child_node, add_public_key_row, credential_from_key, AddressStyle, KeyChainError,
    KeyChainResult, LeafKeyChain, WalletScheme, WithPurpose, STAKING_CHAIN_INDEX,
};

/// The staking identity of an account: the credential of its staking key,
/// the tree node holding that key, and the account-style address rewards
/// and withdrawals move through.
pub struct StakingKey {
    credential: Credential,
    node: NodeId,
    address: Address,
}

impl StakingKey {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// The in-memory key chain of one public deriver: the account public key,
/// the external and internal leaf chains, and (for the cip1852 scheme) the
/// staking key.
pub struct AccountKeyChain {
    chain_config: Arc<ChainConfig>,
    wallet_id: WalletId,
    deriver_id: DeriverId,

    account_pubkey: ExtendedPublicKey,
    staking: Option<StakingKey>,
    sub_chains: WithPurpose<LeafKeyChain>,
    lookahead_size: u32,
}

impl AccountKeyChain {
    /// Create the on-tree structure of a fresh account: the chain nodes
    /// under the account node, the staking key (cip1852), and the initial
    /// gap-limit address set of both leaf chains.
    #[allow(clippy::too_many_arguments)]
    pub fn create_in_tree(
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        chain_config: Arc<ChainConfig>,
        wallet_id: WalletId,
        deriver_id: DeriverId,
        scheme: WalletScheme,
        account_node: NodeId,
        account_pubkey: ExtendedPublicKey,
    ) -> KeyChainResult<Self> {
        let staking = match scheme {
            WalletScheme::Cip1852 => Some(Self::create_staking_key(
                db_tx,
                ids,
                wallet_id,
                account_node,
                &account_pubkey,
            )?),
            WalletScheme::Bip44 => None,
        };

        let style = match &staking {
            Some(staking_key) => AddressStyle::Base {
                staking: *staking_key.credential(),
            },
            None => AddressStyle::Enterprise,
        };

        let mut sub_chains_vec = Vec::with_capacity(KeyPurpose::ALL.len());
        for purpose in KeyPurpose::ALL {
            let index = purpose.get_deterministic_index();
            let chain_pubkey = account_pubkey.clone().derive_child(index)?;
            let key_row = add_public_key_row(db_tx, ids, &chain_pubkey)?;
            let chain_node = add_child_node(db_tx, ids, account_node, index, None, Some(key_row))?;

            db_tx.set_keychain_usage_state(
                &DeriverPurposeId::new(deriver_id, purpose),
                &KeychainUsageState::default(),
            )?;

            sub_chains_vec.push(LeafKeyChain::new_empty(
                chain_config.clone(),
                wallet_id,
                deriver_id,
                purpose,
                chain_node,
                chain_pubkey,
                style.clone(),
            ));
        }
        let mut sub_chains_vec = sub_chains_vec.into_iter();
        let sub_chains = WithPurpose::new(
            sub_chains_vec.next().expect("two chains built"),
            sub_chains_vec.next().expect("two chains built"),
        );

        let mut key_chain = AccountKeyChain {
            lookahead_size: chain_config.lookahead_size(),
            chain_config,
            wallet_id,
            deriver_id,
            account_pubkey,
            staking,
            sub_chains,
        };
        key_chain.top_up_all(db_tx, ids)?;
        Ok(key_chain)
    }

    fn create_staking_key(
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        wallet_id: WalletId,
        account_node: NodeId,
        account_pubkey: &ExtendedPublicKey,
    ) -> KeyChainResult<StakingKey> {
        let staking_chain_pubkey = account_pubkey.clone().derive_child(STAKING_CHAIN_INDEX)?;
        let chain_key_row = add_public_key_row(db_tx, ids, &staking_chain_pubkey)?;
        let staking_chain_node = add_child_node(
            db_tx,
            ids,
            account_node,
            STAKING_CHAIN_INDEX,
            None,
            Some(chain_key_row),
        )?;

        let leaf_index = ChildNumber::from_normal(U31::ZERO);
        let staking_pubkey = staking_chain_pubkey.derive_child(leaf_index)?;
        let leaf_key_row = add_public_key_row(db_tx, ids, &staking_pubkey)?;
        let leaf_node = add_child_node(
            db_tx,
            ids,
            staking_chain_node,
            leaf_index,
            None,
            Some(leaf_key_row),
        )?;

        let credential = credential_from_key(&staking_pubkey);
        let address = Address::Account {
            staking: credential,
        };
        address_map::add_by_hash(
            db_tx,
            ids,
            wallet_id,
            &std::collections::BTreeMap::new(),
            &address,
            leaf_node,
        )?;

        Ok(StakingKey {
            credential,
            node: leaf_node,
            address,
        })
    }

    /// Reload the account key chain from the database.
    pub fn load(
        db_tx: &impl WalletStorageReadLocked,
        chain_config: Arc<ChainConfig>,
        deriver_id: DeriverId,
        info: &PublicDeriverInfo,
        scheme: WalletScheme,
    ) -> KeyChainResult<Self> {
        let wallet_id = info.wallet_id();
        let account_node = info.account_node();

        let node = db_tx
            .get_derivation_node(&account_node)?
            .ok_or(KeyChainError::CouldNotLoadKeyChain)?;
        let key_row_id = node.public_key_id().ok_or(KeyChainError::CouldNotLoadKeyChain)?;
        let key_row =
            db_tx.get_key_row(&key_row_id)?.ok_or(KeyChainError::CouldNotLoadKeyChain)?;
        let account_pubkey = match key_row.material() {
            KeyMaterial::Plain(bytes) => ExtendedPublicKey::decode(&mut bytes.as_slice())
                .map_err(|_| KeyChainError::CouldNotLoadKeyChain)?,
            KeyMaterial::Encrypted { .. } => return Err(KeyChainError::CouldNotLoadKeyChain),
        };

        let children = db_tx.get_node_children(&account_node)?;

        let staking = match scheme {
            WalletScheme::Cip1852 => {
                let staking_chain_node = *children
                    .get(&NodeChildId::new(account_node, STAKING_CHAIN_INDEX))
                    .ok_or(KeyChainError::CouldNotLoadKeyChain)?;
                let leaf_index = ChildNumber::from_normal(U31::ZERO);
                let leaf_node = *db_tx
                    .get_node_children(&staking_chain_node)?
                    .get(&NodeChildId::new(staking_chain_node, leaf_index))
                    .ok_or(KeyChainError::CouldNotLoadKeyChain)?;

                let staking_pubkey = account_pubkey
                    .clone()
                    .derive_child(STAKING_CHAIN_INDEX)?
                    .derive_child(leaf_index)?;
                let credential = credential_from_key(&staking_pubkey);
                Some(StakingKey {
                    credential,
                    node: leaf_node,
                    address: Address::Account {
                        staking: credential,
                    },
                })
            }
            WalletScheme::Bip44 => None,
        };

        let style = match &staking {
            Some(staking_key) => AddressStyle::Base {
                staking: *staking_key.credential(),
            },
            None => AddressStyle::Enterprise,
        };

        let mut sub_chains_vec = Vec::with_capacity(KeyPurpose::ALL.len());
        for purpose in KeyPurpose::ALL {
            let index = purpose.get_deterministic_index();
            let chain_node = *children
                .get(&NodeChildId::new(account_node, index))
                .ok_or(KeyChainError::CouldNotLoadKeyChain)?;
            let chain_pubkey = account_pubkey.clone().derive_child(index)?;
            sub_chains_vec.push(LeafKeyChain::load(
                db_tx,
                chain_config.clone(),
                wallet_id,
                deriver_id,
                purpose,
                chain_node,
                chain_pubkey,
                style.clone(),
            )?);
        }
        let mut sub_chains_vec = sub_chains_vec.into_iter();
        let sub_chains = WithPurpose::new(
            sub_chains_vec.next().expect("two chains built"),
            sub_chains_vec.next().expect("two chains built"),
        );

        Ok(AccountKeyChain {
            lookahead_size: chain_config.lookahead_size(),
            chain_config,
            wallet_id,
            deriver_id,
            account_pubkey,
            staking,
            sub_chains,
        })
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn deriver_id(&self) -> DeriverId {
        self.deriver_id
    }

    pub fn account_public_key(&self) -> &ExtendedPublicKey {
        &self.account_pubkey
    }

    pub fn staking(&self) -> Option<&StakingKey> {
        self.staking.as_ref()
    }

    pub fn lookahead_size(&self) -> u32 {
        self.lookahead_size
    }

    pub fn sub_chain(&self, purpose: KeyPurpose) -> &LeafKeyChain {
        self.sub_chains.get_for(purpose)
    }

    /// Issue a new address on the given chain.
    pub fn issue_address(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        purpose: KeyPurpose,
    ) -> KeyChainResult<(U31, Address)> {
        let lookahead_size = self.lookahead_size;
        self.sub_chains.mut_for(purpose).issue_new(db_tx, ids, lookahead_size)
    }

    /// Derive addresses until both chains hold the gap limit.
    pub fn top_up_all(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
    ) -> KeyChainResult<()> {
        let lookahead_size = self.lookahead_size;
        self.sub_chains
            .iter_mut()
            .try_for_each(|chain| chain.top_up(db_tx, ids, lookahead_size))
    }

    /// Record on-chain usage of the address with the given payment
    /// credential. Returns true if the credential belongs to this account.
    pub fn mark_credential_as_used(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        credential: &Credential,
    ) -> KeyChainResult<bool> {
        let lookahead_size = self.lookahead_size;
        for chain in self.sub_chains.iter_mut() {
            if chain.mark_credential_as_used(db_tx, ids, credential, lookahead_size)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Add this account's addresses and credentials to an owned-address index.
    pub fn extend_owned_index(&self, index: &mut OwnedAddressIndex) {
        for chain in self.sub_chains.iter() {
            for (digest, row_id) in chain.digest_to_id() {
                index.insert_row(*digest, *row_id);
            }
            for (credential, address_index) in chain.credential_to_index() {
                if let Some(node) = chain.leaf_nodes().get(address_index) {
                    index.insert_payment(*credential, *node);
                }
            }
        }
        if let Some(staking) = &self.staking {
            index.insert_staking(*staking.credential(), staking.node());
        }
    }

    /// Wire bytes of every address this account watches, for history fetches.
    pub fn all_wire_addresses(&self) -> Vec<Vec<u8>> {
        let mut addresses: Vec<Vec<u8>> = self
            .sub_chains
            .iter()
            .flat_map(|chain| chain.addresses().values().map(|address| address.wire_bytes()))
            .collect();
        if let Some(staking) = &self.staking {
            addresses.push(staking.address().wire_bytes());
        }
        addresses
    }

    /// Wire bytes of the unused tip addresses, for usage scans.
    pub fn scan_candidates(&self) -> Vec<Vec<u8>> {
        self.sub_chains.iter().flat_map(|chain| chain.scan_candidates()).collect()
    }

    pub fn chain_config(&self) -> &ChainConfig {
        &self.chain_config
    }
}
