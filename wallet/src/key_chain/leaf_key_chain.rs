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
use std::sync::Arc;

use common::address::{Address, Credential};
use common::chain::ChainConfig;
use crypto::key::extended::ExtendedPublicKey;
use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::derivable::Derivable;
use crypto::key::hdkd::u31::U31;
use utils::ensure;
use wallet_storage::{WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{
    AddressDigest, AddressRowId, ChainAddressId, DeriverId, DeriverPurposeId, KeyPurpose,
    KeychainUsageState, NextRowIds, NodeId, WalletId,
};

use crate::address_map;
use crate::key_chain::{
    add_child_node, add_public_key_row, credential_from_key, AddressStyle, KeyChainError,
    KeyChainResult,
};

/// One derivation chain of an account: the external or the internal
/// addresses. Uses soft derivation from the chain-level public key, so new
/// addresses can be derived without any private material.
pub struct LeafKeyChain {
    chain_config: Arc<ChainConfig>,

    wallet_id: WalletId,
    deriver_id: DeriverId,
    purpose: KeyPurpose,

    /// The tree node the leaves of this chain hang off.
    chain_node: NodeId,
    /// The chain-level public key the leaves are derived from.
    parent_pubkey: ExtendedPublicKey,
    /// The shape of addresses this chain generates.
    style: AddressStyle,

    /// The derived addresses, by index. Derived as needed to keep the gap.
    addresses: BTreeMap<U31, Address>,
    address_ids: BTreeMap<U31, AddressRowId>,
    leaf_nodes: BTreeMap<U31, NodeId>,
    digest_to_id: BTreeMap<AddressDigest, AddressRowId>,
    credential_to_index: BTreeMap<Credential, U31>,

    usage_state: KeychainUsageState,
}

impl LeafKeyChain {
    #[allow(clippy::too_many_arguments)]
    pub fn new_empty(
        chain_config: Arc<ChainConfig>,
        wallet_id: WalletId,
        deriver_id: DeriverId,
        purpose: KeyPurpose,
        chain_node: NodeId,
        parent_pubkey: ExtendedPublicKey,
        style: AddressStyle,
    ) -> Self {
        Self {
            chain_config,
            wallet_id,
            deriver_id,
            purpose,
            chain_node,
            parent_pubkey,
            style,
            addresses: BTreeMap::new(),
            address_ids: BTreeMap::new(),
            leaf_nodes: BTreeMap::new(),
            digest_to_id: BTreeMap::new(),
            credential_to_index: BTreeMap::new(),
            usage_state: KeychainUsageState::default(),
        }
    }

    /// Restore the chain state from the database.
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        db_tx: &impl WalletStorageReadLocked,
        chain_config: Arc<ChainConfig>,
        wallet_id: WalletId,
        deriver_id: DeriverId,
        purpose: KeyPurpose,
        chain_node: NodeId,
        parent_pubkey: ExtendedPublicKey,
        style: AddressStyle,
    ) -> KeyChainResult<Self> {
        let purpose_id = DeriverPurposeId::new(deriver_id, purpose);
        let usage_state = db_tx
            .get_keychain_usage_state(&purpose_id)?
            .ok_or(KeyChainError::MissingDatabaseProperty("keychain usage state"))?;

        let mut chain = Self::new_empty(
            chain_config,
            wallet_id,
            deriver_id,
            purpose,
            chain_node,
            parent_pubkey,
            style,
        );
        chain.usage_state = usage_state;

        for (index, address_id) in db_tx.get_chain_addresses(&purpose_id)? {
            let row = db_tx
                .get_address(&address_id)?
                .ok_or(KeyChainError::CouldNotLoadKeyChain)?;
            let node = db_tx
                .get_address_mapping(&wallet_id, &address_id)?
                .ok_or(KeyChainError::CouldNotLoadKeyChain)?;
            let address = row.address().clone();
            let credential =
                *address.payment_credential().ok_or(KeyChainError::CouldNotLoadKeyChain)?;

            chain.digest_to_id.insert(row.digest(), address_id);
            chain.credential_to_index.insert(credential, index);
            chain.addresses.insert(index, address);
            chain.address_ids.insert(index, address_id);
            chain.leaf_nodes.insert(index, node);
        }

        Ok(chain)
    }

    pub fn purpose(&self) -> KeyPurpose {
        self.purpose
    }

    pub fn usage_state(&self) -> &KeychainUsageState {
        &self.usage_state
    }

    pub fn last_used(&self) -> Option<U31> {
        self.usage_state.last_used()
    }

    pub fn last_issued(&self) -> Option<U31> {
        self.usage_state.last_issued()
    }

    pub fn addresses(&self) -> &BTreeMap<U31, Address> {
        &self.addresses
    }

    pub fn address_ids(&self) -> &BTreeMap<U31, AddressRowId> {
        &self.address_ids
    }

    pub fn leaf_nodes(&self) -> &BTreeMap<U31, NodeId> {
        &self.leaf_nodes
    }

    pub fn digest_to_id(&self) -> &BTreeMap<AddressDigest, AddressRowId> {
        &self.digest_to_id
    }

    pub fn credential_to_index(&self) -> &BTreeMap<Credential, U31> {
        &self.credential_to_index
    }

    /// Wire bytes of the derived addresses past the last used one; the
    /// candidates an address scan asks the remote about.
    pub fn scan_candidates(&self) -> Vec<Vec<u8>> {
        let first_unused = match self.last_used() {
            None => U31::ZERO,
            Some(last_used) => match last_used.plus_one() {
                Ok(next) => next,
                Err(_) => return Vec::new(),
            },
        };
        self.addresses
            .range(first_unused..)
            .map(|(_, address)| address.wire_bytes())
            .collect()
    }

    /// The addresses issued to the user so far.
    pub fn get_all_issued_addresses(&self) -> BTreeMap<U31, Address> {
        let last_issued = match self.last_issued() {
            Some(index) => index,
            None => return BTreeMap::new(),
        };
        self.addresses
            .iter()
            .filter(|(index, _)| **index <= last_issued)
            .map(|(index, address)| (*index, address.clone()))
            .collect()
    }

    fn save_usage_state(
        &self,
        db_tx: &mut impl WalletStorageWriteLocked,
    ) -> KeyChainResult<()> {
        db_tx
            .set_keychain_usage_state(
                &DeriverPurposeId::new(self.deriver_id, self.purpose),
                &self.usage_state,
            )
            .map_err(KeyChainError::DatabaseError)
    }

    /// Derive the address at `index` and persist its leaf node, address row
    /// and mapping. No effect on the used/issued state.
    fn derive_and_add_key(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        index: U31,
    ) -> KeyChainResult<Address> {
        if let Some(address) = self.addresses.get(&index) {
            return Ok(address.clone());
        }

        let child_number = ChildNumber::from_normal(index);
        let derived_key = self.parent_pubkey.clone().derive_child(child_number)?;
        let credential = credential_from_key(&derived_key);
        let address = self.style.make_address(credential);

        let key_row = add_public_key_row(db_tx, ids, &derived_key)?;
        let node = add_child_node(db_tx, ids, self.chain_node, child_number, None, Some(key_row))?;

        let address_id = address_map::add_by_hash(
            db_tx,
            ids,
            self.wallet_id,
            &self.digest_to_id,
            &address,
            node,
        )?;
        db_tx.set_chain_address(
            &ChainAddressId::new(self.deriver_id, self.purpose, index),
            &address_id,
        )?;

        log::debug!(
            "new address: {}, index: {}, purpose {:?}",
            address,
            index,
            self.purpose
        );

        self.digest_to_id.insert(AddressDigest::new(address.digest()), address_id);
        self.credential_to_index.insert(credential, index);
        self.addresses.insert(index, address.clone());
        self.address_ids.insert(index, address_id);
        self.leaf_nodes.insert(index, node);

        Ok(address)
    }

    /// Index the next issued address would get, checked against the gap.
    fn get_new_issued_index(&self, lookahead_size: u32) -> KeyChainResult<U31> {
        let new_issued_index = match self.last_issued() {
            None => U31::ZERO,
            Some(last_issued) => last_issued.plus_one()?,
        };

        let lookahead_exceeded = match self.last_used() {
            None => new_issued_index.into_u32() >= lookahead_size,
            Some(last_used_index) => {
                new_issued_index.into_u32() > last_used_index.into_u32() + lookahead_size
            }
        };
        ensure!(!lookahead_exceeded, KeyChainError::LookAheadExceeded);

        Ok(new_issued_index)
    }

    /// Issue a new address that hasn't been handed out before.
    pub fn issue_new(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        lookahead_size: u32,
    ) -> KeyChainResult<(U31, Address)> {
        let new_issued_index = self.get_new_issued_index(lookahead_size)?;
        let address = self.derive_and_add_key(db_tx, ids, new_issued_index)?;

        self.usage_state.increment_up_to_last_issued(new_issued_index);
        self.save_usage_state(db_tx)?;

        Ok((new_issued_index, address))
    }

    /// Derive addresses until `lookahead_size` unused ones exist past the
    /// last used index. No effect when the gap already holds.
    pub fn top_up(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        lookahead_size: u32,
    ) -> KeyChainResult<()> {
        let starting_index = match self.addresses.keys().last() {
            None => 0,
            Some(last_derived) => last_derived.into_u32() + 1,
        };

        let up_to_index = match self.last_used() {
            None => lookahead_size,
            Some(last_used) => last_used.into_u32() + lookahead_size + 1,
        };

        for index in starting_index..up_to_index {
            if let Some(index) = U31::from_u32(index) {
                self.derive_and_add_key(db_tx, ids, index)?;
            }
        }

        Ok(())
    }

    /// Record chain activity for the address with the given payment
    /// credential: advance the used pointer, flag the row, and restore the
    /// gap. Returns false if the credential is not part of this chain.
    pub fn mark_credential_as_used(
        &mut self,
        db_tx: &mut impl WalletStorageWriteLocked,
        ids: &mut NextRowIds,
        credential: &Credential,
        lookahead_size: u32,
    ) -> KeyChainResult<bool> {
        let index = match self.credential_to_index.get(credential) {
            Some(index) => *index,
            None => return Ok(false),
        };

        self.usage_state.increment_up_to_last_used(index);
        self.save_usage_state(db_tx)?;

        let address_id =
            *self.address_ids.get(&index).expect("credential index implies address");
        let mut row = db_tx
            .get_address(&address_id)?
            .ok_or(KeyChainError::MissingDatabaseProperty("address row"))?;
        if !row.is_used() {
            row.set_used();
            db_tx.set_address(&address_id, &row)?;
        }

        self.top_up(db_tx, ids, lookahead_size)?;
        Ok(true)
    }

    pub fn chain_config(&self) -> &ChainConfig {
        &self.chain_config
    }
}
