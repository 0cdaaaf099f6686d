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

//! Address deduplication and resolution.
//!
//! Address rows are content-addressed by the digest of their wire bytes, so
//! the same address seen twice never creates two rows. An incoming wire
//! encoding resolves in three ways: it is already known; it reduces to a
//! canonical form whose payment credential the wallet owns, in which case
//! the new variant becomes another row mapped to the same derivation node;
//! or it is foreign and gets a row without any node mapping so transactions
//! touching it can still be displayed.
//!
//! All functions here require a write transaction token; callers that have
//! not opened one cannot reach these tables at all.

use std::collections::{BTreeMap, BTreeSet};

use common::address::{Address, Credential};
use wallet_storage::{WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{AddressDigest, AddressRow, AddressRowId, NextRowIds, NodeId, WalletId};

use crate::WalletResult;

/// The caller-supplied view of which addresses and credentials the wallet
/// owns, assembled from its account key chains.
#[derive(Debug, Default)]
pub struct OwnedAddressIndex {
    digest_to_row: BTreeMap<AddressDigest, AddressRowId>,
    payment_to_node: BTreeMap<Credential, NodeId>,
    staking_to_node: BTreeMap<Credential, NodeId>,
}

impl OwnedAddressIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_row(&mut self, digest: AddressDigest, row: AddressRowId) {
        self.digest_to_row.insert(digest, row);
    }

    pub fn insert_payment(&mut self, credential: Credential, node: NodeId) {
        self.payment_to_node.insert(credential, node);
    }

    pub fn insert_staking(&mut self, credential: Credential, node: NodeId) {
        self.staking_to_node.insert(credential, node);
    }

    pub fn known_rows(&self) -> &BTreeMap<AddressDigest, AddressRowId> {
        &self.digest_to_row
    }

    fn owner_node(&self, address: &Address) -> Option<NodeId> {
        match address {
            Address::Account { staking } => self.staking_to_node.get(staking).copied(),
            _ => address
                .payment_credential()
                .and_then(|credential| self.payment_to_node.get(credential))
                .copied(),
        }
    }
}

/// Register an owned address under its content digest. Idempotent: when a
/// row with the same digest already exists, no second row is created; only
/// the wallet's mapping to the owner node is ensured.
pub fn add_by_hash(
    db_tx: &mut impl WalletStorageWriteLocked,
    ids: &mut NextRowIds,
    wallet_id: WalletId,
    known_own: &BTreeMap<AddressDigest, AddressRowId>,
    address: &Address,
    owner_node: NodeId,
) -> wallet_storage::Result<AddressRowId> {
    let digest = AddressDigest::new(address.digest());

    if let Some(row_id) = known_own.get(&digest) {
        return Ok(*row_id);
    }

    if let Some(row_id) = db_tx.get_address_id_by_digest(&digest)? {
        // The row exists (possibly created as foreign, possibly by another
        // wallet); make sure this wallet's mapping is in place.
        if db_tx.get_address_mapping(&wallet_id, &row_id)?.is_none() {
            db_tx.set_address_mapping(&wallet_id, &row_id, &owner_node)?;
        }
        return Ok(row_id);
    }

    let row_id = ids.next_address_id();
    db_tx.set_address(&row_id, &AddressRow::new(address.clone()))?;
    db_tx.set_address_id_by_digest(&digest, &row_id)?;
    db_tx.set_address_mapping(&wallet_id, &row_id, &owner_node)?;
    Ok(row_id)
}

/// Insert an address the wallet does not own. No node mapping is created.
pub fn insert_foreign(
    db_tx: &mut impl WalletStorageWriteLocked,
    ids: &mut NextRowIds,
    address: &Address,
) -> wallet_storage::Result<AddressRowId> {
    let digest = AddressDigest::new(address.digest());
    if let Some(row_id) = db_tx.get_address_id_by_digest(&digest)? {
        return Ok(row_id);
    }
    let row_id = ids.next_address_id();
    db_tx.set_address(&row_id, &AddressRow::new(address.clone()))?;
    db_tx.set_address_id_by_digest(&digest, &row_id)?;
    Ok(row_id)
}

/// Resolve a batch of wire-encoded addresses to local row ids, creating
/// variant rows for owned credentials and foreign rows for everything else.
/// The input is deduplicated before any lookup.
pub fn hash_to_ids(
    db_tx: &mut impl WalletStorageWriteLocked,
    ids: &mut NextRowIds,
    wallet_id: WalletId,
    own: &OwnedAddressIndex,
    addresses: &[Vec<u8>],
) -> WalletResult<BTreeMap<Vec<u8>, AddressRowId>> {
    let unique: BTreeSet<&Vec<u8>> = addresses.iter().collect();

    let mut resolved = BTreeMap::new();
    for wire in unique {
        let address = Address::from_wire_bytes(wire)?;
        let digest = AddressDigest::new(address.digest());

        // Already known and owned
        if let Some(row_id) = own.known_rows().get(&digest) {
            resolved.insert(wire.clone(), *row_id);
            continue;
        }

        // A credential the wallet owns, under a wire encoding not seen
        // before (the canonical form or any variant reducing to it)
        if let Some(node) = own.owner_node(&address) {
            let row_id = add_by_hash(db_tx, ids, wallet_id, own.known_rows(), &address, node)?;
            resolved.insert(wire.clone(), row_id);
            continue;
        }

        // Truly foreign
        let row_id = insert_foreign(db_tx, ids, &address)?;
        resolved.insert(wire.clone(), row_id);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests;
