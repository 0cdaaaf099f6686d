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

use rstest::rstest;
use test_utils::random::{make_seedable_rng, Seed};

use common::address::pubkeyhash::CREDENTIAL_SIZE;
use common::address::{Address, Credential};
use crypto::random::Rng;
use wallet_storage::{Store, WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{AddressDigest, NextRowIds, NodeId, WalletId};

use super::{add_by_hash, hash_to_ids, insert_foreign, OwnedAddressIndex};

fn make_store() -> Store<storage::InMemory> {
    Store::new(storage::InMemory::new()).unwrap()
}

fn random_credential(rng: &mut impl Rng) -> Credential {
    let mut bytes = [0_u8; CREDENTIAL_SIZE];
    rng.fill(&mut bytes[..]);
    Credential::from_raw(bytes)
}

#[rstest]
#[case(Seed::from_entropy())]
fn same_digest_never_creates_two_rows(#[case] seed: Seed) {
    let mut rng = make_seedable_rng(seed);
    let store = make_store();
    let wallet_id = WalletId::new(0);
    let node = NodeId::new(7);
    let address = Address::Enterprise {
        payment: random_credential(&mut rng),
    };

    let mut db_tx = store.transaction_rw().unwrap();
    let mut ids = NextRowIds::default();

    let first = add_by_hash(&mut db_tx, &mut ids, wallet_id, &BTreeMap::new(), &address, node)
        .unwrap();
    let second = add_by_hash(&mut db_tx, &mut ids, wallet_id, &BTreeMap::new(), &address, node)
        .unwrap();
    assert_eq!(first, second);

    // Also idempotent through the caller-supplied known-own set
    let known: BTreeMap<_, _> =
        [(AddressDigest::new(address.digest()), first)].into_iter().collect();
    let third =
        add_by_hash(&mut db_tx, &mut ids, wallet_id, &known, &address, node).unwrap();
    assert_eq!(first, third);

    assert_eq!(
        db_tx.get_address_mapping(&wallet_id, &first).unwrap(),
        Some(node)
    );
}

#[rstest]
#[case(Seed::from_entropy())]
fn variant_encoding_resolves_to_owned_identity(#[case] seed: Seed) {
    let mut rng = make_seedable_rng(seed);
    let store = make_store();
    let wallet_id = WalletId::new(0);
    let node = NodeId::new(3);

    let payment = random_credential(&mut rng);
    let enterprise = Address::Enterprise { payment };
    let base = Address::Base {
        payment,
        staking: random_credential(&mut rng),
    };

    let mut db_tx = store.transaction_rw().unwrap();
    let mut ids = NextRowIds::default();

    // The wallet owns the enterprise form
    let enterprise_id =
        add_by_hash(&mut db_tx, &mut ids, wallet_id, &BTreeMap::new(), &enterprise, node)
            .unwrap();
    let mut own = OwnedAddressIndex::new();
    own.insert_row(AddressDigest::new(enterprise.digest()), enterprise_id);
    own.insert_payment(payment, node);

    // A base-encoded variant of the same payment credential arrives
    let resolved = hash_to_ids(
        &mut db_tx,
        &mut ids,
        wallet_id,
        &own,
        &[base.wire_bytes(), enterprise.wire_bytes()],
    )
    .unwrap();

    let base_id = resolved[&base.wire_bytes()];
    assert_eq!(resolved[&enterprise.wire_bytes()], enterprise_id);
    assert_ne!(base_id, enterprise_id);

    // The variant is a new row mapped to the same derivation node
    assert_eq!(
        db_tx.get_address_mapping(&wallet_id, &base_id).unwrap(),
        Some(node)
    );
}

#[rstest]
#[case(Seed::from_entropy())]
fn foreign_addresses_get_rows_without_mappings(#[case] seed: Seed) {
    let mut rng = make_seedable_rng(seed);
    let store = make_store();
    let wallet_id = WalletId::new(0);

    let foreign = Address::Base {
        payment: random_credential(&mut rng),
        staking: random_credential(&mut rng),
    };

    let mut db_tx = store.transaction_rw().unwrap();
    let mut ids = NextRowIds::default();
    let own = OwnedAddressIndex::new();

    // Input duplicates collapse before any row is created
    let resolved = hash_to_ids(
        &mut db_tx,
        &mut ids,
        wallet_id,
        &own,
        &[foreign.wire_bytes(), foreign.wire_bytes()],
    )
    .unwrap();
    assert_eq!(resolved.len(), 1);

    let row_id = resolved[&foreign.wire_bytes()];
    assert_eq!(db_tx.get_address_mapping(&wallet_id, &row_id).unwrap(), None);
    assert!(db_tx.get_address(&row_id).unwrap().is_some());

    // Re-registration by digest stays idempotent
    let again = insert_foreign(&mut db_tx, &mut ids, &foreign).unwrap();
    assert_eq!(again, row_id);
}
