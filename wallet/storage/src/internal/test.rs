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

use rstest::rstest;
use test_utils::random::{make_seedable_rng, Seed};

use crypto::key::extended::{ExtendedKeyKind, ExtendedPrivateKey};
use crypto::random::Rng;
use wallet_types::{
    DerivationLevel, KeyDerivationNode, KeyRow, NextRowIds, WalletId, WalletInfo, WalletWrapper,
};

use super::password::password_to_sym_key;
use super::{encrypt_key_material, Store};
use crate::{
    WalletStorageReadLocked, WalletStorageReadUnlocked, WalletStorageWriteLocked,
    CURRENT_STORAGE_VERSION,
};

fn make_store() -> Store<storage::InMemory> {
    Store::new(storage::InMemory::new()).unwrap()
}

// Store an encrypted root key reachable from a wallet wrapper, the way the
// wallet builder lays it out.
fn setup_wallet_with_root(
    store: &Store<storage::InMemory>,
    root: &ExtendedPrivateKey,
    password: &str,
) -> WalletId {
    let (sym_key, challenge) = password_to_sym_key(password).unwrap();
    let material = encrypt_key_material(&sym_key, &challenge, root).unwrap();

    let mut tx = store.transaction_rw().unwrap();
    let mut ids = tx.get_next_row_ids().unwrap();
    let wallet_id = ids.next_wallet_id();
    let key_id = ids.next_key_id();
    let node_id = ids.next_node_id();

    tx.set_wallet(&wallet_id, &WalletInfo::new("test wallet".into(), 2)).unwrap();
    tx.set_key_row(&key_id, &KeyRow::new(root.kind(), material)).unwrap();
    tx.set_derivation_node(&node_id, &KeyDerivationNode::root(Some(key_id), None)).unwrap();
    tx.set_wallet_wrapper(
        &wallet_id,
        &WalletWrapper::new_cip1852(
            DerivationLevel::Root,
            DerivationLevel::Account,
            Some(node_id),
        ),
    )
    .unwrap();
    tx.set_next_row_ids(&ids).unwrap();
    tx.commit().unwrap();

    wallet_id
}

#[test]
fn storage_version_roundtrip() {
    let store = make_store();
    assert_eq!(store.get_storage_version().unwrap(), 0);

    let mut tx = store.transaction_rw().unwrap();
    tx.set_storage_version(CURRENT_STORAGE_VERSION).unwrap();
    tx.commit().unwrap();

    assert_eq!(store.get_storage_version().unwrap(), CURRENT_STORAGE_VERSION);
}

#[test]
fn uncommitted_writes_are_invisible() {
    let store = make_store();

    let mut tx = store.transaction_rw().unwrap();
    tx.set_storage_version(CURRENT_STORAGE_VERSION).unwrap();
    tx.abort();

    assert_eq!(store.get_storage_version().unwrap(), 0);
}

#[rstest]
#[case(Seed::from_entropy())]
fn unlock_and_read_private_key(#[case] seed: Seed) {
    let mut rng = make_seedable_rng(seed);
    let mut entropy = [0_u8; 64];
    rng.fill(&mut entropy[..]);
    let root = ExtendedPrivateKey::new_master(&entropy, ExtendedKeyKind::Ed25519Bip32).unwrap();

    let store = make_store();
    let wallet_id = setup_wallet_with_root(&store, &root, "correct password");

    // Wrong password is recognized before anything is decrypted for use
    assert_eq!(
        store.transaction_rw_unlocked(&wallet_id, "wrong password").err(),
        Some(crate::Error::WalletInvalidPassword)
    );
    assert_eq!(
        store.transaction_rw_unlocked(&wallet_id, "").err(),
        Some(crate::Error::WalletEmptyPassword)
    );

    let unlocked = store.transaction_rw_unlocked(&wallet_id, "correct password").unwrap();
    let key_id = {
        let wrapper = unlocked.get_wallet_wrapper(&wallet_id).unwrap().unwrap();
        let node = unlocked.get_derivation_node(&wrapper.private_root().unwrap()).unwrap().unwrap();
        node.private_key_id().unwrap()
    };
    let decrypted = unlocked.get_private_key(&key_id).unwrap().unwrap();
    assert_eq!(decrypted, root);
}

#[test]
fn unlock_unknown_wallet_fails() {
    let store = make_store();
    assert_eq!(
        store.transaction_rw_unlocked(&WalletId::new(99), "password").err(),
        Some(crate::Error::WalletNotFound(WalletId::new(99)))
    );
}

#[test]
fn next_row_ids_are_persistent() {
    let store = make_store();

    let mut tx = store.transaction_rw().unwrap();
    let mut ids = tx.get_next_row_ids().unwrap();
    assert_eq!(ids, NextRowIds::default());
    let first = ids.next_wallet_id();
    let second = ids.next_wallet_id();
    assert_ne!(first, second);
    tx.set_next_row_ids(&ids).unwrap();
    tx.commit().unwrap();

    let mut ids = store.get_next_row_ids().unwrap();
    let third = ids.next_wallet_id();
    assert_ne!(second, third);
}
