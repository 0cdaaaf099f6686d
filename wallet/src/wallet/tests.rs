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
use common::chain::config::Builder as ConfigBuilder;
use common::chain::{ChainConfig, ChainKind};
use common::primitives::{hash_bytes, Amount, BlockHeight, EpochIndex, SlotNumber};
use crypto::key::extended::ExtendedPrivateKey;
use crypto::key::hdkd::u31::U31;
use node_comm::mock::MockChainBackend;
use node_comm::types::{BestBlock, RemoteBlockInfo, RemoteInput, RemoteOutput, RemoteTransaction};
use storage::InMemory;
use wallet_storage::{Store, WalletStorageReadLocked};
use wallet_types::{
    BlockHash, KeyPurpose, NextRowIds, TokenBundle, TxDigest, TxHash, TxRowId, TxState,
};

use crate::builder::WalletBuilder;
use crate::key_chain::{KeyChainError, MasterKeyChain, WalletScheme};
use crate::sync::SyncOutcome;
use crate::wallet::Wallet;
use crate::WalletError;

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const PASSWORD: &str = "a strong enough password";

fn test_config(lookahead: u32, stability_depth: u64) -> Arc<ChainConfig> {
    Arc::new(
        ConfigBuilder::new(ChainKind::Regtest)
            .lookahead_size(lookahead)
            .stability_depth(stability_depth)
            .build(),
    )
}

fn make_store() -> Store<InMemory> {
    let _ = env_logger::builder().is_test(true).try_init();
    Store::new(InMemory::new()).unwrap()
}

fn make_wallet(chain_config: Arc<ChainConfig>, db: Store<InMemory>) -> Wallet<InMemory> {
    Wallet::create_software(
        chain_config,
        db,
        "test wallet",
        MNEMONIC,
        None,
        PASSWORD,
        WalletScheme::Cip1852,
        &["main account"],
    )
    .unwrap()
}

fn tx_hash(n: u64) -> TxHash {
    TxHash::new(hash_bytes(&n.to_be_bytes()))
}

fn block_at(height: u64, tx_ordinal: u32) -> RemoteBlockInfo {
    RemoteBlockInfo {
        hash: BlockHash::new(hash_bytes(&(1_000_000 + height).to_be_bytes())),
        height: BlockHeight::new(height),
        slot: SlotNumber::new(height * 20),
        epoch: EpochIndex::new(height / 100),
        tx_ordinal,
    }
}

fn best_at(height: u64) -> BestBlock {
    let block = block_at(height, 0);
    BestBlock {
        hash: block.hash,
        height: block.height,
        slot: block.slot,
        epoch: block.epoch,
    }
}

fn coin(atoms: u128) -> TokenBundle {
    TokenBundle::from_coin(Amount::from_atoms(atoms))
}

fn foreign_wire(n: u64) -> Vec<u8> {
    Address::Enterprise {
        payment: Credential::from_public_key_bytes(&n.to_be_bytes()),
    }
    .wire_bytes()
}

fn incoming_tx(
    n: u64,
    block: Option<RemoteBlockInfo>,
    to_wire: Vec<u8>,
    atoms: u128,
) -> RemoteTransaction {
    RemoteTransaction {
        hash: tx_hash(n),
        block,
        success: true,
        inputs: vec![RemoteInput {
            address: foreign_wire(n + 500),
            value: coin(atoms),
            source_tx: tx_hash(n + 900),
            source_index: 0,
        }],
        outputs: vec![RemoteOutput {
            address: to_wire,
            value: coin(atoms),
        }],
        withdrawals: Vec::new(),
        certificates: Vec::new(),
        tokens: Vec::new(),
    }
}

fn external_wire(wallet: &Wallet<InMemory>, index: u32) -> Vec<u8> {
    let deriver = wallet.deriver_ids()[0];
    wallet
        .account(deriver)
        .unwrap()
        .sub_chain(KeyPurpose::External)
        .addresses()
        .get(&U31::from_u32(index).unwrap())
        .unwrap()
        .wire_bytes()
}

fn transactions_by_state(
    db: &Store<InMemory>,
    wallet: &Wallet<InMemory>,
) -> BTreeMap<TxRowId, TxState> {
    let db_tx = db.transaction_ro().unwrap();
    db_tx
        .get_transactions(&wallet.wallet_id())
        .unwrap()
        .into_iter()
        .map(|(id, tx)| (id, tx.state()))
        .collect()
}

/// An output must be unspent exactly when no stored, non-rolled-back
/// transaction consumes it as an input.
fn assert_utxo_conservation(db: &Store<InMemory>, wallet: &Wallet<InMemory>) {
    let db_tx = db.transaction_ro().unwrap();
    let wallet_id = wallet.wallet_id();
    let txs = db_tx.get_transactions(&wallet_id).unwrap();

    for (tx_row_id, tx) in &txs {
        for (outpoint, output) in db_tx.get_utxo_outputs(tx_row_id).unwrap() {
            let consumed = txs.iter().any(|(consumer_id, consumer)| {
                let consumes = match consumer.state() {
                    TxState::InBlock { .. } | TxState::Pending | TxState::NotInRemote => true,
                    TxState::Failed { .. } | TxState::RollbackFailed => false,
                };
                consumes
                    && db_tx.get_utxo_inputs(consumer_id).unwrap().values().any(|input| {
                        input.source().tx_hash == *tx.hash()
                            && input.source().index == outpoint.index()
                    })
            });
            assert_eq!(
                output.is_unspent(),
                !consumed,
                "utxo conservation violated at {:?}",
                outpoint
            );
        }
    }
}

#[test]
fn wallet_creation_yields_gap_and_null_sync_position() {
    let db = make_store();
    let wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let account = wallet.account(deriver).unwrap();

    for purpose in KeyPurpose::ALL {
        let chain = account.sub_chain(purpose);
        assert_eq!(chain.addresses().len(), 20);
        assert_eq!(chain.last_used(), None);
        assert_eq!(chain.last_issued(), None);
    }

    let sync_info = wallet.get_last_sync_info(deriver).unwrap();
    assert_eq!(sync_info.slot(), None);
    assert_eq!(sync_info.block_hash(), None);
    assert_eq!(sync_info.height(), BlockHeight::zero());

    assert!(transactions_by_state(&db, &wallet).is_empty());
    assert_eq!(wallet.get_balance().unwrap(), TokenBundle::default());
}

#[test]
fn failed_construction_leaves_no_partial_wallet() {
    let chain_config = test_config(20, 10);
    let db = make_store();
    let root =
        MasterKeyChain::mnemonic_to_root_key(MNEMONIC, None, WalletScheme::Cip1852).unwrap();

    // The empty password fails the root-encryption step, after the wallet
    // and wrapper steps already executed inside the transaction
    let result = WalletBuilder::new(&db, chain_config)
        .create_wallet("doomed wallet")
        .with_cip1852_wrapper()
        .with_encrypted_root(root, "")
        .add_public_deriver("main account")
        .commit();
    assert_eq!(
        result.unwrap_err(),
        WalletError::DatabaseError(wallet_storage::Error::WalletEmptyPassword)
    );

    let db_tx = db.transaction_ro().unwrap();
    assert!(db_tx.get_wallets().unwrap().is_empty());
    assert!(db_tx.get_public_derivers().unwrap().is_empty());
    assert_eq!(db_tx.get_next_row_ids().unwrap(), NextRowIds::default());
    assert_eq!(db_tx.get_storage_version().unwrap(), 0);
}

#[test]
fn incoming_transaction_marks_used_and_restores_gap() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let to_wire = external_wire(&wallet, 0);

    let backend = MockChainBackend::new(best_at(100));
    backend.push_transaction(incoming_tx(1, Some(block_at(100, 0)), to_wire, 1_000));

    let outcome = wallet.sync_once(&backend, deriver, 12_345).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            new_transactions: 1,
            updated_transactions: 0
        }
    );

    let account = wallet.account(deriver).unwrap();
    let external = account.sub_chain(KeyPurpose::External);
    // Address #0 is used and #20 was derived to restore the gap
    assert_eq!(external.last_used(), Some(U31::ZERO));
    assert_eq!(external.addresses().len(), 21);
    {
        let db_tx = db.transaction_ro().unwrap();
        let address_id = external.address_ids().get(&U31::ZERO).unwrap();
        assert!(db_tx.get_address(address_id).unwrap().unwrap().is_used());
    }

    // Exactly one UTXO exists, unspent
    let spendable = wallet.get_spendable_utxos().unwrap();
    assert_eq!(spendable.len(), 1);
    assert!(spendable[0].1.is_unspent());
    assert_eq!(wallet.get_balance().unwrap(), coin(1_000));

    let sync_info = wallet.get_last_sync_info(deriver).unwrap();
    assert_eq!(sync_info.height(), BlockHeight::new(100));
    assert_eq!(sync_info.time(), Some(12_345));
    assert!(sync_info.slot().is_some());

    assert_utxo_conservation(&db, &wallet);
}

#[test]
fn sync_is_idempotent_against_unchanged_remote() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let to_wire = external_wire(&wallet, 0);

    let backend = MockChainBackend::new(best_at(100));
    backend.push_transaction(incoming_tx(1, Some(block_at(100, 0)), to_wire, 1_000));

    wallet.sync_once(&backend, deriver, 1_000).unwrap();
    let before = transactions_by_state(&db, &wallet);
    let balance_before = wallet.get_balance().unwrap();

    let outcome = wallet.sync_once(&backend, deriver, 2_000).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            new_transactions: 0,
            updated_transactions: 0
        }
    );
    assert_eq!(transactions_by_state(&db, &wallet), before);
    assert_eq!(wallet.get_balance().unwrap(), balance_before);

    let external_count = wallet
        .account(deriver)
        .unwrap()
        .sub_chain(KeyPurpose::External)
        .addresses()
        .len();
    assert_eq!(external_count, 21);
}

#[test]
fn variant_encoding_resolves_to_the_same_identity() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];

    // The wallet derives base addresses; the remote reports activity under
    // the enterprise encoding of the same payment credential
    let base = Address::from_wire_bytes(&external_wire(&wallet, 0)).unwrap();
    let enterprise = base.to_canonical().unwrap();
    assert_ne!(base.digest(), enterprise.digest());

    let backend = MockChainBackend::new(best_at(50));
    backend.push_transaction(incoming_tx(
        1,
        Some(block_at(50, 0)),
        enterprise.wire_bytes(),
        700,
    ));

    wallet.sync_once(&backend, deriver, 1_000).unwrap();

    // The variant row exists next to the base row and maps to the same node
    {
        use wallet_types::AddressDigest;
        let db_tx = db.transaction_ro().unwrap();
        let base_id = db_tx
            .get_address_id_by_digest(&AddressDigest::new(base.digest()))
            .unwrap()
            .unwrap();
        let variant_id = db_tx
            .get_address_id_by_digest(&AddressDigest::new(enterprise.digest()))
            .unwrap()
            .unwrap();
        assert_ne!(base_id, variant_id);
        let base_node = db_tx.get_address_mapping(&wallet.wallet_id(), &base_id).unwrap();
        let variant_node = db_tx.get_address_mapping(&wallet.wallet_id(), &variant_id).unwrap();
        assert!(base_node.is_some());
        assert_eq!(base_node, variant_node);
    }

    // The chain sees the usage and the output counts as ours
    let external = wallet.account(deriver).unwrap().sub_chain(KeyPurpose::External);
    assert_eq!(external.last_used(), Some(U31::ZERO));
    assert_eq!(wallet.get_balance().unwrap(), coin(700));
}

#[test]
fn pending_transaction_confirms_in_place() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let to_wire = external_wire(&wallet, 0);

    let backend = MockChainBackend::new(best_at(7));
    backend.push_transaction(incoming_tx(1, None, to_wire.clone(), 900));

    wallet.sync_once(&backend, deriver, 1_000).unwrap();
    let before = transactions_by_state(&db, &wallet);
    assert_eq!(before.len(), 1);
    let (tx_row_id, state) = before.into_iter().next().unwrap();
    assert_eq!(state, TxState::Pending);
    // A pending transaction is not spendable balance yet
    assert_eq!(wallet.get_balance().unwrap(), TokenBundle::default());

    // The same transaction is now anchored remotely
    backend.remove_transaction(&tx_hash(1));
    backend.push_transaction(incoming_tx(1, Some(block_at(8, 3)), to_wire, 900));
    backend.set_best_block(best_at(9));

    let outcome = wallet.sync_once(&backend, deriver, 2_000).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            new_transactions: 0,
            updated_transactions: 1
        }
    );

    let after = transactions_by_state(&db, &wallet);
    assert_eq!(after.len(), 1);
    let (confirmed_id, confirmed_state) = after.into_iter().next().unwrap();
    // Updated in place under the same row id; the hash never changed
    assert_eq!(confirmed_id, tx_row_id);
    assert!(matches!(confirmed_state, TxState::InBlock { tx_ordinal: 3, .. }));
    assert_eq!(wallet.get_balance().unwrap(), coin(900));
}

#[test]
fn orphaned_pending_transaction_is_flagged_not_deleted() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let to_wire = external_wire(&wallet, 0);

    let backend = MockChainBackend::new(best_at(10));
    backend.push_transaction(incoming_tx(1, None, to_wire, 300));
    wallet.sync_once(&backend, deriver, 1_000).unwrap();

    // The remote stops reporting the pending transaction
    backend.remove_transaction(&tx_hash(1));
    backend.set_best_block(best_at(11));
    wallet.sync_once(&backend, deriver, 2_000).unwrap();

    let states: Vec<TxState> = transactions_by_state(&db, &wallet).into_values().collect();
    assert_eq!(states, vec![TxState::NotInRemote]);

    // Kept for display in the history listing
    assert_eq!(wallet.get_transactions_page(0, 10).unwrap().len(), 1);
}

#[test]
fn rollback_compensation_reverts_above_the_retained_tip() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(5, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let addr0 = external_wire(&wallet, 0);
    let addr1 = external_wire(&wallet, 1);

    let backend = MockChainBackend::new(best_at(5));
    backend.push_transaction(incoming_tx(1, Some(block_at(5, 0)), addr0.clone(), 100));
    wallet.sync_once(&backend, deriver, 1_000).unwrap();

    // A second transaction, high on the chain, spends the first one's output
    let spend = RemoteTransaction {
        hash: tx_hash(2),
        block: Some(block_at(100, 0)),
        success: true,
        inputs: vec![RemoteInput {
            address: addr0,
            value: coin(100),
            source_tx: tx_hash(1),
            source_index: 0,
        }],
        outputs: vec![
            RemoteOutput {
                address: addr1,
                value: coin(60),
            },
            RemoteOutput {
                address: foreign_wire(77),
                value: coin(40),
            },
        ],
        withdrawals: Vec::new(),
        certificates: Vec::new(),
        tokens: Vec::new(),
    };
    backend.push_transaction(spend);
    backend.set_best_block(best_at(105));
    wallet.sync_once(&backend, deriver, 2_000).unwrap();

    assert_eq!(wallet.get_balance().unwrap(), coin(60));
    assert_utxo_conservation(&db, &wallet);

    // The remote reorganizes: everything above height 50 is gone, and the
    // replacement branch has grown back to a similar height
    backend.rollback_to_height(BlockHeight::new(50));
    backend.set_best_block(best_at(102));

    let outcome = wallet.sync_once(&backend, deriver, 3_000).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::RolledBack {
            to_height: BlockHeight::new(5)
        }
    );

    // The spender is rolled back, the first transaction is retained, and
    // the output it consumed is unspent again
    let states: BTreeMap<TxHash, TxState> = {
        let db_tx = db.transaction_ro().unwrap();
        db_tx
            .get_transactions(&wallet.wallet_id())
            .unwrap()
            .into_values()
            .map(|tx| (*tx.hash(), tx.state()))
            .collect()
    };
    assert!(matches!(states[&tx_hash(1)], TxState::InBlock { .. }));
    assert_eq!(states[&tx_hash(2)], TxState::RollbackFailed);

    let sync_info = wallet.get_last_sync_info(deriver).unwrap();
    assert_eq!(sync_info.height(), BlockHeight::new(5));
    assert_eq!(sync_info.block_hash(), Some(&block_at(5, 0).hash));

    assert_eq!(wallet.get_balance().unwrap(), coin(100));
    assert_utxo_conservation(&db, &wallet);

    // Forward sync afterwards reconstructs a consistent state from the
    // retained tip
    let outcome = wallet.sync_once(&backend, deriver, 4_000).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            new_transactions: 0,
            updated_transactions: 0
        }
    );
    assert_eq!(wallet.get_balance().unwrap(), coin(100));
    assert_eq!(
        wallet.get_last_sync_info(deriver).unwrap().height(),
        BlockHeight::new(102)
    );
    assert_utxo_conservation(&db, &wallet);
}

#[test]
fn local_far_ahead_of_remote_skips_the_cycle() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db);
    let deriver = wallet.deriver_ids()[0];

    let backend = MockChainBackend::new(best_at(100));
    wallet.sync_once(&backend, deriver, 1_000).unwrap();
    assert_eq!(
        wallet.get_last_sync_info(deriver).unwrap().height(),
        BlockHeight::new(100)
    );

    // The remote restarted and reports a much lower, not yet trustworthy tip
    backend.set_best_block(best_at(50));
    let outcome = wallet.sync_once(&backend, deriver, 2_000).unwrap();
    assert_eq!(outcome, SyncOutcome::SkippedStale);
    assert_eq!(
        wallet.get_last_sync_info(deriver).unwrap().height(),
        BlockHeight::new(100)
    );
}

#[test]
fn change_password_requires_the_old_one() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db);

    assert_eq!(
        wallet.change_password("wrong password", "irrelevant").unwrap_err(),
        WalletError::DatabaseError(wallet_storage::Error::WalletInvalidPassword)
    );

    wallet.change_password(PASSWORD, "the new password").unwrap();

    // The old password stopped working; the new one unlocks
    assert_eq!(
        wallet.change_password(PASSWORD, "whatever").unwrap_err(),
        WalletError::DatabaseError(wallet_storage::Error::WalletInvalidPassword)
    );
    wallet.change_password("the new password", PASSWORD).unwrap();
}

#[test]
fn issuing_past_the_gap_limit_is_rejected() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(3, 10), db);
    let deriver = wallet.deriver_ids()[0];

    for expected_index in 0..3_u32 {
        let (index, _address) =
            wallet.issue_address(deriver, KeyPurpose::External).unwrap();
        assert_eq!(index.into_u32(), expected_index);
    }

    assert_eq!(
        wallet.issue_address(deriver, KeyPurpose::External).unwrap_err(),
        WalletError::KeyChain(KeyChainError::LookAheadExceeded)
    );
}

#[test]
fn hardware_wallet_attaches_a_device_key() {
    let chain_config = test_config(20, 10);
    let db = make_store();

    // Simulate the signing bridge: the device holds the root and exports
    // only the account-level public key plus its metadata
    let device_master =
        ExtendedPrivateKey::new_master(&[7_u8; 64], WalletScheme::Cip1852.key_kind()).unwrap();
    let account_pubkey = MasterKeyChain::derive_account_key(
        &chain_config,
        &device_master,
        WalletScheme::Cip1852,
        U31::ZERO,
    )
    .unwrap()
    .to_public_key();

    let hw_data = wallet_types::HardwareWalletData {
        device_vendor: "acme".into(),
        device_model: "signer one".into(),
        device_id: "0451".into(),
    };

    let wallet = Wallet::create_hardware(
        chain_config.clone(),
        db.clone(),
        "hw wallet",
        account_pubkey.clone(),
        hw_data,
        WalletScheme::Cip1852,
        "main account",
    )
    .unwrap();

    let deriver = wallet.deriver_ids()[0];
    let account = wallet.account(deriver).unwrap();
    assert_eq!(account.account_public_key(), &account_pubkey);
    assert_eq!(account.sub_chain(KeyPurpose::External).addresses().len(), 20);

    {
        let db_tx = db.transaction_ro().unwrap();
        let info = db_tx.get_wallet(&wallet.wallet_id()).unwrap().unwrap();
        assert_eq!(info.hardware().unwrap().device_vendor, "acme");
    }
    // No private root exists to unlock
    assert_eq!(
        db.transaction_rw_unlocked(&wallet.wallet_id(), PASSWORD).err(),
        Some(wallet_storage::Error::MissingRootKey(wallet.wallet_id()))
    );

    // A device key cannot back more than one public deriver
    let result = WalletBuilder::new(&db, chain_config)
        .create_wallet("second hw wallet")
        .with_cip1852_wrapper()
        .with_adhoc_public_root(
            account_pubkey,
            wallet_types::HardwareWalletData {
                device_vendor: "acme".into(),
                device_model: "signer one".into(),
                device_id: "0452".into(),
            },
        )
        .add_public_deriver("first")
        .add_public_deriver("second")
        .commit();
    assert_eq!(result.unwrap_err(), WalletError::AdHocSingleDeriver);

    // And the failed attempt left nothing behind
    let db_tx = db.transaction_ro().unwrap();
    assert_eq!(db_tx.get_wallets().unwrap().len(), 1);
}

#[test]
fn remove_wallet_clears_everything_it_owns() {
    let db = make_store();
    let mut wallet = make_wallet(test_config(20, 10), db.clone());
    let deriver = wallet.deriver_ids()[0];
    let to_wire = external_wire(&wallet, 0);

    let backend = MockChainBackend::new(best_at(100));
    backend.push_transaction(incoming_tx(1, Some(block_at(100, 0)), to_wire, 1_000));
    wallet.sync_once(&backend, deriver, 1_000).unwrap();

    let wallet_id = wallet.wallet_id();
    let account_node = wallet.account(deriver).unwrap().sub_chain(KeyPurpose::External);
    let sample_leaf_node = *account_node.leaf_nodes().get(&U31::ZERO).unwrap();

    wallet.remove_wallet().unwrap();

    let db_tx = db.transaction_ro().unwrap();
    assert!(db_tx.get_wallets().unwrap().is_empty());
    assert!(db_tx.get_public_derivers().unwrap().is_empty());
    assert!(db_tx.get_transactions(&wallet_id).unwrap().is_empty());
    assert!(db_tx.get_blocks().unwrap().is_empty());
    assert!(db_tx.get_derivation_node(&sample_leaf_node).unwrap().is_none());
    assert!(db_tx.get_address_mappings(&wallet_id).unwrap().is_empty());
}

#[test]
fn second_sync_digest_lookup_uses_tx_digest_not_hash() {
    // The local lookup digest is derived from the hash but distinct from it
    let hash = tx_hash(42);
    let digest = TxDigest::from_tx_hash(&hash);
    assert_ne!(digest.as_hash(), hash.as_hash());
    assert_eq!(digest, TxDigest::from_tx_hash(&hash));
}
