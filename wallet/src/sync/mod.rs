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

//! Incremental synchronization against the chain backend.
//!
//! A sync cycle runs per public deriver: check staleness against the remote
//! tip, extend the address chains with the remote's usage information,
//! fetch the transaction history anchored after the best locally-confirmed
//! transaction, and reconcile it into the store. All network calls happen
//! before the reconciliation transaction opens, so an abandoned cycle
//! leaves no trace; the reconciliation itself is one atomic transaction
//! that is aborted as stale if a concurrent cycle advanced the sync
//! pointer in the meantime.
//!
//! When the backend reports that the anchor is gone from the chain, the
//! cycle runs rollback compensation instead of forward reconciliation;
//! the two are mutually exclusive per cycle.

mod rollback;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use common::address::Address;
use common::chain::ChainConfig;
use common::primitives::BlockHeight;
use node_comm::types::{
    BestBlock, RemoteBlockInfo, RemoteCertificate, RemoteTransaction, TxAnchor,
};
use node_comm::{BackendError, ChainBackend};
use wallet_storage::{Store, StoreTxRw, WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{
    AccountingInputRow, AccountingOutputRow, BlockRow, BlockRowId, Certificate, DeriverId,
    LastSyncInfo, NextRowIds, OutPoint, TokenInfo, TxDigest, TxHashOutPoint, TxRow, TxRowId,
    TxState, UtxoInputRow, UtxoOutputRow, WalletId,
};

use crate::address_map::{self, OwnedAddressIndex};
use crate::key_chain::AccountKeyChain;
use crate::ledger;
use crate::wallet::Wallet;
use crate::{SyncError, WalletError, WalletResult};

/// What a sync cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Forward reconciliation was applied.
    Synced {
        new_transactions: usize,
        updated_transactions: usize,
    },
    /// The local position is ahead of the remote by more than the stability
    /// depth; nothing was done.
    SkippedStale,
    /// Rollback compensation was applied, retaining everything at or below
    /// the given height.
    RolledBack { to_height: BlockHeight },
    /// A concurrent cycle moved the sync pointer past the snapshot this
    /// cycle planned against; nothing was written.
    AbortedStale,
}

/// The pieces of a wallet a sync cycle works with, borrowed separately so
/// the account chains can be extended while the store handle stays shared.
pub(crate) struct SyncParts<'w, B: storage::Backend> {
    pub db: &'w Store<B>,
    pub chain_config: &'w Arc<ChainConfig>,
    pub wallet_id: WalletId,
    pub accounts: &'w mut BTreeMap<DeriverId, AccountKeyChain>,
}

/// Run one sync cycle for the given public deriver.
pub fn sync_once<B: storage::Backend, N: ChainBackend>(
    wallet: &mut Wallet<B>,
    backend: &N,
    deriver_id: DeriverId,
    now: u64,
) -> Result<SyncOutcome, SyncError<N::Error>> {
    let parts = wallet.sync_parts();
    if !parts.accounts.contains_key(&deriver_id) {
        return Err(SyncError::Wallet(WalletError::NoDeriverFound(deriver_id)));
    }

    // Snapshot the position this cycle plans against
    let last_sync = {
        let db_tx = parts.db.transaction_ro().map_err(WalletError::from)?;
        db_tx.get_last_sync_info(&deriver_id).map_err(WalletError::from)?.unwrap_or_default()
    };

    let best = backend.get_best_block().map_err(SyncError::Backend)?;

    // Local ahead of an as-yet-unconfirmed remote restart: skip the cycle
    let stability_depth = parts.chain_config.stability_depth();
    if last_sync.height().into_int() > best.height.into_int().saturating_add(stability_depth) {
        log::debug!(
            "skipping sync: local height {} is further than {} above remote height {}",
            last_sync.height(),
            stability_depth,
            best.height
        );
        return Ok(SyncOutcome::SkippedStale);
    }

    let mut parts = wallet.sync_parts();
    scan_addresses(&mut parts, backend)?;

    let anchor = best_confirmed_anchor(&parts)?;
    let addresses: Vec<Vec<u8>> =
        parts.accounts.values().flat_map(|account| account.all_wire_addresses()).collect();

    let history = match backend.get_transactions_history(&addresses, anchor, best.hash) {
        Ok(history) => history,
        Err(BackendError::AnchorNotFound) => {
            log::warn!("sync anchor gone from the remote chain; compensating rollback");
            return rollback::rollback_compensation(&mut parts, deriver_id, &last_sync)
                .map_err(SyncError::Wallet);
        }
        Err(e) => return Err(SyncError::Backend(e)),
    };

    apply_remote_transactions(&mut parts, deriver_id, &last_sync, &best, &history, now)
        .map_err(SyncError::Wallet)
}

/// Keep asking the remote which of the unused tip addresses it has seen,
/// marking them used (which restores the gap by deriving further), until
/// no new usage is reported.
fn scan_addresses<B: storage::Backend, N: ChainBackend>(
    parts: &mut SyncParts<'_, B>,
    backend: &N,
) -> Result<(), SyncError<N::Error>> {
    loop {
        let candidates: Vec<Vec<u8>> =
            parts.accounts.values().flat_map(|account| account.scan_candidates()).collect();
        if candidates.is_empty() {
            return Ok(());
        }

        let used = backend.check_addresses_in_use(&candidates).map_err(SyncError::Backend)?;
        if used.is_empty() {
            return Ok(());
        }

        if !mark_used_addresses(parts, &used).map_err(SyncError::Wallet)? {
            return Ok(());
        }
    }
}

fn mark_used_addresses<B: storage::Backend>(
    parts: &mut SyncParts<'_, B>,
    used_wire: &[Vec<u8>],
) -> WalletResult<bool> {
    let mut db_tx = parts.db.transaction_rw()?;
    let mut ids = db_tx.get_next_row_ids()?;
    let mut any_marked = false;

    for wire in used_wire {
        let address = Address::from_wire_bytes(wire)?;
        let credential = match address.payment_credential() {
            Some(credential) => *credential,
            None => continue,
        };
        for account in parts.accounts.values_mut() {
            if account.mark_credential_as_used(&mut db_tx, &mut ids, &credential)? {
                any_marked = true;
                break;
            }
        }
    }

    db_tx.set_next_row_ids(&ids)?;
    db_tx.commit()?;
    Ok(any_marked)
}

/// The best locally-stored confirmed transaction, as a fetch anchor.
fn best_confirmed_anchor<B: storage::Backend>(
    parts: &SyncParts<'_, B>,
) -> WalletResult<Option<TxAnchor>> {
    let db_tx = parts.db.transaction_ro()?;
    let mut best: Option<(BlockHeight, u32, TxAnchor)> = None;

    for tx in db_tx.get_transactions(&parts.wallet_id)?.into_values() {
        if let TxState::InBlock { block, tx_ordinal } = tx.state() {
            let block_row = db_tx
                .get_block(&block)?
                .ok_or(WalletError::StaleState("transaction anchored in a missing block row"))?;
            let better = best
                .as_ref()
                .map_or(true, |(height, ordinal, _)| {
                    (block_row.height(), tx_ordinal) > (*height, *ordinal)
                });
            if better {
                best = Some((
                    block_row.height(),
                    tx_ordinal,
                    TxAnchor {
                        block: *block_row.hash(),
                        tx: *tx.hash(),
                    },
                ));
            }
        }
    }

    Ok(best.map(|(_, _, anchor)| anchor))
}

fn ensure_block<B: storage::Backend>(
    db_tx: &mut StoreTxRw<'_, B>,
    ids: &mut NextRowIds,
    info: &RemoteBlockInfo,
) -> WalletResult<BlockRowId> {
    if let Some(existing) = db_tx.get_block_id_by_hash(&info.hash)? {
        return Ok(existing);
    }
    let block_row_id = ids.next_block_id();
    db_tx.set_block(
        &block_row_id,
        &BlockRow::new(info.hash, info.height, info.slot, info.epoch),
    )?;
    db_tx.set_block_id_by_hash(&info.hash, &block_row_id)?;
    Ok(block_row_id)
}

fn remote_tx_state(remote_tx: &RemoteTransaction, block_row: BlockRowId) -> TxState {
    let tx_ordinal =
        remote_tx.block.as_ref().map(|block| block.tx_ordinal).unwrap_or_default();
    if remote_tx.success {
        TxState::InBlock {
            block: block_row,
            tx_ordinal,
        }
    } else {
        TxState::Failed {
            block: block_row,
            tx_ordinal,
        }
    }
}

/// Reconcile the fetched history into the store, all inside one transaction.
fn apply_remote_transactions<B: storage::Backend>(
    parts: &mut SyncParts<'_, B>,
    deriver_id: DeriverId,
    snapshot: &LastSyncInfo,
    best: &BestBlock,
    history: &[RemoteTransaction],
    now: u64,
) -> WalletResult<SyncOutcome> {
    let wallet_id = parts.wallet_id;
    let mut db_tx = parts.db.transaction_rw()?;

    // A concurrent cycle may have advanced the pointer since this cycle
    // planned its fetch; applying on top would interleave histories.
    let current = db_tx.get_last_sync_info(&deriver_id)?.unwrap_or_default();
    if current != *snapshot {
        db_tx.abort();
        return Ok(SyncOutcome::AbortedStale);
    }

    let mut ids = db_tx.get_next_row_ids()?;

    let mut own = OwnedAddressIndex::new();
    for account in parts.accounts.values() {
        account.extend_owned_index(&mut own);
    }

    let mut seen: BTreeSet<TxDigest> = BTreeSet::new();
    // Newly added or newly confirmed transactions whose spends apply
    let mut spending: Vec<TxRowId> = Vec::new();
    let mut new_transactions = 0;
    let mut updated_transactions = 0;

    for remote_tx in history {
        let digest = TxDigest::from_tx_hash(&remote_tx.hash);
        seen.insert(digest);

        match db_tx.get_tx_id_by_digest(&wallet_id, &digest)? {
            Some(tx_row_id) => {
                let mut row = db_tx.get_transaction(&wallet_id, &tx_row_id)?.ok_or(
                    WalletError::StaleState("digest index points to a missing transaction row"),
                )?;
                if row.state().is_settled() {
                    // Already anchored locally; nothing to re-apply
                    continue;
                }
                if let Some(block) = &remote_tx.block {
                    // The status and block link move; inputs and outputs
                    // are immutable once the hash exists
                    let block_row = ensure_block(&mut db_tx, &mut ids, block)?;
                    row.set_state(remote_tx_state(remote_tx, block_row));
                    db_tx.set_transaction(&wallet_id, &tx_row_id, &row)?;
                    updated_transactions += 1;
                    if remote_tx.success {
                        spending.push(tx_row_id);
                    }
                } else if matches!(row.state(), TxState::NotInRemote) {
                    // Resurfaced in the remote's mempool
                    row.set_state(TxState::Pending);
                    db_tx.set_transaction(&wallet_id, &tx_row_id, &row)?;
                    updated_transactions += 1;
                }
            }
            None => {
                let tx_row_id =
                    insert_remote_transaction(&mut db_tx, &mut ids, wallet_id, &own, remote_tx)?;
                if remote_tx.success || remote_tx.block.is_none() {
                    spending.push(tx_row_id);
                }
                new_transactions += 1;
            }
        }
    }

    // Record address usage the fetched history demonstrates; this also
    // restores the gap limit around the newly used addresses.
    for remote_tx in history {
        for wire in remote_tx.referenced_addresses() {
            let address = Address::from_wire_bytes(wire)?;
            let credential = match address.payment_credential() {
                Some(credential) => *credential,
                None => continue,
            };
            for account in parts.accounts.values_mut() {
                if account.mark_credential_as_used(&mut db_tx, &mut ids, &credential)? {
                    break;
                }
            }
        }
    }

    // Mark the outputs consumed by the new and newly-confirmed transactions
    // as spent, where the parent output is stored at all
    for tx_row_id in &spending {
        for input in db_tx.get_utxo_inputs(tx_row_id)?.into_values() {
            let parent_digest = TxDigest::from_tx_hash(&input.source().tx_hash);
            if let Some(parent_row) = db_tx.get_tx_id_by_digest(&wallet_id, &parent_digest)? {
                ledger::mark_utxo(
                    &mut db_tx,
                    &OutPoint::new(parent_row, input.source().index),
                    false,
                )?;
            }
        }
    }

    // Still-pending transactions the remote stopped reporting are kept for
    // display, flagged rather than deleted
    for (tx_row_id, mut row) in db_tx.get_transactions(&wallet_id)? {
        if row.state().is_pending() && !seen.contains(row.digest()) {
            row.set_state(TxState::NotInRemote);
            db_tx.set_transaction(&wallet_id, &tx_row_id, &row)?;
        }
    }

    db_tx.set_last_sync_info(
        &deriver_id,
        &LastSyncInfo::at_position(Some(now), Some(best.slot), Some(best.hash), best.height),
    )?;
    ledger::free_blocks(&mut db_tx)?;
    db_tx.set_next_row_ids(&ids)?;
    db_tx.commit()?;

    log::debug!(
        "sync applied for deriver {}: {} new, {} updated, tip height {}",
        deriver_id,
        new_transactions,
        updated_transactions,
        best.height
    );

    Ok(SyncOutcome::Synced {
        new_transactions,
        updated_transactions,
    })
}

fn insert_remote_transaction<B: storage::Backend>(
    db_tx: &mut StoreTxRw<'_, B>,
    ids: &mut NextRowIds,
    wallet_id: WalletId,
    own: &OwnedAddressIndex,
    remote_tx: &RemoteTransaction,
) -> WalletResult<TxRowId> {
    // Multisig script certificates are explicitly unsupported; reject the
    // whole transaction rather than guessing at their bookkeeping.
    if remote_tx
        .certificates
        .iter()
        .any(|cert| matches!(cert, RemoteCertificate::MultisigScript { .. }))
    {
        return Err(WalletError::UnsupportedCertificate(remote_tx.hash));
    }

    // Resolve referenced assets into the token registry
    for token in &remote_tx.tokens {
        if db_tx.get_token(&token.id)?.is_none() {
            db_tx.set_token(
                &token.id,
                &TokenInfo {
                    policy: token.policy,
                    asset_name: token.asset_name.clone(),
                },
            )?;
        }
    }

    // Map every referenced address to a local row, creating foreign rows
    // as needed
    let wires: Vec<Vec<u8>> = remote_tx.referenced_addresses().cloned().collect();
    let address_ids = address_map::hash_to_ids(db_tx, ids, wallet_id, own, &wires)?;
    let address_id_of = |wire: &Vec<u8>| {
        address_ids
            .get(wire)
            .copied()
            .ok_or(WalletError::StaleState("freshly resolved address id is gone"))
    };

    let tx_row_id = ids.next_tx_id();
    let state = match &remote_tx.block {
        Some(block) => {
            let block_row = ensure_block(db_tx, ids, block)?;
            remote_tx_state(remote_tx, block_row)
        }
        None => TxState::Pending,
    };
    let row = TxRow::new(remote_tx.hash, state);
    db_tx.set_transaction(&wallet_id, &tx_row_id, &row)?;
    db_tx.set_tx_id_by_digest(&wallet_id, row.digest(), &tx_row_id)?;

    for (index, output) in remote_tx.outputs.iter().enumerate() {
        let address_id = address_id_of(&output.address)?;
        let outpoint = OutPoint::new(tx_row_id, index as u32);
        if Address::from_wire_bytes(&output.address)?.is_accounting() {
            db_tx.set_accounting_output(
                &outpoint,
                &AccountingOutputRow::new(address_id, output.value.clone()),
            )?;
        } else {
            db_tx.set_utxo_output(
                &outpoint,
                &UtxoOutputRow::new(address_id, output.value.clone()),
            )?;
        }
    }

    for (index, input) in remote_tx.inputs.iter().enumerate() {
        let address_id = address_id_of(&input.address)?;
        db_tx.set_utxo_input(
            &OutPoint::new(tx_row_id, index as u32),
            &UtxoInputRow::new(
                TxHashOutPoint {
                    tx_hash: input.source_tx,
                    index: input.source_index,
                },
                address_id,
                input.value.clone(),
            ),
        )?;
    }

    for (index, withdrawal) in remote_tx.withdrawals.iter().enumerate() {
        let address_id = address_id_of(&withdrawal.address)?;
        db_tx.set_accounting_input(
            &OutPoint::new(tx_row_id, index as u32),
            &AccountingInputRow::new(address_id, withdrawal.value.clone()),
        )?;
    }

    for (index, certificate) in remote_tx.certificates.iter().enumerate() {
        let stored = match certificate {
            RemoteCertificate::StakeRegistration { staking } => Certificate::StakeRegistration {
                staking: *staking,
            },
            RemoteCertificate::StakeDeregistration { staking } => {
                Certificate::StakeDeregistration {
                    staking: *staking,
                }
            }
            RemoteCertificate::StakeDelegation { staking, pool } => {
                Certificate::StakeDelegation {
                    staking: *staking,
                    pool: *pool,
                }
            }
            RemoteCertificate::MultisigScript { .. } => {
                return Err(WalletError::UnsupportedCertificate(remote_tx.hash))
            }
        };
        db_tx.set_certificate(&OutPoint::new(tx_row_id, index as u32), &stored)?;
    }

    Ok(tx_row_id)
}
