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

//! Rollback compensation: the corrective path run when the remote chain no
//! longer contains the position the wallet had synced up to.

use std::collections::BTreeMap;

use common::primitives::BlockHeight;
use wallet_storage::{WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{
    BlockRowId, DeriverId, LastSyncInfo, OutPoint, TxDigest, TxRowId, TxState,
};

use crate::ledger;
use crate::sync::{SyncOutcome, SyncParts};
use crate::{WalletError, WalletResult};

/// Revert the locally-recorded effects of every transaction above the best
/// still-stable position.
///
/// The retained tip is the best confirmed transaction whose height is at
/// least the stability depth below the last known remote height. Everything
/// above it is marked rollback-failed, the outputs those transactions
/// consumed become unspent again, still-pending transactions are failed
/// conservatively (the wallet does not track multiple in-flight sends), and
/// the sync pointer rewinds to the retained tip. A concurrent cycle having
/// moved the pointer since planning aborts the rollback as stale.
pub(crate) fn rollback_compensation<B: storage::Backend>(
    parts: &mut SyncParts<'_, B>,
    deriver_id: DeriverId,
    snapshot: &LastSyncInfo,
) -> WalletResult<SyncOutcome> {
    let wallet_id = parts.wallet_id;
    let stability_depth = parts.chain_config.stability_depth();
    let mut db_tx = parts.db.transaction_rw()?;

    let current = db_tx.get_last_sync_info(&deriver_id)?.unwrap_or_default();
    if current != *snapshot {
        db_tx.abort();
        return Ok(SyncOutcome::AbortedStale);
    }

    let retain_limit = snapshot.height().checked_sub(stability_depth);
    let txs = db_tx.get_transactions(&wallet_id)?;

    // Locate the retained tip and collect anchored heights along the way
    let mut heights: BTreeMap<TxRowId, BlockHeight> = BTreeMap::new();
    let mut retained: Option<(BlockHeight, u32, BlockRowId)> = None;
    for (tx_row_id, tx) in &txs {
        let block_id = match tx.block_id() {
            Some(block_id) => block_id,
            None => continue,
        };
        let block = db_tx
            .get_block(&block_id)?
            .ok_or(WalletError::StaleState("transaction anchored in a missing block row"))?;
        heights.insert(*tx_row_id, block.height());

        if matches!(tx.state(), TxState::InBlock { .. })
            && retain_limit.map_or(false, |limit| block.height() <= limit)
        {
            let ordinal = tx.state().tx_ordinal().unwrap_or(0);
            let better = retained
                .map_or(true, |(height, best_ordinal, _)| {
                    (block.height(), ordinal) > (height, best_ordinal)
                });
            if better {
                retained = Some((block.height(), ordinal, block_id));
            }
        }
    }
    let cutoff = retained.map_or(BlockHeight::zero(), |(height, _, _)| height);

    let mut rolled_back = 0_usize;
    for (tx_row_id, mut tx) in txs {
        let rolls_back = match tx.state() {
            TxState::InBlock { .. } | TxState::Failed { .. } => {
                heights.get(&tx_row_id).map_or(true, |height| *height > cutoff)
            }
            // No support for multiple in-flight sends, so pending is
            // treated conservatively
            TxState::Pending => true,
            TxState::RollbackFailed | TxState::NotInRemote => false,
        };
        if !rolls_back {
            continue;
        }

        // Failed transactions never spent anything, so only undo the spends
        // of transactions that were applied as successful
        let undo_spends = matches!(tx.state(), TxState::InBlock { .. } | TxState::Pending);

        tx.set_state(TxState::RollbackFailed);
        db_tx.set_transaction(&wallet_id, &tx_row_id, &tx)?;
        rolled_back += 1;

        if undo_spends {
            for input in db_tx.get_utxo_inputs(&tx_row_id)?.into_values() {
                let parent_digest = TxDigest::from_tx_hash(&input.source().tx_hash);
                if let Some(parent_row) = db_tx.get_tx_id_by_digest(&wallet_id, &parent_digest)? {
                    ledger::mark_utxo(
                        &mut db_tx,
                        &OutPoint::new(parent_row, input.source().index),
                        true,
                    )?;
                }
            }
        }
    }

    let rewound = match retained {
        Some((height, _, block_id)) => {
            let block = db_tx
                .get_block(&block_id)?
                .ok_or(WalletError::StaleState("retained block row missing"))?;
            LastSyncInfo::at_position(
                snapshot.time(),
                Some(block.slot()),
                Some(*block.hash()),
                height,
            )
        }
        None => LastSyncInfo::default(),
    };
    db_tx.set_last_sync_info(&deriver_id, &rewound)?;
    ledger::free_blocks(&mut db_tx)?;
    db_tx.commit()?;

    log::info!(
        "rollback compensation: {} transaction(s) rolled back, retained height {}",
        rolled_back,
        cutoff
    );

    Ok(SyncOutcome::RolledBack { to_height: cutoff })
}
