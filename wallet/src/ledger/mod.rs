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

//! UTXO and accounting ledger maintenance plus the balance-style queries
//! built on top of it.

use std::collections::BTreeSet;

use itertools::Itertools;
use wallet_storage::{WalletStorageReadLocked, WalletStorageWriteLocked};
use wallet_types::{
    BlockRowId, OutPoint, TokenBundle, TxRow, TxRowId, TxState, UtxoOutputRow, WalletId,
};

use crate::{WalletError, WalletResult};

/// Idempotent toggle of one output's spent flag. A no-op when the referenced
/// row is an accounting-style output or is not stored at all.
pub fn mark_utxo(
    db_tx: &mut impl WalletStorageWriteLocked,
    outpoint: &OutPoint,
    is_unspent: bool,
) -> WalletResult<()> {
    match db_tx.get_utxo_output(outpoint)? {
        Some(mut row) => {
            if row.is_unspent() != is_unspent {
                row.set_unspent(is_unspent);
                db_tx.set_utxo_output(outpoint, &row)?;
            }
            Ok(())
        }
        None => Ok(()),
    }
}

/// Remove every block row that no stored transaction is anchored in.
/// Blocks are reference-counted implicitly by transaction membership.
pub fn free_blocks(db_tx: &mut impl WalletStorageWriteLocked) -> WalletResult<Vec<BlockRowId>> {
    let mut referenced: BTreeSet<BlockRowId> = BTreeSet::new();
    for wallet_id in db_tx.get_wallets()?.into_keys() {
        for tx in db_tx.get_transactions(&wallet_id)?.into_values() {
            if let Some(block_id) = tx.block_id() {
                referenced.insert(block_id);
            }
        }
    }

    let mut freed = Vec::new();
    for (block_id, block) in db_tx.get_blocks()? {
        if !referenced.contains(&block_id) {
            db_tx.del_block(&block_id)?;
            db_tx.del_block_id_by_hash(block.hash())?;
            freed.push(block_id);
        }
    }
    if !freed.is_empty() {
        log::debug!("freed {} orphaned block row(s)", freed.len());
    }
    Ok(freed)
}

/// The explicit remove-all path: delete every transaction of a wallet along
/// with its inputs, outputs and certificates, then collect orphaned blocks.
pub fn remove_wallet_transactions(
    db_tx: &mut impl WalletStorageWriteLocked,
    wallet_id: &WalletId,
) -> WalletResult<()> {
    for (tx_row_id, tx) in db_tx.get_transactions(wallet_id)? {
        for outpoint in db_tx.get_utxo_outputs(&tx_row_id)?.into_keys() {
            db_tx.del_utxo_output(&outpoint)?;
        }
        for outpoint in db_tx.get_utxo_inputs(&tx_row_id)?.into_keys() {
            db_tx.del_utxo_input(&outpoint)?;
        }
        for outpoint in db_tx.get_accounting_outputs(&tx_row_id)?.into_keys() {
            db_tx.del_accounting_output(&outpoint)?;
        }
        for outpoint in db_tx.get_accounting_inputs(&tx_row_id)?.into_keys() {
            db_tx.del_accounting_input(&outpoint)?;
        }
        for outpoint in db_tx.get_certificates(&tx_row_id)?.into_keys() {
            db_tx.del_certificate(&outpoint)?;
        }
        db_tx.del_tx_id_by_digest(wallet_id, tx.digest())?;
        db_tx.del_transaction(wallet_id, &tx_row_id)?;
    }
    free_blocks(db_tx)?;
    Ok(())
}

fn is_owned(
    db_tx: &impl WalletStorageReadLocked,
    wallet_id: &WalletId,
    output: &UtxoOutputRow,
) -> WalletResult<bool> {
    Ok(db_tx.get_address_mapping(wallet_id, &output.address())?.is_some())
}

/// Confirmed, unspent, owned outputs: what the wallet can spend.
pub fn get_spendable_utxos(
    db_tx: &impl WalletStorageReadLocked,
    wallet_id: &WalletId,
) -> WalletResult<Vec<(OutPoint, UtxoOutputRow)>> {
    let mut spendable = Vec::new();
    for (tx_row_id, tx) in db_tx.get_transactions(wallet_id)? {
        if !matches!(tx.state(), TxState::InBlock { .. }) {
            continue;
        }
        for (outpoint, output) in db_tx.get_utxo_outputs(&tx_row_id)? {
            if output.is_unspent() && is_owned(db_tx, wallet_id, &output)? {
                spendable.push((outpoint, output));
            }
        }
    }
    Ok(spendable)
}

/// The confirmed balance: the sum over all spendable outputs.
pub fn get_balance(
    db_tx: &impl WalletStorageReadLocked,
    wallet_id: &WalletId,
) -> WalletResult<TokenBundle> {
    get_spendable_utxos(db_tx, wallet_id)?
        .iter()
        .try_fold(TokenBundle::default(), |acc, (_, output)| {
            acc.checked_add(output.value()).ok_or(WalletError::AmountOverflow)
        })
}

/// A page of the wallet's transaction history, most recent first: anchored
/// transactions ordered by (height, ordinal) descending, with unanchored
/// ones (pending and friends) before all of them.
pub fn get_transactions_page(
    db_tx: &impl WalletStorageReadLocked,
    wallet_id: &WalletId,
    offset: usize,
    limit: usize,
) -> WalletResult<Vec<(TxRowId, TxRow)>> {
    let mut entries = Vec::new();
    for (tx_row_id, tx) in db_tx.get_transactions(wallet_id)? {
        let height = db_tx.get_transaction_height(wallet_id, &tx)?;
        let sort_key = (
            height.map_or(u64::MAX, |h| h.into_int()),
            tx.state().tx_ordinal().map_or(u32::MAX, |ordinal| ordinal),
            tx_row_id.into_u64(),
        );
        entries.push((sort_key, tx_row_id, tx));
    }

    Ok(entries
        .into_iter()
        .sorted_by_key(|(sort_key, _, _)| std::cmp::Reverse(*sort_key))
        .skip(offset)
        .take(limit)
        .map(|(_, tx_row_id, tx)| (tx_row_id, tx))
        .collect())
}
