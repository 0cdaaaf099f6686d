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

//! Per-transaction input and output rows.
//!
//! Every moved value is a [TokenBundle]: the native coin amount plus a list
//! of `(token, amount)` entries, so multi-asset transactions are first-class.
//! Outputs to account-style addresses live in the accounting tables instead
//! of the UTXO tables; the spent flag only exists on the UTXO side.

use std::collections::BTreeMap;

use parity_scale_codec::{Decode, Encode};

use common::primitives::{hash_encoded, Amount, H256};

use crate::ids::{AddressRowId, TxHash};

/// Identity of a token: the digest of its minting policy and asset name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, serde::Serialize,
)]
pub struct TokenId(H256);

impl TokenId {
    pub fn from_policy_and_name(policy: &H256, asset_name: &[u8]) -> Self {
        TokenId(hash_encoded(&(policy, asset_name)))
    }

    pub const fn new(hash: H256) -> Self {
        TokenId(hash)
    }

    pub fn as_hash(&self) -> &H256 {
        &self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Registry row describing a token referenced by some stored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct TokenInfo {
    pub policy: H256,
    pub asset_name: Vec<u8>,
}

impl TokenInfo {
    pub fn token_id(&self) -> TokenId {
        TokenId::from_policy_and_name(&self.policy, &self.asset_name)
    }
}

/// One `(token, amount)` entry of a token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct TokenAmount {
    pub token: TokenId,
    pub amount: Amount,
}

/// A moved value: native coins plus the referenced token list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct TokenBundle {
    coin: Amount,
    tokens: Vec<TokenAmount>,
}

impl TokenBundle {
    pub fn new(coin: Amount, tokens: Vec<TokenAmount>) -> Self {
        TokenBundle { coin, tokens }
    }

    pub fn from_coin(coin: Amount) -> Self {
        TokenBundle {
            coin,
            tokens: Vec::new(),
        }
    }

    pub fn coin(&self) -> Amount {
        self.coin
    }

    pub fn tokens(&self) -> &[TokenAmount] {
        &self.tokens
    }

    /// Merge two bundles, summing per-token amounts. `None` on overflow.
    pub fn checked_add(&self, other: &TokenBundle) -> Option<TokenBundle> {
        let coin = (self.coin + other.coin)?;
        let mut by_token: BTreeMap<TokenId, Amount> = BTreeMap::new();
        for entry in self.tokens.iter().chain(other.tokens.iter()) {
            let total = by_token.entry(entry.token).or_insert(Amount::ZERO);
            *total = (*total + entry.amount)?;
        }
        let tokens = by_token
            .into_iter()
            .map(|(token, amount)| TokenAmount { token, amount })
            .collect();
        Some(TokenBundle { coin, tokens })
    }
}

/// A chain-level reference to an output of some (possibly unknown) transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct TxHashOutPoint {
    pub tx_hash: TxHash,
    pub index: u32,
}

/// A UTXO-model output of a stored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct UtxoOutputRow {
    address: AddressRowId,
    value: TokenBundle,
    is_unspent: bool,
}

impl UtxoOutputRow {
    pub fn new(address: AddressRowId, value: TokenBundle) -> Self {
        UtxoOutputRow {
            address,
            value,
            is_unspent: true,
        }
    }

    pub fn address(&self) -> AddressRowId {
        self.address
    }

    pub fn value(&self) -> &TokenBundle {
        &self.value
    }

    pub fn is_unspent(&self) -> bool {
        self.is_unspent
    }

    pub fn set_unspent(&mut self, is_unspent: bool) {
        self.is_unspent = is_unspent;
    }
}

/// A UTXO-model input of a stored transaction: which output it consumes.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct UtxoInputRow {
    source: TxHashOutPoint,
    address: AddressRowId,
    value: TokenBundle,
}

impl UtxoInputRow {
    pub fn new(source: TxHashOutPoint, address: AddressRowId, value: TokenBundle) -> Self {
        UtxoInputRow {
            source,
            address,
            value,
        }
    }

    pub fn source(&self) -> &TxHashOutPoint {
        &self.source
    }

    pub fn address(&self) -> AddressRowId {
        self.address
    }

    pub fn value(&self) -> &TokenBundle {
        &self.value
    }
}

/// An account-style credit (e.g. a reward payout to an account address).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AccountingOutputRow {
    address: AddressRowId,
    value: TokenBundle,
}

impl AccountingOutputRow {
    pub fn new(address: AddressRowId, value: TokenBundle) -> Self {
        AccountingOutputRow { address, value }
    }

    pub fn address(&self) -> AddressRowId {
        self.address
    }

    pub fn value(&self) -> &TokenBundle {
        &self.value
    }
}

/// An account-style debit (e.g. a withdrawal from an account address).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AccountingInputRow {
    address: AddressRowId,
    value: TokenBundle,
}

impl AccountingInputRow {
    pub fn new(address: AddressRowId, value: TokenBundle) -> Self {
        AccountingInputRow { address, value }
    }

    pub fn address(&self) -> AddressRowId {
        self.address
    }

    pub fn value(&self) -> &TokenBundle {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_addition_merges_token_lists() {
        let token_a = TokenId::from_policy_and_name(&H256::zero(), b"a");
        let token_b = TokenId::from_policy_and_name(&H256::zero(), b"b");

        let left = TokenBundle::new(
            Amount::from_atoms(10),
            vec![TokenAmount {
                token: token_a,
                amount: Amount::from_atoms(1),
            }],
        );
        let right = TokenBundle::new(
            Amount::from_atoms(5),
            vec![
                TokenAmount {
                    token: token_a,
                    amount: Amount::from_atoms(2),
                },
                TokenAmount {
                    token: token_b,
                    amount: Amount::from_atoms(7),
                },
            ],
        );

        let sum = left.checked_add(&right).unwrap();
        assert_eq!(sum.coin(), Amount::from_atoms(15));
        assert_eq!(sum.tokens().len(), 2);
        let amount_of = |token| {
            sum.tokens().iter().find(|entry| entry.token == token).map(|entry| entry.amount)
        };
        assert_eq!(amount_of(token_a), Some(Amount::from_atoms(3)));
        assert_eq!(amount_of(token_b), Some(Amount::from_atoms(7)));
    }
}
