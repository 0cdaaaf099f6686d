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

//! The wallet core: transactional wallet construction, the key derivation
//! tree with its gap-limit address chains, address deduplication, remote
//! transaction synchronization with rollback compensation, and the
//! UTXO/accounting ledger.

pub mod address_map;
pub mod builder;
pub mod key_chain;
pub mod ledger;
pub mod sync;
mod wallet;

pub use builder::{BuiltWallet, WalletBuilder};
pub use key_chain::WalletScheme;
pub use sync::{sync_once, SyncOutcome};
pub use wallet::Wallet;

use common::address::AddressError;
use key_chain::KeyChainError;
use node_comm::BackendError;
use wallet_types::{DeriverId, TxHash, WalletId};

/// Wallet errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet database error: {0}")]
    DatabaseError(#[from] wallet_storage::Error),
    #[error("Key chain error: {0}")]
    KeyChain(#[from] KeyChainError),
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
    #[error("No wallet found: {0}")]
    NoWalletFound(WalletId),
    #[error("No public deriver found: {0}")]
    NoDeriverFound(DeriverId),
    #[error("Inconsistent wallet state: {0}")]
    StaleState(&'static str),
    #[error("Unsupported certificate in transaction {0}")]
    UnsupportedCertificate(TxHash),
    #[error("An ad-hoc public root supports a single public deriver")]
    AdHocSingleDeriver,
    #[error("Amount overflow")]
    AmountOverflow,
}

/// Result type used for the wallet
pub type WalletResult<T> = Result<T, WalletError>;

/// Errors of operations that talk to the chain backend.
#[derive(thiserror::Error, Debug)]
pub enum SyncError<E: std::error::Error> {
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("Chain backend error: {0}")]
    Backend(BackendError<E>),
}
