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

//! The persisted wallet data model: row types and their keys.

pub mod address;
pub mod block;
pub mod certificate;
pub mod derivation;
pub mod deriver;
pub mod hw_data;
pub mod ids;
pub mod keys;
pub mod sync_info;
pub mod txio;
pub mod wallet_info;
pub mod wallet_tx;

pub use address::AddressRow;
pub use block::BlockRow;
pub use certificate::Certificate;
pub use derivation::KeyDerivationNode;
pub use deriver::PublicDeriverInfo;
pub use hw_data::HardwareWalletData;
pub use ids::{
    AddressDigest, AddressRowId, BlockHash, BlockRowId, ChainAddressId, DeriverId,
    DeriverPurposeId, KeyRowId, NextRowIds, NodeChildId, NodeId, OutPoint, TxDigest, TxHash,
    TxRowId, WalletId, WalletPrefixedId,
};
pub use keys::{KeyMaterial, KeyPurpose, KeyRow, KeychainUsageState};
pub use sync_info::LastSyncInfo;
pub use txio::{
    AccountingInputRow, AccountingOutputRow, TokenAmount, TokenBundle, TokenId, TokenInfo,
    TxHashOutPoint, UtxoInputRow, UtxoOutputRow,
};
pub use wallet_info::{Bip44Wrapper, Cip1852Wrapper, DerivationLevel, WalletInfo, WalletWrapper};
pub use wallet_tx::{TxRow, TxState};
