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

//! Wallet database schema

use wallet_types::{
    AccountingInputRow, AccountingOutputRow, AddressDigest, AddressRow, AddressRowId, BlockHash,
    BlockRow, BlockRowId, Certificate, ChainAddressId, DeriverId, DeriverPurposeId,
    KeyDerivationNode, KeyRow, KeyRowId, KeychainUsageState, LastSyncInfo, NextRowIds,
    NodeChildId, NodeId, OutPoint, PublicDeriverInfo, TokenId, TokenInfo, TxDigest, TxRow,
    TxRowId, UtxoInputRow, UtxoOutputRow, WalletId, WalletInfo, WalletPrefixedId, WalletWrapper,
};

storage::decl_schema! {
    /// Database schema for wallet storage
    pub Schema {
        /// Storage for individual values: schema version and similar.
        pub DBValue: Map<Vec<u8>, Vec<u8>>,
        /// The persistent row id sequences.
        pub DBNextIds: Map<(), NextRowIds>,
        /// Conceptual wallet rows.
        pub DBWallet: Map<WalletId, WalletInfo>,
        /// Wallet wrapper rows, exactly one per wallet.
        pub DBWrapper: Map<WalletId, WalletWrapper>,
        /// Key blobs, encrypted or plain.
        pub DBKey: Map<KeyRowId, KeyRow>,
        /// Key derivation tree nodes.
        pub DBDerivationNode: Map<NodeId, KeyDerivationNode>,
        /// Parent→child edges of the derivation tree.
        pub DBNodeChild: Map<NodeChildId, NodeId>,
        /// Public deriver (account entry point) rows.
        pub DBPublicDeriver: Map<DeriverId, PublicDeriverInfo>,
        /// Gap-limit usage state per deriver chain.
        pub DBKeychainUsage: Map<DeriverPurposeId, KeychainUsageState>,
        /// Index of chain addresses by (deriver, purpose, index).
        pub DBChainAddress: Map<ChainAddressId, AddressRowId>,
        /// Address rows, at most one per content digest.
        pub DBAddress: Map<AddressRowId, AddressRow>,
        /// Content digest → address row index.
        pub DBAddressDigest: Map<AddressDigest, AddressRowId>,
        /// Address ⇄ derivation node mapping, per wallet. Absent for
        /// foreign addresses.
        pub DBAddressMapping: Map<WalletPrefixedId<AddressRowId>, NodeId>,
        /// Transaction rows, per wallet.
        pub DBTx: Map<WalletPrefixedId<TxRowId>, TxRow>,
        /// Transaction digest → row index, per wallet.
        pub DBTxDigest: Map<WalletPrefixedId<TxDigest>, TxRowId>,
        /// Block rows; reference-counted implicitly via transaction membership.
        pub DBBlock: Map<BlockRowId, BlockRow>,
        /// Block hash → row index.
        pub DBBlockHash: Map<BlockHash, BlockRowId>,
        /// UTXO-model outputs, keyed by (transaction row, output index).
        pub DBUtxoOutput: Map<OutPoint, UtxoOutputRow>,
        /// UTXO-model inputs, keyed by (transaction row, input ordinal).
        pub DBUtxoInput: Map<OutPoint, UtxoInputRow>,
        /// Account-style credits.
        pub DBAccountingOutput: Map<OutPoint, AccountingOutputRow>,
        /// Account-style debits.
        pub DBAccountingInput: Map<OutPoint, AccountingInputRow>,
        /// Certificates carried by stored transactions.
        pub DBCertificate: Map<OutPoint, Certificate>,
        /// Token registry.
        pub DBToken: Map<TokenId, TokenInfo>,
        /// Best known remote position, per public deriver.
        pub DBLastSyncInfo: Map<DeriverId, LastSyncInfo>,
    }
}
