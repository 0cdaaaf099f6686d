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

//! The data shapes the chain backend reports. Addresses arrive as raw wire
//! bytes; mapping them to local rows is the wallet's job, not the backend's.

use common::address::Credential;
use common::primitives::{BlockHeight, EpochIndex, SlotNumber, H256};
use wallet_types::{BlockHash, TokenBundle, TokenId, TxHash};

/// The remote chain tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestBlock {
    pub hash: BlockHash,
    pub height: BlockHeight,
    pub slot: SlotNumber,
    pub epoch: EpochIndex,
}

/// The position a history request is anchored after: the best block and
/// transaction the caller has already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxAnchor {
    pub block: BlockHash,
    pub tx: TxHash,
}

/// Where a remote transaction sits in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBlockInfo {
    pub hash: BlockHash,
    pub height: BlockHeight,
    pub slot: SlotNumber,
    pub epoch: EpochIndex,
    /// Position of the transaction within the block.
    pub tx_ordinal: u32,
}

/// A UTXO-model input of a remote transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInput {
    pub address: Vec<u8>,
    pub value: TokenBundle,
    pub source_tx: TxHash,
    pub source_index: u32,
}

/// A UTXO-model output of a remote transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    pub address: Vec<u8>,
    pub value: TokenBundle,
}

/// An account-style debit: value leaving an account address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteWithdrawal {
    pub address: Vec<u8>,
    pub value: TokenBundle,
}

/// A certificate carried by a remote transaction.
///
/// `MultisigScript` exists on the wire but is not a supported wallet
/// certificate; reconciliation rejects transactions carrying one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCertificate {
    StakeRegistration {
        staking: Credential,
    },
    StakeDeregistration {
        staking: Credential,
    },
    StakeDelegation {
        staking: Credential,
        pool: H256,
    },
    MultisigScript {
        script_hash: H256,
    },
}

/// Registry data of a token referenced by a remote transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTokenInfo {
    pub id: TokenId,
    pub policy: H256,
    pub asset_name: Vec<u8>,
}

/// One transaction as reported by the chain backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTransaction {
    pub hash: TxHash,
    /// `None` while the transaction is only known from the mempool.
    pub block: Option<RemoteBlockInfo>,
    /// `false` when the transaction is anchored but was rejected by the
    /// ledger rules of its block.
    pub success: bool,
    pub inputs: Vec<RemoteInput>,
    pub outputs: Vec<RemoteOutput>,
    pub withdrawals: Vec<RemoteWithdrawal>,
    pub certificates: Vec<RemoteCertificate>,
    pub tokens: Vec<RemoteTokenInfo>,
}

impl RemoteTransaction {
    /// All wire addresses this transaction touches.
    pub fn referenced_addresses(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.inputs
            .iter()
            .map(|input| &input.address)
            .chain(self.outputs.iter().map(|output| &output.address))
            .chain(self.withdrawals.iter().map(|withdrawal| &withdrawal.address))
    }

    pub fn block_height(&self) -> Option<BlockHeight> {
        self.block.as_ref().map(|block| block.height)
    }
}
