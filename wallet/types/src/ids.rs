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

//! Row id and key types.
//!
//! Row ids are plain integers allocated from the persistent [NextRowIds]
//! sequence row, so an id never identifies two different rows over the life
//! of a store, even across deletions. Content digests are typed wrappers
//! around a [H256] so that a transaction digest cannot be confused with an
//! address digest at compile time.

use parity_scale_codec::{Decode, Encode};

use common::primitives::{hash_bytes, H256};
use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::u31::U31;
use storage::HasPrefix;

use crate::keys::KeyPurpose;

macro_rules! declare_row_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, serde::Serialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                $name(id)
            }

            pub const fn into_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

declare_row_id! {
    /// Identity of a conceptual wallet.
    WalletId
}
declare_row_id! {
    /// Identity of a public deriver (a usable account entry point).
    DeriverId
}
declare_row_id! {
    /// Identity of a key derivation tree node.
    NodeId
}
declare_row_id! {
    /// Identity of a stored key blob.
    KeyRowId
}
declare_row_id! {
    /// Identity of an address row.
    AddressRowId
}
declare_row_id! {
    /// Identity of a transaction row.
    TxRowId
}
declare_row_id! {
    /// Identity of a block row.
    BlockRowId
}

macro_rules! declare_digest {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, serde::Serialize,
        )]
        pub struct $name(H256);

        impl $name {
            pub const fn new(hash: H256) -> Self {
                $name(hash)
            }

            pub fn as_hash(&self) -> &H256 {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

declare_digest! {
    /// The chain-level hash of a transaction. Never changes for a given
    /// logical transaction.
    TxHash
}
declare_digest! {
    /// Local lookup digest of a transaction, derived from its chain hash.
    TxDigest
}
declare_digest! {
    /// The chain-level hash of a block.
    BlockHash
}
declare_digest! {
    /// Content digest of an address's canonical wire bytes; the address
    /// deduplication key.
    AddressDigest
}

impl TxDigest {
    pub fn from_tx_hash(hash: &TxHash) -> Self {
        TxDigest(hash_bytes(hash.as_hash().as_bytes()))
    }
}

/// An item id scoped to one wallet, laid out so that all items of a wallet
/// can be found with a prefix scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct WalletPrefixedId<Id> {
    wallet_id: WalletId,
    item_id: Id,
}

impl<Id: Encode> WalletPrefixedId<Id> {
    pub fn new(wallet_id: WalletId, item_id: Id) -> Self {
        Self {
            wallet_id,
            item_id,
        }
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn into_item_id(self) -> Id {
        self.item_id
    }
}

impl<Id: Encode> HasPrefix<WalletId> for WalletPrefixedId<Id> {}

/// A reference to one output (or input ordinal) of a stored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct OutPoint {
    tx: TxRowId,
    index: u32,
}

impl OutPoint {
    pub fn new(tx: TxRowId, index: u32) -> Self {
        OutPoint { tx, index }
    }

    pub fn tx(&self) -> TxRowId {
        self.tx
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl HasPrefix<TxRowId> for OutPoint {}

/// Key of the parent→child edge index of the derivation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct NodeChildId {
    parent: NodeId,
    index: ChildNumber,
}

impl NodeChildId {
    pub fn new(parent: NodeId, index: ChildNumber) -> Self {
        NodeChildId { parent, index }
    }

    pub fn index(&self) -> ChildNumber {
        self.index
    }
}

impl HasPrefix<NodeId> for NodeChildId {}

/// One derivation chain of a public deriver: external or internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct DeriverPurposeId {
    deriver: DeriverId,
    purpose: KeyPurpose,
}

impl DeriverPurposeId {
    pub fn new(deriver: DeriverId, purpose: KeyPurpose) -> Self {
        DeriverPurposeId { deriver, purpose }
    }

    pub fn deriver(&self) -> DeriverId {
        self.deriver
    }

    pub fn purpose(&self) -> KeyPurpose {
        self.purpose
    }
}

/// Key of the per-chain address index: deriver, chain, address index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct ChainAddressId {
    deriver: DeriverId,
    purpose: KeyPurpose,
    index: U31,
}

impl ChainAddressId {
    pub fn new(deriver: DeriverId, purpose: KeyPurpose, index: U31) -> Self {
        ChainAddressId {
            deriver,
            purpose,
            index,
        }
    }

    pub fn index(&self) -> U31 {
        self.index
    }
}

impl HasPrefix<DeriverPurposeId> for ChainAddressId {}

/// The persistent id sequences all row ids are allocated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct NextRowIds {
    wallet: u64,
    deriver: u64,
    node: u64,
    key: u64,
    address: u64,
    tx: u64,
    block: u64,
}

impl NextRowIds {
    pub fn next_wallet_id(&mut self) -> WalletId {
        let id = WalletId(self.wallet);
        self.wallet += 1;
        id
    }

    pub fn next_deriver_id(&mut self) -> DeriverId {
        let id = DeriverId(self.deriver);
        self.deriver += 1;
        id
    }

    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.node);
        self.node += 1;
        id
    }

    pub fn next_key_id(&mut self) -> KeyRowId {
        let id = KeyRowId(self.key);
        self.key += 1;
        id
    }

    pub fn next_address_id(&mut self) -> AddressRowId {
        let id = AddressRowId(self.address);
        self.address += 1;
        id
    }

    pub fn next_tx_id(&mut self) -> TxRowId {
        let id = TxRowId(self.tx);
        self.tx += 1;
        id
    }

    pub fn next_block_id(&mut self) -> BlockRowId {
        let id = BlockRowId(self.block);
        self.block += 1;
        id
    }
}
