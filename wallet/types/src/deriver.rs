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

use parity_scale_codec::{Decode, Encode};

use crypto::key::hdkd::u31::U31;

use crate::ids::{NodeId, WalletId};

/// A public deriver: a named, ordered account entry point bound to the
/// account-level node of the derivation tree. Balance and history queries
/// go through a public deriver; so does synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct PublicDeriverInfo {
    wallet_id: WalletId,
    name: String,
    ordinal: u32,
    account_node: NodeId,
    account_index: U31,
}

impl PublicDeriverInfo {
    pub fn new(
        wallet_id: WalletId,
        name: String,
        ordinal: u32,
        account_node: NodeId,
        account_index: U31,
    ) -> Self {
        PublicDeriverInfo {
            wallet_id,
            name,
            ordinal,
            account_node,
            account_index,
        }
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn account_node(&self) -> NodeId {
        self.account_node
    }

    pub fn account_index(&self) -> U31 {
        self.account_index
    }
}
