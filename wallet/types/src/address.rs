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

use common::address::{Address, AddressKind};

use crate::ids::AddressDigest;

/// A stored address. Content-addressed: at most one row exists per digest
/// of the wire form; wallets share rows through their address mappings.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AddressRow {
    address: Address,
    is_used: bool,
}

impl AddressRow {
    pub fn new(address: Address) -> Self {
        AddressRow {
            address,
            is_used: false,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn kind(&self) -> AddressKind {
        self.address.kind()
    }

    pub fn digest(&self) -> AddressDigest {
        AddressDigest::new(self.address.digest())
    }

    pub fn is_used(&self) -> bool {
        self.is_used
    }

    pub fn set_used(&mut self) {
        self.is_used = true;
    }
}
