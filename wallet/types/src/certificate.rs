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

use common::address::Credential;
use common::primitives::H256;

/// A stored certificate carried by a transaction.
///
/// Only the certificate kinds listed here are storable. Multisig script
/// certificates exist on the wire but are not supported by this wallet;
/// they are rejected during reconciliation, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum Certificate {
    #[codec(index = 0)]
    StakeRegistration { staking: Credential },
    #[codec(index = 1)]
    StakeDeregistration { staking: Credential },
    #[codec(index = 2)]
    StakeDelegation {
        staking: Credential,
        pool: H256,
    },
}
