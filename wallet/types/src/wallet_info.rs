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

use crate::hw_data::HardwareWalletData;
use crate::ids::NodeId;

/// The top-level identity row of a wallet. Created once and never mutated,
/// except for attaching hardware device metadata during construction.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct WalletInfo {
    name: String,
    network_id: u32,
    hardware: Option<HardwareWalletData>,
}

impl WalletInfo {
    pub fn new(name: String, network_id: u32) -> Self {
        WalletInfo {
            name,
            network_id,
            hardware: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    pub fn hardware(&self) -> Option<&HardwareWalletData> {
        self.hardware.as_ref()
    }

    pub fn with_hardware(mut self, hardware: HardwareWalletData) -> Self {
        self.hardware = Some(hardware);
        self
    }
}

/// The level of a node in the derivation tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, serde::Serialize,
)]
pub enum DerivationLevel {
    #[codec(index = 0)]
    Root,
    #[codec(index = 1)]
    Purpose,
    #[codec(index = 2)]
    CoinType,
    #[codec(index = 3)]
    Account,
    #[codec(index = 4)]
    Chain,
    #[codec(index = 5)]
    Address,
}

/// A wallet's wrapper: which derivation scheme it follows, at which level
/// signing happens, at which level public derivers attach, and where the
/// private derivation tree is rooted (absent for hardware wallets).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum WalletWrapper {
    #[codec(index = 0)]
    Bip44(Bip44Wrapper),
    #[codec(index = 1)]
    Cip1852(Cip1852Wrapper),
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Bip44Wrapper {
    signer_level: DerivationLevel,
    public_deriver_level: DerivationLevel,
    private_root: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Cip1852Wrapper {
    signer_level: DerivationLevel,
    public_deriver_level: DerivationLevel,
    private_root: Option<NodeId>,
}

impl WalletWrapper {
    pub fn new_bip44(
        signer_level: DerivationLevel,
        public_deriver_level: DerivationLevel,
        private_root: Option<NodeId>,
    ) -> Self {
        WalletWrapper::Bip44(Bip44Wrapper {
            signer_level,
            public_deriver_level,
            private_root,
        })
    }

    pub fn new_cip1852(
        signer_level: DerivationLevel,
        public_deriver_level: DerivationLevel,
        private_root: Option<NodeId>,
    ) -> Self {
        WalletWrapper::Cip1852(Cip1852Wrapper {
            signer_level,
            public_deriver_level,
            private_root,
        })
    }

    pub fn signer_level(&self) -> DerivationLevel {
        match self {
            WalletWrapper::Bip44(w) => w.signer_level,
            WalletWrapper::Cip1852(w) => w.signer_level,
        }
    }

    pub fn public_deriver_level(&self) -> DerivationLevel {
        match self {
            WalletWrapper::Bip44(w) => w.public_deriver_level,
            WalletWrapper::Cip1852(w) => w.public_deriver_level,
        }
    }

    pub fn private_root(&self) -> Option<NodeId> {
        match self {
            WalletWrapper::Bip44(w) => w.private_root,
            WalletWrapper::Cip1852(w) => w.private_root,
        }
    }

    pub fn with_private_root(self, private_root: NodeId) -> Self {
        match self {
            WalletWrapper::Bip44(w) => WalletWrapper::Bip44(Bip44Wrapper {
                private_root: Some(private_root),
                ..w
            }),
            WalletWrapper::Cip1852(w) => WalletWrapper::Cip1852(Cip1852Wrapper {
                private_root: Some(private_root),
                ..w
            }),
        }
    }
}
