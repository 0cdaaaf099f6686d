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

use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::u31::U31;

const fn u31(value: u32) -> U31 {
    match U31::from_u32(value) {
        Some(v) => v,
        None => panic!("value out of the 31-bit range"),
    }
}

/// The standard BIP44 purpose path component.
pub const BIP44_PURPOSE: ChildNumber = ChildNumber::from_hardened(u31(44));
/// The CIP1852 purpose path component used by the newer wallet scheme.
pub const CIP1852_PURPOSE: ChildNumber = ChildNumber::from_hardened(u31(1852));

const COIN_TYPE: ChildNumber = ChildNumber::from_hardened(u31(1815));

const DEFAULT_LOOKAHEAD_SIZE: u32 = 20;
const DEFAULT_DISPLAY_CUTOFF: u32 = 10;
const MAINNET_STABILITY_DEPTH: u64 = 2160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    Mainnet,
    Testnet,
    Regtest,
}

/// Static parameters of the chain a wallet tracks. Injected everywhere as
/// `Arc<ChainConfig>`; there is no global configuration state.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    kind: ChainKind,
    network_id: u32,
    coin_type: ChildNumber,
    lookahead_size: u32,
    display_cutoff: u32,
    stability_depth: u64,
}

impl ChainConfig {
    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    /// Discriminates addresses and wallets of different networks.
    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    pub fn coin_type(&self) -> ChildNumber {
        self.coin_type
    }

    /// The gap limit: how many consecutive unused addresses every derivation
    /// chain keeps derived past the last used one.
    pub fn lookahead_size(&self) -> u32 {
        self.lookahead_size
    }

    /// How many issued-but-unused addresses are surfaced to display layers.
    pub fn display_cutoff(&self) -> u32 {
        self.display_cutoff
    }

    /// The depth below the remote tip at which blocks are considered stable.
    /// Shared by the sync staleness check and the rollback retention point.
    pub fn stability_depth(&self) -> u64 {
        self.stability_depth
    }
}

/// Builder for non-standard parameter combinations, mostly used by tests.
#[derive(Debug, Clone)]
pub struct Builder {
    config: ChainConfig,
}

impl Builder {
    pub fn new(kind: ChainKind) -> Self {
        let network_id = match kind {
            ChainKind::Mainnet => 1,
            ChainKind::Testnet => 0,
            ChainKind::Regtest => 2,
        };
        Builder {
            config: ChainConfig {
                kind,
                network_id,
                coin_type: COIN_TYPE,
                lookahead_size: DEFAULT_LOOKAHEAD_SIZE,
                display_cutoff: DEFAULT_DISPLAY_CUTOFF,
                stability_depth: match kind {
                    ChainKind::Mainnet | ChainKind::Testnet => MAINNET_STABILITY_DEPTH,
                    ChainKind::Regtest => 6,
                },
            },
        }
    }

    pub fn lookahead_size(mut self, lookahead_size: u32) -> Self {
        self.config.lookahead_size = lookahead_size;
        self
    }

    pub fn display_cutoff(mut self, display_cutoff: u32) -> Self {
        self.config.display_cutoff = display_cutoff;
        self
    }

    pub fn stability_depth(mut self, stability_depth: u64) -> Self {
        self.config.stability_depth = stability_depth;
        self
    }

    pub fn build(self) -> ChainConfig {
        self.config
    }
}

pub fn create_mainnet() -> ChainConfig {
    Builder::new(ChainKind::Mainnet).build()
}

pub fn create_testnet() -> ChainConfig {
    Builder::new(ChainKind::Testnet).build()
}

pub fn create_regtest() -> ChainConfig {
    Builder::new(ChainKind::Regtest).build()
}
