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

//! A wrapper around randomness functionality to make audits easier.

pub use rand::{CryptoRng, Rng, RngCore, SeedableRng};

/// An RNG seeded from OS entropy, for use everywhere unpredictability is required.
pub fn make_true_rng() -> impl Rng + CryptoRng {
    rand::rngs::StdRng::from_entropy()
}
