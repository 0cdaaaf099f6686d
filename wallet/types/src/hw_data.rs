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

/// Metadata of the hardware signing device a wallet was created from.
/// This is the data that will be stored in the wallet db; the device itself
/// is only reachable through the external signing bridge.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct HardwareWalletData {
    pub device_vendor: String,
    pub device_model: String,
    pub device_id: String,
}
