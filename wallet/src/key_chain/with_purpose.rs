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

use wallet_types::KeyPurpose;

/// A pair of values, one per key chain purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithPurpose<T> {
    pub external: T,
    pub internal: T,
}

impl<T> WithPurpose<T> {
    pub fn new(external: T, internal: T) -> Self {
        WithPurpose { external, internal }
    }

    pub fn get_for(&self, purpose: KeyPurpose) -> &T {
        match purpose {
            KeyPurpose::External => &self.external,
            KeyPurpose::Internal => &self.internal,
        }
    }

    pub fn mut_for(&mut self, purpose: KeyPurpose) -> &mut T {
        match purpose {
            KeyPurpose::External => &mut self.external,
            KeyPurpose::Internal => &mut self.internal,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.external, &self.internal].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        [&mut self.external, &mut self.internal].into_iter()
    }
}
