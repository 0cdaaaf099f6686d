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

use crypto::key::hdkd::child_number::ChildNumber;

use crate::ids::{KeyRowId, NodeId};

/// A node of the key derivation tree.
///
/// The root has neither parent nor index; every other node has exactly one
/// of each. Nodes are only ever created as children of existing nodes and
/// never re-parented, which keeps the tree acyclic by construction. Key
/// references are optional: path-only nodes carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct KeyDerivationNode {
    parent: Option<NodeId>,
    index: Option<ChildNumber>,
    private_key_id: Option<KeyRowId>,
    public_key_id: Option<KeyRowId>,
}

impl KeyDerivationNode {
    /// A tree root. The only node shape allowed to omit parent and index.
    pub fn root(private_key_id: Option<KeyRowId>, public_key_id: Option<KeyRowId>) -> Self {
        KeyDerivationNode {
            parent: None,
            index: None,
            private_key_id,
            public_key_id,
        }
    }

    pub fn child(
        parent: NodeId,
        index: ChildNumber,
        private_key_id: Option<KeyRowId>,
        public_key_id: Option<KeyRowId>,
    ) -> Self {
        KeyDerivationNode {
            parent: Some(parent),
            index: Some(index),
            private_key_id,
            public_key_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn index(&self) -> Option<ChildNumber> {
        self.index
    }

    pub fn private_key_id(&self) -> Option<KeyRowId> {
        self.private_key_id
    }

    pub fn public_key_id(&self) -> Option<KeyRowId> {
        self.public_key_id
    }
}
