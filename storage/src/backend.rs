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

//! The raw, untyped interface a storage backend implements.

use crate::Data;

/// Read operations available in any transaction.
pub trait TxRo {
    fn get(&self, map: &'static str, key: &[u8]) -> crate::Result<Option<Data>>;

    /// All entries whose key starts with the given byte prefix, in key order.
    fn prefix_iter(&self, map: &'static str, prefix: &[u8]) -> crate::Result<Vec<(Data, Data)>>;
}

/// Write operations; buffered until `commit`.
pub trait TxRw: TxRo {
    fn put(&mut self, map: &'static str, key: Data, value: Data) -> crate::Result<()>;

    fn del(&mut self, map: &'static str, key: &[u8]) -> crate::Result<()>;

    /// Apply all buffered changes atomically.
    fn commit(self) -> crate::Result<()>;

    /// Discard all buffered changes.
    fn abort(self);
}

/// A storage backend: hands out transactions over its maps.
pub trait Backend: Send + Sync + 'static {
    type TxRo<'a>: TxRo
    where
        Self: 'a;
    type TxRw<'a>: TxRw
    where
        Self: 'a;

    /// Create the maps named by the injected schema.
    fn init(&self, maps: &[&'static str]) -> crate::Result<()>;

    fn transaction_ro(&self) -> crate::Result<Self::TxRo<'_>>;

    fn transaction_rw(&self) -> crate::Result<Self::TxRw<'_>>;
}
