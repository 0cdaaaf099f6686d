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

//! Typed transactions over a raw backend transaction.

use std::marker::PhantomData;

use parity_scale_codec::{Decode, Encode};

use crate::backend::{Backend, TxRo, TxRw};
use crate::schema::{DBIndex, HasDBIndex, HasPrefix, Schema};
use crate::{Data, Error};

fn decode<T: Decode>(data: &Data) -> crate::Result<T> {
    T::decode(&mut data.as_slice()).map_err(|e| Error::Decoding(e.to_string()))
}

fn decode_entries<DbMap: DBIndex>(
    entries: Vec<(Data, Data)>,
) -> crate::Result<Vec<(DbMap::Key, DbMap::Value)>> {
    entries
        .into_iter()
        .map(|(key, value)| Ok((decode::<DbMap::Key>(&key)?, decode::<DbMap::Value>(&value)?)))
        .collect()
}

/// A read-only transaction: a consistent snapshot of the store.
pub struct TransactionRo<'st, B: Backend + 'st, Sch: Schema> {
    tx: B::TxRo<'st>,
    _schema: PhantomData<fn() -> Sch>,
}

impl<'st, B: Backend, Sch: Schema> TransactionRo<'st, B, Sch> {
    pub(crate) fn new(tx: B::TxRo<'st>) -> Self {
        Self {
            tx,
            _schema: PhantomData,
        }
    }

    pub fn get<DbMap: DBIndex, I>(&self, key: &DbMap::Key) -> crate::Result<Option<DbMap::Value>>
    where
        Sch: HasDBIndex<DbMap, I>,
    {
        self.tx.get(DbMap::NAME, &key.encode())?.as_ref().map(decode::<DbMap::Value>).transpose()
    }

    /// All entries whose key begins with the given prefix, in key order.
    pub fn prefix_iter<DbMap: DBIndex, P: Encode, I>(
        &self,
        prefix: &P,
    ) -> crate::Result<Vec<(DbMap::Key, DbMap::Value)>>
    where
        DbMap::Key: HasPrefix<P>,
        Sch: HasDBIndex<DbMap, I>,
    {
        decode_entries::<DbMap>(self.tx.prefix_iter(DbMap::NAME, &prefix.encode())?)
    }

    /// Close the transaction.
    pub fn close(self) {}
}

/// A read-write transaction. Changes become visible to others only after
/// [`Self::commit`]; dropping the transaction discards them.
pub struct TransactionRw<'st, B: Backend + 'st, Sch: Schema> {
    tx: B::TxRw<'st>,
    _schema: PhantomData<fn() -> Sch>,
}

impl<'st, B: Backend, Sch: Schema> TransactionRw<'st, B, Sch> {
    pub(crate) fn new(tx: B::TxRw<'st>) -> Self {
        Self {
            tx,
            _schema: PhantomData,
        }
    }

    pub fn get<DbMap: DBIndex, I>(&self, key: &DbMap::Key) -> crate::Result<Option<DbMap::Value>>
    where
        Sch: HasDBIndex<DbMap, I>,
    {
        self.tx.get(DbMap::NAME, &key.encode())?.as_ref().map(decode::<DbMap::Value>).transpose()
    }

    pub fn prefix_iter<DbMap: DBIndex, P: Encode, I>(
        &self,
        prefix: &P,
    ) -> crate::Result<Vec<(DbMap::Key, DbMap::Value)>>
    where
        DbMap::Key: HasPrefix<P>,
        Sch: HasDBIndex<DbMap, I>,
    {
        decode_entries::<DbMap>(self.tx.prefix_iter(DbMap::NAME, &prefix.encode())?)
    }

    pub fn put<DbMap: DBIndex, I>(
        &mut self,
        key: &DbMap::Key,
        value: &DbMap::Value,
    ) -> crate::Result<()>
    where
        Sch: HasDBIndex<DbMap, I>,
    {
        self.tx.put(DbMap::NAME, key.encode(), value.encode())
    }

    pub fn del<DbMap: DBIndex, I>(&mut self, key: &DbMap::Key) -> crate::Result<()>
    where
        Sch: HasDBIndex<DbMap, I>,
    {
        self.tx.del(DbMap::NAME, &key.encode())
    }

    /// Apply the buffered changes atomically.
    pub fn commit(self) -> crate::Result<()> {
        self.tx.commit()
    }

    /// Discard the buffered changes.
    pub fn abort(self) {
        self.tx.abort()
    }
}

#[cfg(test)]
mod tests {
    use parity_scale_codec::{Decode, Encode};

    use crate::{HasPrefix, InMemory, Storage};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
    struct PairKey {
        group: u64,
        index: u32,
    }

    impl HasPrefix<u64> for PairKey {}

    crate::decl_schema! {
        Schema {
            DBNumbers: Map<u64, String>,
            DBPairs: Map<PairKey, u32>,
        }
    }

    fn make_store() -> Storage<InMemory, Schema> {
        Storage::new(InMemory::new()).unwrap()
    }

    #[test]
    fn put_get_del_roundtrip() {
        let store = make_store();

        let mut tx = store.transaction_rw().unwrap();
        tx.put::<DBNumbers, _>(&1, &"one".into()).unwrap();
        tx.put::<DBNumbers, _>(&2, &"two".into()).unwrap();
        // Uncommitted changes are visible inside the transaction
        assert_eq!(tx.get::<DBNumbers, _>(&1).unwrap(), Some("one".into()));
        tx.commit().unwrap();

        let mut tx = store.transaction_rw().unwrap();
        tx.del::<DBNumbers, _>(&1).unwrap();
        assert_eq!(tx.get::<DBNumbers, _>(&1).unwrap(), None);
        tx.commit().unwrap();

        let tx = store.transaction_ro().unwrap();
        assert_eq!(tx.get::<DBNumbers, _>(&1).unwrap(), None);
        assert_eq!(tx.get::<DBNumbers, _>(&2).unwrap(), Some("two".into()));
    }

    #[test]
    fn abort_leaves_no_trace() {
        let store = make_store();

        let mut tx = store.transaction_rw().unwrap();
        tx.put::<DBNumbers, _>(&7, &"seven".into()).unwrap();
        tx.abort();

        let tx = store.transaction_ro().unwrap();
        assert_eq!(tx.get::<DBNumbers, _>(&7).unwrap(), None);
    }

    #[test]
    fn drop_without_commit_leaves_no_trace() {
        let store = make_store();

        {
            let mut tx = store.transaction_rw().unwrap();
            tx.put::<DBNumbers, _>(&7, &"seven".into()).unwrap();
        }

        let tx = store.transaction_ro().unwrap();
        assert_eq!(tx.get::<DBNumbers, _>(&7).unwrap(), None);
    }

    #[test]
    fn prefix_iteration_sees_buffered_changes() {
        let store = make_store();

        let mut tx = store.transaction_rw().unwrap();
        for index in 0..4_u32 {
            tx.put::<DBPairs, _>(&PairKey { group: 1, index }, &(index * 10)).unwrap();
        }
        tx.put::<DBPairs, _>(&PairKey { group: 2, index: 0 }, &999).unwrap();
        tx.commit().unwrap();

        let mut tx = store.transaction_rw().unwrap();
        tx.del::<DBPairs, _>(&PairKey { group: 1, index: 0 }).unwrap();
        tx.put::<DBPairs, _>(&PairKey { group: 1, index: 4 }, &40).unwrap();

        let entries = tx.prefix_iter::<DBPairs, _, _>(&1_u64).unwrap();
        let keys: Vec<u32> = entries.iter().map(|(key, _)| key.index).collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);

        tx.commit().unwrap();

        let tx = store.transaction_ro().unwrap();
        assert_eq!(tx.prefix_iter::<DBPairs, _, _>(&1_u64).unwrap().len(), 4);
        assert_eq!(tx.prefix_iter::<DBPairs, _, _>(&2_u64).unwrap().len(), 1);
        // The unit prefix iterates the whole map
        assert_eq!(tx.prefix_iter::<DBPairs, _, _>(&()).unwrap().len(), 5);
    }
}
