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

//! In-memory storage backend implementation.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::{Backend, TxRo, TxRw};
use crate::{Data, Error};

// The committed data, one map per db index.
type MapSet = BTreeMap<&'static str, BTreeMap<Data, Data>>;

// Changes buffered by a read-write transaction; `None` marks a deletion.
type DeltaSet = BTreeMap<&'static str, BTreeMap<Data, Option<Data>>>;

/// In-memory backend: a set of BTree maps behind a read-write lock.
///
/// Read transactions take the shared side of the lock, the write transaction
/// takes the exclusive side, so there is one writer at a time and writers see
/// a stable snapshot by construction.
#[derive(Clone, Default)]
pub struct InMemory {
    maps: Arc<RwLock<MapSet>>,
}

impl InMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lookup<'m>(
    maps: &'m MapSet,
    map: &'static str,
) -> crate::Result<&'m BTreeMap<Data, Data>> {
    maps.get(map).ok_or(Error::MapNotFound(map))
}

fn prefix_range(map: &BTreeMap<Data, Data>, prefix: &[u8]) -> Vec<(Data, Data)> {
    map.range(prefix.to_vec()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

impl Backend for InMemory {
    type TxRo<'a> = InMemoryTxRo<'a>;
    type TxRw<'a> = InMemoryTxRw<'a>;

    fn init(&self, maps: &[&'static str]) -> crate::Result<()> {
        let mut guard = self.maps.write().map_err(|_| Error::LockPoisoned)?;
        for map in maps {
            guard.entry(map).or_default();
        }
        Ok(())
    }

    fn transaction_ro(&self) -> crate::Result<Self::TxRo<'_>> {
        let maps = self.maps.read().map_err(|_| Error::LockPoisoned)?;
        Ok(InMemoryTxRo { maps })
    }

    fn transaction_rw(&self) -> crate::Result<Self::TxRw<'_>> {
        let maps = self.maps.write().map_err(|_| Error::LockPoisoned)?;
        Ok(InMemoryTxRw {
            maps,
            delta: DeltaSet::new(),
        })
    }
}

pub struct InMemoryTxRo<'a> {
    maps: RwLockReadGuard<'a, MapSet>,
}

impl TxRo for InMemoryTxRo<'_> {
    fn get(&self, map: &'static str, key: &[u8]) -> crate::Result<Option<Data>> {
        Ok(lookup(&self.maps, map)?.get(key).cloned())
    }

    fn prefix_iter(&self, map: &'static str, prefix: &[u8]) -> crate::Result<Vec<(Data, Data)>> {
        Ok(prefix_range(lookup(&self.maps, map)?, prefix))
    }
}

pub struct InMemoryTxRw<'a> {
    maps: RwLockWriteGuard<'a, MapSet>,
    delta: DeltaSet,
}

impl TxRo for InMemoryTxRw<'_> {
    fn get(&self, map: &'static str, key: &[u8]) -> crate::Result<Option<Data>> {
        let base = lookup(&self.maps, map)?;
        match self.delta.get(map).and_then(|d| d.get(key)) {
            Some(change) => Ok(change.clone()),
            None => Ok(base.get(key).cloned()),
        }
    }

    fn prefix_iter(&self, map: &'static str, prefix: &[u8]) -> crate::Result<Vec<(Data, Data)>> {
        let base = lookup(&self.maps, map)?;
        let mut merged: BTreeMap<Data, Data> = prefix_range(base, prefix).into_iter().collect();
        if let Some(delta) = self.delta.get(map) {
            for (key, change) in delta.iter().filter(|(key, _)| key.starts_with(prefix)) {
                match change {
                    Some(value) => {
                        merged.insert(key.clone(), value.clone());
                    }
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

impl TxRw for InMemoryTxRw<'_> {
    fn put(&mut self, map: &'static str, key: Data, value: Data) -> crate::Result<()> {
        lookup(&self.maps, map)?;
        self.delta.entry(map).or_default().insert(key, Some(value));
        Ok(())
    }

    fn del(&mut self, map: &'static str, key: &[u8]) -> crate::Result<()> {
        lookup(&self.maps, map)?;
        self.delta.entry(map).or_default().insert(key.to_vec(), None);
        Ok(())
    }

    fn commit(mut self) -> crate::Result<()> {
        for (map, delta) in std::mem::take(&mut self.delta) {
            let base = self.maps.get_mut(map).expect("map presence checked on write");
            for (key, change) in delta {
                match change {
                    Some(value) => {
                        base.insert(key, value);
                    }
                    None => {
                        base.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn abort(self) {}
}
