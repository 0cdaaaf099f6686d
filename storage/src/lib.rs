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

//! Schema-aware transactional key-value storage.
//!
//! Storage is a collection of named key-value maps. The set of maps is
//! declared at the type level with [`decl_schema!`] and injected into the
//! store at construction; accessing a map that is not part of the schema is
//! a compile error at the typed layer and a hard error at the raw layer.
//!
//! All access goes through transactions. A read-write transaction buffers
//! its changes and applies them atomically on `commit`; dropping or aborting
//! it leaves the store untouched. There is a single logical writer per store:
//! a read-write transaction excludes all other transactions for its lifetime.
//!
//! ```
//! use storage::{InMemory, Storage};
//!
//! storage::decl_schema! {
//!     Schema {
//!         DBDemo: Map<u64, String>,
//!     }
//! }
//!
//! let store: Storage<InMemory, Schema> = Storage::new(InMemory::new()).unwrap();
//!
//! let mut tx = store.transaction_rw().unwrap();
//! tx.put::<DBDemo, _>(&3, &"three".into()).unwrap();
//! tx.commit().unwrap();
//!
//! let tx = store.transaction_ro().unwrap();
//! assert_eq!(tx.get::<DBDemo, _>(&3).unwrap(), Some("three".into()));
//! ```

pub mod backend;
pub mod error;
pub mod inmemory;
pub mod schema;
pub mod transaction;

pub use backend::Backend;
pub use error::Error;
pub use inmemory::InMemory;
pub use schema::HasPrefix;
pub use transaction::{TransactionRo, TransactionRw};

use schema::Schema;

/// Raw byte blobs stored in the backend maps.
pub type Data = Vec<u8>;

pub type Result<T> = std::result::Result<T, Error>;

/// A storage instance: a backend plus the schema describing its maps.
pub struct Storage<B: Backend, Sch: Schema> {
    backend: B,
    _schema: std::marker::PhantomData<fn() -> Sch>,
}

impl<B: Backend, Sch: Schema> Storage<B, Sch> {
    /// Set up the backend with the maps named by the schema.
    pub fn new(backend: B) -> Result<Self> {
        backend.init(&schema::index_names::<Sch>())?;
        Ok(Storage {
            backend,
            _schema: std::marker::PhantomData,
        })
    }

    /// Start a read-only transaction.
    pub fn transaction_ro(&self) -> Result<TransactionRo<'_, B, Sch>> {
        self.backend.transaction_ro().map(TransactionRo::new)
    }

    /// Start a read-write transaction. Blocks while another read-write
    /// transaction is live; this store has a single logical writer.
    pub fn transaction_rw(&self) -> Result<TransactionRw<'_, B, Sch>> {
        self.backend.transaction_rw().map(TransactionRw::new)
    }
}

impl<B: Backend + Clone, Sch: Schema> Clone for Storage<B, Sch> {
    fn clone(&self) -> Self {
        Storage {
            backend: self.backend.clone(),
            _schema: std::marker::PhantomData,
        }
    }
}
