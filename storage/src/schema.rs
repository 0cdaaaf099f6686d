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

//! Describe the database schema at the type level.

use parity_scale_codec::{Decode, Encode};

/// Describes a single named key-value map.
pub trait DBIndex {
    /// Map name; the backend key under which the map lives.
    const NAME: &'static str;

    type Key: Encode + Decode;
    type Value: Encode + Decode;
}

/// What constitutes a valid database schema: a nested tuple of indices,
/// `(Idx1, (Idx2, ()))` and so on, as produced by [`crate::decl_schema!`].
pub trait Schema: internal::Sealed + 'static {
    fn index_names(acc: &mut Vec<&'static str>);
}

impl Schema for () {
    fn index_names(_acc: &mut Vec<&'static str>) {}
}

impl<DBIdx: DBIndex + 'static, Rest: Schema> Schema for (DBIdx, Rest) {
    fn index_names(acc: &mut Vec<&'static str>) {
        acc.push(DBIdx::NAME);
        Rest::index_names(acc);
    }
}

/// All map names of a schema, in declaration order.
pub fn index_names<Sch: Schema>() -> Vec<&'static str> {
    let mut names = Vec::new();
    Sch::index_names(&mut names);
    names
}

/// Require the given schema to contain the given index. The `I` parameter
/// only disambiguates the recursive impls and is always inferred.
pub trait HasDBIndex<DBIdx: DBIndex, I>: Schema {}
impl<DBIdx: DBIndex + 'static, Rest: Schema> HasDBIndex<DBIdx, ()> for (DBIdx, Rest) {}
impl<DBIdx: DBIndex, Head: DBIndex + 'static, Rest: HasDBIndex<DBIdx, I>, I> HasDBIndex<DBIdx, (I,)>
    for (Head, Rest)
{
}

/// Asserts that the SCALE encoding of `Self` starts with the encoding of
/// `P`, so a map keyed by `Self` can be range-scanned by a `P` prefix.
pub trait HasPrefix<P: Encode>: Encode {}

// The empty prefix matches every key, giving whole-map iteration.
impl<K: Encode> HasPrefix<()> for K {}

mod internal {
    use super::*;

    // Prevents the Schema trait from being implemented on new types.
    pub trait Sealed {}
    impl Sealed for () {}
    impl<DBIdx: DBIndex, Rest: Schema> Sealed for (DBIdx, Rest) {}
}

/// Declare a schema type along with a unit struct per map:
///
/// ```
/// storage::decl_schema! {
///     pub Schema {
///         pub DBSomething: Map<u32, Vec<u8>>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! decl_schema {
    (
        $(#[$schema_attr:meta])*
        $svis:vis $schema:ident {
            $(
                $(#[$attr:meta])*
                $vis:vis $name:ident: Map<$key:ty, $val:ty>
            ),* $(,)?
        }
    ) => {
        $(
            $(#[$attr])*
            $vis struct $name;
            impl $crate::schema::DBIndex for $name {
                const NAME: &'static str = stringify!($name);
                type Key = $key;
                type Value = $val;
            }
        )*
        $(#[$schema_attr])*
        $svis type $schema = $crate::decl_schema!(@LIST $($name)*);
    };
    (@LIST) => { () };
    (@LIST $head:ident $($tail:ident)*) => { ($head, $crate::decl_schema!(@LIST $($tail)*)) };
}

#[cfg(test)]
mod tests {
    use super::*;

    decl_schema! {
        TestSchema {
            DBIdx1: Map<u32, u64>,
            DBIdx2: Map<Vec<u8>, Vec<u8>>,
        }
    }

    #[test]
    fn index_names_in_declaration_order() {
        assert_eq!(index_names::<TestSchema>(), vec!["DBIdx1", "DBIdx2"]);
    }

    fn requires_index<DBIdx: DBIndex, I, Sch: HasDBIndex<DBIdx, I>>() {}

    #[test]
    fn schema_contains_declared_indices() {
        // Only interested that this compiles
        requires_index::<DBIdx1, _, TestSchema>();
        requires_index::<DBIdx2, _, TestSchema>();
    }
}
