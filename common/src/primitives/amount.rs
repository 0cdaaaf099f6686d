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
use serde::Serialize;

/// An amount of coins or tokens in indivisible atoms. Arithmetic is checked:
/// additions and subtractions return `None` on overflow/underflow so that
/// callers are forced to handle it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, Serialize, Default,
)]
pub struct Amount {
    atoms: u128,
}

impl Amount {
    pub const ZERO: Amount = Amount { atoms: 0 };

    pub const fn from_atoms(atoms: u128) -> Self {
        Amount { atoms }
    }

    pub const fn into_atoms(self) -> u128 {
        self.atoms
    }
}

impl std::ops::Add for Amount {
    type Output = Option<Amount>;

    fn add(self, other: Amount) -> Option<Amount> {
        self.atoms.checked_add(other.atoms).map(|atoms| Amount { atoms })
    }
}

impl std::ops::Sub for Amount {
    type Output = Option<Amount>;

    fn sub(self, other: Amount) -> Option<Amount> {
        self.atoms.checked_sub(other.atoms).map(|atoms| Amount { atoms })
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.atoms.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_arithmetic() {
        let a = Amount::from_atoms(5);
        let b = Amount::from_atoms(3);
        assert_eq!((a + b).unwrap(), Amount::from_atoms(8));
        assert_eq!((a - b).unwrap(), Amount::from_atoms(2));
        assert_eq!(b - a, None);
        assert_eq!(Amount::from_atoms(u128::MAX) + Amount::from_atoms(1), None);
    }
}
