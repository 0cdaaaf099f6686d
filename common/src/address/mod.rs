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

//! Address encoding and canonicalization.
//!
//! Several address shapes share the same payment credential and differ only
//! in auxiliary information (staking credential, chain pointer). For wallet
//! bookkeeping they are all the same destination, so base, pointer and group
//! addresses reduce to the enterprise address carrying their payment
//! credential. That reduced form is the canonical one used to deduplicate
//! addresses across wire encodings.

pub mod pubkeyhash;

use parity_scale_codec::{Decode, DecodeAll, Encode};

use crate::primitives::hash::{hash_bytes, H256};
use crate::primitives::SlotNumber;

pub use pubkeyhash::Credential;

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum AddressError {
    #[error("Unrecognized address encoding")]
    InvalidEncoding,
}

/// The shape tag of an address, stored alongside each address row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, serde::Serialize)]
pub enum AddressKind {
    #[codec(index = 0)]
    Legacy,
    #[codec(index = 1)]
    Base,
    #[codec(index = 2)]
    Enterprise,
    #[codec(index = 3)]
    Pointer,
    #[codec(index = 4)]
    Group,
    #[codec(index = 5)]
    Account,
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AddressKind::Legacy => "legacy",
            AddressKind::Base => "base",
            AddressKind::Enterprise => "enterprise",
            AddressKind::Pointer => "pointer",
            AddressKind::Group => "group",
            AddressKind::Account => "account",
        };
        f.write_str(name)
    }
}

/// An indirect reference to a staking registration: the position of the
/// registration certificate on the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct ChainPointer {
    pub slot: SlotNumber,
    pub tx_index: u32,
    pub cert_index: u32,
}

/// A decoded address. The SCALE encoding of this enum is the wire form;
/// an address row's digest is the blake2b hash of those bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub enum Address {
    /// Pre-HD-scheme address with an opaque payload.
    #[codec(index = 0)]
    Legacy { payload: Vec<u8> },
    /// Payment credential plus a staking credential.
    #[codec(index = 1)]
    Base {
        payment: Credential,
        staking: Credential,
    },
    /// Payment credential only.
    #[codec(index = 2)]
    Enterprise { payment: Credential },
    /// Payment credential plus a pointer to a staking registration.
    #[codec(index = 3)]
    Pointer {
        payment: Credential,
        pointer: ChainPointer,
    },
    /// Payment credential plus a grouped secondary credential.
    #[codec(index = 4)]
    Group {
        payment: Credential,
        group: Credential,
    },
    /// A rewards account address; participates in account-style accounting
    /// rather than the UTXO model.
    #[codec(index = 5)]
    Account { staking: Credential },
}

impl Address {
    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Legacy { .. } => AddressKind::Legacy,
            Address::Base { .. } => AddressKind::Base,
            Address::Enterprise { .. } => AddressKind::Enterprise,
            Address::Pointer { .. } => AddressKind::Pointer,
            Address::Group { .. } => AddressKind::Group,
            Address::Account { .. } => AddressKind::Account,
        }
    }

    pub fn wire_bytes(&self) -> Vec<u8> {
        self.encode()
    }

    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Address, AddressError> {
        Address::decode_all(&mut &bytes[..]).map_err(|_| AddressError::InvalidEncoding)
    }

    /// Content digest of the wire form; the deduplication key of address rows.
    pub fn digest(&self) -> H256 {
        hash_bytes(&self.wire_bytes())
    }

    pub fn payment_credential(&self) -> Option<&Credential> {
        match self {
            Address::Base { payment, .. }
            | Address::Enterprise { payment }
            | Address::Pointer { payment, .. }
            | Address::Group { payment, .. } => Some(payment),
            Address::Legacy { .. } | Address::Account { .. } => None,
        }
    }

    /// Reduce to the canonical form sharing this address's payment
    /// credential, or `None` when the address is its own canonical form.
    pub fn to_canonical(&self) -> Option<Address> {
        match self {
            Address::Base { payment, .. }
            | Address::Pointer { payment, .. }
            | Address::Group { payment, .. } => Some(Address::Enterprise { payment: *payment }),
            Address::Legacy { .. } | Address::Enterprise { .. } | Address::Account { .. } => None,
        }
    }

    /// Whether this address takes part in account-style accounting instead
    /// of the UTXO model.
    pub fn is_accounting(&self) -> bool {
        matches!(self, Address::Account { .. })
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), hex::encode(self.wire_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rstest::rstest;
    use test_utils::random::{make_seedable_rng, Seed};

    fn random_credential(rng: &mut impl Rng) -> Credential {
        let mut bytes = [0_u8; pubkeyhash::CREDENTIAL_SIZE];
        rng.fill(&mut bytes[..]);
        Credential::from_raw(bytes)
    }

    #[rstest]
    #[case(Seed::from_entropy())]
    fn wire_roundtrip(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);
        let addresses = vec![
            Address::Legacy {
                payload: (0..rng.gen_range(1..64)).map(|_| rng.gen()).collect(),
            },
            Address::Base {
                payment: random_credential(&mut rng),
                staking: random_credential(&mut rng),
            },
            Address::Enterprise {
                payment: random_credential(&mut rng),
            },
            Address::Pointer {
                payment: random_credential(&mut rng),
                pointer: ChainPointer {
                    slot: SlotNumber::new(rng.gen()),
                    tx_index: rng.gen(),
                    cert_index: rng.gen(),
                },
            },
            Address::Account {
                staking: random_credential(&mut rng),
            },
        ];

        for address in addresses {
            let decoded = Address::from_wire_bytes(&address.wire_bytes()).unwrap();
            assert_eq!(decoded, address);
            assert_eq!(decoded.digest(), address.digest());
        }
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = Address::Enterprise {
            payment: Credential::from_raw([7_u8; pubkeyhash::CREDENTIAL_SIZE]),
        }
        .wire_bytes();
        bytes.push(0);
        assert_eq!(
            Address::from_wire_bytes(&bytes),
            Err(AddressError::InvalidEncoding)
        );
    }

    #[rstest]
    #[case(Seed::from_entropy())]
    fn canonical_form_shares_payment_credential(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);
        let payment = random_credential(&mut rng);

        let base = Address::Base {
            payment,
            staking: random_credential(&mut rng),
        };
        let pointer = Address::Pointer {
            payment,
            pointer: ChainPointer {
                slot: SlotNumber::new(rng.gen()),
                tx_index: rng.gen(),
                cert_index: rng.gen(),
            },
        };
        let enterprise = Address::Enterprise { payment };

        assert_eq!(base.to_canonical().unwrap(), enterprise);
        assert_eq!(pointer.to_canonical().unwrap(), enterprise);
        assert_eq!(enterprise.to_canonical(), None);

        // Different wire forms, one canonical identity
        assert_ne!(base.digest(), enterprise.digest());
        assert_eq!(
            base.to_canonical().unwrap().digest(),
            pointer.to_canonical().unwrap().digest()
        );
    }
}
