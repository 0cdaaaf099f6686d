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

//! Transactional wallet construction.
//!
//! The builder accumulates declarative build steps and executes all of them
//! inside one read-write transaction on [`WalletBuilder::commit`]. Step
//! ordering is enforced at compile time: each step consumes the builder and
//! returns one parameterized with the next phase marker, so "add a public
//! deriver before a wrapper exists" is not expressible. If any step fails
//! during commit the transaction is aborted and no partial wallet is ever
//! visible.

use std::marker::PhantomData;
use std::sync::Arc;

use common::chain::ChainConfig;
use crypto::key::extended::{ExtendedPrivateKey, ExtendedPublicKey};
use crypto::key::hdkd::child_number::ChildNumber;
use crypto::key::hdkd::u31::U31;
use wallet_storage::{
    encrypt_key_material, password_to_sym_key, Store, StoreTxRw, WalletStorageReadLocked,
    WalletStorageWriteLocked, CURRENT_STORAGE_VERSION,
};
use wallet_types::{
    DerivationLevel, DeriverId, HardwareWalletData, KeyRow, LastSyncInfo, NextRowIds,
    NodeChildId, NodeId, PublicDeriverInfo, WalletId, WalletInfo, WalletWrapper,
};

use crate::key_chain::{
    add_child_node, add_public_key_row, add_root_node, AccountKeyChain, KeyChainError,
    MasterKeyChain, WalletScheme,
};
use crate::{WalletError, WalletResult};

/// Phase marker: nothing declared yet.
pub struct NeedsWallet;
/// Phase marker: conceptual wallet declared, wrapper missing.
pub struct NeedsWrapper;
/// Phase marker: wrapper declared, derivation root missing.
pub struct NeedsRoot;
/// Phase marker: root declared; derivers may be added and commit is allowed.
pub struct Ready;

enum BuildStep {
    CreateWallet {
        name: String,
    },
    CreateWrapper {
        scheme: WalletScheme,
    },
    AddEncryptedRoot {
        root: ExtendedPrivateKey,
        password: String,
    },
    AddAdHocPublicRoot {
        account_pubkey: ExtendedPublicKey,
        hw_data: HardwareWalletData,
    },
    AddPublicDeriver {
        name: String,
    },
}

/// The result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltWallet {
    pub wallet_id: WalletId,
    pub derivers: Vec<DeriverId>,
}

/// See the module documentation.
pub struct WalletBuilder<'a, B: storage::Backend, Phase> {
    db: &'a Store<B>,
    chain_config: Arc<ChainConfig>,
    steps: Vec<BuildStep>,
    _phase: PhantomData<Phase>,
}

impl<'a, B: storage::Backend, Phase> WalletBuilder<'a, B, Phase> {
    fn into_phase<Next>(self) -> WalletBuilder<'a, B, Next> {
        WalletBuilder {
            db: self.db,
            chain_config: self.chain_config,
            steps: self.steps,
            _phase: PhantomData,
        }
    }
}

impl<'a, B: storage::Backend> WalletBuilder<'a, B, NeedsWallet> {
    pub fn new(db: &'a Store<B>, chain_config: Arc<ChainConfig>) -> Self {
        WalletBuilder {
            db,
            chain_config,
            steps: Vec::new(),
            _phase: PhantomData,
        }
    }

    /// Declare the conceptual wallet.
    pub fn create_wallet(mut self, name: &str) -> WalletBuilder<'a, B, NeedsWrapper> {
        self.steps.push(BuildStep::CreateWallet {
            name: name.to_owned(),
        });
        self.into_phase()
    }
}

impl<'a, B: storage::Backend> WalletBuilder<'a, B, NeedsWrapper> {
    /// Declare a legacy-scheme wrapper.
    pub fn with_bip44_wrapper(mut self) -> WalletBuilder<'a, B, NeedsRoot> {
        self.steps.push(BuildStep::CreateWrapper {
            scheme: WalletScheme::Bip44,
        });
        self.into_phase()
    }

    /// Declare a current-scheme wrapper.
    pub fn with_cip1852_wrapper(mut self) -> WalletBuilder<'a, B, NeedsRoot> {
        self.steps.push(BuildStep::CreateWrapper {
            scheme: WalletScheme::Cip1852,
        });
        self.into_phase()
    }
}

impl<'a, B: storage::Backend> WalletBuilder<'a, B, NeedsRoot> {
    /// Root the private derivation tree in the given key, stored encrypted
    /// under the password. The software-wallet path.
    pub fn with_encrypted_root(
        mut self,
        root: ExtendedPrivateKey,
        password: &str,
    ) -> WalletBuilder<'a, B, Ready> {
        self.steps.push(BuildStep::AddEncryptedRoot {
            root,
            password: password.to_owned(),
        });
        self.into_phase()
    }

    /// Attach a public key provided by an external signing device instead
    /// of a private root. The hardware-wallet ("ad-hoc") path.
    pub fn with_adhoc_public_root(
        mut self,
        account_pubkey: ExtendedPublicKey,
        hw_data: HardwareWalletData,
    ) -> WalletBuilder<'a, B, Ready> {
        self.steps.push(BuildStep::AddAdHocPublicRoot {
            account_pubkey,
            hw_data,
        });
        self.into_phase()
    }
}

enum RootSource {
    Software {
        root_node: NodeId,
        key: ExtendedPrivateKey,
    },
    AdHoc {
        root_node: NodeId,
        pubkey: ExtendedPublicKey,
    },
}

#[derive(Default)]
struct BuildState {
    wallet_id: Option<WalletId>,
    wallet_info: Option<WalletInfo>,
    scheme: Option<WalletScheme>,
    wrapper: Option<WalletWrapper>,
    root: Option<RootSource>,
    derivers: Vec<DeriverId>,
}

impl BuildState {
    fn wallet_id(&self) -> WalletResult<WalletId> {
        self.wallet_id.ok_or(WalletError::StaleState("builder ran without a wallet step"))
    }

    fn scheme(&self) -> WalletResult<WalletScheme> {
        self.scheme.ok_or(WalletError::StaleState("builder ran without a wrapper step"))
    }
}

impl<'a, B: storage::Backend> WalletBuilder<'a, B, Ready> {
    /// Add a named account entry point. Repeatable; ordinals are assigned
    /// in declaration order.
    pub fn add_public_deriver(mut self, name: &str) -> Self {
        self.steps.push(BuildStep::AddPublicDeriver {
            name: name.to_owned(),
        });
        self
    }

    /// Execute all declared steps, in order, inside a single transaction.
    pub fn commit(self) -> WalletResult<BuiltWallet> {
        let mut db_tx = self.db.transaction_rw()?;
        match Self::run_steps(&mut db_tx, &self.chain_config, self.steps) {
            Ok(built) => {
                db_tx.commit()?;
                log::info!(
                    "created wallet {} with {} public deriver(s)",
                    built.wallet_id,
                    built.derivers.len()
                );
                Ok(built)
            }
            Err(e) => {
                db_tx.abort();
                Err(e)
            }
        }
    }

    fn run_steps(
        db_tx: &mut StoreTxRw<'_, B>,
        chain_config: &Arc<ChainConfig>,
        steps: Vec<BuildStep>,
    ) -> WalletResult<BuiltWallet> {
        let mut ids = db_tx.get_next_row_ids()?;
        let mut state = BuildState::default();

        for step in steps {
            match step {
                BuildStep::CreateWallet { name } => {
                    Self::step_create_wallet(db_tx, chain_config, &mut ids, &mut state, name)?
                }
                BuildStep::CreateWrapper { scheme } => {
                    Self::step_create_wrapper(db_tx, &mut state, scheme)?
                }
                BuildStep::AddEncryptedRoot { root, password } => {
                    Self::step_add_encrypted_root(db_tx, &mut ids, &mut state, root, &password)?
                }
                BuildStep::AddAdHocPublicRoot {
                    account_pubkey,
                    hw_data,
                } => Self::step_add_adhoc_root(db_tx, &mut ids, &mut state, account_pubkey, hw_data)?,
                BuildStep::AddPublicDeriver { name } => {
                    Self::step_add_public_deriver(db_tx, chain_config, &mut ids, &mut state, name)?
                }
            }
        }

        db_tx.set_next_row_ids(&ids)?;
        db_tx.set_storage_version(CURRENT_STORAGE_VERSION)?;

        Ok(BuiltWallet {
            wallet_id: state.wallet_id()?,
            derivers: state.derivers,
        })
    }

    fn step_create_wallet(
        db_tx: &mut StoreTxRw<'_, B>,
        chain_config: &ChainConfig,
        ids: &mut NextRowIds,
        state: &mut BuildState,
        name: String,
    ) -> WalletResult<()> {
        let wallet_id = ids.next_wallet_id();
        let info = WalletInfo::new(name, chain_config.network_id());
        db_tx.set_wallet(&wallet_id, &info)?;
        state.wallet_id = Some(wallet_id);
        state.wallet_info = Some(info);
        Ok(())
    }

    fn step_create_wrapper(
        db_tx: &mut StoreTxRw<'_, B>,
        state: &mut BuildState,
        scheme: WalletScheme,
    ) -> WalletResult<()> {
        let wallet_id = state.wallet_id()?;
        let wrapper = match scheme {
            WalletScheme::Bip44 => WalletWrapper::new_bip44(
                DerivationLevel::Root,
                DerivationLevel::Account,
                None,
            ),
            WalletScheme::Cip1852 => WalletWrapper::new_cip1852(
                DerivationLevel::Root,
                DerivationLevel::Account,
                None,
            ),
        };
        db_tx.set_wallet_wrapper(&wallet_id, &wrapper)?;
        state.scheme = Some(scheme);
        state.wrapper = Some(wrapper);
        Ok(())
    }

    fn step_add_encrypted_root(
        db_tx: &mut StoreTxRw<'_, B>,
        ids: &mut NextRowIds,
        state: &mut BuildState,
        root: ExtendedPrivateKey,
        password: &str,
    ) -> WalletResult<()> {
        let wallet_id = state.wallet_id()?;
        let scheme = state.scheme()?;
        if root.kind() != scheme.key_kind() {
            return Err(KeyChainError::KeyKindMismatch.into());
        }

        let (sym_key, challenge) = password_to_sym_key(password)?;
        let material = encrypt_key_material(&sym_key, &challenge, &root)?;
        let private_key_row = ids.next_key_id();
        db_tx.set_key_row(&private_key_row, &KeyRow::new(root.kind(), material))?;
        let public_key_row = add_public_key_row(db_tx, ids, &root.to_public_key())?;

        let root_node = add_root_node(db_tx, ids, Some(private_key_row), Some(public_key_row))?;

        let wrapper = state
            .wrapper
            .take()
            .ok_or(WalletError::StaleState("builder ran without a wrapper step"))?
            .with_private_root(root_node);
        db_tx.set_wallet_wrapper(&wallet_id, &wrapper)?;
        state.wrapper = Some(wrapper);
        state.root = Some(RootSource::Software {
            root_node,
            key: root,
        });
        Ok(())
    }

    fn step_add_adhoc_root(
        db_tx: &mut StoreTxRw<'_, B>,
        ids: &mut NextRowIds,
        state: &mut BuildState,
        account_pubkey: ExtendedPublicKey,
        hw_data: HardwareWalletData,
    ) -> WalletResult<()> {
        let wallet_id = state.wallet_id()?;
        let scheme = state.scheme()?;
        if account_pubkey.kind() != scheme.key_kind() {
            return Err(KeyChainError::KeyKindMismatch.into());
        }

        let public_key_row = add_public_key_row(db_tx, ids, &account_pubkey)?;
        let root_node = add_root_node(db_tx, ids, None, Some(public_key_row))?;

        // The signing key never leaves the device, so signing happens at
        // the account level and there is no private root.
        let wrapper = match scheme {
            WalletScheme::Bip44 => WalletWrapper::new_bip44(
                DerivationLevel::Account,
                DerivationLevel::Account,
                None,
            ),
            WalletScheme::Cip1852 => WalletWrapper::new_cip1852(
                DerivationLevel::Account,
                DerivationLevel::Account,
                None,
            ),
        };
        db_tx.set_wallet_wrapper(&wallet_id, &wrapper)?;
        state.wrapper = Some(wrapper);

        let info = state
            .wallet_info
            .take()
            .ok_or(WalletError::StaleState("builder ran without a wallet step"))?
            .with_hardware(hw_data);
        db_tx.set_wallet(&wallet_id, &info)?;
        state.wallet_info = Some(info);

        state.root = Some(RootSource::AdHoc {
            root_node,
            pubkey: account_pubkey,
        });
        Ok(())
    }

    fn step_add_public_deriver(
        db_tx: &mut StoreTxRw<'_, B>,
        chain_config: &Arc<ChainConfig>,
        ids: &mut NextRowIds,
        state: &mut BuildState,
        name: String,
    ) -> WalletResult<()> {
        let wallet_id = state.wallet_id()?;
        let scheme = state.scheme()?;
        let ordinal = state.derivers.len() as u32;
        let account_index = U31::from_u32(ordinal)
            .ok_or(WalletError::StaleState("public deriver ordinal out of range"))?;

        let (account_node, account_pubkey) = match &state.root {
            Some(RootSource::Software { root_node, key }) => {
                let account_key = MasterKeyChain::derive_account_key(
                    chain_config,
                    key,
                    scheme,
                    account_index,
                )?;
                let account_pubkey = account_key.to_public_key();

                let purpose_node =
                    Self::ensure_path_node(db_tx, ids, *root_node, scheme.purpose_index())?;
                let coin_node =
                    Self::ensure_path_node(db_tx, ids, purpose_node, chain_config.coin_type())?;
                let key_row = add_public_key_row(db_tx, ids, &account_pubkey)?;
                let account_node = add_child_node(
                    db_tx,
                    ids,
                    coin_node,
                    ChildNumber::from_hardened(account_index),
                    None,
                    Some(key_row),
                )?;
                (account_node, account_pubkey)
            }
            Some(RootSource::AdHoc { root_node, pubkey }) => {
                // A device exports one account key; sibling accounts would
                // need another hardened derivation only the device can do.
                if ordinal != 0 {
                    return Err(WalletError::AdHocSingleDeriver);
                }
                (*root_node, pubkey.clone())
            }
            None => return Err(WalletError::StaleState("builder ran without a root step")),
        };

        let deriver_id = ids.next_deriver_id();
        db_tx.set_public_deriver(
            &deriver_id,
            &PublicDeriverInfo::new(wallet_id, name, ordinal, account_node, account_index),
        )?;
        db_tx.set_last_sync_info(&deriver_id, &LastSyncInfo::default())?;

        AccountKeyChain::create_in_tree(
            db_tx,
            ids,
            chain_config.clone(),
            wallet_id,
            deriver_id,
            scheme,
            account_node,
            account_pubkey,
        )?;

        state.derivers.push(deriver_id);
        Ok(())
    }

    /// Find or create a key-less intermediate node of the derivation path.
    fn ensure_path_node(
        db_tx: &mut StoreTxRw<'_, B>,
        ids: &mut NextRowIds,
        parent: NodeId,
        index: ChildNumber,
    ) -> WalletResult<NodeId> {
        let edge = NodeChildId::new(parent, index);
        if let Some(existing) = db_tx.get_node_children(&parent)?.get(&edge) {
            return Ok(*existing);
        }
        Ok(add_child_node(db_tx, ids, parent, index, None, None)?)
    }
}
