//! Explicit per-request context: which user is active and where their stores live.
//!
//! A session owns no cached ledger state; every service call loads what it needs and writes
//! back before returning. Two sessions open on the same user at once are not supported and
//! can lose writes, since there is no locking around the read-modify-write cycle.

use std::{fmt, path::Path};

use crate::{
    config::{Config, ConfigManager},
    core::utils::{user_dir_name, PathResolver},
    errors::{LedgerError, Result},
    ledger::DedupPolicy,
    storage::UserStores,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplied by the authentication layer.
pub trait IdentityGate {
    fn current_user_id(&self) -> Option<UserId>;
}

impl IdentityGate for Option<UserId> {
    fn current_user_id(&self) -> Option<UserId> {
        self.clone()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    user: UserId,
    stores: UserStores,
    dedup_policy: DedupPolicy,
}

impl Session {
    /// Opens the stores of the gate's current user under `data_dir`. Nothing is touched on
    /// disk when no user is signed in.
    pub fn open(
        gate: &impl IdentityGate,
        data_dir: &Path,
        dedup_policy: DedupPolicy,
    ) -> Result<Self> {
        let user = gate.current_user_id().ok_or(LedgerError::NoActiveUser)?;
        let dir = PathResolver::user_dir_in(data_dir, &user_dir_name(user.as_str()));
        let stores = UserStores::open(&dir)?;
        tracing::debug!(user = %user, dir = %dir.display(), "session opened");
        Ok(Self {
            user,
            stores,
            dedup_policy,
        })
    }

    pub fn from_config(
        gate: &impl IdentityGate,
        manager: &ConfigManager,
        config: &Config,
    ) -> Result<Self> {
        Self::open(gate, &manager.data_dir(config), config.dedup_policy)
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn stores(&self) -> &UserStores {
        &self.stores
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup_policy
    }
}
