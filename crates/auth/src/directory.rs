use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tokenledger_core::PrincipalId;

/// "Account exists" oracle provided by the host.
///
/// Transfers consult it so that tokens are never credited to a principal the
/// host does not know about.
pub trait AccountDirectory: Send + Sync {
    fn account_exists(&self, principal: PrincipalId) -> bool;
}

impl<D> AccountDirectory for Arc<D>
where
    D: AccountDirectory + ?Sized,
{
    fn account_exists(&self, principal: PrincipalId) -> bool {
        (**self).account_exists(principal)
    }
}

/// In-memory set of registered accounts for tests and embedded hosts.
#[derive(Debug, Default)]
pub struct KnownAccounts {
    inner: RwLock<HashSet<PrincipalId>>,
}

impl KnownAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = PrincipalId>) -> Self {
        Self {
            inner: RwLock::new(accounts.into_iter().collect()),
        }
    }

    /// A poisoned set drops the write and logs it; the principal stays unknown.
    pub fn register(&self, principal: PrincipalId) {
        match self.inner.write() {
            Ok(mut set) => {
                set.insert(principal);
            }
            Err(_) => tracing::warn!(%principal, "account set lock poisoned; registration dropped"),
        }
    }

    pub fn remove(&self, principal: PrincipalId) {
        match self.inner.write() {
            Ok(mut set) => {
                set.remove(&principal);
            }
            Err(_) => tracing::warn!(%principal, "account set lock poisoned; removal dropped"),
        }
    }
}

impl AccountDirectory for KnownAccounts {
    fn account_exists(&self, principal: PrincipalId) -> bool {
        self.inner
            .read()
            .map(|set| set.contains(&principal))
            .unwrap_or(false)
    }
}
