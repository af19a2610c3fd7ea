use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tokenledger_core::PrincipalId;

use crate::AuthzError;

/// Allow-list of principals allowed to administer the ledger (create tokens).
///
/// The policy is handed to the ledger at construction; there is no hardcoded
/// administrator identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminPolicy {
    administrators: BTreeSet<PrincipalId>,
}

impl AdminPolicy {
    pub fn new(administrators: impl IntoIterator<Item = PrincipalId>) -> Self {
        Self {
            administrators: administrators.into_iter().collect(),
        }
    }

    /// A policy with exactly one administrator.
    pub fn single(administrator: PrincipalId) -> Self {
        Self::new([administrator])
    }

    pub fn is_administrator(&self, principal: PrincipalId) -> bool {
        self.administrators.contains(&principal)
    }

    pub fn administrators(&self) -> impl Iterator<Item = PrincipalId> + '_ {
        self.administrators.iter().copied()
    }

    pub fn authorize_admin(&self, caller: PrincipalId) -> Result<(), AuthzError> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            tracing::debug!(%caller, "administrator check failed");
            Err(AuthzError::NotAdministrator(caller))
        }
    }
}
