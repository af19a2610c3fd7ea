use thiserror::Error;

use tokenledger_core::{LedgerError, PrincipalId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("missing authority of {required}")]
    MissingAuthority { required: PrincipalId },

    #[error("{0} is not a ledger administrator")]
    NotAdministrator(PrincipalId),
}

impl From<AuthzError> for LedgerError {
    fn from(_: AuthzError) -> Self {
        LedgerError::Unauthorized
    }
}

/// Whether `caller` carries the authority of `candidate`.
pub fn has_auth(caller: PrincipalId, candidate: PrincipalId) -> bool {
    caller == candidate
}

/// Require that `caller` acts with the authority of `required`.
///
/// - No IO
/// - No panics
/// - Pure identity comparison (the host already verified who `caller` is)
pub fn require_auth(caller: PrincipalId, required: PrincipalId) -> Result<(), AuthzError> {
    if has_auth(caller, required) {
        Ok(())
    } else {
        tracing::debug!(%caller, %required, "authority check failed");
        Err(AuthzError::MissingAuthority { required })
    }
}
