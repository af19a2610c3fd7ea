use chrono::{DateTime, Utc};

use tokenledger_core::PrincipalId;

/// A committed ledger fact addressed to one or more principals.
///
/// Published only after the rows it describes have been written.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable name, e.g. `"token.transferred"`.
    fn event_type(&self) -> &'static str;

    fn occurred_at(&self) -> DateTime<Utc>;

    /// Principals to notify. A transfer names both sides.
    fn recipients(&self) -> Vec<PrincipalId>;

    fn concerns(&self, principal: PrincipalId) -> bool {
        self.recipients().contains(&principal)
    }
}
