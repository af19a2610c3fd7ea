//! `tokenledger-auth`: caller authorization boundary.
//!
//! The host authenticates callers; this crate only answers "may this already
//! authenticated principal do that?" and "does that account exist?".

pub mod authorize;
pub mod directory;
pub mod policy;

pub use authorize::{AuthzError, has_auth, require_auth};
pub use directory::{AccountDirectory, KnownAccounts};
pub use policy::AdminPolicy;
