//! Logging setup shared by ledger hosts.
//!
//! Safe to initialize more than once; only the first call installs a
//! subscriber.

pub mod logging;

pub use logging::{DEFAULT_FILTER, LOG_ENV, init, init_with as init_with_filter};
