//! `tokenledger-core`: ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! assets and symbols, principal identifiers and the error taxonomy shared by
//! every ledger operation.

pub mod asset;
pub mod entity;
pub mod error;
pub mod id;

pub use asset::{Asset, MAX_PRECISION, MAX_SYMBOL_LEN, SupplyCap, SymbolCode};
pub use entity::Entity;
pub use error::{LedgerError, LedgerResult};
pub use id::PrincipalId;
