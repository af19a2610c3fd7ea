//! Fungible-token ledger (supply, balances, and the operations that move them).
//!
//! Pure logic only: no IO. Storage, the account oracle and the notification
//! bus are injected by the host.

pub mod action;
pub mod config;
pub mod event;
pub mod ledger;
pub mod record;
pub mod store;

pub use action::{HostCall, LedgerAction};
pub use config::{ConfigError, LedgerConfig};
pub use event::{
    BalanceClosed, BalanceOpened, Burned, Issued, LedgerEvent, TokenCreated, Transferred,
};
pub use ledger::{MAX_MEMO_BYTES, RowSponsor, TokenLedger};
pub use record::{BalanceKey, BalanceRecord, SupplyRecord};
pub use store::{InMemoryLedgerStore, LedgerStore};

pub use tokenledger_core::{Asset, LedgerError, LedgerResult, PrincipalId, SupplyCap, SymbolCode};

/// Ledger wired to the in-memory store, account set and bus.
pub type InMemoryTokenLedger = TokenLedger<
    InMemoryLedgerStore,
    std::sync::Arc<tokenledger_auth::KnownAccounts>,
    std::sync::Arc<tokenledger_events::InMemoryEventBus<LedgerEvent>>,
>;
