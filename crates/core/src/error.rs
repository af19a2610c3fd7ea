//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is a synchronous precondition rejection: an operation that
/// returns one of these has left the store untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller does not hold the role the operation requires.
    #[error("unauthorized")]
    Unauthorized,

    /// A symbol code or precision is malformed.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Two assets (or an asset and a supply record) disagree on code or precision.
    #[error("symbol precision mismatch")]
    SymbolMismatch,

    /// A token with this symbol code (or a row with this key) already exists.
    #[error("already exists")]
    AlreadyExists,

    /// No supply record exists for the symbol code.
    #[error("unknown symbol")]
    UnknownSymbol,

    /// The recipient principal is not a known account.
    #[error("recipient account does not exist")]
    UnknownRecipient,

    #[error("cannot transfer to self")]
    SelfTransfer,

    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("memo has more than 256 bytes")]
    MemoTooLong,

    /// Issuing would push the supply above its cap.
    #[error("quantity exceeds available supply")]
    SupplyExceeded,

    /// Burning more than is currently in circulation.
    #[error("quantity exceeds current supply")]
    SupplyUnderflow,

    #[error("overdrawn balance")]
    InsufficientBalance,

    #[error("no balance row found")]
    NoBalanceRow,

    #[error("cannot close because the balance is not zero")]
    BalanceNotZero,

    /// Amount arithmetic left the signed 64-bit range.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// An asset string could not be parsed.
    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    /// A host action payload could not be decoded.
    #[error("malformed action: {0}")]
    MalformedAction(String),
}

impl LedgerError {
    pub fn invalid_symbol(msg: impl Into<String>) -> Self {
        Self::InvalidSymbol(msg.into())
    }

    pub fn invalid_asset(msg: impl Into<String>) -> Self {
        Self::InvalidAsset(msg.into())
    }

    pub fn malformed_action(msg: impl Into<String>) -> Self {
        Self::MalformedAction(msg.into())
    }
}
