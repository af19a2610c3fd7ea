//! Ledger configuration (administrators, default token symbol).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tokenledger_auth::AdminPolicy;
use tokenledger_core::{PrincipalId, SymbolCode};

pub const ADMINS_ENV: &str = "TOKENLEDGER_ADMINS";
pub const DEFAULT_SYMBOL_ENV: &str = "TOKENLEDGER_DEFAULT_SYMBOL";
/// Accounts the replay host registers up front (comma-separated UUIDs).
pub const ACCOUNTS_ENV: &str = "TOKENLEDGER_ACCOUNTS";

/// Symbol used by `create_default` unless configured otherwise.
pub const DEFAULT_SYMBOL: &str = "0,WJ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid principal in {var}: {value:?}")]
    InvalidPrincipal { var: &'static str, value: String },

    #[error("invalid symbol in {var}: {reason}")]
    InvalidSymbol { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub administrators: AdminPolicy,
    pub default_symbol: SymbolCode,
}

impl LedgerConfig {
    pub fn new(administrators: AdminPolicy, default_symbol: SymbolCode) -> Self {
        Self {
            administrators,
            default_symbol,
        }
    }

    /// Configuration with a single administrator and the default symbol.
    pub fn with_admin(administrator: PrincipalId) -> Self {
        Self::new(AdminPolicy::single(administrator), fallback_symbol())
    }

    /// Load from `TOKENLEDGER_ADMINS` (comma-separated UUIDs) and
    /// `TOKENLEDGER_DEFAULT_SYMBOL` (`"<precision>,<CODE>"`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment, a map in tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let administrators = match lookup(ADMINS_ENV) {
            Some(raw) => AdminPolicy::new(parse_principals(ADMINS_ENV, &raw)?),
            None => {
                tracing::warn!("{ADMINS_ENV} not set; no principal may create tokens");
                AdminPolicy::default()
            }
        };

        let default_symbol = match lookup(DEFAULT_SYMBOL_ENV) {
            Some(raw) => raw.parse::<SymbolCode>().map_err(|e| {
                ConfigError::InvalidSymbol {
                    var: DEFAULT_SYMBOL_ENV,
                    reason: e.to_string(),
                }
            })?,
            None => fallback_symbol(),
        };

        Ok(Self::new(administrators, default_symbol))
    }
}

/// Parse a comma-separated list of principal ids; blank entries are skipped.
pub fn parse_principals(var: &'static str, raw: &str) -> Result<Vec<PrincipalId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ConfigError::InvalidPrincipal {
                var,
                value: s.to_string(),
            })
        })
        .collect()
}

fn fallback_symbol() -> SymbolCode {
    SymbolCode::new("WJ", 0).unwrap_or_else(|_| unreachable!("{DEFAULT_SYMBOL} is a valid symbol"))
}
