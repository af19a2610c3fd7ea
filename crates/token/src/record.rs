use serde::{Deserialize, Serialize};

use tokenledger_core::{Asset, Entity, PrincipalId, SupplyCap, SymbolCode};

/// Global statistics for one token: created once, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRecord {
    pub symbol: SymbolCode,
    pub current_supply: Asset,
    pub max_supply: SupplyCap,
    /// The only principal allowed to issue or burn this token.
    pub issuer: PrincipalId,
}

impl SupplyRecord {
    /// A freshly created token with nothing in circulation.
    pub fn new(symbol: SymbolCode, max_supply: SupplyCap, issuer: PrincipalId) -> Self {
        Self {
            current_supply: symbol.zero(),
            symbol,
            max_supply,
            issuer,
        }
    }

    pub fn code(&self) -> &str {
        self.symbol.code()
    }
}

impl Entity for SupplyRecord {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.code().to_string()
    }
}

/// Key of a balance row: one row per holder and symbol code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalanceKey {
    pub owner: PrincipalId,
    pub code: String,
}

impl BalanceKey {
    pub fn new(owner: PrincipalId, code: impl Into<String>) -> Self {
        Self {
            owner,
            code: code.into(),
        }
    }
}

/// One holder's balance of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub owner: PrincipalId,
    pub balance: Asset,
    /// Principal charged for the row's storage. Attribution only.
    pub payer: PrincipalId,
}

impl BalanceRecord {
    pub fn new(owner: PrincipalId, balance: Asset, payer: PrincipalId) -> Self {
        Self {
            owner,
            balance,
            payer,
        }
    }

    /// An explicitly opened, empty row.
    pub fn empty(owner: PrincipalId, symbol: &SymbolCode, payer: PrincipalId) -> Self {
        Self::new(owner, symbol.zero(), payer)
    }
}

impl Entity for BalanceRecord {
    type Id = BalanceKey;

    fn id(&self) -> Self::Id {
        BalanceKey::new(self.owner, self.balance.symbol.code())
    }
}
