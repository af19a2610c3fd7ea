use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokenledger_core::{Asset, PrincipalId, SupplyCap, SymbolCode};
use tokenledger_events::Event;

/// Event: TokenCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreated {
    pub symbol: SymbolCode,
    pub max_supply: SupplyCap,
    pub issuer: PrincipalId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Issued (new supply minted into the issuer's balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issued {
    pub issuer: PrincipalId,
    pub to: PrincipalId,
    pub quantity: Asset,
    pub memo: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Burned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burned {
    pub issuer: PrincipalId,
    pub quantity: Asset,
    pub memo: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transferred {
    pub from: PrincipalId,
    pub to: PrincipalId,
    pub quantity: Asset,
    pub memo: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BalanceOpened (explicit zero-balance row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOpened {
    pub owner: PrincipalId,
    pub symbol: SymbolCode,
    pub payer: PrincipalId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BalanceClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceClosed {
    pub owner: PrincipalId,
    pub symbol: SymbolCode,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    TokenCreated(TokenCreated),
    Issued(Issued),
    Burned(Burned),
    Transferred(Transferred),
    BalanceOpened(BalanceOpened),
    BalanceClosed(BalanceClosed),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::TokenCreated(_) => "token.created",
            LedgerEvent::Issued(_) => "token.issued",
            LedgerEvent::Burned(_) => "token.burned",
            LedgerEvent::Transferred(_) => "token.transferred",
            LedgerEvent::BalanceOpened(_) => "token.balance_opened",
            LedgerEvent::BalanceClosed(_) => "token.balance_closed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::TokenCreated(e) => e.occurred_at,
            LedgerEvent::Issued(e) => e.occurred_at,
            LedgerEvent::Burned(e) => e.occurred_at,
            LedgerEvent::Transferred(e) => e.occurred_at,
            LedgerEvent::BalanceOpened(e) => e.occurred_at,
            LedgerEvent::BalanceClosed(e) => e.occurred_at,
        }
    }

    fn recipients(&self) -> Vec<PrincipalId> {
        match self {
            LedgerEvent::TokenCreated(e) => vec![e.issuer],
            LedgerEvent::Issued(e) => vec![e.issuer],
            LedgerEvent::Burned(e) => vec![e.issuer],
            LedgerEvent::Transferred(e) => vec![e.from, e.to],
            LedgerEvent::BalanceOpened(e) => vec![e.owner],
            LedgerEvent::BalanceClosed(e) => vec![e.owner],
        }
    }
}
