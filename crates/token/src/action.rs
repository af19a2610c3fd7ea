//! Host-facing action payloads and their dispatch onto the ledger.

use serde::{Deserialize, Serialize};

use tokenledger_auth::AccountDirectory;
use tokenledger_core::{Asset, LedgerError, LedgerResult, PrincipalId, SymbolCode};
use tokenledger_events::EventBus;

use crate::event::LedgerEvent;
use crate::ledger::{RowSponsor, TokenLedger};
use crate::store::LedgerStore;

/// One callable ledger action, as delivered by the host.
///
/// Encoded as `{"action": "<name>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum LedgerAction {
    /// Without `max_supply`, creates the configured default token, uncapped.
    Create {
        issuer: PrincipalId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_supply: Option<Asset>,
    },
    Issue {
        to: PrincipalId,
        quantity: Asset,
        #[serde(default)]
        memo: String,
    },
    Burn {
        quantity: Asset,
        #[serde(default)]
        memo: String,
    },
    Transfer {
        from: PrincipalId,
        to: PrincipalId,
        quantity: Asset,
        #[serde(default)]
        memo: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sponsor: Option<RowSponsor>,
    },
    Open {
        owner: PrincipalId,
        symbol: SymbolCode,
        payer: PrincipalId,
    },
    Close {
        owner: PrincipalId,
        symbol: SymbolCode,
    },
}

impl LedgerAction {
    pub fn from_json(payload: &str) -> LedgerResult<Self> {
        serde_json::from_str(payload).map_err(|e| LedgerError::malformed_action(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            LedgerAction::Create { .. } => "create",
            LedgerAction::Issue { .. } => "issue",
            LedgerAction::Burn { .. } => "burn",
            LedgerAction::Transfer { .. } => "transfer",
            LedgerAction::Open { .. } => "open",
            LedgerAction::Close { .. } => "close",
        }
    }
}

/// An action together with the principal the host authenticated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCall {
    pub caller: PrincipalId,
    pub action: LedgerAction,
}

impl HostCall {
    pub fn from_json(payload: &str) -> LedgerResult<Self> {
        serde_json::from_str(payload).map_err(|e| LedgerError::malformed_action(e.to_string()))
    }
}

impl<S, D, B> TokenLedger<S, D, B>
where
    S: LedgerStore,
    D: AccountDirectory,
    B: EventBus<LedgerEvent>,
{
    /// Route an action to the matching operation.
    pub fn dispatch(&mut self, caller: PrincipalId, action: LedgerAction) -> LedgerResult<Vec<LedgerEvent>> {
        match action {
            LedgerAction::Create {
                issuer,
                max_supply: Some(max_supply),
            } => self.create(caller, issuer, max_supply),
            LedgerAction::Create {
                issuer,
                max_supply: None,
            } => self.create_default(caller, issuer),
            LedgerAction::Issue { to, quantity, memo } => self.issue(caller, to, quantity, &memo),
            LedgerAction::Burn { quantity, memo } => self.burn(caller, quantity, &memo),
            LedgerAction::Transfer {
                from,
                to,
                quantity,
                memo,
                sponsor,
            } => self.transfer(caller, from, to, quantity, &memo, sponsor),
            LedgerAction::Open { owner, symbol, payer } => self.open(caller, owner, &symbol, payer),
            LedgerAction::Close { owner, symbol } => self.close(caller, owner, &symbol),
        }
    }

    pub fn dispatch_call(&mut self, call: HostCall) -> LedgerResult<Vec<LedgerEvent>> {
        self.dispatch(call.caller, call.action)
    }
}
