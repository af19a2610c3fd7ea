//! The token state machine.
//!
//! Every operation runs in two phases:
//!
//! 1. **Validate**: all preconditions are checked against the current store and
//!    every resulting value is computed with checked arithmetic.
//! 2. **Apply**: the precomputed writes are handed to the store.
//!
//! Nothing is written until phase 1 has succeeded, so a rejected operation
//! leaves the store exactly as it found it. Committed events are then
//! published on the notification bus, best-effort.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use tokenledger_auth::{AccountDirectory, AdminPolicy, require_auth};
use tokenledger_core::{Asset, LedgerError, LedgerResult, PrincipalId, SupplyCap, SymbolCode};
use tokenledger_events::{Event, EventBus};

use crate::config::LedgerConfig;
use crate::event::{
    BalanceClosed, BalanceOpened, Burned, Issued, LedgerEvent, TokenCreated, Transferred,
};
use crate::record::{BalanceRecord, SupplyRecord};
use crate::store::LedgerStore;

/// Longest memo accepted, in bytes.
pub const MAX_MEMO_BYTES: usize = 256;

/// Who is charged for a balance row created by a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSponsor {
    Sender,
    #[default]
    Recipient,
}

/// Validated supply increase, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MintPlan {
    issuer: PrincipalId,
    quantity: Asset,
    new_supply: Asset,
}

/// Validated movement of existing supply, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MovePlan {
    from: PrincipalId,
    to: PrincipalId,
    quantity: Asset,
    payer: PrincipalId,
}

/// Deterministic fungible-token ledger over a [`LedgerStore`].
///
/// - `S`: storage of supply and balance rows
/// - `D`: host oracle answering "does this account exist?"
/// - `B`: notification bus for committed events
#[derive(Debug)]
pub struct TokenLedger<S, D, B> {
    store: S,
    admins: AdminPolicy,
    default_symbol: SymbolCode,
    accounts: D,
    bus: B,
}

impl<S, D, B> TokenLedger<S, D, B> {
    pub fn new(config: LedgerConfig, store: S, accounts: D, bus: B) -> Self {
        Self {
            store,
            admins: config.administrators,
            default_symbol: config.default_symbol,
            accounts,
            bus,
        }
    }

    /// Read-only access to the underlying rows.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn accounts(&self) -> &D {
        &self.accounts
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_parts(self) -> (S, D, B) {
        (self.store, self.accounts, self.bus)
    }
}

impl<S, D, B> TokenLedger<S, D, B>
where
    S: LedgerStore,
    D: AccountDirectory,
    B: EventBus<LedgerEvent>,
{
    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Current supply of the token with this code.
    pub fn get_supply(&self, code: &str) -> Option<Asset> {
        self.store.get_supply(code).map(|st| st.current_supply)
    }

    pub fn supply_record(&self, code: &str) -> Option<SupplyRecord> {
        self.store.get_supply(code)
    }

    pub fn get_balance(&self, owner: PrincipalId, code: &str) -> Option<Asset> {
        self.store.get_balance(owner, code).map(|row| row.balance)
    }

    pub fn has_balance(&self, owner: PrincipalId, code: &str) -> bool {
        self.store.get_balance(owner, code).is_some()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create a token. A negative `max_supply` amount means "no cap".
    pub fn create(
        &mut self,
        caller: PrincipalId,
        issuer: PrincipalId,
        max_supply: Asset,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let symbol = max_supply.symbol.clone();
        self.create_token(caller, issuer, symbol, SupplyCap::from_max_supply(max_supply))
    }

    /// Create the configured default token with an unbounded supply.
    pub fn create_default(
        &mut self,
        caller: PrincipalId,
        issuer: PrincipalId,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let symbol = self.default_symbol.clone();
        self.create_token(caller, issuer, symbol, SupplyCap::Unbounded)
    }

    pub fn create_token(
        &mut self,
        caller: PrincipalId,
        issuer: PrincipalId,
        symbol: SymbolCode,
        max_supply: SupplyCap,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let outcome = self.try_create(caller, issuer, symbol, max_supply);
        self.finish("create", caller, outcome)
    }

    /// Mint `quantity` new units and deliver them to `to`.
    ///
    /// Composed of two primitives: minting into the issuer's own balance, then
    /// (when `to` is someone else) moving the fresh units from the issuer to
    /// `to`, with the issuer paying for `to`'s row if one must be created.
    pub fn issue(
        &mut self,
        caller: PrincipalId,
        to: PrincipalId,
        quantity: Asset,
        memo: &str,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let outcome = self.try_issue(caller, to, quantity, memo);
        self.finish("issue", caller, outcome)
    }

    /// Destroy `quantity` units out of the issuer's own balance.
    pub fn burn(&mut self, caller: PrincipalId, quantity: Asset, memo: &str) -> LedgerResult<Vec<LedgerEvent>> {
        let outcome = self.try_burn(caller, quantity, memo);
        self.finish("burn", caller, outcome)
    }

    /// Move `quantity` from `from` to `to`.
    ///
    /// `sponsor` chooses who pays for `to`'s row if it has to be created;
    /// defaults to the recipient.
    pub fn transfer(
        &mut self,
        caller: PrincipalId,
        from: PrincipalId,
        to: PrincipalId,
        quantity: Asset,
        memo: &str,
        sponsor: Option<RowSponsor>,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let outcome = self.try_transfer(caller, from, to, quantity, memo, sponsor.unwrap_or_default());
        self.finish("transfer", caller, outcome)
    }

    /// Open a zero-balance row for `owner`, paid for by `payer`. Idempotent.
    pub fn open(
        &mut self,
        caller: PrincipalId,
        owner: PrincipalId,
        symbol: &SymbolCode,
        payer: PrincipalId,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let outcome = self.try_open(caller, owner, symbol, payer);
        self.finish("open", caller, outcome)
    }

    /// Delete `owner`'s row for `symbol`; only allowed when its balance is zero.
    pub fn close(
        &mut self,
        caller: PrincipalId,
        owner: PrincipalId,
        symbol: &SymbolCode,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let outcome = self.try_close(caller, owner, symbol);
        self.finish("close", caller, outcome)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operation bodies
    // ─────────────────────────────────────────────────────────────────────

    fn try_create(
        &mut self,
        caller: PrincipalId,
        issuer: PrincipalId,
        symbol: SymbolCode,
        max_supply: SupplyCap,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        self.admins.authorize_admin(caller)?;
        symbol.validate()?;
        if let SupplyCap::Capped(cap) = &max_supply {
            if cap.symbol != symbol {
                return Err(LedgerError::SymbolMismatch);
            }
            if cap.amount < 0 {
                return Err(LedgerError::invalid_asset("max supply cap must not be negative"));
            }
        }
        if self.store.get_supply(symbol.code()).is_some() {
            return Err(LedgerError::AlreadyExists);
        }

        self.store
            .put_supply(SupplyRecord::new(symbol.clone(), max_supply.clone(), issuer))?;

        Ok(vec![LedgerEvent::TokenCreated(TokenCreated {
            symbol,
            max_supply,
            issuer,
            occurred_at: Utc::now(),
        })])
    }

    fn try_issue(
        &mut self,
        caller: PrincipalId,
        to: PrincipalId,
        quantity: Asset,
        memo: &str,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        quantity.symbol.validate()?;
        check_memo(memo)?;
        let stat = self.existing_supply(&quantity.symbol)?;
        require_auth(caller, stat.issuer)?;
        check_quantity(&stat, &quantity)?;

        let mint = self.plan_mint(&stat, &quantity)?;
        let transfer = if to != stat.issuer {
            if !self.accounts.account_exists(to) {
                return Err(LedgerError::UnknownRecipient);
            }
            // The issuer's row is about to receive exactly `quantity`.
            Some(self.plan_move(stat.issuer, to, &quantity, stat.issuer, quantity.amount)?)
        } else {
            None
        };

        let occurred_at = Utc::now();
        self.apply_mint(&mint)?;
        let mut events = vec![LedgerEvent::Issued(Issued {
            issuer: stat.issuer,
            to,
            quantity: quantity.clone(),
            memo: memo.to_string(),
            occurred_at,
        })];

        if let Some(plan) = transfer {
            self.apply_move(&plan)?;
            events.push(LedgerEvent::Transferred(Transferred {
                from: plan.from,
                to: plan.to,
                quantity: plan.quantity,
                memo: memo.to_string(),
                occurred_at,
            }));
        }

        Ok(events)
    }

    fn try_burn(&mut self, caller: PrincipalId, quantity: Asset, memo: &str) -> LedgerResult<Vec<LedgerEvent>> {
        quantity.symbol.validate()?;
        check_memo(memo)?;
        let stat = self.existing_supply(&quantity.symbol)?;
        let issuer = stat.issuer;
        require_auth(caller, issuer)?;
        check_quantity(&stat, &quantity)?;

        if quantity.amount > stat.current_supply.amount {
            return Err(LedgerError::SupplyUnderflow);
        }
        let new_supply = stat.current_supply.checked_sub(&quantity)?;

        let row = self
            .store
            .get_balance(issuer, stat.code())
            .ok_or(LedgerError::NoBalanceRow)?;
        if row.balance.amount < quantity.amount {
            return Err(LedgerError::InsufficientBalance);
        }
        let new_balance = row.balance.checked_sub(&quantity)?;

        self.store.update_balance(issuer, stat.code(), |row| {
            row.balance = new_balance;
            Ok(())
        })?;
        self.store.update_supply(stat.code(), |st| {
            st.current_supply = new_supply;
            Ok(())
        })?;

        Ok(vec![LedgerEvent::Burned(Burned {
            issuer,
            quantity,
            memo: memo.to_string(),
            occurred_at: Utc::now(),
        })])
    }

    fn try_transfer(
        &mut self,
        caller: PrincipalId,
        from: PrincipalId,
        to: PrincipalId,
        quantity: Asset,
        memo: &str,
        sponsor: RowSponsor,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        require_auth(caller, from)?;
        if !self.accounts.account_exists(to) {
            return Err(LedgerError::UnknownRecipient);
        }
        quantity.symbol.validate()?;
        let stat = self.existing_supply(&quantity.symbol)?;
        check_quantity(&stat, &quantity)?;
        check_memo(memo)?;

        let payer = match sponsor {
            RowSponsor::Sender => from,
            RowSponsor::Recipient => to,
        };
        let plan = self.plan_move(from, to, &quantity, payer, 0)?;
        self.apply_move(&plan)?;

        Ok(vec![LedgerEvent::Transferred(Transferred {
            from,
            to,
            quantity,
            memo: memo.to_string(),
            occurred_at: Utc::now(),
        })])
    }

    fn try_open(
        &mut self,
        caller: PrincipalId,
        owner: PrincipalId,
        symbol: &SymbolCode,
        payer: PrincipalId,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        require_auth(caller, payer)?;
        let stat = self.existing_supply(symbol)?;
        if stat.symbol != *symbol {
            return Err(LedgerError::SymbolMismatch);
        }

        if self.store.get_balance(owner, stat.code()).is_some() {
            return Ok(vec![]);
        }
        self.store.put_balance(BalanceRecord::empty(owner, symbol, payer))?;

        Ok(vec![LedgerEvent::BalanceOpened(BalanceOpened {
            owner,
            symbol: symbol.clone(),
            payer,
            occurred_at: Utc::now(),
        })])
    }

    fn try_close(
        &mut self,
        caller: PrincipalId,
        owner: PrincipalId,
        symbol: &SymbolCode,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        require_auth(caller, owner)?;
        let stat = self.existing_supply(symbol)?;
        if stat.symbol != *symbol {
            return Err(LedgerError::SymbolMismatch);
        }

        let row = self
            .store
            .get_balance(owner, stat.code())
            .ok_or(LedgerError::NoBalanceRow)?;
        if row.balance.amount != 0 {
            return Err(LedgerError::BalanceNotZero);
        }
        self.store.delete_balance(owner, stat.code())?;

        Ok(vec![LedgerEvent::BalanceClosed(BalanceClosed {
            owner,
            symbol: symbol.clone(),
            occurred_at: Utc::now(),
        })])
    }

    // ─────────────────────────────────────────────────────────────────────
    // Primitives
    // ─────────────────────────────────────────────────────────────────────

    /// Check that `quantity` can be minted into the issuer's balance.
    fn plan_mint(&self, stat: &SupplyRecord, quantity: &Asset) -> LedgerResult<MintPlan> {
        let new_supply = stat.current_supply.checked_add(quantity)?;
        if !stat.max_supply.admits(&new_supply) {
            return Err(LedgerError::SupplyExceeded);
        }
        if let Some(row) = self.store.get_balance(stat.issuer, stat.code()) {
            row.balance.checked_add(quantity)?;
        }
        Ok(MintPlan {
            issuer: stat.issuer,
            quantity: quantity.clone(),
            new_supply,
        })
    }

    fn apply_mint(&mut self, plan: &MintPlan) -> LedgerResult<()> {
        let code = plan.quantity.symbol.code();
        let new_supply = plan.new_supply.clone();
        self.store.update_supply(code, |st| {
            st.current_supply = new_supply;
            Ok(())
        })?;
        self.store
            .upsert_balance(plan.issuer, plan.issuer, plan.quantity.clone())
    }

    /// Check that `quantity` can move from `from` to `to`.
    ///
    /// `incoming` is credit `from` will have received by the time the move is
    /// applied (the freshly minted units during `issue`).
    fn plan_move(
        &self,
        from: PrincipalId,
        to: PrincipalId,
        quantity: &Asset,
        payer: PrincipalId,
        incoming: i64,
    ) -> LedgerResult<MovePlan> {
        let code = quantity.symbol.code();
        let available = match self.store.get_balance(from, code) {
            Some(row) => row
                .balance
                .amount
                .checked_add(incoming)
                .ok_or(LedgerError::ArithmeticOverflow)?,
            None if incoming > 0 => incoming,
            None => return Err(LedgerError::NoBalanceRow),
        };
        if available < quantity.amount {
            return Err(LedgerError::InsufficientBalance);
        }
        if let Some(row) = self.store.get_balance(to, code) {
            row.balance.checked_add(quantity)?;
        }
        Ok(MovePlan {
            from,
            to,
            quantity: quantity.clone(),
            payer,
        })
    }

    fn apply_move(&mut self, plan: &MovePlan) -> LedgerResult<()> {
        let quantity = &plan.quantity;
        self.store
            .update_balance(plan.from, quantity.symbol.code(), |row| {
                row.balance = row.balance.checked_sub(quantity)?;
                Ok(())
            })?;
        self.store.upsert_balance(plan.to, plan.payer, quantity.clone())
    }

    fn existing_supply(&self, symbol: &SymbolCode) -> LedgerResult<SupplyRecord> {
        self.store
            .get_supply(symbol.code())
            .ok_or(LedgerError::UnknownSymbol)
    }

    /// Log the outcome and publish committed events.
    fn finish(
        &self,
        operation: &'static str,
        caller: PrincipalId,
        outcome: LedgerResult<Vec<LedgerEvent>>,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        match &outcome {
            Ok(events) => {
                tracing::info!(operation, %caller, events = events.len(), "ledger operation committed");
                for event in events {
                    if let Err(e) = self.bus.publish(event.clone()) {
                        tracing::warn!(
                            operation,
                            event_type = event.event_type(),
                            error = ?e,
                            "failed to publish ledger notification"
                        );
                    }
                }
            }
            Err(err) => {
                tracing::debug!(operation, %caller, error = %err, "ledger operation rejected");
            }
        }
        outcome
    }
}

fn check_memo(memo: &str) -> LedgerResult<()> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(LedgerError::MemoTooLong);
    }
    Ok(())
}

/// Quantity must be positive and denominated exactly in the token's symbol.
fn check_quantity(stat: &SupplyRecord, quantity: &Asset) -> LedgerResult<()> {
    if !quantity.is_positive() {
        return Err(LedgerError::NonPositiveQuantity);
    }
    if quantity.symbol != stat.symbol {
        return Err(LedgerError::SymbolMismatch);
    }
    Ok(())
}
