//! Keyed storage for supply and balance rows.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokenledger_core::{Asset, Entity, LedgerError, LedgerResult, PrincipalId};

use crate::record::{BalanceKey, BalanceRecord, SupplyRecord};

/// Exact-key storage of the two ledger entity kinds.
///
/// Writers take `&mut self`: the store is owned by one ledger and the borrow
/// checker serializes every read-modify-write against it. Mutators run against
/// a copy of the row, which is written back only if the mutator succeeds.
pub trait LedgerStore {
    fn get_supply(&self, code: &str) -> Option<SupplyRecord>;

    /// Insert-only; fails with `AlreadyExists` if the code is taken.
    fn put_supply(&mut self, record: SupplyRecord) -> LedgerResult<()>;

    fn update_supply<F>(&mut self, code: &str, mutator: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut SupplyRecord) -> LedgerResult<()>;

    fn get_balance(&self, owner: PrincipalId, code: &str) -> Option<BalanceRecord>;

    /// Insert-only; fails with `AlreadyExists` if the row exists.
    fn put_balance(&mut self, record: BalanceRecord) -> LedgerResult<()>;

    fn update_balance<F>(&mut self, owner: PrincipalId, code: &str, mutator: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut BalanceRecord) -> LedgerResult<()>;

    /// Credit `owner` by `credit`, creating the row (charged to `payer`) if it
    /// does not exist yet. An existing row keeps its original payer.
    fn upsert_balance(&mut self, owner: PrincipalId, payer: PrincipalId, credit: Asset) -> LedgerResult<()>;

    fn delete_balance(&mut self, owner: PrincipalId, code: &str) -> LedgerResult<()>;
}

/// In-memory ledger store for tests, benchmarks and embedded hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedgerStore {
    supplies: HashMap<String, SupplyRecord>,
    balances: HashMap<BalanceKey, BalanceRecord>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every supply record, ordered by code.
    pub fn supplies(&self) -> Vec<SupplyRecord> {
        let mut out: Vec<SupplyRecord> = self.supplies.values().cloned().collect();
        out.sort_by(|a, b| a.code().cmp(b.code()));
        out
    }

    /// Every balance row of `code`, ordered by owner.
    pub fn balances_for(&self, code: &str) -> Vec<BalanceRecord> {
        let mut out: Vec<BalanceRecord> = self
            .balances
            .iter()
            .filter_map(|(k, v)| if k.code == code { Some(v.clone()) } else { None })
            .collect();
        out.sort_by_key(|r| r.owner);
        out
    }

    /// Sum of every balance of `code` (widened so the audit itself cannot overflow).
    pub fn circulating(&self, code: &str) -> i128 {
        self.balances
            .iter()
            .filter(|(k, _)| k.code == code)
            .map(|(_, v)| v.balance.amount as i128)
            .sum()
    }

    pub fn row_count(&self) -> usize {
        self.balances.len()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get_supply(&self, code: &str) -> Option<SupplyRecord> {
        self.supplies.get(code).cloned()
    }

    fn put_supply(&mut self, record: SupplyRecord) -> LedgerResult<()> {
        match self.supplies.entry(record.id()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn update_supply<F>(&mut self, code: &str, mutator: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut SupplyRecord) -> LedgerResult<()>,
    {
        let slot = self.supplies.get_mut(code).ok_or(LedgerError::UnknownSymbol)?;
        let mut draft = slot.clone();
        mutator(&mut draft)?;
        *slot = draft;
        Ok(())
    }

    fn get_balance(&self, owner: PrincipalId, code: &str) -> Option<BalanceRecord> {
        self.balances.get(&BalanceKey::new(owner, code)).cloned()
    }

    fn put_balance(&mut self, record: BalanceRecord) -> LedgerResult<()> {
        match self.balances.entry(record.id()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn update_balance<F>(&mut self, owner: PrincipalId, code: &str, mutator: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut BalanceRecord) -> LedgerResult<()>,
    {
        let slot = self
            .balances
            .get_mut(&BalanceKey::new(owner, code))
            .ok_or(LedgerError::NoBalanceRow)?;
        let mut draft = slot.clone();
        mutator(&mut draft)?;
        *slot = draft;
        Ok(())
    }

    fn upsert_balance(&mut self, owner: PrincipalId, payer: PrincipalId, credit: Asset) -> LedgerResult<()> {
        match self.balances.entry(BalanceKey::new(owner, credit.symbol.code())) {
            Entry::Occupied(mut slot) => {
                let row = slot.get_mut();
                row.balance = row.balance.checked_add(&credit)?;
            }
            Entry::Vacant(slot) => {
                slot.insert(BalanceRecord::new(owner, credit, payer));
            }
        }
        Ok(())
    }

    fn delete_balance(&mut self, owner: PrincipalId, code: &str) -> LedgerResult<()> {
        self.balances
            .remove(&BalanceKey::new(owner, code))
            .map(|_| ())
            .ok_or(LedgerError::NoBalanceRow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenledger_core::{SupplyCap, SymbolCode};

    fn tok() -> SymbolCode {
        SymbolCode::new("TOK", 2).unwrap()
    }

    #[test]
    fn supply_rows_are_insert_only() {
        let mut store = InMemoryLedgerStore::new();
        let issuer = PrincipalId::new();
        let record = SupplyRecord::new(tok(), SupplyCap::Unbounded, issuer);

        store.put_supply(record.clone()).unwrap();
        assert_eq!(store.put_supply(record.clone()).unwrap_err(), LedgerError::AlreadyExists);
        assert_eq!(store.get_supply("TOK"), Some(record));
    }

    #[test]
    fn balance_rows_are_keyed_by_owner_and_code() {
        let mut store = InMemoryLedgerStore::new();
        let owner = PrincipalId::new();
        let row = BalanceRecord::new(owner, tok().asset(5), owner);
        assert_eq!(row.id(), BalanceKey::new(owner, "TOK"));

        store.put_balance(row.clone()).unwrap();
        // Same owner and code under a different precision is still the same row.
        let clash = BalanceRecord::new(owner, SymbolCode::new("TOK", 0).unwrap().asset(1), owner);
        assert_eq!(store.put_balance(clash).unwrap_err(), LedgerError::AlreadyExists);
        store
            .put_balance(BalanceRecord::new(PrincipalId::new(), tok().asset(1), owner))
            .unwrap();

        assert_eq!(store.get_balance(owner, "TOK"), Some(row));
        assert_eq!(store.row_count(), 2);
    }

    #[test]
    fn failed_mutator_leaves_row_untouched() {
        let mut store = InMemoryLedgerStore::new();
        let owner = PrincipalId::new();
        store
            .put_balance(BalanceRecord::new(owner, tok().asset(5), owner))
            .unwrap();

        let err = store
            .update_balance(owner, "TOK", |row| {
                row.balance.amount = 999;
                Err(LedgerError::InsufficientBalance)
            })
            .unwrap_err();

        assert_eq!(err, LedgerError::InsufficientBalance);
        assert_eq!(store.get_balance(owner, "TOK").unwrap().balance.amount, 5);
    }

    #[test]
    fn missing_rows_are_reported() {
        let mut store = InMemoryLedgerStore::new();
        let owner = PrincipalId::new();

        assert_eq!(
            store.update_supply("TOK", |_| Ok(())).unwrap_err(),
            LedgerError::UnknownSymbol
        );
        assert_eq!(
            store.update_balance(owner, "TOK", |_| Ok(())).unwrap_err(),
            LedgerError::NoBalanceRow
        );
        assert_eq!(store.delete_balance(owner, "TOK").unwrap_err(), LedgerError::NoBalanceRow);
    }

    #[test]
    fn upsert_creates_then_credits_and_keeps_first_payer() {
        let mut store = InMemoryLedgerStore::new();
        let owner = PrincipalId::new();
        let first_payer = PrincipalId::new();
        let second_payer = PrincipalId::new();

        store.upsert_balance(owner, first_payer, tok().asset(10)).unwrap();
        store.upsert_balance(owner, second_payer, tok().asset(15)).unwrap();

        let row = store.get_balance(owner, "TOK").unwrap();
        assert_eq!(row.balance, tok().asset(25));
        assert_eq!(row.payer, first_payer);
        assert_eq!(store.circulating("TOK"), 25);
    }

    #[test]
    fn upsert_rejects_overflow_without_writing() {
        let mut store = InMemoryLedgerStore::new();
        let owner = PrincipalId::new();
        store.upsert_balance(owner, owner, tok().asset(i64::MAX)).unwrap();

        let err = store.upsert_balance(owner, owner, tok().asset(1)).unwrap_err();

        assert_eq!(err, LedgerError::ArithmeticOverflow);
        assert_eq!(store.get_balance(owner, "TOK").unwrap().balance.amount, i64::MAX);
    }

    #[test]
    fn scans_are_scoped_by_code() {
        let mut store = InMemoryLedgerStore::new();
        let other = SymbolCode::new("OTH", 0).unwrap();
        let a = PrincipalId::new();
        let b = PrincipalId::new();

        store.upsert_balance(a, a, tok().asset(3)).unwrap();
        store.upsert_balance(b, b, tok().asset(4)).unwrap();
        store.upsert_balance(a, a, other.asset(100)).unwrap();

        assert_eq!(store.balances_for("TOK").len(), 2);
        assert_eq!(store.circulating("TOK"), 7);
        assert_eq!(store.circulating("OTH"), 100);
        assert_eq!(store.row_count(), 3);
    }
}
