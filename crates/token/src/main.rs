//! Replay host: reads one JSON `HostCall` per line from stdin, applies it to an
//! in-memory ledger and writes one JSON outcome per line to stdout.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;

use tokenledger_auth::KnownAccounts;
use tokenledger_events::InMemoryEventBus;
use tokenledger_token::config::{ACCOUNTS_ENV, parse_principals};
use tokenledger_token::{HostCall, InMemoryLedgerStore, InMemoryTokenLedger, LedgerConfig, TokenLedger};

fn main() -> anyhow::Result<()> {
    tokenledger_observability::init();

    let config = LedgerConfig::from_env().context("loading ledger configuration")?;

    let accounts = Arc::new(KnownAccounts::new());
    if let Ok(raw) = std::env::var(ACCOUNTS_ENV) {
        for principal in parse_principals(ACCOUNTS_ENV, &raw)? {
            accounts.register(principal);
        }
    }
    for admin in config.administrators.administrators() {
        accounts.register(admin);
    }

    let mut ledger: InMemoryTokenLedger = TokenLedger::new(
        config,
        InMemoryLedgerStore::new(),
        accounts.clone(),
        Arc::new(InMemoryEventBus::new()),
    );

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for (idx, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        // Anyone who signs a call is, by definition, a known account.
        let outcome = HostCall::from_json(&line).and_then(|call| {
            accounts.register(call.caller);
            ledger.dispatch_call(call)
        });

        let report = match outcome {
            Ok(events) => json!({ "line": idx + 1, "ok": events }),
            Err(err) => json!({ "line": idx + 1, "error": err.to_string() }),
        };
        writeln!(out, "{report}").context("writing outcome")?;
    }

    for record in ledger.store().supplies() {
        tracing::info!(
            symbol = %record.symbol,
            supply = %record.current_supply,
            circulating = %ledger.store().circulating(record.code()),
            "final supply"
        );
    }

    Ok(())
}
