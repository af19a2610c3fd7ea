use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use tokenledger_auth::KnownAccounts;
use tokenledger_events::InMemoryEventBus;
use tokenledger_token::{
    HostCall, InMemoryLedgerStore, InMemoryTokenLedger, LedgerAction, LedgerConfig, PrincipalId,
    SymbolCode, TokenLedger,
};

struct Setup {
    ledger: InMemoryTokenLedger,
    issuer: PrincipalId,
    holders: Vec<PrincipalId>,
    symbol: SymbolCode,
}

/// Uncapped `BENCH` token with `holders` funded accounts.
fn setup(holders: usize) -> Setup {
    let admin = PrincipalId::new();
    let issuer = PrincipalId::new();
    let holders: Vec<PrincipalId> = (0..holders).map(|_| PrincipalId::new()).collect();
    let accounts = KnownAccounts::with_accounts(holders.iter().copied().chain([issuer]));
    let mut ledger = TokenLedger::new(
        LedgerConfig::with_admin(admin),
        InMemoryLedgerStore::new(),
        Arc::new(accounts),
        Arc::new(InMemoryEventBus::new()),
    );
    let symbol = SymbolCode::new("BENCH", 4).unwrap();
    ledger.create(admin, issuer, symbol.asset(-1)).unwrap();
    for holder in &holders {
        ledger
            .issue(issuer, *holder, symbol.asset(1_000_000_000), "")
            .unwrap();
    }

    Setup {
        ledger,
        issuer,
        holders,
        symbol,
    }
}

fn bench_operation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation_latency");
    group.sample_size(1000);

    group.bench_function("issue_to_self", |b| {
        let mut s = setup(0);
        b.iter(|| {
            s.ledger
                .issue(s.issuer, s.issuer, black_box(s.symbol.asset(1)), "")
                .unwrap();
        });
    });

    group.bench_function("issue_to_holder", |b| {
        let mut s = setup(1);
        let to = s.holders[0];
        b.iter(|| {
            s.ledger
                .issue(s.issuer, to, black_box(s.symbol.asset(1)), "")
                .unwrap();
        });
    });

    // Alternate direction so neither side runs dry.
    group.bench_function("transfer_round_trip", |b| {
        let mut s = setup(2);
        let (x, y) = (s.holders[0], s.holders[1]);
        b.iter(|| {
            s.ledger
                .transfer(x, x, y, black_box(s.symbol.asset(3)), "", None)
                .unwrap();
            s.ledger
                .transfer(y, y, x, black_box(s.symbol.asset(3)), "", None)
                .unwrap();
        });
    });

    group.bench_function("rejected_transfer", |b| {
        let mut s = setup(2);
        let (x, y) = (s.holders[0], s.holders[1]);
        b.iter(|| {
            s.ledger
                .transfer(x, x, y, black_box(s.symbol.asset(i64::MAX)), "", None)
                .unwrap_err();
        });
    });

    group.finish();
}

fn bench_transfer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_throughput");

    for holders in [2usize, 16, 128].iter() {
        group.throughput(Throughput::Elements(*holders as u64));
        group.bench_with_input(
            BenchmarkId::new("ring", holders),
            holders,
            |b, &size| {
                let mut s = setup(size);
                b.iter(|| {
                    for i in 0..size {
                        let from = s.holders[i];
                        let to = s.holders[(i + 1) % size];
                        s.ledger
                            .transfer(from, from, to, s.symbol.asset(1), "", None)
                            .unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_dispatch_from_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_from_json");

    group.bench_function("transfer", |b| {
        let mut s = setup(2);
        let (x, y) = (s.holders[0], s.holders[1]);
        let there = serde_json::to_string(&HostCall {
            caller: x,
            action: LedgerAction::Transfer {
                from: x,
                to: y,
                quantity: s.symbol.asset(1),
                memo: "bench".to_string(),
                sponsor: None,
            },
        })
        .unwrap();
        let back = serde_json::to_string(&HostCall {
            caller: y,
            action: LedgerAction::Transfer {
                from: y,
                to: x,
                quantity: s.symbol.asset(1),
                memo: "bench".to_string(),
                sponsor: None,
            },
        })
        .unwrap();

        b.iter(|| {
            for payload in [&there, &back] {
                let call = HostCall::from_json(black_box(payload)).unwrap();
                s.ledger.dispatch_call(call).unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_operation_latency,
    bench_transfer_throughput,
    bench_dispatch_from_json
);
criterion_main!(benches);
