//! Benchmark suite for settlement and script runs
//!
//! Uses the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Scripts are generated in memory: a set of accounts opened with a float,
//! followed by a round-robin of transfers, deposits and withdrawals.

use core_banker::core::{FeePolicy, TransactionEngine};
use core_banker::io::MemoryLog;
use core_banker::runner::{EngineConfig, ScriptRunner};
use core_banker::types::AccountId;
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

fn script(accounts: usize, operations: usize) -> String {
    let mut script = String::from("type,account,owner,target,amount\n");
    for i in 0..accounts {
        script.push_str(&format!("open,CB-{:05},Owner {},,10000\n", i, i));
    }
    for i in 0..operations {
        let source = i % accounts;
        let target = (i * 7 + 1) % accounts;
        let line = match i % 3 {
            0 => format!("transfer,CB-{:05},,CB-{:05},12.34\n", source, target),
            1 => format!("deposit,CB-{:05},,,5.00\n", target),
            _ => format!("withdrawal,CB-{:05},,,3.21\n", source),
        };
        script.push_str(&line);
    }
    script
}

fn engine(accounts: usize, fee_policy: FeePolicy) -> (TransactionEngine, Vec<AccountId>) {
    let mut engine = TransactionEngine::new()
        .with_fee_policy(fee_policy)
        .with_log(Box::new(MemoryLog::new()));
    let ids: Vec<AccountId> = (0..accounts)
        .map(|i| AccountId::new(format!("CB-{:05}", i)))
        .collect();
    for id in &ids {
        engine
            .open_account(id.clone(), "Owner", Decimal::new(1_000_000, 0))
            .expect("open failed");
    }
    engine
        .open_account(AccountId::new("CB-FEES"), "Bank fees", Decimal::ZERO)
        .expect("open failed");
    (engine, ids)
}

/// Transfers between pre-opened accounts, with and without the fee
#[divan::bench(args = [false, true])]
fn transfers(bencher: divan::Bencher, with_fee: bool) {
    let policy = if with_fee {
        FeePolicy::standard(AccountId::new("CB-FEES"))
    } else {
        FeePolicy::None
    };

    bencher
        .with_inputs(|| engine(100, policy.clone()))
        .bench_local_values(|(mut engine, ids)| {
            for i in 0..1_000 {
                let source = &ids[i % ids.len()];
                let target = &ids[(i * 7 + 1) % ids.len()];
                engine
                    .transfer(source, target, Decimal::new(1234, 2))
                    .expect("transfer failed");
            }
            engine
        });
}

/// Full script run: parsing, settlement and account output
#[divan::bench(args = [100, 1_000, 10_000])]
fn script_run(bencher: divan::Bencher, operations: usize) {
    let input = script(50, operations);
    let runner = ScriptRunner::new(EngineConfig::default());

    bencher.bench_local(|| {
        let mut output = Vec::new();
        runner
            .run_reader(input.as_bytes(), &mut output)
            .expect("run failed");
        output
    });
}
