//! Load Testing Tool
//!
//! Runs concurrent transfers between a small set of wallets and checks that
//! the total balance is unchanged afterwards.
//!
//! Run with: cargo run --bin load_test --release -- --wallets 10 --ops 1000

use std::sync::Arc;
use std::time::Instant;

use sqlx::postgres::PgPoolOptions;
use wallet_ledger::handlers::{CreateWalletCommand, DepositCommand, TransferCommand, WalletHandler};
use wallet_ledger::store::PgScopeProvider;
use wallet_ledger::OperationContext;

const INITIAL_BALANCE: i64 = 10_000;

fn arg_value(args: &[String], name: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let wallet_count = arg_value(&args, "--wallets", 10).max(2) as usize;
    let op_count = arg_value(&args, "--ops", 1000);

    let database_url = std::env::var("DATABASE_URL")?;

    println!("Load Test - {} transfers across {} wallets", op_count, wallet_count);
    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    let handler = Arc::new(WalletHandler::postgres(PgScopeProvider::new(pool.clone())));
    let context = OperationContext::new();

    // Fresh wallets per run so repeated runs don't collide
    let run_id = uuid::Uuid::new_v4().simple().to_string();
    let users: Vec<String> = (0..wallet_count)
        .map(|i| format!("load-{}-{:03}", &run_id[..8], i))
        .collect();

    for user in &users {
        handler
            .create_wallet(CreateWalletCommand::new(user.clone()), &context)
            .await?;
        handler
            .deposit(DepositCommand::new(user.clone(), INITIAL_BALANCE), &context)
            .await?;
    }

    let start = Instant::now();
    let mut tasks = Vec::with_capacity(op_count as usize);

    for i in 0..op_count as usize {
        let handler = Arc::clone(&handler);
        let from = users[i % wallet_count].clone();
        let to = users[(i * 7 + 1) % wallet_count].clone();
        let amount = (i % 50) as i64 + 1;

        tasks.push(tokio::spawn(async move {
            if from == to {
                return Ok(());
            }
            handler
                .transfer(TransferCommand::new(from, to, amount), &OperationContext::new())
                .await
                .map(|_| ())
        }));
    }

    let mut success_count = 0u64;
    let mut rejected_count = 0u64;
    let mut failed_count = 0u64;

    for task in tasks {
        match task.await? {
            Ok(()) => success_count += 1,
            Err(e) if e.is_client_error() => rejected_count += 1,
            Err(e) => {
                failed_count += 1;
                eprintln!("Transfer failed: {}", e);
            }
        }
    }

    let elapsed = start.elapsed();
    let rate = success_count as f64 / elapsed.as_secs_f64();

    let mut total = 0i64;
    for user in &users {
        total += handler.get_balance(user).await?;
    }
    let expected = INITIAL_BALANCE * wallet_count as i64;

    println!("\n=== Load Test Results ===");
    println!("Total transfers: {}", op_count);
    println!("Successful: {}", success_count);
    println!("Rejected: {}", rejected_count);
    println!("Failed: {}", failed_count);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} transfers/sec", rate);
    println!("Total balance: {} (expected {})", total, expected);

    pool.close().await;

    if total != expected {
        anyhow::bail!("Balance conservation violated: {} != {}", total, expected);
    }

    Ok(())
}
