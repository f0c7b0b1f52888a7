//! Interactive operator console.
//!
//! Menu options map 1:1 to the processing workflow operations; everything in
//! here is prompt rendering around the service layer.

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::AppState;
use crate::domain::{Decision, DecisionOutcome, Transaction, TransactionStatus, MAX_ATTEMPTS};
use crate::services::workflow;

type InputLines = Lines<BufReader<Stdin>>;

/// Runs the menu loop until the operator exits or stdin closes.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_menu(&state).await;

        let Some(line) = input.next_line().await? else {
            shutdown(&state).await;
            break;
        };

        match line.trim() {
            "1" => show_pending(&state, &mut input).await?,
            "2" => process_pending(&state, &mut input).await?,
            "3" => show_history(&state, &mut input).await?,
            "4" => clear_transactions(&state, &mut input).await?,
            "5" => {
                if state.generator.start().await {
                    println!("✓ Auto-generation mode enabled");
                } else {
                    println!("Auto-generation mode is already active");
                }
            }
            "6" => {
                if state.generator.stop().await {
                    println!("✓ Auto-generation mode disabled");
                } else {
                    println!("Auto-generation mode is not active");
                }
            }
            "7" => {
                shutdown(&state).await;
                break;
            }
            "" => {}
            other => println!("Unrecognized option: {}", other),
        }
    }

    Ok(())
}

async fn print_menu(state: &AppState) {
    let (total, pending) = {
        let guard = state.store.read().await;
        (guard.len(), guard.list_pending().len())
    };

    println!();
    println!("=== TRANSACTION INTAKE SIMULATOR ===");
    println!("Total transactions:   {}", total);
    println!("Pending transactions: {}", pending);
    if state.generator.is_active().await {
        println!("Auto-generation mode: ACTIVE");
    } else {
        println!("Auto-generation mode: inactive");
    }
    println!();
    println!("  1) List pending transactions");
    println!("  2) Process pending transactions");
    println!("  3) Transaction history");
    println!("  4) Clear all transactions");
    println!("  5) Enable auto-generation mode");
    println!("  6) Disable auto-generation mode");
    println!("  7) Exit");
    println!("Select an option:");
}

fn print_record(tx: &Transaction) {
    println!("    Amount:  {} {}", tx.amount, tx.currency);
    println!("    Account: {}", tx.iban_account);
    println!("    Date:    {}", tx.submitted_at.format("%Y-%m-%d %H:%M:%S"));
    println!("    Type:    {}", tx.tx_type);
    println!("    Attempt: {} of {}", tx.attempts, MAX_ATTEMPTS);
}

async fn show_pending(state: &AppState, input: &mut InputLines) -> anyhow::Result<()> {
    println!();
    println!("=== PENDING TRANSACTIONS ===");

    let pending: Vec<Transaction> = {
        let guard = state.store.read().await;
        guard.list_pending().into_iter().cloned().collect()
    };

    if pending.is_empty() {
        println!("No pending transactions");
    } else {
        for (index, tx) in pending.iter().enumerate() {
            println!();
            println!("[{}] Transaction: {}", index + 1, tx.code);
            print_record(tx);
        }
    }

    pause(input).await
}

async fn process_pending(state: &AppState, input: &mut InputLines) -> anyhow::Result<()> {
    println!();
    println!("=== PROCESS TRANSACTIONS ===");

    // Snapshot of the queue; submissions arriving mid-pass wait for the next one.
    let snapshot = workflow::pending_codes(&state.store).await;

    if snapshot.is_empty() {
        println!("No pending transactions to process");
        return pause(input).await;
    }

    let total = snapshot.len();
    for (index, code) in snapshot.iter().enumerate() {
        let Some(tx) = workflow::get(&state.store, code).await else {
            continue;
        };
        if !tx.is_pending() {
            continue;
        }

        println!();
        println!("[{}/{}] Transaction: {}", index + 1, total, tx.code);
        print_record(&tx);
        println!("(a)pprove, (r)eject, (s)kip, (c)ancel?");

        let decision = loop {
            let Some(line) = input.next_line().await? else {
                println!("Processing cancelled");
                return Ok(());
            };
            match line.trim().to_lowercase().as_str() {
                "a" => break Some(Decision::Approve),
                "r" => break Some(Decision::Reject),
                "s" => break Some(Decision::Skip),
                "c" => break None,
                _ => println!("Please answer a, r, s, or c"),
            }
        };

        let Some(decision) = decision else {
            println!("Processing cancelled");
            return Ok(());
        };

        match workflow::apply_decision(&state.store, code, decision).await {
            Ok(DecisionOutcome::Approved) => println!("✓ Transaction approved"),
            Ok(DecisionOutcome::PermanentlyRejected) => {
                println!("✗ Transaction permanently rejected (maximum attempts reached)")
            }
            Ok(DecisionOutcome::TemporarilyRejected) => {
                println!("⚠ Transaction temporarily rejected, awaiting next-day retry")
            }
            Ok(DecisionOutcome::Skipped) => println!("Transaction skipped"),
            Err(err) => println!("Could not process {}: {}", code, err),
        }
    }

    println!();
    println!("All pending transactions have been presented");
    pause(input).await
}

fn status_label(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "pending",
        TransactionStatus::Approved => "approved",
        TransactionStatus::TemporarilyRejected => "temp-rejected",
        TransactionStatus::PermanentlyRejected => "rejected",
    }
}

async fn show_history(state: &AppState, input: &mut InputLines) -> anyhow::Result<()> {
    println!();
    println!("=== TRANSACTION HISTORY ===");

    let summary = workflow::history(&state.store).await;

    if summary.total == 0 {
        println!("No transactions in the history");
        return pause(input).await;
    }

    println!("Approved:             {}", summary.approved);
    println!("Permanently rejected: {}", summary.permanently_rejected);
    println!("Pending:              {}", summary.pending);
    println!("Temporarily rejected: {}", summary.temporarily_rejected);

    println!();
    println!("Last {} transactions:", summary.recent.len());
    for tx in &summary.recent {
        println!(
            "[{}] {} - {} {} - attempts: {}",
            status_label(tx.status),
            tx.code,
            tx.amount,
            tx.currency,
            tx.attempts
        );
    }

    pause(input).await
}

async fn clear_transactions(state: &AppState, input: &mut InputLines) -> anyhow::Result<()> {
    println!();
    println!("=== CLEAR TRANSACTIONS ===");
    println!("Delete ALL transactions? (y/N)");

    let confirmed = matches!(
        input.next_line().await?.as_deref().map(str::trim),
        Some("y") | Some("Y")
    );

    if confirmed {
        workflow::clear_all(&state.store).await;
        println!("✓ All transactions deleted");
    } else {
        println!("Operation cancelled");
    }

    Ok(())
}

/// Stops the generator and forces a final persist before the process ends.
async fn shutdown(state: &AppState) {
    state.generator.stop().await;

    let guard = state.store.read().await;
    if let Err(err) = guard.save().await {
        tracing::error!("final persist failed: {}", err);
    }
    println!("Shutting down the simulator");
}

async fn pause(input: &mut InputLines) -> anyhow::Result<()> {
    println!();
    println!("Press Enter to return to the menu");
    input.next_line().await?;
    Ok(())
}
