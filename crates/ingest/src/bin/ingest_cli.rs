use std::env;
use std::fs;

use ingest::parse_upload;
use ledger_core::{spending_totals, summarize_records};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: ingest_cli <file.xlsx>");
        std::process::exit(2);
    }

    let path = &args[1];
    let bytes = fs::read(path).unwrap_or_else(|err| {
        eprintln!("failed to read {}: {}", path, err);
        std::process::exit(1);
    });

    let records = parse_upload(&bytes).unwrap_or_else(|err| {
        eprintln!("{}: {}", path, err);
        std::process::exit(1);
    });

    println!("records {}", records.len());
    let summary = summarize_records(&records);
    for row in &summary {
        println!(
            "{} overreach={} covered={}/{} budget_minutes={}",
            row.caller,
            row.overreach_cost,
            row.budget_covered_calls,
            row.total_calls,
            row.budget_minutes.unwrap_or(0)
        );
    }
    let totals = spending_totals(&summary);
    println!(
        "total overreach={} covered={}/{}",
        totals.overreach_cost, totals.budget_covered_calls, totals.total_calls
    );
}
