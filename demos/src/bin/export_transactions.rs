//! CLI-driven export: load an event file, run it to completion, and write
//! the resulting trade tape out as JSON. Mirrors the original
//! `--data`/`--schedule`/`--output` batch-export harness, substituting a
//! JSON array for the DataFrame-to-CSV export that harness used.

use std::env;
use std::fs;
use std::process::ExitCode;

use lob_engine::prelude::*;
use serde_json::json;

fn usage() -> String {
    "usage: export_transactions --data <events.csv> [--output <trades.json>]".to_string()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let mut data_path: Option<String> = None;
    let mut output_path = "trades.json".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                i += 1;
                data_path = args.get(i).cloned();
            }
            "--output" => {
                i += 1;
                if let Some(value) = args.get(i) {
                    output_path = value.clone();
                }
            }
            other => {
                eprintln!("unrecognized argument {other:?}\n{}", usage());
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let Some(data_path) = data_path else {
        eprintln!("{}", usage());
        return ExitCode::FAILURE;
    };

    let mut engine = Engine::with_a_share_schedule(EngineConfig::default());
    if let Err(err) = engine.load(&data_path) {
        eprintln!("failed to load {data_path:?}: {err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = engine.run() {
        eprintln!("failed to run to completion: {err}");
        return ExitCode::FAILURE;
    }

    let rows: Vec<_> = engine
        .get_transactions()
        .map(|trade| {
            json!({
                "bid_uid": trade.bid_uid,
                "ask_uid": trade.ask_uid,
                "price": trade.price,
                "quantity": trade.quantity,
                "timestamp": trade.timestamp,
            })
        })
        .collect();

    let body = serde_json::to_string_pretty(&rows).expect("serialize trade tape");
    if let Err(err) = fs::write(&output_path, body) {
        eprintln!("failed to write {output_path:?}: {err}");
        return ExitCode::FAILURE;
    }

    println!("wrote {} transactions to {output_path}", rows.len());
    ExitCode::SUCCESS
}
