//! fraud-runner: line-oriented JSON front end for the risk engine.
//!
//! Usage:
//!   fraud-runner --db fraud.db --config data/engine.json < commands.jsonl
//!
//! One command per stdin line, one response per stdout line.

use antifraud_core::{
    config::EngineConfig,
    engine::RiskEngine,
    error::FraudError,
    store::FraudStore,
    transaction::TransactionRequest,
    types::TransactionId,
    verdict::Verdict,
};
use anyhow::Result;
use serde_json::{json, Value};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Command {
    Evaluate(TransactionRequest),
    Feedback {
        transaction_id: TransactionId,
        feedback:       Verdict,
    },
    AddStolenCard { number: String },
    RemoveStolenCard { number: String },
    ListStolenCards,
    AddSuspiciousIp { ip: String },
    RemoveSuspiciousIp { ip: String },
    ListSuspiciousIps,
    History {
        #[serde(default)]
        number: Option<String>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let config = match flag_value(&args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    log::info!(
        "fraud-runner starting: db={db} allowed={} manual={} window={}s",
        config.thresholds.allowed,
        config.thresholds.manual,
        config.correlation.window_seconds
    );

    let store = if db == ":memory:" {
        FraudStore::in_memory()?
    } else {
        FraudStore::open(db)?
    };
    store.migrate()?;
    let engine = RiskEngine::new(config, store);

    run_loop(&engine)
}

fn run_loop(engine: &RiskEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let response = match handle_line(engine, &buffer)? {
            Some(value) => value,
            None => break,
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

/// Response for one input line, or `None` on `quit`. Storage failures are
/// returned as errors and end the session; the caller decides on retry.
fn handle_line(engine: &RiskEngine, line: &str) -> Result<Option<Value>> {
    let cmd: Command = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            return Ok(Some(json!({ "error": "malformed_input", "message": e.to_string() })));
        }
    };
    if matches!(cmd, Command::Quit) {
        return Ok(None);
    }

    match handle_command(engine, cmd) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == "internal" => Err(e.into()),
        Err(e) => Ok(Some(json!({ "error": e.kind(), "message": e.to_string() }))),
    }
}

fn handle_command(engine: &RiskEngine, cmd: Command) -> Result<Value, FraudError> {
    let value = match cmd {
        Command::Evaluate(request) => serde_json::to_value(engine.evaluate(&request)?)?,
        Command::Feedback { transaction_id, feedback } => {
            serde_json::to_value(engine.record_feedback(transaction_id, feedback)?)?
        }
        Command::AddStolenCard { number } => serde_json::to_value(engine.add_stolen_card(&number)?)?,
        Command::RemoveStolenCard { number } => {
            engine.remove_stolen_card(&number)?;
            json!({ "status": format!("Card {number} successfully removed!") })
        }
        Command::ListStolenCards => serde_json::to_value(engine.list_stolen_cards()?)?,
        Command::AddSuspiciousIp { ip } => serde_json::to_value(engine.add_suspicious_ip(&ip)?)?,
        Command::RemoveSuspiciousIp { ip } => {
            engine.remove_suspicious_ip(&ip)?;
            json!({ "status": format!("IP {ip} successfully removed!") })
        }
        Command::ListSuspiciousIps => serde_json::to_value(engine.list_suspicious_ips()?)?,
        Command::History { number: Some(number) } => serde_json::to_value(engine.history_for(&number)?)?,
        Command::History { number: None } => serde_json::to_value(engine.history()?)?,
        Command::Quit => Value::Null,
    };
    Ok(value)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
