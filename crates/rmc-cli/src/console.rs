//! Line-oriented JSON command console.
//!
//! Reads one JSON object per line from stdin and writes one JSON reply per
//! line to stdout:
//!
//! | Request | Reply |
//! |---|---|
//! | any [`RobotCommand`] envelope | `{"ok":true}` or `{"ok":false,"error":{...}}` |
//! | `{"command":"snapshot"}` | the current [`RobotSnapshot`] |
//! | `{"command":"subscribe"}` | `{"ok":true}`, then every published [`RobotSnapshot`] as its own line |
//! | `{"command":"unsubscribe"}` | `{"ok":true}`; the snapshot stream stops |
//! | anything else | `{"ok":false,"error":{"kind":"decode","details":"..."}}` |
//!
//! Every non-blank line counts as operator contact for the link watchdog.

use rmc_runtime::{LinkSupervisor, RobotController};
use rmc_types::{RobotCommand, RobotSnapshot};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

const SNAPSHOT_REQUEST: &str = "snapshot";
const SUBSCRIBE_REQUEST: &str = "subscribe";
const UNSUBSCRIBE_REQUEST: &str = "unsubscribe";

type Updates = Option<broadcast::Receiver<RobotSnapshot>>;

/// Serve stdin until it closes.
pub async fn run(controller: RobotController, supervisor: LinkSupervisor) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut updates: Updates = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                supervisor.contact();
                let reply = handle_line(&line, &controller, &mut updates);
                write_line(&mut stdout, &reply).await?;
            }
            snapshot = next_update(&mut updates) => match snapshot {
                Some(snapshot) => match serde_json::to_string(&snapshot) {
                    Ok(line) => write_line(&mut stdout, &line).await?,
                    Err(e) => warn!(error = %e, "snapshot not serializable"),
                },
                None => updates = None,
            },
        }
    }
    Ok(())
}

async fn write_line(stdout: &mut Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

/// Next streamed snapshot, or pending forever when not subscribed.  `None`
/// means the channel closed.
async fn next_update(updates: &mut Updates) -> Option<RobotSnapshot> {
    let Some(rx) = updates.as_mut() else {
        return std::future::pending().await;
    };
    loop {
        match rx.recv().await {
            Ok(snapshot) => return Some(snapshot),
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "snapshot stream lagged"),
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Decode and apply one request, returning the serialized reply.
pub(crate) fn handle_line(line: &str, controller: &RobotController, updates: &mut Updates) -> String {
    reply_for(line, controller, updates).to_string()
}

fn reply_for(line: &str, controller: &RobotController, updates: &mut Updates) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return decode_error(e.to_string()),
    };

    match request.get("command").and_then(Value::as_str) {
        Some(SNAPSHOT_REQUEST) => {
            return serde_json::to_value(controller.snapshot())
                .unwrap_or_else(|e| decode_error(e.to_string()));
        }
        Some(SUBSCRIBE_REQUEST) => {
            *updates = Some(controller.subscribe());
            return json!({ "ok": true });
        }
        Some(UNSUBSCRIBE_REQUEST) => {
            *updates = None;
            return json!({ "ok": true });
        }
        _ => {}
    }

    let command: RobotCommand = match serde_json::from_value(request) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "undecodable command");
            return decode_error(e.to_string());
        }
    };

    match controller.submit_command(command) {
        Ok(()) => json!({ "ok": true }),
        Err(err) => json!({ "ok": false, "error": err }),
    }
}

fn decode_error(details: String) -> Value {
    json!({ "ok": false, "error": { "kind": "decode", "details": details } })
}
