//! induct — trainset induction intake.
//!
//! Turns ground-staff reports (chat messages, typed notes, bulk sheets) into
//! canonical induction records. The work is split across two crates that are
//! re-exported here so the CLI and the integration harnesses can reach both.
//!
//! # Architecture
//!
//! ```text
//! chat relay ──┐
//! free text ───┼──► induct-core: extract ──► build ──► RecordSink
//! bulk sheet ──┘     (induct-feeds front-ends)
//! ```
//!
//! The core is synchronous and pure; only the relay loop and the sinks are
//! async.

use std::io::Read;
use std::path::Path;

pub use induct_core;
pub use induct_feeds;

/// A line consisting of exactly this separates messages in a relay batch.
pub const MESSAGE_SEPARATOR: &str = "---";

/// Split a batch of messages on separator lines. Empty messages are dropped.
pub fn split_messages(batch: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();

    for line in batch.lines() {
        if line.trim() == MESSAGE_SEPARATOR {
            if !current.trim().is_empty() {
                messages.push(std::mem::take(&mut current));
            }
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.trim().is_empty() {
        messages.push(current);
    }
    messages
}

/// Read a whole file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read(p),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
