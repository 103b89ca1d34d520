#![allow(unused)]
//! Message relay integration harness.
//!
//! # What this covers
//!
//! - **Run loop**: envelopes in, replies out over tokio channels; the loop
//!   ends when the inbound side closes and returns per-outcome counts.
//! - **Filtering**: chatter without trigger keywords is ignored silently.
//! - **Replies**: accepted reports are confirmed with train and document id,
//!   reports without a train id get a rejection naming the expected format.
//! - **Sessions**: messages for unknown or disconnected accounts are dropped
//!   and counted, without stopping the loop.
//!
//! # Running
//!
//! ```sh
//! cargo test --test relay_harness
//! ```

mod common;
use common::*;

use std::sync::Arc;

use induct_core::Config;
use induct_feeds::{
    Envelope, InMemorySessionStore, MemorySink, MessageRelay, OutboundReply, RelayStats,
    SessionStore,
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

fn envelope(account_id: &str, body: &str) -> Envelope {
    Envelope {
        account_id: account_id.to_string(),
        message: chat(body),
    }
}

/// Feed `envelopes` through a relay and collect every reply and the stats.
async fn run_relay(
    sessions: InMemorySessionStore,
    sink: Arc<MemorySink>,
    envelopes: Vec<Envelope>,
) -> (Vec<OutboundReply>, RelayStats) {
    let relay = MessageRelay::new(&Config::defaults(), sink, sessions);
    let (inbound_tx, inbound_rx) = mpsc::channel(4);
    let (reply_tx, mut reply_rx) = mpsc::channel(4);
    let task = tokio::spawn(relay.run(inbound_rx, reply_tx));

    tokio::spawn(async move {
        for envelope in envelopes {
            inbound_tx.send(envelope).await.unwrap();
        }
    });

    let mut replies = Vec::new();
    while let Some(reply) = reply_rx.recv().await {
        replies.push(reply);
    }
    (replies, task.await.unwrap())
}

#[tokio::test]
async fn mixed_traffic() {
    let sink = Arc::new(MemorySink::new());
    let mut envelopes = vec![envelope("u-1", SAMPLE_MESSAGE)];
    envelopes.extend(CORPUS_CHATTER.iter().map(|body| envelope("u-1", body)));
    envelopes.push(envelope("u-1", "Depot: Muttom\nMileage: 1000"));
    envelopes.push(envelope("u-1", "Random notes about KMRC-099 inspection"));

    let (replies, stats) = run_relay(connected_sessions(), Arc::clone(&sink), envelopes).await;

    assert_eq!(
        stats,
        RelayStats {
            accepted: 2,
            rejected: 1,
            failed: 0,
            ignored: CORPUS_CHATTER.len(),
            errors: 0,
        }
    );
    assert_eq!(replies.len(), 3);
    assert!(replies.iter().all(|r| r.account_id == "u-1" && r.to == "919800000001"));
    assert!(replies[0].text.contains("Train ID: KMRC-012"));
    assert!(replies[0].text.contains("Document ID: doc-000001"));
    assert!(replies[1].text.contains("No train set ID found"));
    assert!(replies[2].text.contains("Train ID: KMRC-099"));

    let stored = sink.records();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].record.user_name, "Depot Controller");
    assert_eq!(stored[0].record.mileage[0].delta_km, 500);
}

#[tokio::test]
async fn session_errors_do_not_stop_the_loop() {
    let sessions = connected_sessions();
    let mut offline = sessions.get("u-1").unwrap();
    offline.account_id = "u-2".to_string();
    offline.connected = false;
    sessions.put(offline);

    let sink = Arc::new(MemorySink::new());
    let envelopes = vec![
        envelope("u-9", "Train Set: KMRC-1"),
        envelope("u-2", "Train Set: KMRC-2"),
        envelope("u-1", "Train Set: KMRC-3"),
    ];
    let (replies, stats) = run_relay(sessions, Arc::clone(&sink), envelopes).await;

    assert_eq!(stats.errors, 2);
    assert_eq!(stats.accepted, 1);
    assert_eq!(replies.len(), 1);
    assert_eq!(sink.records()[0].record.train_id(), "KMRC-3");
}

#[tokio::test]
async fn closed_inbound_channel_ends_the_run() {
    let sink = Arc::new(MemorySink::new());
    let (replies, stats) = run_relay(connected_sessions(), sink, Vec::new()).await;
    assert!(replies.is_empty());
    assert_eq!(stats, RelayStats::default());
}
