//! Message relay — turns inbound chat messages into persisted records and
//! reply texts.
//!
//! For each message:
//!
//! 1. resolve the receiving account's session (identity of the submitter);
//! 2. ignore messages that mention none of the trigger keywords;
//! 3. decode and extract; unreadable input gets a failure reply;
//! 4. reject messages with no recoverable train id without persisting;
//! 5. build, attach the sender, persist, confirm.
//!
//! [`MessageRelay::run`] drives this from a tokio channel.

use chrono::NaiveDate;
use induct_core::{Config, MessageOrigin, Normalizer, SubmissionSource};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::reply;
use crate::session::SessionStore;
use crate::sink::{DocumentId, RecordSink};
use crate::text::{is_induction_message, parse_message_bytes};

/// A message as delivered by the messaging collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender address (phone number or group id).
    pub from: String,
    pub sender_name: String,
    pub is_group: bool,
    /// Message body exactly as received; not guaranteed to be UTF-8.
    pub body: Vec<u8>,
    pub received_on: NaiveDate,
}

impl InboundMessage {
    pub fn text(
        from: impl Into<String>,
        sender_name: impl Into<String>,
        body: &str,
        received_on: NaiveDate,
    ) -> Self {
        Self {
            from: from.into(),
            sender_name: sender_name.into(),
            is_group: false,
            body: body.as_bytes().to_vec(),
            received_on,
        }
    }
}

/// A message addressed to one linked account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub account_id: String,
    pub message: InboundMessage,
}

/// A reply to send back through the account that received the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub account_id: String,
    pub to: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Not an induction report; no reply is sent.
    Ignored,
    Accepted {
        doc_id: DocumentId,
        train_id: String,
        reply: String,
    },
    /// Parsed, but no train id could be recovered.
    Rejected { reply: String },
    /// The message could not be read.
    Failed { reply: String },
}

impl RelayOutcome {
    pub fn reply(&self) -> Option<&str> {
        match self {
            RelayOutcome::Ignored => None,
            RelayOutcome::Accepted { reply, .. }
            | RelayOutcome::Rejected { reply }
            | RelayOutcome::Failed { reply } => Some(reply),
        }
    }
}

/// Per-outcome counters returned by [`MessageRelay::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub ignored: usize,
    /// Messages dropped because of a session or sink error.
    pub errors: usize,
}

pub struct MessageRelay<S, T> {
    normalizer: Normalizer,
    trigger_keywords: Vec<String>,
    sink: S,
    sessions: T,
}

impl<S: RecordSink, T: SessionStore> MessageRelay<S, T> {
    pub fn new(config: &Config, sink: S, sessions: T) -> Self {
        Self {
            normalizer: Normalizer::from_config(config),
            trigger_keywords: config.relay.trigger_keywords.clone(),
            sink,
            sessions,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sessions(&self) -> &T {
        &self.sessions
    }

    /// Process one message received by `account_id`.
    pub async fn handle(
        &self,
        account_id: &str,
        message: InboundMessage,
    ) -> Result<RelayOutcome, FeedError> {
        let session = self
            .sessions
            .get(account_id)
            .ok_or_else(|| FeedError::UnknownSession(account_id.to_string()))?;
        if !session.connected {
            return Err(FeedError::SessionDisconnected(account_id.to_string()));
        }

        let preview = String::from_utf8_lossy(&message.body);
        if !is_induction_message(&preview, &self.trigger_keywords) {
            debug!(account_id, from = %message.from, "message has no trigger keyword");
            return Ok(RelayOutcome::Ignored);
        }

        let fields = match parse_message_bytes(&self.normalizer, &message.body) {
            Ok(fields) => fields,
            Err(FeedError::Normalize(err)) => {
                warn!(account_id, from = %message.from, error = %err, "unreadable message");
                return Ok(RelayOutcome::Failed {
                    reply: reply::processing_failure(&err.to_string()),
                });
            }
            Err(err) => return Err(err),
        };

        if !fields.has_train_id() {
            info!(account_id, from = %message.from, "message rejected: no train id");
            return Ok(RelayOutcome::Rejected {
                reply: reply::rejection(),
            });
        }

        let mut record = self.normalizer.build(
            &fields,
            &session.submitter,
            SubmissionSource::Whatsapp,
            message.received_on,
        );
        record.origin = Some(MessageOrigin {
            from: message.from.clone(),
            name: message.sender_name.clone(),
            is_group: message.is_group,
            original_message: preview.into_owned(),
        });

        let doc_id = self.sink.persist(record).await?;
        info!(
            account_id,
            train_id = %fields.train_id,
            doc_id = %doc_id,
            "induction record stored"
        );

        Ok(RelayOutcome::Accepted {
            reply: reply::confirmation(&fields.train_id, &doc_id, &session.submitter.name),
            train_id: fields.train_id,
            doc_id,
        })
    }

    /// Consume envelopes until the channel closes, sending a reply for every
    /// message that is not ignored. Per-message errors are logged and
    /// counted; they do not stop the loop.
    pub async fn run(
        self,
        mut inbound: mpsc::Receiver<Envelope>,
        replies: mpsc::Sender<OutboundReply>,
    ) -> RelayStats {
        let mut stats = RelayStats::default();

        while let Some(Envelope {
            account_id,
            message,
        }) = inbound.recv().await
        {
            let to = message.from.clone();
            let outcome = match self.handle(&account_id, message).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(account_id = %account_id, error = %err, "relay dropped message");
                    stats.errors += 1;
                    continue;
                }
            };

            match &outcome {
                RelayOutcome::Ignored => stats.ignored += 1,
                RelayOutcome::Accepted { .. } => stats.accepted += 1,
                RelayOutcome::Rejected { .. } => stats.rejected += 1,
                RelayOutcome::Failed { .. } => stats.failed += 1,
            }

            if let Some(text) = outcome.reply() {
                let reply = OutboundReply {
                    account_id: account_id.clone(),
                    to,
                    text: text.to_string(),
                };
                if replies.send(reply).await.is_err() {
                    debug!("reply channel closed, stopping relay");
                    break;
                }
            }
        }

        info!(?stats, "relay finished");
        stats
    }
}
