//! Error types produced by induct-feeds.

use induct_core::NormalizeError;
use thiserror::Error;

/// Anything that can go wrong between a raw input and a persisted record.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FeedError {
    /// The message itself could not be read.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// A bulk sheet has no usable header row.
    #[error("bulk sheet has an empty header row")]
    MissingHeader,

    /// A bulk sheet has a header but nothing under it.
    #[error("bulk sheet must contain a header row and at least one data row")]
    NoDataRows,

    /// An XML upload has no `<train>` block carrying a `train_id`.
    #[error("XML upload must contain at least one <train> record with a <train_id>")]
    NoTrainRecords,

    /// A relayed message arrived for an account with no session.
    #[error("no relay session for account {0}")]
    UnknownSession(String),

    /// A relayed message arrived for a session that is not connected.
    #[error("relay session for account {0} is disconnected")]
    SessionDisconnected(String),

    /// The record sink refused or failed to store a record.
    #[error("failed to persist record: {0}")]
    Persist(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
