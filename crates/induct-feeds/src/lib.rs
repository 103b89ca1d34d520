//! induct-feeds — front-ends and collaborator seams for induct.
//!
//! Each front-end turns one kind of raw input into
//! [`induct_core::ParsedFields`] and hands finished
//! [`induct_core::InductionRecord`]s to a [`RecordSink`].
//!
//! | Module      | Input                                   |
//! |-------------|-----------------------------------------|
//! | [`text`]    | one free-text message                   |
//! | [`tabular`] | a CSV bulk sheet                        |
//! | [`xml`]     | an XML bulk upload of `<train>` records |
//! | [`bulk`]    | either of the above, persisted per row  |
//! | [`relay`]   | a stream of chat messages over `mpsc`   |

pub mod bulk;
pub mod error;
pub mod relay;
pub mod reply;
pub mod session;
pub mod sink;
pub mod tabular;
pub mod text;
pub mod xml;

pub use bulk::{ingest_csv, ingest_rows, ingest_xml, BulkReport, SheetFormat};
pub use error::FeedError;
pub use relay::{Envelope, InboundMessage, MessageRelay, OutboundReply, RelayOutcome, RelayStats};
pub use session::{InMemorySessionStore, RelaySession, SessionStore};
pub use sink::{DocumentId, JsonLinesSink, MemorySink, RecordSink, StoredRecord};
