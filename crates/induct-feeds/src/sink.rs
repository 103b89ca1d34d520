//! Record sinks — where finished induction records go.
//!
//! A sink stands in for the document store: it assigns the document id and
//! the server timestamp, then stores the record verbatim.

use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use induct_core::InductionRecord;

use crate::error::FeedError;

/// Identifier assigned to a persisted record.
pub type DocumentId = String;

/// Persistence collaborator. Implementations must fill in
/// [`InductionRecord::timestamp`].
pub trait RecordSink: Send + Sync {
    fn persist(
        &self,
        record: InductionRecord,
    ) -> impl Future<Output = Result<DocumentId, FeedError>> + Send;
}

impl<S: RecordSink> RecordSink for Arc<S> {
    fn persist(
        &self,
        record: InductionRecord,
    ) -> impl Future<Output = Result<DocumentId, FeedError>> + Send {
        (**self).persist(record)
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// A record held by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: DocumentId,
    pub record: InductionRecord,
}

/// In-process sink with sequential ids (`doc-000001`, …).
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far, in arrival order.
    pub fn records(&self) -> Vec<StoredRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSink for MemorySink {
    async fn persist(&self, mut record: InductionRecord) -> Result<DocumentId, FeedError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| FeedError::Persist("memory sink lock poisoned".to_string()))?;
        let id = format!("doc-{:06}", records.len() + 1);
        record.timestamp = Some(Utc::now());
        records.push(StoredRecord {
            id: id.clone(),
            record,
        });
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// JsonLinesSink
// ---------------------------------------------------------------------------

/// Writes one JSON document per line, with the document id under `"id"`.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    async fn persist(&self, mut record: InductionRecord) -> Result<DocumentId, FeedError> {
        let id = uuid::Uuid::new_v4().to_string();
        record.timestamp = Some(Utc::now());

        let mut document = serde_json::to_value(&record)?;
        if let serde_json::Value::Object(map) = &mut document {
            map.insert("id".to_string(), serde_json::Value::String(id.clone()));
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| FeedError::Persist("json sink lock poisoned".to_string()))?;
        serde_json::to_writer(&mut *writer, &document)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use induct_core::{build_induction_record, ParsedFields, Submitter, SubmissionSource};

    fn record(train_id: &str) -> InductionRecord {
        let fields = ParsedFields {
            train_id: train_id.to_string(),
            ..ParsedFields::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        build_induction_record(&fields, &Submitter::default(), SubmissionSource::ManualEntry, date)
    }

    #[tokio::test]
    async fn memory_sink_assigns_sequential_ids_and_timestamps() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.persist(record("KMRC-1")).await.unwrap(), "doc-000001");
        assert_eq!(sink.persist(record("KMRC-2")).await.unwrap(), "doc-000002");

        let stored = sink.records();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].record.train_id(), "KMRC-2");
        assert!(stored.iter().all(|s| s.record.timestamp.is_some()));
    }

    #[tokio::test]
    async fn arc_sink_delegates() {
        let sink = Arc::new(MemorySink::new());
        let shared = Arc::clone(&sink);
        shared.persist(record("KMRC-3")).await.unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn json_lines_sink_writes_one_document_per_line() {
        let sink = JsonLinesSink::new(Vec::new());
        let id = sink.persist(record("KMRC-4")).await.unwrap();
        sink.persist(record("KMRC-5")).await.unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], id.as_str());
        assert_eq!(first["stablingGeometry"][0]["trainId"], "KMRC-4");
        assert_eq!(first["source"], "manual_entry");
        assert!(first["timestamp"].is_string());
    }
}
