//! Bulk upload — one induction record per sheet row or XML `<train>` block.
//!
//! Both formats are read into [`Row`]s first and share [`ingest_rows`], so a
//! column means the same thing whichever file it came from.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use induct_core::{Normalizer, Submitter, SubmissionSource};
use tracing::{info, warn};

use crate::error::FeedError;
use crate::sink::{DocumentId, RecordSink};
use crate::tabular::{read_rows, row_to_fields, Row};
use crate::xml::read_trains;

/// File format of a bulk upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetFormat {
    #[default]
    Csv,
    Xml,
}

impl SheetFormat {
    /// Guess from the file extension; anything but `.xml` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => SheetFormat::Xml,
            _ => SheetFormat::Csv,
        }
    }

    pub fn read(self, text: &str) -> Result<Vec<Row>, FeedError> {
        match self {
            SheetFormat::Csv => read_rows(text),
            SheetFormat::Xml => read_trains(text),
        }
    }
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SheetFormat::Csv => "csv",
            SheetFormat::Xml => "xml",
        })
    }
}

impl FromStr for SheetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "xml" => Ok(SheetFormat::Xml),
            other => Err(format!("unknown bulk format {other:?} (expected csv or xml)")),
        }
    }
}

/// What a bulk upload did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// `(document id, train id)` for every stored row, in sheet order.
    pub persisted: Vec<(DocumentId, String)>,
    /// Row numbers (1-based) skipped for lack of a train id.
    pub skipped_rows: Vec<usize>,
}

impl BulkReport {
    pub fn count(&self) -> usize {
        self.persisted.len()
    }
}

/// Persist one record per row. Rows without a train id are skipped rather
/// than stored half-empty. A sink failure stops the upload and is returned;
/// rows stored before it stay stored. `original_file` is recorded on every
/// record.
pub async fn ingest_rows<S: RecordSink>(
    rows: &[Row],
    submitter: &Submitter,
    date: NaiveDate,
    normalizer: &Normalizer,
    sink: &S,
    original_file: Option<&str>,
) -> Result<BulkReport, FeedError> {
    let mut report = BulkReport::default();

    for row in rows {
        let fields = row_to_fields(row, normalizer.extractor().defaults());
        if !fields.has_train_id() {
            warn!(row = row.number, "skipping bulk row without train id");
            report.skipped_rows.push(row.number);
            continue;
        }

        let mut record = normalizer.build(&fields, submitter, SubmissionSource::BulkUpload, date);
        record.original_file = original_file.map(str::to_string);
        let doc_id = sink.persist(record).await?;
        report.persisted.push((doc_id, fields.train_id));
    }

    info!(
        rows = rows.len(),
        stored = report.count(),
        skipped = report.skipped_rows.len(),
        file = original_file.unwrap_or_default(),
        "bulk upload finished"
    );
    Ok(report)
}

/// Parse a CSV sheet and persist one record per row.
pub async fn ingest_csv<S: RecordSink>(
    text: &str,
    submitter: &Submitter,
    date: NaiveDate,
    normalizer: &Normalizer,
    sink: &S,
) -> Result<BulkReport, FeedError> {
    ingest_rows(&read_rows(text)?, submitter, date, normalizer, sink, None).await
}

/// Parse an XML upload and persist one record per `<train>` block.
pub async fn ingest_xml<S: RecordSink>(
    text: &str,
    submitter: &Submitter,
    date: NaiveDate,
    normalizer: &Normalizer,
    sink: &S,
) -> Result<BulkReport, FeedError> {
    ingest_rows(&read_trains(text)?, submitter, date, normalizer, sink, None).await
}
