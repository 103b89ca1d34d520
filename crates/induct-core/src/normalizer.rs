//! Normalizer — the extractor and record builder configured as one unit.
//!
//! Front-ends hold a [`Normalizer`] built from [`Config`] and call
//! [`extract`](Normalizer::extract) / [`build`](Normalizer::build), or
//! [`normalize`](Normalizer::normalize) to do both in one step.

use chrono::NaiveDate;

use crate::builder::RecordBuilder;
use crate::config::Config;
use crate::error::NormalizeError;
use crate::extract::FieldExtractor;
use crate::types::{InductionRecord, ParsedFields, Submitter, SubmissionSource};

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    extractor: FieldExtractor,
    builder: RecordBuilder,
}

impl Normalizer {
    pub fn new(extractor: FieldExtractor, builder: RecordBuilder) -> Self {
        Self { extractor, builder }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            extractor: FieldExtractor::new(config.fields.clone())
                .with_max_message_bytes(config.relay.max_message_bytes),
            builder: RecordBuilder::new(config.record.clone()),
        }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    pub fn builder(&self) -> &RecordBuilder {
        &self.builder
    }

    pub fn extract(&self, raw: &str) -> ParsedFields {
        self.extractor.extract(raw)
    }

    pub fn extract_bytes(&self, raw: &[u8]) -> Result<ParsedFields, NormalizeError> {
        self.extractor.extract_bytes(raw)
    }

    pub fn build(
        &self,
        fields: &ParsedFields,
        submitter: &Submitter,
        source: SubmissionSource,
        date: NaiveDate,
    ) -> InductionRecord {
        self.builder.build(fields, submitter, source, date)
    }

    /// Extract and build in one step. A record without a train id is still
    /// returned; check [`InductionRecord::train_id`] before persisting.
    pub fn normalize(
        &self,
        raw: &str,
        submitter: &Submitter,
        source: SubmissionSource,
        date: NaiveDate,
    ) -> InductionRecord {
        self.build(&self.extract(raw), submitter, source, date)
    }
}
