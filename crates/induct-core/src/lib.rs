//! induct-core — trainset induction record normalization.
//!
//! Turns a human-typed maintenance report into the canonical induction
//! document that the depot systems persist.
//!
//! # Pipeline
//!
//! ```text
//! raw text ──► FieldExtractor ──► ParsedFields ──► RecordBuilder ──► InductionRecord
//!                  ▲                                                       │
//!   tabular row ───┘ (front-ends in induct-feeds)          persistence ◄───┘
//! ```
//!
//! Everything here is synchronous and free of I/O; a [`Normalizer`] can be
//! shared across threads and called concurrently.

pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalizer;
pub mod types;

pub use builder::{build_induction_record, cleaning_window, RecordBuilder};
pub use config::{Config, FieldDefaults, RecordDefaults, RelayConfig};
pub use error::NormalizeError;
pub use extract::{extract_fields, find_train_code, route_key, FieldExtractor, FieldKey};
pub use normalizer::Normalizer;
pub use types::{
    BrandingAssignment, BrandingPriority, CleaningSlot, FitnessCertificate, InductionRecord,
    JobCard, MessageOrigin, MileageEntry, Orientation, ParsedFields, RecordStatus,
    StablingPosition, Submitter, SubmissionSource,
};
