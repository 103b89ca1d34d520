//! Core types for induct-core.
//!
//! This module defines the data structures shared by every front-end: the
//! flat [`ParsedFields`] intermediate, the canonical [`InductionRecord`] with
//! its six sub-collections, and the small enums that appear on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FieldDefaults;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Scheduling priority of a branding (advertisement wrap) assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrandingPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl BrandingPriority {
    /// Numeric level used by the scheduler: High → 1, Medium → 2, Low → 3.
    pub fn level(self) -> u8 {
        match self {
            BrandingPriority::High => 1,
            BrandingPriority::Medium => 2,
            BrandingPriority::Low => 3,
        }
    }

    /// Parse a priority word, ignoring case. Returns `None` for anything else.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "high" => Some(BrandingPriority::High),
            "medium" => Some(BrandingPriority::Medium),
            "low" => Some(BrandingPriority::Low),
            _ => None,
        }
    }

    /// Inverse of [`level`](Self::level).
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(BrandingPriority::High),
            2 => Some(BrandingPriority::Medium),
            3 => Some(BrandingPriority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for BrandingPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrandingPriority::High => write!(f, "High"),
            BrandingPriority::Medium => write!(f, "Medium"),
            BrandingPriority::Low => write!(f, "Low"),
        }
    }
}

/// Direction a stabled trainset faces on its berth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DN")]
    Dn,
}

impl Orientation {
    /// Accepts `UP`/`DN` and the spelled-out `down`, in any case.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Orientation::Up),
            "dn" | "down" => Some(Orientation::Dn),
            _ => None,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Up => write!(f, "UP"),
            Orientation::Dn => write!(f, "DN"),
        }
    }
}

/// Which front-end produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSource {
    Whatsapp,
    ManualEntry,
    BulkUpload,
}

impl SubmissionSource {
    /// Human wording used inside record remarks.
    pub fn label(self) -> &'static str {
        match self {
            SubmissionSource::Whatsapp => "WhatsApp",
            SubmissionSource::ManualEntry => "manual entry",
            SubmissionSource::BulkUpload => "bulk upload",
        }
    }
}

impl std::fmt::Display for SubmissionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionSource::Whatsapp => write!(f, "whatsapp"),
            SubmissionSource::ManualEntry => write!(f, "manual_entry"),
            SubmissionSource::BulkUpload => write!(f, "bulk_upload"),
        }
    }
}

impl std::str::FromStr for SubmissionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Ok(SubmissionSource::Whatsapp),
            "manual_entry" | "manual" => Ok(SubmissionSource::ManualEntry),
            "bulk_upload" | "bulk" => Ok(SubmissionSource::BulkUpload),
            other => Err(format!(
                "unknown source: {other} (expected whatsapp, manual_entry or bulk_upload)"
            )),
        }
    }
}

/// Approval state of a persisted record. The core only ever emits
/// `Submitted`; the approval workflow lives elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Submitted,
    Approved,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Identity of the account a record is submitted under.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submitter {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Submitter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Flat intermediate produced by the text and tabular front-ends.
///
/// Every field has a default; only an empty `train_id` makes the record
/// unusable, and deciding what to do about that is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFields {
    pub train_id: String,
    pub depot: String,
    pub current_mileage_km: u64,
    /// Derived from `current_mileage_km` minus the configured offset unless a
    /// front-end supplies the real value.
    pub previous_mileage_km: u64,
    pub fitness_status: String,
    pub branding_type: String,
    pub branding_priority: BrandingPriority,
    /// Raw `HH:MM–HH:MM` text as typed.
    pub cleaning_slot: String,
    pub cleaning_type: String,
    pub job_card_number: String,
    pub job_description: String,
    pub job_status: String,
    pub reported_by: String,
    /// `None` means "the submission date".
    pub reported_time: Option<String>,
    pub track_no: u32,
    pub berth: String,
    pub orientation: Orientation,
    pub rolling_stock_validity: String,
    pub signalling_validity: String,
    pub telecom_validity: String,
}

impl ParsedFields {
    /// An empty field set carrying the given defaults.
    pub fn with_defaults(defaults: &FieldDefaults) -> Self {
        Self {
            train_id: String::new(),
            depot: String::new(),
            current_mileage_km: 0,
            previous_mileage_km: 0,
            fitness_status: defaults.fitness_status.clone(),
            branding_type: String::new(),
            branding_priority: defaults.branding_priority,
            cleaning_slot: String::new(),
            cleaning_type: defaults.cleaning_type.clone(),
            job_card_number: String::new(),
            job_description: String::new(),
            job_status: defaults.job_status.clone(),
            reported_by: defaults.reported_by.clone(),
            reported_time: None,
            track_no: defaults.track_no,
            berth: defaults.berth.clone(),
            orientation: defaults.orientation,
            rolling_stock_validity: String::new(),
            signalling_validity: String::new(),
            telecom_validity: String::new(),
        }
    }

    pub fn has_train_id(&self) -> bool {
        !self.train_id.is_empty()
    }

    /// `reported_time`, falling back to the submission date.
    pub fn reported_time_or(&self, date: NaiveDate) -> String {
        self.reported_time
            .clone()
            .unwrap_or_else(|| date.to_string())
    }
}

impl Default for ParsedFields {
    fn default() -> Self {
        Self::with_defaults(&FieldDefaults::default())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One entry of `brandingPriorities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingAssignment {
    pub train_id: String,
    pub priority_level: u8,
    pub branding_type: String,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub approved_by: String,
    pub remarks: String,
}

/// One entry of `cleaningSlots`. Slot bounds are `YYYY-MM-DDTHH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningSlot {
    pub train_id: String,
    pub cleaning_type: String,
    pub slot_start: String,
    pub slot_end: String,
    pub assigned_team: String,
    pub status: String,
}

/// One entry of `stablingGeometry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StablingPosition {
    pub train_id: String,
    pub yard: String,
    pub track_no: u32,
    pub berth: String,
    pub orientation: Orientation,
    pub distance_from_buffer_m: f64,
    pub remarks: String,
}

/// One entry of `fitnessCertificates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessCertificate {
    pub train_id: String,
    pub rolling_stock_validity: String,
    pub signalling_validity: String,
    pub telecom_validity: String,
    pub status: String,
}

/// One entry of `jobCardStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub train_id: String,
    pub job_id: String,
    pub task: String,
    pub status: String,
    pub assigned_team: String,
    pub due_date: NaiveDate,
    pub priority: BrandingPriority,
}

/// One entry of `mileage`. `delta_km` is signed and never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageEntry {
    pub train_id: String,
    pub previous_mileage_km: u64,
    pub current_mileage_km: u64,
    pub delta_km: i64,
    pub remarks: String,
}

/// Who sent a relayed message. Only present on the relay path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOrigin {
    pub from: String,
    pub name: String,
    pub is_group: bool,
    pub original_message: String,
}

/// Canonical induction document: six independently optional sub-collections
/// plus submission metadata. One per inbound message or bulk row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InductionRecord {
    pub date: NaiveDate,
    pub branding_priorities: Vec<BrandingAssignment>,
    pub cleaning_slots: Vec<CleaningSlot>,
    pub stabling_geometry: Vec<StablingPosition>,
    pub fitness_certificates: Vec<FitnessCertificate>,
    pub job_card_status: Vec<JobCard>,
    pub mileage: Vec<MileageEntry>,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    /// Server-assigned at write time; `None` until a sink persists the record.
    pub timestamp: Option<DateTime<Utc>>,
    pub status: RecordStatus,
    pub source: SubmissionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<MessageOrigin>,
    /// Name of the uploaded file, for bulk records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file: Option<String>,
}

impl InductionRecord {
    /// Train identifier the record is keyed by. Stabling geometry is always
    /// present, so this never needs a fallback.
    pub fn train_id(&self) -> &str {
        self.stabling_geometry
            .first()
            .map(|s| s.train_id.as_str())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
