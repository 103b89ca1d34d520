//! Record builder — expands [`ParsedFields`] into an [`InductionRecord`].
//!
//! The expansion is a pure function of its inputs. The only non-deterministic
//! part of a persisted record, the server timestamp, is left as `None` for the
//! sink to fill in.
//!
//! | Sub-collection        | Present when                 |
//! |-----------------------|------------------------------|
//! | `brandingPriorities`  | branding type is non-empty   |
//! | `cleaningSlots`       | always                       |
//! | `stablingGeometry`    | always                       |
//! | `fitnessCertificates` | always                       |
//! | `jobCardStatus`       | job card number is non-empty |
//! | `mileage`             | current mileage is positive  |

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::RecordDefaults;
use crate::types::{
    BrandingAssignment, CleaningSlot, FitnessCertificate, InductionRecord, JobCard, MileageEntry,
    ParsedFields, RecordStatus, StablingPosition, Submitter, SubmissionSource,
};

static SLOT_WINDOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2}:[0-9]{2})[–-]([0-9]{2}:[0-9]{2})").expect("valid slot regex")
});

const SCHEDULED: &str = "Scheduled";

/// Pull `(start, end)` out of a `HH:MM–HH:MM` cleaning slot. Either an en
/// dash or a hyphen separates the two times.
pub fn cleaning_window(slot: &str) -> Option<(&str, &str)> {
    let caps = SLOT_WINDOW.captures(slot)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

fn signed_delta(current: u64, previous: u64) -> i64 {
    let delta = i128::from(current) - i128::from(previous);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Builds records with a fixed set of [`RecordDefaults`].
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    defaults: RecordDefaults,
}

impl RecordBuilder {
    pub fn new(defaults: RecordDefaults) -> Self {
        Self { defaults }
    }

    /// Override who branding assignments are recorded as approved by.
    pub fn approved_by(mut self, approver: impl Into<String>) -> Self {
        self.defaults.approved_by = approver.into();
        self
    }

    pub fn defaults(&self) -> &RecordDefaults {
        &self.defaults
    }

    pub fn build(
        &self,
        fields: &ParsedFields,
        submitter: &Submitter,
        source: SubmissionSource,
        date: NaiveDate,
    ) -> InductionRecord {
        let train_id = fields.train_id.as_str();
        let remarks = format!("Submitted via {}", source.label());

        let branding_priorities = if fields.branding_type.is_empty() {
            Vec::new()
        } else {
            vec![BrandingAssignment {
                train_id: train_id.to_string(),
                priority_level: fields.branding_priority.level(),
                branding_type: fields.branding_type.clone(),
                valid_from: date,
                valid_to: date,
                approved_by: self.defaults.approved_by.clone(),
                remarks: remarks.clone(),
            }]
        };

        let (slot_start, slot_end) = cleaning_window(&fields.cleaning_slot).unwrap_or((
            self.defaults.cleaning_slot_start.as_str(),
            self.defaults.cleaning_slot_end.as_str(),
        ));
        let cleaning_slots = vec![CleaningSlot {
            train_id: train_id.to_string(),
            cleaning_type: fields.cleaning_type.clone(),
            slot_start: format!("{date}T{slot_start}"),
            slot_end: format!("{date}T{slot_end}"),
            assigned_team: fields.reported_by.clone(),
            status: SCHEDULED.to_string(),
        }];

        let depot = if fields.depot.is_empty() {
            self.defaults.default_depot.as_str()
        } else {
            fields.depot.as_str()
        };
        let stabling_geometry = vec![StablingPosition {
            train_id: train_id.to_string(),
            yard: format!("{depot} Depot"),
            track_no: fields.track_no,
            berth: fields.berth.clone(),
            orientation: fields.orientation,
            distance_from_buffer_m: self.defaults.distance_from_buffer_m,
            remarks: remarks.clone(),
        }];

        let fitness_certificates = vec![FitnessCertificate {
            train_id: train_id.to_string(),
            rolling_stock_validity: fields.rolling_stock_validity.clone(),
            signalling_validity: fields.signalling_validity.clone(),
            telecom_validity: fields.telecom_validity.clone(),
            status: fields.fitness_status.clone(),
        }];

        // Job cards carry no priority of their own; the branding priority
        // stands in for it.
        let job_card_status = if fields.job_card_number.is_empty() {
            Vec::new()
        } else {
            vec![JobCard {
                train_id: train_id.to_string(),
                job_id: fields.job_card_number.clone(),
                task: fields.job_description.clone(),
                status: fields.job_status.clone(),
                assigned_team: fields.reported_by.clone(),
                due_date: date,
                priority: fields.branding_priority,
            }]
        };

        let mileage = if fields.current_mileage_km == 0 {
            Vec::new()
        } else {
            vec![MileageEntry {
                train_id: train_id.to_string(),
                previous_mileage_km: fields.previous_mileage_km,
                current_mileage_km: fields.current_mileage_km,
                delta_km: signed_delta(fields.current_mileage_km, fields.previous_mileage_km),
                remarks: format!(
                    "Reported via {} at {}",
                    source.label(),
                    fields.reported_time_or(date)
                ),
            }]
        };

        InductionRecord {
            date,
            branding_priorities,
            cleaning_slots,
            stabling_geometry,
            fitness_certificates,
            job_card_status,
            mileage,
            user_id: submitter.id.clone(),
            user_name: submitter.name.clone(),
            user_email: submitter.email.clone(),
            timestamp: None,
            status: RecordStatus::Submitted,
            source,
            origin: None,
            original_file: None,
        }
    }
}

/// Build with built-in defaults.
pub fn build_induction_record(
    fields: &ParsedFields,
    submitter: &Submitter,
    source: SubmissionSource,
    date: NaiveDate,
) -> InductionRecord {
    RecordBuilder::default().build(fields, submitter, source, date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
