#![allow(unused)]
//! Record building integration harness.
//!
//! # What this covers
//!
//! - **End to end**: the full sample report becomes the expected induction
//!   record through extract and build.
//! - **Collection presence**: optional collections are empty, never padded
//!   with placeholders, and the always-present ones are always there.
//! - **Purity**: identical inputs build identical records.
//! - **Serialized shape**: camelCase keys, lower-case status, snake_case
//!   source, and no timestamp until a sink stamps one.
//!
//! # Running
//!
//! ```sh
//! cargo test --test record_harness
//! ```

mod common;
use common::*;

use induct_core::{
    build_induction_record, extract_fields, BrandingPriority, Normalizer, ParsedFields,
    RecordBuilder, SubmissionSource,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn sample_message_end_to_end() {
    let record = Normalizer::default().normalize(
        SAMPLE_MESSAGE,
        &depot_controller(),
        SubmissionSource::Whatsapp,
        submission_date(),
    );

    assert_eq!(record.train_id(), "KMRC-012");
    assert_keyed_by!(record, "KMRC-012");
    assert_collection_sizes!(record, [1, 1, 1, 1, 1, 1]);

    assert_eq!(record.mileage[0].previous_mileage_km, 288150);
    assert_eq!(record.mileage[0].delta_km, 500);
    assert_eq!(record.job_card_status[0].job_id, "JC-1045");
    assert_eq!(record.job_card_status[0].task, "Brake Inspection");
    assert_eq!(record.job_card_status[0].status, "Pending");
    assert_eq!(record.job_card_status[0].priority, BrandingPriority::High);
    assert!(record.cleaning_slots[0].slot_start.ends_with("T23:00"));
    assert!(record.cleaning_slots[0].slot_end.ends_with("T23:45"));
    assert_eq!(record.cleaning_slots[0].assigned_team, "Ground Staff A");
    assert_eq!(record.stabling_geometry[0].yard, "Muttom Depot");
    assert_eq!(record.branding_priorities[0].priority_level, 1);
    assert_eq!(record.branding_priorities[0].branding_type, "Election Awareness");
    assert_eq!(record.fitness_certificates[0].status, "Fit for Service");
}

#[rstest]
#[case::bare(ParsedFieldsBuilder::new("KMRC-1").build(), [0, 1, 1, 1, 0, 0])]
#[case::branded(
    ParsedFieldsBuilder::new("KMRC-1").branding("Gold", BrandingPriority::Low).build(),
    [1, 1, 1, 1, 0, 0]
)]
#[case::job_card(ParsedFieldsBuilder::new("KMRC-1").job_card("JC-2", "Bogie check").build(), [0, 1, 1, 1, 1, 0])]
#[case::mileage(ParsedFieldsBuilder::new("KMRC-1").mileage(10, 0).build(), [0, 1, 1, 1, 0, 1])]
fn optional_collections(#[case] fields: ParsedFields, #[case] sizes: [usize; 6]) {
    let record = build_induction_record(
        &fields,
        &depot_controller(),
        SubmissionSource::ManualEntry,
        submission_date(),
    );
    assert_collection_sizes!(record, sizes);
    assert_keyed_by!(record, "KMRC-1");
}

#[test]
fn building_is_pure() {
    let fields = extract_fields(SAMPLE_MESSAGE);
    let build = || {
        build_induction_record(&fields, &depot_controller(), SubmissionSource::Whatsapp, submission_date())
    };
    let a = serde_json::to_vec(&build()).unwrap();
    let b = serde_json::to_vec(&build()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn inconsistent_mileage_gives_negative_delta() {
    let fields = ParsedFieldsBuilder::new("KMRC-9").mileage(100, 400).build();
    let record = build_induction_record(&fields, &depot_controller(), SubmissionSource::BulkUpload, submission_date());
    assert_eq!(record.mileage[0].delta_km, -300);
}

#[test]
fn hyphenated_slot_and_custom_depot() {
    let fields = ParsedFieldsBuilder::new("KMRC-3")
        .depot("Aluva")
        .cleaning_slot("01:15-02:00")
        .build();
    let record = build_induction_record(&fields, &depot_controller(), SubmissionSource::Whatsapp, submission_date());
    assert_eq!(record.cleaning_slots[0].slot_start, "2025-12-25T01:15");
    assert_eq!(record.cleaning_slots[0].slot_end, "2025-12-25T02:00");
    assert_eq!(record.stabling_geometry[0].yard, "Aluva Depot");
}

#[test]
fn serialized_shape() {
    let fields = ParsedFieldsBuilder::new("KMRC-012")
        .mileage(288650, 288150)
        .branding("Election Awareness", BrandingPriority::High)
        .build();
    let record = RecordBuilder::default().build(
        &fields,
        &depot_controller(),
        SubmissionSource::ManualEntry,
        submission_date(),
    );
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["date"], "2025-12-25");
    assert_eq!(json["status"], "submitted");
    assert_eq!(json["source"], "manual_entry");
    assert_eq!(json["userEmail"], "control@example.org");
    assert!(json["timestamp"].is_null());
    assert!(json.get("origin").is_none());
    assert_eq!(json["mileage"][0]["deltaKm"], 500);
    assert_eq!(json["brandingPriorities"][0]["priorityLevel"], 1);
    assert_eq!(json["stablingGeometry"][0]["orientation"], "UP");
    assert_eq!(json["stablingGeometry"][0]["distanceFromBufferM"], 4.5);
    assert_eq!(json["jobCardStatus"], serde_json::json!([]));
}
