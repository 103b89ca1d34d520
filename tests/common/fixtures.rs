//! Static message and sheet corpora used across harnesses.

use chrono::NaiveDate;

/// The full report a depot supervisor sends after evening inspection.
pub const SAMPLE_MESSAGE: &str = "Train Set: KMRC-012
Depot: Muttom
Current Mileage: 288650 km
Fitness Status: Fit for Service
Job Card: JC-1045 – Brake Inspection – Pending
Branding: Election Awareness (Priority: High)
Cleaning Slot: 23:00–23:45
Reported By: Ground Staff A";

/// Reports that carry a train id on a keyed line, with the id they carry.
pub const CORPUS_KEYED: &[(&str, &str)] = &[
    ("Train Set: KMRC-001\nDepot: Aluva", "KMRC-001"),
    ("train id: KMRC-002", "KMRC-002"),
    ("TRAIN SET ID : KMRC-003\nMileage: 1200", "KMRC-003"),
    ("Depot: Muttom\nTrainset: KMRC-004", "KMRC-004"),
    ("Train_ID:KMRC-005", "KMRC-005"),
];

/// Reports whose train id only appears in running text.
pub const CORPUS_UNKEYED: &[(&str, &str)] = &[
    ("Random notes about KMRC-099 inspection", "KMRC-099"),
    ("Depot: Muttom\nkmrc_17 back from washing line", "kmrc_17"),
    ("Train KMRC-020 stabled on track 4", "KMRC-020"),
];

/// Chat noise a relay sees that is not an induction report.
pub const CORPUS_CHATTER: &[&str] = &[
    "good morning all",
    "who has the keys to the stores?",
    "👍",
    "",
];

/// A bulk sheet in the shape the depot spreadsheet exports.
pub const BULK_SHEET: &str = "\u{feff}Train_ID,Depot,Current_Mileage,Rolling_Stock_Certificate,Signalling_Certificate,Telecom_Certificate,Certificate_Expiry,Branding_Type,Branding_Priority,Cleaning_Slot_Start,Cleaning_Slot_End,Job_Card_Number,Job_Description,Track_No,Berth\r
KMRC-001,Muttom,45000,Valid,Valid,Valid,2026-03-31,Festival Wrap,1,22:30,23:15,JC-1,Wheel profiling,3,B2\r
KMRC-002,Aluva,\"51,200\",Valid,Expired,Valid,2026-03-31,None,,,,,,,\r
,Muttom,100,,,,,,,,,,,,\r
\"KMRC-004\",Muttom,0,,,,,Gold,Low,,,JC-7,\"Door sensor, car 2\",0,\r
";

pub fn submission_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 25).expect("valid fixture date")
}

/// An XML upload as the mobile app exports it. The second record has no
/// `train_id` and is dropped on read.
pub const BULK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<trains>
  <train>
    <train_id>KMRC-021</train_id>
    <current_mileage>61000</current_mileage>
    <branding_type>Metro Pride</branding_type>
    <cleaning_type>Deep Clean</cleaning_type>
    <depot>Aluva</depot>
    <status>Active</status>
  </train>
  <train>
    <current_mileage>12000</current_mileage>
    <depot>Muttom</depot>
  </train>
  <train>
    <train_id>KMRC-023</train_id>
    <branding_type>None</branding_type>
    <status>Maintenance</status>
  </train>
</trains>
"#;
