//! Configuration types for induct.
//!
//! [`Config::load`] reads `~/.config/induct/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] reads an
//! explicit file. [`Config::defaults`] returns the same defaults without
//! touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{BrandingPriority, Orientation};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[fields]
fitness_status             = "Requires Check"
branding_priority          = "Medium"
reported_by                = "Ground Staff"
cleaning_type              = "Daily Clean"
job_status                 = "Pending"
track_no                   = 1
berth                      = "A1"
orientation                = "UP"
previous_mileage_offset_km = 500

[record]
default_depot          = "Muttom"
cleaning_slot_start    = "23:00"
cleaning_slot_end      = "23:45"
distance_from_buffer_m = 4.5
approved_by            = "WhatsApp Submission"

[relay]
trigger_keywords  = ["train", "depot", "mileage", "kmrc"]
max_message_bytes = 16384
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/induct/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fields: FieldDefaults,
    #[serde(default)]
    pub record: RecordDefaults,
    #[serde(default)]
    pub relay: RelayConfig,
}

/// `[fields]` section: values the extractor falls back to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDefaults {
    #[serde(default = "default_fitness_status")]
    pub fitness_status: String,
    #[serde(default)]
    pub branding_priority: BrandingPriority,
    #[serde(default = "default_reported_by")]
    pub reported_by: String,
    #[serde(default = "default_cleaning_type")]
    pub cleaning_type: String,
    #[serde(default = "default_job_status")]
    pub job_status: String,
    #[serde(default = "default_track_no")]
    pub track_no: u32,
    #[serde(default = "default_berth")]
    pub berth: String,
    #[serde(default)]
    pub orientation: Orientation,
    /// No mileage history is looked up; the previous reading is assumed to
    /// be this many kilometres behind the current one.
    #[serde(default = "default_previous_mileage_offset_km")]
    pub previous_mileage_offset_km: u64,
}

fn default_fitness_status() -> String { "Requires Check".to_string() }
fn default_reported_by() -> String { "Ground Staff".to_string() }
fn default_cleaning_type() -> String { "Daily Clean".to_string() }
fn default_job_status() -> String { "Pending".to_string() }
fn default_track_no() -> u32 { 1 }
fn default_berth() -> String { "A1".to_string() }
fn default_previous_mileage_offset_km() -> u64 { 500 }

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            fitness_status: default_fitness_status(),
            branding_priority: BrandingPriority::default(),
            reported_by: default_reported_by(),
            cleaning_type: default_cleaning_type(),
            job_status: default_job_status(),
            track_no: default_track_no(),
            berth: default_berth(),
            orientation: Orientation::default(),
            previous_mileage_offset_km: default_previous_mileage_offset_km(),
        }
    }
}

/// `[record]` section: values the record builder falls back to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordDefaults {
    #[serde(default = "default_depot")]
    pub default_depot: String,
    #[serde(default = "default_cleaning_slot_start")]
    pub cleaning_slot_start: String,
    #[serde(default = "default_cleaning_slot_end")]
    pub cleaning_slot_end: String,
    #[serde(default = "default_distance_from_buffer_m")]
    pub distance_from_buffer_m: f64,
    #[serde(default = "default_approved_by")]
    pub approved_by: String,
}

fn default_depot() -> String { "Muttom".to_string() }
fn default_cleaning_slot_start() -> String { "23:00".to_string() }
fn default_cleaning_slot_end() -> String { "23:45".to_string() }
fn default_distance_from_buffer_m() -> f64 { 4.5 }
fn default_approved_by() -> String { "WhatsApp Submission".to_string() }

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            default_depot: default_depot(),
            cleaning_slot_start: default_cleaning_slot_start(),
            cleaning_slot_end: default_cleaning_slot_end(),
            distance_from_buffer_m: default_distance_from_buffer_m(),
            approved_by: default_approved_by(),
        }
    }
}

/// `[relay]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayConfig {
    /// A message is only treated as an induction report if its lower-cased
    /// body contains one of these.
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

fn default_trigger_keywords() -> Vec<String> {
    ["train", "depot", "mileage", "kmrc"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_max_message_bytes() -> usize { 16 * 1024 }

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            trigger_keywords: default_trigger_keywords(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/induct/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&path, false)
    }

    /// Load an explicit config file on top of the built-in defaults. The file
    /// must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("induct")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
