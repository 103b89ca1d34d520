//! Field extractor — parses a free-text induction report into [`ParsedFields`].
//!
//! Each non-blank line is split at its first colon into a lower-cased key and
//! a trimmed value; lines with no colon are skipped. The key is routed through
//! [`KEY_RULES`] top to bottom by substring containment, and the first rule
//! that matches owns the line. Matching is deliberately loose: `train set id`
//! and `Train ID` both land on the train identifier, and any key containing
//! `time` that no earlier rule claimed becomes the reported time. A keyword
//! repeated on a later line overwrites the earlier value.
//!
//! If no line yields a train identifier, the whole message is searched for a
//! `KMRC-nnn` style code as a last resort.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::FieldDefaults;
use crate::error::NormalizeError;
use crate::types::{BrandingPriority, ParsedFields};

static PRIORITY_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(Priority:\s*(\w+)\)").expect("valid priority regex"));

static PRIORITY_CLAUSE_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(Priority:.*?\)").expect("valid priority strip regex"));

static TRAIN_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:train\s*(?:set|id)?[:\s]+)?(KMRC[-_]?[0-9]+)").expect("valid train code regex")
});

/// Job card values are split on the en dash, not the ASCII hyphen, so
/// hyphenated job numbers like `JC-1045` survive.
const JOB_CARD_SEPARATOR: char = '–';

// ---------------------------------------------------------------------------
// Key routing
// ---------------------------------------------------------------------------

/// Which [`ParsedFields`] slot a message line feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    TrainId,
    Depot,
    Mileage,
    Fitness,
    JobCard,
    Branding,
    Cleaning,
    ReportedBy,
    ReportedTime,
    Track,
    Berth,
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKey::TrainId => "train_id",
            FieldKey::Depot => "depot",
            FieldKey::Mileage => "mileage",
            FieldKey::Fitness => "fitness",
            FieldKey::JobCard => "job_card",
            FieldKey::Branding => "branding",
            FieldKey::Cleaning => "cleaning",
            FieldKey::ReportedBy => "reported_by",
            FieldKey::ReportedTime => "reported_time",
            FieldKey::Track => "track",
            FieldKey::Berth => "berth",
        };
        f.write_str(name)
    }
}

/// A `(predicate, field)` pair. Predicates receive the lower-cased key.
pub struct KeyRule {
    pub field: FieldKey,
    pub matches: fn(&str) -> bool,
}

fn is_train_key(key: &str) -> bool {
    key.contains("train") && (key.contains("set") || key.contains("id"))
}
fn is_depot_key(key: &str) -> bool { key.contains("depot") }
fn is_mileage_key(key: &str) -> bool { key.contains("mileage") }
fn is_fitness_key(key: &str) -> bool { key.contains("fitness") }
fn is_job_card_key(key: &str) -> bool { key.contains("job") && key.contains("card") }
fn is_branding_key(key: &str) -> bool { key.contains("branding") }
fn is_cleaning_key(key: &str) -> bool { key.contains("cleaning") }
fn is_reported_by_key(key: &str) -> bool { key.contains("reported") && key.contains("by") }
fn is_time_key(key: &str) -> bool { key.contains("time") }
fn is_track_key(key: &str) -> bool { key.contains("track") }
fn is_berth_key(key: &str) -> bool { key.contains("berth") }

/// Evaluated in order; the first match wins.
pub const KEY_RULES: &[KeyRule] = &[
    KeyRule { field: FieldKey::TrainId, matches: is_train_key },
    KeyRule { field: FieldKey::Depot, matches: is_depot_key },
    KeyRule { field: FieldKey::Mileage, matches: is_mileage_key },
    KeyRule { field: FieldKey::Fitness, matches: is_fitness_key },
    KeyRule { field: FieldKey::JobCard, matches: is_job_card_key },
    KeyRule { field: FieldKey::Branding, matches: is_branding_key },
    KeyRule { field: FieldKey::Cleaning, matches: is_cleaning_key },
    KeyRule { field: FieldKey::ReportedBy, matches: is_reported_by_key },
    KeyRule { field: FieldKey::ReportedTime, matches: is_time_key },
    KeyRule { field: FieldKey::Track, matches: is_track_key },
    KeyRule { field: FieldKey::Berth, matches: is_berth_key },
];

/// Route a lower-cased key to the field it feeds, if any.
pub fn route_key(key: &str) -> Option<FieldKey> {
    KEY_RULES.iter().find(|rule| (rule.matches)(key)).map(|rule| rule.field)
}

/// Split a line at its first colon into `(lower-cased key, value)`, both
/// trimmed. Returns `None` when the line has no colon.
pub fn split_key_value(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_lowercase(), value.trim()))
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// Keep only ASCII digits and read them as kilometres. `"288,650 km"` reads
/// as 288650; a value with no digits, or too many to fit, reads as 0.
pub fn parse_mileage(value: &str) -> u64 {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or_else(|_| {
        warn!(value, "mileage out of range, treating as 0");
        0
    })
}

/// Read the leading run of digits, ignoring leading whitespace, an optional
/// `+` sign and anything after the digits: `"7B"` and `"+7"` read as 7.
/// Negative values are not positions and read as `None`, as does `"-3"`.
pub fn parse_leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Search free text for a `KMRC` train code, optionally introduced by
/// `train`, `train set` or `train id`. Returns the code as written.
pub fn find_train_code(text: &str) -> Option<&str> {
    TRAIN_CODE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Line-oriented extractor. Stateless apart from its defaults, so one
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    defaults: FieldDefaults,
    max_message_bytes: Option<usize>,
}

impl FieldExtractor {
    pub fn new(defaults: FieldDefaults) -> Self {
        Self {
            defaults,
            max_message_bytes: None,
        }
    }

    /// Reject byte messages larger than `limit` in [`decode`](Self::decode).
    pub fn with_max_message_bytes(mut self, limit: usize) -> Self {
        self.max_message_bytes = Some(limit);
        self
    }

    pub fn defaults(&self) -> &FieldDefaults {
        &self.defaults
    }

    /// Validate raw message bytes and borrow them as text.
    pub fn decode<'a>(&self, raw: &'a [u8]) -> Result<&'a str, NormalizeError> {
        if let Some(limit) = self.max_message_bytes {
            if raw.len() > limit {
                return Err(NormalizeError::MessageTooLarge {
                    len: raw.len(),
                    limit,
                });
            }
        }
        Ok(std::str::from_utf8(raw)?)
    }

    /// [`decode`](Self::decode) followed by [`extract`](Self::extract).
    pub fn extract_bytes(&self, raw: &[u8]) -> Result<ParsedFields, NormalizeError> {
        self.decode(raw).map(|text| self.extract(text))
    }

    /// Parse a message. Never fails: anything unrecognised is ignored and
    /// every missing field keeps its default.
    pub fn extract(&self, raw: &str) -> ParsedFields {
        let mut fields = ParsedFields::with_defaults(&self.defaults);

        for line in raw.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = split_key_value(line) else {
                continue;
            };
            if let Some(field) = route_key(&key) {
                debug!(%field, key = %key, "routed message line");
                self.apply(field, value, &mut fields);
            }
        }

        if fields.train_id.is_empty() {
            if let Some(code) = find_train_code(raw) {
                debug!(train_id = code, "train id recovered from message body");
                fields.train_id = code.to_string();
            }
        }

        fields
    }

    fn apply(&self, field: FieldKey, value: &str, fields: &mut ParsedFields) {
        match field {
            FieldKey::TrainId => fields.train_id = value.to_string(),
            FieldKey::Depot => fields.depot = value.to_string(),
            FieldKey::Mileage => {
                let current = parse_mileage(value);
                fields.current_mileage_km = current;
                fields.previous_mileage_km =
                    current.saturating_sub(self.defaults.previous_mileage_offset_km);
            }
            FieldKey::Fitness => fields.fitness_status = value.to_string(),
            FieldKey::JobCard => {
                let mut parts = value.split(JOB_CARD_SEPARATOR).map(str::trim);
                fields.job_card_number = parts.next().unwrap_or_default().to_string();
                fields.job_description = parts.next().unwrap_or_default().to_string();
                fields.job_status = parts
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(self.defaults.job_status.as_str())
                    .to_string();
            }
            FieldKey::Branding => {
                let word = PRIORITY_CLAUSE
                    .captures(value)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str());
                fields.branding_type = PRIORITY_CLAUSE_ANY.replace(value, "").trim().to_string();
                fields.branding_priority = match word {
                    Some(word) => BrandingPriority::from_word(word).unwrap_or_else(|| {
                        debug!(word, "unknown branding priority, using default");
                        self.defaults.branding_priority
                    }),
                    None => self.defaults.branding_priority,
                };
            }
            FieldKey::Cleaning => fields.cleaning_slot = value.to_string(),
            FieldKey::ReportedBy => fields.reported_by = value.to_string(),
            FieldKey::ReportedTime => fields.reported_time = Some(value.to_string()),
            FieldKey::Track => {
                fields.track_no = parse_leading_int(value)
                    .filter(|n| *n != 0)
                    .unwrap_or(self.defaults.track_no);
            }
            FieldKey::Berth => fields.berth = value.to_string(),
        }
    }
}

/// Extract with built-in defaults.
pub fn extract_fields(raw: &str) -> ParsedFields {
    FieldExtractor::default().extract(raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
