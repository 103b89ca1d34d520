//! Tabular front-end — bulk upload sheets exported as CSV.
//!
//! The first non-blank line is the header. Header names are lower-cased and
//! matched against a fixed list of column aliases; anything else is ignored.
//! Each data row becomes one [`ParsedFields`], the same intermediate the text
//! front-end produces, so record building is shared.

use induct_core::extract::{parse_leading_int, parse_mileage};
use induct_core::{find_train_code, BrandingPriority, FieldDefaults, Orientation, ParsedFields};
use tracing::debug;

use crate::error::FeedError;

const TRAIN_ID: &[&str] = &["train_id", "trainid", "train_set"];
const DEPOT: &[&str] = &["depot", "yard"];
const CURRENT_MILEAGE: &[&str] = &["current_mileage", "current_mileage_km", "mileage"];
const PREVIOUS_MILEAGE: &[&str] = &[
    "previous_mileage",
    "previous_mileage_km",
    "last_maintenance_mileage",
    "last_mileage",
];
const FITNESS_STATUS: &[&str] = &["fitness_status"];
const ROLLING_STOCK: &[&str] = &["rolling_stock_certificate", "rolling_stock"];
const SIGNALLING: &[&str] = &["signalling_certificate", "signalling"];
const TELECOM: &[&str] = &["telecom_certificate", "telecom"];
const CERTIFICATE_EXPIRY: &[&str] = &["certificate_expiry", "expiry"];
const BRANDING_TYPE: &[&str] = &["branding_type", "branding"];
const BRANDING_PRIORITY: &[&str] = &["branding_priority", "priority_level", "branding_priority_level"];
const CLEANING_SLOT: &[&str] = &["cleaning_slot"];
const CLEANING_START: &[&str] = &["cleaning_slot_start"];
const CLEANING_END: &[&str] = &["cleaning_slot_end"];
const CLEANING_TYPE: &[&str] = &["cleaning_type", "cleaning"];
const REPORTED_BY: &[&str] = &["reported_by", "assigned_team", "team"];
const REPORTED_TIME: &[&str] = &["reported_time", "time"];
const JOB_NUMBER: &[&str] = &["job_card_number", "job_id"];
const JOB_DESCRIPTION: &[&str] = &["job_description", "task", "description"];
const JOB_STATUS: &[&str] = &["job_status", "work_order_status", "status"];
const TRACK: &[&str] = &["track_no", "track"];
const BERTH: &[&str] = &["berth"];
const ORIENTATION: &[&str] = &["orientation"];

const KNOWN_COLUMNS: &[&[&str]] = &[
    TRAIN_ID, DEPOT, CURRENT_MILEAGE, PREVIOUS_MILEAGE, FITNESS_STATUS, ROLLING_STOCK,
    SIGNALLING, TELECOM, CERTIFICATE_EXPIRY, BRANDING_TYPE, BRANDING_PRIORITY, CLEANING_SLOT,
    CLEANING_START, CLEANING_END, CLEANING_TYPE, REPORTED_BY, REPORTED_TIME, JOB_NUMBER,
    JOB_DESCRIPTION, JOB_STATUS, TRACK, BERTH, ORIENTATION,
];

const VALID: &str = "valid";
const FIT_FOR_SERVICE: &str = "Fit for Service";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One data row as `(lower-cased column name, cell)` pairs in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based index among data rows (or XML `<train>` blocks).
    pub number: usize,
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<(String, String)>) -> Self {
        Self { number, cells }
    }

    /// First non-empty cell among `aliases`, trying aliases in order. When a
    /// column repeats, its leftmost occurrence counts.
    pub fn get(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|alias| self.cells.iter().find(|(name, _)| name == alias))
            .map(|(_, value)| value.as_str())
            .find(|v| !v.is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }
}

/// Split one CSV line on commas outside double quotes. Quotes only toggle
/// quoting and are not kept; cells are trimmed.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Read a whole sheet into rows. Short rows are padded with empty cells and
/// surplus cells are dropped.
pub fn read_rows(text: &str) -> Result<Vec<Row>, FeedError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines.next().ok_or(FeedError::NoDataRows)?;
    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(FeedError::MissingHeader);
    }

    let rows: Vec<Row> = lines
        .enumerate()
        .map(|(i, line)| {
            let mut values = split_csv_line(line).into_iter();
            let cells = headers
                .iter()
                .filter_map(|h| {
                    let value = values.next().unwrap_or_default();
                    (!h.is_empty()).then(|| (h.clone(), value))
                })
                .collect();
            Row::new(i + 1, cells)
        })
        .collect();

    if rows.is_empty() {
        return Err(FeedError::NoDataRows);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Row → fields
// ---------------------------------------------------------------------------

fn is_valid(cell: Option<&str>) -> bool {
    cell.is_some_and(|v| v.eq_ignore_ascii_case(VALID))
}

fn parse_priority(cell: &str) -> Option<BrandingPriority> {
    BrandingPriority::from_word(cell).or_else(|| {
        parse_leading_int(cell)
            .and_then(|n| u8::try_from(n).ok())
            .and_then(BrandingPriority::from_level)
    })
}

/// Map one row onto [`ParsedFields`]. Missing columns keep their defaults.
pub fn row_to_fields(row: &Row, defaults: &FieldDefaults) -> ParsedFields {
    let mut fields = ParsedFields::with_defaults(defaults);

    for column in row.columns() {
        if !KNOWN_COLUMNS.iter().any(|aliases| aliases.contains(&column)) {
            debug!(row = row.number, column, "ignoring unknown bulk column");
        }
    }

    if let Some(v) = row.get(TRAIN_ID) {
        fields.train_id = v.to_string();
    } else {
        // Same last resort as free text: the first KMRC code in sheet order.
        let joined = row.values().collect::<Vec<_>>().join(" ");
        if let Some(code) = find_train_code(&joined) {
            debug!(row = row.number, train_id = code, "train id recovered from row");
            fields.train_id = code.to_string();
        }
    }
    if let Some(v) = row.get(DEPOT) {
        fields.depot = v.to_string();
    }
    if let Some(v) = row.get(CURRENT_MILEAGE) {
        fields.current_mileage_km = parse_mileage(v);
        fields.previous_mileage_km = fields
            .current_mileage_km
            .saturating_sub(defaults.previous_mileage_offset_km);
    }
    if let Some(v) = row.get(PREVIOUS_MILEAGE) {
        fields.previous_mileage_km = parse_mileage(v);
    }

    let certificates = [ROLLING_STOCK, SIGNALLING, TELECOM].map(|aliases| row.get(aliases));
    let expiry = row.get(CERTIFICATE_EXPIRY).unwrap_or_default();
    let [rolling_stock, signalling, telecom] = certificates.map(|cell| {
        if is_valid(cell) {
            expiry.to_string()
        } else {
            String::new()
        }
    });
    fields.rolling_stock_validity = rolling_stock;
    fields.signalling_validity = signalling;
    fields.telecom_validity = telecom;
    if let Some(v) = row.get(FITNESS_STATUS) {
        fields.fitness_status = v.to_string();
    } else if certificates.iter().all(|cell| is_valid(*cell)) {
        fields.fitness_status = FIT_FOR_SERVICE.to_string();
    }

    if let Some(v) = row.get(BRANDING_TYPE).filter(|v| !v.eq_ignore_ascii_case("none")) {
        fields.branding_type = v.to_string();
    }
    if let Some(priority) = row.get(BRANDING_PRIORITY).and_then(parse_priority) {
        fields.branding_priority = priority;
    }

    if let Some(v) = row.get(CLEANING_SLOT) {
        fields.cleaning_slot = v.to_string();
    } else if let (Some(start), Some(end)) = (row.get(CLEANING_START), row.get(CLEANING_END)) {
        fields.cleaning_slot = format!("{start}–{end}");
    }
    if let Some(v) = row.get(CLEANING_TYPE).filter(|v| !v.eq_ignore_ascii_case("none")) {
        fields.cleaning_type = v.to_string();
    }
    if let Some(v) = row.get(REPORTED_BY) {
        fields.reported_by = v.to_string();
    }
    if let Some(v) = row.get(REPORTED_TIME) {
        fields.reported_time = Some(v.to_string());
    }

    if let Some(v) = row.get(JOB_NUMBER) {
        fields.job_card_number = v.to_string();
    }
    if let Some(v) = row.get(JOB_DESCRIPTION) {
        fields.job_description = v.to_string();
    }
    if let Some(v) = row.get(JOB_STATUS) {
        fields.job_status = v.to_string();
    }

    if let Some(track) = row.get(TRACK).and_then(parse_leading_int).filter(|n| *n != 0) {
        fields.track_no = track;
    }
    if let Some(v) = row.get(BERTH) {
        fields.berth = v.to_string();
    }
    if let Some(orientation) = row.get(ORIENTATION).and_then(Orientation::from_word) {
        fields.orientation = orientation;
    }

    fields
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
