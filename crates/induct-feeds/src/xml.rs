//! XML front-end — bulk uploads exported as a flat list of `<train>` records.
//!
//! ```xml
//! <trains>
//!   <train>
//!     <train_id>KMRC-001</train_id>
//!     <current_mileage>45000</current_mileage>
//!     <depot>Muttom</depot>
//!   </train>
//! </trains>
//! ```
//!
//! Only leaf elements directly holding text are read; each becomes a cell
//! named after its tag, so the tabular column aliases apply unchanged. This
//! is a scanner for that one shape, not a general XML parser.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::tabular::Row;

static TRAIN_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<train>(.*?)</train>").expect("valid train block regex"));

// The regex crate has no backreferences; open and close tags are compared
// after matching.
static LEAF_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<([A-Za-z_][A-Za-z0-9_]*)>([^<]*)</([A-Za-z_][A-Za-z0-9_]*)>")
        .expect("valid leaf element regex")
});

const TRAIN_ID: &str = "train_id";

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn block_cells(block: &str) -> Vec<(String, String)> {
    LEAF_ELEMENT
        .captures_iter(block)
        .filter_map(|caps| {
            let open = caps.get(1)?.as_str().to_lowercase();
            let close = caps.get(3)?.as_str().to_lowercase();
            if open != close {
                debug!(open, close, "skipping mismatched XML element");
                return None;
            }
            let value = unescape(caps.get(2)?.as_str().trim());
            Some((open, value))
        })
        .collect()
}

/// Read every `<train>` block into a [`Row`] numbered by its position among
/// all blocks. Blocks without a non-empty `<train_id>` are dropped.
pub fn read_trains(text: &str) -> Result<Vec<Row>, FeedError> {
    let mut rows = Vec::new();

    for (i, caps) in TRAIN_BLOCK.captures_iter(text).enumerate() {
        let number = i + 1;
        let Some(block) = caps.get(1) else {
            continue;
        };
        let row = Row::new(number, block_cells(block.as_str()));
        if row.get(&[TRAIN_ID]).is_none() {
            warn!(block = number, "dropping XML train record without train_id");
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(FeedError::NoTrainRecords);
    }
    Ok(rows)
}
