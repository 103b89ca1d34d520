//! Text front-end — free-form messages as typed into a chat or a form.

use std::borrow::Cow;

use induct_core::{Normalizer, ParsedFields};

use crate::error::FeedError;

/// Strip a leading byte-order mark and turn `\r\n` / lone `\r` line endings
/// into `\n`, borrowing when there is nothing to change.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Extract fields from message text.
pub fn parse_message(normalizer: &Normalizer, text: &str) -> ParsedFields {
    normalizer.extract(&normalize_line_endings(text))
}

/// Extract fields from raw message bytes, rejecting oversized or non-UTF-8
/// input before any parsing happens.
pub fn parse_message_bytes(normalizer: &Normalizer, raw: &[u8]) -> Result<ParsedFields, FeedError> {
    let text = normalizer.extractor().decode(raw)?;
    Ok(parse_message(normalizer, text))
}

/// Whether a message looks like an induction report at all: its lower-cased
/// text contains at least one trigger keyword.
pub fn is_induction_message(text: &str, keywords: &[String]) -> bool {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| !kw.is_empty() && lowered.contains(&kw.to_lowercase()))
}
