//! Reply texts sent back to the sender of a relayed message.
//!
//! Formatting uses the messaging app's `*bold*` markup.

/// Acknowledge a stored record. Always names the train id.
pub fn confirmation(train_id: &str, doc_id: &str, submitted_by: &str) -> String {
    format!(
        "*Train induction received*\n\n\
         Train ID: {train_id}\n\
         Document ID: {doc_id}\n\
         Submitted by: {submitted_by}\n\
         Status: Pending Approval\n\n\
         The record becomes visible to everyone once approved."
    )
}

/// No train id could be found in the message.
pub fn rejection() -> String {
    "*Could not process your message*\n\n\
     No train set ID found. Please include one, e.g. Train Set: KMRC-012"
        .to_string()
}

/// The message could not be read at all.
pub fn processing_failure(reason: &str) -> String {
    format!("*Could not process your message*\n\n{reason}")
}
