//! Test builders — ergonomic constructors for `ParsedFields`, submitters and
//! relay messages.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use induct_core::{BrandingPriority, ParsedFields, Submitter};
use induct_feeds::{InMemorySessionStore, InboundMessage, RelaySession, SessionStore};

use super::fixtures::submission_date;

// ---------------------------------------------------------------------------
// ParsedFieldsBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`ParsedFields`] fixtures.
///
/// ```rust
/// let fields = ParsedFieldsBuilder::new("KMRC-012")
///     .mileage(288650, 288150)
///     .branding("Election Awareness", BrandingPriority::High)
///     .build();
/// ```
pub struct ParsedFieldsBuilder {
    fields: ParsedFields,
}

impl ParsedFieldsBuilder {
    pub fn new(train_id: &str) -> Self {
        Self {
            fields: ParsedFields {
                train_id: train_id.to_string(),
                ..ParsedFields::default()
            },
        }
    }

    pub fn depot(mut self, depot: &str) -> Self {
        self.fields.depot = depot.to_string();
        self
    }

    pub fn mileage(mut self, current: u64, previous: u64) -> Self {
        self.fields.current_mileage_km = current;
        self.fields.previous_mileage_km = previous;
        self
    }

    pub fn branding(mut self, branding_type: &str, priority: BrandingPriority) -> Self {
        self.fields.branding_type = branding_type.to_string();
        self.fields.branding_priority = priority;
        self
    }

    pub fn job_card(mut self, number: &str, description: &str) -> Self {
        self.fields.job_card_number = number.to_string();
        self.fields.job_description = description.to_string();
        self
    }

    pub fn cleaning_slot(mut self, slot: &str) -> Self {
        self.fields.cleaning_slot = slot.to_string();
        self
    }

    pub fn build(self) -> ParsedFields {
        self.fields
    }
}

// ---------------------------------------------------------------------------
// Identities and sessions
// ---------------------------------------------------------------------------

pub fn depot_controller() -> Submitter {
    Submitter::new("u-1", "Depot Controller", "control@example.org")
}

/// A session store with [`depot_controller`] linked and connected.
pub fn connected_sessions() -> InMemorySessionStore {
    let sessions = InMemorySessionStore::new();
    sessions.put(RelaySession::connected(depot_controller()));
    sessions
}

/// A direct chat message received on the fixture submission date.
pub fn chat(body: &str) -> InboundMessage {
    InboundMessage::text("919800000001", "Ravi", body, submission_date())
}
