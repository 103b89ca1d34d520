//! Domain-specific assertion macros for induct harnesses.
//!
//! These wrap `pretty_assertions` and say which induction record invariant
//! failed.

/// Assert that every sub-record of an `InductionRecord` names `$train_id`.
///
/// ```rust
/// assert_keyed_by!(record, "KMRC-012");
/// ```
#[macro_export]
macro_rules! assert_keyed_by {
    ($record:expr, $train_id:expr) => {{
        let record: &induct_core::InductionRecord = &$record;
        let expected: &str = $train_id;
        let keys = record
            .branding_priorities
            .iter()
            .map(|r| ("brandingPriorities", r.train_id.as_str()))
            .chain(record.cleaning_slots.iter().map(|r| ("cleaningSlots", r.train_id.as_str())))
            .chain(record.stabling_geometry.iter().map(|r| ("stablingGeometry", r.train_id.as_str())))
            .chain(
                record
                    .fitness_certificates
                    .iter()
                    .map(|r| ("fitnessCertificates", r.train_id.as_str())),
            )
            .chain(record.job_card_status.iter().map(|r| ("jobCardStatus", r.train_id.as_str())))
            .chain(record.mileage.iter().map(|r| ("mileage", r.train_id.as_str())));
        for (collection, actual) in keys {
            if actual != expected {
                panic!(
                    "assert_keyed_by! failed:\n  {}[..].trainId\n  expected: {:?}\n  actual:   {:?}",
                    collection, expected, actual
                );
            }
        }
    }};
}

/// Assert the sizes of the six sub-collections, in document order.
///
/// ```rust
/// assert_collection_sizes!(record, [1, 1, 1, 1, 1, 1]);
/// ```
#[macro_export]
macro_rules! assert_collection_sizes {
    ($record:expr, $sizes:expr) => {{
        let record: &induct_core::InductionRecord = &$record;
        let actual = [
            record.branding_priorities.len(),
            record.cleaning_slots.len(),
            record.stabling_geometry.len(),
            record.fitness_certificates.len(),
            record.job_card_status.len(),
            record.mileage.len(),
        ];
        let expected: [usize; 6] = $sizes;
        pretty_assertions::assert_eq!(
            actual,
            expected,
            "collection sizes [branding, cleaning, stabling, fitness, jobCard, mileage]"
        );
    }};
}
