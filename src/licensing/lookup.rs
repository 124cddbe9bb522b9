use std::sync::Arc;

use super::domain::{ApplicationId, ApplicationRecord};
use super::store::{RecordStore, StoreError};

/// Classification of a lookup attempt. `Invalid` (nothing usable entered) is
/// deliberately distinct from `NotFound` (a well-formed id with no match) so
/// the two can render different empty states.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(ApplicationRecord),
    NotFound,
    Invalid(String),
}

/// Read-only retrieval by identifier, independent of the authoring session.
pub struct LookupService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> LookupService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Trim the raw input and classify the result. Storage faults surface as
    /// errors; the three outcomes are all ordinary results.
    pub fn lookup(&self, raw_id: &str) -> Result<LookupOutcome, StoreError> {
        let trimmed = raw_id.trim();
        if trimmed.is_empty() {
            return Ok(LookupOutcome::Invalid(raw_id.to_string()));
        }

        let id = ApplicationId(trimmed.to_string());
        match self.store.get(&id)? {
            Some(record) => Ok(LookupOutcome::Found(record)),
            None => Ok(LookupOutcome::NotFound),
        }
    }
}
