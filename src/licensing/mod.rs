//! Dog license application intake: the multi-step form state machine, record
//! persistence, and identifier-based retrieval.
//!
//! The rendering layer is an external collaborator. It binds inputs to an
//! [`ApplicationForm`], drives a [`StepController`] with advance/retreat/
//! submit, and scopes error display using each step's field listing; nothing
//! in this module knows how a page is drawn.

pub mod domain;
pub mod form;
pub mod lookup;
pub mod router;
pub mod steps;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    license_fee, ApplicationId, ApplicationRecord, ApplicationSnapshot, ApplicationStatus,
    ApplicationStatusView, DogDetails, DogGender, OwnerDetails, SpayNeuterStatus,
    VaccinationRecord, NEUTERED_FEE, STANDARD_FEE,
};
pub use form::ApplicationForm;
pub use lookup::{LookupOutcome, LookupService};
pub use router::license_router;
pub use steps::{transition, Step, StepAction, StepController, StepError};
pub use store::{new_application_id, JsonFileStore, MemoryStore, RecordStore, StoreError};
pub use validation::{check_step, validate_submission, ValidationReport};
