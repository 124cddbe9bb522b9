use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, license_fee};
use super::form::ApplicationForm;
use super::store::{RecordStore, StoreError};
use super::validation::{check_step, validate_submission, ValidationReport};

/// One page of the four-step application form. Each step owns a disjoint set
/// of record fields; the payment step owns none and only summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Owner,
    Dog,
    Vaccination,
    Payment,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Owner, Step::Dog, Step::Vaccination, Step::Payment];

    pub const fn number(self) -> u8 {
        match self {
            Step::Owner => 1,
            Step::Dog => 2,
            Step::Vaccination => 3,
            Step::Payment => 4,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Step::Owner => "Owner Information",
            Step::Dog => "Dog Information",
            Step::Vaccination => "Vaccination Records",
            Step::Payment => "Payment",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Step::Owner => "Your contact details",
            Step::Dog => "Details about your dog",
            Step::Vaccination => "Required documentation",
            Step::Payment => "Complete your application",
        }
    }

    /// Form fields owned by this step, named as the rendering layer knows
    /// them, so error display can be scoped to the active page.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Step::Owner => &[
                "ownerFirstName",
                "ownerLastName",
                "ownerEmail",
                "ownerPhone",
                "ownerAddress",
                "ownerCity",
                "ownerZipCode",
            ],
            Step::Dog => &[
                "dogName",
                "dogBreed",
                "dogAge",
                "dogGender",
                "dogColor",
                "spayedNeutered",
            ],
            Step::Vaccination => &["rabiesVaccination", "rabiesExpirationDate"],
            Step::Payment => &[],
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Step::Payment)
    }

    const fn forward(self) -> Step {
        match self {
            Step::Owner => Step::Dog,
            Step::Dog => Step::Vaccination,
            Step::Vaccination | Step::Payment => Step::Payment,
        }
    }

    const fn backward(self) -> Step {
        match self {
            Step::Owner | Step::Dog => Step::Owner,
            Step::Vaccination => Step::Dog,
            Step::Payment => Step::Vaccination,
        }
    }
}

/// Navigation input accepted by the pure transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Advance,
    Retreat,
}

/// Pure step transition. Advancing is gated on the active step's fields only;
/// retreating is always permitted and never validates, so an applicant can
/// revisit earlier pages without losing anything.
pub fn transition(
    step: Step,
    action: StepAction,
    form: &ApplicationForm,
    today: NaiveDate,
) -> Result<Step, ValidationReport> {
    match action {
        StepAction::Retreat => Ok(step.backward()),
        StepAction::Advance => {
            let report = check_step(form, step, today);
            if report.is_clear() {
                Ok(step.forward())
            } else {
                Err(report)
            }
        }
    }
}

/// Failure surfaced by a controller operation.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("application form has validation errors")]
    Validation(ValidationReport),
    #[error("submission is only available from the payment step")]
    NotAtPaymentStep,
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Identity assigned at the first successful persistence. Both pieces are
/// immutable afterwards; later autosaves and the final submit reuse them.
#[derive(Debug, Clone)]
struct IssuedApplication {
    id: ApplicationId,
    submitted_at: DateTime<Utc>,
}

/// Stateful driver for one applicant session. Wraps the pure transition
/// function and performs the autosave side effect against the injected store.
pub struct StepController<S> {
    store: Arc<S>,
    form: ApplicationForm,
    step: Step,
    issued: Option<IssuedApplication>,
}

impl<S: RecordStore> StepController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            form: ApplicationForm::default(),
            step: Step::Owner,
            issued: None,
        }
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    /// Mutable access for the rendering layer's input bindings.
    pub fn form_mut(&mut self) -> &mut ApplicationForm {
        &mut self.form
    }

    pub fn active_step_fields(&self) -> &'static [&'static str] {
        self.step.fields()
    }

    /// Identifier assigned to this session's application, if any persistence
    /// has happened yet.
    pub fn application_id(&self) -> Option<&ApplicationId> {
        self.issued.as_ref().map(|issued| &issued.id)
    }

    /// Validate the active step and move forward on success, autosaving the
    /// coerced sections entered so far. On validation failure the step is
    /// unchanged and the field report is returned.
    pub fn advance(&mut self) -> Result<Step, StepError> {
        let today = Local::now().date_naive();
        let next = transition(self.step, StepAction::Advance, &self.form, today).map_err(
            |report| {
                warn!(step = self.step.number(), "step validation failed");
                StepError::Validation(report)
            },
        )?;

        if next != self.step {
            self.step = next;
            self.persist_current()?;
        }
        Ok(self.step)
    }

    /// Move backward unconditionally, floored at the first step.
    pub fn retreat(&mut self) -> Step {
        self.step = self.step.backward();
        self.step
    }

    /// Final submission. Only reachable from the payment step, and defensive:
    /// the whole form is re-validated rather than trusting earlier gating.
    /// Idempotent with respect to the assigned id, so a re-entrant call (a
    /// double-clicked submit button) never creates a second record.
    pub fn submit(&mut self) -> Result<ApplicationRecord, StepError> {
        if !self.step.is_final() {
            return Err(StepError::NotAtPaymentStep);
        }

        let today = Local::now().date_naive();
        validate_submission(&self.form, today).map_err(StepError::Validation)?;
        let record = self.persist_current()?;
        Ok(record)
    }

    /// Create on the first save, upsert afterwards. Storage failures leave
    /// the in-memory form untouched so the applicant can retry without
    /// re-entering anything.
    fn persist_current(&mut self) -> Result<ApplicationRecord, StoreError> {
        let snapshot = self.form.snapshot();
        match &self.issued {
            Some(issued) => {
                let fee = license_fee(snapshot.dog.as_ref().map(|dog| dog.spayed_neutered));
                let record = ApplicationRecord {
                    id: issued.id.clone(),
                    owner: snapshot.owner,
                    dog: snapshot.dog,
                    vaccination: snapshot.vaccination,
                    status: ApplicationStatus::Pending,
                    submitted_at: issued.submitted_at,
                    fee,
                };
                self.store.upsert(record.clone())?;
                Ok(record)
            }
            None => {
                let record = self.store.create(snapshot)?;
                self.issued = Some(IssuedApplication {
                    id: record.id.clone(),
                    submitted_at: record.submitted_at,
                });
                Ok(record)
            }
        }
    }
}
