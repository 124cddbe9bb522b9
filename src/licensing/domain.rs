use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for issued license applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact details collected on the first step of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DogGender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpayNeuterStatus {
    Yes,
    No,
}

/// Dog profile collected on the second step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogDetails {
    pub name: String,
    pub breed: String,
    pub age: u8,
    pub gender: DogGender,
    pub color: String,
    pub spayed_neutered: SpayNeuterStatus,
}

impl DogDetails {
    /// Fee owed for this dog, derived solely from spay/neuter status.
    pub fn fee(&self) -> u32 {
        license_fee(Some(self.spayed_neutered))
    }
}

/// Upload metadata captured on the third step. Only the presence flag and an
/// optional preview payload are recorded; file bytes never reach the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    pub certificate_present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_preview: Option<String>,
    pub expiration_date: NaiveDate,
}

/// Review status of a persisted application. The applicant side only ever
/// writes `Pending`; the remaining states belong to an external reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Section-wise snapshot of an application as entered so far. The dog and
/// vaccination sections appear once their steps have passed validation, so a
/// snapshot taken after the first step carries only the owner details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSnapshot {
    pub owner: OwnerDetails,
    pub dog: Option<DogDetails>,
    pub vaccination: Option<VaccinationRecord>,
}

/// Persisted application record, keyed by its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub owner: OwnerDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog: Option<DogDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccination: Option<VaccinationRecord>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub fee: u32,
}

impl ApplicationRecord {
    /// Display projection consumed by the tracking endpoint.
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            status: self.status.label(),
            owner_name: format!("{} {}", self.owner.first_name, self.owner.last_name),
            dog_name: self.dog.as_ref().map(|dog| dog.name.clone()),
            fee: self.fee,
            submitted_at: self.submitted_at,
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_name: Option<String>,
    pub fee: u32,
    pub submitted_at: DateTime<Utc>,
}

pub const NEUTERED_FEE: u32 = 15;
pub const STANDARD_FEE: u32 = 30;

/// License fee schedule. Total over any input: an absent status falls back to
/// the standard fee, matching the discount's opt-in nature.
pub fn license_fee(status: Option<SpayNeuterStatus>) -> u32 {
    match status {
        Some(SpayNeuterStatus::Yes) => NEUTERED_FEE,
        Some(SpayNeuterStatus::No) | None => STANDARD_FEE,
    }
}
