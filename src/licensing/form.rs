use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationSnapshot, DogDetails, DogGender, OwnerDetails, SpayNeuterStatus, VaccinationRecord,
};
use super::validation::{parse_age, parse_expiration};

/// Raw form state as the rendering layer supplies it. Text inputs stay
/// unparsed strings until validation coerces them; select inputs arrive as
/// typed options so an unanswered select is represented as `None` rather than
/// a sentinel string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub owner_address: String,
    pub owner_city: String,
    pub owner_zip_code: String,
    pub dog_name: String,
    pub dog_breed: String,
    pub dog_age: String,
    pub dog_gender: Option<DogGender>,
    pub dog_color: String,
    pub spayed_neutered: Option<SpayNeuterStatus>,
    pub rabies_certificate_selected: bool,
    pub rabies_certificate_preview: Option<String>,
    pub rabies_expiration_date: String,
}

impl ApplicationForm {
    pub fn owner_details(&self) -> OwnerDetails {
        OwnerDetails {
            first_name: self.owner_first_name.clone(),
            last_name: self.owner_last_name.clone(),
            email: self.owner_email.clone(),
            phone: self.owner_phone.clone(),
            address: self.owner_address.clone(),
            city: self.owner_city.clone(),
            zip_code: self.owner_zip_code.clone(),
        }
    }

    /// Typed dog section, available once every dog field coerces.
    pub fn dog_details(&self) -> Option<DogDetails> {
        let age = parse_age(&self.dog_age).ok()?;
        Some(DogDetails {
            name: self.dog_name.clone(),
            breed: self.dog_breed.clone(),
            age,
            gender: self.dog_gender?,
            color: self.dog_color.clone(),
            spayed_neutered: self.spayed_neutered?,
        })
    }

    /// Typed vaccination section, available once a certificate is selected
    /// and the expiration date parses.
    pub fn vaccination_record(&self) -> Option<VaccinationRecord> {
        if !self.rabies_certificate_selected {
            return None;
        }
        Some(VaccinationRecord {
            certificate_present: true,
            certificate_preview: self.rabies_certificate_preview.clone(),
            expiration_date: parse_expiration(&self.rabies_expiration_date)?,
        })
    }

    /// Section-wise snapshot of everything entered so far that coerces into
    /// the typed model. Drives step-wise autosave.
    pub fn snapshot(&self) -> ApplicationSnapshot {
        ApplicationSnapshot {
            owner: self.owner_details(),
            dog: self.dog_details(),
            vaccination: self.vaccination_record(),
        }
    }
}
