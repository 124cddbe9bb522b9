use std::path::PathBuf;

use axum::response::Response;
use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;

use crate::licensing::domain::{ApplicationId, ApplicationRecord, ApplicationSnapshot};
use crate::licensing::form::ApplicationForm;
use crate::licensing::store::{RecordStore, StoreError};
use crate::licensing::{DogGender, SpayNeuterStatus};

/// Fixed reference day so date assertions are deterministic.
pub(super) fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

/// A real future date for flows that validate against the wall clock.
pub(super) fn future_date_string() -> String {
    (Local::now().date_naive() + Duration::days(30))
        .format("%Y-%m-%d")
        .to_string()
}

pub(super) fn valid_form() -> ApplicationForm {
    valid_form_with(SpayNeuterStatus::No)
}

pub(super) fn valid_form_with(spayed: SpayNeuterStatus) -> ApplicationForm {
    ApplicationForm {
        owner_first_name: "Jordan".to_string(),
        owner_last_name: "Whitfield".to_string(),
        owner_email: "jordan.whitfield@example.com".to_string(),
        owner_phone: "(515) 555-0142".to_string(),
        owner_address: "482 Lakeshore Drive".to_string(),
        owner_city: "Ames".to_string(),
        owner_zip_code: "50010".to_string(),
        dog_name: "Biscuit".to_string(),
        dog_breed: "Beagle".to_string(),
        dog_age: "3".to_string(),
        dog_gender: Some(DogGender::Male),
        dog_color: "Tricolor".to_string(),
        spayed_neutered: Some(spayed),
        rabies_certificate_selected: true,
        rabies_certificate_preview: Some("data:image/png;base64,aGVsbG8=".to_string()),
        rabies_expiration_date: future_date_string(),
    }
}

/// Form with only the first step filled in, for owner-only autosave cases.
pub(super) fn owner_only_form() -> ApplicationForm {
    ApplicationForm {
        owner_first_name: "Jordan".to_string(),
        owner_last_name: "Whitfield".to_string(),
        owner_email: "jordan.whitfield@example.com".to_string(),
        owner_phone: "(515) 555-0142".to_string(),
        owner_address: "482 Lakeshore Drive".to_string(),
        owner_city: "Ames".to_string(),
        owner_zip_code: "50010".to_string(),
        ..ApplicationForm::default()
    }
}

pub(super) fn full_snapshot() -> ApplicationSnapshot {
    valid_form().snapshot()
}

pub(super) fn assert_issued_id_format(id: &str) {
    let mut parts = id.splitn(3, '-');
    assert_eq!(parts.next(), Some("DL"), "prefix in {id}");

    let millis = parts.next().expect("timestamp part present");
    assert!(
        !millis.is_empty() && millis.bytes().all(|byte| byte.is_ascii_digit()),
        "timestamp part is numeric in {id}"
    );

    let suffix = parts.next().expect("suffix part present");
    assert_eq!(suffix.len(), 9, "suffix length in {id}");
    assert!(
        suffix
            .bytes()
            .all(|byte| byte.is_ascii_digit() || byte.is_ascii_uppercase()),
        "suffix alphabet in {id}"
    );
}

/// Store whose every operation fails, simulating a blocked persistence area.
pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn create(&self, _snapshot: ApplicationSnapshot) -> Result<ApplicationRecord, StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn upsert(&self, _record: ApplicationRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn get(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn list_ids(&self) -> Result<Vec<ApplicationId>, StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn temp_store_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "dog-license-{tag}-{}-{}.json",
        std::process::id(),
        crate::licensing::new_application_id().0
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
