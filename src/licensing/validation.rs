use chrono::NaiveDate;
use serde::Serialize;

use super::domain::ApplicationSnapshot;
use super::form::ApplicationForm;
use super::steps::Step;

const MSG_FIRST_NAME: &str = "First name must be at least 2 characters";
const MSG_LAST_NAME: &str = "Last name must be at least 2 characters";
const MSG_EMAIL: &str = "Please enter a valid email address";
const MSG_PHONE: &str = "Please enter a valid phone number";
const MSG_ADDRESS: &str = "Address must be at least 10 characters";
const MSG_CITY: &str = "City must be at least 2 characters";
const MSG_ZIP: &str = "ZIP code must be exactly 5 digits";
const MSG_DOG_NAME: &str = "Dog name is required";
const MSG_BREED: &str = "Breed must be at least 2 characters";
const MSG_AGE_NUMERIC: &str = "Age must be a number";
const MSG_AGE_MIN: &str = "Age must be at least 0";
const MSG_AGE_MAX: &str = "Age must be 25 or less";
const MSG_GENDER: &str = "Please select a gender";
const MSG_COLOR: &str = "Color must be at least 3 characters";
const MSG_SPAYED: &str = "Please select an option";
const MSG_CERTIFICATE: &str = "Rabies vaccination certificate is required";
const MSG_EXPIRATION: &str = "Expiration date must be in the future";

const MAX_DOG_AGE: i64 = 25;
const MIN_PHONE_DIGITS: usize = 10;

/// Per-field validation messages. One fixed slot per form field; a slot is
/// `None` when the field passes. A step is valid when every field it owns is
/// clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_first_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_last_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_city: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_zip_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_breed: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_age: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_gender: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spayed_neutered: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rabies_vaccination: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rabies_expiration_date: Option<&'static str>,
}

impl ValidationReport {
    pub fn is_clear(&self) -> bool {
        self.messages().is_empty()
    }

    /// Field-name-to-message listing for the rendering layer, in form order.
    pub fn messages(&self) -> Vec<(&'static str, &'static str)> {
        let entries = [
            ("ownerFirstName", self.owner_first_name),
            ("ownerLastName", self.owner_last_name),
            ("ownerEmail", self.owner_email),
            ("ownerPhone", self.owner_phone),
            ("ownerAddress", self.owner_address),
            ("ownerCity", self.owner_city),
            ("ownerZipCode", self.owner_zip_code),
            ("dogName", self.dog_name),
            ("dogBreed", self.dog_breed),
            ("dogAge", self.dog_age),
            ("dogGender", self.dog_gender),
            ("dogColor", self.dog_color),
            ("spayedNeutered", self.spayed_neutered),
            ("rabiesVaccination", self.rabies_vaccination),
            ("rabiesExpirationDate", self.rabies_expiration_date),
        ];

        entries
            .into_iter()
            .filter_map(|(field, message)| message.map(|message| (field, message)))
            .collect()
    }
}

/// Validate exactly the fields owned by `step`. Fields from other steps are
/// never inspected, so an applicant is not blocked by future-step errors.
pub fn check_step(form: &ApplicationForm, step: Step, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::default();
    match step {
        Step::Owner => check_owner(form, &mut report),
        Step::Dog => check_dog(form, &mut report),
        Step::Vaccination => check_vaccination(form, today, &mut report),
        Step::Payment => {}
    }
    report
}

/// Full-form validation used at submission time. On success the coerced
/// snapshot is returned with every section present.
pub fn validate_submission(
    form: &ApplicationForm,
    today: NaiveDate,
) -> Result<ApplicationSnapshot, ValidationReport> {
    let mut report = ValidationReport::default();
    check_owner(form, &mut report);
    check_dog(form, &mut report);
    check_vaccination(form, today, &mut report);

    if !report.is_clear() {
        return Err(report);
    }

    let snapshot = form.snapshot();
    if snapshot.dog.is_some() && snapshot.vaccination.is_some() {
        Ok(snapshot)
    } else {
        Err(report)
    }
}

fn check_owner(form: &ApplicationForm, report: &mut ValidationReport) {
    if !min_len(&form.owner_first_name, 2) {
        report.owner_first_name = Some(MSG_FIRST_NAME);
    }
    if !min_len(&form.owner_last_name, 2) {
        report.owner_last_name = Some(MSG_LAST_NAME);
    }
    if !is_valid_email(&form.owner_email) {
        report.owner_email = Some(MSG_EMAIL);
    }
    if !is_valid_phone(&form.owner_phone) {
        report.owner_phone = Some(MSG_PHONE);
    }
    if !min_len(&form.owner_address, 10) {
        report.owner_address = Some(MSG_ADDRESS);
    }
    if !min_len(&form.owner_city, 2) {
        report.owner_city = Some(MSG_CITY);
    }
    if !is_valid_zip(&form.owner_zip_code) {
        report.owner_zip_code = Some(MSG_ZIP);
    }
}

fn check_dog(form: &ApplicationForm, report: &mut ValidationReport) {
    if form.dog_name.is_empty() {
        report.dog_name = Some(MSG_DOG_NAME);
    }
    if !min_len(&form.dog_breed, 2) {
        report.dog_breed = Some(MSG_BREED);
    }
    if let Err(message) = parse_age(&form.dog_age) {
        report.dog_age = Some(message);
    }
    if form.dog_gender.is_none() {
        report.dog_gender = Some(MSG_GENDER);
    }
    if !min_len(&form.dog_color, 3) {
        report.dog_color = Some(MSG_COLOR);
    }
    if form.spayed_neutered.is_none() {
        report.spayed_neutered = Some(MSG_SPAYED);
    }
}

fn check_vaccination(form: &ApplicationForm, today: NaiveDate, report: &mut ValidationReport) {
    if !form.rabies_certificate_selected {
        report.rabies_vaccination = Some(MSG_CERTIFICATE);
    }
    // An unparseable date can never be in the future, so it earns the same
    // message as an expired one.
    match parse_expiration(&form.rabies_expiration_date) {
        Some(date) if date > today => {}
        _ => report.rabies_expiration_date = Some(MSG_EXPIRATION),
    }
}

fn min_len(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

fn is_valid_zip(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

/// Digits with optional `()-. ` separators, at least ten digits overall.
fn is_valid_phone(value: &str) -> bool {
    let mut digits = 0;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
        } else if !matches!(ch, '(' | ')' | '-' | '.' | ' ') {
            return false;
        }
    }
    digits >= MIN_PHONE_DIGITS
}

/// Coerce the raw age input, reporting the first violated bound.
pub(crate) fn parse_age(raw: &str) -> Result<u8, &'static str> {
    let value: i64 = raw.trim().parse().map_err(|_| MSG_AGE_NUMERIC)?;
    if value < 0 {
        Err(MSG_AGE_MIN)
    } else if value > MAX_DOG_AGE {
        Err(MSG_AGE_MAX)
    } else {
        Ok(value as u8)
    }
}

pub(crate) fn parse_expiration(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
