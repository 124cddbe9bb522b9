use super::common::*;
use crate::licensing::form::ApplicationForm;
use crate::licensing::steps::Step;
use crate::licensing::validation::{check_step, validate_submission};

#[test]
fn four_digit_zip_fails_step_one() {
    let mut form = valid_form();
    form.owner_zip_code = "1901".to_string();

    let report = check_step(&form, Step::Owner, fixed_today());
    assert_eq!(
        report.owner_zip_code,
        Some("ZIP code must be exactly 5 digits")
    );
    assert!(report
        .messages()
        .contains(&("ownerZipCode", "ZIP code must be exactly 5 digits")));
}

#[test]
fn owner_length_rules() {
    let mut form = valid_form();
    form.owner_first_name = "J".to_string();
    form.owner_last_name = "W".to_string();
    form.owner_address = "short st".to_string();
    form.owner_city = "A".to_string();

    let report = check_step(&form, Step::Owner, fixed_today());
    assert_eq!(
        report.owner_first_name,
        Some("First name must be at least 2 characters")
    );
    assert_eq!(
        report.owner_last_name,
        Some("Last name must be at least 2 characters")
    );
    assert_eq!(
        report.owner_address,
        Some("Address must be at least 10 characters")
    );
    assert_eq!(report.owner_city, Some("City must be at least 2 characters"));
}

#[test]
fn email_syntax_is_checked() {
    for bad in ["", "plain", "missing@tld", "two words@example.com", "@example.com"] {
        let mut form = valid_form();
        form.owner_email = bad.to_string();
        let report = check_step(&form, Step::Owner, fixed_today());
        assert_eq!(
            report.owner_email,
            Some("Please enter a valid email address"),
            "expected rejection for {bad:?}"
        );
    }

    let form = valid_form();
    let report = check_step(&form, Step::Owner, fixed_today());
    assert_eq!(report.owner_email, None);
}

#[test]
fn phone_accepts_separators_and_requires_ten_digits() {
    for good in ["(515) 555-0142", "515-555-0142", "515.555.0142", "5155550142"] {
        let mut form = valid_form();
        form.owner_phone = good.to_string();
        let report = check_step(&form, Step::Owner, fixed_today());
        assert_eq!(report.owner_phone, None, "expected acceptance for {good:?}");
    }

    for bad in ["555-0142", "515x555x0142", ""] {
        let mut form = valid_form();
        form.owner_phone = bad.to_string();
        let report = check_step(&form, Step::Owner, fixed_today());
        assert_eq!(
            report.owner_phone,
            Some("Please enter a valid phone number"),
            "expected rejection for {bad:?}"
        );
    }
}

#[test]
fn age_is_coerced_from_text() {
    let cases = [
        ("3", None),
        (" 25 ", None),
        ("0", None),
        ("abc", Some("Age must be a number")),
        ("", Some("Age must be a number")),
        ("-1", Some("Age must be at least 0")),
        ("26", Some("Age must be 25 or less")),
    ];

    for (raw, expected) in cases {
        let mut form = valid_form();
        form.dog_age = raw.to_string();
        let report = check_step(&form, Step::Dog, fixed_today());
        assert_eq!(report.dog_age, expected, "age input {raw:?}");
    }
}

#[test]
fn dog_selects_are_required() {
    let mut form = valid_form();
    form.dog_gender = None;
    form.spayed_neutered = None;
    form.dog_name = String::new();
    form.dog_color = "ok".to_string();

    let report = check_step(&form, Step::Dog, fixed_today());
    assert_eq!(report.dog_gender, Some("Please select a gender"));
    assert_eq!(report.spayed_neutered, Some("Please select an option"));
    assert_eq!(report.dog_name, Some("Dog name is required"));
    assert_eq!(report.dog_color, Some("Color must be at least 3 characters"));
}

#[test]
fn expiration_must_be_strictly_future() {
    let mut form = valid_form();

    form.rabies_expiration_date = "2025-06-15".to_string();
    let report = check_step(&form, Step::Vaccination, fixed_today());
    assert_eq!(
        report.rabies_expiration_date,
        Some("Expiration date must be in the future"),
        "today itself is not a valid expiration"
    );

    form.rabies_expiration_date = "2025-06-16".to_string();
    let report = check_step(&form, Step::Vaccination, fixed_today());
    assert_eq!(report.rabies_expiration_date, None);

    form.rabies_expiration_date = "not-a-date".to_string();
    let report = check_step(&form, Step::Vaccination, fixed_today());
    assert_eq!(
        report.rabies_expiration_date,
        Some("Expiration date must be in the future")
    );
}

#[test]
fn missing_certificate_is_reported() {
    let mut form = valid_form();
    form.rabies_certificate_selected = false;

    let report = check_step(&form, Step::Vaccination, fixed_today());
    assert_eq!(
        report.rabies_vaccination,
        Some("Rabies vaccination certificate is required")
    );
}

#[test]
fn steps_only_validate_their_own_fields() {
    // Everything is empty, yet checking step one must not surface dog or
    // vaccination errors.
    let form = ApplicationForm::default();

    let report = check_step(&form, Step::Owner, fixed_today());
    assert!(report.owner_first_name.is_some());
    assert_eq!(report.dog_name, None);
    assert_eq!(report.dog_age, None);
    assert_eq!(report.rabies_vaccination, None);
    assert_eq!(report.rabies_expiration_date, None);

    let report = check_step(&form, Step::Payment, fixed_today());
    assert!(report.is_clear(), "the payment step owns no fields");
}

#[test]
fn submission_validation_covers_every_step() {
    let form = ApplicationForm::default();
    let report = validate_submission(&form, fixed_today()).expect_err("empty form rejected");

    let fields: Vec<&str> = report.messages().iter().map(|(field, _)| *field).collect();
    assert!(fields.contains(&"ownerFirstName"));
    assert!(fields.contains(&"dogName"));
    assert!(fields.contains(&"rabiesVaccination"));
}

#[test]
fn successful_submission_coerces_sections() {
    let form = valid_form();
    let snapshot = validate_submission(&form, fixed_today()).expect("valid form passes");

    assert_eq!(snapshot.owner.first_name, "Jordan");
    let dog = snapshot.dog.expect("dog section present");
    assert_eq!(dog.age, 3);
    let vaccination = snapshot.vaccination.expect("vaccination section present");
    assert!(vaccination.certificate_present);
    assert!(vaccination.certificate_preview.is_some());
}
