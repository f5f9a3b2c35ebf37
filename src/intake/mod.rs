//! Validation of booking and contact form submissions.
//!
//! All checks run; every failing field is reported together.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::calendar::{parse_iso, BookedDateSet, DateRange, PricingRules};
use crate::errors::ValidationErrors;
use crate::models::{BookingInquiry, BookingSubmission, ContactMessage, ContactSubmission, Language};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Longest accepted free-text note or message, in characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Rules a booking is checked against.
pub struct BookingContext<'a> {
    pub rules: &'a PricingRules,
    pub booked: &'a BookedDateSet,
    pub max_guests: u32,
    /// Earliest accepted check-in
    pub today: NaiveDate,
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_PATTERN.is_match(raw.trim())
}

/// Validate a booking submission into an inquiry with server-computed price.
pub fn validate_booking(
    raw: &BookingSubmission,
    ctx: &BookingContext<'_>,
) -> Result<BookingInquiry, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required(&mut errors, "name", raw.name.as_ref(), "Name is required");
    let phone = required(&mut errors, "phone", raw.phone.as_ref(), "Phone is required");
    let email = checked_email(&mut errors, raw.email.as_ref());
    check_consent(&mut errors, raw.gdpr_consent.as_ref());

    let guests = match raw.guests.as_ref() {
        None | Some(Value::Null) => Some(1),
        Some(value) => match as_count(value) {
            Some(n) if (1..=ctx.max_guests).contains(&n) => Some(n),
            _ => {
                errors.add(
                    "guests",
                    format!("Guests must be between 1 and {}", ctx.max_guests),
                );
                None
            }
        },
    };

    let note = text(&mut errors, "note", raw.note.as_ref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);
    if note
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_TEXT_CHARS)
    {
        errors.add(
            "note",
            format!("Note is limited to {} characters", MAX_TEXT_CHARS),
        );
    }

    let range = checked_range(&mut errors, raw, ctx);

    errors.into_result()?;

    // Every optional above is set once no error was recorded.
    match (name, phone, email, guests, range) {
        (Some(name), Some(phone), Some(email), Some(guests), Some(range)) => Ok(BookingInquiry {
            name,
            email,
            phone,
            guests,
            note,
            gdpr_consent: true,
            check_in: range.check_in(),
            check_out: range.check_out(),
            nights: range.nights(),
            estimated_price: ctx.rules.stay_total(&range),
            currency: ctx.rules.currency.clone(),
            language: submitted_language(raw.language.as_ref()),
        }),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("form", "Submission is incomplete");
            Err(errors)
        }
    }
}

/// Validate a contact form submission.
pub fn validate_contact(raw: &ContactSubmission) -> Result<ContactMessage, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required(&mut errors, "name", raw.name.as_ref(), "Name is required");
    let email = checked_email(&mut errors, raw.email.as_ref());
    let message = required(
        &mut errors,
        "message",
        raw.message.as_ref(),
        "Message is required",
    );
    if message
        .as_deref()
        .is_some_and(|m| m.chars().count() > MAX_TEXT_CHARS)
    {
        errors.add(
            "message",
            format!("Message is limited to {} characters", MAX_TEXT_CHARS),
        );
    }
    check_consent(&mut errors, raw.gdpr_consent.as_ref());

    errors.into_result()?;

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) => Ok(ContactMessage {
            name,
            email,
            message,
            gdpr_consent: true,
            language: submitted_language(raw.language.as_ref()),
        }),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("form", "Submission is incomplete");
            Err(errors)
        }
    }
}

/// String content of a form field. Other JSON types are a field error.
fn text<'v>(errors: &mut ValidationErrors, field: &str, value: Option<&'v Value>) -> Option<&'v str> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors.add(field, "Must be text");
            None
        }
    }
}

fn submitted_language(value: Option<&Value>) -> Language {
    Language::from_submitted(value.and_then(Value::as_str))
}

fn required(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
    message: &str,
) -> Option<String> {
    match text(errors, field, value).map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.add(field, message);
            None
        }
    }
}

fn checked_email(errors: &mut ValidationErrors, value: Option<&Value>) -> Option<String> {
    let email = required(errors, "email", value, "Email is required")?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        errors.add("email", "Email address is not valid");
        None
    }
}

/// Consent must be the JSON boolean `true`; strings such as `"true"` are rejected.
fn check_consent(errors: &mut ValidationErrors, value: Option<&Value>) {
    if value != Some(&Value::Bool(true)) {
        errors.add("gdprConsent", "Consent to personal data processing is required");
    }
}

fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn checked_range(
    errors: &mut ValidationErrors,
    raw: &BookingSubmission,
    ctx: &BookingContext<'_>,
) -> Option<DateRange> {
    let check_in = checked_date(errors, "checkIn", raw.check_in.as_ref());
    let check_out = checked_date(errors, "checkOut", raw.check_out.as_ref());
    let (check_in, check_out) = (check_in?, check_out?);

    let Some(range) = DateRange::new(check_in, check_out) else {
        errors.add("checkOut", "Check-out must be after check-in");
        return None;
    };

    if check_in < ctx.today {
        errors.add("checkIn", "Check-in cannot be in the past");
        return None;
    }
    if range.overlaps(ctx.booked) {
        errors.add("checkIn", "Selected dates are no longer available");
        return None;
    }
    if !ctx.rules.is_submittable(&range, ctx.booked) {
        errors.add(
            "checkOut",
            format!(
                "Minimum stay for this check-in is {} nights",
                ctx.rules.min_nights(check_in)
            ),
        );
        return None;
    }

    Some(range)
}

fn checked_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<NaiveDate> {
    match text(errors, field, value).map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            errors.add(field, "Date is required");
            None
        }
        Some(raw) => {
            let date = parse_iso(raw);
            if date.is_none() {
                errors.add(field, "Date must be in YYYY-MM-DD format");
            }
            date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(overrides: Value) -> BookingSubmission {
        let mut base = json!({
            "name": "Jana Nováková",
            "email": "jana@example.cz",
            "phone": "+420 777 123 456",
            "guests": 4,
            "note": "  Přijedeme pozdě  ",
            "gdprConsent": true,
            "checkIn": "2025-07-10",
            "checkOut": "2025-07-13",
            "nights": 99,
            "estimatedPrice": 1,
            "language": "en"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn validate(raw: &BookingSubmission, booked: &BookedDateSet) -> Result<BookingInquiry, ValidationErrors> {
        let rules = PricingRules::default();
        let ctx = BookingContext {
            rules: &rules,
            booked,
            max_guests: 8,
            today: parse_iso("2025-01-01").unwrap(),
        };
        validate_booking(raw, &ctx)
    }

    #[test]
    fn test_valid_booking_recomputes_price() {
        let inquiry = validate(&submission(json!({})), &BookedDateSet::new()).unwrap();

        assert_eq!(inquiry.nights, 3);
        assert_eq!(inquiry.estimated_price, 3 * PricingRules::default().top_season_rate);
        assert_eq!(inquiry.note.as_deref(), Some("Přijedeme pozdě"));
        assert_eq!(inquiry.language, Language::En);
        assert_eq!(inquiry.guests, 4);
    }

    #[test]
    fn test_consent_false_always_rejected() {
        for consent in [json!(false), json!("true"), json!(null), json!(1)] {
            let errors = validate(
                &submission(json!({ "gdprConsent": consent })),
                &BookedDateSet::new(),
            )
            .unwrap_err();
            assert!(errors.contains("gdprConsent"));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_malformed_email_rejected() {
        let errors = validate(
            &submission(json!({ "email": "not-an-email" })),
            &BookedDateSet::new(),
        )
        .unwrap_err();
        assert_eq!(errors.get("email"), Some("Email address is not valid"));
    }

    #[test]
    fn test_all_errors_collected() {
        let raw = BookingSubmission::default();
        let errors = validate(&raw, &BookedDateSet::new()).unwrap_err();

        for field in ["name", "phone", "email", "gdprConsent", "checkIn", "checkOut"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_minimum_nights_enforced() {
        let errors = validate(
            &submission(json!({ "checkOut": "2025-07-12" })),
            &BookedDateSet::new(),
        )
        .unwrap_err();
        assert_eq!(
            errors.get("checkOut"),
            Some("Minimum stay for this check-in is 3 nights")
        );
    }

    #[test]
    fn test_booked_night_rejected() {
        let booked: BookedDateSet = [parse_iso("2025-07-11").unwrap()].into_iter().collect();
        let errors = validate(&submission(json!({})), &booked).unwrap_err();
        assert!(errors.contains("checkIn"));
    }

    #[test]
    fn test_reversed_and_unparsable_dates() {
        let errors = validate(
            &submission(json!({ "checkIn": "2025-07-13", "checkOut": "2025-07-10" })),
            &BookedDateSet::new(),
        )
        .unwrap_err();
        assert_eq!(errors.get("checkOut"), Some("Check-out must be after check-in"));

        let errors = validate(
            &submission(json!({ "checkIn": "10.7.2025" })),
            &BookedDateSet::new(),
        )
        .unwrap_err();
        assert!(errors.contains("checkIn"));
    }

    #[test]
    fn test_past_check_in_rejected() {
        let errors = validate(
            &submission(json!({ "checkIn": "2001-04-10", "checkOut": "2001-04-13" })),
            &BookedDateSet::new(),
        )
        .unwrap_err();
        assert_eq!(errors.get("checkIn"), Some("Check-in cannot be in the past"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_non_text_fields_reported_with_others() {
        let errors = validate(
            &submission(json!({ "phone": 777123456, "checkIn": 20250710, "gdprConsent": false })),
            &BookedDateSet::new(),
        )
        .unwrap_err();
        assert_eq!(errors.get("phone"), Some("Must be text"));
        assert_eq!(errors.get("checkIn"), Some("Must be text"));
        assert!(errors.contains("gdprConsent"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_guest_bounds() {
        for guests in [json!(0), json!(9), json!("many")] {
            let errors = validate(
                &submission(json!({ "guests": guests })),
                &BookedDateSet::new(),
            )
            .unwrap_err();
            assert!(errors.contains("guests"));
        }

        let inquiry = validate(&submission(json!({ "guests": "2" })), &BookedDateSet::new()).unwrap();
        assert_eq!(inquiry.guests, 2);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.cz"));
        assert!(is_valid_email(" guest.name+tag@mail.example.de "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[test]
    fn test_contact_validation() {
        let ok: ContactSubmission = serde_json::from_value(json!({
            "name": "Petr",
            "email": "petr@example.cz",
            "message": "Máte volno v březnu?",
            "gdprConsent": true,
            "language": "pl"
        }))
        .unwrap();
        let message = validate_contact(&ok).unwrap();
        assert_eq!(message.language, Language::Pl);

        let bad: ContactSubmission = serde_json::from_value(json!({
            "name": "",
            "email": "not-an-email",
            "message": "   ",
            "gdprConsent": false
        }))
        .unwrap();
        let errors = validate_contact(&bad).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
