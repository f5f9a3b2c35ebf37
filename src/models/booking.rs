//! Booking and contact inquiry models matching the website forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Language;

/// Raw booking form submission. Every field is loose JSON so that one bad
/// field produces a field error instead of a rejected body. Client-side
/// night counts and prices are ignored; the server recomputes both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub guests: Option<Value>,
    #[serde(default)]
    pub note: Option<Value>,
    #[serde(default)]
    pub gdpr_consent: Option<Value>,
    #[serde(default)]
    pub check_in: Option<Value>,
    #[serde(default)]
    pub check_out: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
}

/// A validated booking inquiry handed to the notifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub guests: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub gdpr_consent: bool,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub estimated_price: u32,
    pub currency: String,
    pub language: Language,
}

/// Returned to the guest after a successful booking inquiry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub estimated_price: u32,
    pub currency: String,
}

/// Raw contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub gdpr_consent: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
}

/// A validated contact message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub gdpr_consent: bool,
    pub language: Language,
}
