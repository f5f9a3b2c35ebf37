//! Booking and contact form endpoints.

use axum::extract::State;
use chrono::Utc;

use super::{success, ApiJson, ApiResult};
use crate::intake::{validate_booking, validate_contact, BookingContext};
use crate::models::{BookingReceipt, BookingSubmission, ContactSubmission};
use crate::notify::{self, Mailboxes};
use crate::AppState;

fn mailboxes(state: &AppState) -> Mailboxes {
    Mailboxes {
        from: state.config.mail_from.clone(),
        owner: state.config.owner_email.clone(),
    }
}

/// POST /api/booking - Validate a booking inquiry and notify owner and guest.
pub async fn submit_booking(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<BookingSubmission>,
) -> ApiResult<BookingReceipt> {
    let booked = state.availability.booked_or_empty().await;
    let ctx = BookingContext {
        rules: &state.pricing,
        booked: &booked,
        max_guests: state.config.max_guests,
        today: Utc::now().date_naive(),
    };
    let inquiry = validate_booking(&submission, &ctx)?;

    let mailboxes = mailboxes(&state);
    notify::deliver(
        state.notifier.as_ref(),
        &notify::booking_owner_email(&inquiry, &mailboxes),
        &notify::booking_confirmation_email(&inquiry, &mailboxes),
    )
    .await?;

    tracing::info!(
        "Booking inquiry {} - {} ({} nights, {} {})",
        inquiry.check_in,
        inquiry.check_out,
        inquiry.nights,
        inquiry.estimated_price,
        inquiry.currency
    );

    success(BookingReceipt {
        check_in: inquiry.check_in,
        check_out: inquiry.check_out,
        nights: inquiry.nights,
        estimated_price: inquiry.estimated_price,
        currency: inquiry.currency,
    })
}

/// POST /api/contact - Validate a contact message and notify owner and sender.
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<ContactSubmission>,
) -> ApiResult<()> {
    let message = validate_contact(&submission)?;

    let mailboxes = mailboxes(&state);
    notify::deliver(
        state.notifier.as_ref(),
        &notify::contact_owner_email(&message, &mailboxes),
        &notify::contact_confirmation_email(&message, &mailboxes),
    )
    .await?;

    tracing::info!("Contact message received ({})", message.language.as_str());
    success(())
}
