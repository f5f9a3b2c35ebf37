//! Availability, calendar and pricing endpoints.

use axum::extract::{Query, State};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::calendar::{
    parse_iso, picker, AvailabilitySnapshot, DateRange, Selection, SelectionContext, StayQuote,
};
use crate::errors::{AppError, ValidationErrors};
use crate::AppState;

/// GET /api/availability - Booked dates merged from all calendar feeds.
pub async fn get_availability(State(state): State<AppState>) -> ApiResult<AvailabilitySnapshot> {
    success(state.availability.snapshot().await?)
}

/// Calendar query parameters.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// First month as `YYYY-MM` (default: current month).
    #[serde(default)]
    pub from: Option<String>,
    /// Number of months (default: 2).
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    2
}

/// GET /api/calendar - Month grids for the date picker.
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarQuery>,
) -> ApiResult<Vec<picker::MonthView>> {
    let today = Utc::now().date_naive();
    let first = match params.from.as_deref() {
        None => today,
        Some(raw) => NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest("from must be in YYYY-MM format".to_string()))?,
    };
    if params.months == 0 {
        return Err(AppError::BadRequest("months must be at least 1".to_string()));
    }

    let snapshot = state.availability.snapshot().await?;
    success(picker::months(
        first,
        params.months,
        today,
        &snapshot.booked_dates,
        &state.pricing,
    ))
}

/// Quote query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub check_in: String,
    pub check_out: String,
}

/// Price of a stay and whether it can be selected and submitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: StayQuote,
    /// Reachable by clicking check-in then check-out in the picker
    pub selectable: bool,
    /// Passes the booking checks (free nights, minimum stay)
    pub submittable: bool,
}

/// GET /api/pricing/quote - Price a stay.
pub async fn get_quote(
    State(state): State<AppState>,
    Query(params): Query<QuoteQuery>,
) -> ApiResult<QuoteResponse> {
    let mut errors = ValidationErrors::new();
    let check_in = parse_iso(&params.check_in);
    let check_out = parse_iso(&params.check_out);
    if check_in.is_none() {
        errors.add("checkIn", "Date must be in YYYY-MM-DD format");
    }
    if check_out.is_none() {
        errors.add("checkOut", "Date must be in YYYY-MM-DD format");
    }
    let range = match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => DateRange::new(check_in, check_out),
        _ => None,
    };
    let Some(range) = range else {
        if errors.is_empty() {
            errors.add("checkOut", "Check-out must be after check-in");
        }
        return Err(errors.into());
    };

    let snapshot = state.availability.snapshot().await?;
    let ctx = SelectionContext {
        today: Utc::now().date_naive(),
        booked: &snapshot.booked_dates,
    };
    let selection = Selection::replay([range.check_in(), range.check_out()], &ctx);

    success(QuoteResponse {
        quote: state.pricing.quote(&range),
        selectable: selection.range() == Some(range),
        submittable: state.pricing.is_submittable(&range, &snapshot.booked_dates),
    })
}
