//! Booking calendar rules: feed parsing, availability, pricing and date selection.

pub mod availability;
pub mod ics;
pub mod picker;
pub mod pricing;
pub mod range;
pub mod selection;

use std::collections::BTreeSet;

use chrono::NaiveDate;

pub use availability::{AvailabilityService, AvailabilitySnapshot, FeedFetcher, HttpFeedFetcher};
pub use pricing::{PricingRules, SeasonTier, StayQuote};
pub use range::DateRange;
pub use selection::{Selection, SelectionContext};

/// Deduplicated, ordered set of booked nights.
pub type BookedDateSet = BTreeSet<NaiveDate>;

/// Canonical `YYYY-MM-DD` form of a date.
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a canonical `YYYY-MM-DD` date.
pub fn parse_iso(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
