//! Interactive check-in / check-out selection.
//!
//! Mirrors what the date picker does on each click so the same rules can be
//! checked server-side. Disabled dates (past or booked) never change state.

use chrono::NaiveDate;

use super::{BookedDateSet, DateRange};

/// What the picker knows when a date is clicked.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub today: NaiveDate,
    pub booked: &'a BookedDateSet,
}

impl SelectionContext<'_> {
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        date < self.today || self.booked.contains(&date)
    }
}

/// Selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    SelectingCheckout { check_in: NaiveDate },
    RangeComplete { range: DateRange },
}

impl Selection {
    /// Apply one click.
    pub fn click(self, date: NaiveDate, ctx: &SelectionContext<'_>) -> Selection {
        if ctx.is_disabled(date) {
            return self;
        }

        match self {
            Selection::SelectingCheckout { check_in } => match DateRange::new(check_in, date) {
                Some(range) if !range.overlaps(ctx.booked) => Selection::RangeComplete { range },
                // Earlier date or a booked night in between: start over from here.
                _ => Selection::SelectingCheckout { check_in: date },
            },
            Selection::Idle | Selection::RangeComplete { .. } => {
                Selection::SelectingCheckout { check_in: date }
            }
        }
    }

    /// Apply a sequence of clicks starting from `Idle`.
    pub fn replay<I>(clicks: I, ctx: &SelectionContext<'_>) -> Selection
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        clicks
            .into_iter()
            .fold(Selection::Idle, |state, date| state.click(date, ctx))
    }

    pub fn range(&self) -> Option<DateRange> {
        match self {
            Selection::RangeComplete { range } => Some(*range),
            _ => None,
        }
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        match self {
            Selection::Idle => None,
            Selection::SelectingCheckout { check_in } => Some(*check_in),
            Selection::RangeComplete { range } => Some(range.check_in()),
        }
    }
}
