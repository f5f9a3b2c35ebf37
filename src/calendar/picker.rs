//! Month grids for the front-end date picker.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use super::{BookedDateSet, PricingRules, SeasonTier, SelectionContext};

/// Most months a single request may render.
pub const MAX_MONTHS: u32 = 12;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub booked: bool,
    pub past: bool,
    pub disabled: bool,
    pub rate: u32,
    pub tier: SeasonTier,
    pub min_nights: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Weekday of the first day, Monday = 0
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// Render `count` consecutive months starting at the month of `first`.
pub fn months(
    first: NaiveDate,
    count: u32,
    today: NaiveDate,
    booked: &BookedDateSet,
    rules: &PricingRules,
) -> Vec<MonthView> {
    let ctx = SelectionContext { today, booked };
    let Some(start) = first.with_day(1) else {
        return Vec::new();
    };

    (0..count.min(MAX_MONTHS))
        .filter_map(|offset| start.checked_add_months(Months::new(offset)))
        .map(|month_start| month_view(month_start, &ctx, rules))
        .collect()
}

fn month_view(month_start: NaiveDate, ctx: &SelectionContext<'_>, rules: &PricingRules) -> MonthView {
    let days = month_start
        .iter_days()
        .take_while(|d| d.month() == month_start.month())
        .map(|date| DayCell {
            date,
            booked: ctx.booked.contains(&date),
            past: date < ctx.today,
            disabled: ctx.is_disabled(date),
            rate: rules.rate(date),
            tier: rules.tier(date),
            min_nights: rules.min_nights(date),
        })
        .collect();

    MonthView {
        year: month_start.year(),
        month: month_start.month(),
        leading_blanks: month_start.weekday().num_days_from_monday(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_two_months_across_year_end() {
        let rules = PricingRules::default();
        let booked: BookedDateSet = [d(2025, 12, 24)].into_iter().collect();
        let views = months(d(2025, 12, 15), 2, d(2025, 12, 10), &booked, &rules);

        assert_eq!(views.len(), 2);
        assert_eq!((views[0].year, views[0].month), (2025, 12));
        assert_eq!((views[1].year, views[1].month), (2026, 1));
        assert_eq!(views[0].days.len(), 31);
        // 2025-12-01 is a Monday
        assert_eq!(views[0].leading_blanks, 0);

        let christmas_eve = &views[0].days[23];
        assert!(christmas_eve.booked && christmas_eve.disabled);
        assert_eq!(christmas_eve.tier, SeasonTier::Holiday);

        let past = &views[0].days[0];
        assert!(past.past && past.disabled && !past.booked);
        assert!(!views[1].days[5].disabled);
    }

    #[test]
    fn test_leap_february_and_month_cap() {
        let rules = PricingRules::default();
        let booked = BookedDateSet::new();

        let views = months(d(2024, 2, 29), 1, d(2024, 1, 1), &booked, &rules);
        assert_eq!(views[0].days.len(), 29);
        // 2024-02-01 is a Thursday
        assert_eq!(views[0].leading_blanks, 3);

        assert_eq!(months(d(2024, 1, 1), 40, d(2024, 1, 1), &booked, &rules).len(), 12);
    }
}
