//! Check-in / check-out ranges with the checkout-exclusive convention.

use chrono::NaiveDate;

use super::BookedDateSet;

/// A stay from `check_in` up to, but not including, `check_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DateRange {
    /// Returns `None` unless `check_in` is strictly before `check_out`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        (check_in < check_out).then_some(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of occupied nights.
    pub fn nights(&self) -> u32 {
        (self.check_out - self.check_in).num_days() as u32
    }

    /// Every occupied night, check-in inclusive, checkout exclusive.
    pub fn nights_iter(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < end)
    }

    /// Whether any occupied night is already booked.
    pub fn overlaps(&self, booked: &BookedDateSet) -> bool {
        booked
            .range(self.check_in..self.check_out)
            .next()
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_rejects_unordered_pairs() {
        assert!(DateRange::new(d(2025, 7, 10), d(2025, 7, 10)).is_none());
        assert!(DateRange::new(d(2025, 7, 10), d(2025, 7, 9)).is_none());
    }

    #[test]
    fn test_nights_exclude_checkout() {
        let range = DateRange::new(d(2025, 7, 10), d(2025, 7, 13)).unwrap();
        assert_eq!(range.nights(), 3);
        assert_eq!(
            range.nights_iter().collect::<Vec<_>>(),
            vec![d(2025, 7, 10), d(2025, 7, 11), d(2025, 7, 12)]
        );
    }

    #[test]
    fn test_nights_across_month_boundary() {
        let range = DateRange::new(d(2024, 2, 28), d(2024, 3, 2)).unwrap();
        assert_eq!(range.nights(), 3);
    }

    #[test]
    fn test_overlap_ignores_checkout_day() {
        let range = DateRange::new(d(2025, 7, 10), d(2025, 7, 13)).unwrap();
        let booked: BookedDateSet = [d(2025, 7, 13)].into_iter().collect();
        assert!(!range.overlaps(&booked));

        let booked: BookedDateSet = [d(2025, 7, 11)].into_iter().collect();
        assert!(range.overlaps(&booked));
    }
}
