//! Season-based nightly rates and minimum-stay rules.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{BookedDateSet, DateRange};
use crate::config::Config;

/// Pricing tier of a single night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeasonTier {
    OffSeason,
    Season,
    TopSeason,
    Holiday,
}

/// Static pricing calendar of the chata.
#[derive(Debug, Clone)]
pub struct PricingRules {
    pub off_season_rate: u32,
    pub season_rate: u32,
    pub top_season_rate: u32,
    pub default_min_nights: u32,
    pub top_season_min_nights: u32,
    pub holiday_min_nights: u32,
    /// `MM-DD` days priced as top season regardless of month
    pub holidays: Vec<String>,
    /// Months 1-12
    pub season_months: Vec<u32>,
    pub top_season_months: Vec<u32>,
    pub currency: String,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            off_season_rate: 120,
            season_rate: 150,
            top_season_rate: 190,
            default_min_nights: 2,
            top_season_min_nights: 3,
            holiday_min_nights: 4,
            holidays: [
                "12-24", "12-25", "12-26", "12-27", "12-28", "12-29", "12-30", "12-31", "01-01",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            season_months: vec![1, 2, 3, 6, 9, 12],
            top_season_months: vec![7, 8],
            currency: "EUR".to_string(),
        }
    }
}

/// One priced night of a quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NightPrice {
    pub date: NaiveDate,
    pub rate: u32,
    pub tier: SeasonTier,
}

/// Price breakdown of a stay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StayQuote {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub total: u32,
    pub min_nights: u32,
    pub currency: String,
    pub per_night: Vec<NightPrice>,
}

impl PricingRules {
    /// Defaults with the configured rate overrides applied.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            off_season_rate: config.rate_off_season.unwrap_or(defaults.off_season_rate),
            season_rate: config.rate_season.unwrap_or(defaults.season_rate),
            top_season_rate: config.rate_top_season.unwrap_or(defaults.top_season_rate),
            ..defaults
        }
    }

    /// Resolve the single tier of a date; holidays win over months.
    pub fn tier(&self, date: NaiveDate) -> SeasonTier {
        let month_day = date.format("%m-%d").to_string();
        if self.holidays.iter().any(|h| *h == month_day) {
            SeasonTier::Holiday
        } else if self.top_season_months.contains(&date.month()) {
            SeasonTier::TopSeason
        } else if self.season_months.contains(&date.month()) {
            SeasonTier::Season
        } else {
            SeasonTier::OffSeason
        }
    }

    /// Nightly rate for the night starting on `date`.
    pub fn rate(&self, date: NaiveDate) -> u32 {
        match self.tier(date) {
            SeasonTier::Holiday | SeasonTier::TopSeason => self.top_season_rate,
            SeasonTier::Season => self.season_rate,
            SeasonTier::OffSeason => self.off_season_rate,
        }
    }

    /// Minimum stay for a check-in on `date`.
    pub fn min_nights(&self, date: NaiveDate) -> u32 {
        match self.tier(date) {
            SeasonTier::Holiday => self.holiday_min_nights,
            SeasonTier::TopSeason => self.top_season_min_nights,
            SeasonTier::Season | SeasonTier::OffSeason => self.default_min_nights,
        }
    }

    /// Sum of nightly rates, checkout day excluded.
    pub fn stay_total(&self, range: &DateRange) -> u32 {
        range.nights_iter().map(|night| self.rate(night)).sum()
    }

    pub fn quote(&self, range: &DateRange) -> StayQuote {
        let per_night: Vec<NightPrice> = range
            .nights_iter()
            .map(|date| NightPrice {
                date,
                rate: self.rate(date),
                tier: self.tier(date),
            })
            .collect();

        StayQuote {
            check_in: range.check_in(),
            check_out: range.check_out(),
            nights: range.nights(),
            total: per_night.iter().map(|n| n.rate).sum(),
            min_nights: self.min_nights(range.check_in()),
            currency: self.currency.clone(),
            per_night,
        }
    }

    /// A range may be submitted when every night is free and the stay is long enough.
    pub fn is_submittable(&self, range: &DateRange, booked: &BookedDateSet) -> bool {
        !range.overlaps(booked) && range.nights() >= self.min_nights(range.check_in())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentBackend;
    use std::path::PathBuf;
    use std::time::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_holidays_use_top_rate_in_any_month() {
        let rules = PricingRules::default();
        for year in [2024, 2025, 2030] {
            for holiday in &rules.holidays {
                let date = NaiveDate::parse_from_str(&format!("{}-{}", year, holiday), "%Y-%m-%d")
                    .unwrap();
                assert_eq!(rules.rate(date), rules.top_season_rate, "{}", date);
                assert_eq!(rules.min_nights(date), rules.holiday_min_nights);
            }
        }
    }

    #[test]
    fn test_tier_priority() {
        let rules = PricingRules {
            holidays: vec!["07-15".to_string()],
            ..PricingRules::default()
        };

        assert_eq!(rules.tier(d(2025, 7, 15)), SeasonTier::Holiday);
        assert_eq!(rules.min_nights(d(2025, 7, 15)), rules.holiday_min_nights);
        assert_eq!(rules.tier(d(2025, 7, 16)), SeasonTier::TopSeason);
        assert_eq!(rules.tier(d(2025, 2, 10)), SeasonTier::Season);
        assert_eq!(rules.tier(d(2025, 4, 10)), SeasonTier::OffSeason);
    }

    #[test]
    fn test_rates_and_min_nights_per_tier() {
        let rules = PricingRules::default();

        assert_eq!(rules.rate(d(2025, 4, 10)), 120);
        assert_eq!(rules.rate(d(2025, 9, 10)), 150);
        assert_eq!(rules.rate(d(2025, 8, 10)), 190);
        assert_eq!(rules.min_nights(d(2025, 4, 10)), 2);
        assert_eq!(rules.min_nights(d(2025, 9, 10)), 2);
        assert_eq!(rules.min_nights(d(2025, 8, 10)), 3);
    }

    #[test]
    fn test_top_season_stay_total() {
        let rules = PricingRules::default();
        let range = DateRange::new(d(2025, 7, 10), d(2025, 7, 13)).unwrap();

        assert_eq!(rules.stay_total(&range), 3 * rules.top_season_rate);
    }

    #[test]
    fn test_mixed_tier_stay_total() {
        let rules = PricingRules::default();
        // Two off-season nights in May, one season night in June.
        let range = DateRange::new(d(2025, 5, 30), d(2025, 6, 2)).unwrap();

        assert_eq!(rules.stay_total(&range), 120 + 120 + 150);
        let quote = rules.quote(&range);
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total, 390);
        assert_eq!(quote.per_night[2].tier, SeasonTier::Season);
    }

    #[test]
    fn test_submittable_checks_min_nights_and_overlap() {
        let rules = PricingRules::default();
        let short = DateRange::new(d(2025, 7, 10), d(2025, 7, 12)).unwrap();
        let long = DateRange::new(d(2025, 7, 10), d(2025, 7, 13)).unwrap();
        let free = BookedDateSet::new();
        let booked: BookedDateSet = [d(2025, 7, 12)].into_iter().collect();

        assert!(!rules.is_submittable(&short, &free));
        assert!(rules.is_submittable(&long, &free));
        assert!(!rules.is_submittable(&long, &booked));
    }

    #[test]
    fn test_config_overrides_rates() {
        let config = Config {
            admin_password: None,
            session_ttl: Duration::from_secs(3600),
            ics_urls: Vec::new(),
            availability_ttl: Duration::from_secs(1200),
            fetch_timeout: Duration::from_secs(5),
            content_backend: ContentBackend::File,
            content_path: PathBuf::from("content.json"),
            db_path: PathBuf::from("content.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 1024,
            max_guests: 8,
            rate_off_season: None,
            rate_season: None,
            rate_top_season: Some(250),
            mail_relay_url: None,
            mail_relay_key: None,
            mail_from: "rezervace@chata.test".to_string(),
            owner_email: "majitel@chata.test".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_json: false,
        };

        let rules = PricingRules::from_config(&config);
        assert_eq!(rules.top_season_rate, 250);
        assert_eq!(rules.season_rate, 150);
    }
}
