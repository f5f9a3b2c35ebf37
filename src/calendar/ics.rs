//! Extraction of booked nights from calendar-interchange (ICS) text.
//!
//! Only the `DTSTART`/`DTEND` pair of each `VEVENT` matters here; the rest of
//! the event is ignored. Malformed events are skipped, never fatal.

use std::sync::LazyLock;

use chrono::NaiveDate;
use icalendar::{
    parser::{read_calendar, unfold, Component},
    CalendarDateTime, DatePerhapsTime,
};
use regex::Regex;

// First 8-digit date on a DTSTART/DTEND line, with or without parameters or a time part.
static DTSTART_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^DTSTART(?:;[^:\n]*)?:(\d{8})").expect("Invalid regex")
});
static DTEND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^DTEND(?:;[^:\n]*)?:(\d{8})").expect("Invalid regex"));

/// Parse every night occupied by the events in `text`, in feed order.
pub fn parse_booked_dates(text: &str) -> Vec<NaiveDate> {
    let unfolded = unfold(text);

    let bounds = match read_calendar(&unfolded) {
        Ok(calendar) => {
            let mut events = Vec::new();
            collect_events(&calendar.components, &mut events);
            events.into_iter().map(event_bounds).collect::<Vec<_>>()
        }
        Err(e) => {
            tracing::debug!("Calendar parser rejected feed ({}), scanning event blocks", e);
            event_blocks(&unfolded).map(scanned_bounds).collect()
        }
    };

    let mut dates = Vec::new();
    for bound in bounds {
        let Some((start, end)) = bound else {
            tracing::debug!("Skipping calendar event without usable DTSTART/DTEND");
            continue;
        };
        dates.extend(start.iter_days().take_while(|d| *d < end));
    }

    dates
}

/// `VEVENT`s at any depth, in document order.
fn collect_events<'a, 'c>(components: &'c [Component<'a>], events: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            events.push(component);
        } else {
            collect_events(&component.components, events);
        }
    }
}

fn event_bounds(event: &Component<'_>) -> Option<(NaiveDate, NaiveDate)> {
    let start = DatePerhapsTime::try_from(event.find_prop("DTSTART")?).ok()?;
    let end = DatePerhapsTime::try_from(event.find_prop("DTEND")?).ok()?;
    Some((calendar_day(start), calendar_day(end)))
}

/// The calendar day a start or end falls on, as written in the feed.
fn calendar_day(value: DatePerhapsTime) -> NaiveDate {
    match value {
        DatePerhapsTime::Date(date) => date,
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt.date_naive(),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive.date(),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => {
            date_time.date()
        }
    }
}

/// Fallback for feeds the parser rejects: lines between `BEGIN:VEVENT` and `END:VEVENT`.
fn event_blocks(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut current: Option<Vec<&str>> = None;
    text.lines().filter_map(move |line| {
        let trimmed = line.trim_end_matches('\r');
        if trimmed.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(Vec::new());
            None
        } else if trimmed.eq_ignore_ascii_case("END:VEVENT") {
            current.take().map(|lines| lines.join("\n"))
        } else {
            if let Some(lines) = current.as_mut() {
                lines.push(trimmed);
            }
            None
        }
    })
}

fn scanned_bounds(block: String) -> Option<(NaiveDate, NaiveDate)> {
    let start = first_date(&DTSTART_PATTERN, &block)?;
    let end = first_date(&DTEND_PATTERN, &block)?;
    Some((start, end))
}

fn first_date(pattern: &Regex, block: &str) -> Option<NaiveDate> {
    let token = pattern.captures(block)?.get(1)?.as_str();
    NaiveDate::parse_from_str(token, "%Y%m%d").ok()
}
