//! Merged availability from external calendar feeds.
//!
//! Feeds are fetched concurrently and independently; whatever succeeds is
//! merged into one booked-date set that is cached for a fixed time-to-live.
//! When every feed fails, the last good set is served and marked stale.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future;
use serde::Serialize;
use tokio::sync::Mutex;

use super::{ics, BookedDateSet};
use crate::errors::AppError;

/// Source of raw calendar-interchange text.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, AppError>;
}

/// Fetches feeds over HTTP with a per-request timeout.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("chata-backend/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Booked dates as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    pub booked_dates: BookedDateSet,
    pub cached_at: DateTime<Utc>,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
}

#[derive(Debug, Clone)]
struct CachedAvailability {
    booked: BookedDateSet,
    populated_at: DateTime<Utc>,
}

impl CachedAvailability {
    fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.populated_at < ttl,
            Err(_) => true,
        }
    }

    fn snapshot(&self, from_cache: bool, stale: bool) -> AvailabilitySnapshot {
        AvailabilitySnapshot {
            booked_dates: self.booked.clone(),
            cached_at: self.populated_at,
            from_cache,
            stale: stale.then_some(true),
        }
    }
}

/// Aggregates the configured feeds behind a time-to-live cache.
pub struct AvailabilityService {
    fetcher: Arc<dyn FeedFetcher>,
    sources: Vec<String>,
    ttl: Duration,
    cache: Mutex<Option<CachedAvailability>>,
}

impl AvailabilityService {
    /// Placeholder and unsupported sources are dropped here, once.
    pub fn new(fetcher: Arc<dyn FeedFetcher>, sources: &[String], ttl: Duration) -> Self {
        let sources: Vec<String> = sources.iter().filter_map(|s| usable_source(s)).collect();
        if sources.is_empty() {
            tracing::warn!("No calendar feeds configured; every date will show as available");
        } else {
            tracing::info!("Availability aggregates {} calendar feed(s)", sources.len());
        }

        Self {
            fetcher,
            sources,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Current booked dates, from cache while fresh.
    pub async fn snapshot(&self) -> Result<AvailabilitySnapshot, AppError> {
        // Held across the refresh so concurrent misses trigger a single fetch.
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh(self.ttl, Utc::now()) {
                tracing::debug!("Serving availability from cache");
                return Ok(cached.snapshot(true, false));
            }
        }

        match self.fetch_all().await {
            Some(booked) => {
                let fresh = CachedAvailability {
                    booked,
                    populated_at: Utc::now(),
                };
                let snapshot = fresh.snapshot(false, false);
                *cache = Some(fresh);
                Ok(snapshot)
            }
            None => match cache.as_ref() {
                Some(cached) => {
                    tracing::warn!(
                        "All calendar feeds failed; serving stale availability from {}",
                        cached.populated_at
                    );
                    Ok(cached.snapshot(true, true))
                }
                None => Err(AppError::Upstream(
                    "Calendar feeds are unavailable".to_string(),
                )),
            },
        }
    }

    /// Booked dates for validation; an empty set when nothing can be fetched.
    pub async fn booked_or_empty(&self) -> BookedDateSet {
        match self.snapshot().await {
            Ok(snapshot) => snapshot.booked_dates,
            Err(e) => {
                tracing::warn!("Validating without availability: {}", e);
                BookedDateSet::new()
            }
        }
    }

    /// Union of every feed that answered; `None` when all of them failed.
    async fn fetch_all(&self) -> Option<BookedDateSet> {
        if self.sources.is_empty() {
            return Some(BookedDateSet::new());
        }

        let fetches = self.sources.iter().map(|url| async move {
            let result = self.fetcher.fetch(url).await;
            (url, result)
        });
        let results = future::join_all(fetches).await;

        let mut booked = BookedDateSet::new();
        let mut succeeded = 0usize;
        for (url, result) in results {
            match result {
                Ok(text) => {
                    succeeded += 1;
                    booked.extend(ics::parse_booked_dates(&text));
                }
                Err(e) => tracing::warn!("Calendar feed {} failed: {}", url, e),
            }
        }

        tracing::info!(
            "Fetched {}/{} calendar feed(s), {} booked night(s)",
            succeeded,
            self.sources.len(),
            booked.len()
        );

        (succeeded > 0).then_some(booked)
    }
}

/// Normalize a configured feed URL, or `None` for placeholders and unsupported schemes.
pub fn usable_source(raw: &str) -> Option<String> {
    let url = raw.trim();
    let upper = url.to_ascii_uppercase();
    if url.is_empty()
        || upper.contains("YOUR_")
        || upper.contains("PLACEHOLDER")
        || upper.contains("EXAMPLE.COM")
    {
        return None;
    }

    if let Some(rest) = url.strip_prefix("webcal://") {
        return Some(format!("https://{}", rest));
    }
    if url.starts_with("https://") || url.starts_with("http://") {
        return Some(url.to_string());
    }
    None
}
