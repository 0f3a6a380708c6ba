// aggregator.rs
use chrono::Utc;
use std::thread;

use crate::domain::updates::keywords_for;
use crate::domain::{OfficialUpdate, Outcome};
use crate::scraper::{mock_updates_for, parse_articles, NewsSource, PageFetcher, ScraperError};

/// Official news from every configured agency, merged newest first.
pub struct OfficialUpdates {
    fetcher: Box<dyn PageFetcher>,
    sources: Vec<NewsSource>,
}

impl OfficialUpdates {
    pub fn new(fetcher: Box<dyn PageFetcher>, sources: Vec<NewsSource>) -> Self {
        Self { fetcher, sources }
    }

    fn scrape_source(&self, source: &NewsSource, limit: usize) -> Result<Vec<OfficialUpdate>, ScraperError> {
        let html = self.fetcher.fetch_html(source.news_url)?;
        parse_articles(&html, source, limit, Utc::now())
    }

    /// Scrapes every source in parallel. A failing source contributes
    /// nothing; if all of them come back empty the mock list stands in.
    pub fn fetch_all(&self, limit: usize) -> Outcome<Vec<OfficialUpdate>> {
        let per_source: Vec<Vec<OfficialUpdate>> = thread::scope(|s| {
            let handles: Vec<_> = self
                .sources
                .iter()
                .map(|source| (source.name, s.spawn(move || self.scrape_source(source, limit))))
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| match handle.join() {
                    Ok(Ok(items)) => {
                        tracing::debug!(source = name, count = items.len(), "scraped official updates");
                        items
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(source = name, error = %e, "scraping failed");
                        Vec::new()
                    }
                    Err(_) => {
                        tracing::error!(source = name, "scraper thread panicked");
                        Vec::new()
                    }
                })
                .collect()
        });

        let mut merged: Vec<OfficialUpdate> = per_source.into_iter().flatten().collect();
        if merged.is_empty() {
            tracing::info!("no live official updates, serving mock data");
            return Outcome::degraded(
                mock_updates_for(None, limit),
                "no official updates could be scraped",
            );
        }

        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        merged.truncate(limit.saturating_mul(self.sources.len()));
        Outcome::Success(merged)
    }

    /// Updates matching a disaster type's keyword table. An unknown type
    /// gets the unfiltered list; no match falls back to the mock list.
    pub fn fetch_by_type(&self, disaster_type: &str, limit: usize) -> Outcome<Vec<OfficialUpdate>> {
        let all = self.fetch_all(limit.saturating_mul(3));
        let keywords = keywords_for(disaster_type);

        if keywords.is_empty() {
            return all.map(|mut v| {
                v.truncate(limit);
                v
            });
        }

        let was_degraded = all.is_degraded();
        let filtered: Vec<OfficialUpdate> = all
            .into_value()
            .into_iter()
            .filter(|u| u.matches_any(keywords))
            .take(limit)
            .collect();

        if filtered.is_empty() {
            tracing::info!(disaster_type, "no official updates matched, serving mock data");
            return Outcome::degraded(
                mock_updates_for(Some(disaster_type), limit),
                format!("no official updates matched {disaster_type}"),
            );
        }

        if was_degraded {
            Outcome::degraded(filtered, "official sources unavailable")
        } else {
            Outcome::Success(filtered)
        }
    }
}
