// scraper.rs
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use crate::domain::OfficialUpdate;
use crate::scraper::{NewsSource, ScraperError};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Fetches a page's HTML. One call, no retries.
pub trait PageFetcher: Send + Sync {
    fn fetch_html(&self, url: &str) -> Result<String, ScraperError>;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Blocked(status.as_u16()));
        }

        resp.text().map_err(|e| ScraperError::Network(e.to_string()))
    }
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector(format!("{css}: {e}")))
}

fn text_of(el: &ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel)
        .next()
        .map(|e| e.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Best effort parse of the human dates agencies print.
pub fn parse_published_date(raw: &str) -> Option<DateTime<Utc>> {
    const FORMATS: [&str; 4] = ["%B %d, %Y", "%b %d, %Y", "%b. %d, %Y", "%Y-%m-%d"];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Pull up to `limit` articles out of a listing page. Articles without a
/// title are skipped.
pub fn parse_articles(
    html: &str,
    source: &NewsSource,
    limit: usize,
    scraped_at: DateTime<Utc>,
) -> Result<Vec<OfficialUpdate>, ScraperError> {
    let document = Html::parse_document(html);
    let articles = selector(source.selectors.articles)?;
    let title_sel = selector(source.selectors.title)?;
    let date_sel = selector(source.selectors.date)?;
    let summary_sel = selector(source.selectors.summary)?;
    let link_sel = selector(source.selectors.link)?;
    let base = Url::parse(source.base_url).ok();

    let mut out = Vec::new();
    for article in document.select(&articles).take(limit) {
        let title = text_of(&article, &title_sel);
        if title.is_empty() {
            continue;
        }

        let date = text_of(&article, &date_sel);
        let summary = text_of(&article, &summary_sel);
        let href = article
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or("");
        let link = match &base {
            Some(b) => b
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", source.base_url, href)),
            None => format!("{}{}", source.base_url, href),
        };

        out.push(OfficialUpdate {
            source: source.name.to_string(),
            timestamp: parse_published_date(&date).unwrap_or(scraped_at),
            title,
            date,
            summary,
            link,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::official_sources;

    const FEMA_PAGE: &str = r#"
        <html><body>
          <div class="news-release-item">
            <h3 class="news-release-title"><a href="/press-release/20240621/aid">FEMA Approves   Aid</a></h3>
            <span class="news-release-date">June 21, 2024</span>
            <p class="news-release-summary">Assistance for flood survivors.</p>
          </div>
          <div class="news-release-item">
            <h3 class="news-release-title"><a href="/x"></a></h3>
            <span class="news-release-date">June 20, 2024</span>
          </div>
          <div class="news-release-item">
            <h3 class="news-release-title"><a href="https://other.example/abs">Absolute link</a></h3>
            <span class="news-release-date">sometime</span>
          </div>
        </body></html>
    "#;

    fn fema() -> NewsSource {
        official_sources().into_iter().next().unwrap()
    }

    #[test]
    fn extracts_titled_articles_and_resolves_links() {
        let now = Utc::now();
        let items = parse_articles(FEMA_PAGE, &fema(), 10, now).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].source, "FEMA");
        assert_eq!(items[0].title, "FEMA Approves Aid");
        assert_eq!(items[0].summary, "Assistance for flood survivors.");
        assert_eq!(items[0].link, "https://www.fema.gov/press-release/20240621/aid");
        assert_eq!(items[0].timestamp.date_naive().to_string(), "2024-06-21");

        assert_eq!(items[1].link, "https://other.example/abs");
        assert_eq!(items[1].timestamp, now);
    }

    #[test]
    fn limit_applies_to_articles_scanned() {
        let items = parse_articles(FEMA_PAGE, &fema(), 1, Utc::now()).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn page_without_articles_is_empty_not_error() {
        let items = parse_articles("<html></html>", &fema(), 10, Utc::now()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn known_date_formats_parse() {
        assert!(parse_published_date("Jun 3, 2024").is_some());
        assert!(parse_published_date("2024-06-03").is_some());
        assert!(parse_published_date("yesterday").is_none());
    }
}
