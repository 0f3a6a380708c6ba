mod aggregator;
mod mock;
mod models;
mod scraper;
mod scraper_error;

pub use aggregator::OfficialUpdates;
pub use mock::mock_updates_for;
pub use models::{official_sources, NewsSource};
pub use scraper::{parse_articles, HttpPageFetcher, PageFetcher};
pub use scraper_error::ScraperError;
