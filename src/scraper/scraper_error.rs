use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Blocked by site: HTTP {0}")]
    Blocked(u16),
    #[error("Selector parse error: {0}")]
    Selector(String),
}
