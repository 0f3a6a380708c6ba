// Where each agency publishes news, and how its listing page is laid out.
//
// source
//  ├── name
//  ├── base_url     (relative links resolve against this)
//  ├── news_url
//  └── selectors
//       ├── articles  (one per news item)
//       ├── title     (inside article)
//       ├── date
//       ├── summary
//       └── link      (element carrying href)

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub articles: &'static str,
    pub title: &'static str,
    pub date: &'static str,
    pub summary: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSource {
    pub name: &'static str,
    pub base_url: &'static str,
    pub news_url: &'static str,
    pub selectors: Selectors,
}

pub fn official_sources() -> Vec<NewsSource> {
    vec![
        NewsSource {
            name: "FEMA",
            base_url: "https://www.fema.gov",
            news_url: "https://www.fema.gov/news-releases",
            selectors: Selectors {
                articles: ".news-release-item",
                title: ".news-release-title a",
                date: ".news-release-date",
                summary: ".news-release-summary",
                link: ".news-release-title a",
            },
        },
        NewsSource {
            name: "Red Cross",
            base_url: "https://www.redcross.org",
            news_url: "https://www.redcross.org/about-us/news-and-events/news.html",
            selectors: Selectors {
                articles: ".news-item",
                title: ".news-title a",
                date: ".news-date",
                summary: ".news-summary",
                link: ".news-title a",
            },
        },
        NewsSource {
            name: "NOAA",
            base_url: "https://www.noaa.gov",
            news_url: "https://www.noaa.gov/news",
            selectors: Selectors {
                articles: ".news-item",
                title: ".news-title a",
                date: ".news-date",
                summary: ".news-summary",
                link: ".news-title a",
            },
        },
    ]
}
