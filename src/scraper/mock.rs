// Stand-in updates served when scraping yields nothing.
use chrono::{Duration, Utc};

use crate::domain::updates::keywords_for;
use crate::domain::OfficialUpdate;

fn mock_updates() -> Vec<OfficialUpdate> {
    let now = Utc::now();
    let entry = |source: &str, title: &str, date: &str, summary: &str, link: &str, days: i64| {
        OfficialUpdate {
            source: source.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            summary: summary.to_string(),
            link: link.to_string(),
            timestamp: now - Duration::days(days),
        }
    };

    vec![
        entry(
            "FEMA",
            "FEMA Announces Disaster Assistance for New York",
            "June 21, 2024",
            "Federal assistance available for flood-affected areas in New York City. Emergency shelters and financial aid programs have been activated.",
            "https://www.fema.gov/news-release/2024/06/21/fema-announces-disaster-assistance-new-york",
            0,
        ),
        entry(
            "Red Cross",
            "Red Cross Opens Emergency Shelters in Manhattan",
            "June 20, 2024",
            "American Red Cross has opened multiple emergency shelters to assist residents affected by flooding in Manhattan.",
            "https://www.redcross.org/about-us/news-and-events/news/2024/emergency-shelters-manhattan.html",
            1,
        ),
        entry(
            "NOAA",
            "NOAA Issues Flood Warning for New York Area",
            "June 19, 2024",
            "National Weather Service has issued flood warnings for the New York metropolitan area due to heavy rainfall.",
            "https://www.noaa.gov/news/2024/06/19/flood-warning-new-york",
            2,
        ),
        entry(
            "FEMA",
            "FEMA Deploys Response Teams to Hurricane-Affected Areas",
            "June 18, 2024",
            "Federal Emergency Management Agency has deployed response teams to areas affected by recent hurricane activity.",
            "https://www.fema.gov/news-release/2024/06/18/fema-deploys-response-teams-hurricane",
            3,
        ),
        entry(
            "Red Cross",
            "Red Cross Provides Aid to Earthquake Victims",
            "June 17, 2024",
            "American Red Cross is providing emergency assistance to communities affected by recent earthquake activity.",
            "https://www.redcross.org/about-us/news-and-events/news/2024/earthquake-aid.html",
            4,
        ),
    ]
}

/// Mock list, narrowed to `disaster_type` when it has keywords.
pub fn mock_updates_for(disaster_type: Option<&str>, limit: usize) -> Vec<OfficialUpdate> {
    let all = mock_updates();
    let keywords = disaster_type.map(keywords_for).unwrap_or(&[]);

    let chosen: Vec<OfficialUpdate> = if keywords.is_empty() {
        all
    } else {
        all.into_iter().filter(|u| u.matches_any(keywords)).collect()
    };
    chosen.into_iter().take(limit).collect()
}
