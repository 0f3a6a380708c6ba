// src/social.rs
//! Mock social-media feed. No live platform is queried.
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::services::CacheStore;

pub const SOCIAL_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Urgency::Critical | Urgency::High)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: String,
    pub post: String,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
    pub urgency: Urgency,
    pub keywords: Vec<String>,
}

/// A post with made-up engagement numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPost {
    #[serde(flatten)]
    pub post: SocialPost,
    pub engagement: u32,
    pub retweets: u32,
    pub location_mentioned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialFeed {
    pub posts: Vec<RankedPost>,
    pub last_updated: DateTime<Utc>,
    pub total_count: usize,
}

pub fn mock_posts() -> Vec<SocialPost> {
    let now = Utc::now();
    let post = |id: &str, text: &str, user: &str, mins: i64, urgency, keywords: &[&str]| SocialPost {
        id: id.to_string(),
        post: text.to_string(),
        user: user.to_string(),
        timestamp: now - Duration::minutes(mins),
        platform: "twitter".to_string(),
        urgency,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    };

    vec![
        post(
            "1",
            "#floodrelief Need food and water in Lower Manhattan. Urgent help needed!",
            "citizen1",
            30,
            Urgency::High,
            &["food", "water", "urgent"],
        ),
        post(
            "2",
            "Red Cross shelter available at 123 Main St. #disasterrelief",
            "redcross_ny",
            45,
            Urgency::Medium,
            &["shelter", "available"],
        ),
        post(
            "3",
            "SOS! Trapped in building on 5th Avenue. Need immediate rescue! #emergency",
            "emergency_user",
            10,
            Urgency::Critical,
            &["SOS", "trapped", "rescue", "emergency"],
        ),
    ]
}

/// Comma-separated, trimmed, lowercased; empty entries dropped.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn mentions(post: &SocialPost, keywords: &[String], check_tags: bool) -> bool {
    let text = post.post.to_lowercase();
    keywords.iter().any(|k| {
        text.contains(k.as_str())
            || (check_tags && post.keywords.iter().any(|t| t.to_lowercase().contains(k.as_str())))
    })
}

/// The cached feed is already cut to `limit`, so the limit is part of the key.
pub fn feed_cache_key(
    disaster_id: &str,
    keywords: Option<&str>,
    priority: Option<&str>,
    limit: usize,
) -> String {
    format!(
        "social_media_{disaster_id}_{}_{}_{limit}",
        keywords.unwrap_or("all"),
        priority.unwrap_or("all")
    )
}

/// Filtered, ranked feed for a disaster, cached per filter combination.
/// The bool is true when served from cache.
pub fn feed_for(
    cache: &CacheStore,
    disaster_id: &str,
    keywords: Option<&str>,
    priority: Option<&str>,
    limit: usize,
) -> (SocialFeed, bool) {
    let key = feed_cache_key(disaster_id, keywords, priority, limit);
    if let Some(hit) = cache.get_json::<SocialFeed>(&key) {
        return (hit, true);
    }

    let mut posts = mock_posts();
    if let Some(raw) = keywords {
        let wanted = split_keywords(raw);
        if !wanted.is_empty() {
            posts.retain(|p| mentions(p, &wanted, true));
        }
    }
    if let Some(priority) = priority {
        posts.retain(|p| p.urgency.as_str() == priority);
    }

    let mut rng = rand::thread_rng();
    let ranked: Vec<RankedPost> = posts
        .into_iter()
        .take(limit)
        .map(|post| RankedPost {
            post,
            engagement: rng.gen_range(10..110),
            retweets: rng.gen_range(0..50),
            location_mentioned: rng.gen_bool(0.5),
        })
        .collect();

    let feed = SocialFeed {
        total_count: ranked.len(),
        posts: ranked,
        last_updated: Utc::now(),
    };
    cache.set_json(&key, &feed, SOCIAL_TTL_MINUTES);
    (feed, false)
}

/// The raw mock feed, as a stand-in for a platform API.
pub fn raw_feed(keywords: Option<&str>, urgent_only: bool) -> Vec<SocialPost> {
    let mut posts = mock_posts();
    if urgent_only {
        posts.retain(|p| p.urgency.is_urgent());
    }
    if let Some(raw) = keywords {
        let wanted = split_keywords(raw);
        if !wanted.is_empty() {
            posts.retain(|p| mentions(p, &wanted, false));
        }
    }
    posts
}
