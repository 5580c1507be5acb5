use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::block::Block;

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PostItem {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub published_at: DateTime<Utc>,
    pub thumbnail_url: String,
    pub hits: u64,
    #[serde(default)]
    pub category: Vec<Category>,
}

#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct PostItemDetail {
    #[serde(flatten)]
    pub item: PostItem,
    pub content: Block,
}

impl PostItem {
    pub fn has_category(&self, category_id: &str) -> bool {
        self.category.iter().any(|c| c.id == category_id)
    }
}

/// Reads an RFC 3339 timestamp, or a naive date-time or bare date taken as
/// UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).ok_or_else(|| {
        de::Error::custom(format!("invalid timestamp {}", text))
    })
}

// First occurrence of an id wins; order of appearance is kept.
pub fn unique_categories<'a, I>(posts: I) -> Vec<Category>
where
    I: IntoIterator<Item = &'a PostItem>,
{
    let mut seen = HashSet::new();
    let mut categories = vec![];
    for post in posts {
        for category in &post.category {
            if seen.insert(category.id.as_str()) {
                categories.push(category.clone());
            }
        }
    }
    categories
}
