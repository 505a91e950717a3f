use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The collection a message was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scripts,
    News,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Scripts => "scripts",
            Category::News => "news",
        }
    }

    /// Location of the collection relative to the site root.
    pub fn collection_path(self) -> &'static str {
        match self {
            Category::Scripts => "scripts/messages.json",
            Category::News => "news/messages.json",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Category> {
        match s {
            "scripts" => Ok(Category::Scripts),
            "news" => Ok(Category::News),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// A record as stored in a collection file.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl RawMessage {
    pub fn new(content: impl Into<String>, date: impl Into<String>) -> RawMessage {
        RawMessage {
            id: None,
            content: content.into(),
            date: date.into(),
            category: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub content: String,
    pub date: String,
    pub category: Category,
}

impl Message {
    /// Tags a stored record with the collection it came from. Any category
    /// written into the record itself is ignored.
    pub fn from_raw(raw: RawMessage, category: Category) -> Message {
        Message {
            content: raw.content,
            date: raw.date,
            category,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }
}

pub type Messages = Vec<Message>;

/// Parses the date formats found in collection files. Naive timestamps are
/// taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
