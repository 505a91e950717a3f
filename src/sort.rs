//! Splits a flat dump of channel messages into the `scripts` and `news`
//! collections.

use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, info};

use crate::error::Result;
use crate::message_database::{parse_date, Category, RawMessage};

const CODE_PATTERNS: &[&str] = &[
    r"```lua",
    r"```.*loadstring",
    r"loadstring\s*\(",
    r"game\s*[:.]",
    r"workspace\s*[:.]",
    r"Instance\.new",
    r"local\s+\w+\s*=",
    r"function\s+\w+",
    r"end\s*$",
    r"print\s*\(",
    r"HttpGet\s*\(",
    r"require\s*\(",
    r"getgenv\s*\(",
    r"getsenv\s*\(",
    r"setclipboard\s*\(",
    r"hookfunction\s*\(",
    r"firetouchinterest\s*\(",
    r"fireclickdetector\s*\(",
    r"```[\s\S]*?```",
];

const SCRIPT_URL_PATTERNS: &[&str] = &[
    r"github\.com.*(?:script|hub|exploit|hack|lua)",
    r"raw\.githubusercontent\.com",
];

const SCRIPT_CONTEXT_PATTERNS: &[&str] = &[
    r"\bscript\b.*(?:loadstring|function|local)",
    r"(?:loadstring|function|local).*\bscript\b",
    r"\bhack\b.*(?:loadstring|function)",
    r"\bexploit\b.*(?:loadstring|function)",
    r"\bcheat\b.*(?:loadstring|function)",
];

fn compile(patterns: &[&str], flags: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?{}){}", flags, p)).map_err(Into::into))
        .collect()
}

pub struct Categorizer {
    code: Vec<Regex>,
    script_urls: Vec<Regex>,
    script_context: Vec<Regex>,
}

impl Categorizer {
    pub fn new() -> Result<Categorizer> {
        Ok(Categorizer {
            code: compile(CODE_PATTERNS, "im")?,
            script_urls: compile(SCRIPT_URL_PATTERNS, "i")?,
            script_context: compile(SCRIPT_CONTEXT_PATTERNS, "is")?,
        })
    }

    pub fn categorize(&self, content: &str) -> Category {
        let any = |set: &[Regex]| set.iter().any(|re| re.is_match(content));
        if any(&self.code) || any(&self.script_urls) || any(&self.script_context) {
            Category::Scripts
        } else {
            Category::News
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Collections {
    pub scripts: Vec<RawMessage>,
    pub news: Vec<RawMessage>,
}

/// Numbers the records in dump order, tags them and sorts each collection
/// newest first.
pub fn split_dump(dump: Vec<RawMessage>, categorizer: &Categorizer) -> Collections {
    let mut collections = Collections::default();
    for (i, mut record) in dump.into_iter().enumerate() {
        let category = categorizer.categorize(&record.content);
        debug!(index = i, category = %category, "Categorized message");
        record.id = Some(i as u64 + 1);
        record.category = Some(category);
        match category {
            Category::Scripts => collections.scripts.push(record),
            Category::News => collections.news.push(record),
        }
    }
    for records in [&mut collections.scripts, &mut collections.news] {
        records.sort_by_cached_key(|r| Reverse(parse_date(&r.date)));
    }
    collections
}

pub fn write_collections(root: &Path, collections: &Collections) -> Result<()> {
    for (category, records) in [
        (Category::Scripts, &collections.scripts),
        (Category::News, &collections.news),
    ] {
        let path = root.join(category.collection_path());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(records)?)?;
        info!(count = records.len(), path = %path.display(), "Wrote collection");
    }
    Ok(())
}

/// Reads a JSON dump and writes both collections under `root`.
pub fn sort_dump_file(dump: &Path, root: &Path) -> Result<Collections> {
    let records: Vec<RawMessage> = serde_json::from_str(&fs::read_to_string(dump)?)?;
    let collections = split_dump(records, &Categorizer::new()?);
    write_collections(root, &collections)?;
    Ok(collections)
}
