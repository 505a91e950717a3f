use chrono::FixedOffset;
use serde::Serialize;
use tera::escape_html;

use crate::message_database::{parse_date, Category, Message};

/// Delay between two consecutive items of the staggered fade-in.
pub const STAGGER_STEP_MS: u64 = 100;

pub const INVALID_DATE: &str = "Invalid Date";

const FENCE: &str = "```";

/// A message prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub category: Category,
    /// Markup for the message body, already escaped.
    pub body: String,
    pub date: String,
    pub delay_ms: u64,
}

pub fn format_item(message: &Message, index: usize, offset: &FixedOffset) -> Item {
    Item {
        category: message.category,
        body: render_body(&message.content),
        date: format_date(&message.date, offset),
        delay_ms: index as u64 * STAGGER_STEP_MS,
    }
}

/// Content with a code fence is shown verbatim in a preformatted block,
/// anything else as a paragraph with line breaks.
pub fn render_body(content: &str) -> String {
    if content.contains(FENCE) {
        format!("<pre><code>{}</code></pre>", escape_html(content))
    } else {
        format!("<p>{}</p>", escape_html(content).replace('\n', "<br>"))
    }
}

/// e.g. `Jun 1, 2024, 09:05 AM`
pub fn format_date(raw: &str, offset: &FixedOffset) -> String {
    match parse_date(raw) {
        Some(ts) => ts
            .with_timezone(offset)
            .format("%b %-d, %Y, %I:%M %p")
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}
