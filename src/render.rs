use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;
use tera::Tera;

use crate::error::{Error, Result};
use crate::format::{format_item, Item};
use crate::message_database::{Category, Message, Messages};

pub const EMPTY_NOTICE: &str = "No messages found in this category yet. \
Messages will appear here once added to the respective folders.";

pub const ERROR_NOTICE: &str = "Error loading messages. Please check the server log for details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Scripts,
    News,
}

impl Filter {
    /// Button order on the page.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Scripts, Filter::News];

    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Scripts => "scripts",
            Filter::News => "news",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Scripts => "Scripts",
            Filter::News => "News",
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            Filter::All => true,
            Filter::Scripts => category == Category::Scripts,
            Filter::News => category == Category::News,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Filter> {
        Filter::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

/// What the message container should show.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Items(Vec<Item>),
    Empty,
    Failed,
}

pub trait Renderer {
    /// Replaces everything currently shown.
    fn render(&mut self, view: &View) -> Result<()>;
}

/// Loaded messages plus the offset dates are displayed in.
#[derive(Debug, Clone)]
pub struct Board {
    messages: Messages,
    offset: FixedOffset,
}

impl Board {
    pub fn new(messages: Messages, offset: FixedOffset) -> Board {
        Board { messages, offset }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn replace(&mut self, messages: Messages) {
        self.messages = messages;
    }

    pub fn select(&self, filter: Filter) -> impl Iterator<Item = &Message> + '_ {
        self.messages
            .iter()
            .filter(move |m| filter.matches(m.category))
    }

    pub fn view(&self, filter: Filter) -> View {
        let items: Vec<Item> = self
            .select(filter)
            .enumerate()
            .map(|(i, m)| format_item(m, i, &self.offset))
            .collect();
        if items.is_empty() {
            View::Empty
        } else {
            View::Items(items)
        }
    }
}

pub fn render_messages<R: Renderer + ?Sized>(
    board: &Board,
    filter: Filter,
    renderer: &mut R,
) -> Result<()> {
    renderer.render(&board.view(filter))
}

/// Page templates, compiled into the binary.
pub fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("index.html", include_str!("../templates/index.html")),
        ("messages.html", include_str!("../templates/messages.html")),
    ])?;
    Ok(tera)
}

/// Renders the container as an HTML fragment.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    tera: Tera,
    container: String,
}

impl HtmlRenderer {
    pub fn new(tera: Tera) -> HtmlRenderer {
        HtmlRenderer {
            tera,
            container: String::new(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, view: &View) -> Result<()> {
        self.container.clear();
        let mut context = tera::Context::new();
        match view {
            View::Failed => {
                // Plain markup so the error state can't fail to render.
                self.container = format!("<p class=\"error\">{}</p>", ERROR_NOTICE);
                return Ok(());
            }
            View::Empty => {
                context.insert("items", &Vec::<Item>::new());
                context.insert("notice", EMPTY_NOTICE);
            }
            View::Items(items) => context.insert("items", items),
        }
        self.container = self.tera.render("messages.html", &context)?;
        Ok(())
    }
}
