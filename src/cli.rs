use std::path::PathBuf;

use chrono::{FixedOffset, Local};
use clap::{Args, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::loader::Source;

#[derive(Parser, Debug)]
#[command(name = "bulletin", version, about = "Filterable board of scripts and news")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the message board
    Serve(ServeArgs),
    /// Categorize a JSON dump of messages into the scripts and news collections
    Sort(SortArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Site root holding scripts/messages.json and news/messages.json
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Fetch the collections from this base URL instead of the site root
    #[arg(long = "source-url")]
    pub source_url: Option<String>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// Offset from UTC dates are shown in, defaults to the local offset
    #[arg(long = "utc-offset-minutes", allow_negative_numbers = true)]
    pub utc_offset_minutes: Option<i32>,
}

impl ServeArgs {
    pub fn source(&self) -> Source {
        match &self.source_url {
            Some(url) => Source::Url(url.clone()),
            None => Source::Dir(self.root.clone()),
        }
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        match self.utc_offset_minutes {
            Some(minutes) => FixedOffset::east_opt(minutes * 60)
                .ok_or_else(|| Error::Config(format!("UTC offset out of range: {} minutes", minutes))),
            None => Ok(*Local::now().offset()),
        }
    }
}

#[derive(Args, Debug)]
pub struct SortArgs {
    /// JSON array of {content, date} records
    pub dump: PathBuf,

    /// Site root the collections are written under
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}
