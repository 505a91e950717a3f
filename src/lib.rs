//! A filterable board of messages merged from the `scripts` and `news`
//! collections.

pub mod cli;
pub mod controller;
pub mod error;
pub mod format;
pub mod loader;
pub mod message_database;
pub mod render;
pub mod server;
pub mod sort;

pub use error::{Error, FetchError, Result};
pub use message_database::{Category, Message, Messages};
pub use render::Filter;
