use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_web::client::Client;
use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::message_database::{Category, Message, Messages, RawMessage};

/// Upper bound for a collection body fetched over HTTP.
pub const MAX_COLLECTION_BYTES: usize = 4 * 1024 * 1024;

/// Retrieves the bytes behind a path relative to the site root.
pub trait Fetch {
    fn fetch<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

/// Reads collections from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> DirFetcher {
        DirFetcher { root: root.into() }
    }
}

impl Fetch for DirFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, FetchError>> {
        async move {
            let full = self.root.join(path);
            fs::read(&full).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => FetchError::NotFound {
                    path: full.display().to_string(),
                },
                _ => FetchError::Io {
                    path: full.display().to_string(),
                    source: e,
                },
            })
        }
        .boxed_local()
    }
}

/// Fetches collections from a remote site with the actix HTTP client.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> HttpFetcher {
        HttpFetcher {
            client: Client::default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, FetchError>> {
        async move {
            let url = format!("{}/{}", self.base_url, path);
            let mut resp = self
                .client
                .get(url.as_str())
                .send()
                .await
                .map_err(|e| FetchError::Network {
                    path: url.clone(),
                    message: e.to_string(),
                })?;
            if !resp.status().is_success() {
                return Err(FetchError::Status {
                    path: url,
                    status: resp.status().as_u16(),
                });
            }
            let body = resp
                .body()
                .limit(MAX_COLLECTION_BYTES)
                .await
                .map_err(|e| FetchError::Network {
                    path: url.clone(),
                    message: e.to_string(),
                })?;
            Ok(body.to_vec())
        }
        .boxed_local()
    }
}

/// Where the board gets its collections from.
#[derive(Debug, Clone)]
pub enum Source {
    Dir(PathBuf),
    Url(String),
}

impl Source {
    pub async fn load(&self) -> Messages {
        match self {
            Source::Dir(root) => load_messages(&DirFetcher::new(root)).await,
            Source::Url(base) => load_messages(&HttpFetcher::new(base)).await,
        }
    }

    /// Site root for serving the collection files, if they live on disk.
    pub fn root(&self) -> Option<&Path> {
        match self {
            Source::Dir(root) => Some(root),
            Source::Url(_) => None,
        }
    }
}

async fn fetch_collection<F: Fetch + ?Sized>(
    fetcher: &F,
    category: Category,
) -> Result<Vec<RawMessage>, FetchError> {
    let path = category.collection_path();
    let bytes = fetcher.fetch(path).await?;
    serde_json::from_slice(&bytes).map_err(|source| FetchError::Json {
        path: path.to_string(),
        source,
    })
}

/// Loads one collection. A failed fetch yields no messages.
pub async fn load_collection<F: Fetch + ?Sized>(fetcher: &F, category: Category) -> Messages {
    match fetch_collection(fetcher, category).await {
        Ok(records) => {
            debug!(collection = %category, count = records.len(), "Loaded collection");
            records
                .into_iter()
                .map(|raw| Message::from_raw(raw, category))
                .collect()
        }
        Err(e) => {
            warn!(collection = %category, error = %e, "Could not load collection");
            Vec::new()
        }
    }
}

/// Loads both collections, concatenated scripts first and then sorted
/// newest first.
pub async fn load_messages<F: Fetch + ?Sized>(fetcher: &F) -> Messages {
    let (scripts, news) = futures::join!(
        load_collection(fetcher, Category::Scripts),
        load_collection(fetcher, Category::News)
    );
    let mut messages = scripts;
    messages.extend(news);
    sort_newest_first(&mut messages);
    info!(count = messages.len(), "Messages loaded");
    messages
}

/// Stable sort by descending date. Unparseable dates go last.
pub fn sort_newest_first(messages: &mut [Message]) {
    messages.sort_by_cached_key(|m| Reverse(m.timestamp()));
}
