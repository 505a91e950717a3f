use std::path::{Component, PathBuf};
use std::sync::{Mutex, MutexGuard};

use actix_files::NamedFile;
use actix_web::error::{ErrorBadRequest, ErrorInternalServerError, ErrorNotFound};
use actix_web::{get, http, post, web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;
use tera::Tera;
use tracing::{error, info};

use crate::controller::{Controller, FilterButton};
use crate::loader::Source;
use crate::message_database::Category;
use crate::render::{Filter, HtmlRenderer};

pub const STATIC_DIR: &str = "static";

pub struct AppState {
    pub tera: Tera,
    pub source: Source,
    pub controller: Mutex<Controller<HtmlRenderer>>,
}

impl AppState {
    fn controller(&self) -> Result<MutexGuard<'_, Controller<HtmlRenderer>>> {
        self.controller
            .lock()
            .map_err(|_| ErrorInternalServerError("message board state is poisoned"))
    }
}

#[derive(Deserialize)]
struct FilterQuery {
    filter: Option<String>,
}

impl FilterQuery {
    fn filter(&self) -> Result<Filter> {
        match &self.filter {
            Some(name) => name.parse::<Filter>().map_err(ErrorBadRequest),
            None => Ok(Filter::All),
        }
    }
}

/// Applies the filter like a button click and returns the rendered container.
fn click(data: &AppState, filter: Filter) -> Result<(String, Vec<FilterButton>)> {
    let mut controller = data.controller()?;
    // On failure the controller has already put the error notice in place.
    let _ = controller.click(filter);
    Ok((controller.renderer().container().to_string(), controller.buttons()))
}

#[get("/static/{filename:.*}")]
async fn get_static(req: HttpRequest) -> Result<NamedFile> {
    let path = PathBuf::from(req.match_info().query("filename"));
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(ErrorNotFound("no such file"));
    }
    let mut whole_path = PathBuf::new();
    whole_path.push(STATIC_DIR);
    whole_path.push(path);
    Ok(NamedFile::open(whole_path)?)
}

#[get("/")]
async fn get_index(
    query: web::Query<FilterQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let filter = query.filter()?;
    let (container, buttons) = click(&data, filter)?;

    let mut context = tera::Context::new();
    context.insert("buttons", &buttons);
    context.insert("container", &container);
    let output = data.tera.render("index.html", &context).map_err(|e| {
        error!(error = %e, "Failed to render page");
        ErrorInternalServerError("failed to render page")
    })?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(output))
}

#[get("/messages")]
async fn get_messages(
    query: web::Query<FilterQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let filter = query.filter()?;
    let (container, _) = click(&data, filter)?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(container))
}

#[post("/reload")]
async fn post_reload(data: web::Data<AppState>) -> Result<HttpResponse> {
    let messages = data.source.load().await;
    info!(count = messages.len(), "Reloaded messages");
    // The error state is rendered by the controller itself.
    let _ = data.controller()?.start(messages);
    Ok(HttpResponse::SeeOther()
        .header(http::header::LOCATION, "/")
        .finish())
}

#[get("/{category}/messages.json")]
async fn get_collection(
    category: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<NamedFile> {
    let category: Category = category.parse().map_err(|_| ErrorNotFound("no such collection"))?;
    let root = data
        .source
        .root()
        .ok_or_else(|| ErrorNotFound("collections are not served from disk"))?;
    NamedFile::open(root.join(category.collection_path()))
        .map_err(|_| ErrorNotFound("no such collection"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_static)
        .service(get_index)
        .service(get_messages)
        .service(post_reload)
        .service(get_collection);
}
