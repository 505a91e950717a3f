use std::fs;
use std::path::Path;
use std::sync::Mutex;

use actix_web::{http, test, web, App};
use chrono::FixedOffset;
use tera::Tera;

use bulletin::controller::Controller;
use bulletin::loader::Source;
use bulletin::render::{templates, HtmlRenderer, EMPTY_NOTICE, ERROR_NOTICE};
use bulletin::server::{configure, AppState};

fn write_site(root: &Path, scripts: &str, news: &str) {
    for (dir, body) in [("scripts", scripts), ("news", news)] {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join("messages.json"), body).unwrap();
    }
}

async fn app_data(root: &Path) -> web::Data<AppState> {
    let source = Source::Dir(root.to_path_buf());
    let tera = templates().unwrap();
    let mut controller = Controller::new(
        HtmlRenderer::new(tera.clone()),
        FixedOffset::east_opt(0).unwrap(),
    );
    controller.start(source.load().await).unwrap();
    web::Data::new(AppState {
        tera,
        source,
        controller: Mutex::new(controller),
    })
}

async fn get_body(data: &web::Data<AppState>, uri: &str) -> (http::StatusCode, String) {
    let mut app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&mut app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[actix_rt::test]
async fn index_lists_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    write_site(
        dir.path(),
        r#"[{"content":"a","date":"2024-01-01"}]"#,
        r#"[{"content":"b","date":"2024-06-01"}]"#,
    );
    let data = app_data(dir.path()).await;

    let (status, body) = get_body(&data, "/").await;
    assert_eq!(status, http::StatusCode::OK);
    let b = body.find("<p>b</p>").unwrap();
    let a = body.find("<p>a</p>").unwrap();
    assert!(b < a);
    assert!(body.contains(r#"id="allBtn" class="filter-btn active""#));
    assert!(body.contains(r#"id="newsBtn" class="filter-btn""#));
}

#[actix_rt::test]
async fn filters_select_one_collection() {
    let dir = tempfile::tempdir().unwrap();
    write_site(
        dir.path(),
        r#"[{"content":"a","date":"2024-01-01"}]"#,
        r#"[{"content":"b","date":"2024-06-01"}]"#,
    );
    let data = app_data(dir.path()).await;

    let (_, body) = get_body(&data, "/messages?filter=scripts").await;
    assert!(body.contains("<p>a</p>"));
    assert!(!body.contains("<p>b</p>"));

    let (_, body) = get_body(&data, "/?filter=news").await;
    assert!(body.contains("<p>b</p>"));
    assert!(!body.contains("<p>a</p>"));
    assert!(body.contains(r#"id="newsBtn" class="filter-btn active""#));
    assert!(body.contains(r#"id="allBtn" class="filter-btn""#));
}

#[actix_rt::test]
async fn unknown_filter_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let data = app_data(dir.path()).await;
    let (status, _) = get_body(&data, "/?filter=everything").await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn missing_collections_show_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let data = app_data(dir.path()).await;
    for uri in &["/messages?filter=all", "/messages?filter=scripts", "/messages?filter=news"] {
        let (status, body) = get_body(&data, uri).await;
        assert_eq!(status, http::StatusCode::OK);
        assert!(body.contains(EMPTY_NOTICE));
    }
}

#[actix_rt::test]
async fn reload_replaces_messages() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path(), r#"[{"content":"old","date":"2024-01-01"}]"#, "[]");
    let data = app_data(dir.path()).await;

    write_site(dir.path(), "[]", r#"[{"content":"fresh","date":"2024-02-01"}]"#);
    let mut app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;
    let req = test::TestRequest::post().uri("/reload").to_request();
    let resp = test::call_service(&mut app, req).await;
    assert_eq!(resp.status(), http::StatusCode::SEE_OTHER);

    let (_, body) = get_body(&data, "/messages").await;
    assert!(body.contains("<p>fresh</p>"));
    assert!(!body.contains("<p>old</p>"));
}

#[actix_rt::test]
async fn serves_collection_files_and_assets() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path(), "[]", r#"[{"content":"b","date":"2024-06-01"}]"#);
    let data = app_data(dir.path()).await;

    let (status, body) = get_body(&data, "/news/messages.json").await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(body.contains("\"b\""));

    let (status, _) = get_body(&data, "/static/style.css").await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _) = get_body(&data, "/static/../Cargo.toml").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn missing_collection_dir_serves_nothing_else() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("scripts")).unwrap();
    fs::write(dir.path().join("scripts/messages.json"), "[]").unwrap();
    let data = app_data(dir.path()).await;

    let (status, _) = get_body(&data, "/scripts/messages.json").await;
    assert_eq!(status, http::StatusCode::OK);

    for uri in &["/news/messages.json", "/news/Cargo.toml", "/scripts/Cargo.toml", "/src/messages.json"] {
        let (status, body) = get_body(&data, uri).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND, "{}", uri);
        assert!(!body.contains("[package]"));
    }
}

#[actix_rt::test]
async fn failed_render_shows_error_notice() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path(), r#"[{"content":"a","date":"2024-01-01"}]"#, "[]");
    let source = Source::Dir(dir.path().to_path_buf());

    let mut broken = Tera::default();
    broken
        .add_raw_template("messages.html", "{{ missing_var }}")
        .unwrap();
    let mut controller =
        Controller::new(HtmlRenderer::new(broken), FixedOffset::east_opt(0).unwrap());
    assert!(controller.start(source.load().await).is_err());
    let data = web::Data::new(AppState {
        tera: templates().unwrap(),
        source,
        controller: Mutex::new(controller),
    });

    for uri in &["/", "/?filter=scripts", "/messages?filter=news"] {
        let (status, body) = get_body(&data, uri).await;
        assert_eq!(status, http::StatusCode::OK, "{}", uri);
        assert!(body.contains(ERROR_NOTICE), "{}", uri);
        assert!(!body.contains("template error"));
    }
}
