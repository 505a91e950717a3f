use std::sync::Mutex;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bulletin::cli::{Cli, Commands, ServeArgs, SortArgs};
use bulletin::controller::Controller;
use bulletin::render::{templates, HtmlRenderer};
use bulletin::server::{configure, AppState};
use bulletin::sort::sort_dump_file;

#[actix_web::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Sort(args) => sort(args),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let offset = args.offset()?;
    let source = args.source();
    let tera = templates().context("Could not parse templates")?;

    let messages = source.load().await;
    let mut controller = Controller::new(HtmlRenderer::new(tera.clone()), offset);
    // A failed start leaves the error notice in the container; keep serving.
    let _ = controller.start(messages);

    let app_data = web::Data::new(AppState {
        tera,
        source,
        controller: Mutex::new(controller),
    });

    info!(bind = %args.bind, source = ?app_data.source, "Serving message board");
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(configure)
    })
    .bind(&args.bind)
    .with_context(|| format!("Could not bind {}", args.bind))?
    .run()
    .await?;
    Ok(())
}

fn sort(args: SortArgs) -> Result<()> {
    let collections = sort_dump_file(&args.dump, &args.root)
        .with_context(|| format!("Could not sort {}", args.dump.display()))?;
    println!(
        "Categorized: {} scripts, {} news messages",
        collections.scripts.len(),
        collections.news.len()
    );
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
