//! Contacts server - REST API over the contact store and photo directory.

mod app;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use contacts::ContactService;
use contacts::io::config::{DEFAULT_CONFIG_FILE, ServerConfig, load_config};
use contacts::io::contact_store::SqliteContactStore;
use contacts::io::photo_store::FsPhotoStore;
use contacts::logging;
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "contacts-server")]
#[command(about = "REST API for contact records and photos")]
struct Args {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to bind the server to (overrides server.bind)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(logging::DEFAULT_DIRECTIVE);

    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;
    info!(config = %args.config.display(), "configuration loaded");

    let store = SqliteContactStore::open(&config.database.path).context("open contact store")?;
    info!(path = %config.database.path.display(), "contact store ready");

    let photos = FsPhotoStore::new(
        &config.photos.directory,
        config.photos.public_base_url.clone(),
    );
    info!(photo_dir = %config.photos.directory.display(), "serving photos");

    let state = AppState::new(ContactService::new(store, photos));
    let app = app::build_app(state, &config)?;

    let addr = listen_addr(&config.server)?;
    info!(addr = %addr, origin = %config.cors.allowed_origin, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn listen_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let raw = format!("{}:{}", server.bind, server.port);
    raw.parse().with_context(|| format!("parse listen address {raw}"))
}
