use anyhow::{Context, Result};
use clap::Parser;
use medicine_api::{
    api,
    catalog::{CatalogCache, FileCatalogSource},
    config, logging,
    service::CatalogService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "medicine-api", about = "Serve the medicine catalog over HTTP")]
struct Cli {
    /// Catalog file to load (overrides `MEDICINE_CATALOG_PATH`).
    #[arg(long)]
    catalog_path: Option<PathBuf>,
    /// Port to listen on (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// Load the catalog before accepting requests instead of on the first request.
    #[arg(long)]
    preload: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    config::load_dotenv();
    logging::init_tracing();
    let config = config::init_config(|config| {
        if let Some(path) = cli.catalog_path {
            config.catalog_path = path;
        }
        if cli.port.is_some() {
            config.server_port = cli.port;
        }
    })
    .context("failed to load configuration")?;

    let source = FileCatalogSource::new(config.catalog_path.clone());
    let service = Arc::new(CatalogService::new(CatalogCache::new(Box::new(source))));
    if cli.preload {
        service.preload().await;
    }
    tracing::info!(
        catalog = %config.catalog_path.display(),
        records = service.catalog_size(),
        preload = cli.preload,
        "Catalog service ready"
    );
    let app = api::create_router(service);

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn bind_listener(port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8000..=8099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8000-8099",
    ))
}
