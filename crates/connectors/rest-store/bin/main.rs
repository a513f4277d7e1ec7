use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info_span, Instrument};

use rest_store::routes::create_router;
use rest_store::state::{self, SeedData};

#[derive(Parser)]
struct ServerOptions {
    /// Directory holding the configuration file.
    #[arg(long, value_name = "CONFIGURATION_DIR", env = "CONFIGURATION_DIR")]
    configuration: PathBuf,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    /// JSON file of rows to load on startup, keyed by entity name.
    #[arg(long, value_name = "DATA_FILE")]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let server_options = ServerOptions::parse();

    env_logger::init();

    let parsed_configuration =
        rest_store_configuration::parse_configuration(&server_options.configuration)
            .instrument(info_span!("parse configuration"))
            .await?;
    let configuration = rest_store_configuration::make_runtime_configuration(parsed_configuration)?;

    let seed = match &server_options.data {
        Some(path) => {
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("unable to read {}", path.display()))?;
            serde_json::from_str::<SeedData>(&data)
                .with_context(|| format!("unable to parse {}", path.display()))?
        }
        None => SeedData::new(),
    };

    let state = state::create_state(configuration, seed)
        .instrument(info_span!("Initialise state"))
        .await
        .map_err(|err| {
            tracing::error!(
                meta.signal_type = "log",
                event.domain = "rest-store",
                event.name = "Initialization error",
                name = "Initialization error",
                body = %err,
                error = true,
            );
            err
        })?;

    let router = create_router(state);

    let address = format!("0.0.0.0:{}", server_options.port);
    tracing::info!("Starting server on {}", address);

    axum::Server::bind(&address.parse()?)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
