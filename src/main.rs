mod app;
mod client;
mod config;
mod domain;
#[cfg(test)]
mod fake_backend;
mod ingestion;
mod notify;
mod panel;
mod render;
mod transport;

use std::{env, fs::File, io::Read};

use tracing::{debug, info};

use crate::app::App;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::ingestion::CsvReader;
use crate::notify::StdErrNotifier;
use crate::render::CsvOutput;
use crate::transport::HttpTransport;

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A .env file is optional; real environment variables win.
    let dotenv = dotenv::dotenv();
    setup_tracing();
    if let Err(e) = dotenv {
        debug!(error = %e, "no .env file loaded");
    }

    let config = ClientConfig::from_env()?;
    info!(
        orders = %config.orders_base,
        payments = %config.payments_base,
        route = config.payment_route.path(),
        "client configured"
    );

    // Script path as the first argument; stdin when absent or "-".
    let source: Box<dyn Read + Send> = match env::args().nth(1) {
        Some(path) if path != "-" => Box::new(File::open(path)?),
        _ => Box::new(std::io::stdin()),
    };
    let ingestion = CsvReader::new(source)?;

    let api = ApiClient::new(HttpTransport::new(config.clone())?, config.payment_route);
    let mut app = App::new(
        ingestion,
        CsvOutput::new(std::io::stdout()),
        StdErrNotifier::default(),
        api,
        config.initial_user,
    );

    app.process().await?;
    app.flush()?;

    Ok(())
}
