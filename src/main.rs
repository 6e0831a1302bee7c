//! `orderdesk` binary.
//!
//! ```sh
//! ORDERDESK_CONFIG=orderdesk.toml RUST_LOG=info orderdesk
//! DATABASE_URL=sqlite:///var/lib/orderdesk/orders.db orderdesk
//! ```

use std::process::ExitCode;

use orderdesk::api::{self, AppState};
use orderdesk::db::Db;
use orderdesk::{Config, Server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "orderdesk failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), orderdesk::Error> {
    let config = Config::load()?;
    info!(addr = %config.server.addr, allow_rekey = config.orders.allow_rekey, "configuration loaded");

    let db = Db::connect(&config.database).await?;
    let app = api::router(AppState::new(db.clone(), &config));

    let served = Server::bind(config.server.addr).serve(app).await;
    db.close().await;
    served
}

/// `RUST_LOG` controls verbosity; `info` when unset.
fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();
}
