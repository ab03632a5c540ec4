use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use scanner::config::Config;
use scanner::database;
use scanner::logging;
use scanner::services::attendance_store::SqliteAttendanceStore;
use scanner::services::ticket_log::TicketLog;
use scanner::state::AppState;
use scanner::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;
    let _log_guard = logging::init_logging(config.log_file.as_deref());
    info!(?config, "Starting ticket scanner");

    if !config.has_session_secret() {
        warn!("SESSION_SECRET not set, sessions will not survive a restart");
    }

    let pool = database::connect(&config.database_url)
        .await
        .with_context(|| format!("cannot open database {}", config.database_url))?;
    let store = Arc::new(SqliteAttendanceStore::new(pool));
    let ticket_log = TicketLog::new(&config.ticket_log_path);

    let state = AppState::new(
        store,
        ticket_log,
        config.admin.clone(),
        config.session_key(),
    );
    let app = web::router(state, &config.assets_dir);

    // Fall back to the next port when the configured one is taken.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("cannot parse HOST/PORT")?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = SocketAddr::new(addr.ip(), addr.port().wrapping_add(1));
            warn!("Could not bind {}: {}. Trying fallback {}", addr, e, fallback);
            tokio::net::TcpListener::bind(fallback)
                .await
                .with_context(|| format!("cannot bind fallback {}", fallback))?
        }
    };

    let bound_addr = listener.local_addr()?;
    info!("Scanner listening on http://{}", bound_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
