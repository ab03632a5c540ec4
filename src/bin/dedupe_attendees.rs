use std::env;

use anyhow::Context;
use dotenvy::dotenv;

use scanner::config::DEFAULT_DATABASE_URL;
use scanner::database;
use scanner::logging;
use scanner::services::attendance_store::{AttendanceStore, SqliteAttendanceStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _log_guard = logging::init_logging(None);

    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let pool = database::connect(&db_url)
        .await
        .with_context(|| format!("cannot open database {}", db_url))?;
    let store = SqliteAttendanceStore::new(pool);

    let stored = store.count_all().await?;
    let report = store.dedupe().await.context("dedupe failed")?;
    println!(
        "dedupe: stored={}, duplicated_serials={}, removed={}, remaining={}",
        stored,
        report.groups,
        report.removed,
        stored - report.removed as i64
    );
    Ok(())
}
