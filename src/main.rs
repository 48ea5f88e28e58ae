//! Gallon ledger station binary.
//!
//! Boots the tracing stack, prepares the `SQLite` database, seeds the
//! employee roster from `config.toml` when one is present, and hands the
//! terminal over to the kiosk loop.

use dotenvy::dotenv;
use gallon_ledger::errors::Result;
use gallon_ledger::{config, core, kiosk};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. The default database URL points into ./data, which SQLite will not
    //    create on its own
    if std::env::var("DATABASE_URL").is_err() {
        std::fs::create_dir_all("data")?;
    }

    // 4. Connect and make sure the schema exists
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create database tables: {e}"))?;

    // 5. Seed the employee roster from config.toml when present
    match config::employees::load_default_config() {
        Ok(roster) => {
            let seeds = roster.employees.into_iter().map(Into::into).collect();
            let created = core::employee::seed_initial_employees(&db, seeds).await?;
            info!("Seeded {created} employee(s) from config.toml.");
        }
        Err(e) => warn!("Skipping roster seed: {e}"),
    }

    // 6. Run the kiosk loop until the operator exits
    kiosk::run(&db).await
}
