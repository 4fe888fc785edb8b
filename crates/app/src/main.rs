use clap::Parser;
use engine::BalanceService;
use migration::{Migrator, MigratorTrait};

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let settings = settings::Settings::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "evenup={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = match parse_database(&settings.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err.into());
        }
    };

    let service = BalanceService::builder().database(db).build();
    let mut stdout = std::io::stdout().lock();
    commands::run(&service, cli.command, &mut stdout).await?;

    Ok(())
}

async fn parse_database(config: &settings::Database) -> error::Result<sea_orm::DatabaseConnection> {
    let url = config.url();
    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
