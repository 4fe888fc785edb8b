//! Schema maintenance for the evenup database.
//!
//! ```text
//! migration [up [N] | down [N] | fresh | refresh | status]
//! ```
//!
//! The database comes from `DATABASE_URL` (default: `evenup.db` in the
//! working directory).

use std::process::ExitCode;

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./evenup.db?mode=rwc";

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Up(Option<u32>),
    Down(Option<u32>),
    Fresh,
    Refresh,
    Status,
}

impl Action {
    fn parse(mut args: impl Iterator<Item = String>) -> Option<Self> {
        let name = args.next().unwrap_or_else(|| "up".to_string());
        let steps = match args.next() {
            Some(raw) => Some(raw.parse::<u32>().ok()?),
            None => None,
        };
        if args.next().is_some() {
            return None;
        }
        match (name.as_str(), steps) {
            ("up", steps) => Some(Self::Up(steps)),
            ("down", steps) => Some(Self::Down(steps)),
            ("fresh", None) => Some(Self::Fresh),
            ("refresh", None) => Some(Self::Refresh),
            ("status", None) => Some(Self::Status),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let Some(action) = Action::parse(std::env::args().skip(1)) else {
        eprintln!("usage: migration [up [N] | down [N] | fresh | refresh | status]");
        return Ok(ExitCode::from(2));
    };

    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&url).await?;

    match action {
        Action::Up(steps) => migration::Migrator::up(&db, steps).await?,
        Action::Down(steps) => migration::Migrator::down(&db, steps).await?,
        Action::Fresh => migration::Migrator::fresh(&db).await?,
        Action::Refresh => migration::Migrator::refresh(&db).await?,
        Action::Status => migration::Migrator::status(&db).await?,
    }

    Ok(ExitCode::SUCCESS)
}
