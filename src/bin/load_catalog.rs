use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use foodgram::db::init_pool;
use foodgram::utils::catalog_import_utils::{import_ingredients, import_tags};

/// Seed the ingredient and tag catalogs from CSV files.
#[derive(Parser)]
#[command(name = "load_catalog", version)]
struct Cli {
    /// SQLite database to load into
    #[arg(long, env = "DATABASE_URL", default_value = "foodgram.sqlite3")]
    database_url: String,

    /// Headerless `name,measurement_unit` file
    #[arg(long, value_name = "CSV")]
    ingredients: Option<PathBuf>,

    /// `name,color,slug` file with a header line
    #[arg(long, value_name = "CSV")]
    tags: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if cli.ingredients.is_none() && cli.tags.is_none() {
        error!("nothing to load: pass --ingredients and/or --tags");
        return Err("no input files given".into());
    }

    let pool = init_pool(&cli.database_url, 1)?;
    let mut conn = pool.get()?;

    if let Some(path) = &cli.ingredients {
        let report = import_ingredients(&mut conn, File::open(path)?)?;
        info!(file = %path.display(), inserted = report.inserted, skipped = report.skipped, "ingredients loaded");
    }
    if let Some(path) = &cli.tags {
        let report = import_tags(&mut conn, File::open(path)?)?;
        info!(file = %path.display(), inserted = report.inserted, skipped = report.skipped, "tags loaded");
    }

    Ok(())
}
