//! Assetra bulk importer
//!
//! Validates a CSV file of assets, imports it atomically into a store seeded
//! with the configured units, and prints a JSON report of the result.
//!
//! Usage: assetra-import assets.csv [--report assets] [--as-of 2024-12-31]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetra_core::EngineError;
use assetra_core::asset::Unit;
use assetra_core::policy::UserRole;
use assetra_core::ports::{Actor, StaticIdentity, SystemClock};
use assetra_core::reports::{ReportDomain, ReportFilter};
use assetra_core::storage::{PhotoStore, StorageConfig};
use assetra_db::{AssetEngine, MemoryStore};
use assetra_shared::AppConfig;
use assetra_shared::config::LoggingSettings;
use assetra_shared::types::{UnitId, UserId};

/// Validate and import an asset CSV file
#[derive(Parser, Debug)]
#[command(name = "assetra-import")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with header name,category,unit_id,value,purchaseDate,usefulLife,status
    file: PathBuf,

    /// Report to print after import (assets, transfers, loans, incidents)
    #[arg(long, default_value = "assets", value_parser = parse_domain)]
    report: ReportDomain,

    /// Depreciation date for the asset report (defaults to today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Only report assets of this unit
    #[arg(long, value_parser = parse_unit)]
    unit: Option<UnitId>,
}

fn parse_domain(s: &str) -> Result<ReportDomain, String> {
    ReportDomain::parse(s).ok_or_else(|| format!("unknown report domain `{s}`"))
}

fn parse_unit(s: &str) -> Result<UnitId, String> {
    let id: i64 = s
        .parse()
        .map_err(|_| format!("unit id `{s}` is not a number"))?;
    UnitId::new(id).ok_or_else(|| format!("unit id must be 1 or greater, got {id}"))
}

fn init_tracing(settings: &LoggingSettings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    if settings.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn seed_units(config: &AppConfig) -> anyhow::Result<Vec<Unit>> {
    config
        .units
        .iter()
        .map(|seed| {
            let id = UnitId::new(seed.id)
                .with_context(|| format!("unit `{}` has invalid id {}", seed.code, seed.id))?;
            Ok(Unit {
                id,
                code: seed.code.clone(),
                name: seed.name.clone(),
                active: seed.active,
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let units = seed_units(&config)?;
    info!(units = units.len(), "units loaded");

    let files = PhotoStore::from_config(StorageConfig::from_settings(&config.storage))
        .context("failed to initialize photo storage")?;
    let identity = Arc::new(StaticIdentity::new(Actor::new(
        UserId::new(),
        UserRole::Admin,
    )));
    let engine = AssetEngine::new(
        MemoryStore::with_units(units),
        files,
        Arc::new(SystemClock),
        identity,
    )
    .with_currency(config.report.currency.clone());

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    match engine.validate_and_import(&text).await {
        Ok(created) => info!(count = created.len(), file = %cli.file.display(), "import complete"),
        Err(EngineError::RowsInvalid(errors)) => {
            for error in &errors {
                eprintln!("{error}");
            }
            anyhow::bail!("import rejected: {} row error(s)", errors.len());
        }
        Err(err) => return Err(err).context("import failed"),
    }

    let filter = ReportFilter {
        unit_id: cli.unit,
        as_of: cli.as_of,
        ..ReportFilter::default()
    };
    let report = engine.build_report(cli.report, &filter).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
