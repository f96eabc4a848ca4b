use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod config;
mod db;
mod error;
mod health;
mod models;
mod report;

#[derive(Parser)]
#[command(name = "campaign-health-pulse")]
#[command(about = "Campaign health scoring for client-agency delivery teams", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import campaigns, status updates or tasks from a CSV file
    Import {
        #[arg(long, value_enum)]
        kind: db::ImportKind,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Score campaign health, worst first
    #[command(group(
        ArgGroup::new("scope")
            .args(["company", "campaign"])
            .multiple(false)
    ))]
    Score {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        campaign: Option<String>,
        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print full scorecards as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    #[command(group(
        ArgGroup::new("scope")
            .args(["company", "campaign"])
            .multiple(false)
    ))]
    Report {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        campaign: Option<String>,
        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let settings = config::Settings::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await
        .context("failed to connect to Postgres")?;
    tracing::info!(max_connections = settings.max_connections, "connected to Postgres");

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { kind, csv } => {
            let written = db::import_csv(&pool, kind, &csv).await?;
            println!("Imported {written} rows from {}.", csv.display());
        }
        Commands::Score {
            company,
            campaign,
            as_of,
            limit,
            json,
        } => {
            let as_of = as_of.unwrap_or_else(Utc::now);
            let snapshots =
                db::fetch_snapshots(&pool, company.as_deref(), campaign.as_deref()).await?;
            let scores = health::score_snapshots(&snapshots, as_of);

            if json {
                let limited: Vec<_> = scores.iter().take(limit).collect();
                println!("{}", serde_json::to_string_pretty(&limited)?);
                return Ok(());
            }

            if scores.is_empty() {
                println!("No campaigns found for this scope.");
                return Ok(());
            }

            println!("Campaigns by health score (worst first):");
            for score in scores.iter().take(limit) {
                println!(
                    "- {} ({}, {} phase) score {} ({})",
                    score.campaign.name,
                    score.campaign.company,
                    score.campaign.phase,
                    score.health.score,
                    score.health.label.as_str()
                );
            }
        }
        Commands::Report {
            company,
            campaign,
            as_of,
            out,
        } => {
            let as_of = as_of.unwrap_or_else(Utc::now);
            let snapshots =
                db::fetch_snapshots(&pool, company.as_deref(), campaign.as_deref()).await?;
            let report = report::build_report(
                company.as_deref().or(campaign.as_deref()),
                as_of,
                &snapshots,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), campaigns = snapshots.len(), "report written");
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
