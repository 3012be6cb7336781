use anyhow::Result;
use clap::Parser;
use std::fs::{self, OpenOptions};

use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

use openrev_core::{
    client::OpenReviewClient,
    config::{self, AppConfig},
    extract::{project_workshop, SubmissionExtractor, SubmissionStatus},
    manifest::{self, ExportMetadata},
    models::WorkshopRecord,
    store::ExportStore,
};

/// Harvest OpenReview submissions and review scores into local JSON files.
#[derive(Debug, Parser)]
#[command(name = "openrev", version, about)]
struct Cli {
    /// Export accepted main-venue submissions with their review ratings.
    #[arg(long)]
    main: bool,
    /// Export every workshop venue's submissions.
    #[arg(long)]
    workshop: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let client = OpenReviewClient::connect(&config.api).await?;
    let extractor = SubmissionExtractor::new(&client, config.venue.accepted_venues.clone());

    let venues = extractor.list_venues().await?;
    let matching: Vec<&String> = venues
        .iter()
        .filter(|id| id.contains(&config.venue.venue_filter))
        .collect();
    info!(
        "{} venues match '{}': {matching:?}",
        matching.len(),
        config.venue.venue_filter
    );

    let store = ExportStore::new(&config.export.data_dir);

    if cli.main {
        run_main_export(&extractor, &store, &config).await?;
    }
    if cli.workshop {
        run_workshop_export(&extractor, &store, &config, &venues).await?;
    }

    Ok(())
}

async fn run_main_export(
    extractor: &SubmissionExtractor<'_>,
    store: &ExportStore,
    config: &AppConfig,
) -> Result<()> {
    let venue_id = &config.venue.venue_id;
    let records = extractor.fetch_accepted_with_reviews(venue_id).await?;
    let path = store.write_main(&config.export.file_label, &records)?;
    info!("wrote {} accepted records to {}", records.len(), path.display());

    ExportMetadata::record(venue_id.clone(), records.len())
        .persist(manifest::manifest_path(&config.export.data_dir))?;
    Ok(())
}

async fn run_workshop_export(
    extractor: &SubmissionExtractor<'_>,
    store: &ExportStore,
    config: &AppConfig,
    venues: &[String],
) -> Result<()> {
    // A venue fetch failure aborts the whole sweep, remaining venues included.
    let prefix = format!("{}/Workshop/", config.venue.venue_filter);
    for venue_id in venues.iter().filter(|id| id.contains(&prefix)) {
        info!("harvesting workshop venue {venue_id}");
        let submissions = extractor
            .fetch_submissions(venue_id, SubmissionStatus::All)
            .await?;
        if submissions.is_empty() {
            info!("no submissions under {venue_id}, skipping");
            continue;
        }

        let mut labels: Vec<&str> = Vec::new();
        for note in &submissions {
            if let Some(label) = note.content.str_value("venue") {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        debug!("venue labels under {venue_id}: {labels:?}");

        let records: Vec<WorkshopRecord> = submissions.iter().map(project_workshop).collect();
        if let Some(path) = store.write_workshop(&config.export.file_label, venue_id, &records)? {
            info!("wrote {} submissions to {}", records.len(), path.display());
        }
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("openrev.log");

    let env_filter = EnvFilter::from_default_env();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
