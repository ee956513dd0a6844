use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use escalade_adapters::{CsvRoster, PagerDutyClient};
use escalade_app::{ImportConfig, StandardRotationImporter, WeeklyShiftImporter};
use escalade_ports::inbound::RosterSource;

/// Imports on-call roster CSVs into PagerDuty.
#[derive(Debug, Parser)]
#[command(name = "escalade", version)]
struct Args {
    /// API token with write access.
    #[arg(long, env = "ESCALADE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Directory scanned for .csv roster files.
    #[arg(long)]
    csv_dir: PathBuf,

    /// Roster layout of the files.
    #[arg(long, value_enum)]
    schedule_type: ScheduleType,

    /// Escalation policy name and prefix of every schedule name.
    #[arg(long)]
    base_name: String,

    /// Label inserted before the level number in schedule names.
    #[arg(long, default_value = "Level")]
    level_name: String,

    /// Label inserted before the slot number when coverage overlaps.
    #[arg(long, default_value = "Schedule")]
    multiple_name: String,

    /// First day the schedules take effect, YYYY-MM-DD.
    #[arg(long)]
    start_date: NaiveDate,

    /// Last covered day; schedules run forever when omitted.
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// IANA time zone the roster times are written in.
    #[arg(long, default_value = "UTC")]
    time_zone: Tz,

    /// How many times the escalation policy loops; 0 disables repetition.
    #[arg(long, default_value_t = 0)]
    num_loops: u32,

    /// Minutes before an unacknowledged incident escalates.
    #[arg(long, default_value_t = 30)]
    escalation_delay: u32,

    /// Log filter, overridden by RUST_LOG when set.
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScheduleType {
    WeeklyShifts,
    StandardRotation,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .init();

    let config = ImportConfig {
        base_name: args.base_name.clone(),
        level_label: args.level_name.clone(),
        multi_label: args.multiple_name.clone(),
        start_date: args.start_date,
        end_date: args.end_date,
        time_zone: args.time_zone,
        num_loops: args.num_loops,
        escalation_delay_minutes: args.escalation_delay,
    };
    let client = PagerDutyClient::new(&args.api_key);

    let files = roster_files(&args.csv_dir)?;
    anyhow::ensure!(
        !files.is_empty(),
        "no .csv files found in {}",
        args.csv_dir.display()
    );

    for path in files {
        let source = CsvRoster::new(&path);
        info!(path = %path.display(), "importing roster");
        match args.schedule_type {
            ScheduleType::WeeklyShifts => {
                let rows = source
                    .weekly_rows()
                    .with_context(|| format!("reading {}", path.display()))?;
                let importer =
                    WeeklyShiftImporter::new(client.clone(), client.clone(), config.clone());
                let outcome = importer
                    .import(&rows)
                    .await
                    .with_context(|| format!("importing {}", path.display()))?;
                let schedules: usize = outcome.schedule_ids_by_level.iter().map(Vec::len).sum();
                info!(
                    policy = %outcome.escalation_policy_id,
                    schedules,
                    skipped = outcome.skipped_rows.len(),
                    "import complete"
                );
            }
            ScheduleType::StandardRotation => {
                let rows = source
                    .rotation_rows()
                    .with_context(|| format!("reading {}", path.display()))?;
                let importer =
                    StandardRotationImporter::new(client.clone(), client.clone(), config.clone());
                let id = importer
                    .import(&rows)
                    .await
                    .with_context(|| format!("importing {}", path.display()))?;
                info!(schedule = %id, "import complete");
            }
        }
    }
    Ok(())
}

/// Lists the .csv files in `dir`, sorted by name for a stable import order.
fn roster_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
