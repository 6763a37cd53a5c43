// Entry point and high-level CLI flow.
//
// Reads an exported pick-list CSV (file or stdin), applies any settings typed
// on the command line over the stored config, and prints the summary tiles
// plus the at-risk wave table. Optional CSV/JSON exports mirror the printed
// report.
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use pick_risk::config::{Config, ConfigStore, CONFIG_ENV_VAR};
use pick_risk::output;
use pick_risk::types::BucketRow;
use pick_risk::util::parse_instant;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for pick-risk
#[derive(Parser, Debug)]
#[command(name = "pick-risk")]
#[command(about = "Project pick-list staffing risk per stage-by wave")]
#[command(version)]
struct Args {
    /// Exported pick-list CSV; `-` or omitted reads stdin
    input: Option<PathBuf>,

    /// Config file location
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Average minutes per pick list (ignored unless a positive number)
    #[arg(long)]
    avg_pl_min: Option<String>,

    /// Shift end shown in the summary (HH:MM)
    #[arg(long)]
    shift_end: Option<String>,

    /// Include Safe waves in the table
    #[arg(long, conflicts_with = "hide_safe")]
    show_safe: bool,

    /// Hide Safe waves from the table
    #[arg(long)]
    hide_safe: bool,

    /// Persist the resulting settings to the config file
    #[arg(long)]
    save: bool,

    /// Reference time (HH:MM[:SS] today, or a full date-time); defaults to now
    #[arg(long)]
    now: Option<String>,

    /// Write every future wave to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full report to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,
}

/// Read the export text from a file or stdin.
fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Merge command-line settings over the stored config, saving when asked.
fn resolve_config(args: &Args, store: &ConfigStore) -> Result<Config> {
    let mut cfg = store.load();
    if let Some(raw) = &args.avg_pl_min {
        cfg = cfg.with_avg_pl_min_input(raw);
    }
    if let Some(raw) = &args.shift_end {
        cfg = cfg.with_shift_end_input(raw);
    }
    if args.show_safe {
        cfg = cfg.with_show_safe_rows(true);
    } else if args.hide_safe {
        cfg = cfg.with_show_safe_rows(false);
    }
    if args.save {
        store
            .save(&cfg)
            .with_context(|| format!("Failed to save config to {}", store.path().display()))?;
        info!("Saved config to {}", store.path().display());
    }
    Ok(cfg)
}

fn resolve_now(raw: Option<&str>) -> Result<NaiveDateTime> {
    let wall = Local::now().naive_local();
    match raw {
        Some(s) => parse_instant(s, wall).with_context(|| format!("Unrecognized --now value: {}", s)),
        None => Ok(wall),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pick_risk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let store = match &args.config {
        Some(p) => ConfigStore::new(p.clone()),
        None => ConfigStore::default_location(),
    };
    let config = resolve_config(&args, &store)?;
    let now = resolve_now(args.now.as_deref())?;

    let text = read_input(args.input.as_ref())?;
    let report = pick_risk::analyze_text(&text, &config, now).context("Failed to compute pick risk")?;
    info!(
        "Computed {} future waves from {} pick lists",
        report.future_buckets.len(),
        report.summary.total_records
    );

    print!("{}", output::render_report(&report, &config));

    if let Some(path) = &args.csv {
        let rows: Vec<BucketRow> = report.future_buckets.iter().map(output::bucket_row).collect();
        output::write_csv(path, &rows).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("(Full table exported to {})", path.display());
    }
    if let Some(path) = &args.json {
        output::write_json(path, &report).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("(Report exported to {})", path.display());
    }
    Ok(())
}
