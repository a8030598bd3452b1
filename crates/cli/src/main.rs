//! workpulse CLI - team capacity and project risk at a glance.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use workpulse_core::{EngineConfig, MemberId, Time};
use workpulse_progress::{
    Assessment, AssessmentEngine, PeriodSelector, ProgressReport, RiskClassifier, WorkloadReport,
};
use workpulse_storage::{load_snapshot, JsonCapacityStore};

const CONFIG_ENV_VAR: &str = "WORKPULSE_CONFIG";

#[derive(Parser)]
#[command(name = "workpulse")]
#[command(about = "Team capacity and project risk assessment", long_about = None)]
struct Cli {
    /// Engine configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Capacity override store
    #[arg(long, global = true, default_value = ".workpulse/capacity.json")]
    capacity_file: PathBuf,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show member and team workload for a period
    Workload {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Show project progress, delay and buffer
    Progress {
        /// Snapshot file
        #[arg(long)]
        snapshot: PathBuf,
        /// Reference time (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Workload, progress and status labels in one report
    Assess {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Read or change daily capacity overrides
    Capacity {
        #[command(subcommand)]
        action: CapacityAction,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Snapshot file
    #[arg(long)]
    snapshot: PathBuf,
    /// Period to measure workload over
    #[arg(long, value_enum, default_value_t = PeriodArg::Week)]
    period: PeriodArg,
    /// Custom period start (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    from: Option<String>,
    /// Custom period end (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    to: Option<String>,
    /// Reference time (defaults to now)
    #[arg(long)]
    at: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    Week,
    Month,
    Custom,
    Project,
}

#[derive(Subcommand)]
enum CapacityAction {
    /// Show a member's daily hours
    Get {
        /// Member ID
        member: String,
    },
    /// Set a member's daily hours
    Set {
        /// Member ID
        member: String,
        /// Hours per workable day
        hours: f64,
    },
    /// List all overrides
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let store = Arc::new(JsonCapacityStore::new(&cli.capacity_file));
    let engine = AssessmentEngine::new(&config, store)?;

    match cli.command {
        Commands::Workload { window } => {
            let snapshot = load_snapshot(&window.snapshot).await?;
            let now = parse_at(window.at.as_deref())?;
            let selector = selector_for(&window, &snapshot.project)?;
            let report = engine.workload(&snapshot, &selector, now)?;
            emit(cli.json, &report, print_workload)?;
        }
        Commands::Progress { snapshot, at } => {
            let snapshot = load_snapshot(&snapshot).await?;
            let now = parse_at(at.as_deref())?;
            let report = engine.progress(&snapshot, now)?;
            emit(cli.json, &report, print_progress)?;
        }
        Commands::Assess { window } => {
            let snapshot = load_snapshot(&window.snapshot).await?;
            let now = parse_at(window.at.as_deref())?;
            let selector = selector_for(&window, &snapshot.project)?;
            let assessment = engine.assess(&snapshot, &selector, now)?;
            emit(cli.json, &assessment, print_assessment)?;
        }
        Commands::Capacity { action } => match action {
            CapacityAction::Get { member } => {
                let member = MemberId::new(member);
                let hours = engine.registry().get_daily_hours(&member);
                println!("{}: {}h/day", member, hours);
            }
            CapacityAction::Set { member, hours } => {
                let member = MemberId::new(member);
                engine.registry().set_daily_hours(&member, hours)?;
                info!("Stored in {}", cli.capacity_file.display());
                println!("{}: {}h/day", member, hours);
            }
            CapacityAction::List => {
                let overrides = engine.registry().overrides()?;
                println!(
                    "Capacity overrides ({}, default {}h/day)",
                    overrides.len(),
                    engine.registry().default_daily_hours()
                );
                for (member, hours) in overrides {
                    println!("  {}: {}h/day", member, hours);
                }
            }
        },
    }

    Ok(())
}

fn load_config(flag: Option<&Path>) -> Result<EngineConfig> {
    let path = match flag {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from),
    };
    let Some(path) = path else {
        debug!("No config given, using defaults");
        return Ok(EngineConfig::default());
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn selector_for(window: &WindowArgs, project: &workpulse_core::Project) -> Result<PeriodSelector> {
    Ok(match window.period {
        PeriodArg::Week => PeriodSelector::Week,
        PeriodArg::Month => PeriodSelector::Month,
        PeriodArg::Project => PeriodSelector::lifetime(project),
        PeriodArg::Custom => {
            let (Some(from), Some(to)) = (window.from.as_deref(), window.to.as_deref()) else {
                bail!("--period custom needs both --from and --to");
            };
            PeriodSelector::custom(parse_bound(from, false)?, parse_bound(to, true)?)
        }
    })
}

fn parse_at(at: Option<&str>) -> Result<Time> {
    match at {
        Some(raw) => parse_bound(raw, false),
        None => Ok(Utc::now()),
    }
}

/// Parse an RFC 3339 instant, or a bare date as the start (or end) of that day.
fn parse_bound(raw: &str, end_of_day: bool) -> Result<Time> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD or RFC 3339, got '{}'", raw))?;
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    Ok(if end_of_day {
        start + Duration::days(1) - Duration::nanoseconds(1)
    } else {
        start
    })
}

fn emit<T: Serialize>(json: bool, value: &T, print: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

fn print_workload(report: &WorkloadReport) {
    println!(
        "Workload {} .. {} ({} workable days)",
        report.period.start.format("%Y-%m-%d"),
        report.period.end.format("%Y-%m-%d"),
        report.workable_days
    );
    for member in &report.members {
        println!(
            "  {:<16} {:>6.1}h / {:>6.1}h  {:>4}%  {}",
            member.member_id.as_str(),
            member.assigned_hours,
            member.workable_hours,
            member.workload_percentage,
            member.band.as_str().to_uppercase(),
        );
    }
    let team = &report.team;
    println!(
        "  Team: {:.1}h of {:.1}h assigned ({}%), {:.1}h available",
        team.total_assigned_hours, team.total_workable_hours, team.workload_percentage, team.available_hours
    );
    println!(
        "  Unassigned: {:.1}h ({}% of available)",
        team.unassigned_hours, team.unassigned_absorption_percentage
    );
}

fn print_progress(report: &ProgressReport) {
    println!("Progress");
    println!(
        "  Done: {:.1}h of {:.1}h ({}%)",
        report.completed_hours, report.total_estimated_hours, report.progress_rate
    );
    println!("  Time elapsed: {}%", report.time_elapsed_rate);
    println!(
        "  Delay rate: {:+} ({})",
        report.delay_rate,
        RiskClassifier::pace_status(report.delay_rate).as_str()
    );
    println!(
        "  Buffer: {:.1}h of {:.1}h left ({:.1}h consumed)",
        report.remaining_buffer_hours, report.buffer_hours, report.delayed_hours
    );
    if !report.delayed_todo_ids.is_empty() {
        println!("  Delayed todos ({}):", report.delayed_todo_ids.len());
        for id in &report.delayed_todo_ids {
            println!("    {}", id);
        }
    }
}

fn print_assessment(assessment: &Assessment) {
    print_workload(&assessment.workload);
    print_progress(&assessment.progress);
    println!("Status");
    println!("  Pace:   {}", assessment.pace.as_str());
    println!("  Health: {}", assessment.health.as_str());
    println!(
        "  Risk:   {} ({} of {} open todos overdue, {:.1}h)",
        assessment.risk.as_str(),
        assessment.overdue.overdue_count,
        assessment.overdue.incomplete_count,
        assessment.overdue.overdue_hours
    );
}
