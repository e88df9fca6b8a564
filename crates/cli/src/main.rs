mod render;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use caixa_classify::{DestinationMap, RuleSet};
use caixa_report::{GroupKey, Report};

/// Organize a POS cashier-session report: parse it, classify the movements
/// and print the subtotaled detail, ledger and destination summary.
#[derive(Debug, Parser)]
#[command(name = "caixa", version, about)]
struct Cli {
    /// Raw cashier report text file.
    report: PathBuf,

    /// Classification rules JSON document (defaults to the built-in rules).
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Payment-method destination map JSON document (defaults to the
    /// built-in map).
    #[arg(long)]
    map: Option<PathBuf>,

    /// Grouping keys for the detail view, in order.
    #[arg(long, value_delimiter = ',', default_value = "payment-method")]
    group: Vec<String>,

    /// Prefix each description with its movement code.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    concat_code: bool,

    /// Also write the ledger rows to this CSV file.
    #[arg(long)]
    ledger_csv: Option<PathBuf>,

    /// Emit the whole report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.report)
        .with_context(|| format!("reading report {}", cli.report.display()))?;
    let rules = load_rules(cli.rules.as_deref())?;
    let map = load_map(cli.map.as_deref())?;
    let group_keys = parse_group_keys(&cli.group)?;

    let report = Report::generate(&raw, &rules, &map, &group_keys, cli.concat_code)
        .context("generating report")?;

    if let Some(path) = &cli.ledger_csv {
        render::write_ledger_csv(&report.ledger, path)
            .with_context(|| format!("writing ledger to {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = report.ledger.len(), "ledger written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }
    Ok(())
}

fn load_rules(path: Option<&std::path::Path>) -> anyhow::Result<RuleSet> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading rules {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing rules {}", path.display()))
        }
        None => Ok(RuleSet::default_rules()),
    }
}

fn load_map(path: Option<&std::path::Path>) -> anyhow::Result<DestinationMap> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading destination map {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing destination map {}", path.display()))
        }
        None => Ok(DestinationMap::default_map()),
    }
}

fn parse_group_keys(raw: &[String]) -> anyhow::Result<Vec<GroupKey>> {
    raw.iter()
        .filter(|k| !k.trim().is_empty())
        .map(|k| k.parse::<GroupKey>().map_err(anyhow::Error::msg))
        .collect()
}
