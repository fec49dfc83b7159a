use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use sales_dashboard::report::Report;
use sales_dashboard::{CriteriaOverrides, DashboardSession};

/// Load a sales CSV, apply the given filters and print every dashboard view as JSON.
///
/// Filters that are not given default to "all observed values" / the full
/// date span. To deliberately select nothing for a column, pass an empty
/// list for it in a `--criteria` file.
#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", version, about)]
struct Cli {
    /// Sales CSV to load.
    source: PathBuf,

    /// JSON file with criteria; command line filters override it.
    #[arg(long, value_name = "FILE")]
    criteria: Option<PathBuf>,

    /// Keep only these cities (repeatable).
    #[arg(long = "city", value_name = "CITY")]
    cities: Vec<String>,

    /// Keep only these genders (repeatable).
    #[arg(long = "gender", value_name = "GENDER")]
    genders: Vec<String>,

    /// Keep only these customer types (repeatable).
    #[arg(long = "customer-type", value_name = "TYPE")]
    customer_types: Vec<String>,

    /// Keep only these payment methods (repeatable).
    #[arg(long = "payment", value_name = "METHOD")]
    payments: Vec<String>,

    /// First date to include (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    to: Option<NaiveDate>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn overrides(&self) -> CriteriaOverrides {
        let given = |values: &Vec<String>| (!values.is_empty()).then(|| values.clone());
        CriteriaOverrides {
            cities: given(&self.cities),
            genders: given(&self.genders),
            customer_types: given(&self.customer_types),
            payments: given(&self.payments),
            date_start: self.from,
            date_end: self.to,
        }
    }
}

fn read_criteria_file(path: &Path) -> Result<CriteriaOverrides> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading criteria file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing criteria file {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    let mut overrides = match &cli.criteria {
        Some(path) => read_criteria_file(path)?,
        None => CriteriaOverrides::default(),
    };
    overrides = overrides.merge(cli.overrides());

    let mut session = DashboardSession::new();
    session.open(&cli.source)?;
    session.apply_overrides(&overrides);

    let (Some(table), Some(criteria), Some(views)) =
        (session.table(), session.criteria(), session.result())
    else {
        anyhow::bail!("no views were computed for {}", cli.source.display());
    };

    if views.is_empty() {
        log::warn!("The selected filters exclude every record");
    }

    let report = Report::new(&cli.source, table, criteria, views);
    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serialising report")?;
    println!("{json}");
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
