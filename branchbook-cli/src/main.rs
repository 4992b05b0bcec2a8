use anyhow::{Context, Result, bail};
use branchbook_core::{
    DateRange, NumberLocale, PeriodRow, ReportConfig, WeekStart, parse_remark,
};
use branchbook_ingest::{RawTransaction, sources};
use branchbook_reports::{
    BranchReport, ReportPipeline, cash_in_hand, csv_export, export_workbook, format::format_amount,
    passbook, write_artifact,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "branchbook",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BRANCHBOOK_BUILD_SHA"), ")"),
    about = "Branch ledger reconciliation and passbook export"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the two-sheet passbook / cash-in-hand workbook
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory (defaults to config `report.output_dir`, then ".")
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write CSV copies of both sheets and the classified transactions
        #[arg(long)]
        csv: bool,
    },

    /// Print the running-balance ledger at one granularity
    Ledger {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value_t = LedgerGranularity::Daily)]
        granularity: LedgerGranularity,
    },

    /// Print each transaction with its category and parsed remark
    Classify {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.branchbook/config.toml with defaults
    Init,
    /// Show the effective configuration
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LedgerGranularity {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Transaction export (.json or .csv)
    #[arg(long, conflicts_with = "branch_id")]
    input: Option<PathBuf>,

    /// Fetch transactions for this branch from the configured API
    #[arg(long)]
    branch_id: Option<String>,

    /// Opening balance at the start of the range (fetched from the API when omitted)
    #[arg(long)]
    opening: Option<Decimal>,

    /// MON or SUN
    #[arg(long)]
    week_start: Option<WeekStart>,

    /// First day of the report (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of the report (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Branch label for titles and file names
    #[arg(long)]
    branch: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::Report { source, out_dir, csv } => {
            let (raws, report_cfg) = load_source(&source, &cfg).await?;
            let report = ReportPipeline::run(&raws, &report_cfg);
            let out_dir = out_dir
                .or_else(|| cfg.report.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            write_report(&report, &out_dir, csv).await?;
        }

        Command::Ledger { source, granularity } => {
            let (raws, report_cfg) = load_source(&source, &cfg).await?;
            let report = ReportPipeline::run(&raws, &report_cfg);
            let rows = match granularity {
                LedgerGranularity::Daily => &report.daily,
                LedgerGranularity::Weekly => &report.weekly,
                LedgerGranularity::Monthly => &report.monthly,
            };
            print_ledger(rows, report_cfg.locale);
        }

        Command::Classify { source } => {
            let (raws, report_cfg) = load_source(&source, &cfg).await?;
            let report = ReportPipeline::run(&raws, &report_cfg);
            print_classified(&report);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags win over `[report]` defaults from the config file
fn report_config(args: &SourceArgs, cfg: &Config) -> ReportConfig {
    let date_range = match (args.from, args.to) {
        (Some(from), Some(to)) => Some(DateRange::new(from, to)),
        _ => None,
    };

    ReportConfig {
        week_start: args.week_start.unwrap_or(cfg.report.week_start),
        opening_balance: args.opening,
        date_range,
        branch: args
            .branch
            .clone()
            .or_else(|| args.branch_id.clone())
            .or_else(|| cfg.report.branch.clone()),
        locale: cfg.report.locale,
    }
}

/// Day to ask the API for an opening balance: the range start, and only when
/// no balance was passed on the command line
fn opening_fetch_date(report_cfg: &ReportConfig) -> Option<NaiveDate> {
    match (report_cfg.opening_balance, report_cfg.date_range) {
        (None, Some(range)) => Some(range.from),
        _ => None,
    }
}

/// Merge flags over the config file and read the raw records
async fn load_source(args: &SourceArgs, cfg: &Config) -> Result<(Vec<RawTransaction>, ReportConfig)> {
    let mut report_cfg = report_config(args, cfg);

    let raws = match (&args.input, &args.branch_id) {
        (Some(path), _) => {
            if !path.exists() {
                bail!("input not found: {} (pass --input <file>)", path.display());
            }
            sources::read_path(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, Some(branch_id)) => {
            let api = cfg
                .api
                .as_ref()
                .context("no [api] section in config; pass --input or run `branchbook config init`")?;
            let mut client = sources::http::ApiClient::new(&api.base_url);
            if let Some(token) = api.token() {
                client = client.with_token(token);
            }
            if let Some(date) = opening_fetch_date(&report_cfg) {
                report_cfg.opening_balance = client.fetch_opening_balance(branch_id, date).await?;
            }
            client.fetch_transactions(branch_id, report_cfg.date_range.as_ref()).await?
        }
        (None, None) => bail!("no transaction source: pass --input <file> or --branch-id <id>"),
    };

    Ok((raws, report_cfg))
}

async fn write_report(report: &BranchReport, out_dir: &std::path::Path, csv: bool) -> Result<()> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("create {}", out_dir.display()))?;
    let artifact = export_workbook(report)?;
    let path = write_artifact(&artifact, out_dir).await?;
    println!("Wrote {} ({} bytes, {})", path.display(), artifact.bytes.len(), artifact.mime_type);

    if csv {
        let stem = artifact.filename.trim_end_matches(".xlsx").to_string();
        let outputs = [
            (format!("{stem}_passbook.csv"), csv_export::write_sheet_csv(&passbook::build_sheet(report))?),
            (format!("{stem}_cash_in_hand.csv"), csv_export::write_sheet_csv(&cash_in_hand::build_sheet(report))?),
            (
                format!("{stem}_transactions.csv"),
                csv_export::write_transactions_csv(report, report.config.locale)?,
            ),
        ];
        for (name, bytes) in outputs {
            let path = branchbook_reports::artifact::write_bytes_atomic(&bytes, &out_dir.join(name)).await?;
            println!("Wrote {}", path.display());
        }
    }

    if report.opening.is_assumed() {
        println!("Note: opening balance was not supplied and is assumed to be zero.");
    }
    println!(
        "Closing balance: {}",
        format_amount(report.closing(), report.config.locale)
    );
    Ok(())
}

fn print_ledger(rows: &[PeriodRow], locale: NumberLocale) {
    println!(
        "{:<26} {:>16} {:>14} {:>14} {:>16}",
        "Period", "Opening", "Cash In", "Cash Out", "Closing"
    );
    for r in rows {
        println!(
            "{:<26} {:>16} {:>14} {:>14} {:>16}{}",
            r.key.display(),
            format_amount(r.opening, locale),
            format_amount(r.cash_in, locale),
            format_amount(r.cash_out, locale),
            format_amount(r.closing, locale),
            if r.is_weekend { "  (weekend)" } else { "" }
        );
    }
}

fn print_classified(report: &BranchReport) {
    for item in &report.transactions {
        let remark = parse_remark(&item.txn.remark);
        println!(
            "{} | {:<22} | in {:>12} | out {:>12} | {} | {} | {} | {}",
            item.txn.date,
            item.category.label(),
            format_amount(item.txn.credit, report.config.locale),
            format_amount(item.txn.debit, report.config.locale),
            remark.loan_account_no,
            remark.member_name,
            remark.group_name,
            remark.description
        );
    }
    println!("\n{} transactions, {} clusters", report.transactions.len(), report.clusters.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportSection;

    fn source(argv: &[&str]) -> SourceArgs {
        let mut full = vec!["branchbook", "classify"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Classify { source } => source,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn file_config() -> Config {
        Config {
            report: ReportSection {
                week_start: WeekStart::Sunday,
                locale: NumberLocale::Indian,
                branch: Some("Kalyan".to_string()),
                output_dir: None,
            },
            api: None,
        }
    }

    #[test]
    fn test_file_values_fill_missing_flags() {
        let cfg = report_config(&source(&["--input", "x.json"]), &file_config());
        assert_eq!(cfg.week_start, WeekStart::Sunday);
        assert_eq!(cfg.locale, NumberLocale::Indian);
        assert_eq!(cfg.branch.as_deref(), Some("Kalyan"));
        assert_eq!(cfg.opening_balance, None);
        assert_eq!(cfg.date_range, None);
    }

    #[test]
    fn test_flags_override_file_values() {
        let args = source(&[
            "--input", "x.json", "--week-start", "MON", "--branch", "Thane", "--opening", "1250.50",
            "--from", "2024-03-31", "--to", "2024-03-01",
        ]);
        let cfg = report_config(&args, &file_config());
        assert_eq!(cfg.week_start, WeekStart::Monday);
        assert_eq!(cfg.branch.as_deref(), Some("Thane"));
        assert_eq!(cfg.opening_balance, Some(Decimal::new(125050, 2)));
        let range = cfg.date_range.unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_branch_id_labels_report_without_branch_flag() {
        let cfg = report_config(&source(&["--branch-id", "BR-12"]), &file_config());
        assert_eq!(cfg.branch.as_deref(), Some("BR-12"));
    }

    #[test]
    fn test_opening_fetched_only_for_ranges_without_opening() {
        let cfg = Config::default();
        let ranged = report_config(
            &source(&["--branch-id", "BR-12", "--from", "2024-03-01", "--to", "2024-03-31"]),
            &cfg,
        );
        assert_eq!(opening_fetch_date(&ranged), NaiveDate::from_ymd_opt(2024, 3, 1));

        let supplied = report_config(
            &source(&[
                "--branch-id", "BR-12", "--from", "2024-03-01", "--to", "2024-03-31", "--opening", "0",
            ]),
            &cfg,
        );
        assert_eq!(opening_fetch_date(&supplied), None);

        let open_ended = report_config(&source(&["--branch-id", "BR-12"]), &cfg);
        assert_eq!(opening_fetch_date(&open_ended), None);
    }

    #[test]
    fn test_half_open_range_is_rejected() {
        let err = Cli::try_parse_from(["branchbook", "ledger", "--input", "x.json", "--from", "2024-03-01"]);
        assert!(err.is_err());
    }
}
