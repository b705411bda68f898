use clap::{Parser, Subcommand};
use tradeboard_client::merge::MergeMode;

pub fn parse_merge_mode(value: &str) -> Result<MergeMode, String> {
    MergeMode::parse(value).ok_or_else(|| "merge mode must be one of: year, month".to_string())
}

pub fn parse_month(value: &str) -> Result<u8, String> {
    match value.trim().parse::<u8>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err("month must be a number between 1 and 12".to_string()),
    }
}

/// Extended help shown after `tradeboard import create --help`.
pub const IMPORT_CREATE_AFTER_HELP: &str = "\
How import works:
  One workbook (.xlsx or .xls) feeds the whole dashboard.
  Sheet 1 holds the monthly program indicators.
  Sheet 2 holds the per-vendor goals and results.
  Sheet names do not matter, only their order.

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat board.xlsx | tradeboard import create --dry-run -

What to do next:
  1. Run `tradeboard template board.xlsx` for a filled-in sample workbook.
  2. Run `tradeboard import create --dry-run <path>` and fix any reported line.
  3. Run `tradeboard import create <path>` once the dry run passes.

Sheet 1 (indicators), header row then one row per month:
  MÊS, ANO, EVOLUÇÃO, ITB, PDV, FACHADA, PIT STOP, ACADEMIA, REAL, PERFORMANCE
  1,2024,Janeiro,18,22,15,12,16,83,83

Sheet 2 (vendors), header row then one row per vendor and month:
  EQUIPE, VENDEDOR, MÊS, ANO,
  PDV META, PDV REAL, FACHADA META, FACHADA REAL,
  PIT STOP META, PIT STOP REAL, ACADEMIA META, ACADEMIA REAL
  Wellington,Jocimar,1,2024,10,8,5,4,3,3,2,1

Field rules:
  Headers match without regard to case, accents, spaces, or underscores.
  At least 80% of the expected headers must be present on each sheet.
  Month is 1-12 on both sheets. A blank vendor year uses the current year.
  Scores and goals that are not numbers are read as 0.
  EQUIPE must be exactly `Manoel` or `Wellington`.
  A repeated vendor (same team, name, month, year) keeps the first row.

Rejections:
  Any invalid row rejects its whole sheet, and nothing is written.
  Each imported year replaces that year's stored months.
  Use `--merge month` to overwrite only the imported months.
";

#[derive(Debug, Parser)]
#[command(
    name = "tradeboard",
    version,
    about = "sales incentive dashboard data tool",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a dashboard workbook and review past imports
    #[command(arg_required_else_help = true)]
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
    /// Show or edit the monthly program indicators
    #[command(arg_required_else_help = true)]
    Indicators {
        #[command(subcommand)]
        command: IndicatorsCommand,
    },
    /// Show the vendor scorecard
    #[command(arg_required_else_help = true)]
    Vendors {
        #[command(subcommand)]
        command: VendorsCommand,
    },
    /// Write a sample workbook with both sheets filled in
    Template {
        /// Destination .xlsx path
        path: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ImportCommand {
    /// Validate a workbook and store its indicators and vendors
    #[command(after_long_help = IMPORT_CREATE_AFTER_HELP)]
    Create {
        /// Validate the workbook without writing anything
        #[arg(long)]
        dry_run: bool,
        /// How imported years combine with stored ones: year or month
        #[arg(long = "merge", value_parser = parse_merge_mode, default_value = "year")]
        merge_mode: MergeMode,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to an .xlsx or .xls workbook (use `-` for stdin)
        path: String,
    },
    /// List past imports, newest first
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum IndicatorsCommand {
    /// Show one month's indicators and the year's monthly totals
    Show {
        /// Calendar year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<u8>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Set one indicator score for a month
    Set {
        /// Indicator key: itb, pdv, fachada, pitstop, or academia
        key: String,
        /// New score
        value: u32,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = parse_month)]
        month: u8,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Spread a month total evenly across the five indicators
    SetTotal {
        /// Total score to distribute
        total: u32,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = parse_month)]
        month: u8,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum VendorsCommand {
    /// Show goal versus result per vendor, team totals, and chart totals
    Show {
        /// Calendar year (defaults to the newest imported year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the newest imported month)
        #[arg(long, value_parser = parse_month)]
        month: Option<u8>,
        /// Only this team: Manoel or Wellington
        #[arg(long)]
        team: Option<String>,
        /// Only this area (exact match)
        #[arg(long)]
        area: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
