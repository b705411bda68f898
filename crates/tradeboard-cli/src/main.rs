mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::io;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tradeboard_client::ClientError;

const LOG_ENV_VAR: &str = "TRADEBOARD_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

const ROOT_HELP: &str = "Tradeboard - sales incentive dashboard data

Usage:
  tradeboard <command>

Start here:
  tradeboard template board.xlsx
  tradeboard import create --help
  tradeboard indicators show
";

const TOP_LEVEL_HELP: &str = "Tradeboard - sales incentive dashboard data

USAGE: tradeboard <command>

Load your workbook:
  1. tradeboard import create --help                      Read the workbook layout and rules
  2. tradeboard template board.xlsx                       Write a sample workbook to start from
  3. tradeboard import create --dry-run <path>            Validate without writing anything
  4. tradeboard import create <path>                      Store indicators and vendors

Review the program:
  tradeboard indicators show [--year Y] [--month M]       Month score, targets, and yearly totals
  tradeboard vendors show [--team T] [--area A]           Goal versus result per vendor

Edit indicators by hand:
  tradeboard indicators set <key> <value> --year Y --month M
  tradeboard indicators set-total <total> --year Y --month M

Other commands:
  tradeboard import list                                  List past imports

Logging goes to stderr. Set TRADEBOARD_LOG (for example `debug`) to see more.
Add --json to any command for machine-readable output.
";

fn main() -> ExitCode {
    init_tracing();
    run()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    if raw_args.len() == 1 {
        return report(write_stdout_text(ROOT_HELP), ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse_from(&raw_args) {
        Ok(cli) => cli,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            tracing::debug!(command = %success.command, "command succeeded");
            report(output::print_success(&success, mode), ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            report(
                output::print_failure(&error, mode),
                exit_code_for_error(&error),
            )
        }
    }
}

/// Exit 2 when the result itself could not be written.
fn report(written: io::Result<()>, code: ExitCode) -> ExitCode {
    match written {
        Ok(()) => code,
        Err(error) => {
            tracing::error!(%error, "could not write output");
            ExitCode::from(2)
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> ExitCode {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        let text = if is_top_level_help_request(raw_args) {
            TOP_LEVEL_HELP.to_string()
        } else {
            err.to_string()
        };
        return report(write_stdout_text(&text), ExitCode::SUCCESS);
    }

    let hint = if names_a_command(err.kind()) {
        command_path_from_args(raw_args)
    } else {
        None
    };
    let error = ClientError::invalid_argument_for_command(
        &strip_clap_boilerplate(&err.to_string()),
        hint.as_deref(),
    );
    report(
        output::print_failure(&error, requested_mode(raw_args)),
        ExitCode::from(1),
    )
}

fn names_a_command(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::InvalidSubcommand
    )
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    matches!(raw_args, [_, flag] if flag == "--help" || flag == "-h")
}

/// Drops clap's trailing usage and "For more information" lines; the
/// recovery steps carry the guidance instead.
fn strip_clap_boilerplate(message: &str) -> String {
    let end = ["\n\nUsage:", "\nFor more information"]
        .iter()
        .filter_map(|marker| message.find(marker))
        .min()
        .unwrap_or(message.len());
    message[..end].trim_end().to_string()
}

/// Subcommand path from the raw args, for help hints like
/// `tradeboard indicators set --help`.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let words: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .map(String::as_str)
        .filter(|value| !value.starts_with('-'))
        .collect();

    let hint = match words.as_slice() {
        ["import", "create", ..] => "import create",
        ["import", "list", ..] => "import list",
        ["import", ..] => "import",
        ["indicators", "show", ..] => "indicators show",
        ["indicators", "set", ..] => "indicators set",
        ["indicators", "set-total", ..] => "indicators set-total",
        ["indicators", ..] => "indicators",
        ["vendors", "show", ..] => "vendors show",
        ["vendors", ..] => "vendors",
        ["template", ..] => "template",
        _ => return None,
    };
    Some(hint.to_string())
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

/// Parse failures happen before the json flag is known, so look for it in
/// the raw args.
fn requested_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        output::OutputMode::Json
    } else {
        output::OutputMode::Text
    }
}
