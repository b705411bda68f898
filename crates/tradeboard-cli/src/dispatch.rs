use tradeboard_client::commands;
use tradeboard_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, ImportCommand, IndicatorsCommand, VendorsCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Import { command } => match command {
            ImportCommand::Create {
                dry_run,
                merge_mode,
                path,
                ..
            } => commands::import::run(path, *dry_run, *merge_mode),
            ImportCommand::List { .. } => commands::import::list(),
        },
        Commands::Indicators { command } => match command {
            IndicatorsCommand::Show { year, month, .. } => {
                commands::indicators::show(*year, *month)
            }
            IndicatorsCommand::Set {
                key,
                value,
                year,
                month,
                ..
            } => commands::indicators::set_value(key, *value, *year, *month),
            IndicatorsCommand::SetTotal {
                total, year, month, ..
            } => commands::indicators::set_total(*total, *year, *month),
        },
        Commands::Vendors {
            command:
                VendorsCommand::Show {
                    year,
                    month,
                    team,
                    area,
                    ..
                },
        } => commands::vendors::show(*year, *month, team.clone(), area.clone()),
        Commands::Template { path, .. } => commands::template::write(path),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn template_dispatches_and_writes_the_workbook() {
        let dir = tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let target = dir.path().join("board.xlsx");
            let target_text = target.to_string_lossy().to_string();
            let parsed = parse_from(["tradeboard", "template", target_text.as_str()]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.command, "template");
                }
                assert!(target.exists());
            }
        }
    }

    #[test]
    fn missing_workbook_is_an_argument_error() {
        let parsed = parse_from([
            "tradeboard",
            "import",
            "create",
            "--dry-run",
            "/nonexistent/tradeboard/board.xlsx",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(response.is_err());
            if let Err(error) = response {
                assert_eq!(error.code, "invalid_argument");
            }
        }
    }

    #[test]
    fn unknown_command_is_not_dispatchable() {
        let parsed = parse_from(["tradeboard", "dash"]);
        assert!(parsed.is_err());
    }
}
