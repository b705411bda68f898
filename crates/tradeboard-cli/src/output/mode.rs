use crate::cli::{Commands, ImportCommand, IndicatorsCommand, VendorsCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Import { command } => match command {
            ImportCommand::Create { json, .. } | ImportCommand::List { json } => *json,
        },
        Commands::Indicators { command } => match command {
            IndicatorsCommand::Show { json, .. }
            | IndicatorsCommand::Set { json, .. }
            | IndicatorsCommand::SetTotal { json, .. } => *json,
        },
        Commands::Vendors {
            command: VendorsCommand::Show { json, .. },
        } => *json,
        Commands::Template { json, .. } => *json,
    };

    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
