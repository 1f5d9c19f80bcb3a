//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::CopyRequest;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{authorize_code, CopyKind};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::snapshot::Snapshot;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };

    match command {
        Commands::Kinds { kind } => kinds(kind),
        Commands::Tree { snapshot } => tree(&container(cli, snapshot)?),
        Commands::Paths { snapshot } => paths(&container(cli, snapshot)?),
        Commands::Leaves { snapshot } => leaves(&container(cli, snapshot)?),
        Commands::Move {
            snapshot,
            id,
            parent,
        } => move_record(&container(cli, snapshot)?, id, parent.as_deref()),
        Commands::Copy {
            snapshot,
            source,
            kind,
            copied_by,
            title,
            recipients,
            extract,
            date,
        } => {
            let kind = kind.parse::<CopyKind>().map_err(CliError::InvalidArgs)?;
            let request = CopyRequest {
                source_id: source.clone(),
                kind,
                copied_by: copied_by.clone(),
                signing_title: title.clone(),
                recipients: recipients.clone(),
                extracted_content: extract.clone(),
                copy_date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
            };
            copy(&container(cli, snapshot)?, &request)
        }
        Commands::Copies { snapshot, original } => copies(&container(cli, snapshot)?, original),
        Commands::Config { command } => config(cli, command),
        Commands::Completion { shell } => {
            completion(*shell);
            Ok(())
        }
    }
}

fn container(cli: &Cli, snapshot: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    let snapshot = Snapshot::load(snapshot)?;
    Ok(ServiceContainer::from_snapshot(settings, snapshot))
}

#[instrument]
fn kinds(kind: &str) -> CliResult<()> {
    let allowed = authorize_code(kind).map_err(ApplicationError::from)?;
    output::header(&format!("Copies allowed from '{}':", kind));
    for k in allowed.iter() {
        match k.abbreviation() {
            Some(abbr) => output::detail(&format!("{} ({})", k, abbr)),
            None => output::detail(&k),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer) -> CliResult<()> {
    let tree = container.hierarchy_service().tree()?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn paths(container: &ServiceContainer) -> CliResult<()> {
    for (id, path) in container.hierarchy_service().paths()? {
        output::info(&format!("{}\t{}", id, path));
    }
    Ok(())
}

#[instrument(skip(container))]
fn leaves(container: &ServiceContainer) -> CliResult<()> {
    let tree = container.hierarchy_service().tree()?;
    for leaf in tree.leaves() {
        output::info(&format!("{}\t{}", leaf.id, leaf.label));
    }
    Ok(())
}

#[instrument(skip(container))]
fn move_record(container: &ServiceContainer, id: &str, parent: Option<&str>) -> CliResult<()> {
    let target = parent.unwrap_or(container.settings.root_label.as_str());
    match container.hierarchy_service().validate_move(id, parent) {
        Ok(()) => {
            output::success(&format!("'{}' may be moved under '{}'", id, target));
            Ok(())
        }
        Err(e) => {
            output::failure(&format!("'{}' cannot be moved under '{}'", id, target));
            Err(e.into())
        }
    }
}

#[instrument(skip(container, request))]
fn copy(container: &ServiceContainer, request: &CopyRequest) -> CliResult<()> {
    let record = container.copy_service().create_copy(request)?;
    debug!("copy record: {:?}", record);
    if let Some(details) = &record.copy {
        output::success(&format!("Created {} copy {}", record.copy_kind, details.symbol));
        output::action("Source", &request.source_id);
        output::action("Original", &record.original_id.as_deref().unwrap_or("-"));
        output::action("Signed by", &details.copied_by);
        output::action("Recipients", &details.recipients.join(", "));
    }
    Ok(())
}

#[instrument(skip(container))]
fn copies(container: &ServiceContainer, original: &str) -> CliResult<()> {
    let copies = container.copy_service().copies_of(original)?;
    output::header(&format!("{} copies of '{}':", copies.len(), original));
    for c in copies {
        let symbol = c.copy.as_ref().map(|d| d.symbol.as_str()).unwrap_or("-");
        output::detail(&format!("{}\t{}\t{}", symbol, c.copy_kind, c.id));
    }
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::info(&"no config directory available"),
        },
    }
    Ok(())
}

fn completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
