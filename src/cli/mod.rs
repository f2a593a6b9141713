// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::commands::CommandContext;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::util::helper::is_stdout_piped;
use termcolor::{ColorChoice, StandardStream};
use tracing::{debug, instrument, warn};

pub mod args;
pub mod commands;
pub mod completion;
pub mod display;
pub mod error;
pub mod shell;

#[instrument(skip_all)]
pub fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    if cli.generate_config {
        println!("{}", crate::config::generate_default_config());
        return Ok(());
    }
    let command = cli.command.unwrap_or(Commands::Show { is_json: false });
    match command {
        Commands::Serve { bind, data_file } => serve(settings, bind, data_file),
        Commands::Completion { shell } => handle_completion(shell),
        command => {
            let services = ServiceContainer::new(settings, cli.local.as_deref())?;
            let color = if cli.no_color || is_stdout_piped() {
                ColorChoice::Never
            } else {
                ColorChoice::Auto
            };
            run_session(&services, settings, command, color)
        }
    }
}

/// Loads the document, runs the command (or the shell) and waits for pending saves
fn run_session(
    services: &ServiceContainer,
    settings: &Settings,
    command: Commands,
    color: ColorChoice,
) -> CliResult<()> {
    let mut session = services
        .session()
        .map_err(|e| CliError::from(e).context("Failed to open session"))?;
    let mut stdout = StandardStream::stdout(color);

    let result = {
        let mut ctx = CommandContext {
            session: &mut session,
            out: &mut stdout,
            backup_dir: settings.backup_dir_path(),
            assume_yes: false,
        };
        match command {
            Commands::Shell => shell::run_shell(&mut ctx),
            command => commands::run(&mut ctx, command),
        }
    };

    let stats = session.flush();
    debug!("Save queue: {:?}", stats);
    if stats.failed > 0 {
        warn!("{} save(s) failed, changes may not be persisted", stats.failed);
    }
    result
}

fn serve(settings: &Settings, bind: Option<String>, data_file: Option<String>) -> CliResult<()> {
    let mut settings = settings.clone();
    if let Some(bind) = bind {
        settings.bind_addr = bind;
    }
    if let Some(data_file) = data_file {
        settings.data_file = data_file;
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::CommandFailed(format!("Failed to create async runtime: {}", e)))?;
    rt.block_on(crate::server::run_server(&settings))?;
    Ok(())
}

fn handle_completion(shell: String) -> CliResult<()> {
    match shell.to_lowercase().as_str() {
        "bash" => {
            eprintln!("# Outputting bash completion script for navigator");
            eprintln!("# To use, run one of:");
            eprintln!("# - eval \"$(navigator completion bash)\"              # one-time use");
            eprintln!("# - navigator completion bash >> ~/.bashrc             # add to bashrc");
            eprintln!("#");
        }
        "zsh" => {
            eprintln!("# Outputting zsh completion script for navigator");
            eprintln!("# To use, run one of:");
            eprintln!("# - eval \"$(navigator completion zsh)\"               # one-time use");
            eprintln!("# - navigator completion zsh > ~/.zfunc/_navigator     # save to fpath directory");
            eprintln!("#");
        }
        "fish" => {
            eprintln!("# Outputting fish completion script for navigator");
            eprintln!("# To use, run one of:");
            eprintln!("# - navigator completion fish | source                 # one-time use");
            eprintln!("# - navigator completion fish > ~/.config/fish/completions/navigator.fish");
            eprintln!("#");
        }
        _ => {}
    }

    completion::generate_completion(&shell).map_err(|e| {
        CliError::CommandFailed(format!("Failed to generate completion script: {}", e))
    })
}
