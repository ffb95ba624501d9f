// coho-rs: Multi-Repository Release Coordinator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::try_parse() --> ConfigLoader --> Logging --> Workspace --> Command Dispatch
//!   list-repos | repo-* | foreach | *-release* | print-tags | last-week
//! ```

use std::path::Path;
use std::process::ExitCode;

use clap::error::ErrorKind;
use coho_rs::cli::global::GlobalOptions;
use coho_rs::cli::{self, Command};
use coho_rs::cmd::Workspace;
use coho_rs::cmd::list::{run_inis_command, run_list_repos_command, run_options_command};
use coho_rs::cmd::log::run_last_week_command;
use coho_rs::cmd::release::{
    run_list_release_urls_command, run_prepare_release_branch_command, run_print_tags_command,
    run_tag_release_command,
};
use coho_rs::cmd::repo::{
    run_clone_command, run_foreach_command, run_push_command, run_reset_command,
    run_status_command, run_update_command,
};
use coho_rs::config::{CONFIG_FILE_NAME, Config};
use coho_rs::config::loader::ConfigLoader;
use coho_rs::error::{self, Result};
use coho_rs::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(error::EXIT_USAGE),
            };
        }
    };

    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::from(error::EXIT_USAGE);
    };

    match run(&cli, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            error::exit_code(&e)
        }
    }
}

async fn run(cli: &cli::Cli, command: &Command) -> Result<()> {
    if matches!(command, Command::Version) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let root = cli.global.workspace_root();
    let loader = build_config_loader(&cli.global, &root)?;
    if matches!(command, Command::Inis) {
        run_inis_command(&loader.format_loaded_files());
        return Ok(());
    }
    let config = loader.build()?;
    let _log_guard = start_logging(&config)?;

    dispatch_command(command, config, &root).await
}

async fn dispatch_command(command: &Command, config: Config, root: &Path) -> Result<()> {
    if matches!(command, Command::Options) {
        run_options_command(&config);
        return Ok(());
    }

    let ws = Workspace::new(config, root);
    match command {
        Command::ListRepos => run_list_repos_command(&ws.registry)?,
        Command::RepoClone(args) => run_clone_command(&ws, args).await?,
        Command::RepoUpdate(args) => run_update_command(&ws, args).await?,
        Command::RepoStatus(args) => run_status_command(&ws, args).await?,
        Command::RepoReset(args) => run_reset_command(&ws, args).await?,
        Command::RepoPush(args) => run_push_command(&ws, args).await?,
        Command::Foreach(args) => run_foreach_command(&ws, args).await?,
        Command::PrepareReleaseBranch(args) => {
            run_prepare_release_branch_command(&ws, args).await?;
        }
        Command::TagRelease(args) => run_tag_release_command(&ws, args).await?,
        Command::PrintTags(args) => run_print_tags_command(&ws, args).await?,
        Command::ListReleaseUrls(args) => run_list_release_urls_command(&ws, args).await?,
        Command::LastWeek(args) => run_last_week_command(&ws, args).await?,
        Command::Version | Command::Options | Command::Inis => {}
    }
    Ok(())
}

fn build_config_loader(global: &GlobalOptions, root: &Path) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader
        .add_toml_file_optional(root.join(CONFIG_FILE_NAME))
        .with_env_prefix("COHO");
    for spec in global.to_config_overrides() {
        loader = loader.apply_override(&spec)?;
    }
    Ok(loader)
}

fn start_logging(config: &Config) -> Result<LogGuard> {
    let log_config = LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .with_file_format(config.global.log_format)
        .build();
    init_logging(&log_config)
}
