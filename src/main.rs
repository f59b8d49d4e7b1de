// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keypad CLI entrypoint.
//!
//! By default this runs the interactive TUI. `keys` lists the keymap and `fire` runs a single
//! key without a terminal UI.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use keypad::app::{Keypad, ViewEffect};
use keypad::config::KeypadConfig;
use keypad::exec::HttpInvoker;
use keypad::logging::{self, LogTarget};
use keypad::model::CommandRegistry;
use keypad::status::StatusKind;
use keypad::tui::{self, KeymapSource};

#[derive(Debug, Parser)]
#[command(name = "keypad")]
#[command(about = "Keyboard remote control for HTTP-triggered commands")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Keymap file. Defaults to <config dir>/keypad/keypad.toml
    #[arg(long, global = true, env = "KEYPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL for keys without an explicit target
    #[arg(long, global = true, env = "KEYPAD_SERVER_URL")]
    server_url: Option<String>,

    /// Log filter (trace, debug, info, warn, error, or RUST_LOG syntax). Defaults to RUST_LOG,
    /// then info
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log file for the TUI. Defaults to <cache dir>/keypad/keypad.log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Commands {
    /// Run the interactive keypad (default)
    Run,
    /// List the configured keys
    Keys,
    /// Run one key and print its final status
    Fire {
        mnemonic: String,
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    #[error("{0}")]
    Tui(String),
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("keypad: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn Error>> {
    let log_target = match cli.command {
        None | Some(Commands::Run) => {
            cli.log_file.clone().map(LogTarget::File).unwrap_or_else(LogTarget::default_file)
        }
        Some(_) => LogTarget::Stderr,
    };
    logging::init(cli.log_level.as_deref(), &log_target)?;

    let config_path = cli.config.clone().or_else(KeypadConfig::default_path);
    let config = match &config_path {
        Some(path) => KeypadConfig::load_or_default(path)?,
        None => KeypadConfig::default(),
    }
    .with_server_url(cli.server_url.clone());
    let registry = config.registry()?;
    tracing::debug!(keys = registry.len(), config = ?config_path, "keymap loaded");

    match cli.command {
        Some(Commands::Keys) => {
            print_keys(&registry);
            Ok(0)
        }
        Some(Commands::Fire { mnemonic, json }) => fire(config, registry, &mnemonic, json),
        None | Some(Commands::Run) => {
            let keymap =
                config_path.map(|path| KeymapSource { path, server_url: cli.server_url.clone() });
            run_tui(config, registry, keymap)?;
            Ok(0)
        }
    }
}

fn print_keys(registry: &CommandRegistry) {
    let width = registry.iter().map(|command| command.mnemonic().char_len()).max().unwrap_or(0);
    for command in registry.iter() {
        println!(
            "{:<width$}  {}  {}",
            command.mnemonic().as_str(),
            command.display_label(),
            command.target()
        );
    }
}

fn invoker(config: &KeypadConfig) -> Arc<HttpInvoker> {
    Arc::new(HttpInvoker::default().with_timeout(config.request_timeout()))
}

fn fire(
    config: KeypadConfig,
    registry: CommandRegistry,
    mnemonic: &str,
    json: bool,
) -> Result<i32, Box<dyn Error>> {
    if registry.get(mnemonic).is_none() {
        return Err(Box::new(CliError::UnknownKey(mnemonic.to_owned())));
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let (view, state) = runtime.block_on(async {
        let handle = tokio::runtime::Handle::current();
        let mut keypad = Keypad::new(registry, config.timing(), invoker(&config), handle);
        let mut effects = Vec::new();
        let Some(token) = keypad.click(mnemonic, &mut effects) else {
            return Err(CliError::UnknownKey(mnemonic.to_owned()));
        };
        let view = keypad.wait_for(token, &mut effects).await;
        let state = effects.into_iter().rev().find_map(|effect| match effect {
            ViewEffect::StateLabel { label, .. } => Some(label),
            _ => None,
        });
        Ok((view, state.unwrap_or_default()))
    })?;

    if json {
        println!("{}", serde_json::to_string(&view)?);
    } else {
        println!("{}: {}", view.kind, view.message);
        if !state.is_empty() {
            println!("state: {state}");
        }
    }

    Ok(if view.kind == StatusKind::Success { 0 } else { 1 })
}

fn run_tui(
    config: KeypadConfig,
    registry: CommandRegistry,
    keymap: Option<KeymapSource>,
) -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(async move {
        let handle = tokio::runtime::Handle::current();
        let keypad = Keypad::new(registry, config.timing(), invoker(&config), handle);

        let tui_join = tokio::task::spawn_blocking(move || {
            tui::run(keypad, keymap).map_err(|err| err.to_string())
        })
        .await;

        let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
        tui_result.map_err(|err| Box::new(CliError::Tui(err)) as Box<dyn Error>)?;
        Ok::<(), Box<dyn Error>>(())
    })?;

    tracing::info!("keypad exited");
    Ok(())
}
