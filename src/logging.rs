// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Subscriber setup. The TUI owns the terminal, so interactive runs log to a file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// `<cache_dir>/keypad/keypad.log`; stderr when the platform has no cache directory.
    pub fn default_file() -> Self {
        match dirs::cache_dir() {
            Some(dir) => Self::File(dir.join("keypad").join("keypad.log")),
            None => Self::Stderr,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {reason}")]
    InvalidFilter { directive: String, reason: String },
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// An explicit `level` wins over `RUST_LOG`; neither means [`DEFAULT_LEVEL`].
pub fn env_filter(level: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match level {
        Some(directive) => EnvFilter::try_new(directive).map_err(|err| {
            LoggingError::InvalidFilter { directive: directive.to_owned(), reason: err.to_string() }
        }),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))),
    }
}

pub fn init(level: Option<&str>, target: &LogTarget) -> Result<(), LoggingError> {
    let filter = env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match target {
        LogTarget::Stderr => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .compact()
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))?;

    if let LogTarget::File(path) = target {
        tracing::info!(log_path = %path.display(), "logging initialized");
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open = || -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };
    open().map_err(|source| LoggingError::Open { path: path.to_path_buf(), source })
}
