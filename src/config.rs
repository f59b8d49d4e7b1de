// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `keypad.toml`: server location, timing, and the keymap.
//!
//! ```toml
//! server_url = "http://127.0.0.1:8080"
//! settle_timeout_ms = 250
//! presentation_delay_ms = 500
//!
//! [[keys]]
//! mnemonic = "gs"
//! label = "Garage: status"
//!
//! [[keys]]
//! mnemonic = "l"
//! target = "http://lights.local/toggle"
//! state = "off"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exec::DEFAULT_PRESENTATION_DELAY;
use crate::input::{DEFAULT_SETTLE_TIMEOUT, EDIT_KEY};
use crate::model::{
    ActivationTarget, Command, CommandRegistry, Mnemonic, MnemonicError, RegistryError,
    TargetError,
};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const CONFIG_FILE_NAME: &str = "keypad.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid server_url {value:?}: {reason}")]
    InvalidServerUrl { value: String, reason: String },
    #[error("invalid key mnemonic: {0}")]
    InvalidMnemonic(#[from] MnemonicError),
    #[error("invalid target for key {mnemonic:?}: {source}")]
    InvalidTarget {
        mnemonic: String,
        #[source]
        source: TargetError,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Settle and presentation delays, shared by the resolver and the execution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub settle_timeout: Duration,
    pub presentation_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            presentation_delay: DEFAULT_PRESENTATION_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyEntry {
    pub mnemonic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Absolute URL; defaults to `<server_url>/trigger/<mnemonic>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeypadConfig {
    pub server_url: String,
    pub settle_timeout_ms: u64,
    pub presentation_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    pub keys: Vec<KeyEntry>,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            settle_timeout_ms: duration_ms(DEFAULT_SETTLE_TIMEOUT),
            presentation_delay_ms: duration_ms(DEFAULT_PRESENTATION_DELAY),
            request_timeout_ms: None,
            keys: Vec::new(),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl KeypadConfig {
    /// `<config_dir>/keypad/keypad.toml`, when the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keypad").join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(&contents, path)
    }

    /// Like [`KeypadConfig::load`], but a missing file yields the defaults and an empty keymap.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "config not found; using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn with_server_url(mut self, server_url: Option<String>) -> Self {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
        }
        self
    }

    pub fn timing(&self) -> Timing {
        Timing {
            settle_timeout: Duration::from_millis(self.settle_timeout_ms),
            presentation_delay: Duration::from_millis(self.presentation_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn server_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.server_url).map_err(|err| ConfigError::InvalidServerUrl {
            value: self.server_url.clone(),
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidServerUrl {
                value: self.server_url.clone(),
                reason: format!("unsupported scheme {other:?}"),
            }),
        }
    }

    pub fn registry(&self) -> Result<CommandRegistry, ConfigError> {
        let server_url = self.server_url()?;
        let mut commands = Vec::with_capacity(self.keys.len());
        for entry in &self.keys {
            commands.push(entry.command(&server_url)?);
        }
        Ok(CommandRegistry::new(commands)?)
    }
}

impl KeyEntry {
    fn command(&self, server_url: &Url) -> Result<Command, ConfigError> {
        let mnemonic = Mnemonic::new(&self.mnemonic)?;
        if mnemonic.as_str().contains(EDIT_KEY) {
            tracing::warn!(
                %mnemonic,
                "mnemonic contains the edit key and cannot be typed; it can still be clicked"
            );
        }

        let target = match self.target.as_deref() {
            Some(raw) => ActivationTarget::parse(raw),
            None => ActivationTarget::trigger(server_url, &mnemonic),
        }
        .map_err(|source| ConfigError::InvalidTarget { mnemonic: self.mnemonic.clone(), source })?;

        let mut command = Command::new(mnemonic, target);
        if let Some(label) = &self.label {
            command = command.with_label(label.clone());
        }
        if let Some(state) = &self.state {
            command = command.with_initial_state(state.clone());
        }
        Ok(command)
    }
}
