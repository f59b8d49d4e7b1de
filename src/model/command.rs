// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use smol_str::SmolStr;
use thiserror::Error;

/// The character sequence typed to fire a command.
///
/// Mnemonics are case-sensitive and compared character by character. They only need to be
/// non-empty and free of whitespace/control characters; they do *not* need to be prefix-free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mnemonic(SmolStr);

impl Mnemonic {
    pub fn new(value: impl AsRef<str>) -> Result<Self, MnemonicError> {
        let value = value.as_ref();
        validate_mnemonic(value)?;
        Ok(Self(SmolStr::new(value)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Mnemonic {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Mnemonic {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Mnemonic {
    type Err = MnemonicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MnemonicError {
    #[error("mnemonic must not be empty")]
    Empty,
    #[error("mnemonic {value:?} contains whitespace or a control character")]
    InvalidChar { value: String },
}

fn validate_mnemonic(value: &str) -> Result<(), MnemonicError> {
    if value.is_empty() {
        return Err(MnemonicError::Empty);
    }
    if value.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err(MnemonicError::InvalidChar { value: value.to_owned() });
    }
    Ok(())
}

/// Where a command is invoked: an absolute HTTP(S) URL, POSTed with no body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationTarget(Url);

impl ActivationTarget {
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw).map_err(|err| TargetError::Invalid {
            raw: raw.to_owned(),
            reason: err.to_string(),
        })?;
        Self::from_url(url)
    }

    pub fn from_url(url: Url) -> Result<Self, TargetError> {
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(TargetError::UnsupportedScheme { scheme: other.to_owned() }),
        }
    }

    /// The keys server exposes every key at `POST <server>/trigger/<name>`.
    pub fn trigger(server_url: &Url, mnemonic: &Mnemonic) -> Result<Self, TargetError> {
        let mut url = server_url.clone();
        url.path_segments_mut()
            .map_err(|()| TargetError::Invalid {
                raw: server_url.to_string(),
                reason: "server url cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .push("trigger")
            .push(mnemonic.as_str());
        Self::from_url(url)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ActivationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("invalid activation target {raw:?}: {reason}")]
    Invalid { raw: String, reason: String },
    #[error("unsupported activation target scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { scheme: String },
}

/// A key on the pad: what to type, where to send it, and how to label it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    mnemonic: Mnemonic,
    target: ActivationTarget,
    label: Option<String>,
    initial_state: String,
}

impl Command {
    pub fn new(mnemonic: Mnemonic, target: ActivationTarget) -> Self {
        Self { mnemonic, target, label: None, initial_state: String::new() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.trim().is_empty() { None } else { Some(label) };
        self
    }

    pub fn with_initial_state(mut self, state: impl Into<String>) -> Self {
        self.initial_state = state.into();
        self
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn target(&self) -> &ActivationTarget {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label shown next to the key before the server reports a state of its own.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn display_label(&self) -> &str {
        self.label().unwrap_or(self.mnemonic.as_str())
    }
}
