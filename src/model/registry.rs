// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::ops::Bound;

use thiserror::Error;

use super::{Command, Mnemonic};

/// The set of commands currently on the pad, ordered by mnemonic.
///
/// A registry is immutable once built; a keymap reload builds a new one and swaps it in
/// between input episodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: BTreeMap<Mnemonic, Command>,
}

impl CommandRegistry {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();
        for command in commands {
            let mnemonic = command.mnemonic().clone();
            if map.insert(mnemonic.clone(), command).is_some() {
                return Err(RegistryError::DuplicateMnemonic { mnemonic });
            }
        }
        Ok(Self { commands: map })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn get(&self, mnemonic: &str) -> Option<&Command> {
        self.commands.get(mnemonic)
    }

    /// Zero-or-one command whose mnemonic is exactly `mnemonic`.
    pub fn exact(&self, mnemonic: &str) -> Option<&Command> {
        self.get(mnemonic)
    }

    /// Every command whose mnemonic starts with `prefix` (including an exact match).
    pub fn with_prefix(&self, prefix: &str) -> Vec<&Command> {
        self.commands
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(mnemonic, _)| mnemonic.as_str().starts_with(prefix))
            .map(|(_, command)| command)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate mnemonic {mnemonic:?}")]
    DuplicateMnemonic { mnemonic: Mnemonic },
}
