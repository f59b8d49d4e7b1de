// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Last lock flag reported by a successful command. Starts unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockStateMirror {
    locked: bool,
}

impl LockStateMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the flag changed.
    pub fn on_succeeded(&mut self, locked: bool) -> bool {
        let changed = self.locked != locked;
        self.locked = locked;
        changed
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
