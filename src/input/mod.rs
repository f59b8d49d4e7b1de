// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyboard input: key model, pass-through routing, and mnemonic resolution.

pub mod key;
pub mod resolver;
pub mod router;

pub use key::{FocusKind, Key, KeyPress, Modifiers, NamedKey};
pub use resolver::{
    InputEpisode, KeySequenceResolver, ResolverAction, SettleTimer, DEFAULT_SETTLE_TIMEOUT,
};
pub use router::{route, Route, EDIT_KEY};
