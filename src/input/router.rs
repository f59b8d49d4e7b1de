// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::key::{FocusKind, Key, KeyPress};

/// Opens the keymap editor. Matched before mnemonics, so it can never be one.
pub const EDIT_KEY: char = 'E';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SubmitEdit,
    Resolver,
}

pub fn route(press: &KeyPress, focus: FocusKind) -> Route {
    if focus.is_form_input() {
        return Route::Resolver;
    }
    match press.key {
        Key::Char(EDIT_KEY) => Route::SubmitEdit,
        _ => Route::Resolver,
    }
}
