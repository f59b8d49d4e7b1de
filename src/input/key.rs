// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// Keys that do not produce a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Shift,
    Alt,
    Meta,
    Control,
    Backspace,
    Enter,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Named(NamedKey),
}

/// The modifiers that reserve a keystroke for terminal/OS shortcuts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { ctrl: false, shift: false, alt: false };

    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn char(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::NONE)
    }

    pub fn escape() -> Self {
        Self::new(Key::Escape, Modifiers::NONE)
    }

    pub fn named(key: NamedKey) -> Self {
        Self::new(Key::Named(key), Modifiers::NONE)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What kind of element had focus when the key arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FocusKind {
    #[default]
    Document,
    TextField,
    Select,
    TextArea,
}

impl FocusKind {
    pub fn is_form_input(self) -> bool {
        matches!(self, Self::TextField | Self::Select | Self::TextArea)
    }
}

impl From<KeyEvent> for KeyPress {
    fn from(event: KeyEvent) -> Self {
        let modifiers = Modifiers {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        };
        let key = match event.code {
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Named(NamedKey::Backspace),
            KeyCode::Enter => Key::Named(NamedKey::Enter),
            KeyCode::Tab | KeyCode::BackTab => Key::Named(NamedKey::Tab),
            KeyCode::Up => Key::Named(NamedKey::Up),
            KeyCode::Down => Key::Named(NamedKey::Down),
            KeyCode::Left => Key::Named(NamedKey::Left),
            KeyCode::Right => Key::Named(NamedKey::Right),
            KeyCode::Home => Key::Named(NamedKey::Home),
            KeyCode::End => Key::Named(NamedKey::End),
            KeyCode::PageUp => Key::Named(NamedKey::PageUp),
            KeyCode::PageDown => Key::Named(NamedKey::PageDown),
            KeyCode::Insert => Key::Named(NamedKey::Insert),
            KeyCode::Delete => Key::Named(NamedKey::Delete),
            KeyCode::F(n) => Key::Named(NamedKey::F(n)),
            KeyCode::Modifier(modifier) => Key::Named(match modifier {
                ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => NamedKey::Shift,
                ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => NamedKey::Alt,
                ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => NamedKey::Control,
                ModifierKeyCode::LeftMeta
                | ModifierKeyCode::RightMeta
                | ModifierKeyCode::LeftSuper
                | ModifierKeyCode::RightSuper => NamedKey::Meta,
                _ => NamedKey::Other,
            }),
            _ => Key::Named(NamedKey::Other),
        };
        Self { key, modifiers }
    }
}
