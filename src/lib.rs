// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keypad: a keyboard-driven remote control for HTTP-triggered commands.
//!
//! Typed mnemonics are resolved against a [`model::CommandRegistry`], activations run through
//! [`exec::ExecutionLifecycle`], and [`app::Keypad`] turns the results into view effects for a
//! host such as the terminal UI in [`tui`].

pub mod app;
pub mod config;
pub mod error;
pub mod exec;
pub mod input;
pub mod logging;
pub mod model;
pub mod status;
pub mod tui;
