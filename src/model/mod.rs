// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keys and the registry the resolver queries.

pub mod command;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod registry;

pub use command::{ActivationTarget, Command, Mnemonic, MnemonicError, TargetError};
pub use registry::{CommandRegistry, RegistryError};
