// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{ActivationTarget, Command, CommandRegistry, Mnemonic};

pub(crate) const FIXTURE_SERVER: &str = "http://keys.test";

pub(crate) fn mnemonic(value: &str) -> Mnemonic {
    Mnemonic::new(value).expect("mnemonic")
}

pub(crate) fn command(value: &str) -> Command {
    let target = ActivationTarget::parse(&format!("{FIXTURE_SERVER}/trigger/{value}"))
        .expect("activation target");
    Command::new(mnemonic(value), target).with_label(format!("Key {value}"))
}

pub(crate) fn registry(mnemonics: &[&str]) -> CommandRegistry {
    CommandRegistry::new(mnemonics.iter().map(|value| command(value))).expect("registry")
}
