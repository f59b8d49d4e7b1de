// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use keypad::exec::RawResponse;
use keypad::model::{ActivationTarget, Command, CommandRegistry, Mnemonic};

const ALPHABET: &[u8] = b"abcdfghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// A handful of one- and two-letter keys.
    Small,
    /// Two-letter keys sharing every first letter.
    DensePrefixes,
    /// Three-letter keys; most typed prefixes stay ambiguous for two strokes.
    Deep,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::DensePrefixes => "dense_prefixes",
            Self::Deep => "deep",
        }
    }

    fn mnemonics(self) -> Vec<String> {
        match self {
            Self::Small => {
                ["a", "b", "gs", "gx", "l", "m"].iter().map(|s| (*s).to_owned()).collect()
            }
            Self::DensePrefixes => combinations(2),
            Self::Deep => combinations(3).into_iter().step_by(7).collect(),
        }
    }
}

fn combinations(len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    for _ in 0..len {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                ALPHABET.iter().map(move |ch| {
                    let mut next = prefix.clone();
                    next.push(char::from(*ch));
                    next
                })
            })
            .collect();
    }
    out
}

pub fn registry(case: Case) -> CommandRegistry {
    let commands = case.mnemonics().into_iter().map(|value| {
        let mnemonic = Mnemonic::new(&value).expect("mnemonic");
        let target = ActivationTarget::parse(&format!("http://bench.test/trigger/{value}"))
            .expect("target");
        Command::new(mnemonic, target)
    });
    CommandRegistry::new(commands).expect("registry")
}

/// Every mnemonic in the registry, in order, as one keystroke stream.
pub fn keystrokes(registry: &CommandRegistry) -> Vec<char> {
    registry.iter().flat_map(|command| command.mnemonic().as_str().chars()).collect()
}

pub fn html_response(paragraphs: usize) -> RawResponse {
    let mut body = String::from("<!DOCTYPE html><html><head><title>r</title></head><body>");
    for idx in 0..paragraphs {
        body.push_str(&format!("<p>line {idx} <b>ok</b></p>"));
    }
    body.push_str("</body></html>");
    RawResponse::new(200, body).with_content_type("text/html; charset=utf-8").with_locked("0")
}
