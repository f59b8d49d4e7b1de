// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Failure taxonomy for command execution.
//!
//! None of these escape the execution lifecycle as `Err`: they are folded into an
//! [`ExecutionOutcome`](crate::exec::ExecutionOutcome) and surfaced as a status.

use thiserror::Error;

/// No usable response was obtained from the activation target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("request to {target} failed: {reason}")]
    Transport { target: String, reason: String },
    #[error("reading response body from {target} failed: {reason}")]
    Body { target: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("could not connect to server")]
    Connectivity,
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("client error {status}: {message}")]
    Client { status: u16, message: String },
    /// Declared HTML that could not be rendered. Degrades to a placeholder message.
    #[error("response declared text/html but has no renderable body")]
    MalformedResponse,
}

impl ExecutionError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if (500..600).contains(&status) {
            Self::Server { status, message }
        } else {
            Self::Client { status, message }
        }
    }
}
