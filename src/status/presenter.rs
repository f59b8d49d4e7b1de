// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pure mapping from the latest status event to what the status slot shows.

use std::fmt;

use serde::Serialize;

use crate::exec::SERVICE_UNAVAILABLE_MESSAGE;

pub const RUNNING_MESSAGE: &str = "Running…";
pub const LOCKED_MESSAGE: &str = "The keyboard is locked.";
pub const DONE_MESSAGE: &str = "Done!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Started,
    Locked,
    Succeeded { message: String },
    Failed { http_status: u16, message: String },
    Cleared,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    #[default]
    Idle,
    Start,
    Success,
    Fail,
    Locked,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Start => "start",
            Self::Success => "success",
            Self::Fail => "fail",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    #[default]
    None,
    Wait,
    Lock,
    Star,
    Skull,
}

impl IconKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wait => "wait",
            Self::Lock => "lock",
            Self::Star => "star",
            Self::Skull => "skull",
        }
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The whole status slot. Hosts rebuild their rendering from this on every change.
///
/// `message` may carry HTML from a server response; sanitizing it is the host's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StatusView {
    pub kind: StatusKind,
    pub message: String,
    pub icon: IconKind,
}

impl StatusView {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.kind == StatusKind::Idle
    }
}

pub fn present(event: &StatusEvent) -> StatusView {
    match event {
        StatusEvent::Started => StatusView {
            kind: StatusKind::Start,
            message: RUNNING_MESSAGE.to_owned(),
            icon: IconKind::Wait,
        },
        StatusEvent::Locked => StatusView {
            kind: StatusKind::Locked,
            message: LOCKED_MESSAGE.to_owned(),
            icon: IconKind::Lock,
        },
        StatusEvent::Succeeded { message } => StatusView {
            kind: StatusKind::Success,
            message: if message.is_empty() { DONE_MESSAGE.to_owned() } else { message.clone() },
            icon: IconKind::Star,
        },
        StatusEvent::Failed { http_status, message } => StatusView {
            kind: StatusKind::Fail,
            message: if *http_status < 500 {
                message.clone()
            } else {
                SERVICE_UNAVAILABLE_MESSAGE.to_owned()
            },
            icon: IconKind::Skull,
        },
        StatusEvent::Cleared => StatusView::idle(),
    }
}
