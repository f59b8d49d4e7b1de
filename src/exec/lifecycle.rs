// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command activation: `Started`, a deliberate pause, the remote call, one terminal event.
//!
//! Every activation emits, in order: `Started` (synchronously, from
//! [`ExecutionLifecycle::activate`]), exactly one of `Succeeded`/`Failed`, then `StateLabel`.
//! The last two are sent by a drop guard so they are delivered even if the request task panics
//! or is torn down with the runtime.
//! Overlapping activations are not serialized; their terminal events arrive in completion order.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::invoker::Invoker;
use super::response::{classify, Classified, ExecutionOutcome};
use crate::error::ExecutionError;
use crate::model::{Command, Mnemonic};

pub const DEFAULT_PRESENTATION_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub token: RequestToken,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Started {
        token: RequestToken,
        mnemonic: Mnemonic,
    },
    Succeeded {
        token: RequestToken,
        mnemonic: Mnemonic,
        message: String,
        locked: bool,
        server_state: String,
    },
    Failed {
        token: RequestToken,
        mnemonic: Mnemonic,
        http_status: u16,
        message: String,
    },
    /// Side channel back to the key itself; independent of the status view.
    StateLabel {
        token: RequestToken,
        mnemonic: Mnemonic,
        label: String,
    },
}

impl LifecycleEvent {
    pub fn token(&self) -> RequestToken {
        match self {
            Self::Started { token, .. }
            | Self::Succeeded { token, .. }
            | Self::Failed { token, .. }
            | Self::StateLabel { token, .. } => *token,
        }
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        match self {
            Self::Started { mnemonic, .. }
            | Self::Succeeded { mnemonic, .. }
            | Self::Failed { mnemonic, .. }
            | Self::StateLabel { mnemonic, .. } => mnemonic,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    fn terminal(token: RequestToken, mnemonic: Mnemonic, outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Success { message, locked, server_state } => {
                Self::Succeeded { token, mnemonic, message, locked, server_state }
            }
            ExecutionOutcome::Failure { http_status, message } => {
                Self::Failed { token, mnemonic, http_status, message }
            }
            ExecutionOutcome::ConnectivityError { message } => {
                Self::Failed { token, mnemonic, http_status: 0, message }
            }
        }
    }
}

pub struct ExecutionLifecycle {
    invoker: Arc<dyn Invoker>,
    presentation_delay: Duration,
    next_token: u64,
    events: mpsc::UnboundedSender<LifecycleEvent>,
    runtime: Handle,
}

impl fmt::Debug for ExecutionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionLifecycle")
            .field("presentation_delay", &self.presentation_delay)
            .field("next_token", &self.next_token)
            .finish_non_exhaustive()
    }
}

impl ExecutionLifecycle {
    pub fn new(
        invoker: Arc<dyn Invoker>,
        presentation_delay: Duration,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<LifecycleEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let lifecycle = Self { invoker, presentation_delay, next_token: 0, events, runtime };
        (lifecycle, receiver)
    }

    pub fn presentation_delay(&self) -> Duration {
        self.presentation_delay
    }

    /// Fire-and-forget. `Started` is queued before this returns; the rest follows on the
    /// runtime.
    pub fn activate(&mut self, command: &Command) -> RequestToken {
        self.next_token = self.next_token.wrapping_add(1);
        let request =
            ExecutionRequest { token: RequestToken(self.next_token), command: command.clone() };
        let token = request.token;

        tracing::info!(
            %token,
            mnemonic = %command.mnemonic(),
            target = %command.target(),
            "activating command"
        );
        let _ = self.events.send(LifecycleEvent::Started {
            token,
            mnemonic: command.mnemonic().clone(),
        });

        let report = CompletionReport::new(self.events.clone(), &request);
        self.runtime.spawn(execute(
            self.invoker.clone(),
            self.presentation_delay,
            request,
            report,
        ));
        token
    }
}

async fn execute(
    invoker: Arc<dyn Invoker>,
    delay: Duration,
    request: ExecutionRequest,
    mut report: CompletionReport,
) {
    tokio::time::sleep(delay).await;

    let target = request.command.target();
    let classified = match invoker.invoke(target).await {
        Ok(response) => classify(response),
        Err(err) => {
            tracing::warn!(token = %request.token, error = %err, "command unreachable");
            Classified {
                outcome: ExecutionOutcome::connectivity(),
                state_label: String::new(),
                malformed: false,
            }
        }
    };

    match classified.error() {
        None => tracing::info!(token = %request.token, "command succeeded"),
        Some(err @ ExecutionError::MalformedResponse) => {
            tracing::warn!(token = %request.token, %target, error = %err, "showing placeholder")
        }
        Some(err) => tracing::warn!(token = %request.token, error = %err, "command failed"),
    }

    report.complete(classified.outcome, classified.state_label);
}

/// Delivers the terminal event and the state label exactly once, on drop.
struct CompletionReport {
    events: mpsc::UnboundedSender<LifecycleEvent>,
    token: RequestToken,
    mnemonic: Mnemonic,
    outcome: Option<ExecutionOutcome>,
    label: String,
}

impl CompletionReport {
    fn new(events: mpsc::UnboundedSender<LifecycleEvent>, request: &ExecutionRequest) -> Self {
        Self {
            events,
            token: request.token,
            mnemonic: request.command.mnemonic().clone(),
            outcome: None,
            label: String::new(),
        }
    }

    fn complete(&mut self, outcome: ExecutionOutcome, label: String) {
        self.outcome = Some(outcome);
        self.label = label;
    }
}

impl Drop for CompletionReport {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(ExecutionOutcome::connectivity);
        let _ = self.events.send(LifecycleEvent::terminal(
            self.token,
            self.mnemonic.clone(),
            outcome,
        ));
        let _ = self.events.send(LifecycleEvent::StateLabel {
            token: self.token,
            mnemonic: self.mnemonic.clone(),
            label: std::mem::take(&mut self.label),
        });
    }
}
