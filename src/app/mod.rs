// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The keypad controller: input, activation and status, wired together.
//!
//! [`Keypad`] is driven from a single event loop. It never touches a terminal or a page
//! directly; everything the user should see leaves through a [`ViewSink`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::Timing;
use crate::exec::{ExecutionLifecycle, Invoker, LifecycleEvent, RequestToken};
use crate::input::{route, FocusKind, KeyPress, KeySequenceResolver, ResolverAction, Route};
use crate::model::{Command, CommandRegistry, Mnemonic};
use crate::status::{present, LockStateMirror, StatusEvent, StatusView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEffect {
    /// Replace the status slot wholesale.
    Status(StatusView),
    StateLabel { mnemonic: Mnemonic, label: String },
    /// Show or hide lock-dependent regions.
    Locked(bool),
    /// Escape: dismiss whatever transient UI the host has open.
    Cancel,
    /// The edit key: hand the keymap to the user for editing.
    SubmitEdit,
}

pub trait ViewSink {
    fn apply(&mut self, effect: ViewEffect);
}

impl ViewSink for Vec<ViewEffect> {
    fn apply(&mut self, effect: ViewEffect) {
        self.push(effect);
    }
}

pub struct Keypad {
    registry: CommandRegistry,
    resolver: KeySequenceResolver,
    lock: LockStateMirror,
    lifecycle: ExecutionLifecycle,
    events: mpsc::UnboundedReceiver<LifecycleEvent>,
    status: StatusView,
}

impl Keypad {
    pub fn new(
        registry: CommandRegistry,
        timing: Timing,
        invoker: Arc<dyn Invoker>,
        runtime: Handle,
    ) -> Self {
        let (lifecycle, events) =
            ExecutionLifecycle::new(invoker, timing.presentation_delay, runtime);
        Self {
            registry,
            resolver: KeySequenceResolver::new(timing.settle_timeout),
            lock: LockStateMirror::new(),
            lifecycle,
            events,
            status: StatusView::idle(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Swaps the keymap. Any half-typed mnemonic is dropped.
    pub fn replace_registry(&mut self, registry: CommandRegistry) {
        self.resolver.cancel();
        self.registry = registry;
        tracing::info!(keys = self.registry.len(), "keymap replaced");
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn buffer(&self) -> &str {
        self.resolver.buffer()
    }

    /// When [`Keypad::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.resolver.pending_timer().map(|timer| timer.deadline())
    }

    pub fn handle_key(&mut self, press: &KeyPress, focus: FocusKind, sink: &mut dyn ViewSink) {
        if route(press, focus) == Route::SubmitEdit {
            tracing::debug!("edit key pressed");
            sink.apply(ViewEffect::SubmitEdit);
            return;
        }

        let action = self.resolver.on_key_up(
            press,
            focus,
            self.lock.is_locked(),
            &self.registry,
            Instant::now(),
        );
        self.apply_action(action, sink);
    }

    /// Pointer-style activation: bypasses the buffer and the keyboard lock.
    pub fn click(&mut self, mnemonic: &str, sink: &mut dyn ViewSink) -> Option<RequestToken> {
        let Some(command) = self.registry.get(mnemonic).cloned() else {
            tracing::debug!(mnemonic, "click on unknown key");
            return None;
        };
        Some(self.activate(&command, sink))
    }

    pub fn tick(&mut self, now: Instant, sink: &mut dyn ViewSink) {
        let action = self.resolver.poll(now, &self.registry);
        self.apply_action(action, sink);
    }

    /// Applies every lifecycle event received so far, in arrival order.
    pub fn drain(&mut self, sink: &mut dyn ViewSink) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event, sink);
        }
    }

    /// Applies events until `token` has fully completed and returns the status it left behind.
    ///
    /// Used by hosts without an event loop of their own.
    pub async fn wait_for(&mut self, token: RequestToken, sink: &mut dyn ViewSink) -> StatusView {
        while let Some(event) = self.events.recv().await {
            let done = event.token() == token && matches!(event, LifecycleEvent::StateLabel { .. });
            self.apply_event(event, sink);
            if done {
                break;
            }
        }
        self.status.clone()
    }

    fn apply_action(&mut self, action: ResolverAction, sink: &mut dyn ViewSink) {
        match action {
            ResolverAction::None => {}
            ResolverAction::Cancel => {
                sink.apply(ViewEffect::Cancel);
                self.show(&StatusEvent::Cleared, sink);
            }
            ResolverAction::Locked => {
                tracing::debug!("keystroke ignored while locked");
                self.show(&StatusEvent::Locked, sink);
            }
            ResolverAction::Resolve(command) => {
                self.activate(&command, sink);
            }
        }
    }

    fn activate(&mut self, command: &Command, sink: &mut dyn ViewSink) -> RequestToken {
        let token = self.lifecycle.activate(command);
        self.drain(sink);
        token
    }

    fn apply_event(&mut self, event: LifecycleEvent, sink: &mut dyn ViewSink) {
        match event {
            LifecycleEvent::Started { .. } => self.show(&StatusEvent::Started, sink),
            LifecycleEvent::Succeeded { token, message, locked, .. } => {
                if self.lock.on_succeeded(locked) {
                    tracing::info!(%token, locked, "keyboard lock changed");
                }
                sink.apply(ViewEffect::Locked(locked));
                self.show(&StatusEvent::Succeeded { message }, sink);
            }
            LifecycleEvent::Failed { http_status, message, .. } => {
                self.show(&StatusEvent::Failed { http_status, message }, sink);
            }
            LifecycleEvent::StateLabel { mnemonic, label, .. } => {
                sink.apply(ViewEffect::StateLabel { mnemonic, label });
            }
        }
    }

    fn show(&mut self, event: &StatusEvent, sink: &mut dyn ViewSink) {
        self.status = present(event);
        sink.apply(ViewEffect::Status(self.status.clone()));
    }
}
