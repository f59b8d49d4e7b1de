// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keystroke-to-command resolution.
//!
//! Typed characters accumulate in an [`InputEpisode`]. A buffer that names exactly one command
//! (and nothing longer) resolves immediately; an ambiguous buffer arms a settle timer and waits
//! for more input. A buffer that matches nothing is dropped together with the key that broke it.
//!
//! The transitions are pure functions over an owned episode; [`KeySequenceResolver`] only holds
//! the current episode and the timer generation counter between calls. Time is passed in, so the
//! settle window can be driven by a virtual clock.

use std::time::Duration;

use tokio::time::Instant;

use super::key::{FocusKind, Key, KeyPress};
use crate::model::{Command, CommandRegistry};

pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(250);

/// Handle for the one settle timer an episode may have outstanding.
///
/// Only the most recently armed timer can fire; older handles are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTimer {
    generation: u64,
    deadline: Instant,
}

impl SettleTimer {
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputEpisode {
    buffer: String,
    timer: Option<SettleTimer>,
}

impl InputEpisode {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn timer(&self) -> Option<SettleTimer> {
        self.timer
    }

    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty() && self.timer.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverAction {
    None,
    /// Escape: buffer and timer are gone, the UI should clear.
    Cancel,
    Resolve(Command),
    /// Typing was attempted while the keyboard is locked; nothing was buffered.
    Locked,
}

/// Everything a key-up transition reads besides the episode itself.
#[derive(Debug, Clone, Copy)]
pub struct KeyContext<'a> {
    pub registry: &'a CommandRegistry,
    pub focus: FocusKind,
    pub locked: bool,
    pub now: Instant,
    pub settle_timeout: Duration,
    /// Generation assigned to a timer armed by this transition.
    pub generation: u64,
}

pub fn key_up(
    mut episode: InputEpisode,
    press: &KeyPress,
    ctx: &KeyContext<'_>,
) -> (InputEpisode, ResolverAction) {
    if press.modifiers.any() || ctx.focus.is_form_input() {
        return (episode, ResolverAction::None);
    }

    let ch = match press.key {
        Key::Named(_) => return (episode, ResolverAction::None),
        Key::Escape => return (InputEpisode::default(), ResolverAction::Cancel),
        Key::Char(ch) => ch,
    };

    if ctx.locked {
        return (episode, ResolverAction::Locked);
    }

    episode.buffer.push(ch);
    episode.timer = None;

    let matches = ctx.registry.with_prefix(&episode.buffer);
    match matches.as_slice() {
        [] => (InputEpisode::default(), ResolverAction::None),
        [only] if only.mnemonic().as_str() == episode.buffer => {
            (InputEpisode::default(), ResolverAction::Resolve((*only).clone()))
        }
        _ => {
            episode.timer = Some(SettleTimer {
                generation: ctx.generation,
                deadline: ctx.now + ctx.settle_timeout,
            });
            (episode, ResolverAction::None)
        }
    }
}

/// The settle timer `timer` fired. Stale timers leave the episode untouched.
pub fn settle(
    episode: InputEpisode,
    timer: SettleTimer,
    registry: &CommandRegistry,
) -> (InputEpisode, ResolverAction) {
    if episode.timer != Some(timer) {
        return (episode, ResolverAction::None);
    }

    match registry.exact(&episode.buffer) {
        Some(command) => (InputEpisode::default(), ResolverAction::Resolve(command.clone())),
        None => (InputEpisode::default(), ResolverAction::None),
    }
}

#[derive(Debug, Clone)]
pub struct KeySequenceResolver {
    episode: InputEpisode,
    settle_timeout: Duration,
    generation: u64,
}

impl Default for KeySequenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_TIMEOUT)
    }
}

impl KeySequenceResolver {
    pub fn new(settle_timeout: Duration) -> Self {
        Self { episode: InputEpisode::default(), settle_timeout, generation: 0 }
    }

    pub fn settle_timeout(&self) -> Duration {
        self.settle_timeout
    }

    pub fn buffer(&self) -> &str {
        self.episode.buffer()
    }

    pub fn episode(&self) -> &InputEpisode {
        &self.episode
    }

    pub fn pending_timer(&self) -> Option<SettleTimer> {
        self.episode.timer()
    }

    pub fn on_key_up(
        &mut self,
        press: &KeyPress,
        focus: FocusKind,
        locked: bool,
        registry: &CommandRegistry,
        now: Instant,
    ) -> ResolverAction {
        self.generation = self.generation.wrapping_add(1);
        let ctx = KeyContext {
            registry,
            focus,
            locked,
            now,
            settle_timeout: self.settle_timeout,
            generation: self.generation,
        };
        let (episode, action) = key_up(std::mem::take(&mut self.episode), press, &ctx);
        self.episode = episode;
        action
    }

    pub fn fire_settle(
        &mut self,
        timer: SettleTimer,
        registry: &CommandRegistry,
    ) -> ResolverAction {
        let (episode, action) = settle(std::mem::take(&mut self.episode), timer, registry);
        self.episode = episode;
        action
    }

    /// Fires the pending settle timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant, registry: &CommandRegistry) -> ResolverAction {
        match self.pending_timer() {
            Some(timer) if timer.deadline <= now => self.fire_settle(timer, registry),
            _ => ResolverAction::None,
        }
    }

    pub fn cancel(&mut self) {
        self.episode = InputEpisode::default();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;
    use tokio::time::Instant;

    use super::{KeySequenceResolver, ResolverAction, DEFAULT_SETTLE_TIMEOUT};
    use crate::input::key::{FocusKind, KeyPress, Modifiers, NamedKey};
    use crate::model::fixtures::registry;
    use crate::model::CommandRegistry;

    fn press(
        resolver: &mut KeySequenceResolver,
        registry: &CommandRegistry,
        ch: char,
        now: Instant,
    ) -> ResolverAction {
        resolver.on_key_up(&KeyPress::char(ch), FocusKind::Document, false, registry, now)
    }

    fn resolved(action: &ResolverAction) -> Option<&str> {
        match action {
            ResolverAction::Resolve(command) => Some(command.mnemonic().as_str()),
            _ => None,
        }
    }

    #[test]
    fn unique_exact_match_resolves_without_delay() {
        let registry = registry(&["a", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let now = Instant::now();

        let action = press(&mut resolver, &registry, 'a', now);
        assert_eq!(resolved(&action), Some("a"));
        assert!(resolver.episode().is_idle());
    }

    #[test]
    fn shared_prefix_waits_for_settle_then_resolves_exact() {
        let registry = registry(&["g", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        assert_eq!(press(&mut resolver, &registry, 'g', t0), ResolverAction::None);
        assert_eq!(resolver.buffer(), "g");

        let almost = t0 + DEFAULT_SETTLE_TIMEOUT - Duration::from_millis(1);
        assert_eq!(resolver.poll(almost, &registry), ResolverAction::None);
        assert_eq!(resolver.buffer(), "g");

        let action = resolver.poll(t0 + DEFAULT_SETTLE_TIMEOUT, &registry);
        assert_eq!(resolved(&action), Some("g"));
        assert!(resolver.episode().is_idle());
    }

    #[test]
    fn longer_exact_match_short_circuits_pending_timer() {
        let registry = registry(&["g", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        press(&mut resolver, &registry, 'g', t0);
        let first_timer = resolver.pending_timer().expect("armed");

        let action = press(&mut resolver, &registry, 's', t0 + Duration::from_millis(100));
        assert_eq!(resolved(&action), Some("gs"));
        assert_eq!(resolver.pending_timer(), None);

        assert_eq!(resolver.fire_settle(first_timer, &registry), ResolverAction::None);
    }

    #[test]
    fn ambiguous_prefix_without_exact_match_resets_silently() {
        let registry = registry(&["gp", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        press(&mut resolver, &registry, 'g', t0);
        assert_eq!(resolver.poll(t0 + DEFAULT_SETTLE_TIMEOUT, &registry), ResolverAction::None);
        assert!(resolver.episode().is_idle());
    }

    #[test]
    fn single_longer_match_still_waits() {
        let registry = registry(&["abc"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        assert_eq!(press(&mut resolver, &registry, 'a', t0), ResolverAction::None);
        assert!(resolver.pending_timer().is_some());
        assert_eq!(press(&mut resolver, &registry, 'b', t0), ResolverAction::None);
        let action = press(&mut resolver, &registry, 'c', t0);
        assert_eq!(resolved(&action), Some("abc"));
    }

    #[test]
    fn new_keystroke_restarts_the_settle_window() {
        let registry = registry(&["g", "gs", "gsx"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        press(&mut resolver, &registry, 'g', t0);
        let t1 = t0 + Duration::from_millis(200);
        press(&mut resolver, &registry, 's', t1);

        assert_eq!(resolver.poll(t0 + DEFAULT_SETTLE_TIMEOUT, &registry), ResolverAction::None);
        assert_eq!(resolver.buffer(), "gs");

        let action = resolver.poll(t1 + DEFAULT_SETTLE_TIMEOUT, &registry);
        assert_eq!(resolved(&action), Some("gs"));
    }

    #[test]
    fn mismatching_key_is_discarded_not_retried() {
        let registry = registry(&["gs", "x"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        press(&mut resolver, &registry, 'g', t0);
        assert_eq!(press(&mut resolver, &registry, 'x', t0), ResolverAction::None);
        assert!(resolver.episode().is_idle());

        let action = press(&mut resolver, &registry, 'x', t0);
        assert_eq!(resolved(&action), Some("x"));
    }

    #[test]
    fn escape_clears_buffer_and_timer_idempotently() {
        let registry = registry(&["g", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        press(&mut resolver, &registry, 'g', t0);
        let timer = resolver.pending_timer().expect("armed");

        let esc = KeyPress::escape();
        let first = resolver.on_key_up(&esc, FocusKind::Document, false, &registry, t0);
        assert_eq!(first, ResolverAction::Cancel);
        let after_first = resolver.episode().clone();
        assert!(after_first.is_idle());

        let second = resolver.on_key_up(&esc, FocusKind::Document, false, &registry, t0);
        assert_eq!(second, ResolverAction::Cancel);
        assert_eq!(resolver.episode(), &after_first);

        assert_eq!(resolver.fire_settle(timer, &registry), ResolverAction::None);
    }

    #[test]
    fn locked_keyboard_does_not_touch_the_buffer() {
        let registry = registry(&["g", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();

        press(&mut resolver, &registry, 'g', t0);
        let before = resolver.episode().clone();

        let action =
            resolver.on_key_up(&KeyPress::char('s'), FocusKind::Document, true, &registry, t0);
        assert_eq!(action, ResolverAction::Locked);
        assert_eq!(resolver.episode(), &before);

        let action = press(&mut resolver, &registry, 's', t0);
        assert_eq!(resolved(&action), Some("gs"));
    }

    #[test]
    fn escape_still_cancels_while_locked() {
        let registry = registry(&["a"]);
        let mut resolver = KeySequenceResolver::default();
        let action = resolver.on_key_up(
            &KeyPress::escape(),
            FocusKind::Document,
            true,
            &registry,
            Instant::now(),
        );
        assert_eq!(action, ResolverAction::Cancel);
    }

    #[rstest]
    #[case::ctrl(Modifiers { ctrl: true, ..Modifiers::NONE })]
    #[case::shift(Modifiers { shift: true, ..Modifiers::NONE })]
    #[case::alt(Modifiers { alt: true, ..Modifiers::NONE })]
    fn modified_keys_are_ignored(#[case] modifiers: Modifiers) {
        let registry = registry(&["a"]);
        let mut resolver = KeySequenceResolver::default();
        let key = KeyPress::char('a').with_modifiers(modifiers);
        let action =
            resolver.on_key_up(&key, FocusKind::Document, false, &registry, Instant::now());
        assert_eq!(action, ResolverAction::None);
        assert!(resolver.episode().is_idle());

        let esc = KeyPress::escape().with_modifiers(modifiers);
        let action =
            resolver.on_key_up(&esc, FocusKind::Document, false, &registry, Instant::now());
        assert_eq!(action, ResolverAction::None);
    }

    #[rstest]
    #[case::text_field(FocusKind::TextField)]
    #[case::select(FocusKind::Select)]
    #[case::text_area(FocusKind::TextArea)]
    fn typing_into_form_inputs_is_ignored(#[case] focus: FocusKind) {
        let registry = registry(&["a"]);
        let mut resolver = KeySequenceResolver::default();
        let action =
            resolver.on_key_up(&KeyPress::char('a'), focus, false, &registry, Instant::now());
        assert_eq!(action, ResolverAction::None);
        assert!(resolver.episode().is_idle());
    }

    #[rstest]
    #[case::shift(NamedKey::Shift)]
    #[case::alt(NamedKey::Alt)]
    #[case::meta(NamedKey::Meta)]
    #[case::control(NamedKey::Control)]
    #[case::backspace(NamedKey::Backspace)]
    #[case::enter(NamedKey::Enter)]
    fn control_keys_leave_pending_input_alone(#[case] key: NamedKey) {
        let registry = registry(&["g", "gs"]);
        let mut resolver = KeySequenceResolver::default();
        let t0 = Instant::now();
        press(&mut resolver, &registry, 'g', t0);
        let before = resolver.episode().clone();

        let action = resolver.on_key_up(
            &KeyPress::named(key),
            FocusKind::Document,
            false,
            &registry,
            t0,
        );
        assert_eq!(action, ResolverAction::None);
        assert_eq!(resolver.episode(), &before);
    }

    #[test]
    fn empty_registry_never_buffers() {
        let registry = CommandRegistry::default();
        let mut resolver = KeySequenceResolver::default();
        assert_eq!(press(&mut resolver, &registry, 'a', Instant::now()), ResolverAction::None);
        assert!(resolver.episode().is_idle());
    }

    #[test]
    fn custom_settle_timeout_is_honoured() {
        let registry = registry(&["g", "gs"]);
        let mut resolver = KeySequenceResolver::new(Duration::from_millis(40));
        let t0 = Instant::now();
        press(&mut resolver, &registry, 'g', t0);
        assert_eq!(
            resolver.pending_timer().map(|timer| timer.deadline()),
            Some(t0 + Duration::from_millis(40))
        );
    }
}
