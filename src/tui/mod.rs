// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts a [`Keypad`] in a ratatui + crossterm shell: a key list, a lock banner, and a
//! status line, redrawn from the controller's effects every frame.

use std::{
    collections::BTreeMap,
    env,
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    process::Command as Process,
    sync::OnceLock,
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use regex::Regex;
use tokio::time::Instant;

use crate::app::{Keypad, ViewEffect, ViewSink};
use crate::config::KeypadConfig;
use crate::input::{FocusKind, KeyPress};
use crate::model::{Command, CommandRegistry, Mnemonic};
use crate::status::{IconKind, StatusKind, StatusView, LOCKED_MESSAGE};

const LOCK_COLOR: Color = Color::LightMagenta;
const STATE_COLOR: Color = Color::LightBlue;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const IDLE_POLL: Duration = Duration::from_millis(100);
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Where the keymap came from, so an edit can be reloaded the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapSource {
    pub path: PathBuf,
    pub server_url: Option<String>,
}

impl KeymapSource {
    fn load(&self) -> Result<CommandRegistry, String> {
        KeypadConfig::load_or_default(&self.path)
            .and_then(|config| config.with_server_url(self.server_url.clone()).registry())
            .map_err(|err| err.to_string())
    }
}

/// Runs the interactive terminal UI until Ctrl-C.
///
/// Must be called from within a tokio runtime (typically a `spawn_blocking` thread) that keeps
/// running while the UI is up, since command activations are spawned onto it.
pub fn run(keypad: Keypad, keymap: Option<KeymapSource>) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(keypad, keymap);

    while !app.should_quit {
        app.pump(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    if app.view.take_edit_request() {
                        let result = terminal.suspended(|| app.edit_keymap());
                        if let Err(err) = result {
                            tracing::warn!(error = %err, "keymap edit failed");
                            app.set_toast(format!("Edit failed: {err}"));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

struct Toast {
    message: String,
    expires_at: Instant,
}

/// Everything the controller has told the host to show.
#[derive(Debug, Default)]
struct HostView {
    status: StatusView,
    locked: bool,
    state_labels: BTreeMap<Mnemonic, String>,
    help_visible: bool,
    edit_requested: bool,
}

impl HostView {
    fn reset_labels(&mut self, registry: &CommandRegistry) {
        self.state_labels = registry
            .iter()
            .map(|command| (command.mnemonic().clone(), command.initial_state().to_owned()))
            .collect();
    }

    fn state_label(&self, mnemonic: &Mnemonic) -> Option<&str> {
        self.state_labels.get(mnemonic).map(String::as_str)
    }

    fn take_edit_request(&mut self) -> bool {
        std::mem::take(&mut self.edit_requested)
    }
}

impl ViewSink for HostView {
    fn apply(&mut self, effect: ViewEffect) {
        match effect {
            ViewEffect::Status(view) => self.status = view,
            ViewEffect::StateLabel { mnemonic, label } => {
                self.state_labels.insert(mnemonic, label);
            }
            ViewEffect::Locked(locked) => self.locked = locked,
            ViewEffect::Cancel => self.help_visible = false,
            ViewEffect::SubmitEdit => self.edit_requested = true,
        }
    }
}

struct App {
    keypad: Keypad,
    keymap: Option<KeymapSource>,
    view: HostView,
    selected: usize,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(keypad: Keypad, keymap: Option<KeymapSource>) -> Self {
        let mut view = HostView::default();
        view.reset_labels(keypad.registry());
        Self { keypad, keymap, view, selected: 0, toast: None, should_quit: false }
    }

    /// Fires due settle timers and applies finished requests.
    fn pump(&mut self, now: Instant) {
        self.keypad.tick(now, &mut self.view);
        self.keypad.drain(&mut self.view);
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.keypad.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => self.activate_selected(),
            KeyCode::F(1) => self.view.help_visible = !self.view.help_visible,
            _ => {
                self.keypad.handle_key(&KeyPress::from(key), FocusKind::Document, &mut self.view);
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.keypad.registry().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    fn selected_mnemonic(&self) -> Option<Mnemonic> {
        self.keypad
            .registry()
            .iter()
            .nth(self.selected)
            .map(|command| command.mnemonic().clone())
    }

    fn activate_selected(&mut self) {
        if let Some(mnemonic) = self.selected_mnemonic() {
            self.keypad.click(mnemonic.as_str(), &mut self.view);
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast =
            Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn edit_keymap(&mut self) -> Result<(), String> {
        let Some(keymap) = self.keymap.clone() else {
            return Err("no keymap file configured".to_owned());
        };
        ensure_keymap_file(&keymap.path)?;

        let editor_command = resolve_editor_command();
        launch_editor_command(&editor_command, &keymap.path)?;

        let registry = keymap.load()?;
        self.install_registry(registry);
        self.set_toast(format!("Keymap reloaded ({} keys)", self.keypad.registry().len()));
        Ok(())
    }

    fn install_registry(&mut self, registry: CommandRegistry) {
        self.keypad.replace_registry(registry);
        self.view.reset_labels(self.keypad.registry());
        self.move_selection(0);
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let banner_height = if app.view.locked { 1 } else { 0 };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    if app.view.locked {
        frame.render_widget(Paragraph::new(lock_banner()), layout[0]);
    }

    let registry = app.keypad.registry();
    let mnemonic_width =
        registry.iter().map(|command| command.mnemonic().char_len()).max().unwrap_or(0);
    let items = registry
        .iter()
        .map(|command| key_item(command, app.view.state_label(command.mnemonic()), mnemonic_width))
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(key_list_title(app.keypad.buffer())))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");
    let mut list_state = ListState::default();
    if !registry.is_empty() {
        list_state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, layout[1], &mut list_state);

    frame.render_widget(Paragraph::new(status_line(&app.view.status)), layout[2]);

    let toast = app.toast.as_ref().map(|toast| toast.message.as_str());
    frame.render_widget(Paragraph::new(footer_line(toast)), layout[3]);

    if app.view.help_visible {
        render_help(frame, area);
    }
}

include!("chrome.rs");

type Screen = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw mode on the alternate screen for as long as the session lives.
struct TerminalSession {
    terminal: Screen,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        Self::enter().map_err(|err| {
            leave_screen();
            err.into()
        })
    }

    fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render).map(drop)
    }

    /// Runs `action` with the terminal handed back to the user.
    fn suspended<T>(&mut self, action: impl FnOnce() -> Result<T, String>) -> Result<T, String> {
        let _guard = TerminalSuspendGuard::new(&mut self.terminal)
            .map_err(|err| format!("could not release the terminal: {err}"))?;
        action()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        leave_screen();
    }
}

/// Cooked mode on the main screen until dropped.
struct TerminalSuspendGuard<'a> {
    terminal: &'a mut Screen,
}

impl<'a> TerminalSuspendGuard<'a> {
    fn new(terminal: &'a mut Screen) -> io::Result<Self> {
        terminal.show_cursor()?;
        disable_raw_mode()?;

        let released = execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .and_then(|()| ratatui::backend::Backend::flush(terminal.backend_mut()));
        match released {
            Ok(()) => Ok(Self { terminal }),
            Err(err) => {
                reclaim(terminal);
                Err(err)
            }
        }
    }
}

impl Drop for TerminalSuspendGuard<'_> {
    fn drop(&mut self) {
        reclaim(&mut *self.terminal);
    }
}

/// Best effort: raw mode, alternate screen, blank canvas, hidden cursor.
fn reclaim(terminal: &mut Screen) {
    let _ = enable_raw_mode();
    let _ = execute!(terminal.backend_mut(), EnterAlternateScreen);
    let _ = terminal.clear();
    let _ = terminal.hide_cursor();
    let _ = ratatui::backend::Backend::flush(terminal.backend_mut());
}

fn leave_screen() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

/// `$VISUAL`, then `$EDITOR`, then `vi`.
fn resolve_editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_owned())
}

/// Seeds a missing keymap with the defaults so the editor opens something useful.
fn ensure_keymap_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
    }
    let template = toml::to_string_pretty(&KeypadConfig::default())
        .map_err(|err| format!("failed to render keymap template: {err}"))?;
    fs::write(path, template).map_err(|err| format!("failed to write {}: {err}", path.display()))
}

/// `sh -lc` so editor commands with arguments (`code --wait`) work.
fn launch_editor_command(editor: &str, path: &Path) -> Result<(), String> {
    let path = path.to_string_lossy();
    if path.starts_with('-') {
        return Err(format!("refusing to open keymap path `{path}`"));
    }

    let script = format!("{editor} {}", shell_single_quote(&path));
    let status = Process::new("sh")
        .args(["-lc", script.as_str()])
        .status()
        .map_err(|err| format!("could not start `{editor}`: {err}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`{editor}` exited with {status}"))
    }
}

fn shell_single_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => quoted.push_str("'\\''"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}
