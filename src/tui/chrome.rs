// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Status line, key list, footer, and help helpers used by TUI rendering.
fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Idle => Style::default().fg(FOOTER_LABEL_COLOR),
        StatusKind::Start => Style::default().fg(Color::Yellow),
        StatusKind::Success => Style::default().fg(Color::LightGreen),
        StatusKind::Fail => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        StatusKind::Locked => Style::default().fg(LOCK_COLOR).add_modifier(Modifier::BOLD),
    }
}

fn icon_glyph(icon: IconKind) -> &'static str {
    match icon {
        IconKind::None => "",
        IconKind::Wait => "⏳",
        IconKind::Lock => "🔒",
        IconKind::Star => "★",
        IconKind::Skull => "☠",
    }
}

/// Rebuilt from scratch on every frame.
fn status_line(view: &StatusView) -> Line<'static> {
    if view.is_idle() {
        return Line::default();
    }

    let style = status_style(view.kind);
    let mut spans = Vec::<Span<'static>>::new();
    let glyph = icon_glyph(view.icon);
    if !glyph.is_empty() {
        spans.push(Span::styled(format!("{glyph} "), style));
    }
    spans.push(Span::styled(html_to_text(&view.message), style));
    Line::from(spans)
}

/// Terminal rendition of a server message: tags dropped, common entities decoded, whitespace
/// collapsed onto one line. Angle brackets that do not open a tag, comment or doctype are text.
fn html_to_text(markup: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    static BREAK: OnceLock<Regex> = OnceLock::new();

    let breaks = BREAK.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|tr)\s*>").expect("break pattern")
    });
    let tags = TAG.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?-->|<![^>]*>|</?[A-Za-z][^>]*>").expect("tag pattern")
    });

    let spaced = breaks.replace_all(markup, " ");
    let stripped = tags.replace_all(&spaced, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn key_item(command: &Command, state: Option<&str>, mnemonic_width: usize) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{:<width$}", command.mnemonic().as_str(), width = mnemonic_width),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(command.display_label().to_owned()),
    ];
    if let Some(state) = state.map(str::trim).filter(|state| !state.is_empty()) {
        spans.push(Span::styled(format!("  [{state}]"), Style::default().fg(STATE_COLOR)));
    }
    ListItem::new(Line::from(spans))
}

fn key_list_title(buffer: &str) -> String {
    if buffer.is_empty() {
        " Keys ".to_owned()
    } else {
        format!(" Keys ─ {buffer}_ ")
    }
}

fn lock_banner() -> Line<'static> {
    Line::from(Span::styled(
        format!("{} {LOCKED_MESSAGE} Click a key to run it.", icon_glyph(IconKind::Lock)),
        Style::default().fg(Color::Black).bg(LOCK_COLOR).add_modifier(Modifier::BOLD),
    ))
}

fn footer_line(toast: Option<&str>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    for (label, key) in [
        ("select", "↑↓"),
        ("run", "Enter"),
        ("clear", "Esc"),
        ("edit", "E"),
        ("help", "F1"),
        ("quit", "^C"),
    ] {
        push_footer_entry(&mut spans, label, key);
    }
    if let Some(toast) = toast {
        spans.push(Span::styled(format!("  {toast}"), Style::default().fg(FOOTER_BRAND_COLOR)));
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(format!("{label}:"), Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
    ));
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_lines() -> Vec<Line<'static>> {
    let key_style = Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD);
    let entries = [
        ("a-z…", "type a key's mnemonic; it runs once no other key shares the prefix"),
        ("Esc", "clear typed input, status, and this help"),
        ("↑/↓", "select a key"),
        ("Enter", "run the selected key (works while locked)"),
        ("E", "edit the keymap in $VISUAL/$EDITOR and reload it"),
        ("F1", "toggle this help"),
        ("Ctrl-C", "quit"),
    ];
    let key_width = entries.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);

    let mut lines = vec![Line::from(Span::styled(
        "--- Keys ---",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:>key_width$}"), key_style),
            Span::raw("  "),
            Span::raw(desc),
        ]));
    }
    lines
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let area = centered_rect(70, 60, area);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(help_lines())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, area);
}
