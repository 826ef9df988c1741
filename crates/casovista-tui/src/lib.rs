// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use casovista_app::{
    AppCommand, AppState, CARD_HEADER_COLUMNS, DETAIL_LABELS, Dataset, Headers, KEY_COLUMN,
    KEY_LABEL, META_LABELS, NOTES_LABEL, Record, SUBTITLE_LABELS, VERIFY_LABEL,
    normalize_user_name, parse_color_token,
};
use casovista_sheet::{SearchIndex, filter};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use std::collections::BTreeSet;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const ACCENT_STRIPE: &str = "▌ ";
const NO_STRIPE: &str = "  ";
const FIELD_SEPARATOR: &str = " · ";

/// Everything the UI needs from the outside world: the workbook, the
/// persisted user setting, and the telemetry channel.
pub trait AppRuntime {
    fn load_dataset(&mut self) -> Result<Dataset>;
    fn stored_user(&mut self) -> Result<String>;
    fn save_user(&mut self, name: &str) -> Result<()>;
    fn delete_user(&mut self) -> Result<()>;
    /// Best-effort; implementations must not block on delivery.
    fn report_selection(&mut self, user: &str, case_key: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SettingsUiState {
    input: String,
}

struct ViewData {
    dataset: Dataset,
    index: SearchIndex,
    filtered: Vec<usize>,
    cursor: usize,
    list_state: ListState,
    detail_scroll: u16,
    settings: SettingsUiState,
    status_token: u64,
}

impl ViewData {
    fn new() -> Self {
        let dataset = Dataset::empty();
        let index = SearchIndex::build(&dataset);
        Self {
            dataset,
            index,
            filtered: Vec::new(),
            cursor: 0,
            list_state: ListState::default(),
            detail_scroll: 0,
            settings: SettingsUiState::default(),
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new();
    let (internal_tx, internal_rx) = mpsc::channel();

    match runtime.stored_user() {
        Ok(user) => state.active_user = user,
        Err(error) => tracing::warn!("stored user unreadable, starting without one: {error:#}"),
    }

    // The initial load gates the first render; later reloads keep the
    // previous dataset on failure.
    match runtime.load_dataset() {
        Ok(dataset) => replace_dataset(state, &mut view_data, dataset),
        Err(error) => {
            tracing::warn!("workbook load failed: {error:#}");
            state.dispatch(AppCommand::SetStatus(format!(
                "no se pudo cargar la hoja: {error}"
            )));
        }
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &mut view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    restart_status_timer(view_data, internal_tx);
}

// Commands like ToggleMode set the status line themselves; this keeps the
// timed clear in sync with whatever message is showing.
fn restart_status_timer(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn replace_dataset(state: &mut AppState, view_data: &mut ViewData, dataset: Dataset) {
    view_data.dataset = dataset;
    view_data.index = SearchIndex::build(&view_data.dataset);
    view_data.cursor = 0;
    refresh_filter(state, view_data);
}

fn refresh_filter(state: &mut AppState, view_data: &mut ViewData) {
    match filter(&view_data.dataset, &view_data.index, &state.query, state.mode) {
        Ok(filtered) => view_data.filtered = filtered,
        Err(error) => {
            tracing::error!("filter failed: {error:#}");
            view_data.filtered = (0..view_data.dataset.len()).collect();
        }
    }
    view_data.cursor = view_data
        .cursor
        .min(view_data.filtered.len().saturating_sub(1));
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if state.settings_open {
        handle_settings_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.detail.is_some() {
        handle_detail_key(state, view_data, key);
        return false;
    }

    handle_browse_key(state, runtime, view_data, internal_tx, key);
    false
}

fn handle_settings_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::CloseSettings);
        }
        (KeyCode::Enter, _) => match normalize_user_name(&view_data.settings.input) {
            Some(name) => match runtime.save_user(&name) {
                Ok(()) => {
                    state.dispatch(AppCommand::SetUser(name));
                    state.dispatch(AppCommand::CloseSettings);
                    restart_status_timer(view_data, internal_tx);
                }
                Err(error) => {
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("no se pudo guardar el usuario: {error}"),
                    );
                }
            },
            None => {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    "escribe un nombre, o borra el guardado con Ctrl+D",
                );
            }
        },
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => match runtime.delete_user() {
            Ok(()) => {
                state.dispatch(AppCommand::ClearUser);
                state.dispatch(AppCommand::CloseSettings);
                view_data.settings.input.clear();
                restart_status_timer(view_data, internal_tx);
            }
            Err(error) => {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("no se pudo borrar el usuario: {error}"),
                );
            }
        },
        (KeyCode::Backspace, _) => {
            view_data.settings.input.pop();
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            view_data.settings.input.push(ch);
        }
        _ => {}
    }
}

fn handle_detail_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::CloseDetail);
            view_data.detail_scroll = 0;
        }
        KeyCode::Up => view_data.detail_scroll = view_data.detail_scroll.saturating_sub(1),
        KeyCode::Down => view_data.detail_scroll = view_data.detail_scroll.saturating_add(1),
        _ => {}
    }
}

fn handle_browse_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            view_data.settings.input = state.active_user.clone();
            state.dispatch(AppCommand::OpenSettings);
        }
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => match runtime.load_dataset() {
            Ok(dataset) => {
                replace_dataset(state, view_data, dataset);
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("hoja recargada: {} casos", view_data.dataset.len()),
                );
            }
            Err(error) => {
                tracing::warn!("workbook reload failed: {error:#}");
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("no se pudo recargar la hoja: {error}"),
                );
            }
        },
        (KeyCode::Tab, _) => {
            state.dispatch(AppCommand::ToggleMode);
            restart_status_timer(view_data, internal_tx);
            refresh_filter(state, view_data);
        }
        (KeyCode::Esc, _) => {
            if !state.dispatch(AppCommand::ClearQuery).is_empty() {
                refresh_filter(state, view_data);
            }
        }
        (KeyCode::Up, _) => view_data.cursor = view_data.cursor.saturating_sub(1),
        (KeyCode::Down, _) => {
            if view_data.cursor + 1 < view_data.filtered.len() {
                view_data.cursor += 1;
            }
        }
        (KeyCode::Home, _) => view_data.cursor = 0,
        (KeyCode::End, _) => {
            view_data.cursor = view_data.filtered.len().saturating_sub(1);
        }
        (KeyCode::Enter, _) => {
            let Some(&record_index) = view_data.filtered.get(view_data.cursor) else {
                return;
            };
            let Some(record) = view_data.dataset.record(record_index) else {
                return;
            };
            let case_key = record.key.clone();
            state.dispatch(AppCommand::OpenDetail(record_index));
            view_data.detail_scroll = 0;
            let user = state.active_user.clone();
            runtime.report_selection(&user, &case_key);
        }
        (KeyCode::Backspace, _) => {
            if !state.dispatch(AppCommand::QueryPop).is_empty() {
                refresh_filter(state, view_data);
            }
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            state.dispatch(AppCommand::QueryPush(ch));
            refresh_filter(state, view_data);
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &mut ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_search(frame, layout[0], state, view_data);

    if let Some(record_index) = state.detail {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[1]);
        render_cards(frame, body[0], view_data);
        render_detail(frame, body[1], view_data, record_index);
    } else {
        render_cards(frame, layout[1], view_data);
    }

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if state.settings_open {
        let area = centered_rect(52, 34, frame.area());
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(settings_overlay_text(state, &view_data.settings.input)).block(
            Block::default()
                .title("usuario activo")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(dialog, area);
    }
}

fn render_search(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let title = format!(
        "buscar por {} · modo {} · {}/{} casos",
        KEY_LABEL,
        state.mode.label(),
        view_data.filtered.len(),
        view_data.dataset.len(),
    );
    let input = Paragraph::new(format!("{}▌", state.query))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

fn render_cards(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &mut ViewData) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let header_line = card_header_labels(&view_data.dataset.headers).join(FIELD_SEPARATOR);
    let header = Paragraph::new(header_line).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, sections[0]);

    let items: Vec<ListItem> = view_data
        .filtered
        .iter()
        .filter_map(|&record_index| view_data.dataset.record(record_index))
        .map(|record| ListItem::new(card_text(&view_data.dataset, record)))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("casos"))
        .highlight_style(Style::default().bg(Color::DarkGray));

    if view_data.filtered.is_empty() {
        view_data.list_state.select(None);
    } else {
        view_data.list_state.select(Some(view_data.cursor));
    }
    frame.render_stateful_widget(list, sections[1], &mut view_data.list_state);
}

fn render_detail(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view_data: &ViewData,
    record_index: usize,
) {
    let Some(record) = view_data.dataset.record(record_index) else {
        return;
    };

    let lines: Vec<Line> = detail_lines(&view_data.dataset, record)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(value),
            ])
        })
        .collect();

    let panel = Paragraph::new(Text::from(lines))
        .scroll((view_data.detail_scroll, 0))
        .block(
            Block::default()
                .title(format!("{KEY_LABEL} {}", record.key))
                .borders(Borders::ALL),
        );
    frame.render_widget(panel, area);
}

fn status_text(state: &AppState) -> String {
    if let Some(message) = &state.status_line {
        return message.clone();
    }
    let user = if state.active_user.is_empty() {
        "(sin usuario)".to_owned()
    } else {
        state.active_user.clone()
    };
    format!(
        "usuario: {user} | Tab: modo · Enter: abrir · Esc: limpiar/cerrar · Ctrl+U: usuario · Ctrl+R: recargar · Ctrl+Q: salir"
    )
}

fn settings_overlay_text(state: &AppState, input: &str) -> String {
    let current = if state.active_user.is_empty() {
        "(sin usuario)".to_owned()
    } else {
        state.active_user.clone()
    };
    format!(
        "usuario actual: {current}\n\nnombre: {input}▌\n\nEnter: guardar · Ctrl+D: borrar · Esc: cancelar"
    )
}

/// Column labels for the non-interactive header row: the accent column is
/// excluded and only the first eight columns are shown.
fn card_header_labels(headers: &Headers) -> Vec<String> {
    headers
        .names()
        .iter()
        .enumerate()
        .filter(|(column, _)| Some(*column) != headers.accent_column())
        .take(CARD_HEADER_COLUMNS)
        .map(|(_, name)| name.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CardContent {
    title: String,
    subtitle: String,
    meta: String,
    summary: [String; 3],
    accent: Option<casovista_app::AccentColor>,
}

fn card_content(dataset: &Dataset, record: &Record) -> CardContent {
    let headers = &dataset.headers;

    let subtitle = headers
        .resolve_first(&SUBTITLE_LABELS)
        .map(|column| record.cell(column).to_owned())
        .unwrap_or_default();

    let meta = META_LABELS
        .iter()
        .filter_map(|label| {
            let column = headers.resolve(label)?;
            let value = record.cell(column);
            if value.is_empty() {
                None
            } else {
                Some(format!("{label}: {value}"))
            }
        })
        .collect::<Vec<String>>()
        .join(FIELD_SEPARATOR);

    let summary_value = |label: &str| {
        headers
            .resolve(label)
            .map(|column| record.cell(column).to_owned())
            .unwrap_or_default()
    };
    let summary = [
        record.key.clone(),
        summary_value(VERIFY_LABEL),
        summary_value(NOTES_LABEL),
    ];

    let accent = record.accent.as_deref().and_then(parse_color_token);

    CardContent {
        title: record.key.clone(),
        subtitle,
        meta,
        summary,
        accent,
    }
}

fn card_text(dataset: &Dataset, record: &Record) -> Text<'static> {
    let content = card_content(dataset, record);
    let stripe_style = match content.accent {
        Some(accent) => Style::default().fg(Color::Rgb(accent.r, accent.g, accent.b)),
        None => Style::default(),
    };
    let stripe = |text: &'static str| Span::styled(text, stripe_style);
    let stripe_text = if content.accent.is_some() {
        ACCENT_STRIPE
    } else {
        NO_STRIPE
    };

    let mut title_line = vec![
        stripe(stripe_text),
        Span::styled(
            content.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if !content.subtitle.is_empty() {
        title_line.push(Span::styled(
            format!("  {}", content.subtitle),
            Style::default().fg(Color::Cyan),
        ));
    }

    let mut lines = vec![Line::from(title_line)];
    if !content.meta.is_empty() {
        lines.push(Line::from(vec![
            stripe(stripe_text),
            Span::styled(content.meta, Style::default().fg(Color::DarkGray)),
        ]));
    }
    let [key, verify, notes] = content.summary;
    lines.push(Line::from(vec![
        stripe(stripe_text),
        Span::raw(format!(
            "{KEY_LABEL}: {key}{FIELD_SEPARATOR}verif.: {verify}{FIELD_SEPARATOR}obs.: {notes}"
        )),
    ]));

    Text::from(lines)
}

/// Label/value pairs for the detail panel: the fixed preferred labels
/// first (the key alias always resolves to the key field; unresolved
/// labels are skipped), then any remaining columns in sheet order. The
/// accent column never appears.
fn detail_lines(dataset: &Dataset, record: &Record) -> Vec<(String, String)> {
    let headers = &dataset.headers;
    let accent = headers.accent_column();
    let mut used: BTreeSet<usize> = BTreeSet::new();
    let mut lines = Vec::new();

    for label in DETAIL_LABELS {
        if label == KEY_LABEL {
            used.insert(KEY_COLUMN);
            lines.push((KEY_LABEL.to_owned(), record.key.clone()));
            continue;
        }
        let Some(column) = headers.resolve(label) else {
            continue;
        };
        if Some(column) == accent || !used.insert(column) {
            continue;
        }
        lines.push((label.to_owned(), record.cell(column).to_owned()));
    }

    for column in 0..headers.len() {
        if Some(column) == accent || used.contains(&column) {
            continue;
        }
        let Some(name) = headers.name(column) else {
            continue;
        };
        lines.push((name.to_owned(), record.cell(column).to_owned()));
    }

    lines
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, ViewData, card_content, card_header_labels, detail_lines, handle_key_event,
        replace_dataset,
    };
    use anyhow::{Result, bail};
    use casovista_app::{AppState, Dataset};
    use casovista_sheet::normalize;
    use casovista_testkit::{manual_dataset, minimal_rows, sample_raw_rows};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc::{self, Sender};

    use super::InternalEvent;

    #[derive(Default)]
    struct StubRuntime {
        dataset: Option<Dataset>,
        fail_save: bool,
        saved: Vec<String>,
        deletions: usize,
        reports: Vec<(String, String)>,
    }

    impl AppRuntime for StubRuntime {
        fn load_dataset(&mut self) -> Result<Dataset> {
            match &self.dataset {
                Some(dataset) => Ok(dataset.clone()),
                None => bail!("no dataset configured"),
            }
        }

        fn stored_user(&mut self) -> Result<String> {
            Ok(String::new())
        }

        fn save_user(&mut self, name: &str) -> Result<()> {
            if self.fail_save {
                bail!("disk full");
            }
            self.saved.push(name.to_owned());
            Ok(())
        }

        fn delete_user(&mut self) -> Result<()> {
            self.deletions += 1;
            Ok(())
        }

        fn report_selection(&mut self, user: &str, case_key: &str) {
            self.reports.push((user.to_owned(), case_key.to_owned()));
        }
    }

    fn fixture() -> (AppState, ViewData, StubRuntime, Sender<InternalEvent>) {
        let mut state = AppState::default();
        let mut view_data = ViewData::new();
        replace_dataset(&mut state, &mut view_data, manual_dataset());
        // The receiver is dropped; status-clear timers send into the void,
        // which the senders ignore.
        let (tx, _rx) = mpsc::channel();
        (state, view_data, StubRuntime::default(), tx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_refilters_on_every_keystroke() {
        let (mut state, mut view, mut runtime, tx) = fixture();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('a')));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('c')));

        assert_eq!(state.query, "ac");
        assert_eq!(view.filtered, vec![0, 1]);

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Backspace));
        assert_eq!(state.query, "a");
        assert_eq!(view.filtered, vec![0, 1, 2], "every key has an 'a'");
    }

    #[test]
    fn escape_clears_the_query_and_restores_the_full_view() {
        let (mut state, mut view, mut runtime, tx) = fixture();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('x')));
        assert!(view.filtered.is_empty());

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Esc));
        assert!(state.query.is_empty());
        assert_eq!(view.filtered, vec![0, 1, 2]);
    }

    #[test]
    fn enter_opens_the_detail_and_reports_the_selection() {
        let (mut state, mut view, mut runtime, tx) = fixture();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Enter));

        assert_eq!(state.detail, Some(0));
        assert_eq!(runtime.reports, vec![(String::new(), "ACME-100".to_owned())]);

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Esc));
        assert_eq!(state.detail, None);
        assert_eq!(view.detail_scroll, 0);
    }

    #[test]
    fn enter_on_an_empty_view_does_nothing() {
        let (mut state, mut view, mut runtime, tx) = fixture();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('z')));
        assert!(view.filtered.is_empty());

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Enter));
        assert_eq!(state.detail, None);
        assert!(runtime.reports.is_empty());
    }

    #[test]
    fn tab_toggles_fuzzy_mode_and_refilters() {
        let (mut state, mut view, mut runtime, tx) = fixture();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('a')));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('m')));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('e')));
        assert_eq!(view.filtered, vec![0, 1], "substring match on 'ame'");

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('2')));
        assert!(view.filtered.is_empty(), "'ame2' is not a substring");

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Tab));
        assert_eq!(view.filtered, vec![1], "fuzzy finds 'ame2' in acme-205");
    }

    #[test]
    fn selection_reports_the_active_user_when_one_is_set() {
        let (mut state, mut view, mut runtime, tx) = fixture();
        state.active_user = "Jordan".to_owned();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Down));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Enter));

        assert_eq!(state.detail, Some(1));
        assert_eq!(
            runtime.reports,
            vec![("Jordan".to_owned(), "ACME-205".to_owned())]
        );
    }

    #[test]
    fn settings_accept_saves_the_trimmed_name() {
        let (mut state, mut view, mut runtime, tx) = fixture();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, ctrl('u'));
        assert!(state.settings_open);

        for ch in " Jo ".chars() {
            handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char(ch)));
        }
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Enter));

        assert!(!state.settings_open);
        assert_eq!(state.active_user, "Jo");
        assert_eq!(runtime.saved, vec!["Jo".to_owned()]);
    }

    #[test]
    fn settings_save_failure_keeps_the_dialog_open() {
        let (mut state, mut view, mut runtime, tx) = fixture();
        runtime.fail_save = true;

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, ctrl('u'));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Char('J')));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, key(KeyCode::Enter));

        assert!(state.settings_open);
        assert!(state.active_user.is_empty());
        assert!(
            state
                .status_line
                .as_deref()
                .is_some_and(|status| status.contains("no se pudo guardar"))
        );
    }

    #[test]
    fn settings_delete_clears_the_stored_user() {
        let (mut state, mut view, mut runtime, tx) = fixture();
        state.active_user = "Jordan".to_owned();

        handle_key_event(&mut state, &mut runtime, &mut view, &tx, ctrl('u'));
        handle_key_event(&mut state, &mut runtime, &mut view, &tx, ctrl('d'));

        assert!(!state.settings_open);
        assert!(state.active_user.is_empty());
        assert_eq!(runtime.deletions, 1);
    }

    #[test]
    fn header_row_excludes_the_accent_column_and_caps_at_eight() {
        let dataset = normalize(&sample_raw_rows()).expect("normalize sample rows");
        let labels = card_header_labels(&dataset.headers);
        assert_eq!(
            labels,
            vec![
                "ID",
                "Caso",
                "Tema",
                "Tipo de Tarea",
                "Estado",
                "Prioridad",
                "Fecha",
                "Responsable",
            ],
        );
        assert!(!labels.iter().any(|label| label == "Color"));
    }

    #[test]
    fn card_content_fills_title_subtitle_meta_and_summary() {
        let dataset = normalize(&sample_raw_rows()).expect("normalize sample rows");
        let content = card_content(&dataset, &dataset.records[0]);

        assert_eq!(content.title, "ACME-100");
        assert_eq!(content.subtitle, "Billing");
        assert_eq!(
            content.meta,
            "Tipo de Tarea: Support · Estado: Open · Prioridad: Alta · Fecha: 2026-01-10 · Responsable: Rivera",
        );
        assert_eq!(
            content.summary,
            [
                "ACME-100".to_owned(),
                "Sí".to_owned(),
                "Cliente llamó dos veces".to_owned(),
            ],
        );
        assert!(content.accent.is_some(), "'verde' is a color name");
    }

    #[test]
    fn card_meta_skips_empty_values_but_keeps_the_fixed_order() {
        let dataset = normalize(&sample_raw_rows()).expect("normalize sample rows");
        let content = card_content(&dataset, &dataset.records[2]);
        assert_eq!(content.title, "BETA-7");
        assert_eq!(content.subtitle, "Red");
        assert!(content.meta.is_empty(), "all meta fields are blank");
        assert_eq!(content.accent, None);
    }

    #[test]
    fn detail_lines_follow_the_preferred_order_with_the_key_alias_first() {
        let dataset = normalize(&sample_raw_rows()).expect("normalize sample rows");
        let lines = detail_lines(&dataset, &dataset.records[0]);

        assert_eq!(lines[0], ("Caso".to_owned(), "ACME-100".to_owned()));
        assert_eq!(lines[1], ("Tema".to_owned(), "Billing".to_owned()));
        assert!(
            !lines.iter().any(|(label, _)| label == "Color"),
            "accent column is never rendered as text"
        );
        assert!(
            lines.iter().any(|(label, _)| label == "ID"),
            "non-preferred columns follow in sheet order"
        );
    }

    #[test]
    fn detail_lines_skip_labels_with_no_matching_header() {
        let dataset = normalize(&minimal_rows()).expect("normalize minimal rows");
        let lines = detail_lines(&dataset, &dataset.records[0]);

        assert!(!lines.iter().any(|(label, _)| label == "Prioridad"));
        assert!(!lines.iter().any(|(_, value)| value == "Prioridad"));
        assert_eq!(lines[0], ("Caso".to_owned(), "ACME-100".to_owned()));
    }
}
