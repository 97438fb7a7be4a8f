// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use invoicegrid_app::{
    ColumnKey, DateBound, GridCommand, GridEvent, GridState, HighlightColor, MenuCommand,
    MenuState, SortDirection, format_date, parse_date,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const MENU_WIDTH: u16 = 24;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SORT_ASC_MARK: &str = " ↑";
const SORT_DESC_MARK: &str = " ↓";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    Table,
    Search,
    StartDate,
    EndDate,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Table => Self::Search,
            Self::Search => Self::StartDate,
            Self::StartDate => Self::EndDate,
            Self::EndDate => Self::Table,
        }
    }

    fn date_bound(self) -> Option<DateBound> {
        match self {
            Self::StartDate => Some(DateBound::Start),
            Self::EndDate => Some(DateBound::End),
            Self::Table | Self::Search => None,
        }
    }
}

pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    focus: Focus,
    start_draft: String,
    end_draft: String,
    selected_row: usize,
    selected_col: usize,
    area: Rect,
    status_token: u64,
}

impl ViewData {
    fn for_state(state: &GridState) -> Self {
        let range = state.query().range;
        Self {
            start_draft: range.start.map(format_date).unwrap_or_default(),
            end_draft: range.end.map(format_date).unwrap_or_default(),
            ..Self::default()
        }
    }

    fn draft_mut(&mut self, bound: DateBound) -> &mut String {
        match bound {
            DateBound::Start => &mut self.start_draft,
            DateBound::End => &mut self.end_draft,
        }
    }

    fn selected_column(&self) -> ColumnKey {
        ColumnKey::ALL[self.selected_col.min(ColumnKey::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenLayout {
    search: Rect,
    start: Rect,
    end: Rect,
    table: Rect,
    status: Rect,
}

pub fn run_app(state: &mut GridState) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    info!(rows = state.store().len(), "grid started");
    let result = run_loop(&mut terminal, state);

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alternate screen")?;
    info!("grid closed");
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut GridState,
) -> Result<()> {
    let mut view_data = ViewData::for_state(state);
    let (internal_tx, internal_rx) = mpsc::channel();

    loop {
        process_internal_events(state, &view_data, &internal_rx);

        let mut drawn_area = view_data.area;
        terminal
            .draw(|frame| {
                drawn_area = frame.area();
                render(frame, state, &view_data);
            })
            .context("draw frame")?;
        view_data.area = drawn_area;

        if !event::poll(Duration::from_millis(120)).context("poll event")? {
            continue;
        }
        match event::read().context("read event")? {
            Event::Key(key) => {
                if handle_key_event(state, &mut view_data, &internal_tx, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                handle_mouse_event(state, &mut view_data, &internal_tx, mouse);
            }
            _ => {}
        }
    }
}

fn process_internal_events(
    state: &mut GridState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(GridCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Single entry point from gestures into the grid; keeps the cursor inside the
/// visible set and arms the status auto-clear.
fn apply(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: GridCommand,
) {
    for event in state.dispatch(command) {
        match event {
            GridEvent::VisibleChanged { visible, .. } => {
                view_data.selected_row = view_data.selected_row.min(visible.saturating_sub(1));
            }
            GridEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(internal_tx, view_data.status_token);
            }
            _ => {}
        }
    }
}

fn emit_status(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    apply(
        state,
        view_data,
        internal_tx,
        GridCommand::SetStatus(message.into()),
    );
}

fn handle_key_event(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return true;
    }

    if state.menu().open {
        handle_menu_key(state, view_data, internal_tx, key);
        return false;
    }

    match view_data.focus {
        Focus::Table => return handle_table_key(state, view_data, internal_tx, key),
        Focus::Search => handle_search_key(state, view_data, internal_tx, key),
        Focus::StartDate | Focus::EndDate => {
            handle_date_key(state, view_data, internal_tx, key);
        }
    }
    false
}

fn menu_command_for_key(code: KeyCode) -> Option<MenuCommand> {
    match code {
        KeyCode::Char('1') => Some(MenuCommand::Highlight(HighlightColor::Warning)),
        KeyCode::Char('2') => Some(MenuCommand::Highlight(HighlightColor::Success)),
        KeyCode::Char('3') => Some(MenuCommand::Highlight(HighlightColor::Danger)),
        KeyCode::Char('0') | KeyCode::Char('c') => Some(MenuCommand::Clear),
        _ => None,
    }
}

fn handle_menu_key(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Esc {
        apply(state, view_data, internal_tx, GridCommand::DocumentClicked);
        return;
    }
    if let Some(command) = menu_command_for_key(key.code) {
        apply(
            state,
            view_data,
            internal_tx,
            GridCommand::MenuCommand(command),
        );
    }
}

fn handle_search_key(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut next = state.search_input().to_owned();
            next.push(ch);
            apply(state, view_data, internal_tx, GridCommand::SetSearch(next));
        }
        KeyCode::Backspace => {
            let mut next = state.search_input().to_owned();
            if next.pop().is_some() {
                apply(state, view_data, internal_tx, GridCommand::SetSearch(next));
            }
        }
        KeyCode::Enter | KeyCode::Esc => view_data.focus = Focus::Table,
        KeyCode::Tab => view_data.focus = view_data.focus.next(),
        _ => {}
    }
}

fn handle_date_key(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(bound) = view_data.focus.date_bound() else {
        return;
    };

    match key.code {
        KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '-' => {
            view_data.draft_mut(bound).push(ch);
        }
        KeyCode::Backspace => {
            view_data.draft_mut(bound).pop();
        }
        KeyCode::Enter => {
            if commit_date_draft(state, view_data, internal_tx, bound) {
                view_data.focus = Focus::Table;
            }
        }
        KeyCode::Tab => {
            if commit_date_draft(state, view_data, internal_tx, bound) {
                view_data.focus = view_data.focus.next();
            }
        }
        KeyCode::Esc => {
            *view_data.draft_mut(bound) = state
                .query()
                .range
                .bound(bound)
                .map(format_date)
                .unwrap_or_default();
            view_data.focus = Focus::Table;
        }
        _ => {}
    }
}

/// An empty draft clears the bound. Returns false when the draft does not parse.
fn commit_date_draft(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    bound: DateBound,
) -> bool {
    let draft = view_data.draft_mut(bound).trim().to_owned();
    if draft.is_empty() {
        apply(
            state,
            view_data,
            internal_tx,
            GridCommand::SetDateBound(bound, None),
        );
        return true;
    }

    match parse_date(&draft) {
        Ok(date) => {
            *view_data.draft_mut(bound) = format_date(date);
            apply(
                state,
                view_data,
                internal_tx,
                GridCommand::SetDateBound(bound, Some(date)),
            );
            true
        }
        Err(error) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} {error}", bound.label()),
            );
            false
        }
    }
}

fn handle_table_key(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') | KeyCode::Tab => view_data.focus = Focus::Search,
        KeyCode::Char('f') => view_data.focus = Focus::StartDate,
        KeyCode::Char('t') => view_data.focus = Focus::EndDate,
        KeyCode::Char('x') => {
            view_data.start_draft.clear();
            view_data.end_draft.clear();
            apply(state, view_data, internal_tx, GridCommand::ClearDateRange);
        }
        KeyCode::Char('j') | KeyCode::Down => move_row(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_row(state, view_data, -1),
        KeyCode::Char('g') | KeyCode::Home => view_data.selected_row = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.selected_row = state.visible_len().saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => move_col(view_data, -1),
        KeyCode::Char('l') | KeyCode::Right => move_col(view_data, 1),
        KeyCode::Char('s') => {
            let column = view_data.selected_column();
            apply(state, view_data, internal_tx, GridCommand::CycleSort(column));
        }
        KeyCode::Char('S') => apply(state, view_data, internal_tx, GridCommand::ClearSort),
        KeyCode::Char('m') => open_menu_for_selected_column(state, view_data, internal_tx),
        _ => {}
    }
    false
}

fn move_row(state: &GridState, view_data: &mut ViewData, delta: isize) {
    let last = state.visible_len().saturating_sub(1);
    view_data.selected_row = view_data.selected_row.saturating_add_signed(delta).min(last);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let last = ColumnKey::ALL.len() - 1;
    view_data.selected_col = view_data.selected_col.saturating_add_signed(delta).min(last);
}

/// Keyboard route to the column menu; anchors it under the header cell.
fn open_menu_for_selected_column(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let column = view_data.selected_column();
    let table = screen_layout(view_data.area).table;
    let (x, y) = header_cells(table)
        .into_iter()
        .find(|(key, _)| *key == column)
        .map(|(_, rect)| (rect.x, rect.y.saturating_add(1)))
        .unwrap_or((table.x, table.y));
    apply(
        state,
        view_data,
        internal_tx,
        GridCommand::HeaderRightClicked { column, x, y },
    );
}

fn handle_mouse_event(
    state: &mut GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
) {
    let layout = screen_layout(view_data.area);
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Right) => match column_at(layout.table, x, y) {
            Some(column) => {
                view_data.selected_col = column.index();
                apply(
                    state,
                    view_data,
                    internal_tx,
                    GridCommand::HeaderRightClicked { column, x, y },
                );
            }
            None => apply(state, view_data, internal_tx, GridCommand::DocumentClicked),
        },
        MouseEventKind::Down(MouseButton::Left) => {
            let menu = state.menu();
            if menu.open {
                if let Some(command) = menu_item_at(menu, view_data.area, x, y) {
                    apply(
                        state,
                        view_data,
                        internal_tx,
                        GridCommand::MenuCommand(command),
                    );
                    return;
                }
                if rect_contains(menu_rect(menu, view_data.area), x, y) {
                    return;
                }
            }
            apply(state, view_data, internal_tx, GridCommand::DocumentClicked);
            if let Some(focus) = focus_at(&layout, x, y) {
                debug!(?focus, "focus moved by click");
                view_data.focus = focus;
            }
        }
        MouseEventKind::ScrollDown => move_row(state, view_data, 1),
        MouseEventKind::ScrollUp => move_row(state, view_data, -1),
        _ => {}
    }
}

fn focus_at(layout: &ScreenLayout, x: u16, y: u16) -> Option<Focus> {
    [
        (layout.search, Focus::Search),
        (layout.start, Focus::StartDate),
        (layout.end, Focus::EndDate),
        (layout.table, Focus::Table),
    ]
    .into_iter()
    .find(|(rect, _)| rect_contains(*rect, x, y))
    .map(|(_, focus)| focus)
}

fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .split(area);
    let inputs = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(rows[0]);

    ScreenLayout {
        search: inputs[0],
        start: inputs[1],
        end: inputs[2],
        table: rows[1],
        status: rows[2],
    }
}

fn column_widths() -> [Constraint; 5] {
    [Constraint::Ratio(1, ColumnKey::ALL.len() as u32); 5]
}

/// Screen cells of the header row, one per column, matching the table layout.
fn header_cells(table: Rect) -> Vec<(ColumnKey, Rect)> {
    let inner = Block::default().borders(Borders::ALL).inner(table);
    let header = Rect {
        height: inner.height.min(1),
        ..inner
    };
    let cells = Layout::horizontal(column_widths())
        .spacing(1)
        .split(header);
    ColumnKey::ALL
        .iter()
        .copied()
        .zip(cells.iter().copied())
        .collect()
}

fn column_at(table: Rect, x: u16, y: u16) -> Option<ColumnKey> {
    header_cells(table)
        .into_iter()
        .find(|(_, rect)| rect_contains(*rect, x, y))
        .map(|(column, _)| column)
}

/// Menu box anchored at the pointer, shifted to stay on screen.
fn menu_rect(menu: MenuState, area: Rect) -> Rect {
    let width = MENU_WIDTH.min(area.width);
    let height = (MenuCommand::ALL.len() as u16 + 2).min(area.height);
    let max_x = area.x.saturating_add(area.width).saturating_sub(width);
    let max_y = area.y.saturating_add(area.height).saturating_sub(height);
    Rect {
        x: menu.x.clamp(area.x, max_x.max(area.x)),
        y: menu.y.clamp(area.y, max_y.max(area.y)),
        width,
        height,
    }
}

fn menu_item_at(menu: MenuState, area: Rect, x: u16, y: u16) -> Option<MenuCommand> {
    if !menu.open {
        return None;
    }
    let inner = Block::default()
        .borders(Borders::ALL)
        .inner(menu_rect(menu, area));
    if !rect_contains(inner, x, y) {
        return None;
    }
    MenuCommand::ALL.get(usize::from(y - inner.y)).copied()
}

fn highlight_style(color: Option<HighlightColor>) -> Style {
    match color {
        Some(color) => {
            let (r, g, b) = color.rgb();
            Style::default().fg(Color::Black).bg(Color::Rgb(r, g, b))
        }
        None => Style::default(),
    }
}

fn header_label(state: &GridState, column: ColumnKey) -> String {
    let mut label = column.label().to_owned();
    if let Some(sort) = state.sort()
        && sort.column == column
    {
        label.push_str(match sort.direction {
            SortDirection::Asc => SORT_ASC_MARK,
            SortDirection::Desc => SORT_DESC_MARK,
        });
    }
    label
}

fn table_title(state: &GridState) -> String {
    let mut title = format!(
        "invoices {}/{}",
        state.visible_len(),
        state.store().len()
    );
    if let Some(sort) = state.sort() {
        title.push_str(&format!(
            " | sort {} {}",
            sort.column.label(),
            sort.direction.as_str()
        ));
    }
    title
}

fn status_text(state: &GridState, view_data: &ViewData) -> String {
    if let Some(status) = state.status_line() {
        return status.to_owned();
    }
    if state.menu().open {
        return "1 yellow | 2 green | 3 red | 0 clear | esc close".to_owned();
    }
    match view_data.focus {
        Focus::Table => {
            "/ search | f/t dates | x clear dates | s/S sort | m or right-click menu | q quit"
                .to_owned()
        }
        Focus::Search => "type to filter | enter/esc done | tab next".to_owned(),
        Focus::StartDate | Focus::EndDate => {
            "yyyy-mm-dd | enter apply | empty clears | esc cancel".to_owned()
        }
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &GridState, view_data: &ViewData) {
    let layout = screen_layout(frame.area());

    let inputs = [
        (layout.search, "search", state.search_input(), Focus::Search),
        (
            layout.start,
            DateBound::Start.label(),
            view_data.start_draft.as_str(),
            Focus::StartDate,
        ),
        (
            layout.end,
            DateBound::End.label(),
            view_data.end_draft.as_str(),
            Focus::EndDate,
        ),
    ];
    for (area, title, text, focus) in inputs {
        let focused = view_data.focus == focus;
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let body = if focused {
            format!("{text}_")
        } else {
            text.to_owned()
        };
        let widget = Paragraph::new(body).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(widget, area);
    }

    render_table(frame, layout.table, state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout.status);

    if state.menu().open {
        render_menu(frame, state);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &GridState,
    view_data: &ViewData,
) {
    let header = Row::new(ColumnKey::ALL.iter().map(|column| {
        Cell::from(header_label(state, *column)).style(
            highlight_style(state.color_of(*column)).add_modifier(Modifier::BOLD),
        )
    }));

    let rows = state.visible_rows().enumerate().map(|(row_index, row)| {
        let selected_row = row_index == view_data.selected_row;
        let cells = ColumnKey::ALL.iter().map(|column| {
            let color = state.color_of(*column);
            let mut style = highlight_style(color);
            if selected_row && color.is_none() {
                style = style.bg(Color::DarkGray);
            }
            if selected_row && *column == view_data.selected_column() {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
            }
            Cell::from(row.cell_text(*column)).style(style)
        });
        Row::new(cells.collect::<Vec<_>>())
    });

    let table = Table::new(rows, column_widths())
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state))
                .borders(Borders::ALL),
        );

    let mut table_state = TableState::default().with_selected(Some(view_data.selected_row));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_menu(frame: &mut ratatui::Frame<'_>, state: &GridState) {
    let menu = state.menu();
    let Some(column) = menu.open_target() else {
        return;
    };
    let area = menu_rect(menu, frame.area());
    frame.render_widget(Clear, area);

    let current = state.color_of(column);
    let lines = MenuCommand::ALL
        .iter()
        .enumerate()
        .map(|(index, command)| {
            let key = match command {
                MenuCommand::Clear => 0,
                MenuCommand::Highlight(_) => index + 1,
            };
            let active = matches!(command, MenuCommand::Highlight(color) if Some(*color) == current);
            let marker = if active { " *" } else { "" };
            format!("{key} {}{marker}", command.label())
        })
        .collect::<Vec<_>>()
        .join("\n");

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(column.label())
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}
