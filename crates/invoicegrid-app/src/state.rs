// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use time::Date;
use tracing::{debug, warn};

use crate::{
    ColumnKey, DateBound, FilterQuery, HighlightColor, HighlightState, InvoiceRow, RowStore,
    SortSpec, format_date, sort_indices, visible_indices,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub open: bool,
    pub target: Option<ColumnKey>,
    pub x: u16,
    pub y: u16,
}

impl MenuState {
    pub fn open_target(&self) -> Option<ColumnKey> {
        if self.open { self.target } else { None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Highlight(HighlightColor),
    Clear,
}

impl MenuCommand {
    pub const ALL: [Self; 4] = [
        Self::Highlight(HighlightColor::Warning),
        Self::Highlight(HighlightColor::Success),
        Self::Highlight(HighlightColor::Danger),
        Self::Clear,
    ];

    pub fn label(self) -> String {
        match self {
            Self::Highlight(color) => format!("highlight {}", color.label()),
            Self::Clear => "clear highlight".to_owned(),
        }
    }

    pub fn resolve(value: &str) -> Result<Self> {
        match value.trim() {
            "clear" => Ok(Self::Clear),
            other => HighlightColor::parse(other)
                .map(Self::Highlight)
                .ok_or_else(|| {
                    anyhow!(
                        "unknown menu command {value:?}; expected warning, success, danger, or clear"
                    )
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCommand {
    SetSearch(String),
    SetDateBound(DateBound, Option<Date>),
    ClearDateRange,
    HeaderRightClicked { column: ColumnKey, x: u16, y: u16 },
    MenuCommand(MenuCommand),
    DocumentClicked,
    CycleSort(ColumnKey),
    SortBy(SortSpec),
    ClearSort,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    VisibleChanged { visible: usize, total: usize },
    SortChanged(Option<SortSpec>),
    MenuOpened { column: ColumnKey, x: u16, y: u16 },
    MenuClosed,
    HighlightSet(ColumnKey, HighlightColor),
    HighlightCleared(ColumnKey),
    StatusUpdated(String),
    StatusCleared,
}

/// Owns the query, sort, visible set, highlights and menu for one dataset.
/// Renderers borrow it; every mutation goes through [`GridState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    store: RowStore,
    search_input: String,
    query: FilterQuery,
    sort: Option<SortSpec>,
    visible: Vec<usize>,
    highlights: HighlightState,
    menu: MenuState,
    status_line: Option<String>,
}

impl GridState {
    pub fn new(store: RowStore) -> Self {
        let mut state = Self {
            visible: (0..store.len()).collect(),
            store,
            search_input: String::new(),
            query: FilterQuery::default(),
            sort: None,
            highlights: HighlightState::default(),
            menu: MenuState::default(),
            status_line: None,
        };
        state.refilter();
        state
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self.refilter();
        self
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn menu(&self) -> MenuState {
        self.menu
    }

    pub fn highlights(&self) -> &HighlightState {
        &self.highlights
    }

    pub fn color_of(&self, column: ColumnKey) -> Option<HighlightColor> {
        self.highlights.color_of(column)
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_row(&self, position: usize) -> Option<&InvoiceRow> {
        self.visible
            .get(position)
            .and_then(|index| self.store.rows().get(*index))
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &InvoiceRow> + '_ {
        self.visible
            .iter()
            .filter_map(|index| self.store.rows().get(*index))
    }

    pub fn dispatch(&mut self, command: GridCommand) -> Vec<GridEvent> {
        match command {
            GridCommand::SetSearch(raw) => {
                self.query.set_search(&raw);
                self.search_input = raw;
                self.refilter()
            }
            GridCommand::SetDateBound(bound, value) => {
                self.query.range.set(bound, value);
                let value_text = value.map(format_date).unwrap_or_default();
                debug!(
                    bound = bound.label(),
                    value = value_text.as_str(),
                    "date bound changed"
                );
                self.refilter()
            }
            GridCommand::ClearDateRange => {
                self.query.range.set(DateBound::Start, None);
                self.query.range.set(DateBound::End, None);
                let mut events = self.refilter();
                events.push(self.set_status("date range cleared"));
                events
            }
            GridCommand::HeaderRightClicked { column, x, y } => {
                self.menu = MenuState {
                    open: true,
                    target: Some(column),
                    x,
                    y,
                };
                debug!(column = column.as_str(), x, y, "column menu opened");
                vec![GridEvent::MenuOpened { column, x, y }]
            }
            GridCommand::MenuCommand(command) => self.apply_menu_command(command),
            GridCommand::DocumentClicked => {
                if self.menu.open {
                    vec![self.close_menu()]
                } else {
                    Vec::new()
                }
            }
            GridCommand::CycleSort(column) => {
                let next = SortSpec::cycle(self.sort, column);
                self.apply_sort(next)
            }
            GridCommand::SortBy(spec) => self.apply_sort(Some(spec)),
            GridCommand::ClearSort => self.apply_sort(None),
            GridCommand::SetStatus(message) => vec![self.set_status(&message)],
            GridCommand::ClearStatus => {
                self.status_line = None;
                vec![GridEvent::StatusCleared]
            }
        }
    }

    fn apply_menu_command(&mut self, command: MenuCommand) -> Vec<GridEvent> {
        let Some(column) = self.menu.open_target() else {
            return vec![self.set_status("no column targeted")];
        };

        let mut events = Vec::with_capacity(3);
        match command {
            MenuCommand::Highlight(color) => {
                self.highlights.set(column, color);
                debug!(
                    column = column.as_str(),
                    color = color.as_str(),
                    "column highlighted"
                );
                events.push(GridEvent::HighlightSet(column, color));
                events.push(self.close_menu());
                events.push(self.set_status(&format!(
                    "{} highlighted {}",
                    column.label(),
                    color.label()
                )));
            }
            MenuCommand::Clear => {
                let removed = self.highlights.clear(column);
                debug!(column = column.as_str(), removed, "column highlight cleared");
                if removed {
                    events.push(GridEvent::HighlightCleared(column));
                }
                events.push(self.close_menu());
                let message = if removed {
                    format!("{} highlight cleared", column.label())
                } else {
                    format!("{} has no highlight", column.label())
                };
                events.push(self.set_status(&message));
            }
        }
        events
    }

    fn apply_sort(&mut self, sort: Option<SortSpec>) -> Vec<GridEvent> {
        self.sort = sort;
        let label = match sort {
            Some(spec) => format!("sort {} {}", spec.column.label(), spec.direction.as_str()),
            None => "sort cleared".to_owned(),
        };
        let mut events = vec![GridEvent::SortChanged(sort)];
        events.extend(self.refilter());
        events.push(self.set_status(&label));
        events
    }

    /// Rebuilds the visible set from scratch and re-applies the active sort.
    fn refilter(&mut self) -> Vec<GridEvent> {
        let rows = self.store.rows();
        let mut visible = visible_indices(rows, &self.query);
        if let Some(spec) = self.sort {
            sort_indices(rows, &mut visible, spec);
        }
        self.visible = visible;

        let total = rows.len();
        debug!(
            search = self.query.search(),
            visible = self.visible.len(),
            total,
            "visible rows recomputed"
        );

        let mut events = vec![GridEvent::VisibleChanged {
            visible: self.visible.len(),
            total,
        }];
        if self.query.range.is_inverted() {
            warn!("date range start is after end; no rows can match");
            events.push(self.set_status("date range inverted; no rows match"));
        }
        events
    }

    fn close_menu(&mut self) -> GridEvent {
        self.menu.open = false;
        GridEvent::MenuClosed
    }

    fn set_status(&mut self, message: &str) -> GridEvent {
        self.status_line = Some(message.to_owned());
        GridEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{GridCommand, GridEvent, GridState, MenuCommand, MenuState};
    use crate::{
        ColumnKey, DateBound, HighlightColor, InvoiceRow, InvoiceStatus, RowStore, SortDirection,
        SortSpec,
    };
    use time::{Date, Month};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid test date")
    }

    fn grid() -> GridState {
        GridState::new(RowStore::new(vec![
            InvoiceRow {
                id: "001".to_owned(),
                name: "Acme".to_owned(),
                date: date(2025, Month::January, 10),
                amount_cents: 10_000,
                status: InvoiceStatus::Paid,
            },
            InvoiceRow {
                id: "002".to_owned(),
                name: "Beta".to_owned(),
                date: date(2025, Month::February, 15),
                amount_cents: 25_050,
                status: InvoiceStatus::Unpaid,
            },
            InvoiceRow {
                id: "003".to_owned(),
                name: "Beta Labs".to_owned(),
                date: date(2025, Month::March, 3),
                amount_cents: 7_500,
                status: InvoiceStatus::PartiallyPaid,
            },
        ]))
    }

    fn visible_ids(state: &GridState) -> Vec<&str> {
        state.visible_rows().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn new_grid_shows_every_row_in_store_order() {
        let state = grid();
        assert_eq!(visible_ids(&state), vec!["001", "002", "003"]);
        assert_eq!(state.menu(), MenuState::default());
        assert!(state.highlights().is_empty());
    }

    #[test]
    fn search_change_refilters() {
        let mut state = grid();
        let events = state.dispatch(GridCommand::SetSearch(" beta ".to_owned()));
        assert_eq!(
            events,
            vec![GridEvent::VisibleChanged {
                visible: 2,
                total: 3
            }]
        );
        assert_eq!(state.search_input(), " beta ");
        assert_eq!(state.query().search(), "beta");
        assert_eq!(visible_ids(&state), vec!["002", "003"]);
    }

    #[test]
    fn date_change_narrows_active_text_filter() {
        let mut state = grid();
        state.dispatch(GridCommand::SetSearch("beta".to_owned()));
        state.dispatch(GridCommand::SetDateBound(
            DateBound::Start,
            Some(date(2025, Month::March, 1)),
        ));
        assert_eq!(visible_ids(&state), vec!["003"]);

        state.dispatch(GridCommand::SetSearch(String::new()));
        assert_eq!(visible_ids(&state), vec!["003"]);
    }

    #[test]
    fn clear_date_range_restores_rows_and_keeps_search() {
        let mut state = grid();
        state.dispatch(GridCommand::SetSearch("beta".to_owned()));
        state.dispatch(GridCommand::SetDateBound(
            DateBound::End,
            Some(date(2025, Month::January, 31)),
        ));
        assert!(visible_ids(&state).is_empty());

        let events = state.dispatch(GridCommand::ClearDateRange);
        assert!(events.contains(&GridEvent::StatusUpdated("date range cleared".to_owned())));
        assert!(state.query().range.is_unbounded());
        assert_eq!(visible_ids(&state), vec!["002", "003"]);
    }

    #[test]
    fn inverted_range_empties_view_with_status() {
        let mut state = grid();
        state.dispatch(GridCommand::SetDateBound(
            DateBound::Start,
            Some(date(2025, Month::March, 1)),
        ));
        let events = state.dispatch(GridCommand::SetDateBound(
            DateBound::End,
            Some(date(2025, Month::January, 1)),
        ));
        assert_eq!(state.visible_len(), 0);
        assert!(events.contains(&GridEvent::StatusUpdated(
            "date range inverted; no rows match".to_owned()
        )));
    }

    #[test]
    fn sort_survives_refiltering() {
        let mut state = grid();
        state.dispatch(GridCommand::SortBy(SortSpec::new(
            ColumnKey::Amount,
            SortDirection::Desc,
        )));
        assert_eq!(visible_ids(&state), vec!["002", "001", "003"]);

        state.dispatch(GridCommand::SetSearch("0".to_owned()));
        assert_eq!(visible_ids(&state), vec!["002", "001", "003"]);

        state.dispatch(GridCommand::SetSearch("beta".to_owned()));
        assert_eq!(visible_ids(&state), vec!["002", "003"]);
    }

    #[test]
    fn cycle_sort_returns_to_store_order() {
        let mut state = grid();
        state.dispatch(GridCommand::CycleSort(ColumnKey::Amount));
        assert_eq!(visible_ids(&state), vec!["003", "001", "002"]);
        state.dispatch(GridCommand::CycleSort(ColumnKey::Amount));
        assert_eq!(visible_ids(&state), vec!["002", "001", "003"]);
        let events = state.dispatch(GridCommand::CycleSort(ColumnKey::Amount));
        assert_eq!(events.first(), Some(&GridEvent::SortChanged(None)));
        assert_eq!(state.status_line(), Some("sort cleared"));
        assert_eq!(visible_ids(&state), vec!["001", "002", "003"]);
    }

    #[test]
    fn right_click_opens_menu_at_pointer() {
        let mut state = grid();
        let events = state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Name,
            x: 12,
            y: 4,
        });
        assert_eq!(
            events,
            vec![GridEvent::MenuOpened {
                column: ColumnKey::Name,
                x: 12,
                y: 4
            }]
        );
        assert_eq!(
            state.menu(),
            MenuState {
                open: true,
                target: Some(ColumnKey::Name),
                x: 12,
                y: 4
            }
        );
    }

    #[test]
    fn second_right_click_retargets_single_menu() {
        let mut state = grid();
        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Id,
            x: 1,
            y: 1,
        });
        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Date,
            x: 30,
            y: 2,
        });
        let menu = state.menu();
        assert!(menu.open);
        assert_eq!(menu.target, Some(ColumnKey::Date));
        assert_eq!((menu.x, menu.y), (30, 2));
    }

    #[test]
    fn outside_click_closes_menu_without_touching_highlights() {
        let mut state = grid();
        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Status,
            x: 1,
            y: 1,
        });
        assert_eq!(
            state.dispatch(GridCommand::DocumentClicked),
            vec![GridEvent::MenuClosed]
        );
        assert!(!state.menu().open);
        assert!(state.highlights().is_empty());

        assert!(state.dispatch(GridCommand::DocumentClicked).is_empty());
    }

    #[test]
    fn highlight_then_clear_leaves_column_unannotated() {
        let mut state = grid();
        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Status,
            x: 5,
            y: 5,
        });
        let events = state.dispatch(GridCommand::MenuCommand(MenuCommand::Highlight(
            HighlightColor::Success,
        )));
        assert_eq!(
            events,
            vec![
                GridEvent::HighlightSet(ColumnKey::Status, HighlightColor::Success),
                GridEvent::MenuClosed,
                GridEvent::StatusUpdated("status highlighted green".to_owned()),
            ]
        );
        assert_eq!(
            state.color_of(ColumnKey::Status),
            Some(HighlightColor::Success)
        );
        assert!(!state.menu().open);

        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Status,
            x: 5,
            y: 5,
        });
        let events = state.dispatch(GridCommand::MenuCommand(MenuCommand::Clear));
        assert_eq!(
            events,
            vec![
                GridEvent::HighlightCleared(ColumnKey::Status),
                GridEvent::MenuClosed,
                GridEvent::StatusUpdated("status highlight cleared".to_owned()),
            ]
        );
        assert_eq!(state.color_of(ColumnKey::Status), None);
        assert!(!state.menu().open);
    }

    #[test]
    fn menu_command_without_open_menu_is_ignored() {
        let mut state = grid();
        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Amount,
            x: 0,
            y: 0,
        });
        state.dispatch(GridCommand::DocumentClicked);

        let events = state.dispatch(GridCommand::MenuCommand(MenuCommand::Highlight(
            HighlightColor::Danger,
        )));
        assert_eq!(
            events,
            vec![GridEvent::StatusUpdated("no column targeted".to_owned())]
        );
        assert!(state.highlights().is_empty());
    }

    #[test]
    fn highlights_never_change_visible_rows() {
        let mut state = grid();
        state.dispatch(GridCommand::SetSearch("beta".to_owned()));
        let before = visible_ids(&state)
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        state.dispatch(GridCommand::HeaderRightClicked {
            column: ColumnKey::Name,
            x: 0,
            y: 0,
        });
        state.dispatch(GridCommand::MenuCommand(MenuCommand::Highlight(
            HighlightColor::Warning,
        )));
        assert_eq!(visible_ids(&state), before);
    }

    #[test]
    fn menu_commands_resolve_from_names() {
        assert_eq!(MenuCommand::resolve("clear").ok(), Some(MenuCommand::Clear));
        assert_eq!(
            MenuCommand::resolve("danger").ok(),
            Some(MenuCommand::Highlight(HighlightColor::Danger))
        );
        assert!(MenuCommand::resolve("bold").is_err());
        assert_eq!(MenuCommand::ALL[1].label(), "highlight green");
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = grid();
        state.dispatch(GridCommand::SetStatus("loaded".to_owned()));
        assert_eq!(state.status_line(), Some("loaded"));
        assert_eq!(
            state.dispatch(GridCommand::ClearStatus),
            vec![GridEvent::StatusCleared]
        );
        assert_eq!(state.status_line(), None);
    }
}
