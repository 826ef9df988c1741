// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::SearchMode;

/// UI-facing application state. Owned by the event loop and mutated only
/// through `dispatch`; the dataset itself lives outside this struct and is
/// read-only after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub query: String,
    pub mode: SearchMode,
    pub detail: Option<usize>,
    pub settings_open: bool,
    pub active_user: String,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            query: String::new(),
            mode: SearchMode::Exact,
            detail: None,
            settings_open: false,
            active_user: String::new(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    QueryPush(char),
    QueryPop,
    ClearQuery,
    ToggleMode,
    OpenDetail(usize),
    CloseDetail,
    OpenSettings,
    CloseSettings,
    SetUser(String),
    ClearUser,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    QueryChanged,
    ModeChanged(SearchMode),
    DetailOpened(usize),
    DetailClosed,
    SettingsOpened,
    SettingsClosed,
    UserChanged(String),
    UserCleared,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::QueryPush(ch) => {
                self.query.push(ch);
                vec![AppEvent::QueryChanged]
            }
            AppCommand::QueryPop => {
                if self.query.pop().is_none() {
                    return Vec::new();
                }
                vec![AppEvent::QueryChanged]
            }
            AppCommand::ClearQuery => {
                if self.query.is_empty() {
                    return Vec::new();
                }
                self.query.clear();
                vec![AppEvent::QueryChanged]
            }
            AppCommand::ToggleMode => {
                self.mode = self.mode.toggled();
                let label = match self.mode {
                    SearchMode::Exact => "búsqueda exacta",
                    SearchMode::Fuzzy => "búsqueda difusa",
                };
                vec![AppEvent::ModeChanged(self.mode), self.set_status(label)]
            }
            AppCommand::OpenDetail(index) => {
                self.detail = Some(index);
                vec![AppEvent::DetailOpened(index)]
            }
            AppCommand::CloseDetail => {
                if self.detail.take().is_none() {
                    return Vec::new();
                }
                vec![AppEvent::DetailClosed]
            }
            AppCommand::OpenSettings => {
                self.settings_open = true;
                vec![AppEvent::SettingsOpened]
            }
            AppCommand::CloseSettings => {
                self.settings_open = false;
                vec![AppEvent::SettingsClosed]
            }
            AppCommand::SetUser(name) => {
                self.active_user = name.clone();
                vec![
                    AppEvent::UserChanged(name),
                    self.set_status("usuario guardado"),
                ]
            }
            AppCommand::ClearUser => {
                self.active_user.clear();
                vec![AppEvent::UserCleared, self.set_status("usuario eliminado")]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
