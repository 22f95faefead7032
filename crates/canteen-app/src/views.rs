// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{Analytics, Company, CompanyId, DependentView, Menu};

/// Load cycle of one tab's primary content.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ViewState<T> {
    pub fn begin(&mut self) {
        *self = Self::Loading;
    }

    /// Replaces the whole view with the outcome. Nothing from the previous
    /// payload survives.
    pub fn finish(&mut self, result: Result<T>) {
        *self = match result {
            Ok(value) => Self::Loaded(value),
            Err(error) => Self::Error(format!("{error:#}")),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

pub type CompaniesView = ViewState<Vec<Company>>;

/// Menu list for the company picked in the menu tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenusPanel {
    pub view: ViewState<Vec<Menu>>,
    pub add_enabled: bool,
    pub loaded_for: Option<CompanyId>,
}

impl MenusPanel {
    pub fn menus(&self) -> &[Menu] {
        self.view.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    /// Applies a load result unless the selection moved on while it was in
    /// flight. Returns whether the result was rendered.
    pub fn apply(
        &mut self,
        requested: &CompanyId,
        current: Option<&CompanyId>,
        result: Result<Vec<Menu>>,
    ) -> bool {
        if current != Some(requested) {
            return false;
        }
        self.view.finish(result);
        self.loaded_for = Some(requested.clone());
        self.add_enabled = true;
        true
    }
}

impl DependentView for MenusPanel {
    fn show_empty(&mut self) {
        self.view.reset();
        self.loaded_for = None;
    }

    fn disable_add(&mut self) {
        self.add_enabled = false;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsPanel {
    pub view: ViewState<Analytics>,
    pub loaded_for: Option<CompanyId>,
}

impl AnalyticsPanel {
    pub fn apply(
        &mut self,
        requested: &CompanyId,
        current: Option<&CompanyId>,
        result: Result<Analytics>,
    ) -> bool {
        if current != Some(requested) {
            return false;
        }
        self.view.finish(result);
        self.loaded_for = Some(requested.clone());
        true
    }
}

impl DependentView for AnalyticsPanel {
    fn show_empty(&mut self) {
        self.view.reset();
        self.loaded_for = None;
    }
}
