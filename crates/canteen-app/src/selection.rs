// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tracing::warn;

use crate::{AdminApi, CompanyId, CompanyRef};

pub const NONE_SELECTED_LABEL: &str = "Select Company";
pub const LOAD_ERROR_LABEL: &str = "Error loading companies";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: Option<CompanyId>,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder() -> Self {
        Self {
            value: None,
            label: NONE_SELECTED_LABEL.to_owned(),
        }
    }

    pub fn load_error() -> Self {
        Self {
            value: None,
            label: LOAD_ERROR_LABEL.to_owned(),
        }
    }
}

impl From<&CompanyRef> for SelectOption {
    fn from(company: &CompanyRef) -> Self {
        Self {
            value: Some(company.id.clone()),
            label: company.name.clone(),
        }
    }
}

/// A dropdown-like control. The control owns its selection; there is no
/// shadow copy anywhere else.
pub trait SelectorHandle {
    fn selected(&self) -> Option<CompanyId>;
    fn replace_options(&mut self, options: Vec<SelectOption>);
    /// Selecting a value that is not among the current options clears the
    /// selection.
    fn select(&mut self, value: Option<CompanyId>);
}

/// The panel that shows data for whatever a selector points at.
pub trait DependentView {
    fn show_empty(&mut self);
    fn disable_add(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorSlot {
    MenuCompany,
    AnalyticsCompany,
}

impl SelectorSlot {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MenuCompany => "menu company",
            Self::AnalyticsCompany => "analytics company",
        }
    }
}

pub struct SelectorTarget<'a> {
    pub slot: SelectorSlot,
    pub selector: &'a mut dyn SelectorHandle,
    pub dependent: &'a mut dyn DependentView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every present selector was rebuilt; `cleared` lists the slots whose
    /// previous selection vanished from the fresh list.
    Synced { cleared: Vec<SelectorSlot> },
    /// The company list could not be fetched; present selectors show only
    /// the load-error option.
    Degraded { error: String },
}

impl SyncOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Rebuild every present selector from a freshly fetched company list.
/// Failures are absorbed into [`SyncOutcome::Degraded`]; this never errors.
pub fn synchronize<A>(api: &A, targets: &mut [Option<SelectorTarget<'_>>]) -> SyncOutcome
where
    A: AdminApi + ?Sized,
{
    rebuild_selectors(api.list_company_refs(), targets)
}

/// The second half of [`synchronize`], for callers that fetched the company
/// list somewhere else.
pub fn rebuild_selectors(
    companies: Result<Vec<CompanyRef>>,
    targets: &mut [Option<SelectorTarget<'_>>],
) -> SyncOutcome {
    let companies = match companies {
        Ok(companies) => companies,
        Err(error) => {
            let message = format!("{error:#}");
            warn!(error = %message, "company selector refresh failed");
            for target in targets.iter_mut().flatten() {
                target.selector.replace_options(vec![SelectOption::load_error()]);
            }
            return SyncOutcome::Degraded { error: message };
        }
    };

    let mut cleared = Vec::new();
    for target in targets.iter_mut().flatten() {
        let previous = target.selector.selected();

        let mut options = Vec::with_capacity(companies.len() + 1);
        options.push(SelectOption::placeholder());
        options.extend(companies.iter().map(SelectOption::from));
        target.selector.replace_options(options);

        let Some(previous) = previous else {
            target.selector.select(None);
            continue;
        };
        if companies.iter().any(|company| company.id == previous) {
            target.selector.select(Some(previous));
        } else {
            target.selector.select(None);
            target.dependent.show_empty();
            target.dependent.disable_add();
            cleared.push(target.slot);
        }
    }
    SyncOutcome::Synced { cleared }
}

/// The selector control used by the menu and analytics tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySelector {
    options: Vec<SelectOption>,
    selected: Option<CompanyId>,
}

impl Default for CompanySelector {
    fn default() -> Self {
        Self {
            options: vec![SelectOption::placeholder()],
            selected: None,
        }
    }
}

impl CompanySelector {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected_label(&self) -> &str {
        self.options
            .iter()
            .find(|option| option.value == self.selected)
            .or_else(|| self.options.first())
            .map_or(NONE_SELECTED_LABEL, |option| option.label.as_str())
    }

    pub fn is_degraded(&self) -> bool {
        self.options.len() == 1 && self.options[0].label == LOAD_ERROR_LABEL
    }

    /// Moves to the next option, wrapping past the end. Returns the new
    /// selection.
    pub fn select_next(&mut self) -> Option<CompanyId> {
        self.step(1)
    }

    pub fn select_prev(&mut self) -> Option<CompanyId> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<CompanyId> {
        if self.options.is_empty() {
            return None;
        }
        let current = self
            .options
            .iter()
            .position(|option| option.value == self.selected)
            .unwrap_or(0) as isize;
        let len = self.options.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.selected = self.options[next].value.clone();
        self.selected.clone()
    }
}

impl SelectorHandle for CompanySelector {
    fn selected(&self) -> Option<CompanyId> {
        self.selected.clone()
    }

    fn replace_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
        if !self
            .options
            .iter()
            .any(|option| option.value.is_some() && option.value == self.selected)
        {
            self.selected = None;
        }
    }

    fn select(&mut self, value: Option<CompanyId>) {
        self.selected = value.filter(|id| {
            self.options
                .iter()
                .any(|option| option.value.as_ref() == Some(id))
        });
    }
}
