// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::Date;
use tracing::debug;

use crate::{
    AnalyticsPanel, AnalyticsPeriod, CompaniesView, CompanyForm, CompanyId, CompanyRef,
    CompanySelector, DashboardError, DependentView, ErrorKind, ItemEditForm, ItemsForm,
    MenuEditDraft, MenuForm, MenuId, MenuItemId, MenusPanel, Mutation, SelectorHandle,
    SelectorSlot, SelectorTarget, SyncOutcome, TabKind, Task, TaskResult, Toast,
    rebuild_selectors,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Company { id: CompanyId, name: String },
    Menu { id: MenuId },
    Item {
        menu_id: MenuId,
        item_id: MenuItemId,
        name: String,
    },
}

/// A destructive action waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub message: String,
    pub target: DeleteTarget,
}

impl ConfirmationRequest {
    fn for_target(target: DeleteTarget) -> Self {
        let message = match &target {
            DeleteTarget::Company { name, .. } => format!(
                "Are you sure you want to delete \"{name}\"?\n\n\
                 This will also delete:\n\
                 \u{2022} All menus for this company\n\
                 \u{2022} All employee ratings and submissions\n\n\
                 This action cannot be undone."
            ),
            DeleteTarget::Menu { .. } => "Are you sure you want to delete this menu? \
                 This will also delete all associated ratings and cannot be undone."
                .to_owned(),
            DeleteTarget::Item { name, .. } => {
                format!("Are you sure you want to delete \"{name}\"?")
            }
        };
        Self { message, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Accept,
    Decline,
}

/// What a user action produced: an optional status message, and whether the
/// action went through (forms close only on completion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub toast: Option<Toast>,
    pub completed: bool,
}

impl ActionOutcome {
    pub fn done(toast: Toast) -> Self {
        Self {
            toast: Some(toast),
            completed: true,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            toast: None,
            completed: false,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            toast: Some(Toast::warning(message)),
            completed: false,
        }
    }

    /// Validation problems show their own message; anything else is
    /// reported as `Failed to <action>: <detail>`.
    pub fn failed(action: &str, error: &anyhow::Error) -> Self {
        let toast = match DashboardError::classify(error) {
            ErrorKind::Validation => Toast::warning(error.to_string()),
            ErrorKind::Fetch => Toast::error(format!("Failed to {action}: {error:#}")),
        };
        Self {
            toast: Some(toast),
            completed: false,
        }
    }
}

/// A form whose starting values had to be fetched first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditForm {
    Company { id: CompanyId, form: CompanyForm },
    Menu(MenuEditDraft),
}

/// What applying a [`TaskResult`] produced. `follow_up` tasks must be run
/// and applied in turn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Applied {
    pub outcome: Option<ActionOutcome>,
    pub sync: Option<SyncOutcome>,
    pub form: Option<EditForm>,
    pub follow_up: Vec<Task>,
}

impl Applied {
    fn outcome(outcome: ActionOutcome) -> Self {
        Self {
            outcome: Some(outcome),
            ..Self::default()
        }
    }
}

/// Everything the dashboard renders, owned in one place. Operations never
/// call the service themselves: they update the view, hand back the
/// [`Task`] to run, and [`Dashboard::apply`] folds its result back in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    pub companies: CompaniesView,
    pub menu_selector: CompanySelector,
    pub analytics_selector: CompanySelector,
    pub menus: MenusPanel,
    pub analytics: AnalyticsPanel,
    pub period: AnalyticsPeriod,
    pending: Option<ConfirmationRequest>,
}

impl Dashboard {
    pub fn new(period: AnalyticsPeriod) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    /// Tab activation. Selector tabs synchronize first; the tab's own
    /// content loads once that finishes, degraded or not.
    pub fn activate_tab(&mut self, tab: TabKind) -> Option<Task> {
        match tab {
            TabKind::Companies => self.reload_tab(tab),
            TabKind::Menus | TabKind::Analytics => Some(Task::Selectors { then: Some(tab) }),
        }
    }

    /// Re-enters the load cycle for a tab without touching the selectors.
    pub fn reload_tab(&mut self, tab: TabKind) -> Option<Task> {
        match tab {
            TabKind::Companies => Some(self.reload_companies()),
            TabKind::Menus => self.reload_menus(),
            TabKind::Analytics => self.reload_analytics(),
        }
    }

    pub fn reload_companies(&mut self) -> Task {
        self.companies.begin();
        Task::Companies
    }

    pub fn reload_menus(&mut self) -> Option<Task> {
        let Some(company) = self.menu_selector.selected() else {
            self.menus.show_empty();
            self.menus.disable_add();
            return None;
        };
        self.menus.view.begin();
        Some(Task::Menus { company })
    }

    pub fn reload_analytics(&mut self) -> Option<Task> {
        let Some(company) = self.analytics_selector.selected() else {
            self.analytics.show_empty();
            return None;
        };
        self.analytics.view.begin();
        Some(Task::Analytics {
            company,
            period: self.period,
        })
    }

    pub fn select_menu_company(&mut self, company: Option<CompanyId>) -> Option<Task> {
        self.menu_selector.select(company);
        self.reload_menus()
    }

    pub fn cycle_menu_company(&mut self, forward: bool) -> Option<Task> {
        if forward {
            self.menu_selector.select_next();
        } else {
            self.menu_selector.select_prev();
        }
        self.reload_menus()
    }

    pub fn select_analytics_company(&mut self, company: Option<CompanyId>) -> Option<Task> {
        self.analytics_selector.select(company);
        self.reload_analytics()
    }

    pub fn cycle_analytics_company(&mut self, forward: bool) -> Option<Task> {
        if forward {
            self.analytics_selector.select_next();
        } else {
            self.analytics_selector.select_prev();
        }
        self.reload_analytics()
    }

    pub fn set_period(&mut self, period: AnalyticsPeriod) -> Option<Task> {
        self.period = period;
        self.reload_analytics()
    }

    pub fn create_company(&self, form: &CompanyForm) -> Result<Task, ActionOutcome> {
        prepare("add company", form.validate().map(Mutation::CreateCompany))
    }

    pub fn begin_company_edit(&self, id: &CompanyId) -> Task {
        Task::CompanyForEdit { id: id.clone() }
    }

    pub fn update_company(&self, id: &CompanyId, form: &CompanyForm) -> Result<Task, ActionOutcome> {
        let mutation = form
            .validate()
            .map(|input| Mutation::UpdateCompany(id.clone(), input));
        prepare("update company", mutation)
    }

    pub fn request_delete_company(&mut self, id: CompanyId, name: &str) -> &ConfirmationRequest {
        self.request(DeleteTarget::Company {
            id,
            name: name.to_owned(),
        })
    }

    pub fn request_delete_menu(&mut self, id: MenuId) -> &ConfirmationRequest {
        self.request(DeleteTarget::Menu { id })
    }

    pub fn request_delete_item(
        &mut self,
        menu_id: MenuId,
        item_id: MenuItemId,
        name: &str,
    ) -> &ConfirmationRequest {
        self.request(DeleteTarget::Item {
            menu_id,
            item_id,
            name: name.to_owned(),
        })
    }

    pub fn pending_confirmation(&self) -> Option<&ConfirmationRequest> {
        self.pending.as_ref()
    }

    /// Answers the pending confirmation. Declining yields no task.
    pub fn respond(&mut self, response: ConfirmationResponse) -> Option<Task> {
        let request = self.pending.take()?;
        if response == ConfirmationResponse::Decline {
            debug!(deletion = ?request.target, "deletion declined");
            return None;
        }
        let mutation = match request.target {
            DeleteTarget::Company { id, .. } => Mutation::DeleteCompany(id),
            DeleteTarget::Menu { id } => Mutation::DeleteMenu(id),
            DeleteTarget::Item {
                menu_id, item_id, ..
            } => Mutation::DeleteItem(menu_id, item_id),
        };
        Some(Task::Mutate(mutation))
    }

    /// A new menu needs a company picked in the menu tab.
    pub fn begin_add_menu(&self, today: Date) -> Result<MenuForm, ActionOutcome> {
        if self.menu_selector.selected().is_none() {
            return Err(ActionOutcome::warning("Please select a company first"));
        }
        Ok(MenuForm::new(today))
    }

    pub fn create_menu(&self, form: &MenuForm) -> Result<Task, ActionOutcome> {
        let Some(company) = self.menu_selector.selected() else {
            return Err(ActionOutcome::warning("Please select a company first"));
        };
        let mutation = form
            .validate(&company)
            .map(|menu| Mutation::CreateMenu(company, menu));
        prepare("add menu", mutation)
    }

    pub fn add_items(&self, form: &ItemsForm) -> Result<Task, ActionOutcome> {
        let mutation = form
            .validate()
            .map(|items| Mutation::AddItems(form.menu_id.clone(), items));
        prepare("add items", mutation)
    }

    /// Edit drafts come from a fresh fetch of the selected company's menus
    /// rather than from what is on screen.
    pub fn begin_menu_edit(&self, menu_id: &MenuId) -> Result<Task, ActionOutcome> {
        let Some(company) = self.menu_selector.selected() else {
            return Err(ActionOutcome::warning("Please select a company first"));
        };
        Ok(Task::MenuForEdit {
            company,
            menu_id: menu_id.clone(),
        })
    }

    /// Every row change is submitted concurrently. A failure skips the
    /// reload; changes that did land stay.
    pub fn update_menu(&self, draft: &MenuEditDraft) -> Result<Task, ActionOutcome> {
        let mutation = draft
            .operations()
            .map(|operations| Mutation::UpdateMenu(draft.menu_id.clone(), operations));
        prepare("update menu", mutation)
    }

    pub fn update_item(&self, form: &ItemEditForm) -> Result<Task, ActionOutcome> {
        let mutation = form.validate().map(|input| {
            Mutation::UpdateItem(form.menu_id.clone(), form.item_id.clone(), input)
        });
        prepare("update item", mutation)
    }

    /// Folds a finished task back into the views. Menu and analytics
    /// results for a company that is no longer selected are dropped.
    pub fn apply(&mut self, result: TaskResult) -> Applied {
        match result {
            TaskResult::Companies(result) => {
                if let Ok(companies) = &result {
                    debug!(count = companies.len(), "companies loaded");
                }
                self.companies.finish(result);
                Applied::default()
            }
            TaskResult::Selectors { then, result } => {
                let sync = self.apply_company_list(result);
                Applied {
                    sync: Some(sync),
                    follow_up: then.and_then(|tab| self.reload_tab(tab)).into_iter().collect(),
                    ..Applied::default()
                }
            }
            TaskResult::Menus { company, result } => {
                let current = self.menu_selector.selected();
                if !self.menus.apply(&company, current.as_ref(), result) {
                    debug!(company = %company, "dropped menus for a company no longer selected");
                }
                Applied::default()
            }
            TaskResult::Analytics {
                company,
                period,
                result,
            } => {
                let current = self.analytics_selector.selected();
                if period != self.period
                    || !self.analytics.apply(&company, current.as_ref(), result)
                {
                    debug!(
                        company = %company,
                        period = period.as_str(),
                        "dropped analytics for a selection no longer shown"
                    );
                }
                Applied::default()
            }
            TaskResult::CompanyForEdit { id, result } => match result {
                Ok(company) => Applied {
                    form: Some(EditForm::Company {
                        id,
                        form: CompanyForm::from_company(&company),
                    }),
                    ..Applied::default()
                },
                Err(error) => Applied::outcome(ActionOutcome::failed("load company", &error)),
            },
            TaskResult::MenuForEdit { menu_id, result } => match result {
                Ok(menus) => match menus.iter().find(|menu| menu.id == menu_id) {
                    Some(menu) => Applied {
                        form: Some(EditForm::Menu(MenuEditDraft::from_menu(menu))),
                        ..Applied::default()
                    },
                    None => Applied::outcome(ActionOutcome {
                        toast: Some(Toast::error("Menu not found")),
                        completed: false,
                    }),
                },
                Err(error) => Applied::outcome(ActionOutcome::failed("load menu", &error)),
            },
            TaskResult::Mutated { mutation, result } => match result {
                Ok(()) => {
                    let follow_up = if mutation.touches_companies() {
                        vec![self.reload_companies(), Task::Selectors { then: None }]
                    } else {
                        self.reload_menus().into_iter().collect()
                    };
                    Applied {
                        outcome: Some(ActionOutcome::done(Toast::success(
                            mutation.success_message(),
                        ))),
                        follow_up,
                        ..Applied::default()
                    }
                }
                Err(error) => Applied::outcome(ActionOutcome::failed(mutation.action(), &error)),
            },
        }
    }

    fn apply_company_list(&mut self, companies: Result<Vec<CompanyRef>>) -> SyncOutcome {
        let mut targets = [
            Some(SelectorTarget {
                slot: SelectorSlot::MenuCompany,
                selector: &mut self.menu_selector,
                dependent: &mut self.menus,
            }),
            Some(SelectorTarget {
                slot: SelectorSlot::AnalyticsCompany,
                selector: &mut self.analytics_selector,
                dependent: &mut self.analytics,
            }),
        ];
        let outcome = rebuild_selectors(companies, &mut targets);
        if let SyncOutcome::Synced { cleared } = &outcome {
            for slot in cleared {
                debug!(slot = slot.label(), "selection cleared");
            }
        }
        outcome
    }

    fn request(&mut self, target: DeleteTarget) -> &ConfirmationRequest {
        self.pending.insert(ConfirmationRequest::for_target(target))
    }
}

fn prepare(action: &str, mutation: Result<Mutation>) -> Result<Task, ActionOutcome> {
    mutation
        .map(Task::Mutate)
        .map_err(|error| ActionOutcome::failed(action, &error))
}

#[cfg(test)]
mod tests {
    use super::{ActionOutcome, ConfirmationRequest, DeleteTarget};
    use crate::{CompanyId, DashboardError, MenuId, MenuItemId, ToastKind};
    use anyhow::anyhow;

    #[test]
    fn company_confirmation_names_the_company() {
        let request = ConfirmationRequest::for_target(DeleteTarget::Company {
            id: CompanyId::new("c1"),
            name: "Acme".to_owned(),
        });
        assert!(request.message.starts_with("Are you sure you want to delete \"Acme\"?"));
        assert!(request.message.contains("All menus for this company"));
        assert!(request.message.ends_with("This action cannot be undone."));
    }

    #[test]
    fn menu_and_item_confirmations() {
        let menu = ConfirmationRequest::for_target(DeleteTarget::Menu {
            id: MenuId::new("m1"),
        });
        assert!(menu.message.contains("delete this menu"));

        let item = ConfirmationRequest::for_target(DeleteTarget::Item {
            menu_id: MenuId::new("m1"),
            item_id: MenuItemId::new("i1"),
            name: "Soup".to_owned(),
        });
        assert_eq!(item.message, "Are you sure you want to delete \"Soup\"?");
    }

    #[test]
    fn failed_outcome_prefixes_fetch_errors_only() {
        let fetch = anyhow::Error::from(DashboardError::Fetch("Company not found".to_owned()));
        let outcome = ActionOutcome::failed("delete company", &fetch);
        let toast = outcome.toast.expect("toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to delete company: Company not found");

        let invalid = anyhow::Error::from(DashboardError::Validation(
            "Please add at least one menu item".to_owned(),
        ));
        let toast = ActionOutcome::failed("add menu", &invalid)
            .toast
            .expect("toast");
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.message, "Please add at least one menu item");

        let other = anyhow!("connection reset");
        let toast = ActionOutcome::failed("add items", &other)
            .toast
            .expect("toast");
        assert_eq!(toast.message, "Failed to add items: connection reset");
    }
}
