// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    AdminApi, Analytics, AnalyticsPeriod, Company, CompanyId, CompanyInput, CompanyRef,
    ItemInput, ItemOperation, Menu, MenuId, MenuItemId, NewMenu, TabKind, run_item_batch,
};

/// A remote call the dashboard wants made. Tasks own their inputs, so a
/// worker thread can run one without touching the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Companies,
    /// Rebuild the company selectors, then reload `then` whatever the
    /// outcome.
    Selectors {
        then: Option<TabKind>,
    },
    Menus {
        company: CompanyId,
    },
    Analytics {
        company: CompanyId,
        period: AnalyticsPeriod,
    },
    CompanyForEdit {
        id: CompanyId,
    },
    MenuForEdit {
        company: CompanyId,
        menu_id: MenuId,
    },
    Mutate(Mutation),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateCompany(CompanyInput),
    UpdateCompany(CompanyId, CompanyInput),
    DeleteCompany(CompanyId),
    CreateMenu(CompanyId, NewMenu),
    AddItems(MenuId, Vec<ItemInput>),
    UpdateMenu(MenuId, Vec<ItemOperation>),
    UpdateItem(MenuId, MenuItemId, ItemInput),
    DeleteMenu(MenuId),
    DeleteItem(MenuId, MenuItemId),
}

/// What came back from running a [`Task`].
#[derive(Debug)]
pub enum TaskResult {
    Companies(Result<Vec<Company>>),
    Selectors {
        then: Option<TabKind>,
        result: Result<Vec<CompanyRef>>,
    },
    Menus {
        company: CompanyId,
        result: Result<Vec<Menu>>,
    },
    Analytics {
        company: CompanyId,
        period: AnalyticsPeriod,
        result: Result<Analytics>,
    },
    CompanyForEdit {
        id: CompanyId,
        result: Result<Company>,
    },
    MenuForEdit {
        menu_id: MenuId,
        result: Result<Vec<Menu>>,
    },
    Mutated {
        mutation: Mutation,
        result: Result<()>,
    },
}

impl Task {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Selectors { .. } => "selectors",
            Self::Menus { .. } => "menus",
            Self::Analytics { .. } => "analytics",
            Self::CompanyForEdit { .. } => "company for edit",
            Self::MenuForEdit { .. } => "menu for edit",
            Self::Mutate(mutation) => mutation.action(),
        }
    }

    /// Makes the remote call. Blocks for as long as the call takes.
    pub fn run<A>(self, api: &A) -> TaskResult
    where
        A: AdminApi + ?Sized,
    {
        debug!(task = self.label(), "task started");
        match self {
            Self::Companies => TaskResult::Companies(api.list_companies()),
            Self::Selectors { then } => TaskResult::Selectors {
                then,
                result: api.list_company_refs(),
            },
            Self::Menus { company } => {
                let result = api.list_menus(&company);
                TaskResult::Menus { company, result }
            }
            Self::Analytics { company, period } => {
                let result = api.analytics(&company, period);
                TaskResult::Analytics {
                    company,
                    period,
                    result,
                }
            }
            Self::CompanyForEdit { id } => {
                let result = api.get_company(&id);
                TaskResult::CompanyForEdit { id, result }
            }
            Self::MenuForEdit { company, menu_id } => TaskResult::MenuForEdit {
                menu_id,
                result: api.list_menus(&company),
            },
            Self::Mutate(mutation) => {
                let result = mutation.run(api);
                TaskResult::Mutated { mutation, result }
            }
        }
    }
}

impl Mutation {
    /// The verb used in failure messages, as in `Failed to <action>`.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::CreateCompany(_) => "add company",
            Self::UpdateCompany(..) => "update company",
            Self::DeleteCompany(_) => "delete company",
            Self::CreateMenu(..) => "add menu",
            Self::AddItems(..) => "add items",
            Self::UpdateMenu(..) => "update menu",
            Self::UpdateItem(..) => "update item",
            Self::DeleteMenu(_) => "delete menu",
            Self::DeleteItem(..) => "delete item",
        }
    }

    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::CreateCompany(_) => "Company added successfully!",
            Self::UpdateCompany(..) => "Company updated successfully!",
            Self::DeleteCompany(_) => "Company and all associated data deleted successfully!",
            Self::CreateMenu(..) => "Menu added successfully!",
            Self::AddItems(..) => "Items added successfully!",
            Self::UpdateMenu(..) => "Menu updated successfully!",
            Self::UpdateItem(..) => "Menu item updated successfully!",
            Self::DeleteMenu(_) => "Menu deleted successfully!",
            Self::DeleteItem(..) => "Menu item deleted successfully!",
        }
    }

    /// Company changes touch every selector; everything else only the
    /// menu list.
    pub const fn touches_companies(&self) -> bool {
        matches!(
            self,
            Self::CreateCompany(_) | Self::UpdateCompany(..) | Self::DeleteCompany(_)
        )
    }

    fn run<A>(&self, api: &A) -> Result<()>
    where
        A: AdminApi + ?Sized,
    {
        match self {
            Self::CreateCompany(input) => {
                let company = api.create_company(input)?;
                info!(company = %company.id, name = %company.name, "company created");
            }
            Self::UpdateCompany(id, input) => {
                let company = api.update_company(id, input)?;
                info!(company = %company.id, "company updated");
            }
            Self::DeleteCompany(id) => {
                let counts = api.delete_company(id)?.deleted_counts;
                info!(
                    company = %id,
                    menus = counts.menus,
                    submissions = counts.submissions,
                    ratings = counts.ratings,
                    "company deleted"
                );
            }
            Self::CreateMenu(company, menu) => {
                let menu = api.create_menu(company, menu, true)?;
                info!(company = %company, menu = %menu.id, date = %menu.date, "menu saved");
            }
            Self::AddItems(menu_id, items) => {
                let menu = api.add_menu_items(menu_id, items)?;
                info!(menu = %menu.id, items = menu.items.len(), "menu items added");
            }
            Self::UpdateMenu(menu_id, operations) => {
                run_item_batch(api, menu_id, operations)?;
                info!(menu = %menu_id, "menu updated");
            }
            Self::UpdateItem(menu_id, item_id, input) => {
                api.update_menu_item(menu_id, item_id, input)?;
                info!(menu = %menu_id, item = %item_id, "menu item updated");
            }
            Self::DeleteMenu(menu_id) => {
                let deletion = api.delete_menu(menu_id)?;
                info!(
                    menu = %deletion.menu_id,
                    date = deletion.date.as_deref().unwrap_or(""),
                    ratings = deletion.deleted_counts.ratings,
                    "menu deleted"
                );
            }
            Self::DeleteItem(menu_id, item_id) => {
                let deletion = api.delete_menu_item(menu_id, item_id)?;
                info!(
                    menu = %deletion.menu_id,
                    item = %deletion.item_id,
                    remaining = deletion.remaining_items,
                    ratings = deletion.deleted_ratings,
                    "menu item deleted"
                );
            }
        }
        Ok(())
    }
}
