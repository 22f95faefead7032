// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::Date;

use crate::{
    Company, CompanyId, CompanyInput, CompanyType, DashboardError, ItemInput, ItemOperation, Menu,
    MenuId, MenuItem, MenuItemId, NewMenu, format_iso_day, parse_day,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddCompany,
    EditCompany,
    AddMenu,
    AddItems,
    EditMenu,
    EditItem,
}

impl FormKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::AddCompany => "Add New Company",
            Self::EditCompany => "Edit Company",
            Self::AddMenu => "Add Menu",
            Self::AddItems => "Add Items",
            Self::EditMenu => "Edit Menu",
            Self::EditItem => "Edit Item",
        }
    }
}

fn invalid(message: &str) -> anyhow::Error {
    DashboardError::Validation(message.to_owned()).into()
}

pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_owned()
    } else {
        format!("{count} items")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyForm {
    pub name: String,
    pub company_type: Option<CompanyType>,
}

impl CompanyForm {
    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            company_type: Some(company.company_type),
        }
    }

    pub fn cycle_type(&mut self) {
        self.company_type = match self.company_type {
            None => Some(CompanyType::Static),
            Some(CompanyType::Static) => Some(CompanyType::Cafeteria),
            Some(CompanyType::Cafeteria) => None,
        };
    }

    pub fn validate(&self) -> Result<CompanyInput> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("Company name is required"));
        }
        let Some(company_type) = self.company_type else {
            return Err(invalid("Company type is required"));
        };
        Ok(CompanyInput {
            name: name.to_owned(),
            company_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
}

impl ItemDraft {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    pub fn to_input(&self) -> ItemInput {
        ItemInput {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
        }
    }
}

/// Item rows of a create form. There is always at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRows {
    rows: Vec<ItemDraft>,
}

impl Default for ItemRows {
    fn default() -> Self {
        Self {
            rows: vec![ItemDraft::default()],
        }
    }
}

impl ItemRows {
    pub fn rows(&self) -> &[ItemDraft] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut ItemDraft> {
        self.rows.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_row(&mut self) {
        self.rows.push(ItemDraft::default());
    }

    pub fn remove_row(&mut self, index: usize) -> Result<()> {
        if self.rows.len() <= 1 {
            return Err(invalid("At least one menu item is required"));
        }
        if index < self.rows.len() {
            self.rows.remove(index);
        }
        Ok(())
    }

    pub fn count_label(&self) -> String {
        count_label(self.rows.len())
    }

    /// Blank rows are dropped; at least one named item must remain.
    pub fn collect(&self) -> Result<Vec<ItemInput>> {
        let items: Vec<ItemInput> = self
            .rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(ItemDraft::to_input)
            .collect();
        if items.is_empty() {
            return Err(invalid("Please add at least one menu item"));
        }
        Ok(items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuForm {
    pub date: String,
    pub items: ItemRows,
}

impl MenuForm {
    pub fn new(today: Date) -> Self {
        Self {
            date: format_iso_day(today),
            items: ItemRows::default(),
        }
    }

    pub fn validate(&self, company_id: &CompanyId) -> Result<NewMenu> {
        let date = self.date.trim();
        if date.len() != 10 || parse_day(date).is_none() {
            return Err(invalid("Menu date must be a valid YYYY-MM-DD date"));
        }
        let items = self.items.collect()?;
        Ok(NewMenu {
            company_id: company_id.clone(),
            date: date.to_owned(),
            items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsForm {
    pub menu_id: MenuId,
    pub items: ItemRows,
}

impl ItemsForm {
    pub fn new(menu_id: MenuId) -> Self {
        Self {
            menu_id,
            items: ItemRows::default(),
        }
    }

    pub fn validate(&self) -> Result<Vec<ItemInput>> {
        self.items.collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRow {
    pub item_id: Option<MenuItemId>,
    pub draft: ItemDraft,
    pub deleted: bool,
}

/// Working copy of a menu being edited. Existing rows removed by the user
/// stay in the draft marked deleted so the submit can issue their deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEditDraft {
    pub menu_id: MenuId,
    pub date: String,
    rows: Vec<EditRow>,
}

impl MenuEditDraft {
    pub fn from_menu(menu: &Menu) -> Self {
        Self {
            menu_id: menu.id.clone(),
            date: menu.date.clone(),
            rows: menu
                .items
                .iter()
                .map(|item| EditRow {
                    item_id: Some(item.id.clone()),
                    draft: ItemDraft::new(&item.name, item.description()),
                    deleted: false,
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[EditRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &EditRow> {
        self.rows.iter().filter(|row| !row.deleted)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn count_label(&self) -> String {
        count_label(self.visible_count())
    }

    pub fn visible_row_mut(&mut self, visible_index: usize) -> Option<&mut ItemDraft> {
        let index = self.resolve(visible_index)?;
        self.rows.get_mut(index).map(|row| &mut row.draft)
    }

    pub fn add_row(&mut self) {
        self.rows.push(EditRow {
            item_id: None,
            draft: ItemDraft::default(),
            deleted: false,
        });
    }

    pub fn remove_visible_row(&mut self, visible_index: usize) -> Result<()> {
        let Some(index) = self.resolve(visible_index) else {
            return Ok(());
        };
        if self.rows[index].item_id.is_some() {
            self.rows[index].deleted = true;
            return Ok(());
        }
        if self.visible_count() <= 1 {
            return Err(invalid("At least one menu item is required"));
        }
        self.rows.remove(index);
        Ok(())
    }

    /// One remote call per changed row: deletes for removed existing rows,
    /// updates for kept existing rows, adds for named new rows.
    pub fn operations(&self) -> Result<Vec<ItemOperation>> {
        let mut operations = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match (&row.item_id, row.deleted) {
                (Some(item_id), true) => operations.push(ItemOperation::Delete {
                    item_id: item_id.clone(),
                }),
                (Some(item_id), false) => {
                    if row.draft.is_blank() {
                        return Err(invalid("Item name is required"));
                    }
                    operations.push(ItemOperation::Update {
                        item_id: item_id.clone(),
                        input: row.draft.to_input(),
                    });
                }
                (None, _) if !row.draft.is_blank() => operations.push(ItemOperation::Add {
                    input: row.draft.to_input(),
                }),
                (None, _) => {}
            }
        }
        Ok(operations)
    }

    fn resolve(&self, visible_index: usize) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.deleted)
            .nth(visible_index)
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEditForm {
    pub menu_id: MenuId,
    pub item_id: MenuItemId,
    pub draft: ItemDraft,
}

impl ItemEditForm {
    pub fn from_item(menu_id: &MenuId, item: &MenuItem) -> Self {
        Self {
            menu_id: menu_id.clone(),
            item_id: item.id.clone(),
            draft: ItemDraft::new(&item.name, item.description()),
        }
    }

    pub fn validate(&self) -> Result<ItemInput> {
        if self.draft.is_blank() {
            return Err(invalid("Item name is required"));
        }
        Ok(self.draft.to_input())
    }
}
