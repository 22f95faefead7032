// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{
    Analytics, AnalyticsPeriod, Company, CompanyDeletion, CompanyId, CompanyInput, CompanyRef,
    ItemDeletion, ItemInput, Menu, MenuDeletion, MenuId, MenuItemId, NewMenu,
};

/// The REST surface the dashboard drives. Calls run on worker threads and
/// item batches fan out concurrently, so implementations are shared across
/// threads.
pub trait AdminApi: Send + Sync {
    fn list_companies(&self) -> Result<Vec<Company>>;

    /// The selector reference list. Defaults to projecting the full company
    /// list; clients that can decode a narrower payload should override it.
    fn list_company_refs(&self) -> Result<Vec<CompanyRef>> {
        Ok(self
            .list_companies()?
            .iter()
            .map(CompanyRef::from)
            .collect())
    }

    fn get_company(&self, id: &CompanyId) -> Result<Company>;
    fn create_company(&self, input: &CompanyInput) -> Result<Company>;
    fn update_company(&self, id: &CompanyId, input: &CompanyInput) -> Result<Company>;
    fn delete_company(&self, id: &CompanyId) -> Result<CompanyDeletion>;

    fn list_menus(&self, company_id: &CompanyId) -> Result<Vec<Menu>>;
    fn create_menu(&self, company_id: &CompanyId, menu: &NewMenu, replace: bool) -> Result<Menu>;
    fn delete_menu(&self, menu_id: &MenuId) -> Result<MenuDeletion>;

    fn add_menu_items(&self, menu_id: &MenuId, items: &[ItemInput]) -> Result<Menu>;
    fn update_menu_item(
        &self,
        menu_id: &MenuId,
        item_id: &MenuItemId,
        input: &ItemInput,
    ) -> Result<Menu>;
    fn delete_menu_item(&self, menu_id: &MenuId, item_id: &MenuItemId) -> Result<ItemDeletion>;

    fn analytics(&self, company_id: &CompanyId, period: AnalyticsPeriod) -> Result<Analytics>;
}
