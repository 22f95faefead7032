// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::thread;

use anyhow::Result;
use tracing::{debug, warn};

use crate::{AdminApi, DashboardError, ItemInput, MenuId, MenuItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOperation {
    Delete { item_id: MenuItemId },
    Update { item_id: MenuItemId, input: ItemInput },
    Add { input: ItemInput },
}

impl ItemOperation {
    pub fn describe(&self) -> String {
        match self {
            Self::Delete { item_id } => format!("delete item {item_id}"),
            Self::Update { item_id, .. } => format!("update item {item_id}"),
            Self::Add { input } => format!("add item {:?}", input.name),
        }
    }

    fn apply<A>(&self, api: &A, menu_id: &MenuId) -> Result<()>
    where
        A: AdminApi + ?Sized,
    {
        match self {
            Self::Delete { item_id } => api.delete_menu_item(menu_id, item_id).map(|_| ()),
            Self::Update { item_id, input } => {
                api.update_menu_item(menu_id, item_id, input).map(|_| ())
            }
            Self::Add { input } => api
                .add_menu_items(menu_id, std::slice::from_ref(input))
                .map(|_| ()),
        }
    }
}

/// Runs every operation concurrently and waits for all of them. Operations
/// that succeed stay applied even when others fail; the failures are folded
/// into one error.
pub fn run_item_batch<A>(api: &A, menu_id: &MenuId, operations: &[ItemOperation]) -> Result<()>
where
    A: AdminApi + ?Sized,
{
    let failures: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = operations
            .iter()
            .map(|operation| scope.spawn(move || (operation, operation.apply(api, menu_id))))
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| match handle.join() {
                Ok((_, Ok(()))) => None,
                Ok((operation, Err(error))) => {
                    Some(format!("{}: {error:#}", operation.describe()))
                }
                Err(_) => Some("item update worker panicked".to_owned()),
            })
            .collect()
    });

    debug!(
        menu = %menu_id,
        operations = operations.len(),
        failed = failures.len(),
        "item batch finished"
    );
    if failures.is_empty() {
        return Ok(());
    }
    warn!(menu = %menu_id, failed = failures.len(), "item batch partially failed");
    Err(DashboardError::Fetch(failures.join("; ")).into())
}
