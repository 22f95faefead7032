// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod faker;

pub use faker::{FakeCompany, FakeDish, MenuFaker};

use anyhow::{Context, Result};
use canteen_app::{
    ActionOutcome, AdminApi, Analytics, AnalyticsPeriod, Company, CompanyDeletedCounts,
    CompanyDeletion, CompanyId, CompanyInput, CompanyType, Dashboard, DashboardError, EditForm,
    ItemDeletion, ItemInput, ItemRating, Menu, MenuDeletedCounts, MenuDeletion, MenuId, MenuItem,
    MenuItemId, NewMenu, SyncOutcome, Task, format_iso_day, parse_day,
};
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use time::{Date, Duration, Month};

const MENU_LIST_LIMIT: usize = 30;

#[derive(Debug, Clone)]
struct Submission {
    company_id: CompanyId,
    date: Date,
}

#[derive(Debug, Clone)]
struct Rating {
    company_id: CompanyId,
    menu_id: MenuId,
    item_id: MenuItemId,
    item_name: String,
    score: u8,
    date: Date,
}

#[derive(Debug, Default)]
struct Faults {
    company_list: bool,
    menu_list: bool,
    items: BTreeSet<MenuItemId>,
}

#[derive(Debug, Default)]
struct Store {
    companies: Vec<Company>,
    menus: Vec<Menu>,
    submissions: Vec<Submission>,
    ratings: Vec<Rating>,
    next_id: u64,
    faults: Faults,
    latency: std::time::Duration,
    calls: Vec<String>,
}

impl Store {
    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn new_items(&mut self, inputs: &[ItemInput]) -> Vec<MenuItem> {
        inputs
            .iter()
            .map(|input| MenuItem {
                id: MenuItemId::new(self.mint("i")),
                name: input.name.clone(),
                description: Some(input.description.clone()),
            })
            .collect()
    }

    fn menu_mut(&mut self, menu_id: &MenuId) -> Result<&mut Menu> {
        self.menus
            .iter_mut()
            .find(|menu| &menu.id == menu_id)
            .ok_or_else(|| not_found("Menu not found"))
    }

    fn check_item_fault(&self, item_id: &MenuItemId) -> Result<()> {
        if self.faults.items.contains(item_id) {
            return Err(server_error());
        }
        Ok(())
    }
}

fn not_found(detail: &str) -> anyhow::Error {
    DashboardError::Fetch(detail.to_owned()).into()
}

fn server_error() -> anyhow::Error {
    DashboardError::Fetch("HTTP 500: Internal Server Error".to_owned()).into()
}

/// An in-memory stand-in for the menu-rating service, with the same
/// observable behavior the dashboard relies on: cascading deletes,
/// replace-on-date menu creation, and windowed analytics.
#[derive(Debug)]
pub struct FakeService {
    store: Mutex<Store>,
    today: Date,
}

impl FakeService {
    pub fn new(today: Date) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            today,
        }
    }

    /// A populated service for trying the dashboard without a server.
    pub fn demo(seed: u64, today: Date) -> Self {
        let service = Self::new(today);
        let mut faker = MenuFaker::new(seed);
        for _ in 0..4 {
            let company = faker.company();
            let company_id = service.seed_company(&company.name, company.company_type);
            for offset in 0..5 {
                let date = today - Duration::days(offset * 3);
                let count = 3 + faker.int_n(3);
                let dishes = faker.dishes(count);
                let dishes: Vec<(&str, &str)> = dishes
                    .iter()
                    .map(|dish| (dish.name.as_str(), dish.description.as_str()))
                    .collect();
                let menu = service.seed_menu(&company_id, date, &dishes);
                for _ in 0..faker.int_n(6) {
                    let scores: Vec<(MenuItemId, u8)> = menu
                        .items
                        .iter()
                        .map(|item| (item.id.clone(), faker.score()))
                        .collect();
                    service.seed_submission(&company_id, &menu.id, date, &scores);
                }
            }
        }
        service.clear_calls();
        service
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn seed_company(&self, name: &str, company_type: CompanyType) -> CompanyId {
        let mut store = self.lock();
        let id = CompanyId::new(store.mint("c"));
        store.companies.push(Company {
            id: id.clone(),
            name: name.to_owned(),
            company_type,
            created_at: Some(format!("{}T09:00:00", format_iso_day(self.today))),
        });
        id
    }

    pub fn seed_menu(&self, company_id: &CompanyId, date: Date, items: &[(&str, &str)]) -> Menu {
        let mut store = self.lock();
        let inputs: Vec<ItemInput> = items
            .iter()
            .map(|(name, description)| ItemInput {
                name: (*name).to_owned(),
                description: (*description).to_owned(),
            })
            .collect();
        let menu = Menu {
            id: MenuId::new(store.mint("m")),
            company_id: company_id.clone(),
            date: format_iso_day(date),
            items: store.new_items(&inputs),
            created_at: None,
        };
        store.menus.push(menu.clone());
        menu
    }

    /// Records one employee submission rating the given items.
    pub fn seed_submission(
        &self,
        company_id: &CompanyId,
        menu_id: &MenuId,
        date: Date,
        scores: &[(MenuItemId, u8)],
    ) {
        let mut store = self.lock();
        let names: Vec<(MenuItemId, String)> = store
            .menus
            .iter()
            .filter(|menu| &menu.id == menu_id)
            .flat_map(|menu| menu.items.iter())
            .map(|item| (item.id.clone(), item.name.clone()))
            .collect();
        store.submissions.push(Submission {
            company_id: company_id.clone(),
            date,
        });
        for (item_id, score) in scores {
            let item_name = names
                .iter()
                .find(|(id, _)| id == item_id)
                .map_or_else(|| item_id.to_string(), |(_, name)| name.clone());
            store.ratings.push(Rating {
                company_id: company_id.clone(),
                menu_id: menu_id.clone(),
                item_id: item_id.clone(),
                item_name,
                score: *score,
                date,
            });
        }
    }

    /// Removes a company behind the dashboard's back, as another admin would.
    pub fn remove_company(&self, id: &CompanyId) {
        self.lock().companies.retain(|company| &company.id != id);
    }

    pub fn menu(&self, menu_id: &MenuId) -> Option<Menu> {
        self.lock()
            .menus
            .iter()
            .find(|menu| &menu.id == menu_id)
            .cloned()
    }

    pub fn fail_company_list(&self, fail: bool) {
        self.lock().faults.company_list = fail;
    }

    pub fn fail_menu_list(&self, fail: bool) {
        self.lock().faults.menu_list = fail;
    }

    /// Every update or delete of this item answers with a server error.
    pub fn fail_item(&self, item_id: &MenuItemId) {
        self.lock().faults.items.insert(item_id.clone());
    }

    /// Every call sleeps this long before touching the store, like a slow
    /// network would.
    pub fn set_latency(&self, latency: std::time::Duration) {
        self.lock().latency = latency;
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) -> MutexGuard<'_, Store> {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            thread::sleep(latency);
        }
        let mut store = self.lock();
        store.calls.push(call);
        store
    }
}

impl AdminApi for FakeService {
    fn list_companies(&self) -> Result<Vec<Company>> {
        let store = self.record("GET /companies".to_owned());
        if store.faults.company_list {
            return Err(server_error());
        }
        Ok(store.companies.clone())
    }

    fn get_company(&self, id: &CompanyId) -> Result<Company> {
        let store = self.record(format!("GET /companies/{id}"));
        store
            .companies
            .iter()
            .find(|company| &company.id == id)
            .cloned()
            .ok_or_else(|| not_found("Company not found"))
    }

    fn create_company(&self, input: &CompanyInput) -> Result<Company> {
        let mut store = self.record("POST /companies".to_owned());
        let company = Company {
            id: CompanyId::new(store.mint("c")),
            name: input.name.clone(),
            company_type: input.company_type,
            created_at: Some(format!("{}T09:00:00", format_iso_day(self.today))),
        };
        store.companies.push(company.clone());
        Ok(company)
    }

    fn update_company(&self, id: &CompanyId, input: &CompanyInput) -> Result<Company> {
        let mut store = self.record(format!("PUT /companies/{id}"));
        let company = store
            .companies
            .iter_mut()
            .find(|company| &company.id == id)
            .ok_or_else(|| not_found("Company not found"))?;
        company.name = input.name.clone();
        company.company_type = input.company_type;
        Ok(company.clone())
    }

    fn delete_company(&self, id: &CompanyId) -> Result<CompanyDeletion> {
        let mut store = self.record(format!("DELETE /companies/{id}"));
        if !store.companies.iter().any(|company| &company.id == id) {
            return Err(not_found("Company not found"));
        }
        let before = (
            store.ratings.len(),
            store.submissions.len(),
            store.menus.len(),
            store.companies.len(),
        );
        store.ratings.retain(|rating| &rating.company_id != id);
        store.submissions.retain(|entry| &entry.company_id != id);
        store.menus.retain(|menu| &menu.company_id != id);
        store.companies.retain(|company| &company.id != id);
        Ok(CompanyDeletion {
            deleted_counts: CompanyDeletedCounts {
                company: (before.3 - store.companies.len()) as u64,
                menus: (before.2 - store.menus.len()) as u64,
                submissions: (before.1 - store.submissions.len()) as u64,
                ratings: (before.0 - store.ratings.len()) as u64,
            },
        })
    }

    fn list_menus(&self, company_id: &CompanyId) -> Result<Vec<Menu>> {
        let store = self.record(format!("GET /menus/{company_id}"));
        if store.faults.menu_list {
            return Err(server_error());
        }
        let mut menus: Vec<Menu> = store
            .menus
            .iter()
            .filter(|menu| &menu.company_id == company_id)
            .cloned()
            .collect();
        menus.sort_by(|left, right| right.date.cmp(&left.date));
        menus.truncate(MENU_LIST_LIMIT);
        Ok(menus)
    }

    fn create_menu(&self, company_id: &CompanyId, menu: &NewMenu, replace: bool) -> Result<Menu> {
        let mut store = self.record(format!("POST /menu/{company_id}?replace={replace}"));
        if !store.companies.iter().any(|company| &company.id == company_id) {
            return Err(not_found("Company not found"));
        }
        let items = store.new_items(&menu.items);
        if let Some(existing) = store
            .menus
            .iter_mut()
            .find(|existing| &existing.company_id == company_id && existing.date == menu.date)
        {
            if replace {
                existing.items = items;
            } else {
                existing.items.extend(items);
            }
            return Ok(existing.clone());
        }
        let created = Menu {
            id: MenuId::new(store.mint("m")),
            company_id: company_id.clone(),
            date: menu.date.clone(),
            items,
            created_at: None,
        };
        store.menus.push(created.clone());
        Ok(created)
    }

    fn delete_menu(&self, menu_id: &MenuId) -> Result<MenuDeletion> {
        let mut store = self.record(format!("DELETE /menu/{menu_id}"));
        let index = store
            .menus
            .iter()
            .position(|menu| &menu.id == menu_id)
            .ok_or_else(|| not_found("Menu not found"))?;
        let before = store.ratings.len();
        store.ratings.retain(|rating| &rating.menu_id != menu_id);
        let removed = store.menus.remove(index);
        Ok(MenuDeletion {
            menu_id: menu_id.clone(),
            date: Some(removed.date),
            deleted_counts: MenuDeletedCounts {
                menu: 1,
                ratings: (before - store.ratings.len()) as u64,
            },
        })
    }

    fn add_menu_items(&self, menu_id: &MenuId, items: &[ItemInput]) -> Result<Menu> {
        let mut store = self.record(format!("POST /menu/{menu_id}/items"));
        let items = store.new_items(items);
        let menu = store.menu_mut(menu_id)?;
        menu.items.extend(items);
        Ok(menu.clone())
    }

    fn update_menu_item(
        &self,
        menu_id: &MenuId,
        item_id: &MenuItemId,
        input: &ItemInput,
    ) -> Result<Menu> {
        let mut store = self.record(format!("PUT /menu/{menu_id}/items/{item_id}"));
        store.check_item_fault(item_id)?;
        let menu = store.menu_mut(menu_id)?;
        let item = menu
            .items
            .iter_mut()
            .find(|item| &item.id == item_id)
            .ok_or_else(|| not_found("Menu or item not found"))?;
        item.name = input.name.clone();
        item.description = Some(input.description.clone());
        Ok(menu.clone())
    }

    fn delete_menu_item(&self, menu_id: &MenuId, item_id: &MenuItemId) -> Result<ItemDeletion> {
        let mut store = self.record(format!("DELETE /menu/{menu_id}/items/{item_id}"));
        store.check_item_fault(item_id)?;
        let before = store.ratings.len();
        store
            .ratings
            .retain(|rating| !(&rating.menu_id == menu_id && &rating.item_id == item_id));
        let deleted_ratings = (before - store.ratings.len()) as u64;
        let menu = store.menu_mut(menu_id)?;
        menu.items.retain(|item| &item.id != item_id);
        Ok(ItemDeletion {
            menu_id: menu_id.clone(),
            item_id: item_id.clone(),
            remaining_items: menu.items.len() as u64,
            deleted_ratings,
        })
    }

    fn analytics(&self, company_id: &CompanyId, period: AnalyticsPeriod) -> Result<Analytics> {
        let store = self.record(format!(
            "GET /analytics/{company_id}?period={}",
            period.as_str()
        ));
        let end = self.today;
        let start = end
            .checked_sub(Duration::days(period.lookback_days()))
            .context("analytics window underflows the calendar")?;
        let in_window = |date: Date| date >= start && date <= end;

        let total_submissions = store
            .submissions
            .iter()
            .filter(|entry| &entry.company_id == company_id && in_window(entry.date))
            .count() as u64;
        let ratings: Vec<&Rating> = store
            .ratings
            .iter()
            .filter(|rating| &rating.company_id == company_id && in_window(rating.date))
            .collect();

        let date_range = format!("{} to {}", format_iso_day(start), format_iso_day(end));
        if ratings.is_empty() {
            return Ok(Analytics {
                company_id: company_id.clone(),
                date_range,
                total_submissions,
                average_rating: 0.0,
                item_ratings: Vec::new(),
                best_dish: None,
                worst_dish: None,
            });
        }

        let total: u64 = ratings.iter().map(|rating| u64::from(rating.score)).sum();
        let average_rating = total as f64 / ratings.len() as f64;

        let mut grouped: Vec<(String, u64, u64)> = Vec::new();
        for rating in &ratings {
            match grouped.iter_mut().find(|(name, _, _)| name == &rating.item_name) {
                Some((_, sum, count)) => {
                    *sum += u64::from(rating.score);
                    *count += 1;
                }
                None => grouped.push((rating.item_name.clone(), u64::from(rating.score), 1)),
            }
        }
        let mut item_ratings: Vec<ItemRating> = grouped
            .into_iter()
            .map(|(item_name, sum, count)| ItemRating {
                item_name,
                average_rating: round2(sum as f64 / count as f64),
                total_ratings: count,
            })
            .collect();
        item_ratings.sort_by(|left, right| right.average_rating.total_cmp(&left.average_rating));

        Ok(Analytics {
            company_id: company_id.clone(),
            date_range,
            total_submissions,
            average_rating: round2(average_rating),
            best_dish: item_ratings.first().cloned(),
            worst_dish: item_ratings.last().cloned(),
            item_ratings,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn fixture_today() -> Date {
    Date::from_calendar_date(2026, Month::March, 4).unwrap_or(Date::MIN)
}

pub fn fixture_day(raw: &str) -> Date {
    parse_day(raw).unwrap_or(Date::MIN)
}

/// Everything applied while a task and its follow-ups ran.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settled {
    pub outcomes: Vec<ActionOutcome>,
    pub syncs: Vec<SyncOutcome>,
    pub forms: Vec<EditForm>,
}

impl Settled {
    pub fn outcome(&self) -> Option<&ActionOutcome> {
        self.outcomes.first()
    }

    pub fn sync(&self) -> Option<&SyncOutcome> {
        self.syncs.first()
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.forms.first()
    }
}

/// Starts a dashboard operation and runs the tasks it yields on the calling
/// thread, applying each result and every follow-up until nothing is left.
pub fn drive<A, F, T>(dashboard: &mut Dashboard, api: &A, start: F) -> Settled
where
    A: AdminApi + ?Sized,
    F: FnOnce(&mut Dashboard) -> T,
    T: IntoIterator<Item = Task>,
{
    let mut queue: VecDeque<Task> = start(dashboard).into_iter().collect();
    let mut settled = Settled::default();
    while let Some(task) = queue.pop_front() {
        let applied = dashboard.apply(task.run(api));
        queue.extend(applied.follow_up);
        settled.outcomes.extend(applied.outcome);
        settled.syncs.extend(applied.sync);
        settled.forms.extend(applied.form);
    }
    settled
}
