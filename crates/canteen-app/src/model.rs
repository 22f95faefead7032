// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    Static,
    Cafeteria,
}

impl CompanyType {
    pub const ALL: [Self; 2] = [Self::Static, Self::Cafeteria];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Cafeteria => "cafeteria",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "static" => Some(Self::Static),
            "cafeteria" => Some(Self::Cafeteria),
            _ => None,
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Self::Static => "Static Menu",
            Self::Cafeteria => "Cafeteria",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Companies,
    Menus,
    Analytics,
}

impl TabKind {
    pub const ALL: [Self; 3] = [Self::Companies, Self::Menus, Self::Analytics];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Menus => "menus",
            Self::Analytics => "analytics",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "companies" => Some(Self::Companies),
            "menus" => Some(Self::Menus),
            "analytics" => Some(Self::Analytics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl AnalyticsPeriod {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Days covered before the end date, matching the server's default window.
    pub const fn lookback_days(self) -> i64 {
        match self {
            Self::Daily => 0,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The slice of a company the selectors care about. Any other fields in the
/// payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: CompanyId,
    pub name: String,
}

impl From<&Company> for CompanyRef {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            name: company.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl MenuItem {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub company_id: CompanyId,
    pub date: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRating {
    pub item_name: String,
    pub average_rating: f64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub company_id: CompanyId,
    pub date_range: String,
    pub total_submissions: u64,
    pub average_rating: f64,
    #[serde(default)]
    pub item_ratings: Vec<ItemRating>,
    #[serde(default)]
    pub best_dish: Option<ItemRating>,
    #[serde(default)]
    pub worst_dish: Option<ItemRating>,
}

impl Analytics {
    /// The worst dish is only worth showing when it differs from the best.
    pub fn distinct_worst_dish(&self) -> Option<&ItemRating> {
        match (&self.best_dish, &self.worst_dish) {
            (Some(best), Some(worst)) if worst.item_name != best.item_name => Some(worst),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingLabel {
    Excellent,
    Good,
    Average,
    Poor,
}

impl RatingLabel {
    pub fn for_score(score: f64) -> Self {
        if score >= 4.5 {
            Self::Excellent
        } else if score >= 3.5 {
            Self::Good
        } else if score >= 2.5 {
            Self::Average
        } else {
            Self::Poor
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

pub fn format_rating(score: f64) -> String {
    format!("{score:.1}")
}

/// Renders a `YYYY-MM-DD...` value as `March 4, 2026`. Values that do not
/// start with a calendar date are returned unchanged.
pub fn format_day(raw: &str) -> String {
    match parse_day(raw) {
        Some(date) => date
            .format(format_description!(
                "[month repr:long] [day padding:none], [year]"
            ))
            .unwrap_or_else(|_| raw.to_owned()),
        None => raw.to_owned(),
    }
}

pub fn parse_day(raw: &str) -> Option<Date> {
    let prefix = raw.get(..10)?;
    Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_iso_day(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompanyDeletedCounts {
    #[serde(default)]
    pub company: u64,
    #[serde(default)]
    pub menus: u64,
    #[serde(default)]
    pub submissions: u64,
    #[serde(default)]
    pub ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompanyDeletion {
    #[serde(default)]
    pub deleted_counts: CompanyDeletedCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MenuDeletedCounts {
    #[serde(default)]
    pub menu: u64,
    #[serde(default)]
    pub ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDeletion {
    pub menu_id: MenuId,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub deleted_counts: MenuDeletedCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDeletion {
    pub menu_id: MenuId,
    pub item_id: MenuItemId,
    #[serde(default)]
    pub remaining_items: u64,
    #[serde(default)]
    pub deleted_ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenu {
    pub company_id: CompanyId,
    pub date: String,
    pub items: Vec<ItemInput>,
}
