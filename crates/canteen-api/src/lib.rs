// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use canteen_app::{
    AdminApi, Analytics, AnalyticsPeriod, Company, CompanyDeletion, CompanyId, CompanyInput,
    CompanyRef, DashboardError, ItemDeletion, ItemInput, Menu, MenuDeletion, MenuId, MenuItemId,
    NewMenu,
};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::COOKIE;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const SESSION_COOKIE: &str = "admin_session";

/// Blocking client for the menu-rating admin API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    session_token: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("parse api.base_url {trimmed:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("api.base_url {trimmed:?} must be an http(s) URL");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            session_token: None,
            http,
        })
    }

    /// Sends the token as the `admin_session` cookie on every request.
    pub fn with_session_token(mut self, token: Option<String>) -> Self {
        self.session_token = token.filter(|token| !token.trim().is_empty());
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("api.base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "api request");
        let builder = self.http.request(method, url);
        match &self.session_token {
            Some(token) => builder.header(COOKIE, format!("{SESSION_COOKIE}={token}")),
            None => builder,
        }
    }

    fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        let response = builder
            .send()
            .map_err(|error| connection_error(self.base_url.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            debug!(status = status.as_u16(), what, "api request failed");
            return Err(clean_error_response(status, &body));
        }
        response.json().with_context(|| format!("decode {what}"))
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str], what: &str) -> Result<T> {
        let url = self.endpoint(segments)?;
        self.send(self.request(Method::GET, url), what)
    }

    fn delete<T: DeserializeOwned>(&self, segments: &[&str], what: &str) -> Result<T> {
        let url = self.endpoint(segments)?;
        self.send(self.request(Method::DELETE, url), what)
    }
}

impl AdminApi for Client {
    fn list_companies(&self) -> Result<Vec<Company>> {
        self.get(&["companies"], "company list")
    }

    fn list_company_refs(&self) -> Result<Vec<CompanyRef>> {
        self.get(&["companies"], "company list")
    }

    fn get_company(&self, id: &CompanyId) -> Result<Company> {
        self.get(&["companies", id.as_str()], "company")
    }

    fn create_company(&self, input: &CompanyInput) -> Result<Company> {
        let url = self.endpoint(&["companies"])?;
        self.send(self.request(Method::POST, url).json(input), "created company")
    }

    fn update_company(&self, id: &CompanyId, input: &CompanyInput) -> Result<Company> {
        let url = self.endpoint(&["companies", id.as_str()])?;
        self.send(self.request(Method::PUT, url).json(input), "updated company")
    }

    fn delete_company(&self, id: &CompanyId) -> Result<CompanyDeletion> {
        self.delete(&["companies", id.as_str()], "company deletion")
    }

    fn list_menus(&self, company_id: &CompanyId) -> Result<Vec<Menu>> {
        self.get(&["menus", company_id.as_str()], "menu list")
    }

    fn create_menu(&self, company_id: &CompanyId, menu: &NewMenu, replace: bool) -> Result<Menu> {
        let mut url = self.endpoint(&["menu", company_id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("replace", if replace { "true" } else { "false" });
        self.send(self.request(Method::POST, url).json(menu), "created menu")
    }

    fn delete_menu(&self, menu_id: &MenuId) -> Result<MenuDeletion> {
        self.delete(&["menu", menu_id.as_str()], "menu deletion")
    }

    fn add_menu_items(&self, menu_id: &MenuId, items: &[ItemInput]) -> Result<Menu> {
        let url = self.endpoint(&["menu", menu_id.as_str(), "items"])?;
        self.send(self.request(Method::POST, url).json(items), "updated menu")
    }

    fn update_menu_item(
        &self,
        menu_id: &MenuId,
        item_id: &MenuItemId,
        input: &ItemInput,
    ) -> Result<Menu> {
        let url = self.endpoint(&["menu", menu_id.as_str(), "items", item_id.as_str()])?;
        self.send(self.request(Method::PUT, url).json(input), "updated menu")
    }

    fn delete_menu_item(&self, menu_id: &MenuId, item_id: &MenuItemId) -> Result<ItemDeletion> {
        self.delete(
            &["menu", menu_id.as_str(), "items", item_id.as_str()],
            "item deletion",
        )
    }

    fn analytics(&self, company_id: &CompanyId, period: AnalyticsPeriod) -> Result<Analytics> {
        let mut url = self.endpoint(&["analytics", company_id.as_str()])?;
        url.query_pairs_mut().append_pair("period", period.as_str());
        self.send(self.request(Method::GET, url), "analytics")
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    DashboardError::Fetch(format!(
        "cannot reach {base_url} -- check [api].base_url and that the server is running ({error})"
    ))
    .into()
}

/// Turns a non-success response into the message the dashboard shows:
/// the server's `detail` when it sent one, the status line otherwise.
fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if status == StatusCode::UNAUTHORIZED {
        return DashboardError::Fetch(
            "admin session missing or expired -- set [api].session_token or CANTEEN_SESSION_TOKEN"
                .to_owned(),
        )
        .into();
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(serde_json::Value::String(detail)) = parsed.detail
        && !detail.is_empty()
    {
        return DashboardError::Fetch(detail).into();
    }

    DashboardError::Fetch(format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    ))
    .into()
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: Option<serde_json::Value>,
}
