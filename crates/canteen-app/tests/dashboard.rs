// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use canteen_app::{
    AnalyticsPeriod, CompanyForm, CompanyId, CompanySelector, CompanyType, ConfirmationResponse,
    Dashboard, EditForm, ItemsForm, LOAD_ERROR_LABEL, MenuEditDraft, MenuId, MenusPanel,
    NONE_SELECTED_LABEL, SelectOption, SelectorHandle, SelectorSlot, SelectorTarget, SyncOutcome,
    TabKind, Task, ToastKind, ViewState, synchronize,
};
use canteen_testkit::{FakeService, drive, fixture_today};

fn labels(selector: &CompanySelector) -> Vec<String> {
    selector
        .options()
        .iter()
        .map(|option| option.label.clone())
        .collect()
}

fn service_with_two_companies() -> (FakeService, CompanyId) {
    let service = FakeService::new(fixture_today());
    let acme = service.seed_company("Acme", CompanyType::Static);
    service.seed_company("Globex", CompanyType::Cafeteria);
    (service, acme)
}

fn menus_for(service: &FakeService, company: &CompanyId) -> Dashboard {
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, service, |d| d.activate_tab(TabKind::Menus));
    drive(&mut dashboard, service, |d| {
        d.select_menu_company(Some(company.clone()))
    });
    dashboard
}

#[test]
fn synchronize_twice_is_idempotent() {
    let (service, _) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));
    drive(&mut dashboard, &service, |d| d.cycle_menu_company(true));

    drive(&mut dashboard, &service, |_| Some(Task::Selectors { then: None }));
    let first = dashboard.clone();
    drive(&mut dashboard, &service, |_| Some(Task::Selectors { then: None }));
    assert_eq!(dashboard, first);
}

#[test]
fn vanished_company_clears_selection_and_empties_menus() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = menus_for(&service, &acme);
    assert!(dashboard.menus.add_enabled);
    assert_eq!(dashboard.menus.loaded_for, Some(acme.clone()));

    service.remove_company(&acme);
    let settled = drive(&mut dashboard, &service, |_| {
        Some(Task::Selectors { then: None })
    });

    assert_eq!(
        settled.sync(),
        Some(&SyncOutcome::Synced {
            cleared: vec![SelectorSlot::MenuCompany]
        })
    );
    assert_eq!(dashboard.menu_selector.selected(), None);
    assert_eq!(dashboard.menus.view, ViewState::Idle);
    assert!(!dashboard.menus.add_enabled);
    assert_eq!(labels(&dashboard.menu_selector), vec![NONE_SELECTED_LABEL, "Globex"]);
}

#[test]
fn absent_targets_are_skipped() {
    let (service, _) = service_with_two_companies();
    let mut analytics_selector = CompanySelector::default();
    let mut panel = MenusPanel::default();

    let mut targets = [
        None,
        Some(SelectorTarget {
            slot: SelectorSlot::AnalyticsCompany,
            selector: &mut analytics_selector,
            dependent: &mut panel,
        }),
    ];
    let outcome = synchronize(&service, &mut targets);

    assert_eq!(outcome, SyncOutcome::Synced { cleared: vec![] });
    assert_eq!(
        labels(&analytics_selector),
        vec![NONE_SELECTED_LABEL, "Acme", "Globex"]
    );
}

#[test]
fn fetch_failure_degrades_every_selector_without_error() {
    let (service, _) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Analytics));

    service.fail_company_list(true);
    let settled = drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));

    assert!(settled.sync().is_some_and(SyncOutcome::is_degraded));
    assert_eq!(dashboard.menu_selector.options(), &[SelectOption::load_error()]);
    assert_eq!(
        dashboard.analytics_selector.options(),
        &[SelectOption::load_error()]
    );
    assert_eq!(dashboard.menu_selector.selected_label(), LOAD_ERROR_LABEL);
}

#[test]
fn degraded_sync_still_loads_tab_content() {
    let (service, acme) = service_with_two_companies();
    service.seed_menu(&acme, fixture_today(), &[("Soup", "")]);
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Analytics));
    drive(&mut dashboard, &service, |d| {
        d.select_analytics_company(Some(acme.clone()))
    });
    assert!(dashboard.analytics.view.loaded().is_some());

    service.fail_company_list(true);
    service.clear_calls();
    let settled = drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Analytics));

    assert!(settled.sync().is_some_and(SyncOutcome::is_degraded));
    assert_eq!(dashboard.analytics_selector.selected(), None);
    assert_eq!(dashboard.analytics.view, ViewState::Idle);
    assert_eq!(
        service.calls(),
        vec!["GET /companies".to_owned()],
        "no stale analytics request after the selection was lost"
    );

    service.fail_company_list(false);
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));
    drive(&mut dashboard, &service, |d| {
        d.select_menu_company(Some(acme.clone()))
    });
    assert!(dashboard.menus.add_enabled);
    service.fail_company_list(true);
    service.clear_calls();
    let first = dashboard.activate_tab(TabKind::Menus);
    assert_eq!(first, Some(Task::Selectors { then: Some(TabKind::Menus) }));
    let applied = dashboard.apply(Task::Selectors { then: Some(TabKind::Menus) }.run(&service));

    assert!(applied.sync.is_some_and(|sync| sync.is_degraded()));
    assert_eq!(dashboard.menus.view, ViewState::Idle);
    assert!(!dashboard.menus.add_enabled);
    assert!(applied.follow_up.is_empty());
}

#[test]
fn menus_tab_error_then_retry_loads() {
    let (service, acme) = service_with_two_companies();
    service.seed_menu(&acme, fixture_today(), &[("Soup", "hot")]);
    service.fail_menu_list(true);
    let mut dashboard = menus_for(&service, &acme);
    assert_eq!(
        dashboard.menus.view.error(),
        Some("HTTP 500: Internal Server Error")
    );

    service.fail_menu_list(false);
    let task = dashboard
        .reload_tab(TabKind::Menus)
        .expect("a company is selected");
    assert!(dashboard.menus.view.is_loading());

    dashboard.apply(task.run(&service));
    assert_eq!(dashboard.menus.menus().len(), 1);
    assert_eq!(dashboard.menus.loaded_for, Some(acme));
}

#[test]
fn companies_error_then_retry_loads() {
    let (service, _) = service_with_two_companies();
    service.fail_company_list(true);
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Companies));
    assert!(matches!(dashboard.companies, ViewState::Error(_)));

    service.fail_company_list(false);
    let task = dashboard
        .reload_tab(TabKind::Companies)
        .expect("companies always reload");
    assert!(dashboard.companies.is_loading());

    dashboard.apply(task.run(&service));
    assert_eq!(dashboard.companies.loaded().map(Vec::len), Some(2));
}

#[test]
fn selection_change_makes_no_call_until_the_task_runs() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));

    service.clear_calls();
    let task = dashboard
        .select_menu_company(Some(acme.clone()))
        .expect("menus load for the new company");

    assert!(service.calls().is_empty());
    assert!(dashboard.menus.view.is_loading());
    assert_eq!(task, Task::Menus { company: acme });
}

#[test]
fn result_for_previous_selection_is_dropped() {
    let (service, acme) = service_with_two_companies();
    service.seed_menu(&acme, fixture_today(), &[("Soup", "")]);
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));

    let for_acme = dashboard
        .select_menu_company(Some(acme))
        .expect("acme load");
    let for_globex = dashboard.cycle_menu_company(true).expect("globex load");

    dashboard.apply(for_globex.run(&service));
    assert!(dashboard.menus.menus().is_empty());
    dashboard.apply(for_acme.run(&service));

    assert!(dashboard.menus.menus().is_empty(), "acme menus must not render");
    assert_eq!(
        dashboard.menus.loaded_for,
        dashboard.menu_selector.selected()
    );
}

#[test]
fn empty_company_list_leaves_only_placeholder() {
    let service = FakeService::new(fixture_today());
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));

    assert_eq!(labels(&dashboard.menu_selector), vec![NONE_SELECTED_LABEL]);
    assert_eq!(labels(&dashboard.analytics_selector), vec![NONE_SELECTED_LABEL]);
    assert!(!dashboard.menus.add_enabled);
}

#[test]
fn menu_batch_keeps_successful_calls_when_one_fails() {
    let (service, acme) = service_with_two_companies();
    let menu = service.seed_menu(&acme, fixture_today(), &[("Soup", ""), ("Salad", "")]);
    service.fail_item(&menu.items[1].id);
    let mut dashboard = menus_for(&service, &acme);

    let settled = drive(&mut dashboard, &service, |d| d.begin_menu_edit(&menu.id));
    let Some(EditForm::Menu(draft)) = settled.form() else {
        panic!("menu edit form expected, got {settled:?}");
    };
    let mut draft = draft.clone();
    draft.visible_row_mut(0).expect("soup row").name = "Tomato Soup".to_owned();
    draft.remove_visible_row(1).expect("salad row removable");
    draft.add_row();
    draft.visible_row_mut(1).expect("new row").name = "Bread".to_owned();

    service.clear_calls();
    let settled = drive(&mut dashboard, &service, |d| d.update_menu(&draft));

    let outcome = settled.outcome().expect("outcome");
    assert!(!outcome.completed);
    let toast = outcome.toast.as_ref().expect("failure toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.starts_with("Failed to update menu:"));
    assert_eq!(service.call_count("GET /menus"), 0);

    let stored = service.menu(&menu.id).expect("menu still exists");
    let names: Vec<&str> = stored.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Tomato Soup", "Salad", "Bread"]);
}

#[test]
fn menu_batch_success_reloads() {
    let (service, acme) = service_with_two_companies();
    let menu = service.seed_menu(&acme, fixture_today(), &[("Soup", ""), ("Salad", "")]);
    let mut dashboard = menus_for(&service, &acme);

    let mut draft = MenuEditDraft::from_menu(&menu);
    draft.remove_visible_row(0).expect("soup removable");
    let settled = drive(&mut dashboard, &service, |d| d.update_menu(&draft));

    let outcome = settled.outcome().expect("outcome");
    assert!(outcome.completed);
    assert_eq!(
        outcome.toast.as_ref().map(|toast| toast.message.as_str()),
        Some("Menu updated successfully!")
    );
    assert_eq!(dashboard.menus.menus()[0].items.len(), 1);
}

#[test]
fn declined_delete_makes_no_call() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = Dashboard::default();

    let request = dashboard.request_delete_company(acme, "Acme");
    assert!(request.message.contains("\"Acme\""));
    let task = dashboard.respond(ConfirmationResponse::Decline);

    assert_eq!(task, None);
    assert_eq!(service.call_count("DELETE"), 0);
    assert!(dashboard.pending_confirmation().is_none());
}

#[test]
fn accepted_company_delete_reloads_and_resyncs() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Analytics));
    drive(&mut dashboard, &service, |d| {
        d.select_analytics_company(Some(acme.clone()))
    });

    dashboard.request_delete_company(acme, "Acme");
    let settled = drive(&mut dashboard, &service, |d| {
        d.respond(ConfirmationResponse::Accept)
    });

    assert!(settled.outcome().is_some_and(|outcome| outcome.completed));
    assert_eq!(
        dashboard.companies.loaded().map(Vec::len),
        Some(1),
        "company list reloaded"
    );
    assert_eq!(dashboard.analytics_selector.selected(), None);
    assert_eq!(
        labels(&dashboard.analytics_selector),
        vec![NONE_SELECTED_LABEL, "Globex"]
    );
}

#[test]
fn created_company_appears_in_selectors() {
    let service = FakeService::new(fixture_today());
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Companies));

    let form = CompanyForm {
        name: "Initech".to_owned(),
        company_type: Some(CompanyType::Cafeteria),
    };
    let settled = drive(&mut dashboard, &service, |d| d.create_company(&form));

    assert!(settled.outcome().is_some_and(|outcome| outcome.completed));
    assert_eq!(
        labels(&dashboard.menu_selector),
        vec![NONE_SELECTED_LABEL, "Initech"]
    );
}

#[test]
fn company_edit_form_comes_from_a_fresh_fetch() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = Dashboard::default();

    let settled = drive(&mut dashboard, &service, |d| {
        Some(d.begin_company_edit(&acme))
    });
    assert_eq!(service.call_count("GET /companies/"), 1);
    let Some(EditForm::Company { id, form }) = settled.form() else {
        panic!("company form expected, got {settled:?}");
    };
    assert_eq!(id, &acme);
    assert_eq!(form.name, "Acme");

    let missing = drive(&mut dashboard, &service, |d| {
        Some(d.begin_company_edit(&CompanyId::new("missing")))
    });
    let toast = missing
        .outcome()
        .and_then(|outcome| outcome.toast.as_ref())
        .expect("failure toast");
    assert_eq!(toast.message, "Failed to load company: Company not found");
}

#[test]
fn invalid_company_form_makes_no_call() {
    let service = FakeService::new(fixture_today());
    let dashboard = Dashboard::default();
    service.clear_calls();

    let outcome = dashboard
        .create_company(&CompanyForm::default())
        .expect_err("validation fails");

    assert!(!outcome.completed);
    assert_eq!(
        outcome.toast.map(|toast| toast.kind),
        Some(ToastKind::Warning)
    );
    assert!(service.calls().is_empty());
}

#[test]
fn add_menu_requires_selected_company() {
    let (service, _) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Menus));

    let outcome = dashboard
        .begin_add_menu(fixture_today())
        .expect_err("no company selected");
    assert_eq!(
        outcome.toast.map(|toast| toast.message),
        Some("Please select a company first".to_owned())
    );
}

#[test]
fn add_items_then_menu_not_found() {
    let (service, acme) = service_with_two_companies();
    let menu = service.seed_menu(&acme, fixture_today(), &[("Soup", "")]);
    let mut dashboard = menus_for(&service, &acme);

    let mut form = ItemsForm::new(menu.id.clone());
    form.items.row_mut(0).expect("first row").name = "Bread".to_owned();
    let settled = drive(&mut dashboard, &service, |d| d.add_items(&form));
    assert!(settled.outcome().is_some_and(|outcome| outcome.completed));
    assert_eq!(dashboard.menus.menus()[0].items.len(), 2);

    let missing = drive(&mut dashboard, &service, |d| {
        d.begin_menu_edit(&MenuId::new("missing"))
    });
    assert!(missing.form().is_none());
    assert_eq!(
        missing
            .outcome()
            .and_then(|outcome| outcome.toast.as_ref())
            .map(|toast| toast.message.as_str()),
        Some("Menu not found")
    );
}

#[test]
fn period_change_reloads_analytics() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Analytics));
    drive(&mut dashboard, &service, |d| {
        d.select_analytics_company(Some(acme))
    });

    service.clear_calls();
    drive(&mut dashboard, &service, |d| d.set_period(AnalyticsPeriod::Weekly));

    assert_eq!(service.call_count("GET /analytics/c1?period=weekly"), 1);
    let analytics = dashboard.analytics.view.loaded().expect("analytics loaded");
    assert_eq!(analytics.date_range, "2026-02-25 to 2026-03-04");
}

#[test]
fn analytics_for_an_old_period_is_dropped() {
    let (service, acme) = service_with_two_companies();
    let mut dashboard = Dashboard::default();
    drive(&mut dashboard, &service, |d| d.activate_tab(TabKind::Analytics));

    let daily = dashboard
        .select_analytics_company(Some(acme))
        .expect("daily load");
    let weekly = dashboard
        .set_period(AnalyticsPeriod::Weekly)
        .expect("weekly load");

    dashboard.apply(weekly.run(&service));
    dashboard.apply(daily.run(&service));

    let analytics = dashboard.analytics.view.loaded().expect("analytics loaded");
    assert_eq!(analytics.date_range, "2026-02-25 to 2026-03-04");
}
