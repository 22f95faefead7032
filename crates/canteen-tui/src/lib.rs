// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use canteen_app::{
    ActionOutcome, AdminApi, AppCommand, AppEvent, AppMode, AppState, Applied, Company,
    CompanyForm, CompanyId, CompanySelector, ConfirmationRequest, ConfirmationResponse,
    Dashboard, EditForm, FormKind, ItemDraft, ItemEditForm, ItemsForm, Menu, MenuEditDraft,
    MenuForm, RatingLabel, TabKind, Task, TaskResult, Toast, ViewState, format_day,
    format_rating,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{Date, OffsetDateTime};
use tracing::debug;

const APP_NAME: &str = "canteen";

#[derive(Debug)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    TaskFinished { request_id: u64, result: TaskResult },
}

/// Runs dashboard tasks off the render thread. Each task gets its own
/// thread and posts its result back as [`InternalEvent::TaskFinished`].
struct Worker {
    api: Arc<dyn AdminApi>,
    tx: Sender<InternalEvent>,
    next_request: u64,
    in_flight: usize,
}

impl Worker {
    fn new(api: Arc<dyn AdminApi>, tx: Sender<InternalEvent>) -> Self {
        Self {
            api,
            tx,
            next_request: 0,
            in_flight: 0,
        }
    }

    fn spawn(&mut self, task: Task) -> u64 {
        self.next_request += 1;
        self.in_flight += 1;
        let request_id = self.next_request;
        debug!(request_id, task = task.label(), "task queued");

        let api = Arc::clone(&self.api);
        let sender = self.tx.clone();
        thread::spawn(move || {
            let result = task.run(api.as_ref());
            let _ = sender.send(InternalEvent::TaskFinished { request_id, result });
        });
        request_id
    }

    fn spawn_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        for task in tasks {
            self.spawn(task);
        }
    }

    fn finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormBody {
    Company {
        editing: Option<CompanyId>,
        form: CompanyForm,
    },
    Menu(MenuForm),
    Items(ItemsForm),
    MenuEdit(MenuEditDraft),
    Item(ItemEditForm),
}

impl From<EditForm> for FormBody {
    fn from(form: EditForm) -> Self {
        match form {
            EditForm::Company { id, form } => Self::Company {
                editing: Some(id),
                form,
            },
            EditForm::Menu(draft) => Self::MenuEdit(draft),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    body: FormBody,
    field: usize,
    /// Request id of a submission still waiting for the service.
    submitted: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuRow {
    Menu(usize),
    Item(usize, usize),
}

#[derive(Debug, Default)]
struct ViewData {
    cursor: usize,
    form: Option<FormUiState>,
    /// Request id of the fetch that will open an edit form.
    awaiting_form: Option<u64>,
    help_visible: bool,
    status_token: u64,
}

/// Runs the dashboard until the user quits. Every service call runs on a
/// worker thread; the loop only applies finished results.
pub fn run_app(state: &mut AppState, dashboard: &mut Dashboard, api: Arc<dyn AdminApi>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    let mut worker = Worker::new(api, internal_tx);

    worker.spawn_all(dashboard.activate_tab(state.active_tab));

    let mut result = Ok(());
    loop {
        process_internal_events(state, dashboard, &mut view_data, &mut worker, &internal_rx);

        let busy = worker.is_busy();
        if let Err(error) =
            terminal.draw(|frame| render(frame, state, dashboard, &view_data, busy))
        {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, dashboard, &mut view_data, &mut worker, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_internal_event(state, dashboard, view_data, worker, event);
    }
}

fn handle_internal_event(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    event: InternalEvent,
) {
    match event {
        InternalEvent::ClearStatus { token } if token == view_data.status_token => {
            state.dispatch(AppCommand::ClearStatus);
        }
        InternalEvent::ClearStatus { .. } => {}
        InternalEvent::TaskFinished { request_id, result } => {
            worker.finished();
            let applied = dashboard.apply(result);
            handle_applied(state, dashboard, view_data, worker, request_id, applied);
        }
    }
}

fn handle_applied(
    state: &mut AppState,
    dashboard: &Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    request_id: u64,
    applied: Applied,
) {
    worker.spawn_all(applied.follow_up);

    let wanted = view_data.awaiting_form == Some(request_id);
    if wanted {
        view_data.awaiting_form = None;
    }
    if let Some(form) = applied.form {
        if wanted && state.mode == AppMode::Nav {
            open_form(state, view_data, FormBody::from(form));
        } else {
            debug!(request_id, "dropped an edit form nobody is waiting for");
        }
    }

    if let Some(outcome) = applied.outcome {
        if let Some(form) = view_data.form.as_mut()
            && form.submitted == Some(request_id)
        {
            form.submitted = None;
            if outcome.completed {
                close_form(state, view_data);
            }
        }
        emit_outcome(state, view_data, &worker.tx, outcome);
    }
    clamp_cursor(state.active_tab, dashboard, view_data);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    toast: Toast,
) {
    state.dispatch(AppCommand::SetStatus(toast));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_outcome(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    outcome: ActionOutcome,
) {
    if let Some(toast) = outcome.toast {
        emit_status(state, view_data, internal_tx, toast);
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn handle_key_event(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Confirm => {
            handle_confirm_key(state, dashboard, view_data, worker, key);
            return false;
        }
        AppMode::Form(_) => {
            handle_form_key(state, dashboard, view_data, worker, key);
            return false;
        }
        AppMode::Nav => {}
    }

    match key.code {
        KeyCode::Tab => switch_tab(state, dashboard, view_data, worker, AppCommand::NextTab),
        KeyCode::BackTab => switch_tab(state, dashboard, view_data, worker, AppCommand::PrevTab),
        KeyCode::Char(digit @ '1'..='3') => {
            let index = digit as usize - '1' as usize;
            let command = AppCommand::SelectTab(TabKind::ALL[index]);
            switch_tab(state, dashboard, view_data, worker, command);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let len = row_count(state.active_tab, dashboard);
            if view_data.cursor + 1 < len {
                view_data.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.cursor = view_data.cursor.saturating_sub(1);
        }
        KeyCode::Char('r') => {
            worker.spawn_all(dashboard.reload_tab(state.active_tab));
            clamp_cursor(state.active_tab, dashboard, view_data);
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        _ => match state.active_tab {
            TabKind::Companies => handle_companies_key(state, dashboard, view_data, worker, key),
            TabKind::Menus => handle_menus_key(state, dashboard, view_data, worker, key),
            TabKind::Analytics => handle_analytics_key(dashboard, worker, key),
        },
    }
    false
}

fn switch_tab(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    command: AppCommand,
) {
    for event in state.dispatch(command) {
        if let AppEvent::TabChanged(tab) = event {
            debug!(tab = tab.label(), "tab activated");
            view_data.cursor = 0;
            worker.spawn_all(dashboard.activate_tab(tab));
        }
    }
}

fn handle_companies_key(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    key: KeyEvent,
) {
    let selected = selected_company(dashboard, view_data.cursor).cloned();
    match key.code {
        KeyCode::Char('a') => open_form(
            state,
            view_data,
            FormBody::Company {
                editing: None,
                form: CompanyForm::default(),
            },
        ),
        KeyCode::Char('e') => {
            let Some(company) = selected else {
                return;
            };
            let request_id = worker.spawn(dashboard.begin_company_edit(&company.id));
            view_data.awaiting_form = Some(request_id);
        }
        KeyCode::Char('d') => {
            let Some(company) = selected else {
                return;
            };
            dashboard.request_delete_company(company.id, &company.name);
            state.dispatch(AppCommand::OpenConfirm);
        }
        _ => {}
    }
}

fn handle_menus_key(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char(']') => {
            worker.spawn_all(dashboard.cycle_menu_company(true));
            view_data.cursor = 0;
        }
        KeyCode::Char('[') => {
            worker.spawn_all(dashboard.cycle_menu_company(false));
            view_data.cursor = 0;
        }
        KeyCode::Char('a') => match dashboard.begin_add_menu(today()) {
            Ok(form) => open_form(state, view_data, FormBody::Menu(form)),
            Err(outcome) => emit_outcome(state, view_data, &worker.tx, outcome),
        },
        KeyCode::Char('i') => {
            let Some(menu) = selected_menu(dashboard, view_data.cursor) else {
                return;
            };
            let form = ItemsForm::new(menu.id.clone());
            open_form(state, view_data, FormBody::Items(form));
        }
        KeyCode::Char('e') => match selected_menu_row(dashboard, view_data.cursor) {
            Some(MenuRow::Menu(menu_idx)) => {
                let menu_id = dashboard.menus.menus()[menu_idx].id.clone();
                match dashboard.begin_menu_edit(&menu_id) {
                    Ok(task) => view_data.awaiting_form = Some(worker.spawn(task)),
                    Err(outcome) => emit_outcome(state, view_data, &worker.tx, outcome),
                }
            }
            Some(MenuRow::Item(menu_idx, item_idx)) => {
                let menu = &dashboard.menus.menus()[menu_idx];
                let form = ItemEditForm::from_item(&menu.id, &menu.items[item_idx]);
                open_form(state, view_data, FormBody::Item(form));
            }
            None => {}
        },
        KeyCode::Char('d') => {
            let Some(menu) = selected_menu(dashboard, view_data.cursor) else {
                return;
            };
            let menu_id = menu.id.clone();
            dashboard.request_delete_menu(menu_id);
            state.dispatch(AppCommand::OpenConfirm);
        }
        KeyCode::Char('x') => {
            let Some(MenuRow::Item(menu_idx, item_idx)) =
                selected_menu_row(dashboard, view_data.cursor)
            else {
                return;
            };
            let menu = &dashboard.menus.menus()[menu_idx];
            let item = &menu.items[item_idx];
            let (menu_id, item_id, name) = (menu.id.clone(), item.id.clone(), item.name.clone());
            dashboard.request_delete_item(menu_id, item_id, &name);
            state.dispatch(AppCommand::OpenConfirm);
        }
        _ => {}
    }
}

fn handle_analytics_key(dashboard: &mut Dashboard, worker: &mut Worker, key: KeyEvent) {
    let task = match key.code {
        KeyCode::Char(']') => dashboard.cycle_analytics_company(true),
        KeyCode::Char('[') => dashboard.cycle_analytics_company(false),
        KeyCode::Char('p') => {
            let next = dashboard.period.next();
            dashboard.set_period(next)
        }
        _ => None,
    };
    worker.spawn_all(task);
}

fn handle_confirm_key(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    key: KeyEvent,
) {
    let response = match key.code {
        KeyCode::Char('y') | KeyCode::Enter => ConfirmationResponse::Accept,
        KeyCode::Char('n') | KeyCode::Esc => ConfirmationResponse::Decline,
        _ => return,
    };
    worker.spawn_all(dashboard.respond(response));
    state.dispatch(AppCommand::ExitToNav);
    clamp_cursor(state.active_tab, dashboard, view_data);
}

fn handle_form_key(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
    key: KeyEvent,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            close_form(state, view_data);
            emit_status(state, view_data, &worker.tx, Toast::info("form canceled"));
        }
        KeyCode::Enter => submit_form(state, dashboard, view_data, worker),
        KeyCode::Char('s') if ctrl => submit_form(state, dashboard, view_data, worker),
        KeyCode::Char('n') if ctrl => {
            if let Some(form) = view_data.form.as_mut()
                && form.body.add_row()
            {
                form.field = form.body.field_count().saturating_sub(2);
            }
        }
        KeyCode::Char('d') if ctrl => {
            let Some(form) = view_data.form.as_mut() else {
                return;
            };
            let Some(row) = form.body.row_of(form.field) else {
                return;
            };
            match form.body.remove_row(row) {
                Ok(()) => form.field = form.field.min(form.body.field_count().saturating_sub(1)),
                Err(error) => {
                    let toast = Toast::warning(error.to_string());
                    emit_status(state, view_data, &worker.tx, toast);
                }
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = view_data.form.as_mut() {
                form.field = (form.field + 1) % form.body.field_count().max(1);
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = view_data.form.as_mut() {
                let count = form.body.field_count().max(1);
                form.field = (form.field + count - 1) % count;
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = view_data.form.as_mut()
                && let Some(text) = form.body.text_mut(form.field)
            {
                text.pop();
            }
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
            let Some(form) = view_data.form.as_mut() else {
                return;
            };
            if let FormBody::Company { form: company, .. } = &mut form.body
                && form.field == 1
            {
                company.cycle_type();
            } else if key.code == KeyCode::Char(' ')
                && let Some(text) = form.body.text_mut(form.field)
            {
                text.push(' ');
            }
        }
        KeyCode::Char(ch) if !ctrl => {
            if let Some(form) = view_data.form.as_mut()
                && let Some(text) = form.body.text_mut(form.field)
            {
                text.push(ch);
            }
        }
        _ => {}
    }
}

/// Validation runs here; the remote call goes to the worker and the form
/// stays open until its result arrives.
fn submit_form(
    state: &mut AppState,
    dashboard: &Dashboard,
    view_data: &mut ViewData,
    worker: &mut Worker,
) {
    let Some(form) = view_data.form.as_ref() else {
        return;
    };
    if form.submitted.is_some() {
        return;
    }
    let prepared = match &form.body {
        FormBody::Company {
            editing: Some(id),
            form,
        } => dashboard.update_company(id, form),
        FormBody::Company {
            editing: None,
            form,
        } => dashboard.create_company(form),
        FormBody::Menu(form) => dashboard.create_menu(form),
        FormBody::Items(form) => dashboard.add_items(form),
        FormBody::MenuEdit(draft) => dashboard.update_menu(draft),
        FormBody::Item(form) => dashboard.update_item(form),
    };
    match prepared {
        Ok(task) => {
            let request_id = worker.spawn(task);
            if let Some(form) = view_data.form.as_mut() {
                form.submitted = Some(request_id);
            }
            emit_status(state, view_data, &worker.tx, Toast::info("saving..."));
        }
        Err(outcome) => emit_outcome(state, view_data, &worker.tx, outcome),
    }
}

fn open_form(state: &mut AppState, view_data: &mut ViewData, body: FormBody) {
    let kind = body.kind();
    view_data.form = Some(FormUiState {
        body,
        field: 0,
        submitted: None,
    });
    state.dispatch(AppCommand::OpenForm(kind));
}

fn close_form(state: &mut AppState, view_data: &mut ViewData) {
    view_data.form = None;
    state.dispatch(AppCommand::ExitToNav);
}

impl FormBody {
    fn kind(&self) -> FormKind {
        match self {
            Self::Company { editing: None, .. } => FormKind::AddCompany,
            Self::Company { editing: Some(_), .. } => FormKind::EditCompany,
            Self::Menu(_) => FormKind::AddMenu,
            Self::Items(_) => FormKind::AddItems,
            Self::MenuEdit(_) => FormKind::EditMenu,
            Self::Item(_) => FormKind::EditItem,
        }
    }

    /// Index of the first item-row field; forms without item rows return
    /// `None`.
    fn row_offset(&self) -> Option<usize> {
        match self {
            Self::Menu(_) => Some(1),
            Self::Items(_) | Self::MenuEdit(_) => Some(0),
            Self::Company { .. } | Self::Item(_) => None,
        }
    }

    fn row_len(&self) -> usize {
        match self {
            Self::Menu(form) => form.items.len(),
            Self::Items(form) => form.items.len(),
            Self::MenuEdit(draft) => draft.visible_count(),
            Self::Company { .. } | Self::Item(_) => 0,
        }
    }

    fn field_count(&self) -> usize {
        match self.row_offset() {
            Some(offset) => offset + self.row_len() * 2,
            None => 2,
        }
    }

    fn row_of(&self, field: usize) -> Option<usize> {
        let offset = self.row_offset()?;
        field.checked_sub(offset).map(|rel| rel / 2)
    }

    fn text_mut(&mut self, field: usize) -> Option<&mut String> {
        let row_field = self
            .row_offset()
            .and_then(|offset| field.checked_sub(offset))
            .map(|rel| (rel / 2, rel % 2 == 0));
        match self {
            Self::Company { form, .. } => (field == 0).then_some(&mut form.name),
            Self::Item(form) => match field {
                0 => Some(&mut form.draft.name),
                1 => Some(&mut form.draft.description),
                _ => None,
            },
            Self::Menu(form) => {
                if field == 0 {
                    Some(&mut form.date)
                } else {
                    draft_text(form.items.row_mut(row_field?.0), row_field?.1)
                }
            }
            Self::Items(form) => draft_text(form.items.row_mut(row_field?.0), row_field?.1),
            Self::MenuEdit(draft) => draft_text(draft.visible_row_mut(row_field?.0), row_field?.1),
        }
    }

    fn add_row(&mut self) -> bool {
        match self {
            Self::Menu(form) => form.items.add_row(),
            Self::Items(form) => form.items.add_row(),
            Self::MenuEdit(draft) => draft.add_row(),
            Self::Company { .. } | Self::Item(_) => return false,
        }
        true
    }

    fn remove_row(&mut self, row: usize) -> Result<()> {
        match self {
            Self::Menu(form) => form.items.remove_row(row),
            Self::Items(form) => form.items.remove_row(row),
            Self::MenuEdit(draft) => draft.remove_visible_row(row),
            Self::Company { .. } | Self::Item(_) => Ok(()),
        }
    }

    fn item_rows(&self) -> Vec<&ItemDraft> {
        match self {
            Self::Menu(form) => form.items.rows().iter().collect(),
            Self::Items(form) => form.items.rows().iter().collect(),
            Self::MenuEdit(draft) => draft.visible_rows().map(|row| &row.draft).collect(),
            Self::Company { .. } | Self::Item(_) => Vec::new(),
        }
    }

    fn count_label(&self) -> Option<String> {
        match self {
            Self::Menu(form) => Some(form.items.count_label()),
            Self::Items(form) => Some(form.items.count_label()),
            Self::MenuEdit(draft) => Some(draft.count_label()),
            Self::Company { .. } | Self::Item(_) => None,
        }
    }
}

fn draft_text(draft: Option<&mut ItemDraft>, name: bool) -> Option<&mut String> {
    draft.map(|draft| {
        if name {
            &mut draft.name
        } else {
            &mut draft.description
        }
    })
}

fn companies(dashboard: &Dashboard) -> &[Company] {
    dashboard.companies.loaded().map(Vec::as_slice).unwrap_or_default()
}

fn selected_company(dashboard: &Dashboard, cursor: usize) -> Option<&Company> {
    companies(dashboard).get(cursor)
}

fn menu_rows(menus: &[Menu]) -> Vec<MenuRow> {
    let mut rows = Vec::new();
    for (menu_idx, menu) in menus.iter().enumerate() {
        rows.push(MenuRow::Menu(menu_idx));
        rows.extend((0..menu.items.len()).map(|item_idx| MenuRow::Item(menu_idx, item_idx)));
    }
    rows
}

fn selected_menu_row(dashboard: &Dashboard, cursor: usize) -> Option<MenuRow> {
    menu_rows(dashboard.menus.menus()).get(cursor).copied()
}

fn selected_menu(dashboard: &Dashboard, cursor: usize) -> Option<&Menu> {
    let menu_idx = match selected_menu_row(dashboard, cursor)? {
        MenuRow::Menu(menu_idx) | MenuRow::Item(menu_idx, _) => menu_idx,
    };
    dashboard.menus.menus().get(menu_idx)
}

fn row_count(tab: TabKind, dashboard: &Dashboard) -> usize {
    match tab {
        TabKind::Companies => companies(dashboard).len(),
        TabKind::Menus => menu_rows(dashboard.menus.menus()).len(),
        TabKind::Analytics => 0,
    }
}

fn clamp_cursor(tab: TabKind, dashboard: &Dashboard, view_data: &mut ViewData) {
    let len = row_count(tab, dashboard);
    view_data.cursor = view_data.cursor.min(len.saturating_sub(1));
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    dashboard: &Dashboard,
    view_data: &ViewData,
    busy: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .enumerate()
        .map(|(index, tab)| format!("{} {}", index + 1, tab.label()))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title(APP_NAME).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Companies if !companies(dashboard).is_empty() => {
            render_company_table(frame, layout[1], dashboard, view_data.cursor);
        }
        TabKind::Companies => {
            let body = Paragraph::new(render_companies_text(dashboard))
                .block(Block::default().borders(Borders::ALL).title("companies"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Menus => {
            let body = Paragraph::new(render_menus_text(dashboard, view_data.cursor))
                .block(Block::default().borders(Borders::ALL).title("menus"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Analytics => {
            let body = Paragraph::new(render_analytics_text(dashboard))
                .block(Block::default().borders(Borders::ALL).title("analytics"));
            frame.render_widget(body, layout[1]);
        }
    }

    let status_block = Block::default().borders(Borders::ALL);
    let status_block = if busy {
        status_block.title("working...")
    } else {
        status_block
    };
    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(status_block);
    frame.render_widget(status_widget, layout[2]);

    if let Some(form) = &view_data.form {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_form_text(form)).block(
            Block::default()
                .title(form.body.kind().title())
                .borders(Borders::ALL),
        );
        frame.render_widget(overlay, area);
    }

    if state.mode == AppMode::Confirm
        && let Some(request) = dashboard.pending_confirmation()
    {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(render_confirm_text(request)).block(
            Block::default()
                .title("confirm")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(confirm, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_company_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    dashboard: &Dashboard,
    cursor: usize,
) {
    let header = Row::new(
        ["name", "type", "created"].map(|label| {
            Cell::from(label).style(Style::default().add_modifier(Modifier::BOLD))
        }),
    );
    let rows = company_rows(companies(dashboard))
        .into_iter()
        .enumerate()
        .map(|(index, cells)| {
            let style = if index == cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Row::new(cells.map(Cell::from)).style(style)
        });
    let widths = [
        Constraint::Percentage(50),
        Constraint::Percentage(20),
        Constraint::Percentage(30),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("companies"));
    frame.render_widget(table, area);
}

fn company_rows(companies: &[Company]) -> Vec<[String; 3]> {
    companies
        .iter()
        .map(|company| {
            [
                company.name.clone(),
                company.company_type.badge().to_owned(),
                company
                    .created_at
                    .as_deref()
                    .map(format_day)
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

fn view_placeholder<T>(view: &ViewState<T>, idle: &str) -> Option<String> {
    match view {
        ViewState::Idle => Some(idle.to_owned()),
        ViewState::Loading => Some("Loading...".to_owned()),
        ViewState::Error(message) => Some(format!("Error: {message}\npress r to retry")),
        ViewState::Loaded(_) => None,
    }
}

fn render_companies_text(dashboard: &Dashboard) -> String {
    if let Some(text) = view_placeholder(&dashboard.companies, "press r to load companies") {
        return text;
    }
    let companies = companies(dashboard);
    if companies.is_empty() {
        return "No Companies Yet\nAdd your first company to start collecting ratings (a)"
            .to_owned();
    }
    company_rows(companies)
        .into_iter()
        .map(|[name, badge, created]| format!("{name}  [{badge}]  {created}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn selector_line(selector: &CompanySelector) -> String {
    format!("company: < {} >  ([ / ] to change)", selector.selected_label())
}

fn render_menus_text(dashboard: &Dashboard, cursor: usize) -> String {
    let mut lines = vec![selector_line(&dashboard.menu_selector)];
    lines.push(if dashboard.menus.add_enabled {
        "a add menu | i add items | e edit | d delete menu | x delete item".to_owned()
    } else {
        "a add menu (select a company first)".to_owned()
    });
    lines.push(String::new());

    if let Some(text) = view_placeholder(&dashboard.menus.view, "Select a company to view menus") {
        lines.push(text);
        return lines.join("\n");
    }

    let menus = dashboard.menus.menus();
    if menus.is_empty() {
        lines.push("No Menus Yet".to_owned());
        lines.push("Add a menu for this company to start collecting ratings".to_owned());
        return lines.join("\n");
    }

    for (index, row) in menu_rows(menus).into_iter().enumerate() {
        let marker = if index == cursor { "> " } else { "  " };
        match row {
            MenuRow::Menu(menu_idx) => {
                let menu = &menus[menu_idx];
                lines.push(format!(
                    "{marker}{} ({})",
                    format_day(&menu.date),
                    canteen_app::count_label(menu.items.len())
                ));
            }
            MenuRow::Item(menu_idx, item_idx) => {
                let item = &menus[menu_idx].items[item_idx];
                if item.description().is_empty() {
                    lines.push(format!("{marker}    - {}", item.name));
                } else {
                    lines.push(format!("{marker}    - {}: {}", item.name, item.description()));
                }
            }
        }
    }
    lines.join("\n")
}

fn rating_line(score: f64) -> String {
    format!(
        "{} ({})",
        format_rating(score),
        RatingLabel::for_score(score).as_str()
    )
}

fn render_analytics_text(dashboard: &Dashboard) -> String {
    let mut lines = vec![
        selector_line(&dashboard.analytics_selector),
        format!("period: {}  (p to change)", dashboard.period.as_str()),
        String::new(),
    ];

    if let Some(text) = view_placeholder(
        &dashboard.analytics.view,
        "Select a company to view analytics",
    ) {
        lines.push(text);
        return lines.join("\n");
    }
    let Some(analytics) = dashboard.analytics.view.loaded() else {
        return lines.join("\n");
    };

    if analytics.total_submissions == 0 {
        lines.push("No Data Available".to_owned());
        lines.push(format!("No ratings submitted for {}", analytics.date_range));
        return lines.join("\n");
    }

    lines.push(format!(
        "Total Submissions: {}  ({})",
        analytics.total_submissions, analytics.date_range
    ));
    lines.push(format!(
        "Average Rating: {}",
        rating_line(analytics.average_rating)
    ));
    if let Some(best) = &analytics.best_dish {
        lines.push(format!(
            "Best Dish: {} {}",
            best.item_name,
            rating_line(best.average_rating)
        ));
    }
    if let Some(worst) = analytics.distinct_worst_dish() {
        lines.push(format!(
            "Worst Dish: {} {}",
            worst.item_name,
            rating_line(worst.average_rating)
        ));
    }
    lines.push(String::new());
    for rating in &analytics.item_ratings {
        lines.push(format!(
            "{:<28} {:>4}  {:>5} ratings  {}",
            rating.item_name,
            format_rating(rating.average_rating),
            rating.total_ratings,
            RatingLabel::for_score(rating.average_rating).as_str()
        ));
    }
    lines.join("\n")
}

fn render_form_text(form: &FormUiState) -> String {
    let marker = |field: usize| if field == form.field { "> " } else { "  " };
    let mut lines = Vec::new();

    match &form.body {
        FormBody::Company { form: company, .. } => {
            lines.push(format!("{}name: {}", marker(0), company.name));
            let kind = company
                .company_type
                .map_or("(space to choose)", |kind| kind.badge());
            lines.push(format!("{}type: {kind}", marker(1)));
        }
        FormBody::Item(item) => {
            lines.push(format!("{}name: {}", marker(0), item.draft.name));
            lines.push(format!("{}description: {}", marker(1), item.draft.description));
        }
        FormBody::Menu(menu) => {
            lines.push(format!("{}date: {}", marker(0), menu.date));
        }
        FormBody::MenuEdit(draft) => {
            lines.push(format!("  date: {}", format_day(&draft.date)));
        }
        FormBody::Items(_) => {}
    }

    if let Some(offset) = form.body.row_offset() {
        if let Some(count) = form.body.count_label() {
            lines.push(format!("  items: {count}"));
        }
        for (index, draft) in form.body.item_rows().into_iter().enumerate() {
            let name_field = offset + index * 2;
            lines.push(format!(
                "{}{}. name: {}",
                marker(name_field),
                index + 1,
                draft.name
            ));
            lines.push(format!(
                "{}   description: {}",
                marker(name_field + 1),
                draft.description
            ));
        }
        lines.push(String::new());
        lines.push("ctrl+n add row | ctrl+d remove row".to_owned());
    } else {
        lines.push(String::new());
    }
    lines.push("tab next field | enter save | esc cancel".to_owned());
    lines.join("\n")
}

fn render_confirm_text(request: &ConfirmationRequest) -> String {
    format!("{}\n\ny confirm | n cancel", request.message)
}

fn help_overlay_text() -> &'static str {
    "global
  1-3 / tab / shift+tab  switch tab
  j/k                    move cursor
  r                      reload or retry
  ?                      toggle help
  ctrl+q                 quit

companies
  a add | e edit | d delete

menus
  [ / ]  change company
  a add menu | i add items | e edit menu or item
  d delete menu | x delete item

analytics
  [ / ]  change company
  p      cycle period (daily, weekly, monthly)

forms
  tab/shift+tab move | space cycles type | enter or ctrl+s save
  ctrl+n add item row | ctrl+d remove item row | esc cancel"
}

fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Nav => "nav",
        AppMode::Form(_) => "form",
        AppMode::Confirm => "confirm",
    }
}

fn status_text(state: &AppState) -> String {
    if let Some(toast) = &state.status_line {
        return format!("[{}] {}", toast.kind.label(), toast.message);
    }
    let hint = match state.mode {
        AppMode::Nav => "? help | ctrl+q quit",
        AppMode::Form(_) => "enter save | esc cancel",
        AppMode::Confirm => "y confirm | n cancel",
    };
    format!("{} | {hint}", mode_label(state.mode))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        FormBody, InternalEvent, ViewData, Worker, company_rows, handle_internal_event,
        handle_key_event, help_overlay_text, process_internal_events, render_analytics_text,
        render_companies_text, render_form_text, render_menus_text, status_text,
    };
    use canteen_app::{
        AdminApi, AppCommand, AppMode, AppState, CompanyType, Dashboard, FormKind, SelectorHandle,
        TabKind, Toast, ToastKind, ViewState,
    };
    use canteen_testkit::{FakeService, fixture_today};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;
    use std::sync::mpsc::{self, Receiver};
    use std::time::{Duration, Instant};

    struct Harness {
        state: AppState,
        dashboard: Dashboard,
        service: Arc<FakeService>,
        view_data: ViewData,
        worker: Worker,
        rx: Receiver<InternalEvent>,
    }

    impl Harness {
        fn new(service: FakeService) -> Self {
            let service = Arc::new(service);
            let api: Arc<dyn AdminApi> = service.clone();
            let (tx, rx) = mpsc::channel();
            let mut worker = Worker::new(api, tx);
            let mut dashboard = Dashboard::default();
            worker.spawn_all(dashboard.activate_tab(TabKind::Companies));
            let mut harness = Self {
                state: AppState::default(),
                dashboard,
                service,
                view_data: ViewData::default(),
                worker,
                rx,
            };
            harness.settle();
            harness
        }

        fn press(&mut self, code: KeyCode) -> bool {
            self.press_with(code, KeyModifiers::NONE)
        }

        fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            let quit = self.press_unsettled(code, modifiers);
            self.settle();
            quit
        }

        fn press_unsettled(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.dashboard,
                &mut self.view_data,
                &mut self.worker,
                KeyEvent::new(code, modifiers),
            )
        }

        /// Applies results until no task is in flight, follow-ups included.
        fn settle(&mut self) {
            while self.worker.is_busy() {
                let event = self
                    .rx
                    .recv_timeout(Duration::from_secs(5))
                    .expect("task finished");
                handle_internal_event(
                    &mut self.state,
                    &mut self.dashboard,
                    &mut self.view_data,
                    &mut self.worker,
                    event,
                );
            }
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn status_message(&self) -> Option<&str> {
            self.state
                .status_line
                .as_ref()
                .map(|toast| toast.message.as_str())
        }
    }

    fn seeded() -> FakeService {
        let service = FakeService::new(fixture_today());
        service.seed_company("Acme", CompanyType::Static);
        service.seed_company("Globex", CompanyType::Cafeteria);
        service
    }

    #[test]
    fn ctrl_q_quits() {
        let mut harness = Harness::new(seeded());
        assert!(!harness.press(KeyCode::Char('q')));
        assert!(harness.press_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
    }

    #[test]
    fn number_keys_activate_tabs_and_sync_selectors() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('2'));

        assert_eq!(harness.state.active_tab, TabKind::Menus);
        let labels: Vec<&str> = harness
            .dashboard
            .menu_selector
            .options()
            .iter()
            .map(|option| option.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Select Company", "Acme", "Globex"]);
        assert!(render_menus_text(&harness.dashboard, 0).contains("Select a company to view menus"));
    }

    #[test]
    fn slow_load_leaves_keys_responsive() {
        let service = seeded();
        let initech = service.seed_company("Initech", CompanyType::Static);
        service.seed_menu(&initech, fixture_today(), &[("Soup", "")]);
        let mut harness = Harness::new(service);
        harness.press(KeyCode::Char('2'));
        harness.service.set_latency(Duration::from_millis(600));

        let started = Instant::now();
        harness.press_unsettled(KeyCode::Char('['), KeyModifiers::NONE);
        assert!(started.elapsed() < Duration::from_millis(300));
        assert_eq!(harness.dashboard.menu_selector.selected(), Some(initech));
        assert!(harness.dashboard.menus.view.is_loading());
        assert!(render_menus_text(&harness.dashboard, 0).contains("Loading..."));

        let started = Instant::now();
        assert!(harness.press_unsettled(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(started.elapsed() < Duration::from_millis(300));

        harness.settle();
        assert_eq!(harness.dashboard.menus.menus().len(), 1);
    }

    #[test]
    fn add_company_through_form() {
        let mut harness = Harness::new(FakeService::new(fixture_today()));
        assert!(render_companies_text(&harness.dashboard).contains("No Companies Yet"));

        harness.press(KeyCode::Char('a'));
        assert_eq!(harness.state.mode, AppMode::Form(FormKind::AddCompany));
        harness.type_text("Initech");
        harness.press(KeyCode::Tab);
        harness.press(KeyCode::Char(' '));
        harness.press(KeyCode::Enter);

        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.status_message(), Some("Company added successfully!"));
        let rows = company_rows(harness.dashboard.companies.loaded().expect("loaded"));
        assert_eq!(rows[0][0], "Initech");
        assert_eq!(rows[0][1], "Static Menu");
    }

    #[test]
    fn edit_company_opens_fetched_form() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('e'));

        assert_eq!(harness.state.mode, AppMode::Form(FormKind::EditCompany));
        assert_eq!(harness.service.call_count("GET /companies/"), 1);
        let form = harness.view_data.form.as_ref().expect("form open");
        assert!(render_form_text(form).contains("> name: Acme"));

        harness.type_text(" Corp");
        harness.press(KeyCode::Enter);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.status_message(), Some("Company updated successfully!"));
        assert!(render_companies_text(&harness.dashboard).contains("Acme Corp"));
    }

    #[test]
    fn invalid_company_form_stays_open_with_warning() {
        let mut harness = Harness::new(FakeService::new(fixture_today()));
        harness.press(KeyCode::Char('a'));
        harness.type_text("Initech");
        harness.press_with(KeyCode::Char('s'), KeyModifiers::CONTROL);

        assert_eq!(harness.state.mode, AppMode::Form(FormKind::AddCompany));
        let toast = harness.state.status_line.clone().expect("warning toast");
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.message, "Company type is required");
    }

    #[test]
    fn declined_company_delete_makes_no_call() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('d'));
        assert_eq!(harness.state.mode, AppMode::Confirm);

        harness.press(KeyCode::Char('n'));
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.service.call_count("DELETE"), 0);
        assert!(harness.state.status_line.is_none());
    }

    #[test]
    fn accepted_company_delete_reloads_list() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Char('d'));
        harness.press(KeyCode::Char('y'));

        assert_eq!(harness.service.call_count("DELETE /companies/"), 1);
        let text = render_companies_text(&harness.dashboard);
        assert!(text.contains("Acme"));
        assert!(!text.contains("Globex"));
        assert_eq!(harness.view_data.cursor, 0);
        assert_eq!(
            harness.status_message(),
            Some("Company and all associated data deleted successfully!")
        );
    }

    #[test]
    fn menus_tab_lists_menus_for_selected_company() {
        let service = FakeService::new(fixture_today());
        let acme = service.seed_company("Acme", CompanyType::Static);
        service.seed_menu(&acme, fixture_today(), &[("Soup", "hot"), ("Salad", "")]);

        let mut harness = Harness::new(service);
        harness.press(KeyCode::Char('2'));
        harness.press(KeyCode::Char(']'));

        assert_eq!(harness.dashboard.menu_selector.selected(), Some(acme));
        let text = render_menus_text(&harness.dashboard, 1);
        assert!(text.contains("March 4, 2026 (2 items)"));
        assert!(text.contains(">     - Soup: hot"));
        assert!(text.contains("- Salad"));
    }

    #[test]
    fn edit_menu_opens_draft_from_fresh_fetch() {
        let service = FakeService::new(fixture_today());
        let acme = service.seed_company("Acme", CompanyType::Static);
        service.seed_menu(&acme, fixture_today(), &[("Soup", "hot")]);

        let mut harness = Harness::new(service);
        harness.press(KeyCode::Char('2'));
        harness.press(KeyCode::Char(']'));
        harness.service.clear_calls();
        harness.press(KeyCode::Char('e'));

        assert_eq!(harness.state.mode, AppMode::Form(FormKind::EditMenu));
        assert_eq!(harness.service.call_count("GET /menus/"), 1);
        let form = harness.view_data.form.as_ref().expect("form open");
        assert!(render_form_text(form).contains("> 1. name: Soup"));
    }

    #[test]
    fn add_menu_without_company_warns() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('2'));
        harness.press(KeyCode::Char('a'));

        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.status_message(), Some("Please select a company first"));
    }

    #[test]
    fn add_menu_form_rows() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('2'));
        harness.press(KeyCode::Char(']'));
        harness.press(KeyCode::Char('a'));
        assert_eq!(harness.state.mode, AppMode::Form(FormKind::AddMenu));

        harness.press(KeyCode::Tab);
        harness.type_text("Soup");
        harness.press_with(KeyCode::Char('n'), KeyModifiers::CONTROL);
        harness.type_text("Bread");

        let form = harness.view_data.form.as_ref().expect("form open");
        let text = render_form_text(form);
        assert!(text.contains("date: "));
        assert!(text.contains("items: 2 items"));
        assert!(text.contains("> 2. name: Bread"));

        harness.press(KeyCode::Enter);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.status_message(), Some("Menu added successfully!"));
        assert_eq!(harness.dashboard.menus.menus()[0].items.len(), 2);
    }

    #[test]
    fn removing_last_row_warns() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('2'));
        harness.press(KeyCode::Char(']'));
        harness.press(KeyCode::Char('a'));
        harness.press(KeyCode::Tab);
        harness.press_with(KeyCode::Char('d'), KeyModifiers::CONTROL);

        assert_eq!(
            harness.status_message(),
            Some("At least one menu item is required")
        );
        let form = harness.view_data.form.as_ref().expect("form open");
        assert!(matches!(&form.body, FormBody::Menu(menu) if menu.items.len() == 1));
    }

    #[test]
    fn period_key_cycles_and_reloads() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('3'));
        harness.press(KeyCode::Char(']'));
        assert!(render_analytics_text(&harness.dashboard).contains("No Data Available"));

        harness.service.clear_calls();
        harness.press(KeyCode::Char('p'));
        assert_eq!(harness.service.call_count("GET /analytics/"), 1);
        assert!(render_analytics_text(&harness.dashboard).contains("period: weekly"));
    }

    #[test]
    fn analytics_text_shows_labels() {
        let service = FakeService::new(fixture_today());
        let acme = service.seed_company("Acme", CompanyType::Static);
        let menu = service.seed_menu(&acme, fixture_today(), &[("Soup", ""), ("Salad", "")]);
        let scores = [(menu.items[0].id.clone(), 5), (menu.items[1].id.clone(), 2)];
        service.seed_submission(&acme, &menu.id, fixture_today(), &scores);

        let mut harness = Harness::new(service);
        harness.press(KeyCode::Char('3'));
        harness.press(KeyCode::Char(']'));

        let text = render_analytics_text(&harness.dashboard);
        assert!(text.contains("Total Submissions: 1"), "{text}");
        assert!(text.contains("Average Rating: 3.5 (Good)"), "{text}");
        assert!(text.contains("Best Dish: Soup 5.0 (Excellent)"), "{text}");
        assert!(text.contains("Worst Dish: Salad 2.0 (Poor)"), "{text}");
    }

    #[test]
    fn load_error_then_retry_with_r() {
        let service = seeded();
        service.fail_company_list(true);
        let mut harness = Harness::new(service);

        assert!(matches!(harness.dashboard.companies, ViewState::Error(_)));
        assert!(render_companies_text(&harness.dashboard).contains("press r to retry"));

        harness.service.fail_company_list(false);
        harness.press_unsettled(KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(harness.dashboard.companies.is_loading());
        assert_eq!(render_companies_text(&harness.dashboard), "Loading...");

        harness.settle();
        let text = render_companies_text(&harness.dashboard);
        assert!(text.contains("Acme"), "{text}");
        assert!(text.contains("Globex"), "{text}");
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut harness = Harness::new(seeded());
        harness.press(KeyCode::Char('?'));
        assert!(harness.view_data.help_visible);
        harness.press(KeyCode::Char('2'));
        assert_eq!(harness.state.active_tab, TabKind::Companies);
        harness.press(KeyCode::Esc);
        assert!(!harness.view_data.help_visible);
        assert!(help_overlay_text().contains("ctrl+q"));
    }

    #[test]
    fn stale_status_clear_is_ignored() {
        let mut harness = Harness::new(seeded());
        harness
            .state
            .dispatch(AppCommand::SetStatus(Toast::info("hello")));
        harness.view_data.status_token = 2;

        let tx = harness.worker.tx.clone();
        tx.send(InternalEvent::ClearStatus { token: 1 }).expect("send");
        process_internal_events(
            &mut harness.state,
            &mut harness.dashboard,
            &mut harness.view_data,
            &mut harness.worker,
            &harness.rx,
        );
        assert_eq!(status_text(&harness.state), "[info] hello");

        tx.send(InternalEvent::ClearStatus { token: 2 }).expect("send");
        process_internal_events(
            &mut harness.state,
            &mut harness.dashboard,
            &mut harness.view_data,
            &mut harness.worker,
            &harness.rx,
        );
        assert_eq!(status_text(&harness.state), "nav | ? help | ctrl+q quit");
    }
}
