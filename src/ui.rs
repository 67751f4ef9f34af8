use crate::auth::{AccountStatus, AuthError, AuthService, LoginCredentials, RegisterData, User};
use crate::config::AppConfig;
use crate::export::{export_roster, roster_summary};
use crate::roster::Roster;
use crate::store::Store;
use crate::swimmer::{Swimmer, SwimmerForm, EVENTS};
use crate::validation::FormErrors;
use crate::{auth, swimmer};
use anyhow::Result;
use chrono::{Datelike, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tracing::error;

// ============================================================================
// PAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPage {
    Login,
    Register,
}

impl AuthPage {
    pub fn toggle(&self) -> Self {
        match self {
            AuthPage::Login => AuthPage::Register,
            AuthPage::Register => AuthPage::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Registration,
    Roster,
    Accounts,
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Registration => "Register Athlete",
            Page::Roster => "Registrations",
            Page::Accounts => "Pending Accounts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    fn error(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Error, text: text.into() }
    }

    fn success(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Success, text: text.into() }
    }
}

// ============================================================================
// INPUT FORMS
// ============================================================================

#[derive(Debug, Clone)]
pub struct InputField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    /// Rendered as bullets
    pub secret: bool,
    /// Value chosen with Left/Right among EVENTS instead of typed
    pub picker: bool,
}

impl InputField {
    fn text(key: &'static str, label: &'static str) -> Self {
        Self { key, label, value: String::new(), secret: false, picker: false }
    }

    fn secret(key: &'static str, label: &'static str) -> Self {
        Self { secret: true, ..Self::text(key, label) }
    }

    fn picker(key: &'static str, label: &'static str) -> Self {
        Self { picker: true, ..Self::text(key, label) }
    }
}

#[derive(Debug, Clone)]
pub struct InputForm {
    pub fields: Vec<InputField>,
    pub focus: usize,
}

impl InputForm {
    fn new(fields: Vec<InputField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn login() -> Self {
        Self::new(vec![
            InputField::text(auth::FIELD_EMAIL, "Email address"),
            InputField::secret(auth::FIELD_PASSWORD, "Password"),
        ])
    }

    pub fn register() -> Self {
        Self::new(vec![
            InputField::text(auth::FIELD_NAME, "Full name"),
            InputField::text(auth::FIELD_EMAIL, "Email address"),
            InputField::secret(auth::FIELD_PASSWORD, "Password"),
            InputField::secret(auth::FIELD_CONFIRM_PASSWORD, "Confirm password"),
        ])
    }

    pub fn swimmer() -> Self {
        Self::new(vec![
            InputField::text(swimmer::FIELD_NAME, "Athlete name *"),
            InputField::text(swimmer::FIELD_BIRTH_YEAR, "Birth year *"),
            InputField::text(swimmer::FIELD_COMPETITION, "Competition *"),
            InputField::picker(swimmer::FIELD_EVENT, "Event *"),
            InputField::text(swimmer::FIELD_ENTRY_TIME, "Entry time (MM:SS.CC) *"),
        ])
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn focused(&self) -> &InputField {
        &self.fields[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = if self.focus == 0 { self.fields.len() - 1 } else { self.focus - 1 };
    }

    pub fn push_char(&mut self, c: char) {
        let field = &mut self.fields[self.focus];
        if !field.picker {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = &mut self.fields[self.focus];
        if field.picker {
            field.value.clear();
        } else {
            field.value.pop();
        }
    }

    /// Cycle the focused picker through EVENTS. `forward` false goes back.
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = &mut self.fields[self.focus];
        if !field.picker {
            return;
        }

        let len = EVENTS.len();
        let next = match EVENTS.iter().position(|e| *e == field.value) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        field.value = EVENTS[next].to_string();
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App<'a> {
    pub auth: AuthService<'a>,
    pub roster: Roster<'a>,
    pub export_dir: PathBuf,

    pub auth_page: AuthPage,
    pub current_page: Page,
    pub login_form: InputForm,
    pub register_form: InputForm,
    pub swimmer_form: InputForm,
    pub errors: FormErrors,
    pub message: Option<Message>,

    pub swimmers: Vec<Swimmer>,
    pub roster_state: TableState,
    pub pending: Vec<User>,
    pub pending_state: TableState,

    pub show_summary: bool,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(store: &'a Store, config: &AppConfig) -> Self {
        let mut app = Self {
            auth: AuthService::new(store, &config.admin),
            roster: Roster::new(store),
            export_dir: config.export.output_dir.clone(),
            auth_page: AuthPage::Login,
            current_page: Page::Registration,
            login_form: InputForm::login(),
            register_form: InputForm::register(),
            swimmer_form: InputForm::swimmer(),
            errors: FormErrors::new(),
            message: None,
            swimmers: Vec::new(),
            roster_state: TableState::default(),
            pending: Vec::new(),
            pending_state: TableState::default(),
            show_summary: false,
            should_quit: false,
        };

        app.auth.refresh_session();
        app.reload();
        app
    }

    pub fn is_on_auth_page(&self) -> bool {
        !self.auth.is_authenticated()
    }

    /// Pages reachable by the current session, in tab order.
    pub fn available_pages(&self) -> Vec<Page> {
        if !self.auth.can_register_swimmers() {
            Vec::new()
        } else if self.auth.is_admin() {
            vec![Page::Registration, Page::Roster, Page::Accounts]
        } else {
            vec![Page::Registration]
        }
    }

    /// Re-read swimmers and pending accounts, keeping selections in range.
    pub fn reload(&mut self) {
        self.swimmers = self.roster.swimmers();
        self.pending = self.auth.pending_users();
        clamp_selection(&mut self.roster_state, self.swimmers.len());
        clamp_selection(&mut self.pending_state, self.pending.len());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_summary {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('s')) {
                self.show_summary = false;
            }
            return;
        }

        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        if self.is_on_auth_page() {
            self.handle_auth_key(key);
        } else {
            self.handle_home_key(key);
        }
    }

    // ------------------------------------------------------------------------
    // Login / register
    // ------------------------------------------------------------------------

    fn handle_auth_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.auth_page = self.auth_page.toggle();
                self.errors = FormErrors::new();
                self.message = None;
            }
            KeyCode::Down => self.auth_form_mut().next_field(),
            KeyCode::Up => self.auth_form_mut().previous_field(),
            KeyCode::Enter => match self.auth_page {
                AuthPage::Login => self.submit_login(),
                AuthPage::Register => self.submit_register(),
            },
            KeyCode::Backspace => {
                self.auth_form_mut().backspace();
                self.after_edit(self.auth_page_focused_key());
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.auth_form_mut().push_char(c);
                self.after_edit(self.auth_page_focused_key());
            }
            _ => {}
        }
    }

    fn auth_form_mut(&mut self) -> &mut InputForm {
        match self.auth_page {
            AuthPage::Login => &mut self.login_form,
            AuthPage::Register => &mut self.register_form,
        }
    }

    fn auth_page_focused_key(&self) -> &'static str {
        match self.auth_page {
            AuthPage::Login => self.login_form.focused().key,
            AuthPage::Register => self.register_form.focused().key,
        }
    }

    fn after_edit(&mut self, field: &str) {
        self.errors.clear(field);
        self.message = None;
    }

    fn submit_login(&mut self) {
        let credentials = LoginCredentials {
            email: self.login_form.value(auth::FIELD_EMAIL).to_string(),
            password: self.login_form.value(auth::FIELD_PASSWORD).to_string(),
        };

        match self.auth.login(credentials) {
            Ok(_) => {
                self.login_form.reset();
                self.register_form.reset();
                self.errors = FormErrors::new();
                self.message = None;
                self.current_page = Page::Registration;
                self.reload();
            }
            Err(e) => self.message = Some(Message::error(e.to_string())),
        }
    }

    fn submit_register(&mut self) {
        let form = &self.register_form;
        let data = RegisterData {
            email: form.value(auth::FIELD_EMAIL).to_string(),
            password: form.value(auth::FIELD_PASSWORD).to_string(),
            name: form.value(auth::FIELD_NAME).to_string(),
            confirm_password: form.value(auth::FIELD_CONFIRM_PASSWORD).to_string(),
        };

        match self.auth.register(data) {
            Ok(_) => {
                self.register_form.reset();
                self.errors = FormErrors::new();
                self.message = Some(Message::success(
                    "Your account was created. It is awaiting approval by the administrator.",
                ));
                self.reload();
            }
            Err(AuthError::Validation(errors)) => {
                self.errors = errors;
                self.message = None;
            }
            Err(e) => self.message = Some(Message::error(e.to_string())),
        }
    }

    // ------------------------------------------------------------------------
    // Logged-in pages
    // ------------------------------------------------------------------------

    fn handle_home_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
            self.logout();
            return;
        }

        let pages = self.available_pages();
        if pages.is_empty() {
            // Pending notice: nothing but logout and quit
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.current_page = cycle_page(&pages, self.current_page, true);
                self.message = None;
                return;
            }
            KeyCode::BackTab => {
                self.current_page = cycle_page(&pages, self.current_page, false);
                self.message = None;
                return;
            }
            _ => {}
        }

        match self.current_page {
            Page::Registration => self.handle_registration_key(key),
            Page::Roster => self.handle_roster_key(key),
            Page::Accounts => self.handle_accounts_key(key),
        }
    }

    fn handle_registration_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down => self.swimmer_form.next_field(),
            KeyCode::Up => self.swimmer_form.previous_field(),
            KeyCode::Right => self.swimmer_form.cycle_choice(true),
            KeyCode::Left => self.swimmer_form.cycle_choice(false),
            KeyCode::Enter => self.submit_swimmer(),
            KeyCode::Backspace => {
                self.swimmer_form.backspace();
                self.after_edit(self.swimmer_form.focused().key);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.swimmer_form.push_char(c);
                self.after_edit(self.swimmer_form.focused().key);
            }
            _ => {}
        }

        if matches!(key.code, KeyCode::Left | KeyCode::Right) {
            self.after_edit(self.swimmer_form.focused().key);
        }
    }

    fn submit_swimmer(&mut self) {
        let form = &self.swimmer_form;
        let data = SwimmerForm {
            name: form.value(swimmer::FIELD_NAME).to_string(),
            birth_year: form.value(swimmer::FIELD_BIRTH_YEAR).to_string(),
            competition: form.value(swimmer::FIELD_COMPETITION).to_string(),
            event: form.value(swimmer::FIELD_EVENT).to_string(),
            entry_time: form.value(swimmer::FIELD_ENTRY_TIME).to_string(),
        };

        match Swimmer::from_form(&data) {
            Ok(new_swimmer) => {
                let actor = self.actor_id();
                let name = new_swimmer.name.clone();
                self.roster.add(new_swimmer, &actor);
                self.swimmer_form.reset();
                self.errors = FormErrors::new();
                self.message = Some(Message::success(format!("{} registered", name)));
                self.reload();
            }
            Err(errors) => {
                self.errors = errors;
                self.message = None;
            }
        }
    }

    fn handle_roster_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.roster_state, self.swimmers.len()),
            KeyCode::Up | KeyCode::Char('k') => select_previous(&mut self.roster_state, self.swimmers.len()),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected_swimmer(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('s') => self.show_summary = true,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn delete_selected_swimmer(&mut self) {
        let Some(target) = self
            .roster_state
            .selected()
            .and_then(|i| self.swimmers.get(i))
            .map(|s| (s.id.clone(), s.name.clone()))
        else {
            return;
        };

        let actor = self.actor_id();
        if self.roster.delete(&target.0, &actor) {
            self.message = Some(Message::success(format!("Registration of {} deleted", target.1)));
        }
        self.reload();
    }

    fn export(&mut self) {
        let today = Local::now().date_naive();
        match export_roster(&self.export_dir, &self.swimmers, today) {
            Ok(path) => {
                self.message = Some(Message::success(format!("Exported to {}", path.display())));
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "export failed");
                self.message = Some(Message::error(format!("Export failed: {}", e)));
            }
        }
    }

    fn handle_accounts_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.pending_state, self.pending.len()),
            KeyCode::Up | KeyCode::Char('k') => select_previous(&mut self.pending_state, self.pending.len()),
            KeyCode::Char('a') => self.decide_selected(true),
            KeyCode::Char('r') => self.decide_selected(false),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn decide_selected(&mut self, approve: bool) {
        let Some(user) = self.pending_state.selected().and_then(|i| self.pending.get(i)).cloned() else {
            return;
        };

        let done = if approve {
            self.auth.approve_user(&user.id)
        } else {
            self.auth.reject_user(&user.id)
        };

        if done {
            let verb = if approve { "approved" } else { "rejected" };
            self.message = Some(Message::success(format!("{} {}", user.email, verb)));
        }
        self.reload();
    }

    fn logout(&mut self) {
        self.auth.logout();
        self.auth_page = AuthPage::Login;
        self.current_page = Page::Registration;
        self.swimmer_form.reset();
        self.errors = FormErrors::new();
        self.message = None;
    }

    fn actor_id(&self) -> String {
        self.auth
            .current_user()
            .map(|u| u.id.clone())
            .unwrap_or_default()
    }
}

fn cycle_page(pages: &[Page], current: Page, forward: bool) -> Page {
    let len = pages.len();
    match pages.iter().position(|p| *p == current) {
        Some(i) if forward => pages[(i + 1) % len],
        Some(i) => pages[(i + len - 1) % len],
        None => pages[0],
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let i = state.selected().unwrap_or(0).min(len - 1);
        state.select(Some(i));
    }
}

fn select_next(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i >= len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

fn select_previous(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(0) | None => len - 1,
        Some(i) => i - 1,
    };
    state.select(Some(i));
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal UI stopped");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.is_on_auth_page() {
        render_auth(f, chunks[1], app);
    } else if app.available_pages().is_empty() {
        render_pending_notice(f, chunks[1], app);
    } else {
        match app.current_page {
            Page::Registration => render_swimmer_form(f, chunks[1], app),
            Page::Roster => render_roster(f, chunks[1], app),
            Page::Accounts => render_accounts(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);

    if app.show_summary {
        let area = f.size();
        render_summary(f, area, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            "AquaRegistration",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    if app.is_on_auth_page() {
        for (i, (page, name)) in [(AuthPage::Login, "Sign in"), (AuthPage::Register, "Create account")]
            .iter()
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::raw(" │ "));
            }
            spans.push(Span::styled(*name, tab_style(*page == app.auth_page)));
        }
    } else {
        for (i, page) in app.available_pages().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" │ "));
            }
            spans.push(Span::styled(page.title().to_string(), tab_style(*page == app.current_page)));
        }

        if let Some(user) = app.auth.current_user() {
            spans.push(Span::raw("  |  "));
            spans.push(Span::styled(
                format!("{} ({})", user.name, user.role.as_str()),
                Style::default().fg(Color::White),
            ));
        }
        if app.auth.is_admin() {
            spans.push(Span::raw("  |  "));
            spans.push(Span::styled(
                format!("{} registrations", app.swimmers.len()),
                Style::default().fg(Color::Green),
            ));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} pending", app.pending.len()),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn tab_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_auth(f: &mut Frame, area: Rect, app: &App) {
    let (form, title) = match app.auth_page {
        AuthPage::Login => (&app.login_form, " Sign in "),
        AuthPage::Register => (&app.register_form, " Create an account "),
    };
    render_input_form(f, area, form, &app.errors, app.message.as_ref(), title);
}

fn render_swimmer_form(f: &mut Frame, area: Rect, app: &App) {
    render_input_form(
        f,
        area,
        &app.swimmer_form,
        &app.errors,
        app.message.as_ref(),
        " Athlete Registration ",
    );
}

fn render_input_form(
    f: &mut Frame,
    area: Rect,
    form: &InputForm,
    errors: &FormErrors,
    message: Option<&Message>,
    title: &str,
) {
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from("")];

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if focused { "→ " } else { "  " };

        let shown = if field.secret {
            "•".repeat(field.value.chars().count())
        } else if field.picker && field.value.is_empty() {
            "◀ select an event ▶".to_string()
        } else if field.picker {
            format!("◀ {} ▶", field.value)
        } else {
            field.value.clone()
        };

        let value_style = if errors.has(field.key) {
            Style::default().fg(Color::Red)
        } else if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(format!("{:<26}", field.label), label_style),
            Span::styled(shown, value_style),
            if focused && !field.picker { Span::raw("▏") } else { Span::raw("") },
        ]));

        if let Some(msg) = errors.get(field.key) {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(28)),
                Span::styled(msg.to_string(), Style::default().fg(Color::Red)),
            ]));
        }
        lines.push(Line::from(""));
    }

    if let Some(message) = message {
        let color = match message.kind {
            MessageKind::Error => Color::Red,
            MessageKind::Success => Color::Green,
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", message.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title.to_string()),
    );

    f.render_widget(paragraph, area);
}

/// Heading and explanation shown to a signed-in user without form access.
fn pending_notice(status: AccountStatus) -> (&'static str, [&'static str; 2]) {
    match status {
        AccountStatus::Rejected => (
            "Account rejected",
            [
                "  An administrator rejected this account.",
                "  Contact the club to have it reviewed again.",
            ],
        ),
        _ => (
            "Account awaiting approval",
            [
                "  Your account was created but must be approved by an administrator",
                "  before you can use the application.",
            ],
        ),
    }
}

fn render_pending_notice(f: &mut Frame, area: Rect, app: &App) {
    let status = app
        .auth
        .current_user()
        .map(|u| u.status)
        .unwrap_or(AccountStatus::Pending);
    let (heading, body) = pending_notice(status);
    let color = if status == AccountStatus::Rejected { Color::Red } else { Color::Yellow };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", heading),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(body[0]),
        Line::from(body[1]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Current status: {}", status.as_str()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    f.render_widget(paragraph, area);
}

fn render_roster(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let current_year = Local::now().year();

    let header_cells = ["Name", "Age", "Competition", "Event", "Entry time", "Registered"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.swimmers.iter().map(|s| {
        Row::new(vec![
            Cell::from(truncate(&s.name, 24)),
            Cell::from(format!("{} ({})", s.age(current_year), s.birth_year)),
            Cell::from(truncate(&s.competition, 26)),
            Cell::from(s.event.clone()),
            Cell::from(s.entry_time.clone()).style(Style::default().fg(Color::Green)),
            Cell::from(s.registration_date()),
        ])
        .height(1)
    });

    let title = if app.swimmers.is_empty() {
        " No registrations yet ".to_string()
    } else {
        format!(" Registrations ({}) ", app.swimmers.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(12),
            Constraint::Length(28),
            Constraint::Length(24),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[0], &mut app.roster_state);
    render_message_line(f, chunks[1], app.message.as_ref());
}

fn render_accounts(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let header_cells = ["Name", "Email", "Role", "Created"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.pending.iter().map(|u| {
        Row::new(vec![
            Cell::from(truncate(&u.name, 24)),
            Cell::from(truncate(&u.email, 32)),
            Cell::from(u.role.as_str()),
            Cell::from(u.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()),
        ])
        .height(1)
    });

    let title = if app.pending.is_empty() {
        " No accounts awaiting approval ".to_string()
    } else {
        format!(" Accounts awaiting approval ({}) ", app.pending.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(34),
            Constraint::Length(8),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[0], &mut app.pending_state);
    render_message_line(f, chunks[1], app.message.as_ref());
}

fn render_message_line(f: &mut Frame, area: Rect, message: Option<&Message>) {
    let Some(message) = message else {
        return;
    };
    let color = match message.kind {
        MessageKind::Error => Color::Red,
        MessageKind::Success => Color::Green,
    };
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {}", message.text), Style::default().fg(color))),
        area,
    );
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(70, 80, area);
    let paragraph = Paragraph::new(roster_summary(&app.swimmers))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Roster summary (Esc to close) "),
        );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut spans = vec![Span::raw(" ")];
    if app.is_on_auth_page() {
        spans.extend([
            key("Tab"),
            Span::raw(" Sign in/Create account | "),
            key("↑/↓"),
            Span::raw(" Field | "),
            key("Enter"),
            Span::raw(" Submit | "),
        ]);
    } else if app.available_pages().is_empty() {
        spans.extend([key("Ctrl+L"), Span::raw(" Log out | ")]);
    } else {
        if app.available_pages().len() > 1 {
            spans.extend([key("Tab"), Span::raw(" Page | ")]);
        }
        match app.current_page {
            Page::Registration => spans.extend([
                key("↑/↓"),
                Span::raw(" Field | "),
                key("←/→"),
                Span::raw(" Event | "),
                key("Enter"),
                Span::raw(" Register | "),
            ]),
            Page::Roster => spans.extend([
                key("d"),
                Span::raw(" Delete | "),
                key("e"),
                Span::raw(" Export CSV | "),
                key("s"),
                Span::raw(" Summary | "),
            ]),
            Page::Accounts => spans.extend([
                key("a"),
                Span::raw(" Approve | "),
                key("r"),
                Span::raw(" Reject | "),
            ]),
        }
        spans.extend([key("Ctrl+L"), Span::raw(" Log out | ")]);
    }
    spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
