use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};

use api_types::{
    auth::{SignupRequest, UserView},
    filter::CollectionFilters,
    record::{Driver, Vehicle},
};
use engine::{
    Collections, CoreError, Destination, Guard, RecordKey, Role, Summary, TapCoordinator,
    TransactionKind, TransactionRecord, aggregate, entry_destination, filter_by_kind, guard,
    remove_record, summarize,
};

use crate::{
    client::{ApiClient, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    session_store::SessionStore,
    ui,
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Login,
    Signup,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transactions,
    Vehicles,
    Drivers,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Transactions => "Movimenti",
            Self::Vehicles => "Veicoli",
            Self::Drivers => "Autisti",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub busy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Name,
    Email,
    Password,
    Role,
}

#[derive(Debug)]
pub struct SignupState {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub focus: SignupField,
    pub message: Option<String>,
}

impl Default for SignupState {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Driver,
            focus: SignupField::Name,
            message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub login: LoginState,
    pub signup: SignupState,
    pub identity: Option<UserView>,
    pub records: Vec<TransactionRecord>,
    pub summary: Summary,
    pub kind_filter: Option<TransactionKind>,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
    pub selected: usize,
    pub loading: bool,
    pub tap: TapCoordinator,
    pub toast: Option<ToastState>,
}

impl AppState {
    /// Records currently displayed, after the kind filter.
    pub fn visible(&self) -> Vec<&TransactionRecord> {
        filter_by_kind(&self.records, self.kind_filter)
    }

    pub fn selected_key(&self) -> Option<RecordKey> {
        self.visible().get(self.selected).map(|record| record.key)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn reset_dashboard(&mut self) {
        self.records.clear();
        self.summary = Summary::default();
        self.vehicles.clear();
        self.drivers.clear();
        self.selected = 0;
        self.kind_filter = None;
        self.section = Section::Transactions;
        self.tap = TapCoordinator::new();
    }
}

pub struct App {
    client: ApiClient,
    store: SessionStore,
    pub state: AppState,
    /// Monotonic fetch sequence; a response is applied only while its epoch
    /// is still the latest, so a stale fetch can never overwrite a newer one.
    fetch_epoch: u64,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url)?;
        let store = SessionStore::new(client.clone(), config.state_path.clone())?;

        let email = store
            .saved_email()
            .map(str::to_string)
            .unwrap_or_else(|| config.email.clone());

        let state = AppState {
            screen: Screen::Login,
            section: Section::Transactions,
            login: LoginState {
                email,
                password: String::new(),
                focus: LoginField::Email,
                message: None,
                busy: false,
            },
            signup: SignupState::default(),
            identity: None,
            records: Vec::new(),
            summary: Summary::default(),
            kind_filter: None,
            vehicles: Vec::new(),
            drivers: Vec::new(),
            selected: 0,
            loading: false,
            tap: TapCoordinator::new(),
            toast: None,
        };

        Ok(Self {
            client,
            store,
            state,
            fetch_epoch: 0,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.store.restore().await;
        self.apply_gate();
        if self.state.screen == Screen::Dashboard {
            self.load_dashboard().await?;
        }

        let mut terminal = ui::enter()?;
        let result = self.event_loop(&mut terminal).await;
        ui::leave(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            let now = Instant::now();
            self.state.tap.tick(now);
            if let Some(toast) = &self.state.toast {
                if now.duration_since(toast.at) > TOAST_TTL {
                    self.state.toast = None;
                }
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Re-derives the current screen from the session. Safe to call on every
    /// transition: the gate is pure and idempotent.
    fn apply_gate(&mut self) {
        let destination = entry_destination(self.store.session(), self.store.seen_welcome());
        self.state.identity = self.store.session().identity().cloned();
        self.state.screen = match destination {
            Destination::Welcome => Screen::Welcome,
            Destination::Login => Screen::Login,
            Destination::AdminDashboard
            | Destination::DriverDashboard
            | Destination::ViewerDashboard => Screen::Dashboard,
        };
        if self.state.screen != Screen::Dashboard {
            self.state.reset_dashboard();
        }
    }

    fn role(&self) -> Option<Role> {
        self.store.session().role()
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match crate::ui::keymap::map_key(key) {
            crate::ui::keymap::AppAction::Quit => {
                self.should_quit = true;
            }
            crate::ui::keymap::AppAction::Cancel => match self.state.screen {
                Screen::Signup => {
                    self.state.screen = Screen::Login;
                }
                Screen::Dashboard => {
                    self.state.tap.cancel();
                }
                _ => {}
            },
            crate::ui::keymap::AppAction::NewAccount => {
                if self.state.screen == Screen::Login {
                    self.state.signup = SignupState::default();
                    self.state.screen = Screen::Signup;
                }
            }
            crate::ui::keymap::AppAction::NextField => match self.state.screen {
                Screen::Login => self.advance_login_focus(),
                Screen::Signup => self.advance_signup_focus(),
                _ => {}
            },
            crate::ui::keymap::AppAction::Submit => match self.state.screen {
                Screen::Welcome => self.leave_welcome(),
                Screen::Login => self.attempt_login().await?,
                Screen::Signup => self.attempt_signup().await?,
                Screen::Dashboard => {
                    if self.state.tap.pending_key().is_some() {
                        self.confirm_delete().await?;
                    } else {
                        self.tap_selected();
                    }
                }
            },
            crate::ui::keymap::AppAction::Backspace => {
                if let Some(field) = self.active_field_mut() {
                    field.pop();
                }
            }
            crate::ui::keymap::AppAction::Up => match self.state.screen {
                Screen::Dashboard => self.select_prev(),
                Screen::Signup if self.state.signup.focus == SignupField::Role => {
                    self.state.signup.role = cycle_role(self.state.signup.role);
                }
                _ => {}
            },
            crate::ui::keymap::AppAction::Down => match self.state.screen {
                Screen::Dashboard => self.select_next(),
                Screen::Signup if self.state.signup.focus == SignupField::Role => {
                    self.state.signup.role = cycle_role(self.state.signup.role);
                }
                _ => {}
            },
            crate::ui::keymap::AppAction::Input(ch) => match self.state.screen {
                Screen::Welcome => self.leave_welcome(),
                Screen::Login | Screen::Signup => {
                    if let Some(field) = self.active_field_mut() {
                        field.push(ch);
                    }
                }
                Screen::Dashboard => self.handle_dashboard_key(ch).await?,
            },
            crate::ui::keymap::AppAction::None => {}
        }

        Ok(())
    }

    fn leave_welcome(&mut self) {
        self.store.mark_welcome_seen();
        self.apply_gate();
    }

    fn advance_login_focus(&mut self) {
        self.state.login.focus = match self.state.login.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    fn advance_signup_focus(&mut self) {
        self.state.signup.focus = match self.state.signup.focus {
            SignupField::Name => SignupField::Email,
            SignupField::Email => SignupField::Password,
            SignupField::Password => SignupField::Role,
            SignupField::Role => SignupField::Name,
        };
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        match self.state.screen {
            Screen::Login => Some(match self.state.login.focus {
                LoginField::Email => &mut self.state.login.email,
                LoginField::Password => &mut self.state.login.password,
            }),
            Screen::Signup => match self.state.signup.focus {
                SignupField::Name => Some(&mut self.state.signup.name),
                SignupField::Email => Some(&mut self.state.signup.email),
                SignupField::Password => Some(&mut self.state.signup.password),
                SignupField::Role => None,
            },
            _ => None,
        }
    }

    fn select_next(&mut self) {
        let len = self.state.visible().len();
        if len > 0 {
            self.state.selected = (self.state.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.state.selected = self.state.selected.saturating_sub(1);
    }

    async fn attempt_login(&mut self) -> Result<()> {
        // The submit is disabled while its own request is outstanding; this
        // is the only back-pressure, there is no queue.
        if self.state.login.busy {
            return Ok(());
        }

        let email = self.state.login.email.clone();
        let password = self.state.login.password.clone();

        self.state.login.busy = true;
        let outcome = self.store.login(&email, &password).await;
        self.state.login.busy = false;

        match outcome {
            Ok(()) => {
                self.state.login.password.clear();
                self.state.login.message = None;
                self.apply_gate();
                self.load_dashboard().await?;
            }
            Err(err) => {
                self.state.login.message = Some(core_message(&err));
            }
        }

        Ok(())
    }

    async fn attempt_signup(&mut self) -> Result<()> {
        let request = SignupRequest {
            name: self.state.signup.name.clone(),
            email: self.state.signup.email.clone(),
            password: self.state.signup.password.clone(),
            role: self.state.signup.role.as_str().to_string(),
        };

        match self.store.signup(&request).await {
            Ok(()) => {
                self.state.screen = Screen::Login;
                self.toast(
                    ToastLevel::Success,
                    "Account creato. Attendi l'attivazione.".to_string(),
                );
            }
            Err(err) => {
                self.state.signup.message = Some(core_message(&err));
            }
        }

        Ok(())
    }

    async fn handle_dashboard_key(&mut self, ch: char) -> Result<()> {
        match ch {
            'q' => self.should_quit = true,
            't' | 'T' => {
                self.state.section = Section::Transactions;
            }
            'v' | 'V' => match guard(Role::Admin, self.store.session()) {
                Guard::Allowed => self.state.section = Section::Vehicles,
                Guard::Redirect(_) => {
                    self.toast(ToastLevel::Info, "Sezione riservata agli admin.".to_string());
                }
            },
            'd' | 'D' => match guard(Role::Admin, self.store.session()) {
                Guard::Allowed => self.state.section = Section::Drivers,
                Guard::Redirect(_) => {
                    self.toast(ToastLevel::Info, "Sezione riservata agli admin.".to_string());
                }
            },
            'r' | 'R' => self.load_dashboard().await?,
            'u' | 'U' => self.set_kind_filter(None),
            'e' | 'E' => self.set_kind_filter(Some(TransactionKind::Earning)),
            'x' | 'X' => self.set_kind_filter(Some(TransactionKind::Expense)),
            'a' | 'A' => self.set_kind_filter(Some(TransactionKind::AutoExpense)),
            'j' | 'J' => self.select_next(),
            'k' | 'K' => self.select_prev(),
            'l' | 'L' => {
                self.store.logout().await;
                self.apply_gate();
                self.toast(ToastLevel::Info, "Sessione chiusa.".to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn set_kind_filter(&mut self, kind: Option<TransactionKind>) {
        self.state.kind_filter = kind;
        self.state.selected = 0;
        self.state.tap.cancel();
    }

    /// First tap arms the selected record, the second within the window asks
    /// for confirmation (rendered as a modal).
    fn tap_selected(&mut self) {
        if self.role() == Some(Role::Viewer) {
            self.toast(ToastLevel::Info, "Accesso in sola lettura.".to_string());
            return;
        }
        let Some(key) = self.state.selected_key() else {
            return;
        };
        self.state.tap.on_item_tap(key, Instant::now());
    }

    /// Runs the confirmed delete. The record leaves the local list only
    /// after the server acknowledged; a failure leaves list and totals
    /// untouched and surfaces a toast.
    async fn confirm_delete(&mut self) -> Result<()> {
        if self.state.loading {
            return Ok(());
        }
        let Ok(target) = self.state.tap.begin_delete() else {
            return Ok(());
        };
        let Some(token) = self.store.session().credential().cloned() else {
            self.state.tap.finish_delete();
            return Ok(());
        };

        self.state.loading = true;
        let outcome = self
            .client
            .delete_record(target.kind, target.id, &token)
            .await;
        self.state.loading = false;
        self.state.tap.finish_delete();

        match outcome {
            Ok(()) => {
                remove_record(&mut self.state.records, target);
                self.state.summary = summarize(&self.state.records);
                self.state.clamp_selection();
                self.toast(ToastLevel::Success, "Movimento eliminato.".to_string());
            }
            Err(ClientError::Unauthorized) => self.force_logout().await,
            Err(ClientError::NotFound) => {
                // The record vanished server-side: surface it and refresh
                // the view instead of pretending the delete worked.
                self.toast(ToastLevel::Error, "Elemento non trovato.".to_string());
                self.load_collections().await?;
            }
            Err(err) => {
                tracing::warn!("delete failed: {}", client_message(&err));
                self.toast(ToastLevel::Error, client_message(&err));
            }
        }

        Ok(())
    }

    async fn load_dashboard(&mut self) -> Result<()> {
        self.load_collections().await?;
        if self.role() == Some(Role::Admin) {
            self.load_registry().await?;
        }
        Ok(())
    }

    /// Server-side filter set for the current user: drivers only ever see
    /// their own records, admins and viewers see the whole fleet.
    fn filters(&self) -> CollectionFilters {
        match (self.role(), self.store.session().identity()) {
            (Some(Role::Driver), Some(identity)) => CollectionFilters::for_driver(identity.id),
            _ => CollectionFilters::default(),
        }
    }

    async fn load_collections(&mut self) -> Result<()> {
        let Some(token) = self.store.session().credential().cloned() else {
            return Ok(());
        };
        let filters = self.filters();

        self.fetch_epoch += 1;
        let epoch = self.fetch_epoch;
        self.state.loading = true;

        let earnings = match self.client.earnings(&filters, &token).await {
            Ok(items) => items,
            Err(err) => return self.fetch_failed(err).await,
        };
        let expenses = match self.client.expenses(&filters, &token).await {
            Ok(items) => items,
            Err(err) => return self.fetch_failed(err).await,
        };
        let auto_expenses = match self.client.auto_expenses(&filters, &token).await {
            Ok(items) => items,
            Err(err) => return self.fetch_failed(err).await,
        };

        self.state.loading = false;
        if epoch != self.fetch_epoch {
            // A newer fetch superseded this one; drop the stale response.
            return Ok(());
        }

        let collections = Collections {
            earnings,
            expenses,
            auto_expenses,
        };
        self.state.records = aggregate(&collections);
        self.state.summary = summarize(&self.state.records);
        self.state.clamp_selection();
        Ok(())
    }

    async fn load_registry(&mut self) -> Result<()> {
        let Some(token) = self.store.session().credential().cloned() else {
            return Ok(());
        };
        let filters = CollectionFilters::default();

        let vehicles = match self.client.vehicles(&filters, &token).await {
            Ok(items) => items,
            Err(err) => return self.fetch_failed(err).await,
        };
        let drivers = match self.client.drivers(&filters, &token).await {
            Ok(items) => items,
            Err(err) => return self.fetch_failed(err).await,
        };

        self.state.vehicles = vehicles;
        self.state.drivers = drivers;
        Ok(())
    }

    /// Fetch errors never clear what is already on screen; an expired
    /// credential forces a logout instead.
    async fn fetch_failed(&mut self, err: ClientError) -> Result<()> {
        self.state.loading = false;
        match err {
            ClientError::Unauthorized => self.force_logout().await,
            other => {
                tracing::warn!("fetch failed: {}", client_message(&other));
                self.toast(ToastLevel::Error, client_message(&other));
            }
        }
        Ok(())
    }

    async fn force_logout(&mut self) {
        self.store.logout().await;
        self.apply_gate();
        self.toast(ToastLevel::Error, "Sessione scaduta, accedi di nuovo.".to_string());
    }

    fn toast(&mut self, level: ToastLevel, message: String) {
        self.state.toast = Some(ToastState {
            message,
            level,
            at: Instant::now(),
        });
    }
}

fn cycle_role(role: Role) -> Role {
    match role {
        Role::Admin => Role::Driver,
        Role::Driver => Role::Viewer,
        Role::Viewer => Role::Admin,
    }
}

fn core_message(err: &CoreError) -> String {
    match err {
        CoreError::Auth(_) => "Credenziali errate o account non attivo.".to_string(),
        CoreError::Validation(message) => format!("Errore di validazione: {message}"),
        CoreError::Network(_) => "Server non raggiungibile.".to_string(),
        CoreError::Server(message) => format!("Errore server: {message}"),
        CoreError::NotFound(_) => "Risorsa non trovata.".to_string(),
    }
}

fn client_message(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => "Sessione scaduta.".to_string(),
        ClientError::NotFound => "Elemento non trovato.".to_string(),
        ClientError::Conflict(message) => format!("Conflitto: {message}"),
        ClientError::Validation(message) => format!("Errore di validazione: {message}"),
        ClientError::Server(message) => format!("Errore server: {message}"),
        ClientError::Transport(err) => format!("Server non raggiungibile: {err}"),
    }
}
