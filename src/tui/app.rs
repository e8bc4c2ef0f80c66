// src/tui/app.rs — TUI application state, event loop, and rendering.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, TableState, Tabs},
    Frame, Terminal,
};

use crate::api::ApiClient;
use crate::assistant::voice::{ActiveRecording, CommandRecorder, Recorder};
use crate::assistant::Conversation;
use crate::cache::QueryCache;
use crate::infra::config::Config;
use crate::infra::errors::PulsedeckError;

use super::data::{self, DashboardData};
use super::router::{Router, Screen};
use super::theme::Theme;
use super::widgets;

const AUTO_REFRESH: Duration = Duration::from_secs(5);

// ── Login form state ─────────────────────────────────────────────

#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus_password: bool,
    pub error: Option<String>,
    pub busy: bool,
}

// ── App state ────────────────────────────────────────────────────

pub struct App {
    api: ApiClient,
    cache: QueryCache,
    config: Config,
    router: Router,
    pub data: DashboardData,
    conversation: Conversation,
    recording: Option<Box<dyn ActiveRecording>>,
    pub login_form: LoginForm,
    /// Assistant input line.
    pub input: String,
    /// Transient footer notice (mic failures, forced logout, ...).
    pub notice: Option<String>,
    pub account_table: TableState,
    pub content_table: TableState,
    last_refresh: Instant,
}

impl App {
    fn new(api: ApiClient, cache: QueryCache, config: Config) -> Self {
        let authenticated = api
            .session()
            .lock()
            .expect("session lock poisoned")
            .is_authenticated();
        let conversation = Conversation::new(api.clone());
        let mut data = DashboardData::default();
        data.revenue_period = "month".into();
        Self {
            api,
            cache,
            config,
            router: Router::new(authenticated),
            data,
            conversation,
            recording: None,
            login_form: LoginForm::default(),
            input: String::new(),
            notice: None,
            account_table: TableState::default(),
            content_table: TableState::default(),
            last_refresh: Instant::now(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.router.current()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Load whatever the current screen renders, through the cache.
    async fn ensure_loaded(&mut self) {
        self.data.load_error = None;
        let result = match self.router.current() {
            Screen::Overview => data::fetch_summary(&self.cache, &self.api)
                .await
                .map(|s| self.data.summary = Some(s)),
            Screen::Accounts => data::fetch_accounts(&self.cache, &self.api).await.map(|a| {
                if !a.is_empty() && self.account_table.selected().is_none() {
                    self.account_table.select(Some(0));
                }
                self.data.accounts = a;
            }),
            Screen::Content => data::fetch_content(&self.cache, &self.api).await.map(|c| {
                if !c.is_empty() && self.content_table.selected().is_none() {
                    self.content_table.select(Some(0));
                }
                self.data.content = c;
            }),
            Screen::Analytics => {
                let period = self.data.revenue_period.clone();
                let revenue = data::fetch_revenue(&self.cache, &self.api, &period).await;
                let platforms = data::fetch_platforms(&self.cache, &self.api).await;
                revenue
                    .map(|r| self.data.revenue = Some(r))
                    .and(platforms.map(|p| self.data.platforms = p))
            }
            Screen::Funnel => data::fetch_funnel(&self.cache, &self.api)
                .await
                .map(|f| self.data.funnel = Some(f)),
            Screen::Niches => data::fetch_niches(&self.cache, &self.api)
                .await
                .map(|n| self.data.niches = n),
            Screen::Login | Screen::Assistant => Ok(()),
        };

        if let Err(e) = result {
            self.handle_error(e);
        }
    }

    /// Invalidate and reload the current screen's cache keys.
    async fn refresh(&mut self) {
        for key in data::keys_for_screen(self.router.current(), &self.data.revenue_period) {
            self.cache.invalidate(&key).await;
        }
        self.ensure_loaded().await;
        self.last_refresh = Instant::now();
    }

    fn handle_error(&mut self, e: PulsedeckError) {
        match e {
            PulsedeckError::Unauthorized => self.handle_unauthorized(),
            other => self.data.load_error = Some(other.to_string()),
        }
    }

    /// Authorization failure from anywhere: the API client already cleared
    /// the session; discard view state and force the login screen.
    fn handle_unauthorized(&mut self) {
        self.router.force_logout();
        let period = std::mem::take(&mut self.data.revenue_period);
        self.data = DashboardData {
            revenue_period: period,
            ..DashboardData::default()
        };
        self.account_table = TableState::default();
        self.content_table = TableState::default();
        self.recording = None; // releases the mic via drop
        self.notice = Some("Session expired. Please sign in again.".into());
    }

    async fn submit_login(&mut self) {
        if self.login_form.busy {
            return;
        }
        let email = self.login_form.email.trim().to_string();
        let password = self.login_form.password.clone();
        if email.is_empty() || password.is_empty() {
            self.login_form.error = Some("Email and password are required".into());
            return;
        }

        self.login_form.busy = true;
        self.login_form.error = None;
        let result = login_flow(&self.api, &email, &password).await;
        self.login_form.busy = false;

        match result {
            Ok(()) => {
                self.login_form = LoginForm::default();
                self.notice = None;
                self.router.login_succeeded();
                self.ensure_loaded().await;
            }
            Err(e) => {
                // Invalid credentials also surface as Unauthorized here;
                // either way nothing was persisted.
                self.login_form.error = Some(match e {
                    PulsedeckError::Unauthorized => "Invalid email or password".into(),
                    other => other.to_string(),
                });
            }
        }
    }

    async fn submit_chat(&mut self) {
        if self.conversation.is_busy() || self.input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        if let Err(e) = self.conversation.submit(&text).await {
            match e {
                PulsedeckError::Unauthorized => self.handle_unauthorized(),
                PulsedeckError::Validation(msg) => self.notice = Some(msg),
                other => self.notice = Some(other.to_string()),
            }
        }
    }

    async fn toggle_recording(&mut self) {
        if let Some(recording) = self.recording.take() {
            // Stop releases the microphone on every path, error included.
            match recording.stop().await {
                Ok(clip) => match self.conversation.submit_audio(clip).await {
                    Ok(Some(audio)) => {
                        crate::assistant::voice::spawn_playback(audio, &self.config.voice)
                    }
                    Ok(None) => {}
                    Err(PulsedeckError::Unauthorized) => self.handle_unauthorized(),
                    Err(e) => self.notice = Some(e.to_string()),
                },
                Err(e) => self.notice = Some(e.to_string()),
            }
            return;
        }

        if self.conversation.is_busy() {
            return;
        }
        let recorder = match CommandRecorder::detect(&self.config.voice) {
            Ok(r) => r,
            Err(e) => {
                self.notice = Some(e.to_string());
                return;
            }
        };
        match recorder.start().await {
            Ok(recording) => {
                self.notice = Some("Recording... press Ctrl-R to stop".into());
                self.recording = Some(recording);
            }
            Err(e) => {
                // Acquisition failed: stay idle, tell the user, leak nothing.
                self.notice = Some(e.to_string());
            }
        }
    }

    fn scroll_down(&mut self) {
        match self.router.current() {
            Screen::Accounts => {
                let i = self.account_table.selected().unwrap_or(0);
                let max = self.data.accounts.len().saturating_sub(1);
                self.account_table.select(Some((i + 1).min(max)));
            }
            Screen::Content => {
                let i = self.content_table.selected().unwrap_or(0);
                let max = self.data.content.len().saturating_sub(1);
                self.content_table.select(Some((i + 1).min(max)));
            }
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        match self.router.current() {
            Screen::Accounts => {
                let i = self.account_table.selected().unwrap_or(0);
                self.account_table.select(Some(i.saturating_sub(1)));
            }
            Screen::Content => {
                let i = self.content_table.selected().unwrap_or(0);
                self.content_table.select(Some(i.saturating_sub(1)));
            }
            _ => {}
        }
    }

    async fn cycle_revenue_period(&mut self) {
        self.data.revenue_period = match self.data.revenue_period.as_str() {
            "day" => "week".into(),
            "week" => "month".into(),
            _ => "day".into(),
        };
        self.ensure_loaded().await;
    }
}

/// Token exchange then identity fetch; the session persists only after both
/// succeed.
async fn login_flow(api: &ApiClient, email: &str, password: &str) -> Result<(), PulsedeckError> {
    let token = api.login(email, password).await?.access_token;
    let profile = api.me_with_token(&token).await?;
    let session = api.session();
    let mut session = session.lock().expect("session lock poisoned");
    session
        .login(token, profile)
        .map_err(PulsedeckError::Other)?;
    Ok(())
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the dashboard. Blocks until the user quits (q / Ctrl-C).
pub async fn run_dashboard(
    api: ApiClient,
    cache: QueryCache,
    config: Config,
) -> anyhow::Result<()> {
    let mut app = App::new(api, cache, config);
    app.ensure_loaded().await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Periodic reload; within the staleness window this is a cache hit.
        if app.router.is_authenticated() && app.last_refresh.elapsed() >= AUTO_REFRESH {
            app.ensure_loaded().await;
            app.last_refresh = Instant::now();
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match app.screen() {
            Screen::Login => match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                    app.login_form.focus_password = !app.login_form.focus_password;
                }
                KeyCode::Enter => app.submit_login().await,
                KeyCode::Backspace => {
                    if app.login_form.focus_password {
                        app.login_form.password.pop();
                    } else {
                        app.login_form.email.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if app.login_form.focus_password {
                        app.login_form.password.push(c);
                    } else {
                        app.login_form.email.push(c);
                    }
                }
                _ => {}
            },
            Screen::Assistant => match key.code {
                KeyCode::Esc => {
                    // Leaving the view tears down any live recording.
                    app.recording = None;
                    app.router.navigate(Screen::Overview);
                }
                KeyCode::Tab => {
                    app.recording = None;
                    app.router.next_screen();
                    app.ensure_loaded().await;
                }
                KeyCode::BackTab => {
                    app.recording = None;
                    app.router.prev_screen();
                    app.ensure_loaded().await;
                }
                KeyCode::Enter => app.submit_chat().await,
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.toggle_recording().await;
                }
                KeyCode::Char(c) => {
                    if !app.conversation.is_busy() && !app.is_recording() {
                        app.input.push(c);
                    }
                }
                _ => {}
            },
            _ => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::Right => {
                    app.router.next_screen();
                    app.ensure_loaded().await;
                }
                KeyCode::BackTab | KeyCode::Left => {
                    app.router.prev_screen();
                    app.ensure_loaded().await;
                }
                KeyCode::Char(c @ '1'..='7') => {
                    let idx = (c as usize) - ('1' as usize);
                    app.router.navigate(Screen::PROTECTED[idx]);
                    app.ensure_loaded().await;
                }
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                KeyCode::Char('r') => app.refresh().await,
                KeyCode::Char('p') if app.screen() == Screen::Analytics => {
                    app.cycle_revenue_period().await;
                }
                _ => {}
            },
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    if app.screen() == Screen::Login {
        widgets::login::render(f, size, &app.login_form, app.notice.as_deref());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::PROTECTED
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let label = format!(" {} {} ", i + 1, screen.label());
            if *screen == app.screen() {
                Line::from(Span::styled(label, Theme::tab_active()))
            } else {
                Line::from(Span::styled(label, Theme::tab_inactive()))
            }
        })
        .collect();

    let user = app
        .api
        .session()
        .lock()
        .ok()
        .and_then(|s| s.identity.as_ref().map(|u| u.email.clone()))
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(Span::styled(" pulsedeck ", Theme::header()))
                .title_top(Line::from(Span::styled(format!(" {user} "), Theme::text_dim())).right_aligned())
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .select(app.screen().index())
        .highlight_style(Theme::tab_active())
        .divider(Span::styled(" | ", Theme::text_dim()));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &mut App) {
    match app.screen() {
        Screen::Overview => widgets::overview::render(f, area, app.data.summary.as_ref()),
        Screen::Accounts => {
            widgets::accounts::render(f, area, &app.data.accounts, &mut app.account_table)
        }
        Screen::Content => {
            widgets::content::render(f, area, &app.data.content, &mut app.content_table)
        }
        Screen::Analytics => widgets::analytics::render(
            f,
            area,
            app.data.revenue.as_ref(),
            &app.data.platforms,
            &app.data.revenue_period,
        ),
        Screen::Funnel => widgets::funnel::render(f, area, app.data.funnel.as_ref()),
        Screen::Niches => widgets::niches::render(f, area, &app.data.niches),
        Screen::Assistant => widgets::assistant::render(
            f,
            area,
            &app.conversation,
            &app.input,
            app.is_recording(),
        ),
        Screen::Login => unreachable!("login renders full-screen"),
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    if let Some(notice) = &app.notice {
        let p = Paragraph::new(Line::from(Span::styled(format!(" {notice}"), Theme::warning())));
        f.render_widget(p, area);
        return;
    }
    if let Some(err) = &app.data.load_error {
        let p = Paragraph::new(Line::from(Span::styled(format!(" {err}"), Theme::error())));
        f.render_widget(p, area);
        return;
    }

    let mut hints = vec![
        Span::styled(" q", Theme::key_hint()),
        Span::styled(" quit  ", Theme::key_desc()),
        Span::styled("Tab/\u{2190}\u{2192}", Theme::key_hint()),
        Span::styled(" switch  ", Theme::key_desc()),
        Span::styled("1-7", Theme::key_hint()),
        Span::styled(" jump  ", Theme::key_desc()),
        Span::styled("r", Theme::key_hint()),
        Span::styled(" refresh", Theme::key_desc()),
    ];
    if app.screen() == Screen::Analytics {
        hints.push(Span::styled("  p", Theme::key_hint()));
        hints.push(Span::styled(" period", Theme::key_desc()));
    }
    if app.screen() == Screen::Assistant {
        hints.push(Span::styled("  Ctrl-R", Theme::key_hint()));
        hints.push(Span::styled(" record", Theme::key_desc()));
    }

    f.render_widget(Paragraph::new(Line::from(hints)), area);
}
