use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use rustgalaga::scores::{HighScores, NAME_LEN};
use rustgalaga::sim::hooks::{Hooks, LogAudio, Outcome, ScoreRecorder, SessionNavigator};
use rustgalaga::sim::{Session, Steer};
use rustgalaga::{GameConfig, GameType};

use crate::ui::field::BrailleCanvas;

const BANNER_MS: u64 = 1_500;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Start,
    Playing,
    NameEntry,
    HighScores,
}

pub const MENU: [&str; 4] = ["Play", "Play Holiday", "High Scores", "Quit"];

/// Collects the session's screen transitions until the next frame.
#[derive(Default)]
pub struct Router {
    level_up: Option<u32>,
    game_over: Option<(Outcome, u32)>,
}

impl SessionNavigator for Router {
    fn game_over(&mut self, outcome: Outcome, final_score: u32) {
        self.game_over = Some((outcome, final_score));
    }

    fn level_complete(&mut self, level: u32) {
        self.level_up = Some(level);
    }
}

pub struct Banner {
    pub text: String,
    pub until_ms: u64,
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub selected: usize,
    pub config: GameConfig,
    pub session: Option<Session>,
    pub canvas: BrailleCanvas,
    pub high_scores: HighScores,
    pub paused: bool,
    pub banner: Option<Banner>,
    pub outcome: Option<(Outcome, u32)>,
    pub error: Option<String>,
    // Name entry state
    pub name_buffer: String,
    pub name_score: u32,
    pub name_level: u32,
    audio: LogAudio,
    router: Router,
}

impl App {
    pub fn new(config: GameConfig, high_scores: HighScores) -> Self {
        let game_type = config.game_type().unwrap_or_default();
        let canvas = BrailleCanvas::new(config.canvas_width, config.canvas_height, game_type);
        Self {
            should_quit: false,
            screen: Screen::Start,
            selected: 0,
            config,
            session: None,
            canvas,
            high_scores,
            paused: false,
            banner: None,
            outcome: None,
            error: None,
            name_buffer: String::new(),
            name_score: 0,
            name_level: 0,
            audio: LogAudio,
            router: Router::default(),
        }
    }

    pub fn on_tick(&mut self, dt_ms: u64) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        let Some(session) = self.session.as_mut() else { return };

        let mut hooks = Hooks {
            audio: &mut self.audio,
            scores: &mut self.high_scores,
            navigator: &mut self.router,
        };
        if let Err(e) = session.update(dt_ms, &mut hooks) {
            tracing::error!(error = %e, "session update failed");
            session.teardown();
            self.session = None;
            self.error = Some(e.to_string());
            self.screen = Screen::Start;
            return;
        }

        let now = session.now_ms();
        self.canvas.begin_frame(now);
        session.draw(&mut self.canvas);

        if let Some(level) = self.router.level_up.take() {
            self.banner = Some(Banner {
                text: format!("LEVEL {level}"),
                until_ms: now + BANNER_MS,
            });
        }
        if let Some(result) = self.router.game_over.take() {
            self.outcome = Some(result);
            self.banner = None;
        }
        if self.banner.as_ref().is_some_and(|b| now >= b.until_ms) {
            self.banner = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.end_session();
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Start => self.handle_menu_input(key),
            Screen::Playing => self.handle_game_input(key),
            Screen::NameEntry => self.handle_name_input(key),
            Screen::HighScores => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('h')
                ) {
                    self.screen = Screen::Start;
                }
            }
        }
    }

    fn handle_menu_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.selected = (self.selected + MENU.len() - 1) % MENU.len(),
            KeyCode::Down => self.selected = (self.selected + 1) % MENU.len(),
            KeyCode::Enter => self.activate(self.selected),
            KeyCode::Char('1') => self.activate(0),
            KeyCode::Char('2') => self.activate(1),
            KeyCode::Char('h') | KeyCode::Char('H') => self.activate(2),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.activate(3),
            _ => {}
        }
    }

    fn activate(&mut self, item: usize) {
        match item {
            0 => self.start(GameType::Original),
            1 => self.start(GameType::Holiday),
            2 => self.screen = Screen::HighScores,
            _ => self.should_quit = true,
        }
    }

    fn start(&mut self, game_type: GameType) {
        let mut config = self.config.clone();
        config.game_type = game_type.as_str().to_string();
        match Session::new(&config) {
            Ok(session) => {
                let now = session.now_ms();
                self.banner = Some(Banner {
                    text: format!("LEVEL {}", session.level()),
                    until_ms: now + BANNER_MS,
                });
                self.session = Some(session);
                self.canvas.reset(game_type);
                self.outcome = None;
                self.error = None;
                self.paused = false;
                self.screen = Screen::Playing;
            }
            Err(e) => {
                tracing::error!(error = %e, "could not start session");
                self.error = Some(e.to_string());
            }
        }
    }

    fn handle_game_input(&mut self, key: KeyEvent) {
        if self.outcome.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc) {
                self.finish_game();
            }
            return;
        }
        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.paused = !self.paused;
                return;
            }
            KeyCode::Esc => {
                self.end_session();
                self.screen = Screen::Start;
                return;
            }
            _ => {}
        }
        if self.paused {
            return;
        }
        let Some(session) = self.session.as_mut() else { return };
        match key.code {
            KeyCode::Left | KeyCode::Char('a') => session.steer(Steer::Left),
            KeyCode::Right | KeyCode::Char('d') => session.steer(Steer::Right),
            KeyCode::Char(' ') | KeyCode::Up => {
                session.fire();
            }
            _ => {}
        }
    }

    /// Leave the finished game: name entry if the score made the table,
    /// otherwise straight to the table.
    fn finish_game(&mut self) {
        let Some((_, score)) = self.outcome.take() else { return };
        let level = self.session.as_ref().map_or(1, |s| s.level());
        self.end_session();
        if self.high_scores.qualifies(score) {
            self.name_buffer.clear();
            self.name_score = score;
            self.name_level = level;
            self.screen = Screen::NameEntry;
        } else {
            self.screen = Screen::HighScores;
        }
    }

    fn end_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
        self.banner = None;
        self.paused = false;
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                // Submit the score with the entered name
                let name = if self.name_buffer.is_empty() {
                    "???".to_string()
                } else {
                    self.name_buffer.clone()
                };
                self.high_scores.record(&name, self.name_score, self.name_level);
                self.name_buffer.clear();
                self.screen = Screen::HighScores;
            }
            KeyCode::Backspace => {
                self.name_buffer.pop();
            }
            KeyCode::Esc => {
                // Cancel: submit with the default name
                self.high_scores.record("???", self.name_score, self.name_level);
                self.name_buffer.clear();
                self.screen = Screen::HighScores;
            }
            KeyCode::Char(c) => {
                // Only allow printable ASCII characters, up to NAME_LEN
                if self.name_buffer.chars().count() < NAME_LEN && c.is_ascii_graphic() {
                    self.name_buffer.push(c.to_ascii_uppercase());
                }
            }
            _ => {}
        }
    }
}
