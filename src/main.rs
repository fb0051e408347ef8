pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tracing::info;

use typograph::{
    app_dirs::AppDirs,
    chrome::{Chrome, ChromeEvent, Preferences, Theme},
    config::{persist_changes, Config, ConfigStore, FileConfigStore},
    corpus::{Corpus, CorpusKind},
    engine::Engine,
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, ThreadClock, Ticker},
    TypoResult,
};

const REDRAW_RATE_MS: u64 = 100;

/// typing speed test with live wpm, accuracy and word-skip on space
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed test for the terminal. Type the passage before the clock runs out; pressing space jumps to the next word."
)]
pub struct Cli {
    /// number of seconds to run test (default: config file, else 60)
    #[clap(short = 's', long)]
    number_of_secs: Option<u32>,

    /// passage catalogue to draw from
    #[clap(short = 'c', long, value_enum)]
    corpus: Option<CorpusKind>,

    /// custom prompt to use instead of the catalogue
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// colour theme
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// emphasise the word under the cursor
    #[clap(long)]
    shake: bool,
}

impl Cli {
    /// Command line flags win over the stored config for this run.
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.number_of_secs {
            cfg.duration_secs = secs;
        }
        if let Some(corpus) = self.corpus {
            cfg.corpus = corpus;
        }
        if let Some(theme) = self.theme {
            cfg.theme = theme;
        }
        if self.shake {
            cfg.shake_mode = true;
        }
        cfg
    }

    fn load_corpus(&self, cfg: &Config) -> TypoResult<Corpus> {
        match &self.prompt {
            Some(prompt) => Corpus::custom(prompt.as_str()),
            None => Corpus::bundled(cfg.corpus),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub engine: Engine<ThreadClock>,
    pub chrome: Chrome,
}

impl App {
    pub fn new(corpus: Corpus, clock: ThreadClock, budget: u32, prefs: Preferences) -> Self {
        Self {
            engine: Engine::new(corpus, clock, budget),
            chrome: Chrome::new(prefs),
        }
    }

    /// Returns false once the user asked to quit.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Key(key) => return self.on_key(key),
            AppEvent::Tick(session) => {
                self.engine.on_timer(session);
            }
            AppEvent::Resize | AppEvent::Refresh => {}
        }
        true
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return true;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let completed = self.engine.session().is_completed();

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char('t') if ctrl => self.chrome.toggle_theme(),
            KeyCode::Char('s') if ctrl => self.chrome.toggle_shake_mode(),
            KeyCode::Char('r') if ctrl || completed => self.engine.restart_session(),
            KeyCode::Char('n') if ctrl || completed => self.engine.new_session(),
            KeyCode::Left => self.engine.restart_session(),
            KeyCode::Right => self.engine.new_session(),
            _ if completed => {}
            KeyCode::Backspace => {
                let mut text = self.engine.session().input_text();
                text.pop();
                self.engine.submit_input(&text);
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                let mut text = self.engine.session().input_text();
                text.push(c);
                self.engine.submit_input(&text);
            }
            _ => {}
        }
        true
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(err) = logging::init_file_logging(&log_path) {
            eprintln!("typograph: {err}");
        }
    }

    let store = FileConfigStore::new();
    let stored = store.load();
    let config = cli.apply(stored.clone());
    config.validate()?;
    let corpus = cli.load_corpus(&config)?;
    info!(
        corpus = corpus.name(),
        passages = corpus.passages().len(),
        secs = config.duration_secs,
        "starting"
    );

    let events = CrosstermEventSource::new();
    let clock = ThreadClock::new(events.sender());
    let mut app = App::new(corpus, clock, config.duration_secs, config.preferences());

    app.chrome.subscribe(|event, _| match event {
        ChromeEvent::ThemeChanged(theme) => info!(%theme, "theme changed"),
        ChromeEvent::ShakeModeChanged(on) => info!(on, "shake mode changed"),
    });
    app.chrome.subscribe(persist_changes(store, stored));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(REDRAW_RATE_MS)));
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;
        if !app.handle_event(runner.step()) {
            break;
        }
    }
    info!("quitting");
    Ok(())
}
