use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keydrill::{
    app_dirs::AppDirs,
    corpus::WordCorpus,
    exercise::{Exercise, ExerciseGenerator, GenConfig, DEFAULT_LINE_WIDTH},
    fetch,
    score::{self, Score},
    session::{Effect, Phase, TypingEvent, TypingSession},
    ui::{ResultsScreen, TypingScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;

/// terminal typing trainer fed by ranked word-frequency lists
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer. Drills are sampled from the most frequent words of a language, wrapped into fixed-width lines, and scored by words per minute and per-word accuracy."
)]
pub struct Cli {
    /// number of lines in the drill
    #[clap(short = 'n', long, default_value_t = 10)]
    lines: usize,

    /// sample from the N most frequent words of the language
    #[clap(short = 't', long, default_value_t = 200)]
    top_words: usize,

    /// language key into the corpus
    #[clap(short = 'l', long, default_value = "english")]
    language: String,

    /// skip words containing this substring (repeatable)
    #[clap(short = 'i', long = "ignore")]
    ignore: Vec<String>,

    /// maximum rendered line width in characters
    #[clap(long, default_value_t = DEFAULT_LINE_WIDTH)]
    width: usize,

    /// corpus file to use instead of the per-user one
    #[clap(long)]
    corpus: Option<PathBuf>,

    /// download a frequency list into the corpus file and exit
    #[clap(long)]
    fetch: bool,

    /// wiki api url to fetch the frequency list from
    #[clap(long, default_value = fetch::DEFAULT_WIKI_URL)]
    wiki_url: String,
}

impl Cli {
    fn gen_config(&self) -> GenConfig {
        GenConfig {
            num_lines: self.lines,
            top_n_words: self.top_words,
            language: self.language.clone(),
            ignore_substrings: self.ignore.clone(),
            max_line_width: self.width,
        }
    }

    fn corpus_file(&self) -> PathBuf {
        self.corpus
            .clone()
            .or_else(AppDirs::corpus_path)
            .unwrap_or_else(|| PathBuf::from("corpus.json"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug)]
pub struct App {
    pub cli: Cli,
    pub corpus: WordCorpus,
    pub exercise: Exercise,
    pub session: TypingSession,
    pub results: Option<ResultsData>,
    pub state: AppState,
}

#[derive(Clone, Copy, Debug)]
pub struct ResultsData {
    pub score: Score,
    pub words: usize,
    pub elapsed: Duration,
}

impl App {
    /// Fails with a configuration-miss message when the language is unknown
    /// or the ignore filters empty the word pool.
    pub fn new(cli: Cli, corpus: WordCorpus) -> Result<Self, String> {
        let exercise = Self::generate(&cli, &corpus)?;
        Ok(Self {
            session: TypingSession::new(exercise.clone()),
            exercise,
            cli,
            corpus,
            results: None,
            state: AppState::Typing,
        })
    }

    fn generate(cli: &Cli, corpus: &WordCorpus) -> Result<Exercise, String> {
        let generator = ExerciseGenerator::new(cli.gen_config());
        let exercise = generator.generate(corpus, &mut rand::thread_rng());
        if exercise.is_empty() {
            Err(format!(
                "no words available for language '{}' with the given filters",
                cli.language
            ))
        } else {
            Ok(exercise)
        }
    }

    /// Retry the same drill text from scratch.
    pub fn restart(&mut self) {
        self.session = TypingSession::new(self.exercise.clone());
        self.results = None;
        self.state = AppState::Typing;
    }

    /// Sample a fresh drill.
    pub fn new_drill(&mut self) -> Result<(), String> {
        self.exercise = Self::generate(&self.cli, &self.corpus)?;
        self.restart();
        Ok(())
    }

    /// Routes one typing event into the session, interpreting the effects.
    /// LineAdvanced needs no action here: the full-screen redraw picks the
    /// new line up from the session itself.
    pub fn handle_typing_event(&mut self, ev: TypingEvent, now: Instant) {
        if self.session.phase() == Phase::Idle {
            if let TypingEvent::Character(_) = ev {
                self.session.start(now);
            }
        }
        for effect in self.session.apply(ev) {
            if effect == Effect::Completed {
                self.close_session(now);
            }
        }
    }

    /// Scores the session and moves to the results screen; also used for an
    /// explicit early finish.
    pub fn close_session(&mut self, now: Instant) {
        self.session.finish();
        let elapsed = self.session.elapsed(now);
        let score = score::compute(self.session.results(), elapsed);
        let data = ResultsData {
            score,
            words: self.session.results().len(),
            elapsed,
        };
        if let Some(path) = AppDirs::history_path() {
            let _ = score::append_history(path, score, data.words, elapsed);
        }
        self.results = Some(data);
        self.state = AppState::Results;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let corpus_file = cli.corpus_file();

    if cli.fetch {
        let count = fetch::fetch_and_store(&cli.language, &cli.wiki_url, &corpus_file)?;
        println!(
            "fetched {} words for '{}' into {}",
            count,
            cli.language,
            corpus_file.display()
        );
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let corpus = WordCorpus::load_or_bundled(&corpus_file);
    let mut app = match App::new(cli, corpus) {
        Ok(app) => app,
        Err(msg) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, msg).exit();
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = spawn_event_channel();

    loop {
        let mut exit_type = ExitType::Quit;
        terminal.draw(|f| draw(app, f))?;

        loop {
            match events.recv()? {
                DrillEvent::Tick => {
                    if app.session.phase() == Phase::Active {
                        terminal.draw(|f| draw(app, f))?;
                    }
                }
                DrillEvent::Resize => {
                    terminal.draw(|f| draw(app, f))?;
                }
                DrillEvent::Key(key) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match app.state {
                        AppState::Typing => match key.code {
                            KeyCode::Esc => break,
                            KeyCode::Enter => {
                                if app.session.phase() == Phase::Active {
                                    app.close_session(Instant::now());
                                }
                            }
                            KeyCode::Tab => app.session.reset(),
                            KeyCode::Backspace => {
                                app.handle_typing_event(TypingEvent::Backspace, Instant::now());
                            }
                            KeyCode::Char(' ') => {
                                app.handle_typing_event(TypingEvent::WordBoundary, Instant::now());
                            }
                            KeyCode::Char(c) => {
                                app.handle_typing_event(TypingEvent::Character(c), Instant::now());
                            }
                            _ => {}
                        },
                        AppState::Results => match key.code {
                            KeyCode::Esc => break,
                            KeyCode::Char('r') | KeyCode::Left => {
                                exit_type = ExitType::Restart;
                                break;
                            }
                            KeyCode::Char('n') | KeyCode::Right => {
                                exit_type = ExitType::New;
                                break;
                            }
                            _ => {}
                        },
                    }
                    terminal.draw(|f| draw(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => app.restart(),
            ExitType::New => {
                // regeneration can only fail if it failed at startup too
                if app.new_drill().is_err() {
                    break;
                }
            }
            ExitType::Quit => break,
        }
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    match (&app.state, app.results) {
        (AppState::Results, Some(data)) => {
            let screen = ResultsScreen {
                score: data.score,
                words: data.words,
                elapsed: data.elapsed,
            };
            f.render_widget(&screen, f.area());
        }
        _ => {
            let screen = TypingScreen {
                session: &app.session,
            };
            f.render_widget(&screen, f.area());
        }
    }
}

#[derive(Clone, Debug)]
enum DrillEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

fn spawn_event_channel() -> mpsc::Receiver<DrillEvent> {
    let (tx, rx) = mpsc::channel();

    let tick_tx = tx.clone();
    thread::spawn(move || loop {
        if tick_tx.send(DrillEvent::Tick).is_err() {
            break;
        }
        thread::sleep(Duration::from_millis(TICK_RATE_MS))
    });

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(DrillEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(DrillEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}
