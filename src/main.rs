pub mod ui;

use std::{
    cell::Cell,
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    rc::Rc,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use tracing::{info, warn};

use gridplot::{
    app_dirs::AppDirs,
    config::{ActivityConfig, DEFAULT_ACTIVITY_TYPE},
    error::ConfigError,
    loader::{ActivitySource, FileActivitySource},
    logging,
    preferences::{FilePreferenceStore, PreferenceStore, Preferences},
    runtime::{ActivityEvent, CrosstermEventSource, EventSource, Runner},
    validator::{PositionalValidator, ValidatorRegistry, Verdict},
    ActivitySession, ClickOutcome, Point,
};

use crate::ui::{graph_area, screen::current_screen};

/// plot points on a coordinate plane and get them checked
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Load a graphing activity, plot the transformed points on a coordinate plane with the mouse, and submit them for checking. Accepts legacy and schema \"1\" activity files."
)]
pub struct Cli {
    /// activity file (JSON); relative paths are also looked up in the preferences' activity_dir
    path: PathBuf,

    /// print the normalized activity as JSON and exit
    #[clap(long)]
    dump: bool,

    /// check the given points without opening the UI, e.g. "1,-2 3,-4"
    #[clap(long, value_name = "POINTS", allow_hyphen_values = true)]
    verify: Option<String>,

    /// judge points in the order they were placed instead of as a set
    #[clap(long)]
    positional: bool,

    /// tracing filter for the log file (overrides preferences)
    #[clap(long)]
    log_filter: Option<String>,
}

impl Cli {
    fn validators(&self) -> ValidatorRegistry {
        let mut validators = ValidatorRegistry::default();
        if self.positional {
            validators.register(DEFAULT_ACTIVITY_TYPE, PositionalValidator::default());
        }
        validators
    }
}

/// Parse "x,y" pairs separated by whitespace or semicolons.
pub fn parse_points(s: &str) -> Result<Vec<Point>, String> {
    s.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("expected x,y but got {pair:?}"))?;
            let coord = |v: &str| {
                v.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| format!("invalid coordinate {v:?} in {pair:?}"))
            };
            Ok(Point::new(coord(x)?, coord(y)?))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Plotting,
    ConfigError(ConfigError),
}

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Reset,
    Submit,
    ZoomIn,
    ZoomOut,
    ToggleSolution,
    ToggleHint,
    Quit,
}

/// Key bindings, fixed for the lifetime of the app.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('u') | KeyCode::Backspace => Some(Command::Undo),
        KeyCode::Char('r') => Some(Command::Reset),
        KeyCode::Enter | KeyCode::Char('s') => Some(Command::Submit),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::ZoomIn),
        KeyCode::Char('-') => Some(Command::ZoomOut),
        KeyCode::Char('v') | KeyCode::Char('c') => Some(Command::ToggleSolution),
        KeyCode::Char('h') => Some(Command::ToggleHint),
        _ => None,
    }
}

pub struct App {
    pub session: ActivitySession,
    pub state: AppState,
    pub hint_visible: bool,
    pub last_outcome: Option<ClickOutcome>,
    pub show_coordinates: bool,
    dirty: Rc<Cell<bool>>,
}

impl App {
    pub fn new(config: ActivityConfig, validators: ValidatorRegistry, prefs: &Preferences) -> Self {
        let state = match config.check_renderable() {
            Ok(()) => AppState::Plotting,
            Err(err) => {
                warn!(%err, "activity cannot be drawn");
                AppState::ConfigError(err)
            }
        };

        let dirty = Rc::new(Cell::new(true));
        let mut session = ActivitySession::with_validators(config, validators);
        let flag = Rc::clone(&dirty);
        session.set_on_change(move |_| flag.set(true));

        Self {
            session,
            state,
            hint_visible: false,
            last_outcome: None,
            show_coordinates: prefs.show_coordinates,
            dirty,
        }
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn apply(&mut self, command: Command) {
        if self.state != AppState::Plotting {
            return;
        }
        match command {
            Command::Undo => {
                self.session.undo();
                self.last_outcome = None;
            }
            Command::Reset => {
                self.session.reset();
                self.last_outcome = None;
                self.hint_visible = false;
            }
            Command::Submit => {
                self.session.submit();
            }
            Command::ZoomIn => self.session.zoom_in(),
            Command::ZoomOut => self.session.zoom_out(),
            Command::ToggleSolution => {
                if self.session.show_solution() {
                    self.session.clear_solution();
                } else if self.session.can_reveal_solution() {
                    self.session.enable_solution();
                }
            }
            Command::ToggleHint => {
                if self.session.hint().is_some() {
                    self.hint_visible = !self.hint_visible;
                    self.dirty.set(true);
                }
            }
            Command::Quit => {}
        }
    }

    /// Route a left click at a terminal cell to the graph.
    pub fn click(&mut self, column: u16, row: u16, frame: Rect) -> Option<ClickOutcome> {
        if self.state != AppState::Plotting {
            return None;
        }
        let (event, viewport) = ui::plot::pointer_at(graph_area(frame), column, row)?;
        let outcome = self.session.click(event, viewport);
        self.last_outcome = Some(outcome);
        self.dirty.set(true);
        Some(outcome)
    }
}

/// Place each point as a click would and judge the result.
fn verify(session: &mut ActivitySession, points: &[Point]) -> Verdict {
    for &p in points {
        let outcome = session.add_point(p);
        if !outcome.is_accepted() {
            eprintln!("skipped {p}: {outcome}");
        }
    }
    session.submit()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FilePreferenceStore::new();
    let prefs = store.load();
    if let Some(log_path) = AppDirs::log_path() {
        let filter = cli.log_filter.as_deref().unwrap_or(&prefs.log_filter);
        if let Err(err) = logging::init(filter, &log_path) {
            eprintln!("logging disabled: {err}");
        }
    }
    // first run: leave an editable preferences file behind
    if !store.path().exists() {
        match store.save(&prefs) {
            Ok(()) => info!(path = %store.path().display(), "wrote default preferences"),
            Err(err) => warn!(%err, "could not write preferences"),
        }
    }

    let source = FileActivitySource::resolve(&cli.path, prefs.activity_dir.as_deref());
    let config = source.load()?;

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if let Some(points) = &cli.verify {
        let points = parse_points(points)?;
        if let Err(err) = config.check_renderable() {
            Cli::command().error(ErrorKind::InvalidValue, err).exit();
        }
        let mut session = ActivitySession::with_validators(config, cli.validators());
        let verdict = verify(&mut session, &points);
        println!("{}", serde_json::to_string(&verdict)?);
        info!(points = %points.iter().join(" "), correct = verdict.is_correct, "verified from the command line");
        std::process::exit(if verdict.is_correct { 0 } else { 1 });
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(config, cli.validators(), &prefs);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;
    app.take_dirty();

    while let Some(event) = runner.step() {
        let mut redraw = false;
        match event {
            ActivityEvent::Resize => redraw = true,
            ActivityEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match command_for(key) {
                    Some(Command::Quit) => break,
                    Some(command) => app.apply(command),
                    None => {}
                }
            }
            ActivityEvent::Click { column, row } => {
                let size = terminal.size()?;
                app.click(column, row, Rect::new(0, 0, size.width, size.height));
            }
        }

        if app.take_dirty() || redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
