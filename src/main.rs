mod app;
mod config;
mod controller;
mod domain;
mod error;
mod identity;
mod input;
mod logging;
mod notifications;
mod persistence;
mod report;
mod session;
mod store;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::{AppState, PlannerSession};
use clap::{Parser, Subcommand, ValueEnum};
use config::PlannerConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{parse_duration, sort_by_label, sort_by_value, DayFilter, TaskId};
use identity::{Identity, LocalIdentityProvider};
use persistence::{ensure_dir, init_local_dir, resolve_data_dir};
use ratatui::{backend::CrosstermBackend, Terminal};
use report::{default_report_path, format_minutes, generate_report, summarize, write_report};
use session::Session;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use store::FileTaskStore;

#[derive(Parser)]
#[command(name = "studyplan")]
#[command(about = "A terminal weekly study planner with per-subject time statistics", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .studyplan directory, then ~/.studyplan
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Sign in as this user before running the command
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .studyplan directory in the current directory
    Init,
    /// Sign in; the name is remembered for later runs
    Login {
        name: String,
    },
    /// Sign out
    Logout,
    /// Add a study task
    Add {
        /// Day of the week, e.g. Monday or Mon
        #[arg(short, long)]
        day: String,
        #[arg(short, long)]
        subject: String,
        /// Planned minutes
        #[arg(short, long)]
        minutes: String,
    },
    /// List tasks
    List {
        /// Only tasks for this day
        #[arg(short, long)]
        day: Option<String>,
    },
    /// Flip a task between planned and completed
    Toggle {
        id: i64,
    },
    /// Delete a task
    Delete {
        id: i64,
    },
    /// Print minutes per subject
    Stats {
        /// Day of the week or ALL (default)
        #[arg(short, long)]
        day: Option<String>,
        /// Order of the subjects
        #[arg(long, value_enum, default_value_t = SortOrder::Planned)]
        sort: SortOrder,
    },
    /// Write a markdown study report
    Report {
        /// Day of the week or ALL (default)
        #[arg(short, long)]
        day: Option<String>,
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD-<scope>.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    /// Order in which subjects were first planned
    Planned,
    /// Most minutes first
    Minutes,
    /// Alphabetical
    Name,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init must not create the default data directory
    if let Some(Commands::Init) = cli.command {
        return init();
    }

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    ensure_dir(&data_dir)?;

    // Keep the handle alive so buffered log lines are flushed
    let _logger = match logging::init_logging(&data_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let user = cli.user.as_deref();
    match cli.command {
        None => run_tui(&data_dir, user),
        Some(command) => run_command(command, &data_dir, user),
    }
}

fn init() -> Result<()> {
    // Initialize local .studyplan directory
    let data_dir = init_local_dir()?;
    println!("Initialized study plan directory: {}", data_dir.display());
    println!();
    println!("studyplan will now use this local directory for your tasks.");
    println!("Run 'studyplan login <NAME>' or just 'studyplan' to start planning.");
    Ok(())
}

fn open_session(data_dir: &Path, user: Option<&str>) -> Result<PlannerSession> {
    let store = Arc::new(FileTaskStore::new(data_dir));
    let mut session = Session::new(LocalIdentityProvider::open(data_dir), store);
    if let Some(name) = user {
        session.sign_in(name)?;
    }
    Ok(session)
}

/// Session with the current user's tasks loaded
fn signed_in_session(data_dir: &Path, user: Option<&str>) -> Result<(PlannerSession, Identity)> {
    let mut session = open_session(data_dir, user)?;
    session.process_events().context("Failed to load tasks")?;
    let identity = session
        .identity()
        .context("Not signed in. Run 'studyplan login <NAME>' or pass --user <NAME>")?;
    Ok((session, identity))
}

fn parse_filter(day: Option<&str>) -> Result<DayFilter> {
    Ok(day.map(DayFilter::parse).transpose()?.unwrap_or_default())
}

fn run_command(command: Commands, data_dir: &Path, user: Option<&str>) -> Result<()> {
    match command {
        Commands::Init => init(),
        Commands::Login { name } => {
            let mut session = open_session(data_dir, user)?;
            let identity = session.sign_in(&name)?;
            println!("Signed in as {}", identity.display_name);
            Ok(())
        }
        Commands::Logout => {
            let mut session = open_session(data_dir, user)?;
            match session.identity() {
                Some(identity) => {
                    session.sign_out()?;
                    println!("Signed out {}", identity.display_name);
                }
                None => println!("Nobody is signed in"),
            }
            Ok(())
        }
        Commands::Add { day, subject, minutes } => {
            let (mut session, _) = signed_in_session(data_dir, user)?;
            let minutes = parse_duration(&minutes)?;
            let id = session.controller_mut().create(&day, &subject, minutes)?;
            println!("Added task {}", id);
            Ok(())
        }
        Commands::List { day } => {
            let filter = parse_filter(day.as_deref())?;
            let (session, identity) = signed_in_session(data_dir, user)?;
            let tasks: Vec<_> = session
                .controller()
                .tasks()
                .iter()
                .filter(|t| filter.matches(t))
                .collect();

            if tasks.is_empty() {
                println!("No tasks for {} ({})", identity.display_name, filter);
                return Ok(());
            }
            for task in tasks {
                println!(
                    "{:>14}  [{}]  {:<9}  {:<20}  {}",
                    task.id.to_string(),
                    if task.completed { "x" } else { " " },
                    task.day_label(),
                    task.subject,
                    format_minutes(task.duration_minutes as u64)
                );
            }
            Ok(())
        }
        Commands::Toggle { id } => {
            let (mut session, _) = signed_in_session(data_dir, user)?;
            let completed = session.controller_mut().toggle_completion(TaskId(id))?;
            println!(
                "Task {} is now {}",
                id,
                if completed { "completed" } else { "planned" }
            );
            Ok(())
        }
        Commands::Delete { id } => {
            let (mut session, _) = signed_in_session(data_dir, user)?;
            let task = session.controller_mut().delete(TaskId(id))?;
            println!("Deleted {} ({})", task.subject, task.day_label());
            Ok(())
        }
        Commands::Stats { day, sort } => {
            let filter = parse_filter(day.as_deref())?;
            let (session, _) = signed_in_session(data_dir, user)?;
            let mut summary = summarize(session.controller().tasks(), filter);
            match sort {
                SortOrder::Planned => {}
                SortOrder::Minutes => sort_by_value(&mut summary.buckets),
                SortOrder::Name => sort_by_label(&mut summary.buckets),
            }

            println!("View: {}", filter);
            for bucket in &summary.buckets {
                println!(
                    "  {:<20} {:>8}  {:>5.1}%",
                    bucket.label,
                    format_minutes(bucket.value),
                    bucket.share(summary.total_minutes)
                );
            }
            println!(
                "Total: {} ({} completed)",
                format_minutes(summary.total_minutes),
                format_minutes(summary.completed_minutes)
            );
            Ok(())
        }
        Commands::Report { day, output } => {
            let filter = parse_filter(day.as_deref())?;
            let (session, identity) = signed_in_session(data_dir, user)?;

            let content = generate_report(&identity, session.controller().tasks(), filter);
            let path = output.unwrap_or_else(|| {
                default_report_path(data_dir, filter, chrono::Local::now().date_naive())
            });
            write_report(&path, &content)?;
            println!("Report generated: {}", path.display());
            Ok(())
        }
    }
}

fn run_tui(data_dir: &Path, user: Option<&str>) -> Result<()> {
    let config = PlannerConfig::load(data_dir)?;
    let session = open_session(data_dir, user)?;
    log::info!("starting TUI with data directory {}", data_dir.display());

    let mut app = AppState::new(session, config);
    app.tick();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.sync_state() == domain::SyncState::LocalAhead {
        eprintln!(
            "Warning: {} unsaved change(s) could not be written",
            app.pending_persists()
        );
    }

    if let Err(err) = &result {
        log::error!("TUI stopped: {:#}", err);
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration(&app.config);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
